//! Field extractor.
//!
//! Walks a [`ParsedDocument`] along declared [`FieldPath`]s. A value counts
//! as present only when it is non-empty after trimming; anything else is
//! "not found" (`None`), never an empty string.

use std::ops::RangeInclusive;

use serde_json::Value;

use super::parse::{ParsedDocument, XmlElement};

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// JSON object member.
    Key(&'static str),
    /// JSON array element.
    Index(usize),
    /// Direct XML child element, by local name.
    Child(&'static str),
    /// First XML descendant element with this local name.
    Descendant(&'static str),
    /// First XML descendant element with this local name whose attribute
    /// has the given value.
    DescendantWith {
        element: &'static str,
        attribute: &'static str,
        value: &'static str,
    },
    /// XML attribute of the current element. Terminal.
    Attribute(&'static str),
}

/// A declared location inside a document.
pub type FieldPath = &'static [Segment];

/// A position inside a parsed document.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Json(&'a Value),
    Xml(&'a XmlElement),
    Text(&'a str),
}

impl ParsedDocument {
    pub fn root(&self) -> Node<'_> {
        match self {
            Self::Json(value) => Node::Json(value),
            Self::Xml(element) => Node::Xml(element),
        }
    }
}

impl<'a> Node<'a> {
    fn step(self, segment: &Segment) -> Option<Node<'a>> {
        match (self, *segment) {
            (Node::Json(value), Segment::Key(key)) => value.get(key).map(Node::Json),
            (Node::Json(value), Segment::Index(idx)) => value.get(idx).map(Node::Json),
            (Node::Xml(element), Segment::Child(name)) => element.child(name).map(Node::Xml),
            (Node::Xml(element), Segment::Descendant(name)) => element
                .descendant(&|e: &XmlElement| e.name == name)
                .map(Node::Xml),
            (
                Node::Xml(element),
                Segment::DescendantWith {
                    element: name,
                    attribute,
                    value,
                },
            ) => element
                .descendant(&|e: &XmlElement| e.name == name && e.attribute(attribute) == Some(value))
                .map(Node::Xml),
            (Node::Xml(element), Segment::Attribute(name)) => element.attribute(name).map(Node::Text),
            _ => None,
        }
    }

    /// Follow `path` from this node.
    pub fn locate(self, path: &[Segment]) -> Option<Node<'a>> {
        path.iter().try_fold(self, |node, segment| node.step(segment))
    }

    /// Scalar text of this node, trimmed, if present and non-empty.
    pub fn text(self) -> Option<String> {
        let raw = match self {
            Node::Json(Value::String(s)) => s.clone(),
            Node::Json(Value::Number(n)) => n.to_string(),
            Node::Json(Value::Bool(b)) => b.to_string(),
            Node::Json(_) => return None,
            Node::Xml(element) => element.text.clone(),
            Node::Text(text) => text.to_string(),
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Text at `path` relative to this node.
    pub fn get(self, path: &[Segment]) -> Option<String> {
        self.locate(path).and_then(Node::text)
    }

    /// Text of a member whose name is only known at runtime (JSON key or
    /// XML child element).
    pub fn field(self, name: &str) -> Option<String> {
        match self {
            Node::Json(value) => value.get(name).and_then(|v| Node::Json(v).text()),
            Node::Xml(element) => element.child(name).and_then(|e| Node::Xml(e).text()),
            Node::Text(_) => None,
        }
    }

    /// Items of a container in upstream order: array elements for JSON,
    /// child elements for XML. Anything else has no items.
    pub fn items(self) -> Vec<Node<'a>> {
        match self {
            Node::Json(Value::Array(values)) => values.iter().map(Node::Json).collect(),
            Node::Xml(element) => element.children.iter().map(Node::Xml).collect(),
            _ => Vec::new(),
        }
    }

    /// Build a record holding every declared field, present or not.
    pub fn record(self, fields: &[(&'static str, FieldPath)]) -> ExtractedRecord {
        let mut record = ExtractedRecord::default();
        for (label, path) in fields {
            record.push(*label, self.get(path));
        }
        record
    }
}

/// Try each candidate path in order and return the first present value,
/// tagged with the key of the path that matched.
pub fn extract<K: Copy>(document: &ParsedDocument, priority: &[(K, FieldPath)]) -> Option<(K, String)> {
    priority
        .iter()
        .find_map(|(key, path)| document.root().get(path).map(|value| (*key, value)))
}

/// Items of the container at `container`, in upstream order.
pub fn extract_all<'a>(document: &'a ParsedDocument, container: FieldPath) -> Vec<Node<'a>> {
    document
        .root()
        .locate(container)
        .map(Node::items)
        .unwrap_or_default()
}

/// One logical entity as an ordered list of labelled, optional values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRecord {
    fields: Vec<(&'static str, Option<String>)>,
}

impl ExtractedRecord {
    pub fn push(&mut self, label: &'static str, value: Option<String>) {
        self.fields.push((label, value));
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| *l == label)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn fields(&self) -> &[(&'static str, Option<String>)] {
        &self.fields
    }
}

/// A primary value found at a numbered slot, with the secondary value from
/// the same slot when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedPair {
    pub index: usize,
    pub primary: String,
    pub secondary: Option<String>,
}

/// Probe `<primary_prefix>N` / `<secondary_prefix>N` for every `N` in
/// `slots`, in ascending order. Slots without a primary value are skipped.
pub fn probe_indexed(
    node: Node<'_>,
    primary_prefix: &str,
    secondary_prefix: &str,
    slots: RangeInclusive<usize>,
) -> Vec<IndexedPair> {
    slots
        .filter_map(|index| {
            let primary = node.field(&format!("{primary_prefix}{index}"))?;
            let secondary = node.field(&format!("{secondary_prefix}{index}"));
            Some(IndexedPair {
                index,
                primary,
                secondary,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::pipeline::{ContentType, parse};
    use serde_json::json;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Section {
        Summary,
        Description,
    }

    const SECTIONS: &[(Section, FieldPath)] = &[
        (
            Section::Summary,
            &[Segment::Child("summary_section"), Segment::Child("summary_content")],
        ),
        (
            Section::Description,
            &[
                Segment::Child("description_section"),
                Segment::Child("description_content"),
            ],
        ),
    ];

    fn xml(body: &str) -> ParsedDocument {
        parse(body, ContentType::Xml).unwrap()
    }

    #[test]
    fn test_priority_returns_description_when_summary_missing() {
        let doc = xml(
            "<topic><description_section><description_content>D</description_content></description_section></topic>",
        );
        assert_eq!(
            extract(&doc, SECTIONS),
            Some((Section::Description, "D".to_string()))
        );
    }

    #[test]
    fn test_priority_prefers_summary_over_description() {
        let doc = xml(
            "<topic>\
               <description_section><description_content>D</description_content></description_section>\
               <summary_section><summary_content>S</summary_content></summary_section>\
             </topic>",
        );
        assert_eq!(
            extract(&doc, SECTIONS),
            Some((Section::Summary, "S".to_string()))
        );
    }

    #[test]
    fn test_empty_candidate_is_skipped() {
        let doc = xml(
            "<topic>\
               <summary_section><summary_content>   </summary_content></summary_section>\
               <description_section><description_content>D</description_content></description_section>\
             </topic>",
        );
        assert_eq!(extract(&doc, SECTIONS).map(|(k, _)| k), Some(Section::Description));
    }

    #[test]
    fn test_no_candidate_is_not_found() {
        let doc = xml("<topic><title>T</title></topic>");
        assert_eq!(extract(&doc, SECTIONS), None);
    }

    #[test]
    fn test_attribute_and_descendant_with() {
        let doc = xml(
            r#"<result><list><document url="https://example.org/t">
                 <content name="title">T</content>
                 <content name="healthTopic">payload</content>
               </document></list></result>"#,
        );
        let root = doc.root();
        assert_eq!(
            root.get(&[Segment::Descendant("document"), Segment::Attribute("url")]),
            Some("https://example.org/t".to_string())
        );
        assert_eq!(
            root.get(&[Segment::DescendantWith {
                element: "content",
                attribute: "name",
                value: "healthTopic",
            }]),
            Some("payload".to_string())
        );
    }

    #[test]
    fn test_extract_all_preserves_upstream_order() {
        let doc = ParsedDocument::Json(json!({
            "drinks": [{"strDrink": "Zombie"}, {"strDrink": "Americano"}, {"strDrink": "Mojito"}]
        }));
        let names: Vec<_> = extract_all(&doc, &[Segment::Key("drinks")])
            .into_iter()
            .filter_map(|item| item.field("strDrink"))
            .collect();
        assert_eq!(names, vec!["Zombie", "Americano", "Mojito"]);
    }

    #[test]
    fn test_extract_all_on_missing_or_scalar_container_is_empty() {
        let doc = ParsedDocument::Json(json!({"drinks": "no data found"}));
        assert!(extract_all(&doc, &[Segment::Key("drinks")]).is_empty());
        assert!(extract_all(&doc, &[Segment::Key("ingredients")]).is_empty());
    }

    #[test]
    fn test_record_keeps_absent_fields() {
        let doc = ParsedDocument::Json(json!({"strDrink": "Mojito", "strGlass": null}));
        let record = doc.root().record(&[
            ("Name", &[Segment::Key("strDrink")]),
            ("Glass", &[Segment::Key("strGlass")]),
            ("Category", &[Segment::Key("strCategory")]),
        ]);
        assert_eq!(record.fields().len(), 3);
        assert_eq!(record.get("Name"), Some("Mojito"));
        assert_eq!(record.get("Glass"), None);
        assert_eq!(record.fields()[2], ("Category", None));
    }

    #[test]
    fn test_json_scalars_become_text() {
        let doc = ParsedDocument::Json(json!([["A15", "Tuberculosis"], 42, true, ""]));
        let root = doc.root();
        assert_eq!(
            root.get(&[Segment::Index(0), Segment::Index(1)]),
            Some("Tuberculosis".to_string())
        );
        assert_eq!(root.get(&[Segment::Index(1)]), Some("42".to_string()));
        assert_eq!(root.get(&[Segment::Index(2)]), Some("true".to_string()));
        assert_eq!(root.get(&[Segment::Index(3)]), None);
    }

    #[test]
    fn test_probe_indexed_pairs_by_shared_index() {
        let doc = ParsedDocument::Json(json!({
            "strIngredient1": "Tequila", "strMeasure1": "1 1/2 oz ",
            "strIngredient2": null, "strMeasure2": "1 oz",
            "strIngredient3": "ingredient3", "strMeasure3": null,
            "strIngredient4": "ingredient4", "strMeasure4": "measure4",
            "strIngredient5": "", "strMeasure5": "",
            "strIngredient15": "Salt"
        }));
        let pairs = probe_indexed(doc.root(), "strIngredient", "strMeasure", 1..=15);
        assert_eq!(
            pairs,
            vec![
                IndexedPair {
                    index: 1,
                    primary: "Tequila".to_string(),
                    secondary: Some("1 1/2 oz".to_string()),
                },
                IndexedPair {
                    index: 3,
                    primary: "ingredient3".to_string(),
                    secondary: None,
                },
                IndexedPair {
                    index: 4,
                    primary: "ingredient4".to_string(),
                    secondary: Some("measure4".to_string()),
                },
                IndexedPair {
                    index: 15,
                    primary: "Salt".to_string(),
                    secondary: None,
                },
            ]
        );
    }

    #[test]
    fn test_probe_indexed_respects_bound() {
        let doc = ParsedDocument::Json(json!({"strIngredient16": "Too far"}));
        assert!(probe_indexed(doc.root(), "strIngredient", "strMeasure", 1..=15).is_empty());
    }
}
