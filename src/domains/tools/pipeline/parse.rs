//! Response parser.
//!
//! Decodes a raw upstream body into a [`ParsedDocument`]: a JSON value or an
//! owned XML element tree. XML element and attribute names are stored by
//! local name, so namespaces never get in the way of lookups.
//!
//! Text content is kept as plain text. A document embedded in an element's
//! text stays opaque until [`parse_nested`] is called on it explicitly.

use std::fmt;

use roxmltree::{Node, ParsingOptions};
use thiserror::Error;

use super::upstream::ContentType;

/// Which decode pass failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseScope {
    /// The response body itself.
    Outer,
    /// A document carried inside the text of an outer element.
    Inner,
}

impl fmt::Display for ParseScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outer => f.write_str("outer"),
            Self::Inner => f.write_str("inner"),
        }
    }
}

/// A body could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse {scope} {format} {kind}: {cause}", kind = noun(.scope))]
pub struct ParseError {
    pub scope: ParseScope,
    pub format: ContentType,
    pub cause: String,
}

fn noun(scope: &ParseScope) -> &'static str {
    match scope {
        ParseScope::Outer => "response",
        ParseScope::Inner => "payload",
    }
}

impl ParseError {
    pub fn new(scope: ParseScope, format: ContentType, cause: impl Into<String>) -> Self {
        Self {
            scope,
            format,
            cause: cause.into(),
        }
    }
}

/// An XML element with its attributes, direct text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// First matching descendant in document order, excluding `self`.
    pub fn descendant<P>(&self, predicate: &P) -> Option<&XmlElement>
    where
        P: Fn(&XmlElement) -> bool,
    {
        for child in &self.children {
            if predicate(child) {
                return Some(child);
            }
            if let Some(found) = child.descendant(predicate) {
                return Some(found);
            }
        }
        None
    }

    fn from_node(node: Node<'_, '_>) -> Self {
        let mut element = XmlElement {
            name: node.tag_name().name().to_string(),
            attributes: node
                .attributes()
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect(),
            ..Default::default()
        };

        for child in node.children() {
            if child.is_element() {
                element.children.push(Self::from_node(child));
            } else if let Some(text) = child.text().filter(|_| child.is_text()) {
                element.text.push_str(text);
            }
        }

        element
    }
}

/// A decoded upstream body.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedDocument {
    Json(serde_json::Value),
    Xml(XmlElement),
}

impl ParsedDocument {
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Json(_) => ContentType::Json,
            Self::Xml(_) => ContentType::Xml,
        }
    }

    /// Whether a top-level JSON object holds a non-null value under any of
    /// `keys`. Always false for XML.
    pub fn has_any_key(&self, keys: &[&str]) -> bool {
        match self {
            Self::Json(serde_json::Value::Object(map)) => keys
                .iter()
                .any(|k| map.get(*k).is_some_and(|v| !v.is_null())),
            _ => false,
        }
    }
}

/// Decode a response body.
pub fn parse(body: &str, content_type: ContentType) -> Result<ParsedDocument, ParseError> {
    parse_scoped(body, content_type, ParseScope::Outer)
}

/// Decode a document found inside the text of an already parsed element.
pub fn parse_nested(text: &str, content_type: ContentType) -> Result<ParsedDocument, ParseError> {
    parse_scoped(text, content_type, ParseScope::Inner)
}

fn parse_scoped(
    body: &str,
    content_type: ContentType,
    scope: ParseScope,
) -> Result<ParsedDocument, ParseError> {
    match content_type {
        ContentType::Json => serde_json::from_str(body)
            .map(ParsedDocument::Json)
            .map_err(|e| ParseError::new(scope, content_type, e.to_string())),
        ContentType::Xml => {
            let mut options = ParsingOptions::default();
            options.allow_dtd = true;
            let document = roxmltree::Document::parse_with_options(body.trim(), options)
                .map_err(|e| ParseError::new(scope, content_type, e.to_string()))?;
            Ok(ParsedDocument::Xml(XmlElement::from_node(
                document.root_element(),
            )))
        }
    }
}
