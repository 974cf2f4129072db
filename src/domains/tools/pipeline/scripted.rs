//! Scripted upstream used by tool tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::upstream::{ContentType, Upstream, UpstreamRequest, UpstreamResult};

/// Replays queued results in order and records every request it receives.
#[derive(Default)]
pub(crate) struct ScriptedUpstream {
    responses: Mutex<VecDeque<UpstreamResult>>,
    requests: Mutex<Vec<UpstreamRequest>>,
}

impl ScriptedUpstream {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, result: UpstreamResult) -> Self {
        self.responses.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn json(self, body: &str) -> Self {
        self.respond(UpstreamResult::Success {
            body: body.to_string(),
            content_type: ContentType::Json,
        })
    }

    pub(crate) fn xml(self, body: &str) -> Self {
        self.respond(UpstreamResult::Success {
            body: body.to_string(),
            content_type: ContentType::Xml,
        })
    }

    pub(crate) fn requests(&self) -> Vec<UpstreamRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Upstream for ScriptedUpstream {
    async fn fetch(&self, request: UpstreamRequest) -> UpstreamResult {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(UpstreamResult::NetworkError {
                cause: "no scripted response left".to_string(),
            })
    }
}
