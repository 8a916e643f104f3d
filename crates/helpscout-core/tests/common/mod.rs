//! Test doubles and common utilities for synchronizer contract tests

#![allow(dead_code)]

use helpscout_core::error::{Error, Result};
use helpscout_core::traits::{ApiResponse, DocsTransport, PermalinkResolver, RecordId};
use helpscout_core::{HelpscoutConfig, MemoryMetadataStore, RedirectSynchronizer};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const SITE_ID: &str = "S1";

/// HTTP method seen by the mock transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
}

/// One request captured by the mock transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: String,
}

/// What the mock transport answers with
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(ApiResponse),
    Fail(String),
}

/// A DocsTransport that records every call and answers with canned replies
pub struct MockDocsTransport {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    post_reply: Arc<Mutex<MockReply>>,
    put_reply: Arc<Mutex<MockReply>>,
}

impl MockDocsTransport {
    /// POST answers 200 with `Location: .../redirects/{created_id}`, PUT answers 200 with no headers
    pub fn new(created_id: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            post_reply: Arc::new(Mutex::new(MockReply::Respond(created(created_id)))),
            put_reply: Arc::new(Mutex::new(MockReply::Respond(ApiResponse::new(200)))),
        }
    }

    /// Create a mock that shares recorded calls and replies with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            calls: Arc::clone(&other.calls),
            post_reply: Arc::clone(&other.post_reply),
            put_reply: Arc::clone(&other.put_reply),
        }
    }

    pub fn set_post_reply(&self, reply: MockReply) {
        *self.post_reply.lock().unwrap() = reply;
    }

    pub fn set_put_reply(&self, reply: MockReply) {
        *self.put_reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn count(&self, method: Method) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    fn answer(&self, method: Method, path: &str, body: &str) -> Result<ApiResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body: body.to_string(),
        });

        let reply = match method {
            Method::Post => self.post_reply.lock().unwrap().clone(),
            Method::Put => self.put_reply.lock().unwrap().clone(),
        };
        match reply {
            MockReply::Respond(response) => Ok(response),
            MockReply::Fail(message) => Err(Error::http(message)),
        }
    }
}

#[async_trait::async_trait]
impl DocsTransport for MockDocsTransport {
    async fn post(&self, path: &str, body: &str) -> Result<ApiResponse> {
        self.answer(Method::Post, path, body)
    }

    async fn put(&self, path: &str, body: &str) -> Result<ApiResponse> {
        self.answer(Method::Put, path, body)
    }

    fn transport_name(&self) -> &'static str {
        "mock"
    }
}

/// A PermalinkResolver backed by a fixed map
pub struct StaticPermalinks {
    links: HashMap<RecordId, String>,
}

impl StaticPermalinks {
    pub fn new(links: &[(RecordId, &str)]) -> Self {
        Self {
            links: links
                .iter()
                .map(|(id, url)| (*id, url.to_string()))
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl PermalinkResolver for StaticPermalinks {
    async fn permalink(&self, record_id: RecordId) -> Result<String> {
        self.links
            .get(&record_id)
            .cloned()
            .ok_or_else(|| Error::permalink(format!("no permalink for record {}", record_id)))
    }
}

/// A 200 response carrying the Location header of a freshly created redirect
pub fn created(redirect_id: &str) -> ApiResponse {
    ApiResponse::new(200).with_header(
        "Location",
        format!("https://docsapi.helpscout.net/v1/redirects/{}", redirect_id),
    )
}

/// Build a synchronizer over shared handles to a store and a mock transport
pub fn synchronizer(
    store: &MemoryMetadataStore,
    transport: &MockDocsTransport,
    links: &[(RecordId, &str)],
) -> RedirectSynchronizer {
    RedirectSynchronizer::new(
        Box::new(store.clone()),
        Box::new(StaticPermalinks::new(links)),
        Box::new(MockDocsTransport::sharing_state_with(transport)),
        &HelpscoutConfig::new(SITE_ID),
    )
    .expect("synchronizer construction succeeds")
}
