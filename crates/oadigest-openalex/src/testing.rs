//! In-memory [`PageFetcher`] for unit tests

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;

use oadigest_core::ClientError;

use crate::entity::Entity;
use crate::fetcher::PageFetcher;
use crate::page::RawPage;
use crate::record::RawRecord;

/// One request seen by the fetcher
#[derive(Debug, Clone)]
pub struct Request {
    pub entity: Entity,
    pub id: Option<String>,
    pub params: Vec<(&'static str, String)>,
}

impl Request {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Replays canned responses in order and records every request
pub struct ScriptedFetcher {
    responses: RefCell<VecDeque<Result<Value, ClientError>>>,
    requests: RefCell<Vec<Request>>,
}

impl ScriptedFetcher {
    pub fn new(responses: Vec<Value>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub fn with_results(responses: Vec<Result<Value, ClientError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn next_response(&self, request: Request) -> Result<Value, ClientError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ClientError::Transport {
                    status: None,
                    message: "script exhausted".into(),
                })
            })
    }
}

impl PageFetcher for ScriptedFetcher {
    fn fetch_page(&self, entity: Entity, params: &[(&'static str, String)]) -> Result<RawPage, ClientError> {
        let body = self.next_response(Request {
            entity,
            id: None,
            params: params.to_vec(),
        })?;
        RawPage::from_json(body)
    }

    fn fetch_record(&self, entity: Entity, id: &str) -> Result<RawRecord, ClientError> {
        let body = self.next_response(Request {
            entity,
            id: Some(id.to_string()),
            params: Vec::new(),
        })?;
        RawRecord::from_value(body)
    }
}
