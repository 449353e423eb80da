//! In-memory transport for unit tests

use super::transport::{HttpResponse, HttpTransport};
use crate::error::SparqlResult;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    /// Form fields joined as `name=value&...` without encoding
    pub body: String,
    pub content_type: Option<String>,
}

/// Records every request and answers from a queue of canned responses,
/// falling back to a default once the queue is empty
pub struct RecordingTransport {
    default: (StatusCode, String),
    queued: Mutex<VecDeque<(StatusCode, String)>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingTransport {
    pub fn new(status: StatusCode, body: &str) -> Self {
        Self {
            default: (status, body.to_string()),
            queued: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer the next request with `status` and `body`
    pub fn respond_next(self, status: StatusCode, body: &str) -> Self {
        self.queued.lock().unwrap().push_back((status, body.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) -> HttpResponse {
        self.calls.lock().unwrap().push(call);
        let (status, body) = self
            .queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());
        let chunks: Vec<io::Result<Bytes>> = vec![Ok(Bytes::from(body))];
        HttpResponse::new(status, futures::stream::iter(chunks).boxed())
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn submit_form(&self, url: &str, fields: &[(&str, &str)]) -> SparqlResult<HttpResponse> {
        let body = fields
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");
        Ok(self.record(RecordedCall {
            method: "POST",
            url: url.to_string(),
            body,
            content_type: None,
        }))
    }

    async fn post(&self, url: &str, body: String, content_type: &str) -> SparqlResult<HttpResponse> {
        Ok(self.record(RecordedCall {
            method: "POST",
            url: url.to_string(),
            body,
            content_type: Some(content_type.to_string()),
        }))
    }

    async fn get(&self, url: &str) -> SparqlResult<HttpResponse> {
        Ok(self.record(RecordedCall {
            method: "GET",
            url: url.to_string(),
            body: String::new(),
            content_type: None,
        }))
    }
}
