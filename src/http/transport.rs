//! HTTP collaborator
//!
//! The client only needs three request shapes: a form submission, a plain
//! POST with a body, and a GET. Responses expose the status and the body as
//! a chunk stream so result documents are never buffered whole.

use crate::error::SparqlResult;
use crate::results::ByteStream;
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use std::io;
use tracing::debug;

/// Media type requested for every call
pub const SPARQL_RESULTS_XML: &str = "application/sparql-results+xml";

/// Media type of remote transaction add/remove bodies
pub const N_TRIPLES: &str = "application/n-triples";

/// Status and streaming body of a response
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: ByteStream,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: ByteStream) -> Self {
        Self { status, body }
    }

    /// Collect the whole body
    pub async fn bytes(mut self) -> SparqlResult<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(chunk) = self.body.next().await {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }

    /// Collect the whole body as text, replacing invalid UTF-8
    pub async fn text(self) -> SparqlResult<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Request primitives the client is built on
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `fields` as `application/x-www-form-urlencoded`
    async fn submit_form(&self, url: &str, fields: &[(&str, &str)]) -> SparqlResult<HttpResponse>;

    /// POST a raw body
    async fn post(&self, url: &str, body: String, content_type: &str) -> SparqlResult<HttpResponse>;

    async fn get(&self, url: &str) -> SparqlResult<HttpResponse>;
}

/// Encode form fields
pub fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(name, NON_ALPHANUMERIC),
                utf8_percent_encode(value, NON_ALPHANUMERIC)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// reqwest-backed transport with basic authentication
pub struct ReqwestTransport {
    http_client: Client,
    user: String,
    password: String,
}

impl ReqwestTransport {
    pub fn new(user: &str, password: &str) -> Self {
        Self::with_client(Client::new(), user, password)
    }

    /// Use a preconfigured client (proxies, TLS, timeouts)
    pub fn with_client(http_client: Client, user: &str, password: &str) -> Self {
        Self {
            http_client,
            user: user.to_string(),
            password: password.to_string(),
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .basic_auth(&self.user, Some(&self.password))
            .header(ACCEPT, SPARQL_RESULTS_XML)
    }

    async fn send(request: RequestBuilder) -> SparqlResult<HttpResponse> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes_stream().map_err(io::Error::other).boxed();
        Ok(HttpResponse::new(status, body))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn submit_form(&self, url: &str, fields: &[(&str, &str)]) -> SparqlResult<HttpResponse> {
        debug!(url, "Submitting form");
        let request = self
            .request(Method::POST, url)
            .header(CONTENT_TYPE, mime::APPLICATION_WWW_FORM_URLENCODED.as_ref())
            .body(encode_form(fields));
        Self::send(request).await
    }

    async fn post(&self, url: &str, body: String, content_type: &str) -> SparqlResult<HttpResponse> {
        debug!(url, content_type, "Posting body");
        let request = self
            .request(Method::POST, url)
            .header(CONTENT_TYPE, content_type)
            .body(body);
        Self::send(request).await
    }

    async fn get(&self, url: &str) -> SparqlResult<HttpResponse> {
        debug!(url, "GET");
        Self::send(self.request(Method::GET, url)).await
    }
}
