//! SPARQL client
//!
//! [`SparqlClient`] ties the configuration, the HTTP transport, the result
//! parser, the update builder and the transaction strategies together.
//!
//! # Example
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use sparql_pipe::{ClientConfig, QueryBindings, SparqlClient};
//!
//! # async fn run() -> sparql_pipe::SparqlResult<()> {
//! let client = SparqlClient::new(ClientConfig::new("http://localhost", 5820, "test"));
//! let tuples: Vec<_> = client
//!     .query("SELECT ?s ?p ?o WHERE { ?s ?p ?o } LIMIT 10", &QueryBindings::new())
//!     .await?
//!     .try_collect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod bindings;
mod config;

pub use bindings::QueryBindings;
pub use config::{ClientConfig, ClientSettings, DEFAULT_READ_BUFFER_SIZE};

use crate::error::{SparqlError, SparqlResult};
use crate::http::{ensure_success, success_text, HttpResponse, HttpTransport, ReqwestTransport};
use crate::rdf::{Resource, Statement};
use crate::results::{parse_boolean, parse_tuples, write_csv, TupleStream};
use crate::transaction::{self, Transaction};
use crate::update::{build_clear, build_delete, build_insert};
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tracing::{debug, warn};

/// Non-blocking SPARQL protocol client
#[derive(Clone)]
pub struct SparqlClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl SparqlClient {
    /// Client over reqwest with the configured basic-auth credentials
    pub fn new(config: ClientConfig) -> Self {
        let transport = ReqwestTransport::new(config.user(), config.password());
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn submit(&self, url: &str, field: &str, text: &str) -> SparqlResult<HttpResponse> {
        let response = self.transport.submit_form(url, &[(field, text)]).await?;
        ensure_success(response).await
    }

    /// Run a tuple query
    ///
    /// The returned stream parses the response body as it is polled.
    pub async fn query(&self, query: &str, bindings: &QueryBindings) -> SparqlResult<TupleStream> {
        let query = bindings.apply(query)?;
        debug!(url = self.config.query_url(), "Running tuple query");
        let response = self.submit(self.config.query_url(), "query", &query).await?;
        Ok(parse_tuples(response.body, self.config.read_buffer_size()))
    }

    /// Run an ASK query
    pub async fn ask(&self, query: &str, bindings: &QueryBindings) -> SparqlResult<bool> {
        let query = bindings.apply(query)?;
        debug!(url = self.config.query_url(), "Running boolean query");
        let response = self.submit(self.config.query_url(), "query", &query).await?;
        parse_boolean(response.body, self.config.read_buffer_size()).await
    }

    /// Run a SPARQL Update command
    pub async fn update(&self, command: &str) -> SparqlResult<()> {
        debug!(url = self.config.update_url(), "Running update");
        self.submit(self.config.update_url(), "update", command).await?;
        Ok(())
    }

    /// Insert statements, into each of `contexts` if any are given
    pub async fn add(&self, statements: &[Statement], contexts: &[Option<Resource>]) -> SparqlResult<()> {
        self.update(&build_insert(statements, contexts)).await
    }

    /// Delete statements, from each of `contexts` if any are given
    pub async fn remove(&self, statements: &[Statement], contexts: &[Option<Resource>]) -> SparqlResult<()> {
        self.update(&build_delete(statements, contexts)).await
    }

    /// Clear the given graphs, or everything when `contexts` is empty
    pub async fn clear(&self, contexts: &[Option<Resource>]) -> SparqlResult<()> {
        self.update(&build_clear(contexts)?).await
    }

    /// Begin a transaction of the configured kind
    pub async fn begin(&self) -> SparqlResult<Box<dyn Transaction>> {
        self.begin_with_reasoning(self.config.reasoning()).await
    }

    pub async fn begin_with_reasoning(&self, reasoning: bool) -> SparqlResult<Box<dyn Transaction>> {
        transaction::begin(
            self.config.transaction_kind(),
            self.transport.clone(),
            &self.config,
            reasoning,
        )
        .await
    }

    /// Run `body` inside a transaction
    ///
    /// Commits when `body` succeeds. When it fails the transaction is rolled
    /// back and the error from `body` is returned; a failing rollback is only
    /// logged. A failed commit is followed by a rollback attempt as well, so
    /// no server-side transaction is left open, and the commit error is
    /// returned.
    ///
    /// ```no_run
    /// # use sparql_pipe::{SparqlClient, SparqlError, Statement};
    /// # async fn run(client: SparqlClient, statements: Vec<Statement>) -> Result<(), SparqlError> {
    /// client
    ///     .transaction(move |tx| Box::pin(async move { tx.add(&statements).await }))
    ///     .await
    /// # }
    /// ```
    pub async fn transaction<T, E, F>(&self, body: F) -> Result<T, E>
    where
        F: for<'t> FnOnce(&'t mut Box<dyn Transaction>) -> BoxFuture<'t, Result<T, E>>,
        E: From<SparqlError>,
    {
        let mut tx = self.begin().await?;
        match body(&mut tx).await {
            Ok(value) => match tx.commit().await {
                Ok(()) => Ok(value),
                Err(err) => {
                    rollback_quietly(tx.as_mut(), "commit").await;
                    Err(err.into())
                }
            },
            Err(err) => {
                rollback_quietly(tx.as_mut(), "transaction body").await;
                Err(err)
            }
        }
    }

    /// Run a tuple query and write its result to `sink` as CSV, returning
    /// the number of rows
    pub async fn export_csv<W>(&self, query: &str, sink: &mut W) -> SparqlResult<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let tuples = self.query(query, &QueryBindings::new()).await?;
        write_csv(tuples, sink).await
    }

    /// GET a URL with the client's credentials and return the body
    pub async fn get_string(&self, url: &str) -> SparqlResult<String> {
        let response = self.transport.get(url).await?;
        success_text(response).await
    }
}

/// Roll back after a failure, logging instead of returning a rollback error
async fn rollback_quietly(tx: &mut dyn Transaction, failed: &str) {
    if let Err(err) = tx.rollback().await {
        warn!(id = %tx.id(), error = %err, "Rollback after failed {} failed", failed);
    }
}
