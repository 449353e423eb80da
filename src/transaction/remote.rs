use super::{ensure_active, Transaction, TransactionId, TransactionState};
use crate::client::ClientConfig;
use crate::error::{SparqlError, SparqlResult};
use crate::http::{ensure_success, success_text, HttpTransport, N_TRIPLES};
use crate::rdf::Statement;
use crate::update::to_ntriples;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Server-side transaction
///
/// The server issues the token on `begin`; every later call is a single
/// POST carrying the token in its path.
pub struct RemoteTransaction {
    id: TransactionId,
    state: TransactionState,
    transport: Arc<dyn HttpTransport>,
    database_base_path: String,
    transaction_base_url: String,
}

impl RemoteTransaction {
    /// Open a transaction on the server
    pub async fn begin(transport: Arc<dyn HttpTransport>, config: &ClientConfig, reasoning: bool) -> SparqlResult<Self> {
        let url = format!("{}/begin?reasoning={}", config.transaction_base_url(), reasoning);
        let response = transport.post(&url, String::new(), mime::TEXT_PLAIN.as_ref()).await?;
        let token = success_text(response).await?;
        let uuid = Uuid::parse_str(token.trim())
            .map_err(|e| SparqlError::Protocol(format!("invalid transaction id {:?}: {}", token, e)))?;

        let id = TransactionId::new(uuid);
        info!(%id, reasoning, "Remote transaction started");
        Ok(Self {
            id,
            state: TransactionState::Active,
            transport,
            database_base_path: config.database_base_path().to_string(),
            transaction_base_url: config.transaction_base_url().to_string(),
        })
    }

    async fn post_statements(&self, action: &str, statements: &[Statement]) -> SparqlResult<()> {
        ensure_active(self.id, self.state)?;
        let url = format!("{}/{}/{}", self.database_base_path, self.id, action);
        debug!(id = %self.id, action, count = statements.len(), "Sending statements");
        let response = self.transport.post(&url, to_ntriples(statements), N_TRIPLES).await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn finish(&mut self, action: &str, next: TransactionState) -> SparqlResult<()> {
        ensure_active(self.id, self.state)?;
        let url = format!("{}/{}/{}", self.transaction_base_url, action, self.id);
        let response = self.transport.post(&url, String::new(), mime::TEXT_PLAIN.as_ref()).await?;
        ensure_success(response).await?;
        self.state = next;
        info!(id = %self.id, state = %next, "Remote transaction finished");
        Ok(())
    }
}

#[async_trait]
impl Transaction for RemoteTransaction {
    fn id(&self) -> TransactionId {
        self.id
    }

    fn state(&self) -> TransactionState {
        self.state
    }

    async fn add(&mut self, statements: &[Statement]) -> SparqlResult<()> {
        self.post_statements("add", statements).await
    }

    async fn remove(&mut self, statements: &[Statement]) -> SparqlResult<()> {
        self.post_statements("remove", statements).await
    }

    async fn commit(&mut self) -> SparqlResult<()> {
        self.finish("commit", TransactionState::Committed).await
    }

    async fn rollback(&mut self) -> SparqlResult<()> {
        self.finish("rollback", TransactionState::RolledBack).await
    }
}
