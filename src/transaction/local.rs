use super::{ensure_active, Transaction, TransactionId, TransactionState};
use crate::client::ClientConfig;
use crate::error::SparqlResult;
use crate::http::{ensure_success, HttpTransport};
use crate::rdf::Statement;
use crate::update::{append_modify_command, ModifyCommand};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Client-side transaction
///
/// Mutations accumulate as `INSERT DATA` / `DELETE DATA` commands and are
/// submitted as one update request on commit. Rolling back only discards
/// the buffer.
pub struct LocalTransaction {
    id: TransactionId,
    state: TransactionState,
    commands: String,
    transport: Arc<dyn HttpTransport>,
    update_url: String,
}

impl LocalTransaction {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &ClientConfig) -> Self {
        let id = TransactionId::generate();
        debug!(%id, "Local transaction started");
        Self {
            id,
            state: TransactionState::Active,
            commands: String::new(),
            transport,
            update_url: config.update_url().to_string(),
        }
    }

    /// Update text submitted on commit
    pub fn pending_commands(&self) -> &str {
        &self.commands
    }

    fn append(&mut self, statements: &[Statement], command: ModifyCommand) -> SparqlResult<()> {
        ensure_active(self.id, self.state)?;
        append_modify_command(statements, &[], command, &mut self.commands);
        self.commands.push_str("; ");
        Ok(())
    }
}

#[async_trait]
impl Transaction for LocalTransaction {
    fn id(&self) -> TransactionId {
        self.id
    }

    fn state(&self) -> TransactionState {
        self.state
    }

    async fn add(&mut self, statements: &[Statement]) -> SparqlResult<()> {
        self.append(statements, ModifyCommand::Insert)
    }

    async fn remove(&mut self, statements: &[Statement]) -> SparqlResult<()> {
        self.append(statements, ModifyCommand::Delete)
    }

    async fn commit(&mut self) -> SparqlResult<()> {
        ensure_active(self.id, self.state)?;
        if !self.commands.is_empty() {
            let response = self
                .transport
                .submit_form(&self.update_url, &[("update", self.commands.as_str())])
                .await?;
            ensure_success(response).await?;
        }
        self.commands.clear();
        self.state = TransactionState::Committed;
        info!(id = %self.id, "Local transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> SparqlResult<()> {
        ensure_active(self.id, self.state)?;
        self.commands.clear();
        self.state = TransactionState::RolledBack;
        info!(id = %self.id, "Local transaction rolled back");
        Ok(())
    }
}
