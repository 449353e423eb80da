//! Transactions
//!
//! Two strategies share the [`Transaction`] trait:
//! - [`RemoteTransaction`] drives the server's own transaction endpoints,
//!   one round trip per call
//! - [`LocalTransaction`] batches update commands client side and submits
//!   them as a single SPARQL Update on commit
//!
//! A transaction starts `Active` and ends either `Committed` or
//! `RolledBack`. Every operation on a finished transaction fails with
//! [`SparqlError::TransactionState`]; a failed call leaves the state as it
//! was.

mod local;
mod remote;

pub use local::LocalTransaction;
pub use remote::RemoteTransaction;

use crate::client::ClientConfig;
use crate::error::{SparqlError, SparqlResult};
use crate::http::HttpTransport;
use crate::rdf::Statement;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Transaction token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Fresh random token
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Active,
    Committed,
    RolledBack,
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionState::Active => write!(f, "active"),
            TransactionState::Committed => write!(f, "committed"),
            TransactionState::RolledBack => write!(f, "rolled back"),
        }
    }
}

/// Transaction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Server-side transaction endpoints
    #[default]
    Remote,
    /// Client-side command batching
    Local,
}

#[async_trait]
pub trait Transaction: Send {
    fn id(&self) -> TransactionId;

    fn state(&self) -> TransactionState;

    /// Add statements to the default graph or their own contexts
    async fn add(&mut self, statements: &[Statement]) -> SparqlResult<()>;

    async fn remove(&mut self, statements: &[Statement]) -> SparqlResult<()>;

    async fn commit(&mut self) -> SparqlResult<()>;

    async fn rollback(&mut self) -> SparqlResult<()>;
}

pub(crate) fn ensure_active(id: TransactionId, state: TransactionState) -> SparqlResult<()> {
    match state {
        TransactionState::Active => Ok(()),
        state => Err(SparqlError::TransactionState { id, state }),
    }
}

/// Start a transaction of the given kind
pub async fn begin(
    kind: TransactionKind,
    transport: Arc<dyn HttpTransport>,
    config: &ClientConfig,
    reasoning: bool,
) -> SparqlResult<Box<dyn Transaction>> {
    Ok(match kind {
        TransactionKind::Remote => Box::new(RemoteTransaction::begin(transport, config, reasoning).await?),
        TransactionKind::Local => Box::new(LocalTransaction::new(transport, config)),
    })
}
