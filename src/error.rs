//! Error types for sparql-pipe

use crate::rdf::RdfError;
use crate::transaction::{TransactionId, TransactionState};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error body returned by SPARQL servers on query failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable message
    pub message: String,
    /// Server specific error code (e.g. `QE0PE2`)
    pub code: String,
}

/// Errors that can occur when talking to a SPARQL endpoint
#[derive(Error, Debug)]
pub enum SparqlError {
    /// Malformed or unexpected XML structure in a result document
    #[error("Parse error at byte {position}: {message}")]
    Parse {
        /// What went wrong
        message: String,
        /// Byte offset in the document where the fault was detected
        position: u64,
    },

    /// Well-formed document that lacks an expected element
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Non-success status without a structured error body
    #[error("HTTP error ({status}): {message}")]
    Http {
        /// Raw body text, or a synthesized message for blank bodies
        message: String,
        /// Response status
        status: StatusCode,
    },

    /// Non-success status with a structured `{code, message}` body
    #[error("{status} -> query failed ({code}): {message}")]
    Query {
        /// Server error code
        code: String,
        /// Server error message
        message: String,
        /// Response status
        status: StatusCode,
    },

    /// Operation on a transaction that is no longer active
    #[error("Transaction {id} is {state}")]
    TransactionState {
        /// Transaction token
        id: TransactionId,
        /// State the transaction was found in
        state: TransactionState,
    },

    /// Graph name that SPARQL cannot express
    #[error("Invalid graph context: {0}")]
    InvalidContext(String),

    /// Variable binding that cannot be substituted into a query
    #[error("Invalid binding: {0}")]
    InvalidBinding(String),

    /// Connection-level failure reported by the HTTP client
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// I/O error on a body stream or output sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid RDF term
    #[error("RDF error: {0}")]
    Rdf(#[from] RdfError),
}

impl SparqlError {
    pub(crate) fn parse(message: impl Into<String>, position: u64) -> Self {
        SparqlError::Parse {
            message: message.into(),
            position,
        }
    }

    /// Status code carried by HTTP level failures
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SparqlError::Http { status, .. } | SparqlError::Query { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type SparqlResult<T> = Result<T, SparqlError>;
