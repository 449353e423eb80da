//! sparql-pipe
//!
//! A non-blocking client for the SPARQL query, update and transaction
//! protocol over HTTP. Result sets are never loaded into memory as a whole:
//! response bodies are parsed chunk by chunk into a lazy stream of binding
//! tuples, which can be consumed directly or piped into a CSV sink.
//!
//! # Components
//!
//! - [`rdf`]: minimal RDF value model with `oxrdf` conversions
//! - [`results`]: incremental SPARQL Results XML parser, CSV writer and
//!   result handler adapter
//! - [`update`]: `INSERT DATA` / `DELETE DATA` / `CLEAR` command builder
//! - [`transaction`]: server-side and client-side transaction strategies
//! - [`http`]: transport abstraction and response classification
//! - [`client`]: the [`SparqlClient`] facade and its configuration
//!
//! ## Example Usage
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use sparql_pipe::{ClientConfig, Literal, NamedNode, QueryBindings, SparqlClient, Statement};
//!
//! # async fn run() -> sparql_pipe::SparqlResult<()> {
//! let client = SparqlClient::new(ClientConfig::new("http://localhost", 5820, "test"));
//!
//! let statement = Statement::new(
//!     NamedNode::new("http://example.org/alice"),
//!     NamedNode::new("http://xmlns.com/foaf/0.1/name"),
//!     Literal::new_simple_literal("Alice"),
//! );
//! client.add(&[statement], &[]).await?;
//!
//! let mut tuples = client
//!     .query("SELECT ?name WHERE { ?s ?p ?name }", &QueryBindings::new())
//!     .await?;
//! while let Some(tuple) = tuples.try_next().await? {
//!     println!("{:?}", tuple.get("name"));
//! }
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod http;
pub mod rdf;
pub mod results;
pub mod transaction;
pub mod update;

// Re-export main types for convenience
pub use client::{ClientConfig, ClientSettings, QueryBindings, SparqlClient};

pub use error::{ErrorResponse, SparqlError, SparqlResult};

pub use http::{HttpResponse, HttpTransport, ReqwestTransport};

pub use rdf::{
    BlankNode, Literal, LiteralTag, NamedNode, RdfError, RdfResult, RdfValue, Resource, Statement,
};

pub use results::{
    handle_with, parse_boolean, parse_tuples, write_csv, BindingTuple, ByteStream,
    CsvResultWriter, QueryResultHandler, TupleStream,
};

pub use transaction::{
    LocalTransaction, RemoteTransaction, Transaction, TransactionId, TransactionKind,
    TransactionState,
};

pub use update::{build_clear, build_delete, build_insert};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
