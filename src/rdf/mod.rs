//! RDF value model
//!
//! Minimal immutable terms for everything that crosses the SPARQL protocol:
//! - named nodes, blank nodes and literals (`RdfValue`)
//! - statement subjects and graph names (`Resource`)
//! - statements with an optional named-graph context
//!
//! Literal labels are kept as received; typed access is deferred to the
//! accessor methods on [`Literal`]. Conversions to and from `oxrdf` are
//! provided at the boundary for callers that work with that model.
//!
//! # Example
//!
//! ```rust
//! use sparql_pipe::rdf::{Literal, NamedNode, Statement};
//!
//! let statement = Statement::new(
//!     NamedNode::new("http://example.org/alice"),
//!     NamedNode::new("http://xmlns.com/foaf/0.1/name"),
//!     Literal::new_language_tagged_literal("Alice", "en"),
//! );
//! assert_eq!(
//!     statement.to_string(),
//!     "<http://example.org/alice> <http://xmlns.com/foaf/0.1/name> \"Alice\"@en ."
//! );
//! ```

mod types;
pub mod xsd;

pub use types::{
    escape_string, BlankNode, Literal, LiteralTag, NamedNode, RdfError, RdfResult, RdfValue,
    Resource, Statement,
};
