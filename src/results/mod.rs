//! Query result pipeline
//!
//! SPARQL Results XML bodies are parsed incrementally into a lazy stream of
//! [`BindingTuple`]s (or a boolean), which can be consumed directly, pushed
//! into a [`QueryResultHandler`], or re-rendered as CSV.

mod events;
mod tuple;
pub mod csv;
pub mod handler;
pub mod xml;

pub use csv::{write_csv, CsvResultWriter};
pub use events::{chunk_reader, ByteStream, ChunkReader};
pub use handler::{handle_with, QueryResultHandler};
pub use tuple::BindingTuple;
pub use xml::{boolean_from_reader, parse_boolean, parse_tuples, tuples_from_reader, TupleStream};
