//! CSV rendering of tuple results
//!
//! Output matches rdf4j's `SPARQLResultsCSVWriter`: CRLF line endings, a
//! header row written when the first tuple arrives, numeric literals in
//! canonical form and RFC 4180 quoting for labels. IRIs are only quoted when
//! they contain a comma and blank nodes are never quoted, which no general
//! purpose CSV writer reproduces.

use super::tuple::BindingTuple;
use super::xml::TupleStream;
use crate::error::SparqlResult;
use crate::rdf::{xsd, Literal, RdfValue};
use futures::StreamExt;
use std::io::{self, Write};
use tokio::io::AsyncWrite;
use tracing::debug;

const LINE_SEPARATOR: &[u8] = b"\r\n";
const VALUE_SEPARATOR: &[u8] = b",";
const QUOTE: &[u8] = b"\"";

/// Encode the header row
pub fn encode_header(header: &[String], buf: &mut Vec<u8>) -> io::Result<()> {
    buf.write_all(header.join(",").as_bytes())?;
    buf.write_all(LINE_SEPARATOR)
}

/// Encode one row, one field per header column
pub fn encode_tuple(tuple: &BindingTuple, buf: &mut Vec<u8>) -> io::Result<()> {
    for (i, (_, value)) in tuple.columns().enumerate() {
        if i > 0 {
            buf.write_all(VALUE_SEPARATOR)?;
        }
        if let Some(value) = value {
            encode_value(value, buf)?;
        }
    }
    buf.write_all(LINE_SEPARATOR)
}

/// Encode a single field
pub fn encode_value(value: &RdfValue, buf: &mut Vec<u8>) -> io::Result<()> {
    match value {
        RdfValue::NamedNode(iri) => {
            let iri = iri.as_str();
            if iri.contains(',') {
                write!(buf, "\"{}\"", iri)
            } else {
                buf.write_all(iri.as_bytes())
            }
        }
        RdfValue::BlankNode(node) => write!(buf, "_:{}", node.as_str()),
        RdfValue::Literal(literal) => encode_literal(literal, buf),
    }
}

fn encode_literal(literal: &Literal, buf: &mut Vec<u8>) -> io::Result<()> {
    // Invalid numeric labels are written like any other label.
    if let Some(normalized) = xsd::normalize_numeric(literal.label(), literal.datatype()) {
        return buf.write_all(normalized.as_bytes());
    }

    let label = literal.label();
    if label.contains([',', '\r', '\n', '"']) {
        buf.write_all(QUOTE)?;
        buf.write_all(label.replace('"', "\"\"").as_bytes())?;
        buf.write_all(QUOTE)
    } else {
        buf.write_all(label.as_bytes())
    }
}

/// Stateful row encoder that emits the header before the first row
#[derive(Debug, Default)]
pub struct CsvResultWriter {
    header_written: bool,
    rows: u64,
}

impl CsvResultWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a tuple, preceded by the header row if it is the first
    pub fn encode(&mut self, tuple: &BindingTuple, buf: &mut Vec<u8>) -> io::Result<()> {
        if !self.header_written {
            encode_header(tuple.header(), buf)?;
            self.header_written = true;
        }
        self.rows += 1;
        encode_tuple(tuple, buf)
    }

    /// Rows encoded so far
    pub fn rows(&self) -> u64 {
        self.rows
    }
}

/// Drain a tuple stream into `sink` as CSV, returning the number of rows
///
/// An empty result writes nothing. Rows already written stay in the sink
/// when the stream fails part way.
pub async fn write_csv<W>(mut tuples: TupleStream, sink: &mut W) -> SparqlResult<u64>
where
    W: AsyncWrite + Unpin,
{
    use tokio::io::AsyncWriteExt;

    let mut writer = CsvResultWriter::new();
    let mut buf = Vec::with_capacity(1024);

    while let Some(tuple) = tuples.next().await {
        let tuple = tuple?;
        buf.clear();
        writer.encode(&tuple, &mut buf)?;
        sink.write_all(&buf).await?;
    }
    sink.flush().await?;

    debug!(rows = writer.rows(), "CSV export complete");
    Ok(writer.rows())
}
