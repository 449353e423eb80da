//! SPARQL Results XML parser
//!
//! Turns a chunked result document into a lazy stream of [`BindingTuple`]s,
//! or into a single boolean for ASK queries. Parsing is pull driven: nothing
//! is read from the body until the consumer polls, and dropping the stream
//! stops the parse.

use super::events::{chunk_reader, ByteStream, XmlEvent, XmlEventSource};
use super::tuple::BindingTuple;
use crate::error::{SparqlError, SparqlResult};
use crate::rdf::{BlankNode, Literal, NamedNode, RdfValue};
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::AsyncBufRead;
use tracing::debug;

/// Lazy sequence of solutions; ends after the first error
pub type TupleStream = BoxStream<'static, SparqlResult<BindingTuple>>;

const VARIABLE: &str = "variable";
const RESULT: &str = "result";
const BINDING: &str = "binding";
const URI: &str = "uri";
const BNODE: &str = "bnode";
const LITERAL: &str = "literal";
const UNBOUND: &str = "unbound";
const BOOLEAN: &str = "boolean";
const HEAD: &str = "head";
const NAME_ATTR: &str = "name";
const LANG_ATTR: &str = "xml:lang";
const DATATYPE_ATTR: &str = "datatype";

fn is_value_tag(name: &str) -> bool {
    matches!(name, URI | BNODE | LITERAL | BOOLEAN)
}

/// Mutable state of one parse
#[derive(Default)]
struct ParseState {
    /// Variables declared so far, until the header is frozen
    header: Vec<String>,
    frozen: Option<Arc<[String]>>,
    tuple: Option<HashMap<String, RdfValue>>,
    binding: Option<String>,
    /// `Some(None)` once `<unbound/>` was seen in the current binding
    value: Option<Option<RdfValue>>,
    text: String,
    attrs: Vec<(String, String)>,
    open: Vec<String>,
}

impl ParseState {
    fn shared_header(&mut self) -> Arc<[String]> {
        let header = &self.header;
        self.frozen
            .get_or_insert_with(|| Arc::from(header.as_slice()))
            .clone()
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn take_literal(&mut self) -> Literal {
        let label = std::mem::take(&mut self.text);
        if let Some(lang) = self.attr(LANG_ATTR) {
            Literal::new_language_tagged_literal(label, lang)
        } else if let Some(datatype) = self.attr(DATATYPE_ATTR) {
            Literal::new_typed_literal(label, NamedNode::new(datatype))
        } else {
            Literal::new_simple_literal(label)
        }
    }

    /// Record a start tag; only value tags keep their attributes
    fn open_tag(&mut self, name: &str, attrs: Vec<(String, String)>) {
        self.open.push(name.to_string());
        self.text.clear();
        if is_value_tag(name) {
            self.attrs = attrs;
        }
    }

    /// Pop the open-tag stack, checking the end tag against it
    fn close_tag(&mut self, name: &str, position: u64) -> SparqlResult<()> {
        match self.open.pop() {
            Some(open) if open == name => Ok(()),
            Some(open) => Err(SparqlError::parse(
                format!("expected </{}>, found </{}>", open, name),
                position,
            )),
            None => Err(SparqlError::parse(format!("unexpected </{}>", name), position)),
        }
    }

    fn push_text(&mut self, text: &str) {
        let in_value = self.open.last().is_some_and(|tag| is_value_tag(tag));
        if in_value || !text.trim().is_empty() {
            self.text.push_str(text);
        }
    }

    fn check_closed(&self, position: u64) -> SparqlResult<()> {
        match self.open.last() {
            Some(tag) => Err(SparqlError::parse(format!("unclosed <{}>", tag), position)),
            None => Ok(()),
        }
    }
}

fn required_attr(attrs: &[(String, String)], key: &str, tag: &str, position: u64) -> SparqlResult<String> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .ok_or_else(|| SparqlError::parse(format!("<{}> without {} attribute", tag, key), position))
}

struct TupleParser<R> {
    events: XmlEventSource<R>,
    state: ParseState,
}

impl<R: AsyncBufRead + Unpin> TupleParser<R> {
    fn new(input: R) -> Self {
        Self {
            events: XmlEventSource::new(input),
            state: ParseState::default(),
        }
    }

    /// Advance to the next completed `<result>`
    async fn next_tuple(&mut self) -> SparqlResult<Option<BindingTuple>> {
        loop {
            let event = self.events.next_event().await?;
            let position = self.events.position();
            let state = &mut self.state;

            match event {
                XmlEvent::Start { name, attrs } => {
                    match name.as_str() {
                        VARIABLE if state.frozen.is_none() => {
                            let variable = required_attr(&attrs, NAME_ATTR, VARIABLE, position)?;
                            state.header.push(variable);
                        }
                        RESULT => {
                            if state.tuple.is_some() {
                                return Err(SparqlError::parse("nested <result>", position));
                            }
                            let width = state.shared_header().len();
                            state.tuple = Some(HashMap::with_capacity(width));
                        }
                        BINDING => {
                            if state.tuple.is_none() {
                                return Err(SparqlError::parse("<binding> outside <result>", position));
                            }
                            state.binding = Some(required_attr(&attrs, NAME_ATTR, BINDING, position)?);
                            state.value = None;
                        }
                        UNBOUND => state.value = Some(None),
                        _ => {}
                    }
                    state.open_tag(&name, attrs);
                }
                XmlEvent::Text(text) => state.push_text(&text),
                XmlEvent::End { name } => {
                    state.close_tag(&name, position)?;
                    match name.as_str() {
                        HEAD => {
                            state.shared_header();
                        }
                        URI => {
                            let iri = std::mem::take(&mut state.text);
                            state.value = Some(Some(RdfValue::NamedNode(NamedNode::new(iri))));
                        }
                        BNODE => {
                            let id = std::mem::take(&mut state.text);
                            state.value = Some(Some(RdfValue::BlankNode(BlankNode::new(id))));
                        }
                        LITERAL => {
                            let literal = state.take_literal();
                            state.value = Some(Some(RdfValue::Literal(literal)));
                        }
                        BINDING => {
                            let variable = state.binding.take().unwrap_or_default();
                            match state.value.take() {
                                None => {
                                    return Err(SparqlError::parse(
                                        format!("binding {} has no value", variable),
                                        position,
                                    ))
                                }
                                Some(None) => {}
                                Some(Some(value)) => {
                                    if let Some(tuple) = state.tuple.as_mut() {
                                        tuple.insert(variable, value);
                                    }
                                }
                            }
                        }
                        RESULT => {
                            let values = state.tuple.take().unwrap_or_default();
                            let header = state.shared_header();
                            state.text.clear();
                            return Ok(Some(BindingTuple::new(header, values)));
                        }
                        _ => {}
                    }
                    state.text.clear();
                }
                XmlEvent::Eof => {
                    state.check_closed(position)?;
                    return Ok(None);
                }
            }
        }
    }
}

/// Parse a tuple result from any buffered reader
pub fn tuples_from_reader<R>(input: R) -> TupleStream
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let parser = TupleParser::new(input);
    stream::try_unfold(parser, |mut parser| async move {
        let next = parser.next_tuple().await?;
        if next.is_none() {
            debug!(variables = parser.state.header.len(), "Tuple result complete");
        }
        Ok(next.map(|tuple| (tuple, parser)))
    })
    .boxed()
}

/// Parse a chunked SPARQL Results XML body into a lazy tuple stream
pub fn parse_tuples(chunks: ByteStream, read_buffer_size: usize) -> TupleStream {
    tuples_from_reader(chunk_reader(chunks, read_buffer_size))
}

/// Parse a boolean result from any buffered reader, returning as soon as
/// `</boolean>` is read
pub async fn boolean_from_reader<R>(input: R) -> SparqlResult<bool>
where
    R: AsyncBufRead + Unpin,
{
    let mut events = XmlEventSource::new(input);
    let mut state = ParseState::default();

    loop {
        let event = events.next_event().await?;
        let position = events.position();
        match event {
            XmlEvent::Start { name, attrs } => state.open_tag(&name, attrs),
            XmlEvent::Text(text) => state.push_text(&text),
            XmlEvent::End { name } => {
                state.close_tag(&name, position)?;
                if name == BOOLEAN {
                    return match state.text.trim() {
                        "true" | "1" => Ok(true),
                        "false" | "0" => Ok(false),
                        other => Err(SparqlError::parse(
                            format!("invalid boolean value {:?}", other),
                            position,
                        )),
                    };
                }
                state.text.clear();
            }
            XmlEvent::Eof => {
                state.check_closed(position)?;
                return Err(SparqlError::Protocol("boolean response missing".to_string()));
            }
        }
    }
}

/// Parse a chunked SPARQL Results XML body holding a boolean
pub async fn parse_boolean(chunks: ByteStream, read_buffer_size: usize) -> SparqlResult<bool> {
    boolean_from_reader(chunk_reader(chunks, read_buffer_size)).await
}
