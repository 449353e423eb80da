//! Incremental XML event source over a chunked body
//!
//! Bytes arrive as a stream of chunks; quick-xml's async reader pulls from a
//! buffered adapter over that stream, so a tag split across chunks simply
//! waits for the next chunk instead of failing.

use crate::error::{SparqlError, SparqlResult};
use bytes::Bytes;
use futures::stream::BoxStream;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io;
use tokio::io::{AsyncBufRead, BufReader};
use tokio_util::io::StreamReader;

/// Body of an HTTP response, one chunk at a time
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// Buffered reader over a chunk stream
pub type ChunkReader = BufReader<StreamReader<ByteStream, Bytes>>;

/// Adapt a chunk stream for the tokenizer, reading at most
/// `read_buffer_size` bytes at a time
pub fn chunk_reader(chunks: ByteStream, read_buffer_size: usize) -> ChunkReader {
    BufReader::with_capacity(read_buffer_size.max(1), StreamReader::new(chunks))
}

/// Owned structural event
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum XmlEvent {
    /// Opening tag. Empty elements are reported as a start followed by an end.
    Start {
        name: String,
        /// Attributes keyed by qualified name (`xml:lang`, `datatype`, ...)
        attrs: Vec<(String, String)>,
    },
    End {
        name: String,
    },
    /// Text or CDATA content, unescaped
    Text(String),
    Eof,
}

pub(crate) struct XmlEventSource<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> XmlEventSource<R> {
    pub(crate) fn new(input: R) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().expand_empty_elements = true;
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    /// Byte offset of the tokenizer in the document
    pub(crate) fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    /// Next structural event. Declarations, comments and processing
    /// instructions are skipped.
    pub(crate) async fn next_event(&mut self) -> SparqlResult<XmlEvent> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into_async(&mut self.buf).await {
                Ok(event) => event,
                Err(e) => {
                    let position = self.reader.error_position() as u64;
                    return Err(SparqlError::parse(e.to_string(), position));
                }
            };

            let position = self.reader.buffer_position() as u64;
            let owned = match event {
                Event::Start(start) => {
                    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                    let mut attrs = Vec::new();
                    for attr in start.attributes() {
                        let attr = attr.map_err(|e| SparqlError::parse(e.to_string(), position))?;
                        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                        let value = attr
                            .unescape_value()
                            .map_err(|e| SparqlError::parse(e.to_string(), position))?
                            .into_owned();
                        attrs.push((key, value));
                    }
                    XmlEvent::Start { name, attrs }
                }
                Event::End(end) => XmlEvent::End {
                    name: String::from_utf8_lossy(end.local_name().as_ref()).into_owned(),
                },
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| SparqlError::parse(e.to_string(), position))?;
                    XmlEvent::Text(text.into_owned())
                }
                Event::CData(cdata) => {
                    let text = String::from_utf8(cdata.into_inner().into_owned())
                        .map_err(|e| SparqlError::parse(e.to_string(), position))?;
                    XmlEvent::Text(text)
                }
                Event::Eof => XmlEvent::Eof,
                _ => continue,
            };
            return Ok(owned);
        }
    }
}
