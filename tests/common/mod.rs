//! In-process SPARQL endpoint for integration tests
//!
//! Datasets served under `http://127.0.0.1:<port>/<dataset>`:
//! - `test`: fixture tuple result, boolean result for ASK queries
//! - `error`: 400 with a structured JSON error body
//! - `error-no-json`: 500 with a plain body
//! - `store`: a tiny triple store that understands the update commands and
//!   remote transaction calls the client sends

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use sparql_pipe::{ClientConfig, SparqlClient, TransactionKind};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const RESULTS_XML: &str = include_str!("../fixtures/results.xml");
pub const BOOLEAN_XML: &str = include_str!("../fixtures/boolean.xml");
pub const ERROR_JSON: &str = include_str!("../fixtures/error.json");

pub const TEST_QUERY: &str = "SELECT ?a ?b ?c WHERE { ?a ?b ?c }";

/// Triple as written on the wire: subject, predicate, object
pub type Triple = (String, String, String);

#[derive(Default)]
pub struct StoreState {
    pub triples: BTreeSet<Triple>,
    /// Open remote transactions: token -> staged `(insert, triple)` changes
    /// in arrival order
    pub transactions: HashMap<String, Vec<(bool, Triple)>>,
    /// `METHOD path?query` of every request
    pub requests: Vec<String>,
    next_token: u32,
}

pub struct MockServer {
    pub port: u16,
    pub state: Arc<Mutex<StoreState>>,
}

impl MockServer {
    pub async fn start() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();

        let state = Arc::new(Mutex::new(StoreState::default()));
        let app = Router::new().fallback(dispatch).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { port, state }
    }

    pub fn config(&self, dataset: &str) -> ClientConfig {
        ClientConfig::new("http://127.0.0.1", self.port, dataset)
    }

    pub fn client(&self, dataset: &str, kind: TransactionKind) -> SparqlClient {
        SparqlClient::new(self.config(dataset).with_transaction_kind(kind))
    }

    pub fn triple_count(&self) -> usize {
        self.state.lock().unwrap().triples.len()
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn open_transactions(&self) -> usize {
        self.state.lock().unwrap().transactions.len()
    }
}

async fn dispatch(
    State(state): State<Arc<Mutex<StoreState>>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let body = String::from_utf8_lossy(&body).into_owned();
    let path = uri.path().trim_start_matches('/').to_string();
    let mut state = state.lock().unwrap();
    state.requests.push(match uri.query() {
        Some(query) => format!("{} /{}?{}", method, path, query),
        None => format!("{} /{}", method, path),
    });

    let segments: Vec<&str> = path.split('/').collect();
    match (method, segments.as_slice()) {
        (_, ["test", "query"]) => {
            let query = form_field(&body, "query").unwrap_or_default();
            if query.trim_start().starts_with("ASK") {
                xml(BOOLEAN_XML.to_string())
            } else {
                xml(RESULTS_XML.to_string())
            }
        }
        (_, ["test", "size"]) => "10".into_response(),
        (_, ["error", _]) => (StatusCode::BAD_REQUEST, ERROR_JSON).into_response(),
        (_, ["error-no-json", _]) => (StatusCode::INTERNAL_SERVER_ERROR, "bla").into_response(),
        (Method::POST, ["store", "query"]) => xml(render_store(&state.triples)),
        (Method::POST, ["store", "update"]) => match form_field(&body, "update") {
            Some(update) => {
                apply_update(&mut state.triples, &update);
                StatusCode::OK.into_response()
            }
            None => (StatusCode::BAD_REQUEST, "missing update").into_response(),
        },
        (Method::POST, ["store", "transaction", "begin"]) => {
            state.next_token += 1;
            let token = format!("00000000-0000-4000-8000-{:012}", state.next_token);
            state.transactions.insert(token.clone(), Vec::new());
            token.into_response()
        }
        (Method::POST, ["store", "transaction", action, token]) => {
            let Some(changes) = state.transactions.remove(*token) else {
                return (StatusCode::NOT_FOUND, "unknown transaction").into_response();
            };
            if *action == "commit" {
                for (insert, triple) in changes {
                    if insert {
                        state.triples.insert(triple);
                    } else {
                        state.triples.remove(&triple);
                    }
                }
            }
            StatusCode::OK.into_response()
        }
        (Method::POST, ["store", token, action]) => {
            let insert = match *action {
                "add" => true,
                "remove" => false,
                _ => return StatusCode::NOT_FOUND.into_response(),
            };
            let Some(pending) = state.transactions.get_mut(*token) else {
                return (StatusCode::NOT_FOUND, "unknown transaction").into_response();
            };
            pending.extend(parse_triples(&body).into_iter().map(|triple| (insert, triple)));
            StatusCode::OK.into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn xml(body: String) -> Response {
    ([("content-type", "application/sparql-results+xml")], body).into_response()
}

fn form_field(body: &str, name: &str) -> Option<String> {
    body.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| percent_decode(value))
    })
}

fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap();
                out.push(u8::from_str_radix(hex, 16).unwrap());
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).unwrap()
}

/// Triples of every `s p o .` line
fn parse_triples(text: &str) -> Vec<Triple> {
    text.lines().filter_map(parse_triple_line).collect()
}

fn parse_triple_line(line: &str) -> Option<Triple> {
    let line = line.trim().strip_suffix('.')?.trim_end();
    let mut parts = line.splitn(3, ' ');
    let subject = parts.next()?;
    let predicate = parts.next()?;
    let object = parts.next()?;
    Some((subject.to_string(), predicate.to_string(), object.to_string()))
}

fn apply_update(triples: &mut BTreeSet<Triple>, update: &str) {
    let mut inserting = true;
    for line in update.lines() {
        let line = line.trim();
        if line.contains("CLEAR ALL") {
            triples.clear();
        }
        if line.ends_with("INSERT DATA") {
            inserting = true;
        } else if line.ends_with("DELETE DATA") {
            inserting = false;
        } else if let Some(triple) = parse_triple_line(line) {
            if inserting {
                triples.insert(triple);
            } else {
                triples.remove(&triple);
            }
        }
    }
}

fn render_term(term: &str) -> String {
    if let Some(iri) = term.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return format!("<uri>{}</uri>", iri);
    }
    if let Some(id) = term.strip_prefix("_:") {
        return format!("<bnode>{}</bnode>", id);
    }
    let end = term.rfind('"').unwrap_or(term.len());
    let label = term.get(1..end).unwrap_or_default();
    let suffix = term.get(end + 1..).unwrap_or_default();
    let label = label.replace('&', "&amp;").replace('<', "&lt;");
    if let Some(lang) = suffix.strip_prefix('@') {
        format!("<literal xml:lang=\"{}\">{}</literal>", lang, label)
    } else if let Some(datatype) = suffix.strip_prefix("^^<").and_then(|d| d.strip_suffix('>')) {
        format!("<literal datatype=\"{}\">{}</literal>", datatype, label)
    } else {
        format!("<literal>{}</literal>", label)
    }
}

fn render_store(triples: &BTreeSet<Triple>) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\"?>\n<sparql xmlns=\"http://www.w3.org/2005/sparql-results#\">\
         <head><variable name=\"s\"/><variable name=\"p\"/><variable name=\"o\"/></head><results>\n",
    );
    for (s, p, o) in triples {
        out.push_str(&format!(
            "<result><binding name=\"s\">{}</binding><binding name=\"p\">{}</binding>\
             <binding name=\"o\">{}</binding></result>\n",
            render_term(s),
            render_term(p),
            render_term(o)
        ));
    }
    out.push_str("</results></sparql>\n");
    out
}
