//! HTTP transport and response classification

pub mod classify;
pub mod transport;

pub use classify::{classify, ensure_success, error_for, success_text};
pub use transport::{
    encode_form, HttpResponse, HttpTransport, ReqwestTransport, N_TRIPLES, SPARQL_RESULTS_XML,
};

#[cfg(test)]
pub(crate) mod mock;
