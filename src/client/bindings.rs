use crate::error::{SparqlError, SparqlResult};
use crate::rdf::RdfValue;
use indexmap::IndexMap;
use regex::{NoExpand, Regex};

/// Values pre-bound to query variables
///
/// Applied by rewriting the query text: each `?name` / `$name` occurrence
/// is replaced with the value in SPARQL syntax.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBindings {
    values: IndexMap<String, RdfValue>,
}

impl QueryBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn bind(mut self, name: &str, value: impl Into<RdfValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind `name` (without `?`), replacing any previous value
    pub fn insert(&mut self, name: &str, value: impl Into<RdfValue>) {
        let name = name.trim_start_matches(['?', '$']);
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&RdfValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Query text with every bound variable substituted
    pub fn apply(&self, query: &str) -> SparqlResult<String> {
        let mut rewritten = query.to_string();
        for (name, value) in &self.values {
            let pattern = Regex::new(&format!(r"[?$]{}\b", regex::escape(name)))
                .map_err(|e| SparqlError::InvalidBinding(format!("{}: {}", name, e)))?;
            let replacement = value.to_string();
            rewritten = pattern
                .replace_all(&rewritten, NoExpand(&replacement))
                .into_owned();
        }
        Ok(rewritten)
    }
}
