use crate::rdf::RdfValue;
use std::collections::HashMap;
use std::sync::Arc;

/// One solution of a tuple query
///
/// The header lists the variables declared by the result document, in
/// document order. All tuples of one result share the same header
/// allocation. A variable without a value is unbound.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingTuple {
    header: Arc<[String]>,
    values: HashMap<String, RdfValue>,
}

impl BindingTuple {
    pub fn new(header: Arc<[String]>, values: HashMap<String, RdfValue>) -> Self {
        Self { header, values }
    }

    pub fn header(&self) -> &Arc<[String]> {
        &self.header
    }

    /// Value bound to `variable`, if any
    pub fn get(&self, variable: &str) -> Option<&RdfValue> {
        self.values.get(variable)
    }

    pub fn is_bound(&self, variable: &str) -> bool {
        self.values.contains_key(variable)
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in header order, `None` for unbound columns
    pub fn columns(&self) -> impl Iterator<Item = (&str, Option<&RdfValue>)> + '_ {
        self.header
            .iter()
            .map(move |name| (name.as_str(), self.values.get(name)))
    }

    pub fn into_values(self) -> HashMap<String, RdfValue> {
        self.values
    }
}
