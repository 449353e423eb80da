//! RDF type definitions
//!
//! Plain value types for the terms that travel through the protocol pipeline.
//! They carry no dependency on a particular RDF library; conversions to and
//! from oxrdf live at the bottom of this module.

use crate::rdf::xsd;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use oxrdf::{
    BlankNode as OxBlankNode, GraphName as OxGraphName, Literal as OxLiteral,
    NamedNode as OxNamedNode, Quad as OxQuad, Subject as OxSubject, Term as OxTerm,
};
use std::fmt;
use thiserror::Error;

/// RDF errors
#[derive(Error, Debug)]
pub enum RdfError {
    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Invalid blank node
    #[error("Invalid blank node: {0}")]
    InvalidBlankNode(String),

    /// Invalid literal
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),

    /// Term kind that has no counterpart here (e.g. quoted triples)
    #[error("Unsupported term: {0}")]
    UnsupportedTerm(String),
}

pub type RdfResult<T> = Result<T, RdfError>;

/// Named node (IRI)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedNode(String);

impl NamedNode {
    /// Create a named node. The IRI is taken verbatim; validation happens
    /// when converting into oxrdf.
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Get the IRI string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Blank node (anonymous node)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankNode(String);

impl BlankNode {
    /// Create a blank node from its document-scoped identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the blank node identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// IRI used where SPARQL does not accept blank nodes (named graphs)
    pub fn skolem_iri(&self) -> String {
        format!("urn:nodeid:{}", self.0)
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// Annotation of a literal: a language tag, an explicit datatype, or neither
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LiteralTag {
    /// Plain literal, implicitly `xsd:string`
    Plain,
    /// Language-tagged literal
    Language(String),
    /// Literal with an explicit datatype other than `xsd:string`
    Datatype(NamedNode),
}

/// RDF literal value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    label: String,
    tag: LiteralTag,
}

impl Literal {
    /// Create a simple literal (plain string)
    pub fn new_simple_literal(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tag: LiteralTag::Plain,
        }
    }

    /// Create a literal with language tag
    pub fn new_language_tagged_literal(label: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tag: LiteralTag::Language(language.into()),
        }
    }

    /// Create a typed literal. `xsd:string` collapses to a plain literal.
    pub fn new_typed_literal(label: impl Into<String>, datatype: NamedNode) -> Self {
        let tag = if datatype.as_str() == xsd::STRING {
            LiteralTag::Plain
        } else {
            LiteralTag::Datatype(datatype)
        };
        Self {
            label: label.into(),
            tag,
        }
    }

    /// Get the lexical value
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the language tag if present
    pub fn language(&self) -> Option<&str> {
        match &self.tag {
            LiteralTag::Language(lang) => Some(lang),
            _ => None,
        }
    }

    /// Get the annotation
    pub fn tag(&self) -> &LiteralTag {
        &self.tag
    }

    /// Datatype IRI, including the implicit ones of plain and
    /// language-tagged literals
    pub fn datatype(&self) -> &str {
        match &self.tag {
            LiteralTag::Plain => xsd::STRING,
            LiteralTag::Language(_) => xsd::LANG_STRING,
            LiteralTag::Datatype(dt) => dt.as_str(),
        }
    }

    /// Integer value of the label
    pub fn as_i64(&self) -> RdfResult<i64> {
        self.label
            .trim()
            .trim_start_matches('+')
            .parse()
            .map_err(|_| self.coercion_error("integer"))
    }

    /// Floating point value of the label (`INF`, `-INF`, `NaN` included)
    pub fn as_f64(&self) -> RdfResult<f64> {
        match self.label.trim() {
            "INF" | "+INF" => Ok(f64::INFINITY),
            "-INF" => Ok(f64::NEG_INFINITY),
            "NaN" => Ok(f64::NAN),
            other => other.parse().map_err(|_| self.coercion_error("double")),
        }
    }

    /// Boolean value of the label
    pub fn as_bool(&self) -> RdfResult<bool> {
        match self.label.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(self.coercion_error("boolean")),
        }
    }

    /// `xsd:dateTime` value of the label; a missing timezone is read as UTC
    pub fn as_date_time(&self) -> RdfResult<DateTime<FixedOffset>> {
        let label = self.label.trim();
        if let Ok(date_time) = DateTime::parse_from_rfc3339(label) {
            return Ok(date_time);
        }
        NaiveDateTime::parse_from_str(label, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc().fixed_offset())
            .map_err(|_| self.coercion_error("dateTime"))
    }

    fn coercion_error(&self, target: &str) -> RdfError {
        RdfError::InvalidLiteral(format!("{:?} is not a valid {}", self.label, target))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_string(&self.label))?;
        match &self.tag {
            LiteralTag::Language(lang) => write!(f, "@{}", lang),
            _ => write!(f, "^^<{}>", self.datatype()),
        }
    }
}

/// Escape a label with the SPARQL string escapes
pub fn escape_string(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\u{8}' => escaped.push_str("\\b"),
            '\u{c}' => escaped.push_str("\\f"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Resource: a named node or a blank node (statement subjects and graph names)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    /// Named node (IRI)
    NamedNode(NamedNode),
    /// Blank node
    BlankNode(BlankNode),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::NamedNode(n) => write!(f, "{}", n),
            Resource::BlankNode(b) => write!(f, "{}", b),
        }
    }
}

impl From<NamedNode> for Resource {
    fn from(node: NamedNode) -> Self {
        Resource::NamedNode(node)
    }
}

impl From<BlankNode> for Resource {
    fn from(node: BlankNode) -> Self {
        Resource::BlankNode(node)
    }
}

/// Any RDF value that can be bound to a query variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RdfValue {
    /// Named node (IRI)
    NamedNode(NamedNode),
    /// Blank node
    BlankNode(BlankNode),
    /// Literal value
    Literal(Literal),
}

impl RdfValue {
    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, RdfValue::Literal(_))
    }

    /// Get the literal, if this is one
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            RdfValue::Literal(l) => Some(l),
            _ => None,
        }
    }
}

impl fmt::Display for RdfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfValue::NamedNode(n) => write!(f, "{}", n),
            RdfValue::BlankNode(b) => write!(f, "{}", b),
            RdfValue::Literal(l) => write!(f, "{}", l),
        }
    }
}

impl From<NamedNode> for RdfValue {
    fn from(node: NamedNode) -> Self {
        RdfValue::NamedNode(node)
    }
}

impl From<BlankNode> for RdfValue {
    fn from(node: BlankNode) -> Self {
        RdfValue::BlankNode(node)
    }
}

impl From<Literal> for RdfValue {
    fn from(lit: Literal) -> Self {
        RdfValue::Literal(lit)
    }
}

impl From<Resource> for RdfValue {
    fn from(resource: Resource) -> Self {
        match resource {
            Resource::NamedNode(n) => RdfValue::NamedNode(n),
            Resource::BlankNode(b) => RdfValue::BlankNode(b),
        }
    }
}

/// RDF statement: a triple with an optional named-graph context
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    /// Subject
    pub subject: Resource,
    /// Predicate
    pub predicate: NamedNode,
    /// Object
    pub object: RdfValue,
    /// Named graph (None = default graph)
    pub context: Option<Resource>,
}

impl Statement {
    /// Create a statement in the default graph
    pub fn new(subject: impl Into<Resource>, predicate: NamedNode, object: impl Into<RdfValue>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
            context: None,
        }
    }

    /// Place the statement in a named graph
    pub fn in_context(mut self, context: impl Into<Resource>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

// oxrdf interop

impl TryFrom<NamedNode> for OxNamedNode {
    type Error = RdfError;

    fn try_from(node: NamedNode) -> RdfResult<Self> {
        OxNamedNode::new(node.0).map_err(|e| RdfError::InvalidIri(e.to_string()))
    }
}

impl From<OxNamedNode> for NamedNode {
    fn from(node: OxNamedNode) -> Self {
        Self(node.into_string())
    }
}

impl TryFrom<BlankNode> for OxBlankNode {
    type Error = RdfError;

    fn try_from(node: BlankNode) -> RdfResult<Self> {
        OxBlankNode::new(node.0).map_err(|e| RdfError::InvalidBlankNode(e.to_string()))
    }
}

impl From<OxBlankNode> for BlankNode {
    fn from(node: OxBlankNode) -> Self {
        Self(node.as_str().to_string())
    }
}

impl TryFrom<Literal> for OxLiteral {
    type Error = RdfError;

    fn try_from(lit: Literal) -> RdfResult<Self> {
        match lit.tag {
            LiteralTag::Plain => Ok(OxLiteral::new_simple_literal(lit.label)),
            LiteralTag::Language(lang) => OxLiteral::new_language_tagged_literal(lit.label, lang)
                .map_err(|e| RdfError::InvalidLiteral(e.to_string())),
            LiteralTag::Datatype(dt) => Ok(OxLiteral::new_typed_literal(lit.label, OxNamedNode::try_from(dt)?)),
        }
    }
}

impl From<OxLiteral> for Literal {
    fn from(lit: OxLiteral) -> Self {
        if let Some(lang) = lit.language() {
            return Literal::new_language_tagged_literal(lit.value(), lang);
        }
        let datatype = NamedNode::new(lit.datatype().as_str());
        Literal::new_typed_literal(lit.value(), datatype)
    }
}

impl TryFrom<RdfValue> for OxTerm {
    type Error = RdfError;

    fn try_from(value: RdfValue) -> RdfResult<Self> {
        Ok(match value {
            RdfValue::NamedNode(n) => OxTerm::NamedNode(n.try_into()?),
            RdfValue::BlankNode(b) => OxTerm::BlankNode(b.try_into()?),
            RdfValue::Literal(l) => OxTerm::Literal(l.try_into()?),
        })
    }
}

impl TryFrom<OxTerm> for RdfValue {
    type Error = RdfError;

    fn try_from(term: OxTerm) -> RdfResult<Self> {
        match term {
            OxTerm::NamedNode(n) => Ok(RdfValue::NamedNode(n.into())),
            OxTerm::BlankNode(b) => Ok(RdfValue::BlankNode(b.into())),
            OxTerm::Literal(l) => Ok(RdfValue::Literal(l.into())),
            #[allow(unreachable_patterns)]
            other => Err(RdfError::UnsupportedTerm(other.to_string())),
        }
    }
}

impl TryFrom<Resource> for OxSubject {
    type Error = RdfError;

    fn try_from(resource: Resource) -> RdfResult<Self> {
        Ok(match resource {
            Resource::NamedNode(n) => OxSubject::NamedNode(n.try_into()?),
            Resource::BlankNode(b) => OxSubject::BlankNode(b.try_into()?),
        })
    }
}

impl TryFrom<OxSubject> for Resource {
    type Error = RdfError;

    fn try_from(subject: OxSubject) -> RdfResult<Self> {
        match subject {
            OxSubject::NamedNode(n) => Ok(Resource::NamedNode(n.into())),
            OxSubject::BlankNode(b) => Ok(Resource::BlankNode(b.into())),
            #[allow(unreachable_patterns)]
            other => Err(RdfError::UnsupportedTerm(other.to_string())),
        }
    }
}

impl TryFrom<Statement> for OxQuad {
    type Error = RdfError;

    fn try_from(statement: Statement) -> RdfResult<Self> {
        let graph_name = match statement.context {
            None => OxGraphName::DefaultGraph,
            Some(Resource::NamedNode(n)) => OxGraphName::NamedNode(n.try_into()?),
            Some(Resource::BlankNode(b)) => OxGraphName::BlankNode(b.try_into()?),
        };
        Ok(OxQuad::new(
            OxSubject::try_from(statement.subject)?,
            OxNamedNode::try_from(statement.predicate)?,
            OxTerm::try_from(statement.object)?,
            graph_name,
        ))
    }
}

impl TryFrom<OxQuad> for Statement {
    type Error = RdfError;

    fn try_from(quad: OxQuad) -> RdfResult<Self> {
        let context = match quad.graph_name {
            OxGraphName::DefaultGraph => None,
            OxGraphName::NamedNode(n) => Some(Resource::NamedNode(n.into())),
            OxGraphName::BlankNode(b) => Some(Resource::BlankNode(b.into())),
        };
        Ok(Statement {
            subject: quad.subject.try_into()?,
            predicate: quad.predicate.into(),
            object: quad.object.try_into()?,
            context,
        })
    }
}
