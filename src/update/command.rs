use crate::error::{SparqlError, SparqlResult};
use crate::rdf::{Resource, Statement};

/// Data modification verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyCommand {
    Insert,
    Delete,
}

impl ModifyCommand {
    fn keyword(self) -> &'static str {
        match self {
            ModifyCommand::Insert => "INSERT DATA",
            ModifyCommand::Delete => "DELETE DATA",
        }
    }
}

/// Graph IRI for a context; blank nodes are skolemized
fn graph_name(context: &Resource) -> String {
    match context {
        Resource::NamedNode(node) => node.as_str().to_string(),
        Resource::BlankNode(node) => node.skolem_iri(),
    }
}

/// Render the triple body of a data command
///
/// With `ignore_context` unset, a statement carrying its own context is
/// wrapped in its own `GRAPH` block.
pub fn render_statements(statements: &[Statement], ignore_context: bool, out: &mut String) {
    for statement in statements {
        let context = statement.context.as_ref().filter(|_| !ignore_context);
        if let Some(context) = context {
            out.push_str(&format!("    GRAPH <{}> {{ \n", graph_name(context)));
        }
        out.push_str(&format!(
            "{} {} {} . \n",
            statement.subject, statement.predicate, statement.object
        ));
        if context.is_some() {
            out.push_str("    }\n");
        }
    }
}

/// Append an `INSERT DATA` or `DELETE DATA` command to `out`
///
/// One `GRAPH` block is written per entry of `contexts`, each wrapping the
/// whole body; a `None` entry writes the body into the default graph.
pub fn append_modify_command(
    statements: &[Statement],
    contexts: &[Option<Resource>],
    command: ModifyCommand,
    out: &mut String,
) {
    out.push_str(command.keyword());
    out.push_str(" \n{ \n");
    if contexts.is_empty() {
        render_statements(statements, false, out);
    } else {
        for context in contexts {
            match context {
                Some(context) => {
                    out.push_str(&format!("    GRAPH <{}> {{ \n", graph_name(context)));
                    render_statements(statements, true, out);
                    out.push_str(" } \n");
                }
                None => render_statements(statements, true, out),
            }
        }
    }
    out.push('}');
}

pub fn build_insert(statements: &[Statement], contexts: &[Option<Resource>]) -> String {
    let mut out = String::new();
    append_modify_command(statements, contexts, ModifyCommand::Insert, &mut out);
    out
}

pub fn build_delete(statements: &[Statement], contexts: &[Option<Resource>]) -> String {
    let mut out = String::new();
    append_modify_command(statements, contexts, ModifyCommand::Delete, &mut out);
    out
}

/// Build a `CLEAR` command; `None` clears the default graph
///
/// Fails when a context is a blank node, which SPARQL cannot name.
pub fn build_clear(contexts: &[Option<Resource>]) -> SparqlResult<String> {
    if contexts.is_empty() {
        return Ok("CLEAR ALL".to_string());
    }
    let mut out = String::new();
    for context in contexts {
        match context {
            None => out.push_str("CLEAR ALL DEFAULT; "),
            Some(Resource::NamedNode(node)) => {
                out.push_str(&format!("CLEAR ALL GRAPH <{}>; ", node.as_str()));
            }
            Some(Resource::BlankNode(node)) => {
                return Err(SparqlError::InvalidContext(format!(
                    "named graph {} is a blank node",
                    node
                )))
            }
        }
    }
    Ok(out)
}

/// N-Triples document for the statements, contexts dropped
pub fn to_ntriples(statements: &[Statement]) -> String {
    let mut out = String::new();
    for statement in statements {
        out.push_str(&format!("{}\n", statement));
    }
    out
}
