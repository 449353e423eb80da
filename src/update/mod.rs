//! SPARQL Update command text
//!
//! Renders statements as `INSERT DATA` / `DELETE DATA` commands, builds
//! `CLEAR` commands and the N-Triples bodies used by server-side
//! transactions.

mod command;

pub use command::{
    append_modify_command, build_clear, build_delete, build_insert, render_statements,
    to_ntriples, ModifyCommand,
};
