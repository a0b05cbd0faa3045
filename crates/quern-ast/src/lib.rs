//! SQL AST and rendering.
//!
//! Build SQL statements as a typed node tree, then render to a string with
//! automatic parameter numbering and exact, deterministic formatting.
//! Structural invariants are checked when nodes are constructed, so a tree
//! that exists always renders.

mod error;
mod expr;
mod render;
mod stmt;

pub use error::*;
pub use expr::*;
pub use render::*;
pub use stmt::*;

/// Result of rendering SQL.
#[derive(Debug, Clone)]
pub struct RenderedSql {
    /// The SQL string with $1, $2, etc. placeholders.
    pub sql: String,
    /// One entry per placeholder slot: `Some(name)` for a named parameter,
    /// `None` for a positional one.
    pub params: Vec<Option<String>>,
}

/// Quote a SQL identifier (table or column name).
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Escape a string literal for SQL.
pub fn escape_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
