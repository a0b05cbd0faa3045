//! Fluent SQL query builder on top of [`quern_ast`].
//!
//! Builders accumulate state through method chains and construct a validated
//! node tree on the terminal `build()` call; every structural violation is
//! reported there as a [`BuildError`], so chains stay infix all the way down.
//!
//! # Example
//!
//! ```
//! # fn main() -> Result<(), quern::BuildError> {
//! use quern::{col, render, select, table};
//!
//! let users = table("users").build()?;
//! let stmt = select()
//!     .columns([col("id"), col("name")])
//!     .from(&users)
//!     .where_(col("active").eq(true).and(col("deleted_at").is_null()))
//!     .build()?;
//!
//! let result = render(&stmt);
//! assert_eq!(
//!     result.sql,
//!     r#"SELECT "id", "name" FROM "users" WHERE "active" = TRUE AND "deleted_at" IS NULL"#,
//! );
//! # Ok(())
//! # }
//! ```

mod delete;
mod error;
mod expr;
mod insert;
mod select;
mod update;

pub use delete::*;
pub use error::*;
pub use expr::*;
pub use insert::*;
pub use select::*;
pub use update::*;

pub use quern_ast as ast;
pub use quern_ast::{JoinKind, RenderedSql, SqlGenerator, Stmt, render};
