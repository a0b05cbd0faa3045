//! UPDATE builder.

use std::sync::Arc;

use quern_ast::{Assignment, ColumnRef, Expr, TableRef, UpdateStmt};

use crate::error::BuildError;
use crate::expr::{expr_list, IntoExpr, IntoTableRef};

/// Start an UPDATE statement targeting `table`.
pub fn update(table: impl IntoTableRef) -> UpdateBuilder {
    UpdateBuilder {
        table: table.into_table_ref(),
        assignments: Vec::new(),
        where_: None,
        returning: Vec::new(),
        err: None,
    }
}

/// Requires at least one `set()` before `build()`.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: Result<Arc<TableRef>, BuildError>,
    assignments: Vec<Assignment>,
    where_: Option<Expr>,
    returning: Vec<Expr>,
    err: Option<BuildError>,
}

impl UpdateBuilder {
    fn record<T>(&mut self, result: Result<T, BuildError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                if self.err.is_none() {
                    self.err = Some(err);
                }
                None
            }
        }
    }

    /// Add one `column = value` assignment.
    pub fn set(mut self, column: impl Into<String>, value: impl IntoExpr) -> Self {
        let assignment = ColumnRef::new(column)
            .map_err(BuildError::from)
            .and_then(|column| Ok(Assignment::new(column, value.into_expr()?)));
        if let Some(assignment) = self.record(assignment) {
            self.assignments.push(assignment);
        }
        self
    }

    pub fn where_(mut self, condition: impl IntoExpr) -> Self {
        let condition = condition.into_expr();
        if let Some(condition) = self.record(condition) {
            self.where_ = Some(condition);
        }
        self
    }

    pub fn returning(mut self, exprs: impl IntoIterator<Item = impl IntoExpr>) -> Self {
        let exprs = expr_list(exprs);
        if let Some(exprs) = self.record(exprs) {
            self.returning.extend(exprs);
        }
        self
    }

    pub fn build(self) -> Result<UpdateStmt, BuildError> {
        if let Some(err) = self.err {
            return Err(err);
        }
        let mut stmt = UpdateStmt::new(self.table?, self.assignments)?;
        if let Some(condition) = self.where_ {
            stmt = stmt.where_(condition);
        }
        Ok(stmt.returning(self.returning))
    }
}
