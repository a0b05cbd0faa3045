//! DELETE builder.

use std::sync::Arc;

use quern_ast::{DeleteStmt, Expr, TableRef};

use crate::error::BuildError;
use crate::expr::{expr_list, IntoExpr, IntoTableRef};

/// Start a DELETE statement targeting `table`.
pub fn delete_from(table: impl IntoTableRef) -> DeleteBuilder {
    DeleteBuilder {
        table: table.into_table_ref(),
        where_: None,
        returning: Vec::new(),
        err: None,
    }
}

#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    table: Result<Arc<TableRef>, BuildError>,
    where_: Option<Expr>,
    returning: Vec<Expr>,
    err: Option<BuildError>,
}

impl DeleteBuilder {
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

    pub fn build(self) -> Result<DeleteStmt, BuildError> {
        if let Some(err) = self.err {
            return Err(err);
        }
        let mut stmt = DeleteStmt::new(self.table?);
        if let Some(condition) = self.where_ {
            stmt = stmt.where_(condition);
        }
        Ok(stmt.returning(self.returning))
    }
}
