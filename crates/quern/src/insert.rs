//! INSERT builder.

use std::sync::Arc;

use quern_ast::{ColumnRef, Expr, InsertStmt, TableRef, ValueList};

use crate::error::BuildError;
use crate::expr::{expr_list, IntoExpr, IntoTableRef};

/// Start an INSERT statement targeting `table`.
pub fn insert_into(table: impl IntoTableRef) -> InsertBuilder {
    InsertBuilder {
        table: table.into_table_ref(),
        columns: Vec::new(),
        rows: Vec::new(),
        returning: Vec::new(),
        default_values: false,
        err: None,
    }
}

#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: Result<Arc<TableRef>, BuildError>,
    columns: Vec<String>,
    rows: Vec<ValueList>,
    returning: Vec<Expr>,
    default_values: bool,
    err: Option<BuildError>,
}

impl InsertBuilder {
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

    /// Name the target columns; rendered bare, in this order.
    pub fn columns(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns.extend(names.into_iter().map(Into::into));
        self
    }

    /// Append one row of values. Call once per row for multi-row inserts.
    pub fn values(mut self, row: impl IntoIterator<Item = impl IntoExpr>) -> Self {
        let row = expr_list(row);
        if let Some(row) = self.record(row) {
            self.rows.push(ValueList(row));
        }
        self
    }

    /// Insert a row of defaults; suppresses columns and VALUES on render.
    pub fn default_values(mut self) -> Self {
        self.default_values = true;
        self
    }

    pub fn returning(mut self, exprs: impl IntoIterator<Item = impl IntoExpr>) -> Self {
        let exprs = expr_list(exprs);
        if let Some(exprs) = self.record(exprs) {
            self.returning.extend(exprs);
        }
        self
    }

    pub fn build(self) -> Result<InsertStmt, BuildError> {
        if let Some(err) = self.err {
            return Err(err);
        }
        let table = self.table?;
        let mut columns = Vec::with_capacity(self.columns.len());
        for name in self.columns {
            columns.push(ColumnRef::new(name)?);
        }
        let mut stmt = InsertStmt::new(table).columns(columns);
        for row in self.rows {
            stmt = stmt.values(row);
        }
        if self.default_values {
            stmt = stmt.default_values();
        }
        Ok(stmt.returning(self.returning))
    }
}
