//! SELECT builder.

use quern_ast::{Expr, JoinExpr, JoinKind, OrderBy, SelectItem, SelectStmt, TableExpr};

use crate::error::BuildError;
use crate::expr::{expr_list, IntoExpr, IntoSelectItem, IntoTableExpr, OrderTerm};

/// Start a SELECT statement.
pub fn select() -> SelectBuilder {
    SelectBuilder {
        distinct: false,
        items: Vec::new(),
        table: None,
        where_: None,
        group_by: Vec::new(),
        having: None,
        order_by: Vec::new(),
        limit: None,
        offset: None,
        err: None,
    }
}

/// Accumulates SELECT clauses; the first error encountered anywhere in the
/// chain is the one `build()` reports.
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    distinct: bool,
    items: Vec<SelectItem>,
    table: Option<TableExpr>,
    where_: Option<Expr>,
    group_by: Vec<Expr>,
    having: Option<Expr>,
    order_by: Vec<OrderBy>,
    limit: Option<Expr>,
    offset: Option<Expr>,
    err: Option<BuildError>,
}

impl SelectBuilder {
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

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Append select-list items: chains, aliased chains, or core nodes.
    pub fn columns(mut self, items: impl IntoIterator<Item = impl IntoSelectItem>) -> Self {
        for item in items {
            let item = item.into_select_item();
            if let Some(item) = self.record(item) {
                self.items.push(item);
            }
        }
        self
    }

    /// Append a single select-list item.
    pub fn column(mut self, item: impl IntoSelectItem) -> Self {
        let item = item.into_select_item();
        if let Some(item) = self.record(item) {
            self.items.push(item);
        }
        self
    }

    pub fn from(mut self, table: impl IntoTableExpr) -> Self {
        let table = table.into_table_expr();
        if let Some(table) = self.record(table) {
            self.table = Some(table);
        }
        self
    }

    fn join_on(mut self, kind: JoinKind, right: impl IntoTableExpr, on: Option<Expr>) -> Self {
        let Some(left) = self.table.take() else {
            self.record::<()>(Err(BuildError::JoinBeforeFrom));
            return self;
        };
        let right = match right.into_table_expr() {
            Ok(right) => right,
            Err(err) => {
                self.record::<()>(Err(err));
                return self;
            }
        };
        let join = JoinExpr::new(kind, left, right, on).map_err(BuildError::from);
        if let Some(join) = self.record(join) {
            self.table = Some(TableExpr::from(join));
        }
        self
    }

    /// Join the accumulated table expression with `right` on a condition.
    pub fn join(mut self, kind: JoinKind, right: impl IntoTableExpr, on: impl IntoExpr) -> Self {
        let on = on.into_expr();
        match self.record(on) {
            Some(on) => self.join_on(kind, right, Some(on)),
            None => self,
        }
    }

    pub fn inner_join(self, right: impl IntoTableExpr, on: impl IntoExpr) -> Self {
        self.join(JoinKind::Inner, right, on)
    }

    pub fn left_join(self, right: impl IntoTableExpr, on: impl IntoExpr) -> Self {
        self.join(JoinKind::Left, right, on)
    }

    pub fn right_join(self, right: impl IntoTableExpr, on: impl IntoExpr) -> Self {
        self.join(JoinKind::Right, right, on)
    }

    pub fn full_join(self, right: impl IntoTableExpr, on: impl IntoExpr) -> Self {
        self.join(JoinKind::Full, right, on)
    }

    /// CROSS joins carry no ON condition.
    pub fn cross_join(self, right: impl IntoTableExpr) -> Self {
        self.join_on(JoinKind::Cross, right, None)
    }

    pub fn where_(mut self, condition: impl IntoExpr) -> Self {
        let condition = condition.into_expr();
        if let Some(condition) = self.record(condition) {
            self.where_ = Some(condition);
        }
        self
    }

    pub fn group_by(mut self, exprs: impl IntoIterator<Item = impl IntoExpr>) -> Self {
        let exprs = expr_list(exprs);
        if let Some(exprs) = self.record(exprs) {
            self.group_by.extend(exprs);
        }
        self
    }

    pub fn having(mut self, condition: impl IntoExpr) -> Self {
        let condition = condition.into_expr();
        if let Some(condition) = self.record(condition) {
            self.having = Some(condition);
        }
        self
    }

    pub fn order_by(mut self, terms: impl IntoIterator<Item = impl Into<OrderTerm>>) -> Self {
        for term in terms {
            let term = term.into().inner;
            if let Some(term) = self.record(term) {
                self.order_by.push(term);
            }
        }
        self
    }

    pub fn limit(mut self, limit: impl IntoExpr) -> Self {
        let limit = limit.into_expr();
        if let Some(limit) = self.record(limit) {
            self.limit = Some(limit);
        }
        self
    }

    pub fn offset(mut self, offset: impl IntoExpr) -> Self {
        let offset = offset.into_expr();
        if let Some(offset) = self.record(offset) {
            self.offset = Some(offset);
        }
        self
    }

    pub fn build(self) -> Result<SelectStmt, BuildError> {
        if let Some(err) = self.err {
            return Err(err);
        }
        if self.items.is_empty() {
            return Err(BuildError::MissingSelectList);
        }
        let Some(table) = self.table else {
            return Err(BuildError::MissingTable);
        };
        Ok(SelectStmt {
            distinct: self.distinct,
            select_list: self.items,
            from: Some(table),
            where_: self.where_,
            group_by: self.group_by,
            having: self.having,
            order_by: self.order_by,
            limit: self.limit,
            offset: self.offset,
        })
    }
}
