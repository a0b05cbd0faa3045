//! SQL statements.

use std::sync::Arc;

use crate::error::Error;
use crate::expr::{ColumnRef, Expr, TableRef, ValueList};

/// A SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Select(SelectStmt),
    Insert(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
}

impl From<SelectStmt> for Stmt {
    fn from(s: SelectStmt) -> Self {
        Stmt::Select(s)
    }
}

impl From<InsertStmt> for Stmt {
    fn from(s: InsertStmt) -> Self {
        Stmt::Insert(s)
    }
}

impl From<UpdateStmt> for Stmt {
    fn from(s: UpdateStmt) -> Self {
        Stmt::Update(s)
    }
}

impl From<DeleteStmt> for Stmt {
    fn from(s: DeleteStmt) -> Self {
        Stmt::Delete(s)
    }
}

/// What a SELECT reads from: a table or a join chain.
///
/// Multi-join chains nest left-associatively, so the left side of a join may
/// itself be a join.
#[derive(Debug, Clone, PartialEq)]
pub enum TableExpr {
    Table(Arc<TableRef>),
    Join(Box<JoinExpr>),
}

impl From<Arc<TableRef>> for TableExpr {
    fn from(t: Arc<TableRef>) -> Self {
        TableExpr::Table(t)
    }
}

impl From<&Arc<TableRef>> for TableExpr {
    fn from(t: &Arc<TableRef>) -> Self {
        TableExpr::Table(Arc::clone(t))
    }
}

impl From<JoinExpr> for TableExpr {
    fn from(j: JoinExpr) -> Self {
        TableExpr::Join(Box::new(j))
    }
}

/// Type of JOIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// A JOIN between two table expressions.
///
/// A CROSS join must not carry a condition.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinExpr {
    kind: JoinKind,
    left: TableExpr,
    right: TableExpr,
    condition: Option<Expr>,
}

impl JoinExpr {
    pub fn new(
        kind: JoinKind,
        left: impl Into<TableExpr>,
        right: impl Into<TableExpr>,
        condition: Option<Expr>,
    ) -> Result<Self, Error> {
        if kind == JoinKind::Cross && condition.is_some() {
            return Err(Error::CrossJoinCondition);
        }
        Ok(Self {
            kind,
            left: left.into(),
            right: right.into(),
            condition,
        })
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    pub fn left(&self) -> &TableExpr {
        &self.left
    }

    pub fn right(&self) -> &TableExpr {
        &self.right
    }

    pub fn condition(&self) -> Option<&Expr> {
        self.condition.as_ref()
    }
}

/// An item in a SELECT list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    Expr(Expr),
    Aliased(AliasExpr),
}

impl SelectItem {
    pub fn expr(expr: impl Into<Expr>) -> Self {
        SelectItem::Expr(expr.into())
    }

    pub fn aliased(expr: impl Into<Expr>, alias: impl Into<String>) -> Self {
        SelectItem::Aliased(AliasExpr {
            expr: expr.into(),
            alias: alias.into(),
        })
    }
}

impl From<Expr> for SelectItem {
    fn from(e: Expr) -> Self {
        SelectItem::Expr(e)
    }
}

impl From<ColumnRef> for SelectItem {
    fn from(c: ColumnRef) -> Self {
        SelectItem::Expr(Expr::Column(c))
    }
}

impl From<AliasExpr> for SelectItem {
    fn from(a: AliasExpr) -> Self {
        SelectItem::Aliased(a)
    }
}

/// `<expr> AS "alias"`.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasExpr {
    pub expr: Expr,
    pub alias: String,
}

impl AliasExpr {
    pub fn new(expr: impl Into<Expr>, alias: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            alias: alias.into(),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDir {
    Asc,
    Desc,
}

impl OrderDir {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderDir::Asc => "ASC",
            OrderDir::Desc => "DESC",
        }
    }
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub expr: Expr,
    pub dir: OrderDir,
}

impl OrderBy {
    pub fn asc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            dir: OrderDir::Asc,
        }
    }

    pub fn desc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            dir: OrderDir::Desc,
        }
    }
}

/// A SELECT statement.
///
/// Optional clauses render only when present; empty lists count as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectStmt {
    pub distinct: bool,
    pub select_list: Vec<SelectItem>,
    pub from: Option<TableExpr>,
    pub where_: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
}

/// One `<column> = <value>` assignment of an UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: ColumnRef,
    pub value: Expr,
}

impl Assignment {
    pub fn new(column: ColumnRef, value: impl Into<Expr>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStmt {
    pub table: Arc<TableRef>,
    /// Column names for the inserted rows; rendered bare (unqualified)
    pub columns: Vec<ColumnRef>,
    /// One `ValueList` per inserted row
    pub values: Vec<ValueList>,
    pub returning: Vec<Expr>,
    /// When set, renders `DEFAULT VALUES` and suppresses columns/VALUES
    pub default_values: bool,
}

/// An UPDATE statement. Requires at least one assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStmt {
    table: Arc<TableRef>,
    assignments: Vec<Assignment>,
    where_: Option<Expr>,
    returning: Vec<Expr>,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStmt {
    pub table: Arc<TableRef>,
    pub where_: Option<Expr>,
    pub returning: Vec<Expr>,
}

// ============================================================================
// Builder-style constructors
// ============================================================================

impl SelectStmt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn item(mut self, item: impl Into<SelectItem>) -> Self {
        self.select_list.push(item.into());
        self
    }

    pub fn items(mut self, items: impl IntoIterator<Item = impl Into<SelectItem>>) -> Self {
        self.select_list.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn from(mut self, table: impl Into<TableExpr>) -> Self {
        self.from = Some(table.into());
        self
    }

    pub fn where_(mut self, expr: impl Into<Expr>) -> Self {
        self.where_ = Some(expr.into());
        self
    }

    pub fn group_by(mut self, exprs: impl IntoIterator<Item = impl Into<Expr>>) -> Self {
        self.group_by.extend(exprs.into_iter().map(Into::into));
        self
    }

    pub fn having(mut self, expr: impl Into<Expr>) -> Self {
        self.having = Some(expr.into());
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn limit(mut self, expr: impl Into<Expr>) -> Self {
        self.limit = Some(expr.into());
        self
    }

    pub fn offset(mut self, expr: impl Into<Expr>) -> Self {
        self.offset = Some(expr.into());
        self
    }
}

impl InsertStmt {
    pub fn new(table: Arc<TableRef>) -> Self {
        Self {
            table,
            columns: Vec::new(),
            values: Vec::new(),
            returning: Vec::new(),
            default_values: false,
        }
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnRef>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Append one row of values.
    pub fn values(mut self, row: ValueList) -> Self {
        self.values.push(row);
        self
    }

    pub fn default_values(mut self) -> Self {
        self.default_values = true;
        self
    }

    pub fn returning(mut self, exprs: impl IntoIterator<Item = impl Into<Expr>>) -> Self {
        self.returning.extend(exprs.into_iter().map(Into::into));
        self
    }
}

impl UpdateStmt {
    pub fn new(
        table: Arc<TableRef>,
        assignments: impl IntoIterator<Item = Assignment>,
    ) -> Result<Self, Error> {
        let assignments: Vec<Assignment> = assignments.into_iter().collect();
        if assignments.is_empty() {
            return Err(Error::NoAssignments);
        }
        Ok(Self {
            table,
            assignments,
            where_: None,
            returning: Vec::new(),
        })
    }

    pub fn where_(mut self, expr: impl Into<Expr>) -> Self {
        self.where_ = Some(expr.into());
        self
    }

    pub fn returning(mut self, exprs: impl IntoIterator<Item = impl Into<Expr>>) -> Self {
        self.returning.extend(exprs.into_iter().map(Into::into));
        self
    }

    pub fn table(&self) -> &Arc<TableRef> {
        &self.table
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn condition(&self) -> Option<&Expr> {
        self.where_.as_ref()
    }

    pub fn return_list(&self) -> &[Expr] {
        &self.returning
    }
}

impl DeleteStmt {
    pub fn new(table: Arc<TableRef>) -> Self {
        Self {
            table,
            where_: None,
            returning: Vec::new(),
        }
    }

    pub fn where_(mut self, expr: impl Into<Expr>) -> Self {
        self.where_ = Some(expr.into());
        self
    }

    pub fn returning(mut self, exprs: impl IntoIterator<Item = impl Into<Expr>>) -> Self {
        self.returning.extend(exprs.into_iter().map(Into::into));
        self
    }
}
