//! Expression chains and the conversion traits that feed them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use quern_ast::{
    AliasExpr, ArithOp, CaseExpr, CmpOp, ColumnRef, Expr, LikeExpr, LikeOp, Literal, OrderBy,
    SelectItem, TableExpr, TableRef, UnaryOp, ValueList, WhenClause,
};

use crate::error::BuildError;

/// Anything usable as an expression argument: a literal, a core node, or
/// another chain.
pub trait IntoExpr {
    fn into_expr(self) -> Result<Expr, BuildError>;
}

impl IntoExpr for ExprBuilder {
    fn into_expr(self) -> Result<Expr, BuildError> {
        self.inner
    }
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Result<Expr, BuildError> {
        Ok(self)
    }
}

impl IntoExpr for Literal {
    fn into_expr(self) -> Result<Expr, BuildError> {
        Ok(Expr::Literal(self))
    }
}

impl IntoExpr for ColumnRef {
    fn into_expr(self) -> Result<Expr, BuildError> {
        Ok(Expr::Column(self))
    }
}

impl IntoExpr for bool {
    fn into_expr(self) -> Result<Expr, BuildError> {
        Ok(self.into())
    }
}

impl IntoExpr for i32 {
    fn into_expr(self) -> Result<Expr, BuildError> {
        Ok(self.into())
    }
}

impl IntoExpr for i64 {
    fn into_expr(self) -> Result<Expr, BuildError> {
        Ok(self.into())
    }
}

impl IntoExpr for f64 {
    fn into_expr(self) -> Result<Expr, BuildError> {
        Ok(self.into())
    }
}

impl IntoExpr for &str {
    fn into_expr(self) -> Result<Expr, BuildError> {
        Ok(self.into())
    }
}

impl IntoExpr for String {
    fn into_expr(self) -> Result<Expr, BuildError> {
        Ok(self.into())
    }
}

impl IntoExpr for DateTime<Utc> {
    fn into_expr(self) -> Result<Expr, BuildError> {
        Ok(self.into())
    }
}

/// Anything usable as a select-list item.
pub trait IntoSelectItem {
    fn into_select_item(self) -> Result<SelectItem, BuildError>;
}

impl IntoSelectItem for ExprBuilder {
    fn into_select_item(self) -> Result<SelectItem, BuildError> {
        self.inner.map(SelectItem::Expr)
    }
}

impl IntoSelectItem for AliasedExpr {
    fn into_select_item(self) -> Result<SelectItem, BuildError> {
        self.inner.map(SelectItem::Aliased)
    }
}

impl IntoSelectItem for Expr {
    fn into_select_item(self) -> Result<SelectItem, BuildError> {
        Ok(SelectItem::Expr(self))
    }
}

impl IntoSelectItem for ColumnRef {
    fn into_select_item(self) -> Result<SelectItem, BuildError> {
        Ok(SelectItem::Expr(Expr::Column(self)))
    }
}

/// Anything usable where a SELECT reads from.
pub trait IntoTableExpr {
    fn into_table_expr(self) -> Result<TableExpr, BuildError>;
}

impl IntoTableExpr for TableExpr {
    fn into_table_expr(self) -> Result<TableExpr, BuildError> {
        Ok(self)
    }
}

impl IntoTableExpr for Arc<TableRef> {
    fn into_table_expr(self) -> Result<TableExpr, BuildError> {
        Ok(TableExpr::Table(self))
    }
}

impl IntoTableExpr for &Arc<TableRef> {
    fn into_table_expr(self) -> Result<TableExpr, BuildError> {
        Ok(TableExpr::Table(Arc::clone(self)))
    }
}

impl IntoTableExpr for TableBuilder {
    fn into_table_expr(self) -> Result<TableExpr, BuildError> {
        Ok(TableExpr::Table(self.build()?))
    }
}

/// Anything usable as a bare table target (INSERT/UPDATE/DELETE).
pub trait IntoTableRef {
    fn into_table_ref(self) -> Result<Arc<TableRef>, BuildError>;
}

impl IntoTableRef for Arc<TableRef> {
    fn into_table_ref(self) -> Result<Arc<TableRef>, BuildError> {
        Ok(self)
    }
}

impl IntoTableRef for &Arc<TableRef> {
    fn into_table_ref(self) -> Result<Arc<TableRef>, BuildError> {
        Ok(Arc::clone(self))
    }
}

impl IntoTableRef for TableRef {
    fn into_table_ref(self) -> Result<Arc<TableRef>, BuildError> {
        Ok(self.shared())
    }
}

impl IntoTableRef for TableBuilder {
    fn into_table_ref(self) -> Result<Arc<TableRef>, BuildError> {
        self.build()
    }
}

/// Deferred table construction: name plus optional schema/alias refinement.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    name: String,
    schema: Option<String>,
    alias: Option<String>,
}

impl TableBuilder {
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn build(self) -> Result<Arc<TableRef>, BuildError> {
        let mut table = TableRef::new(self.name)?;
        if let Some(schema) = self.schema {
            table = table.schema(schema);
        }
        if let Some(alias) = self.alias {
            table = table.alias(alias);
        }
        Ok(table.shared())
    }
}

/// Start a table reference; `build()` yields a shared `Arc<TableRef>` that
/// can qualify column references.
pub fn table(name: impl Into<String>) -> TableBuilder {
    TableBuilder {
        name: name.into(),
        schema: None,
        alias: None,
    }
}

/// An expression chain.
///
/// Carries a deferred `Result`: the first error wins and is reported by the
/// terminal call of whatever statement the chain ends up in. `not()` marks
/// the next negatable predicate (LIKE family, BETWEEN, IN, IS).
#[derive(Debug, Clone)]
pub struct ExprBuilder {
    inner: Result<Expr, BuildError>,
    negate: bool,
}

impl ExprBuilder {
    fn new(inner: Result<Expr, BuildError>) -> Self {
        Self {
            inner,
            negate: false,
        }
    }

    /// Materialize the chain into a core expression.
    pub fn build(self) -> Result<Expr, BuildError> {
        self.inner
    }

    /// Negate the next negatable predicate in the chain.
    pub fn not(mut self) -> Self {
        self.negate = true;
        self
    }

    fn combine(self, other: impl IntoExpr, f: impl FnOnce(Expr, Expr) -> Expr) -> Self {
        let inner = match (self.inner, other.into_expr()) {
            (Ok(left), Ok(right)) => Ok(f(left, right)),
            (Err(err), _) | (_, Err(err)) => Err(err),
        };
        Self::new(inner)
    }

    // logical operations

    pub fn and(self, other: impl IntoExpr) -> Self {
        self.combine(other, |l, r| l.and(r))
    }

    pub fn or(self, other: impl IntoExpr) -> Self {
        self.combine(other, |l, r| l.or(r))
    }

    // comparison operations

    pub fn eq(self, other: impl IntoExpr) -> Self {
        self.combine(other, |l, r| l.compare(CmpOp::Eq, r))
    }

    pub fn ne(self, other: impl IntoExpr) -> Self {
        self.combine(other, |l, r| l.compare(CmpOp::Ne, r))
    }

    pub fn lt(self, other: impl IntoExpr) -> Self {
        self.combine(other, |l, r| l.compare(CmpOp::Lt, r))
    }

    pub fn lte(self, other: impl IntoExpr) -> Self {
        self.combine(other, |l, r| l.compare(CmpOp::Le, r))
    }

    pub fn gt(self, other: impl IntoExpr) -> Self {
        self.combine(other, |l, r| l.compare(CmpOp::Gt, r))
    }

    pub fn gte(self, other: impl IntoExpr) -> Self {
        self.combine(other, |l, r| l.compare(CmpOp::Ge, r))
    }

    // arithmetic operations

    pub fn add(self, other: impl IntoExpr) -> Self {
        self.combine(other, |l, r| l.arith(ArithOp::Add, r))
    }

    pub fn sub(self, other: impl IntoExpr) -> Self {
        self.combine(other, |l, r| l.arith(ArithOp::Sub, r))
    }

    pub fn mul(self, other: impl IntoExpr) -> Self {
        self.combine(other, |l, r| l.arith(ArithOp::Mul, r))
    }

    pub fn div(self, other: impl IntoExpr) -> Self {
        self.combine(other, |l, r| l.arith(ArithOp::Div, r))
    }

    pub fn rem(self, other: impl IntoExpr) -> Self {
        self.combine(other, |l, r| l.arith(ArithOp::Rem, r))
    }

    // LIKE-family operations

    fn like_with(
        self,
        op: LikeOp,
        pattern: impl IntoExpr,
        escape: Option<Result<Expr, BuildError>>,
    ) -> Self {
        let negated = self.negate;
        let inner = match (self.inner, pattern.into_expr()) {
            (Ok(expr), Ok(pattern)) => {
                let escape = match escape.transpose() {
                    Ok(escape) => escape,
                    Err(err) => return Self::new(Err(err)),
                };
                LikeExpr::new(op, expr, pattern, escape, negated)
                    .map(Expr::from)
                    .map_err(BuildError::from)
            }
            (Err(err), _) | (_, Err(err)) => Err(err),
        };
        Self::new(inner)
    }

    pub fn like(self, pattern: impl IntoExpr) -> Self {
        self.like_with(LikeOp::Like, pattern, None)
    }

    pub fn like_escape(self, pattern: impl IntoExpr, escape: impl IntoExpr) -> Self {
        let escape = escape.into_expr();
        self.like_with(LikeOp::Like, pattern, Some(escape))
    }

    pub fn ilike(self, pattern: impl IntoExpr) -> Self {
        self.like_with(LikeOp::ILike, pattern, None)
    }

    pub fn ilike_escape(self, pattern: impl IntoExpr, escape: impl IntoExpr) -> Self {
        let escape = escape.into_expr();
        self.like_with(LikeOp::ILike, pattern, Some(escape))
    }

    pub fn glob(self, pattern: impl IntoExpr) -> Self {
        self.like_with(LikeOp::Glob, pattern, None)
    }

    pub fn matches(self, pattern: impl IntoExpr) -> Self {
        self.like_with(LikeOp::Match, pattern, None)
    }

    pub fn regexp(self, pattern: impl IntoExpr) -> Self {
        self.like_with(LikeOp::Regexp, pattern, None)
    }

    // range and membership

    pub fn between(self, lower: impl IntoExpr, upper: impl IntoExpr) -> Self {
        let negated = self.negate;
        let inner = match (self.inner, lower.into_expr(), upper.into_expr()) {
            (Ok(expr), Ok(lower), Ok(upper)) => Ok(Expr::Between {
                expr: Box::new(expr),
                lower: Box::new(lower),
                upper: Box::new(upper),
                negated,
            }),
            (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => Err(err),
        };
        Self::new(inner)
    }

    pub fn in_list(self, values: impl IntoIterator<Item = impl IntoExpr>) -> Self {
        let negated = self.negate;
        let inner = self.inner.and_then(|expr| {
            let mut list = Vec::new();
            for value in values {
                list.push(value.into_expr()?);
            }
            Ok(Expr::In {
                expr: Box::new(expr),
                list: ValueList(list),
                negated,
            })
        });
        Self::new(inner)
    }

    // IS operations

    fn is_with(self, value: impl IntoExpr, negated: bool) -> Self {
        self.combine(value, move |left, right| Expr::Is {
            left: Box::new(left),
            right: Box::new(right),
            negated,
        })
    }

    pub fn is(self, value: impl IntoExpr) -> Self {
        let negated = self.negate;
        self.is_with(value, negated)
    }

    pub fn is_not(self, value: impl IntoExpr) -> Self {
        self.is_with(value, true)
    }

    pub fn is_null(self) -> Self {
        let negated = self.negate;
        self.is_with(Literal::Null, negated)
    }

    pub fn is_not_null(self) -> Self {
        self.is_with(Literal::Null, true)
    }

    pub fn is_true(self) -> Self {
        let negated = self.negate;
        self.is_with(Literal::Bool(true), negated)
    }

    pub fn is_not_true(self) -> Self {
        self.is_with(Literal::Bool(true), true)
    }

    pub fn is_false(self) -> Self {
        let negated = self.negate;
        self.is_with(Literal::Bool(false), negated)
    }

    pub fn is_not_false(self) -> Self {
        self.is_with(Literal::Bool(false), true)
    }

    // clause-level helpers

    pub fn alias(self, alias: impl Into<String>) -> AliasedExpr {
        AliasedExpr {
            inner: self
                .inner
                .map(|expr| AliasExpr::new(expr, alias)),
        }
    }

    pub fn asc(self) -> OrderTerm {
        OrderTerm {
            inner: self.inner.map(OrderBy::asc),
        }
    }

    pub fn desc(self) -> OrderTerm {
        OrderTerm {
            inner: self.inner.map(OrderBy::desc),
        }
    }

    /// Start a CASE expression with this chain as the operand.
    pub fn case(self) -> CaseBuilder {
        CaseBuilder {
            operand: self.inner,
            whens: Vec::new(),
            else_: None,
        }
    }
}

/// An aliased select-list item, produced by [`ExprBuilder::alias`].
#[derive(Debug, Clone)]
pub struct AliasedExpr {
    inner: Result<AliasExpr, BuildError>,
}

/// One ORDER BY term, produced by [`ExprBuilder::asc`] / [`ExprBuilder::desc`].
#[derive(Debug, Clone)]
pub struct OrderTerm {
    pub(crate) inner: Result<OrderBy, BuildError>,
}

impl From<OrderBy> for OrderTerm {
    fn from(order: OrderBy) -> Self {
        Self { inner: Ok(order) }
    }
}

/// Accumulates WHEN arms; `end()` materializes the CASE and re-enters
/// expression chaining. At least one WHEN arm is required.
#[derive(Debug, Clone)]
pub struct CaseBuilder {
    operand: Result<Expr, BuildError>,
    whens: Vec<Result<WhenClause, BuildError>>,
    else_: Option<Result<Expr, BuildError>>,
}

impl CaseBuilder {
    pub fn when(mut self, condition: impl IntoExpr, result: impl IntoExpr) -> Self {
        let when = match (condition.into_expr(), result.into_expr()) {
            (Ok(condition), Ok(result)) => Ok(WhenClause { condition, result }),
            (Err(err), _) | (_, Err(err)) => Err(err),
        };
        self.whens.push(when);
        self
    }

    pub fn else_(mut self, value: impl IntoExpr) -> Self {
        self.else_ = Some(value.into_expr());
        self
    }

    pub fn end(self) -> ExprBuilder {
        let inner = (|| {
            let operand = self.operand?;
            let mut whens = Vec::with_capacity(self.whens.len());
            for when in self.whens {
                whens.push(when?);
            }
            let else_ = self.else_.transpose()?;
            Ok(Expr::from(CaseExpr::new(operand, whens, else_)?))
        })();
        ExprBuilder::new(inner)
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// A bare column reference.
pub fn col(name: impl Into<String>) -> ExprBuilder {
    ExprBuilder::new(Expr::column(name).map_err(BuildError::from))
}

/// A column reference qualified with a shared table.
pub fn col_of(table: &Arc<TableRef>, name: impl Into<String>) -> ExprBuilder {
    ExprBuilder::new(Expr::qualified_column(table, name).map_err(BuildError::from))
}

/// A literal value.
pub fn val(value: impl Into<Literal>) -> ExprBuilder {
    ExprBuilder::new(Ok(Expr::Literal(value.into())))
}

/// A named parameter placeholder.
pub fn param(name: impl Into<String>) -> ExprBuilder {
    ExprBuilder::new(Ok(Expr::param(name)))
}

/// A positional parameter placeholder.
pub fn positional() -> ExprBuilder {
    ExprBuilder::new(Ok(Expr::positional()))
}

/// Explicit precedence grouping: (body).
pub fn paren(body: impl IntoExpr) -> ExprBuilder {
    ExprBuilder::new(body.into_expr().map(Expr::paren))
}

fn unary(op: UnaryOp, operand: impl IntoExpr) -> ExprBuilder {
    ExprBuilder::new(operand.into_expr().map(|operand| Expr::Unary {
        op,
        operand: Box::new(operand),
    }))
}

/// Arithmetic negation: -operand.
pub fn neg(operand: impl IntoExpr) -> ExprBuilder {
    unary(UnaryOp::Neg, operand)
}

/// Unary plus: +operand.
pub fn pos(operand: impl IntoExpr) -> ExprBuilder {
    unary(UnaryOp::Pos, operand)
}

/// Bitwise complement: ~operand.
pub fn bit_not(operand: impl IntoExpr) -> ExprBuilder {
    unary(UnaryOp::BitNot, operand)
}

/// Logical negation: NOT operand.
pub fn not(operand: impl IntoExpr) -> ExprBuilder {
    unary(UnaryOp::Not, operand)
}

/// A function call.
pub fn func(
    name: impl Into<String>,
    args: impl IntoIterator<Item = impl IntoExpr>,
) -> ExprBuilder {
    let inner = (|| {
        let mut list = Vec::new();
        for arg in args {
            list.push(arg.into_expr()?);
        }
        Ok(Expr::fn_call(name, list))
    })();
    ExprBuilder::new(inner)
}

/// Collect a mixed list of expression arguments.
pub(crate) fn expr_list(
    items: impl IntoIterator<Item = impl IntoExpr>,
) -> Result<Vec<Expr>, BuildError> {
    let mut list = Vec::new();
    for item in items {
        list.push(item.into_expr()?);
    }
    Ok(list)
}
