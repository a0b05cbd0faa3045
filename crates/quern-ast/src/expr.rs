//! SQL expressions.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::Error;

/// A SQL expression.
///
/// Expressions own their children; the one exception is the table a
/// [`ColumnRef`] is qualified with, which is shared via `Arc` so several
/// columns can point at the same table.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value
    Literal(Literal),
    /// A parameter placeholder: `Some(name)` for named, `None` for positional
    Param(Option<String>),
    /// A column reference
    Column(ColumnRef),
    /// An explicitly parenthesized expression
    Paren(Box<Expr>),
    /// Unary operation (e.g., -a, NOT a)
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Comparison (e.g., a = b, a < b)
    Comparison {
        op: CmpOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Arithmetic (e.g., a + b)
    Arithmetic {
        op: ArithOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// AND / OR
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// a [NOT] BETWEEN lo AND hi
    Between {
        expr: Box<Expr>,
        lower: Box<Expr>,
        upper: Box<Expr>,
        negated: bool,
    },
    /// a [NOT] IN (values...)
    In {
        expr: Box<Expr>,
        list: ValueList,
        negated: bool,
    },
    /// a IS [NOT] b
    Is {
        left: Box<Expr>,
        right: Box<Expr>,
        negated: bool,
    },
    /// LIKE-family pattern match
    Like(LikeExpr),
    /// Function call
    FnCall { name: String, args: Vec<Expr> },
    /// CASE expression
    Case(CaseExpr),
}

/// A table reference, optionally schema-qualified and aliased.
///
/// Shared by reference: columns hold an `Arc<TableRef>` back to the table
/// they are qualified with, so the table's rendered alias stays in sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    name: String,
    schema: Option<String>,
    alias: Option<String>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyName("table"));
        }
        Ok(Self {
            name,
            schema: None,
            alias: None,
        })
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Wrap into an `Arc` for sharing into column references.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

/// A column reference, optionally qualified with a shared table reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    name: String,
    table: Option<Arc<TableRef>>,
}

impl ColumnRef {
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyName("column"));
        }
        Ok(Self { name, table: None })
    }

    pub fn qualified(table: &Arc<TableRef>, name: impl Into<String>) -> Result<Self, Error> {
        let mut col = Self::new(name)?;
        col.table = Some(Arc::clone(table));
        Ok(col)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> Option<&Arc<TableRef>> {
        self.table.as_ref()
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// NULL
    Null,
    /// TRUE / FALSE
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point. Non-finite values render via `Display` and are not
    /// valid SQL; keeping them out is the caller's responsibility.
    Float(f64),
    /// Text
    String(String),
    /// Timestamp, rendered as a quoted RFC 3339 string with millisecond
    /// precision (`'2024-01-01T00:00:00.000Z'`)
    DateTime(DateTime<Utc>),
}

// Convenient From impls
impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal::Int(v.into())
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_owned())
    }
}

impl From<DateTime<Utc>> for Literal {
    fn from(v: DateTime<Utc>) -> Self {
        Literal::DateTime(v)
    }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Literal::Null,
        }
    }
}

impl From<Literal> for Expr {
    fn from(v: Literal) -> Self {
        Expr::Literal(v)
    }
}

impl From<ColumnRef> for Expr {
    fn from(v: ColumnRef) -> Self {
        Expr::Column(v)
    }
}

impl From<LikeExpr> for Expr {
    fn from(v: LikeExpr) -> Self {
        Expr::Like(v)
    }
}

impl From<CaseExpr> for Expr {
    fn from(v: CaseExpr) -> Self {
        Expr::Case(v)
    }
}

impl From<bool> for Expr {
    fn from(v: bool) -> Self {
        Expr::Literal(v.into())
    }
}

impl From<i32> for Expr {
    fn from(v: i32) -> Self {
        Expr::Literal(v.into())
    }
}

impl From<i64> for Expr {
    fn from(v: i64) -> Self {
        Expr::Literal(v.into())
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Literal(v.into())
    }
}

impl From<String> for Expr {
    fn from(v: String) -> Self {
        Expr::Literal(v.into())
    }
}

impl From<&str> for Expr {
    fn from(v: &str) -> Self {
        Expr::Literal(v.into())
    }
}

impl From<DateTime<Utc>> for Expr {
    fn from(v: DateTime<Utc>) -> Self {
        Expr::Literal(v.into())
    }
}

/// An ordered list of values, rendered parenthesized and comma-joined.
///
/// Used by `IN` and by each row of a multi-row `INSERT`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueList(pub Vec<Expr>);

impl ValueList {
    pub fn new(values: impl IntoIterator<Item = impl Into<Expr>>) -> Self {
        Self(values.into_iter().map(Into::into).collect())
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    BitNot,
    Not,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::BitNot => "~",
            UnaryOp::Not => "NOT",
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "<>",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl ArithOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Rem => "%",
        }
    }
}

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

/// LIKE-family operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOp {
    Like,
    ILike,
    Glob,
    Match,
    Regexp,
}

impl LikeOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LikeOp::Like => "LIKE",
            LikeOp::ILike => "ILIKE",
            LikeOp::Glob => "GLOB",
            LikeOp::Match => "MATCH",
            LikeOp::Regexp => "REGEXP",
        }
    }
}

/// A `[NOT] LIKE/ILIKE/GLOB/MATCH/REGEXP` pattern match.
///
/// An escape expression is only valid with `LIKE` and `ILIKE`.
#[derive(Debug, Clone, PartialEq)]
pub struct LikeExpr {
    op: LikeOp,
    expr: Box<Expr>,
    pattern: Box<Expr>,
    escape: Option<Box<Expr>>,
    negated: bool,
}

impl LikeExpr {
    pub fn new(
        op: LikeOp,
        expr: Expr,
        pattern: Expr,
        escape: Option<Expr>,
        negated: bool,
    ) -> Result<Self, Error> {
        if escape.is_some() && !matches!(op, LikeOp::Like | LikeOp::ILike) {
            return Err(Error::EscapeNotAllowed);
        }
        Ok(Self {
            op,
            expr: Box::new(expr),
            pattern: Box::new(pattern),
            escape: escape.map(Box::new),
            negated,
        })
    }

    pub fn op(&self) -> LikeOp {
        self.op
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn pattern(&self) -> &Expr {
        &self.pattern
    }

    pub fn escape(&self) -> Option<&Expr> {
        self.escape.as_deref()
    }

    pub fn negated(&self) -> bool {
        self.negated
    }
}

/// One `WHEN <condition> THEN <result>` arm of a CASE expression.
#[derive(Debug, Clone, PartialEq)]
pub struct WhenClause {
    pub condition: Expr,
    pub result: Expr,
}

impl WhenClause {
    pub fn new(condition: impl Into<Expr>, result: impl Into<Expr>) -> Self {
        Self {
            condition: condition.into(),
            result: result.into(),
        }
    }
}

/// A `CASE <operand> WHEN ... [ELSE ...] END` expression.
///
/// Requires at least one WHEN arm.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
    operand: Box<Expr>,
    whens: Vec<WhenClause>,
    else_: Option<Box<Expr>>,
}

impl CaseExpr {
    pub fn new(operand: Expr, whens: Vec<WhenClause>, else_: Option<Expr>) -> Result<Self, Error> {
        if whens.is_empty() {
            return Err(Error::EmptyWhenList);
        }
        Ok(Self {
            operand: Box::new(operand),
            whens,
            else_: else_.map(Box::new),
        })
    }

    pub fn operand(&self) -> &Expr {
        &self.operand
    }

    pub fn whens(&self) -> &[WhenClause] {
        &self.whens
    }

    pub fn else_expr(&self) -> Option<&Expr> {
        self.else_.as_deref()
    }
}

// Convenience constructors
impl Expr {
    pub fn column(name: impl Into<String>) -> Result<Self, Error> {
        Ok(Expr::Column(ColumnRef::new(name)?))
    }

    pub fn qualified_column(
        table: &Arc<TableRef>,
        name: impl Into<String>,
    ) -> Result<Self, Error> {
        Ok(Expr::Column(ColumnRef::qualified(table, name)?))
    }

    /// Named parameter placeholder; every use of the same name shares a slot.
    pub fn param(name: impl Into<String>) -> Self {
        Expr::Param(Some(name.into()))
    }

    /// Positional parameter placeholder; every use claims a fresh slot.
    pub fn positional() -> Self {
        Expr::Param(None)
    }

    pub fn fn_call(name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        Expr::FnCall {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Wrap in explicit parentheses: (self)
    pub fn paren(self) -> Self {
        Expr::Paren(Box::new(self))
    }

    /// Logical negation: NOT self
    pub fn negate(self) -> Self {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(self),
        }
    }

    pub fn compare(self, op: CmpOp, other: impl Into<Expr>) -> Self {
        Expr::Comparison {
            op,
            left: Box::new(self),
            right: Box::new(other.into()),
        }
    }

    /// self = other
    pub fn eq(self, other: impl Into<Expr>) -> Self {
        self.compare(CmpOp::Eq, other)
    }

    /// self <> other
    pub fn ne(self, other: impl Into<Expr>) -> Self {
        self.compare(CmpOp::Ne, other)
    }

    /// self < other
    pub fn lt(self, other: impl Into<Expr>) -> Self {
        self.compare(CmpOp::Lt, other)
    }

    /// self <= other
    pub fn le(self, other: impl Into<Expr>) -> Self {
        self.compare(CmpOp::Le, other)
    }

    /// self > other
    pub fn gt(self, other: impl Into<Expr>) -> Self {
        self.compare(CmpOp::Gt, other)
    }

    /// self >= other
    pub fn ge(self, other: impl Into<Expr>) -> Self {
        self.compare(CmpOp::Ge, other)
    }

    /// self AND other
    pub fn and(self, other: impl Into<Expr>) -> Self {
        Expr::Logical {
            op: LogicalOp::And,
            left: Box::new(self),
            right: Box::new(other.into()),
        }
    }

    /// self OR other
    pub fn or(self, other: impl Into<Expr>) -> Self {
        Expr::Logical {
            op: LogicalOp::Or,
            left: Box::new(self),
            right: Box::new(other.into()),
        }
    }

    pub fn arith(self, op: ArithOp, other: impl Into<Expr>) -> Self {
        Expr::Arithmetic {
            op,
            left: Box::new(self),
            right: Box::new(other.into()),
        }
    }

    /// self BETWEEN lower AND upper
    pub fn between(self, lower: impl Into<Expr>, upper: impl Into<Expr>) -> Self {
        Expr::Between {
            expr: Box::new(self),
            lower: Box::new(lower.into()),
            upper: Box::new(upper.into()),
            negated: false,
        }
    }

    /// self IN (values...)
    pub fn in_list(self, list: ValueList) -> Self {
        Expr::In {
            expr: Box::new(self),
            list,
            negated: false,
        }
    }

    /// self IS value
    pub fn is(self, value: impl Into<Expr>) -> Self {
        Expr::Is {
            left: Box::new(self),
            right: Box::new(value.into()),
            negated: false,
        }
    }

    /// self IS NULL
    pub fn is_null(self) -> Self {
        self.is(Literal::Null)
    }

    /// self IS NOT NULL
    pub fn is_not_null(self) -> Self {
        Expr::Is {
            left: Box::new(self),
            right: Box::new(Literal::Null.into()),
            negated: true,
        }
    }

    /// self LIKE pattern (no escape; see [`LikeExpr::new`] for the full form)
    pub fn like(self, pattern: impl Into<Expr>) -> Self {
        Expr::Like(LikeExpr {
            op: LikeOp::Like,
            expr: Box::new(self),
            pattern: Box::new(pattern.into()),
            escape: None,
            negated: false,
        })
    }

    /// self ILIKE pattern
    pub fn ilike(self, pattern: impl Into<Expr>) -> Self {
        Expr::Like(LikeExpr {
            op: LikeOp::ILike,
            expr: Box::new(self),
            pattern: Box::new(pattern.into()),
            escape: None,
            negated: false,
        })
    }
}
