//! Render the SQL AST to a string.

use indexmap::IndexMap;

use crate::expr::{CaseExpr, ColumnRef, Expr, LikeExpr, Literal, TableRef, UnaryOp, ValueList, WhenClause};
use crate::stmt::*;
use crate::{RenderedSql, escape_string, quote_ident};

/// A reusable SQL generator.
///
/// Owns the output buffer and the parameter registry; both are cleared at the
/// start of every [`generate`](Self::generate) call, so independent trees can
/// be rendered through one generator. Not internally synchronized: concurrent
/// renders need one generator each.
pub struct SqlGenerator {
    /// The SQL being built
    sql: String,
    /// Named parameters -> their assigned slot (1-based)
    named: IndexMap<String, usize>,
    /// One entry per slot, in slot order
    params: Vec<Option<String>>,
}

impl SqlGenerator {
    pub fn new() -> Self {
        Self {
            sql: String::new(),
            named: IndexMap::new(),
            params: Vec::new(),
        }
    }

    /// Render a node tree to SQL text.
    ///
    /// Rendering the same tree repeatedly yields byte-identical output.
    pub fn generate(&mut self, node: &impl Render) -> String {
        self.sql.clear();
        self.named.clear();
        self.params.clear();
        node.render(self);
        self.sql.clone()
    }

    /// Parameter slots assigned during the most recent `generate` call.
    pub fn params(&self) -> &[Option<String>] {
        &self.params
    }

    /// Get or create a parameter placeholder. Named parameters reuse their
    /// slot; positional parameters always claim a fresh one.
    fn param_slot(&mut self, name: Option<&str>) -> String {
        let idx = match name {
            Some(name) => match self.named.get(name) {
                Some(idx) => *idx,
                None => {
                    self.params.push(Some(name.to_owned()));
                    let idx = self.params.len();
                    self.named.insert(name.to_owned(), idx);
                    idx
                }
            },
            None => {
                self.params.push(None);
                self.params.len()
            }
        };
        format!("${idx}")
    }

    fn write(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    fn list<T: Render>(&mut self, items: &[T], sep: &str) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(sep);
            }
            item.render(self);
        }
    }
}

impl Default for SqlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Render implementations
// ============================================================================

/// Trait for nodes that can be rendered to SQL.
pub trait Render {
    fn render(&self, g: &mut SqlGenerator);
}

impl Render for Literal {
    fn render(&self, g: &mut SqlGenerator) {
        match self {
            Literal::Null => g.write("NULL"),
            Literal::Bool(b) => g.write(if *b { "TRUE" } else { "FALSE" }),
            Literal::Int(n) => g.write(&n.to_string()),
            Literal::Float(x) => g.write(&x.to_string()),
            Literal::String(s) => g.write(&escape_string(s)),
            Literal::DateTime(dt) => {
                let iso = dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
                g.write(&escape_string(&iso));
            }
        }
    }
}

impl Render for TableRef {
    fn render(&self, g: &mut SqlGenerator) {
        if let Some(schema) = self.schema_name() {
            g.write(&quote_ident(schema));
            g.write(".");
        }
        g.write(&quote_ident(self.name()));
        if let Some(alias) = self.alias_name() {
            g.write(" AS ");
            g.write(&quote_ident(alias));
        }
    }
}

impl Render for ColumnRef {
    fn render(&self, g: &mut SqlGenerator) {
        if let Some(table) = self.table() {
            // An aliased table is referenced by its bare alias, not through
            // the full table rendering rule.
            match table.alias_name() {
                Some(alias) => g.write(&quote_ident(alias)),
                None => table.render(g),
            }
            g.write(".");
        }
        g.write(&quote_ident(self.name()));
    }
}

impl Render for ValueList {
    fn render(&self, g: &mut SqlGenerator) {
        g.write("(");
        g.list(&self.0, ", ");
        g.write(")");
    }
}

impl Render for Expr {
    fn render(&self, g: &mut SqlGenerator) {
        match self {
            Expr::Literal(lit) => lit.render(g),
            Expr::Param(name) => {
                let placeholder = g.param_slot(name.as_deref());
                g.write(&placeholder);
            }
            Expr::Column(col) => col.render(g),
            Expr::Paren(body) => {
                g.write("(");
                body.render(g);
                g.write(")");
            }
            Expr::Unary { op, operand } => {
                g.write(op.as_str());
                if *op == UnaryOp::Not {
                    g.write(" ");
                }
                operand.render(g);
            }
            Expr::Comparison { op, left, right } => {
                left.render(g);
                g.write(" ");
                g.write(op.as_str());
                g.write(" ");
                right.render(g);
            }
            Expr::Arithmetic { op, left, right } => {
                left.render(g);
                g.write(" ");
                g.write(op.as_str());
                g.write(" ");
                right.render(g);
            }
            Expr::Logical { op, left, right } => {
                left.render(g);
                g.write(" ");
                g.write(op.as_str());
                g.write(" ");
                right.render(g);
            }
            Expr::Between {
                expr,
                lower,
                upper,
                negated,
            } => {
                expr.render(g);
                g.write(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                lower.render(g);
                g.write(" AND ");
                upper.render(g);
            }
            Expr::In {
                expr,
                list,
                negated,
            } => {
                expr.render(g);
                g.write(if *negated { " NOT IN " } else { " IN " });
                list.render(g);
            }
            Expr::Is {
                left,
                right,
                negated,
            } => {
                left.render(g);
                g.write(if *negated { " IS NOT " } else { " IS " });
                right.render(g);
            }
            Expr::Like(like) => like.render(g),
            Expr::FnCall { name, args } => {
                g.write(name);
                g.write("(");
                g.list(args, ", ");
                g.write(")");
            }
            Expr::Case(case) => case.render(g),
        }
    }
}

impl Render for LikeExpr {
    fn render(&self, g: &mut SqlGenerator) {
        self.expr().render(g);
        g.write(" ");
        if self.negated() {
            g.write("NOT ");
        }
        g.write(self.op().as_str());
        g.write(" ");
        self.pattern().render(g);
        if let Some(escape) = self.escape() {
            g.write(" ESCAPE ");
            escape.render(g);
        }
    }
}

impl Render for CaseExpr {
    fn render(&self, g: &mut SqlGenerator) {
        g.write("CASE ");
        self.operand().render(g);
        for when in self.whens() {
            g.write(" ");
            when.render(g);
        }
        if let Some(else_) = self.else_expr() {
            g.write(" ELSE ");
            else_.render(g);
        }
        g.write(" END");
    }
}

impl Render for WhenClause {
    fn render(&self, g: &mut SqlGenerator) {
        g.write("WHEN ");
        self.condition.render(g);
        g.write(" THEN ");
        self.result.render(g);
    }
}

impl Render for AliasExpr {
    fn render(&self, g: &mut SqlGenerator) {
        self.expr.render(g);
        g.write(" AS ");
        g.write(&quote_ident(&self.alias));
    }
}

impl Render for SelectItem {
    fn render(&self, g: &mut SqlGenerator) {
        match self {
            SelectItem::Expr(e) => e.render(g),
            SelectItem::Aliased(a) => a.render(g),
        }
    }
}

impl Render for OrderBy {
    fn render(&self, g: &mut SqlGenerator) {
        self.expr.render(g);
        g.write(" ");
        g.write(self.dir.as_str());
    }
}

impl Render for TableExpr {
    fn render(&self, g: &mut SqlGenerator) {
        match self {
            TableExpr::Table(t) => t.render(g),
            TableExpr::Join(j) => j.render(g),
        }
    }
}

impl Render for JoinExpr {
    fn render(&self, g: &mut SqlGenerator) {
        self.left().render(g);
        g.write(" ");
        g.write(self.kind().as_str());
        g.write(" ");
        self.right().render(g);
        if let Some(condition) = self.condition() {
            g.write(" ON ");
            condition.render(g);
        }
    }
}

impl Render for SelectStmt {
    fn render(&self, g: &mut SqlGenerator) {
        g.write("SELECT ");
        if self.distinct {
            g.write("DISTINCT ");
        }
        g.list(&self.select_list, ", ");

        if let Some(from) = &self.from {
            g.write(" FROM ");
            from.render(g);
        }

        if let Some(where_) = &self.where_ {
            g.write(" WHERE ");
            where_.render(g);
        }

        if !self.group_by.is_empty() {
            g.write(" GROUP BY ");
            g.list(&self.group_by, ", ");
        }

        if let Some(having) = &self.having {
            g.write(" HAVING ");
            having.render(g);
        }

        if !self.order_by.is_empty() {
            g.write(" ORDER BY ");
            g.list(&self.order_by, ", ");
        }

        if let Some(limit) = &self.limit {
            g.write(" LIMIT ");
            limit.render(g);
        }

        if let Some(offset) = &self.offset {
            g.write(" OFFSET ");
            offset.render(g);
        }
    }
}

impl Render for InsertStmt {
    fn render(&self, g: &mut SqlGenerator) {
        g.write("INSERT INTO ");
        self.table.render(g);
        g.write(" ");

        // DEFAULT VALUES short-circuits the rest of the statement. The
        // leading double space is kept verbatim: downstream consumers compare
        // this text byte-wise.
        if self.default_values {
            g.write(" DEFAULT VALUES");
            return;
        }

        if !self.columns.is_empty() {
            g.write("(");
            for (i, col) in self.columns.iter().enumerate() {
                if i > 0 {
                    g.write(", ");
                }
                // bare column names, qualification ignored
                g.write(&quote_ident(col.name()));
            }
            g.write(") ");
        }

        if !self.values.is_empty() {
            g.write("VALUES ");
            g.list(&self.values, ", ");
        }

        render_returning(g, &self.returning);
    }
}

impl Render for UpdateStmt {
    fn render(&self, g: &mut SqlGenerator) {
        g.write("UPDATE ");
        self.table().render(g);
        g.write(" SET ");

        for (i, assignment) in self.assignments().iter().enumerate() {
            if i > 0 {
                g.write(", ");
            }
            assignment.column.render(g);
            g.write(" = ");
            assignment.value.render(g);
        }

        if let Some(where_) = self.condition() {
            g.write(" WHERE ");
            where_.render(g);
        }

        render_returning(g, self.return_list());
    }
}

impl Render for DeleteStmt {
    fn render(&self, g: &mut SqlGenerator) {
        g.write("DELETE FROM ");
        self.table.render(g);

        if let Some(where_) = &self.where_ {
            g.write(" WHERE ");
            where_.render(g);
        }

        render_returning(g, &self.returning);
    }
}

impl Render for Stmt {
    fn render(&self, g: &mut SqlGenerator) {
        match self {
            Stmt::Select(s) => s.render(g),
            Stmt::Insert(s) => s.render(g),
            Stmt::Update(s) => s.render(g),
            Stmt::Delete(s) => s.render(g),
        }
    }
}

fn render_returning(g: &mut SqlGenerator, returning: &[Expr]) {
    if returning.is_empty() {
        return;
    }
    g.write(" RETURNING ");
    g.list(returning, ", ");
}

// ============================================================================
// Convenience entry point
// ============================================================================

/// Render a node with a fresh generator, returning SQL and parameter slots.
pub fn render(node: &impl Render) -> RenderedSql {
    let mut g = SqlGenerator::new();
    let sql = g.generate(node);
    RenderedSql {
        sql,
        params: g.params().to_vec(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{CmpOp, LikeOp};

    #[test]
    fn test_param_slots() {
        let users = TableRef::new("users").unwrap().shared();
        let stmt = SelectStmt::new()
            .item(Expr::column("id").unwrap())
            .from(&users)
            .where_(
                Expr::column("handle")
                    .unwrap()
                    .eq(Expr::param("handle"))
                    .and(Expr::column("status").unwrap().eq(Expr::param("status"))),
            );

        let result = render(&stmt);
        assert_eq!(
            result.sql,
            "SELECT \"id\" FROM \"users\" WHERE \"handle\" = $1 AND \"status\" = $2"
        );
        assert_eq!(
            result.params,
            vec![Some("handle".to_owned()), Some("status".to_owned())]
        );
    }

    #[test]
    fn test_named_param_deduplication() {
        // the same name reuses its slot, across clauses
        let users = TableRef::new("users").unwrap().shared();
        let stmt = SelectStmt::new()
            .item(Expr::column("id").unwrap())
            .from(&users)
            .where_(
                Expr::column("a")
                    .unwrap()
                    .eq(Expr::param("x"))
                    .and(Expr::column("b").unwrap().eq(Expr::param("x"))),
            );

        let result = render(&stmt);
        assert!(result.sql.contains("\"a\" = $1 AND \"b\" = $1"));
        assert_eq!(result.params, vec![Some("x".to_owned())]);
    }

    #[test]
    fn test_positional_params_take_fresh_slots() {
        let users = TableRef::new("users").unwrap().shared();
        let stmt = SelectStmt::new()
            .item(Expr::column("id").unwrap())
            .from(&users)
            .where_(
                Expr::column("a")
                    .unwrap()
                    .eq(Expr::positional())
                    .and(Expr::column("b").unwrap().eq(Expr::positional())),
            );

        let result = render(&stmt);
        assert!(result.sql.contains("\"a\" = $1 AND \"b\" = $2"));
        assert_eq!(result.params, vec![None, None]);
    }

    #[test]
    fn test_generator_resets_between_calls() {
        let mut g = SqlGenerator::new();
        let expr = Expr::column("a").unwrap().eq(Expr::param("a"));

        let first = g.generate(&expr);
        let second = g.generate(&expr);
        assert_eq!(first, second);
        assert_eq!(first, "\"a\" = $1");
        assert_eq!(g.params(), &[Some("a".to_owned())]);
    }

    #[test]
    fn test_unary_spacing() {
        let mut g = SqlGenerator::new();
        let neg = Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(Expr::column("n").unwrap()),
        };
        assert_eq!(g.generate(&neg), "-\"n\"");

        let not = Expr::column("active").unwrap().negate();
        assert_eq!(g.generate(&not), "NOT \"active\"");
    }

    #[test]
    fn test_no_implicit_parens() {
        // nested expressions render exactly as structured
        let expr = Expr::column("a")
            .unwrap()
            .arith(crate::ArithOp::Add, Expr::column("b").unwrap())
            .arith(crate::ArithOp::Mul, 2i64);
        let mut g = SqlGenerator::new();
        assert_eq!(g.generate(&expr), "\"a\" + \"b\" * 2");

        let grouped = Expr::column("a")
            .unwrap()
            .arith(crate::ArithOp::Add, Expr::column("b").unwrap())
            .paren()
            .arith(crate::ArithOp::Mul, 2i64);
        assert_eq!(g.generate(&grouped), "(\"a\" + \"b\") * 2");
    }

    #[test]
    fn test_comparison_operator_text() {
        let mut g = SqlGenerator::new();
        for (op, text) in [
            (CmpOp::Eq, "="),
            (CmpOp::Ne, "<>"),
            (CmpOp::Lt, "<"),
            (CmpOp::Le, "<="),
            (CmpOp::Gt, ">"),
            (CmpOp::Ge, ">="),
        ] {
            let expr = Expr::column("a").unwrap().compare(op, 1i64);
            assert_eq!(g.generate(&expr), format!("\"a\" {text} 1"));
        }
    }

    #[test]
    fn test_like_escape() {
        let like = LikeExpr::new(
            LikeOp::Like,
            Expr::column("name").unwrap(),
            Expr::from("J!%"),
            Some(Expr::from("!")),
            true,
        )
        .unwrap();
        let mut g = SqlGenerator::new();
        assert_eq!(g.generate(&like), "\"name\" NOT LIKE 'J!%' ESCAPE '!'");
    }

    #[test]
    fn test_case_expression() {
        let case = CaseExpr::new(
            Expr::column("status").unwrap(),
            vec![
                WhenClause::new("active", 1i64),
                WhenClause::new("archived", 2i64),
            ],
            Some(Expr::from(0i64)),
        )
        .unwrap();
        let mut g = SqlGenerator::new();
        assert_eq!(
            g.generate(&case),
            "CASE \"status\" WHEN 'active' THEN 1 WHEN 'archived' THEN 2 ELSE 0 END"
        );
    }
}
