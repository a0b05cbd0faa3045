//! Property tests for the rendering contracts: determinism, quoting,
//! escaping, negation symmetry, and clause presence.

use proptest::prelude::*;
use quern_ast::*;

/// Generate a random identifier (no embedded double quotes).
fn arb_ident() -> BoxedStrategy<String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_ ]{0,11}")
        .expect("valid regex")
        .boxed()
}

/// Generate a random literal expression.
fn arb_literal() -> BoxedStrategy<Expr> {
    prop_oneof![
        Just(Expr::Literal(Literal::Null)),
        any::<bool>().prop_map(Expr::from),
        any::<i64>().prop_map(Expr::from),
        "[a-zA-Z0-9' ]{0,16}".prop_map(|s| Expr::from(s.as_str())),
    ]
    .boxed()
}

/// Generate a random expression of bounded depth.
fn arb_expr(depth: u32) -> BoxedStrategy<Expr> {
    if depth == 0 {
        prop_oneof![
            arb_literal(),
            arb_ident().prop_map(|name| Expr::column(name).expect("non-empty ident")),
        ]
        .boxed()
    } else {
        prop_oneof![
            4 => arb_expr(0),
            2 => (arb_expr(depth - 1), arb_expr(depth - 1))
                .prop_map(|(l, r)| l.eq(r)),
            2 => (arb_expr(depth - 1), arb_expr(depth - 1))
                .prop_map(|(l, r)| l.and(r)),
            1 => arb_expr(depth - 1).prop_map(Expr::paren),
            1 => arb_expr(depth - 1).prop_map(Expr::negate),
            1 => arb_expr(depth - 1).prop_map(Expr::is_null),
            1 => (arb_expr(depth - 1), arb_literal(), arb_literal())
                .prop_map(|(e, lo, hi)| e.between(lo, hi)),
            1 => (arb_expr(depth - 1), proptest::collection::vec(arb_literal(), 1..4))
                .prop_map(|(e, items)| e.in_list(ValueList(items))),
            1 => (arb_ident(), proptest::collection::vec(arb_expr(0), 0..3))
                .prop_map(|(name, args)| Expr::fn_call(name, args)),
        ]
        .boxed()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn rendering_is_deterministic(expr in arb_expr(3)) {
        let mut g = SqlGenerator::new();
        let first = g.generate(&expr);
        let second = g.generate(&expr);
        prop_assert_eq!(&first, &second);

        // and across generators
        let mut other = SqlGenerator::new();
        prop_assert_eq!(first, other.generate(&expr));
    }

    #[test]
    fn identifiers_are_wrapped_in_double_quotes(name in "[a-zA-Z_][a-zA-Z0-9_ ]{0,11}") {
        let quoted = quote_ident(&name);
        prop_assert_eq!(quoted, format!("\"{name}\""));

        let mut g = SqlGenerator::new();
        let col = Expr::column(name.clone()).expect("non-empty");
        prop_assert_eq!(g.generate(&col), format!("\"{name}\""));
    }

    #[test]
    fn embedded_double_quotes_are_doubled(name in "[a-z\"]{1,12}") {
        let quoted = quote_ident(&name);
        let inner = &quoted[1..quoted.len() - 1];
        let source_quotes = name.matches('"').count();
        prop_assert_eq!(inner.matches('"').count(), source_quotes * 2);
    }

    #[test]
    fn string_escaping_doubles_single_quotes(s in "[a-z' ]{0,20}") {
        let escaped = escape_string(&s);
        let n = s.matches('\'').count();
        // 2n inside the body plus the two delimiters
        prop_assert_eq!(escaped.matches('\'').count(), 2 * n + 2);
        prop_assert!(escaped.starts_with('\''));
        prop_assert!(escaped.ends_with('\''));
    }

    #[test]
    fn between_negation_inserts_not(e in arb_expr(1), lo in arb_literal(), hi in arb_literal()) {
        let plain = Expr::Between {
            expr: Box::new(e.clone()),
            lower: Box::new(lo.clone()),
            upper: Box::new(hi.clone()),
            negated: false,
        };
        let negated = Expr::Between {
            expr: Box::new(e.clone()),
            lower: Box::new(lo),
            upper: Box::new(hi),
            negated: true,
        };

        let mut g = SqlGenerator::new();
        let prefix = g.generate(&e);
        let plain_sql = g.generate(&plain);
        let negated_sql = g.generate(&negated);

        // NOT goes right after the tested expression, rest is unchanged
        let tail = plain_sql
            .strip_prefix(&format!("{prefix} BETWEEN "))
            .expect("plain form");
        prop_assert_eq!(negated_sql, format!("{prefix} NOT BETWEEN {tail}"));
    }

    #[test]
    fn in_negation_inserts_not(e in arb_expr(1), items in proptest::collection::vec(arb_literal(), 1..4)) {
        let plain = Expr::In {
            expr: Box::new(e.clone()),
            list: ValueList(items.clone()),
            negated: false,
        };
        let negated = Expr::In {
            expr: Box::new(e.clone()),
            list: ValueList(items),
            negated: true,
        };

        let mut g = SqlGenerator::new();
        let prefix = g.generate(&e);
        let plain_sql = g.generate(&plain);
        let negated_sql = g.generate(&negated);

        let tail = plain_sql
            .strip_prefix(&format!("{prefix} IN "))
            .expect("plain form");
        prop_assert_eq!(negated_sql, format!("{prefix} NOT IN {tail}"));
    }

    #[test]
    fn is_negation_inserts_not(e in arb_expr(1), v in arb_literal()) {
        let plain = Expr::Is {
            left: Box::new(e.clone()),
            right: Box::new(v.clone()),
            negated: false,
        };
        let negated = Expr::Is {
            left: Box::new(e.clone()),
            right: Box::new(v),
            negated: true,
        };

        let mut g = SqlGenerator::new();
        let prefix = g.generate(&e);
        let plain_sql = g.generate(&plain);
        let negated_sql = g.generate(&negated);

        let tail = plain_sql
            .strip_prefix(&format!("{prefix} IS "))
            .expect("plain form");
        prop_assert_eq!(negated_sql, format!("{prefix} IS NOT {tail}"));
    }

    #[test]
    fn like_negation_inserts_not(pattern in "[a-z%]{1,8}") {
        let make = |negated| {
            LikeExpr::new(
                LikeOp::Like,
                Expr::column("name").expect("non-empty"),
                Expr::from(pattern.as_str()),
                None,
                negated,
            )
            .expect("no escape")
        };

        let mut g = SqlGenerator::new();
        let plain_sql = g.generate(&make(false));
        let negated_sql = g.generate(&make(true));
        prop_assert_eq!(negated_sql, plain_sql.replacen(" LIKE ", " NOT LIKE ", 1));
    }

    #[test]
    fn omitting_a_clause_removes_exactly_its_tokens(where_on in any::<bool>(), limit_on in any::<bool>()) {
        let users = TableRef::new("users").expect("non-empty").shared();
        let mut stmt = SelectStmt::new()
            .item(Expr::column("id").expect("non-empty"))
            .from(&users);
        if where_on {
            stmt = stmt.where_(Expr::column("active").expect("non-empty").eq(true));
        }
        if limit_on {
            stmt = stmt.limit(10i64);
        }

        let mut expected = String::from("SELECT \"id\" FROM \"users\"");
        if where_on {
            expected.push_str(" WHERE \"active\" = TRUE");
        }
        if limit_on {
            expected.push_str(" LIMIT 10");
        }

        let mut g = SqlGenerator::new();
        prop_assert_eq!(g.generate(&stmt), expected);
    }
}
