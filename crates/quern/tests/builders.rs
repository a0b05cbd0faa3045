use insta::assert_snapshot;
use quern::ast::Error;
use quern::{
    col, col_of, delete_from, func, insert_into, neg, not, param, paren, positional, render,
    select, table, update, val, BuildError,
};

#[test]
fn select_with_every_clause() {
    let users = table("users").build().unwrap();
    let stmt = select()
        .distinct()
        .columns([col("id"), col("name")])
        .from(&users)
        .where_(col("age").gte(param("min_age")))
        .group_by([col("name")])
        .having(func("count", [col("id")]).gt(1))
        .order_by([col("name").asc(), col("id").desc()])
        .limit(10)
        .offset(5)
        .build()
        .unwrap();

    let result = render(&stmt);
    assert_snapshot!(
        result.sql,
        @r#"SELECT DISTINCT "id", "name" FROM "users" WHERE "age" >= $1 GROUP BY "name" HAVING count("id") > 1 ORDER BY "name" ASC, "id" DESC LIMIT 10 OFFSET 5"#
    );
    assert_eq!(result.params, vec![Some("min_age".to_owned())]);
}

#[test]
fn select_items_can_be_aliased() {
    let users = table("users").build().unwrap();
    let stmt = select()
        .columns([col("id")])
        .column(func("count", [col("order_id")]).alias("n"))
        .from(&users)
        .build()
        .unwrap();

    assert_snapshot!(
        render(&stmt).sql,
        @r#"SELECT "id", count("order_id") AS "n" FROM "users""#
    );
}

#[test]
fn join_chain_nests_left_associatively() {
    let users = table("users").build().unwrap();
    let orders = table("orders").build().unwrap();
    let items = table("items").build().unwrap();

    let stmt = select()
        .columns([col_of(&users, "name"), col_of(&orders, "total")])
        .from(&users)
        .inner_join(&orders, col_of(&orders, "user_id").eq(col_of(&users, "id")))
        .left_join(&items, col_of(&items, "order_id").eq(col_of(&orders, "id")))
        .build()
        .unwrap();

    assert_snapshot!(
        render(&stmt).sql,
        @r#"SELECT "users"."name", "orders"."total" FROM "users" INNER JOIN "orders" ON "orders"."user_id" = "users"."id" LEFT JOIN "items" ON "items"."order_id" = "orders"."id""#
    );
}

#[test]
fn cross_join_has_no_condition() {
    let sizes = table("sizes").build().unwrap();
    let colors = table("colors").build().unwrap();
    let stmt = select()
        .columns([col_of(&sizes, "label"), col_of(&colors, "label")])
        .from(&sizes)
        .cross_join(&colors)
        .build()
        .unwrap();

    assert_snapshot!(
        render(&stmt).sql,
        @r#"SELECT "sizes"."label", "colors"."label" FROM "sizes" CROSS JOIN "colors""#
    );
}

#[test]
fn aliased_table_qualifies_columns_by_alias() {
    let orders = table("orders").schema("sales").alias("o").build().unwrap();
    let stmt = select()
        .columns([col_of(&orders, "id"), col_of(&orders, "total")])
        .from(&orders)
        .where_(col_of(&orders, "total").gt(100))
        .build()
        .unwrap();

    assert_snapshot!(
        render(&stmt).sql,
        @r#"SELECT "o"."id", "o"."total" FROM "sales"."orders" AS "o" WHERE "o"."total" > 100"#
    );
}

#[test]
fn named_params_share_a_slot_positional_do_not() {
    let t = table("t").build().unwrap();
    let stmt = select()
        .columns([col("a")])
        .from(&t)
        .where_(
            col("a")
                .eq(param("x"))
                .and(col("b").eq(param("x")))
                .or(col("c").eq(positional())),
        )
        .build()
        .unwrap();

    let result = render(&stmt);
    assert_snapshot!(
        result.sql,
        @r#"SELECT "a" FROM "t" WHERE "a" = $1 AND "b" = $1 OR "c" = $2"#
    );
    assert_eq!(result.params, vec![Some("x".to_owned()), None]);
}

#[test]
fn not_marks_the_next_negatable_predicate() {
    let t = table("t").build().unwrap();

    let stmt = select()
        .columns([col("id")])
        .from(&t)
        .where_(
            col("age")
                .not()
                .between(18, 65)
                .and(col("id").not().in_list([1, 2, 3]))
                .and(col("name").not().like("a%"))
                .and(col("deleted_at").not().is_null()),
        )
        .build()
        .unwrap();

    assert_snapshot!(
        render(&stmt).sql,
        @r#"SELECT "id" FROM "t" WHERE "age" NOT BETWEEN 18 AND 65 AND "id" NOT IN (1, 2, 3) AND "name" NOT LIKE 'a%' AND "deleted_at" IS NOT NULL"#
    );
}

#[test]
fn unary_and_grouping_entry_points() {
    let t = table("t").build().unwrap();
    let stmt = select()
        .columns([col("id")])
        .from(&t)
        .where_(
            paren(col("a").add(col("b")))
                .mul(2)
                .gt(neg(col("floor")))
                .and(not(col("hidden"))),
        )
        .build()
        .unwrap();

    assert_snapshot!(
        render(&stmt).sql,
        @r#"SELECT "id" FROM "t" WHERE ("a" + "b") * 2 > -"floor" AND NOT "hidden""#
    );
}

#[test]
fn like_family_with_escape() {
    let t = table("t").build().unwrap();
    let stmt = select()
        .columns([col("id")])
        .from(&t)
        .where_(
            col("name")
                .like_escape("J!%", "!")
                .and(col("email").ilike("%@example.com"))
                .and(col("path").glob("src/*")),
        )
        .build()
        .unwrap();

    assert_snapshot!(
        render(&stmt).sql,
        @r#"SELECT "id" FROM "t" WHERE "name" LIKE 'J!%' ESCAPE '!' AND "email" ILIKE '%@example.com' AND "path" GLOB 'src/*'"#
    );
}

#[test]
fn case_builder_round_trip() {
    let t = table("t").build().unwrap();
    let stmt = select()
        .column(
            col("status")
                .case()
                .when("active", 1)
                .when("archived", 2)
                .else_(0)
                .end()
                .alias("rank"),
        )
        .from(&t)
        .build()
        .unwrap();

    assert_snapshot!(
        render(&stmt).sql,
        @r#"SELECT CASE "status" WHEN 'active' THEN 1 WHEN 'archived' THEN 2 ELSE 0 END AS "rank" FROM "t""#
    );
}

#[test]
fn case_without_arms_is_rejected() {
    let err = col("status").case().end().build().unwrap_err();
    assert_eq!(err, BuildError::Node(Error::EmptyWhenList));
}

#[test]
fn insert_multi_row_with_returning() {
    let users = table("users").build().unwrap();
    let stmt = insert_into(&users)
        .columns(["name", "age"])
        .values([val("alice"), val(30)])
        .values([val("bob"), val(25)])
        .returning([col("id")])
        .build()
        .unwrap();

    assert_snapshot!(
        render(&stmt).sql,
        @r#"INSERT INTO "users" ("name", "age") VALUES ('alice', 30), ('bob', 25) RETURNING "id""#
    );
}

#[test]
fn insert_default_values() {
    let users = table("users").build().unwrap();
    let stmt = insert_into(&users).default_values().build().unwrap();

    // the double space before DEFAULT is part of the output contract
    assert_eq!(render(&stmt).sql, "INSERT INTO \"users\"  DEFAULT VALUES");
}

#[test]
fn update_with_set_where_returning() {
    let users = table("users").build().unwrap();
    let stmt = update(&users)
        .set("name", val("bob"))
        .set("age", 31)
        .where_(col("id").eq(param("id")))
        .returning([col("id")])
        .build()
        .unwrap();

    let result = render(&stmt);
    assert_snapshot!(
        result.sql,
        @r#"UPDATE "users" SET "name" = 'bob', "age" = 31 WHERE "id" = $1 RETURNING "id""#
    );
    assert_eq!(result.params, vec![Some("id".to_owned())]);
}

#[test]
fn delete_with_where_and_returning() {
    let users = table("users").build().unwrap();
    let stmt = delete_from(&users)
        .where_(col("id").eq(7))
        .returning([col("id"), col("name")])
        .build()
        .unwrap();

    assert_snapshot!(
        render(&stmt).sql,
        @r#"DELETE FROM "users" WHERE "id" = 7 RETURNING "id", "name""#
    );
}

#[test]
fn select_requires_a_select_list() {
    let err = select().build().unwrap_err();
    assert_eq!(err, BuildError::MissingSelectList);
}

#[test]
fn select_requires_a_from_table() {
    let err = select().columns([col("id")]).build().unwrap_err();
    assert_eq!(err, BuildError::MissingTable);
}

#[test]
fn join_before_from_is_rejected() {
    let orders = table("orders").build().unwrap();
    let err = select()
        .columns([col("id")])
        .inner_join(&orders, col("a").eq(col("b")))
        .from(&orders)
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::JoinBeforeFrom);
}

#[test]
fn update_requires_an_assignment() {
    let users = table("users").build().unwrap();
    let err = update(&users).build().unwrap_err();
    assert_eq!(err, BuildError::Node(Error::NoAssignments));
}

#[test]
fn first_error_in_a_chain_wins() {
    let t = table("t").build().unwrap();
    let err = select()
        .columns([col("").eq(1).and(col("").is_null())])
        .from(&t)
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::Node(Error::EmptyName("column")));
}

#[test]
fn empty_table_name_is_rejected() {
    let err = table("").build().unwrap_err();
    assert_eq!(err, BuildError::Node(Error::EmptyName("table")));
}
