//! Canonical query text, compact and pretty.
//!
//! Pretty layouts are pinned with insta inline snapshots.
//! Run `cargo insta review` to review changes.

mod common;

use common::*;
use insta::assert_snapshot;
use sqlobjects::ast::*;
use sqlobjects::{SqlObject, SqlObjectError, SqlObjectKind, pretty_print, serialize};

use SqlBinaryScalarOperatorKind as Op;
use SqlUnaryScalarOperatorKind as UnOp;

fn text(node: impl Into<SqlObject>) -> String {
    serialize(&node.into()).unwrap()
}

#[test]
fn select_star_from_c_ends_with_separator() {
    assert_eq!(text(select_star_from_c()), "SELECT * FROM c ");
}

#[test]
fn program_renders_its_query() {
    assert_eq!(text(SqlProgram::new(select_star_from_c())), "SELECT * FROM c ");
}

#[test]
fn value_query_with_filter() {
    assert_eq!(text(name_by_age_query()), "SELECT VALUE c.name FROM c WHERE (c.age = 5) ");
}

#[test]
fn string_literal_escapes_quote() {
    assert_eq!(text(SqlStringLiteral::new("say \"hi\"")), "\"say \\\"hi\\\"\"");
    assert_eq!(text(SqlStringLiteral::new("tab\there")), "\"tab\\there\"");
}

#[test]
fn scalar_expression_forms() {
    let c = |name: &str| prop(ident("c"), name);
    assert_eq!(text(binary(Op::StringConcat, c("a"), string("b"))), "(c.a || \"b\")");
    assert_eq!(text(SqlScalarExpression::unary(UnOp::Not, c("done"))), "(NOT c.done)");
    assert_eq!(text(SqlScalarExpression::unary(UnOp::Minus, num(3))), "(- 3)");
    assert_eq!(
        text(SqlScalarExpression::Between(SqlBetweenScalarExpression {
            expression: Box::new(c("age")),
            start_inclusive: Box::new(num(18)),
            end_inclusive: Box::new(num(65)),
            not: true,
        })),
        "(c.age NOT BETWEEN 18 AND 65)"
    );
    assert_eq!(
        text(SqlScalarExpression::Coalesce(SqlCoalesceScalarExpression {
            left: Box::new(c("nick")),
            right: Box::new(c("name")),
        })),
        "(c.nick ?? c.name)"
    );
    assert_eq!(
        text(SqlScalarExpression::Conditional(SqlConditionalScalarExpression {
            condition: Box::new(c("vip")),
            consequent: Box::new(num(1)),
            alternative: Box::new(num(0)),
        })),
        "(c.vip ? 1 : 0)"
    );
    assert_eq!(text(SqlScalarExpression::member_indexer(c("tags"), num(0))), "c.tags[0]");
    assert_eq!(text(SqlScalarExpression::parameter_ref("@p0")), "@p0");
}

#[test]
fn in_and_like_forms() {
    let c = |name: &str| prop(ident("c"), name);
    assert_eq!(
        text(SqlScalarExpression::In(SqlInScalarExpression {
            needle: Box::new(c("state")),
            not: false,
            haystack: vec![string("WA"), string("OR")],
        })),
        "(c.state IN (\"WA\", \"OR\"))"
    );
    assert_eq!(
        text(SqlScalarExpression::In(SqlInScalarExpression {
            needle: Box::new(c("state")),
            not: true,
            haystack: vec![string("WA")],
        })),
        "(c.state NOT IN (\"WA\"))"
    );
    assert_eq!(
        text(SqlScalarExpression::Like(SqlLikeScalarExpression {
            expression: Box::new(c("name")),
            pattern: Box::new(string("a!%%")),
            not: true,
            escape_sequence: Some(SqlStringLiteral::new("!")),
        })),
        "(c.name NOT LIKE \"a!%%\" ESCAPE \"!\")"
    );
}

#[test]
fn constructors_and_calls() {
    assert_eq!(text(SqlScalarExpression::array_create(vec![])), "[]");
    assert_eq!(text(SqlScalarExpression::array_create(vec![num(1)])), "[1]");
    assert_eq!(text(SqlScalarExpression::array_create(vec![num(1), num(2.5)])), "[1, 2.5]");
    assert_eq!(text(SqlScalarExpression::object_create(vec![])), "{}");
    assert_eq!(text(object_create(&[("a", 1), ("b", 2)])), "{\"a\": 1, \"b\": 2}");
    assert_eq!(text(SqlScalarExpression::function_call("GetCurrentTimestamp", vec![], false)), "GetCurrentTimestamp()");
    assert_eq!(text(SqlScalarExpression::function_call("tax", vec![num(10)], true)), "udf.tax(10)");
}

#[test]
fn literals() {
    assert_eq!(text(SqlNullLiteral), "null");
    assert_eq!(text(SqlUndefinedLiteral), "undefined");
    assert_eq!(text(SqlBooleanLiteral::TRUE), "true");
    assert_eq!(text(SqlNumberLiteral::new(1e21)), "1E+21");
    assert_eq!(text(SqlNumberLiteral::new(-0.5)), "-0.5");
    assert_eq!(text(SqlObjectLiteral::new(serde_json::json!({"a": [1, null]}))), "{\"a\":[1,null]}");
}

#[test]
fn subqueries() {
    let inner = select_star_from_c();
    assert_eq!(
        text(SqlScalarExpression::Exists(SqlExistsScalarExpression { query: Box::new(inner.clone()) })),
        "EXISTS(SELECT * FROM c )"
    );
    assert_eq!(
        text(SqlScalarExpression::Array(SqlArrayScalarExpression { query: Box::new(inner.clone()) })),
        "ARRAY(SELECT * FROM c )"
    );
    assert_eq!(text(SqlScalarExpression::subquery(inner)), "(SELECT * FROM c )");
}

#[test]
fn collections_and_paths() {
    let children = SqlPathExpression::Identifier(SqlIdentifierPathExpression::new(None, SqlIdentifier::new("children")));
    let first = SqlPathExpression::Number(SqlNumberPathExpression::new(Some(children.clone()), SqlNumberLiteral::new(0)));
    let named = SqlPathExpression::String(SqlStringPathExpression::new(Some(children), SqlStringLiteral::new("k")));

    assert_eq!(text(SqlInputPathCollection::new("c", Some(first))), "c.children[0]");
    assert_eq!(text(SqlInputPathCollection::new("c", Some(named))), "c.children[\"k\"]");

    let families = SqlCollectionExpression::aliased(SqlInputPathCollection::new("Families", None), Some("f"));
    let kids = SqlCollectionExpression::array_iterator(
        "ch",
        SqlInputPathCollection::new(
            "f",
            Some(SqlPathExpression::Identifier(SqlIdentifierPathExpression::new(None, SqlIdentifier::new("children")))),
        ),
    );
    let join = SqlCollectionExpression::join(families, kids);
    assert_eq!(
        text(SqlQuery::new(SqlSelectClause::star()).with_from(SqlFromClause::new(join))),
        "SELECT * FROM Families AS f JOIN ch IN f.children "
    );

    let sub = SqlCollectionExpression::aliased(SqlSubqueryCollection::new(select_star_from_c()), Some("s"));
    assert_eq!(text(SqlFromClause::new(sub)), "FROM (SELECT * FROM c ) AS s");
}

#[test]
fn full_query_clause_order() {
    let c = |name: &str| prop(ident("c"), name);
    let query = SqlQuery::new(SqlSelectClause::new(
        SqlSelectListSpec {
            items: vec![SqlSelectItem::new(c("city"), None), SqlSelectItem::new(c("n"), Some("total"))],
        },
        Some(SqlTopSpec::new(num(10))),
        true,
    ))
    .with_from(from("c"))
    .with_where(SqlWhereClause::new(binary(Op::GreaterThan, c("n"), num(1))))
    .with_group_by(SqlGroupByClause::new(vec![c("city"), c("n")]))
    .with_order_by(SqlOrderByClause::new(vec![
        SqlOrderByItem::new(c("city"), false),
        SqlOrderByItem::new(c("n"), true),
    ]))
    .with_offset_limit(SqlOffsetLimitClause::new(SqlOffsetSpec::new(num(5)), SqlLimitSpec::new(num(10))));

    assert_eq!(
        text(query),
        "SELECT DISTINCT TOP 10 c.city, c.n AS total FROM c WHERE (c.n > 1) GROUP BY c.city, c.n \
         ORDER BY c.city ASC, c.n DESC OFFSET 5 LIMIT 10 "
    );
}

#[test]
fn empty_lists_are_rejected() {
    let empty_select = SqlQuery::new(SqlSelectClause::new(SqlSelectListSpec { items: vec![] }, None, false));
    let err = serialize(&empty_select).unwrap_err();
    assert!(matches!(err, SqlObjectError::EmptyList { kind: SqlObjectKind::SelectListSpec }));

    let empty_group = select_star_from_c().with_group_by(SqlGroupByClause::new(vec![]));
    assert!(matches!(
        serialize(&empty_group).unwrap_err(),
        SqlObjectError::EmptyList { kind: SqlObjectKind::GroupByClause }
    ));

    let empty_order = select_star_from_c().with_order_by(SqlOrderByClause::new(vec![]));
    assert!(matches!(
        pretty_print(&empty_order).unwrap_err(),
        SqlObjectError::EmptyList { kind: SqlObjectKind::OrderByClause }
    ));
}

#[test]
fn pretty_query() {
    let c = |name: &str| prop(ident("c"), name);
    let query = SqlQuery::new(SqlSelectClause::new(
        SqlSelectListSpec { items: vec![SqlSelectItem::new(c("id"), None), SqlSelectItem::new(c("name"), None)] },
        None,
        false,
    ))
    .with_from(from("c"))
    .with_where(SqlWhereClause::new(binary(Op::GreaterThan, c("age"), num(21))))
    .with_order_by(SqlOrderByClause::new(vec![SqlOrderByItem::new(c("name"), false)]));

    assert_snapshot!(pretty_print(&query).unwrap(), @r"
SELECT
    c.id,
    c.name
FROM c
WHERE (c.age > 21)
ORDER BY c.name ASC
");
}

#[test]
fn pretty_nested_subquery() {
    let inner = SqlQuery::new(SqlSelectClause::value(prop(ident("t"), "name")))
        .with_from(from("t"));
    let query = select_star_from_c().with_where(SqlWhereClause::new(SqlScalarExpression::Exists(
        SqlExistsScalarExpression { query: Box::new(inner) },
    )));

    assert_snapshot!(pretty_print(&query).unwrap(), @r"
SELECT *
FROM c
WHERE EXISTS(
    SELECT VALUE t.name
    FROM t
)
");
}

#[test]
fn pretty_and_compact_share_tokens() {
    let query = name_by_age_query();
    let compact: Vec<String> = text(query.clone()).split_whitespace().map(String::from).collect();
    let pretty: Vec<String> = pretty_print(&query).unwrap().split_whitespace().map(String::from).collect();
    assert_eq!(compact, pretty);
}
