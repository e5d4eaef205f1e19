//! Obfuscation of whole trees: shape preservation, session memoization,
//! exemptions, and the scrubbing of paging values.

mod common;

use common::*;
use sqlobjects::ast::*;
use sqlobjects::visit::walk::node_kinds;
use sqlobjects::{Number64, Obfuscator, SqlObject, equals, obfuscate, serialize};

use SqlBinaryScalarOperatorKind as Op;

fn paged_query() -> SqlQuery {
    SqlQuery::new(SqlSelectClause::new(SqlSelectSpec::Star(SqlSelectStarSpec), Some(SqlTopSpec::new(num(5))), true))
        .with_from(from("c"))
        .with_offset_limit(SqlOffsetLimitClause::new(SqlOffsetSpec::new(num(20)), SqlLimitSpec::new(num(10))))
}

#[test]
fn top_spec_is_scrubbed_to_zero() {
    let out = obfuscate(&SqlTopSpec::new(num(5))).unwrap();
    assert_eq!(out, SqlObject::from(SqlTopSpec::new(num(0))));
}

#[test]
fn offset_and_limit_are_scrubbed() {
    let out = obfuscate(&paged_query()).unwrap();
    assert_eq!(serialize(&out).unwrap(), "SELECT DISTINCT TOP 0 * FROM c OFFSET 0 LIMIT 0 ");
}

#[test]
fn string_and_short_literals() {
    assert_eq!(obfuscate(&SqlStringLiteral::new("id")).unwrap(), SqlObject::from(SqlStringLiteral::new("id")));
    assert_eq!(obfuscate(&SqlStringLiteral::new("a")).unwrap(), SqlObject::from(SqlStringLiteral::new("a")));
    assert_eq!(obfuscate(&SqlNumberLiteral::new(42)).unwrap(), SqlObject::from(SqlNumberLiteral::new(42)));
    assert_eq!(
        obfuscate(&SqlStringLiteral::new("secret")).unwrap(),
        SqlObject::from(SqlStringLiteral::new("str1"))
    );
}

#[test]
fn shape_is_preserved() {
    let query = name_by_age_query()
        .with_order_by(SqlOrderByClause::new(vec![SqlOrderByItem::new(prop(ident("c"), "lastName"), true)]));
    let obfuscated = obfuscate(&query).unwrap();
    assert_eq!(node_kinds(&query), node_kinds(&obfuscated));
}

#[test]
fn same_value_maps_to_same_replacement_within_a_session() {
    let filter = binary(
        Op::Or,
        binary(Op::Equal, prop(ident("c"), "city"), string("Seattle")),
        binary(Op::Equal, prop(ident("c"), "town"), string("Seattle")),
    );
    let out = serialize(&obfuscate(&filter).unwrap()).unwrap();
    assert_eq!(out, "((c.ident1 = \"str1\") OR (c.ident2 = \"str1\"))");
}

#[test]
fn session_is_reused_across_calls() {
    let mut session = Obfuscator::new();
    let first = session.obfuscate(&string("Seattle")).unwrap();
    let second = session.obfuscate(&string("Seattle")).unwrap();
    let third = session.obfuscate(&string("Portland")).unwrap();
    assert!(equals(&first, &second));
    assert!(!equals(&first, &third));
    assert_eq!(session.sequences().strings, 2);
}

#[test]
fn fresh_sessions_are_independent() {
    let a = obfuscate(&string("Portland")).unwrap();
    let b = obfuscate(&string("Seattle")).unwrap();
    assert!(equals(&a, &b));
}

#[test]
fn identifiers_property_names_and_parameters_use_own_prefixes() {
    let object = SqlScalarExpression::object_create(vec![SqlObjectProperty::new(
        "customer",
        SqlScalarExpression::parameter_ref("@customer"),
    )]);
    let out = serialize(&obfuscate(&object).unwrap()).unwrap();
    assert_eq!(out, "{\"p1\": param1}");
}

#[test]
fn function_names_are_kept() {
    let call = SqlScalarExpression::function_call("CONTAINS", vec![prop(ident("c"), "description"), string("wool")], false);
    let out = serialize(&obfuscate(&call).unwrap()).unwrap();
    assert_eq!(out, "CONTAINS(c.ident1__11, \"str1\")");
}

#[test]
fn large_numbers_keep_magnitude() {
    let out = obfuscate(&SqlNumberLiteral::new(12345)).unwrap();
    let SqlObject::NumberLiteral(literal) = out else { panic!("expected a number literal") };
    assert_eq!(literal.value, Number64::Double(12346.0));
}

fn obfuscated_json(value: serde_json::Value) -> serde_json::Value {
    let out = obfuscate(&SqlObjectLiteral::new(value)).unwrap();
    let SqlObject::ObjectLiteral(literal) = out else { panic!("expected an object literal") };
    literal.value
}

#[test]
fn object_literal_scrubs_keys_and_strings() {
    assert_eq!(
        obfuscated_json(serde_json::json!({"ssn": "123-45-6789"})),
        serde_json::json!({"p1": "str1__11"})
    );
}

#[test]
fn object_literal_scalars_keep_their_json_type() {
    assert_eq!(obfuscated_json(serde_json::json!(5)), serde_json::json!(5));
    assert_eq!(obfuscated_json(serde_json::json!(true)), serde_json::json!(true));
    assert_eq!(obfuscated_json(serde_json::json!(null)), serde_json::Value::Null);
    assert_eq!(obfuscated_json(serde_json::json!(12345)), serde_json::json!(12346.0));
}

#[test]
fn object_literal_renders_like_the_original_shape() {
    let five = obfuscate(&SqlObjectLiteral::new(serde_json::json!(5))).unwrap();
    assert_eq!(serialize(&five).unwrap(), "5");
    let flag = obfuscate(&SqlObjectLiteral::new(serde_json::json!(false))).unwrap();
    assert_eq!(serialize(&flag).unwrap(), "false");
}

#[test]
fn nested_object_literal_keeps_its_structure() {
    let out = obfuscated_json(serde_json::json!({
        "address": {"street": "Main Street", "number": 1200},
        "tags": ["vip", "x", null],
    }));
    let entries = out.as_object().unwrap();
    assert_eq!(entries.len(), 2);
    let nested = entries.values().find_map(|value| value.as_object()).unwrap();
    assert_eq!(nested.len(), 2);
    assert!(nested.values().any(|value| value.is_string()));
    assert!(nested.values().any(|value| value.is_number()));
    let tags = entries.values().find_map(|value| value.as_array()).unwrap();
    assert_eq!(tags, &vec![serde_json::json!("str2"), serde_json::json!("x"), serde_json::Value::Null]);
}

#[test]
fn obfuscating_twice_is_stable_in_shape() {
    let once = obfuscate(&name_by_age_query()).unwrap();
    let twice = obfuscate(&once).unwrap();
    assert_eq!(node_kinds(&once), node_kinds(&twice));
}
