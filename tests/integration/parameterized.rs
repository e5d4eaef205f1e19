//! Parameterized rendering: bound literals become parameter names.

mod common;

use common::*;
use serde_json::{Value, json};
use sqlobjects::ast::*;
use sqlobjects::{ParameterBindings, serialize, serialize_parameterized};

use SqlBinaryScalarOperatorKind as Op;

fn bindings(pairs: &[(Value, &str)]) -> ParameterBindings {
    pairs.iter().map(|(value, name)| (value.clone(), *name)).collect()
}

#[test]
fn bound_number_is_replaced() {
    let params = bindings(&[(json!(5), "@age")]);
    assert_eq!(
        serialize_parameterized(&name_by_age_query(), &params).unwrap(),
        "SELECT VALUE c.name FROM c WHERE (c.age = @age) "
    );
}

#[test]
fn number_match_is_by_value() {
    let params = bindings(&[(json!(5.0), "@age")]);
    assert_eq!(serialize_parameterized(&num(5), &params).unwrap(), "@age");
    let params = bindings(&[(json!(5), "@age")]);
    assert_eq!(serialize_parameterized(&num(5.0), &params).unwrap(), "@age");
}

#[test]
fn unbound_literals_render_normally() {
    let params = bindings(&[(json!("Seattle"), "@city")]);
    let filter = binary(Op::And, binary(Op::Equal, prop(ident("c"), "city"), string("Portland")), SqlScalarExpression::literal(SqlLiteral::boolean(true)));
    assert_eq!(serialize_parameterized(&filter, &params).unwrap(), serialize(&filter).unwrap());
}

#[test]
fn strings_booleans_and_objects_are_replaced() {
    let params = bindings(&[
        (json!("Seattle"), "@city"),
        (json!(true), "@flag"),
        (json!({"zip": "98052"}), "@address"),
    ]);
    let filter = binary(
        Op::And,
        binary(Op::Equal, prop(ident("c"), "city"), string("Seattle")),
        binary(
            Op::Or,
            SqlScalarExpression::literal(SqlLiteral::boolean(true)),
            binary(
                Op::Equal,
                prop(ident("c"), "address"),
                SqlScalarExpression::literal(SqlObjectLiteral::new(json!({"zip": "98052"}))),
            ),
        ),
    );
    assert_eq!(
        serialize_parameterized(&filter, &params).unwrap(),
        "((c.city = @city) AND (@flag OR (c.address = @address)))"
    );
}

#[test]
fn string_key_does_not_match_number_literal() {
    let params = bindings(&[(json!("5"), "@text")]);
    assert_eq!(serialize_parameterized(&num(5), &params).unwrap(), "5");
}

#[test]
fn null_and_undefined_are_never_replaced() {
    let params = bindings(&[(Value::Null, "@nothing")]);
    assert_eq!(serialize_parameterized(&SqlNullLiteral, &params).unwrap(), "null");
    assert_eq!(serialize_parameterized(&SqlUndefinedLiteral, &params).unwrap(), "undefined");
}

#[test]
fn identifiers_are_not_literals() {
    let params = bindings(&[(json!("age"), "@p")]);
    assert_eq!(serialize_parameterized(&prop(ident("c"), "age"), &params).unwrap(), "c.age");
}

#[test]
fn later_binding_for_same_value_wins() {
    let mut params = ParameterBindings::new();
    params.insert(json!("x1"), "@first");
    let previous = params.insert(json!("x1"), "@second");
    assert_eq!(previous.as_deref(), Some("@first"));
    assert_eq!(serialize_parameterized(&string("x1"), &params).unwrap(), "@second");
}
