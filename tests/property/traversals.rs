//! Property-based tests for the traversal laws.
//!
//! These tests use proptest to check equality, hashing, obfuscation, and
//! serialization against a wide variety of generated trees.

use std::collections::BTreeSet;

use proptest::prelude::*;
use proptest::strategy::ValueTree;
use proptest::test_runner::TestRunner;
use serde_json::Value;
use sqlobjects::ast::*;
use sqlobjects::visit::walk::node_kinds;
use sqlobjects::{Obfuscator, SqlObject, SqlObjectKind, equals, hash, obfuscate, pretty_print, serialize};

fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,12}".prop_map(|s| s.to_string())
}

/// Small JSON documents for object literals.
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-1_000_000i64..1_000_000).prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[ -~]{0,12}".prop_map(Value::from),
    ];
    leaf.prop_recursive(2, 12, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..3)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn arb_literal() -> impl Strategy<Value = SqlLiteral> {
    prop_oneof![
        any::<bool>().prop_map(SqlLiteral::boolean),
        Just(SqlLiteral::Null(SqlNullLiteral)),
        Just(SqlLiteral::Undefined(SqlUndefinedLiteral)),
        (-1_000_000i64..1_000_000).prop_map(SqlLiteral::number),
        (-1.0e6f64..1.0e6).prop_map(SqlLiteral::number),
        "[ -~]{0,16}".prop_map(SqlLiteral::string),
        arb_json().prop_map(|value| SqlLiteral::Object(SqlObjectLiteral::new(value))),
    ]
}

fn arb_binary_op() -> impl Strategy<Value = SqlBinaryScalarOperatorKind> {
    prop::sample::select(SqlBinaryScalarOperatorKind::ALL.to_vec())
}

fn arb_unary_op() -> impl Strategy<Value = SqlUnaryScalarOperatorKind> {
    prop::sample::select(SqlUnaryScalarOperatorKind::ALL.to_vec())
}

/// Relative paths such as `.a[3]["b c"]`.
fn arb_path() -> impl Strategy<Value = SqlPathExpression> {
    fn identifier(parent: Option<SqlPathExpression>, name: String) -> SqlPathExpression {
        SqlPathExpression::Identifier(SqlIdentifierPathExpression::new(parent, SqlIdentifier::new(name)))
    }
    fn index(parent: Option<SqlPathExpression>, value: i64) -> SqlPathExpression {
        SqlPathExpression::Number(SqlNumberPathExpression::new(parent, SqlNumberLiteral::new(value)))
    }
    fn key(parent: Option<SqlPathExpression>, value: String) -> SqlPathExpression {
        SqlPathExpression::String(SqlStringPathExpression::new(parent, SqlStringLiteral::new(value)))
    }

    let root = prop_oneof![
        arb_identifier().prop_map(|name| identifier(None, name)),
        (0i64..1_000).prop_map(|value| index(None, value)),
        "[a-z ]{1,8}".prop_map(|value| key(None, value)),
    ];
    root.prop_recursive(3, 6, 1, |parent| {
        prop_oneof![
            (parent.clone(), arb_identifier()).prop_map(|(parent, name)| identifier(Some(parent), name)),
            (parent.clone(), 0i64..1_000).prop_map(|(parent, value)| index(Some(parent), value)),
            (parent, "[a-z ]{1,8}").prop_map(|(parent, value)| key(Some(parent), value)),
        ]
    })
}

/// `SELECT VALUE <scalar> FROM <name> [WHERE <scalar>]`, used for subqueries.
fn arb_nested_query(scalar: BoxedStrategy<SqlScalarExpression>) -> impl Strategy<Value = SqlQuery> {
    (scalar.clone(), arb_identifier(), prop::option::of(scalar)).prop_map(|(value, collection, filter)| {
        let query = SqlQuery::new(SqlSelectClause::value(value)).with_from(SqlFromClause::new(
            SqlCollectionExpression::aliased(SqlInputPathCollection::new(collection, None), None),
        ));
        match filter {
            Some(filter) => query.with_where(SqlWhereClause::new(filter)),
            None => query,
        }
    })
}

fn arb_scalar() -> impl Strategy<Value = SqlScalarExpression> {
    let leaf = prop_oneof![
        arb_literal().prop_map(SqlScalarExpression::literal),
        arb_identifier().prop_map(SqlScalarExpression::identifier),
        arb_identifier().prop_map(|name| SqlScalarExpression::parameter_ref(format!("@{name}"))),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        let operators = prop_oneof![
            (arb_binary_op(), inner.clone(), inner.clone())
                .prop_map(|(op, left, right)| SqlScalarExpression::binary(op, left, right)),
            (arb_unary_op(), inner.clone()).prop_map(|(op, e)| SqlScalarExpression::unary(op, e)),
            (inner.clone(), inner.clone()).prop_map(|(left, right)| {
                SqlScalarExpression::Coalesce(SqlCoalesceScalarExpression { left: Box::new(left), right: Box::new(right) })
            }),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(|(c, a, b)| {
                SqlScalarExpression::Conditional(SqlConditionalScalarExpression {
                    condition: Box::new(c),
                    consequent: Box::new(a),
                    alternative: Box::new(b),
                })
            }),
            (inner.clone(), inner.clone(), inner.clone(), any::<bool>()).prop_map(|(e, start, end, not)| {
                SqlScalarExpression::Between(SqlBetweenScalarExpression {
                    expression: Box::new(e),
                    start_inclusive: Box::new(start),
                    end_inclusive: Box::new(end),
                    not,
                })
            }),
            (inner.clone(), prop::collection::vec(inner.clone(), 1..4), any::<bool>()).prop_map(
                |(needle, haystack, not)| {
                    SqlScalarExpression::In(SqlInScalarExpression { needle: Box::new(needle), not, haystack })
                }
            ),
            (inner.clone(), inner.clone(), any::<bool>(), prop::option::of("[!#^]")).prop_map(
                |(e, pattern, not, escape)| {
                    SqlScalarExpression::Like(SqlLikeScalarExpression {
                        expression: Box::new(e),
                        pattern: Box::new(pattern),
                        not,
                        escape_sequence: escape.map(SqlStringLiteral::new),
                    })
                }
            ),
        ];
        let access = prop_oneof![
            (inner.clone(), arb_identifier())
                .prop_map(|(member, name)| SqlScalarExpression::property_ref(Some(member), name)),
            (inner.clone(), inner.clone()).prop_map(|(m, i)| SqlScalarExpression::member_indexer(m, i)),
            prop::collection::vec(inner.clone(), 0..4).prop_map(SqlScalarExpression::array_create),
            prop::collection::vec((arb_identifier(), inner.clone()), 0..4).prop_map(|props| {
                SqlScalarExpression::object_create(
                    props.into_iter().map(|(name, value)| SqlObjectProperty::new(name, value)).collect(),
                )
            }),
            (arb_identifier(), prop::collection::vec(inner.clone(), 0..3), any::<bool>())
                .prop_map(|(name, args, udf)| SqlScalarExpression::function_call(name, args, udf)),
        ];
        let subqueries = prop_oneof![
            arb_nested_query(inner.clone())
                .prop_map(|query| SqlScalarExpression::Exists(SqlExistsScalarExpression { query: Box::new(query) })),
            arb_nested_query(inner.clone())
                .prop_map(|query| SqlScalarExpression::Array(SqlArrayScalarExpression { query: Box::new(query) })),
            arb_nested_query(inner).prop_map(SqlScalarExpression::subquery),
        ];
        prop_oneof![3 => operators, 3 => access, 1 => subqueries]
    })
}

fn arb_select_item() -> impl Strategy<Value = SqlSelectItem> {
    (arb_scalar(), prop::option::of(arb_identifier()))
        .prop_map(|(expr, alias)| SqlSelectItem::new(expr, alias.as_deref()))
}

fn arb_select_clause() -> impl Strategy<Value = SqlSelectClause> {
    let spec = prop_oneof![
        Just(SqlSelectSpec::Star(SqlSelectStarSpec)),
        arb_scalar().prop_map(|expression| SqlSelectSpec::Value(SqlSelectValueSpec { expression })),
        prop::collection::vec(arb_select_item(), 1..4).prop_map(|items| SqlSelectSpec::List(SqlSelectListSpec { items })),
    ];
    (spec, prop::option::of(arb_scalar()), any::<bool>())
        .prop_map(|(spec, top, distinct)| SqlSelectClause::new(spec, top.map(SqlTopSpec::new), distinct))
}

fn arb_collection() -> impl Strategy<Value = SqlCollection> {
    prop_oneof![
        3 => (arb_identifier(), prop::option::of(arb_path()))
            .prop_map(|(input, path)| SqlCollection::InputPath(SqlInputPathCollection::new(input, path))),
        1 => arb_nested_query(arb_scalar().boxed())
            .prop_map(|query| SqlCollection::Subquery(SqlSubqueryCollection::new(query))),
    ]
}

fn arb_collection_expression() -> impl Strategy<Value = SqlCollectionExpression> {
    let leaf = prop_oneof![
        (arb_collection(), prop::option::of(arb_identifier()))
            .prop_map(|(collection, alias)| SqlCollectionExpression::aliased(collection, alias.as_deref())),
        (arb_identifier(), arb_collection())
            .prop_map(|(name, collection)| SqlCollectionExpression::array_iterator(name, collection)),
    ];
    leaf.prop_recursive(2, 4, 2, |inner| {
        (inner.clone(), inner).prop_map(|(left, right)| SqlCollectionExpression::join(left, right))
    })
}

fn arb_query() -> impl Strategy<Value = SqlQuery> {
    (
        arb_select_clause(),
        prop::option::of(arb_collection_expression()),
        prop::option::of(arb_scalar()),
        prop::option::of(prop::collection::vec(arb_scalar(), 1..3)),
        prop::option::of(prop::collection::vec((arb_scalar(), any::<bool>()), 1..3)),
        prop::option::of((arb_scalar(), arb_scalar())),
    )
        .prop_map(|(select, from, filter, group_by, order_by, paging)| {
            let mut query = SqlQuery::new(select);
            if let Some(from) = from {
                query = query.with_from(SqlFromClause::new(from));
            }
            if let Some(filter) = filter {
                query = query.with_where(SqlWhereClause::new(filter));
            }
            if let Some(expressions) = group_by {
                query = query.with_group_by(SqlGroupByClause::new(expressions));
            }
            if let Some(items) = order_by {
                query = query.with_order_by(SqlOrderByClause::new(
                    items.into_iter().map(|(e, desc)| SqlOrderByItem::new(e, desc)).collect(),
                ));
            }
            if let Some((offset, limit)) = paging {
                query = query.with_offset_limit(SqlOffsetLimitClause::new(SqlOffsetSpec::new(offset), SqlLimitSpec::new(limit)));
            }
            query
        })
}

/// Any root a caller may hand to the traversals: a program, a query, or a
/// bare expression.
fn arb_tree() -> impl Strategy<Value = SqlObject> {
    prop_oneof![
        2 => arb_query().prop_map(SqlObject::from),
        1 => arb_query().prop_map(|query| SqlObject::from(SqlProgram::new(query))),
        1 => arb_scalar().prop_map(SqlObject::from),
    ]
}

/// The JSON value with scalars reduced to their type and object keys dropped.
fn json_shape(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(items) => format!("[{}]", items.iter().map(json_shape).collect::<Vec<_>>().join(",")),
        Value::Object(entries) => {
            let mut fields: Vec<String> = entries.values().map(json_shape).collect();
            fields.sort();
            format!("{{{}}}", fields.join(","))
        }
    }
}

/// A generated object-create expression together with a shuffled copy.
fn arb_reordered_object() -> impl Strategy<Value = (SqlScalarExpression, SqlScalarExpression)> {
    prop::collection::vec((arb_identifier(), arb_scalar()), 1..5)
        .prop_flat_map(|props| {
            let shuffled = Just(props.clone()).prop_shuffle();
            (Just(props), shuffled)
        })
        .prop_map(|(props, shuffled)| {
            let build = |props: Vec<(String, SqlScalarExpression)>| {
                SqlScalarExpression::object_create(
                    props.into_iter().map(|(name, value)| SqlObjectProperty::new(name, value)).collect(),
                )
            };
            (build(props), build(shuffled))
        })
}

proptest! {
    /// Property: every tree equals itself and a deep copy of itself
    #[test]
    fn equality_is_reflexive(tree in arb_tree()) {
        prop_assert!(equals(&tree, &tree));
        prop_assert!(equals(&tree, &tree.clone()));
    }

    /// Property: equality does not depend on argument order
    #[test]
    fn equality_is_symmetric(a in arb_scalar(), b in arb_scalar()) {
        prop_assert_eq!(equals(&a, &b), equals(&b, &a));
    }

    /// Property: equal trees hash equal in both modes
    #[test]
    fn equal_trees_hash_equal(tree in arb_tree()) {
        let copy = tree.clone();
        prop_assert_eq!(hash(&tree, true), hash(&copy, true));
        prop_assert_eq!(hash(&tree, false), hash(&copy, false));
    }

    /// Property: reordering object properties keeps equality and the
    /// non-strict hash
    #[test]
    fn object_property_order_is_ignored((a, b) in arb_reordered_object()) {
        prop_assert!(equals(&a, &b));
        prop_assert!(equals(&b, &a));
        prop_assert_eq!(hash(&a, false), hash(&b, false));
    }

    /// Property: whenever two generated trees are equal, their non-strict
    /// hashes agree
    #[test]
    fn non_strict_hash_is_consistent_with_equality(a in arb_scalar(), b in arb_scalar()) {
        if equals(&a, &b) {
            prop_assert_eq!(hash(&a, false), hash(&b, false));
        }
    }

    /// Property: object literals that compare equal hash equal, including
    /// numbers that only differ in the sign of zero
    #[test]
    fn equal_object_literals_hash_equal(value in arb_json(), zero in prop::sample::select(vec![0.0f64, -0.0])) {
        let a = SqlObjectLiteral::new(serde_json::json!([value.clone(), 0.0]));
        let b = SqlObjectLiteral::new(serde_json::json!([value, zero]));
        prop_assert!(equals(&a, &b));
        prop_assert_eq!(hash(&a, true), hash(&b, true));
        prop_assert_eq!(hash(&a, false), hash(&b, false));
    }

    /// Property: obfuscation never changes the shape of a tree
    #[test]
    fn obfuscation_preserves_shape(tree in arb_tree()) {
        let obfuscated = obfuscate(&tree).unwrap();
        prop_assert_eq!(node_kinds(&tree), node_kinds(&obfuscated));
    }

    /// Property: an obfuscated object literal keeps its JSON structure and
    /// the type of every value
    #[test]
    fn object_literal_obfuscation_keeps_json_shape(value in arb_json()) {
        let obfuscated = obfuscate(&SqlObjectLiteral::new(value.clone())).unwrap();
        let literal = SqlObjectLiteral::try_from(obfuscated).unwrap();
        prop_assert_eq!(json_shape(&value), json_shape(&literal.value));
    }

    /// Property: a session maps equal inputs to equal outputs
    #[test]
    fn obfuscation_is_deterministic(tree in arb_tree()) {
        let mut session = Obfuscator::new();
        let first = session.obfuscate(&tree).unwrap();
        let second = session.obfuscate(&tree).unwrap();
        prop_assert!(equals(&first, &second));

        let fresh = obfuscate(&tree).unwrap();
        prop_assert!(equals(&first, &fresh));
    }

    /// Property: rendering never fails for non-empty lists, and pretty output
    /// differs from compact output only in whitespace
    #[test]
    fn pretty_and_compact_agree(tree in arb_tree()) {
        let compact = serialize(&tree).unwrap();
        let pretty = pretty_print(&tree).unwrap();
        let squash = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        prop_assert_eq!(squash(&compact), squash(&pretty));
    }
}

#[test]
fn generators_reach_every_kind() {
    let mut runner = TestRunner::deterministic();
    let strategy = arb_tree();
    let mut seen = BTreeSet::new();
    for _ in 0..2_000 {
        let tree = strategy.new_tree(&mut runner).unwrap().current();
        seen.extend(node_kinds(&tree));
    }
    let seen: Vec<SqlObjectKind> = seen.into_iter().collect();
    assert_eq!(seen.len(), 51, "generated only {seen:?}");
}
