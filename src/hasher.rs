//! Stable 32-bit hashing over the query object model.
//!
//! Hashes must agree across processes, so every kind, operator, and flag has a
//! fixed seed below and strings use DJB2 over UTF-16 code units instead of the
//! randomized std hasher. Children are folded left to right with [`combine`].
//!
//! In non-strict mode object-create properties and select-list items are
//! summed, which makes the hash independent of their order and consistent
//! with [`crate::equality::equals`]. Strict mode folds them with `combine`
//! like every other list, so reordering them changes the hash.

use serde_json::Value;

use crate::ast::*;
use crate::number::Number64;
use crate::visit::{Accept, SqlObjectVisitor};

/// Hashes `node`.
///
/// With `strict == false`, trees that are [`crate::equality::equals`] always
/// hash equal. With `strict == true` that only holds when their object-create
/// properties and select-list items also appear in the same order: strict
/// mode folds those lists in order, so `{a: 1, b: 2}` and `{b: 2, a: 1}` are
/// equal but get different strict hashes.
pub fn hash(node: &(impl Accept + ?Sized), strict: bool) -> i32 {
    node.accept(&mut SqlObjectHasher::new(strict))
}

// ---- Seeds ----

mod seed {
    pub const ALIASED_COLLECTION_EXPRESSION: i32 = 1202039781;
    pub const ARRAY_CREATE_SCALAR_EXPRESSION: i32 = 1760950661;
    pub const ARRAY_ITERATOR_COLLECTION_EXPRESSION: i32 = -468874086;
    pub const ARRAY_SCALAR_EXPRESSION: i32 = -1093553293;
    pub const BETWEEN_SCALAR_EXPRESSION: i32 = -943872277;
    pub const BETWEEN_SCALAR_EXPRESSION_NOT: i32 = -1283200473;
    pub const BINARY_SCALAR_EXPRESSION: i32 = 1667146665;
    pub const BOOLEAN_LITERAL: i32 = 739161617;
    pub const BOOLEAN_LITERAL_TRUE: i32 = 1545461565;
    pub const BOOLEAN_LITERAL_FALSE: i32 = -2072875075;
    pub const COALESCE_SCALAR_EXPRESSION: i32 = -1400659633;
    pub const CONDITIONAL_SCALAR_EXPRESSION: i32 = -421337832;
    pub const EXISTS_SCALAR_EXPRESSION: i32 = 1168675587;
    pub const FROM_CLAUSE: i32 = 52588336;
    pub const FUNCTION_CALL_SCALAR_EXPRESSION: i32 = 496783446;
    pub const FUNCTION_CALL_SCALAR_EXPRESSION_UDF: i32 = 1547906315;
    pub const GROUP_BY_CLAUSE: i32 = 130396242;
    pub const IDENTIFIER: i32 = -1664307981;
    pub const IDENTIFIER_PATH_EXPRESSION: i32 = -1445813508;
    pub const INPUT_PATH_COLLECTION: i32 = -209963066;
    pub const IN_SCALAR_EXPRESSION: i32 = 1439386783;
    pub const IN_SCALAR_EXPRESSION_NOT: i32 = -1131398119;
    pub const JOIN_COLLECTION_EXPRESSION: i32 = 1000382226;
    pub const LIKE_SCALAR_EXPRESSION: i32 = 317861;
    pub const LIMIT_SPEC: i32 = 92601316;
    pub const LITERAL_SCALAR_EXPRESSION: i32 = -158339101;
    pub const MEMBER_INDEXER_SCALAR_EXPRESSION: i32 = 1589675618;
    pub const NULL_LITERAL: i32 = -709456592;
    pub const NUMBER_LITERAL: i32 = 159836309;
    pub const NUMBER_PATH_EXPRESSION: i32 = 874210976;
    pub const OBJECT_CREATE_SCALAR_EXPRESSION: i32 = -131129165;
    pub const OBJECT_LITERAL: i32 = -1461383406;
    pub const OBJECT_PROPERTY: i32 = 1218972715;
    pub const OFFSET_LIMIT_CLAUSE: i32 = 150154755;
    pub const OFFSET_SPEC: i32 = 109062001;
    pub const ORDER_BY_CLAUSE: i32 = 1361708336;
    pub const ORDER_BY_ITEM: i32 = 846566057;
    pub const ORDER_BY_ITEM_ASCENDING: i32 = -1123129997;
    pub const ORDER_BY_ITEM_DESCENDING: i32 = -703648622;
    pub const PARAMETER: i32 = -1853999792;
    pub const PARAMETER_REF_SCALAR_EXPRESSION: i32 = 1446117758;
    pub const PROGRAM: i32 = -492711050;
    pub const PROPERTY_NAME: i32 = 1262661966;
    pub const PROPERTY_REF_SCALAR_EXPRESSION: i32 = -1586896865;
    pub const QUERY: i32 = 1968642960;
    pub const SELECT_CLAUSE: i32 = 19731870;
    pub const SELECT_CLAUSE_DISTINCT: i32 = 1467616881;
    pub const SELECT_ITEM: i32 = -611151157;
    pub const SELECT_LIST_SPEC: i32 = -1704039197;
    pub const SELECT_STAR_SPEC: i32 = -1125875092;
    pub const SELECT_VALUE_SPEC: i32 = 507077368;
    pub const STRING_LITERAL: i32 = -1542874155;
    pub const STRING_PATH_EXPRESSION: i32 = -1280625326;
    pub const SUBQUERY_COLLECTION: i32 = 1175697100;
    pub const SUBQUERY_SCALAR_EXPRESSION: i32 = -1327458193;
    pub const TOP_SPEC: i32 = -791376698;
    pub const UNARY_SCALAR_EXPRESSION: i32 = 723832597;
    pub const UNDEFINED_LITERAL: i32 = 1290712518;
    pub const WHERE_CLAUSE: i32 = -516465563;
}

fn binary_operator_seed(kind: SqlBinaryScalarOperatorKind) -> i32 {
    use SqlBinaryScalarOperatorKind::*;
    match kind {
        Add => 977447154,
        And => -539169937,
        BitwiseAnd => 192594476,
        BitwiseOr => -1494193777,
        BitwiseXor => 140893802,
        Coalesce => -461857726,
        Divide => -1486745780,
        Equal => -69389992,
        GreaterThan => 1643533106,
        GreaterThanOrEqual => 180538014,
        LessThan => -1452081072,
        LessThanOrEqual => -1068434012,
        Modulo => -371220256,
        Multiply => -178990484,
        NotEqual => 65181046,
        Or => -2095255335,
        StringConcat => -525384764,
        Subtract => 2070749634,
    }
}

fn unary_operator_seed(kind: SqlUnaryScalarOperatorKind) -> i32 {
    use SqlUnaryScalarOperatorKind::*;
    match kind {
        BitwiseNot => 1177827907,
        Not => 1278008063,
        Minus => -1942284846,
        Plus => 251767493,
    }
}

// ---- Primitives ----

/// Order-sensitive combiner: `lhs ^ (rhs + golden + (lhs << 6) + (lhs >> 2))`
/// computed over 64 bits and truncated.
pub fn combine(lhs: i32, rhs: i32) -> i32 {
    let lhs = lhs as i64;
    let rhs = rhs as i64;
    let mixed = rhs
        .wrapping_add(0x9e37_79b9)
        .wrapping_add(lhs << 6)
        .wrapping_add(lhs >> 2);
    (lhs ^ mixed) as i32
}

/// DJB2 over UTF-16 code units.
pub fn string_hash(value: &str) -> i32 {
    let mut hash: u64 = 5381;
    for unit in value.encode_utf16() {
        hash = (hash << 5).wrapping_add(hash).wrapping_add(unit as u64);
    }
    hash as i32
}

/// Hash of an object literal's JSON payload, consistent with `Value` equality.
///
/// Numbers hash by value, so `0.0` and `-0.0` agree. Object entries are summed
/// because key order never affects `Value` equality.
fn json_hash(value: &Value) -> i32 {
    match value {
        Value::Null => seed::NULL_LITERAL,
        Value::Bool(flag) => {
            let flag = if *flag { seed::BOOLEAN_LITERAL_TRUE } else { seed::BOOLEAN_LITERAL_FALSE };
            combine(seed::BOOLEAN_LITERAL, flag)
        }
        Value::Number(number) => {
            let value = match Number64::try_from(number) {
                Ok(number) => number.value_hash(),
                Err(()) => string_hash(&number.to_string()),
            };
            combine(seed::NUMBER_LITERAL, value)
        }
        Value::String(text) => combine(seed::STRING_LITERAL, string_hash(text)),
        Value::Array(items) => items
            .iter()
            .fold(seed::ARRAY_CREATE_SCALAR_EXPRESSION, |hash, item| combine(hash, json_hash(item))),
        Value::Object(entries) => entries.iter().fold(seed::OBJECT_CREATE_SCALAR_EXPRESSION, |hash, (key, item)| {
            hash.wrapping_add(combine(combine(seed::OBJECT_PROPERTY, string_hash(key)), json_hash(item)))
        }),
    }
}

// ============================================================================
// Hasher
// ============================================================================

pub struct SqlObjectHasher {
    strict: bool,
}

impl SqlObjectHasher {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    fn fold<T: Accept + ?Sized>(&mut self, hash: i32, child: &T) -> i32 {
        combine(hash, child.accept(self))
    }

    fn fold_opt<T: Accept>(&mut self, hash: i32, child: Option<&T>) -> i32 {
        match child {
            Some(child) => self.fold(hash, child),
            None => hash,
        }
    }

    fn fold_all<T: Accept>(&mut self, hash: i32, children: &[T]) -> i32 {
        children.iter().fold(hash, |hash, child| self.fold(hash, child))
    }

    /// Folds a list whose order carries no meaning.
    fn fold_unordered<T: Accept>(&mut self, hash: i32, children: &[T]) -> i32 {
        if self.strict {
            self.fold_all(hash, children)
        } else {
            children
                .iter()
                .fold(hash, |hash, child| hash.wrapping_add(child.accept(self)))
        }
    }
}

impl SqlObjectVisitor for SqlObjectHasher {
    type Output = i32;

    fn visit_aliased_collection_expression(&mut self, node: &SqlAliasedCollectionExpression) -> i32 {
        let hash = self.fold(seed::ALIASED_COLLECTION_EXPRESSION, &node.collection);
        self.fold_opt(hash, node.alias.as_ref())
    }

    fn visit_array_create_scalar_expression(&mut self, node: &SqlArrayCreateScalarExpression) -> i32 {
        self.fold_all(seed::ARRAY_CREATE_SCALAR_EXPRESSION, &node.items)
    }

    fn visit_array_iterator_collection_expression(&mut self, node: &SqlArrayIteratorCollectionExpression) -> i32 {
        let hash = self.fold(seed::ARRAY_ITERATOR_COLLECTION_EXPRESSION, &node.identifier);
        self.fold(hash, &node.collection)
    }

    fn visit_array_scalar_expression(&mut self, node: &SqlArrayScalarExpression) -> i32 {
        self.fold(seed::ARRAY_SCALAR_EXPRESSION, &node.query)
    }

    fn visit_between_scalar_expression(&mut self, node: &SqlBetweenScalarExpression) -> i32 {
        let mut hash = self.fold(seed::BETWEEN_SCALAR_EXPRESSION, &node.expression);
        if node.not {
            hash = combine(hash, seed::BETWEEN_SCALAR_EXPRESSION_NOT);
        }
        hash = self.fold(hash, &node.start_inclusive);
        self.fold(hash, &node.end_inclusive)
    }

    fn visit_binary_scalar_expression(&mut self, node: &SqlBinaryScalarExpression) -> i32 {
        let hash = self.fold(seed::BINARY_SCALAR_EXPRESSION, &node.left);
        let hash = combine(hash, binary_operator_seed(node.operator_kind));
        self.fold(hash, &node.right)
    }

    fn visit_boolean_literal(&mut self, node: &SqlBooleanLiteral) -> i32 {
        let flag = if node.value { seed::BOOLEAN_LITERAL_TRUE } else { seed::BOOLEAN_LITERAL_FALSE };
        combine(seed::BOOLEAN_LITERAL, flag)
    }

    fn visit_coalesce_scalar_expression(&mut self, node: &SqlCoalesceScalarExpression) -> i32 {
        let hash = self.fold(seed::COALESCE_SCALAR_EXPRESSION, &node.left);
        self.fold(hash, &node.right)
    }

    fn visit_conditional_scalar_expression(&mut self, node: &SqlConditionalScalarExpression) -> i32 {
        let hash = self.fold(seed::CONDITIONAL_SCALAR_EXPRESSION, &node.condition);
        let hash = self.fold(hash, &node.consequent);
        self.fold(hash, &node.alternative)
    }

    fn visit_exists_scalar_expression(&mut self, node: &SqlExistsScalarExpression) -> i32 {
        self.fold(seed::EXISTS_SCALAR_EXPRESSION, &node.query)
    }

    fn visit_from_clause(&mut self, node: &SqlFromClause) -> i32 {
        self.fold(seed::FROM_CLAUSE, &node.expression)
    }

    fn visit_function_call_scalar_expression(&mut self, node: &SqlFunctionCallScalarExpression) -> i32 {
        let mut hash = seed::FUNCTION_CALL_SCALAR_EXPRESSION;
        if node.is_udf {
            hash = combine(hash, seed::FUNCTION_CALL_SCALAR_EXPRESSION_UDF);
        }
        hash = self.fold(hash, &node.name);
        self.fold_all(hash, &node.arguments)
    }

    fn visit_group_by_clause(&mut self, node: &SqlGroupByClause) -> i32 {
        self.fold_all(seed::GROUP_BY_CLAUSE, &node.expressions)
    }

    fn visit_identifier(&mut self, node: &SqlIdentifier) -> i32 {
        combine(seed::IDENTIFIER, string_hash(&node.value))
    }

    fn visit_identifier_path_expression(&mut self, node: &SqlIdentifierPathExpression) -> i32 {
        let hash = self.fold_opt(seed::IDENTIFIER_PATH_EXPRESSION, node.parent_path.as_ref());
        self.fold(hash, &node.value)
    }

    fn visit_input_path_collection(&mut self, node: &SqlInputPathCollection) -> i32 {
        let hash = self.fold(seed::INPUT_PATH_COLLECTION, &node.input);
        self.fold_opt(hash, node.relative_path.as_ref())
    }

    fn visit_in_scalar_expression(&mut self, node: &SqlInScalarExpression) -> i32 {
        let mut hash = self.fold(seed::IN_SCALAR_EXPRESSION, &node.needle);
        if node.not {
            hash = combine(hash, seed::IN_SCALAR_EXPRESSION_NOT);
        }
        self.fold_all(hash, &node.haystack)
    }

    fn visit_join_collection_expression(&mut self, node: &SqlJoinCollectionExpression) -> i32 {
        let hash = self.fold(seed::JOIN_COLLECTION_EXPRESSION, &node.left);
        self.fold(hash, &node.right)
    }

    fn visit_like_scalar_expression(&mut self, node: &SqlLikeScalarExpression) -> i32 {
        let hash = self.fold(seed::LIKE_SCALAR_EXPRESSION, &node.expression);
        let hash = combine(hash, node.not as i32);
        let hash = self.fold(hash, &node.pattern);
        self.fold_opt(hash, node.escape_sequence.as_ref())
    }

    fn visit_limit_spec(&mut self, node: &SqlLimitSpec) -> i32 {
        self.fold(seed::LIMIT_SPEC, &node.limit_expression)
    }

    fn visit_literal_scalar_expression(&mut self, node: &SqlLiteralScalarExpression) -> i32 {
        self.fold(seed::LITERAL_SCALAR_EXPRESSION, &node.literal)
    }

    fn visit_member_indexer_scalar_expression(&mut self, node: &SqlMemberIndexerScalarExpression) -> i32 {
        let hash = self.fold(seed::MEMBER_INDEXER_SCALAR_EXPRESSION, &node.member);
        self.fold(hash, &node.indexer)
    }

    fn visit_null_literal(&mut self, _: &SqlNullLiteral) -> i32 {
        seed::NULL_LITERAL
    }

    fn visit_number_literal(&mut self, node: &SqlNumberLiteral) -> i32 {
        combine(seed::NUMBER_LITERAL, node.value.value_hash())
    }

    fn visit_number_path_expression(&mut self, node: &SqlNumberPathExpression) -> i32 {
        let hash = self.fold_opt(seed::NUMBER_PATH_EXPRESSION, node.parent_path.as_ref());
        self.fold(hash, &node.value)
    }

    fn visit_object_create_scalar_expression(&mut self, node: &SqlObjectCreateScalarExpression) -> i32 {
        self.fold_unordered(seed::OBJECT_CREATE_SCALAR_EXPRESSION, &node.properties)
    }

    fn visit_object_literal(&mut self, node: &SqlObjectLiteral) -> i32 {
        combine(seed::OBJECT_LITERAL, json_hash(&node.value))
    }

    fn visit_object_property(&mut self, node: &SqlObjectProperty) -> i32 {
        let hash = self.fold(seed::OBJECT_PROPERTY, &node.name);
        self.fold(hash, &node.value)
    }

    fn visit_offset_limit_clause(&mut self, node: &SqlOffsetLimitClause) -> i32 {
        let hash = self.fold(seed::OFFSET_LIMIT_CLAUSE, &node.offset_spec);
        self.fold(hash, &node.limit_spec)
    }

    fn visit_offset_spec(&mut self, node: &SqlOffsetSpec) -> i32 {
        self.fold(seed::OFFSET_SPEC, &node.offset_expression)
    }

    fn visit_order_by_clause(&mut self, node: &SqlOrderByClause) -> i32 {
        self.fold_all(seed::ORDER_BY_CLAUSE, &node.order_by_items)
    }

    fn visit_order_by_item(&mut self, node: &SqlOrderByItem) -> i32 {
        let hash = self.fold(seed::ORDER_BY_ITEM, &node.expression);
        let direction = if node.is_descending { seed::ORDER_BY_ITEM_DESCENDING } else { seed::ORDER_BY_ITEM_ASCENDING };
        combine(hash, direction)
    }

    fn visit_parameter(&mut self, node: &SqlParameter) -> i32 {
        combine(seed::PARAMETER, string_hash(&node.name))
    }

    fn visit_parameter_ref_scalar_expression(&mut self, node: &SqlParameterRefScalarExpression) -> i32 {
        self.fold(seed::PARAMETER_REF_SCALAR_EXPRESSION, &node.parameter)
    }

    fn visit_program(&mut self, node: &SqlProgram) -> i32 {
        self.fold(seed::PROGRAM, &node.query)
    }

    fn visit_property_name(&mut self, node: &SqlPropertyName) -> i32 {
        combine(seed::PROPERTY_NAME, string_hash(&node.value))
    }

    fn visit_property_ref_scalar_expression(&mut self, node: &SqlPropertyRefScalarExpression) -> i32 {
        let hash = self.fold_opt(seed::PROPERTY_REF_SCALAR_EXPRESSION, node.member.as_ref());
        self.fold(hash, &node.identifier)
    }

    fn visit_query(&mut self, node: &SqlQuery) -> i32 {
        let hash = self.fold(seed::QUERY, &node.select_clause);
        let hash = self.fold_opt(hash, node.from_clause.as_ref());
        let hash = self.fold_opt(hash, node.where_clause.as_ref());
        let hash = self.fold_opt(hash, node.group_by_clause.as_ref());
        let hash = self.fold_opt(hash, node.order_by_clause.as_ref());
        self.fold_opt(hash, node.offset_limit_clause.as_ref())
    }

    fn visit_select_clause(&mut self, node: &SqlSelectClause) -> i32 {
        let mut hash = seed::SELECT_CLAUSE;
        if node.has_distinct {
            hash = combine(hash, seed::SELECT_CLAUSE_DISTINCT);
        }
        hash = self.fold_opt(hash, node.top_spec.as_ref());
        self.fold(hash, &node.select_spec)
    }

    fn visit_select_item(&mut self, node: &SqlSelectItem) -> i32 {
        let hash = self.fold(seed::SELECT_ITEM, &node.expression);
        self.fold_opt(hash, node.alias.as_ref())
    }

    fn visit_select_list_spec(&mut self, node: &SqlSelectListSpec) -> i32 {
        self.fold_unordered(seed::SELECT_LIST_SPEC, &node.items)
    }

    fn visit_select_star_spec(&mut self, _: &SqlSelectStarSpec) -> i32 {
        seed::SELECT_STAR_SPEC
    }

    fn visit_select_value_spec(&mut self, node: &SqlSelectValueSpec) -> i32 {
        self.fold(seed::SELECT_VALUE_SPEC, &node.expression)
    }

    fn visit_string_literal(&mut self, node: &SqlStringLiteral) -> i32 {
        combine(seed::STRING_LITERAL, string_hash(&node.value))
    }

    fn visit_string_path_expression(&mut self, node: &SqlStringPathExpression) -> i32 {
        let hash = self.fold_opt(seed::STRING_PATH_EXPRESSION, node.parent_path.as_ref());
        self.fold(hash, &node.value)
    }

    fn visit_subquery_collection(&mut self, node: &SqlSubqueryCollection) -> i32 {
        self.fold(seed::SUBQUERY_COLLECTION, &node.query)
    }

    fn visit_subquery_scalar_expression(&mut self, node: &SqlSubqueryScalarExpression) -> i32 {
        self.fold(seed::SUBQUERY_SCALAR_EXPRESSION, &node.query)
    }

    fn visit_top_spec(&mut self, node: &SqlTopSpec) -> i32 {
        self.fold(seed::TOP_SPEC, &node.top_expression)
    }

    fn visit_unary_scalar_expression(&mut self, node: &SqlUnaryScalarExpression) -> i32 {
        let hash = combine(seed::UNARY_SCALAR_EXPRESSION, unary_operator_seed(node.operator_kind));
        self.fold(hash, &node.expression)
    }

    fn visit_undefined_literal(&mut self, _: &SqlUndefinedLiteral) -> i32 {
        seed::UNDEFINED_LITERAL
    }

    fn visit_where_clause(&mut self, node: &SqlWhereClause) -> i32 {
        self.fold(seed::WHERE_CLAUSE, &node.filter_expression)
    }
}
