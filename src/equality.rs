//! Structural equality over the query object model.
//!
//! Two trees are equal when they have the same kinds, the same flags and
//! operators, equal raw values, and equal children. Children are compared by
//! position, except for object-create properties and select-list items, which
//! are compared as multisets.

use crate::ast::*;
use crate::visit::{Accept, SqlObjectArgVisitor, SqlObjectRef};

/// Returns true when `first` and `second` are structurally equal.
pub fn equals<A, B>(first: &A, second: &B) -> bool
where
    A: Accept + ?Sized,
    B: Accept + ?Sized,
{
    first.accept_with(&mut SqlEqualityVisitor, second.as_object_ref())
}

/// Stateless; the visitor carries no fields so it can be created per call.
pub struct SqlEqualityVisitor;

// ============================================================================
// Helpers
// ============================================================================

fn optional_equals<T: Accept>(first: Option<&T>, second: Option<&T>) -> bool {
    match (first, second) {
        (None, None) => true,
        (Some(first), Some(second)) => equals(first, second),
        _ => false,
    }
}

fn sequence_equals<T: Accept>(first: &[T], second: &[T]) -> bool {
    first.len() == second.len() && first.iter().zip(second).all(|(a, b)| equals(a, b))
}

/// Order-insensitive comparison. Each element of `second` may be matched at
/// most once, so `[x, x, y]` and `[x, y, y]` are unequal.
fn multiset_equals<T: Accept>(first: &[T], second: &[T]) -> bool {
    if first.len() != second.len() {
        return false;
    }

    let mut matched = vec![false; second.len()];
    first.iter().all(|item| {
        let found = second
            .iter()
            .enumerate()
            .position(|(i, candidate)| !matched[i] && equals(item, candidate));
        match found {
            Some(i) => {
                matched[i] = true;
                true
            }
            None => false,
        }
    })
}

/// Narrows `second` to the variant matching `first`'s kind, or returns false.
macro_rules! same_kind {
    ($second:expr, $kind:ident) => {
        match $second {
            SqlObjectRef::$kind(node) => node,
            _ => return false,
        }
    };
}

// ============================================================================
// Per-kind rules
// ============================================================================

impl<'b> SqlObjectArgVisitor<SqlObjectRef<'b>> for SqlEqualityVisitor {
    type Output = bool;

    fn visit_aliased_collection_expression(&mut self, first: &SqlAliasedCollectionExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, AliasedCollectionExpression);
        equals(&first.collection, &second.collection) && optional_equals(first.alias.as_ref(), second.alias.as_ref())
    }

    fn visit_array_create_scalar_expression(&mut self, first: &SqlArrayCreateScalarExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, ArrayCreateScalarExpression);
        sequence_equals(&first.items, &second.items)
    }

    fn visit_array_iterator_collection_expression(
        &mut self,
        first: &SqlArrayIteratorCollectionExpression,
        second: SqlObjectRef<'b>,
    ) -> bool {
        let second = same_kind!(second, ArrayIteratorCollectionExpression);
        equals(&first.identifier, &second.identifier) && equals(&first.collection, &second.collection)
    }

    fn visit_array_scalar_expression(&mut self, first: &SqlArrayScalarExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, ArrayScalarExpression);
        equals(&first.query, &second.query)
    }

    fn visit_between_scalar_expression(&mut self, first: &SqlBetweenScalarExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, BetweenScalarExpression);
        first.not == second.not
            && equals(&first.expression, &second.expression)
            && equals(&first.start_inclusive, &second.start_inclusive)
            && equals(&first.end_inclusive, &second.end_inclusive)
    }

    fn visit_binary_scalar_expression(&mut self, first: &SqlBinaryScalarExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, BinaryScalarExpression);
        first.operator_kind == second.operator_kind
            && equals(&first.left, &second.left)
            && equals(&first.right, &second.right)
    }

    fn visit_boolean_literal(&mut self, first: &SqlBooleanLiteral, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, BooleanLiteral);
        first.value == second.value
    }

    fn visit_coalesce_scalar_expression(&mut self, first: &SqlCoalesceScalarExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, CoalesceScalarExpression);
        equals(&first.left, &second.left) && equals(&first.right, &second.right)
    }

    fn visit_conditional_scalar_expression(&mut self, first: &SqlConditionalScalarExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, ConditionalScalarExpression);
        equals(&first.condition, &second.condition)
            && equals(&first.consequent, &second.consequent)
            && equals(&first.alternative, &second.alternative)
    }

    fn visit_exists_scalar_expression(&mut self, first: &SqlExistsScalarExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, ExistsScalarExpression);
        equals(&first.query, &second.query)
    }

    fn visit_from_clause(&mut self, first: &SqlFromClause, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, FromClause);
        equals(&first.expression, &second.expression)
    }

    fn visit_function_call_scalar_expression(&mut self, first: &SqlFunctionCallScalarExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, FunctionCallScalarExpression);
        first.is_udf == second.is_udf
            && equals(&first.name, &second.name)
            && sequence_equals(&first.arguments, &second.arguments)
    }

    fn visit_group_by_clause(&mut self, first: &SqlGroupByClause, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, GroupByClause);
        sequence_equals(&first.expressions, &second.expressions)
    }

    fn visit_identifier(&mut self, first: &SqlIdentifier, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, Identifier);
        first.value == second.value
    }

    fn visit_identifier_path_expression(&mut self, first: &SqlIdentifierPathExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, IdentifierPathExpression);
        equals(&first.value, &second.value)
            && optional_equals(first.parent_path.as_ref(), second.parent_path.as_ref())
    }

    fn visit_input_path_collection(&mut self, first: &SqlInputPathCollection, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, InputPathCollection);
        equals(&first.input, &second.input)
            && optional_equals(first.relative_path.as_ref(), second.relative_path.as_ref())
    }

    fn visit_in_scalar_expression(&mut self, first: &SqlInScalarExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, InScalarExpression);
        first.not == second.not
            && equals(&first.needle, &second.needle)
            && sequence_equals(&first.haystack, &second.haystack)
    }

    fn visit_join_collection_expression(&mut self, first: &SqlJoinCollectionExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, JoinCollectionExpression);
        equals(&first.left, &second.left) && equals(&first.right, &second.right)
    }

    fn visit_like_scalar_expression(&mut self, first: &SqlLikeScalarExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, LikeScalarExpression);
        first.not == second.not
            && equals(&first.expression, &second.expression)
            && equals(&first.pattern, &second.pattern)
            && optional_equals(first.escape_sequence.as_ref(), second.escape_sequence.as_ref())
    }

    fn visit_limit_spec(&mut self, first: &SqlLimitSpec, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, LimitSpec);
        equals(&first.limit_expression, &second.limit_expression)
    }

    fn visit_literal_scalar_expression(&mut self, first: &SqlLiteralScalarExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, LiteralScalarExpression);
        equals(&first.literal, &second.literal)
    }

    fn visit_member_indexer_scalar_expression(
        &mut self,
        first: &SqlMemberIndexerScalarExpression,
        second: SqlObjectRef<'b>,
    ) -> bool {
        let second = same_kind!(second, MemberIndexerScalarExpression);
        equals(&first.member, &second.member) && equals(&first.indexer, &second.indexer)
    }

    fn visit_null_literal(&mut self, _: &SqlNullLiteral, second: SqlObjectRef<'b>) -> bool {
        matches!(second, SqlObjectRef::NullLiteral(_))
    }

    fn visit_number_literal(&mut self, first: &SqlNumberLiteral, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, NumberLiteral);
        first.value == second.value
    }

    fn visit_number_path_expression(&mut self, first: &SqlNumberPathExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, NumberPathExpression);
        equals(&first.value, &second.value)
            && optional_equals(first.parent_path.as_ref(), second.parent_path.as_ref())
    }

    fn visit_object_create_scalar_expression(
        &mut self,
        first: &SqlObjectCreateScalarExpression,
        second: SqlObjectRef<'b>,
    ) -> bool {
        let second = same_kind!(second, ObjectCreateScalarExpression);
        multiset_equals(&first.properties, &second.properties)
    }

    fn visit_object_literal(&mut self, first: &SqlObjectLiteral, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, ObjectLiteral);
        first.value == second.value
    }

    fn visit_object_property(&mut self, first: &SqlObjectProperty, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, ObjectProperty);
        equals(&first.name, &second.name) && equals(&first.value, &second.value)
    }

    fn visit_offset_limit_clause(&mut self, first: &SqlOffsetLimitClause, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, OffsetLimitClause);
        equals(&first.offset_spec, &second.offset_spec) && equals(&first.limit_spec, &second.limit_spec)
    }

    fn visit_offset_spec(&mut self, first: &SqlOffsetSpec, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, OffsetSpec);
        equals(&first.offset_expression, &second.offset_expression)
    }

    fn visit_order_by_clause(&mut self, first: &SqlOrderByClause, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, OrderByClause);
        sequence_equals(&first.order_by_items, &second.order_by_items)
    }

    fn visit_order_by_item(&mut self, first: &SqlOrderByItem, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, OrderByItem);
        first.is_descending == second.is_descending && equals(&first.expression, &second.expression)
    }

    fn visit_parameter(&mut self, first: &SqlParameter, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, Parameter);
        first.name == second.name
    }

    fn visit_parameter_ref_scalar_expression(
        &mut self,
        first: &SqlParameterRefScalarExpression,
        second: SqlObjectRef<'b>,
    ) -> bool {
        let second = same_kind!(second, ParameterRefScalarExpression);
        equals(&first.parameter, &second.parameter)
    }

    fn visit_program(&mut self, first: &SqlProgram, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, Program);
        equals(&first.query, &second.query)
    }

    fn visit_property_name(&mut self, first: &SqlPropertyName, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, PropertyName);
        first.value == second.value
    }

    fn visit_property_ref_scalar_expression(
        &mut self,
        first: &SqlPropertyRefScalarExpression,
        second: SqlObjectRef<'b>,
    ) -> bool {
        let second = same_kind!(second, PropertyRefScalarExpression);
        equals(&first.identifier, &second.identifier) && optional_equals(first.member.as_ref(), second.member.as_ref())
    }

    fn visit_query(&mut self, first: &SqlQuery, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, Query);
        equals(&first.select_clause, &second.select_clause)
            && optional_equals(first.from_clause.as_ref(), second.from_clause.as_ref())
            && optional_equals(first.where_clause.as_ref(), second.where_clause.as_ref())
            && optional_equals(first.group_by_clause.as_ref(), second.group_by_clause.as_ref())
            && optional_equals(first.order_by_clause.as_ref(), second.order_by_clause.as_ref())
            && optional_equals(first.offset_limit_clause.as_ref(), second.offset_limit_clause.as_ref())
    }

    fn visit_select_clause(&mut self, first: &SqlSelectClause, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, SelectClause);
        first.has_distinct == second.has_distinct
            && optional_equals(first.top_spec.as_ref(), second.top_spec.as_ref())
            && equals(&first.select_spec, &second.select_spec)
    }

    fn visit_select_item(&mut self, first: &SqlSelectItem, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, SelectItem);
        equals(&first.expression, &second.expression) && optional_equals(first.alias.as_ref(), second.alias.as_ref())
    }

    fn visit_select_list_spec(&mut self, first: &SqlSelectListSpec, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, SelectListSpec);
        multiset_equals(&first.items, &second.items)
    }

    fn visit_select_star_spec(&mut self, _: &SqlSelectStarSpec, second: SqlObjectRef<'b>) -> bool {
        matches!(second, SqlObjectRef::SelectStarSpec(_))
    }

    fn visit_select_value_spec(&mut self, first: &SqlSelectValueSpec, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, SelectValueSpec);
        equals(&first.expression, &second.expression)
    }

    fn visit_string_literal(&mut self, first: &SqlStringLiteral, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, StringLiteral);
        first.value == second.value
    }

    fn visit_string_path_expression(&mut self, first: &SqlStringPathExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, StringPathExpression);
        equals(&first.value, &second.value)
            && optional_equals(first.parent_path.as_ref(), second.parent_path.as_ref())
    }

    fn visit_subquery_collection(&mut self, first: &SqlSubqueryCollection, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, SubqueryCollection);
        equals(&first.query, &second.query)
    }

    fn visit_subquery_scalar_expression(&mut self, first: &SqlSubqueryScalarExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, SubqueryScalarExpression);
        equals(&first.query, &second.query)
    }

    fn visit_top_spec(&mut self, first: &SqlTopSpec, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, TopSpec);
        equals(&first.top_expression, &second.top_expression)
    }

    fn visit_unary_scalar_expression(&mut self, first: &SqlUnaryScalarExpression, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, UnaryScalarExpression);
        first.operator_kind == second.operator_kind && equals(&first.expression, &second.expression)
    }

    fn visit_undefined_literal(&mut self, _: &SqlUndefinedLiteral, second: SqlObjectRef<'b>) -> bool {
        matches!(second, SqlObjectRef::UndefinedLiteral(_))
    }

    fn visit_where_clause(&mut self, first: &SqlWhereClause, second: SqlObjectRef<'b>) -> bool {
        let second = same_kind!(second, WhereClause);
        equals(&first.filter_expression, &second.filter_expression)
    }
}
