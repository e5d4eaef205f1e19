//! Shape helpers: direct children and pre-order kind listings.
//!
//! Two trees with the same `node_kinds` sequence have the same shape: the
//! same kinds with the same arity in the same order. The obfuscator is
//! required to preserve exactly this.

use super::{Accept, SqlObjectKind, SqlObjectRef};

/// The direct children of `node`, in declaration order. Absent optional
/// children are skipped.
pub fn children(node: SqlObjectRef<'_>) -> Vec<SqlObjectRef<'_>> {
    let mut out = Vec::new();
    match node {
        SqlObjectRef::AliasedCollectionExpression(n) => {
            out.push(n.collection.as_object_ref());
            push_opt(&mut out, n.alias.as_ref());
        }
        SqlObjectRef::ArrayCreateScalarExpression(n) => push_all(&mut out, &n.items),
        SqlObjectRef::ArrayIteratorCollectionExpression(n) => {
            out.push(n.identifier.as_object_ref());
            out.push(n.collection.as_object_ref());
        }
        SqlObjectRef::ArrayScalarExpression(n) => out.push(n.query.as_object_ref()),
        SqlObjectRef::BetweenScalarExpression(n) => {
            out.push(n.expression.as_object_ref());
            out.push(n.start_inclusive.as_object_ref());
            out.push(n.end_inclusive.as_object_ref());
        }
        SqlObjectRef::BinaryScalarExpression(n) => {
            out.push(n.left.as_object_ref());
            out.push(n.right.as_object_ref());
        }
        SqlObjectRef::CoalesceScalarExpression(n) => {
            out.push(n.left.as_object_ref());
            out.push(n.right.as_object_ref());
        }
        SqlObjectRef::ConditionalScalarExpression(n) => {
            out.push(n.condition.as_object_ref());
            out.push(n.consequent.as_object_ref());
            out.push(n.alternative.as_object_ref());
        }
        SqlObjectRef::ExistsScalarExpression(n) => out.push(n.query.as_object_ref()),
        SqlObjectRef::FromClause(n) => out.push(n.expression.as_object_ref()),
        SqlObjectRef::FunctionCallScalarExpression(n) => {
            out.push(n.name.as_object_ref());
            push_all(&mut out, &n.arguments);
        }
        SqlObjectRef::GroupByClause(n) => push_all(&mut out, &n.expressions),
        SqlObjectRef::IdentifierPathExpression(n) => {
            push_opt(&mut out, n.parent_path.as_ref());
            out.push(n.value.as_object_ref());
        }
        SqlObjectRef::InputPathCollection(n) => {
            out.push(n.input.as_object_ref());
            push_opt(&mut out, n.relative_path.as_ref());
        }
        SqlObjectRef::InScalarExpression(n) => {
            out.push(n.needle.as_object_ref());
            push_all(&mut out, &n.haystack);
        }
        SqlObjectRef::JoinCollectionExpression(n) => {
            out.push(n.left.as_object_ref());
            out.push(n.right.as_object_ref());
        }
        SqlObjectRef::LikeScalarExpression(n) => {
            out.push(n.expression.as_object_ref());
            out.push(n.pattern.as_object_ref());
            push_opt(&mut out, n.escape_sequence.as_ref());
        }
        SqlObjectRef::LimitSpec(n) => out.push(n.limit_expression.as_object_ref()),
        SqlObjectRef::LiteralScalarExpression(n) => out.push(n.literal.as_object_ref()),
        SqlObjectRef::MemberIndexerScalarExpression(n) => {
            out.push(n.member.as_object_ref());
            out.push(n.indexer.as_object_ref());
        }
        SqlObjectRef::NumberPathExpression(n) => {
            push_opt(&mut out, n.parent_path.as_ref());
            out.push(n.value.as_object_ref());
        }
        SqlObjectRef::ObjectCreateScalarExpression(n) => push_all(&mut out, &n.properties),
        SqlObjectRef::ObjectProperty(n) => {
            out.push(n.name.as_object_ref());
            out.push(n.value.as_object_ref());
        }
        SqlObjectRef::OffsetLimitClause(n) => {
            out.push(n.offset_spec.as_object_ref());
            out.push(n.limit_spec.as_object_ref());
        }
        SqlObjectRef::OffsetSpec(n) => out.push(n.offset_expression.as_object_ref()),
        SqlObjectRef::OrderByClause(n) => push_all(&mut out, &n.order_by_items),
        SqlObjectRef::OrderByItem(n) => out.push(n.expression.as_object_ref()),
        SqlObjectRef::ParameterRefScalarExpression(n) => out.push(n.parameter.as_object_ref()),
        SqlObjectRef::Program(n) => out.push(n.query.as_object_ref()),
        SqlObjectRef::PropertyRefScalarExpression(n) => {
            push_opt(&mut out, n.member.as_ref());
            out.push(n.identifier.as_object_ref());
        }
        SqlObjectRef::Query(n) => {
            out.push(n.select_clause.as_object_ref());
            push_opt(&mut out, n.from_clause.as_ref());
            push_opt(&mut out, n.where_clause.as_ref());
            push_opt(&mut out, n.group_by_clause.as_ref());
            push_opt(&mut out, n.order_by_clause.as_ref());
            push_opt(&mut out, n.offset_limit_clause.as_ref());
        }
        SqlObjectRef::SelectClause(n) => {
            push_opt(&mut out, n.top_spec.as_ref());
            out.push(n.select_spec.as_object_ref());
        }
        SqlObjectRef::SelectItem(n) => {
            out.push(n.expression.as_object_ref());
            push_opt(&mut out, n.alias.as_ref());
        }
        SqlObjectRef::SelectListSpec(n) => push_all(&mut out, &n.items),
        SqlObjectRef::SelectValueSpec(n) => out.push(n.expression.as_object_ref()),
        SqlObjectRef::StringPathExpression(n) => {
            push_opt(&mut out, n.parent_path.as_ref());
            out.push(n.value.as_object_ref());
        }
        SqlObjectRef::SubqueryCollection(n) => out.push(n.query.as_object_ref()),
        SqlObjectRef::SubqueryScalarExpression(n) => out.push(n.query.as_object_ref()),
        SqlObjectRef::TopSpec(n) => out.push(n.top_expression.as_object_ref()),
        SqlObjectRef::UnaryScalarExpression(n) => out.push(n.expression.as_object_ref()),
        SqlObjectRef::WhereClause(n) => out.push(n.filter_expression.as_object_ref()),
        SqlObjectRef::BooleanLiteral(_)
        | SqlObjectRef::Identifier(_)
        | SqlObjectRef::NullLiteral(_)
        | SqlObjectRef::NumberLiteral(_)
        | SqlObjectRef::ObjectLiteral(_)
        | SqlObjectRef::Parameter(_)
        | SqlObjectRef::PropertyName(_)
        | SqlObjectRef::SelectStarSpec(_)
        | SqlObjectRef::StringLiteral(_)
        | SqlObjectRef::UndefinedLiteral(_) => {}
    }
    out
}

/// Pre-order listing of every node kind in the tree rooted at `node`.
pub fn node_kinds(node: &(impl Accept + ?Sized)) -> Vec<SqlObjectKind> {
    let mut kinds = Vec::new();
    collect_kinds(node.as_object_ref(), &mut kinds);
    kinds
}

/// Number of nodes in the tree rooted at `node`.
pub fn node_count(node: &(impl Accept + ?Sized)) -> usize {
    node_kinds(node).len()
}

fn collect_kinds(node: SqlObjectRef<'_>, kinds: &mut Vec<SqlObjectKind>) {
    kinds.push(node.kind());
    for child in children(node) {
        collect_kinds(child, kinds);
    }
}

fn push_all<'a, T: Accept>(out: &mut Vec<SqlObjectRef<'a>>, items: &'a [T]) {
    out.extend(items.iter().map(Accept::as_object_ref));
}

fn push_opt<'a, T: Accept>(out: &mut Vec<SqlObjectRef<'a>>, item: Option<&'a T>) {
    if let Some(item) = item {
        out.push(item.as_object_ref());
    }
}
