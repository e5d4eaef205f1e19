//! Traversal protocol for the query object model
//!
//! Every node kind implements [`Accept`], which hands the node to the one
//! visitor method written for that kind. Two visitor shapes are provided:
//!
//! - `SqlObjectVisitor`: `visit_*(node) -> Output`, for single-tree passes
//!   such as hashing, rebuilding, and text emission
//! - `SqlObjectArgVisitor<A>`: `visit_*(node, arg) -> Output`, for passes that
//!   need a second input such as the other tree in an equality check
//!
//! Neither trait has default methods. Adding a node kind to the list below
//! adds a required method to both traits, so every traversal in the crate
//! stops compiling until it handles the new kind.
//!
//! ## Usage
//!
//! ```rust
//! use sqlobjects::ast::*;
//! use sqlobjects::visit::{Accept, SqlObjectKind};
//!
//! let expr = SqlScalarExpression::literal(SqlLiteral::number(3));
//! assert_eq!(expr.as_object_ref().kind(), SqlObjectKind::LiteralScalarExpression);
//! ```

pub mod walk;

use serde::{Deserialize, Serialize};

use crate::ast::*;
use crate::error::SqlObjectError;

/// Double-dispatch entry point implemented by every node, family enum, and
/// by `SqlObject`/`SqlObjectRef` themselves.
pub trait Accept {
    fn accept<V: SqlObjectVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output;

    fn accept_with<A, V: SqlObjectArgVisitor<A> + ?Sized>(&self, visitor: &mut V, arg: A) -> V::Output;

    /// A borrowed view of this node tagged with its concrete kind.
    fn as_object_ref(&self) -> SqlObjectRef<'_>;
}

impl<T: Accept + ?Sized> Accept for Box<T> {
    fn accept<V: SqlObjectVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        (**self).accept(visitor)
    }

    fn accept_with<A, V: SqlObjectArgVisitor<A> + ?Sized>(&self, visitor: &mut V, arg: A) -> V::Output {
        (**self).accept_with(visitor, arg)
    }

    fn as_object_ref(&self) -> SqlObjectRef<'_> {
        (**self).as_object_ref()
    }
}

/// `PartialEq`/`Eq` through the equality traversal and `Hash` through the
/// order-insensitive hasher, so that `a == b` implies equal hashes.
macro_rules! impl_value_semantics {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PartialEq for $ty {
                fn eq(&self, other: &Self) -> bool {
                    $crate::equality::equals(self, other)
                }
            }

            impl Eq for $ty {}

            impl std::hash::Hash for $ty {
                fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                    state.write_i32($crate::hasher::hash(self, false));
                }
            }
        )*
    };
}

pub(crate) use impl_value_semantics;

macro_rules! sql_object_kinds {
    ($($kind:ident($node:ident) => $visit:ident,)*) => {
        /// Any node of the object model, owned.
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub enum SqlObject {
            $($kind($node),)*
        }

        /// Any node of the object model, borrowed.
        #[derive(Debug, Clone, Copy)]
        pub enum SqlObjectRef<'a> {
            $($kind(&'a $node),)*
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum SqlObjectKind {
            $($kind,)*
        }

        impl SqlObjectKind {
            pub const ALL: &'static [SqlObjectKind] = &[$(SqlObjectKind::$kind,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(SqlObjectKind::$kind => stringify!($kind),)*
                }
            }
        }

        /// Single-result traversal: one required method per node kind.
        pub trait SqlObjectVisitor {
            type Output;

            $(fn $visit(&mut self, node: &$node) -> Self::Output;)*
        }

        /// Traversal that threads an extra argument into every call.
        pub trait SqlObjectArgVisitor<A> {
            type Output;

            $(fn $visit(&mut self, node: &$node, arg: A) -> Self::Output;)*
        }

        impl SqlObject {
            pub fn kind(&self) -> SqlObjectKind {
                self.as_object_ref().kind()
            }
        }

        impl SqlObjectRef<'_> {
            pub fn kind(&self) -> SqlObjectKind {
                match self {
                    $(SqlObjectRef::$kind(_) => SqlObjectKind::$kind,)*
                }
            }

            /// Clones the referenced node into an owned `SqlObject`.
            pub fn to_object(&self) -> SqlObject {
                match *self {
                    $(SqlObjectRef::$kind(node) => SqlObject::$kind(node.clone()),)*
                }
            }
        }

        impl Accept for SqlObject {
            fn accept<V: SqlObjectVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                match self {
                    $(SqlObject::$kind(node) => visitor.$visit(node),)*
                }
            }

            fn accept_with<A, V: SqlObjectArgVisitor<A> + ?Sized>(&self, visitor: &mut V, arg: A) -> V::Output {
                match self {
                    $(SqlObject::$kind(node) => visitor.$visit(node, arg),)*
                }
            }

            fn as_object_ref(&self) -> SqlObjectRef<'_> {
                match self {
                    $(SqlObject::$kind(node) => SqlObjectRef::$kind(node),)*
                }
            }
        }

        impl Accept for SqlObjectRef<'_> {
            fn accept<V: SqlObjectVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                match *self {
                    $(SqlObjectRef::$kind(node) => visitor.$visit(node),)*
                }
            }

            fn accept_with<A, V: SqlObjectArgVisitor<A> + ?Sized>(&self, visitor: &mut V, arg: A) -> V::Output {
                match *self {
                    $(SqlObjectRef::$kind(node) => visitor.$visit(node, arg),)*
                }
            }

            fn as_object_ref(&self) -> SqlObjectRef<'_> {
                *self
            }
        }

        $(
            impl Accept for $node {
                fn accept<V: SqlObjectVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                    visitor.$visit(self)
                }

                fn accept_with<A, V: SqlObjectArgVisitor<A> + ?Sized>(&self, visitor: &mut V, arg: A) -> V::Output {
                    visitor.$visit(self, arg)
                }

                fn as_object_ref(&self) -> SqlObjectRef<'_> {
                    SqlObjectRef::$kind(self)
                }
            }

            impl From<$node> for SqlObject {
                fn from(node: $node) -> Self {
                    SqlObject::$kind(node)
                }
            }

            impl TryFrom<SqlObject> for $node {
                type Error = SqlObjectError;

                fn try_from(object: SqlObject) -> Result<Self, Self::Error> {
                    match object {
                        SqlObject::$kind(node) => Ok(node),
                        other => Err(SqlObjectError::kind_mismatch(stringify!($node), other.kind())),
                    }
                }
            }

            impl_value_semantics!($node);
        )*

        impl_value_semantics!(SqlObject);
    };
}

// ============================================================================
// Node kinds
// ============================================================================

sql_object_kinds! {
    AliasedCollectionExpression(SqlAliasedCollectionExpression) => visit_aliased_collection_expression,
    ArrayCreateScalarExpression(SqlArrayCreateScalarExpression) => visit_array_create_scalar_expression,
    ArrayIteratorCollectionExpression(SqlArrayIteratorCollectionExpression) => visit_array_iterator_collection_expression,
    ArrayScalarExpression(SqlArrayScalarExpression) => visit_array_scalar_expression,
    BetweenScalarExpression(SqlBetweenScalarExpression) => visit_between_scalar_expression,
    BinaryScalarExpression(SqlBinaryScalarExpression) => visit_binary_scalar_expression,
    BooleanLiteral(SqlBooleanLiteral) => visit_boolean_literal,
    CoalesceScalarExpression(SqlCoalesceScalarExpression) => visit_coalesce_scalar_expression,
    ConditionalScalarExpression(SqlConditionalScalarExpression) => visit_conditional_scalar_expression,
    ExistsScalarExpression(SqlExistsScalarExpression) => visit_exists_scalar_expression,
    FromClause(SqlFromClause) => visit_from_clause,
    FunctionCallScalarExpression(SqlFunctionCallScalarExpression) => visit_function_call_scalar_expression,
    GroupByClause(SqlGroupByClause) => visit_group_by_clause,
    Identifier(SqlIdentifier) => visit_identifier,
    IdentifierPathExpression(SqlIdentifierPathExpression) => visit_identifier_path_expression,
    InputPathCollection(SqlInputPathCollection) => visit_input_path_collection,
    InScalarExpression(SqlInScalarExpression) => visit_in_scalar_expression,
    JoinCollectionExpression(SqlJoinCollectionExpression) => visit_join_collection_expression,
    LikeScalarExpression(SqlLikeScalarExpression) => visit_like_scalar_expression,
    LimitSpec(SqlLimitSpec) => visit_limit_spec,
    LiteralScalarExpression(SqlLiteralScalarExpression) => visit_literal_scalar_expression,
    MemberIndexerScalarExpression(SqlMemberIndexerScalarExpression) => visit_member_indexer_scalar_expression,
    NullLiteral(SqlNullLiteral) => visit_null_literal,
    NumberLiteral(SqlNumberLiteral) => visit_number_literal,
    NumberPathExpression(SqlNumberPathExpression) => visit_number_path_expression,
    ObjectCreateScalarExpression(SqlObjectCreateScalarExpression) => visit_object_create_scalar_expression,
    ObjectLiteral(SqlObjectLiteral) => visit_object_literal,
    ObjectProperty(SqlObjectProperty) => visit_object_property,
    OffsetLimitClause(SqlOffsetLimitClause) => visit_offset_limit_clause,
    OffsetSpec(SqlOffsetSpec) => visit_offset_spec,
    OrderByClause(SqlOrderByClause) => visit_order_by_clause,
    OrderByItem(SqlOrderByItem) => visit_order_by_item,
    Parameter(SqlParameter) => visit_parameter,
    ParameterRefScalarExpression(SqlParameterRefScalarExpression) => visit_parameter_ref_scalar_expression,
    Program(SqlProgram) => visit_program,
    PropertyName(SqlPropertyName) => visit_property_name,
    PropertyRefScalarExpression(SqlPropertyRefScalarExpression) => visit_property_ref_scalar_expression,
    Query(SqlQuery) => visit_query,
    SelectClause(SqlSelectClause) => visit_select_clause,
    SelectItem(SqlSelectItem) => visit_select_item,
    SelectListSpec(SqlSelectListSpec) => visit_select_list_spec,
    SelectStarSpec(SqlSelectStarSpec) => visit_select_star_spec,
    SelectValueSpec(SqlSelectValueSpec) => visit_select_value_spec,
    StringLiteral(SqlStringLiteral) => visit_string_literal,
    StringPathExpression(SqlStringPathExpression) => visit_string_path_expression,
    SubqueryCollection(SqlSubqueryCollection) => visit_subquery_collection,
    SubqueryScalarExpression(SqlSubqueryScalarExpression) => visit_subquery_scalar_expression,
    TopSpec(SqlTopSpec) => visit_top_spec,
    UnaryScalarExpression(SqlUnaryScalarExpression) => visit_unary_scalar_expression,
    UndefinedLiteral(SqlUndefinedLiteral) => visit_undefined_literal,
    WhereClause(SqlWhereClause) => visit_where_clause,
}
