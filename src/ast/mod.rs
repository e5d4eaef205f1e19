//! The query object model.
//!
//! Every node kind is a plain struct with public fields. Nodes that can appear
//! in more than one place are grouped into family enums (`SqlScalarExpression`,
//! `SqlLiteral`, `SqlCollection`, ...) so that a child slot only accepts the
//! kinds that are valid there. Trees are built once and then only read; the
//! traversals in this crate never mutate a tree, they either compute a value or
//! build a new one.

/// Declares a family enum over a subset of node kinds and wires it into the
/// traversal protocol.
///
/// Each entry is `Variant(NodeType) = SqlObjectVariant`.
macro_rules! sql_object_family {
    (
        $(#[$meta:meta])*
        pub enum $family:ident {
            $($variant:ident($node:ident) = $kind:ident,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
        pub enum $family {
            $($variant($node),)*
        }

        impl $crate::visit::Accept for $family {
            fn accept<V: $crate::visit::SqlObjectVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                match self {
                    $($family::$variant(node) => $crate::visit::Accept::accept(node, visitor),)*
                }
            }

            fn accept_with<A, V: $crate::visit::SqlObjectArgVisitor<A> + ?Sized>(
                &self,
                visitor: &mut V,
                arg: A,
            ) -> V::Output {
                match self {
                    $($family::$variant(node) => $crate::visit::Accept::accept_with(node, visitor, arg),)*
                }
            }

            fn as_object_ref(&self) -> $crate::visit::SqlObjectRef<'_> {
                match self {
                    $($family::$variant(node) => $crate::visit::SqlObjectRef::$kind(node),)*
                }
            }
        }

        $(
            impl From<$node> for $family {
                fn from(node: $node) -> Self {
                    $family::$variant(node)
                }
            }
        )*

        impl From<$family> for $crate::visit::SqlObject {
            fn from(family: $family) -> Self {
                match family {
                    $($family::$variant(node) => $crate::visit::SqlObject::$kind(node),)*
                }
            }
        }

        impl TryFrom<$crate::visit::SqlObject> for $family {
            type Error = $crate::error::SqlObjectError;

            fn try_from(object: $crate::visit::SqlObject) -> Result<Self, Self::Error> {
                match object {
                    $($crate::visit::SqlObject::$kind(node) => Ok($family::$variant(node)),)*
                    other => Err($crate::error::SqlObjectError::kind_mismatch(
                        stringify!($family),
                        other.kind(),
                    )),
                }
            }
        }

        $crate::visit::impl_value_semantics!($family);
    };
}

mod clause;
mod collection;
mod literal;
mod naming;
mod operator;
mod path;
mod query;
mod scalar;
mod select;

pub use clause::*;
pub use collection::*;
pub use literal::*;
pub use naming::*;
pub use operator::*;
pub use path::*;
pub use query::*;
pub use scalar::*;
pub use select::*;
