use serde::{Deserialize, Serialize};

use super::{SqlIdentifier, SqlPathExpression, SqlQuery};

// ── Collections ─────────────────────────────────────────────────────

/// A named input such as `c` or `c.children[0]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlInputPathCollection {
    pub input: SqlIdentifier,
    pub relative_path: Option<SqlPathExpression>,
}

impl SqlInputPathCollection {
    pub fn new(input: impl Into<String>, relative_path: Option<SqlPathExpression>) -> Self {
        Self { input: SqlIdentifier::new(input), relative_path }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlSubqueryCollection {
    pub query: Box<SqlQuery>,
}

impl SqlSubqueryCollection {
    pub fn new(query: SqlQuery) -> Self {
        Self { query: Box::new(query) }
    }
}

sql_object_family! {
    pub enum SqlCollection {
        InputPath(SqlInputPathCollection) = InputPathCollection,
        Subquery(SqlSubqueryCollection) = SubqueryCollection,
    }
}

// ── Collection expressions ──────────────────────────────────────────

/// `collection [AS alias]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlAliasedCollectionExpression {
    pub collection: SqlCollection,
    pub alias: Option<SqlIdentifier>,
}

/// `identifier IN collection`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlArrayIteratorCollectionExpression {
    pub identifier: SqlIdentifier,
    pub collection: SqlCollection,
}

/// `left JOIN right`. Join order is significant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlJoinCollectionExpression {
    pub left: Box<SqlCollectionExpression>,
    pub right: Box<SqlCollectionExpression>,
}

sql_object_family! {
    pub enum SqlCollectionExpression {
        Aliased(SqlAliasedCollectionExpression) = AliasedCollectionExpression,
        ArrayIterator(SqlArrayIteratorCollectionExpression) = ArrayIteratorCollectionExpression,
        Join(SqlJoinCollectionExpression) = JoinCollectionExpression,
    }
}

impl SqlCollectionExpression {
    pub fn aliased(collection: impl Into<SqlCollection>, alias: Option<&str>) -> Self {
        SqlCollectionExpression::Aliased(SqlAliasedCollectionExpression {
            collection: collection.into(),
            alias: alias.map(SqlIdentifier::new),
        })
    }

    pub fn array_iterator(identifier: impl Into<String>, collection: impl Into<SqlCollection>) -> Self {
        SqlCollectionExpression::ArrayIterator(SqlArrayIteratorCollectionExpression {
            identifier: SqlIdentifier::new(identifier),
            collection: collection.into(),
        })
    }

    pub fn join(left: SqlCollectionExpression, right: SqlCollectionExpression) -> Self {
        SqlCollectionExpression::Join(SqlJoinCollectionExpression { left: Box::new(left), right: Box::new(right) })
    }
}
