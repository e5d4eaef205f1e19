use serde::{Deserialize, Serialize};

use super::{SqlIdentifier, SqlNumberLiteral, SqlStringLiteral};

/// `parent.value`, or just `value` at the root of the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlIdentifierPathExpression {
    pub parent_path: Option<Box<SqlPathExpression>>,
    pub value: SqlIdentifier,
}

/// `parent[3]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlNumberPathExpression {
    pub parent_path: Option<Box<SqlPathExpression>>,
    pub value: SqlNumberLiteral,
}

/// `parent["key"]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlStringPathExpression {
    pub parent_path: Option<Box<SqlPathExpression>>,
    pub value: SqlStringLiteral,
}

impl SqlIdentifierPathExpression {
    pub fn new(parent_path: Option<SqlPathExpression>, value: SqlIdentifier) -> Self {
        Self { parent_path: parent_path.map(Box::new), value }
    }
}

impl SqlNumberPathExpression {
    pub fn new(parent_path: Option<SqlPathExpression>, value: SqlNumberLiteral) -> Self {
        Self { parent_path: parent_path.map(Box::new), value }
    }
}

impl SqlStringPathExpression {
    pub fn new(parent_path: Option<SqlPathExpression>, value: SqlStringLiteral) -> Self {
        Self { parent_path: parent_path.map(Box::new), value }
    }
}

sql_object_family! {
    pub enum SqlPathExpression {
        Identifier(SqlIdentifierPathExpression) = IdentifierPathExpression,
        Number(SqlNumberPathExpression) = NumberPathExpression,
        String(SqlStringPathExpression) = StringPathExpression,
    }
}
