use serde::{Deserialize, Serialize};

use super::{SqlCollectionExpression, SqlScalarExpression};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlFromClause {
    pub expression: SqlCollectionExpression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlWhereClause {
    pub filter_expression: SqlScalarExpression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlGroupByClause {
    pub expressions: Vec<SqlScalarExpression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlOrderByClause {
    pub order_by_items: Vec<SqlOrderByItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlOrderByItem {
    pub expression: SqlScalarExpression,
    pub is_descending: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlOffsetLimitClause {
    pub offset_spec: SqlOffsetSpec,
    pub limit_spec: SqlLimitSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlOffsetSpec {
    pub offset_expression: SqlScalarExpression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlLimitSpec {
    pub limit_expression: SqlScalarExpression,
}

/// `TOP n` inside a select clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlTopSpec {
    pub top_expression: SqlScalarExpression,
}

impl SqlFromClause {
    pub fn new(expression: SqlCollectionExpression) -> Self {
        Self { expression }
    }
}

impl SqlWhereClause {
    pub fn new(filter_expression: SqlScalarExpression) -> Self {
        Self { filter_expression }
    }
}

impl SqlGroupByClause {
    pub fn new(expressions: Vec<SqlScalarExpression>) -> Self {
        Self { expressions }
    }
}

impl SqlOrderByClause {
    pub fn new(order_by_items: Vec<SqlOrderByItem>) -> Self {
        Self { order_by_items }
    }
}

impl SqlOrderByItem {
    pub fn new(expression: SqlScalarExpression, is_descending: bool) -> Self {
        Self { expression, is_descending }
    }
}

impl SqlOffsetLimitClause {
    pub fn new(offset_spec: SqlOffsetSpec, limit_spec: SqlLimitSpec) -> Self {
        Self { offset_spec, limit_spec }
    }
}

impl SqlOffsetSpec {
    pub fn new(offset_expression: SqlScalarExpression) -> Self {
        Self { offset_expression }
    }
}

impl SqlLimitSpec {
    pub fn new(limit_expression: SqlScalarExpression) -> Self {
        Self { limit_expression }
    }
}

impl SqlTopSpec {
    pub fn new(top_expression: SqlScalarExpression) -> Self {
        Self { top_expression }
    }
}
