use serde::{Deserialize, Serialize};

use super::{SqlIdentifier, SqlScalarExpression, SqlTopSpec};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlSelectClause {
    pub select_spec: SqlSelectSpec,
    pub top_spec: Option<SqlTopSpec>,
    pub has_distinct: bool,
}

impl SqlSelectClause {
    pub fn new(select_spec: impl Into<SqlSelectSpec>, top_spec: Option<SqlTopSpec>, has_distinct: bool) -> Self {
        Self { select_spec: select_spec.into(), top_spec, has_distinct }
    }

    /// `SELECT *`
    pub fn star() -> Self {
        Self::new(SqlSelectStarSpec, None, false)
    }

    /// `SELECT VALUE expression`
    pub fn value(expression: SqlScalarExpression) -> Self {
        Self::new(SqlSelectValueSpec { expression }, None, false)
    }
}

/// `expression [AS alias]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlSelectItem {
    pub expression: SqlScalarExpression,
    pub alias: Option<SqlIdentifier>,
}

impl SqlSelectItem {
    pub fn new(expression: SqlScalarExpression, alias: Option<&str>) -> Self {
        Self { expression, alias: alias.map(SqlIdentifier::new) }
    }
}

/// Item order carries no meaning for equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlSelectListSpec {
    pub items: Vec<SqlSelectItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlSelectStarSpec;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlSelectValueSpec {
    pub expression: SqlScalarExpression,
}

sql_object_family! {
    pub enum SqlSelectSpec {
        List(SqlSelectListSpec) = SelectListSpec,
        Star(SqlSelectStarSpec) = SelectStarSpec,
        Value(SqlSelectValueSpec) = SelectValueSpec,
    }
}
