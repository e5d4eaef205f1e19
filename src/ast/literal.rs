use serde::{Deserialize, Serialize};

use crate::number::Number64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlBooleanLiteral {
    pub value: bool,
}

impl SqlBooleanLiteral {
    pub const TRUE: SqlBooleanLiteral = SqlBooleanLiteral { value: true };
    pub const FALSE: SqlBooleanLiteral = SqlBooleanLiteral { value: false };

    pub fn new(value: bool) -> Self {
        Self { value }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlNullLiteral;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlUndefinedLiteral;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlNumberLiteral {
    pub value: Number64,
}

impl SqlNumberLiteral {
    pub fn new(value: impl Into<Number64>) -> Self {
        Self { value: value.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlStringLiteral {
    pub value: String,
}

impl SqlStringLiteral {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

/// A literal carrying an arbitrary JSON document, rendered verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlObjectLiteral {
    pub value: serde_json::Value,
}

impl SqlObjectLiteral {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }
}

sql_object_family! {
    pub enum SqlLiteral {
        Boolean(SqlBooleanLiteral) = BooleanLiteral,
        Null(SqlNullLiteral) = NullLiteral,
        Number(SqlNumberLiteral) = NumberLiteral,
        Object(SqlObjectLiteral) = ObjectLiteral,
        String(SqlStringLiteral) = StringLiteral,
        Undefined(SqlUndefinedLiteral) = UndefinedLiteral,
    }
}

impl SqlLiteral {
    pub fn boolean(value: bool) -> Self {
        SqlLiteral::Boolean(SqlBooleanLiteral::new(value))
    }

    pub fn number(value: impl Into<Number64>) -> Self {
        SqlLiteral::Number(SqlNumberLiteral::new(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        SqlLiteral::String(SqlStringLiteral::new(value))
    }
}
