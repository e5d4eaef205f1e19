use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SqlObjectError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlBinaryScalarOperatorKind {
    Add,
    And,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    Coalesce,
    Divide,
    Equal,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Modulo,
    Multiply,
    NotEqual,
    Or,
    StringConcat,
    Subtract,
}

impl SqlBinaryScalarOperatorKind {
    pub const ALL: [SqlBinaryScalarOperatorKind; 18] = [
        Self::Add,
        Self::And,
        Self::BitwiseAnd,
        Self::BitwiseOr,
        Self::BitwiseXor,
        Self::Coalesce,
        Self::Divide,
        Self::Equal,
        Self::GreaterThan,
        Self::GreaterThanOrEqual,
        Self::LessThan,
        Self::LessThanOrEqual,
        Self::Modulo,
        Self::Multiply,
        Self::NotEqual,
        Self::Or,
        Self::StringConcat,
        Self::Subtract,
    ];

    /// The token written between the two operands.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::And => "AND",
            Self::BitwiseAnd => "&",
            Self::BitwiseOr => "|",
            Self::BitwiseXor => "^",
            Self::Coalesce => "??",
            Self::Divide => "/",
            Self::Equal => "=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Modulo => "%",
            Self::Multiply => "*",
            Self::NotEqual => "!=",
            Self::Or => "OR",
            Self::StringConcat => "||",
            Self::Subtract => "-",
        }
    }
}

impl FromStr for SqlBinaryScalarOperatorKind {
    type Err = SqlObjectError;

    /// Keywords are matched case-insensitively.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.symbol().eq_ignore_ascii_case(token))
            .ok_or_else(|| SqlObjectError::unsupported_operator(token))
    }
}

impl fmt::Display for SqlBinaryScalarOperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlUnaryScalarOperatorKind {
    BitwiseNot,
    Not,
    Minus,
    Plus,
}

impl SqlUnaryScalarOperatorKind {
    pub const ALL: [SqlUnaryScalarOperatorKind; 4] = [Self::BitwiseNot, Self::Not, Self::Minus, Self::Plus];

    pub fn symbol(self) -> &'static str {
        match self {
            Self::BitwiseNot => "~",
            Self::Not => "NOT",
            Self::Minus => "-",
            Self::Plus => "+",
        }
    }
}

impl FromStr for SqlUnaryScalarOperatorKind {
    type Err = SqlObjectError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.symbol().eq_ignore_ascii_case(token))
            .ok_or_else(|| SqlObjectError::unsupported_operator(token))
    }
}

impl fmt::Display for SqlUnaryScalarOperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
