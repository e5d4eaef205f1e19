use serde::{Deserialize, Serialize};

use super::{
    SqlBinaryScalarOperatorKind, SqlIdentifier, SqlLiteral, SqlParameter, SqlPropertyName, SqlQuery,
    SqlStringLiteral, SqlUnaryScalarOperatorKind,
};

// ── Composite expressions ───────────────────────────────────────────

/// `[a, b, c]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlArrayCreateScalarExpression {
    pub items: Vec<SqlScalarExpression>,
}

/// `ARRAY(subquery)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlArrayScalarExpression {
    pub query: Box<SqlQuery>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlBetweenScalarExpression {
    pub expression: Box<SqlScalarExpression>,
    pub start_inclusive: Box<SqlScalarExpression>,
    pub end_inclusive: Box<SqlScalarExpression>,
    pub not: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlBinaryScalarExpression {
    pub operator_kind: SqlBinaryScalarOperatorKind,
    pub left: Box<SqlScalarExpression>,
    pub right: Box<SqlScalarExpression>,
}

/// `left ?? right`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlCoalesceScalarExpression {
    pub left: Box<SqlScalarExpression>,
    pub right: Box<SqlScalarExpression>,
}

/// `condition ? consequent : alternative`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlConditionalScalarExpression {
    pub condition: Box<SqlScalarExpression>,
    pub consequent: Box<SqlScalarExpression>,
    pub alternative: Box<SqlScalarExpression>,
}

/// `EXISTS(subquery)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlExistsScalarExpression {
    pub query: Box<SqlQuery>,
}

/// A built-in or user-defined (`udf.` prefixed) function call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlFunctionCallScalarExpression {
    pub name: SqlIdentifier,
    pub arguments: Vec<SqlScalarExpression>,
    pub is_udf: bool,
}

/// `needle [NOT] IN (haystack...)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlInScalarExpression {
    pub needle: Box<SqlScalarExpression>,
    pub not: bool,
    pub haystack: Vec<SqlScalarExpression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlLikeScalarExpression {
    pub expression: Box<SqlScalarExpression>,
    pub pattern: Box<SqlScalarExpression>,
    pub not: bool,
    pub escape_sequence: Option<SqlStringLiteral>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlLiteralScalarExpression {
    pub literal: SqlLiteral,
}

/// `member[indexer]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlMemberIndexerScalarExpression {
    pub member: Box<SqlScalarExpression>,
    pub indexer: Box<SqlScalarExpression>,
}

/// `{"name": value, ...}`. Property order carries no meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlObjectCreateScalarExpression {
    pub properties: Vec<SqlObjectProperty>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlObjectProperty {
    pub name: SqlPropertyName,
    pub value: SqlScalarExpression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlParameterRefScalarExpression {
    pub parameter: SqlParameter,
}

/// `member.identifier`, or a bare `identifier` when there is no member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlPropertyRefScalarExpression {
    pub member: Option<Box<SqlScalarExpression>>,
    pub identifier: SqlIdentifier,
}

/// `(subquery)` used as a value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlSubqueryScalarExpression {
    pub query: Box<SqlQuery>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlUnaryScalarExpression {
    pub operator_kind: SqlUnaryScalarOperatorKind,
    pub expression: Box<SqlScalarExpression>,
}

sql_object_family! {
    pub enum SqlScalarExpression {
        ArrayCreate(SqlArrayCreateScalarExpression) = ArrayCreateScalarExpression,
        Array(SqlArrayScalarExpression) = ArrayScalarExpression,
        Between(SqlBetweenScalarExpression) = BetweenScalarExpression,
        Binary(SqlBinaryScalarExpression) = BinaryScalarExpression,
        Coalesce(SqlCoalesceScalarExpression) = CoalesceScalarExpression,
        Conditional(SqlConditionalScalarExpression) = ConditionalScalarExpression,
        Exists(SqlExistsScalarExpression) = ExistsScalarExpression,
        FunctionCall(SqlFunctionCallScalarExpression) = FunctionCallScalarExpression,
        In(SqlInScalarExpression) = InScalarExpression,
        Like(SqlLikeScalarExpression) = LikeScalarExpression,
        Literal(SqlLiteralScalarExpression) = LiteralScalarExpression,
        MemberIndexer(SqlMemberIndexerScalarExpression) = MemberIndexerScalarExpression,
        ObjectCreate(SqlObjectCreateScalarExpression) = ObjectCreateScalarExpression,
        ParameterRef(SqlParameterRefScalarExpression) = ParameterRefScalarExpression,
        PropertyRef(SqlPropertyRefScalarExpression) = PropertyRefScalarExpression,
        Subquery(SqlSubqueryScalarExpression) = SubqueryScalarExpression,
        Unary(SqlUnaryScalarExpression) = UnaryScalarExpression,
    }
}

// ── Constructors ────────────────────────────────────────────────────

impl SqlScalarExpression {
    pub fn literal(literal: impl Into<SqlLiteral>) -> Self {
        SqlScalarExpression::Literal(SqlLiteralScalarExpression { literal: literal.into() })
    }

    pub fn binary(operator_kind: SqlBinaryScalarOperatorKind, left: SqlScalarExpression, right: SqlScalarExpression) -> Self {
        SqlScalarExpression::Binary(SqlBinaryScalarExpression {
            operator_kind,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(operator_kind: SqlUnaryScalarOperatorKind, expression: SqlScalarExpression) -> Self {
        SqlScalarExpression::Unary(SqlUnaryScalarExpression { operator_kind, expression: Box::new(expression) })
    }

    /// A bare identifier reference such as the `c` in `FROM c`.
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::property_ref(None, name)
    }

    pub fn property_ref(member: Option<SqlScalarExpression>, identifier: impl Into<String>) -> Self {
        SqlScalarExpression::PropertyRef(SqlPropertyRefScalarExpression {
            member: member.map(Box::new),
            identifier: SqlIdentifier::new(identifier),
        })
    }

    pub fn member_indexer(member: SqlScalarExpression, indexer: SqlScalarExpression) -> Self {
        SqlScalarExpression::MemberIndexer(SqlMemberIndexerScalarExpression {
            member: Box::new(member),
            indexer: Box::new(indexer),
        })
    }

    pub fn parameter_ref(name: impl Into<String>) -> Self {
        SqlScalarExpression::ParameterRef(SqlParameterRefScalarExpression { parameter: SqlParameter::new(name) })
    }

    pub fn function_call(name: impl Into<String>, arguments: Vec<SqlScalarExpression>, is_udf: bool) -> Self {
        SqlScalarExpression::FunctionCall(SqlFunctionCallScalarExpression {
            name: SqlIdentifier::new(name),
            arguments,
            is_udf,
        })
    }

    pub fn array_create(items: Vec<SqlScalarExpression>) -> Self {
        SqlScalarExpression::ArrayCreate(SqlArrayCreateScalarExpression { items })
    }

    pub fn object_create(properties: Vec<SqlObjectProperty>) -> Self {
        SqlScalarExpression::ObjectCreate(SqlObjectCreateScalarExpression { properties })
    }

    pub fn subquery(query: SqlQuery) -> Self {
        SqlScalarExpression::Subquery(SqlSubqueryScalarExpression { query: Box::new(query) })
    }
}

impl SqlObjectProperty {
    pub fn new(name: impl Into<String>, value: SqlScalarExpression) -> Self {
        Self { name: SqlPropertyName::new(name), value }
    }
}

impl From<SqlLiteral> for SqlScalarExpression {
    fn from(literal: SqlLiteral) -> Self {
        SqlScalarExpression::literal(literal)
    }
}
