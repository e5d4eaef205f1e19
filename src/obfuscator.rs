//! Shape-preserving scrubbing of identifiers, literals, and parameters.
//!
//! An [`Obfuscator`] is one obfuscation session. It owns the sequence counters
//! and the memo maps, so the same input value gets the same replacement
//! everywhere it appears within the session and distinct values never
//! collide. Sessions are cheap; create one per tree (or per batch of trees
//! that should share replacements) and never share one across threads.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, trace};

use crate::ast::*;
use crate::error::SqlObjectError;
use crate::number::Number64;
use crate::visit::{Accept, SqlObject, SqlObjectVisitor};

/// Well-known system and geometry names that are never replaced.
pub const EXEMPT_STRINGS: &[&str] = &[
    "GeometryCollection",
    "LineString",
    "MultiLineString",
    "MultiPoint",
    "MultiPolygon",
    "Point",
    "Polygon",
    "_attachments",
    "_etag",
    "_rid",
    "_self",
    "_ts",
    "coordinates",
    "id",
    "name",
    "type",
];

/// Obfuscates `node` with a fresh session.
pub fn obfuscate(node: &(impl Accept + ?Sized)) -> Result<SqlObject, SqlObjectError> {
    let mut session = Obfuscator::new();
    let obfuscated = session.obfuscate(node)?;
    debug!(
        numbers = session.sequences.numbers,
        strings = session.sequences.strings,
        identifiers = session.sequences.identifiers,
        property_names = session.sequences.property_names,
        parameters = session.sequences.parameters,
        "obfuscated {:?}",
        node.as_object_ref().kind()
    );
    Ok(obfuscated)
}

/// The syntactic role a string plays; decides its replacement prefix and
/// which sequence it draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringRole {
    Identifier,
    StringLiteral,
    PropertyName,
    Parameter,
}

impl StringRole {
    fn prefix(self) -> &'static str {
        match self {
            StringRole::Identifier => "ident",
            StringRole::StringLiteral => "str",
            StringRole::PropertyName => "p",
            StringRole::Parameter => "param",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sequences {
    pub numbers: u32,
    pub strings: u32,
    pub identifiers: u32,
    pub property_names: u32,
    pub parameters: u32,
}

impl Sequences {
    fn next(&mut self, role: StringRole) -> u32 {
        let counter = match role {
            StringRole::Identifier => &mut self.identifiers,
            StringRole::StringLiteral => &mut self.strings,
            StringRole::PropertyName => &mut self.property_names,
            StringRole::Parameter => &mut self.parameters,
        };
        *counter += 1;
        *counter
    }
}

#[derive(Debug, Default)]
pub struct Obfuscator {
    sequences: Sequences,
    extra_exempt: HashSet<String>,
    strings: HashMap<String, String>,
    numbers: HashMap<Number64, Number64>,
}

impl Obfuscator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that also leaves `exempt` strings untouched.
    pub fn with_exemptions<I, S>(exempt: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { extra_exempt: exempt.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    pub fn sequences(&self) -> Sequences {
        self.sequences
    }

    /// Obfuscates `node` within this session. Replacements made by earlier
    /// calls on the same session are reused.
    pub fn obfuscate(&mut self, node: &(impl Accept + ?Sized)) -> Result<SqlObject, SqlObjectError> {
        node.accept(self)
    }

    fn is_exempt(&self, value: &str) -> bool {
        EXEMPT_STRINGS.contains(&value) || self.extra_exempt.contains(value)
    }

    fn obfuscate_string(&mut self, value: &str, role: StringRole) -> String {
        let length = value.encode_utf16().count();
        if length <= 1 || self.is_exempt(value) {
            return value.to_string();
        }
        if let Some(existing) = self.strings.get(value) {
            return existing.clone();
        }

        let sequence = self.sequences.next(role);
        let obfuscated = if length < 10 {
            format!("{}{sequence}", role.prefix())
        } else {
            format!("{}{sequence}__{length}", role.prefix())
        };
        trace!(?role, %obfuscated, "new string replacement");
        self.strings.insert(value.to_string(), obfuscated.clone());
        obfuscated
    }

    fn obfuscate_number(&mut self, value: Number64) -> Number64 {
        if is_shape_number(value) {
            return value;
        }
        if let Some(existing) = self.numbers.get(&value) {
            return *existing;
        }

        self.sequences.numbers += 1;
        let double = value.to_f64();
        let magnitude = 10f64.powf(double.abs().log10().floor());
        let obfuscated = Number64::Double(round_to_cents(double) + magnitude * self.sequences.numbers as f64 / 1e4);
        trace!(sequence = self.sequences.numbers, "new number replacement");
        self.numbers.insert(value, obfuscated);
        obfuscated
    }

    /// Scrubs an object literal's payload without changing its JSON shape.
    /// Keys are treated as property names and strings as string literals.
    fn obfuscate_json(&mut self, value: &Value) -> Value {
        match value {
            Value::Null | Value::Bool(_) => value.clone(),
            Value::Number(number) => match Number64::try_from(number) {
                Ok(number) => match self.obfuscate_number(number) {
                    Number64::Integer(i) => Value::from(i),
                    Number64::Double(d) => serde_json::Number::from_f64(d).map_or_else(|| value.clone(), Value::Number),
                },
                Err(()) => value.clone(),
            },
            Value::String(text) => Value::String(self.obfuscate_string(text, StringRole::StringLiteral)),
            Value::Array(items) => Value::Array(items.iter().map(|item| self.obfuscate_json(item)).collect()),
            Value::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, item)| (self.obfuscate_string(key, StringRole::PropertyName), self.obfuscate_json(item)))
                    .collect(),
            ),
        }
    }

    // ---- Typed child rewriting ----

    fn rewrite<T>(&mut self, node: &T) -> Result<T, SqlObjectError>
    where
        T: Accept + TryFrom<SqlObject, Error = SqlObjectError>,
    {
        T::try_from(node.accept(self)?)
    }

    fn rewrite_boxed<T>(&mut self, node: &T) -> Result<Box<T>, SqlObjectError>
    where
        T: Accept + TryFrom<SqlObject, Error = SqlObjectError>,
    {
        self.rewrite(node).map(Box::new)
    }

    fn rewrite_opt<T>(&mut self, node: Option<&T>) -> Result<Option<T>, SqlObjectError>
    where
        T: Accept + TryFrom<SqlObject, Error = SqlObjectError>,
    {
        node.map(|node| self.rewrite(node)).transpose()
    }

    fn rewrite_opt_boxed<T>(&mut self, node: Option<&T>) -> Result<Option<Box<T>>, SqlObjectError>
    where
        T: Accept + TryFrom<SqlObject, Error = SqlObjectError>,
    {
        node.map(|node| self.rewrite_boxed(node)).transpose()
    }

    fn rewrite_all<T>(&mut self, nodes: &[T]) -> Result<Vec<T>, SqlObjectError>
    where
        T: Accept + TryFrom<SqlObject, Error = SqlObjectError>,
    {
        nodes.iter().map(|node| self.rewrite(node)).collect()
    }

    fn zero() -> SqlScalarExpression {
        SqlScalarExpression::literal(SqlLiteral::number(0))
    }
}

/// Numbers that only describe shape (small indices, sentinels) and are kept.
fn is_shape_number(value: Number64) -> bool {
    match value {
        Number64::Integer(i) => i == i64::MIN || i.unsigned_abs() < 100,
        Number64::Double(d) => {
            d.is_infinite()
                || d.is_nan()
                || (d.abs() < 100.0 && d.fract() == 0.0)
                || d.abs() <= f64::from_bits(1)
        }
    }
}

/// Rounds to two decimals, ties to even.
fn round_to_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() { scaled.round_ties_even() / 100.0 } else { value }
}

type Rewritten = Result<SqlObject, SqlObjectError>;

impl SqlObjectVisitor for Obfuscator {
    type Output = Rewritten;

    fn visit_aliased_collection_expression(&mut self, node: &SqlAliasedCollectionExpression) -> Rewritten {
        Ok(SqlAliasedCollectionExpression {
            collection: self.rewrite(&node.collection)?,
            alias: self.rewrite_opt(node.alias.as_ref())?,
        }
        .into())
    }

    fn visit_array_create_scalar_expression(&mut self, node: &SqlArrayCreateScalarExpression) -> Rewritten {
        Ok(SqlArrayCreateScalarExpression { items: self.rewrite_all(&node.items)? }.into())
    }

    fn visit_array_iterator_collection_expression(&mut self, node: &SqlArrayIteratorCollectionExpression) -> Rewritten {
        Ok(SqlArrayIteratorCollectionExpression {
            identifier: self.rewrite(&node.identifier)?,
            collection: self.rewrite(&node.collection)?,
        }
        .into())
    }

    fn visit_array_scalar_expression(&mut self, node: &SqlArrayScalarExpression) -> Rewritten {
        Ok(SqlArrayScalarExpression { query: self.rewrite_boxed(&*node.query)? }.into())
    }

    fn visit_between_scalar_expression(&mut self, node: &SqlBetweenScalarExpression) -> Rewritten {
        Ok(SqlBetweenScalarExpression {
            expression: self.rewrite_boxed(&*node.expression)?,
            start_inclusive: self.rewrite_boxed(&*node.start_inclusive)?,
            end_inclusive: self.rewrite_boxed(&*node.end_inclusive)?,
            not: node.not,
        }
        .into())
    }

    fn visit_binary_scalar_expression(&mut self, node: &SqlBinaryScalarExpression) -> Rewritten {
        Ok(SqlBinaryScalarExpression {
            operator_kind: node.operator_kind,
            left: self.rewrite_boxed(&*node.left)?,
            right: self.rewrite_boxed(&*node.right)?,
        }
        .into())
    }

    fn visit_boolean_literal(&mut self, node: &SqlBooleanLiteral) -> Rewritten {
        Ok(node.clone().into())
    }

    fn visit_coalesce_scalar_expression(&mut self, node: &SqlCoalesceScalarExpression) -> Rewritten {
        Ok(SqlCoalesceScalarExpression {
            left: self.rewrite_boxed(&*node.left)?,
            right: self.rewrite_boxed(&*node.right)?,
        }
        .into())
    }

    fn visit_conditional_scalar_expression(&mut self, node: &SqlConditionalScalarExpression) -> Rewritten {
        Ok(SqlConditionalScalarExpression {
            condition: self.rewrite_boxed(&*node.condition)?,
            consequent: self.rewrite_boxed(&*node.consequent)?,
            alternative: self.rewrite_boxed(&*node.alternative)?,
        }
        .into())
    }

    fn visit_exists_scalar_expression(&mut self, node: &SqlExistsScalarExpression) -> Rewritten {
        Ok(SqlExistsScalarExpression { query: self.rewrite_boxed(&*node.query)? }.into())
    }

    fn visit_from_clause(&mut self, node: &SqlFromClause) -> Rewritten {
        Ok(SqlFromClause { expression: self.rewrite(&node.expression)? }.into())
    }

    fn visit_function_call_scalar_expression(&mut self, node: &SqlFunctionCallScalarExpression) -> Rewritten {
        // Function names are part of the query shape and stay readable.
        Ok(SqlFunctionCallScalarExpression {
            name: node.name.clone(),
            arguments: self.rewrite_all(&node.arguments)?,
            is_udf: node.is_udf,
        }
        .into())
    }

    fn visit_group_by_clause(&mut self, node: &SqlGroupByClause) -> Rewritten {
        Ok(SqlGroupByClause { expressions: self.rewrite_all(&node.expressions)? }.into())
    }

    fn visit_identifier(&mut self, node: &SqlIdentifier) -> Rewritten {
        Ok(SqlIdentifier::new(self.obfuscate_string(&node.value, StringRole::Identifier)).into())
    }

    fn visit_identifier_path_expression(&mut self, node: &SqlIdentifierPathExpression) -> Rewritten {
        Ok(SqlIdentifierPathExpression {
            parent_path: self.rewrite_opt_boxed(node.parent_path.as_deref())?,
            value: self.rewrite(&node.value)?,
        }
        .into())
    }

    fn visit_input_path_collection(&mut self, node: &SqlInputPathCollection) -> Rewritten {
        Ok(SqlInputPathCollection {
            input: self.rewrite(&node.input)?,
            relative_path: self.rewrite_opt(node.relative_path.as_ref())?,
        }
        .into())
    }

    fn visit_in_scalar_expression(&mut self, node: &SqlInScalarExpression) -> Rewritten {
        Ok(SqlInScalarExpression {
            needle: self.rewrite_boxed(&*node.needle)?,
            not: node.not,
            haystack: self.rewrite_all(&node.haystack)?,
        }
        .into())
    }

    fn visit_join_collection_expression(&mut self, node: &SqlJoinCollectionExpression) -> Rewritten {
        Ok(SqlJoinCollectionExpression {
            left: self.rewrite_boxed(&*node.left)?,
            right: self.rewrite_boxed(&*node.right)?,
        }
        .into())
    }

    fn visit_like_scalar_expression(&mut self, node: &SqlLikeScalarExpression) -> Rewritten {
        Ok(SqlLikeScalarExpression {
            expression: self.rewrite_boxed(&*node.expression)?,
            pattern: self.rewrite_boxed(&*node.pattern)?,
            not: node.not,
            escape_sequence: self.rewrite_opt(node.escape_sequence.as_ref())?,
        }
        .into())
    }

    fn visit_limit_spec(&mut self, _: &SqlLimitSpec) -> Rewritten {
        Ok(SqlLimitSpec::new(Self::zero()).into())
    }

    fn visit_literal_scalar_expression(&mut self, node: &SqlLiteralScalarExpression) -> Rewritten {
        Ok(SqlLiteralScalarExpression { literal: self.rewrite(&node.literal)? }.into())
    }

    fn visit_member_indexer_scalar_expression(&mut self, node: &SqlMemberIndexerScalarExpression) -> Rewritten {
        Ok(SqlMemberIndexerScalarExpression {
            member: self.rewrite_boxed(&*node.member)?,
            indexer: self.rewrite_boxed(&*node.indexer)?,
        }
        .into())
    }

    fn visit_null_literal(&mut self, node: &SqlNullLiteral) -> Rewritten {
        Ok(node.clone().into())
    }

    fn visit_number_literal(&mut self, node: &SqlNumberLiteral) -> Rewritten {
        Ok(SqlNumberLiteral::new(self.obfuscate_number(node.value)).into())
    }

    fn visit_number_path_expression(&mut self, node: &SqlNumberPathExpression) -> Rewritten {
        Ok(SqlNumberPathExpression {
            parent_path: self.rewrite_opt_boxed(node.parent_path.as_deref())?,
            value: self.rewrite(&node.value)?,
        }
        .into())
    }

    fn visit_object_create_scalar_expression(&mut self, node: &SqlObjectCreateScalarExpression) -> Rewritten {
        Ok(SqlObjectCreateScalarExpression { properties: self.rewrite_all(&node.properties)? }.into())
    }

    fn visit_object_literal(&mut self, node: &SqlObjectLiteral) -> Rewritten {
        Ok(SqlObjectLiteral::new(self.obfuscate_json(&node.value)).into())
    }

    fn visit_object_property(&mut self, node: &SqlObjectProperty) -> Rewritten {
        Ok(SqlObjectProperty { name: self.rewrite(&node.name)?, value: self.rewrite(&node.value)? }.into())
    }

    fn visit_offset_limit_clause(&mut self, node: &SqlOffsetLimitClause) -> Rewritten {
        Ok(SqlOffsetLimitClause {
            offset_spec: self.rewrite(&node.offset_spec)?,
            limit_spec: self.rewrite(&node.limit_spec)?,
        }
        .into())
    }

    fn visit_offset_spec(&mut self, _: &SqlOffsetSpec) -> Rewritten {
        Ok(SqlOffsetSpec::new(Self::zero()).into())
    }

    fn visit_order_by_clause(&mut self, node: &SqlOrderByClause) -> Rewritten {
        Ok(SqlOrderByClause { order_by_items: self.rewrite_all(&node.order_by_items)? }.into())
    }

    fn visit_order_by_item(&mut self, node: &SqlOrderByItem) -> Rewritten {
        Ok(SqlOrderByItem { expression: self.rewrite(&node.expression)?, is_descending: node.is_descending }.into())
    }

    fn visit_parameter(&mut self, node: &SqlParameter) -> Rewritten {
        Ok(SqlParameter::new(self.obfuscate_string(&node.name, StringRole::Parameter)).into())
    }

    fn visit_parameter_ref_scalar_expression(&mut self, node: &SqlParameterRefScalarExpression) -> Rewritten {
        Ok(SqlParameterRefScalarExpression { parameter: self.rewrite(&node.parameter)? }.into())
    }

    fn visit_program(&mut self, node: &SqlProgram) -> Rewritten {
        Ok(SqlProgram { query: self.rewrite(&node.query)? }.into())
    }

    fn visit_property_name(&mut self, node: &SqlPropertyName) -> Rewritten {
        Ok(SqlPropertyName::new(self.obfuscate_string(&node.value, StringRole::PropertyName)).into())
    }

    fn visit_property_ref_scalar_expression(&mut self, node: &SqlPropertyRefScalarExpression) -> Rewritten {
        Ok(SqlPropertyRefScalarExpression {
            member: self.rewrite_opt_boxed(node.member.as_deref())?,
            identifier: self.rewrite(&node.identifier)?,
        }
        .into())
    }

    fn visit_query(&mut self, node: &SqlQuery) -> Rewritten {
        Ok(SqlQuery {
            select_clause: self.rewrite(&node.select_clause)?,
            from_clause: self.rewrite_opt(node.from_clause.as_ref())?,
            where_clause: self.rewrite_opt(node.where_clause.as_ref())?,
            group_by_clause: self.rewrite_opt(node.group_by_clause.as_ref())?,
            order_by_clause: self.rewrite_opt(node.order_by_clause.as_ref())?,
            offset_limit_clause: self.rewrite_opt(node.offset_limit_clause.as_ref())?,
        }
        .into())
    }

    fn visit_select_clause(&mut self, node: &SqlSelectClause) -> Rewritten {
        Ok(SqlSelectClause {
            select_spec: self.rewrite(&node.select_spec)?,
            top_spec: self.rewrite_opt(node.top_spec.as_ref())?,
            has_distinct: node.has_distinct,
        }
        .into())
    }

    fn visit_select_item(&mut self, node: &SqlSelectItem) -> Rewritten {
        Ok(SqlSelectItem {
            expression: self.rewrite(&node.expression)?,
            alias: self.rewrite_opt(node.alias.as_ref())?,
        }
        .into())
    }

    fn visit_select_list_spec(&mut self, node: &SqlSelectListSpec) -> Rewritten {
        Ok(SqlSelectListSpec { items: self.rewrite_all(&node.items)? }.into())
    }

    fn visit_select_star_spec(&mut self, node: &SqlSelectStarSpec) -> Rewritten {
        Ok(node.clone().into())
    }

    fn visit_select_value_spec(&mut self, node: &SqlSelectValueSpec) -> Rewritten {
        Ok(SqlSelectValueSpec { expression: self.rewrite(&node.expression)? }.into())
    }

    fn visit_string_literal(&mut self, node: &SqlStringLiteral) -> Rewritten {
        Ok(SqlStringLiteral::new(self.obfuscate_string(&node.value, StringRole::StringLiteral)).into())
    }

    fn visit_string_path_expression(&mut self, node: &SqlStringPathExpression) -> Rewritten {
        Ok(SqlStringPathExpression {
            parent_path: self.rewrite_opt_boxed(node.parent_path.as_deref())?,
            value: self.rewrite(&node.value)?,
        }
        .into())
    }

    fn visit_subquery_collection(&mut self, node: &SqlSubqueryCollection) -> Rewritten {
        Ok(SqlSubqueryCollection { query: self.rewrite_boxed(&*node.query)? }.into())
    }

    fn visit_subquery_scalar_expression(&mut self, node: &SqlSubqueryScalarExpression) -> Rewritten {
        Ok(SqlSubqueryScalarExpression { query: self.rewrite_boxed(&*node.query)? }.into())
    }

    fn visit_top_spec(&mut self, _: &SqlTopSpec) -> Rewritten {
        Ok(SqlTopSpec::new(Self::zero()).into())
    }

    fn visit_unary_scalar_expression(&mut self, node: &SqlUnaryScalarExpression) -> Rewritten {
        Ok(SqlUnaryScalarExpression {
            operator_kind: node.operator_kind,
            expression: self.rewrite_boxed(&*node.expression)?,
        }
        .into())
    }

    fn visit_undefined_literal(&mut self, node: &SqlUndefinedLiteral) -> Rewritten {
        Ok(node.clone().into())
    }

    fn visit_where_clause(&mut self, node: &SqlWhereClause) -> Rewritten {
        Ok(SqlWhereClause { filter_expression: self.rewrite(&node.filter_expression)? }.into())
    }
}
