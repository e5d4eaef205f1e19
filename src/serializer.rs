//! Query text rendering.
//!
//! [`SqlTextSerializer`] appends tokens for one tree into its own buffer. It
//! has two layouts and one substitution mode:
//!
//! - compact: everything on one line, every clause followed by a single space
//! - pretty: clauses on their own lines, nested queries and multi-item lists
//!   indented by four spaces
//! - parameterized: boolean, string, object, and number literals that appear
//!   in a [`ParameterBindings`] table are written as the bound parameter name
//!
//! A serializer instance renders exactly one tree and is consumed by
//! [`SqlTextSerializer::finish`].

use serde_json::Value;
use unicode_general_category::{GeneralCategory, get_general_category};

use crate::ast::*;
use crate::error::SqlObjectError;
use crate::number::Number64;
use crate::visit::{Accept, SqlObjectKind, SqlObjectVisitor};

const TAB: &str = "    ";

/// Renders `node` as compact query text.
pub fn serialize(node: &(impl Accept + ?Sized)) -> Result<String, SqlObjectError> {
    render(node, SqlTextSerializer::new(false))
}

/// Renders `node` with one clause per line.
pub fn pretty_print(node: &(impl Accept + ?Sized)) -> Result<String, SqlObjectError> {
    render(node, SqlTextSerializer::new(true))
}

/// Renders `node`, writing bound parameter names in place of matching literals.
pub fn serialize_parameterized(
    node: &(impl Accept + ?Sized),
    bindings: &ParameterBindings,
) -> Result<String, SqlObjectError> {
    render(node, SqlTextSerializer::parameterized(bindings, false))
}

fn render(node: &(impl Accept + ?Sized), mut serializer: SqlTextSerializer<'_>) -> Result<String, SqlObjectError> {
    node.accept(&mut serializer)?;
    Ok(serializer.finish())
}

// ============================================================================
// Parameter bindings
// ============================================================================

/// Literal values that should be written as parameter references.
///
/// Keys are arbitrary JSON values. Booleans, strings, and objects match by
/// JSON equality; numeric literals match any numeric key with the same value,
/// so a binding for `5` also applies to the literal `5.0`. When several keys
/// match, the earliest inserted one wins.
#[derive(Debug, Clone, Default)]
pub struct ParameterBindings {
    entries: Vec<(Value, String)>,
}

impl ParameterBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to `name`, returning the name it was previously bound to.
    pub fn insert(&mut self, value: Value, name: impl Into<String>) -> Option<String> {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == value) {
            Some((_, existing)) => Some(std::mem::replace(existing, name)),
            None => {
                self.entries.push((value, name));
                None
            }
        }
    }

    pub fn get(&self, value: &Value) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == value)
            .map(|(_, name)| name.as_str())
    }

    /// First binding whose key is a number equal in value to `number`.
    pub fn find_number(&self, number: Number64) -> Option<&str> {
        self.entries.iter().find_map(|(key, name)| {
            let Value::Number(key) = key else { return None };
            let key = Number64::try_from(key).ok()?;
            (key == number).then_some(name.as_str())
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &str)> {
        self.entries.iter().map(|(value, name)| (value, name.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(Value, S)> for ParameterBindings {
    fn from_iter<I: IntoIterator<Item = (Value, S)>>(iter: I) -> Self {
        let mut bindings = ParameterBindings::new();
        for (value, name) in iter {
            bindings.insert(value, name);
        }
        bindings
    }
}

// ============================================================================
// Literal formatting
// ============================================================================

/// Shortest round-trip text for a double.
///
/// Decimal exponents in `[-5, 15)` use fixed notation; others use `1E+15`
/// style with at least two exponent digits.
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // `{:e}` gives the shortest digits that round-trip, e.g. "-1.25e-7"
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let mut out = String::from(sign);
    if (-5..15).contains(&exponent) {
        if exponent >= 0 {
            let whole = exponent as usize + 1;
            if digits.len() <= whole {
                out.push_str(&digits);
                out.push_str(&"0".repeat(whole - digits.len()));
            } else {
                out.push_str(&digits[..whole]);
                out.push('.');
                out.push_str(&digits[whole..]);
            }
        } else {
            out.push_str("0.");
            out.push_str(&"0".repeat((-exponent - 1) as usize));
            out.push_str(&digits);
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('E');
        out.push(if exponent < 0 { '-' } else { '+' });
        out.push_str(&format!("{:02}", exponent.unsigned_abs()));
    }
    out
}

pub fn format_number(value: Number64) -> String {
    match value {
        Number64::Integer(i) => i.to_string(),
        Number64::Double(d) => format_double(d),
    }
}

/// Appends `value` with string-literal escaping applied.
///
/// `"` and `\` and the C0 short escapes are always escaped. Any other
/// character is written verbatim if it is a letter, number, separator,
/// punctuation, or symbol, and as `\uXXXX` per UTF-16 unit otherwise.
pub fn escape_string(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if is_printable(c) => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
        }
    }
}

fn is_printable(c: char) -> bool {
    use GeneralCategory::*;
    matches!(
        get_general_category(c),
        UppercaseLetter
            | LowercaseLetter
            | TitlecaseLetter
            | ModifierLetter
            | OtherLetter
            | DecimalNumber
            | LetterNumber
            | OtherNumber
            | SpaceSeparator
            | LineSeparator
            | ParagraphSeparator
            | ConnectorPunctuation
            | DashPunctuation
            | OpenPunctuation
            | ClosePunctuation
            | InitialPunctuation
            | FinalPunctuation
            | OtherPunctuation
            | MathSymbol
            | CurrencySymbol
            | ModifierSymbol
            | OtherSymbol
    )
}

// ============================================================================
// Serializer
// ============================================================================

pub struct SqlTextSerializer<'p> {
    buf: String,
    indent: usize,
    pretty: bool,
    bindings: Option<&'p ParameterBindings>,
}

type Written = Result<(), SqlObjectError>;

impl<'p> SqlTextSerializer<'p> {
    pub fn new(pretty: bool) -> Self {
        Self { buf: String::new(), indent: 0, pretty, bindings: None }
    }

    pub fn parameterized(bindings: &'p ParameterBindings, pretty: bool) -> Self {
        Self { bindings: Some(bindings), ..Self::new(pretty) }
    }

    /// The rendered text. Pretty output carries no trailing whitespace.
    pub fn finish(self) -> String {
        if self.pretty {
            self.buf.trim_end().to_string()
        } else {
            self.buf
        }
    }

    fn write(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    // ── Layout ──────────────────────────────────────────────────────

    /// Starts a new line in pretty mode, dropping trailing spaces and never
    /// leaving an empty line behind.
    fn newline(&mut self) {
        if !self.pretty {
            return;
        }
        let kept = self.buf.trim_end_matches(' ').len();
        self.buf.truncate(kept);
        if !self.buf.is_empty() && !self.buf.ends_with('\n') {
            self.buf.push('\n');
        }
        for _ in 0..self.indent {
            self.buf.push_str(TAB);
        }
    }

    fn start_context(&mut self, open: &str) {
        self.indent += 1;
        self.write(open);
        self.newline();
    }

    fn delimiter(&mut self, delimiter: &str) {
        self.write(delimiter);
        if self.pretty {
            self.newline();
        } else {
            self.write(" ");
        }
    }

    fn end_context(&mut self, close: &str) {
        self.indent -= 1;
        self.newline();
        self.write(close);
    }

    fn clause_separator(&mut self) {
        if self.pretty {
            self.newline();
        } else {
            self.write(" ");
        }
    }

    /// `open`, the items separated by `, `, then `close`. Lists of two or
    /// more items are laid out one per line in pretty mode.
    fn write_list<T: Accept>(&mut self, open: &str, items: &[T], close: &str) -> Written {
        match items {
            [] => {
                self.write(open);
                self.write(close);
            }
            [item] => {
                self.write(open);
                item.accept(self)?;
                self.write(close);
            }
            _ => {
                self.start_context(open);
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.delimiter(",");
                    }
                    item.accept(self)?;
                }
                self.end_context(close);
            }
        }
        Ok(())
    }

    /// Comma-separated items on one line; the list must not be empty.
    fn write_inline_list<T: Accept>(&mut self, kind: SqlObjectKind, items: &[T]) -> Written {
        if items.is_empty() {
            return Err(SqlObjectError::empty_list(kind));
        }
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            item.accept(self)?;
        }
        Ok(())
    }

    fn write_subquery(&mut self, prefix: &str, query: &SqlQuery) -> Written {
        self.write(prefix);
        self.start_context("(");
        query.accept(self)?;
        self.end_context(")");
        Ok(())
    }

    /// Writes the bound parameter name for `value` if there is one.
    fn write_binding(&mut self, value: &Value) -> bool {
        match self.bindings.and_then(|bindings| bindings.get(value)) {
            Some(name) => {
                self.write(name);
                true
            }
            None => false,
        }
    }
}

impl SqlObjectVisitor for SqlTextSerializer<'_> {
    type Output = Written;

    fn visit_aliased_collection_expression(&mut self, node: &SqlAliasedCollectionExpression) -> Written {
        node.collection.accept(self)?;
        if let Some(alias) = &node.alias {
            self.write(" AS ");
            alias.accept(self)?;
        }
        Ok(())
    }

    fn visit_array_create_scalar_expression(&mut self, node: &SqlArrayCreateScalarExpression) -> Written {
        self.write_list("[", &node.items, "]")
    }

    fn visit_array_iterator_collection_expression(&mut self, node: &SqlArrayIteratorCollectionExpression) -> Written {
        node.identifier.accept(self)?;
        self.write(" IN ");
        node.collection.accept(self)
    }

    fn visit_array_scalar_expression(&mut self, node: &SqlArrayScalarExpression) -> Written {
        self.write_subquery("ARRAY", &node.query)
    }

    fn visit_between_scalar_expression(&mut self, node: &SqlBetweenScalarExpression) -> Written {
        self.write("(");
        node.expression.accept(self)?;
        if node.not {
            self.write(" NOT");
        }
        self.write(" BETWEEN ");
        node.start_inclusive.accept(self)?;
        self.write(" AND ");
        node.end_inclusive.accept(self)?;
        self.write(")");
        Ok(())
    }

    fn visit_binary_scalar_expression(&mut self, node: &SqlBinaryScalarExpression) -> Written {
        self.write("(");
        node.left.accept(self)?;
        self.write(" ");
        self.write(node.operator_kind.symbol());
        self.write(" ");
        node.right.accept(self)?;
        self.write(")");
        Ok(())
    }

    fn visit_boolean_literal(&mut self, node: &SqlBooleanLiteral) -> Written {
        if !self.write_binding(&Value::Bool(node.value)) {
            self.write(if node.value { "true" } else { "false" });
        }
        Ok(())
    }

    fn visit_coalesce_scalar_expression(&mut self, node: &SqlCoalesceScalarExpression) -> Written {
        self.write("(");
        node.left.accept(self)?;
        self.write(" ?? ");
        node.right.accept(self)?;
        self.write(")");
        Ok(())
    }

    fn visit_conditional_scalar_expression(&mut self, node: &SqlConditionalScalarExpression) -> Written {
        self.write("(");
        node.condition.accept(self)?;
        self.write(" ? ");
        node.consequent.accept(self)?;
        self.write(" : ");
        node.alternative.accept(self)?;
        self.write(")");
        Ok(())
    }

    fn visit_exists_scalar_expression(&mut self, node: &SqlExistsScalarExpression) -> Written {
        self.write_subquery("EXISTS", &node.query)
    }

    fn visit_from_clause(&mut self, node: &SqlFromClause) -> Written {
        self.write("FROM ");
        node.expression.accept(self)
    }

    fn visit_function_call_scalar_expression(&mut self, node: &SqlFunctionCallScalarExpression) -> Written {
        if node.is_udf {
            self.write("udf.");
        }
        node.name.accept(self)?;
        self.write_list("(", &node.arguments, ")")
    }

    fn visit_group_by_clause(&mut self, node: &SqlGroupByClause) -> Written {
        self.write("GROUP BY ");
        self.write_inline_list(SqlObjectKind::GroupByClause, &node.expressions)
    }

    fn visit_identifier(&mut self, node: &SqlIdentifier) -> Written {
        self.write(&node.value);
        Ok(())
    }

    fn visit_identifier_path_expression(&mut self, node: &SqlIdentifierPathExpression) -> Written {
        if let Some(parent) = &node.parent_path {
            parent.accept(self)?;
        }
        self.write(".");
        node.value.accept(self)
    }

    fn visit_input_path_collection(&mut self, node: &SqlInputPathCollection) -> Written {
        node.input.accept(self)?;
        if let Some(path) = &node.relative_path {
            path.accept(self)?;
        }
        Ok(())
    }

    fn visit_in_scalar_expression(&mut self, node: &SqlInScalarExpression) -> Written {
        self.write("(");
        node.needle.accept(self)?;
        if node.not {
            self.write(" NOT");
        }
        self.write(" IN ");
        self.write_list("(", &node.haystack, ")")?;
        self.write(")");
        Ok(())
    }

    fn visit_join_collection_expression(&mut self, node: &SqlJoinCollectionExpression) -> Written {
        node.left.accept(self)?;
        self.newline();
        self.write(" JOIN ");
        node.right.accept(self)
    }

    fn visit_like_scalar_expression(&mut self, node: &SqlLikeScalarExpression) -> Written {
        self.write("(");
        node.expression.accept(self)?;
        if node.not {
            self.write(" NOT");
        }
        self.write(" LIKE ");
        node.pattern.accept(self)?;
        if let Some(escape) = &node.escape_sequence {
            self.write(" ESCAPE ");
            escape.accept(self)?;
        }
        self.write(")");
        Ok(())
    }

    fn visit_limit_spec(&mut self, node: &SqlLimitSpec) -> Written {
        self.write("LIMIT ");
        node.limit_expression.accept(self)
    }

    fn visit_literal_scalar_expression(&mut self, node: &SqlLiteralScalarExpression) -> Written {
        node.literal.accept(self)
    }

    fn visit_member_indexer_scalar_expression(&mut self, node: &SqlMemberIndexerScalarExpression) -> Written {
        node.member.accept(self)?;
        self.write("[");
        node.indexer.accept(self)?;
        self.write("]");
        Ok(())
    }

    fn visit_null_literal(&mut self, _: &SqlNullLiteral) -> Written {
        self.write("null");
        Ok(())
    }

    fn visit_number_literal(&mut self, node: &SqlNumberLiteral) -> Written {
        match self.bindings.and_then(|bindings| bindings.find_number(node.value)) {
            Some(name) => self.write(name),
            None => self.write(&format_number(node.value)),
        }
        Ok(())
    }

    fn visit_number_path_expression(&mut self, node: &SqlNumberPathExpression) -> Written {
        if let Some(parent) = &node.parent_path {
            parent.accept(self)?;
        }
        self.write("[");
        node.value.accept(self)?;
        self.write("]");
        Ok(())
    }

    fn visit_object_create_scalar_expression(&mut self, node: &SqlObjectCreateScalarExpression) -> Written {
        self.write_list("{", &node.properties, "}")
    }

    fn visit_object_literal(&mut self, node: &SqlObjectLiteral) -> Written {
        if !self.write_binding(&node.value) {
            let text = node.value.to_string();
            self.write(&text);
        }
        Ok(())
    }

    fn visit_object_property(&mut self, node: &SqlObjectProperty) -> Written {
        node.name.accept(self)?;
        self.write(": ");
        node.value.accept(self)
    }

    fn visit_offset_limit_clause(&mut self, node: &SqlOffsetLimitClause) -> Written {
        node.offset_spec.accept(self)?;
        self.write(" ");
        node.limit_spec.accept(self)
    }

    fn visit_offset_spec(&mut self, node: &SqlOffsetSpec) -> Written {
        self.write("OFFSET ");
        node.offset_expression.accept(self)
    }

    fn visit_order_by_clause(&mut self, node: &SqlOrderByClause) -> Written {
        self.write("ORDER BY ");
        self.write_inline_list(SqlObjectKind::OrderByClause, &node.order_by_items)
    }

    fn visit_order_by_item(&mut self, node: &SqlOrderByItem) -> Written {
        node.expression.accept(self)?;
        self.write(if node.is_descending { " DESC" } else { " ASC" });
        Ok(())
    }

    fn visit_parameter(&mut self, node: &SqlParameter) -> Written {
        self.write(&node.name);
        Ok(())
    }

    fn visit_parameter_ref_scalar_expression(&mut self, node: &SqlParameterRefScalarExpression) -> Written {
        node.parameter.accept(self)
    }

    fn visit_program(&mut self, node: &SqlProgram) -> Written {
        node.query.accept(self)
    }

    fn visit_property_name(&mut self, node: &SqlPropertyName) -> Written {
        self.write("\"");
        self.write(&node.value);
        self.write("\"");
        Ok(())
    }

    fn visit_property_ref_scalar_expression(&mut self, node: &SqlPropertyRefScalarExpression) -> Written {
        if let Some(member) = &node.member {
            member.accept(self)?;
            self.write(".");
        }
        node.identifier.accept(self)
    }

    fn visit_query(&mut self, node: &SqlQuery) -> Written {
        node.select_clause.accept(self)?;
        self.clause_separator();

        if let Some(from) = &node.from_clause {
            from.accept(self)?;
            self.clause_separator();
        }
        if let Some(filter) = &node.where_clause {
            filter.accept(self)?;
            self.clause_separator();
        }
        if let Some(group_by) = &node.group_by_clause {
            group_by.accept(self)?;
            self.clause_separator();
        }
        if let Some(order_by) = &node.order_by_clause {
            order_by.accept(self)?;
            self.clause_separator();
        }
        if let Some(offset_limit) = &node.offset_limit_clause {
            offset_limit.accept(self)?;
            self.clause_separator();
        }
        Ok(())
    }

    fn visit_select_clause(&mut self, node: &SqlSelectClause) -> Written {
        self.write("SELECT ");
        if node.has_distinct {
            self.write("DISTINCT ");
        }
        if let Some(top) = &node.top_spec {
            top.accept(self)?;
            self.write(" ");
        }
        node.select_spec.accept(self)
    }

    fn visit_select_item(&mut self, node: &SqlSelectItem) -> Written {
        node.expression.accept(self)?;
        if let Some(alias) = &node.alias {
            self.write(" AS ");
            alias.accept(self)?;
        }
        Ok(())
    }

    fn visit_select_list_spec(&mut self, node: &SqlSelectListSpec) -> Written {
        match node.items.as_slice() {
            [] => Err(SqlObjectError::empty_list(SqlObjectKind::SelectListSpec)),
            [item] => item.accept(self),
            items => {
                self.indent += 1;
                self.newline();
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.delimiter(",");
                    }
                    item.accept(self)?;
                }
                self.indent -= 1;
                Ok(())
            }
        }
    }

    fn visit_select_star_spec(&mut self, _: &SqlSelectStarSpec) -> Written {
        self.write("*");
        Ok(())
    }

    fn visit_select_value_spec(&mut self, node: &SqlSelectValueSpec) -> Written {
        self.write("VALUE ");
        node.expression.accept(self)
    }

    fn visit_string_literal(&mut self, node: &SqlStringLiteral) -> Written {
        if !self.write_binding(&Value::String(node.value.clone())) {
            self.write("\"");
            escape_string(&node.value, &mut self.buf);
            self.write("\"");
        }
        Ok(())
    }

    fn visit_string_path_expression(&mut self, node: &SqlStringPathExpression) -> Written {
        if let Some(parent) = &node.parent_path {
            parent.accept(self)?;
        }
        self.write("[");
        node.value.accept(self)?;
        self.write("]");
        Ok(())
    }

    fn visit_subquery_collection(&mut self, node: &SqlSubqueryCollection) -> Written {
        self.write_subquery("", &node.query)
    }

    fn visit_subquery_scalar_expression(&mut self, node: &SqlSubqueryScalarExpression) -> Written {
        self.write_subquery("", &node.query)
    }

    fn visit_top_spec(&mut self, node: &SqlTopSpec) -> Written {
        self.write("TOP ");
        node.top_expression.accept(self)
    }

    fn visit_unary_scalar_expression(&mut self, node: &SqlUnaryScalarExpression) -> Written {
        self.write("(");
        self.write(node.operator_kind.symbol());
        self.write(" ");
        node.expression.accept(self)?;
        self.write(")");
        Ok(())
    }

    fn visit_undefined_literal(&mut self, _: &SqlUndefinedLiteral) -> Written {
        self.write("undefined");
        Ok(())
    }

    fn visit_where_clause(&mut self, node: &SqlWhereClause) -> Written {
        self.write("WHERE ");
        node.filter_expression.accept(self)
    }
}
