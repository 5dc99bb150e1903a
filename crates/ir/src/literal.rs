//! Structured-literal parser for migration column blocks
//!
//! Migrations declare their columns as a JavaScript object literal. This
//! module parses that literal into a [`Value`] tree without evaluating it.
//! The accepted language is a JSON superset:
//!
//! - bare, single-, double- or backtick-quoted keys
//! - `'…'`, `"…"` and `` `…` `` strings, with JavaScript escapes; template
//!   interpolation is rejected
//! - trailing commas, `//` and `/* */` comments
//! - `true`, `false`, `null`, `undefined`
//! - dotted paths with an optional call, e.g. `DataTypes.DECIMAL(10, 2)`
//!   or `new Date()`
//!
//! The parsed tree can be rendered back into TypeScript source with
//! [`render_literal`].

use modelgen_core::{ScaffoldError, ScaffoldResult};
use std::fmt::Write as _;

/// Indentation unit used when rendering object literals
pub const INDENT: &str = "    ";

// ============================================================================
// Value
// ============================================================================

/// A parsed literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Object literal; members keep their declaration order
    Object(Vec<(String, Value)>),
    Array(Vec<Value>),
    String(String),
    /// Numeric literal, kept as written
    Number(String),
    Bool(bool),
    Null,
    Undefined,
    /// Identifier path, possibly called
    Expr(Expr),
}

/// An identifier path such as `DataTypes.STRING` or `Sequelize.fn('now')`
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Whether the expression is prefixed with `new`
    pub construct: bool,
    /// Dotted path segments
    pub path: Vec<String>,
    /// Call arguments, `None` when the path is not called
    pub args: Option<Vec<Value>>,
}

impl Expr {
    /// Create an uncalled path expression
    pub fn path<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            construct: false,
            path: segments.into_iter().map(Into::into).collect(),
            args: None,
        }
    }

    /// The last path segment (`DECIMAL` for `Sequelize.DECIMAL(10, 2)`)
    pub fn last_segment(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }
}

impl Value {
    /// Look up a member of an object literal
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(members) => members.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Members of an object literal
    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Value::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    /// Short human name of the value's kind, for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Object(_) => "object",
            Value::Array(_) => "array",
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Expr(_) => "expression",
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a complete literal; only whitespace and comments may follow it.
pub fn parse_literal(src: &str) -> ScaffoldResult<Value> {
    let (value, end) = parse_literal_at(src, 0)?;
    let mut parser = Parser { src, pos: end };
    parser.skip_trivia()?;
    if parser.pos < src.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

/// Parse one literal starting at byte offset `start`.
///
/// Returns the value and the byte offset just past it. Offsets in error
/// messages are relative to the whole of `src`.
pub fn parse_literal_at(src: &str, start: usize) -> ScaffoldResult<(Value, usize)> {
    let mut parser = Parser { src, pos: start };
    let value = parser.parse_value()?;
    Ok((value, parser.pos))
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, msg: &str) -> ScaffoldError {
        ScaffoldError::malformed(format!("{} at offset {}", msg, self.pos))
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn expect(&mut self, expected: char) -> ScaffoldResult<()> {
        self.skip_trivia()?;
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(self.error(&format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(&format!("expected '{}', found end of input", expected))),
        }
    }

    /// Skip whitespace and comments
    fn skip_trivia(&mut self) -> ScaffoldResult<()> {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    let open = self.pos;
                    match self.src[self.pos + 2..].find("*/") {
                        Some(end) => self.pos += 2 + end + 2,
                        None => {
                            self.pos = open;
                            return Err(self.error("unterminated block comment"));
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_value(&mut self) -> ScaffoldResult<Value> {
        self.skip_trivia()?;
        match self.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some(q @ ('"' | '\'' | '`')) => self.parse_string(q).map(Value::String),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                self.parse_number()
            }
            Some(c) if is_ident_start(c) => self.parse_word(),
            Some(c) => Err(self.error(&format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_object(&mut self) -> ScaffoldResult<Value> {
        self.expect('{')?;
        let mut members = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(members));
            }
            let key = self.parse_key()?;
            self.expect(':')?;
            let value = self.parse_value()?;
            members.push((key, value));

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                None => return Err(self.error("unterminated object")),
                Some(c) => {
                    return Err(self.error(&format!("expected ',' or '}}', found '{}'", c)));
                }
            }
        }
    }

    fn parse_key(&mut self) -> ScaffoldResult<String> {
        self.skip_trivia()?;
        match self.peek() {
            Some(q @ ('"' | '\'' | '`')) => self.parse_string(q),
            Some(c) if is_ident_start(c) => Ok(self.parse_ident()),
            Some(c) if c.is_ascii_digit() => Ok(self.take_while(|c| c.is_ascii_alphanumeric())),
            Some(c) => Err(self.error(&format!("expected object key, found '{}'", c))),
            None => Err(self.error("unterminated object")),
        }
    }

    fn parse_array(&mut self) -> ScaffoldResult<Value> {
        self.expect('[')?;
        let items = self.parse_sequence(']')?;
        Ok(Value::Array(items))
    }

    /// Comma separated values up to `close`, which is consumed
    fn parse_sequence(&mut self, close: char) -> ScaffoldResult<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }
            items.push(self.parse_value()?);

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {}
                None => return Err(self.error(&format!("expected '{}'", close))),
                Some(c) => {
                    return Err(self.error(&format!(
                        "expected ',' or '{}', found '{}'",
                        close, c
                    )));
                }
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> ScaffoldResult<String> {
        let open = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('b') => out.push('\u{8}'),
                    Some('f') => out.push('\u{c}'),
                    Some('v') => out.push('\u{b}'),
                    Some('0') => out.push('\0'),
                    Some('x') => out.push(self.parse_code_point(2)?),
                    Some('u') if self.peek() == Some('{') => {
                        self.bump();
                        out.push(self.parse_braced_code_point()?);
                    }
                    Some('u') => out.push(self.parse_code_point(4)?),
                    Some('\n') => {}
                    Some(c) => out.push(c),
                    None => break,
                },
                // `${…}` needs evaluation
                Some('$') if quote == '`' && self.peek() == Some('{') => {
                    self.pos -= 1;
                    return Err(self.error("template interpolation in string literal"));
                }
                Some('\n') if quote != '`' => {
                    self.pos = open;
                    return Err(self.error("newline in string literal"));
                }
                Some(c) => out.push(c),
                None => break,
            }
        }
        self.pos = open;
        Err(self.error("unterminated string literal"))
    }

    /// Exactly `digits` hex digits, as in `\xE9` or `\u00E9`
    fn parse_code_point(&mut self, digits: usize) -> ScaffoldResult<char> {
        let src = self.src;
        let start = self.pos;
        let hex = src[start..]
            .get(..digits)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| self.error("invalid escape sequence"))?;
        self.pos += digits;
        self.code_point(hex, start)
    }

    /// `\u{1F600}`; the opening brace is already consumed
    fn parse_braced_code_point(&mut self) -> ScaffoldResult<char> {
        let start = self.pos;
        let hex = self.take_while(|c| c.is_ascii_hexdigit());
        if hex.is_empty() || hex.len() > 6 || self.peek() != Some('}') {
            self.pos = start;
            return Err(self.error("invalid escape sequence"));
        }
        self.bump();
        self.code_point(&hex, start)
    }

    fn code_point(&mut self, hex: &str, start: usize) -> ScaffoldResult<char> {
        match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
            Some(c) => Ok(c),
            None => {
                self.pos = start;
                Err(self.error(&format!("invalid code point '{}'", hex)))
            }
        }
    }

    fn parse_number(&mut self) -> ScaffoldResult<Value> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        let int = self.take_while(|c| c.is_ascii_digit());
        let mut frac = String::new();
        if self.peek() == Some('.') {
            self.bump();
            frac = self.take_while(|c| c.is_ascii_digit());
        }
        if int.is_empty() && frac.is_empty() {
            self.pos = start;
            return Err(self.error("invalid number"));
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('-' | '+')) {
                self.bump();
            }
            if self.take_while(|c| c.is_ascii_digit()).is_empty() {
                self.pos = start;
                return Err(self.error("invalid number exponent"));
            }
        }
        Ok(Value::Number(self.src[start..self.pos].to_string()))
    }

    /// Keywords and path expressions
    fn parse_word(&mut self) -> ScaffoldResult<Value> {
        let first = self.parse_ident();
        let construct = first == "new";
        let mut path = Vec::new();

        if construct {
            self.skip_trivia()?;
            match self.peek() {
                Some(c) if is_ident_start(c) => path.push(self.parse_ident()),
                _ => return Err(self.error("expected constructor after 'new'")),
            }
        } else {
            match first.as_str() {
                "true" => return Ok(Value::Bool(true)),
                "false" => return Ok(Value::Bool(false)),
                "null" => return Ok(Value::Null),
                "undefined" => return Ok(Value::Undefined),
                _ => path.push(first),
            }
        }

        loop {
            let save = self.pos;
            self.skip_trivia()?;
            if self.peek() == Some('.') {
                self.bump();
                self.skip_trivia()?;
                match self.peek() {
                    Some(c) if is_ident_start(c) => path.push(self.parse_ident()),
                    _ => return Err(self.error("expected identifier after '.'")),
                }
            } else {
                self.pos = save;
                break;
            }
        }

        let save = self.pos;
        self.skip_trivia()?;
        let args = if self.peek() == Some('(') {
            self.bump();
            Some(self.parse_sequence(')')?)
        } else {
            self.pos = save;
            None
        };

        Ok(Value::Expr(Expr {
            construct,
            path,
            args,
        }))
    }

    fn parse_ident(&mut self) -> String {
        self.take_while(is_ident_continue)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.src[start..self.pos].to_string()
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Whether `key` can be written without quotes
pub fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) => chars.all(is_ident_continue),
        _ => false,
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render a value as TypeScript source.
///
/// Objects are written one member per line, nested objects indented by
/// [`INDENT`] relative to `level`. The opening brace is not indented; the
/// caller positions it. Output is a pure function of the value.
pub fn render_literal(value: &Value, level: usize) -> String {
    let mut out = String::new();
    write_block(&mut out, value, level);
    out
}

fn write_block(out: &mut String, value: &Value, level: usize) {
    match value {
        Value::Object(members) if !members.is_empty() => {
            out.push_str("{\n");
            let inner = INDENT.repeat(level + 1);
            for (i, (key, member)) in members.iter().enumerate() {
                out.push_str(&inner);
                write_key(out, key);
                out.push_str(": ");
                write_block(out, member, level + 1);
                if i + 1 < members.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str(&INDENT.repeat(level));
            out.push('}');
        }
        other => write_inline(out, other),
    }
}

fn write_inline(out: &mut String, value: &Value) {
    match value {
        Value::Object(members) => {
            if members.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push('{');
            for (i, (key, member)) in members.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_key(out, key);
                out.push_str(": ");
                write_inline(out, member);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            write_list(out, items);
            out.push(']');
        }
        Value::String(s) => write_string(out, s),
        Value::Number(n) => out.push_str(n),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Null => out.push_str("null"),
        Value::Undefined => out.push_str("undefined"),
        Value::Expr(expr) => {
            if expr.construct {
                out.push_str("new ");
            }
            out.push_str(&expr.path.join("."));
            if let Some(args) = &expr.args {
                out.push('(');
                write_list(out, args);
                out.push(')');
            }
        }
    }
}

fn write_list(out: &mut String, items: &[Value]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_inline(out, item);
    }
}

fn write_key(out: &mut String, key: &str) {
    if is_identifier(key) {
        out.push_str(key);
    } else {
        write_string(out, key);
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn expr(path: &[&str]) -> Value {
        Value::Expr(Expr::path(path.iter().copied()))
    }

    #[test]
    fn test_parse_column_block() {
        let value = parse_literal(
            r#"{
                id: { type: DataTypes.INTEGER, primaryKey: true, autoIncrement: true },
                "total": { type: DECIMAL, allowNull: true },
            }"#,
        )
        .unwrap();

        let id = value.get("id").unwrap();
        assert_eq!(id.get("type"), Some(&expr(&["DataTypes", "INTEGER"])));
        assert_eq!(id.get("primaryKey").and_then(Value::as_bool), Some(true));

        let total = value.get("total").unwrap();
        assert_eq!(total.get("type"), Some(&expr(&["DECIMAL"])));
        assert_eq!(total.get("allowNull").and_then(Value::as_bool), Some(true));
    }

    #[test]
    fn test_parse_calls_and_constructors() {
        let value =
            parse_literal("{ a: Sequelize.DECIMAL(10, 2), b: Sequelize.fn('now'), c: new Date() }")
                .unwrap();

        let a = value.get("a").and_then(Value::as_expr).unwrap();
        assert_eq!(a.last_segment(), Some("DECIMAL"));
        assert_eq!(
            a.args,
            Some(vec![
                Value::Number("10".to_string()),
                Value::Number("2".to_string())
            ])
        );

        let b = value.get("b").and_then(Value::as_expr).unwrap();
        assert_eq!(b.args, Some(vec![Value::String("now".to_string())]));

        let c = value.get("c").and_then(Value::as_expr).unwrap();
        assert!(c.construct);
        assert_eq!(c.path, vec!["Date".to_string()]);
        assert_eq!(c.args, Some(vec![]));
    }

    #[test]
    fn test_parse_keywords_numbers_and_arrays() {
        let value =
            parse_literal("{ a: null, b: undefined, c: false, d: -1.5e3, e: [1, 'x', [],], f: {} }")
                .unwrap();
        assert_eq!(value.get("a"), Some(&Value::Null));
        assert_eq!(value.get("b"), Some(&Value::Undefined));
        assert_eq!(value.get("c"), Some(&Value::Bool(false)));
        assert_eq!(value.get("d"), Some(&Value::Number("-1.5e3".to_string())));
        assert_eq!(
            value.get("e"),
            Some(&Value::Array(vec![
                Value::Number("1".to_string()),
                Value::String("x".to_string()),
                Value::Array(vec![]),
            ]))
        );
        assert_eq!(value.get("f"), Some(&Value::Object(vec![])));
    }

    #[test]
    fn test_parse_skips_comments() {
        let value = parse_literal(
            "{\n  // primary key\n  id: /* auto */ { type: INTEGER },\n}\n// trailing\n",
        )
        .unwrap();
        assert_eq!(value.as_object().map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_parse_string_escapes_and_braces() {
        let value = parse_literal(r#"{ note: 'it\'s } not a brace', path: "a\\b" }"#).unwrap();
        assert_eq!(
            value.get("note"),
            Some(&Value::String("it's } not a brace".to_string()))
        );
        assert_eq!(value.get("path"), Some(&Value::String("a\\b".to_string())));
    }

    #[test]
    fn test_parse_code_point_escapes() {
        let value =
            parse_literal(r#"{ a: 'caf\u00e9', b: "\x41\u{1F600}", c: '\b\f\v' }"#).unwrap();
        assert_eq!(value.get("a"), Some(&Value::String("café".to_string())));
        assert_eq!(
            value.get("b"),
            Some(&Value::String("A\u{1F600}".to_string()))
        );
        assert_eq!(
            value.get("c"),
            Some(&Value::String("\u{8}\u{c}\u{b}".to_string()))
        );

        let rendered = render_literal(&value, 0);
        assert!(rendered.contains("a: \"café\""), "{}", rendered);
        assert_eq!(parse_literal(&rendered).unwrap(), value);
    }

    #[test]
    fn test_invalid_escapes_are_rejected() {
        for src in [
            r"{ a: '\u{D800}' }",
            r"{ a: '\uD800' }",
            r"{ a: '\u{110000}' }",
            r"{ a: '\u00g1' }",
            r"{ a: '\x4' }",
            r"{ a: '\u{}' }",
        ] {
            let err = parse_literal(src).unwrap_err();
            assert!(err.is_parse(), "{}: {}", src, err);
        }
    }

    #[test]
    fn test_template_interpolation_is_rejected() {
        let err = parse_literal("{ a: `id[${id}]` }").unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("interpolation"), "{}", err);

        let value = parse_literal("{ a: `$5 {x}`, b: `\\${x}` }").unwrap();
        assert_eq!(value.get("a"), Some(&Value::String("$5 {x}".to_string())));
        assert_eq!(value.get("b"), Some(&Value::String("${x}".to_string())));
    }

    #[test]
    fn test_parse_at_returns_end_offset() {
        let src = r#"createTable("orders", { total: { type: DECIMAL } })"#;
        let start = src.find('{').unwrap();
        let (value, end) = parse_literal_at(src, start).unwrap();
        assert!(value.get("total").is_some());
        assert_eq!(&src[end..], ")");
    }

    #[test]
    fn test_parse_errors_report_offset() {
        let err = parse_literal("{ a: }").unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("offset 5"), "{}", err);

        assert!(parse_literal("{ a: 1").is_err());
        assert!(parse_literal("{ a: 'open }").is_err());
        assert!(parse_literal("{ a: 1 } extra").is_err());
        assert!(parse_literal("{ a: require('x') + 1 }").is_err());
        assert!(parse_literal("{ /* never closed").is_err());
    }

    #[test]
    fn test_render_block() {
        let value = parse_literal(
            "{ id: { type: DataTypes.INTEGER, primaryKey: true }, 'order-total': { type: Sequelize.DECIMAL(10, 2), defaultValue: '0.00' }, tags: { type: ARRAY, defaultValue: [] } }",
        )
        .unwrap();

        let expected = r#"{
    id: {
        type: DataTypes.INTEGER,
        primaryKey: true
    },
    "order-total": {
        type: Sequelize.DECIMAL(10, 2),
        defaultValue: "0.00"
    },
    tags: {
        type: ARRAY,
        defaultValue: []
    }
}"#;
        assert_eq!(render_literal(&value, 0), expected);
    }

    #[test]
    fn test_render_nested_level() {
        let value = parse_literal("{ a: { b: 1 } }").unwrap();
        assert_eq!(
            render_literal(&value, 1),
            "{\n        a: {\n            b: 1\n        }\n    }"
        );
    }

    #[test]
    fn test_rendered_output_parses_back() {
        let src = "{ a: { type: new Foo.Bar('x', {k: [1, 2]}), b: `tmpl` }, c: \"q\\\"uote\" }";
        let value = parse_literal(src).unwrap();
        let rendered = render_literal(&value, 0);
        assert_eq!(parse_literal(&rendered).unwrap(), value);
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("createdAt"));
        assert!(is_identifier("$ref"));
        assert!(!is_identifier("order-total"));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier(""));
    }
}
