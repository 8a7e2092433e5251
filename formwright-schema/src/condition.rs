//! Visibility predicates: a small expression language over sibling values.
//!
//! Surface syntax: `limit`, `!limit`, `minType == characters`,
//! `limit && minType == "words"`, `a || b`, parentheses. Conditions
//! serialize to and from their surface form so the wire payload stays a
//! plain string.
//!
//! Evaluation never fails: unknown fields read as null, which is falsy.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Error from parsing a condition expression
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConditionParseError {
    /// Unexpected character in the expression
    #[error("unexpected character '{0}' in condition")]
    UnexpectedChar(char),

    /// Expression ended mid-parse
    #[error("unexpected end of condition")]
    UnexpectedEnd,

    /// A token appeared where it doesn't belong
    #[error("unexpected token '{0}' in condition")]
    UnexpectedToken(String),
}

/// A visibility predicate over sibling entries' live values.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// True when the named field's value is truthy
    Truthy(String),
    /// Logical negation
    Not(Box<Condition>),
    /// True when the named field's value loosely equals the literal
    Eq {
        /// Sibling field name
        field: String,
        /// Literal to compare against
        value: Value,
    },
    /// True when the named field's value does not loosely equal the literal
    Ne {
        /// Sibling field name
        field: String,
        /// Literal to compare against
        value: Value,
    },
    /// True when every sub-condition is true
    All(Vec<Condition>),
    /// True when any sub-condition is true
    Any(Vec<Condition>),
}

impl Condition {
    /// Shorthand for a truthiness check on one field.
    pub fn truthy(field: impl Into<String>) -> Self {
        Condition::Truthy(field.into())
    }

    /// Shorthand for an equality check against a string literal.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Eq {
            field: field.into(),
            value: Value::String(value.into()),
        }
    }

    /// Combine two conditions with logical AND.
    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::All(mut cs) => {
                cs.push(other);
                Condition::All(cs)
            }
            c => Condition::All(vec![c, other]),
        }
    }

    /// Evaluate against a map of sibling values. Unknown fields are null.
    pub fn evaluate(&self, values: &Map<String, Value>) -> bool {
        match self {
            Condition::Truthy(field) => is_truthy(values.get(field).unwrap_or(&Value::Null)),
            Condition::Not(inner) => !inner.evaluate(values),
            Condition::Eq { field, value } => {
                loose_eq(values.get(field).unwrap_or(&Value::Null), value)
            }
            Condition::Ne { field, value } => {
                !loose_eq(values.get(field).unwrap_or(&Value::Null), value)
            }
            Condition::All(cs) => cs.iter().all(|c| c.evaluate(values)),
            Condition::Any(cs) => cs.iter().any(|c| c.evaluate(values)),
        }
    }

    /// Parse the surface syntax.
    pub fn parse(expr: &str) -> Result<Self, ConditionParseError> {
        let tokens = tokenize(expr)?;
        let mut parser = Parser { tokens, pos: 0 };
        let cond = parser.parse_or()?;
        if parser.pos != parser.tokens.len() {
            return Err(ConditionParseError::UnexpectedToken(
                parser.tokens[parser.pos].to_string(),
            ));
        }
        Ok(cond)
    }
}

/// JSON truthiness: null, false, 0, "", and empty arrays are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Loose equality: exact JSON equality, or equality of canonical string
/// forms (so `min == 5` matches both the number 5 and the string "5").
fn loose_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    canonical(a) == canonical(b)
}

fn canonical(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Literal(Value),
    Bang,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "{s}"),
            Token::Literal(v) => write!(f, "{v}"),
            Token::Bang => write!(f, "!"),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

fn tokenize(expr: &str) -> Result<Vec<Token>, ConditionParseError> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '!' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::NotEq);
                } else {
                    tokens.push(Token::Bang);
                }
            }
            '=' => {
                chars.next();
                if chars.next() == Some('=') {
                    tokens.push(Token::EqEq);
                } else {
                    return Err(ConditionParseError::UnexpectedChar('='));
                }
            }
            '&' => {
                chars.next();
                if chars.next() == Some('&') {
                    tokens.push(Token::AndAnd);
                } else {
                    return Err(ConditionParseError::UnexpectedChar('&'));
                }
            }
            '|' => {
                chars.next();
                if chars.next() == Some('|') {
                    tokens.push(Token::OrOr);
                } else {
                    return Err(ConditionParseError::UnexpectedChar('|'));
                }
            }
            '\'' | '"' => {
                let quote = c;
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some(c) if c == quote => break,
                        Some(c) => s.push(c),
                        None => return Err(ConditionParseError::UnexpectedEnd),
                    }
                }
                tokens.push(Token::Literal(Value::String(s)));
            }
            c if c.is_ascii_digit() => {
                let mut s = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        s.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let num: f64 = s
                    .parse()
                    .map_err(|_| ConditionParseError::UnexpectedToken(s.clone()))?;
                let value = serde_json::Number::from_f64(num)
                    .map(Value::Number)
                    .unwrap_or(Value::Null);
                tokens.push(Token::Literal(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut s = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        s.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match s.as_str() {
                    "true" => tokens.push(Token::Literal(Value::Bool(true))),
                    "false" => tokens.push(Token::Literal(Value::Bool(false))),
                    _ => tokens.push(Token::Ident(s)),
                }
            }
            other => return Err(ConditionParseError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn parse_or(&mut self) -> Result<Condition, ConditionParseError> {
        let mut terms = vec![self.parse_and()?];
        while self.peek() == Some(&Token::OrOr) {
            self.next();
            terms.push(self.parse_and()?);
        }
        Ok(if terms.len() == 1 {
            terms.pop().unwrap()
        } else {
            Condition::Any(terms)
        })
    }

    fn parse_and(&mut self) -> Result<Condition, ConditionParseError> {
        let mut terms = vec![self.parse_unary()?];
        while self.peek() == Some(&Token::AndAnd) {
            self.next();
            terms.push(self.parse_unary()?);
        }
        Ok(if terms.len() == 1 {
            terms.pop().unwrap()
        } else {
            Condition::All(terms)
        })
    }

    fn parse_unary(&mut self) -> Result<Condition, ConditionParseError> {
        if self.peek() == Some(&Token::Bang) {
            self.next();
            return Ok(Condition::Not(Box::new(self.parse_unary()?)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Condition, ConditionParseError> {
        match self.next() {
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(t) => Err(ConditionParseError::UnexpectedToken(t.to_string())),
                    None => Err(ConditionParseError::UnexpectedEnd),
                }
            }
            Some(Token::Ident(field)) => match self.peek() {
                Some(Token::EqEq) => {
                    self.next();
                    let value = self.parse_literal()?;
                    Ok(Condition::Eq { field, value })
                }
                Some(Token::NotEq) => {
                    self.next();
                    let value = self.parse_literal()?;
                    Ok(Condition::Ne { field, value })
                }
                _ => Ok(Condition::Truthy(field)),
            },
            Some(t) => Err(ConditionParseError::UnexpectedToken(t.to_string())),
            None => Err(ConditionParseError::UnexpectedEnd),
        }
    }

    fn parse_literal(&mut self) -> Result<Value, ConditionParseError> {
        match self.next() {
            Some(Token::Literal(v)) => Ok(v),
            // Bare words compare as strings: `minType == characters`
            Some(Token::Ident(s)) => Ok(Value::String(s)),
            Some(t) => Err(ConditionParseError::UnexpectedToken(t.to_string())),
            None => Err(ConditionParseError::UnexpectedEnd),
        }
    }
}

fn literal_to_surface(value: &Value) -> String {
    match value {
        Value::String(s) => {
            let bareword = !s.is_empty()
                && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !s.chars().next().unwrap().is_ascii_digit()
                && s != "true"
                && s != "false";
            if bareword {
                s.clone()
            } else {
                format!("\"{s}\"")
            }
        }
        other => other.to_string(),
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Truthy(field) => write!(f, "{field}"),
            Condition::Not(inner) => match **inner {
                Condition::Truthy(_) | Condition::Not(_) => write!(f, "!{inner}"),
                _ => write!(f, "!({inner})"),
            },
            Condition::Eq { field, value } => {
                write!(f, "{field} == {}", literal_to_surface(value))
            }
            Condition::Ne { field, value } => {
                write!(f, "{field} != {}", literal_to_surface(value))
            }
            Condition::All(cs) => {
                let parts: Vec<String> = cs
                    .iter()
                    .map(|c| match c {
                        Condition::Any(_) => format!("({c})"),
                        _ => c.to_string(),
                    })
                    .collect();
                write!(f, "{}", parts.join(" && "))
            }
            Condition::Any(cs) => {
                let parts: Vec<String> = cs.iter().map(|c| c.to_string()).collect();
                write!(f, "{}", parts.join(" || "))
            }
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Condition::parse(&s).map_err(D::Error::custom)
    }
}
