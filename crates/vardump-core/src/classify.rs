//! Type classification.
//!
//! [`classify`] maps a raw [`Value`] to a primary [`TypeTag`] plus an
//! optional [`Refinement`]. It is a pure function, total over the value
//! space, and never fails: every renderer and the snapshot builder agree on
//! what a value *is* by going through it.

use serde::Serialize;

use crate::value::Value;

/// Primary type of a value. Closed set, matched exhaustively by every
/// renderer so adding a kind is a compile-enforced change everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeTag {
    #[serde(rename = "null")]
    Null,
    #[serde(rename = "undefined")]
    Undefined,
    #[serde(rename = "boolean")]
    Bool,
    #[serde(rename = "integer")]
    Int,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "string")]
    Str,
    #[serde(rename = "array")]
    Arr,
    #[serde(rename = "object")]
    Obj,
    #[serde(rename = "callable")]
    Callable,
    #[serde(rename = "resource")]
    Resource,
    #[serde(rename = "abstraction")]
    Abstracted,
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TypeTag::Null => "null",
            TypeTag::Undefined => "undefined",
            TypeTag::Bool => "boolean",
            TypeTag::Int => "integer",
            TypeTag::Float => "float",
            TypeTag::Str => "string",
            TypeTag::Arr => "array",
            TypeTag::Obj => "object",
            TypeTag::Callable => "callable",
            TypeTag::Resource => "resource",
            TypeTag::Abstracted => "abstraction",
        };
        f.write_str(name)
    }
}

/// Secondary refinement of a classification. Strings only, today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Refinement {
    /// Digits with optional sign and at most one decimal point.
    #[serde(rename = "numeric-string")]
    NumericString,
    /// Parses fully as a JSON object or array.
    #[serde(rename = "json-string")]
    JsonString,
    /// Lexically shaped like a class name (`Ns::Type`, `Ns\Type`).
    #[serde(rename = "classname")]
    ClassName,
}

/// Result of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub tag: TypeTag,
    pub refinement: Option<Refinement>,
}

impl Classification {
    fn plain(tag: TypeTag) -> Self {
        Self {
            tag,
            refinement: None,
        }
    }
}

/// Classify a raw value. Deterministic and side-effect-free.
#[must_use]
pub fn classify(value: &Value) -> Classification {
    match value {
        Value::Null => Classification::plain(TypeTag::Null),
        Value::Undefined => Classification::plain(TypeTag::Undefined),
        Value::Bool(_) => Classification::plain(TypeTag::Bool),
        Value::Int(_) => Classification::plain(TypeTag::Int),
        Value::Float(_) => Classification::plain(TypeTag::Float),
        Value::Str(s) => Classification {
            tag: TypeTag::Str,
            refinement: refine_string(&s.borrow()),
        },
        Value::Arr(_) => Classification::plain(TypeTag::Arr),
        Value::Obj(_) => Classification::plain(TypeTag::Obj),
        Value::Callable(_) => Classification::plain(TypeTag::Callable),
        Value::Resource(_) => Classification::plain(TypeTag::Resource),
        Value::Abstracted(_) => Classification::plain(TypeTag::Abstracted),
    }
}

/// Secondary classification of string content.
#[must_use]
pub fn refine_string(text: &str) -> Option<Refinement> {
    if is_numeric_string(text) {
        Some(Refinement::NumericString)
    } else if is_json_composite(text) {
        Some(Refinement::JsonString)
    } else if is_classname(text) {
        Some(Refinement::ClassName)
    } else {
        None
    }
}

/// Optional single sign, at least one digit, at most one decimal point,
/// nothing else.
fn is_numeric_string(text: &str) -> bool {
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    if body.is_empty() {
        return false;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    for ch in body.chars() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

/// True when the whole string parses as a JSON object or array.
fn is_json_composite(text: &str) -> bool {
    let trimmed = text.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return false;
    }
    matches!(
        serde_json::from_str::<serde_json::Value>(text),
        Ok(serde_json::Value::Object(_) | serde_json::Value::Array(_))
    )
}

/// Lexical class-name rule: identifier segments separated by `::` or `\`,
/// with the final segment starting uppercase. There is no runtime class
/// table to consult, so this is shape-only.
fn is_classname(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let segments: Vec<&str> = text
        .split("::")
        .flat_map(|part| part.split('\\'))
        .collect();
    if segments.iter().any(|seg| !is_identifier(seg)) {
        return false;
    }
    segments
        .last()
        .is_some_and(|seg| seg.starts_with(|c: char| c.is_ascii_uppercase()))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
