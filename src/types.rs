//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of JlCopy.
//! The JlCopy project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Column Type I/O
//!
//! The per-type text functions a host engine provides. JlCopy only ever
//! hands canonical text to [`JlTypeIo::parse`] and asks
//! [`JlTypeIo::stringify`] for values that have no native JSON form.
//! [`JlBuiltinTypeIo`] covers the common scalar types and is what the
//! drivers use unless the host plugs in its own implementation.

use std::num::IntErrorKind;

use serde_json::Value;

use crate::record::{JlDataType, JlValue};

/// Host-provided text conversion for column types.
///
/// Errors are plain messages; the caller wraps them with the line and
/// column they belong to.
pub trait JlTypeIo {
    fn parse(&self, text: &str, data_type: &JlDataType) -> std::result::Result<JlValue, String>;

    fn stringify(&self, value: &JlValue, data_type: &JlDataType) -> std::result::Result<String, String>;
}

/// Text functions for the types in [`JlDataType`].
#[derive(Clone, Copy, Debug, Default)]
pub struct JlBuiltinTypeIo;

impl JlBuiltinTypeIo {
    pub fn new() -> Self {
        JlBuiltinTypeIo
    }
}

impl JlTypeIo for JlBuiltinTypeIo {
    fn parse(&self, text: &str, data_type: &JlDataType) -> std::result::Result<JlValue, String> {
        match data_type {
            JlDataType::Bool => parse_bool(text),
            JlDataType::Int2 => parse_int(text, data_type, i16::MIN as i64, i16::MAX as i64),
            JlDataType::Int4 => parse_int(text, data_type, i32::MIN as i64, i32::MAX as i64),
            JlDataType::Int8 => parse_int(text, data_type, i64::MIN, i64::MAX),
            JlDataType::Float4 | JlDataType::Float8 => parse_float(text, data_type),
            JlDataType::Numeric => parse_numeric(text),
            JlDataType::Json | JlDataType::Jsonb => serde_json::from_str::<Value>(text)
                .map(JlValue::Json)
                .map_err(|err| format!("invalid input syntax for type {data_type}: {err}")),
            JlDataType::Text | JlDataType::Other(_) => Ok(JlValue::Text(text.to_string())),
        }
    }

    fn stringify(&self, value: &JlValue, data_type: &JlDataType) -> std::result::Result<String, String> {
        match value {
            JlValue::Null => Err(format!("cannot stringify a null {data_type}")),
            JlValue::Bool(b) => Ok(if *b { "true" } else { "false" }.to_string()),
            JlValue::Int(i) => Ok(i.to_string()),
            JlValue::Float(f) => Ok(format_float(*f)),
            JlValue::Numeric(text) | JlValue::Text(text) => Ok(text.clone()),
            JlValue::Json(json) => Ok(json.to_string()),
        }
    }
}

fn invalid_syntax(data_type: &JlDataType, text: &str) -> String {
    format!("invalid input syntax for type {data_type}: \"{text}\"")
}

fn parse_bool(text: &str) -> std::result::Result<JlValue, String> {
    match text.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "y" | "yes" | "on" | "1" => Ok(JlValue::Bool(true)),
        "f" | "false" | "n" | "no" | "off" | "0" => Ok(JlValue::Bool(false)),
        _ => Err(invalid_syntax(&JlDataType::Bool, text)),
    }
}

fn parse_int(
    text: &str,
    data_type: &JlDataType,
    min: i64,
    max: i64,
) -> std::result::Result<JlValue, String> {
    let value = text.trim().parse::<i64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            format!("value \"{text}\" is out of range for type {data_type}")
        }
        _ => invalid_syntax(data_type, text),
    })?;

    if value < min || value > max {
        return Err(format!("value \"{text}\" is out of range for type {data_type}"));
    }
    Ok(JlValue::Int(value))
}

fn parse_float(text: &str, data_type: &JlDataType) -> std::result::Result<JlValue, String> {
    let trimmed = text.trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| invalid_syntax(data_type, text))?;

    let spelled_infinite = is_infinity_spelling(trimmed);
    if value.is_infinite() && !spelled_infinite {
        return Err(format!("\"{text}\" is out of range for type {data_type}"));
    }

    if *data_type == JlDataType::Float4 {
        let narrowed = value as f32;
        if narrowed.is_infinite() && !spelled_infinite {
            return Err(format!("\"{text}\" is out of range for type {data_type}"));
        }
        return Ok(JlValue::Float(narrowed as f64));
    }
    Ok(JlValue::Float(value))
}

/// `inf` or `infinity` in any case, with an optional sign.
fn is_infinity_spelling(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

fn parse_numeric(text: &str) -> std::result::Result<JlValue, String> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("nan") {
        return Ok(JlValue::Numeric("NaN".to_string()));
    }
    if is_numeric_literal(trimmed) {
        Ok(JlValue::Numeric(trimmed.to_string()))
    } else {
        Err(invalid_syntax(&JlDataType::Numeric, text))
    }
}

/// `[+-]digits[.digits][e[+-]digits]`, with digits allowed on either side of the point.
fn is_numeric_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        pos += 1;
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut digits = pos - int_start;

    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        let frac_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        digits += pos - frac_start;
    }
    if digits == 0 {
        return false;
    }

    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+') | Some(b'-')) {
            pos += 1;
        }
        let exp_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == exp_start {
            return false;
        }
    }

    pos == bytes.len()
}

pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        value.to_string()
    }
}
