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

use std::fmt::Write;

use serde_json::Value;

use crate::errors::{JlError, Result};
use crate::record::{JlDecodedRow, JlSchema};
use crate::types::JlTypeIo;

/// Projects one JSON object line onto the schema.
///
/// Members are looked up by exact column name; absent members and JSON
/// `null` both decode to a null column. Members without a column are
/// ignored.
#[derive(Debug, Default)]
pub struct JlRecordDecoder {
    text: String,
}

impl JlRecordDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(
        &mut self,
        line: &[u8],
        line_number: u64,
        schema: &JlSchema,
        types: &dyn JlTypeIo,
        row: &mut JlDecodedRow,
    ) -> Result<()> {
        if row.width() != schema.len() {
            return Err(JlError::schema(format!(
                "row holds {} columns but the schema has {}",
                row.width(),
                schema.len()
            )));
        }

        let document: Value = serde_json::from_slice(line).map_err(|err| {
            JlError::structural(line_number, format!("invalid data for json value: {err}"))
        })?;

        let object = match &document {
            Value::Object(object) => object,
            other => {
                return Err(JlError::structural(
                    line_number,
                    format!("expected a json object, found {}", kind(other)),
                ))
            }
        };

        for (index, column) in schema.columns().iter().enumerate() {
            let value = match object.get(&column.name) {
                None | Some(Value::Null) => {
                    row.set_null(index);
                    continue;
                }
                Some(value) => value,
            };

            self.text.clear();
            canonical_text(value, &mut self.text).map_err(|message| {
                JlError::conversion(line_number, column.name.as_str(), self.text.as_str(), message)
            })?;

            let parsed = types.parse(&self.text, &column.data_type).map_err(|message| {
                JlError::conversion(line_number, column.name.as_str(), self.text.as_str(), message)
            })?;
            row.set_value(index, parsed);
        }

        Ok(())
    }
}

/// Text handed to the column's parse function. Numbers are written in
/// plain decimal notation, so `1e2` reaches an integer column as `100`.
fn canonical_text(value: &Value, out: &mut String) -> std::result::Result<(), String> {
    match value {
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::String(s) => out.push_str(s),
        Value::Number(n) => {
            write!(out, "{n}").map_err(|err| err.to_string())?;
            if let Some(plain) = expand_exponent(out.as_str())? {
                out.clear();
                out.push_str(&plain);
            }
        }
        Value::Object(_) | Value::Array(_) => write!(out, "{value}").map_err(|err| err.to_string())?,
        Value::Null => {}
    }
    Ok(())
}

/// Largest decimal exponent accepted before expansion.
const MAX_EXPONENT: i64 = 1000;

/// Rewrites a JSON number with an exponent as plain decimal text, keeping
/// `fraction digits - exponent` digits after the point. Returns `None`
/// when the literal has no exponent.
fn expand_exponent(literal: &str) -> std::result::Result<Option<String>, String> {
    let Some(e) = literal.find(['e', 'E']) else {
        return Ok(None);
    };
    let exponent: i64 = literal[e + 1..]
        .parse()
        .ok()
        .filter(|exponent: &i64| exponent.abs() <= MAX_EXPONENT)
        .ok_or_else(|| format!("value \"{literal}\" overflows numeric format"))?;

    let mantissa = &literal[..e];
    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let (int_digits, frac_digits) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{int_digits}{frac_digits}");
    let point = int_digits.len() as i64 + exponent;

    let (int_part, frac_part) = if point <= 0 {
        ("0".to_string(), format!("{}{digits}", "0".repeat(point.unsigned_abs() as usize)))
    } else if point as usize >= digits.len() {
        (format!("{digits}{}", "0".repeat(point as usize - digits.len())), String::new())
    } else {
        let (int_part, frac_part) = digits.split_at(point as usize);
        (int_part.to_string(), frac_part.to_string())
    };

    let int_part = match int_part.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let zero = digits.bytes().all(|b| b == b'0');

    let mut plain = String::with_capacity(int_part.len() + frac_part.len() + 2);
    if negative && !zero {
        plain.push('-');
    }
    plain.push_str(int_part);
    if !frac_part.is_empty() {
        plain.push('.');
        plain.push_str(&frac_part);
    }
    Ok(Some(plain))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
