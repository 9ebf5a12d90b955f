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

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::errors::{JlError, Result};
use crate::record::{JlColumn, JlDataType, JlSchema, JlValue};
use crate::types::JlTypeIo;

/// Serializes rows into single-line JSON objects.
///
/// Members appear in schema order under the column names, followed by one
/// line feed. The line buffer is reused across rows.
#[derive(Debug, Default)]
pub struct JlRecordEncoder {
    line: Vec<u8>,
}

impl JlRecordEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&mut self, row: &[JlValue], schema: &JlSchema, types: &dyn JlTypeIo) -> Result<&[u8]> {
        if row.len() != schema.len() {
            return Err(JlError::schema(format!(
                "row has {} values but the schema has {} columns",
                row.len(),
                schema.len()
            )));
        }

        self.line.clear();
        serde_json::to_writer(&mut self.line, &RowView { row, schema, types })?;
        self.line.push(b'\n');
        Ok(&self.line)
    }
}

struct RowView<'a> {
    row: &'a [JlValue],
    schema: &'a JlSchema,
    types: &'a dyn JlTypeIo,
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.row.len()))?;
        for (column, value) in self.schema.columns().iter().zip(self.row) {
            map.serialize_entry(
                &column.name,
                &FieldView {
                    column,
                    value,
                    types: self.types,
                },
            )?;
        }
        map.end()
    }
}

struct FieldView<'a> {
    column: &'a JlColumn,
    value: &'a JlValue,
    types: &'a dyn JlTypeIo,
}

impl FieldView<'_> {
    fn stringify<E: serde::ser::Error>(&self) -> std::result::Result<String, E> {
        self.types
            .stringify(self.value, &self.column.data_type)
            .map_err(|message| E::custom(format!("column \"{}\": {message}", self.column.name)))
    }
}

impl Serialize for FieldView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.value.is_null() {
            return serializer.serialize_unit();
        }
        if let JlDataType::Other(_) = self.column.data_type {
            return serializer.serialize_str(&self.stringify::<S::Error>()?);
        }

        match self.value {
            JlValue::Null => serializer.serialize_unit(),
            JlValue::Bool(b) => serializer.serialize_bool(*b),
            JlValue::Int(i) => serializer.serialize_i64(*i),
            JlValue::Float(f) if f.is_finite() && self.column.data_type == JlDataType::Float4 => {
                serializer.serialize_f32(*f as f32)
            }
            JlValue::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            // NaN and infinities have no JSON number form.
            JlValue::Float(_) => serializer.serialize_str(&self.stringify::<S::Error>()?),
            JlValue::Numeric(text) => match text.parse::<serde_json::Number>() {
                Ok(number) => number.serialize(serializer),
                Err(_) => serializer.serialize_str(text),
            },
            JlValue::Text(text) => serializer.serialize_str(text),
            JlValue::Json(json) => json.serialize(serializer),
        }
    }
}
