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

//! # JlCopy Record Module
//!
//! This module provides the row-side data model: the column schema a copy
//! operation is bound to, the typed values the host exchanges with JlCopy,
//! and the reusable decoded-row storage of the read path.
//!
//! ## Design Principles
//!
//! - **Schema-driven**: the column set and order always come from the host;
//!   JlCopy never infers a schema from the data
//! - **Allocation-free per row**: [`JlDecodedRow`] is overwritten in place for
//!   every record instead of building a new row
//! - **Opaque types**: [`JlDataType::Other`] lets the host carry types JlCopy
//!   knows nothing about, handled through its own text functions
//!
//! ## Usage Example
//!
//! ```rust
//! use jlcopy::record::{JlColumn, JlDataType, JlSchema};
//!
//! let schema = JlSchema::new(vec![
//!     JlColumn::new("id", JlDataType::Int4),
//!     JlColumn::new("a", JlDataType::Text),
//!     JlColumn::new("b", JlDataType::Jsonb),
//! ]);
//! assert_eq!(schema.len(), 3);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column types understood by the built-in type functions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JlDataType {
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Text,
    Json,
    Jsonb,
    /// A host-defined type, known only by name.
    Other(String),
}

impl JlDataType {
    /// SQL-style name used in diagnostics.
    pub fn name(&self) -> &str {
        match self {
            JlDataType::Bool => "boolean",
            JlDataType::Int2 => "smallint",
            JlDataType::Int4 => "integer",
            JlDataType::Int8 => "bigint",
            JlDataType::Float4 => "real",
            JlDataType::Float8 => "double precision",
            JlDataType::Numeric => "numeric",
            JlDataType::Text => "text",
            JlDataType::Json => "json",
            JlDataType::Jsonb => "jsonb",
            JlDataType::Other(name) => name,
        }
    }
}

impl fmt::Display for JlDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A materialized column value exchanged with the host engine.
///
/// `Numeric` keeps the exact decimal text so that no precision is lost
/// between the JSON number and the column.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum JlValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Numeric(String),
    Text(String),
    Json(Value),
}

impl JlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, JlValue::Null)
    }
}

/// One `{name, type}` entry of a schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JlColumn {
    pub name: String,
    pub data_type: JlDataType,
}

impl JlColumn {
    pub fn new(name: impl Into<String>, data_type: JlDataType) -> Self {
        JlColumn {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered column list a copy operation is bound to.
///
/// Column order is the member order of every encoded line and the lookup
/// order when decoding. A schema is immutable for the lifetime of one copy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JlSchema {
    columns: Vec<JlColumn>,
}

impl JlSchema {
    pub fn new(columns: Vec<JlColumn>) -> Self {
        JlSchema { columns }
    }

    pub fn columns(&self) -> &[JlColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the column with exactly this name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }
}

/// Decoded values of the current record, indexed by schema position.
///
/// The two arrays are kept parallel on purpose: the read path overwrites
/// them in place for every record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JlDecodedRow {
    values: Vec<JlValue>,
    nulls: Vec<bool>,
}

impl JlDecodedRow {
    pub fn with_width(width: usize) -> Self {
        JlDecodedRow {
            values: vec![JlValue::Null; width],
            nulls: vec![true; width],
        }
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }

    pub fn set_null(&mut self, index: usize) {
        self.values[index] = JlValue::Null;
        self.nulls[index] = true;
    }

    pub fn set_value(&mut self, index: usize, value: JlValue) {
        self.nulls[index] = value.is_null();
        self.values[index] = value;
    }

    pub fn is_null(&self, index: usize) -> bool {
        self.nulls[index]
    }

    /// Value at `index`, or `None` when the column is null.
    pub fn get(&self, index: usize) -> Option<&JlValue> {
        if self.nulls[index] {
            None
        } else {
            Some(&self.values[index])
        }
    }

    pub fn values(&self) -> &[JlValue] {
        &self.values
    }

    pub fn nulls(&self) -> &[bool] {
        &self.nulls
    }

    /// Copies the row out, with nulls as [`JlValue::Null`].
    pub fn to_values(&self) -> Vec<JlValue> {
        self.values.clone()
    }
}

/// Position information about the most recently decoded row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JlRowInfo {
    /// One-based line number within the decompressed stream.
    pub line_number: u64,
    /// Length of the line in bytes, without the line feed.
    pub line_length: usize,
}
