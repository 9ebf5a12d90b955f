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

//! # JlCopy Error Module
//!
//! This module defines the error type shared by both copy directions.
//!
//! ## Error Handling Philosophy
//!
//! Every error raised by JlCopy is fatal to the copy operation that raised
//! it. There is no skip-and-continue mode: an operation either completes with
//! all rows decoded or encoded, or it stops at the first failure. Because of
//! that, each variant carries enough context (line number, column name, byte
//! offset) for the host to print a precise diagnostic.
//!
//! ## Error Categories
//!
//! - **Config**: invalid compression algorithm, level or detail string
//! - **Unsupported**: a recognized feature that this build cannot provide
//! - **Structural**: a line that is not a JSON object
//! - **Conversion**: a field whose text the column type rejects
//! - **Stream**: corrupt compressed input or a failing byte channel
//! - **Lifecycle**: driver methods called out of order
//!
//! ## Usage
//!
//! ```rust
//! use jlcopy::errors::{Result, JlError};
//!
//! fn check_level(level: i32) -> Result<()> {
//!     if !(1..=9).contains(&level) {
//!         return Err(JlError::config(format!("level {level} out of range")));
//!     }
//!     Ok(())
//! }
//! ```

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout JlCopy.
pub type Result<T> = std::result::Result<T, JlError>;

/// Canonical error enumeration for JlCopy.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum JlError {
    /// Errors originating from the underlying byte channel.
    #[error("io error: {0}")]
    Io(String),

    /// Invalid or inconsistent configuration, raised before any row is processed.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// A recognized option value that is not implemented or not compiled in.
    #[error("{feature} is not supported")]
    Unsupported { feature: String },

    /// A line that could not be parsed as a JSON object.
    #[error("line {line}: {message}")]
    Structural { line: u64, message: String },

    /// A field value rejected by its column type.
    #[error("line {line}: could not convert json value \"{value}\" to data for column \"{column}\": {message}")]
    Conversion {
        line: u64,
        column: String,
        value: String,
        message: String,
    },

    /// Corrupt compressed data or a compression library failure.
    #[error("stream error at byte {offset}: {message}")]
    Stream { offset: u64, message: String },

    /// A line exceeding the configured length bound.
    #[error("line {line} exceeds the maximum line length of {limit} bytes")]
    LineTooLong { line: u64, limit: usize },

    /// Rows that do not match the schema they are encoded against.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Driver methods invoked in an order the lifecycle does not allow.
    #[error("cannot {operation} while the copy is {state}")]
    Lifecycle { operation: String, state: String },

    /// Wrapper for serde serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for JlError {
    fn from(err: io::Error) -> Self {
        JlError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for JlError {
    fn from(err: serde_json::Error) -> Self {
        JlError::Serde(err.to_string())
    }
}

impl JlError {
    /// Helper to construct configuration errors.
    pub fn config<T: Into<String>>(message: T) -> Self {
        JlError::Config {
            message: message.into(),
        }
    }

    /// Helper to construct "not supported" errors.
    pub fn unsupported<T: Into<String>>(feature: T) -> Self {
        JlError::Unsupported {
            feature: feature.into(),
        }
    }

    /// Helper to construct structural (row-level) errors.
    pub fn structural(line: u64, message: impl Into<String>) -> Self {
        JlError::Structural {
            line,
            message: message.into(),
        }
    }

    /// Helper to construct column conversion errors.
    pub fn conversion(
        line: u64,
        column: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        JlError::Conversion {
            line,
            column: column.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// Helper to construct compression stream errors.
    pub fn stream(offset: u64, message: impl Into<String>) -> Self {
        JlError::Stream {
            offset,
            message: message.into(),
        }
    }

    /// Helper to construct schema errors.
    pub fn schema<T: Into<String>>(message: T) -> Self {
        JlError::Schema {
            message: message.into(),
        }
    }

    /// Helper to construct lifecycle errors.
    pub fn lifecycle(operation: impl Into<String>, state: impl Into<String>) -> Self {
        JlError::Lifecycle {
            operation: operation.into(),
            state: state.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        JlError::Internal(message.into())
    }

    /// Whether the error was raised while validating configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, JlError::Config { .. } | JlError::Unsupported { .. })
    }
}
