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

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compression::{JlCompressionAlgorithm, JlCompressionSpec};
use crate::errors::{JlError, Result};

/// Capacity of the decompressed input buffer.
pub const INPUT_BUFFER_SIZE: usize = 64 * 1024;
/// Capacity of the compressed-side read buffer.
pub const RAW_BUFFER_SIZE: usize = 64 * 1024;
/// Capacity of one compressed output chunk.
pub const GZIP_CHUNK_SIZE: usize = 256 * 1024;
/// Rows between two progress log lines.
pub const PROGRESS_INTERVAL: u64 = 100_000;

/// What to do with bytes after the last line feed at end of input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JlTrailingLinePolicy {
    /// Drop them and log a warning.
    #[default]
    Discard,
    /// Decode them as a final record.
    Emit,
}

/// Configuration of the read direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JlReaderConfig {
    pub input_buffer_size: usize,
    pub raw_buffer_size: usize,
    pub trailing_line: JlTrailingLinePolicy,
    /// Upper bound on one line in bytes; `None` lets lines grow freely.
    pub max_line_length: Option<usize>,
    /// Rows between progress messages; zero disables them.
    pub progress_interval: u64,
}

impl Default for JlReaderConfig {
    fn default() -> Self {
        JlReaderConfig {
            input_buffer_size: INPUT_BUFFER_SIZE,
            raw_buffer_size: RAW_BUFFER_SIZE,
            trailing_line: JlTrailingLinePolicy::Discard,
            max_line_length: None,
            progress_interval: PROGRESS_INTERVAL,
        }
    }
}

impl JlReaderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.input_buffer_size == 0 {
            return Err(JlError::config("input_buffer_size must be greater than zero"));
        }
        if self.raw_buffer_size == 0 {
            return Err(JlError::config("raw_buffer_size must be greater than zero"));
        }
        if self.max_line_length == Some(0) {
            return Err(JlError::config("max_line_length must be greater than zero"));
        }
        Ok(())
    }
}

/// Configuration of the write direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JlWriterConfig {
    pub compression: JlCompressionAlgorithm,
    /// Raw `compression_detail` string, parsed at start.
    pub compression_detail: Option<String>,
    pub chunk_size: usize,
    pub progress_interval: u64,
}

impl Default for JlWriterConfig {
    fn default() -> Self {
        JlWriterConfig {
            compression: JlCompressionAlgorithm::None,
            compression_detail: None,
            chunk_size: GZIP_CHUNK_SIZE,
            progress_interval: PROGRESS_INTERVAL,
        }
    }
}

impl JlWriterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(JlError::config("chunk_size must be greater than zero"));
        }
        Ok(())
    }

    /// Parses and validates the compression settings.
    pub fn compression_spec(&self) -> Result<JlCompressionSpec> {
        self.compression.ensure_supported()?;
        let spec = JlCompressionSpec::parse(self.compression, self.compression_detail.as_deref())
            .map_err(|err| match err {
                JlError::Config { message } => {
                    JlError::config(format!("invalid compression specification: {message}"))
                }
                other => other,
            })?;
        spec.validate()?;
        Ok(spec)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JlReaderConfigBuilder {
    pub input_buffer_size: Option<usize>,
    pub raw_buffer_size: Option<usize>,
    pub trailing_line: Option<JlTrailingLinePolicy>,
    pub max_line_length: Option<usize>,
    pub progress_interval: Option<u64>,
}

impl JlReaderConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_buffer_size(mut self, size: usize) -> Self {
        self.input_buffer_size = Some(size);
        self
    }

    pub fn raw_buffer_size(mut self, size: usize) -> Self {
        self.raw_buffer_size = Some(size);
        self
    }

    pub fn trailing_line(mut self, policy: JlTrailingLinePolicy) -> Self {
        self.trailing_line = Some(policy);
        self
    }

    pub fn max_line_length(mut self, limit: usize) -> Self {
        self.max_line_length = Some(limit);
        self
    }

    pub fn progress_interval(mut self, rows: u64) -> Self {
        self.progress_interval = Some(rows);
        self
    }

    pub fn build(self) -> JlReaderConfig {
        let base = JlReaderConfig::default();
        JlReaderConfig {
            input_buffer_size: self.input_buffer_size.unwrap_or(base.input_buffer_size),
            raw_buffer_size: self.raw_buffer_size.unwrap_or(base.raw_buffer_size),
            trailing_line: self.trailing_line.unwrap_or(base.trailing_line),
            max_line_length: self.max_line_length.or(base.max_line_length),
            progress_interval: self.progress_interval.unwrap_or(base.progress_interval),
        }
    }

    /// Missing keys keep their defaults.
    pub fn from_json(value: &Value) -> Result<JlReaderConfig> {
        let builder: JlReaderConfigBuilder = serde_json::from_value(value.clone())?;
        Ok(builder.build())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JlWriterConfigBuilder {
    pub compression: Option<JlCompressionAlgorithm>,
    pub compression_detail: Option<String>,
    pub chunk_size: Option<usize>,
    pub progress_interval: Option<u64>,
}

impl JlWriterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compression(mut self, algorithm: JlCompressionAlgorithm) -> Self {
        self.compression = Some(algorithm);
        self
    }

    pub fn compression_detail(mut self, detail: impl Into<String>) -> Self {
        self.compression_detail = Some(detail.into());
        self
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }

    pub fn progress_interval(mut self, rows: u64) -> Self {
        self.progress_interval = Some(rows);
        self
    }

    pub fn build(self) -> JlWriterConfig {
        let base = JlWriterConfig::default();
        JlWriterConfig {
            compression: self.compression.unwrap_or(base.compression),
            compression_detail: self.compression_detail.or(base.compression_detail),
            chunk_size: self.chunk_size.unwrap_or(base.chunk_size),
            progress_interval: self.progress_interval.unwrap_or(base.progress_interval),
        }
    }

    /// Missing keys keep their defaults.
    pub fn from_json(value: &Value) -> Result<JlWriterConfig> {
        let builder: JlWriterConfigBuilder = serde_json::from_value(value.clone())?;
        Ok(builder.build())
    }
}
