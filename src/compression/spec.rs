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

use crate::compression::JlCompressionAlgorithm;
use crate::errors::{JlError, Result};

/// Level value meaning "let the library pick" for gzip.
pub const GZIP_DEFAULT_LEVEL: i32 = -1;

/// Parsed `compression` + `compression_detail` pair.
///
/// The detail string is either a bare integer (the level) or a
/// comma-separated list of `keyword[=value]` items with the keywords
/// `level`, `workers` and `long`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JlCompressionSpec {
    pub algorithm: JlCompressionAlgorithm,
    pub level: i32,
    pub workers: Option<i32>,
    pub long_distance: Option<bool>,
    level_given: bool,
}

impl JlCompressionSpec {
    /// Specification with the algorithm's default settings.
    pub fn new(algorithm: JlCompressionAlgorithm) -> Self {
        JlCompressionSpec {
            algorithm,
            level: default_level(algorithm),
            workers: None,
            long_distance: None,
            level_given: false,
        }
    }

    /// Parses a detail string. Syntax problems are configuration errors;
    /// range checks happen in [`JlCompressionSpec::validate`].
    pub fn parse(algorithm: JlCompressionAlgorithm, detail: Option<&str>) -> Result<Self> {
        let mut spec = JlCompressionSpec::new(algorithm);
        let detail = match detail {
            Some(detail) => detail,
            None => return Ok(spec),
        };

        if let Ok(level) = detail.trim().parse::<i32>() {
            spec.level = level;
            spec.level_given = true;
            return Ok(spec);
        }

        for item in detail.split(',') {
            let (keyword, value) = match item.split_once('=') {
                Some((keyword, value)) => (keyword, Some(value)),
                None => (item, None),
            };

            if keyword.is_empty() {
                return Err(JlError::config(
                    "found empty string where a compression option was expected",
                ));
            }

            match keyword {
                "level" => {
                    spec.level = integer_option(keyword, value)?;
                    spec.level_given = true;
                }
                "workers" => spec.workers = Some(integer_option(keyword, value)?),
                "long" => spec.long_distance = Some(bool_option(keyword, value)?),
                other => {
                    return Err(JlError::config(format!(
                        "unrecognized compression option: \"{other}\""
                    )))
                }
            }
        }

        Ok(spec)
    }

    /// Checks the parsed options against what the algorithm accepts.
    pub fn validate(&self) -> Result<()> {
        let name = self.algorithm.as_str();

        if self.level_given {
            let (min, max) = match self.algorithm {
                JlCompressionAlgorithm::None => {
                    if self.level != 0 {
                        return Err(invalid(format!(
                            "compression algorithm \"{name}\" does not accept a compression level"
                        )));
                    }
                    (0, 0)
                }
                JlCompressionAlgorithm::Gzip => (1, 9),
                JlCompressionAlgorithm::Lz4 => (1, 12),
                JlCompressionAlgorithm::Zstd => (-131072, 22),
            };
            let default = default_level(self.algorithm);
            if (self.level < min || self.level > max) && self.level != default {
                return Err(invalid(format!(
                    "compression algorithm \"{name}\" expects a compression level between {min} and {max} (default at {default})"
                )));
            }
        }

        if self.workers.is_some() && self.algorithm != JlCompressionAlgorithm::Zstd {
            return Err(invalid(format!(
                "compression algorithm \"{name}\" does not accept a worker count"
            )));
        }

        if self.long_distance.is_some() && self.algorithm != JlCompressionAlgorithm::Zstd {
            return Err(invalid(format!(
                "compression algorithm \"{name}\" does not support long-distance mode"
            )));
        }

        Ok(())
    }
}

fn default_level(algorithm: JlCompressionAlgorithm) -> i32 {
    match algorithm {
        JlCompressionAlgorithm::None | JlCompressionAlgorithm::Lz4 => 0,
        JlCompressionAlgorithm::Gzip => GZIP_DEFAULT_LEVEL,
        JlCompressionAlgorithm::Zstd => 3,
    }
}

fn invalid(detail: String) -> JlError {
    JlError::config(format!("invalid compression specification: {detail}"))
}

fn integer_option(keyword: &str, value: Option<&str>) -> Result<i32> {
    let value = value.ok_or_else(|| {
        JlError::config(format!("compression option \"{keyword}\" requires a value"))
    })?;
    value.parse::<i32>().map_err(|_| {
        JlError::config(format!(
            "value for compression option \"{keyword}\" must be an integer"
        ))
    })
}

fn bool_option(keyword: &str, value: Option<&str>) -> Result<bool> {
    let value = match value {
        None => return Ok(true),
        Some(value) => value,
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "on" | "1" => Ok(true),
        "false" | "f" | "no" | "off" | "0" => Ok(false),
        _ => Err(JlError::config(format!(
            "value for compression option \"{keyword}\" must be a Boolean value"
        ))),
    }
}
