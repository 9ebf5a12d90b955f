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

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::chunk::{JlReaderSource, JlWriterSink};
use crate::config::{JlReaderConfig, JlWriterConfig};
use crate::errors::Result;
use crate::export::JlCopyTo;
use crate::format::JlCopyStats;
use crate::ingest::JlCopyFrom;
use crate::record::{JlSchema, JlValue};

/// Whole-file convenience helpers over the copy drivers.
pub struct JlIO;

impl JlIO {
    /// Reads every row of a file. A `.gz` suffix selects gzip.
    pub fn read_path(
        path: impl AsRef<Path>,
        schema: &JlSchema,
        config: JlReaderConfig,
    ) -> Result<Vec<Vec<JlValue>>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let name = path.to_string_lossy().into_owned();
        Self::read_from(file, Some(&name), schema, config)
    }

    /// Reads every row from any reader; `name` drives compression detection.
    pub fn read_from<R: Read>(
        reader: R,
        name: Option<&str>,
        schema: &JlSchema,
        config: JlReaderConfig,
    ) -> Result<Vec<Vec<JlValue>>> {
        let mut copy = JlCopyFrom::new(JlReaderSource::new(reader), name.map(str::to_string))
            .with_config(config);
        copy.start(schema.clone())?;

        let mut rows = Vec::new();
        loop {
            match copy.next_row() {
                Ok(Some(row)) => rows.push(row.to_values()),
                Ok(None) => break,
                Err(err) => {
                    copy.abort();
                    return Err(err);
                }
            }
        }
        copy.end()?;
        Ok(rows)
    }

    /// Writes rows to a new file, replacing an existing one.
    pub fn write_path(
        path: impl AsRef<Path>,
        schema: &JlSchema,
        rows: &[Vec<JlValue>],
        config: JlWriterConfig,
    ) -> Result<JlCopyStats> {
        let file = File::create(path)?;
        Self::write_to(BufWriter::new(file), schema, rows, config)
    }

    /// Writes rows to any writer and flushes it at the end.
    pub fn write_to<W: Write>(
        writer: W,
        schema: &JlSchema,
        rows: &[Vec<JlValue>],
        config: JlWriterConfig,
    ) -> Result<JlCopyStats> {
        let mut copy = JlCopyTo::new(JlWriterSink::new(writer)).with_config(config);
        copy.start(schema.clone())?;

        for row in rows {
            if let Err(err) = copy.consume_row(row) {
                copy.abort();
                return Err(err);
            }
        }
        copy.end()?;
        Ok(copy.stats())
    }
}
