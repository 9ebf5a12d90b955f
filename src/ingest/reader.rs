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

use std::mem::size_of;
use std::sync::Arc;

use crate::chunk::{JlChunkBuffer, JlChunkSource};
use crate::compression::{JlCompressionAlgorithm, JlDecompressor};
use crate::config::JlReaderConfig;
use crate::errors::{JlError, Result};
use crate::format::{JlCopyFromRoutine, JlCopyState, JlCopyStats};
use crate::ingest::decoder::JlRecordDecoder;
use crate::ingest::line::JlLineAssembler;
use crate::record::{JlDecodedRow, JlRowInfo, JlSchema};
use crate::types::{JlBuiltinTypeIo, JlTypeIo};

/// Buffers and compression state, alive between `start` and `end`.
struct ReadPipeline {
    input: JlChunkBuffer,
    decompressor: JlDecompressor,
    assembler: JlLineAssembler,
    decoder: JlRecordDecoder,
}

/// Read driver: JSON Lines from a chunk source into decoded rows.
pub struct JlCopyFrom<S> {
    source: S,
    name: Option<String>,
    config: JlReaderConfig,
    types: Arc<dyn JlTypeIo + Send + Sync>,
    state: JlCopyState,
    pipeline: Option<ReadPipeline>,
    schema: JlSchema,
    row: JlDecodedRow,
    info: JlRowInfo,
    stats: JlCopyStats,
}

impl<S: JlChunkSource> JlCopyFrom<S> {
    /// `name` is the source name; a `.gz` suffix selects gzip.
    pub fn new(source: S, name: Option<String>) -> Self {
        JlCopyFrom {
            source,
            name,
            config: JlReaderConfig::default(),
            types: Arc::new(JlBuiltinTypeIo::new()),
            state: JlCopyState::Uninitialized,
            pipeline: None,
            schema: JlSchema::default(),
            row: JlDecodedRow::default(),
            info: JlRowInfo::default(),
            stats: JlCopyStats::default(),
        }
    }

    pub fn with_config(mut self, config: JlReaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_type_io(mut self, types: Arc<dyn JlTypeIo + Send + Sync>) -> Self {
        self.types = types;
        self
    }

    pub fn state(&self) -> JlCopyState {
        self.state
    }

    pub fn schema(&self) -> &JlSchema {
        &self.schema
    }

    /// Compression in effect, known once started.
    pub fn compression(&self) -> Option<JlCompressionAlgorithm> {
        self.pipeline
            .as_ref()
            .map(|pipeline| pipeline.decompressor.algorithm())
    }

    pub fn estimate_state_size(&self) -> usize {
        size_of::<Self>() + size_of::<ReadPipeline>()
    }

    /// The read direction takes no options of its own.
    pub fn process_option(&mut self, name: &str, _value: &str) -> Result<bool> {
        if self.state != JlCopyState::Uninitialized {
            return Err(JlError::lifecycle(format!("set option \"{name}\""), self.state.as_str()));
        }
        Ok(false)
    }

    pub fn start(&mut self, schema: JlSchema) -> Result<()> {
        if self.state != JlCopyState::Uninitialized {
            return Err(JlError::lifecycle("start", self.state.as_str()));
        }
        self.config.validate()?;

        let algorithm = JlCompressionAlgorithm::from_source_name(self.name.as_deref());
        let decompressor = JlDecompressor::new(algorithm, self.config.raw_buffer_size)?;

        self.pipeline = Some(ReadPipeline {
            input: JlChunkBuffer::with_capacity(self.config.input_buffer_size),
            decompressor,
            assembler: JlLineAssembler::new(self.config.trailing_line, self.config.max_line_length),
            decoder: JlRecordDecoder::new(),
        });
        self.row = JlDecodedRow::with_width(schema.len());
        self.schema = schema;
        self.state = JlCopyState::Started;

        log::info!(
            "Starting jsonlines copy from {} ({} columns, compression {}, input buffer {} bytes)",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.schema.len(),
            algorithm,
            self.config.input_buffer_size
        );
        Ok(())
    }

    /// Decodes the next line. The returned row is overwritten by the next call.
    /// Any error fails the copy; later calls are refused until `abort`.
    pub fn next_row(&mut self) -> Result<Option<&JlDecodedRow>> {
        if self.state != JlCopyState::Started {
            return Err(JlError::lifecycle("read a row", self.state.as_str()));
        }
        let ReadPipeline {
            input,
            decompressor,
            assembler,
            decoder,
        } = self
            .pipeline
            .as_mut()
            .ok_or_else(|| JlError::internal("read pipeline missing after start"))?;
        let source = &mut self.source;

        let line_number = assembler.line_number() + 1;
        let next = assembler.next_line(input, |buf| decompressor.refill(source, buf));
        self.stats.bytes_in = decompressor.raw_bytes();

        let line = match next {
            Ok(Some(line)) => line,
            Ok(None) => return Ok(None),
            Err(err) => {
                self.state = JlCopyState::Failed;
                return Err(err);
            }
        };

        self.info = JlRowInfo {
            line_number,
            line_length: line.len(),
        };
        let decoded = decoder.decode(line, line_number, &self.schema, self.types.as_ref(), &mut self.row);
        if let Err(err) = decoded {
            self.state = JlCopyState::Failed;
            return Err(err);
        }

        self.stats.rows += 1;
        if self.config.progress_interval > 0 && self.stats.rows % self.config.progress_interval == 0 {
            log::debug!(
                "jsonlines copy from: {} rows decoded, {} bytes read",
                self.stats.rows,
                self.stats.bytes_in
            );
        }
        Ok(Some(&self.row))
    }

    /// Line number and length of the last decoded row.
    pub fn row_info(&self) -> JlRowInfo {
        self.info
    }

    pub fn stats(&self) -> JlCopyStats {
        self.stats
    }

    pub fn end(&mut self) -> Result<()> {
        if self.state != JlCopyState::Started {
            return Err(JlError::lifecycle("end", self.state.as_str()));
        }
        self.pipeline = None;
        self.state = JlCopyState::Ended;
        log::info!(
            "Finished jsonlines copy from: {} rows, {} bytes read",
            self.stats.rows,
            self.stats.bytes_in
        );
        Ok(())
    }

    /// Releases buffers and compression state; safe in any state.
    pub fn abort(&mut self) {
        if self.pipeline.take().is_some() {
            log::debug!("Aborted jsonlines copy from after {} rows", self.stats.rows);
        }
        self.state = JlCopyState::Ended;
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: JlChunkSource> JlCopyFromRoutine for JlCopyFrom<S> {
    fn estimate_state_size(&self) -> usize {
        JlCopyFrom::estimate_state_size(self)
    }

    fn process_option(&mut self, name: &str, value: &str) -> Result<bool> {
        JlCopyFrom::process_option(self, name, value)
    }

    fn start(&mut self, schema: JlSchema) -> Result<()> {
        JlCopyFrom::start(self, schema)
    }

    fn next_row(&mut self) -> Result<Option<&JlDecodedRow>> {
        JlCopyFrom::next_row(self)
    }

    fn row_info(&self) -> JlRowInfo {
        JlCopyFrom::row_info(self)
    }

    fn stats(&self) -> JlCopyStats {
        JlCopyFrom::stats(self)
    }

    fn end(&mut self) -> Result<()> {
        JlCopyFrom::end(self)
    }

    fn abort(&mut self) {
        JlCopyFrom::abort(self)
    }
}
