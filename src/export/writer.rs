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

use crate::chunk::JlChunkSink;
use crate::compression::{JlCompressionAlgorithm, JlCompressor, JlFlushMode};
use crate::config::JlWriterConfig;
use crate::errors::{JlError, Result};
use crate::export::encoder::JlRecordEncoder;
use crate::format::{JlCopyState, JlCopyStats, JlCopyToRoutine};
use crate::record::{JlSchema, JlValue};
use crate::types::{JlBuiltinTypeIo, JlTypeIo};

struct WritePipeline {
    encoder: JlRecordEncoder,
    compressor: JlCompressor,
}

/// Write driver: rows in, JSON Lines out through an optional gzip stage.
///
/// Recognized options are `compression` (`none`, `gzip`; `lz4` and `zstd`
/// are refused as unsupported) and `compression_detail`.
pub struct JlCopyTo<K> {
    sink: K,
    config: JlWriterConfig,
    types: Arc<dyn JlTypeIo + Send + Sync>,
    state: JlCopyState,
    pipeline: Option<WritePipeline>,
    schema: JlSchema,
    stats: JlCopyStats,
}

impl<K: JlChunkSink> JlCopyTo<K> {
    pub fn new(sink: K) -> Self {
        JlCopyTo {
            sink,
            config: JlWriterConfig::default(),
            types: Arc::new(JlBuiltinTypeIo::new()),
            state: JlCopyState::Uninitialized,
            pipeline: None,
            schema: JlSchema::default(),
            stats: JlCopyStats::default(),
        }
    }

    pub fn with_config(mut self, config: JlWriterConfig) -> Self {
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

    pub fn config(&self) -> &JlWriterConfig {
        &self.config
    }

    pub fn estimate_state_size(&self) -> usize {
        size_of::<Self>() + size_of::<WritePipeline>()
    }

    pub fn process_option(&mut self, name: &str, value: &str) -> Result<bool> {
        if self.state != JlCopyState::Uninitialized {
            return Err(JlError::lifecycle(format!("set option \"{name}\""), self.state.as_str()));
        }
        match name {
            "compression" => {
                let algorithm = JlCompressionAlgorithm::parse(value).ok_or_else(|| {
                    JlError::config(format!("unrecognized compression algorithm: \"{value}\""))
                })?;
                algorithm.ensure_supported()?;
                self.config.compression = algorithm;
                Ok(true)
            }
            "compression_detail" => {
                self.config.compression_detail = Some(value.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn start(&mut self, schema: JlSchema) -> Result<()> {
        if self.state != JlCopyState::Uninitialized {
            return Err(JlError::lifecycle("start", self.state.as_str()));
        }
        self.config.validate()?;
        let spec = self.config.compression_spec()?;
        let compressor = JlCompressor::new(&spec, self.config.chunk_size)?;

        self.pipeline = Some(WritePipeline {
            encoder: JlRecordEncoder::new(),
            compressor,
        });
        self.schema = schema;
        self.state = JlCopyState::Started;

        log::info!(
            "Starting jsonlines copy to ({} columns, compression {}, level {}, chunk {} bytes)",
            self.schema.len(),
            spec.algorithm,
            spec.level,
            self.config.chunk_size
        );
        Ok(())
    }

    /// Encodes one row and hands it to the compressor or the sink. Any error
    /// fails the copy.
    pub fn consume_row(&mut self, row: &[JlValue]) -> Result<()> {
        if self.state != JlCopyState::Started {
            return Err(JlError::lifecycle("write a row", self.state.as_str()));
        }
        let WritePipeline {
            encoder,
            compressor,
        } = self
            .pipeline
            .as_mut()
            .ok_or_else(|| JlError::internal("write pipeline missing after start"))?;

        let written = encoder
            .encode(row, &self.schema, self.types.as_ref())
            .and_then(|line| compressor.write(line, JlFlushMode::NoFlush, &mut self.sink));
        if let Err(err) = written {
            self.state = JlCopyState::Failed;
            return Err(err);
        }

        self.stats.rows += 1;
        self.stats.bytes_out = compressor.bytes_out();
        if self.config.progress_interval > 0 && self.stats.rows % self.config.progress_interval == 0 {
            log::debug!(
                "jsonlines copy to: {} rows encoded, {} bytes written",
                self.stats.rows,
                self.stats.bytes_out
            );
        }
        Ok(())
    }

    pub fn stats(&self) -> JlCopyStats {
        self.stats
    }

    /// Finishes the compressed stream, even after zero rows, and closes the sink.
    pub fn end(&mut self) -> Result<()> {
        if self.state != JlCopyState::Started {
            return Err(JlError::lifecycle("end", self.state.as_str()));
        }
        if let Err(err) = self.finish_output() {
            self.state = JlCopyState::Failed;
            return Err(err);
        }
        self.pipeline = None;
        self.state = JlCopyState::Ended;

        log::info!(
            "Finished jsonlines copy to: {} rows, {} bytes written",
            self.stats.rows,
            self.stats.bytes_out
        );
        Ok(())
    }

    fn finish_output(&mut self) -> Result<()> {
        if let Some(pipeline) = self.pipeline.as_mut() {
            pipeline.compressor.finish(&mut self.sink)?;
            self.stats.bytes_out = pipeline.compressor.bytes_out();
        }
        self.sink.close()
    }

    /// Releases compression state without a final flush; safe in any state.
    pub fn abort(&mut self) {
        if self.pipeline.take().is_some() {
            log::debug!("Aborted jsonlines copy to after {} rows", self.stats.rows);
        }
        self.state = JlCopyState::Ended;
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }
}

impl<K: JlChunkSink> JlCopyToRoutine for JlCopyTo<K> {
    fn estimate_state_size(&self) -> usize {
        JlCopyTo::estimate_state_size(self)
    }

    fn process_option(&mut self, name: &str, value: &str) -> Result<bool> {
        JlCopyTo::process_option(self, name, value)
    }

    fn start(&mut self, schema: JlSchema) -> Result<()> {
        JlCopyTo::start(self, schema)
    }

    fn consume_row(&mut self, row: &[JlValue]) -> Result<()> {
        JlCopyTo::consume_row(self, row)
    }

    fn stats(&self) -> JlCopyStats {
        JlCopyTo::stats(self)
    }

    fn end(&mut self) -> Result<()> {
        JlCopyTo::end(self)
    }

    fn abort(&mut self) {
        JlCopyTo::abort(self)
    }
}
