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

//! # Format Registry Module
//!
//! This module is the host-facing surface of JlCopy: the per-direction
//! routine traits a copy format implements, and the registry mapping a
//! format name to its pair of routine factories.
//!
//! ## Lifecycle
//!
//! Every driver moves through `Uninitialized → Started → Ended`. Options
//! are processed before `start`, rows flow only while `Started`, and
//! `abort` may be called at any point to release compression state
//! without a final flush.
//!
//! ## Registry Operations
//!
//! - Register a format's reader and writer factories under one name
//! - Look a format up by name
//! - Open a reader or writer from an init bundle
//!
//! The process-wide registry returned by [`global_registry`] is populated
//! once, on first use, with the `jsonlines` format and is read-only after.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::chunk::{JlChunkSink, JlChunkSource};
use crate::config::{JlReaderConfig, JlWriterConfig};
use crate::errors::{JlError, Result};
use crate::export::JlCopyTo;
use crate::ingest::JlCopyFrom;
use crate::record::{JlDecodedRow, JlRowInfo, JlSchema, JlValue};
use crate::types::{JlBuiltinTypeIo, JlTypeIo};

/// Name under which the JSON Lines format is registered.
pub const JSONLINES_FORMAT: &str = "jsonlines";

/// Lifecycle position of a copy driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JlCopyState {
    #[default]
    Uninitialized,
    Started,
    /// A fatal error was returned; only `abort` is accepted.
    Failed,
    Ended,
}

impl JlCopyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JlCopyState::Uninitialized => "uninitialized",
            JlCopyState::Started => "started",
            JlCopyState::Failed => "failed",
            JlCopyState::Ended => "ended",
        }
    }
}

impl fmt::Display for JlCopyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress counters of one copy operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JlCopyStats {
    /// Rows decoded or encoded.
    pub rows: u64,
    /// Bytes pulled from the source, before decompression.
    pub bytes_in: u64,
    /// Bytes pushed to the sink, after compression.
    pub bytes_out: u64,
}

/// Read-direction routines of a copy format.
pub trait JlCopyFromRoutine {
    /// Memory the driver keeps for itself, excluding row data.
    fn estimate_state_size(&self) -> usize;

    /// Returns whether the option name belongs to this format.
    fn process_option(&mut self, name: &str, value: &str) -> Result<bool>;

    fn start(&mut self, schema: JlSchema) -> Result<()>;

    /// Next decoded row, or `None` at end of input.
    fn next_row(&mut self) -> Result<Option<&JlDecodedRow>>;

    fn row_info(&self) -> JlRowInfo;

    fn stats(&self) -> JlCopyStats;

    fn end(&mut self) -> Result<()>;

    fn abort(&mut self);
}

/// Write-direction routines of a copy format.
pub trait JlCopyToRoutine {
    fn estimate_state_size(&self) -> usize;

    fn process_option(&mut self, name: &str, value: &str) -> Result<bool>;

    fn start(&mut self, schema: JlSchema) -> Result<()>;

    /// Encodes one row; values are in schema order.
    fn consume_row(&mut self, row: &[JlValue]) -> Result<()>;

    fn stats(&self) -> JlCopyStats;

    fn end(&mut self) -> Result<()>;

    fn abort(&mut self);
}

/// Everything a read driver is built from.
pub struct JlCopyFromInit {
    pub source: Box<dyn JlChunkSource>,
    /// Source name, used for compression detection.
    pub name: Option<String>,
    pub config: JlReaderConfig,
    pub types: Arc<dyn JlTypeIo + Send + Sync>,
}

impl JlCopyFromInit {
    pub fn new(source: Box<dyn JlChunkSource>, name: Option<String>) -> Self {
        JlCopyFromInit {
            source,
            name,
            config: JlReaderConfig::default(),
            types: Arc::new(JlBuiltinTypeIo::new()),
        }
    }
}

/// Everything a write driver is built from.
pub struct JlCopyToInit {
    pub sink: Box<dyn JlChunkSink>,
    pub config: JlWriterConfig,
    pub types: Arc<dyn JlTypeIo + Send + Sync>,
}

impl JlCopyToInit {
    pub fn new(sink: Box<dyn JlChunkSink>) -> Self {
        JlCopyToInit {
            sink,
            config: JlWriterConfig::default(),
            types: Arc::new(JlBuiltinTypeIo::new()),
        }
    }
}

pub type CopyFromFactory = fn(JlCopyFromInit) -> Result<Box<dyn JlCopyFromRoutine>>;
pub type CopyToFactory = fn(JlCopyToInit) -> Result<Box<dyn JlCopyToRoutine>>;

/// Reader and writer factories of one format.
#[derive(Clone, Copy, Debug)]
pub struct JlFormatRoutines {
    pub copy_from: CopyFromFactory,
    pub copy_to: CopyToFactory,
}

/// Registry mapping format names to their routine factories.
#[derive(Debug, Default)]
pub struct JlFormatRegistry {
    inner: HashMap<String, JlFormatRoutines>,
}

impl JlFormatRegistry {
    pub fn new() -> Self {
        JlFormatRegistry {
            inner: HashMap::new(),
        }
    }

    /// Registry with the built-in formats.
    pub fn with_builtin() -> Self {
        let mut registry = JlFormatRegistry::new();
        registry.register(
            JSONLINES_FORMAT,
            JlFormatRoutines {
                copy_from: jsonlines_copy_from,
                copy_to: jsonlines_copy_to,
            },
        );
        registry
    }

    pub fn register(&mut self, name: &str, routines: JlFormatRoutines) {
        self.inner.insert(name.to_string(), routines);
    }

    pub fn get(&self, name: &str) -> Result<JlFormatRoutines> {
        self.inner
            .get(name)
            .copied()
            .ok_or_else(|| JlError::config(format!("unknown copy format: {name}")))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn open_reader(&self, format: &str, init: JlCopyFromInit) -> Result<Box<dyn JlCopyFromRoutine>> {
        (self.get(format)?.copy_from)(init)
    }

    pub fn open_writer(&self, format: &str, init: JlCopyToInit) -> Result<Box<dyn JlCopyToRoutine>> {
        (self.get(format)?.copy_to)(init)
    }
}

/// Process-wide registry, built on first use.
pub fn global_registry() -> &'static JlFormatRegistry {
    static REGISTRY: OnceLock<JlFormatRegistry> = OnceLock::new();
    REGISTRY.get_or_init(JlFormatRegistry::with_builtin)
}

fn jsonlines_copy_from(init: JlCopyFromInit) -> Result<Box<dyn JlCopyFromRoutine>> {
    let reader = JlCopyFrom::new(init.source, init.name)
        .with_config(init.config)
        .with_type_io(init.types);
    Ok(Box::new(reader))
}

fn jsonlines_copy_to(init: JlCopyToInit) -> Result<Box<dyn JlCopyToRoutine>> {
    let writer = JlCopyTo::new(init.sink)
        .with_config(init.config)
        .with_type_io(init.types);
    Ok(Box::new(writer))
}
