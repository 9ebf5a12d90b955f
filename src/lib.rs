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

//! # JlCopy Core Library
//!
//! This is the main library entry point for JlCopy, a streaming codec
//! between a relational row stream and JSON Lines text, with optional
//! transparent gzip compression in both directions.
//!
//! ## Module Overview
//!
//! - **errors**: `JlError` and the crate-wide `Result`
//! - **record**: schema, column values and the decoded-row storage
//! - **types**: per-type text parse/stringify functions
//! - **chunk**: fixed-capacity chunk buffers and the byte channel traits
//! - **compression**: algorithm names, detail grammar and the gzip stage
//! - **config**: reader and writer configuration with builders
//! - **ingest**: line assembly, record decoding and the read driver
//! - **export**: record encoding and the write driver
//! - **format**: routine traits and the format registry
//! - **io**: whole-file convenience helpers
//!
//! ## Feature Flags
//!
//! - `compression`: enables gzip through `flate2`; without it gzip is
//!   refused like any other unsupported algorithm
//! - `full`: enables all features
//!
//! ## Quick Start
//!
//! ```rust
//! use jlcopy::{JlColumn, JlDataType, JlIO, JlReaderConfig, JlSchema, JlValue, JlWriterConfig};
//!
//! let schema = JlSchema::new(vec![
//!     JlColumn::new("id", JlDataType::Int4),
//!     JlColumn::new("a", JlDataType::Text),
//!     JlColumn::new("b", JlDataType::Jsonb),
//! ]);
//! let input = b"{\"id\":1,\"a\":\"hello\",\"b\":{\"x\":1}}\n{\"id\":2,\"a\":null,\"b\":true}\n";
//! let rows = JlIO::read_from(&input[..], None, &schema, JlReaderConfig::default()).unwrap();
//! assert_eq!(rows[1][1], JlValue::Null);
//!
//! let mut output = Vec::new();
//! JlIO::write_to(&mut output, &schema, &rows, JlWriterConfig::default()).unwrap();
//! ```
//!
//! ## Architecture
//!
//! Read path: `source.fill → inflate → line assembly → decode → row`.
//! Write path: `row → encode → deflate → sink.flush`, with one final
//! `Finish` flush at end.
//!
//! ## Error Handling
//!
//! All operations return `Result<T, JlError>`. Every error is fatal to the
//! copy that raised it; there is no partial-success mode.

pub mod errors;
pub mod record;
pub mod types;
pub mod chunk;
pub mod compression;
pub mod config;
pub mod ingest;
pub mod export;
pub mod format;
pub mod io;

pub use errors::{JlError, Result};
pub use record::{JlColumn, JlDataType, JlDecodedRow, JlRowInfo, JlSchema, JlValue};
pub use types::{JlBuiltinTypeIo, JlTypeIo};
pub use chunk::{JlChunkBuffer, JlChunkSink, JlChunkSource, JlReaderSource, JlWriterSink};
pub use compression::{JlCompressionAlgorithm, JlCompressionSpec, JlCompressor, JlDecompressor, JlFlushMode};
pub use config::{
    JlReaderConfig, JlReaderConfigBuilder, JlTrailingLinePolicy, JlWriterConfig, JlWriterConfigBuilder,
};
pub use ingest::{JlCopyFrom, JlLineAssembler, JlRecordDecoder};
pub use export::{JlCopyTo, JlRecordEncoder};
pub use format::{
    global_registry, JlCopyFromInit, JlCopyFromRoutine, JlCopyState, JlCopyStats, JlCopyToInit,
    JlCopyToRoutine, JlFormatRegistry, JlFormatRoutines, JSONLINES_FORMAT,
};
pub use io::JlIO;
