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

//! # Data Export Module
//!
//! This module implements the write direction: host rows in, JSON Lines
//! bytes out.
//!
//! ## Module Components
//!
//! - **Record Encoding** ([encoder.rs](encoder/index.html)): one row to one JSON object line
//! - **Writer** ([writer.rs](writer/index.html)): the `start → consume_row* → end` driver
//!
//! ## Output Format
//!
//! - One JSON object per line, members in schema order
//! - No header, footer or trailer
//! - With `compression = gzip`, one standard gzip envelope around the whole
//!   stream, finished at `end` even when no row was written
//!
//! ## Usage Patterns
//!
//! ```rust
//! use jlcopy::chunk::JlWriterSink;
//! use jlcopy::export::JlCopyTo;
//! use jlcopy::record::{JlColumn, JlDataType, JlSchema, JlValue};
//!
//! let mut copy = JlCopyTo::new(JlWriterSink::new(Vec::new()));
//! copy.process_option("compression", "gzip").unwrap();
//! copy.start(JlSchema::new(vec![JlColumn::new("id", JlDataType::Int4)])).unwrap();
//! copy.consume_row(&[JlValue::Int(1)]).unwrap();
//! copy.end().unwrap();
//! let gzipped = copy.into_sink().into_inner();
//! ```

pub mod encoder;
pub mod writer;

pub use encoder::JlRecordEncoder;
pub use writer::JlCopyTo;
