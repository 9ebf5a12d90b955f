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

//! # Data Ingestion Module
//!
//! This module implements the read direction: JSON Lines bytes in, decoded
//! rows out.
//!
//! ## Module Components
//!
//! - **Line Assembly** ([line.rs](line/index.html)): splits decompressed chunks into lines
//! - **Record Decoding** ([decoder.rs](decoder/index.html)): projects a JSON object onto the schema
//! - **Reader** ([reader.rs](reader/index.html)): the `start → next_row* → end` driver
//!
//! ## Pipeline
//!
//! ```text
//! source.fill → decompressor.refill → assembler.next_line → decoder.decode → row
//! ```
//!
//! ## Usage Patterns
//!
//! ```rust
//! use std::io::Cursor;
//! use jlcopy::chunk::JlReaderSource;
//! use jlcopy::ingest::JlCopyFrom;
//! use jlcopy::record::{JlColumn, JlDataType, JlSchema, JlValue};
//!
//! let data = b"{\"id\":1}\n{\"id\":2}\n".to_vec();
//! let mut copy = JlCopyFrom::new(JlReaderSource::new(Cursor::new(data)), None);
//! copy.start(JlSchema::new(vec![JlColumn::new("id", JlDataType::Int4)])).unwrap();
//! while let Some(row) = copy.next_row().unwrap() {
//!     assert!(matches!(row.get(0), Some(JlValue::Int(_))));
//! }
//! copy.end().unwrap();
//! ```

pub mod decoder;
pub mod line;
pub mod reader;

pub use decoder::JlRecordDecoder;
pub use line::JlLineAssembler;
pub use reader::JlCopyFrom;
