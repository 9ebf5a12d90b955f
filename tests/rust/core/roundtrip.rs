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

//! # JlCopy Round-trip Tests
//!
//! This module contains tests that write rows and read them back, through
//! the drivers, the format registry and the file helpers.
//!
//! ## Test Categories
//!
//! - **Type Tests**: every built-in column type survives a round trip
//! - **Null Tests**: a null in each column position independently
//! - **Registry Tests**: the `jsonlines` routines behind trait objects
//! - **File Tests**: whole-file helpers with and without gzip
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test roundtrip
//! ```

use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use serde_json::json;

use jlcopy::{
    global_registry, JlChunkSink, JlColumn, JlCompressionAlgorithm, JlCopyFromInit, JlCopyToInit,
    JlDataType, JlIO, JlReaderConfig, JlReaderSource, JlSchema, JlValue, JlWriterConfig,
    JlWriterConfigBuilder, Result, JSONLINES_FORMAT,
};

fn all_types_schema() -> JlSchema {
    JlSchema::new(vec![
        JlColumn::new("flag", JlDataType::Bool),
        JlColumn::new("small", JlDataType::Int2),
        JlColumn::new("int", JlDataType::Int4),
        JlColumn::new("big", JlDataType::Int8),
        JlColumn::new("real", JlDataType::Float4),
        JlColumn::new("double", JlDataType::Float8),
        JlColumn::new("amount", JlDataType::Numeric),
        JlColumn::new("label", JlDataType::Text),
        JlColumn::new("doc", JlDataType::Json),
        JlColumn::new("docb", JlDataType::Jsonb),
        JlColumn::new("addr", JlDataType::Other("inet".into())),
    ])
}

fn full_row() -> Vec<JlValue> {
    vec![
        JlValue::Bool(true),
        JlValue::Int(-32768),
        JlValue::Int(2147483647),
        JlValue::Int(-9223372036854775808),
        JlValue::Float(1.5),
        JlValue::Float(-0.000123),
        JlValue::Numeric("98765432109876543210.0123456789".into()),
        JlValue::Text("tab\tquote\" back\\slash ünïcode".into()),
        JlValue::Json(json!({"list": [1, "two", null], "nested": {"ok": false}})),
        JlValue::Json(json!([{"k": 1.25}])),
        JlValue::Text("192.168.0.1/24".into()),
    ]
}

fn round_trip(rows: &[Vec<JlValue>], config: JlWriterConfig, name: Option<&str>) -> Vec<Vec<JlValue>> {
    let schema = all_types_schema();
    let mut bytes = Vec::new();
    JlIO::write_to(&mut bytes, &schema, rows, config).unwrap();
    JlIO::read_from(&bytes[..], name, &schema, JlReaderConfig::default()).unwrap()
}

/// Tests that every built-in type survives write then read.
#[test]
fn test_all_types_round_trip() {
    let rows = vec![full_row()];
    assert_eq!(round_trip(&rows, JlWriterConfig::default(), None), rows);
}

/// Tests the same round trip through gzip.
#[test]
fn test_all_types_round_trip_gzip() {
    let rows = vec![full_row(), full_row()];
    let config = JlWriterConfigBuilder::new()
        .compression(JlCompressionAlgorithm::Gzip)
        .build();
    assert_eq!(round_trip(&rows, config, Some("rows.jsonl.gz")), rows);
}

/// Tests a null in every column position independently.
#[test]
fn test_null_in_each_position() {
    let rows: Vec<Vec<JlValue>> = (0..full_row().len())
        .map(|position| {
            let mut row = full_row();
            row[position] = JlValue::Null;
            row
        })
        .collect();
    assert_eq!(round_trip(&rows, JlWriterConfig::default(), None), rows);
}

/// Tests that special float values survive as strings.
#[test]
fn test_special_floats_round_trip() {
    let schema = JlSchema::new(vec![JlColumn::new("f", JlDataType::Float8)]);
    let rows = vec![
        vec![JlValue::Float(f64::INFINITY)],
        vec![JlValue::Float(f64::NEG_INFINITY)],
    ];
    let mut bytes = Vec::new();
    JlIO::write_to(&mut bytes, &schema, &rows, JlWriterConfig::default()).unwrap();
    assert_eq!(
        String::from_utf8(bytes.clone()).unwrap(),
        "{\"f\":\"Infinity\"}\n{\"f\":\"-Infinity\"}\n"
    );
    let read = JlIO::read_from(&bytes[..], None, &schema, JlReaderConfig::default()).unwrap();
    assert_eq!(read, rows);
}

/// Tests that file helpers round-trip through a gzip file on disk.
#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let rows = vec![full_row(), full_row()];
    let schema = all_types_schema();

    let plain = dir.path().join("rows.jsonl");
    JlIO::write_path(&plain, &schema, &rows, JlWriterConfig::default()).unwrap();
    assert_eq!(JlIO::read_path(&plain, &schema, JlReaderConfig::default()).unwrap(), rows);

    let gzipped = dir.path().join("rows.jsonl.gz");
    let config = JlWriterConfigBuilder::new()
        .compression(JlCompressionAlgorithm::Gzip)
        .compression_detail("level=6")
        .build();
    let stats = JlIO::write_path(&gzipped, &schema, &rows, config).unwrap();
    assert_eq!(stats.rows, 2);
    assert_eq!(std::fs::metadata(&gzipped).unwrap().len(), stats.bytes_out);
    assert_eq!(JlIO::read_path(&gzipped, &schema, JlReaderConfig::default()).unwrap(), rows);
}

/// Sink writing into shared memory, so the bytes outlive the boxed routine.
#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl JlChunkSink for SharedSink {
    fn flush(&mut self, bytes: &[u8]) -> Result<()> {
        self.0.lock().unwrap().extend_from_slice(bytes);
        Ok(())
    }
}

/// Tests the registered `jsonlines` routines behind trait objects.
#[test]
fn test_registry_routines() {
    let schema = JlSchema::new(vec![
        JlColumn::new("id", JlDataType::Int4),
        JlColumn::new("a", JlDataType::Text),
    ]);
    let registry = global_registry();
    let shared = SharedSink::default();

    let mut writer = registry
        .open_writer(JSONLINES_FORMAT, JlCopyToInit::new(Box::new(shared.clone())))
        .unwrap();
    assert!(writer.estimate_state_size() > 0);
    assert!(writer.process_option("compression", "gzip").unwrap());
    assert!(!writer.process_option("header", "true").unwrap());
    writer.start(schema.clone()).unwrap();
    writer.consume_row(&[JlValue::Int(1), JlValue::Text("x".into())]).unwrap();
    writer.consume_row(&[JlValue::Int(2), JlValue::Null]).unwrap();
    writer.end().unwrap();
    assert_eq!(writer.stats().rows, 2);

    let bytes = shared.0.lock().unwrap().clone();
    let init = JlCopyFromInit::new(
        Box::new(JlReaderSource::new(std::io::Cursor::new(bytes))),
        Some("from-registry.gz".into()),
    );
    let mut reader = registry.open_reader(JSONLINES_FORMAT, init).unwrap();
    assert!(!reader.process_option("compression", "gzip").unwrap());
    reader.start(schema).unwrap();

    let first = reader.next_row().unwrap().unwrap().to_values();
    assert_eq!(first, vec![JlValue::Int(1), JlValue::Text("x".into())]);
    assert_eq!(reader.row_info().line_number, 1);
    let second = reader.next_row().unwrap().unwrap().to_values();
    assert_eq!(second, vec![JlValue::Int(2), JlValue::Null]);
    assert!(reader.next_row().unwrap().is_none());
    reader.end().unwrap();
}

/// Tests that an unknown format name is rejected.
#[test]
fn test_unknown_format() {
    let init = JlCopyToInit::new(Box::new(SharedSink::default()));
    assert!(global_registry().open_writer("csv", init).is_err());
}

proptest! {
    /// Tests that arbitrary text and integers round-trip through gzip.
    #[test]
    fn test_text_round_trip(values in proptest::collection::vec((any::<i64>(), ".*"), 0..20)) {
        let schema = JlSchema::new(vec![
            JlColumn::new("n", JlDataType::Int8),
            JlColumn::new("s", JlDataType::Text),
        ]);
        let rows: Vec<Vec<JlValue>> = values
            .into_iter()
            .map(|(n, s)| vec![JlValue::Int(n), JlValue::Text(s)])
            .collect();
        let config = JlWriterConfigBuilder::new()
            .compression(JlCompressionAlgorithm::Gzip)
            .chunk_size(32)
            .build();

        let mut bytes = Vec::new();
        JlIO::write_to(&mut bytes, &schema, &rows, config).unwrap();
        let read = JlIO::read_from(&bytes[..], Some("p.gz"), &schema, JlReaderConfig::default()).unwrap();
        prop_assert_eq!(read, rows);
    }
}
