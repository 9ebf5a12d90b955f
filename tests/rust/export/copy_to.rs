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

//! # JlCopy Write Path Tests
//!
//! This module contains tests for the write direction: host rows into JSON
//! Lines, optionally gzip-compressed.
//!
//! ## Test Categories
//!
//! - **Encoding Tests**: member order and names
//! - **Option Tests**: `compression` and `compression_detail` handling
//! - **Compression Tests**: output readable by a standard gzip decoder
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test copy_to
//! ```

use std::io::Read;

use flate2::read::MultiGzDecoder;
use serde_json::{json, Value};

use jlcopy::{
    JlChunkSink, JlColumn, JlCompressionAlgorithm, JlCopyState, JlCopyTo, JlDataType, JlError, JlSchema,
    JlValue, JlWriterConfigBuilder, JlWriterSink, Result,
};

/// Sink recording every flush separately.
#[derive(Debug, Default)]
struct RecordingSink {
    flushes: Vec<Vec<u8>>,
    closed: bool,
}

impl RecordingSink {
    fn bytes(&self) -> Vec<u8> {
        self.flushes.concat()
    }
}

impl JlChunkSink for RecordingSink {
    fn flush(&mut self, bytes: &[u8]) -> Result<()> {
        self.flushes.push(bytes.to_vec());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

fn event_schema() -> JlSchema {
    JlSchema::new(vec![
        JlColumn::new("id", JlDataType::Int4),
        JlColumn::new("a", JlDataType::Text),
        JlColumn::new("b", JlDataType::Jsonb),
    ])
}

fn event_rows() -> Vec<Vec<JlValue>> {
    vec![
        vec![
            JlValue::Int(1),
            JlValue::Text("hello".into()),
            JlValue::Json(json!({"x": 1})),
        ],
        vec![JlValue::Int(2), JlValue::Null, JlValue::Json(json!(true))],
    ]
}

fn gunzip(bytes: &[u8]) -> String {
    let mut text = String::new();
    MultiGzDecoder::new(bytes).read_to_string(&mut text).unwrap();
    text
}

fn write_events(options: &[(&str, &str)]) -> Result<RecordingSink> {
    let mut copy = JlCopyTo::new(RecordingSink::default());
    for (name, value) in options {
        copy.process_option(name, value)?;
    }
    copy.start(event_schema())?;
    for row in event_rows() {
        copy.consume_row(&row)?;
    }
    copy.end()?;
    Ok(copy.into_sink())
}

/// Tests that each row becomes one line with exactly the schema's keys.
#[test]
fn test_lines_carry_schema_keys_in_order() {
    let sink = write_events(&[]).unwrap();
    let text = String::from_utf8(sink.bytes()).unwrap();
    assert_eq!(
        text,
        "{\"id\":1,\"a\":\"hello\",\"b\":{\"x\":1}}\n{\"id\":2,\"a\":null,\"b\":true}\n"
    );

    for line in text.lines() {
        let value: Value = serde_json::from_str(line).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        for key in ["id", "a", "b"] {
            assert!(value.get(key).is_some());
        }
    }
}

/// Tests that uncompressed output is flushed once per row.
#[test]
fn test_plain_output_flushes_per_row() {
    let sink = write_events(&[]).unwrap();
    assert_eq!(sink.flushes.len(), 2);
    assert!(sink.closed);
}

/// Tests that gzip output is readable by a standard gzip decoder.
#[test]
fn test_gzip_output_is_standard() {
    let sink = write_events(&[("compression", "gzip")]).unwrap();
    let plain = write_events(&[]).unwrap();
    assert_eq!(gunzip(&sink.bytes()), String::from_utf8(plain.bytes()).unwrap());
}

/// Tests that the compression level from the detail string is honored.
#[test]
fn test_gzip_levels() {
    let fast = write_events(&[("compression", "gzip"), ("compression_detail", "1")]).unwrap();
    let best = write_events(&[("compression", "gzip"), ("compression_detail", "level=9")]).unwrap();
    assert_eq!(gunzip(&fast.bytes()), gunzip(&best.bytes()));
}

/// Tests that zero rows still produce a complete gzip stream.
#[test]
fn test_zero_rows_gzip() {
    let mut copy = JlCopyTo::new(JlWriterSink::new(Vec::new()));
    copy.process_option("compression", "gzip").unwrap();
    copy.start(event_schema()).unwrap();
    copy.end().unwrap();

    let bytes = copy.into_sink().into_inner();
    assert!(!bytes.is_empty());
    assert_eq!(gunzip(&bytes), "");
}

/// Tests that zero rows without compression write nothing.
#[test]
fn test_zero_rows_plain() {
    let mut copy = JlCopyTo::new(RecordingSink::default());
    copy.start(event_schema()).unwrap();
    copy.end().unwrap();
    assert!(copy.sink().flushes.is_empty());
}

/// Tests that large gzip output is split into bounded chunks.
#[test]
fn test_gzip_chunks_respect_chunk_size() {
    let config = JlWriterConfigBuilder::new()
        .compression(JlCompressionAlgorithm::Gzip)
        .compression_detail("1")
        .chunk_size(64)
        .build();
    let schema = JlSchema::new(vec![JlColumn::new("n", JlDataType::Int8)]);
    let mut copy = JlCopyTo::new(RecordingSink::default()).with_config(config);
    copy.start(schema).unwrap();
    let mut expected = String::new();
    for i in 0..2000i64 {
        copy.consume_row(&[JlValue::Int(i * 7919)]).unwrap();
        expected.push_str(&format!("{{\"n\":{}}}\n", i * 7919));
    }
    copy.end().unwrap();

    let stats = copy.stats();
    let sink = copy.into_sink();
    assert!(sink.flushes.len() > 1);
    assert!(sink.flushes.iter().all(|chunk| chunk.len() <= 64));
    assert_eq!(stats.bytes_out, sink.bytes().len() as u64);
    assert_eq!(gunzip(&sink.bytes()), expected);
}

/// Tests that lz4 and zstd are refused before any row is written.
#[test]
fn test_lz4_and_zstd_are_unsupported() {
    for algorithm in ["lz4", "zstd"] {
        let err = write_events(&[("compression", algorithm)]).unwrap_err();
        assert!(matches!(err, JlError::Unsupported { .. }), "{algorithm}: {err}");
    }
}

/// Tests that a configured unsupported algorithm fails at start.
#[test]
fn test_unsupported_algorithm_in_config_fails_at_start() {
    let config = JlWriterConfigBuilder::new()
        .compression(JlCompressionAlgorithm::Zstd)
        .build();
    let mut copy = JlCopyTo::new(RecordingSink::default()).with_config(config);
    assert!(copy.start(event_schema()).unwrap_err().is_config());
    assert!(copy.sink().flushes.is_empty());
}

/// Tests that an unknown algorithm name is a configuration error.
#[test]
fn test_unknown_algorithm() {
    let err = write_events(&[("compression", "brotli")]).unwrap_err();
    assert!(matches!(err, JlError::Config { .. }));
    assert!(err.to_string().contains("unrecognized compression algorithm"));
}

/// Tests detail validation at start.
#[test]
fn test_invalid_detail_fails_at_start() {
    for detail in ["10", "level=x", "workers=2", "long", "speed=1"] {
        let err = write_events(&[("compression", "gzip"), ("compression_detail", detail)]).unwrap_err();
        assert!(
            err.to_string().contains("invalid compression specification"),
            "{detail}: {err}"
        );
    }

    let err = write_events(&[("compression_detail", "3")]).unwrap_err();
    assert!(err.to_string().contains("does not accept a compression level"));
}

/// Tests that a row of the wrong width is rejected.
#[test]
fn test_row_width_mismatch() {
    let mut copy = JlCopyTo::new(RecordingSink::default());
    copy.start(event_schema()).unwrap();
    let err = copy.consume_row(&[JlValue::Int(1)]).unwrap_err();
    assert!(matches!(err, JlError::Schema { .. }));
}

/// Tests that a failed row stops the copy until it is aborted.
#[test]
fn test_failed_row_fails_the_copy() {
    let mut copy = JlCopyTo::new(RecordingSink::default());
    copy.start(event_schema()).unwrap();
    assert!(copy.consume_row(&[JlValue::Int(1)]).is_err());
    assert_eq!(copy.state(), JlCopyState::Failed);

    let row = &event_rows()[0];
    assert!(matches!(copy.consume_row(row).unwrap_err(), JlError::Lifecycle { .. }));
    assert!(matches!(copy.end().unwrap_err(), JlError::Lifecycle { .. }));
    assert!(copy.sink().flushes.is_empty());
    assert!(!copy.sink().closed);

    copy.abort();
    assert_eq!(copy.state(), JlCopyState::Ended);
}

/// Sink whose flushes always fail.
struct BrokenSink;

impl JlChunkSink for BrokenSink {
    fn flush(&mut self, _bytes: &[u8]) -> Result<()> {
        Err(JlError::stream(0, "channel closed"))
    }
}

/// Tests that a sink failure fails the copy.
#[test]
fn test_sink_failure_fails_the_copy() {
    let mut copy = JlCopyTo::new(BrokenSink);
    copy.start(event_schema()).unwrap();
    let err = copy.consume_row(&event_rows()[0]).unwrap_err();
    assert!(matches!(err, JlError::Stream { .. }));
    assert!(matches!(copy.end().unwrap_err(), JlError::Lifecycle { .. }));
}

/// Tests that real columns are written with single-precision text.
#[test]
fn test_real_columns_are_not_widened() {
    let schema = JlSchema::new(vec![JlColumn::new("r", JlDataType::Float4)]);
    let mut copy = JlCopyTo::new(RecordingSink::default());
    copy.start(schema).unwrap();
    copy.consume_row(&[JlValue::Float(0.1f32 as f64)]).unwrap();
    copy.end().unwrap();
    assert_eq!(copy.sink().bytes(), b"{\"r\":0.1}\n");
}
