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

//! # JlCopy Compression Module
//!
//! This module wraps the byte channel with an optional streaming compression
//! stage. On the read side [`JlDecompressor`] sits between the chunk source
//! and the line assembler; on the write side [`JlCompressor`] sits between
//! the record encoder and the chunk sink.
//!
//! ## Algorithms
//!
//! - **none**: bytes pass through untouched
//! - **gzip**: standard RFC 1952 envelope over the whole stream, available
//!   with the `compression` feature
//! - **lz4**, **zstd**: recognized names that are rejected as unsupported
//!
//! ## Read-side Detection
//!
//! The read side has no option: the algorithm follows from the source name.
//! Only the exact suffix `.gz` selects gzip; a missing name or a name
//! without a dot means no compression.
//!
//! ## Usage Example
//!
//! ```rust
//! use jlcopy::compression::JlCompressionAlgorithm;
//!
//! assert_eq!(
//!     JlCompressionAlgorithm::from_source_name(Some("events.jsonl.gz")),
//!     JlCompressionAlgorithm::Gzip
//! );
//! assert_eq!(JlCompressionAlgorithm::parse("GZIP"), None);
//! ```

#[cfg(feature = "compression")]
pub mod gzip;
pub mod spec;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chunk::{JlChunkBuffer, JlChunkSink, JlChunkSource};
use crate::errors::{JlError, Result};

pub use spec::JlCompressionSpec;

#[cfg(feature = "compression")]
use gzip::{JlGzipDeflater, JlGzipInflater};

/// Compression algorithm names accepted by the `compression` option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JlCompressionAlgorithm {
    #[default]
    None,
    Gzip,
    Lz4,
    Zstd,
}

impl JlCompressionAlgorithm {
    /// Exact, case-sensitive lookup of an algorithm name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "none" => Some(JlCompressionAlgorithm::None),
            "gzip" => Some(JlCompressionAlgorithm::Gzip),
            "lz4" => Some(JlCompressionAlgorithm::Lz4),
            "zstd" => Some(JlCompressionAlgorithm::Zstd),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JlCompressionAlgorithm::None => "none",
            JlCompressionAlgorithm::Gzip => "gzip",
            JlCompressionAlgorithm::Lz4 => "lz4",
            JlCompressionAlgorithm::Zstd => "zstd",
        }
    }

    /// Read-side detection from the source name.
    pub fn from_source_name(name: Option<&str>) -> Self {
        match name.and_then(|name| name.rfind('.').map(|dot| &name[dot..])) {
            Some(".gz") => JlCompressionAlgorithm::Gzip,
            _ => JlCompressionAlgorithm::None,
        }
    }

    /// Fails with [`JlError::Unsupported`] for algorithms this build cannot run.
    pub fn ensure_supported(&self) -> Result<()> {
        match self {
            JlCompressionAlgorithm::None => Ok(()),
            JlCompressionAlgorithm::Gzip => {
                if cfg!(feature = "compression") {
                    Ok(())
                } else {
                    Err(JlError::unsupported("gzip compression in this build"))
                }
            }
            JlCompressionAlgorithm::Lz4 => Err(JlError::unsupported("LZ4 compression")),
            JlCompressionAlgorithm::Zstd => Err(JlError::unsupported("Zstd compression")),
        }
    }
}

impl fmt::Display for JlCompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flush mode handed to the compressor with each chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JlFlushMode {
    /// Interior record: emit output only when the internal buffer fills.
    NoFlush,
    /// End of stream: drain everything and write the trailer.
    Finish,
}

/// Source wrapper that counts the raw bytes pulled through it.
struct CountingSource<'a, S: ?Sized> {
    inner: &'a mut S,
    bytes: &'a mut u64,
}

impl<S: JlChunkSource + ?Sized> JlChunkSource for CountingSource<'_, S> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.inner.fill(buf)?;
        *self.bytes += n as u64;
        Ok(n)
    }
}

/// Sink wrapper that counts the bytes pushed through it.
struct CountingSink<'a, K: ?Sized> {
    inner: &'a mut K,
    bytes: &'a mut u64,
}

impl<K: JlChunkSink + ?Sized> JlChunkSink for CountingSink<'_, K> {
    fn flush(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.flush(bytes)?;
        *self.bytes += bytes.len() as u64;
        Ok(())
    }
}

enum Inflate {
    Passthrough,
    #[cfg(feature = "compression")]
    Gzip(Box<JlGzipInflater>),
}

/// Read-side filter producing decompressed chunks.
pub struct JlDecompressor {
    algorithm: JlCompressionAlgorithm,
    backend: Inflate,
    raw_bytes: u64,
}

impl JlDecompressor {
    /// `raw_buffer_size` is the capacity of the compressed-side buffer and
    /// is ignored without compression.
    pub fn new(algorithm: JlCompressionAlgorithm, raw_buffer_size: usize) -> Result<Self> {
        algorithm.ensure_supported()?;
        let backend = match algorithm {
            #[cfg(feature = "compression")]
            JlCompressionAlgorithm::Gzip => {
                Inflate::Gzip(Box::new(JlGzipInflater::new(raw_buffer_size)))
            }
            _ => {
                let _ = raw_buffer_size;
                Inflate::Passthrough
            }
        };
        Ok(JlDecompressor {
            algorithm,
            backend,
            raw_bytes: 0,
        })
    }

    pub fn algorithm(&self) -> JlCompressionAlgorithm {
        self.algorithm
    }

    /// Raw bytes pulled from the channel so far.
    pub fn raw_bytes(&self) -> u64 {
        self.raw_bytes
    }

    /// Replaces the contents of `out` with the next chunk of plain bytes.
    /// `Ok(0)` means the input is exhausted.
    pub fn refill<S: JlChunkSource + ?Sized>(
        &mut self,
        source: &mut S,
        out: &mut JlChunkBuffer,
    ) -> Result<usize> {
        let mut counted = CountingSource {
            inner: source,
            bytes: &mut self.raw_bytes,
        };
        match &mut self.backend {
            Inflate::Passthrough => out.fill_from(&mut counted),
            #[cfg(feature = "compression")]
            Inflate::Gzip(inflater) => inflater.refill(&mut counted, out),
        }
    }
}

enum Deflate {
    Passthrough,
    #[cfg(feature = "compression")]
    Gzip(Box<JlGzipDeflater>),
}

/// Write-side filter turning encoded lines into sink flushes.
pub struct JlCompressor {
    algorithm: JlCompressionAlgorithm,
    backend: Deflate,
    bytes_out: u64,
}

impl JlCompressor {
    /// Builds the compressor for a validated specification. `chunk_size`
    /// is the capacity of the compressed output buffer.
    pub fn new(spec: &JlCompressionSpec, chunk_size: usize) -> Result<Self> {
        spec.algorithm.ensure_supported()?;
        let backend = match spec.algorithm {
            #[cfg(feature = "compression")]
            JlCompressionAlgorithm::Gzip => {
                Deflate::Gzip(Box::new(JlGzipDeflater::new(spec.level, chunk_size)))
            }
            _ => {
                let _ = chunk_size;
                Deflate::Passthrough
            }
        };
        Ok(JlCompressor {
            algorithm: spec.algorithm,
            backend,
            bytes_out: 0,
        })
    }

    pub fn algorithm(&self) -> JlCompressionAlgorithm {
        self.algorithm
    }

    /// Bytes pushed to the sink so far.
    pub fn bytes_out(&self) -> u64 {
        self.bytes_out
    }

    pub fn write<K: JlChunkSink + ?Sized>(
        &mut self,
        data: &[u8],
        mode: JlFlushMode,
        sink: &mut K,
    ) -> Result<()> {
        let mut counted = CountingSink {
            inner: sink,
            bytes: &mut self.bytes_out,
        };
        match &mut self.backend {
            Deflate::Passthrough => {
                if data.is_empty() {
                    return Ok(());
                }
                let _ = mode;
                counted.flush(data)
            }
            #[cfg(feature = "compression")]
            Deflate::Gzip(deflater) => deflater.write(data, mode, &mut counted),
        }
    }

    /// Final flush; writes the gzip trailer when compressing.
    pub fn finish<K: JlChunkSink + ?Sized>(&mut self, sink: &mut K) -> Result<()> {
        self.write(&[], JlFlushMode::Finish, sink)
    }
}
