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

//! Streaming gzip state machines over `flate2`'s raw zlib streams.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::chunk::{JlChunkBuffer, JlChunkSink, JlChunkSource};
use crate::compression::JlFlushMode;
use crate::errors::{JlError, Result};

const WINDOW_BITS: u8 = 15;
const GZIP_MAGIC: u8 = 0x1f;

/// Inflate side: raw compressed chunks in, decompressed chunks out.
///
/// Each member is opened from its first byte: gzip members start with the
/// gzip magic, zlib streams carry compression method 8 in the low nibble.
pub struct JlGzipInflater {
    /// `None` until the first byte of the current member is seen.
    stream: Option<Decompress>,
    raw: JlChunkBuffer,
    /// Compressed bytes consumed by members that already ended.
    member_offset: u64,
    member_done: bool,
}

fn open_member(first: u8) -> Decompress {
    if first != GZIP_MAGIC && first & 0x0f == 8 {
        Decompress::new_with_window_bits(true, WINDOW_BITS)
    } else {
        Decompress::new_gzip(WINDOW_BITS)
    }
}

impl JlGzipInflater {
    pub fn new(raw_buffer_size: usize) -> Self {
        JlGzipInflater {
            stream: None,
            raw: JlChunkBuffer::with_capacity(raw_buffer_size),
            member_offset: 0,
            member_done: false,
        }
    }

    fn offset(&self) -> u64 {
        self.member_offset + self.stream.as_ref().map_or(0, Decompress::total_in)
    }

    /// Replaces the contents of `out` with the next decompressed bytes.
    /// Returns `Ok(0)` only once the compressed input is exhausted.
    pub fn refill<S: JlChunkSource + ?Sized>(
        &mut self,
        source: &mut S,
        out: &mut JlChunkBuffer,
    ) -> Result<usize> {
        loop {
            if self.raw.available() == 0 && !self.raw.is_eof() {
                self.raw.fill_from(source)?;
            }

            if self.member_done {
                if self.raw.available() == 0 {
                    out.set_filled(0);
                    return Ok(0);
                }
                // Concatenated member.
                self.member_offset = self.offset();
                self.stream = None;
                self.member_done = false;
            }

            if self.stream.is_none() {
                match self.raw.unread().first() {
                    Some(&first) => self.stream = Some(open_member(first)),
                    None if self.raw.is_eof() => {
                        // Empty input: no member at all.
                        out.set_filled(0);
                        return Ok(0);
                    }
                    None => continue,
                }
            }
            let member_offset = self.member_offset;
            let Some(stream) = self.stream.as_mut() else {
                continue;
            };

            let before_in = stream.total_in();
            let before_out = stream.total_out();
            let status = stream
                .decompress(self.raw.unread(), out.writable(), FlushDecompress::None)
                .map_err(|err| {
                    JlError::stream(
                        member_offset + before_in,
                        format!("could not decompress data: {err}"),
                    )
                })?;

            let consumed = (stream.total_in() - before_in) as usize;
            let written = (stream.total_out() - before_out) as usize;
            // inflate may stop early when `out` fills; the rest stays for the next call.
            self.raw.advance(consumed);
            out.set_filled(written);

            if status == Status::StreamEnd {
                self.member_done = true;
            }
            if written > 0 {
                return Ok(written);
            }
            if self.member_done {
                continue;
            }

            if self.raw.is_eof() && self.raw.available() == 0 {
                return Err(JlError::stream(
                    self.offset(),
                    "unexpected end of compressed data",
                ));
            }
            if consumed == 0 && self.raw.available() > 0 {
                return Err(JlError::stream(
                    self.offset(),
                    "decompression made no progress",
                ));
            }
        }
    }
}

/// Deflate side: newline-terminated chunks in, compressed chunks to the sink.
pub struct JlGzipDeflater {
    stream: Compress,
    out: Box<[u8]>,
}

impl JlGzipDeflater {
    pub fn new(level: i32, chunk_size: usize) -> Self {
        let level = if level < 0 {
            Compression::default()
        } else {
            Compression::new(level as u32)
        };
        JlGzipDeflater {
            stream: Compress::new_gzip(level, WINDOW_BITS),
            out: vec![0u8; chunk_size].into_boxed_slice(),
        }
    }

    /// Feeds `data` and pushes whatever output is ready. One call may emit
    /// several output chunks; `Finish` also writes the gzip trailer.
    pub fn write<K: JlChunkSink + ?Sized>(
        &mut self,
        data: &[u8],
        mode: JlFlushMode,
        sink: &mut K,
    ) -> Result<()> {
        let flush = match mode {
            JlFlushMode::NoFlush => FlushCompress::None,
            JlFlushMode::Finish => FlushCompress::Finish,
        };
        let mut offset = 0;

        loop {
            let before_in = self.stream.total_in();
            let before_out = self.stream.total_out();
            let status = self
                .stream
                .compress(&data[offset..], &mut self.out, flush)
                .map_err(|err| JlError::stream(before_in, format!("could not compress data: {err}")))?;

            let consumed = (self.stream.total_in() - before_in) as usize;
            let written = (self.stream.total_out() - before_out) as usize;
            offset += consumed;

            if written > 0 {
                sink.flush(&self.out[..written])?;
            }

            let done = match mode {
                JlFlushMode::NoFlush => offset == data.len() && written < self.out.len(),
                JlFlushMode::Finish => status == Status::StreamEnd,
            };
            if done {
                return Ok(());
            }
            if consumed == 0 && written == 0 {
                return Err(JlError::stream(
                    self.stream.total_in(),
                    "compression made no progress",
                ));
            }
        }
    }
}
