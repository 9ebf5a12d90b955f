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

//! # Chunk Buffers and Byte Channels
//!
//! [`JlChunkSource`] and [`JlChunkSink`] are the only contact points with the
//! outside byte channel (file, pipe, socket). Everything above them moves
//! data in fixed-capacity [`JlChunkBuffer`]s allocated once per copy.

use std::io::{ErrorKind, Read, Write};

use crate::errors::Result;

/// Pull side of a byte channel.
pub trait JlChunkSource {
    /// Reads up to `buf.len()` bytes. `Ok(0)` means end of input.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// Push side of a byte channel.
pub trait JlChunkSink {
    /// Pushes exactly `bytes` downstream.
    fn flush(&mut self, bytes: &[u8]) -> Result<()>;

    /// Called once when the copy ends, after the final flush.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: JlChunkSource + ?Sized> JlChunkSource for Box<T> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).fill(buf)
    }
}

impl<T: JlChunkSink + ?Sized> JlChunkSink for Box<T> {
    fn flush(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).flush(bytes)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Fixed-capacity byte buffer with a read cursor.
///
/// Invariant: `read_index <= length <= capacity`. All cursor arithmetic
/// goes through the methods below.
#[derive(Debug)]
pub struct JlChunkBuffer {
    data: Box<[u8]>,
    read_index: usize,
    length: usize,
    eof: bool,
}

impl JlChunkBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        JlChunkBuffer {
            data: vec![0u8; capacity].into_boxed_slice(),
            read_index: 0,
            length: 0,
            eof: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Unconsumed bytes.
    pub fn available(&self) -> usize {
        self.length - self.read_index
    }

    pub fn unread(&self) -> &[u8] {
        &self.data[self.read_index..self.length]
    }

    /// Marks `n` unread bytes as consumed.
    pub fn advance(&mut self, n: usize) {
        assert!(
            n <= self.available(),
            "advance({n}) past the {} available bytes",
            self.available()
        );
        self.read_index += n;
    }

    /// Drops all contents and hands out the whole buffer for writing.
    /// Must be followed by [`JlChunkBuffer::set_filled`].
    pub fn writable(&mut self) -> &mut [u8] {
        self.read_index = 0;
        self.length = 0;
        &mut self.data
    }

    /// Records that the first `n` bytes were written.
    pub fn set_filled(&mut self, n: usize) {
        assert!(n <= self.capacity(), "fill of {n} bytes exceeds capacity");
        self.read_index = 0;
        self.length = n;
    }

    /// Refills the buffer from `source`, returning the byte count.
    /// A zero-byte fill marks the buffer as at end of input.
    pub fn fill_from<S: JlChunkSource + ?Sized>(&mut self, source: &mut S) -> Result<usize> {
        let n = source.fill(self.writable())?;
        self.set_filled(n);
        if n == 0 {
            self.eof = true;
        }
        Ok(n)
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }

    pub fn mark_eof(&mut self) {
        self.eof = true;
    }
}

/// Adapts any [`Read`] into a chunk source.
#[derive(Debug)]
pub struct JlReaderSource<R> {
    inner: R,
}

impl<R: Read> JlReaderSource<R> {
    pub fn new(inner: R) -> Self {
        JlReaderSource { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> JlChunkSource for JlReaderSource<R> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.inner.read(buf) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// Adapts any [`Write`] into a chunk sink.
#[derive(Debug)]
pub struct JlWriterSink<W> {
    inner: W,
}

impl<W: Write> JlWriterSink<W> {
    pub fn new(inner: W) -> Self {
        JlWriterSink { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> JlChunkSink for JlWriterSink<W> {
    fn flush(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}
