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

use memchr::memchr;

use crate::chunk::JlChunkBuffer;
use crate::config::JlTrailingLinePolicy;
use crate::errors::{JlError, Result};

/// Turns decompressed chunks into lines, carrying partial lines across refills.
///
/// Only `0x0A` ends a line. A carriage return before it stays part of the
/// line, and multi-byte characters split between chunks are reassembled
/// because the line buffer works on bytes.
#[derive(Debug)]
pub struct JlLineAssembler {
    line: Vec<u8>,
    policy: JlTrailingLinePolicy,
    max_line_length: Option<usize>,
    line_number: u64,
}

impl JlLineAssembler {
    pub fn new(policy: JlTrailingLinePolicy, max_line_length: Option<usize>) -> Self {
        JlLineAssembler {
            line: Vec::new(),
            policy,
            max_line_length,
            line_number: 0,
        }
    }

    /// One-based number of the line last returned.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Returns the next line without its line feed, or `None` at end of input.
    ///
    /// `refill` replaces the contents of `input` and returns the number of
    /// bytes it now holds; zero means the input is exhausted.
    pub fn next_line<F>(&mut self, input: &mut JlChunkBuffer, mut refill: F) -> Result<Option<&[u8]>>
    where
        F: FnMut(&mut JlChunkBuffer) -> Result<usize>,
    {
        self.line.clear();

        loop {
            if input.available() == 0 {
                if input.is_eof() || refill(input)? == 0 {
                    input.mark_eof();
                    return self.finish_input();
                }
                continue;
            }

            let chunk = input.unread();
            match memchr(b'\n', chunk) {
                Some(pos) => {
                    self.append(&chunk[..pos])?;
                    input.advance(pos + 1);
                    self.line_number += 1;
                    return Ok(Some(&self.line));
                }
                None => {
                    let len = chunk.len();
                    self.append(chunk)?;
                    input.advance(len);
                }
            }
        }
    }

    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(limit) = self.max_line_length {
            if self.line.len() + bytes.len() > limit {
                return Err(JlError::LineTooLong {
                    line: self.line_number + 1,
                    limit,
                });
            }
        }
        self.line.extend_from_slice(bytes);
        Ok(())
    }

    fn finish_input(&mut self) -> Result<Option<&[u8]>> {
        if self.line.is_empty() {
            return Ok(None);
        }
        match self.policy {
            JlTrailingLinePolicy::Discard => {
                log::warn!(
                    "Discarding {} bytes after the last line feed (line {})",
                    self.line.len(),
                    self.line_number + 1
                );
                self.line.clear();
                Ok(None)
            }
            JlTrailingLinePolicy::Emit => {
                self.line_number += 1;
                Ok(Some(&self.line))
            }
        }
    }
}
