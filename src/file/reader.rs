// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The random-access byte source abstraction consumed by the reader.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use bytes::Bytes;

use crate::errors::{ParquetError, Result};

/// Something with a known length in bytes.
pub trait Length {
    /// Total length of the underlying source.
    fn len(&self) -> u64;

    /// True when the source is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A random-access byte source: the reader's single I/O primitive.
///
/// Implementations return exactly `length` bytes starting at `start`; a
/// source that cannot is truncated and must fail with
/// [`ParquetError::Truncated`]. Sequential reads are assumed cheap but any
/// access pattern must work.
pub trait ChunkReader: Length {
    /// Read `length` bytes starting at `start`.
    fn get_bytes(&self, start: u64, length: usize) -> Result<Bytes>;
}

impl Length for Bytes {
    fn len(&self) -> u64 {
        Bytes::len(self) as u64
    }
}

impl ChunkReader for Bytes {
    fn get_bytes(&self, start: u64, length: usize) -> Result<Bytes> {
        let start = usize::try_from(start)
            .map_err(|_| truncated_err!("offset {} exceeds addressable memory", start))?;
        let end = start.checked_add(length).filter(|end| *end <= Bytes::len(self));
        let end = end.ok_or_else(|| {
            truncated_err!(
                "requested {} bytes at offset {} but source holds {}",
                length,
                start,
                Bytes::len(self)
            )
        })?;
        Ok(self.slice(start..end))
    }
}

impl Length for File {
    fn len(&self) -> u64 {
        self.metadata().map(|m| m.len()).unwrap_or(0)
    }
}

impl ChunkReader for File {
    fn get_bytes(&self, start: u64, length: usize) -> Result<Bytes> {
        // clone the handle so the shared reader keeps an independent cursor
        let mut file = self.try_clone()?;
        file.seek(SeekFrom::Start(start))?;
        let mut buf = vec![0u8; length];
        file.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                truncated_err!("requested {} bytes at offset {} past end of file", length, start)
            } else {
                ParquetError::from(e)
            }
        })?;
        Ok(Bytes::from(buf))
    }
}
