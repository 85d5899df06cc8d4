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

//! Bounded sequential reads over an immutable byte slice.

use crate::errors::{ParquetError, Result};

/// A read position over a borrowed byte slice.
///
/// All reads are little-endian and fail with [`ParquetError::Truncated`] when
/// fewer than the required bytes remain. This is the primitive both the
/// compact-protocol decoder and the page decoders are built on.
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

macro_rules! read_le {
    ($name:ident, $ty:ty, $n:literal) => {
        #[doc = concat!("Read a little-endian `", stringify!($ty), "`.")]
        pub fn $name(&mut self) -> Result<$ty> {
            let bytes = self.read_bytes($n)?;
            match bytes.try_into() {
                Ok(bytes) => Ok(<$ty>::from_le_bytes(bytes)),
                Err(_) => unreachable!(),
            }
        }
    };
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The unread tail of the slice.
    pub fn tail(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = *self
            .buf
            .get(self.pos)
            .ok_or_else(|| truncated_err!("read past end of buffer at offset {}", self.pos))?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read `n` consecutive bytes, returning a view borrowed from the
    /// underlying slice.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|end| *end <= self.buf.len());
        let end = end.ok_or_else(|| {
            truncated_err!(
                "need {} bytes at offset {} but only {} remain",
                n,
                self.pos,
                self.buf.len() - self.pos
            )
        })?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    read_le!(read_u16, u16, 2);
    read_le!(read_u32, u32, 4);
    read_le!(read_u64, u64, 8);
    read_le!(read_i32, i32, 4);
    read_le!(read_i64, i64, 8);
    read_le!(read_f32, f32, 4);
    read_le!(read_f64, f64, 8);

    /// Read a ULEB128 encoded unsigned varint.
    pub fn read_vlq(&mut self) -> Result<u64> {
        let mut result = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8()?;
            result |= ((byte & 0x7f) as u64) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
            if shift > 63 {
                return Err(malformed_err!("varint is longer than 64 bits"));
            }
        }
    }

    /// Read a zig-zag encoded signed varint.
    pub fn read_zig_zag(&mut self) -> Result<i64> {
        let val = self.read_vlq()?;
        Ok((val >> 1) as i64 ^ -((val & 1) as i64))
    }
}
