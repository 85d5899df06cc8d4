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

//! Reading and writing whole Parquet files.
//!
//! * [`serialized_reader::SerializedFileReader`] opens a byte source,
//!   validates the footer and decodes column values.
//! * [`writer::SerializedFileWriter`] produces a Parquet byte stream from
//!   columnar values.
//! * [`metadata`] holds the typed footer records shared by both.

pub mod metadata;
pub mod properties;
pub mod reader;
pub mod serialized_reader;
pub mod writer;

/// The length of the parquet footer frame in bytes: a little-endian u32
/// footer length followed by the magic.
pub const FOOTER_SIZE: usize = 8;

/// Magic bytes at both ends of every parquet file.
pub const PARQUET_MAGIC: [u8; 4] = [b'P', b'A', b'R', b'1'];

/// The smallest possible parquet file: leading magic plus the footer frame.
pub(crate) const MIN_FILE_SIZE: u64 = 12;
