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

//! A self-contained reader and writer for the binary layer of the
//! [Apache Parquet](https://parquet.apache.org/) columnar format.
//!
//! The crate parses a file's compact-binary footer into typed metadata,
//! decodes data pages into dynamically typed values, and produces valid
//! Parquet byte streams with PLAIN or dictionary encoded pages. Column
//! chunks are handled uncompressed only; block compression, encryption,
//! statistics and nested record reconstruction are out of scope.
//!
//! # Reading
//!
//! ```
//! use bytes::Bytes;
//! use parquet_lite::basic::{Repetition, Type};
//! use parquet_lite::data_type::Value;
//! use parquet_lite::file::properties::WriterProperties;
//! use parquet_lite::file::serialized_reader::SerializedFileReader;
//! use parquet_lite::file::writer::{ColumnSpec, SerializedFileWriter};
//!
//! let mut buffer = Vec::new();
//! let mut writer = SerializedFileWriter::new(
//!     &mut buffer,
//!     vec![ColumnSpec::new("x", Type::INT32, Repetition::REQUIRED)],
//!     WriterProperties::default(),
//! )
//! .unwrap();
//! writer
//!     .write_row_group(&[vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)]])
//!     .unwrap();
//! writer.close().unwrap();
//!
//! let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
//! assert_eq!(reader.num_rows(), 3);
//! assert_eq!(
//!     reader.read_column("x").unwrap(),
//!     vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)]
//! );
//! ```

#[macro_use]
pub mod errors;
pub mod basic;
pub mod data_type;

pub mod encodings;
pub mod file;
pub mod schema;
pub mod thrift;
pub mod util;
