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

//! Common Parquet errors and macros.

use std::error::Error;
use std::{io, result};

/// Parquet error enumeration
#[derive(Debug)]
pub enum ParquetError {
    /// Requested bytes lie beyond the end of the byte source or page.
    Truncated(String),
    /// Structurally invalid input: bad magic, impossible footer length,
    /// overlong varint, unknown compact-protocol type in a required position.
    Malformed(String),
    /// Valid Parquet that this crate does not handle, e.g. compressed column
    /// chunks or delta encodings.
    Unsupported(String),
    /// A column operation was requested against a column of the wrong
    /// physical type.
    TypeMismatch(String),
    /// Column name not present, or a row-group / page index out of range.
    NotFound(String),
    /// An external error, most commonly from the underlying byte source or
    /// output sink.
    External(Box<dyn Error + Send + Sync>),
}

impl std::fmt::Display for ParquetError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self {
            ParquetError::Truncated(message) => write!(fmt, "Truncated: {message}"),
            ParquetError::Malformed(message) => write!(fmt, "Malformed: {message}"),
            ParquetError::Unsupported(message) => write!(fmt, "Unsupported: {message}"),
            ParquetError::TypeMismatch(message) => write!(fmt, "Type mismatch: {message}"),
            ParquetError::NotFound(message) => write!(fmt, "Not found: {message}"),
            ParquetError::External(e) => write!(fmt, "External: {e}"),
        }
    }
}

impl Error for ParquetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParquetError::External(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for ParquetError {
    fn from(e: io::Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

impl From<std::str::Utf8Error> for ParquetError {
    fn from(e: std::str::Utf8Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

impl From<std::string::FromUtf8Error> for ParquetError {
    fn from(e: std::string::FromUtf8Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

/// A specialized `Result` for Parquet errors.
pub type Result<T, E = ParquetError> = result::Result<T, E>;

// ----------------------------------------------------------------------
// Conversion from `ParquetError` to other types of `Error`s

impl From<ParquetError> for io::Error {
    fn from(e: ParquetError) -> Self {
        io::Error::new(io::ErrorKind::Other, e)
    }
}

// ----------------------------------------------------------------------
// Convenient macros for different errors

macro_rules! truncated_err {
    ($fmt:expr) => (ParquetError::Truncated($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::Truncated(format!($fmt, $($args),*)));
}

macro_rules! malformed_err {
    ($fmt:expr) => (ParquetError::Malformed($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::Malformed(format!($fmt, $($args),*)));
}

macro_rules! unsupported_err {
    ($fmt:expr) => (ParquetError::Unsupported($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::Unsupported(format!($fmt, $($args),*)));
}

macro_rules! type_mismatch_err {
    ($fmt:expr) => (ParquetError::TypeMismatch($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::TypeMismatch(format!($fmt, $($args),*)));
}

macro_rules! not_found_err {
    ($fmt:expr) => (ParquetError::NotFound($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::NotFound(format!($fmt, $($args),*)));
}
