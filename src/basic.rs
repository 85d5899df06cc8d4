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

//! Rust mirrors of the Parquet Thrift enumerations, with compact protocol
//! read and write support.

use std::fmt;
use std::io::Write;

use crate::errors::{ParquetError, Result};
use crate::thrift::{
    ElementType, FieldType, ReadThrift, ThriftCompactOutputProtocol, ThriftSliceInputProtocol,
    WriteThrift, WriteThriftField,
};

/// Generates an enum mirroring a Parquet Thrift enum definition: integer
/// conversion both ways plus compact protocol read/write as i32.
macro_rules! thrift_enum {
    ($(#[$attr:meta])* enum $name:ident { $($(#[$vattr:meta])* $variant:ident = $value:literal,)* }) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        #[allow(non_camel_case_types)]
        pub enum $name {
            $($(#[$vattr])* $variant = $value,)*
        }

        impl TryFrom<i32> for $name {
            type Error = ParquetError;
            fn try_from(value: i32) -> Result<Self> {
                match value {
                    $($value => Ok(Self::$variant),)*
                    _ => Err(malformed_err!(
                        "unexpected {} value {}", stringify!($name), value
                    )),
                }
            }
        }

        impl<'a> ReadThrift<'a> for $name {
            fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
                Self::try_from(prot.read_i32()?)
            }
        }

        impl WriteThrift for $name {
            const ELEMENT_TYPE: ElementType = ElementType::I32;

            fn write_thrift<W: Write>(
                &self,
                writer: &mut ThriftCompactOutputProtocol<W>,
            ) -> Result<()> {
                writer.write_i32(*self as i32)
            }
        }

        impl WriteThriftField for $name {
            fn write_thrift_field<W: Write>(
                &self,
                writer: &mut ThriftCompactOutputProtocol<W>,
                field_id: i16,
                last_field_id: i16,
            ) -> Result<i16> {
                writer.write_field_begin(FieldType::I32, field_id, last_field_id)?;
                self.write_thrift(writer)?;
                Ok(field_id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{self:?}")
            }
        }
    };
}

thrift_enum!(
/// The physical type of a leaf column.
enum Type {
  BOOLEAN = 0,
  INT32 = 1,
  INT64 = 2,
  INT96 = 3,
  FLOAT = 4,
  DOUBLE = 5,
  BYTE_ARRAY = 6,
  FIXED_LEN_BYTE_ARRAY = 7,
}
);

thrift_enum!(
/// Representation of field repetition in a schema.
enum FieldRepetitionType {
  /// The field is required (can not be null) and each row has exactly 1 value.
  REQUIRED = 0,
  /// The field is optional (can be null) and each row has 0 or 1 values.
  OPTIONAL = 1,
  /// The field is repeated and can contain 0 or more values.
  REPEATED = 2,
}
);

/// Type alias for thrift `FieldRepetitionType`.
pub type Repetition = FieldRepetitionType;

thrift_enum!(
/// Encodings supported by Parquet.
///
/// Only [`Encoding::PLAIN`], [`Encoding::PLAIN_DICTIONARY`],
/// [`Encoding::RLE`] and [`Encoding::RLE_DICTIONARY`] are decoded; the rest
/// are recognised so that metadata naming them can still be parsed.
enum Encoding {
  /// Default encoding: fixed little-endian values, length-prefixed byte
  /// arrays, bit-packed booleans.
  PLAIN = 0,
  /// Deprecated dictionary encoding. The dictionary page itself is PLAIN
  /// encoded; data pages carry RLE/bit-packed indices.
  PLAIN_DICTIONARY = 2,
  /// Group packed run length encoding, used for definition and repetition
  /// levels.
  RLE = 3,
  /// Deprecated bit-packed-only level encoding.
  BIT_PACKED = 4,
  /// Delta encoding for integers.
  DELTA_BINARY_PACKED = 5,
  /// Encoding for byte arrays that splits lengths from data.
  DELTA_LENGTH_BYTE_ARRAY = 6,
  /// Incremental (prefix) encoding for byte arrays.
  DELTA_BYTE_ARRAY = 7,
  /// Dictionary encoding with RLE/bit-packed indices.
  RLE_DICTIONARY = 8,
  /// Byte-stream split encoding for fixed-width data.
  BYTE_STREAM_SPLIT = 9,
}
);

thrift_enum!(
/// Supported block compression algorithms.
///
/// This crate reads and writes [`Compression::UNCOMPRESSED`] chunks only;
/// any other codec on a column chunk fails value decoding.
enum Compression {
  UNCOMPRESSED = 0,
  SNAPPY = 1,
  GZIP = 2,
  LZO = 3,
  BROTLI = 4,
  LZ4 = 5,
  ZSTD = 6,
  LZ4_RAW = 7,
}
);

thrift_enum!(
/// The type of a page.
enum PageType {
  DATA_PAGE = 0,
  INDEX_PAGE = 1,
  DICTIONARY_PAGE = 2,
  DATA_PAGE_V2 = 3,
}
);

thrift_enum!(
/// Common types used by frameworks on top of the physical types.
///
/// Preserved on read and emitted on write when set; the only semantic the
/// core attaches is [`ConvertedType::UTF8`] marking string byte arrays.
enum ConvertedType {
  UTF8 = 0,
  MAP = 1,
  MAP_KEY_VALUE = 2,
  LIST = 3,
  ENUM = 4,
  DECIMAL = 5,
  DATE = 6,
  TIME_MILLIS = 7,
  TIME_MICROS = 8,
  TIMESTAMP_MILLIS = 9,
  TIMESTAMP_MICROS = 10,
  UINT_8 = 11,
  UINT_16 = 12,
  UINT_32 = 13,
  UINT_64 = 14,
  INT_8 = 15,
  INT_16 = 16,
  INT_32 = 17,
  INT_64 = 18,
  JSON = 19,
  BSON = 20,
  INTERVAL = 21,
}
);
