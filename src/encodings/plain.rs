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

//! PLAIN encoding and decoding of values.
//!
//! PLAIN stores fixed-width values as little-endian bytes, byte arrays with a
//! 4-byte little-endian length prefix, and booleans bit-packed LSB first.
//! INT96 occupies 12 raw bytes and is carried around without interpretation.

use bytes::Bytes;

use crate::basic::Type;
use crate::data_type::Value;
use crate::errors::{ParquetError, Result};
use crate::util::cursor::ByteCursor;

/// Read a single PLAIN value of the given physical type. Booleans occupy a
/// whole byte here; this entry point serves dictionary pages, where values
/// are never bit-packed.
pub(crate) fn read_plain_value(cursor: &mut ByteCursor<'_>, physical_type: Type) -> Result<Value> {
    match physical_type {
        Type::BOOLEAN => Ok(Value::Boolean(cursor.read_u8()? != 0)),
        Type::INT32 => Ok(Value::Int32(cursor.read_i32()?)),
        Type::INT64 => Ok(Value::Int64(cursor.read_i64()?)),
        Type::FLOAT => Ok(Value::Float(cursor.read_f32()?)),
        Type::DOUBLE => Ok(Value::Double(cursor.read_f64()?)),
        Type::BYTE_ARRAY => {
            let len = cursor.read_u32()? as usize;
            let bytes = cursor.read_bytes(len)?;
            Ok(Value::Bytes(Bytes::copy_from_slice(bytes)))
        }
        Type::INT96 => {
            let bytes = cursor.read_bytes(12)?;
            Ok(Value::Bytes(Bytes::copy_from_slice(bytes)))
        }
        Type::FIXED_LEN_BYTE_ARRAY => Err(unsupported_err!(
            "PLAIN decoding of FIXED_LEN_BYTE_ARRAY is not supported"
        )),
    }
}

/// Decode the PLAIN values section of a data page. `def_levels` has one entry
/// per row of the page; rows whose level is below `max_def_level` become
/// [`Value::Null`] and consume no value bytes.
pub(crate) fn decode_plain_values(
    cursor: &mut ByteCursor<'_>,
    physical_type: Type,
    def_levels: &[i16],
    max_def_level: i16,
) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(def_levels.len());
    if physical_type == Type::BOOLEAN {
        // booleans pack the non-null values as single bits, LSB first
        let mut bit_idx = 0usize;
        let mut current_byte = 0u8;
        for &level in def_levels {
            if level < max_def_level {
                values.push(Value::Null);
            } else {
                if bit_idx % 8 == 0 {
                    current_byte = cursor.read_u8()?;
                }
                values.push(Value::Boolean((current_byte >> (bit_idx % 8)) & 1 == 1));
                bit_idx += 1;
            }
        }
    } else {
        for &level in def_levels {
            if level < max_def_level {
                values.push(Value::Null);
            } else {
                values.push(read_plain_value(cursor, physical_type)?);
            }
        }
    }
    Ok(values)
}

/// PLAIN-encode the non-null values of a page slice, appending to `out`.
pub(crate) fn encode_plain_values(
    values: &[Value],
    physical_type: Type,
    out: &mut Vec<u8>,
) -> Result<()> {
    if physical_type == Type::BOOLEAN {
        let mut bit_idx = 0usize;
        let mut current_byte = 0u8;
        for value in values {
            match value {
                Value::Null => {}
                Value::Boolean(v) => {
                    if *v {
                        current_byte |= 1 << (bit_idx % 8);
                    }
                    bit_idx += 1;
                    if bit_idx % 8 == 0 {
                        out.push(current_byte);
                        current_byte = 0;
                    }
                }
                other => {
                    return Err(type_mismatch_err!(
                        "cannot PLAIN encode {:?} as BOOLEAN",
                        other
                    ))
                }
            }
        }
        if bit_idx % 8 != 0 {
            out.push(current_byte);
        }
        return Ok(());
    }

    for value in values {
        match (value, physical_type) {
            (Value::Null, _) => {}
            (Value::Int32(v), Type::INT32) => out.extend_from_slice(&v.to_le_bytes()),
            (Value::Int64(v), Type::INT64) => out.extend_from_slice(&v.to_le_bytes()),
            (Value::Float(v), Type::FLOAT) => out.extend_from_slice(&v.to_le_bytes()),
            (Value::Double(v), Type::DOUBLE) => out.extend_from_slice(&v.to_le_bytes()),
            (Value::Bytes(v), Type::BYTE_ARRAY) => {
                out.extend_from_slice(&(v.len() as u32).to_le_bytes());
                out.extend_from_slice(v);
            }
            (value, _) => {
                return Err(type_mismatch_err!(
                    "cannot PLAIN encode {:?} as {}",
                    value,
                    physical_type
                ))
            }
        }
    }
    Ok(())
}

/// Estimated serialized size of one value, used for page splitting. Nulls
/// cost nothing.
pub(crate) fn plain_encoded_size(value: &Value) -> usize {
    match value {
        Value::Null => 0,
        Value::Boolean(_) => 1,
        Value::Int32(_) | Value::Float(_) => 4,
        Value::Int64(_) | Value::Double(_) => 8,
        Value::Bytes(v) => 4 + v.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_roundtrip() {
        let values = vec![
            Value::Int32(1),
            Value::Null,
            Value::Int32(-7),
            Value::Int32(i32::MAX),
        ];
        let def_levels = [1i16, 0, 1, 1];
        let mut out = Vec::new();
        encode_plain_values(&values, Type::INT32, &mut out).unwrap();
        assert_eq!(out.len(), 12);
        let mut cursor = ByteCursor::new(&out);
        let decoded = decode_plain_values(&mut cursor, Type::INT32, &def_levels, 1).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_byte_array_roundtrip() {
        let values = vec![Value::from("a"), Value::Null, Value::from("bb")];
        let def_levels = [1i16, 0, 1];
        let mut out = Vec::new();
        encode_plain_values(&values, Type::BYTE_ARRAY, &mut out).unwrap();
        let mut cursor = ByteCursor::new(&out);
        let decoded = decode_plain_values(&mut cursor, Type::BYTE_ARRAY, &def_levels, 1).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_boolean_bit_packing() {
        let values: Vec<Value> = [true, false, true, true, false, true, false, false, true]
            .iter()
            .map(|&b| Value::Boolean(b))
            .collect();
        let def_levels = vec![0i16; values.len()];
        let mut out = Vec::new();
        encode_plain_values(&values, Type::BOOLEAN, &mut out).unwrap();
        // nine bits span two bytes
        assert_eq!(out, vec![0b0010_1101, 0b0000_0001]);
        let mut cursor = ByteCursor::new(&out);
        let decoded = decode_plain_values(&mut cursor, Type::BOOLEAN, &def_levels, 0).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_boolean_bit_packing_skips_nulls() {
        let values = vec![
            Value::Boolean(true),
            Value::Null,
            Value::Boolean(true),
            Value::Boolean(false),
            Value::Null,
            Value::Boolean(true),
        ];
        let def_levels = [1i16, 0, 1, 1, 0, 1];
        let mut out = Vec::new();
        encode_plain_values(&values, Type::BOOLEAN, &mut out).unwrap();
        // four non-null bits: 1, 1, 0, 1
        assert_eq!(out, vec![0b0000_1011]);
        let mut cursor = ByteCursor::new(&out);
        let decoded = decode_plain_values(&mut cursor, Type::BOOLEAN, &def_levels, 1).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_int96_read() {
        let raw = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let mut cursor = ByteCursor::new(&raw);
        let value = read_plain_value(&mut cursor, Type::INT96).unwrap();
        assert_eq!(value.as_bytes().unwrap(), &raw);
    }

    #[test]
    fn test_fixed_len_byte_array_unsupported() {
        let mut cursor = ByteCursor::new(&[0u8; 16]);
        let err = read_plain_value(&mut cursor, Type::FIXED_LEN_BYTE_ARRAY).unwrap_err();
        assert!(matches!(err, ParquetError::Unsupported(_)), "{err}");
    }

    #[test]
    fn test_type_mismatch() {
        let mut out = Vec::new();
        let err = encode_plain_values(&[Value::Int64(1)], Type::INT32, &mut out).unwrap_err();
        assert!(matches!(err, ParquetError::TypeMismatch(_)), "{err}");
    }

    #[test]
    fn test_truncated_byte_array() {
        // length prefix says 10 bytes but only 2 follow
        let mut data = 10u32.to_le_bytes().to_vec();
        data.extend_from_slice(b"ab");
        let mut cursor = ByteCursor::new(&data);
        let err = read_plain_value(&mut cursor, Type::BYTE_ARRAY).unwrap_err();
        assert!(matches!(err, ParquetError::Truncated(_)), "{err}");
    }

    #[test]
    fn test_estimated_sizes() {
        assert_eq!(plain_encoded_size(&Value::Null), 0);
        assert_eq!(plain_encoded_size(&Value::Boolean(true)), 1);
        assert_eq!(plain_encoded_size(&Value::Int32(0)), 4);
        assert_eq!(plain_encoded_size(&Value::Double(0.0)), 8);
        assert_eq!(plain_encoded_size(&Value::from("abc")), 7);
    }
}
