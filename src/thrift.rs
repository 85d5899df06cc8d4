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

//! Reader and writer for the Thrift [compact protocol] subset used by the
//! Parquet footer and page headers.
//!
//! * [`ThriftSliceInputProtocol`]: decoder over a slice of bytes.
//! * [`ReadThrift`]: trait implemented by deserializable objects.
//! * [`ThriftCompactOutputProtocol`]: encoder over a [`Write`].
//! * [`WriteThrift`] / [`WriteThriftField`]: traits implemented by
//!   serializable objects and struct fields.
//!
//! [compact protocol]: https://github.com/apache/thrift/blob/master/doc/specs/thrift-compact-protocol.md

use std::io::Write;

use crate::errors::{ParquetError, Result};
use crate::util::cursor::ByteCursor;

/// Maximum nesting depth accepted when skipping unknown fields.
const MAX_SKIP_DEPTH: i8 = 64;

/// Compact protocol types for struct fields.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldType {
    Stop = 0,
    BooleanTrue = 1,
    BooleanFalse = 2,
    Byte = 3,
    I16 = 4,
    I32 = 5,
    I64 = 6,
    Double = 7,
    Binary = 8,
    List = 9,
    Set = 10,
    Map = 11,
    Struct = 12,
}

impl TryFrom<u8> for FieldType {
    type Error = ParquetError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Stop),
            1 => Ok(Self::BooleanTrue),
            2 => Ok(Self::BooleanFalse),
            3 => Ok(Self::Byte),
            4 => Ok(Self::I16),
            5 => Ok(Self::I32),
            6 => Ok(Self::I64),
            7 => Ok(Self::Double),
            8 => Ok(Self::Binary),
            9 => Ok(Self::List),
            10 => Ok(Self::Set),
            11 => Ok(Self::Map),
            12 => Ok(Self::Struct),
            _ => Err(malformed_err!("unexpected struct field type {}", value)),
        }
    }
}

/// Compact protocol types for list elements.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ElementType {
    Bool = 2,
    Byte = 3,
    I16 = 4,
    I32 = 5,
    I64 = 6,
    Double = 7,
    Binary = 8,
    List = 9,
    Set = 10,
    Map = 11,
    Struct = 12,
}

impl TryFrom<u8> for ElementType {
    type Error = ParquetError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            // The original compact spec used 2 for bools inside collections,
            // but a widespread implementation bug made 1 a de-facto standard.
            // Accept both.
            1 | 2 => Ok(Self::Bool),
            3 => Ok(Self::Byte),
            4 => Ok(Self::I16),
            5 => Ok(Self::I32),
            6 => Ok(Self::I64),
            7 => Ok(Self::Double),
            8 => Ok(Self::Binary),
            9 => Ok(Self::List),
            10 => Ok(Self::Set),
            11 => Ok(Self::Map),
            12 => Ok(Self::Struct),
            _ => Err(malformed_err!("unexpected list element type {}", value)),
        }
    }
}

impl TryFrom<ElementType> for FieldType {
    type Error = ParquetError;
    fn try_from(value: ElementType) -> Result<Self> {
        match value {
            ElementType::Bool => Ok(Self::BooleanTrue),
            ElementType::Byte => Ok(Self::Byte),
            ElementType::I16 => Ok(Self::I16),
            ElementType::I32 => Ok(Self::I32),
            ElementType::I64 => Ok(Self::I64),
            ElementType::Double => Ok(Self::Double),
            ElementType::Binary => Ok(Self::Binary),
            ElementType::List => Ok(Self::List),
            ElementType::Set => Ok(Self::Set),
            ElementType::Map => Ok(Self::Map),
            ElementType::Struct => Ok(Self::Struct),
        }
    }
}

/// Describes one field of a struct during decoding.
pub struct FieldIdentifier {
    /// The type nibble of the field.
    pub field_type: FieldType,
    /// The field id, either computed from the delta nibble or decoded in
    /// full.
    pub id: i16,
    /// Boolean fields carry their value in the type nibble rather than in the
    /// field data.
    pub bool_val: Option<bool>,
}

/// Describes a list header during decoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ListIdentifier {
    /// The type of each element in the list.
    pub element_type: ElementType,
    /// Number of elements in the list.
    pub size: usize,
}

/// Compact protocol decoder over a byte slice.
///
/// Struct nesting is handled by the caller: each struct-reading loop owns a
/// `last_field_id` local that starts at zero, which is what the protocol's
/// per-struct field-id state amounts to.
pub struct ThriftSliceInputProtocol<'a> {
    cursor: ByteCursor<'a>,
}

impl<'a> ThriftSliceInputProtocol<'a> {
    /// Create a new protocol reader over `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(buf),
        }
    }

    /// Number of bytes consumed so far. Used by the page-index builder to
    /// learn the serialized length of a page header.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        self.cursor.read_u8()
    }

    /// Read a length-prefixed binary value as a borrowed slice.
    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.cursor.read_vlq()? as usize;
        self.cursor.read_bytes(len)
    }

    /// Read a length-prefixed binary value as a UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        Ok(String::from_utf8(self.read_bytes()?.to_vec())?)
    }

    /// Read an `i8`.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_byte()? as i8)
    }

    /// Read a zig-zag encoded `i16`.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.cursor.read_zig_zag()? as i16)
    }

    /// Read a zig-zag encoded `i32`.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.cursor.read_zig_zag()? as i32)
    }

    /// Read a zig-zag encoded `i64`.
    pub fn read_i64(&mut self) -> Result<i64> {
        self.cursor.read_zig_zag()
    }

    /// Read a `double` as 8 raw little-endian bytes.
    pub fn read_double(&mut self) -> Result<f64> {
        self.cursor.read_f64()
    }

    /// Read a boolean list element. Struct-field booleans live in the field
    /// header instead, see [`FieldIdentifier::bool_val`].
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_byte()? {
            0x01 => Ok(true),
            0x00 | 0x02 => Ok(false),
            b => Err(malformed_err!("cannot convert {} into bool", b)),
        }
    }

    /// Read the header of the next struct field. A zero byte signals the end
    /// of the struct with type [`FieldType::Stop`].
    pub fn read_field_begin(&mut self, last_field_id: i16) -> Result<FieldIdentifier> {
        let byte = self.read_byte()?;
        if byte == 0 {
            return Ok(FieldIdentifier {
                field_type: FieldType::Stop,
                id: 0,
                bool_val: None,
            });
        }
        let field_delta = (byte & 0xf0) >> 4;
        let field_type = FieldType::try_from(byte & 0x0f)?;
        let bool_val = match field_type {
            FieldType::BooleanTrue => Some(true),
            FieldType::BooleanFalse => Some(false),
            _ => None,
        };
        let id = if field_delta != 0 {
            last_field_id
                .checked_add(field_delta as i16)
                .ok_or_else(|| {
                    malformed_err!("field id delta {} overflows {}", field_delta, last_field_id)
                })?
        } else {
            self.read_i16()?
        };
        Ok(FieldIdentifier {
            field_type,
            id,
            bool_val,
        })
    }

    /// Read a list header: a 4-bit size nibble and 4-bit element type, the
    /// full count following as a varint when the nibble is 15.
    pub fn read_list_begin(&mut self) -> Result<ListIdentifier> {
        let header = self.read_byte()?;
        // some writers emit an element type of 0 for an empty list
        if header == 0 {
            return Ok(ListIdentifier {
                element_type: ElementType::Byte,
                size: 0,
            });
        }
        let element_type = ElementType::try_from(header & 0x0f)?;
        let size_nibble = (header & 0xf0) >> 4;
        let size = if size_nibble != 15 {
            size_nibble as usize
        } else {
            self.cursor.read_vlq()? as usize
        };
        Ok(ListIdentifier { element_type, size })
    }

    /// Skip one value of the given type, recursing into structs, lists, sets
    /// and maps up to [`MAX_SKIP_DEPTH`] levels.
    pub fn skip(&mut self, field_type: FieldType) -> Result<()> {
        self.skip_till_depth(field_type, MAX_SKIP_DEPTH)
    }

    fn skip_vlq(&mut self) -> Result<()> {
        self.cursor.read_vlq()?;
        Ok(())
    }

    fn skip_till_depth(&mut self, field_type: FieldType, depth: i8) -> Result<()> {
        if depth == 0 {
            return Err(malformed_err!(
                "cannot skip past nesting depth {}",
                MAX_SKIP_DEPTH
            ));
        }
        match field_type {
            // boolean fields carry no data
            FieldType::BooleanTrue | FieldType::BooleanFalse => Ok(()),
            FieldType::Byte => self.read_i8().map(|_| ()),
            FieldType::I16 | FieldType::I32 | FieldType::I64 => self.skip_vlq(),
            FieldType::Double => self.cursor.read_bytes(8).map(|_| ()),
            FieldType::Binary => self.read_bytes().map(|_| ()),
            FieldType::Struct => {
                let mut last_field_id = 0i16;
                loop {
                    let field_ident = self.read_field_begin(last_field_id)?;
                    if field_ident.field_type == FieldType::Stop {
                        return Ok(());
                    }
                    self.skip_till_depth(field_ident.field_type, depth - 1)?;
                    last_field_id = field_ident.id;
                }
            }
            FieldType::List | FieldType::Set => {
                let list_ident = self.read_list_begin()?;
                let element_type = FieldType::try_from(list_ident.element_type)?;
                for _ in 0..list_ident.size {
                    self.skip_till_depth(element_type, depth - 1)?;
                }
                Ok(())
            }
            FieldType::Map => {
                let size = self.cursor.read_vlq()? as usize;
                if size > 0 {
                    let kv_byte = self.read_byte()?;
                    let key_type = FieldType::try_from((kv_byte & 0xf0) >> 4)?;
                    let val_type = FieldType::try_from(kv_byte & 0x0f)?;
                    for _ in 0..size {
                        self.skip_till_depth(key_type, depth - 1)?;
                        self.skip_till_depth(val_type, depth - 1)?;
                    }
                }
                Ok(())
            }
            FieldType::Stop => Err(malformed_err!("cannot skip a stop field")),
        }
    }
}

/// Trait for objects that can be deserialized from a compact protocol slice.
pub trait ReadThrift<'a>: Sized {
    /// Read an object of type `Self` from the protocol reader.
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self>;
}

impl<'a> ReadThrift<'a> for bool {
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
        prot.read_bool()
    }
}

impl<'a> ReadThrift<'a> for i32 {
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
        prot.read_i32()
    }
}

impl<'a> ReadThrift<'a> for i64 {
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
        prot.read_i64()
    }
}

impl<'a> ReadThrift<'a> for String {
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
        prot.read_string()
    }
}

/// Read a compact protocol encoded list.
pub fn read_thrift_vec<'a, T: ReadThrift<'a>>(
    prot: &mut ThriftSliceInputProtocol<'a>,
) -> Result<Vec<T>> {
    let list_ident = prot.read_list_begin()?;
    let mut res = Vec::with_capacity(list_ident.size);
    for _ in 0..list_ident.size {
        res.push(T::read_thrift(prot)?);
    }
    Ok(res)
}

// ----------------------------------------------------------------------
// compact protocol output

/// Compact protocol encoder wrapping a [`Write`].
///
/// Provides the primitive writes plus the field/list/struct framing used by
/// [`WriteThrift`] and [`WriteThriftField`] implementations.
pub struct ThriftCompactOutputProtocol<W: Write> {
    writer: W,
}

impl<W: Write> ThriftCompactOutputProtocol<W> {
    /// Create a new encoder wrapping the byte sink `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_byte(&mut self, b: u8) -> Result<()> {
        self.writer.write_all(&[b])?;
        Ok(())
    }

    /// Write a ULEB128 encoded unsigned varint.
    fn write_vlq(&mut self, val: u64) -> Result<()> {
        let mut v = val;
        while v > 0x7f {
            self.write_byte(v as u8 | 0x80)?;
            v >>= 7;
        }
        self.write_byte(v as u8)
    }

    /// Write a zig-zag encoded signed varint.
    fn write_zig_zag(&mut self, val: i64) -> Result<()> {
        self.write_vlq(((val << 1) ^ (val >> 63)) as u64)
    }

    /// Write the header of a struct field. Field ids must strictly ascend
    /// within a struct; ids within (0, 15] of the previous field are encoded
    /// as a delta nibble, larger jumps as a full zig-zag i16.
    pub fn write_field_begin(
        &mut self,
        field_type: FieldType,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<()> {
        let delta = field_id.wrapping_sub(last_field_id);
        if delta <= 0 {
            return Err(malformed_err!(
                "field id {} does not ascend from {}",
                field_id,
                last_field_id
            ));
        }
        if delta <= 0xf {
            self.write_byte((delta as u8) << 4 | field_type as u8)
        } else {
            self.write_byte(field_type as u8)?;
            self.write_i16(field_id)
        }
    }

    /// Write a list header for `len` elements of `element_type`.
    pub fn write_list_begin(&mut self, element_type: ElementType, len: usize) -> Result<()> {
        if len < 15 {
            self.write_byte((len as u8) << 4 | element_type as u8)
        } else {
            self.write_byte(0xf0 | element_type as u8)?;
            self.write_vlq(len as u64)
        }
    }

    /// Mark the end of a struct. Must be called after all fields have been
    /// written.
    pub fn write_struct_end(&mut self) -> Result<()> {
        self.write_byte(0)
    }

    /// Write a length-prefixed binary value.
    pub fn write_bytes(&mut self, val: &[u8]) -> Result<()> {
        self.write_vlq(val.len() as u64)?;
        self.writer.write_all(val)?;
        Ok(())
    }

    /// Write a boolean list element.
    pub fn write_bool(&mut self, val: bool) -> Result<()> {
        match val {
            true => self.write_byte(1),
            false => self.write_byte(2),
        }
    }

    /// Write a raw byte value.
    pub fn write_i8(&mut self, val: i8) -> Result<()> {
        self.write_byte(val as u8)
    }

    /// Write a zig-zag encoded `i16`.
    pub fn write_i16(&mut self, val: i16) -> Result<()> {
        self.write_zig_zag(val as i64)
    }

    /// Write a zig-zag encoded `i32`.
    pub fn write_i32(&mut self, val: i32) -> Result<()> {
        self.write_zig_zag(val as i64)
    }

    /// Write a zig-zag encoded `i64`.
    pub fn write_i64(&mut self, val: i64) -> Result<()> {
        self.write_zig_zag(val)
    }

    /// Write a `double` as 8 raw little-endian bytes.
    pub fn write_double(&mut self, val: f64) -> Result<()> {
        self.writer.write_all(&val.to_le_bytes())?;
        Ok(())
    }
}

/// Trait for objects serializable to the compact protocol.
pub trait WriteThrift {
    /// The [`ElementType`] used when a list of this object is written.
    const ELEMENT_TYPE: ElementType;

    /// Serialize this object to the given protocol writer.
    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()>;
}

impl<T: WriteThrift> WriteThrift for Vec<T> {
    const ELEMENT_TYPE: ElementType = ElementType::List;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        writer.write_list_begin(T::ELEMENT_TYPE, self.len())?;
        for item in self {
            item.write_thrift(writer)?;
        }
        Ok(())
    }
}

impl WriteThrift for i32 {
    const ELEMENT_TYPE: ElementType = ElementType::I32;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        writer.write_i32(*self)
    }
}

impl WriteThrift for i64 {
    const ELEMENT_TYPE: ElementType = ElementType::I64;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        writer.write_i64(*self)
    }
}

impl WriteThrift for String {
    const ELEMENT_TYPE: ElementType = ElementType::Binary;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        writer.write_bytes(self.as_bytes())
    }
}

impl WriteThrift for &str {
    const ELEMENT_TYPE: ElementType = ElementType::Binary;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        writer.write_bytes(self.as_bytes())
    }
}

/// Trait for objects that are fields of compact protocol structs.
///
/// Implementations write the field header for `field_id` using
/// `last_field_id` for delta encoding, then the field value, and return
/// `field_id` so callers can chain:
///
/// ```ignore
/// let mut last_field_id = 0i16;
/// last_field_id = self.version.write_thrift_field(writer, 1, last_field_id)?;
/// last_field_id = self.schema.write_thrift_field(writer, 2, last_field_id)?;
/// ```
pub trait WriteThriftField {
    /// Write the field header followed by the value, returning `field_id`.
    fn write_thrift_field<W: Write>(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16>;
}

// bool struct fields are written entirely in the field header
impl WriteThriftField for bool {
    fn write_thrift_field<W: Write>(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16> {
        let field_type = match *self {
            true => FieldType::BooleanTrue,
            false => FieldType::BooleanFalse,
        };
        writer.write_field_begin(field_type, field_id, last_field_id)?;
        Ok(field_id)
    }
}

impl WriteThriftField for i32 {
    fn write_thrift_field<W: Write>(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16> {
        writer.write_field_begin(FieldType::I32, field_id, last_field_id)?;
        writer.write_i32(*self)?;
        Ok(field_id)
    }
}

impl WriteThriftField for i64 {
    fn write_thrift_field<W: Write>(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16> {
        writer.write_field_begin(FieldType::I64, field_id, last_field_id)?;
        writer.write_i64(*self)?;
        Ok(field_id)
    }
}

impl WriteThriftField for String {
    fn write_thrift_field<W: Write>(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16> {
        writer.write_field_begin(FieldType::Binary, field_id, last_field_id)?;
        writer.write_bytes(self.as_bytes())?;
        Ok(field_id)
    }
}

impl<T: WriteThrift> WriteThriftField for Vec<T> {
    fn write_thrift_field<W: Write>(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16> {
        writer.write_field_begin(FieldType::List, field_id, last_field_id)?;
        self.write_thrift(writer)?;
        Ok(field_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<F>(f: F) -> Vec<u8>
    where
        F: FnOnce(&mut ThriftCompactOutputProtocol<&mut Vec<u8>>) -> Result<()>,
    {
        let mut buf = Vec::new();
        let mut writer = ThriftCompactOutputProtocol::new(&mut buf);
        f(&mut writer).unwrap();
        buf
    }

    #[test]
    fn test_field_header_delta() {
        // delta-encoded: (delta 1) << 4 | i32 type
        let buf = encode(|w| w.write_field_begin(FieldType::I32, 1, 0));
        assert_eq!(buf, vec![0x15]);

        // delta 15 is still a nibble
        let buf = encode(|w| w.write_field_begin(FieldType::I64, 15, 0));
        assert_eq!(buf, vec![0xf6]);

        // delta 16 needs the full form: type byte then zig-zag id
        let buf = encode(|w| w.write_field_begin(FieldType::I64, 16, 0));
        assert_eq!(buf, vec![0x06, 0x20]);
    }

    #[test]
    fn test_field_header_must_ascend() {
        let mut buf = Vec::new();
        let mut writer = ThriftCompactOutputProtocol::new(&mut buf);
        let err = writer
            .write_field_begin(FieldType::I32, 2, 2)
            .unwrap_err();
        assert!(matches!(err, ParquetError::Malformed(_)), "{err}");
    }

    #[test]
    fn test_reader_accepts_delta_and_full_form() {
        for buf in [vec![0x35u8], vec![0x05, 0x06]] {
            let mut prot = ThriftSliceInputProtocol::new(&buf);
            let ident = prot.read_field_begin(0).unwrap();
            assert_eq!(ident.field_type, FieldType::I32);
            assert_eq!(ident.id, 3);
        }
    }

    #[test]
    fn test_bool_field_in_header() {
        let buf = encode(|w| {
            let last = true.write_thrift_field(w, 3, 0)?;
            false.write_thrift_field(w, 4, last)?;
            w.write_struct_end()
        });
        let mut prot = ThriftSliceInputProtocol::new(&buf);
        let ident = prot.read_field_begin(0).unwrap();
        assert_eq!(ident.id, 3);
        assert_eq!(ident.bool_val, Some(true));
        let ident = prot.read_field_begin(ident.id).unwrap();
        assert_eq!(ident.id, 4);
        assert_eq!(ident.bool_val, Some(false));
        let ident = prot.read_field_begin(ident.id).unwrap();
        assert_eq!(ident.field_type, FieldType::Stop);
    }

    #[test]
    fn test_list_roundtrip_short_and_long() {
        for len in [0usize, 3, 14, 15, 300] {
            let vals: Vec<i32> = (0..len as i32).collect();
            let buf = encode(|w| vals.write_thrift(w));
            let mut prot = ThriftSliceInputProtocol::new(&buf);
            let read: Vec<i32> = read_thrift_vec(&mut prot).unwrap();
            assert_eq!(read, vals);
        }
    }

    #[test]
    fn test_decode_empty_list_header() {
        let data = [0u8];
        let mut prot = ThriftSliceInputProtocol::new(&data);
        let header = prot.read_list_begin().unwrap();
        assert_eq!(header.size, 0);
        assert_eq!(header.element_type, ElementType::Byte);
    }

    #[test]
    fn test_skip_struct_with_nested_fields() {
        // struct { 1: i32 = 5; 2: binary "ab"; 3: struct { 1: i64 = -1 } }
        let buf = encode(|w| {
            let mut last = 5i32.write_thrift_field(w, 1, 0)?;
            last = "ab".to_string().write_thrift_field(w, 2, last)?;
            w.write_field_begin(FieldType::Struct, 3, last)?;
            (-1i64).write_thrift_field(w, 1, 0)?;
            w.write_struct_end()?;
            w.write_struct_end()
        });
        let mut prot = ThriftSliceInputProtocol::new(&buf);
        prot.skip(FieldType::Struct).unwrap();
        assert_eq!(prot.position(), buf.len());
    }

    #[test]
    fn test_skip_depth_limit() {
        // deeply nested structs: each level is field 1 of type struct
        let mut buf = Vec::new();
        for _ in 0..100 {
            buf.push(0x1c); // delta 1, struct
        }
        buf.extend(std::iter::repeat(0u8).take(100));
        let mut prot = ThriftSliceInputProtocol::new(&buf);
        let err = prot.skip(FieldType::Struct).unwrap_err();
        assert!(matches!(err, ParquetError::Malformed(_)), "{err}");
    }

    #[test]
    fn test_zig_zag_i64_roundtrip() {
        for val in [0i64, 1, -1, i64::MIN, i64::MAX, 12345, -12345] {
            let buf = encode(|w| w.write_i64(val));
            let mut prot = ThriftSliceInputProtocol::new(&buf);
            assert_eq!(prot.read_i64().unwrap(), val);
        }
    }
}
