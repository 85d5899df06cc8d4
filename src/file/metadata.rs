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

//! Typed records for the Parquet footer and page headers, with field-id
//! driven compact protocol deserialization and, for everything the writer
//! emits, serialization.
//!
//! Field ids follow the Parquet Thrift definition. Unknown fields are
//! skipped so files written by newer implementations still parse.

use std::io::Write;

use crate::basic::{Compression, ConvertedType, Encoding, PageType, Repetition, Type};
use crate::errors::{ParquetError, Result};
use crate::thrift::{
    read_thrift_vec, ElementType, FieldType, ReadThrift, ThriftCompactOutputProtocol,
    ThriftSliceInputProtocol, WriteThrift, WriteThriftField,
};

/// One element of the flat depth-first schema list.
///
/// The root element carries only a name and child count; leaves carry a
/// physical type and no children.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaElement {
    pub physical_type: Option<Type>,
    pub type_length: Option<i32>,
    pub repetition_type: Option<Repetition>,
    pub name: String,
    pub num_children: Option<i32>,
    pub converted_type: Option<ConvertedType>,
    pub scale: Option<i32>,
    pub precision: Option<i32>,
    pub field_id: Option<i32>,
}

impl<'a> ReadThrift<'a> for SchemaElement {
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
        let mut element = SchemaElement::default();
        let mut has_name = false;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => element.physical_type = Some(Type::read_thrift(prot)?),
                2 => element.type_length = Some(prot.read_i32()?),
                3 => element.repetition_type = Some(Repetition::read_thrift(prot)?),
                4 => {
                    element.name = prot.read_string()?;
                    has_name = true;
                }
                5 => element.num_children = Some(prot.read_i32()?),
                6 => element.converted_type = Some(ConvertedType::read_thrift(prot)?),
                7 => element.scale = Some(prot.read_i32()?),
                8 => element.precision = Some(prot.read_i32()?),
                9 => element.field_id = Some(prot.read_i32()?),
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        if !has_name {
            return Err(malformed_err!("required field name is missing"));
        }
        Ok(element)
    }
}

impl WriteThrift for SchemaElement {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last_field_id = 0i16;
        if let Some(physical_type) = &self.physical_type {
            last_field_id = physical_type.write_thrift_field(writer, 1, last_field_id)?;
        }
        if let Some(type_length) = &self.type_length {
            last_field_id = type_length.write_thrift_field(writer, 2, last_field_id)?;
        }
        if let Some(repetition_type) = &self.repetition_type {
            last_field_id = repetition_type.write_thrift_field(writer, 3, last_field_id)?;
        }
        last_field_id = self.name.write_thrift_field(writer, 4, last_field_id)?;
        if let Some(num_children) = &self.num_children {
            last_field_id = num_children.write_thrift_field(writer, 5, last_field_id)?;
        }
        if let Some(converted_type) = &self.converted_type {
            last_field_id = converted_type.write_thrift_field(writer, 6, last_field_id)?;
        }
        if let Some(scale) = &self.scale {
            last_field_id = scale.write_thrift_field(writer, 7, last_field_id)?;
        }
        if let Some(precision) = &self.precision {
            last_field_id = precision.write_thrift_field(writer, 8, last_field_id)?;
        }
        if let Some(field_id) = &self.field_id {
            field_id.write_thrift_field(writer, 9, last_field_id)?;
        }
        writer.write_struct_end()
    }
}

/// Metadata of one column chunk, embedded in [`ColumnChunk`].
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnMetaData {
    pub physical_type: Type,
    pub encodings: Vec<Encoding>,
    pub path_in_schema: Vec<String>,
    pub codec: Compression,
    pub num_values: i64,
    pub total_uncompressed_size: i64,
    pub total_compressed_size: i64,
    pub data_page_offset: i64,
    pub index_page_offset: Option<i64>,
    pub dictionary_page_offset: Option<i64>,
}

impl<'a> ReadThrift<'a> for ColumnMetaData {
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
        let mut physical_type: Option<Type> = None;
        let mut encodings: Option<Vec<Encoding>> = None;
        let mut path_in_schema: Option<Vec<String>> = None;
        let mut codec: Option<Compression> = None;
        let mut num_values: Option<i64> = None;
        let mut total_uncompressed_size: Option<i64> = None;
        let mut total_compressed_size: Option<i64> = None;
        let mut data_page_offset: Option<i64> = None;
        let mut index_page_offset: Option<i64> = None;
        let mut dictionary_page_offset: Option<i64> = None;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => physical_type = Some(Type::read_thrift(prot)?),
                2 => encodings = Some(read_thrift_vec(prot)?),
                3 => path_in_schema = Some(read_thrift_vec(prot)?),
                4 => codec = Some(Compression::read_thrift(prot)?),
                5 => num_values = Some(prot.read_i64()?),
                6 => total_uncompressed_size = Some(prot.read_i64()?),
                7 => total_compressed_size = Some(prot.read_i64()?),
                9 => data_page_offset = Some(prot.read_i64()?),
                10 => index_page_offset = Some(prot.read_i64()?),
                11 => dictionary_page_offset = Some(prot.read_i64()?),
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        let Some(physical_type) = physical_type else {
            return Err(malformed_err!("required field type is missing"));
        };
        let Some(codec) = codec else {
            return Err(malformed_err!("required field codec is missing"));
        };
        let Some(num_values) = num_values else {
            return Err(malformed_err!("required field num_values is missing"));
        };
        let Some(data_page_offset) = data_page_offset else {
            return Err(malformed_err!("required field data_page_offset is missing"));
        };
        Ok(ColumnMetaData {
            physical_type,
            encodings: encodings.unwrap_or_default(),
            path_in_schema: path_in_schema.unwrap_or_default(),
            codec,
            num_values,
            total_uncompressed_size: total_uncompressed_size.unwrap_or(0),
            total_compressed_size: total_compressed_size.unwrap_or(0),
            data_page_offset,
            index_page_offset,
            dictionary_page_offset,
        })
    }
}

impl WriteThrift for ColumnMetaData {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last_field_id = self.physical_type.write_thrift_field(writer, 1, 0)?;
        last_field_id = self.encodings.write_thrift_field(writer, 2, last_field_id)?;
        last_field_id = self
            .path_in_schema
            .write_thrift_field(writer, 3, last_field_id)?;
        last_field_id = self.codec.write_thrift_field(writer, 4, last_field_id)?;
        last_field_id = self.num_values.write_thrift_field(writer, 5, last_field_id)?;
        last_field_id = self
            .total_uncompressed_size
            .write_thrift_field(writer, 6, last_field_id)?;
        last_field_id = self
            .total_compressed_size
            .write_thrift_field(writer, 7, last_field_id)?;
        last_field_id = self
            .data_page_offset
            .write_thrift_field(writer, 9, last_field_id)?;
        if let Some(index_page_offset) = &self.index_page_offset {
            last_field_id = index_page_offset.write_thrift_field(writer, 10, last_field_id)?;
        }
        if let Some(dictionary_page_offset) = &self.dictionary_page_offset {
            dictionary_page_offset.write_thrift_field(writer, 11, last_field_id)?;
        }
        writer.write_struct_end()
    }
}

/// One column chunk of a row group.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnChunk {
    /// External chunk files are out of scope; this must be absent or empty.
    pub file_path: Option<String>,
    pub file_offset: i64,
    pub meta_data: Option<ColumnMetaData>,
}

impl<'a> ReadThrift<'a> for ColumnChunk {
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
        let mut file_path: Option<String> = None;
        let mut file_offset: Option<i64> = None;
        let mut meta_data: Option<ColumnMetaData> = None;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => file_path = Some(prot.read_string()?),
                2 => file_offset = Some(prot.read_i64()?),
                3 => meta_data = Some(ColumnMetaData::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        let Some(file_offset) = file_offset else {
            return Err(malformed_err!("required field file_offset is missing"));
        };
        Ok(ColumnChunk {
            file_path,
            file_offset,
            meta_data,
        })
    }
}

impl WriteThrift for ColumnChunk {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last_field_id = 0i16;
        if let Some(file_path) = &self.file_path {
            last_field_id = file_path.write_thrift_field(writer, 1, last_field_id)?;
        }
        last_field_id = self.file_offset.write_thrift_field(writer, 2, last_field_id)?;
        if let Some(meta_data) = &self.meta_data {
            writer.write_field_begin(FieldType::Struct, 3, last_field_id)?;
            meta_data.write_thrift(writer)?;
        }
        writer.write_struct_end()
    }
}

/// A horizontal slice of rows: one column chunk per leaf column.
#[derive(Clone, Debug, PartialEq)]
pub struct RowGroup {
    pub columns: Vec<ColumnChunk>,
    pub total_byte_size: i64,
    pub num_rows: i64,
}

impl<'a> ReadThrift<'a> for RowGroup {
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
        let mut columns: Option<Vec<ColumnChunk>> = None;
        let mut total_byte_size: Option<i64> = None;
        let mut num_rows: Option<i64> = None;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => columns = Some(read_thrift_vec(prot)?),
                2 => total_byte_size = Some(prot.read_i64()?),
                3 => num_rows = Some(prot.read_i64()?),
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        let Some(columns) = columns else {
            return Err(malformed_err!("required field columns is missing"));
        };
        let Some(total_byte_size) = total_byte_size else {
            return Err(malformed_err!("required field total_byte_size is missing"));
        };
        let Some(num_rows) = num_rows else {
            return Err(malformed_err!("required field num_rows is missing"));
        };
        Ok(RowGroup {
            columns,
            total_byte_size,
            num_rows,
        })
    }
}

impl WriteThrift for RowGroup {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last_field_id = self.columns.write_thrift_field(writer, 1, 0)?;
        last_field_id = self
            .total_byte_size
            .write_thrift_field(writer, 2, last_field_id)?;
        self.num_rows.write_thrift_field(writer, 3, last_field_id)?;
        writer.write_struct_end()
    }
}

/// Arbitrary key/value metadata carried in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: Option<String>,
}

impl<'a> ReadThrift<'a> for KeyValue {
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
        let mut key: Option<String> = None;
        let mut value: Option<String> = None;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => key = Some(prot.read_string()?),
                2 => value = Some(prot.read_string()?),
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        let Some(key) = key else {
            return Err(malformed_err!("required field key is missing"));
        };
        Ok(KeyValue { key, value })
    }
}

impl WriteThrift for KeyValue {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let last_field_id = self.key.write_thrift_field(writer, 1, 0)?;
        if let Some(value) = &self.value {
            value.write_thrift_field(writer, 2, last_field_id)?;
        }
        writer.write_struct_end()
    }
}

/// The file footer.
#[derive(Clone, Debug, PartialEq)]
pub struct FileMetaData {
    pub version: i32,
    pub schema: Vec<SchemaElement>,
    pub num_rows: i64,
    pub row_groups: Vec<RowGroup>,
    pub key_value_metadata: Option<Vec<KeyValue>>,
    pub created_by: Option<String>,
}

impl<'a> ReadThrift<'a> for FileMetaData {
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
        let mut version: Option<i32> = None;
        let mut schema: Option<Vec<SchemaElement>> = None;
        let mut num_rows: Option<i64> = None;
        let mut row_groups: Option<Vec<RowGroup>> = None;
        let mut key_value_metadata: Option<Vec<KeyValue>> = None;
        let mut created_by: Option<String> = None;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => version = Some(prot.read_i32()?),
                2 => schema = Some(read_thrift_vec(prot)?),
                3 => num_rows = Some(prot.read_i64()?),
                4 => row_groups = Some(read_thrift_vec(prot)?),
                5 => key_value_metadata = Some(read_thrift_vec(prot)?),
                6 => created_by = Some(prot.read_string()?),
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        let Some(version) = version else {
            return Err(malformed_err!("required field version is missing"));
        };
        let Some(schema) = schema else {
            return Err(malformed_err!("required field schema is missing"));
        };
        let Some(num_rows) = num_rows else {
            return Err(malformed_err!("required field num_rows is missing"));
        };
        let Some(row_groups) = row_groups else {
            return Err(malformed_err!("required field row_groups is missing"));
        };
        Ok(FileMetaData {
            version,
            schema,
            num_rows,
            row_groups,
            key_value_metadata,
            created_by,
        })
    }
}

impl WriteThrift for FileMetaData {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last_field_id = self.version.write_thrift_field(writer, 1, 0)?;
        last_field_id = self.schema.write_thrift_field(writer, 2, last_field_id)?;
        last_field_id = self.num_rows.write_thrift_field(writer, 3, last_field_id)?;
        last_field_id = self.row_groups.write_thrift_field(writer, 4, last_field_id)?;
        if let Some(key_value_metadata) = &self.key_value_metadata {
            last_field_id = key_value_metadata.write_thrift_field(writer, 5, last_field_id)?;
        }
        if let Some(created_by) = &self.created_by {
            created_by.write_thrift_field(writer, 6, last_field_id)?;
        }
        writer.write_struct_end()
    }
}

/// Header of a data page.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPageHeader {
    pub num_values: i32,
    pub encoding: Encoding,
    pub definition_level_encoding: Encoding,
    pub repetition_level_encoding: Encoding,
}

impl<'a> ReadThrift<'a> for DataPageHeader {
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
        let mut num_values: Option<i32> = None;
        let mut encoding: Option<Encoding> = None;
        let mut definition_level_encoding: Option<Encoding> = None;
        let mut repetition_level_encoding: Option<Encoding> = None;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => num_values = Some(prot.read_i32()?),
                2 => encoding = Some(Encoding::read_thrift(prot)?),
                3 => definition_level_encoding = Some(Encoding::read_thrift(prot)?),
                4 => repetition_level_encoding = Some(Encoding::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        let Some(num_values) = num_values else {
            return Err(malformed_err!("required field num_values is missing"));
        };
        let Some(encoding) = encoding else {
            return Err(malformed_err!("required field encoding is missing"));
        };
        let Some(definition_level_encoding) = definition_level_encoding else {
            return Err(malformed_err!(
                "required field definition_level_encoding is missing"
            ));
        };
        let Some(repetition_level_encoding) = repetition_level_encoding else {
            return Err(malformed_err!(
                "required field repetition_level_encoding is missing"
            ));
        };
        Ok(DataPageHeader {
            num_values,
            encoding,
            definition_level_encoding,
            repetition_level_encoding,
        })
    }
}

impl WriteThrift for DataPageHeader {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last_field_id = self.num_values.write_thrift_field(writer, 1, 0)?;
        last_field_id = self.encoding.write_thrift_field(writer, 2, last_field_id)?;
        last_field_id = self
            .definition_level_encoding
            .write_thrift_field(writer, 3, last_field_id)?;
        self.repetition_level_encoding
            .write_thrift_field(writer, 4, last_field_id)?;
        writer.write_struct_end()
    }
}

/// Header of a DATA_PAGE_V2 page. Parsed so that the page index can count
/// values and step over these pages; never decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPageHeaderV2 {
    pub num_values: i32,
    pub num_nulls: i32,
    pub num_rows: i32,
    pub encoding: Encoding,
    pub definition_levels_byte_length: i32,
    pub repetition_levels_byte_length: i32,
    pub is_compressed: Option<bool>,
}

impl<'a> ReadThrift<'a> for DataPageHeaderV2 {
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
        let mut num_values: Option<i32> = None;
        let mut num_nulls: Option<i32> = None;
        let mut num_rows: Option<i32> = None;
        let mut encoding: Option<Encoding> = None;
        let mut definition_levels_byte_length: Option<i32> = None;
        let mut repetition_levels_byte_length: Option<i32> = None;
        let mut is_compressed: Option<bool> = None;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => num_values = Some(prot.read_i32()?),
                2 => num_nulls = Some(prot.read_i32()?),
                3 => num_rows = Some(prot.read_i32()?),
                4 => encoding = Some(Encoding::read_thrift(prot)?),
                5 => definition_levels_byte_length = Some(prot.read_i32()?),
                6 => repetition_levels_byte_length = Some(prot.read_i32()?),
                7 => is_compressed = field_ident.bool_val,
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        let Some(num_values) = num_values else {
            return Err(malformed_err!("required field num_values is missing"));
        };
        let Some(num_nulls) = num_nulls else {
            return Err(malformed_err!("required field num_nulls is missing"));
        };
        let Some(num_rows) = num_rows else {
            return Err(malformed_err!("required field num_rows is missing"));
        };
        let Some(encoding) = encoding else {
            return Err(malformed_err!("required field encoding is missing"));
        };
        let Some(definition_levels_byte_length) = definition_levels_byte_length else {
            return Err(malformed_err!(
                "required field definition_levels_byte_length is missing"
            ));
        };
        let Some(repetition_levels_byte_length) = repetition_levels_byte_length else {
            return Err(malformed_err!(
                "required field repetition_levels_byte_length is missing"
            ));
        };
        Ok(DataPageHeaderV2 {
            num_values,
            num_nulls,
            num_rows,
            encoding,
            definition_levels_byte_length,
            repetition_levels_byte_length,
            is_compressed,
        })
    }
}

/// Header of a dictionary page.
#[derive(Clone, Debug, PartialEq)]
pub struct DictionaryPageHeader {
    pub num_values: i32,
    pub encoding: Encoding,
    pub is_sorted: Option<bool>,
}

impl<'a> ReadThrift<'a> for DictionaryPageHeader {
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
        let mut num_values: Option<i32> = None;
        let mut encoding: Option<Encoding> = None;
        let mut is_sorted: Option<bool> = None;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => num_values = Some(prot.read_i32()?),
                2 => encoding = Some(Encoding::read_thrift(prot)?),
                3 => is_sorted = field_ident.bool_val,
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        let Some(num_values) = num_values else {
            return Err(malformed_err!("required field num_values is missing"));
        };
        let Some(encoding) = encoding else {
            return Err(malformed_err!("required field encoding is missing"));
        };
        Ok(DictionaryPageHeader {
            num_values,
            encoding,
            is_sorted,
        })
    }
}

impl WriteThrift for DictionaryPageHeader {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last_field_id = self.num_values.write_thrift_field(writer, 1, 0)?;
        last_field_id = self.encoding.write_thrift_field(writer, 2, last_field_id)?;
        if let Some(is_sorted) = &self.is_sorted {
            is_sorted.write_thrift_field(writer, 3, last_field_id)?;
        }
        writer.write_struct_end()
    }
}

/// Header preceding every page. Exactly one of the page-specific sub-headers
/// is present for the page types this crate consumes.
#[derive(Clone, Debug, PartialEq)]
pub struct PageHeader {
    pub page_type: PageType,
    pub uncompressed_page_size: i32,
    pub compressed_page_size: i32,
    pub crc: Option<i32>,
    pub data_page_header: Option<DataPageHeader>,
    pub dictionary_page_header: Option<DictionaryPageHeader>,
    pub data_page_header_v2: Option<DataPageHeaderV2>,
}

impl<'a> ReadThrift<'a> for PageHeader {
    fn read_thrift(prot: &mut ThriftSliceInputProtocol<'a>) -> Result<Self> {
        let mut page_type: Option<PageType> = None;
        let mut uncompressed_page_size: Option<i32> = None;
        let mut compressed_page_size: Option<i32> = None;
        let mut crc: Option<i32> = None;
        let mut data_page_header: Option<DataPageHeader> = None;
        let mut dictionary_page_header: Option<DictionaryPageHeader> = None;
        let mut data_page_header_v2: Option<DataPageHeaderV2> = None;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => page_type = Some(PageType::read_thrift(prot)?),
                2 => uncompressed_page_size = Some(prot.read_i32()?),
                3 => compressed_page_size = Some(prot.read_i32()?),
                4 => crc = Some(prot.read_i32()?),
                5 => data_page_header = Some(DataPageHeader::read_thrift(prot)?),
                // 6: index_page_header carries nothing this crate uses
                7 => dictionary_page_header = Some(DictionaryPageHeader::read_thrift(prot)?),
                8 => data_page_header_v2 = Some(DataPageHeaderV2::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        let Some(page_type) = page_type else {
            return Err(malformed_err!("required field type is missing"));
        };
        let Some(uncompressed_page_size) = uncompressed_page_size else {
            return Err(malformed_err!(
                "required field uncompressed_page_size is missing"
            ));
        };
        let Some(compressed_page_size) = compressed_page_size else {
            return Err(malformed_err!(
                "required field compressed_page_size is missing"
            ));
        };
        if compressed_page_size < 0 {
            return Err(malformed_err!(
                "negative compressed_page_size {}",
                compressed_page_size
            ));
        }
        Ok(PageHeader {
            page_type,
            uncompressed_page_size,
            compressed_page_size,
            crc,
            data_page_header,
            dictionary_page_header,
            data_page_header_v2,
        })
    }
}

impl WriteThrift for PageHeader {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last_field_id = self.page_type.write_thrift_field(writer, 1, 0)?;
        last_field_id = self
            .uncompressed_page_size
            .write_thrift_field(writer, 2, last_field_id)?;
        last_field_id = self
            .compressed_page_size
            .write_thrift_field(writer, 3, last_field_id)?;
        if let Some(crc) = &self.crc {
            last_field_id = crc.write_thrift_field(writer, 4, last_field_id)?;
        }
        if let Some(data_page_header) = &self.data_page_header {
            writer.write_field_begin(FieldType::Struct, 5, last_field_id)?;
            data_page_header.write_thrift(writer)?;
            last_field_id = 5;
        }
        if let Some(dictionary_page_header) = &self.dictionary_page_header {
            writer.write_field_begin(FieldType::Struct, 7, last_field_id)?;
            dictionary_page_header.write_thrift(writer)?;
        }
        writer.write_struct_end()
    }
}
