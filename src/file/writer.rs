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

//! Writing Parquet files from columnar values.
//!
//! [`SerializedFileWriter`] accepts one row group at a time, each a list of
//! value vectors in column order, and emits pages, column chunks and finally
//! the footer. Columns whose non-null values repeat enough are dictionary
//! encoded; everything else is PLAIN.

use std::io::Write;

use crate::basic::{Compression, Encoding, PageType, Repetition, Type};
use crate::data_type::Value;
use crate::encodings::dict::DictEncoder;
use crate::encodings::plain::{encode_plain_values, plain_encoded_size};
use crate::encodings::rle::{encode_rle_levels, RleEncoder};
use crate::errors::{ParquetError, Result};
use crate::file::metadata::{
    ColumnChunk, ColumnMetaData, DataPageHeader, DictionaryPageHeader, FileMetaData, PageHeader,
    RowGroup, SchemaElement,
};
use crate::file::properties::WriterProperties;
use crate::file::PARQUET_MAGIC;
use crate::thrift::{ThriftCompactOutputProtocol, WriteThrift};
use crate::util::bit_util::bytes_for_bits;

/// A wrapper around a [`Write`] that keeps track of the number of bytes
/// written, so page and chunk offsets can be recorded as they are laid down.
pub struct TrackedWrite<W> {
    inner: W,
    bytes_written: usize,
}

impl<W: Write> TrackedWrite<W> {
    /// Create a new [`TrackedWrite`] from a [`Write`].
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    /// Returns the number of bytes written to this instance.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }
}

impl<W: Write> Write for TrackedWrite<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let bytes = self.inner.write(buf)?;
        self.bytes_written += bytes;
        Ok(bytes)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// Declaration of one column the writer will produce.
#[derive(Clone, Debug)]
pub struct ColumnSpec {
    /// Column name, also its full schema path.
    pub name: String,
    /// Physical type of the column's values.
    pub physical_type: Type,
    /// REQUIRED or OPTIONAL. REPEATED columns are not writable.
    pub repetition: Repetition,
    /// Optional converted-type annotation, echoed into the schema.
    pub converted_type: Option<crate::basic::ConvertedType>,
    /// Decimal scale, echoed into the schema when set.
    pub scale: Option<i32>,
    /// Decimal precision, echoed into the schema when set.
    pub precision: Option<i32>,
}

impl ColumnSpec {
    /// A column with no converted-type annotation.
    pub fn new(name: impl Into<String>, physical_type: Type, repetition: Repetition) -> Self {
        Self {
            name: name.into(),
            physical_type,
            repetition,
            converted_type: None,
            scale: None,
            precision: None,
        }
    }

    /// Attach a converted-type annotation.
    pub fn with_converted_type(mut self, converted_type: crate::basic::ConvertedType) -> Self {
        self.converted_type = Some(converted_type);
        self
    }
}

/// Parquet file writer: magic, row groups, footer.
pub struct SerializedFileWriter<W: Write> {
    buf: TrackedWrite<W>,
    columns: Vec<ColumnSpec>,
    props: WriterProperties,
    row_groups: Vec<RowGroup>,
    total_rows: i64,
}

impl<W: Write> SerializedFileWriter<W> {
    /// Create a writer over `sink` and write the leading magic.
    pub fn new(sink: W, columns: Vec<ColumnSpec>, props: WriterProperties) -> Result<Self> {
        let mut buf = TrackedWrite::new(sink);
        buf.write_all(&PARQUET_MAGIC)?;
        Ok(Self {
            buf,
            columns,
            props,
            row_groups: Vec::new(),
            total_rows: 0,
        })
    }

    /// Number of bytes written to the sink so far.
    pub fn bytes_written(&self) -> usize {
        self.buf.bytes_written()
    }

    /// Append one row group: one value vector per column, in spec order, all
    /// of the same length.
    pub fn write_row_group(&mut self, columns: &[Vec<Value>]) -> Result<()> {
        if columns.len() != self.columns.len() {
            return Err(malformed_err!(
                "row group has {} columns, writer declares {}",
                columns.len(),
                self.columns.len()
            ));
        }
        let num_rows = columns.first().map(|c| c.len()).unwrap_or(0);
        for (spec, values) in self.columns.iter().zip(columns) {
            if values.len() != num_rows {
                return Err(malformed_err!(
                    "column {} has {} values, expected {}",
                    spec.name,
                    values.len(),
                    num_rows
                ));
            }
        }

        let mut chunks = Vec::with_capacity(columns.len());
        let mut total_byte_size = 0i64;
        for col_idx in 0..columns.len() {
            let chunk = self.write_column_chunk(col_idx, &columns[col_idx])?;
            if let Some(meta) = &chunk.meta_data {
                total_byte_size += meta.total_compressed_size;
            }
            chunks.push(chunk);
        }

        self.row_groups.push(RowGroup {
            columns: chunks,
            total_byte_size,
            num_rows: num_rows as i64,
        });
        self.total_rows += num_rows as i64;
        Ok(())
    }

    /// Write the footer, its length and the trailing magic, consuming the
    /// writer. Returns the footer that was written.
    pub fn close(mut self) -> Result<FileMetaData> {
        let metadata = FileMetaData {
            version: 2,
            schema: self.build_schema(),
            num_rows: self.total_rows,
            row_groups: std::mem::take(&mut self.row_groups),
            key_value_metadata: None,
            created_by: Some(self.props.created_by().to_string()),
        };

        let footer_start = self.buf.bytes_written();
        {
            let mut protocol = ThriftCompactOutputProtocol::new(&mut self.buf);
            metadata.write_thrift(&mut protocol)?;
        }
        let footer_len = self.buf.bytes_written() - footer_start;
        self.buf.write_all(&(footer_len as u32).to_le_bytes())?;
        self.buf.write_all(&PARQUET_MAGIC)?;
        self.buf.flush()?;
        Ok(metadata)
    }

    /// The flat schema list: a root named "schema" followed by one element
    /// per column.
    fn build_schema(&self) -> Vec<SchemaElement> {
        let mut schema = Vec::with_capacity(1 + self.columns.len());
        schema.push(SchemaElement {
            name: "schema".to_string(),
            num_children: Some(self.columns.len() as i32),
            ..Default::default()
        });
        for spec in &self.columns {
            schema.push(SchemaElement {
                physical_type: Some(spec.physical_type),
                repetition_type: Some(spec.repetition),
                name: spec.name.clone(),
                converted_type: spec.converted_type,
                scale: spec.scale,
                precision: spec.precision,
                ..Default::default()
            });
        }
        schema
    }

    fn write_column_chunk(&mut self, col_idx: usize, values: &[Value]) -> Result<ColumnChunk> {
        let spec = self.columns[col_idx].clone();
        if matches!(
            spec.physical_type,
            Type::INT96 | Type::FIXED_LEN_BYTE_ARRAY
        ) {
            return Err(unsupported_err!(
                "cannot write {} column {}",
                spec.physical_type,
                spec.name
            ));
        }
        let max_def_level: i16 = match spec.repetition {
            Repetition::REQUIRED => 0,
            Repetition::OPTIONAL => 1,
            Repetition::REPEATED => {
                return Err(unsupported_err!(
                    "cannot write REPEATED column {}",
                    spec.name
                ));
            }
        };
        for value in values {
            if !value.matches_type(spec.physical_type) {
                return Err(type_mismatch_err!(
                    "value {:?} does not match column {} of type {}",
                    value,
                    spec.name,
                    spec.physical_type
                ));
            }
            if value.is_null() && max_def_level == 0 {
                return Err(type_mismatch_err!(
                    "null value in REQUIRED column {}",
                    spec.name
                ));
            }
        }

        let chunk_start = self.buf.bytes_written() as i64;
        // booleans are PLAIN-only: a two-entry dictionary cannot beat one bit
        // per value
        let dictionary = if self.props.dictionary_enabled() && spec.physical_type != Type::BOOLEAN
        {
            DictEncoder::analyze(values)
        } else {
            None
        };

        let (encodings, data_page_offset, dictionary_page_offset) = match &dictionary {
            Some(dictionary) => {
                self.write_dictionary_page(dictionary, spec.physical_type)?;
                let data_page_offset = self.buf.bytes_written() as i64;

                // pages hold a fixed number of indices sized by the index width
                let bytes_per_value = bytes_for_bits(dictionary.bit_width()).max(1);
                let values_per_page = (self.props.max_page_size() / bytes_per_value).max(1);
                for slice in values.chunks(values_per_page) {
                    self.write_dictionary_data_page(slice, dictionary, max_def_level)?;
                }
                (
                    vec![Encoding::PLAIN, Encoding::RLE_DICTIONARY],
                    data_page_offset,
                    Some(chunk_start),
                )
            }
            None => {
                for range in plain_page_boundaries(values, self.props.max_page_size()) {
                    self.write_plain_data_page(
                        &values[range],
                        spec.physical_type,
                        max_def_level,
                    )?;
                }
                (vec![Encoding::PLAIN], chunk_start, None)
            }
        };

        let chunk_size = self.buf.bytes_written() as i64 - chunk_start;
        Ok(ColumnChunk {
            file_path: None,
            file_offset: chunk_start,
            meta_data: Some(ColumnMetaData {
                physical_type: spec.physical_type,
                encodings,
                path_in_schema: vec![spec.name],
                codec: Compression::UNCOMPRESSED,
                num_values: values.len() as i64,
                total_uncompressed_size: chunk_size,
                total_compressed_size: chunk_size,
                data_page_offset,
                index_page_offset: None,
                dictionary_page_offset,
            }),
        })
    }

    fn write_dictionary_page(
        &mut self,
        dictionary: &DictEncoder,
        physical_type: Type,
    ) -> Result<()> {
        let mut payload = Vec::new();
        encode_plain_values(dictionary.values(), physical_type, &mut payload)?;

        let header = PageHeader {
            page_type: PageType::DICTIONARY_PAGE,
            uncompressed_page_size: payload.len() as i32,
            compressed_page_size: payload.len() as i32,
            crc: None,
            data_page_header: None,
            dictionary_page_header: Some(DictionaryPageHeader {
                num_values: dictionary.num_entries() as i32,
                encoding: Encoding::PLAIN_DICTIONARY,
                is_sorted: None,
            }),
            data_page_header_v2: None,
        };
        self.write_page(&header, &payload)
    }

    fn write_plain_data_page(
        &mut self,
        values: &[Value],
        physical_type: Type,
        max_def_level: i16,
    ) -> Result<()> {
        let mut payload = Vec::new();
        encode_def_levels(&mut payload, values, max_def_level);
        encode_plain_values(values, physical_type, &mut payload)?;
        self.write_data_page_header(values.len(), Encoding::PLAIN, &payload)
    }

    fn write_dictionary_data_page(
        &mut self,
        values: &[Value],
        dictionary: &DictEncoder,
        max_def_level: i16,
    ) -> Result<()> {
        let mut payload = Vec::new();
        encode_def_levels(&mut payload, values, max_def_level);

        // one byte of index bit width, then the hybrid-encoded indices
        payload.push(dictionary.bit_width());
        let mut encoder = RleEncoder::new(dictionary.bit_width());
        for value in values {
            if let Some(index) = dictionary.index_of(value) {
                encoder.put(index);
            }
        }
        payload.extend_from_slice(&encoder.consume());

        self.write_data_page_header(values.len(), Encoding::RLE_DICTIONARY, &payload)
    }

    fn write_data_page_header(
        &mut self,
        num_values: usize,
        encoding: Encoding,
        payload: &[u8],
    ) -> Result<()> {
        let header = PageHeader {
            page_type: PageType::DATA_PAGE,
            uncompressed_page_size: payload.len() as i32,
            compressed_page_size: payload.len() as i32,
            crc: None,
            data_page_header: Some(DataPageHeader {
                num_values: num_values as i32,
                encoding,
                definition_level_encoding: Encoding::RLE,
                repetition_level_encoding: Encoding::RLE,
            }),
            dictionary_page_header: None,
            data_page_header_v2: None,
        };
        self.write_page(&header, payload)
    }

    fn write_page(&mut self, header: &PageHeader, payload: &[u8]) -> Result<()> {
        {
            let mut protocol = ThriftCompactOutputProtocol::new(&mut self.buf);
            header.write_thrift(&mut protocol)?;
        }
        self.buf.write_all(payload)?;
        Ok(())
    }
}

/// Prefix each page payload with the definition-level block: a 4-byte length
/// and the RLE-encoded levels, 0 for null and the maximum otherwise. Columns
/// with no optional ancestry carry no block, and no repetition levels are
/// ever written.
fn encode_def_levels(payload: &mut Vec<u8>, values: &[Value], max_def_level: i16) {
    if max_def_level <= 0 {
        return;
    }
    let def_levels: Vec<i16> = values
        .iter()
        .map(|v| if v.is_null() { 0 } else { max_def_level })
        .collect();
    let bit_width = crate::util::bit_util::level_bit_width(max_def_level);
    let block = encode_rle_levels(&def_levels, bit_width);
    payload.extend_from_slice(&(block.len() as u32).to_le_bytes());
    payload.extend_from_slice(&block);
}

/// Split a column into page ranges by accumulating per-row size estimates;
/// a page closes on the row that reaches the budget, and the remainder forms
/// the final page.
fn plain_page_boundaries(values: &[Value], max_page_size: usize) -> Vec<std::ops::Range<usize>> {
    let mut pages = Vec::new();
    let mut page_start = 0usize;
    let mut estimated_size = 0usize;
    for (i, value) in values.iter().enumerate() {
        estimated_size += plain_encoded_size(value);
        if estimated_size >= max_page_size {
            pages.push(page_start..i + 1);
            page_start = i + 1;
            estimated_size = 0;
        }
    }
    if page_start < values.len() {
        pages.push(page_start..values.len());
    }
    pages
}
