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

//! Reading Parquet files from a [`ChunkReader`] byte source.
//!
//! [`SerializedFileReader::new`] validates the magic and footer, decodes the
//! file metadata, derives the leaf columns and indexes every data page.
//! Column values are decoded on demand through [`read_column`], the
//! streaming [`StringColumnIterator`], or the raw [`PageIterator`].
//!
//! [`read_column`]: SerializedFileReader::read_column

use std::cmp::min;

use bytes::Bytes;

use crate::basic::{Compression, Encoding, PageType, Type};
use crate::data_type::Value;
use crate::encodings::plain::{decode_plain_values, read_plain_value};
use crate::encodings::rle::RleDecoder;
use crate::errors::{ParquetError, Result};
use crate::file::metadata::{
    ColumnChunk, ColumnMetaData, DataPageHeader, DictionaryPageHeader, FileMetaData, PageHeader,
};
use crate::file::reader::ChunkReader;
use crate::file::{FOOTER_SIZE, MIN_FILE_SIZE, PARQUET_MAGIC};
use crate::schema::types::{ColumnDescriptor, SchemaDescriptor};
use crate::thrift::{ReadThrift, ThriftSliceInputProtocol};
use crate::util::bit_util::level_bit_width;
use crate::util::cursor::ByteCursor;

/// Page headers are small; one bounded read of this size is always enough.
const HEADER_READ_SIZE: usize = 256;

/// Location of one data page, recorded at open time.
#[derive(Clone, Debug, PartialEq)]
pub struct PageIndexEntry {
    /// File offset of the page payload (just past the page header).
    pub data_offset: u64,
    /// Payload size in bytes.
    pub data_size: usize,
    /// Row group the page belongs to.
    pub row_group_idx: usize,
    /// Column-chunk position within the row group.
    pub column_idx: usize,
}

/// A Parquet file reader over any [`ChunkReader`] byte source.
#[derive(Debug)]
pub struct SerializedFileReader<R: ChunkReader> {
    chunk_reader: R,
    file_size: u64,
    metadata: FileMetaData,
    schema_descr: SchemaDescriptor,
    page_index: Vec<PageIndexEntry>,
}

impl<R: ChunkReader> SerializedFileReader<R> {
    /// Open a Parquet file: validate both magics and the footer length,
    /// decode the footer, derive leaf columns and build the page index.
    pub fn new(chunk_reader: R) -> Result<Self> {
        let file_size = chunk_reader.len();
        if file_size < MIN_FILE_SIZE {
            return Err(malformed_err!(
                "file is {} bytes, smaller than the minimal parquet file",
                file_size
            ));
        }

        let header = chunk_reader.get_bytes(0, 4)?;
        if header.as_ref() != PARQUET_MAGIC {
            return Err(malformed_err!("missing magic at file start"));
        }

        let trailer = chunk_reader.get_bytes(file_size - FOOTER_SIZE as u64, FOOTER_SIZE)?;
        if trailer[4..] != PARQUET_MAGIC {
            return Err(malformed_err!("missing magic at file end"));
        }

        let footer_len = u32::from_le_bytes(trailer[..4].try_into().unwrap()) as u64;
        if footer_len + FOOTER_SIZE as u64 > file_size {
            return Err(malformed_err!(
                "footer of {} bytes does not fit in a file of {} bytes",
                footer_len,
                file_size
            ));
        }

        let footer_start = file_size - FOOTER_SIZE as u64 - footer_len;
        let footer = chunk_reader.get_bytes(footer_start, footer_len as usize)?;
        let mut prot = ThriftSliceInputProtocol::new(&footer);
        let metadata = FileMetaData::read_thrift(&mut prot)?;

        let schema_descr = SchemaDescriptor::try_new(&metadata.schema)?;
        for (rg_idx, row_group) in metadata.row_groups.iter().enumerate() {
            if row_group.columns.len() != schema_descr.num_columns() {
                return Err(malformed_err!(
                    "schema has {} columns while row group {} has {}",
                    schema_descr.num_columns(),
                    rg_idx,
                    row_group.columns.len()
                ));
            }
        }
        let page_index = build_page_index(&chunk_reader, file_size, &metadata)?;

        Ok(Self {
            chunk_reader,
            file_size,
            metadata,
            schema_descr,
            page_index,
        })
    }

    /// The decoded footer.
    pub fn metadata(&self) -> &FileMetaData {
        &self.metadata
    }

    /// The leaf columns derived from the schema.
    pub fn schema_descr(&self) -> &SchemaDescriptor {
        &self.schema_descr
    }

    /// Leaf descriptors in column order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        self.schema_descr.columns()
    }

    /// Leaf column names in column order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns().iter().map(|c| c.name.as_str()).collect()
    }

    /// Total row count declared in the footer.
    pub fn num_rows(&self) -> i64 {
        self.metadata.num_rows
    }

    /// Number of row groups.
    pub fn num_row_groups(&self) -> usize {
        self.metadata.row_groups.len()
    }

    /// Number of leaf columns.
    pub fn num_columns(&self) -> usize {
        self.schema_descr.num_columns()
    }

    /// Positional index of the leaf column called `name`.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.schema_descr.index_of(name)
    }

    /// Decode all values of the named column across every row group.
    pub fn read_column(&self, name: &str) -> Result<Vec<Value>> {
        let col_idx = self
            .find_column(name)
            .ok_or_else(|| not_found_err!("column {} not found", name))?;
        let mut result = Vec::new();
        for rg_idx in 0..self.metadata.row_groups.len() {
            result.extend(self.read_column_in_row_group(rg_idx, col_idx)?);
        }
        Ok(result)
    }

    /// Decode all values of one column chunk. The result has one entry per
    /// row of the row group, nulls included.
    pub fn read_column_in_row_group(&self, rg_idx: usize, col_idx: usize) -> Result<Vec<Value>> {
        let row_group = self
            .metadata
            .row_groups
            .get(rg_idx)
            .ok_or_else(|| not_found_err!("row group index {} out of range", rg_idx))?;
        let column = self.schema_descr.column(col_idx)?;
        let chunk = row_group
            .columns
            .get(col_idx)
            .ok_or_else(|| not_found_err!("column index {} out of range", col_idx))?;
        let meta = decodable_metadata(chunk)?;

        let mut result = Vec::new();
        let mut offset = chunk_start_offset(meta)?;
        let mut values_read = 0i64;
        let mut dictionary: Option<Vec<Value>> = None;

        while values_read < meta.num_values {
            let (header_len, header) =
                read_page_header_at(&self.chunk_reader, self.file_size, offset)?;
            let data_offset = offset + header_len as u64;
            let page_size = header.compressed_page_size as usize;

            match header.page_type {
                PageType::DICTIONARY_PAGE => {
                    let dict_header = header.dictionary_page_header.as_ref().ok_or_else(|| {
                        malformed_err!("DICTIONARY_PAGE header is missing its sub-header")
                    })?;
                    let page = self.chunk_reader.get_bytes(data_offset, page_size)?;
                    dictionary =
                        Some(decode_dictionary_page(&page, dict_header, column.physical_type)?);
                }
                PageType::DATA_PAGE => {
                    let data_header = header.data_page_header.as_ref().ok_or_else(|| {
                        malformed_err!("DATA_PAGE header is missing its sub-header")
                    })?;
                    let page = self.chunk_reader.get_bytes(data_offset, page_size)?;
                    result.extend(decode_data_page(
                        &page,
                        data_header,
                        column,
                        dictionary.as_deref(),
                    )?);
                    values_read += data_header.num_values as i64;
                }
                PageType::DATA_PAGE_V2 => {
                    return Err(unsupported_err!("DATA_PAGE_V2 decoding is not supported"));
                }
                // other page types are stepped over as opaque bytes
                _ => {}
            }
            offset = data_offset + page_size as u64;
        }
        Ok(result)
    }

    /// Number of data pages in the file.
    pub fn num_pages(&self) -> usize {
        self.page_index.len()
    }

    /// The index entry of one data page.
    pub fn page_index_entry(&self, page_id: usize) -> Result<&PageIndexEntry> {
        self.page_index
            .get(page_id)
            .ok_or_else(|| not_found_err!("page id {} out of range", page_id))
    }

    /// The raw payload bytes of one data page.
    pub fn read_page_data(&self, page_id: usize) -> Result<Bytes> {
        let entry = self.page_index_entry(page_id)?;
        self.chunk_reader.get_bytes(entry.data_offset, entry.data_size)
    }

    /// Iterator over every data page in file order.
    pub fn page_iterator(&self) -> PageIterator<'_, R> {
        PageIterator {
            reader: self,
            start: 0,
            end: self.page_index.len(),
            current: 0,
        }
    }

    /// Iterator over the data pages with ids in `[start, end)`.
    pub fn page_iterator_range(&self, start: usize, end: usize) -> Result<PageIterator<'_, R>> {
        if start > end || end > self.page_index.len() {
            return Err(not_found_err!(
                "page range {}..{} out of range for {} pages",
                start,
                end,
                self.page_index.len()
            ));
        }
        Ok(PageIterator {
            reader: self,
            start,
            end,
            current: start,
        })
    }

    /// Streaming iterator over the non-null strings of a BYTE_ARRAY column.
    pub fn string_column_iterator(&self, name: &str) -> Result<StringColumnIterator<'_, R>> {
        let col_idx = self
            .find_column(name)
            .ok_or_else(|| not_found_err!("column {} not found", name))?;
        let column = self.schema_descr.column(col_idx)?;
        if column.physical_type != Type::BYTE_ARRAY {
            return Err(type_mismatch_err!(
                "column {} is {}, not BYTE_ARRAY",
                name,
                column.physical_type
            ));
        }
        let mut iter = StringColumnIterator {
            reader: self,
            col_idx,
            rg_idx: 0,
            cur_offset: 0,
            values_read: 0,
            total_values: 0,
            dictionary: Vec::new(),
            has_dict: false,
            page_strings: Vec::new(),
            string_idx: 0,
            max_def_level: column.max_def_level,
            max_rep_level: column.max_rep_level,
        };
        if !self.metadata.row_groups.is_empty() {
            iter.init_row_group()?;
            iter.advance_page()?;
        }
        Ok(iter)
    }
}

/// A data page handed out by [`PageIterator`].
#[derive(Clone, Debug)]
pub struct RawPage {
    /// Global page id within the file's page index.
    pub page_id: usize,
    /// Row group the page belongs to.
    pub row_group_idx: usize,
    /// Column-chunk position within the row group.
    pub column_idx: usize,
    /// The page payload.
    pub data: Bytes,
}

/// Iterator over a half-open range of the global page index.
pub struct PageIterator<'a, R: ChunkReader> {
    reader: &'a SerializedFileReader<R>,
    start: usize,
    end: usize,
    current: usize,
}

impl<R: ChunkReader> PageIterator<'_, R> {
    /// True while pages remain.
    pub fn has_next(&self) -> bool {
        self.current < self.end
    }

    /// Read the next page.
    pub fn next(&mut self) -> Result<RawPage> {
        if !self.has_next() {
            return Err(not_found_err!(
                "page iterator exhausted at page {}",
                self.end
            ));
        }
        let entry = self.reader.page_index_entry(self.current)?;
        let page = RawPage {
            page_id: self.current,
            row_group_idx: entry.row_group_idx,
            column_idx: entry.column_idx,
            data: self.reader.read_page_data(self.current)?,
        };
        self.current += 1;
        Ok(page)
    }

    /// Rewind to the start of the range.
    pub fn reset(&mut self) {
        self.current = self.start;
    }
}

/// Streaming iterator over the non-null strings of one BYTE_ARRAY column.
///
/// State advances a page at a time: dictionary pages are absorbed, data pages
/// are decoded into zero-copy [`Bytes`] slices of the page buffer, and
/// exhausted row groups roll over to the next non-empty one.
#[derive(Debug)]
pub struct StringColumnIterator<'a, R: ChunkReader> {
    reader: &'a SerializedFileReader<R>,
    col_idx: usize,
    rg_idx: usize,
    cur_offset: u64,
    values_read: i64,
    total_values: i64,
    dictionary: Vec<Bytes>,
    has_dict: bool,
    page_strings: Vec<Bytes>,
    string_idx: usize,
    max_def_level: i16,
    max_rep_level: i16,
}

impl<R: ChunkReader> StringColumnIterator<'_, R> {
    /// True while undelivered strings remain.
    pub fn has_next(&self) -> bool {
        self.string_idx < self.page_strings.len()
    }

    /// The next non-null string. The returned [`Bytes`] shares the decoded
    /// page buffer, so it stays cheap to hand out.
    pub fn next(&mut self) -> Result<Bytes> {
        if !self.has_next() {
            return Err(not_found_err!("string column iterator exhausted"));
        }
        let value = self.page_strings[self.string_idx].clone();
        self.string_idx += 1;
        if self.string_idx >= self.page_strings.len() {
            self.advance_page()?;
        }
        Ok(value)
    }

    fn init_row_group(&mut self) -> Result<()> {
        let row_group = &self.reader.metadata.row_groups[self.rg_idx];
        let chunk = row_group.columns.get(self.col_idx).ok_or_else(|| {
            malformed_err!(
                "row group {} has no column chunk {}",
                self.rg_idx,
                self.col_idx
            )
        })?;
        let meta = decodable_metadata(chunk)?;
        self.cur_offset = chunk_start_offset(meta)?;
        self.values_read = 0;
        self.total_values = meta.num_values;
        self.has_dict = false;
        self.dictionary.clear();
        Ok(())
    }

    /// Decode pages until one yields strings, rolling over row groups as they
    /// run dry. Returns false once every row group is exhausted.
    fn advance_page(&mut self) -> Result<bool> {
        self.page_strings.clear();
        self.string_idx = 0;

        loop {
            if self.values_read >= self.total_values {
                loop {
                    self.rg_idx += 1;
                    if self.rg_idx >= self.reader.metadata.row_groups.len() {
                        return Ok(false);
                    }
                    self.init_row_group()?;
                    if self.total_values > 0 {
                        break;
                    }
                }
            }

            let (header_len, header) = read_page_header_at(
                &self.reader.chunk_reader,
                self.reader.file_size,
                self.cur_offset,
            )?;
            let data_offset = self.cur_offset + header_len as u64;
            let page_size = header.compressed_page_size as usize;

            match header.page_type {
                PageType::DICTIONARY_PAGE => {
                    let dict_header = header.dictionary_page_header.as_ref().ok_or_else(|| {
                        malformed_err!("DICTIONARY_PAGE header is missing its sub-header")
                    })?;
                    let page = self.reader.chunk_reader.get_bytes(data_offset, page_size)?;
                    self.dictionary = decode_string_dictionary(&page, dict_header)?;
                    self.has_dict = true;
                }
                PageType::DATA_PAGE => {
                    let data_header = header.data_page_header.as_ref().ok_or_else(|| {
                        malformed_err!("DATA_PAGE header is missing its sub-header")
                    })?;
                    let page = self.reader.chunk_reader.get_bytes(data_offset, page_size)?;
                    self.decode_string_page(&page, data_header)?;
                    self.values_read += data_header.num_values as i64;
                }
                PageType::DATA_PAGE_V2 => {
                    return Err(unsupported_err!("DATA_PAGE_V2 decoding is not supported"));
                }
                _ => {}
            }
            self.cur_offset = data_offset + page_size as u64;

            if !self.page_strings.is_empty() {
                return Ok(true);
            }
        }
    }

    fn decode_string_page(&mut self, page: &Bytes, header: &DataPageHeader) -> Result<()> {
        if header.num_values < 0 {
            return Err(malformed_err!("negative num_values {}", header.num_values));
        }
        let num_values = header.num_values as usize;
        let mut cursor = ByteCursor::new(page);

        if self.max_rep_level > 0 {
            let rep_len = cursor.read_u32()? as usize;
            cursor.read_bytes(rep_len)?;
        }
        let def_levels = read_def_levels(&mut cursor, num_values, self.max_def_level)?;

        match header.encoding {
            Encoding::PLAIN_DICTIONARY | Encoding::RLE_DICTIONARY => {
                if !self.has_dict {
                    return Err(malformed_err!(
                        "dictionary encoded page before any dictionary page"
                    ));
                }
                let non_null = count_non_null(&def_levels, self.max_def_level);
                let bit_width = cursor.read_u8()?;
                let mut decoder = RleDecoder::new(cursor.tail(), bit_width);
                let mut indices = vec![0u32; non_null];
                decoder.get_batch(&mut indices);
                for &index in &indices {
                    // out-of-range indices are nulls, which this iterator skips
                    if let Some(value) = self.dictionary.get(index as usize) {
                        self.page_strings.push(value.clone());
                    }
                }
            }
            Encoding::PLAIN => {
                for &level in &def_levels {
                    if level < self.max_def_level {
                        continue;
                    }
                    let len = cursor.read_u32()? as usize;
                    let start = cursor.position();
                    cursor.read_bytes(len)?;
                    self.page_strings.push(page.slice(start..start + len));
                }
            }
            other => {
                return Err(unsupported_err!("value encoding {} is not supported", other));
            }
        }
        Ok(())
    }
}

/// Metadata of a chunk this crate can decode: embedded in this file and
/// uncompressed.
fn decodable_metadata(chunk: &ColumnChunk) -> Result<&ColumnMetaData> {
    if chunk.file_path.as_deref().is_some_and(|p| !p.is_empty()) {
        return Err(unsupported_err!(
            "column chunks in external files are not supported"
        ));
    }
    let meta = chunk
        .meta_data
        .as_ref()
        .ok_or_else(|| malformed_err!("column chunk has no metadata"))?;
    if meta.codec != Compression::UNCOMPRESSED {
        return Err(unsupported_err!(
            "compression codec {} is not supported",
            meta.codec
        ));
    }
    Ok(meta)
}

/// First page offset of a chunk: the dictionary page when present, else the
/// first data page.
fn chunk_start_offset(meta: &ColumnMetaData) -> Result<u64> {
    let offset = match meta.dictionary_page_offset {
        Some(dictionary_offset) => min(meta.data_page_offset, dictionary_offset),
        None => meta.data_page_offset,
    };
    u64::try_from(offset).map_err(|_| malformed_err!("negative page offset {}", offset))
}

/// Parse the page header at `offset` from one bounded read, returning its
/// serialized length together with the header.
fn read_page_header_at<R: ChunkReader>(
    chunk_reader: &R,
    file_size: u64,
    offset: u64,
) -> Result<(usize, PageHeader)> {
    if offset >= file_size {
        return Err(truncated_err!("page header offset {} past end of file", offset));
    }
    let len = min(HEADER_READ_SIZE as u64, file_size - offset) as usize;
    let buf = chunk_reader.get_bytes(offset, len)?;
    let mut prot = ThriftSliceInputProtocol::new(&buf);
    let header = PageHeader::read_thrift(&mut prot)?;
    Ok((prot.position(), header))
}

/// Scan every column chunk of every row group for data pages.
///
/// Dictionary pages are stepped over without a page id. The scan of a chunk
/// ends once the data pages seen account for the chunk's declared value
/// count; DATA_PAGE_V2 counts are taken from the v2 header so a v2-only
/// chunk still terminates.
fn build_page_index<R: ChunkReader>(
    chunk_reader: &R,
    file_size: u64,
    metadata: &FileMetaData,
) -> Result<Vec<PageIndexEntry>> {
    let mut index = Vec::new();
    for (rg_idx, row_group) in metadata.row_groups.iter().enumerate() {
        for (col_idx, chunk) in row_group.columns.iter().enumerate() {
            let Some(meta) = &chunk.meta_data else {
                continue;
            };
            let mut offset = chunk_start_offset(meta)?;
            let mut values_read = 0i64;

            while values_read < meta.num_values {
                let (header_len, header) = read_page_header_at(chunk_reader, file_size, offset)?;
                let data_offset = offset + header_len as u64;
                let data_size = header.compressed_page_size as usize;

                match header.page_type {
                    PageType::DATA_PAGE => {
                        let data_header = header.data_page_header.as_ref().ok_or_else(|| {
                            malformed_err!("DATA_PAGE header is missing its sub-header")
                        })?;
                        index.push(PageIndexEntry {
                            data_offset,
                            data_size,
                            row_group_idx: rg_idx,
                            column_idx: col_idx,
                        });
                        values_read += data_header.num_values as i64;
                    }
                    PageType::DATA_PAGE_V2 => {
                        let data_header = header.data_page_header_v2.as_ref().ok_or_else(|| {
                            malformed_err!("DATA_PAGE_V2 header is missing its sub-header")
                        })?;
                        index.push(PageIndexEntry {
                            data_offset,
                            data_size,
                            row_group_idx: rg_idx,
                            column_idx: col_idx,
                        });
                        values_read += data_header.num_values as i64;
                    }
                    _ => {}
                }
                offset = data_offset + data_size as u64;
            }
        }
    }
    Ok(index)
}

/// Read the definition-level block of a data page. Columns with no optional
/// ancestry carry no block; every row is then at the maximum level.
fn read_def_levels(
    cursor: &mut ByteCursor<'_>,
    num_values: usize,
    max_def_level: i16,
) -> Result<Vec<i16>> {
    if max_def_level <= 0 {
        return Ok(vec![0; num_values]);
    }
    let def_len = cursor.read_u32()? as usize;
    let block = cursor.read_bytes(def_len)?;
    let mut decoder = RleDecoder::new(block, level_bit_width(max_def_level));
    let mut raw = vec![0u32; num_values];
    decoder.get_batch(&mut raw);
    Ok(raw.into_iter().map(|level| level as i16).collect())
}

fn count_non_null(def_levels: &[i16], max_def_level: i16) -> usize {
    def_levels
        .iter()
        .filter(|&&level| level == max_def_level)
        .count()
}

/// Decode a dictionary page into its values, in index order.
fn decode_dictionary_page(
    page: &[u8],
    header: &DictionaryPageHeader,
    physical_type: Type,
) -> Result<Vec<Value>> {
    check_dictionary_encoding(header)?;
    let mut cursor = ByteCursor::new(page);
    let mut dictionary = Vec::with_capacity(header.num_values as usize);
    for _ in 0..header.num_values {
        dictionary.push(read_plain_value(&mut cursor, physical_type)?);
    }
    Ok(dictionary)
}

/// Decode a BYTE_ARRAY dictionary page into zero-copy slices of the page
/// buffer.
fn decode_string_dictionary(page: &Bytes, header: &DictionaryPageHeader) -> Result<Vec<Bytes>> {
    check_dictionary_encoding(header)?;
    let mut cursor = ByteCursor::new(page);
    let mut dictionary = Vec::with_capacity(header.num_values as usize);
    for _ in 0..header.num_values {
        let len = cursor.read_u32()? as usize;
        let start = cursor.position();
        cursor.read_bytes(len)?;
        dictionary.push(page.slice(start..start + len));
    }
    Ok(dictionary)
}

fn check_dictionary_encoding(header: &DictionaryPageHeader) -> Result<()> {
    if header.num_values < 0 {
        return Err(malformed_err!(
            "negative dictionary num_values {}",
            header.num_values
        ));
    }
    match header.encoding {
        Encoding::PLAIN | Encoding::PLAIN_DICTIONARY => Ok(()),
        other => Err(unsupported_err!(
            "dictionary page encoding {} is not supported",
            other
        )),
    }
}

/// Decode one data page into typed values, one per row, nulls included.
fn decode_data_page(
    page: &[u8],
    header: &DataPageHeader,
    column: &ColumnDescriptor,
    dictionary: Option<&[Value]>,
) -> Result<Vec<Value>> {
    if header.num_values < 0 {
        return Err(malformed_err!("negative num_values {}", header.num_values));
    }
    let num_values = header.num_values as usize;
    let mut cursor = ByteCursor::new(page);

    // repetition levels come first; they are read and discarded
    if column.max_rep_level > 0 {
        let rep_len = cursor.read_u32()? as usize;
        cursor.read_bytes(rep_len)?;
    }
    let def_levels = if column.max_def_level > 0 {
        read_def_levels(&mut cursor, num_values, column.max_def_level)?
    } else {
        vec![0; num_values]
    };

    match header.encoding {
        Encoding::PLAIN_DICTIONARY | Encoding::RLE_DICTIONARY => {
            let dictionary = dictionary.ok_or_else(|| {
                malformed_err!("dictionary encoded page before any dictionary page")
            })?;
            let non_null = count_non_null(&def_levels, column.max_def_level);
            let bit_width = cursor.read_u8()?;
            let mut decoder = RleDecoder::new(cursor.tail(), bit_width);
            let mut indices = vec![0u32; non_null];
            decoder.get_batch(&mut indices);

            let mut values = Vec::with_capacity(num_values);
            let mut idx_pos = 0;
            for &level in &def_levels {
                if level < column.max_def_level {
                    values.push(Value::Null);
                } else {
                    // out-of-range indices resolve to null rather than error
                    let value = dictionary
                        .get(indices[idx_pos] as usize)
                        .cloned()
                        .unwrap_or(Value::Null);
                    values.push(value);
                    idx_pos += 1;
                }
            }
            Ok(values)
        }
        Encoding::PLAIN => decode_plain_values(
            &mut cursor,
            column.physical_type,
            &def_levels,
            column.max_def_level,
        ),
        other => Err(unsupported_err!("value encoding {} is not supported", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_too_small() {
        let err = SerializedFileReader::new(Bytes::from_static(b"PAR1PAR1")).unwrap_err();
        assert!(matches!(err, ParquetError::Malformed(_)), "{err}");
    }

    #[test]
    fn test_open_bad_leading_magic() {
        let err =
            SerializedFileReader::new(Bytes::from_static(b"PAR2....\x00\x00\x00\x00PAR1"))
                .unwrap_err();
        assert!(matches!(err, ParquetError::Malformed(_)), "{err}");
    }

    #[test]
    fn test_open_bad_trailing_magic() {
        let err =
            SerializedFileReader::new(Bytes::from_static(b"PAR1....\x00\x00\x00\x00PAR2"))
                .unwrap_err();
        assert!(matches!(err, ParquetError::Malformed(_)), "{err}");
    }

    #[test]
    fn test_open_footer_length_too_large() {
        // footer length claims 255 bytes in a 12 byte file
        let err =
            SerializedFileReader::new(Bytes::from_static(b"PAR1\xff\x00\x00\x00PAR1"))
                .unwrap_err();
        assert!(matches!(err, ParquetError::Malformed(_)), "{err}");
    }

    #[test]
    fn test_decode_data_page_rejects_unknown_encoding() {
        let column = ColumnDescriptor {
            name: "x".to_string(),
            physical_type: Type::INT32,
            column_index: 0,
            max_def_level: 0,
            max_rep_level: 0,
            repetition: Some(crate::basic::Repetition::REQUIRED),
            converted_type: None,
        };
        let header = DataPageHeader {
            num_values: 1,
            encoding: Encoding::DELTA_BINARY_PACKED,
            definition_level_encoding: Encoding::RLE,
            repetition_level_encoding: Encoding::RLE,
        };
        let err = decode_data_page(&[0u8; 4], &header, &column, None).unwrap_err();
        assert!(matches!(err, ParquetError::Unsupported(_)), "{err}");
    }

    #[test]
    fn test_dictionary_page_without_dictionary_is_malformed() {
        let column = ColumnDescriptor {
            name: "x".to_string(),
            physical_type: Type::INT32,
            column_index: 0,
            max_def_level: 0,
            max_rep_level: 0,
            repetition: Some(crate::basic::Repetition::REQUIRED),
            converted_type: None,
        };
        let header = DataPageHeader {
            num_values: 1,
            encoding: Encoding::RLE_DICTIONARY,
            definition_level_encoding: Encoding::RLE,
            repetition_level_encoding: Encoding::RLE,
        };
        let err = decode_data_page(&[1u8, 0], &header, &column, None).unwrap_err();
        assert!(matches!(err, ParquetError::Malformed(_)), "{err}");
    }

    #[test]
    fn test_out_of_range_dictionary_index_is_null() {
        let column = ColumnDescriptor {
            name: "x".to_string(),
            physical_type: Type::INT32,
            column_index: 0,
            max_def_level: 0,
            max_rep_level: 0,
            repetition: Some(crate::basic::Repetition::REQUIRED),
            converted_type: None,
        };
        let header = DataPageHeader {
            num_values: 2,
            encoding: Encoding::RLE_DICTIONARY,
            definition_level_encoding: Encoding::RLE,
            repetition_level_encoding: Encoding::RLE,
        };
        let dictionary = vec![Value::Int32(42)];
        // bit width 2, one RLE run: two copies of index 3 (out of range)
        let page = [2u8, 0x04, 0x03];
        let values = decode_data_page(&page, &header, &column, Some(&dictionary)).unwrap();
        assert_eq!(values, vec![Value::Null, Value::Null]);
    }
}
