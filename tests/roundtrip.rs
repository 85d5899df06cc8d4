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

//! Whole-file write-then-read tests.

use std::io::Write as _;

use bytes::Bytes;
use rand::{thread_rng, Rng};

use parquet_lite::basic::{Compression, Encoding, Repetition, Type};
use parquet_lite::data_type::Value;
use parquet_lite::errors::ParquetError;
use parquet_lite::file::metadata::FileMetaData;
use parquet_lite::file::properties::WriterProperties;
use parquet_lite::file::serialized_reader::SerializedFileReader;
use parquet_lite::file::writer::{ColumnSpec, SerializedFileWriter};
use parquet_lite::thrift::{
    ReadThrift, ThriftCompactOutputProtocol, ThriftSliceInputProtocol, WriteThrift,
};

fn write_file(columns: Vec<ColumnSpec>, row_groups: &[Vec<Vec<Value>>]) -> Vec<u8> {
    let mut buffer = Vec::new();
    let mut writer =
        SerializedFileWriter::new(&mut buffer, columns, WriterProperties::default()).unwrap();
    for row_group in row_groups {
        writer.write_row_group(row_group).unwrap();
    }
    writer.close().unwrap();
    buffer
}

#[test]
fn test_single_int32_column() {
    let buffer = write_file(
        vec![ColumnSpec::new("x", Type::INT32, Repetition::REQUIRED)],
        &[vec![(1..=3).map(Value::Int32).collect()]],
    );

    let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
    assert_eq!(reader.num_rows(), 3);
    assert_eq!(reader.num_row_groups(), 1);
    assert_eq!(reader.num_columns(), 1);
    assert_eq!(reader.column_names(), vec!["x"]);
    assert_eq!(
        reader.read_column("x").unwrap(),
        vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)]
    );
}

#[test]
fn test_optional_byte_array_takes_plain_path() {
    // 2 unique values over 2 non-null rows is past the dictionary threshold
    let values = vec![Value::from("a"), Value::Null, Value::from("bb")];
    let buffer = write_file(
        vec![ColumnSpec::new("s", Type::BYTE_ARRAY, Repetition::OPTIONAL)],
        &[vec![values.clone()]],
    );

    let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
    let meta = reader.metadata().row_groups[0].columns[0]
        .meta_data
        .as_ref()
        .unwrap();
    assert_eq!(meta.dictionary_page_offset, None);
    assert_eq!(meta.encodings, vec![Encoding::PLAIN]);
    assert_eq!(reader.read_column("s").unwrap(), values);
}

#[test]
fn test_low_cardinality_column_takes_dictionary_path() {
    let cycle = ["x", "y", "z"];
    let values: Vec<Value> = (0..100).map(|i| Value::from(cycle[i % 3])).collect();
    let buffer = write_file(
        vec![ColumnSpec::new("s", Type::BYTE_ARRAY, Repetition::REQUIRED)],
        &[vec![values.clone()]],
    );

    let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
    let meta = reader.metadata().row_groups[0].columns[0]
        .meta_data
        .as_ref()
        .unwrap();
    let dictionary_page_offset = meta.dictionary_page_offset.unwrap();
    assert!(dictionary_page_offset < meta.data_page_offset);
    assert_eq!(
        meta.encodings,
        vec![Encoding::PLAIN, Encoding::RLE_DICTIONARY]
    );
    assert!(reader.num_pages() >= 1);
    assert_eq!(reader.read_column("s").unwrap(), values);
}

#[test]
fn test_all_physical_types_roundtrip() {
    let columns = vec![
        ColumnSpec::new("b", Type::BOOLEAN, Repetition::REQUIRED),
        ColumnSpec::new("i", Type::INT32, Repetition::OPTIONAL),
        ColumnSpec::new("l", Type::INT64, Repetition::REQUIRED),
        ColumnSpec::new("f", Type::FLOAT, Repetition::OPTIONAL),
        ColumnSpec::new("d", Type::DOUBLE, Repetition::REQUIRED),
        ColumnSpec::new("s", Type::BYTE_ARRAY, Repetition::OPTIONAL),
    ];
    let data = vec![
        vec![
            Value::Boolean(true),
            Value::Boolean(false),
            Value::Boolean(true),
        ],
        vec![Value::Int32(-1), Value::Null, Value::Int32(7)],
        vec![
            Value::Int64(i64::MIN),
            Value::Int64(0),
            Value::Int64(i64::MAX),
        ],
        vec![Value::Float(1.5), Value::Float(-0.25), Value::Null],
        vec![Value::Double(2.5), Value::Double(f64::MIN), Value::Double(0.0)],
        vec![Value::from(""), Value::Null, Value::from("payload")],
    ];
    let buffer = write_file(columns, &[data.clone()]);

    let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
    assert_eq!(reader.num_rows(), 3);
    for (i, name) in ["b", "i", "l", "f", "d", "s"].iter().enumerate() {
        assert_eq!(reader.read_column(name).unwrap(), data[i], "column {name}");
    }
}

#[test]
fn test_repetitive_booleans_stay_plain() {
    // repetitive enough for the dictionary threshold, but booleans are
    // always PLAIN
    let values: Vec<Value> = (0..64).map(|i| Value::Boolean(i % 5 == 0)).collect();
    let buffer = write_file(
        vec![ColumnSpec::new("flag", Type::BOOLEAN, Repetition::REQUIRED)],
        &[vec![values.clone()]],
    );

    let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
    let meta = reader.metadata().row_groups[0].columns[0]
        .meta_data
        .as_ref()
        .unwrap();
    assert_eq!(meta.dictionary_page_offset, None);
    assert_eq!(meta.encodings, vec![Encoding::PLAIN]);
    assert_eq!(reader.read_column("flag").unwrap(), values);
}

#[test]
fn test_converted_type_is_preserved() {
    use parquet_lite::basic::ConvertedType;

    let columns = vec![
        ColumnSpec::new("s", Type::BYTE_ARRAY, Repetition::REQUIRED)
            .with_converted_type(ConvertedType::UTF8),
    ];
    let buffer = write_file(columns, &[vec![vec![Value::from("text")]]]);

    let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
    assert_eq!(reader.columns()[0].converted_type, Some(ConvertedType::UTF8));
    assert_eq!(
        reader.metadata().schema[1].converted_type,
        Some(ConvertedType::UTF8)
    );
}

#[test]
fn test_multiple_row_groups_concatenate() {
    let columns = vec![ColumnSpec::new("v", Type::INT64, Repetition::REQUIRED)];
    let first: Vec<Value> = (0..10).map(Value::Int64).collect();
    let second: Vec<Value> = (10..25).map(Value::Int64).collect();
    let buffer = write_file(columns, &[vec![first.clone()], vec![second.clone()]]);

    let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
    assert_eq!(reader.num_row_groups(), 2);
    assert_eq!(reader.num_rows(), 25);

    // footer row count equals the sum over row groups, which equals each
    // chunk's value count
    let metadata = reader.metadata();
    let total: i64 = metadata.row_groups.iter().map(|rg| rg.num_rows).sum();
    assert_eq!(metadata.num_rows, total);
    for row_group in &metadata.row_groups {
        let meta = row_group.columns[0].meta_data.as_ref().unwrap();
        assert_eq!(meta.num_values, row_group.num_rows);
    }

    let mut expected = first;
    expected.extend(second);
    assert_eq!(reader.read_column("v").unwrap(), expected);
    assert_eq!(reader.read_column_in_row_group(1, 0).unwrap().len(), 15);

    let err = reader.read_column_in_row_group(2, 0).unwrap_err();
    assert!(matches!(err, ParquetError::NotFound(_)), "{err}");
}

#[test]
fn test_page_splitting_plain_path() {
    // 1000 * 4 bytes against the 1024 byte budget: 256 rows per full page
    let values: Vec<Value> = (0..1000).map(Value::Int32).collect();
    let buffer = write_file(
        vec![ColumnSpec::new("x", Type::INT32, Repetition::REQUIRED)],
        &[vec![values.clone()]],
    );

    let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
    assert_eq!(reader.num_pages(), 4);
    assert_eq!(reader.read_column("x").unwrap(), values);
}

#[test]
fn test_page_iterator() {
    let values: Vec<Value> = (0..1000).map(Value::Int32).collect();
    let buffer = write_file(
        vec![ColumnSpec::new("x", Type::INT32, Repetition::REQUIRED)],
        &[vec![values]],
    );
    let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();

    let mut iterator = reader.page_iterator();
    let mut seen = 0;
    while iterator.has_next() {
        let page = iterator.next().unwrap();
        assert_eq!(page.page_id, seen);
        assert_eq!(page.row_group_idx, 0);
        assert_eq!(page.column_idx, 0);
        assert!(!page.data.is_empty());
        seen += 1;
    }
    assert_eq!(seen, reader.num_pages());

    let err = iterator.next().unwrap_err();
    assert!(matches!(err, ParquetError::NotFound(_)), "{err}");

    iterator.reset();
    assert!(iterator.has_next());
    assert_eq!(iterator.next().unwrap().page_id, 0);

    let mut ranged = reader.page_iterator_range(1, 3).unwrap();
    assert_eq!(ranged.next().unwrap().page_id, 1);
    assert_eq!(ranged.next().unwrap().page_id, 2);
    assert!(!ranged.has_next());
    assert!(reader.page_iterator_range(0, 99).is_err());
}

#[test]
fn test_string_iterator_plain_and_dictionary() {
    // first row group dictionary encoded, second too distinct for it
    let repetitive: Vec<Value> = (0..60).map(|i| Value::from(["m", "n"][i % 2])).collect();
    let distinct = vec![
        Value::from("alpha"),
        Value::Null,
        Value::from("beta"),
        Value::from("gamma"),
    ];
    let buffer = write_file(
        vec![ColumnSpec::new("s", Type::BYTE_ARRAY, Repetition::OPTIONAL)],
        &[vec![repetitive.clone()], vec![distinct.clone()]],
    );
    let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();

    let mut iterator = reader.string_column_iterator("s").unwrap();
    let mut strings = Vec::new();
    while iterator.has_next() {
        strings.push(iterator.next().unwrap());
    }

    let expected: Vec<Bytes> = repetitive
        .iter()
        .chain(distinct.iter())
        .filter_map(|v| v.as_bytes().map(Bytes::copy_from_slice))
        .collect();
    assert_eq!(strings, expected);

    let err = iterator.next().unwrap_err();
    assert!(matches!(err, ParquetError::NotFound(_)), "{err}");
}

#[test]
fn test_string_iterator_type_mismatch() {
    let buffer = write_file(
        vec![ColumnSpec::new("x", Type::INT32, Repetition::REQUIRED)],
        &[vec![vec![Value::Int32(1)]]],
    );
    let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
    let err = reader.string_column_iterator("x").unwrap_err();
    assert!(matches!(err, ParquetError::TypeMismatch(_)), "{err}");
    let err = reader.string_column_iterator("missing").unwrap_err();
    assert!(matches!(err, ParquetError::NotFound(_)), "{err}");
}

#[test]
fn test_unknown_column_is_not_found() {
    let buffer = write_file(
        vec![ColumnSpec::new("x", Type::INT32, Repetition::REQUIRED)],
        &[vec![vec![Value::Int32(1)]]],
    );
    let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
    let err = reader.read_column("y").unwrap_err();
    assert!(matches!(err, ParquetError::NotFound(_)), "{err}");
}

#[test]
fn test_corrupt_leading_magic() {
    let mut buffer = write_file(
        vec![ColumnSpec::new("x", Type::INT32, Repetition::REQUIRED)],
        &[vec![vec![Value::Int32(1)]]],
    );
    buffer[3] = b'2';
    let err = SerializedFileReader::new(Bytes::from(buffer)).unwrap_err();
    assert!(matches!(err, ParquetError::Malformed(_)), "{err}");
}

#[test]
fn test_compressed_chunk_is_rejected_at_decode() {
    // rewrite the footer of a valid file, declaring the chunk SNAPPY
    let buffer = write_file(
        vec![ColumnSpec::new("x", Type::INT32, Repetition::REQUIRED)],
        &[vec![vec![Value::Int32(1), Value::Int32(2)]]],
    );

    let footer_len =
        u32::from_le_bytes(buffer[buffer.len() - 8..buffer.len() - 4].try_into().unwrap())
            as usize;
    let footer_start = buffer.len() - 8 - footer_len;
    let mut prot = ThriftSliceInputProtocol::new(&buffer[footer_start..footer_start + footer_len]);
    let mut metadata = FileMetaData::read_thrift(&mut prot).unwrap();
    metadata.row_groups[0].columns[0]
        .meta_data
        .as_mut()
        .unwrap()
        .codec = Compression::SNAPPY;

    let mut patched = buffer[..footer_start].to_vec();
    let rewritten_start = patched.len();
    {
        let mut protocol = ThriftCompactOutputProtocol::new(&mut patched);
        metadata.write_thrift(&mut protocol).unwrap();
    }
    let rewritten_len = (patched.len() - rewritten_start) as u32;
    patched.write_all(&rewritten_len.to_le_bytes()).unwrap();
    patched.write_all(b"PAR1").unwrap();

    // schema inspection still works, value decoding does not
    let reader = SerializedFileReader::new(Bytes::from(patched)).unwrap();
    assert_eq!(reader.num_columns(), 1);
    assert_eq!(reader.columns()[0].physical_type, Type::INT32);
    let err = reader.read_column("x").unwrap_err();
    assert!(matches!(err, ParquetError::Unsupported(_)), "{err}");
}

#[test]
fn test_file_backed_reader() {
    let buffer = write_file(
        vec![ColumnSpec::new("x", Type::INT32, Repetition::OPTIONAL)],
        &[vec![vec![Value::Int32(5), Value::Null, Value::Int32(9)]]],
    );
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(&buffer).unwrap();
    file.flush().unwrap();

    let reader = SerializedFileReader::new(file).unwrap();
    assert_eq!(
        reader.read_column("x").unwrap(),
        vec![Value::Int32(5), Value::Null, Value::Int32(9)]
    );
}

#[test]
fn test_created_by_is_stamped() {
    let buffer = write_file(
        vec![ColumnSpec::new("x", Type::INT32, Repetition::REQUIRED)],
        &[],
    );
    let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
    let created_by = reader.metadata().created_by.as_deref().unwrap();
    assert!(created_by.starts_with("parquet-lite version"));
    assert_eq!(reader.metadata().version, 2);
}

#[test]
fn test_dictionary_disabled_by_properties() {
    let values: Vec<Value> = (0..100).map(|_| Value::from("same")).collect();
    let mut buffer = Vec::new();
    let mut writer = SerializedFileWriter::new(
        &mut buffer,
        vec![ColumnSpec::new("s", Type::BYTE_ARRAY, Repetition::REQUIRED)],
        WriterProperties::builder().set_dictionary_enabled(false).build(),
    )
    .unwrap();
    writer.write_row_group(&[values.clone()]).unwrap();
    let metadata = writer.close().unwrap();

    let meta = metadata.row_groups[0].columns[0].meta_data.as_ref().unwrap();
    assert_eq!(meta.dictionary_page_offset, None);

    let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
    assert_eq!(reader.read_column("s").unwrap(), values);
}

#[test]
fn test_randomized_roundtrip() {
    let mut rng = thread_rng();
    for _ in 0..10 {
        let num_rows = rng.gen_range(0..500);
        let ints: Vec<Value> = (0..num_rows)
            .map(|_| {
                if rng.gen_bool(0.2) {
                    Value::Null
                } else {
                    Value::Int64(rng.gen())
                }
            })
            .collect();
        let strings: Vec<Value> = (0..num_rows)
            .map(|_| {
                if rng.gen_bool(0.2) {
                    Value::Null
                } else {
                    // a small alphabet keeps some runs dictionary friendly
                    let tag: u8 = rng.gen_range(0..4);
                    Value::from(format!("tag-{tag}"))
                }
            })
            .collect();
        let columns = vec![
            ColumnSpec::new("i", Type::INT64, Repetition::OPTIONAL),
            ColumnSpec::new("s", Type::BYTE_ARRAY, Repetition::OPTIONAL),
        ];
        let buffer = write_file(columns, &[vec![ints.clone(), strings.clone()]]);

        let reader = SerializedFileReader::new(Bytes::from(buffer)).unwrap();
        assert_eq!(reader.num_rows(), num_rows as i64);
        assert_eq!(reader.read_column("i").unwrap(), ints);
        assert_eq!(reader.read_column("s").unwrap(), strings);
    }
}
