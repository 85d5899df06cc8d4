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

//! Dictionary analysis for the writer.
//!
//! Scans a column's values, interning each unique non-null payload, and
//! decides whether the chunk is worth dictionary-encoding: the unique count
//! must not exceed one fifth of the non-null count.

use bytes::Bytes;
use hashbrown::HashMap;

use crate::data_type::Value;
use crate::util::bit_util::num_required_bits;

/// Hashable stand-in for a non-null value payload. Floats compare by bit
/// pattern so that every payload has a total equality.
#[derive(Clone, PartialEq, Eq, Hash)]
enum DictKey {
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float(u32),
    Double(u64),
    Bytes(Bytes),
}

impl DictKey {
    fn of(value: &Value) -> Option<DictKey> {
        match value {
            Value::Null => None,
            Value::Boolean(v) => Some(DictKey::Boolean(*v)),
            Value::Int32(v) => Some(DictKey::Int32(*v)),
            Value::Int64(v) => Some(DictKey::Int64(*v)),
            Value::Float(v) => Some(DictKey::Float(v.to_bits())),
            Value::Double(v) => Some(DictKey::Double(v.to_bits())),
            Value::Bytes(v) => Some(DictKey::Bytes(v.clone())),
        }
    }
}

/// The dictionary built for one column chunk: the unique values in first-seen
/// order plus the payload → index map used while encoding data pages.
pub(crate) struct DictEncoder {
    uniques: Vec<Value>,
    dedup: HashMap<DictKey, u32>,
}

impl DictEncoder {
    /// Scan `values` and build a dictionary, returning `None` when dictionary
    /// encoding does not pay off: no non-null values at all, or more than
    /// one unique value per five non-null values.
    pub(crate) fn analyze(values: &[Value]) -> Option<DictEncoder> {
        let mut encoder = DictEncoder {
            uniques: Vec::new(),
            dedup: HashMap::new(),
        };
        let mut num_non_null = 0usize;
        for value in values {
            let Some(key) = DictKey::of(value) else {
                continue;
            };
            num_non_null += 1;
            encoder.dedup.entry(key).or_insert_with(|| {
                let index = encoder.uniques.len() as u32;
                encoder.uniques.push(value.clone());
                index
            });
        }
        let unique = encoder.uniques.len();
        if unique == 0 || unique > num_non_null / 5 {
            return None;
        }
        Some(encoder)
    }

    /// The unique values in index order.
    pub(crate) fn values(&self) -> &[Value] {
        &self.uniques
    }

    /// Number of dictionary entries.
    pub(crate) fn num_entries(&self) -> usize {
        self.uniques.len()
    }

    /// Bit width of the dictionary indices, at least 1.
    pub(crate) fn bit_width(&self) -> u8 {
        num_required_bits(self.uniques.len().saturating_sub(1) as u64).max(1)
    }

    /// Look up the index assigned to a value during analysis.
    pub(crate) fn index_of(&self, value: &Value) -> Option<u32> {
        DictKey::of(value).and_then(|key| self.dedup.get(&key).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<Value> {
        values.iter().map(|&s| Value::from(s)).collect()
    }

    #[test]
    fn test_threshold_selects_dictionary() {
        // 3 unique over 100 non-null: 3 <= 100 / 5
        let values: Vec<Value> = (0..100).map(|i| Value::from(["x", "y", "z"][i % 3])).collect();
        let dict = DictEncoder::analyze(&values).unwrap();
        assert_eq!(dict.num_entries(), 3);
        assert_eq!(dict.bit_width(), 2);
    }

    #[test]
    fn test_threshold_rejects_high_cardinality() {
        // 2 unique over 2 non-null: 2 > 2 / 5
        let values = strings(&["a", "bb"]);
        assert!(DictEncoder::analyze(&values).is_none());
    }

    #[test]
    fn test_threshold_boundary_is_exclusive() {
        // exactly u == n / 5 keeps the dictionary
        let mut values = strings(&["a"]);
        values.extend(std::iter::repeat(Value::from("a")).take(4));
        assert_eq!(values.len(), 5);
        assert!(DictEncoder::analyze(&values).is_some());

        // one fewer repeat tips u over n / 5
        let values = strings(&["a", "a", "a", "a"]);
        assert!(DictEncoder::analyze(&values).is_none());
    }

    #[test]
    fn test_all_null_column_has_no_dictionary() {
        let values = vec![Value::Null; 10];
        assert!(DictEncoder::analyze(&values).is_none());
    }

    #[test]
    fn test_nulls_are_excluded_from_counts() {
        // 1 unique over 5 non-null, plus nulls that must not count
        let mut values = vec![Value::Int32(7); 5];
        values.extend(std::iter::repeat(Value::Null).take(20));
        let dict = DictEncoder::analyze(&values).unwrap();
        assert_eq!(dict.num_entries(), 1);
        assert_eq!(dict.bit_width(), 1);
    }

    #[test]
    fn test_index_assignment_is_first_seen_order() {
        let mut values = Vec::new();
        for _ in 0..10 {
            values.extend(strings(&["m", "n"]));
        }
        let dict = DictEncoder::analyze(&values).unwrap();
        assert_eq!(dict.index_of(&Value::from("m")), Some(0));
        assert_eq!(dict.index_of(&Value::from("n")), Some(1));
        assert_eq!(dict.index_of(&Value::from("q")), None);
        assert_eq!(dict.index_of(&Value::Null), None);
    }
}
