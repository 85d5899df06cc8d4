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

//! Leaf-column descriptors derived from the flat schema.
//!
//! A Parquet schema is stored as a depth-first flattening of a tree whose
//! root names the message. The walker here recovers the leaves together with
//! their maximum definition and repetition levels, which is all the page
//! decoders need; nested value reconstruction is out of scope.

use hashbrown::HashMap;

use crate::basic::{ConvertedType, Repetition, Type};
use crate::errors::{ParquetError, Result};
use crate::file::metadata::SchemaElement;

/// Descriptor of one leaf column of the schema.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnDescriptor {
    /// The leaf's own name (not the dotted path).
    pub name: String,
    /// Physical type of the column's pages.
    pub physical_type: Type,
    /// Positional index into every row group's column-chunk list.
    pub column_index: usize,
    /// Maximum definition level. A value is null iff its definition level is
    /// strictly below this.
    pub max_def_level: i16,
    /// Maximum repetition level. Non-zero only below REPEATED ancestors.
    pub max_rep_level: i16,
    /// The leaf's own repetition, absent only on malformed schemas.
    pub repetition: Option<Repetition>,
    /// Converted type annotation, when present.
    pub converted_type: Option<ConvertedType>,
}

/// All leaf columns of a schema, in schema order, with lookup by name.
#[derive(Debug)]
pub struct SchemaDescriptor {
    leaves: Vec<ColumnDescriptor>,
    leaf_by_name: HashMap<String, usize>,
}

impl SchemaDescriptor {
    /// Walk the flat depth-first `schema` array. Element 0 is the root and
    /// contributes nothing but its child count, which must account for every
    /// remaining element.
    pub fn try_new(schema: &[SchemaElement]) -> Result<Self> {
        let mut leaves = Vec::new();
        if !schema.is_empty() {
            let num_children = schema[0].num_children.unwrap_or(0);
            let mut end = 1;
            for _ in 0..num_children {
                end = skip_subtree(schema, end, schema.len())?;
            }
            if end != schema.len() {
                return Err(malformed_err!(
                    "schema has {} elements but the root accounts for {}",
                    schema.len(),
                    end
                ));
            }
            walk(schema, 1, end, 0, 0, &mut leaves)?;
        }
        let mut leaf_by_name = HashMap::with_capacity(leaves.len());
        for (i, leaf) in leaves.iter().enumerate() {
            leaf_by_name.insert(leaf.name.clone(), i);
        }
        Ok(Self {
            leaves,
            leaf_by_name,
        })
    }

    /// Number of leaf columns.
    pub fn num_columns(&self) -> usize {
        self.leaves.len()
    }

    /// All leaf descriptors in column-index order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.leaves
    }

    /// The descriptor at `index`.
    pub fn column(&self, index: usize) -> Result<&ColumnDescriptor> {
        self.leaves
            .get(index)
            .ok_or_else(|| not_found_err!("column index {} out of range", index))
    }

    /// The positional index of the column called `name`, if any.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.leaf_by_name.get(name).copied()
    }
}

fn walk(
    schema: &[SchemaElement],
    mut idx: usize,
    end: usize,
    def_level: i16,
    rep_level: i16,
    leaves: &mut Vec<ColumnDescriptor>,
) -> Result<()> {
    while idx < end {
        let elem = &schema[idx];
        let mut my_def = def_level;
        let mut my_rep = rep_level;
        match elem.repetition_type {
            Some(Repetition::OPTIONAL) => my_def += 1,
            Some(Repetition::REPEATED) => {
                my_def += 1;
                my_rep += 1;
            }
            _ => {}
        }

        let num_children = elem.num_children.unwrap_or(0);
        if num_children > 0 {
            // the group's descendants occupy a contiguous range starting at
            // the next element; find its end by skipping each child subtree
            let child_start = idx + 1;
            let mut child_end = child_start;
            for _ in 0..num_children {
                child_end = skip_subtree(schema, child_end, end)?;
            }
            walk(schema, child_start, child_end, my_def, my_rep, leaves)?;
            idx = child_end;
        } else {
            leaves.push(ColumnDescriptor {
                name: elem.name.clone(),
                physical_type: elem.physical_type.unwrap_or(Type::BYTE_ARRAY),
                column_index: leaves.len(),
                max_def_level: my_def,
                max_rep_level: my_rep,
                repetition: elem.repetition_type,
                converted_type: elem.converted_type,
            });
            idx += 1;
        }
    }
    Ok(())
}

/// Returns the index just past the subtree rooted at `idx`.
fn skip_subtree(schema: &[SchemaElement], idx: usize, end: usize) -> Result<usize> {
    if idx >= end {
        return Err(malformed_err!(
            "schema element count does not cover all declared children"
        ));
    }
    let num_children = schema[idx].num_children.unwrap_or(0);
    let mut idx = idx + 1;
    for _ in 0..num_children {
        idx = skip_subtree(schema, idx, end)?;
    }
    Ok(idx)
}
