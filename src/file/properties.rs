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

//! Writer configuration.

/// Default target for a page's uncompressed payload size, in bytes. This is
/// writer-side tuning only; readers make no assumption about page sizes.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 1024;

/// Default value for the footer's `created_by` field.
pub const DEFAULT_CREATED_BY: &str = concat!("parquet-lite version ", env!("CARGO_PKG_VERSION"));

/// Configuration for [`SerializedFileWriter`].
///
/// [`SerializedFileWriter`]: crate::file::writer::SerializedFileWriter
///
/// ```
/// use parquet_lite::file::properties::WriterProperties;
///
/// let props = WriterProperties::builder()
///     .set_max_page_size(4096)
///     .set_dictionary_enabled(false)
///     .build();
/// assert_eq!(props.max_page_size(), 4096);
/// ```
#[derive(Clone, Debug)]
pub struct WriterProperties {
    max_page_size: usize,
    dictionary_enabled: bool,
    created_by: String,
}

impl Default for WriterProperties {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WriterProperties {
    /// Returns a builder initialised with the defaults.
    pub fn builder() -> WriterPropertiesBuilder {
        WriterPropertiesBuilder {
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            dictionary_enabled: true,
            created_by: DEFAULT_CREATED_BY.to_string(),
        }
    }

    /// Estimated page payload size at which the writer closes a page.
    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    /// Whether columns may be dictionary encoded.
    pub fn dictionary_enabled(&self) -> bool {
        self.dictionary_enabled
    }

    /// `created_by` string stamped into the footer.
    pub fn created_by(&self) -> &str {
        &self.created_by
    }
}

/// Builder for [`WriterProperties`].
pub struct WriterPropertiesBuilder {
    max_page_size: usize,
    dictionary_enabled: bool,
    created_by: String,
}

impl WriterPropertiesBuilder {
    /// Set the estimated payload size at which pages are closed. Clamped to
    /// at least one byte.
    pub fn set_max_page_size(mut self, value: usize) -> Self {
        self.max_page_size = value.max(1);
        self
    }

    /// Enable or disable dictionary encoding.
    pub fn set_dictionary_enabled(mut self, value: bool) -> Self {
        self.dictionary_enabled = value;
        self
    }

    /// Set the footer's `created_by` string.
    pub fn set_created_by(mut self, value: String) -> Self {
        self.created_by = value;
        self
    }

    /// Finalise the configuration.
    pub fn build(self) -> WriterProperties {
        WriterProperties {
            max_page_size: self.max_page_size,
            dictionary_enabled: self.dictionary_enabled,
            created_by: self.created_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let props = WriterProperties::default();
        assert_eq!(props.max_page_size(), DEFAULT_MAX_PAGE_SIZE);
        assert!(props.dictionary_enabled());
        assert!(props.created_by().starts_with("parquet-lite version"));
    }

    #[test]
    fn test_builder_overrides() {
        let props = WriterProperties::builder()
            .set_max_page_size(0)
            .set_dictionary_enabled(false)
            .set_created_by("unit-test".to_string())
            .build();
        assert_eq!(props.max_page_size(), 1);
        assert!(!props.dictionary_enabled());
        assert_eq!(props.created_by(), "unit-test");
    }
}
