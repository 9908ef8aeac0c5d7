//! Reader configuration.

use serde::{Deserialize, Serialize};

/// Options applied to the underlying quick-xml reader.
///
/// Deserializable so that hosts can keep reader defaults in a config file:
///
/// ```toml
/// [reader]
/// trim_text = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Strip leading and trailing whitespace from text nodes, dropping
    /// whitespace-only ones.
    pub trim_text: bool,

    /// Report an end tag that does not match the open start tag.
    pub check_end_names: bool,

    /// Report `<a/>` as a start element followed by an end element.
    pub expand_empty_elements: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            trim_text: false,
            check_end_names: true,
            expand_empty_elements: false,
        }
    }
}

impl ReaderConfig {
    pub(crate) fn apply(&self, config: &mut quick_xml::reader::Config) {
        config.trim_text_start = self.trim_text;
        config.trim_text_end = self.trim_text;
        config.check_end_names = self.check_end_names;
        config.expand_empty_elements = self.expand_empty_elements;
    }
}
