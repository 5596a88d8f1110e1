// Chunk: docs/chunks/entry_config - Entry configuration
//!
//! Configuration for a [`TextEntry`](crate::TextEntry).
//!
//! Every field has a default, so hosts can deserialize partial settings:
//!
//! ```
//! use textkit_entry::EntryConfig;
//!
//! let config = EntryConfig::from_json(r#"{ "multiline": false }"#).unwrap();
//! assert!(!config.multiline);
//! assert_eq!(config.buffer_options().gap_size, 0);
//! ```

use serde::{Deserialize, Serialize};
use textkit_buffer::{BufferOptions, DEFAULT_GAP_SIZE, DEFAULT_TAB_SPACES};

use crate::error::EntryError;

/// Lines shown when the host does not say otherwise.
pub const DEFAULT_VISIBLE_LINES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
    /// Whether the entry accepts newlines and vertical movement.
    pub multiline: bool,
    /// Gap growth increment; `None` picks 64 for multi-line and 0 for
    /// single-line entries.
    pub gap_size: Option<usize>,
    /// Tab stop interval used for visual columns.
    pub tab_spaces: usize,
    /// Number of lines the host displays at once.
    pub visible_lines: usize,
}

impl EntryConfig {
    /// Default configuration for a one-line field.
    pub fn single_line() -> Self {
        Self {
            multiline: false,
            visible_lines: 1,
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON, filling in missing fields.
    pub fn from_json(json: &str) -> Result<Self, EntryError> {
        let config: Self = serde_json::from_str(json)?;
        log::debug!("loaded entry config: {:?}", config);
        Ok(config)
    }

    /// Storage options derived from this configuration.
    pub fn buffer_options(&self) -> BufferOptions {
        let gap_size = self.gap_size.unwrap_or(if self.multiline {
            DEFAULT_GAP_SIZE
        } else {
            0
        });
        BufferOptions {
            gap_size,
            tab_spaces: self.tab_spaces.max(1),
        }
    }

    /// Visible line count, at least one. Single-line entries always show one.
    pub fn effective_visible_lines(&self) -> usize {
        if self.multiline {
            self.visible_lines.max(1)
        } else {
            1
        }
    }
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            multiline: true,
            gap_size: None,
            tab_spaces: DEFAULT_TAB_SPACES,
            visible_lines: DEFAULT_VISIBLE_LINES,
        }
    }
}
