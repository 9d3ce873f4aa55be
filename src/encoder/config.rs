//! Encoder configuration.

use serde::{Deserialize, Serialize};

/// Default column separator.
pub const DEFAULT_DELIMITER: char = ',';

/// Default separator for composed heading names.
pub const DEFAULT_HEADING_FIELD_DELIMITER: char = '.';

/// Settings applied to a [`RecordEncoder`](super::RecordEncoder).
///
/// The struct can be embedded in an application's own configuration file;
/// missing keys fall back to the defaults.
///
/// # Example
///
/// ```
/// use record_csv::EncoderConfig;
///
/// let config = EncoderConfig::default();
/// assert_eq!(config.delimiter, ',');
/// assert_eq!(config.heading_field_delimiter, '.');
/// assert!(!config.write_heading);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Separator placed between values, and between names in the heading row.
    pub delimiter: char,

    /// Separator for composing nested field names in the heading.
    ///
    /// Nested records are not flattened, so this is stored but not used when
    /// deriving column names.
    pub heading_field_delimiter: char,

    /// Whether a heading row is emitted before the first data row.
    pub write_heading: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            heading_field_delimiter: DEFAULT_HEADING_FIELD_DELIMITER,
            write_heading: false,
        }
    }
}
