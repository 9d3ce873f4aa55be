//! Record encoder module
//!
//! Turns serde-annotated structs into delimiter-joined text rows.

mod config;
mod fields;
mod record;
mod writer;

pub use config::{EncoderConfig, DEFAULT_DELIMITER, DEFAULT_HEADING_FIELD_DELIMITER};
pub use record::WriteStats;
pub use writer::RecordEncoder;
