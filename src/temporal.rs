//! Human-readable temporal fields.
//!
//! chrono's own `Serialize` impls emit RFC 3339 (`2024-01-15T10:30:00Z`),
//! which the encoder writes verbatim. Fields that should read like a log
//! line instead (`2024-01-15 10:30:00 UTC`) can opt into the `Display` form:
//!
//! ```
//! use chrono::{DateTime, TimeZone, Utc};
//! use record_csv::RecordEncoder;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Event {
//!     #[serde(rename = "at", serialize_with = "record_csv::temporal::display")]
//!     at: DateTime<Utc>,
//! }
//!
//! let mut encoder = RecordEncoder::new(Vec::new());
//! let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
//! encoder.write(&Event { at }).unwrap();
//!
//! assert_eq!(encoder.into_inner(), b"2024-01-15 10:30:00 UTC\n");
//! ```

use std::fmt::Display;

use serde::Serializer;

/// Serializes any temporal value through its `Display` impl.
pub fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
