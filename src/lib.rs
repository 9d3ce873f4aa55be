//! Record CSV Library
//!
//! Encodes sequences of same-shaped structs as delimiter-joined text rows.
//! Column names come from each field's `#[csv(name = "...")]` annotation
//! (empty when absent), values are formatted by type, and an optional
//! heading row is written once per output stream.
//!
//! ```
//! use record_csv::{Record, RecordEncoder};
//!
//! #[derive(Record)]
//! struct Point {
//!     #[csv(name = "x_pos")]
//!     x: i32,
//!     #[csv(name = "y_pos")]
//!     y: i32,
//!     z: i32,
//! }
//!
//! let mut encoder = RecordEncoder::new(Vec::new());
//! encoder.write_heading(true);
//! encoder.write(&Point { x: 1, y: -2, z: 0 }).unwrap();
//!
//! assert_eq!(encoder.into_inner(), b"x_pos,y_pos,\n1,-2,0\n");
//! ```
//!
//! Any struct with a serde-derived `Serialize` impl is accepted too; its
//! columns are named by serde's field keys.

extern crate self as record_csv;

pub mod encoder;
pub mod error;
pub mod temporal;

pub use encoder::{EncoderConfig, RecordEncoder, WriteStats};
pub use error::{EncodeError, WriteStage};
pub use record_csv_derive::Record;

#[doc(hidden)]
pub use serde as __serde;
