//! Error module
//!
//! Defines the error type returned by [`RecordEncoder`](crate::encoder::RecordEncoder)
//! operations, built with `thiserror`.

use std::fmt;

use thiserror::Error;

/// The phase of a two-phase emission in which the sink failed.
///
/// A single `write` call may emit a heading row followed by a data row; the
/// stage tells the caller which of the two the sink rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    /// The heading row (column names).
    Heading,
    /// The data row (field values).
    Record,
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteStage::Heading => f.write_str("write heading"),
            WriteStage::Record => f.write_str("write record"),
        }
    }
}

/// Errors produced while encoding a record into a row.
///
/// # Error Categories
///
/// - **Shape errors**: the value handed to `write` is not a record
/// - **Sink errors**: the underlying writer failed, tagged with the stage
/// - **Serialize errors**: a `Serialize` impl reported a custom failure
///
/// Field values of unsupported types are never an error; they encode as an
/// empty string.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The value is not struct-shaped (nor a reference, box, newtype or
    /// `Some` wrapping one).
    ///
    /// `kind` names the shape that was actually seen, e.g. `"i32"` or `"map"`.
    #[error("struct expected, got {kind}")]
    StructExpected {
        /// The serde data-model kind of the rejected value.
        kind: &'static str,
    },

    /// The sink rejected a write.
    ///
    /// A failed write may leave a partial row in the sink; recovery is up to
    /// the caller.
    #[error("{stage}: {source}")]
    Sink {
        /// Which row was being written.
        stage: WriteStage,
        /// The I/O error reported by the sink.
        #[source]
        source: std::io::Error,
    },

    /// A `Serialize` implementation raised a custom error.
    #[error("serialize record: {0}")]
    Serialize(String),
}

impl EncodeError {
    pub(crate) fn sink(stage: WriteStage, source: std::io::Error) -> Self {
        EncodeError::Sink { stage, source }
    }

    /// Returns the stage of a sink failure, if this is one.
    pub fn stage(&self) -> Option<WriteStage> {
        match self {
            EncodeError::Sink { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl serde::ser::Error for EncodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        EncodeError::Serialize(msg.to_string())
    }
}
