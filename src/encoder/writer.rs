use std::io::Write;

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::config::EncoderConfig;
use super::fields::capture;
use super::record::{CapturedRecord, WriteStats};
use crate::error::{EncodeError, WriteStage};

/// Encodes serde-annotated records as delimiter-joined text rows.
///
/// Column names come from the first record written. Records deriving
/// [`Record`](crate::Record) name each column with `#[csv(name = "...")]`,
/// and a field without the annotation gets an empty name. Records with a
/// serde-derived `Serialize` impl are named by their serde keys. The names are
/// cached and never re-derived, so every record passed to one encoder must
/// have the same shape.
///
/// # Output Format
///
/// - One `\n`-terminated row per [`write`](Self::write) call
/// - At most one heading row, emitted before the first data row when enabled
/// - Values joined by the configured delimiter with no quoting and no
///   escaping. A value containing the delimiter or a newline produces a row
///   that cannot be split back unambiguously.
///
/// The sink is written with one `write_all` per row and never flushed; flush
/// and close stay with the caller.
///
/// # Example
///
/// ```
/// use record_csv::{Record, RecordEncoder};
///
/// #[derive(Record)]
/// struct Reading {
///     #[csv(name = "sensor")]
///     name: String,
///     #[csv(name = "celsius")]
///     value: f64,
/// }
///
/// let mut out = Vec::new();
/// let mut encoder = RecordEncoder::new(&mut out);
/// encoder.delimiter(';').write_heading(true);
/// encoder.write(&Reading { name: "attic".into(), value: 21.5 }).unwrap();
///
/// assert_eq!(String::from_utf8(out).unwrap(), "sensor;celsius\nattic;21.50\n");
/// ```
pub struct RecordEncoder<W: Write> {
    /// The destination for encoded rows.
    sink: W,
    /// Live configuration.
    config: EncoderConfig,
    /// Column names cached from the first record.
    field_names: Option<Vec<String>>,
    /// Whether the heading row has been emitted.
    heading_written: bool,
    /// Statistics for emitted rows.
    stats: WriteStats,
}

impl<W: Write> RecordEncoder<W> {
    /// Creates an encoder with the default configuration: `,` delimiter,
    /// `.` heading field delimiter, no heading row.
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, EncoderConfig::default())
    }

    /// Creates an encoder with an explicit configuration.
    pub fn with_config(sink: W, config: EncoderConfig) -> Self {
        Self {
            sink,
            config,
            field_names: None,
            heading_written: false,
            stats: WriteStats::default(),
        }
    }

    /// Sets the column separator. Affects rows written after the call.
    pub fn delimiter(&mut self, delimiter: char) -> &mut Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Sets the separator for composed heading names.
    ///
    /// Records are flat, so this does not change the heading today.
    pub fn heading_field_delimiter(&mut self, delimiter: char) -> &mut Self {
        self.config.heading_field_delimiter = delimiter;
        self
    }

    /// Enables or disables the heading row.
    ///
    /// Enabling it after rows have already been written still emits the
    /// heading once, before the next data row.
    pub fn write_heading(&mut self, yes: bool) -> &mut Self {
        self.config.write_heading = yes;
        self
    }

    /// Returns the live configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Returns the cached column names, or `None` before the first record.
    pub fn column_names(&self) -> Option<&[String]> {
        self.field_names.as_deref()
    }

    /// Returns whether the heading row has been written.
    pub fn heading_written(&self) -> bool {
        self.heading_written
    }

    /// Returns a reference to the current write statistics.
    pub fn stats(&self) -> &WriteStats {
        &self.stats
    }

    /// Gets a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Gets a mutable reference to the underlying sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Unwraps the encoder, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Writes one record as a data row, preceded by the heading row if it is
    /// enabled and has not been written yet.
    ///
    /// `record` must serialize as a struct; references, boxes, newtypes and
    /// `Some` are looked through. Returns the number of bytes of the data row,
    /// terminator included. Heading bytes are not counted here; see
    /// [`WriteStats::heading_bytes`].
    ///
    /// # Errors
    ///
    /// - [`EncodeError::StructExpected`] if `record` is not struct-shaped.
    ///   Nothing is written.
    /// - [`EncodeError::Serialize`] if a field's `Serialize` impl fails.
    ///   Nothing is written.
    /// - [`EncodeError::Sink`] if the sink fails, tagged with the row being
    ///   written. The sink may hold a partial row.
    pub fn write<T: ?Sized + Serialize>(&mut self, record: &T) -> Result<usize, EncodeError> {
        let captured = capture(record)?;

        if self.field_names.is_none() {
            self.set_field_names(&captured);
        }

        if self.config.write_heading && !self.heading_written {
            self.write_heading_row()?;
        }

        self.write_record_row(&captured)
    }

    fn set_field_names(&mut self, record: &CapturedRecord) {
        let names = record.column_names();
        debug!(columns = names.len(), "cached column names");
        self.field_names = Some(names);
    }

    fn write_heading_row(&mut self) -> Result<(), EncodeError> {
        let names = self.field_names.as_deref().unwrap_or_default();
        let line = join_line(names.iter().map(String::as_str), self.config.delimiter);

        self.sink
            .write_all(line.as_bytes())
            .map_err(|e| EncodeError::sink(WriteStage::Heading, e))?;

        self.heading_written = true;
        self.stats.heading_bytes = line.len() as u64;
        debug!(bytes = line.len(), "wrote heading row");
        Ok(())
    }

    fn write_record_row(&mut self, record: &CapturedRecord) -> Result<usize, EncodeError> {
        let expected = self.field_names.as_ref().map_or(0, Vec::len);
        if record.len() != expected {
            warn!(
                expected,
                actual = record.len(),
                "record shape differs from cached column names"
            );
        }

        let line = join_line(record.values(), self.config.delimiter);

        self.sink
            .write_all(line.as_bytes())
            .map_err(|e| EncodeError::sink(WriteStage::Record, e))?;

        self.stats.total_records += 1;
        self.stats.record_bytes += line.len() as u64;
        self.stats.empty_fields += record.unsupported_count() as u64;
        trace!(bytes = line.len(), "wrote record row");
        Ok(line.len())
    }
}

/// Joins `values` with `delimiter` and appends the row terminator.
fn join_line<'a, I>(values: I, delimiter: char) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut line = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            line.push(delimiter);
        }
        line.push_str(value);
    }
    line.push('\n');
    line
}
