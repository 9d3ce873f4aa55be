//! Captured record types and write statistics.
//!
//! Defines [`CapturedRecord`], the flat `(column name, text)` view of one
//! record produced by the field serializer, and [`WriteStats`] for tracking
//! what an encoder has emitted.

/// One field of a captured record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CapturedField {
    /// External column name; empty for untagged fields.
    pub name: &'static str,
    /// Formatted value, or `None` when the field's type has no formatting rule.
    pub text: Option<String>,
}

/// The flattened view of one record, in field-declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CapturedRecord {
    fields: Vec<CapturedField>,
}

impl CapturedRecord {
    pub fn with_capacity(len: usize) -> Self {
        Self {
            fields: Vec::with_capacity(len),
        }
    }

    pub fn push(&mut self, name: &'static str, text: Option<String>) {
        self.fields.push(CapturedField { name, text });
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.to_string()).collect()
    }

    /// Number of fields that will encode as an empty string for lack of a
    /// formatting rule.
    pub fn unsupported_count(&self) -> usize {
        self.fields.iter().filter(|f| f.text.is_none()).count()
    }

    /// Formatted values in declaration order; unsupported fields yield `""`.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.text.as_deref().unwrap_or(""))
    }
}

/// Statistics for rows emitted by one encoder.
///
/// # Example
///
/// ```
/// use record_csv::WriteStats;
///
/// let stats = WriteStats::default();
/// assert_eq!(stats.total_records, 0);
/// assert_eq!(stats.heading_bytes, 0);
/// assert_eq!(stats.record_bytes, 0);
/// assert_eq!(stats.empty_fields, 0);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteStats {
    /// Number of data rows written.
    pub total_records: u64,
    /// Size in bytes of the heading row, zero until it has been written.
    pub heading_bytes: u64,
    /// Total bytes of all data rows, terminators included.
    pub record_bytes: u64,
    /// Fields written as an empty string because their type has no
    /// formatting rule (nested structs, sequences, maps, `None`, ...).
    pub empty_fields: u64,
}
