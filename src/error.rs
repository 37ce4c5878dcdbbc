use crate::dataset::Period;
use thiserror::Error;

/// Error taxonomy shared by the loader, aggregator and projector.
///
/// All of these are recoverable at the boundary that triggered them: an
/// upload that fails to parse leaves the previous dataset active, and the
/// web layer surfaces the message to the page instead of terminating.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The series holds no records, so there is no baseline to work from.
    #[error("dataset contains no records")]
    InsufficientData,

    /// The forecast horizon must cover at least one month and stay
    /// within the supported maximum.
    #[error("forecast horizon must be between 1 and 120 months, got {0}")]
    InvalidHorizon(u32),

    /// Growth multipliers of any sign are accepted, but NaN and infinity
    /// would poison every projected value.
    #[error("growth multiplier must be a finite number, got {0}")]
    NonFiniteGrowth(f64),

    /// The uploaded file had no header or no data rows.
    #[error("input contains no data rows")]
    EmptyInput,

    /// A required column was not found in the header row.
    #[error("required column '{0}' is missing from the header")]
    MissingColumn(String),

    /// A data row could not be parsed; `line` is 1-based within the file.
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// Two rows carried the same calendar month.
    #[error("duplicate period {0} in dataset")]
    DuplicatePeriod(Period),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
