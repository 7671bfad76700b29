//! Interchange error types.

use thiserror::Error;

/// Errors raised while reading interchange files.
#[derive(Debug, Error)]
pub enum InterchangeError {
    /// The header row is missing or wrong.
    #[error("Bad header: expected {expected:?}")]
    BadHeader {
        /// The header the format requires.
        expected: &'static str,
    },

    /// A row does not fit the format. 1-indexed, counting the header.
    #[error("Malformed row {row}: {reason}")]
    MalformedRow {
        /// Row number in the file.
        row: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A numeric field could not be parsed.
    #[error("Row {row}: invalid amount {value:?}")]
    InvalidAmount {
        /// Row number in the file.
        row: usize,
        /// The offending field text.
        value: String,
    },

    /// A field contains the format's delimiter and cannot be written.
    #[error("Field {value:?} contains the delimiter")]
    DelimiterInField {
        /// The offending field text.
        value: String,
    },

    /// Underlying CSV reader or writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl InterchangeError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::BadHeader { .. } => "BAD_HEADER",
            Self::MalformedRow { .. } => "MALFORMED_ROW",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::DelimiterInField { .. } => "DELIMITER_IN_FIELD",
            Self::Csv(_) => "CSV_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        400
    }
}
