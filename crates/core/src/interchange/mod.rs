//! Interchange formats.
//!
//! Two text formats cross the system boundary: a pipe-delimited ledger
//! balance file and a CSV catalog mapping file. Both are parsed
//! strictly: a malformed row rejects the whole file with its row
//! number, nothing is skipped or guessed.

pub mod error;
pub mod mapping_csv;
pub mod pipe;

pub use error::InterchangeError;
pub use mapping_csv::{read_mapping_csv, write_mapping_csv, MappingRow};
pub use pipe::{read_balance_lines, write_balance_lines, BalanceLine};
