//! Catalog mapping CSV file.
//!
//! Header `official,internal,usage`; one row per mapped account. The
//! mapping set is order-independent, so round trips compare as sets.

use serde::{Deserialize, Serialize};

use super::error::InterchangeError;

const HEADER: &str = "official,internal,usage";

/// One mapping row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappingRow {
    /// Official catalog code.
    pub official: String,
    /// Internal account code.
    pub internal: String,
    /// Usage note from the official catalog.
    pub usage: String,
}

/// Renders mapping rows as CSV with the canonical header.
///
/// # Errors
///
/// Returns `Csv` on writer failure.
pub fn write_mapping_csv(rows: &[MappingRow]) -> Result<String, InterchangeError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    // Written explicitly so an empty mapping set still round-trips.
    writer.write_record(["official", "internal", "usage"])?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| InterchangeError::MalformedRow {
            row: 0,
            reason: e.to_string(),
        })?;
    // The writer only ever emits the UTF-8 we fed it.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parses a mapping CSV.
///
/// The header must match exactly; every row must carry a non-empty
/// official and internal code. The first malformed row fails the whole
/// file.
///
/// # Errors
///
/// Returns `BadHeader`, `MalformedRow` with the 1-indexed row counting
/// the header, or `Csv`.
pub fn read_mapping_csv(input: &str) -> Result<Vec<MappingRow>, InterchangeError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();
    let found: Vec<&str> = headers.iter().collect();
    if found != ["official", "internal", "usage"] {
        return Err(InterchangeError::BadHeader { expected: HEADER });
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let row = index + 2;
        let record = record?;
        if record.len() != 3 {
            return Err(InterchangeError::MalformedRow {
                row,
                reason: format!("expected 3 fields, found {}", record.len()),
            });
        }
        let parsed: MappingRow = record.deserialize(Some(&headers))?;
        if parsed.official.is_empty() || parsed.internal.is_empty() {
            return Err(InterchangeError::MalformedRow {
                row,
                reason: "empty code field".to_string(),
            });
        }
        rows.push(parsed);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn row(official: &str, internal: &str, usage: &str) -> MappingRow {
        MappingRow {
            official: official.to_string(),
            internal: internal.to_string(),
            usage: usage.to_string(),
        }
    }

    #[test]
    fn test_read_well_formed_file() {
        let input = "official,internal,usage\n\
                     601.56,5001,Administrative expenses\n\
                     102.01,1001,Bank accounts\n";
        let rows = read_mapping_csv(input).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], row("601.56", "5001", "Administrative expenses"));
    }

    #[test]
    fn test_wrong_header_rejected() {
        let input = "sat,cuenta,uso\n601.56,5001,x\n";
        assert!(matches!(
            read_mapping_csv(input),
            Err(InterchangeError::BadHeader { .. })
        ));
    }

    #[test]
    fn test_short_row_rejected_with_row_number() {
        let input = "official,internal,usage\n601.56,5001,ok\n102.01,1001\n";
        assert!(matches!(
            read_mapping_csv(input),
            Err(InterchangeError::MalformedRow { row: 3, .. })
        ));
    }

    #[test]
    fn test_empty_code_rejected() {
        let input = "official,internal,usage\n,5001,x\n";
        assert!(matches!(
            read_mapping_csv(input),
            Err(InterchangeError::MalformedRow { row: 2, .. })
        ));
    }

    #[test]
    fn test_round_trip_is_order_independent() {
        let rows = vec![
            row("601.56", "5001", "Administrative expenses"),
            row("102.01", "1001", "Bank accounts"),
            row("401.01", "4000", "Revenue, with comma"),
        ];
        let text = write_mapping_csv(&rows).unwrap();
        let parsed = read_mapping_csv(&text).unwrap();

        let original: HashSet<MappingRow> = rows.into_iter().collect();
        let reread: HashSet<MappingRow> = parsed.into_iter().collect();
        assert_eq!(original, reread);
    }

    #[test]
    fn test_quoted_commas_survive() {
        let rows = vec![row("601.56", "5001", "fees, licences, and dues")];
        let text = write_mapping_csv(&rows).unwrap();
        let parsed = read_mapping_csv(&text).unwrap();
        assert_eq!(parsed[0].usage, "fees, licences, and dues");
    }
}
