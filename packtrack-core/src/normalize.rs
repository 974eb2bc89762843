use tracing::{debug, warn};

use crate::header::{resolve_header, Header};
use crate::tokenizer::{tokenize, RawRow};
use crate::{CoreError, CoreResult};

/// Pad `row` with empty cells up to the header width.
///
/// Rows wider than the header are returned untouched so the mismatch stays
/// visible to the caller.
pub fn normalize(mut row: RawRow, header: &Header) -> RawRow {
    if row.len() < header.len() {
        row.resize(header.len(), String::new());
    }
    row
}

/// A data row that still has more cells than the header after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaggedRow {
    /// 1-based position among the batch's data rows.
    pub row: usize,
    pub expected: usize,
    pub actual: usize,
}

/// Header plus normalized data rows of one CSV source.
#[derive(Debug, Clone)]
pub struct ParsedBatch {
    pub header: Header,
    pub rows: Vec<RawRow>,
    pub ragged: Vec<RaggedRow>,
}

impl ParsedBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Run tokenizer, header resolver and normalizer over one CSV text.
///
/// A leading UTF-8 byte-order mark is dropped before tokenizing.
pub fn parse_batch(text: &str) -> CoreResult<ParsedBatch> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(CoreError::EmptyInput);
    }

    let all_rows = tokenize(text);
    if all_rows.is_empty() {
        return Err(CoreError::MissingHeader);
    }

    let resolution = resolve_header(&all_rows).ok_or(CoreError::NoDataRows)?;
    let header = resolution.header;

    let rows: Vec<RawRow> = all_rows
        .into_iter()
        .skip(resolution.data_start)
        .map(|row| normalize(row, &header))
        .collect();
    if rows.is_empty() {
        return Err(CoreError::NoDataRows);
    }

    let ragged: Vec<RaggedRow> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.len() != header.len())
        .map(|(i, r)| RaggedRow {
            row: i + 1,
            expected: header.len(),
            actual: r.len(),
        })
        .collect();
    if !ragged.is_empty() {
        warn!("{} rows have more cells than the header: {:?}", ragged.len(), ragged);
    }

    debug!(
        "Parsed batch: {} columns, {} data rows starting at row {}",
        header.len(),
        rows.len(),
        resolution.data_start
    );

    Ok(ParsedBatch { header, rows, ragged })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Header {
        Header::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_normalize_pads_short_rows() {
        let h = header(&["a", "b", "c"]);
        let row = normalize(vec!["1".to_string()], &h);
        assert_eq!(row, vec!["1", "", ""]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let h = header(&["a", "b"]);
        let once = normalize(vec!["1".to_string()], &h);
        let twice = normalize(once.clone(), &h);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_never_truncates() {
        let h = header(&["a"]);
        let row = normalize(vec!["1".to_string(), "2".to_string()], &h);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_parse_batch_reports_ragged_rows() {
        let text = "Timestamp,Name\n01/02/2024,Alice\n01/03/2024,Bob,extra\n01/04/2024\n";
        let batch = parse_batch(text).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.rows[2], vec!["01/04/2024", ""]);
        assert_eq!(
            batch.ragged,
            vec![RaggedRow { row: 2, expected: 2, actual: 3 }]
        );
    }

    #[test]
    fn test_parse_batch_drops_leading_bom() {
        let batch = parse_batch("\u{feff}Timestamp,Name\n01/02/2024,Alice\n").unwrap();

        assert_eq!(batch.header.names(), &["Timestamp", "Name"]);
        assert_eq!(batch.header.position("Timestamp"), Some(0));
        assert!(matches!(parse_batch("\u{feff}"), Err(CoreError::EmptyInput)));
    }

    #[test]
    fn test_parse_batch_errors() {
        assert!(matches!(parse_batch("  \n"), Err(CoreError::EmptyInput)));
        assert!(matches!(parse_batch(",,\n , \n"), Err(CoreError::MissingHeader)));
        assert!(matches!(parse_batch("Timestamp,Name\n"), Err(CoreError::NoDataRows)));
        // Two header rows and nothing else
        assert!(matches!(
            parse_batch("Group,\n,Postage\n"),
            Err(CoreError::NoDataRows)
        ));
    }
}
