use tracing::debug;

/// One CSV line as positional string cells.
pub type RawRow = Vec<String>;

/// Split CSV text into rows of fields.
///
/// Quoted fields may contain commas, newlines and doubled quotes. Rows whose
/// fields are all blank are dropped. An unterminated quote is not an error:
/// whatever was accumulated is flushed as the last field.
pub fn tokenize(text: &str) -> Vec<RawRow> {
    let mut rows = Vec::new();
    let mut row: RawRow = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => row.push(std::mem::take(&mut field)),
            '\r' | '\n' => {
                // CRLF and lone CR both count as a single LF.
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if in_quotes {
                    field.push('\n');
                } else {
                    row.push(std::mem::take(&mut field));
                    push_row(&mut rows, std::mem::take(&mut row));
                }
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row);
    }

    debug!("Tokenized {} rows from {} bytes", rows.len(), text.len());
    rows
}

fn push_row(rows: &mut Vec<RawRow>, row: RawRow) {
    if row.iter().any(|f| !f.trim().is_empty()) {
        rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_quoted_newline_is_data() {
        let rows = tokenize("\"a\nb\",c\nd,e");
        assert_eq!(rows, vec![row(&["a\nb", "c"]), row(&["d", "e"])]);
    }

    #[test]
    fn test_embedded_comma_and_escaped_quote() {
        let rows = tokenize("\"x, y\",\"say \"\"hi\"\"\"\n");
        assert_eq!(rows, vec![row(&["x, y", "say \"hi\""])]);
    }

    #[test]
    fn test_blank_rows_skipped() {
        let rows = tokenize("a,b\n,,\n  , \n\nc,d\n");
        assert_eq!(rows, vec![row(&["a", "b"]), row(&["c", "d"])]);
    }

    #[test]
    fn test_line_endings_normalized() {
        let rows = tokenize("a,b\r\nc,d\re,f");
        assert_eq!(rows, vec![row(&["a", "b"]), row(&["c", "d"]), row(&["e", "f"])]);

        // CRLF inside quotes becomes a single LF
        let rows = tokenize("\"line1\r\nline2\",x");
        assert_eq!(rows, vec![row(&["line1\nline2", "x"])]);
    }

    #[test]
    fn test_trailing_empty_field_kept() {
        let rows = tokenize("a,");
        assert_eq!(rows, vec![row(&["a", ""])]);
    }

    #[test]
    fn test_unterminated_quote_flushes() {
        let rows = tokenize("a,\"open\nstill open");
        assert_eq!(rows, vec![row(&["a", "open\nstill open"])]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("\n\n").is_empty());
    }
}
