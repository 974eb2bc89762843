use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tokenizer::RawRow;

/// Words that only show up in the second line of a split header.
const CONTINUATION_MARKERS: [&str; 2] = ["postage", "payment proof"];

/// Resolved column names for one import batch.
///
/// Cloning is cheap; every order created from the same batch shares one
/// allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(Arc<Vec<String>>);

impl Header {
    pub fn new(names: Vec<String>) -> Self {
        Self(Arc::new(names))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Index of the first column with exactly this name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|n| n == name)
    }

    /// True when both handles point at the same batch header.
    pub fn shares_with(&self, other: &Header) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Vec<String>> for Header {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

/// Outcome of header detection over a tokenized file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderResolution {
    pub header: Header,
    /// Index of the first data row in the tokenized rows.
    pub data_start: usize,
}

/// Decide whether the header spans one or two physical rows.
///
/// The second row is treated as more header when it mentions one of the
/// continuation markers or when its first cell is not a `dd/dd/dddd` date.
/// Blank cells of the first row are then filled from the second. Fewer than
/// two rows yields `None`.
pub fn resolve_header(rows: &[RawRow]) -> Option<HeaderResolution> {
    if rows.len() < 2 {
        return None;
    }

    let mut names = rows[0].clone();
    let second = &rows[1];

    let second_text = second.join(" ").to_lowercase();
    let has_marker = CONTINUATION_MARKERS.iter().any(|m| second_text.contains(m));
    let starts_with_date = second.first().is_some_and(|f| starts_with_date(f));

    let data_start = if has_marker || !starts_with_date {
        for (i, name) in names.iter_mut().enumerate() {
            if !name.trim().is_empty() {
                continue;
            }
            if let Some(fill) = second.get(i).filter(|v| !v.trim().is_empty()) {
                *name = fill.clone();
            }
        }
        debug!("Merged two header rows into {} columns", names.len());
        2
    } else {
        1
    };

    Some(HeaderResolution {
        header: Header::new(names),
        data_start,
    })
}

/// `^\d{2}/\d{2}/\d{4}`
fn starts_with_date(field: &str) -> bool {
    let b = field.as_bytes();
    if b.len() < 10 {
        return false;
    }
    b.iter().take(10).enumerate().all(|(i, c)| match i {
        2 | 5 => *c == b'/',
        _ => c.is_ascii_digit(),
    })
}
