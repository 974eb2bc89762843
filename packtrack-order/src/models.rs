use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use packtrack_core::{Header, RawRow};
use serde::{Deserialize, Serialize};

/// Packing state of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PackStatus {
    Pending,
    Packed,
}

impl PackStatus {
    /// Label shown to operators and written into exports.
    pub fn label(&self) -> &'static str {
        match self {
            PackStatus::Pending => "待打包",
            PackStatus::Packed => "已打包",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            PackStatus::Pending => PackStatus::Packed,
            PackStatus::Packed => PackStatus::Pending,
        }
    }
}

impl fmt::Display for PackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackStatus::Pending => write!(f, "pending"),
            PackStatus::Packed => write!(f, "packed"),
        }
    }
}

impl FromStr for PackStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(PackStatus::Pending),
            "packed" => Ok(PackStatus::Packed),
            other => Err(format!("unknown pack status: {}", other)),
        }
    }
}

/// One tracked row of an imported form export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: u64,
    pub row_data: RawRow,
    pub headers: Header,
    pub status: PackStatus,
    #[serde(default)]
    pub notes: String,
    pub import_time: DateTime<Utc>,
}

impl Order {
    pub fn new(id: u64, row_data: RawRow, headers: Header) -> Self {
        Self {
            id,
            row_data,
            headers,
            status: PackStatus::Pending,
            notes: String::new(),
            import_time: Utc::now(),
        }
    }

    pub fn update_status(&mut self, status: PackStatus) {
        self.status = status;
    }

    /// Cell under the first column called `name` in this order's own header.
    pub fn field(&self, name: &str) -> Option<&str> {
        let index = self.headers.position(name)?;
        self.row_data.get(index).map(String::as_str)
    }

    /// All cells joined by single spaces, lower-cased. Search and category
    /// filters match against this.
    pub fn row_text(&self) -> String {
        self.row_data.join(" ").to_lowercase()
    }

    /// Cells laid out for `target`.
    ///
    /// Orders imported under the same header are returned as-is. Orders from
    /// a batch with a different header are projected column by column: each
    /// target column takes the first unused cell whose own column has the same
    /// name, or an empty string.
    pub fn cells_for(&self, target: &Header) -> Cow<'_, [String]> {
        if self.headers.shares_with(target) || self.headers == *target {
            return Cow::Borrowed(&self.row_data);
        }

        let mut used = vec![false; self.headers.len()];
        let projected = target
            .names()
            .iter()
            .map(|name| {
                let hit = self
                    .headers
                    .names()
                    .iter()
                    .enumerate()
                    .position(|(i, own)| !used[i] && own == name);
                match hit {
                    Some(i) => {
                        used[i] = true;
                        self.row_data.get(i).cloned().unwrap_or_default()
                    }
                    None => String::new(),
                }
            })
            .collect();
        Cow::Owned(projected)
    }
}

/// Counts shown in the summary bar
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderStats {
    pub total: usize,
    pub pending: usize,
    pub packed: usize,
}
