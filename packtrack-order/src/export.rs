use chrono::NaiveDate;
use packtrack_core::Header;

use crate::manager::OrderStore;
use crate::models::{Order, PackStatus};

pub const SEQUENCE_COLUMN: &str = "序号";
pub const STATUS_COLUMN: &str = "打包状态";
pub const DEFAULT_EXPORT_LABEL: &str = "已打包订单";

const BOM: char = '\u{feff}';

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No header has been imported; nothing can be exported")]
    SchemaMissing,
    #[error("There are no packed orders to export")]
    NothingToExport,
}

/// Serialize orders as CSV with every cell quoted.
///
/// The first row is `序号, <header...>, 打包状态`; each order contributes
/// `id, <cells...>, status label`. Lines are joined with `\n` and there is no
/// trailing newline.
pub fn export_csv<'a, I>(orders: I, header: &Header) -> String
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut lines = Vec::new();

    let header_line = std::iter::once(SEQUENCE_COLUMN)
        .chain(header.names().iter().map(String::as_str))
        .chain(std::iter::once(STATUS_COLUMN))
        .map(quote)
        .collect::<Vec<_>>()
        .join(",");
    lines.push(header_line);

    for order in orders {
        let id = order.id.to_string();
        let cells = order.cells_for(header);
        let line = std::iter::once(id.as_str())
            .chain(cells.iter().map(String::as_str))
            .chain(std::iter::once(order.status.label()))
            .map(quote)
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

/// Export every packed order against the store's current header.
pub fn export_packed(store: &OrderStore) -> Result<String, ExportError> {
    let header = store.current_header().ok_or(ExportError::SchemaMissing)?;
    let packed: Vec<&Order> = store
        .snapshot()
        .iter()
        .filter(|o| o.status == PackStatus::Packed)
        .collect();
    if packed.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    tracing::info!("Exporting {} packed orders", packed.len());
    Ok(export_csv(packed, header))
}

/// `<label>_<YYYY-MM-DD>.csv`
pub fn export_filename(label: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", label, date.format("%Y-%m-%d"))
}

/// Prefix a byte-order mark so spreadsheet apps pick UTF-8.
pub fn with_bom(csv: &str) -> String {
    let mut out = String::with_capacity(csv.len() + BOM.len_utf8());
    out.push(BOM);
    out.push_str(csv);
    out
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
