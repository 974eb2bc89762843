use packtrack_order::{
    export_filename, export_packed, import_sources, with_bom, ExportError, ImportSource, Order,
    OrderQuery, PackStatus,
};

use crate::cli::Commands;
use crate::error::AppError;
use crate::state::AppState;

/// Run one command against the state and return what should be printed.
pub async fn run(command: Commands, state: &mut AppState) -> Result<String, AppError> {
    match command {
        Commands::Import { files } => {
            let sources = files.into_iter().map(ImportSource::File).collect();
            import(state, sources).await
        }
        Commands::List { search, status, category } => {
            let query = OrderQuery::new(search, status.into(), category.into());
            list(state, &query)
        }
        Commands::Pack { id } => set_status(state, id, PackStatus::Packed).await,
        Commands::Unpack { id } => set_status(state, id, PackStatus::Pending).await,
        Commands::Toggle { id } => {
            let status = state.store.toggle_status(id).ok_or(AppError::NotFound(id))?;
            state.persist().await?;
            Ok(format!("Order {} is now {}", id, status.label()))
        }
        Commands::Note { id, text } => {
            if !state.store.set_notes(id, &text) {
                return Err(AppError::NotFound(id));
            }
            state.persist().await?;
            Ok(format!("Notes saved for order {}", id))
        }
        Commands::Export { out } => {
            let csv = match export_packed(&state.store) {
                Ok(csv) => csv,
                Err(ExportError::SchemaMissing) => return Err(AppError::SchemaMissing),
                Err(e @ ExportError::NothingToExport) => {
                    return Err(AppError::ValidationError(e.to_string()))
                }
            };
            let today = chrono::Utc::now().date_naive();
            let name = export_filename(&state.config.export.label, today);
            let body = if state.config.export.bom { with_bom(&csv) } else { csv };
            let path = out.join(name);
            tokio::fs::write(&path, body).await?;
            Ok(format!("Exported to {}", path.display()))
        }
        Commands::Stats => {
            let stats = state.store.stats();
            Ok(format!(
                "total: {}\npending: {}\npacked: {}",
                stats.total, stats.pending, stats.packed
            ))
        }
        Commands::Debug => Ok(state.store.describe()),
        Commands::Clear => {
            state.store.clear();
            state.repo.clear().await?;
            Ok("All orders cleared".to_string())
        }
    }
}

pub async fn import(state: &mut AppState, sources: Vec<ImportSource>) -> Result<String, AppError> {
    let report = import_sources(&mut state.store, sources).await;
    if report.imported == 0 {
        return Err(AppError::ValidationError(report.summary()));
    }
    state.persist().await?;

    let mut out = report.summary();
    for (source, row) in &report.ragged {
        out.push_str(&format!(
            "\n  {} row {}: {} cells, header has {}",
            source, row.row, row.actual, row.expected
        ));
    }
    Ok(out)
}

async fn set_status(
    state: &mut AppState,
    id: u64,
    status: PackStatus,
) -> Result<String, AppError> {
    if !state.store.set_status(id, status) {
        return Err(AppError::NotFound(id));
    }
    state.persist().await?;
    Ok(format!("Order {} is now {}", id, status.label()))
}

fn list(state: &AppState, query: &OrderQuery) -> Result<String, AppError> {
    if state.store.is_empty() {
        return Ok("No orders yet, import a CSV file first".to_string());
    }
    let header = state.store.current_header().ok_or(AppError::SchemaMissing)?;

    let columns: Vec<String> = header
        .names()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if name.trim().is_empty() {
                format!("Column {}", i + 1)
            } else {
                name.clone()
            }
        })
        .collect();

    let shown = state.store.filter(query);
    let mut lines = Vec::with_capacity(shown.len() + 2);
    lines.push(format!("# | {} | status | notes", columns.join(" | ")));
    lines.extend(shown.iter().map(|order| render_row(order, header)));
    lines.push(format!("{} of {} orders", shown.len(), state.store.len()));
    Ok(lines.join("\n"))
}

fn render_row(order: &Order, header: &packtrack_core::Header) -> String {
    let cells: Vec<String> = order
        .cells_for(header)
        .iter()
        .map(|c| c.replace('\n', " / "))
        .collect();
    format!(
        "{} | {} | {} | {}",
        order.id,
        cells.join(" | "),
        order.status.label(),
        order.notes
    )
}
