use std::path::PathBuf;

use packtrack_core::{parse_batch, CoreError, ParsedBatch, RaggedRow};
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::manager::OrderStore;

/// Where one CSV blob comes from
#[derive(Debug, Clone)]
pub enum ImportSource {
    File(PathBuf),
    Text { name: String, content: String },
}

impl ImportSource {
    pub fn name(&self) -> String {
        match self {
            ImportSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            ImportSource::Text { name, .. } => name.clone(),
        }
    }

    async fn read(self) -> Result<String, ImportError> {
        match self {
            ImportSource::File(path) => tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| ImportError::Read(e.to_string())),
            ImportSource::Text { content, .. } => Ok(content),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to read file: {0}")]
    Read(String),
    #[error(transparent)]
    Parse(#[from] CoreError),
    #[error("Import task aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Clone)]
pub struct SourceFailure {
    pub source: String,
    pub message: String,
}

/// Aggregated outcome of one import run
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub run_id: Uuid,
    pub sources: usize,
    pub imported: usize,
    pub failures: Vec<SourceFailure>,
    pub ragged: Vec<(String, RaggedRow)>,
}

impl ImportReport {
    pub fn succeeded(&self) -> usize {
        self.sources - self.failures.len()
    }

    pub fn summary(&self) -> String {
        let mut text = format!(
            "Imported {} orders from {} of {} files",
            self.imported,
            self.succeeded(),
            self.sources
        );
        if !self.failures.is_empty() {
            text.push_str("\nFailures:");
            for failure in &self.failures {
                text.push_str(&format!("\n  {}: {}", failure.source, failure.message));
            }
        }
        text
    }
}

/// Read and parse every source concurrently, then apply the good ones to the
/// store in source order.
///
/// The store is untouched until every source has settled. A failing source is
/// recorded in the report and does not affect the others.
pub async fn import_sources(store: &mut OrderStore, sources: Vec<ImportSource>) -> ImportReport {
    let run_id = Uuid::new_v4();
    info!(%run_id, "Importing {} sources", sources.len());

    let names: Vec<String> = sources.iter().map(ImportSource::name).collect();
    let mut tasks = JoinSet::new();
    for (index, source) in sources.into_iter().enumerate() {
        tasks.spawn(async move {
            let result = match source.read().await {
                Ok(text) => parse_batch(&text).map_err(ImportError::from),
                Err(e) => Err(e),
            };
            (index, result)
        });
    }

    // Completion order is arbitrary; slot results by source index.
    let mut slots: Vec<Option<Result<ParsedBatch, ImportError>>> =
        names.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => error!(%run_id, "Import task failed: {}", e),
        }
    }

    let settled: Vec<(String, Result<ParsedBatch, ImportError>)> = names
        .into_iter()
        .zip(slots)
        .map(|(name, slot)| {
            let result = slot.unwrap_or_else(|| {
                Err(ImportError::Aborted("task ended without a result".to_string()))
            });
            (name, result)
        })
        .collect();

    let mut report = ImportReport {
        run_id,
        sources: settled.len(),
        imported: 0,
        failures: Vec::new(),
        ragged: Vec::new(),
    };

    for (name, result) in settled {
        match result {
            Ok(batch) => {
                let count = batch.len();
                report
                    .ragged
                    .extend(batch.ragged.iter().cloned().map(|r| (name.clone(), r)));
                store.import_parsed(batch);
                report.imported += count;
                info!(%run_id, "{}: {} orders", name, count);
            }
            Err(e) => {
                match &e {
                    ImportError::Parse(_) => warn!(%run_id, "{}: {}", name, e),
                    _ => error!(%run_id, "{}: {}", name, e),
                }
                report.failures.push(SourceFailure {
                    source: name,
                    message: e.to_string(),
                });
            }
        }
    }

    report
}
