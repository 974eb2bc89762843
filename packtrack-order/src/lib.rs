pub mod models;
pub mod manager;
pub mod search;
pub mod export;
pub mod import;
pub mod persistence;

pub use models::{Order, OrderStats, PackStatus};
pub use manager::OrderStore;
pub use search::{filter_orders, CategoryFilter, OrderQuery, StatusFilter};
pub use export::{export_csv, export_filename, export_packed, with_bom, ExportError};
pub use import::{import_sources, ImportError, ImportReport, ImportSource, SourceFailure};
pub use persistence::{PersistenceError, SnapshotRepository};
