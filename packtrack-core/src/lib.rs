pub mod tokenizer;
pub mod header;
pub mod normalize;
pub mod repository;

pub use tokenizer::{tokenize, RawRow};
pub use header::{resolve_header, Header, HeaderResolution};
pub use normalize::{normalize, parse_batch, ParsedBatch, RaggedRow};
pub use repository::{InMemoryStore, KeyValueStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Input is empty")]
    EmptyInput,
    #[error("No header row could be resolved")]
    MissingHeader,
    #[error("No data rows found")]
    NoDataRows,
}

pub type CoreResult<T> = Result<T, CoreError>;
