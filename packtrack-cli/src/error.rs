use std::fmt;

#[derive(Debug)]
pub enum AppError {
    NotFound(u64),
    ValidationError(String),
    SchemaMissing,
    Anyhow(anyhow::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::NotFound(_) => 2,
            AppError::ValidationError(_) => 3,
            AppError::SchemaMissing => 4,
            AppError::Anyhow(err) => {
                tracing::error!("Internal error: {:#}", err);
                1
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(id) => write!(f, "Order {} not found", id),
            AppError::ValidationError(msg) => write!(f, "{}", msg),
            AppError::SchemaMissing => {
                write!(f, "CSV header data is missing, please import the file again")
            }
            AppError::Anyhow(err) => write!(f, "{:#}", err),
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
