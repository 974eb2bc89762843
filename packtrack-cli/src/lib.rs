pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

pub use error::AppError;
pub use state::AppState;
