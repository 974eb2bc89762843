pub mod app_config;
pub mod file_repo;

pub use app_config::Config;
pub use file_repo::FileStore;
