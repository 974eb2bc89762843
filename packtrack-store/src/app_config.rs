use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub orders_key: String,
    pub counter_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    /// File name prefix, e.g. `已打包订单_2024-03-09.csv`
    pub label: String,
    #[serde(default = "default_bom")]
    pub bom: bool,
}

fn default_bom() -> bool { true }

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Self::builder()?
            .add_source(config::File::with_name("config/default").required(false))
            // Per-mode overrides, e.g. config/development.toml
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // PACKTRACK__STORAGE__DATA_DIR=/tmp/packtrack sets storage.data_dir
            .add_source(config::Environment::with_prefix("PACKTRACK").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Built-in defaults only, no files or environment.
    pub fn defaults() -> Result<Self, config::ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("storage.data_dir", ".packtrack")?
            .set_default("storage.orders_key", "orders")?
            .set_default("storage.counter_key", "currentId")?
            .set_default("export.label", "已打包订单")?
            .set_default("export.bom", true)?
            .set_default("logging.level", "info")
    }
}
