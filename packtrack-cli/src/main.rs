use clap::Parser;
use packtrack_cli::{cli::Cli, commands, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match packtrack_store::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let level = &config.logging.level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "packtrack_cli={0},packtrack_order={0},packtrack_core={0},packtrack_store={0}",
                    level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Data dir: {}", config.storage.data_dir.display());

    let mut state = match AppState::open(config).await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
    };

    match commands::run(cli.command, &mut state).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            let code = e.exit_code();
            eprintln!("{}", e);
            std::process::exit(code);
        }
    }
}
