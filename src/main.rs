use clap::Parser;

use admission_explorer_lib::{api, config, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = config::Cli::parse();
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = cli.into_config()?;
    if config.ecg_base_dir.is_none() {
        tracing::warn!("ECG base folder not provided; /api/ecg will answer 503");
    }

    api::serve(config).await?;
    Ok(())
}
