use std::sync::Arc;
use std::time::Duration;

use eyre::Result;
use kiosk_api::Backend;
use kiosk_api::HttpBackend;
use kiosk_api::mock::MockBackend;
use kiosk_app::config;
use kiosk_app::driver::Kiosk;
use kiosk_questionnaire::QuestionBank;
use kiosk_scanner::ScanSettings;
use kiosk_storage::SessionRepository;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = config::load_or_init()?.with_env();
    init_tracing(config.json_logs);
    tracing::info!(config = ?config.redacted(), "kiosk starting");

    let backend: Arc<dyn Backend> = if config.api_base_url.is_empty() {
        tracing::warn!("no api_base_url configured, running against the in-memory backend");
        Arc::new(MockBackend::new())
    } else {
        Arc::new(HttpBackend::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        ))
    };
    let repo = Arc::new(SessionRepository::on_disk(&config.data_dir()?)?);
    let bank = Arc::new(QuestionBank::bundled()?);

    // No camera SDK binding ships with the terminal build; the face scan
    // step is skipped.
    let settings = ScanSettings::new(&config.scanner_api_key, &config.host_url);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut kiosk = Kiosk::new(stdin, std::io::stdout(), backend, repo, bank, settings)
        .with_language(config.language);

    kiosk.run().await?;
    tracing::info!("input closed, shutting down");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
