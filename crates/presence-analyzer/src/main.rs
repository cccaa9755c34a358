mod bootstrap;
mod report;

use anyhow::{Context, Result};
use presence_core::settings::Settings;
use presence_runtime::data_manager::DataManager;

fn main() -> Result<()> {
    let settings = Settings::load();
    settings.validate()?;

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Presence analyzer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Attendance: {}, directory: {}, cache window: {}s",
        settings.data_csv.display(),
        settings.data_xml.display(),
        settings.cache_ttl,
    );

    let manager = DataManager::new(settings.data_sources(), settings.cache_ttl());

    let value = report::run(&settings.command, &manager)
        .with_context(|| format!("{:?} failed", settings.command))?;

    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}
