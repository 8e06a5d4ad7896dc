use std::fs::{self, File};
use std::path::Path;

use grid_admin::AppError;
use grid_admin::app::App;
use grid_admin::config::AppConfig;
use grid_admin::paths;
use grid_admin::settings::{Preferences, SqlitePreferences};
use grid_admin::store::Store;
use log::info;
use simplelog::{Config, WriteLogger};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config_path = paths::config_file().ok_or(AppError::NoHomeDir)?;
    let config = AppConfig::load(&config_path)?;
    init_logging(&config)?;
    info!("config: {}", config_path.display());

    let database = config.database_path()?;
    ensure_parent(&database)?;
    let store = Store::open(&database).await?;
    info!("store: {}", database.display());

    let prefs_path = paths::preferences_db().ok_or(AppError::NoHomeDir)?;
    ensure_parent(&prefs_path)?;
    let prefs = Preferences::new(SqlitePreferences::open(&prefs_path).await?);

    let (tx, rx) = mpsc::unbounded_channel();
    App::new(config, store, prefs, tx).await?.run(rx).await
}

fn init_logging(config: &AppConfig) -> Result<(), AppError> {
    paths::rotate_logs();
    let path = paths::log_file().ok_or(AppError::NoHomeDir)?;
    ensure_parent(&path)?;
    WriteLogger::init(config.level()?, Config::default(), File::create(path)?)?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
