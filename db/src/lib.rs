pub mod models;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection};
use std::path::Path;
use util::config;

/// Opens the application database described by `DATABASE_PATH`.
///
/// The value may be a full DSN (`sqlite:`, `postgres://`, `mysql://`) or a
/// bare SQLite file path. File paths get their parent directory created and
/// `mode=rwc` appended so a first run starts from an empty database.
pub async fn connect() -> DatabaseConnection {
    let configured = config::database_path();
    let url = if configured.contains("://") || configured.starts_with("sqlite:") {
        configured
    } else {
        if let Some(parent) = Path::new(&configured).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        format!("sqlite://{configured}?mode=rwc")
    };

    Database::connect(&url)
        .await
        .expect("Failed to connect to database")
}
