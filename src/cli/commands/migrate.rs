use anyhow::Context;
use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    DatabaseManager::migrate(&pool).await?;

    let url = config.database.url.as_deref().unwrap_or_default();
    output_success(
        output_format,
        "Migrations applied",
        Some(json!({ "database": DatabaseManager::redacted(url)? })),
    )
}
