use crate::application::models::identity::resolve_identity;
use crate::application::models::target::Target;
use crate::error::AppError;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct TargetRow {
    #[serde(default)]
    profile: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Loads targets from a CSV file with a `profile` column and an optional `message` column.
///
/// Rows with a blank profile are skipped silently, rows whose profile cannot be
/// resolved are logged and skipped. A blank message falls back to `default_message`.
pub fn load_csv_targets(path: impl AsRef<Path>, default_message: &str) -> Result<Vec<Target>, AppError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let targets = parse_csv_targets(&content, default_message)?;
    debug!("Loaded {} targets from {}", targets.len(), path.display());
    Ok(targets)
}

pub fn parse_csv_targets(content: &str, default_message: &str) -> Result<Vec<Target>, AppError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut targets = Vec::new();
    for row in reader.deserialize::<TargetRow>() {
        let row = row?;
        let profile = row.profile.unwrap_or_default();
        if profile.is_empty() {
            continue;
        }
        let message = row
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| default_message.to_string());

        match resolve_identity(&profile) {
            Ok(steam_id) => targets.push(Target::new(steam_id, message)),
            Err(e) => warn!("Skipping unsupported profile entry: {}", e.input),
        }
    }
    Ok(targets)
}
