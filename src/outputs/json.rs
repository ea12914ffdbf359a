//! JSON output generation.
//!
//! Serializes a run's collected articles for consumption by external
//! persistence and export tooling. Files are organized by date with edition
//! names:
//!
//! ```text
//! output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     ├── afternoon.json
//!     └── evening.json
//! ```

use crate::models::ResultSet;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`ResultSet`] to a JSON file with date-based directory structure.
///
/// Creates the necessary directory structure and writes the serialized
/// articles. The file path is determined by the date and time-of-day in the
/// `ResultSet`: `{output_dir}/{date}/{time_of_day}.json`.
///
/// # Returns
///
/// `Ok(())` on success, or an error if directory creation or file writing fails.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_results(results: &ResultSet, output_dir: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string(results)?;

    let full_dir = format!("{}/{}", output_dir, results.local_date);
    info!(%full_dir, "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_dir).await {
        error!(%full_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_filename = format!("{}/{}.json", full_dir, results.time_of_day);
    info!(path = %output_filename, "Writing JSON");
    fs::write(&output_filename, json).await?;
    info!(path = %output_filename, article_count = results.articles.len(), "Wrote JSON results file");

    Ok(())
}
