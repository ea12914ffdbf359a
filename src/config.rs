//! Run configuration loaded from a YAML file.
//!
//! Every field has a sensible default, so a config file only needs to name
//! the values it overrides. Topics given on the command line take precedence
//! over topics from the file.
//!
//! ```yaml
//! topics:
//!   - Ukraine
//!   - Defense spending
//! language: en
//! country: US
//! period: 7d
//! max_results: 100
//! fuzzy_threshold: 87
//! ```

use serde::Deserialize;
use std::error::Error;

use crate::dedup::DEFAULT_FUZZY_THRESHOLD;

/// Configuration for one collection run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Topic queries to search for.
    pub topics: Vec<String>,
    /// Feed language code (`hl` parameter).
    pub language: String,
    /// Feed country code (`gl` parameter).
    pub country: String,
    /// Recency window for search results, e.g. `7d`.
    pub period: String,
    /// Maximum candidates taken per topic.
    pub max_results: usize,
    /// Similarity score (0-100) at or above which titles are duplicates.
    pub fuzzy_threshold: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            topics: Vec::new(),
            language: "en".to_string(),
            country: "US".to_string(),
            period: "7d".to_string(),
            max_results: 100,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

/// Load configuration from a YAML file.
pub async fn load_config(path: &str) -> Result<AppConfig, Box<dyn Error>> {
    let contents = tokio::fs::read_to_string(path).await?;
    let config: AppConfig = serde_yaml::from_str(&contents)?;
    Ok(config)
}
