//! Command-line interface definitions for pulse_news.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Topics can be given directly with repeated `--topic` flags or through a
//! YAML config file; flags win when both are present.

use clap::Parser;

/// Command-line arguments for the pulse_news application.
///
/// # Examples
///
/// ```sh
/// # Search two topics and write results under ./output
/// pulse_news -t "Ukraine" -t "Defense spending" -o ./output
///
/// # Topics from a config file, resolving links with a headless browser
/// pulse_news -c pulse.yaml --rendered
///
/// # Metadata only, skip body fetching
/// pulse_news -t economy --skip-bodies
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Topic to search for (repeatable; overrides topics from the config file)
    #[arg(short, long = "topic")]
    pub topics: Vec<String>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output directory for the JSON results file
    #[arg(short, long, default_value = "./output")]
    pub output_dir: String,

    /// Resolve aggregator links with a headless browser session
    #[arg(long)]
    pub rendered: bool,

    /// Collect article metadata without fetching body text
    #[arg(long)]
    pub skip_bodies: bool,

    /// Similarity score (0-100) at or above which titles are duplicates
    #[arg(long)]
    pub fuzzy_threshold: Option<u8>,
}
