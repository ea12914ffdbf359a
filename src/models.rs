//! Data models for collected articles and their exported representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`SearchHit`]: A raw candidate tuple returned by the news index for a topic
//! - [`Article`]: An accepted article record, with its body text filled in later
//! - [`ResultSet`]: The collection of articles produced by one run
//!
//! An [`Article`] starts life without a body; the body is written exactly once
//! after the fetch layer has retrieved and cleaned the document text (or
//! produced a failure marker in its place).

use serde::{Deserialize, Serialize};

/// A candidate article returned by the news index for one topic query.
///
/// These are raw tuples straight out of the search feed; they have not yet
/// passed duplicate-title filtering and carry no topic association.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The article headline as it appeared in the feed.
    pub title: String,
    /// The article URL (for aggregator feeds, an indirection link).
    pub url: String,
    /// The publishing outlet's name.
    pub publisher: String,
}

/// An accepted article record.
///
/// Created by the collector from a [`SearchHit`] once the title has cleared
/// duplicate filtering. The `topic` field records which query produced it.
///
/// # Body lifecycle
///
/// `body` is `None` until a fetch is attempted. After a fetch it holds either
/// the cleaned document text, a human-readable failure marker, or an empty
/// string when the rendered path could not resolve the page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Article {
    /// The article headline.
    pub title: String,
    /// The article URL.
    pub url: String,
    /// The publishing outlet's name.
    pub publisher: String,
    /// The topic query that surfaced this article.
    pub topic: String,
    /// Full article text, populated by the fetch layer.
    pub body: Option<String>,
}

/// The collection of articles produced by a single run.
///
/// Each execution of the application produces one `ResultSet`, serialized to
/// JSON for downstream consumers.
///
/// # Edition naming
///
/// The `time_of_day` field categorizes runs as:
/// - `"morning"`: 00:00 - 08:00
/// - `"afternoon"`: 08:00 - 16:00
/// - `"evening"`: 16:00 - 24:00
#[derive(Debug, Deserialize, Serialize)]
pub struct ResultSet {
    /// The date of the run in `YYYY-MM-DD` format.
    pub local_date: String,
    /// The time of day category: "morning", "afternoon", or "evening".
    pub time_of_day: String,
    /// The exact local time of the run.
    pub local_time: String,
    /// The collected articles.
    pub articles: Vec<Article>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_creation() {
        let article = Article {
            title: "Fed raises rates".to_string(),
            url: "https://example.com/fed".to_string(),
            publisher: "Example News".to_string(),
            topic: "economy".to_string(),
            body: None,
        };
        assert_eq!(article.title, "Fed raises rates");
        assert!(article.body.is_none());
    }

    #[test]
    fn test_result_set_serialization() {
        let results = ResultSet {
            local_date: "2025-05-06".to_string(),
            time_of_day: "evening".to_string(),
            local_time: "20:30:00".to_string(),
            articles: vec![Article {
                title: "Test".to_string(),
                url: "https://example.com".to_string(),
                publisher: "Example".to_string(),
                topic: "testing".to_string(),
                body: Some("Body text".to_string()),
            }],
        };

        let json = serde_json::to_string(&results).unwrap();
        assert!(json.contains("2025-05-06"));
        assert!(json.contains("evening"));
        assert!(json.contains("Body text"));
    }

    #[test]
    fn test_result_set_deserialization() {
        let json = r#"{
            "local_date": "2025-05-06",
            "time_of_day": "morning",
            "local_time": "08:00:00",
            "articles": []
        }"#;

        let results: ResultSet = serde_json::from_str(json).unwrap();
        assert_eq!(results.local_date, "2025-05-06");
        assert_eq!(results.time_of_day, "morning");
        assert_eq!(results.articles.len(), 0);
    }

    #[test]
    fn test_article_body_round_trip() {
        let article = Article {
            title: "Round trip".to_string(),
            url: "https://example.com/rt".to_string(),
            publisher: "Example".to_string(),
            topic: "testing".to_string(),
            body: Some("Full content".to_string()),
        };

        let json = serde_json::to_string(&article).unwrap();
        let deserialized: Article = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.body.as_deref(), Some("Full content"));
        assert_eq!(deserialized.topic, "testing");
    }
}
