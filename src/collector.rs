//! Per-topic article collection and deduplication.
//!
//! [`ArticleCollector`] drives the news index once per topic, filters each
//! topic's candidates through a fresh [`SeenTitles`] scope, and tags accepted
//! candidates with their originating topic. Duplicate suppression during
//! collection is per-topic by design: the same story may be accepted under
//! two topics, and a final global pass then removes exact title repeats
//! across topics (first occurrence wins).
//!
//! A topic whose search fails is logged and skipped; it never aborts the
//! remaining topics.

use itertools::Itertools;
use tracing::{error, info, instrument};

use crate::dedup::SeenTitles;
use crate::index::NewsIndex;
use crate::models::Article;

/// Collects deduplicated article records across a set of topics.
#[derive(Debug)]
pub struct ArticleCollector<I> {
    index: I,
    fuzzy_threshold: u8,
}

impl<I: NewsIndex> ArticleCollector<I> {
    /// Create a collector over a news index.
    pub fn new(index: I, fuzzy_threshold: u8) -> Self {
        Self {
            index,
            fuzzy_threshold,
        }
    }

    /// Collect articles for every topic.
    ///
    /// Returns the accepted articles in encounter order, with near-duplicate
    /// titles suppressed within each topic and exact title repeats removed
    /// across topics. An empty vector means no candidates were found (or
    /// every topic's search failed).
    #[instrument(level = "info", skip_all, fields(topics = topics.len()))]
    pub async fn collect(&self, topics: &[String]) -> Vec<Article> {
        let mut rows: Vec<Article> = Vec::new();

        for topic in topics {
            info!(%topic, "Searching for news articles");
            let hits = match self.index.search(topic).await {
                Ok(hits) => hits,
                Err(e) => {
                    error!(%topic, error = %e, "News index query failed; skipping topic");
                    continue;
                }
            };
            info!(%topic, count = hits.len(), "Found candidate articles");

            let mut seen = SeenTitles::new(self.fuzzy_threshold);
            let mut accepted = 0usize;
            for hit in hits {
                if seen.is_duplicate(&hit.title) {
                    info!(title = %hit.title, "Skipping duplicate article");
                    continue;
                }
                rows.push(Article {
                    title: hit.title,
                    url: hit.url,
                    publisher: hit.publisher,
                    topic: topic.clone(),
                    body: None,
                });
                accepted += 1;
            }
            info!(%topic, accepted, "Topic collection complete");
        }

        let total = rows.len();
        let rows: Vec<Article> = rows
            .into_iter()
            .unique_by(|article| article.title.clone())
            .collect();
        if rows.len() < total {
            info!(
                removed = total - rows.len(),
                "Removed exact-title duplicates across topics"
            );
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::DEFAULT_FUZZY_THRESHOLD;
    use crate::index::NewsIndex;
    use crate::models::SearchHit;
    use std::collections::HashMap;
    use std::error::Error;

    struct StubIndex {
        responses: HashMap<String, Vec<SearchHit>>,
        failing_topics: Vec<String>,
    }

    impl StubIndex {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                failing_topics: Vec::new(),
            }
        }

        fn with_topic(mut self, topic: &str, hits: &[(&str, &str)]) -> Self {
            let hits = hits
                .iter()
                .map(|(title, url)| SearchHit {
                    title: title.to_string(),
                    url: url.to_string(),
                    publisher: "Stub Press".to_string(),
                })
                .collect();
            self.responses.insert(topic.to_string(), hits);
            self
        }

        fn with_failing_topic(mut self, topic: &str) -> Self {
            self.failing_topics.push(topic.to_string());
            self
        }
    }

    impl NewsIndex for StubIndex {
        async fn search(&self, topic: &str) -> Result<Vec<SearchHit>, Box<dyn Error>> {
            if self.failing_topics.iter().any(|t| t == topic) {
                return Err("index unavailable".into());
            }
            Ok(self.responses.get(topic).cloned().unwrap_or_default())
        }
    }

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_reordered_title_suppressed_within_topic() {
        let index = StubIndex::new().with_topic(
            "ukraine",
            &[
                ("Ukraine aid bill passes Senate", "https://a.com/1"),
                ("Senate passes Ukraine aid bill", "https://b.com/2"),
            ],
        );
        let collector = ArticleCollector::new(index, DEFAULT_FUZZY_THRESHOLD);

        let articles = collector.collect(&topics(&["ukraine"])).await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Ukraine aid bill passes Senate");
        assert_eq!(articles[0].topic, "ukraine");
    }

    #[tokio::test]
    async fn test_same_title_across_topics_kept_once_globally() {
        let index = StubIndex::new()
            .with_topic("economy", &[("Fed raises rates", "https://a.com/1")])
            .with_topic("inflation", &[("Fed raises rates", "https://b.com/2")]);
        let collector = ArticleCollector::new(index, DEFAULT_FUZZY_THRESHOLD);

        let articles = collector
            .collect(&topics(&["economy", "inflation"]))
            .await;
        // Both clear their per-topic scopes; the global pass keeps the first.
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].topic, "economy");
        assert_eq!(articles[0].url, "https://a.com/1");
    }

    #[tokio::test]
    async fn test_global_pass_is_exact_match_only() {
        let index = StubIndex::new()
            .with_topic("economy", &[("Fed raises rates", "https://a.com/1")])
            .with_topic(
                "inflation",
                &[("Rates raised by Fed", "https://b.com/2")],
            );
        let collector = ArticleCollector::new(index, DEFAULT_FUZZY_THRESHOLD);

        let articles = collector
            .collect(&topics(&["economy", "inflation"]))
            .await;
        // Fuzzy-similar but not byte-identical titles both survive globally.
        assert_eq!(articles.len(), 2);
    }

    #[tokio::test]
    async fn test_failing_topic_does_not_abort_others() {
        let index = StubIndex::new()
            .with_failing_topic("broken")
            .with_topic("working", &[("Volcano erupts", "https://a.com/1")]);
        let collector = ArticleCollector::new(index, DEFAULT_FUZZY_THRESHOLD);

        let articles = collector.collect(&topics(&["broken", "working"])).await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Volcano erupts");
    }

    #[tokio::test]
    async fn test_no_candidates_yields_empty_result() {
        let collector = ArticleCollector::new(StubIndex::new(), DEFAULT_FUZZY_THRESHOLD);
        let articles = collector.collect(&topics(&["nothing"])).await;
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_bodies_start_unpopulated() {
        let index = StubIndex::new().with_topic("economy", &[("Headline", "https://a.com/1")]);
        let collector = ArticleCollector::new(index, DEFAULT_FUZZY_THRESHOLD);

        let articles = collector.collect(&topics(&["economy"])).await;
        assert!(articles[0].body.is_none());
        assert_eq!(articles[0].publisher, "Stub Press");
    }
}
