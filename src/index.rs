//! Google News RSS search client.
//!
//! Supplies candidate articles per topic by querying the Google News RSS
//! search endpoint. Each `<item>` in the feed yields a title, an indirection
//! link (resolved later by the rendered fetch path), and the publishing
//! outlet from the `<source>` element.
//!
//! The query carries a recency window (`when:7d` by default) along with the
//! configured language and country, mirroring the feed parameters Google
//! News expects:
//! `https://news.google.com/rss/search?q=<query>+when:7d&hl=en&gl=US&ceid=US:en`

use std::error::Error;
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{error, info, instrument};

use crate::config::AppConfig;
use crate::models::SearchHit;
use crate::retry::RetryPolicy;

/// Supplies candidate article tuples for a topic query.
///
/// The collector is generic over this trait so tests can substitute a stub
/// index and so the search backend stays separate from document fetching.
pub trait NewsIndex {
    /// Search the index for articles matching `topic`.
    async fn search(&self, topic: &str) -> Result<Vec<SearchHit>, Box<dyn Error>>;
}

/// Google News RSS search backend.
#[derive(Debug, Clone)]
pub struct GoogleNewsClient {
    client: reqwest::Client,
    retry: RetryPolicy,
    language: String,
    country: String,
    period: String,
    max_results: usize,
}

impl GoogleNewsClient {
    /// Build a client from the run configuration.
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; pulse_news)")
            .build()?;
        Ok(Self {
            client,
            retry: RetryPolicy::default(),
            language: config.language.clone(),
            country: config.country.clone(),
            period: config.period.clone(),
            max_results: config.max_results,
        })
    }

    fn search_url(&self, topic: &str) -> String {
        let query = urlencoding::encode(&format!("{topic} when:{}", self.period)).into_owned();
        format!(
            "https://news.google.com/rss/search?q={query}&hl={lang}&gl={country}&ceid={country}:{lang}",
            lang = self.language,
            country = self.country,
        )
    }
}

impl NewsIndex for GoogleNewsClient {
    #[instrument(level = "info", skip(self))]
    async fn search(&self, topic: &str) -> Result<Vec<SearchHit>, Box<dyn Error>> {
        let url = self.search_url(topic);
        let response = self.retry.run(|| self.client.get(&url).send()).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("news feed returned status {}", status.as_u16()).into());
        }

        let body = response.text().await?;
        let hits = parse_feed(&body, self.max_results);
        info!(count = hits.len(), topic, "Indexed news feed results");
        Ok(hits)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum ItemField {
    Title,
    Link,
    Source,
}

/// Parse an RSS search feed into candidate tuples.
///
/// Items without a link are dropped; a missing `<source>` element falls back
/// to `"Unknown"`. Malformed XML stops parsing at the error without
/// discarding the items already read.
fn parse_feed(xml: &str, max_results: usize) -> Vec<SearchHit> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut hits = Vec::new();
    let mut in_item = false;
    let mut field: Option<ItemField> = None;
    let mut title = String::new();
    let mut link = String::new();
    let mut publisher = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" => {
                    in_item = true;
                    title.clear();
                    link.clear();
                    publisher.clear();
                }
                b"title" if in_item => field = Some(ItemField::Title),
                b"link" if in_item => field = Some(ItemField::Link),
                b"source" if in_item => field = Some(ItemField::Source),
                _ => field = None,
            },
            Ok(Event::Text(e)) => {
                if let (true, Some(field)) = (in_item, field) {
                    if let Ok(text) = e.unescape() {
                        append_field(field, &text, &mut title, &mut link, &mut publisher);
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let (true, Some(field)) = (in_item, field) {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    append_field(field, &text, &mut title, &mut link, &mut publisher);
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"item" {
                    in_item = false;
                    if !link.is_empty() {
                        hits.push(SearchHit {
                            title: title.trim().to_string(),
                            url: link.trim().to_string(),
                            publisher: if publisher.trim().is_empty() {
                                "Unknown".to_string()
                            } else {
                                publisher.trim().to_string()
                            },
                        });
                        if hits.len() >= max_results {
                            break;
                        }
                    }
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                error!(error = %e, "Malformed news feed; keeping items parsed so far");
                break;
            }
            _ => {}
        }
    }

    hits
}

fn append_field(
    field: ItemField,
    text: &str,
    title: &mut String,
    link: &mut String,
    publisher: &mut String,
) {
    match field {
        ItemField::Title => title.push_str(text),
        ItemField::Link => link.push_str(text),
        ItemField::Source => publisher.push_str(text),
    }
}
