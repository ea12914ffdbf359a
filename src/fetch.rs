//! Static document fetching: retrying HTTP GET plus extraction and cleanup.
//!
//! [`DocumentFetcher`] is the workhorse path for ordinary article URLs. Every
//! GET runs through the retry policy; the response body is routed to the PDF
//! or HTML extractor based on the URL, and the extracted text is cleaned
//! before being returned.
//!
//! Failures never escape as errors from [`DocumentFetcher::get_document_text`].
//! A fetch that cannot produce text produces a [`FetchOutcome::Failed`] marker
//! instead, so one bad URL degrades to a placeholder body rather than
//! aborting the batch.

use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::extract;
use crate::normalize::clean_text;
use crate::retry::RetryPolicy;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.212 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while setting up or driving the fetch infrastructure.
///
/// Per-document failures do not use this type; they become [`FetchOutcome`]
/// markers. This covers the construction-time and session-level problems the
/// caller genuinely has to handle.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("browser error: {0}")]
    Browser(String),
}

/// The result of attempting to retrieve one document's text.
///
/// Callers branch on the variant instead of pattern-matching marker strings:
/// - [`Text`](FetchOutcome::Text): cleaned document text (which may itself be
///   a PDF marker string when the document was an encrypted PDF)
/// - [`Failed`](FetchOutcome::Failed): a human-readable failure marker
/// - [`Unresolved`](FetchOutcome::Unresolved): the rendered path could not
///   resolve the page at all; converts to an empty body string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Extracted and cleaned document text.
    Text(String),
    /// Terminal failure, described for humans.
    Failed(String),
    /// The rendered path gave up before reaching a real page.
    Unresolved,
}

impl FetchOutcome {
    /// The value written into an article's body.
    pub fn into_body(self) -> String {
        match self {
            FetchOutcome::Text(text) => text,
            FetchOutcome::Failed(marker) => marker,
            FetchOutcome::Unresolved => String::new(),
        }
    }

    /// Whether this outcome carries usable text.
    pub fn is_text(&self) -> bool {
        matches!(self, FetchOutcome::Text(_))
    }
}

/// Retrieves a document over plain HTTP and extracts its text.
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl DocumentFetcher {
    /// Build a fetcher with the default retry policy.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_retry(RetryPolicy::default())
    }

    /// Build a fetcher with an explicit retry policy.
    pub fn with_retry(retry: RetryPolicy) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, retry })
    }

    /// Fetch a URL and return its extracted, cleaned text.
    ///
    /// The GET is retried with backoff. A non-success status becomes
    /// `Failed("Failed to retrieve document: <status>")`; exhausted retries
    /// become `Failed("Error retrieving document: <error>")`. URLs containing
    /// "pdf" are treated as PDF documents, everything else as HTML.
    #[instrument(level = "info", skip(self))]
    pub async fn get_document_text(&self, url: &str) -> FetchOutcome {
        let response = match self.retry.run(|| self.client.get(url).send()).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Document fetch exhausted retries");
                return FetchOutcome::Failed(format!("Error retrieving document: {e}"));
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "Failed to retrieve document");
            return FetchOutcome::Failed(format!(
                "Failed to retrieve document: {}",
                status.as_u16()
            ));
        }

        let text = if url.contains("pdf") {
            match response.bytes().await {
                Ok(bytes) => extract::pdf_text(&bytes),
                Err(e) => {
                    error!(error = %e, "Failed to read PDF response body");
                    return FetchOutcome::Failed(format!("Error retrieving document: {e}"));
                }
            }
        } else {
            match response.text().await {
                Ok(body) => self.html_text(&body, Url::parse(url).ok().as_ref()).await,
                Err(e) => {
                    error!(error = %e, "Failed to read response body");
                    return FetchOutcome::Failed(format!("Error retrieving document: {e}"));
                }
            }
        };

        FetchOutcome::Text(clean_text(&text))
    }

    /// Extract text from an HTML page, following links to embedded PDFs.
    ///
    /// Linked PDFs are fetched once (no retry, no recursion into further
    /// links) and their text appended after the page text. A linked PDF that
    /// cannot be fetched is logged and skipped.
    pub(crate) async fn html_text(&self, html: &str, base: Option<&Url>) -> String {
        let mut text = extract::visible_text(html);

        for pdf_url in extract::linked_pdf_urls(html, base) {
            debug!(%pdf_url, "Following linked PDF");
            match self.client.get(&pdf_url).send().await {
                Ok(response) if response.status().is_success() => match response.bytes().await {
                    Ok(bytes) => {
                        text.push('\n');
                        text.push_str(&extract::pdf_text(&bytes));
                    }
                    Err(e) => warn!(%pdf_url, error = %e, "Failed to read linked PDF body"),
                },
                Ok(response) => warn!(
                    %pdf_url,
                    status = response.status().as_u16(),
                    "Failed to retrieve linked document"
                ),
                Err(e) => warn!(%pdf_url, error = %e, "Error retrieving linked document"),
            }
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_body_preserves_text() {
        let outcome = FetchOutcome::Text("article body".to_string());
        assert!(outcome.is_text());
        assert_eq!(outcome.into_body(), "article body");
    }

    #[test]
    fn test_into_body_keeps_failure_marker() {
        let outcome = FetchOutcome::Failed("Failed to retrieve document: 404".to_string());
        assert!(!outcome.is_text());
        assert_eq!(outcome.into_body(), "Failed to retrieve document: 404");
    }

    #[test]
    fn test_into_body_maps_unresolved_to_empty() {
        assert_eq!(FetchOutcome::Unresolved.into_body(), "");
    }

    #[tokio::test]
    async fn test_html_text_without_pdf_links_is_pure_extraction() {
        let fetcher = DocumentFetcher::new().unwrap();
        let html = "<body>\n<p>Hello</p>\n<p>World</p>\n</body>";
        assert_eq!(fetcher.html_text(html, None).await, "Hello\nWorld");
    }
}
