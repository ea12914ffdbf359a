//! Browser-backed fetching for client-rendered aggregator links.
//!
//! Google News search results do not link to articles directly; they link to
//! an indirection page that redirects in the client after script execution.
//! A plain GET sees only the redirect shell, so these URLs go through a real
//! Chromium session: navigate, wait for the redirect to land, and read the
//! rendered DOM.
//!
//! # Session lifecycle
//!
//! The session is opened once with [`RenderedFetcher::launch`] and torn down
//! with [`RenderedFetcher::close`]; both are owned by the orchestrator. The
//! underlying page handles one navigation at a time, so
//! [`get_document_text`](RenderedFetcher::get_document_text) takes
//! `&mut self` and callers must fetch documents sequentially. Parallel
//! rendered fetching requires one session per worker, not a shared one.

use std::time::{Duration, Instant};

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

use crate::fetch::{DocumentFetcher, FetchError, FetchOutcome};
use crate::extract;
use crate::normalize::clean_text;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.212 Safari/537.36";

/// Budget for the initial navigation to commit.
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(10);
/// Budget for the client-side redirect to land on a real article URL.
const REDIRECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Interval between checks of the page's current URL.
const REDIRECT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A long-lived headless Chromium session for resolving indirection links.
pub struct RenderedFetcher {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
}

impl RenderedFetcher {
    /// Launch headless Chromium and open the session's single page.
    pub async fn launch() -> Result<Self, FetchError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .window_size(1920, 1080)
            .build()
            .map_err(FetchError::Browser)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        // The handler stream must be drained for the session to make progress.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;
        page.set_user_agent(BROWSER_USER_AGENT)
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        info!("Browser session launched");
        Ok(Self {
            browser,
            handler_task,
            page,
        })
    }

    /// Resolve an indirection URL and return the rendered page's text.
    ///
    /// Navigation errors and timeouts, and a redirect that never lands within
    /// its budget, yield [`FetchOutcome::Unresolved`] (an empty body) rather
    /// than an error. When the rendered DOM is unavailable or yields no text,
    /// the resolved URL is re-fetched through `fallback` on the static path.
    #[instrument(level = "info", skip(self, fallback))]
    pub async fn get_document_text(
        &mut self,
        url: &str,
        fallback: &DocumentFetcher,
    ) -> FetchOutcome {
        match timeout(NAVIGATION_TIMEOUT, self.page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "Navigation failed; skipping link");
                return FetchOutcome::Unresolved;
            }
            Err(_) => {
                warn!("Page load timeout; skipping link");
                return FetchOutcome::Unresolved;
            }
        }

        let resolved = match self.wait_for_redirect(url).await {
            Some(resolved) => resolved,
            None => return FetchOutcome::Unresolved,
        };
        debug!(%resolved, "Redirect resolved");

        match self.page.content().await {
            Ok(html) if !html.is_empty() => {
                let text = extract::visible_text(&html);
                if !text.is_empty() {
                    return FetchOutcome::Text(clean_text(&text));
                }
                warn!(%resolved, "Rendered page produced no text; falling back to static fetch");
            }
            Ok(_) => {
                warn!(%resolved, "Browser returned empty document; falling back to static fetch");
            }
            Err(e) => {
                warn!(%resolved, error = %e, "Failed to read rendered page; falling back to static fetch");
            }
        }

        fallback.get_document_text(&resolved).await
    }

    /// Poll the page URL until it differs from `initial_url`.
    ///
    /// Returns the resolved URL, or `None` when the budget elapses or the
    /// session stops answering.
    async fn wait_for_redirect(&self, initial_url: &str) -> Option<String> {
        let started = Instant::now();
        loop {
            match self.page.url().await {
                Ok(Some(current)) if current != initial_url => return Some(current),
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Error checking current URL");
                    return None;
                }
            }

            if started.elapsed() > REDIRECT_TIMEOUT {
                warn!("Timeout reached while waiting for URL to change");
                return None;
            }
            sleep(REDIRECT_POLL_INTERVAL).await;
        }
    }

    /// Tear the session down. Errors during shutdown are logged, not raised.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "Browser did not close cleanly");
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        info!("Browser session closed");
    }
}
