// src/scraping/mod.rs
//! Job board scraping: one parser per supported board, all fetching through
//! the scraping proxy.

pub mod html;
pub mod indeed;
pub mod linkedin;
pub mod proxy;
pub mod totaljobs;

pub use indeed::IndeedParser;
pub use linkedin::LinkedInParser;
pub use proxy::{ScrapeConfig, ScrapeProxy, ScrapflyClient};
pub use totaljobs::TotaljobsParser;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use url::Url;

/// Every way a board lookup can go wrong. The resolver treats all of them
/// the same: log and move on to the next link.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("scrape failed: request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("scrape failed: proxy returned status {status}: {message}")]
    Proxy { status: u16, message: String },

    #[error("scrape failed: target page returned status {0}")]
    Target(u16),

    #[error("scrape failed: invalid JSON in page: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobBoard {
    Indeed,
    LinkedIn,
    Totaljobs,
}

impl fmt::Display for JobBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobBoard::Indeed => "Indeed",
            JobBoard::LinkedIn => "LinkedIn",
            JobBoard::Totaljobs => "Totaljobs",
        };
        f.write_str(name)
    }
}

/// Title and description pulled out of a job page. Neither field is ever
/// empty: parsers substitute their placeholder text instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub description: String,
}

impl JobPosting {
    /// Flattened form handed to the question generator.
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.title, self.description)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum PathRule {
    Contains(&'static str),
    StartsWith(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub enum JobIdSource {
    /// First non-empty value of the named query parameter
    Query(&'static str),
    /// Path segment directly after the given prefix
    PathSegmentAfter(&'static str),
}

/// One row of the link classification table.
#[derive(Debug, Clone, Copy)]
pub struct UrlPattern {
    pub host_suffix: &'static str,
    pub path: PathRule,
    pub job_id: JobIdSource,
}

impl UrlPattern {
    pub fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_lowercase();
        let host_ok = host == self.host_suffix
            || host
                .strip_suffix(self.host_suffix)
                .is_some_and(|rest| rest.ends_with('.'));

        host_ok
            && match self.path {
                PathRule::Contains(segment) => url.path().contains(segment),
                PathRule::StartsWith(prefix) => url.path().starts_with(prefix),
            }
    }

    pub fn job_id(&self, url: &Url) -> Option<String> {
        match self.job_id {
            JobIdSource::Query(name) => url
                .query_pairs()
                .filter(|(key, value)| key == name && !value.is_empty())
                .map(|(_, value)| value.into_owned())
                .next(),
            JobIdSource::PathSegmentAfter(prefix) => url
                .path()
                .split_once(prefix)
                .and_then(|(_, rest)| rest.split('/').next())
                .filter(|segment| !segment.is_empty())
                .map(str::to_string),
        }
    }
}

/// A scraper for one job board: knows which links belong to it, how to ask
/// the proxy for the page and how to read the page once it arrives.
#[rocket::async_trait]
pub trait JobBoardParser: Send + Sync {
    fn board(&self) -> JobBoard;

    fn url_pattern(&self) -> UrlPattern;

    /// Proxy request for the canonical job page of `job_id`.
    fn scrape_config(&self, job_id: &str) -> ScrapeConfig;

    fn parse_page(&self, page: &str) -> Result<JobPosting, ScrapeError>;

    async fn fetch(&self, proxy: &dyn ScrapeProxy, job_id: &str) -> Result<JobPosting, ScrapeError> {
        let config = self.scrape_config(job_id);
        info!("Scraping {} job {} via {}", self.board(), job_id, config.url);

        let page = proxy.scrape(&config).await?;
        let posting = self.parse_page(&page)?;

        info!("Extracted {} job: {}", self.board(), posting.title);
        Ok(posting)
    }

    /// Combined `title\ndescription` text for `job_id`.
    async fn fetch_job_info(&self, proxy: &dyn ScrapeProxy, job_id: &str) -> Result<String, ScrapeError> {
        Ok(self.fetch(proxy, job_id).await?.combined())
    }
}

/// The supported boards, in classification order.
pub fn default_parsers() -> Vec<Arc<dyn JobBoardParser>> {
    vec![
        Arc::new(IndeedParser),
        Arc::new(LinkedInParser),
        Arc::new(TotaljobsParser),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages keyed by target URL and records every request.
    #[derive(Default)]
    pub struct FakeProxy {
        pages: HashMap<String, Result<String, u16>>,
        pub requests: Mutex<Vec<ScrapeConfig>>,
    }

    impl FakeProxy {
        pub fn with_page(mut self, url: &str, page: &str) -> Self {
            self.pages.insert(url.to_string(), Ok(page.to_string()));
            self
        }

        pub fn with_failure(mut self, url: &str, status: u16) -> Self {
            self.pages.insert(url.to_string(), Err(status));
            self
        }

        pub fn requested_urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.url.clone())
                .collect()
        }
    }

    #[rocket::async_trait]
    impl ScrapeProxy for FakeProxy {
        async fn scrape(&self, config: &ScrapeConfig) -> Result<String, ScrapeError> {
            self.requests.lock().unwrap().push(config.clone());
            match self.pages.get(&config.url) {
                Some(Ok(page)) => Ok(page.clone()),
                Some(Err(status)) => Err(ScrapeError::Target(*status)),
                None => Err(ScrapeError::Target(404)),
            }
        }
    }
}
