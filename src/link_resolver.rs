// src/link_resolver.rs
//! Turns free-form job description text into the best description we can get:
//! if the text links to a supported job board, the scraped posting wins.

use crate::scraping::{default_parsers, JobBoard, JobBoardParser, ScrapeProxy};
use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};
use url::Url;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("valid url pattern"));

/// Every `http(s)://...` run of non-whitespace, in order of appearance.
pub fn extract_urls(text: &str) -> Vec<&str> {
    URL_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

pub enum Classification<'a> {
    /// No board claims this URL
    Unsupported,
    /// A board claims the URL but the job identifier is missing
    MissingJobId(JobBoard),
    Job {
        parser: &'a dyn JobBoardParser,
        job_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLink {
    pub board: JobBoard,
    pub job_id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub text: String,
    pub source: Option<ResolvedLink>,
}

pub struct LinkResolver {
    proxy: Arc<dyn ScrapeProxy>,
    parsers: Vec<Arc<dyn JobBoardParser>>,
}

impl LinkResolver {
    pub fn new(proxy: Arc<dyn ScrapeProxy>) -> Self {
        Self::with_parsers(proxy, default_parsers())
    }

    pub fn with_parsers(proxy: Arc<dyn ScrapeProxy>, parsers: Vec<Arc<dyn JobBoardParser>>) -> Self {
        Self { proxy, parsers }
    }

    /// The first parser whose host and path rules accept the URL owns it.
    pub fn classify(&self, raw_url: &str) -> Classification<'_> {
        let Ok(url) = Url::parse(raw_url) else {
            return Classification::Unsupported;
        };

        let Some(parser) = self
            .parsers
            .iter()
            .find(|parser| parser.url_pattern().matches(&url))
        else {
            return Classification::Unsupported;
        };

        match parser.url_pattern().job_id(&url) {
            Some(job_id) => Classification::Job {
                parser: parser.as_ref(),
                job_id,
            },
            None => Classification::MissingJobId(parser.board()),
        }
    }

    pub async fn resolve(&self, text: &str) -> String {
        self.resolve_detailed(text).await.text
    }

    /// Tries each recognised link in order; the first successful scrape
    /// replaces the whole text. Failures are logged and skipped.
    pub async fn resolve_detailed(&self, text: &str) -> Resolution {
        for raw_url in extract_urls(text) {
            let (parser, job_id) = match self.classify(raw_url) {
                Classification::Job { parser, job_id } => (parser, job_id),
                Classification::MissingJobId(board) => {
                    debug!("Skipping {} link without job id: {}", board, raw_url);
                    continue;
                }
                Classification::Unsupported => continue,
            };

            match parser.fetch_job_info(self.proxy.as_ref(), &job_id).await {
                Ok(info) if !info.trim().is_empty() => {
                    info!("Resolved {} job {} from link", parser.board(), job_id);
                    return Resolution {
                        text: info,
                        source: Some(ResolvedLink {
                            board: parser.board(),
                            job_id,
                            url: raw_url.to_string(),
                        }),
                    };
                }
                Ok(_) => warn!("Empty {} job info for {}", parser.board(), job_id),
                Err(e) => warn!("Error fetching {} job info for {}: {}", parser.board(), job_id, e),
            }
        }

        Resolution {
            text: text.to_string(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraping::testing::FakeProxy;
    use crate::scraping::{IndeedParser, LinkedInParser, TotaljobsParser};

    const LINKEDIN_PAGE: &str = r#"<script type="application/ld+json">{"title": "Platform Engineer"}</script>
<div class="show-more-less-html"><ul><li>Terraform</li><li>AWS</li></ul></div>"#;

    const TOTALJOBS_PAGE: &str = r#"<h1>Account Manager</h1><div class="job-description">Grow key accounts</div>"#;

    fn resolver(proxy: FakeProxy) -> (LinkResolver, Arc<FakeProxy>) {
        let proxy = Arc::new(proxy);
        (LinkResolver::new(proxy.clone()), proxy)
    }

    #[test]
    fn test_extract_urls_in_order() {
        let text = "see https://a.example/x?y=1 and http://b.example/z\nthanks";
        assert_eq!(
            extract_urls(text),
            vec!["https://a.example/x?y=1", "http://b.example/z"]
        );
    }

    #[tokio::test]
    async fn test_text_without_links_is_unchanged() {
        let (resolver, proxy) = resolver(FakeProxy::default());
        let text = "Senior Rust developer, remote, async experience required.";
        assert_eq!(resolver.resolve(text).await, text);
        assert!(proxy.requested_urls().is_empty());
    }

    #[tokio::test]
    async fn test_unrecognised_links_are_ignored() {
        let (resolver, proxy) = resolver(FakeProxy::default());
        let text = "Apply at https://careers.example.com/jobs/42 or https://www.indeed.com/companies";
        assert_eq!(resolver.resolve(text).await, text);
        assert!(proxy.requested_urls().is_empty());
    }

    #[tokio::test]
    async fn test_single_link_is_replaced_by_posting() {
        let proxy = FakeProxy::default().with_page(&LinkedInParser::job_url("3901"), LINKEDIN_PAGE);
        let (resolver, _) = resolver(proxy);

        let link = "https://www.linkedin.com/jobs/collections/recommended/?currentJobId=3901";
        let resolution = resolver
            .resolve_detailed(&format!("Please prep me for {}", link))
            .await;

        assert_eq!(resolution.text, "Platform Engineer\nTerraform\nAWS");
        assert!(!resolution.text.contains(link));
        let source = resolution.source.unwrap();
        assert_eq!(source.board, JobBoard::LinkedIn);
        assert_eq!(source.job_id, "3901");
    }

    #[tokio::test]
    async fn test_first_failure_falls_through_to_next_link() {
        let proxy = FakeProxy::default()
            .with_failure(&IndeedParser::job_url("dead"), 500)
            .with_page(&TotaljobsParser::job_url("job555"), TOTALJOBS_PAGE);
        let (resolver, proxy) = resolver(proxy);

        let text = "https://uk.indeed.com/m/basecamp/viewjob?jk=dead https://www.totaljobs.com/job/job555";
        assert_eq!(resolver.resolve(text).await, "Account Manager\nGrow key accounts");
        assert_eq!(proxy.requested_urls().len(), 2);
    }

    #[tokio::test]
    async fn test_first_success_stops_scanning() {
        let proxy = FakeProxy::default()
            .with_page(&TotaljobsParser::job_url("job555"), TOTALJOBS_PAGE)
            .with_page(&LinkedInParser::job_url("3901"), LINKEDIN_PAGE);
        let (resolver, proxy) = resolver(proxy);

        let text = "https://www.totaljobs.com/job/job555 https://www.linkedin.com/jobs/search/?currentJobId=3901";
        assert_eq!(resolver.resolve(text).await, "Account Manager\nGrow key accounts");
        assert_eq!(proxy.requested_urls(), vec![TotaljobsParser::job_url("job555")]);
    }

    #[tokio::test]
    async fn test_missing_job_id_is_skipped_silently() {
        let (resolver, proxy) = resolver(FakeProxy::default());
        let text = "https://www.indeed.com/m/basecamp/viewjob?viewtype=embedded";

        assert!(matches!(
            resolver.classify(text),
            Classification::MissingJobId(JobBoard::Indeed)
        ));
        assert_eq!(resolver.resolve(text).await, text);
        assert!(proxy.requested_urls().is_empty());
    }

    #[tokio::test]
    async fn test_every_failure_returns_input_text() {
        let proxy = FakeProxy::default().with_failure(&LinkedInParser::job_url("1"), 999);
        let (resolver, _) = resolver(proxy);

        let text = "https://www.linkedin.com/jobs/view/?currentJobId=1 plus notes";
        let resolution = resolver.resolve_detailed(text).await;
        assert_eq!(resolution.text, text);
        assert!(resolution.source.is_none());
    }

    #[test]
    fn test_classify_extracts_board_ids() {
        let (resolver, _) = resolver(FakeProxy::default());

        match resolver.classify("https://www.indeed.com/m/basecamp/viewjob?viewtype=embedded&jk=9f8e") {
            Classification::Job { parser, job_id } => {
                assert_eq!(parser.board(), JobBoard::Indeed);
                assert_eq!(job_id, "9f8e");
            }
            _ => panic!("expected an Indeed job"),
        }

        match resolver.classify("https://www.totaljobs.com/job/data-analyst/acme-job101") {
            Classification::Job { parser, job_id } => {
                assert_eq!(parser.board(), JobBoard::Totaljobs);
                assert_eq!(job_id, "data-analyst");
            }
            _ => panic!("expected a Totaljobs job"),
        }

        assert!(matches!(
            resolver.classify("https://www.totaljobs.com/jobs/data-analyst"),
            Classification::Unsupported
        ));
    }
}
