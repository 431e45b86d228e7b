// src/scraping/indeed.rs
use super::{html, JobBoard, JobBoardParser, JobIdSource, JobPosting, PathRule, ScrapeConfig, ScrapeError, UrlPattern};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

const NO_TITLE: &str = "No job title found";
const NO_DESCRIPTION: &str = "No job description found";

static INITIAL_DATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_initialData=(\{.+?\});").expect("valid initial data pattern"));

/// Indeed embeds the job as a JS assignment (`_initialData={...};`) in the
/// embedded-view page; the description inside it is an HTML fragment.
pub struct IndeedParser;

impl IndeedParser {
    pub fn job_url(job_id: &str) -> String {
        format!("https://www.indeed.com/m/basecamp/viewjob?viewtype=embedded&jk={}", job_id)
    }
}

impl JobBoardParser for IndeedParser {
    fn board(&self) -> JobBoard {
        JobBoard::Indeed
    }

    fn url_pattern(&self) -> UrlPattern {
        UrlPattern {
            host_suffix: "indeed.com",
            path: PathRule::Contains("/m/basecamp/viewjob"),
            job_id: JobIdSource::Query("jk"),
        }
    }

    fn scrape_config(&self, job_id: &str) -> ScrapeConfig {
        ScrapeConfig::new(Self::job_url(job_id))
            .with_country("US")
            .with_header("Accept-Language", "en-US,en;q=0.9")
    }

    fn parse_page(&self, page: &str) -> Result<JobPosting, ScrapeError> {
        let data: Value = match INITIAL_DATA.captures(page).and_then(|c| c.get(1)) {
            Some(blob) => serde_json::from_str(blob.as_str())?,
            None => Value::Null,
        };

        let job_info = &data["jobInfoWrapperModel"]["jobInfoModel"];

        let title = job_info["jobInfoHeaderModel"]["jobTitle"]
            .as_str()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(NO_TITLE)
            .to_string();

        let description_html = job_info["sanitizedJobDescription"]
            .as_str()
            .unwrap_or(NO_DESCRIPTION);
        let mut description = html::fragment_text(description_html, "\n");
        if description.is_empty() {
            description = NO_DESCRIPTION.to_string();
        }

        Ok(JobPosting { title, description })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraping::testing::FakeProxy;

    #[test]
    fn test_parse_initial_data() {
        let page = r#"<script>window._initialData={"jobInfoWrapperModel":{"jobInfoModel":{"jobInfoHeaderModel":{"jobTitle":"X"},"sanitizedJobDescription":"<p>Y</p>"}}};</script>"#;
        let posting = IndeedParser.parse_page(page).unwrap();
        assert_eq!(posting.title, "X");
        assert_eq!(posting.description, "Y");
    }

    #[test]
    fn test_description_lines_joined_with_newline() {
        let page = r#"_initialData={"jobInfoWrapperModel":{"jobInfoModel":{"jobInfoHeaderModel":{"jobTitle":"Backend Engineer"},"sanitizedJobDescription":"<div><p>About us</p>\n<ul><li>Rust</li><li> Postgres </li></ul></div>"}}};"#;
        let posting = IndeedParser.parse_page(page).unwrap();
        assert_eq!(posting.description, "About us\nRust\nPostgres");
    }

    #[test]
    fn test_missing_data_uses_placeholders() {
        let posting = IndeedParser.parse_page("<html><body>blocked</body></html>").unwrap();
        assert_eq!(posting.title, NO_TITLE);
        assert_eq!(posting.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_blank_description_uses_placeholder() {
        let page = r#"_initialData={"jobInfoWrapperModel":{"jobInfoModel":{"jobInfoHeaderModel":{"jobTitle":"T"},"sanitizedJobDescription":"<p>  </p>"}}};"#;
        let posting = IndeedParser.parse_page(page).unwrap();
        assert_eq!(posting.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_malformed_initial_data_is_an_error() {
        let page = r#"_initialData={"jobInfoWrapperModel": nope};"#;
        assert!(matches!(IndeedParser.parse_page(page), Err(ScrapeError::Json(_))));
    }

    #[tokio::test]
    async fn test_fetch_uses_us_proxy_settings_and_is_repeatable() {
        let page = r#"_initialData={"jobInfoWrapperModel":{"jobInfoModel":{"jobInfoHeaderModel":{"jobTitle":"QA Lead"},"sanitizedJobDescription":"<p>Test plans</p>"}}};"#;
        let proxy = FakeProxy::default().with_page(&IndeedParser::job_url("abc"), page);

        let first = IndeedParser.fetch_job_info(&proxy, "abc").await.unwrap();
        let second = IndeedParser.fetch_job_info(&proxy, "abc").await.unwrap();
        assert_eq!(first, "QA Lead\nTest plans");
        assert_eq!(first, second);

        let requests = proxy.requests.lock().unwrap();
        assert_eq!(requests[0].country.as_deref(), Some("US"));
        assert!(!requests[0].asp);
    }
}
