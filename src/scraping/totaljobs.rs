// src/scraping/totaljobs.rs
use super::{html, JobBoard, JobBoardParser, JobIdSource, JobPosting, PathRule, ScrapeConfig, ScrapeError, UrlPattern};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

const NO_TITLE: &str = "No job title found";
const NO_DESCRIPTION: &str = "No description found";

static DESCRIPTION_BLOCK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[class*="job-description"]"#).expect("valid job-description selector")
});

/// Totaljobs usually ships the whole posting as JSON-LD with an HTML
/// description; older pages only have the rendered description block.
pub struct TotaljobsParser;

impl TotaljobsParser {
    pub fn job_url(job_id: &str) -> String {
        format!("https://www.totaljobs.com/job/{}/", job_id)
    }
}

impl JobBoardParser for TotaljobsParser {
    fn board(&self) -> JobBoard {
        JobBoard::Totaljobs
    }

    fn url_pattern(&self) -> UrlPattern {
        UrlPattern {
            host_suffix: "totaljobs.com",
            path: PathRule::StartsWith("/job/"),
            job_id: JobIdSource::PathSegmentAfter("/job/"),
        }
    }

    fn scrape_config(&self, job_id: &str) -> ScrapeConfig {
        ScrapeConfig::new(Self::job_url(job_id))
            .with_country("GB")
            .with_header("Accept-Language", "en-GB,en;q=0.5")
    }

    fn parse_page(&self, page: &str) -> Result<JobPosting, ScrapeError> {
        let document = Html::parse_document(page);
        let data = html::ld_json(&document)?;

        let title = html::str_field(data.as_ref(), "title")
            .map(str::to_string)
            .or_else(|| html::first_heading(&document))
            .unwrap_or_else(|| NO_TITLE.to_string());

        let mut description = match html::str_field(data.as_ref(), "description") {
            Some(description_html) => html::fragment_text(description_html, " "),
            None => outermost_blocks(&document)
                .into_iter()
                .flat_map(|block| html::clean_nodes(block.text()))
                .collect::<Vec<_>>()
                .join(" "),
        };
        if description.is_empty() {
            description = NO_DESCRIPTION.to_string();
        }

        Ok(JobPosting { title, description })
    }
}

/// Description blocks not nested inside another description block, so each
/// text node is read once.
fn outermost_blocks(document: &Html) -> Vec<ElementRef<'_>> {
    let blocks: Vec<_> = document.select(&DESCRIPTION_BLOCK).collect();
    let ids: HashSet<_> = blocks.iter().map(|block| block.id()).collect();

    blocks
        .into_iter()
        .filter(|block| !block.ancestors().any(|node| ids.contains(&node.id())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraping::testing::FakeProxy;

    #[test]
    fn test_ld_json_description_is_stripped_and_space_joined() {
        let page = r#"<html><head><script type="application/ld+json">
{"title": "Payroll Administrator", "description": "<p>Process monthly payroll.</p><ul><li>Sage 50</li><li>Excel</li></ul>"}
</script></head><body><div class="job-description">should not be used</div></body></html>"#;

        let posting = TotaljobsParser.parse_page(page).unwrap();
        assert_eq!(posting.title, "Payroll Administrator");
        assert_eq!(posting.description, "Process monthly payroll. Sage 50 Excel");
    }

    #[test]
    fn test_description_falls_back_to_dom_block() {
        let page = r#"<html><body>
<h1>Warehouse Operative</h1>
<div class="at-section job-description"><p>Night shifts</p>
  <p><strong>Forklift</strong> licence preferred</p></div>
</body></html>"#;

        let posting = TotaljobsParser.parse_page(page).unwrap();
        assert_eq!(posting.title, "Warehouse Operative");
        assert_eq!(posting.description, "Night shifts Forklift licence preferred");
    }

    #[test]
    fn test_nested_description_blocks_read_once() {
        let page = r#"<h1>Chef</h1>
<div class="job-description"><div class="job-description-content"><p>Hot kitchen</p></div>
<p>Split shifts</p></div>
<div class="job-description-footer">Apply today</div>"#;

        let posting = TotaljobsParser.parse_page(page).unwrap();
        assert_eq!(posting.description, "Hot kitchen Split shifts Apply today");
    }

    #[test]
    fn test_missing_everything_uses_board_wording() {
        let posting = TotaljobsParser.parse_page("<html><body></body></html>").unwrap();
        assert_eq!(posting.title, "No job title found");
        assert_eq!(posting.description, "No description found");
    }

    #[tokio::test]
    async fn test_fetch_uses_gb_proxy_settings() {
        let page = r#"<h1>Chef</h1><div class="job-description">Hot kitchen</div>"#;
        let proxy = FakeProxy::default().with_page(&TotaljobsParser::job_url("job101"), page);

        let info = TotaljobsParser.fetch_job_info(&proxy, "job101").await.unwrap();
        assert_eq!(info, "Chef\nHot kitchen");

        let requests = proxy.requests.lock().unwrap();
        assert_eq!(requests[0].country.as_deref(), Some("GB"));
    }

    #[tokio::test]
    async fn test_proxy_failure_propagates() {
        let proxy = FakeProxy::default().with_failure(&TotaljobsParser::job_url("gone"), 410);
        let result = TotaljobsParser.fetch_job_info(&proxy, "gone").await;
        assert!(matches!(result, Err(ScrapeError::Target(410))));
    }
}
