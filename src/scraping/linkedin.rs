// src/scraping/linkedin.rs
use super::{html, JobBoard, JobBoardParser, JobIdSource, JobPosting, PathRule, ScrapeConfig, ScrapeError, UrlPattern};
use scraper::{Html, Selector};
use std::sync::LazyLock;

const NO_TITLE: &str = "No job title found";
const NO_DESCRIPTION: &str = "No job description found";

static DESCRIPTION_ITEMS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[class*="show-more"] > ul > li"#).expect("valid show-more selector")
});

/// LinkedIn's public job view carries JSON-LD for the title and a
/// "show more" bullet list for the description. The JSON-LD `description`
/// is entity-encoded HTML and is deliberately ignored.
pub struct LinkedInParser;

impl LinkedInParser {
    pub fn job_url(job_id: &str) -> String {
        format!("https://www.linkedin.com/jobs/view/{}/", job_id)
    }
}

impl JobBoardParser for LinkedInParser {
    fn board(&self) -> JobBoard {
        JobBoard::LinkedIn
    }

    fn url_pattern(&self) -> UrlPattern {
        UrlPattern {
            host_suffix: "linkedin.com",
            path: PathRule::Contains("/jobs/"),
            job_id: JobIdSource::Query("currentJobId"),
        }
    }

    fn scrape_config(&self, job_id: &str) -> ScrapeConfig {
        ScrapeConfig::new(Self::job_url(job_id))
            .with_asp(true)
            .with_country("US")
            .with_header("Accept-Language", "en-US,en;q=0.5")
    }

    fn parse_page(&self, page: &str) -> Result<JobPosting, ScrapeError> {
        let document = Html::parse_document(page);
        let data = html::ld_json(&document)?;

        let title = html::str_field(data.as_ref(), "title")
            .map(str::to_string)
            .or_else(|| html::first_heading(&document))
            .unwrap_or_else(|| NO_TITLE.to_string());

        let items: Vec<&str> = document
            .select(&DESCRIPTION_ITEMS)
            .flat_map(|li| html::clean_nodes(html::own_text(li)))
            .collect();

        let description = if items.is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            items.join("\n")
        };

        Ok(JobPosting { title, description })
    }
}
