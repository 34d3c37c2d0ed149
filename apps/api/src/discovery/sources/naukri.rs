use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use scraper::Html;
use tracing::debug;

use crate::discovery::sources::{
    fetch_html, first_text, resolve_href, selector, JobSource, SourceError, SourceQuery,
};
use crate::models::posting::RawPosting;

const NAUKRI_BASE_URL: &str = "https://www.naukri.com";

/// Naukri keyword search, scraped from the job tuple cards on the results page.
pub struct NaukriSource {
    client: Client,
}

impl NaukriSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobSource for NaukriSource {
    fn id(&self) -> &'static str {
        "naukri"
    }

    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<RawPosting>, SourceError> {
        let url = search_url(&query.keywords);
        debug!("Fetching Naukri listings from {url}");

        let html = fetch_html(self.client.get(&url)).await?;
        parse_listing(&html, query.limit, Utc::now())
    }
}

/// `["rust", "backend engineer"]` -> `https://www.naukri.com/rust-backend-engineer-jobs`
fn search_url(keywords: &[String]) -> String {
    let slug = keywords
        .iter()
        .flat_map(|k| k.split_whitespace())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        format!("{NAUKRI_BASE_URL}/jobs")
    } else {
        format!("{NAUKRI_BASE_URL}/{slug}-jobs")
    }
}

/// Parses up to `limit` job cards. Cards without a title are skipped; a
/// missing company becomes "Unknown".
pub(crate) fn parse_listing(
    html: &str,
    limit: usize,
    discovered_at: DateTime<Utc>,
) -> Result<Vec<RawPosting>, SourceError> {
    let document = Html::parse_document(html);
    let card_sel = selector(".jobTuple, .cust-job-tuple")?;
    let title_sel = selector(".title, .jobTitle")?;
    let company_sel = selector(".companyInfo, .comp-name")?;
    let location_sel = selector(".location, .loc")?;
    let experience_sel = selector(".experience, .exp")?;
    let description_sel = selector(".job-desc, .job-description")?;

    let postings = document
        .select(&card_sel)
        .filter_map(|card| {
            let title_el = card.select(&title_sel).next()?;
            let title = first_text(&card, &title_sel).filter(|t| !t.is_empty())?;

            Some(RawPosting {
                title,
                company: first_text(&card, &company_sel)
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| "Unknown".to_string()),
                description: first_text(&card, &description_sel).unwrap_or_default(),
                location: first_text(&card, &location_sel).unwrap_or_default(),
                experience_required: first_text(&card, &experience_sel).unwrap_or_default(),
                source: "naukri".to_string(),
                source_url: resolve_href(
                    NAUKRI_BASE_URL,
                    title_el.value().attr("href").unwrap_or_default(),
                ),
                discovered_at,
            })
        })
        .take(limit)
        .collect();

    Ok(postings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <div class="cust-job-tuple">
            <a class="title" href="https://www.naukri.com/job-listings-backend-123">Backend   Engineer</a>
            <a class="comp-name">Acme Corp</a>
            <span class="exp">3-5 Yrs</span>
            <span class="loc">Bengaluru, India</span>
            <span class="job-desc">Python, AWS and Docker required</span>
          </div>
          <div class="cust-job-tuple">
            <a class="title" href="/job-listings-data-456">Data Scientist</a>
            <span class="loc">Pune</span>
          </div>
          <div class="cust-job-tuple">
            <span class="comp-name">No Title Inc</span>
          </div>
          <div class="jobTuple">
            <a class="jobTitle" href="/job-listings-sre-789">SRE</a>
            <div class="companyInfo">Initech</div>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parses_cards_with_titles() {
        let postings = parse_listing(LISTING, 10, Utc::now()).unwrap();
        assert_eq!(postings.len(), 3);

        let first = &postings[0];
        assert_eq!(first.title, "Backend Engineer");
        assert_eq!(first.company, "Acme Corp");
        assert_eq!(first.experience_required, "3-5 Yrs");
        assert_eq!(first.location, "Bengaluru, India");
        assert_eq!(first.description, "Python, AWS and Docker required");
        assert_eq!(
            first.source_url,
            "https://www.naukri.com/job-listings-backend-123"
        );
        assert_eq!(first.source, "naukri");
    }

    #[test]
    fn test_relative_links_resolved_against_site() {
        let postings = parse_listing(LISTING, 10, Utc::now()).unwrap();
        assert_eq!(
            postings[1].source_url,
            "https://www.naukri.com/job-listings-data-456"
        );
        assert_eq!(
            postings[2].source_url,
            "https://www.naukri.com/job-listings-sre-789"
        );
    }

    #[test]
    fn test_missing_company_defaults_to_unknown() {
        let postings = parse_listing(LISTING, 10, Utc::now()).unwrap();
        assert_eq!(postings[1].company, "Unknown");
        assert_eq!(postings[1].experience_required, "");
    }

    #[test]
    fn test_legacy_job_tuple_markup() {
        let postings = parse_listing(LISTING, 10, Utc::now()).unwrap();
        assert_eq!(postings[2].title, "SRE");
        assert_eq!(postings[2].company, "Initech");
    }

    #[test]
    fn test_limit_caps_results() {
        let postings = parse_listing(LISTING, 1, Utc::now()).unwrap();
        assert_eq!(postings.len(), 1);
    }

    #[test]
    fn test_empty_page_yields_nothing() {
        let postings = parse_listing("<html></html>", 10, Utc::now()).unwrap();
        assert!(postings.is_empty());
    }

    #[test]
    fn test_search_url_slug() {
        let keywords = vec!["Rust".to_string(), "backend engineer".to_string()];
        assert_eq!(
            search_url(&keywords),
            "https://www.naukri.com/rust-backend-engineer-jobs"
        );
        assert_eq!(search_url(&[]), "https://www.naukri.com/jobs");
    }
}
