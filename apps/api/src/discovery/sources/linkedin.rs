use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use scraper::Html;
use tracing::debug;

use crate::discovery::sources::{
    fetch_html, first_text, selector, JobSource, SourceError, SourceQuery,
};
use crate::models::posting::RawPosting;

const LINKEDIN_GUEST_SEARCH_URL: &str =
    "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";
const DEFAULT_LOCATION: &str = "India";

/// LinkedIn public (logged-out) job search. Listing cards carry no description
/// or experience, so those fields stay empty.
pub struct LinkedInSource {
    client: Client,
}

impl LinkedInSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobSource for LinkedInSource {
    fn id(&self) -> &'static str {
        "linkedin"
    }

    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<RawPosting>, SourceError> {
        let keywords = query.keywords.join(" ");
        let location = query
            .countries
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_LOCATION);
        debug!("Fetching LinkedIn listings for '{keywords}' in {location}");

        let request = self.client.get(LINKEDIN_GUEST_SEARCH_URL).query(&[
            ("keywords", keywords.as_str()),
            ("location", location),
            ("start", "0"),
        ]);
        let html = fetch_html(request).await?;
        parse_listing(&html, query.limit, Utc::now())
    }
}

pub(crate) fn parse_listing(
    html: &str,
    limit: usize,
    discovered_at: DateTime<Utc>,
) -> Result<Vec<RawPosting>, SourceError> {
    let document = Html::parse_fragment(html);
    let card_sel = selector(".base-search-card")?;
    let title_sel = selector(".base-search-card__title")?;
    let company_sel = selector(".base-search-card__subtitle")?;
    let location_sel = selector(".job-search-card__location")?;
    let link_sel = selector("a.base-card__full-link")?;

    let postings = document
        .select(&card_sel)
        .filter_map(|card| {
            let title = first_text(&card, &title_sel).filter(|t| !t.is_empty())?;
            let source_url = card
                .select(&link_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(|href| href.split('?').next().unwrap_or(href).to_string())
                .unwrap_or_default();

            Some(RawPosting {
                title,
                company: first_text(&card, &company_sel)
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| "Unknown".to_string()),
                description: String::new(),
                location: first_text(&card, &location_sel).unwrap_or_default(),
                experience_required: String::new(),
                source: "linkedin".to_string(),
                source_url,
                discovered_at,
            })
        })
        .take(limit)
        .collect();

    Ok(postings)
}
