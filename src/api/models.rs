use serde::Deserialize;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{AppError, Result};

/// Body of `POST /api/scrape`. Only the success flag is read; a body
/// without one counts as a failed scrape.
#[derive(Debug, Deserialize)]
pub struct ScrapeResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct ArticlesResponse {
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub scraped_date: Option<String>,
}

impl Article {
    /// When the backend recorded the article, if it says.
    pub fn scraped_at(&self) -> Result<Option<DateTime<Utc>>> {
        self.scraped_date.as_deref().map(parse_timestamp).transpose()
    }
}

#[derive(Debug, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<ScrapingLog>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapingLog {
    pub id: i64,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub articles_found: Option<u32>,
    #[serde(default)]
    pub articles_new: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Accepts RFC 3339 timestamps and naive ISO-8601 ones (with or without
/// fractional seconds). Naive timestamps are read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| AppError::ParseError(format!("Invalid timestamp {:?}: {}", raw, e)))
}
