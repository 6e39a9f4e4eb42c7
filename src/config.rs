use std::env;
use std::time::Duration;
use reqwest::Url;
use crate::error::{AppError, Result};

/// How often the freshness poll asks for the latest article.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);
/// An article scraped within this window counts as new.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(5 * 60);
/// Lifetime of a banner that nobody dismissed.
pub const ALERT_LIFETIME: Duration = Duration::from_secs(5);
/// Delay between a successful scrape and the page reload.
pub const RELOAD_DELAY: Duration = Duration::from_millis(1500);

const DEFAULT_PORTAL_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_CATEGORIES: [&str; 5] = [
    "AI",
    "Quantum Computing",
    "Defence Tech",
    "Space Tech",
    "Renewable Energy",
];

#[derive(Clone, Debug)]
pub struct Config {
    pub portal_url: Url,
    pub categories: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let portal_url = env::var("PORTAL_URL").unwrap_or_else(|_| DEFAULT_PORTAL_URL.to_string());
        let portal_url = parse_portal_url(&portal_url)?;

        let categories = match env::var("PORTAL_CATEGORIES") {
            Ok(raw) => parse_categories(&raw),
            Err(env::VarError::NotPresent) => default_categories(),
            Err(e) => return Err(e.into()),
        };

        Ok(Config {
            portal_url,
            categories,
        })
    }
}

fn parse_portal_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::ConfigError(format!("Invalid portal url {:?}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::ConfigError(format!("Unsupported portal url scheme: {}", other))),
    }
}

fn parse_categories(raw: &str) -> Vec<String> {
    let categories: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect();

    if categories.is_empty() {
        default_categories()
    } else {
        categories
    }
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}
