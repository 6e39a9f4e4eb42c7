use reqwest::Url;

pub const SCRAPE_PATH: &str = "/api/scrape";
pub const ARTICLES_PATH: &str = "/api/articles";
pub const LOGS_PATH: &str = "/api/logs";

/// `POST /api/scrape`, with `?category=` when a category is given.
pub fn scrape_url(base: &Url, category: Option<&str>) -> String {
    let mut url = join(base, SCRAPE_PATH);
    if let Some(category) = category {
        url.push_str("?category=");
        url.push_str(&urlencoding::encode(category));
    }
    url
}

pub fn articles_url(base: &Url, category: Option<&str>, limit: u32, offset: u32) -> String {
    let mut url = join(base, ARTICLES_PATH);
    url.push('?');
    if let Some(category) = category {
        url.push_str("category=");
        url.push_str(&urlencoding::encode(category));
        url.push('&');
    }
    url.push_str(&format!("limit={}", limit));
    if offset > 0 {
        url.push_str(&format!("&offset={}", offset));
    }
    url
}

pub fn logs_url(base: &Url) -> String {
    join(base, LOGS_PATH)
}

fn join(base: &Url, path: &str) -> String {
    format!("{}{}", base.as_str().trim_end_matches('/'), path)
}
