use std::fmt::Write as _;
use std::str::FromStr;

use crate::api::models::{Article, ScrapingLog};
use crate::ui::alert::{Alert, AlertId, Severity};

pub const HELP: &str = "\
Commands:
  scrape [category]     update articles, optionally for one category
  dismiss <id>          close a banner
  articles [category]   list the latest articles
  logs                  show recent scraping runs
  categories            list known categories
  help                  show this help
  quit                  exit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scrape(Option<String>),
    Dismiss(AlertId),
    Articles(Option<String>),
    Logs,
    Categories,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        match word.to_ascii_lowercase().as_str() {
            "scrape" | "update" => Ok(Command::Scrape(argument)),
            "dismiss" | "close" => rest
                .parse()
                .map(Command::Dismiss)
                .map_err(|_| format!("Expected a banner id, got {:?}", rest)),
            "articles" | "ls" => Ok(Command::Articles(argument)),
            "logs" => Ok(Command::Logs),
            "categories" => Ok(Command::Categories),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err("Empty command".to_string()),
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}

/// Finds a configured category by case-insensitive name.
pub fn resolve_category<'a>(categories: &'a [String], wanted: &str) -> Option<&'a str> {
    categories
        .iter()
        .find(|c| c.eq_ignore_ascii_case(wanted.trim()))
        .map(String::as_str)
}

pub fn render_alerts(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "(no banners)\n".to_string();
    }

    let mut out = String::new();
    for alert in alerts {
        let tag = match alert.severity {
            Severity::Success => "OK",
            Severity::Danger => "ERROR",
            Severity::Info => "INFO",
        };
        let _ = writeln!(out, "[{}] {} (dismiss {})", tag, alert.message, alert.id);
    }
    out
}

pub fn render_articles(articles: &[Article]) -> String {
    if articles.is_empty() {
        return "No articles yet.\n".to_string();
    }

    let mut out = String::new();
    for article in articles {
        let title = article.title.as_deref().unwrap_or("(untitled)");
        let category = article.category.as_deref().unwrap_or("-");
        let source = article.source_name.as_deref().unwrap_or("unknown source");
        let _ = writeln!(out, "* [{}] {} ({})", category, title, source);
        if let Some(url) = &article.source_url {
            let _ = writeln!(out, "    {}", url);
        }
    }
    out
}

pub fn render_logs(logs: &[ScrapingLog]) -> String {
    if logs.is_empty() {
        return "No scraping runs recorded.\n".to_string();
    }

    let mut out = String::new();
    for log in logs {
        let _ = write!(
            out,
            "#{} {} / {}: {} ({} found, {} new)",
            log.id,
            log.source_name.as_deref().unwrap_or("?"),
            log.category.as_deref().unwrap_or("?"),
            log.status.as_deref().unwrap_or("unknown"),
            log.articles_found.unwrap_or(0),
            log.articles_new.unwrap_or(0),
        );
        if let Some(err) = &log.error_message {
            let _ = write!(out, " - {}", err);
        }
        out.push('\n');
    }
    out
}
