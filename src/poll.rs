use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::client::PortalApi;
use crate::config::{FRESHNESS_WINDOW, POLL_INTERVAL};
use crate::ui::alert::{AlertBoard, Severity};

pub const NEW_ARTICLES_MESSAGE: &str = "New articles available!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    NewArticles,
    NothingNew,
    Failed,
}

/// True when `scraped_at` falls strictly inside the window ending at `now`.
pub fn is_fresh(scraped_at: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    match chrono::Duration::from_std(window) {
        Ok(window) => scraped_at > now - window,
        Err(_) => true,
    }
}

/// Runs one freshness check and shows the info banner if the latest article
/// is recent. Failures are logged and never reach the page.
pub async fn check_once<A: PortalApi + ?Sized>(api: &A, board: &AlertBoard) -> PollOutcome {
    let article = match api.latest_article().await {
        Ok(Some(article)) => article,
        Ok(None) => {
            debug!("No articles yet");
            return PollOutcome::NothingNew;
        }
        Err(e) => {
            error!("Auto-refresh error: {}", e);
            return PollOutcome::Failed;
        }
    };

    let scraped_at = match article.scraped_at() {
        Ok(Some(ts)) => ts,
        Ok(None) => {
            debug!("Latest article has no scrape date");
            return PollOutcome::NothingNew;
        }
        Err(e) => {
            error!("Auto-refresh error: {}", e);
            return PollOutcome::Failed;
        }
    };

    if is_fresh(scraped_at, Utc::now(), FRESHNESS_WINDOW) {
        info!(%scraped_at, "New articles detected");
        board.show(NEW_ARTICLES_MESSAGE, Severity::Info);
        PollOutcome::NewArticles
    } else {
        debug!(%scraped_at, "Latest article is not new");
        PollOutcome::NothingNew
    }
}

pub struct FreshnessPoll {
    handle: Option<JoinHandle<()>>,
}

impl FreshnessPoll {
    // First check runs one full interval after start.
    pub fn start<A: PortalApi + 'static>(api: Arc<A>, board: AlertBoard) -> Self {
        Self::start_with_interval(api, board, POLL_INTERVAL)
    }

    pub fn start_with_interval<A: PortalApi + 'static>(api: Arc<A>, board: AlertBoard, period: Duration) -> Self {
        info!(?period, "Starting freshness poll");
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                check_once(api.as_ref(), &board).await;
            }
        });

        Self { handle: Some(handle) }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Freshness poll stopped");
        }
    }
}

impl Drop for FreshnessPoll {
    fn drop(&mut self) {
        self.stop();
    }
}
