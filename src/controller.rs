use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::client::PortalApi;
use crate::config::RELOAD_DELAY;
use crate::ui::alert::{AlertBoard, Severity};
use crate::ui::control::TriggerControl;
use crate::ui::page::Navigator;

pub const SCRAPE_SUCCESS_MESSAGE: &str = "Articles updated successfully!";
pub const SCRAPE_FAILURE_MESSAGE: &str = "Error updating articles. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The backend reported success; a reload is scheduled.
    Updated,
    /// The request failed or the backend reported failure.
    Failed,
    /// The control was already busy; nothing was sent.
    Ignored,
}

pub struct UiController<A, N> {
    api: Arc<A>,
    navigator: Arc<N>,
    board: AlertBoard,
    reload_delay: Duration,
}

impl<A, N> UiController<A, N>
where
    A: PortalApi + 'static,
    N: Navigator + 'static,
{
    pub fn new(api: Arc<A>, navigator: Arc<N>, board: AlertBoard) -> Self {
        Self {
            api,
            navigator,
            board,
            reload_delay: RELOAD_DELAY,
        }
    }

    pub fn board(&self) -> &AlertBoard {
        &self.board
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Asks the backend to scrape, for the control's category if it has one.
    ///
    /// The control is disabled for the duration of the request and comes
    /// back enabled with its original label whatever the outcome.
    pub async fn trigger_scrape(&self, control: &TriggerControl) -> TriggerOutcome {
        let Some(_busy) = control.begin_busy() else {
            warn!("Scrape already in progress, ignoring trigger");
            return TriggerOutcome::Ignored;
        };

        let category = control.category();
        info!(category = category.unwrap_or("all"), "Triggering scrape");

        match self.api.trigger_scrape(category).await {
            Ok(response) if response.success => {
                self.board.show(SCRAPE_SUCCESS_MESSAGE, Severity::Success);
                self.schedule_reload();
                TriggerOutcome::Updated
            }
            Ok(_) => {
                error!(category = category.unwrap_or("all"), "Scrape reported failure");
                self.board.show(SCRAPE_FAILURE_MESSAGE, Severity::Danger);
                TriggerOutcome::Failed
            }
            Err(e) => {
                error!(category = category.unwrap_or("all"), "Scrape request failed: {}", e);
                self.board.show(SCRAPE_FAILURE_MESSAGE, Severity::Danger);
                TriggerOutcome::Failed
            }
        }
    }

    /// Shows a banner on the page.
    pub fn show_alert(&self, message: impl Into<String>, severity: Severity) {
        self.board.show(message, severity);
    }

    fn schedule_reload(&self) {
        let navigator = Arc::clone(&self.navigator);
        let delay = self.reload_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.reload().await;
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::models::{Article, ScrapeResponse, ScrapingLog};
    use crate::error::{AppError, Result};
    use crate::ui::control::{ControlState, BUSY_LABEL};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    /// Canned backend. `scrape` is the result handed back for every trigger.
    pub(crate) struct StubApi {
        pub scrape: fn() -> Result<ScrapeResponse>,
        pub latest: Mutex<Result<Option<Article>>>,
        pub requested: Mutex<Vec<Option<String>>>,
        pub seen_control: Mutex<Option<TriggerControl>>,
        pub observed: Mutex<Vec<ControlState>>,
    }

    impl StubApi {
        pub fn scraping(scrape: fn() -> Result<ScrapeResponse>) -> Self {
            Self {
                scrape,
                latest: Mutex::new(Ok(None)),
                requested: Mutex::new(Vec::new()),
                seen_control: Mutex::new(None),
                observed: Mutex::new(Vec::new()),
            }
        }

        pub fn with_latest(latest: Result<Option<Article>>) -> Self {
            let api = Self::scraping(|| Ok(ScrapeResponse { success: true }));
            *api.latest.lock().unwrap() = latest;
            api
        }
    }

    #[async_trait]
    impl PortalApi for StubApi {
        async fn trigger_scrape(&self, category: Option<&str>) -> Result<ScrapeResponse> {
            self.requested.lock().unwrap().push(category.map(String::from));
            if let Some(control) = self.seen_control.lock().unwrap().as_ref() {
                self.observed.lock().unwrap().push(control.state());
            }
            (self.scrape)()
        }

        async fn latest_article(&self) -> Result<Option<Article>> {
            match &*self.latest.lock().unwrap() {
                Ok(article) => Ok(article.clone()),
                Err(e) => Err(AppError::FetchError(e.to_string())),
            }
        }

        async fn list_articles(&self, _category: Option<&str>, _limit: u32, _offset: u32) -> Result<Vec<Article>> {
            Ok(Vec::new())
        }

        async fn scraping_logs(&self) -> Result<Vec<ScrapingLog>> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    pub(crate) struct CountingNavigator {
        pub reloads: AtomicUsize,
    }

    #[async_trait]
    impl Navigator for CountingNavigator {
        async fn reload(&self) {
            self.reloads.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn controller(api: StubApi) -> (UiController<StubApi, CountingNavigator>, Arc<CountingNavigator>) {
        let navigator = Arc::new(CountingNavigator::default());
        let controller = UiController::new(Arc::new(api), Arc::clone(&navigator), AlertBoard::new());
        (controller, navigator)
    }

    fn enabled(label: &str) -> ControlState {
        ControlState { label: label.into(), enabled: true }
    }

    #[tokio::test(start_paused = true)]
    async fn success_shows_one_banner_and_reloads_after_delay() {
        let (controller, navigator) = controller(StubApi::scraping(|| Ok(ScrapeResponse { success: true })));
        let control = TriggerControl::new("Update all", None);

        let outcome = controller.trigger_scrape(&control).await;
        assert_eq!(outcome, TriggerOutcome::Updated);
        assert_eq!(control.state(), enabled("Update all"));

        let alerts = controller.board().alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Success);
        assert_eq!(alerts[0].message, SCRAPE_SUCCESS_MESSAGE);

        sleep(Duration::from_millis(1_499)).await;
        assert_eq!(navigator.reloads.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(navigator.reloads.load(Ordering::SeqCst), 1);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(navigator.reloads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reported_failure_shows_error_and_never_reloads() {
        let (controller, navigator) = controller(StubApi::scraping(|| Ok(ScrapeResponse { success: false })));
        let control = TriggerControl::new("Update AI", Some("AI".into()));

        assert_eq!(controller.trigger_scrape(&control).await, TriggerOutcome::Failed);
        assert_eq!(control.state(), enabled("Update AI"));

        let alerts = controller.board().alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Danger);
        assert_eq!(alerts[0].message, SCRAPE_FAILURE_MESSAGE);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(navigator.reloads.load(Ordering::SeqCst), 0);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_shows_error_and_never_reloads() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::ERROR)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _log_guard = tracing::subscriber::set_default(subscriber);

        let (controller, navigator) = controller(StubApi::scraping(|| {
            Err(AppError::FetchError("connection refused".into()))
        }));
        let control = TriggerControl::new("Update all", None);

        assert_eq!(controller.trigger_scrape(&control).await, TriggerOutcome::Failed);

        let logged = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(logged.lines().count(), 1);
        assert!(logged.contains("connection refused"));
        assert_eq!(control.state(), enabled("Update all"));

        let alerts = controller.board().alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Danger);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(navigator.reloads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn control_is_busy_while_request_is_in_flight() {
        let api = StubApi::scraping(|| Ok(ScrapeResponse { success: true }));
        let control = TriggerControl::new("Update Space Tech", Some("Space Tech".into()));
        *api.seen_control.lock().unwrap() = Some(control.clone());
        let (controller, _navigator) = controller(api);

        controller.trigger_scrape(&control).await;

        let observed = controller.api().observed.lock().unwrap().clone();
        assert_eq!(observed, vec![ControlState { label: BUSY_LABEL.into(), enabled: false }]);
        let requested = controller.api().requested.lock().unwrap().clone();
        assert_eq!(requested, vec![Some("Space Tech".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn busy_control_sends_nothing() {
        let (controller, _navigator) = controller(StubApi::scraping(|| Ok(ScrapeResponse { success: true })));
        let control = TriggerControl::new("Update all", None);
        let busy = control.begin_busy().unwrap();

        assert_eq!(controller.trigger_scrape(&control).await, TriggerOutcome::Ignored);
        assert!(controller.api().requested.lock().unwrap().is_empty());
        assert!(controller.board().is_empty());

        drop(busy);
        assert_eq!(control.state(), enabled("Update all"));
    }

    #[tokio::test(start_paused = true)]
    async fn success_banner_expires_after_five_seconds() {
        let (controller, _navigator) = controller(StubApi::scraping(|| Ok(ScrapeResponse { success: true })));
        controller.trigger_scrape(&TriggerControl::new("Update all", None)).await;

        sleep(Duration::from_millis(5_001)).await;
        assert!(controller.board().is_empty());
    }
}
