use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

use crate::config::ALERT_LIFETIME;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Danger,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type AlertId = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub id: AlertId,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

/// The page's banner container, newest first.
#[derive(Clone)]
pub struct AlertBoard {
    alerts: Arc<watch::Sender<Vec<Alert>>>,
    next_id: Arc<AtomicU64>,
    lifetime: Duration,
}

impl AlertBoard {
    pub fn new() -> Self {
        Self::with_lifetime(ALERT_LIFETIME)
    }

    pub fn with_lifetime(lifetime: Duration) -> Self {
        let (alerts, _) = watch::channel(Vec::new());
        Self {
            alerts: Arc::new(alerts),
            next_id: Arc::new(AtomicU64::new(1)),
            lifetime,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&self, message: impl Into<String>, severity: Severity) -> AlertId {
        let alert = Alert {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            message: message.into(),
            severity,
            created_at: Utc::now(),
        };
        let id = alert.id;
        debug!(id, %severity, message = %alert.message, "Showing alert");

        self.alerts.send_modify(|alerts| alerts.insert(0, alert));

        let board = self.clone();
        let lifetime = self.lifetime;
        tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;
            if board.remove(id) {
                debug!(id, "Alert expired");
            }
        });

        id
    }

    pub fn dismiss(&self, id: AlertId) -> bool {
        self.remove(id)
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.borrow().is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Alert>> {
        self.alerts.subscribe()
    }

    fn remove(&self, id: AlertId) -> bool {
        self.alerts.send_if_modified(|alerts| {
            let before = alerts.len();
            alerts.retain(|alert| alert.id != id);
            alerts.len() != before
        })
    }
}

impl Default for AlertBoard {
    fn default() -> Self {
        Self::new()
    }
}
