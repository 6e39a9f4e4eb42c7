use std::sync::{Arc, Mutex, MutexGuard};

/// Label shown on a control while its request is in flight.
pub const BUSY_LABEL: &str = "Updating...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub label: String,
    pub enabled: bool,
}

/// A button that triggers a scrape, optionally for a single category.
#[derive(Clone)]
pub struct TriggerControl {
    category: Option<String>,
    state: Arc<Mutex<ControlState>>,
}

impl TriggerControl {
    pub fn new(label: impl Into<String>, category: Option<String>) -> Self {
        Self {
            category,
            state: Arc::new(Mutex::new(ControlState {
                label: label.into(),
                enabled: true,
            })),
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn state(&self) -> ControlState {
        self.lock().clone()
    }

    /// Disables the control and swaps in the busy label. Returns `None` if
    /// the control is already disabled. Dropping the guard re-enables the
    /// control with its original label.
    pub fn begin_busy(&self) -> Option<BusyGuard> {
        let mut state = self.lock();
        if !state.enabled {
            return None;
        }

        state.enabled = false;
        let original_label = std::mem::replace(&mut state.label, BUSY_LABEL.to_string());

        Some(BusyGuard {
            state: Arc::clone(&self.state),
            original_label: Some(original_label),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ControlState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct BusyGuard {
    state: Arc<Mutex<ControlState>>,
    original_label: Option<String>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(label) = self.original_label.take() {
            state.label = label;
        }
        state.enabled = true;
    }
}
