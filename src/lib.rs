pub mod api;
pub mod client;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod poll;
pub mod ui;

use std::sync::Arc;
use config::Config;

/// Application state shared by the console loop
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: Arc<client::PortalClient>,
}
