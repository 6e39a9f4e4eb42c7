use async_trait::async_trait;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

use crate::client::{PortalApi, PAGE_SIZE};
use crate::console;

/// Reloads the page the user is looking at.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn reload(&self);
}

/// Page rendered on a terminal. Reloading fetches the current article
/// listing again and prints it.
pub struct ConsolePage<A, W> {
    api: Arc<A>,
    category: Option<String>,
    out: Mutex<W>,
}

impl<A, W> ConsolePage<A, W>
where
    A: PortalApi,
    W: Write + Send,
{
    pub fn new(api: Arc<A>, category: Option<String>, out: W) -> Self {
        Self {
            api,
            category,
            out: Mutex::new(out),
        }
    }

    pub async fn render(&self) {
        let text = match self.api.list_articles(self.category.as_deref(), PAGE_SIZE, 0).await {
            Ok(articles) => console::render_articles(&articles),
            Err(e) => {
                error!("Failed to load articles: {}", e);
                "Could not load articles.\n".to_string()
            }
        };

        let mut out = self.out.lock().await;
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            error!("Failed to write page: {}", e);
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<A, W> Navigator for ConsolePage<A, W>
where
    A: PortalApi,
    W: Write + Send,
{
    async fn reload(&self) {
        self.render().await;
    }
}
