use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use portal_client::{
    config::Config,
    client::{PortalApi, PortalClient, PAGE_SIZE},
    console::{self, Command},
    controller::{TriggerOutcome, UiController},
    poll::FreshnessPoll,
    ui::{alert::{AlertBoard, Severity}, control::TriggerControl, page::ConsolePage},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they don't interleave with the page on stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;
    info!(url = %config.portal_url, "Connecting to portal");

    let state = AppState {
        api: Arc::new(PortalClient::new(config.portal_url.clone())),
        config: Arc::new(config),
    };

    let board = AlertBoard::new();
    let page = Arc::new(ConsolePage::new(Arc::clone(&state.api), None, std::io::stdout()));
    let controller = Arc::new(UiController::new(Arc::clone(&state.api), Arc::clone(&page), board.clone()));

    // One trigger for everything, one per category
    let update_all = TriggerControl::new("Update all", None);
    let category_controls: HashMap<String, TriggerControl> = state
        .config
        .categories
        .iter()
        .map(|c| (c.clone(), TriggerControl::new(format!("Update {}", c), Some(c.clone()))))
        .collect();

    let mut poll = FreshnessPoll::start(Arc::clone(&state.api), board.clone());

    page.render().await;
    print!("{}", console::HELP);

    let mut banners = board.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = banners.changed() => {
                if changed.is_err() {
                    break;
                }
                let alerts = banners.borrow_and_update().clone();
                print!("{}", console::render_alerts(&alerts));
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(msg) => {
                        println!("{}", msg);
                        continue;
                    }
                };

                match command {
                    Command::Scrape(category) => {
                        let control = match category.as_deref() {
                            None => update_all.clone(),
                            Some(wanted) => match console::resolve_category(&state.config.categories, wanted) {
                                Some(name) => category_controls[name].clone(),
                                None => {
                                    controller.show_alert(format!("Unknown category: {}", wanted), Severity::Danger);
                                    continue;
                                }
                            },
                        };

                        let controller = Arc::clone(&controller);
                        tokio::spawn(async move {
                            if controller.trigger_scrape(&control).await == TriggerOutcome::Ignored {
                                println!("{} is already running", control.category().unwrap_or("Update"));
                            }
                        });
                    }
                    Command::Dismiss(id) => {
                        if !board.dismiss(id) {
                            println!("No banner {}", id);
                        }
                    }
                    Command::Articles(category) => {
                        let api = Arc::clone(&state.api);
                        tokio::spawn(async move {
                            match api.list_articles(category.as_deref(), PAGE_SIZE, 0).await {
                                Ok(articles) => print!("{}", console::render_articles(&articles)),
                                Err(e) => {
                                    error!("Failed to load articles: {}", e);
                                    println!("Could not load articles.");
                                }
                            }
                        });
                    }
                    Command::Logs => {
                        let api = Arc::clone(&state.api);
                        tokio::spawn(async move {
                            match api.scraping_logs().await {
                                Ok(logs) => print!("{}", console::render_logs(&logs)),
                                Err(e) => {
                                    error!("Failed to load scraping logs: {}", e);
                                    println!("Could not load scraping logs.");
                                }
                            }
                        });
                    }
                    Command::Categories => {
                        for category in &state.config.categories {
                            println!("  {}", category);
                        }
                    }
                    Command::Help => print!("{}", console::HELP),
                    Command::Quit => break,
                }
            }
        }
    }

    poll.stop();
    info!("Portal client stopped");
    Ok(())
}
