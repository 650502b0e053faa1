//! omnibar-rs demo binary
//!
//! Classifies the query given on the command line, runs it through a
//! controller wired with the bundled providers, and prints each committed
//! result list.

use anyhow::Result;
use omnibar_rs::{
    config::{self, Settings},
    controller::{SuggestionController, SuggestionObserver},
    input::SuggestionInput,
    network::HttpClient,
    provider::{HistoryEntry, HistoryProvider, OpenSearchBackend, RemoteSuggestProvider},
    results::SuggestionList,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Prints every committed result list.
struct PrintObserver;

impl SuggestionObserver for PrintObserver {
    fn on_result_changed(&mut self, result: &SuggestionList) {
        info!("committed {} matches", result.len());
        for (i, m) in result.iter().enumerate() {
            let marker = if Some(i) == result.default_index() {
                "*"
            } else {
                " "
            };
            info!(
                "{} [{:>4}] {:<22} {} -> {}",
                marker,
                m.relevance,
                m.match_type.as_str(),
                m.contents,
                m.destination_url
            );
        }
        if let Some(alternate) = result.alternate_nav_url() {
            info!("  (did you mean to go to {}?)", alternate);
        }
    }

    fn on_default_match_changed(&mut self, _result: &SuggestionList) {}
}

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("omnibar-rs v{}", omnibar_rs::VERSION);

    let settings = load_settings()?;
    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "wikipedia".to_string());

    let input = SuggestionInput::new(&query, "", false, false, false);
    info!(
        "input {:?} classified as {}",
        input.text(),
        input.input_type().as_str()
    );

    let mut controller = SuggestionController::new(&settings);

    if settings.providers.history {
        let history = HistoryProvider::new(settings.limits.provider_max_matches)
            .with_entries(demo_history());
        controller.add_provider(Box::new(history));
    }
    if settings.providers.remote_suggest {
        let client = HttpClient::with_settings(&settings.outgoing)?;
        let backend = Arc::new(OpenSearchBackend::new(
            "suggest",
            &settings.suggest.suggest_url,
        ));
        let remote = RemoteSuggestProvider::new(
            backend,
            client,
            controller.handle(),
            &settings.suggest.search_url_template,
            settings.limits.provider_max_matches,
        );
        controller.add_provider(Box::new(remote));
    }
    controller.add_observer(Box::new(PrintObserver));

    controller.start(&query, "", false, false, false);
    controller.run_until_done().await;

    Ok(())
}

/// Load settings from file or use defaults
fn load_settings() -> Result<Settings> {
    if let Ok(path) = std::env::var("OMNIBAR_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("loading settings from {}", path.display());
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }
    config::load_settings(&[
        Path::new("settings.yml"),
        Path::new("config/settings.yml"),
        Path::new("/etc/omnibar-rs/settings.yml"),
    ])
}

/// A little browsing history so the demo has something local to match.
fn demo_history() -> Vec<HistoryEntry> {
    vec![
        HistoryEntry::new("https://www.wikipedia.org/", "Wikipedia", 40, 12).starred(),
        HistoryEntry::new(
            "https://en.wikipedia.org/wiki/Rust_(programming_language)",
            "Rust (programming language) - Wikipedia",
            15,
            3,
        ),
        HistoryEntry::new("https://news.ycombinator.com/", "Hacker News", 60, 25),
        HistoryEntry::new("https://doc.rust-lang.org/book/", "The Rust Book", 22, 8),
        HistoryEntry::new("https://github.com/", "GitHub", 30, 10),
    ]
}
