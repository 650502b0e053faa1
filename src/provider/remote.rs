//! Remote search-suggest provider
//!
//! Asks a suggestion service what the typed text might be a prefix of. The
//! fetch runs on a spawned task; a generation counter stales out responses
//! that arrive after a newer query or a stop, so the controller never hears
//! from a query it no longer cares about.

use super::{fill_url_template, Provider, ProviderError};
use crate::controller::ControllerHandle;
use crate::input::{InputType, SuggestionInput};
use crate::network::HttpClient;
use crate::results::{style, MatchType, NavigationKind, SuggestionMatch};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Trait for suggestion service backends
#[async_trait]
pub trait SuggestBackend: Send + Sync {
    /// Backend name
    fn name(&self) -> &str;

    /// Fetch suggestions for a query
    async fn suggest(
        &self,
        client: &HttpClient,
        query: &str,
    ) -> Result<Vec<String>, ProviderError>;
}

/// Backend speaking the OpenSearch suggestion format:
/// `[query, [suggestions...]]`.
pub struct OpenSearchBackend {
    name: String,
    url: String,
}

impl OpenSearchBackend {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl SuggestBackend for OpenSearchBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn suggest(
        &self,
        client: &HttpClient,
        query: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let mut params = HashMap::new();
        params.insert("q".to_string(), query.to_string());
        params.insert("type".to_string(), "list".to_string());

        let response = client
            .get_with_params(&self.url, params)
            .await
            .map_err(ProviderError::Network)?;
        if !response.is_success() {
            return Err(ProviderError::Status(response.status));
        }

        let json: serde_json::Value = serde_json::from_str(&response.text)?;
        let suggestions = json
            .as_array()
            .and_then(|arr| arr.get(1))
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(suggestions)
    }
}

pub struct RemoteSuggestProvider {
    backend: Arc<dyn SuggestBackend>,
    client: HttpClient,
    listener: ControllerHandle,
    search_url_template: String,
    max_matches: usize,
    matches: Arc<RwLock<Vec<SuggestionMatch>>>,
    done: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
    last_query: String,
}

impl RemoteSuggestProvider {
    pub const NAME: &'static str = "remote-suggest";

    pub fn new(
        backend: Arc<dyn SuggestBackend>,
        client: HttpClient,
        listener: ControllerHandle,
        search_url_template: &str,
        max_matches: usize,
    ) -> Self {
        Self {
            backend,
            client,
            listener,
            search_url_template: search_url_template.to_string(),
            max_matches,
            matches: Arc::new(RwLock::new(Vec::new())),
            done: Arc::new(AtomicBool::new(true)),
            generation: Arc::new(AtomicU64::new(0)),
            last_query: String::new(),
        }
    }

    fn build_matches(
        suggestions: &[String],
        query: &str,
        search_url_template: &str,
        max_matches: usize,
    ) -> Vec<SuggestionMatch> {
        suggestions
            .iter()
            .take(max_matches)
            .enumerate()
            .map(|(i, suggestion)| {
                let mut m = SuggestionMatch::new(
                    Self::NAME,
                    550 - i as i32,
                    false,
                    MatchType::SearchSuggest,
                )
                .with_transition(NavigationKind::Generated)
                .with_destination(&fill_url_template(search_url_template, suggestion))
                .with_fill_into_edit(suggestion);
                m.contents = suggestion.clone();
                m.contents_class = SuggestionMatch::classify_match_in_string(
                    query,
                    suggestion,
                    style::NONE,
                );
                m
            })
            .collect()
    }
}

impl Provider for RemoteSuggestProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn start(&mut self, input: &SuggestionInput, minimal_changes: bool) {
        // Any previous fetch is now stale.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if input.synchronous_only() {
            self.matches.write().unwrap().clear();
            self.done.store(true, Ordering::SeqCst);
            return;
        }
        if minimal_changes && self.done.load(Ordering::SeqCst) && input.text() == self.last_query
        {
            return;
        }
        self.last_query = input.text().to_string();

        // Explicit URLs don't get query suggestions.
        if matches!(input.input_type(), InputType::Invalid | InputType::Url) {
            self.matches.write().unwrap().clear();
            self.done.store(true, Ordering::SeqCst);
            return;
        }

        self.done.store(false, Ordering::SeqCst);
        let query = input.text().to_string();
        let backend = Arc::clone(&self.backend);
        let client = self.client.clone();
        let listener = self.listener.clone();
        let matches = Arc::clone(&self.matches);
        let done = Arc::clone(&self.done);
        let current_generation = Arc::clone(&self.generation);
        let search_url_template = self.search_url_template.clone();
        let max_matches = self.max_matches;

        tokio::spawn(async move {
            let result = backend.suggest(&client, &query).await;
            if current_generation.load(Ordering::SeqCst) != generation {
                debug!("dropping stale suggest response for {:?}", query);
                return;
            }
            match result {
                Ok(suggestions) => {
                    let new_matches = Self::build_matches(
                        &suggestions,
                        &query,
                        &search_url_template,
                        max_matches,
                    );
                    let changed = !new_matches.is_empty();
                    *matches.write().unwrap() = new_matches;
                    done.store(true, Ordering::SeqCst);
                    listener.on_provider_update(changed);
                }
                Err(err) => {
                    warn!("suggest backend failed for {:?}: {}", query, err);
                    matches.write().unwrap().clear();
                    done.store(true, Ordering::SeqCst);
                    listener.on_provider_update(false);
                }
            }
        });
    }

    fn stop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.done.store(true, Ordering::SeqCst);
    }

    fn matches(&self) -> Vec<SuggestionMatch> {
        self.matches.read().unwrap().clone()
    }

    fn done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }
}
