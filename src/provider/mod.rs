//! Provider contract
//!
//! A provider turns a classified input into scored matches. Synchronous
//! providers finish inside `start`; asynchronous ones return immediately,
//! report `done() == false`, and signal the controller through a
//! `ControllerHandle` when their matches change. A provider must never
//! signal after `stop`.

pub mod history;
pub mod remote;

use crate::input::SuggestionInput;
use crate::results::SuggestionMatch;
use thiserror::Error;

pub use history::{HistoryEntry, HistoryProvider};
pub use remote::{OpenSearchBackend, RemoteSuggestProvider, SuggestBackend};

/// Errors a provider can hit while fetching suggestions. The controller
/// never sees these; a failing provider logs, reports no matches, and
/// declares itself done.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Network(anyhow::Error),
    #[error("suggest endpoint returned HTTP {0}")]
    Status(u16),
    #[error("malformed suggest payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub trait Provider: Send {
    /// Stable name, used for logging and match attribution.
    fn name(&self) -> &str;

    /// Begin a query. `minimal_changes` hints that the input is essentially
    /// the same as the previous one and cached matches may be kept. When
    /// `input.synchronous_only()` is set the provider must be done on
    /// return.
    fn start(&mut self, input: &SuggestionInput, minimal_changes: bool);

    /// Cancel any in-flight work. Current matches remain readable.
    fn stop(&mut self);

    /// Snapshot of the provider's current matches.
    fn matches(&self) -> Vec<SuggestionMatch>;

    /// Whether the provider has all the matches it is going to get.
    fn done(&self) -> bool;

    /// Remove a deletable match and its backing data. Only called with
    /// matches this provider produced.
    fn delete_match(&mut self, _m: &SuggestionMatch) {}
}

/// Fill a `{query}` URL template with the percent-encoded query.
pub fn fill_url_template(template: &str, query: &str) -> String {
    template.replace("{query}", &urlencoding::encode(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_url_template() {
        assert_eq!(
            fill_url_template("https://example.com/?q={query}", "rust lang"),
            "https://example.com/?q=rust%20lang"
        );
        assert_eq!(
            fill_url_template("about:history?q={query}", "c++"),
            "about:history?q=c%2B%2B"
        );
    }
}
