//! In-memory history provider
//!
//! Matches the typed text against visited URLs and page titles. Everything
//! happens synchronously inside `start`. Scoring is deliberately simple:
//! typed visits dominate, ordinary visits help, and title-only matches get a
//! negative sentinel relevance so the merge decides their final rank only if
//! they survive culling.

use super::Provider;
use crate::input::{InputType, SuggestionInput};
use crate::results::{style, MatchType, NavigationKind, SuggestionMatch};
use tracing::debug;

/// One visited page.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    pub visit_count: u32,
    pub typed_count: u32,
    pub starred: bool,
}

impl HistoryEntry {
    pub fn new(url: &str, title: &str, visit_count: u32, typed_count: u32) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            visit_count,
            typed_count,
            starred: false,
        }
    }

    pub fn starred(mut self) -> Self {
        self.starred = true;
        self
    }
}

pub struct HistoryProvider {
    entries: Vec<HistoryEntry>,
    matches: Vec<SuggestionMatch>,
    max_matches: usize,
    done: bool,
}

impl HistoryProvider {
    pub const NAME: &'static str = "history";

    pub fn new(max_matches: usize) -> Self {
        Self {
            entries: Vec::new(),
            matches: Vec::new(),
            max_matches,
            done: true,
        }
    }

    pub fn with_entries(mut self, entries: Vec<HistoryEntry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn add_entry(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// URL as matched and displayed: scheme and "www." stripped.
    fn display_url(url: &str) -> &str {
        let stripped = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);
        stripped.strip_prefix("www.").unwrap_or(stripped)
    }

    fn build_match(entry: &HistoryEntry, needle: &str) -> Option<SuggestionMatch> {
        let display = Self::display_url(&entry.url);
        let url_hit = SuggestionMatch::case_insensitive_find(display, needle);
        let title_hit = SuggestionMatch::case_insensitive_find(&entry.title, needle);
        if url_hit.is_none() && title_hit.is_none() {
            return None;
        }

        let base = 700 + 50 * entry.typed_count as i32 + 10 * entry.visit_count as i32;
        let relevance = base.min(1399);

        let mut m = if url_hit.is_some() {
            SuggestionMatch::new(Self::NAME, relevance, true, MatchType::HistoryUrl)
                .with_transition(NavigationKind::Typed)
        } else {
            // Title-only hits rank provisionally; the merge resolves the
            // sentinel if the match makes the cut.
            SuggestionMatch::new(Self::NAME, -relevance, true, MatchType::HistoryTitle)
                .with_transition(NavigationKind::Link)
        };

        m.destination_url = entry.url.clone();
        m.fill_into_edit = display.to_string();
        m.starred = entry.starred;
        m.contents = display.to_string();
        m.contents_class = SuggestionMatch::classify_location_in_string(
            url_hit.map(|(at, _)| at),
            url_hit.map_or(0, |(_, len)| len),
            display.len(),
            style::URL,
        );
        if !entry.title.is_empty() {
            m.description = entry.title.clone();
            m.description_class = SuggestionMatch::classify_location_in_string(
                title_hit.map(|(at, _)| at),
                title_hit.map_or(0, |(_, len)| len),
                entry.title.len(),
                style::DIM,
            );
        }
        if let Some((0, len)) = url_hit {
            m.inline_autocomplete_offset = Some(len);
        }
        Some(m)
    }
}

impl Provider for HistoryProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn start(&mut self, input: &SuggestionInput, minimal_changes: bool) {
        if minimal_changes && self.done {
            return;
        }
        self.matches.clear();
        self.done = true;

        // Forced queries bypass history; the user asked for a search.
        if matches!(
            input.input_type(),
            InputType::Invalid | InputType::ForcedQuery
        ) {
            return;
        }

        let needle = input.text().to_lowercase();
        if needle.is_empty() {
            return;
        }

        for entry in &self.entries {
            if let Some(m) = Self::build_match(entry, &needle) {
                self.matches.push(m);
            }
        }
        self.matches.sort_by(SuggestionMatch::relevance_cmp);
        self.matches.truncate(self.max_matches);
        if input.prevent_inline_autocomplete() {
            for m in &mut self.matches {
                m.inline_autocomplete_offset = None;
            }
        }
        debug!(
            matches = self.matches.len(),
            "history lookup for {:?}", input.text()
        );
    }

    fn stop(&mut self) {
        self.done = true;
    }

    fn matches(&self) -> Vec<SuggestionMatch> {
        self.matches.clone()
    }

    fn done(&self) -> bool {
        self.done
    }

    fn delete_match(&mut self, m: &SuggestionMatch) {
        self.entries.retain(|e| e.url != m.destination_url);
        self.matches
            .retain(|existing| existing.destination_url != m.destination_url);
    }
}
