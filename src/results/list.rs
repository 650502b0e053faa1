//! Bounded, ranked list of merged matches

use super::types::SuggestionMatch;
use crate::input::{InputType, SuggestionInput};
use crate::results::NavigationKind;
use std::cmp::Ordering;

/// The merged output of one pass over all providers: deduplicated, culled to
/// a fixed size, ranked, with a designated default match and possibly an
/// alternate navigation URL.
#[derive(Debug, Clone, Default)]
pub struct SuggestionList {
    matches: Vec<SuggestionMatch>,
    default_index: Option<usize>,
    alternate_nav_url: Option<String>,
}

impl SuggestionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches(&self) -> &[SuggestionMatch] {
        &self.matches
    }

    pub fn get(&self, index: usize) -> Option<&SuggestionMatch> {
        self.matches.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SuggestionMatch> {
        self.matches.iter()
    }

    pub fn default_index(&self) -> Option<usize> {
        self.default_index
    }

    pub fn default_match(&self) -> Option<&SuggestionMatch> {
        self.default_index.and_then(|i| self.matches.get(i))
    }

    /// URL to offer as "did you mean to navigate?" when the default match is
    /// a search over an ambiguous input.
    pub fn alternate_nav_url(&self) -> Option<&str> {
        self.alternate_nav_url.as_deref()
    }

    pub fn reset(&mut self) {
        self.matches.clear();
        self.default_index = None;
        self.alternate_nav_url = None;
    }

    pub fn copy_from(&mut self, other: &SuggestionList) {
        self.matches.clone_from(&other.matches);
        self.default_index = other.default_index;
        self.alternate_nav_url = other.alternate_nav_url.clone();
    }

    /// Append raw provider matches. Ordering metadata is invalidated until
    /// the next `sort_and_cull`.
    pub fn append_matches(&mut self, matches: &[SuggestionMatch]) {
        self.matches.extend_from_slice(matches);
        self.default_index = None;
        self.alternate_nav_url = None;
    }

    /// Merge the appended matches into final form:
    /// dedup by destination keeping the most relevant duplicate, cull to
    /// `max_matches`, resolve negative sentinel relevances, rank, pick the
    /// default match, and compute the alternate navigation URL.
    pub fn sort_and_cull(&mut self, input: &SuggestionInput, max_matches: usize) {
        // A configured bound of zero would leave no room for the default
        // match; treat it as one.
        let max_matches = max_matches.max(1);

        self.matches.sort_by(SuggestionMatch::destination_cmp);
        self.matches
            .dedup_by(|a, b| !a.destination_url.is_empty() && a.destination_url == b.destination_url);

        if self.matches.len() > max_matches {
            self.matches
                .select_nth_unstable_by(max_matches - 1, SuggestionMatch::relevance_cmp);
            self.matches.truncate(max_matches);
        }

        for m in &mut self.matches {
            if m.relevance < 0 {
                m.relevance = -m.relevance;
            }
        }

        self.matches.sort_by(SuggestionMatch::relevance_cmp);
        self.default_index = if self.matches.is_empty() { None } else { Some(0) };
        self.alternate_nav_url = self.compute_alternate_nav_url(input);
    }

    /// Insert one match into an already-merged list, keeping rank order and
    /// the current default match. Equal-ranking matches stay ahead of the
    /// insertion.
    pub fn add_match(&mut self, m: &SuggestionMatch) {
        debug_assert!(
            self.default_index.is_some(),
            "add_match on an unmerged list"
        );
        let insertion_point = self
            .matches
            .partition_point(|elem| SuggestionMatch::relevance_cmp(m, elem) != Ordering::Less);
        if let Some(default_index) = &mut self.default_index {
            if insertion_point <= *default_index {
                *default_index += 1;
            }
        }
        self.matches.insert(insertion_point, m.clone());
    }

    fn compute_alternate_nav_url(&self, input: &SuggestionInput) -> Option<String> {
        if !matches!(
            input.input_type(),
            InputType::Unknown | InputType::RequestedUrl
        ) {
            return None;
        }
        let default_match = self.default_match()?;
        // A typed or keyword default already goes where the input said;
        // offering the same place twice would be noise.
        if matches!(
            default_match.transition,
            NavigationKind::Typed | NavigationKind::Keyword
        ) {
            return None;
        }
        let canonical = input.canonicalized_url()?;
        if canonical.as_str() == default_match.destination_url {
            return None;
        }
        Some(canonical.to_string())
    }

    /// Check list well-formedness in debug builds.
    pub fn validate(&self) {
        for m in &self.matches {
            m.validate();
        }
        if let Some(i) = self.default_index {
            debug_assert!(i < self.matches.len(), "default match out of bounds");
        }
    }
}
