//! Match types for the suggestion engine

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Display styles for classified runs of match text. Styles are a bitmask
/// so a run can be both matched and dimmed.
pub mod style {
    pub const NONE: u32 = 0;
    /// Render as a URL (link color).
    pub const URL: u32 = 1 << 0;
    /// Boldface; the run matched the typed text.
    pub const MATCH: u32 = 1 << 1;
    /// De-emphasized, e.g. a description the user didn't type.
    pub const DIM: u32 = 1 << 2;
}

/// One styled run of match text. The run starts at `offset` (a byte offset)
/// and extends to the next classification, or to the end of the string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextClassification {
    pub offset: usize,
    pub style: u32,
}

impl TextClassification {
    pub fn new(offset: usize, style: u32) -> Self {
        Self { offset, style }
    }
}

/// What kind of thing a match is, which controls its icon and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchType {
    /// The input itself, as a navigable URL.
    UrlWhatYouTyped,
    /// A URL from the user's history.
    HistoryUrl,
    /// A history page whose title matched.
    HistoryTitle,
    /// A history page whose body matched.
    HistoryBody,
    /// A history page matched via keyword.
    HistoryKeyword,
    /// A suggested navigation from a remote service.
    NavSuggest,
    /// The input itself, as a search query.
    SearchWhatYouTyped,
    /// A search the user has run before.
    SearchHistory,
    /// A query suggested by a remote service.
    SearchSuggest,
    /// A search on a non-default engine.
    SearchOtherEngine,
    /// Synthesized shortcut to the full results page.
    OpenHistoryPage,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::UrlWhatYouTyped => "url-what-you-typed",
            MatchType::HistoryUrl => "history-url",
            MatchType::HistoryTitle => "history-title",
            MatchType::HistoryBody => "history-body",
            MatchType::HistoryKeyword => "history-keyword",
            MatchType::NavSuggest => "navsuggest",
            MatchType::SearchWhatYouTyped => "search-what-you-typed",
            MatchType::SearchHistory => "search-history",
            MatchType::SearchSuggest => "search-suggest",
            MatchType::SearchOtherEngine => "search-other-engine",
            MatchType::OpenHistoryPage => "open-history-page",
        }
    }
}

/// How the navigation will be recorded if the match is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationKind {
    Typed,
    Link,
    Generated,
    Keyword,
    AutoBookmark,
}

/// A single suggestion produced by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionMatch {
    /// Name of the provider that produced this match.
    pub provider: String,
    /// Ranking weight. Higher sorts earlier. A negative value marks a match
    /// whose true relevance is not yet known; merging negates it if the
    /// match survives culling.
    pub relevance: i32,
    /// Whether the user may remove this match (and its backing data).
    pub deletable: bool,
    pub match_type: MatchType,
    /// Text displayed for the match.
    pub contents: String,
    pub contents_class: Vec<TextClassification>,
    /// Additional helper text, e.g. a page title.
    pub description: String,
    pub description_class: Vec<TextClassification>,
    /// Where opening the match navigates. Also the merge dedup key.
    pub destination_url: String,
    /// Text placed in the edit field when the match is selected.
    pub fill_into_edit: String,
    /// Byte offset into `fill_into_edit` where inline autocompletion could
    /// begin, when the match can be inlined.
    pub inline_autocomplete_offset: Option<usize>,
    pub transition: NavigationKind,
    /// Whether the destination is bookmarked.
    pub starred: bool,
}

impl SuggestionMatch {
    pub fn new(provider: &str, relevance: i32, deletable: bool, match_type: MatchType) -> Self {
        Self {
            provider: provider.to_string(),
            relevance,
            deletable,
            match_type,
            contents: String::new(),
            contents_class: Vec::new(),
            description: String::new(),
            description_class: Vec::new(),
            destination_url: String::new(),
            fill_into_edit: String::new(),
            inline_autocomplete_offset: None,
            transition: NavigationKind::Typed,
            starred: false,
        }
    }

    pub fn with_destination(mut self, url: &str) -> Self {
        self.destination_url = url.to_string();
        self
    }

    /// Set the display text with a single unstyled run.
    pub fn with_contents(mut self, contents: &str) -> Self {
        self.contents = contents.to_string();
        if !self.contents.is_empty() && self.contents_class.is_empty() {
            self.contents_class.push(TextClassification::new(0, style::NONE));
        }
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        if !self.description.is_empty() && self.description_class.is_empty() {
            self.description_class
                .push(TextClassification::new(0, style::NONE));
        }
        self
    }

    pub fn with_fill_into_edit(mut self, text: &str) -> Self {
        self.fill_into_edit = text.to_string();
        self
    }

    pub fn with_transition(mut self, transition: NavigationKind) -> Self {
        self.transition = transition;
        self
    }

    /// Whether `self` should be ranked ahead of `other`.
    ///
    /// Ties in relevance break toward the lexically greater contents so
    /// ordering stays deterministic. When both relevances are negative
    /// sentinels the comparison inverts: -10 stands for an eventual 10 and
    /// must beat -5.
    pub fn more_relevant(&self, other: &Self) -> bool {
        Self::relevance_cmp(self, other) == Ordering::Less
    }

    /// Total order for ranking: `Less` means "ranks earlier".
    pub fn relevance_cmp(a: &Self, b: &Self) -> Ordering {
        if a.relevance == b.relevance {
            return b.contents.cmp(&a.contents);
        }
        let ord = b.relevance.cmp(&a.relevance);
        if a.relevance < 0 && b.relevance < 0 {
            ord.reverse()
        } else {
            ord
        }
    }

    /// Merge order: destination first so duplicates become adjacent, then
    /// rank so the best duplicate survives.
    pub fn destination_cmp(a: &Self, b: &Self) -> Ordering {
        a.destination_url
            .cmp(&b.destination_url)
            .then_with(|| Self::relevance_cmp(a, b))
    }

    /// Classify text against a located occurrence of the typed text.
    /// `None` for the location classifies the whole string with `base_style`.
    pub fn classify_location_in_string(
        location: Option<usize>,
        match_len: usize,
        overall_len: usize,
        base_style: u32,
    ) -> Vec<TextClassification> {
        let mut classes = Vec::new();
        let Some(location) = location else {
            classes.push(TextClassification::new(0, base_style));
            return classes;
        };
        if location > 0 {
            classes.push(TextClassification::new(0, base_style));
        }
        if match_len > 0 {
            let match_style = (base_style | style::MATCH) & !style::DIM;
            classes.push(TextClassification::new(location, match_style));
            if location + match_len < overall_len {
                classes.push(TextClassification::new(location + match_len, base_style));
            }
        }
        classes
    }

    /// Classify `text` by searching for `find_text` (case-insensitive).
    pub fn classify_match_in_string(
        find_text: &str,
        text: &str,
        base_style: u32,
    ) -> Vec<TextClassification> {
        match Self::case_insensitive_find(text, find_text) {
            Some((location, len)) => {
                Self::classify_location_in_string(Some(location), len, text.len(), base_style)
            }
            None => Self::classify_location_in_string(None, 0, text.len(), base_style),
        }
    }

    /// Case-insensitive search for `find_text` in `text`, returning the byte
    /// offset and byte length of the first occurrence. Both are measured in
    /// `text` itself and fall on its char boundaries; lowercasing the
    /// haystack first would shift offsets wherever case folding changes byte
    /// lengths.
    pub fn case_insensitive_find(text: &str, find_text: &str) -> Option<(usize, usize)> {
        if find_text.is_empty() {
            return None;
        }
        let needle: Vec<char> = find_text.chars().collect();
        for (start, _) in text.char_indices() {
            let mut len = 0;
            let mut matched = 0;
            for (hay, want) in text[start..].chars().zip(&needle) {
                if hay != *want && !hay.to_lowercase().eq(want.to_lowercase()) {
                    break;
                }
                len += hay.len_utf8();
                matched += 1;
            }
            if matched == needle.len() {
                return Some((start, len));
            }
        }
        None
    }

    /// Check classification well-formedness: in-bounds, ordered offsets.
    pub fn validate(&self) {
        Self::validate_classifications(&self.contents, &self.contents_class);
        Self::validate_classifications(&self.description, &self.description_class);
    }

    fn validate_classifications(text: &str, classes: &[TextClassification]) {
        if text.is_empty() {
            debug_assert!(classes.is_empty(), "empty text should have no classes");
            return;
        }
        debug_assert!(!classes.is_empty(), "text {:?} lacks classifications", text);
        debug_assert_eq!(0, classes[0].offset, "classifications must start at 0");
        let mut last = 0;
        for class in &classes[1..] {
            debug_assert!(class.offset > last, "classifications out of order");
            debug_assert!(class.offset < text.len(), "classification out of bounds");
            last = class.offset;
        }
    }
}
