//! Match model and merged result list
//!
//! `SuggestionMatch` is the unit providers produce; `SuggestionList` is the
//! merged, ranked, bounded list the controller commits to observers.

pub mod list;
pub mod types;

pub use list::SuggestionList;
pub use types::{style, MatchType, NavigationKind, SuggestionMatch, TextClassification};
