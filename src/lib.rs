//! omnibar-rs: a typed-input suggestion engine for browser address bars
//!
//! Classifies raw keystrokes as navigation or search, fans the classified
//! input out to suggestion providers, and merges their matches into a
//! ranked, debounced result list.

pub mod config;
pub mod controller;
pub mod input;
pub mod network;
pub mod provider;
pub mod results;

pub use config::Settings;
pub use controller::{ControllerEvent, ControllerHandle, SuggestionController, SuggestionObserver};
pub use input::{classify, InputType, SchemePolicy, SuggestionInput};
pub use provider::Provider;
pub use results::{SuggestionList, SuggestionMatch};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default debounce interval between result commits, in milliseconds
pub const DEFAULT_COMMIT_DELAY_MS: u64 = 350;

/// Default maximum size of a committed result list
pub const DEFAULT_MAX_MATCHES: usize = 6;
