//! Settings structures for omnibar-rs configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub limits: LimitSettings,
    pub suggest: SuggestSettings,
    pub providers: ProviderSettings,
    pub outgoing: OutgoingSettings,
    pub schemes: SchemeSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (OMNIBAR_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("OMNIBAR_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("OMNIBAR_MAX_MATCHES") {
            if let Ok(max) = val.parse() {
                self.limits.max_matches = max;
            }
        }
        if let Ok(val) = std::env::var("OMNIBAR_COMMIT_DELAY_MS") {
            if let Ok(ms) = val.parse() {
                self.limits.commit_delay_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("OMNIBAR_SEARCH_URL") {
            self.suggest.search_url_template = val;
        }
        if let Ok(val) = std::env::var("OMNIBAR_SUGGEST_URL") {
            self.suggest.suggest_url = val;
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Instance name used in logs
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "omnibar-rs".to_string(),
        }
    }
}

/// Result-list and scheduling bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    /// Maximum matches in a committed result list
    pub max_matches: usize,
    /// Debounce interval before a pending merge is committed
    pub commit_delay_ms: u64,
    /// Maximum matches any single bundled provider reports
    pub provider_max_matches: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_matches: crate::DEFAULT_MAX_MATCHES,
            commit_delay_ms: crate::DEFAULT_COMMIT_DELAY_MS,
            provider_max_matches: 3,
        }
    }
}

/// URL templates for search and suggestion services. `{query}` is replaced
/// with the percent-encoded input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestSettings {
    pub search_url_template: String,
    pub suggest_url: String,
    /// Full-results page used by the overflow shortcut
    pub history_url_template: String,
}

impl Default for SuggestSettings {
    fn default() -> Self {
        Self {
            search_url_template: "https://duckduckgo.com/?q={query}".to_string(),
            suggest_url: "https://duckduckgo.com/ac/".to_string(),
            history_url_template: "about:history?q={query}".to_string(),
        }
    }
}

/// Which bundled providers the demo binary wires up
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub history: bool,
    pub remote_suggest: bool,
    /// Name of the provider whose unshown matches get an overflow shortcut,
    /// if any
    pub overflow_shortcut: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            history: true,
            remote_suggest: true,
            overflow_shortcut: None,
        }
    }
}

/// Outgoing HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds
    pub request_timeout: f64,
    pub verify_ssl: bool,
    pub user_agent: String,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 3.0,
            verify_ssl: true,
            user_agent: format!("omnibar-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// External protocol scheme lists for the input classifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeSettings {
    /// Schemes the user may navigate to directly
    pub allow: Vec<String>,
    /// Schemes that must never be navigated to
    pub block: Vec<String>,
}
