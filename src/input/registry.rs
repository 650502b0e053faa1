//! Registry (public-suffix) lookup for typed hostnames
//!
//! The classifier needs to know whether a hostname ends in a recognized
//! registry ("com", "co.uk"), ends in something unknown, or cannot be
//! canonicalized at all. The table here is a pragmatic subset of the public
//! suffix list: common generic TLDs, country codes, and the two-level
//! registries that show up in typed input. Unknown suffixes still count as a
//! hostname, just not a registered one.

use super::segment::{analyze_host, is_canonicalizable_host, HostFamily, HostInfo};
use once_cell::sync::Lazy;
use std::collections::HashSet;

static REGISTRIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // generic
        "com", "org", "net", "edu", "gov", "mil", "int", "info", "biz", "name", "pro", "mobi",
        "aero", "asia", "cat", "coop", "jobs", "museum", "tel", "travel", "xyz", "app", "dev",
        "io", "ai", "co", "me", "tv", "cc", "ws",
        // country codes
        "ac", "ad", "ae", "ar", "at", "au", "be", "bg", "br", "by", "ca", "ch", "cl", "cn",
        "cz", "de", "dk", "ee", "es", "fi", "fr", "gr", "hk", "hr", "hu", "id", "ie", "il",
        "in", "ir", "is", "it", "jp", "kr", "lt", "lu", "lv", "mx", "my", "nl", "no", "nz",
        "ph", "pl", "pt", "ro", "rs", "ru", "se", "sg", "si", "sk", "th", "tr", "tw", "ua",
        "uk", "us", "vn", "za",
        // common two-level registries
        "co.uk", "org.uk", "me.uk", "ac.uk", "gov.uk", "net.uk", "ltd.uk", "plc.uk",
        "co.jp", "ne.jp", "or.jp", "ac.jp", "go.jp",
        "com.au", "net.au", "org.au", "edu.au", "gov.au",
        "co.nz", "net.nz", "org.nz",
        "co.kr", "or.kr", "co.in", "net.in", "org.in", "ac.in",
        "com.br", "com.cn", "com.mx", "com.tw", "com.tr", "com.sg", "com.hk",
        "co.za", "com.ar",
    ]
    .into_iter()
    .collect()
});

/// Length in bytes of the registry portion of `host`.
///
/// - `None`: the host cannot be canonicalized (garbage characters, broken IP
///   literal). Such input is not navigable as typed.
/// - `Some(0)`: a valid host with no recognized registry (IP literals,
///   single labels, unknown TLDs, or a bare registry like `co.uk`).
/// - `Some(n)`: the host ends in a recognized registry of `n` bytes.
pub fn registry_length(host: &str, info: &HostInfo) -> Option<usize> {
    if host.is_empty() {
        return None;
    }
    match info.family {
        HostFamily::Broken => return None,
        HostFamily::Ipv4 | HostFamily::Ipv6 => return Some(0),
        HostFamily::Neutral => {}
    }

    let trimmed = host.strip_suffix('.').unwrap_or(host);
    if !is_canonicalizable_host(trimmed) {
        return None;
    }
    let lower = trimmed.to_lowercase();

    let labels: Vec<&str> = lower.split('.').collect();
    if labels.len() < 2 {
        return Some(0);
    }
    // Longest suffix wins: check the two-label registry before the TLD. A
    // suffix covering the entire host is a registry typed bare, length 0.
    for take in [2usize, 1] {
        if labels.len() < take {
            continue;
        }
        let suffix = labels[labels.len() - take..].join(".");
        if REGISTRIES.contains(suffix.as_str()) {
            if suffix.len() == lower.len() {
                return Some(0);
            }
            return Some(suffix.len());
        }
    }
    Some(0)
}

/// Convenience wrapper that analyzes the host itself.
pub fn registry_length_of(host: &str) -> Option<usize> {
    registry_length(host, &analyze_host(host))
}
