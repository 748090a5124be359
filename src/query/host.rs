//! Host syntax checks.
//!
//! A host is accepted when it is an IPv4 literal, an IPv6 literal (optionally
//! with a zone suffix such as `%eth0`), or a fully-qualified domain name.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

use regex::Regex;

/// Maximum length of a single DNS label, in UTF-16 code units.
const MAX_LABEL_LEN: usize = 63;

fn tld_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?i:[a-z\x{00A1}-\x{00A8}\x{00AA}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]{2,}|xn[a-z0-9-]{2,})$",
        )
        .expect("TLD pattern is valid")
    })
}

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?i:[a-z_\x{00A1}-\x{10FFFF}0-9-]+)$").expect("label pattern is valid")
    })
}

fn zone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9A-Za-z.:-]+$").expect("zone pattern is valid"))
}

/// Returns true for a dotted-quad IPv4 literal or an IPv6 literal.
pub fn is_ip(value: &str) -> bool {
    value.parse::<Ipv4Addr>().is_ok() || is_ipv6(value)
}

fn is_ipv6(value: &str) -> bool {
    match value.split_once('%') {
        Some((addr, zone)) => addr.parse::<Ipv6Addr>().is_ok() && zone_pattern().is_match(zone),
        None => value.parse::<Ipv6Addr>().is_ok(),
    }
}

/// Returns true for a fully-qualified domain name.
///
/// Requires a TLD of at least two letters (or a punycode `xn--` label),
/// rejects trailing dots, underscores, numeric TLDs and labels that start or
/// end with a hyphen.
pub fn is_fqdn(value: &str) -> bool {
    let labels: Vec<&str> = value.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let tld = labels[labels.len() - 1];
    if !tld_pattern().is_match(tld) || tld.chars().any(char::is_whitespace) {
        return false;
    }
    if tld.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    labels.iter().all(|label| is_valid_label(label))
}

fn is_valid_label(label: &str) -> bool {
    if label.encode_utf16().count() > MAX_LABEL_LEN {
        return false;
    }
    if !label_pattern().is_match(label) {
        return false;
    }
    // full-width ASCII variants
    if label.chars().any(|c| ('\u{FF01}'..='\u{FF5E}').contains(&c)) {
        return false;
    }
    if label.starts_with('-') || label.ends_with('-') {
        return false;
    }
    !label.contains('_')
}

/// Returns true when `value` is usable as a query target host.
pub fn is_valid_host(value: &str) -> bool {
    is_ip(value) || is_fqdn(value)
}

/// Escape characters with special meaning in HTML.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            other => escaped.push(other),
        }
    }
    escaped
}
