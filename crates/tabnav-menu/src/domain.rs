//! Registry-controlled domain comparison for chapter stops.
//!
//! Two URLs are on the same site when they share the registrable domain:
//! the public suffix plus one label (`mail.example.co.uk` and
//! `www.example.co.uk` both reduce to `example.co.uk`). The suffix list is
//! a built-in table of common multi-label suffixes; any other host uses its
//! last label as the suffix.

use url::{Host, Url};

/// Public suffixes made of more than one label.
const MULTI_LABEL_SUFFIXES: &[&str] = &[
    "ac.jp", "ac.uk", "co.in", "co.jp", "co.kr", "co.nz", "co.uk", "co.za", "com.ar", "com.au",
    "com.br", "com.cn", "com.mx", "com.sg", "com.tr", "com.tw", "edu.au", "gov.au", "gov.uk",
    "ltd.uk", "ne.jp", "net.au", "net.nz", "or.jp", "org.au", "org.nz", "org.uk", "plc.uk",
    "blogspot.com", "github.io", "appspot.com", "herokuapp.com", "s3.amazonaws.com",
];

/// The registrable part of a DNS host name, or `None` for single-label
/// hosts and hosts that are themselves a public suffix.
pub fn registrable_domain(host: &str) -> Option<&str> {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() {
        return None;
    }
    let labels: Vec<&str> = host.split('.').collect();
    if labels.iter().any(|label| label.is_empty()) {
        return None;
    }

    let suffix_len = public_suffix_len(&labels);
    if labels.len() <= suffix_len {
        return None;
    }
    let skip = labels.len() - suffix_len - 1;
    let offset: usize = labels[..skip].iter().map(|label| label.len() + 1).sum();
    Some(&host[offset..])
}

fn public_suffix_len(labels: &[&str]) -> usize {
    for len in (2..=3).rev() {
        if labels.len() < len {
            continue;
        }
        let candidate = labels[labels.len() - len..].join(".");
        if MULTI_LABEL_SUFFIXES.contains(&candidate.as_str()) {
            return len;
        }
    }
    1
}

fn domain_of(url: &Url) -> Option<&str> {
    match url.host() {
        Some(Host::Domain(host)) => registrable_domain(host),
        _ => None,
    }
}

/// Whether `a` and `b` belong to the same site.
///
/// URLs with a registrable domain compare by domain, ignoring scheme and
/// subdomains. Otherwise (IP addresses, `localhost`, `about:` pages) both
/// scheme and host must match.
pub fn same_domain_or_host(a: &Url, b: &Url) -> bool {
    match (domain_of(a), domain_of(b)) {
        (None, None) => a.scheme() == b.scheme() && a.host_str() == b.host_str(),
        (da, db) => da == db,
    }
}
