//! Hostname → tenant subdomain resolution.
//!
//! # Rules
//! - A trailing `:port` is ignored
//! - Hosts with fewer than two labels carry no tenant
//! - `www` is reserved and never a tenant
//! - `<tenant>.localhost` is accepted for local development
//! - Any other two-label host is an apex domain and carries no tenant
//!
//! The resolver is total: every input yields either a tenant or `None`.

use std::fmt;

/// Label that never names a tenant.
const RESERVED_LABEL: &str = "www";

/// Development base domain that accepts a single leading label.
const LOCALHOST: &str = "localhost";

/// Tenant identifier derived from a hostname.
///
/// Always non-empty and lowercase. Absence of a tenant is expressed as
/// `Option<TenantSubdomain>::None`, never as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantSubdomain(String);

impl TenantSubdomain {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantSubdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantSubdomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve the tenant subdomain for a hostname, e.g. `acme.example.com`.
pub fn resolve_subdomain(host: &str) -> Option<TenantSubdomain> {
    let host = strip_port(host);
    let labels: Vec<&str> = host.split('.').collect();

    if labels.len() < 2 {
        return None;
    }

    let candidate = labels[0];
    if candidate.is_empty() || candidate.eq_ignore_ascii_case(RESERVED_LABEL) {
        return None;
    }

    let base = labels[1..].join(".");
    if base == LOCALHOST || labels.len() >= 3 {
        Some(TenantSubdomain(candidate.to_lowercase()))
    } else {
        None
    }
}

fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(host: &str) -> Option<String> {
        resolve_subdomain(host).map(|t| t.to_string())
    }

    #[test]
    fn resolution_table() {
        let cases = [
            ("localhost", None),
            ("localhost:3000", None),
            ("acme.localhost", Some("acme")),
            ("acme.localhost:3000", Some("acme")),
            ("example.com", None),
            ("www.example.com", None),
            ("acme.example.com", Some("acme")),
            ("a.b.example.com", Some("a")),
        ];
        for (host, expected) in cases {
            assert_eq!(resolve(host).as_deref(), expected, "host {host}");
        }
    }

    #[test]
    fn result_is_lowercase() {
        assert_eq!(resolve("ACME.Example.com").as_deref(), Some("acme"));
        assert_eq!(resolve("Acme.localhost:8080").as_deref(), Some("acme"));
    }

    #[test]
    fn reserved_label_is_case_insensitive() {
        assert_eq!(resolve("WWW.example.com"), None);
        assert_eq!(resolve("www.localhost"), None);
    }

    #[test]
    fn empty_first_label_has_no_tenant() {
        assert_eq!(resolve(".example.com"), None);
        assert_eq!(resolve(""), None);
        assert_eq!(resolve(":3000"), None);
    }

    #[test]
    fn apex_domains_have_no_tenant() {
        assert_eq!(resolve("example.com"), None);
        assert_eq!(resolve("Example.COM:8443"), None);
        assert_eq!(resolve("acme.io"), None);
    }

    #[test]
    fn repeated_label_pair_has_no_tenant() {
        // Two labels where the base equals the candidate.
        assert_eq!(resolve("acme.acme"), None);
        assert_eq!(resolve("acme.acme.acme").as_deref(), Some("acme"));
    }

    #[test]
    fn never_returns_empty_or_uppercase() {
        let hosts = [
            "", ".", "..", "a.", ".a", "a..b", "::", "host:", "x.y:abc", "Ü.example.com",
            "tenant.example.com:443", "[::1]:8080", "127.0.0.1",
        ];
        for host in hosts {
            if let Some(tenant) = resolve_subdomain(host) {
                assert!(!tenant.as_str().is_empty(), "host {host:?}");
                assert_eq!(tenant.as_str(), tenant.as_str().to_lowercase(), "host {host:?}");
            }
        }
    }
}
