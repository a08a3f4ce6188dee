//! Disposable-domain classification.
//!
//! The built-in list is small and non-authoritative: unlisted throwaway
//! providers are reported as regular domains. Deployments that care should
//! ship their own list through [`DisposableDomains::from_domains`].

use std::collections::HashSet;

use phf::phf_set;

const BUILTIN_DOMAINS: phf::Set<&'static str> = phf_set! {
    "mailinator.com",
    "10minutemail.com",
    "tempmail.com",
    "guerrillamail.com",
    "yopmail.com",
    "trashmail.com",
    "sharklasers.com",
    "throwawaymail.com",
    "maildrop.cc",
    "getnada.com",
};

/// Read-only set of known disposable domains, compared lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisposableDomains {
    domains: HashSet<String>,
}

impl DisposableDomains {
    /// Builds a set replacing the built-in list entirely. Blank entries are ignored.
    pub fn from_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .filter_map(|d| normalize(d.as_ref()))
            .collect();
        Self { domains }
    }

    /// Empty set: nothing is ever classified as disposable.
    pub fn empty() -> Self {
        Self {
            domains: HashSet::new(),
        }
    }

    /// Adds domains on top of the current set.
    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.domains
            .extend(domains.into_iter().filter_map(|d| normalize(d.as_ref())));
        self
    }

    pub fn is_disposable(&self, domain: &str) -> bool {
        normalize(domain).is_some_and(|d| self.domains.contains(&d))
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl Default for DisposableDomains {
    fn default() -> Self {
        Self::from_domains(BUILTIN_DOMAINS.iter())
    }
}

/// Checks `domain` against the built-in list.
pub fn is_disposable(domain: &str) -> bool {
    normalize(domain).is_some_and(|d| BUILTIN_DOMAINS.contains(d.as_str()))
}

fn normalize(domain: &str) -> Option<String> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}
