use std::time::Duration;

use tracing::debug;
use trust_dns_resolver::Resolver;
use trust_dns_resolver::system_conf::read_system_conf;

use super::{MxError, MxRecord};

/// Source of raw MX answers for an ASCII domain.
///
/// [`SystemResolver`] is the production implementation; anything else (test
/// doubles, fixed routing tables) can be plugged into
/// [`Verifier`](crate::Verifier) through this trait.
pub trait LookupMx: Send + Sync {
    fn lookup_mx(&self, ascii_domain: &str) -> Result<Vec<MxRecord>, MxError>;
}

/// Lookup through the host's resolver configuration (`/etc/resolv.conf`),
/// one attempt per name server bounded by `timeout`.
///
/// The underlying client is built per lookup so the value holds no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn build(&self) -> Result<Resolver, MxError> {
        let (config, mut opts) = read_system_conf().map_err(MxError::resolver_init)?;
        opts.timeout = self.timeout;
        opts.attempts = 1;
        Resolver::new(config, opts).map_err(MxError::resolver_init)
    }
}

impl LookupMx for SystemResolver {
    fn lookup_mx(&self, ascii_domain: &str) -> Result<Vec<MxRecord>, MxError> {
        let resolver = self.build()?;
        // nom absolu: pas de liste "search" appliquée
        let fqdn = format!("{ascii_domain}.");
        let lookup = resolver
            .mx_lookup(fqdn.as_str())
            .map_err(|err| MxError::lookup(ascii_domain, err))?;
        Ok(lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), mx.exchange().to_utf8()))
            .collect())
    }
}

/// Lookup MX records for `domain` using the system resolver.
///
/// The domain is normalized via IDNA before querying DNS. Records come back
/// sorted by ascending preference; records sharing a preference keep the order
/// the server sent them in.
pub fn resolve_mx(domain: &str, timeout: Duration) -> Result<Vec<MxRecord>, MxError> {
    resolve_with(&SystemResolver::new(timeout), domain)
}

pub fn resolve_with<R>(resolver: &R, domain: &str) -> Result<Vec<MxRecord>, MxError>
where
    R: LookupMx + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    let mut records: Vec<MxRecord> = resolver
        .lookup_mx(&ascii)?
        .into_iter()
        .map(|record| MxRecord::new(record.preference, normalize_exchange(&record.exchange)))
        // null MX (RFC 7505): "." => le domaine refuse le courrier
        .filter(|record| !record.exchange.is_empty())
        .collect();

    if records.is_empty() {
        return Err(MxError::no_records(ascii));
    }

    records.sort_by_key(|record| record.preference);
    debug!(domain = %ascii, count = records.len(), "resolved MX records");
    Ok(records)
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, MxError> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(MxError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(MxError::idna)
}

pub(crate) fn normalize_exchange(exchange: &str) -> String {
    let trimmed = exchange.trim().trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}
