use thiserror::Error;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::op::ResponseCode;

#[derive(Debug, Error)]
pub enum MxError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    #[error("domain {domain} does not exist")]
    DomainNotFound { domain: String },
    #[error("no MX records for {domain}")]
    NoRecords { domain: String },
    #[error("MX lookup for {domain} timed out")]
    Timeout { domain: String },
    #[error("MX lookup for {domain} failed: {source}")]
    Lookup {
        domain: String,
        #[source]
        source: ResolveError,
    },
}

impl MxError {
    pub(crate) fn idna(source: idna::Errors) -> Self {
        Self::IdnaConversion { source }
    }

    pub(crate) fn resolver_init<E: Into<std::io::Error>>(source: E) -> Self {
        Self::ResolverInit {
            source: source.into(),
        }
    }

    pub fn no_records(domain: impl Into<String>) -> Self {
        Self::NoRecords {
            domain: domain.into(),
        }
    }

    pub fn timeout(domain: impl Into<String>) -> Self {
        Self::Timeout {
            domain: domain.into(),
        }
    }

    /// Maps a resolver failure onto the variants callers branch on.
    pub(crate) fn lookup(domain: &str, source: ResolveError) -> Self {
        match source.kind() {
            ResolveErrorKind::NoRecordsFound { response_code, .. }
                if *response_code == ResponseCode::NXDomain =>
            {
                Self::DomainNotFound {
                    domain: domain.to_string(),
                }
            }
            ResolveErrorKind::NoRecordsFound { .. } => Self::no_records(domain),
            ResolveErrorKind::Timeout => Self::timeout(domain),
            _ => Self::Lookup {
                domain: domain.to_string(),
                source,
            },
        }
    }

    /// `true` when the local resolver could not even be set up, as opposed to
    /// DNS answering (or failing to answer) for the domain.
    pub fn is_local_failure(&self) -> bool {
        matches!(self, Self::ResolverInit { .. })
    }
}
