use std::time::Duration;

use crate::disposable::DisposableDomains;
use crate::probe::ProbeOptions;

/// Everything a [`Verifier`](super::Verifier) needs to know up front.
///
/// The disposable list lives here rather than in a global so that two
/// verifiers in one process can run with different lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    pub dns_timeout: Duration,
    pub probe: ProbeOptions,
    pub disposable: DisposableDomains,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            dns_timeout: Duration::from_secs(5),
            probe: ProbeOptions::default(),
            disposable: DisposableDomains::default(),
        }
    }
}

impl VerifierConfig {
    pub fn with_dns_timeout(mut self, timeout: Duration) -> Self {
        self.dns_timeout = timeout;
        self
    }

    pub fn with_probe_options(mut self, probe: ProbeOptions) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_disposable_domains(mut self, disposable: DisposableDomains) -> Self {
        self.disposable = disposable;
        self
    }
}
