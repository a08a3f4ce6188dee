//! The verification pipeline.
//!
//! Stages run in a fixed order and the first failing one ends the run:
//! syntax, domain extraction, disposable lookup (informational), MX
//! resolution, SMTP probe. Whatever happens, the caller gets a
//! [`VerificationResult`]; nothing in here returns an error or panics on remote
//! input.

mod config;
mod error;
mod types;

pub use config::VerifierConfig;
pub use error::VerifyError;
pub use types::{Verdict, VerificationResult};

use tracing::{debug, info, instrument, warn};

use crate::mx::{LookupMx, SystemResolver, resolve_with};
use crate::probe::{Dialer, ProbeOutcome, ProbeReport, TcpDialer, probe_with};
use crate::validator::EmailAddress;

/// Runs verifications against a fixed configuration.
///
/// Holds no mutable state, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Verifier<R = SystemResolver, D = TcpDialer> {
    config: VerifierConfig,
    resolver: R,
    dialer: D,
}

impl Verifier {
    /// Production verifier: system DNS configuration, plain TCP on the probe port.
    pub fn new(config: VerifierConfig) -> Self {
        let resolver = SystemResolver::new(config.dns_timeout);
        Self {
            config,
            resolver,
            dialer: TcpDialer,
        }
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new(VerifierConfig::default())
    }
}

impl<R, D> Verifier<R, D>
where
    R: LookupMx,
    D: Dialer,
{
    /// Verifier with custom DNS and transport. `config.dns_timeout` is not
    /// applied to `resolver`; it is the resolver's job to bound its lookups.
    pub fn with_parts(config: VerifierConfig, resolver: R, dialer: D) -> Self {
        Self {
            config,
            resolver,
            dialer,
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verifies one address. Surrounding whitespace is ignored.
    #[instrument(level = "debug", skip(self))]
    pub fn verify(&self, email: &str) -> VerificationResult {
        let input = email.trim();
        let mut result = VerificationResult::not_attempted(input);
        let verdict = self.run(input, &mut result).unwrap_or_else(|err| {
            warn!(error = %err, "verification aborted");
            Verdict::Error {
                cause: err.to_string(),
            }
        });
        info!(deliverable = verdict.is_deliverable(), verdict = %verdict, "verification finished");
        result.conclude(verdict)
    }

    fn run(&self, input: &str, result: &mut VerificationResult) -> Result<Verdict, VerifyError> {
        let Ok(address) = EmailAddress::parse(input) else {
            debug!("syntax check failed");
            return Ok(Verdict::InvalidSyntax);
        };
        result.syntax_valid = true;

        let domain = address.domain();
        result.domain = Some(domain.to_string());

        result.disposable = self.config.disposable.is_disposable(domain);
        if result.disposable {
            debug!(domain, "domain is a known disposable provider");
        }

        if self.config.probe.has_line_breaks() {
            return Err(VerifyError::InvalidConfig(
                "HELO name and sender must be single-line".to_string(),
            ));
        }

        result.mx_records = match resolve_with(&self.resolver, domain) {
            Ok(records) => records,
            Err(err) if err.is_local_failure() => {
                return Err(VerifyError::Resolver { source: err });
            }
            Err(err) => {
                debug!(domain, error = %err, "no usable MX records");
                return Ok(Verdict::NoMailExchanger {
                    cause: err.to_string(),
                });
            }
        };

        let exchanges: Vec<&str> = result
            .mx_records
            .iter()
            .map(|record| record.exchange.as_str())
            .collect();
        let report = probe_with(&self.dialer, input, &exchanges, &self.config.probe);
        let verdict = verdict_for(&report);
        result.attempts = report.attempts;
        Ok(verdict)
    }
}

fn verdict_for(report: &ProbeReport) -> Verdict {
    let exchange = report
        .decided_by()
        .map(|attempt| attempt.exchange.clone())
        .unwrap_or_default();
    match &report.outcome {
        ProbeOutcome::Accepted { reply } => Verdict::Deliverable {
            exchange,
            reply: reply.clone(),
        },
        ProbeOutcome::Rejected { reply } => Verdict::Rejected {
            exchange,
            reply: reply.clone(),
        },
        ProbeOutcome::Unreachable { cause } => Verdict::Unconfirmed {
            tried: report.attempts.len(),
            cause: cause.clone(),
        },
    }
}

/// Verifies `email` with the default configuration.
pub fn verify_email(email: &str) -> VerificationResult {
    Verifier::default().verify(email)
}

#[cfg(test)]
mod tests;
