#![forbid(unsafe_code)]
//! mailprobe_lib: vérification de délivrabilité e-mail
//!
//! Three escalating checks, run in order and stopping at the first failure:
//! syntax, DNS MX lookup, then an SMTP `RCPT TO` probe that never sends a
//! message. [`verify_email`] runs the whole pipeline with defaults;
//! [`Verifier`] takes a [`VerifierConfig`] for timeouts, probe identity and the
//! disposable-domain list.

pub mod disposable;
pub mod mx;
pub mod pipeline;
pub mod probe;
pub mod validator;

pub use disposable::{DisposableDomains, is_disposable};
pub use mx::{LookupMx, MxError, MxRecord, SystemResolver, resolve_mx};
pub use pipeline::{
    Verdict, VerificationResult, Verifier, VerifierConfig, VerifyError, verify_email,
};
pub use probe::{
    AttemptStage, Dialer, HostAttempt, ProbeOptions, ProbeOutcome, ProbeReport, SmtpEvent,
    SmtpReply, TcpDialer, probe, probe_hosts,
};
pub use validator::{EmailAddress, SyntaxError, extract_domain, is_valid_syntax, split_address};
