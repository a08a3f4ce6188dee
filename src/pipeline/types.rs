use std::fmt;

use crate::mx::MxRecord;
use crate::probe::{HostAttempt, SmtpReply};

/// How far verification got and what it concluded.
///
/// `InvalidSyntax`, `NoMailExchanger` and `Rejected` are confirmed negatives.
/// `Unconfirmed` and `Error` only mean the address could not be checked.
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    InvalidSyntax,
    NoMailExchanger { cause: String },
    Deliverable { exchange: String, reply: SmtpReply },
    Rejected { exchange: String, reply: SmtpReply },
    Unconfirmed { tried: usize, cause: String },
    Error { cause: String },
}

impl Verdict {
    pub fn is_deliverable(&self) -> bool {
        matches!(self, Self::Deliverable { .. })
    }

    /// `false` when the answer is "unknown" rather than yes or no.
    pub fn is_conclusive(&self) -> bool {
        !matches!(self, Self::Unconfirmed { .. } | Self::Error { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSyntax => f.write_str("invalid syntax"),
            Self::NoMailExchanger { cause } => write!(f, "no mail exchanger: {cause}"),
            Self::Deliverable { exchange, reply } => {
                write!(f, "deliverable: {exchange} accepted recipient ({reply})")
            }
            Self::Rejected { exchange, reply } => {
                write!(f, "rejected: {exchange} refused recipient ({reply})")
            }
            Self::Unconfirmed { tried, cause } => write!(
                f,
                "could not confirm: none of {tried} exchange host(s) answered (last error: {cause})"
            ),
            Self::Error { cause } => write!(f, "verification error: {cause}"),
        }
    }
}

/// Aggregated result of [`Verifier::verify`](super::Verifier::verify).
///
/// Stages that were never reached keep their "not attempted" values: no
/// domain, no MX records, no attempts, `deliverable == false`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub email: String,
    pub syntax_valid: bool,
    pub domain: Option<String>,
    pub mx_records: Vec<MxRecord>,
    pub disposable: bool,
    pub deliverable: bool,
    pub status_message: String,
    pub verdict: Verdict,
    pub attempts: Vec<HostAttempt>,
}

impl VerificationResult {
    pub(crate) fn not_attempted(email: &str) -> Self {
        Self {
            email: email.to_string(),
            syntax_valid: false,
            domain: None,
            mx_records: Vec::new(),
            disposable: false,
            deliverable: false,
            status_message: String::new(),
            verdict: Verdict::Error {
                cause: "not attempted".to_string(),
            },
            attempts: Vec::new(),
        }
    }

    pub(crate) fn conclude(mut self, verdict: Verdict) -> Self {
        self.deliverable = verdict.is_deliverable();
        self.status_message = verdict.to_string();
        self.verdict = verdict;
        self
    }

    pub fn is_conclusive(&self) -> bool {
        self.verdict.is_conclusive()
    }
}
