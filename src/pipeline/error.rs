use thiserror::Error;

use crate::mx::MxError;

/// Failures on our side of the wire. They end verification with
/// [`Verdict::Error`](super::Verdict::Error) instead of a verdict about the address.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("DNS resolver unavailable: {source}")]
    Resolver {
        #[source]
        source: MxError,
    },
    #[error("invalid probe configuration: {0}")]
    InvalidConfig(String),
}
