use std::fmt;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStage {
    Connect,
    Greeting,
    Ehlo,
    Helo,
    MailFrom,
    RcptTo,
    Quit,
}

impl fmt::Display for AttemptStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Greeting => "greeting",
            Self::Ehlo => "EHLO",
            Self::Helo => "HELO",
            Self::MailFrom => "MAIL FROM",
            Self::RcptTo => "RCPT TO",
            Self::Quit => "QUIT",
        })
    }
}

/// A raw SMTP reply, preserving the numeric status code and message text.
///
/// Multi-line replies keep one entry per line in `message`, joined by `\n`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub message: String,
}

impl SmtpReply {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }
}

impl fmt::Display for SmtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        for line in self.message.lines().filter(|l| !l.is_empty()) {
            write!(f, " {line}")?;
        }
        Ok(())
    }
}

/// A recorded SMTP transcript event used for diagnostics.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmtpEvent {
    Sent {
        stage: AttemptStage,
        command: String,
    },
    Received {
        stage: AttemptStage,
        reply: SmtpReply,
    },
    Error {
        stage: AttemptStage,
        message: String,
    },
}

impl fmt::Display for SmtpEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent { command, .. } => write!(f, "C: {command}"),
            Self::Received { reply, .. } => write!(f, "S: {reply}"),
            Self::Error { stage, message } => write!(f, "!  {stage}: {message}"),
        }
    }
}

/// Outcome of the SMTP dialogue with a single exchange host.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// `RCPT TO` answered 250 or 251.
    Accepted { reply: SmtpReply },
    /// `RCPT TO` answered with any other code.
    Rejected { reply: SmtpReply },
    /// No answer to `RCPT TO` could be obtained from this host.
    Unreachable { cause: String },
}

impl ProbeOutcome {
    pub(crate) fn unreachable(cause: impl Into<String>) -> Self {
        Self::Unreachable {
            cause: cause.into(),
        }
    }

    pub(crate) fn from_rcpt_reply(reply: SmtpReply) -> Self {
        match reply.code {
            250 | 251 => Self::Accepted { reply },
            _ => Self::Rejected { reply },
        }
    }

    /// Accepted and Rejected end the fallback across hosts; Unreachable does not.
    pub fn is_definitive(&self) -> bool {
        !matches!(self, Self::Unreachable { .. })
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn reply(&self) -> Option<&SmtpReply> {
        match self {
            Self::Accepted { reply } | Self::Rejected { reply } => Some(reply),
            Self::Unreachable { .. } => None,
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { reply } => write!(f, "accepted ({reply})"),
            Self::Rejected { reply } => write!(f, "rejected ({reply})"),
            Self::Unreachable { cause } => write!(f, "unreachable ({cause})"),
        }
    }
}

/// Detailed report for a single exchange host interrogation.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAttempt {
    pub exchange: String,
    pub address: Option<String>,
    pub transcript: Vec<SmtpEvent>,
    pub outcome: ProbeOutcome,
}

impl HostAttempt {
    pub fn new(exchange: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            address: None,
            transcript: Vec::new(),
            outcome: ProbeOutcome::unreachable("not attempted"),
        }
    }
}

/// Result of [`probe_hosts`](super::probe_hosts): the overall outcome plus one
/// entry per host actually tried, in the order they were tried.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub outcome: ProbeOutcome,
    pub attempts: Vec<HostAttempt>,
}

impl ProbeReport {
    /// The attempt whose answer settled the probe, if any did.
    pub fn decided_by(&self) -> Option<&HostAttempt> {
        self.attempts
            .last()
            .filter(|attempt| attempt.outcome.is_definitive())
    }
}
