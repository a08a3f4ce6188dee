use std::time::Duration;

/// Controls how [`probe`](super::probe) interrogates exchange hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    pub port: u16,
    /// Name announced in `EHLO`/`HELO`.
    pub helo_name: String,
    /// Envelope sender for `MAIL FROM`. Only there to satisfy the grammar:
    /// the probe never reaches `DATA`.
    pub mail_from: String,
    /// Applied to the TCP connect and to every command round-trip.
    pub timeout: Duration,
    /// Caps how many exchange hosts are tried. `None` tries all of them.
    pub max_hosts: Option<usize>,
    pub ipv6: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            helo_name: "localhost".to_string(),
            mail_from: "check@example.com".to_string(),
            timeout: Duration::from_secs(10),
            max_hosts: None,
            ipv6: false,
        }
    }
}

impl ProbeOptions {
    pub(crate) fn host_limit(&self) -> usize {
        self.max_hosts.unwrap_or(usize::MAX)
    }

    /// Values interpolated into SMTP commands must not smuggle extra lines.
    pub(crate) fn has_line_breaks(&self) -> bool {
        contains_line_break(&self.helo_name) || contains_line_break(&self.mail_from)
    }
}

pub(crate) fn contains_line_break(value: &str) -> bool {
    value.contains(['\r', '\n'])
}
