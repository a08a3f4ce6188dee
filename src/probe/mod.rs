//! SMTP mailbox probing.
//!
//! [`probe`] walks the exchange hosts in the order given and, for each one,
//! runs `EHLO`/`HELO`, `MAIL FROM` and `RCPT TO` without ever reaching `DATA`.
//! The first host that answers `RCPT TO` settles the result; hosts that cannot
//! be reached or that break the protocol are skipped in favour of the next.

mod options;
mod session;
mod types;

pub use options::ProbeOptions;
pub use session::{Dialer, TcpDialer};
pub use types::{AttemptStage, HostAttempt, ProbeOutcome, ProbeReport, SmtpEvent, SmtpReply};

use std::io::{self, Read, Write};
use std::ops::ControlFlow;

use tracing::{debug, warn};

use options::contains_line_break;
use session::SmtpSession;
use types::AttemptStage as Stage;

/// Probes `email` against `exchanges` (highest priority first) over TCP.
pub fn probe<H: AsRef<str>>(email: &str, exchanges: &[H], options: &ProbeOptions) -> ProbeOutcome {
    probe_hosts(email, exchanges, options).outcome
}

/// Same as [`probe`], keeping the per-host transcripts.
pub fn probe_hosts<H: AsRef<str>>(
    email: &str,
    exchanges: &[H],
    options: &ProbeOptions,
) -> ProbeReport {
    probe_with(&TcpDialer, email, exchanges, options)
}

/// Same as [`probe_hosts`] with an explicit transport.
pub fn probe_with<D, H>(
    dialer: &D,
    email: &str,
    exchanges: &[H],
    options: &ProbeOptions,
) -> ProbeReport
where
    D: Dialer + ?Sized,
    H: AsRef<str>,
{
    if contains_line_break(email) || options.has_line_breaks() {
        return ProbeReport {
            outcome: ProbeOutcome::unreachable("line break in SMTP command argument"),
            attempts: Vec::new(),
        };
    }

    let mut attempts = Vec::new();
    let initial = ProbeOutcome::unreachable("no exchange host to probe");
    let flow = exchanges
        .iter()
        .take(options.host_limit())
        .try_fold(initial, |_, exchange| {
            let attempt = attempt_host(dialer, exchange.as_ref(), email, options);
            let outcome = attempt.outcome.clone();
            attempts.push(attempt);
            if outcome.is_definitive() {
                ControlFlow::Break(outcome)
            } else {
                ControlFlow::Continue(outcome)
            }
        });
    let outcome = match flow {
        ControlFlow::Break(outcome) | ControlFlow::Continue(outcome) => outcome,
    };

    ProbeReport { outcome, attempts }
}

fn attempt_host<D>(dialer: &D, exchange: &str, email: &str, options: &ProbeOptions) -> HostAttempt
where
    D: Dialer + ?Sized,
{
    let mut attempt = HostAttempt::new(exchange);
    let (stream, peer) = match dialer.dial(exchange, options) {
        Ok(pair) => pair,
        Err(err) => {
            warn!(exchange, error = %err, "exchange host unreachable");
            attempt.transcript.push(SmtpEvent::Error {
                stage: Stage::Connect,
                message: err.to_string(),
            });
            attempt.outcome = ProbeOutcome::unreachable(format!("connection failed: {err}"));
            return attempt;
        }
    };
    debug!(exchange, peer = %peer, "connected");
    attempt.address = Some(peer);

    let mut session = SmtpSession::new(stream);
    let result = run_transaction(&mut session, email, options);
    session.quit();
    attempt.transcript = session.into_transcript();

    attempt.outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(exchange, error = %err, "SMTP dialogue aborted");
            ProbeOutcome::unreachable(err.to_string())
        }
    };
    attempt
}

fn run_transaction<S: Read + Write>(
    session: &mut SmtpSession<S>,
    email: &str,
    options: &ProbeOptions,
) -> io::Result<ProbeOutcome> {
    let greeting = session.read_reply(Stage::Greeting)?;
    if greeting.code != 220 {
        return Err(refused(Stage::Greeting, &greeting));
    }

    let ehlo = session.command(&format!("EHLO {}", options.helo_name), Stage::Ehlo)?;
    if !ehlo.is_positive_completion() {
        // serveurs anciens: retombe sur HELO
        let helo = session.command(&format!("HELO {}", options.helo_name), Stage::Helo)?;
        if !helo.is_positive_completion() {
            return Err(refused(Stage::Helo, &helo));
        }
    }

    let mail = session.command(&format!("MAIL FROM:<{}>", options.mail_from), Stage::MailFrom)?;
    if !mail.is_positive_completion() {
        return Err(refused(Stage::MailFrom, &mail));
    }

    let rcpt = session.command(&format!("RCPT TO:<{email}>"), Stage::RcptTo)?;
    Ok(ProbeOutcome::from_rcpt_reply(rcpt))
}

fn refused(stage: AttemptStage, reply: &SmtpReply) -> io::Error {
    io::Error::other(format!("{stage} refused: {reply}"))
}
