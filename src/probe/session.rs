use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use super::options::ProbeOptions;
use super::types::{AttemptStage, SmtpEvent, SmtpReply};

// RFC 5321 4.5.3.1.5 borne les lignes à 512 octets; on reste tolérant.
const MAX_LINE_LEN: u64 = 4096;
const MAX_REPLY_LINES: usize = 128;

/// Opens the transport for one exchange host.
///
/// [`TcpDialer`] is the production implementation; tests substitute scripted
/// in-memory streams.
pub trait Dialer: Send + Sync {
    type Stream: Read + Write;

    /// Returns the connected stream and a printable peer address.
    fn dial(&self, host: &str, options: &ProbeOptions) -> io::Result<(Self::Stream, String)>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TcpDialer;

impl Dialer for TcpDialer {
    type Stream = TcpStream;

    fn dial(&self, host: &str, options: &ProbeOptions) -> io::Result<(TcpStream, String)> {
        let addrs = resolve_socket_addrs(host, options.port, options.ipv6)?;
        let mut last_err = None;
        for addr in &addrs {
            match TcpStream::connect_timeout(addr, options.timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(options.timeout))?;
                    stream.set_write_timeout(Some(options.timeout))?;
                    return Ok((stream, addr.to_string()));
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "no socket address available",
            )
        }))
    }
}

fn resolve_socket_addrs(host: &str, port: u16, allow_ipv6: bool) -> io::Result<Vec<SocketAddr>> {
    Ok((host, port)
        .to_socket_addrs()?
        .filter(|addr| allow_ipv6 || addr.is_ipv4())
        .collect())
}

/// One SMTP client session over an already connected stream, recording every
/// exchange in a transcript. The stream is closed when the session is dropped.
pub(crate) struct SmtpSession<S: Read + Write> {
    reader: BufReader<S>,
    transcript: Vec<SmtpEvent>,
}

impl<S: Read + Write> SmtpSession<S> {
    pub(crate) fn new(stream: S) -> Self {
        Self {
            reader: BufReader::new(stream),
            transcript: Vec::new(),
        }
    }

    /// Sends `command` and waits for its reply.
    pub(crate) fn command(&mut self, command: &str, stage: AttemptStage) -> io::Result<SmtpReply> {
        self.transcript.push(SmtpEvent::Sent {
            stage,
            command: command.to_string(),
        });
        if let Err(err) = self.send_line(command) {
            self.record_error(stage, &err);
            return Err(err);
        }
        self.read_reply(stage)
    }

    pub(crate) fn read_reply(&mut self, stage: AttemptStage) -> io::Result<SmtpReply> {
        match self.read_reply_lines() {
            Ok(reply) => {
                self.transcript.push(SmtpEvent::Received {
                    stage,
                    reply: reply.clone(),
                });
                Ok(reply)
            }
            Err(err) => {
                self.record_error(stage, &err);
                Err(err)
            }
        }
    }

    /// Best effort: the peer may already be gone.
    pub(crate) fn quit(&mut self) {
        let _ = self.command("QUIT", AttemptStage::Quit);
    }

    pub(crate) fn into_transcript(self) -> Vec<SmtpEvent> {
        self.transcript
    }

    fn send_line(&mut self, command: &str) -> io::Result<()> {
        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");
        let stream = self.reader.get_mut();
        stream.write_all(&line)?;
        stream.flush()
    }

    fn record_error(&mut self, stage: AttemptStage, err: &io::Error) {
        self.transcript.push(SmtpEvent::Error {
            stage,
            message: err.to_string(),
        });
    }

    fn read_reply_lines(&mut self) -> io::Result<SmtpReply> {
        let mut code = None;
        let mut message_lines = Vec::new();
        loop {
            if message_lines.len() >= MAX_REPLY_LINES {
                return Err(invalid_data("SMTP reply has too many lines".to_string()));
            }
            let raw = self.read_line()?;
            if raw.len() < 3 || !raw.is_char_boundary(3) {
                return Err(invalid_data(format!("invalid SMTP reply: '{raw}'")));
            }
            let code_part = &raw[..3];
            let parsed_code = code_part
                .parse::<u16>()
                .ok()
                .filter(|c| (200..600).contains(c))
                .ok_or_else(|| invalid_data(format!("invalid SMTP status code: '{code_part}'")))?;
            match code {
                Some(existing) if existing != parsed_code => {
                    return Err(invalid_data(format!(
                        "inconsistent SMTP reply codes: {existing} vs {parsed_code}"
                    )));
                }
                Some(_) => {}
                None => code = Some(parsed_code),
            }
            let continuation = raw.as_bytes().get(3) == Some(&b'-');
            let text = raw.get(4..).unwrap_or_default().to_string();
            message_lines.push(text);
            if !continuation {
                return Ok(SmtpReply {
                    code: parsed_code,
                    message: message_lines.join("\n"),
                });
            }
        }
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut buf = Vec::new();
        let read = (&mut self.reader)
            .take(MAX_LINE_LEN)
            .read_until(b'\n', &mut buf)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed while reading reply",
            ));
        }
        if buf.last() != Some(&b'\n') {
            if read as u64 >= MAX_LINE_LEN {
                return Err(invalid_data("SMTP reply line too long".to_string()));
            }
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed mid-line",
            ));
        }
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}
