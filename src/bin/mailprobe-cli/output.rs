use anyhow::{Result, bail};
use mailprobe_lib::{MxRecord, VerificationResult, Verdict};

/// Codes de sortie du binaire.
pub const EXIT_OK: i32 = 0;
pub const EXIT_NEGATIVE: i32 = 2;
pub const EXIT_UNCONFIRMED: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Human,
    Json,
}

impl Format {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => bail!("unknown --format '{other}' (human|json)"),
        }
    }
}

/// Résultat de `validate`: aucun accès réseau.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxReport {
    pub email: String,
    pub syntax_valid: bool,
    pub domain: String,
    pub disposable: bool,
}

/// Résultat de `mx`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxReport {
    pub domain: String,
    pub records: Vec<MxRecord>,
    pub error: Option<String>,
}

pub fn syntax_exit_code(report: &SyntaxReport) -> i32 {
    if report.syntax_valid {
        EXIT_OK
    } else {
        EXIT_NEGATIVE
    }
}

pub fn mx_exit_code(report: &MxReport) -> i32 {
    if !report.records.is_empty() {
        EXIT_OK
    } else {
        EXIT_NEGATIVE
    }
}

/// 0 = délivrable, 2 = refus confirmé, 3 = inconnu.
pub fn verify_exit_code(result: &VerificationResult) -> i32 {
    if result.deliverable {
        EXIT_OK
    } else if result.is_conclusive() {
        EXIT_NEGATIVE
    } else {
        EXIT_UNCONFIRMED
    }
}

pub fn syntax_lines(report: &SyntaxReport) -> Vec<String> {
    if !report.syntax_valid {
        return vec![format!("[INVALID] {} :: invalid format", report.email)];
    }
    let mut lines = vec![format!("[OK]      {}", report.email)];
    lines.push(format!("          domain: {}", report.domain));
    if report.disposable {
        lines.push("          disposable domain".to_string());
    }
    lines
}

pub fn mx_lines(report: &MxReport) -> Vec<String> {
    match &report.error {
        Some(err) => vec![format!("[NO MX]   {} :: {err}", report.domain)],
        None => {
            let mut lines = vec![format!("[MX]      {}", report.domain)];
            lines.extend(report.records.iter().map(|r| format!("          {r}")));
            lines
        }
    }
}

pub fn verify_lines(result: &VerificationResult, transcript: bool) -> Vec<String> {
    let tag = match &result.verdict {
        Verdict::Deliverable { .. } => "[DELIVERABLE]",
        Verdict::InvalidSyntax => "[INVALID]",
        Verdict::NoMailExchanger { .. } => "[NO MX]",
        Verdict::Rejected { .. } => "[REJECTED]",
        Verdict::Unconfirmed { .. } => "[UNKNOWN]",
        Verdict::Error { .. } => "[ERROR]",
    };
    let mut lines = vec![format!("{tag} {} :: {}", result.email, result.status_message)];

    if let Some(domain) = &result.domain {
        let suffix = if result.disposable { " (disposable)" } else { "" };
        lines.push(format!("    domain: {domain}{suffix}"));
    }
    if !result.mx_records.is_empty() {
        let hosts: Vec<String> = result.mx_records.iter().map(ToString::to_string).collect();
        lines.push(format!("    mx: {}", hosts.join(", ")));
    }
    if !result.is_conclusive() {
        lines.push("    note: unconfirmed, the address may still exist".to_string());
    }

    if transcript {
        for attempt in &result.attempts {
            let addr = attempt.address.as_deref().unwrap_or("-");
            lines.push(format!("    smtp {} [{addr}]: {}", attempt.exchange, attempt.outcome));
            lines.extend(attempt.transcript.iter().map(|e| format!("      {e}")));
        }
    }
    lines
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(feature = "with-serde")]
pub fn emit<T: serde::Serialize>(
    format: Format,
    value: &T,
    lines: impl FnOnce(&T) -> Vec<String>,
) -> Result<()> {
    match format {
        Format::Human => print_lines(lines(value)),
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
pub fn emit<T>(format: Format, value: &T, lines: impl FnOnce(&T) -> Vec<String>) -> Result<()> {
    match format {
        Format::Human => print_lines(lines(value)),
        Format::Json => bail!("format=json nécessite la feature 'with-serde'"),
    }
    Ok(())
}
