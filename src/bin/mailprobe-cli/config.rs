use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use mailprobe_lib::{DisposableDomains, ProbeOptions, VerifierConfig};
use serde::Deserialize;

use crate::args::ProbeArgs;

/// Contenu du fichier `--config`. Toutes les clés sont optionnelles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub dns_timeout_secs: Option<u64>,
    pub smtp_timeout_secs: Option<u64>,
    pub port: Option<u16>,
    pub helo_name: Option<String>,
    pub mail_from: Option<String>,
    pub max_hosts: Option<usize>,
    pub ipv6: Option<bool>,
    /// remplace la liste intégrée
    pub disposable_domains: Option<Vec<String>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load_opt(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

/// Fusionne flags > fichier > défauts de la lib.
pub fn build_config(file: &FileConfig, args: &ProbeArgs) -> Result<VerifierConfig> {
    let defaults = VerifierConfig::default();

    let dns_timeout = match args.dns_timeout_secs.or(file.dns_timeout_secs) {
        Some(secs) => seconds("dns_timeout_secs", secs)?,
        None => defaults.dns_timeout,
    };

    let base = defaults.probe;
    let probe = ProbeOptions {
        port: args.port.or(file.port).unwrap_or(base.port),
        helo_name: args
            .helo
            .clone()
            .or_else(|| file.helo_name.clone())
            .unwrap_or(base.helo_name),
        mail_from: args
            .mail_from
            .clone()
            .or_else(|| file.mail_from.clone())
            .unwrap_or(base.mail_from),
        timeout: match args.smtp_timeout_secs.or(file.smtp_timeout_secs) {
            Some(secs) => seconds("smtp_timeout_secs", secs)?,
            None => base.timeout,
        },
        max_hosts: args.max_hosts.or(file.max_hosts).or(base.max_hosts),
        ipv6: args.ipv6 || file.ipv6.unwrap_or(base.ipv6),
    };
    if probe.port == 0 {
        bail!("port must be non-zero");
    }
    if probe.max_hosts == Some(0) {
        bail!("max_hosts must be at least 1");
    }

    let disposable = match &file.disposable_domains {
        Some(list) => DisposableDomains::from_domains(list),
        None => defaults.disposable,
    }
    .with_domains(&args.disposable);

    Ok(VerifierConfig::default()
        .with_dns_timeout(dns_timeout)
        .with_probe_options(probe)
        .with_disposable_domains(disposable))
}

/// Timeout DNS seul, pour la sous-commande `mx`.
pub fn dns_timeout(file: &FileConfig, flag: Option<u64>) -> Result<Duration> {
    match flag.or(file.dns_timeout_secs) {
        Some(secs) => seconds("dns_timeout_secs", secs),
        None => Ok(VerifierConfig::default().dns_timeout),
    }
}

fn seconds(key: &str, secs: u64) -> Result<Duration> {
    if secs == 0 {
        bail!("{key} must be at least 1");
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
dns_timeout_secs = 2
smtp_timeout_secs = 7
helo_name = "probe.example.net"
mail_from = "bounce@example.net"
max_hosts = 2
disposable_domains = ["burner.test"]
"#;

    #[test]
    fn file_values_override_defaults() {
        let file = FileConfig::parse(SAMPLE).expect("valid toml");
        let config = build_config(&file, &ProbeArgs::default()).expect("valid config");
        assert_eq!(config.dns_timeout, Duration::from_secs(2));
        assert_eq!(config.probe.timeout, Duration::from_secs(7));
        assert_eq!(config.probe.helo_name, "probe.example.net");
        assert_eq!(config.probe.mail_from, "bounce@example.net");
        assert_eq!(config.probe.max_hosts, Some(2));
        assert_eq!(config.probe.port, 25);
        assert!(config.disposable.is_disposable("burner.test"));
        assert!(!config.disposable.is_disposable("mailinator.com"));
    }

    #[test]
    fn flags_win_over_file() {
        let file = FileConfig::parse(SAMPLE).expect("valid toml");
        let args = ProbeArgs {
            smtp_timeout_secs: Some(3),
            helo: Some("flag.example".into()),
            port: Some(2525),
            disposable: vec!["junk.test".into()],
            ..ProbeArgs::default()
        };
        let config = build_config(&file, &args).expect("valid config");
        assert_eq!(config.probe.timeout, Duration::from_secs(3));
        assert_eq!(config.probe.helo_name, "flag.example");
        assert_eq!(config.probe.port, 2525);
        assert_eq!(config.dns_timeout, Duration::from_secs(2));
        assert!(config.disposable.is_disposable("burner.test"));
        assert!(config.disposable.is_disposable("junk.test"));
    }

    #[test]
    fn no_file_keeps_library_defaults() {
        let config = build_config(&FileConfig::default(), &ProbeArgs::default())
            .expect("valid config");
        assert_eq!(config, VerifierConfig::default());
    }

    #[test]
    fn rejects_unknown_keys_and_zero_values() {
        assert!(FileConfig::parse("timeout = 3").is_err());
        let file = FileConfig::parse("dns_timeout_secs = 0").expect("valid toml");
        assert!(build_config(&file, &ProbeArgs::default()).is_err());
        assert!(dns_timeout(&file, None).is_err());
        assert_eq!(dns_timeout(&file, Some(4)).ok(), Some(Duration::from_secs(4)));
    }
}
