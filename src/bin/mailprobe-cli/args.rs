use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mailprobe-cli", version, about = "Vérifie la délivrabilité d'une adresse e-mail")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,

    /// format: human|json
    #[arg(long, global = true, default_value = "human")]
    pub format: String,

    /// fichier de configuration TOML
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// logs détaillés sur stderr (sinon RUST_LOG, défaut: warn)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// syntaxe + domaine jetable, sans accès réseau
    Validate { email: String },
    /// résout les enregistrements MX d'un domaine
    Mx {
        domain: String,
        /// timeout DNS (s)
        #[arg(long = "dns-timeout", value_parser = clap::value_parser!(u64).range(1..=60))]
        dns_timeout_secs: Option<u64>,
    },
    /// pipeline complet: syntaxe, MX, sonde SMTP
    Verify {
        /// adresse e-mail à tester
        email: String,
        #[command(flatten)]
        probe: ProbeArgs,
        /// affiche le dialogue SMTP
        #[arg(long)]
        transcript: bool,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ProbeArgs {
    /// timeout DNS (s)
    #[arg(long = "dns-timeout", value_parser = clap::value_parser!(u64).range(1..=60))]
    pub dns_timeout_secs: Option<u64>,
    /// timeout connexion et commandes SMTP (s)
    #[arg(long = "smtp-timeout", value_parser = clap::value_parser!(u64).range(1..=120))]
    pub smtp_timeout_secs: Option<u64>,
    /// port SMTP des MX
    #[arg(long)]
    pub port: Option<u16>,
    /// nom utilisé pour EHLO/HELO
    #[arg(long)]
    pub helo: Option<String>,
    /// enveloppe MAIL FROM
    #[arg(long = "from")]
    pub mail_from: Option<String>,
    /// nombre maximum d'MX interrogés
    #[arg(long = "max-mx")]
    pub max_hosts: Option<usize>,
    /// autorise IPv6
    #[arg(long)]
    pub ipv6: bool,
    /// domaine jetable supplémentaire (répétable)
    #[arg(long = "disposable")]
    pub disposable: Vec<String>,
}
