#[path = "mailprobe-cli/args.rs"]
mod args;
#[path = "mailprobe-cli/config.rs"]
mod config;
#[path = "mailprobe-cli/output.rs"]
mod output;

use std::process;

use anyhow::Result;
use clap::Parser;
use mailprobe_lib::{DisposableDomains, Verifier, extract_domain, is_valid_syntax, resolve_mx};
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Commands};
use crate::config::FileConfig;
use crate::output::{Format, MxReport, SyntaxReport, emit};

fn init_tracing(verbose: bool) {
    // -v l'emporte sur RUST_LOG
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    let format = Format::parse(&cli.format)?;
    let file = FileConfig::load_opt(cli.config.as_deref())?;

    match cli.cmd {
        Commands::Validate { email } => {
            let email = email.trim().to_string();
            let syntax_valid = is_valid_syntax(&email);
            let domain = if syntax_valid {
                extract_domain(&email).to_string()
            } else {
                String::new()
            };
            let list = match &file.disposable_domains {
                Some(list) => DisposableDomains::from_domains(list),
                None => DisposableDomains::default(),
            };
            let report = SyntaxReport {
                disposable: syntax_valid && list.is_disposable(&domain),
                email,
                syntax_valid,
                domain,
            };
            emit(format, &report, output::syntax_lines)?;
            Ok(output::syntax_exit_code(&report))
        }
        Commands::Mx {
            domain,
            dns_timeout_secs,
        } => {
            let timeout = config::dns_timeout(&file, dns_timeout_secs)?;
            let report = match resolve_mx(&domain, timeout) {
                Ok(records) => MxReport {
                    domain,
                    records,
                    error: None,
                },
                Err(err) if err.is_local_failure() => return Err(err.into()),
                Err(err) => MxReport {
                    domain,
                    records: Vec::new(),
                    error: Some(err.to_string()),
                },
            };
            emit(format, &report, output::mx_lines)?;
            Ok(output::mx_exit_code(&report))
        }
        Commands::Verify {
            email,
            probe,
            transcript,
        } => {
            let config = config::build_config(&file, &probe)?;
            let result = Verifier::new(config).verify(&email);
            emit(format, &result, |r| output::verify_lines(r, transcript))?;
            Ok(output::verify_exit_code(&result))
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(1);
        }
    }
}
