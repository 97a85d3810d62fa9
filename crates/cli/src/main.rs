// funnelaudit - integrity audit between funnels and offer mappings

mod audit;
mod exit_codes;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use exit_codes::{EXIT_SOURCE_FORMAT, EXIT_SOURCE_NOT_FOUND, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser, Debug)]
#[command(name = "funnelaudit")]
#[command(about = "Cross-check funnels and offer mappings; print a JSON integrity report")]
#[command(long_version = long_version())]
#[command(version)]
#[command(after_help = "\
Examples:
  funnelaudit
  funnelaudit --funnels funnels.csv --offers offers.csv
  funnelaudit --config audit.toml --output report.json
  funnelaudit --generic-name 'auto-importado' --sample-size 25
  funnelaudit --fail-on-findings --quiet")]
pub struct Cli {
    /// Funnels CSV (columns: id, name)
    #[arg(long, env = "FUNNELAUDIT_FUNNELS")]
    pub funnels: Option<PathBuf>,

    /// Offer mappings CSV (columns: project_id, funnel_id, nome_produto, nome_oferta, origem, id_funil)
    #[arg(long, env = "FUNNELAUDIT_OFFERS")]
    pub offers: Option<PathBuf>,

    /// TOML config file; flags given on the command line take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Placeholder offer name to flag (repeatable; replaces the default list)
    #[arg(long = "generic-name", value_name = "NAME")]
    pub generic_names: Vec<String>,

    /// Maximum entries in each sample list
    #[arg(long, value_name = "N")]
    pub sample_size: Option<usize>,

    /// Also write the JSON report to this file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Exit with code 6 when any integrity or duplicate finding is present
    #[arg(long)]
    pub fail_on_findings: bool,

    /// Only log warnings and errors to stderr
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  funnelaudit-engine ", env!("CARGO_PKG_VERSION"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.quiet);

    match audit::cmd_audit(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<funnelaudit_engine::AuditError> for CliError {
    fn from(err: funnelaudit_engine::AuditError) -> Self {
        let code = exit_codes::audit_exit_code(&err);
        let error = Self::new(code, err.to_string());
        match code {
            EXIT_SOURCE_NOT_FOUND => {
                error.with_hint("pass --funnels/--offers, or run from the directory containing supabase/")
            }
            EXIT_SOURCE_FORMAT => error.with_hint("inputs must be UTF-8 CSV with a header row"),
            _ => error,
        }
    }
}
