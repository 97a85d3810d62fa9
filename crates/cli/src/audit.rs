//! `funnelaudit` — load both sources, audit, print the JSON report.

use std::io::Write;
use std::path::Path;

use funnelaudit_engine::AuditConfig;
use tracing::info;

use crate::exit_codes::{EXIT_FINDINGS, EXIT_OUTPUT};
use crate::{Cli, CliError};

pub fn cmd_audit(cli: Cli) -> Result<(), CliError> {
    let fail_on_findings = cli.fail_on_findings;
    let output_file = cli.output.clone();
    let config = resolve_config(cli)?;

    let report = funnelaudit_engine::run_from_sources(&config)?;
    let json_str = report.to_json_pretty()?;

    if let Some(ref path) = output_file {
        write_report(path, &json_str)?;
        info!(path = %path.display(), "wrote report");
    }

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{json_str}")
        .and_then(|_| handle.flush())
        .map_err(|e| CliError::new(EXIT_OUTPUT, format!("cannot write report to stdout: {e}")))?;

    if fail_on_findings && report.has_findings() {
        return Err(CliError::new(EXIT_FINDINGS, "integrity findings present (--fail-on-findings)"));
    }

    Ok(())
}

/// Config file (if any) first, then command-line overrides, then validation.
fn resolve_config(cli: Cli) -> Result<AuditConfig, CliError> {
    let mut config = match cli.config {
        Some(ref path) => AuditConfig::from_file(path)?,
        None => AuditConfig::default(),
    };

    if let Some(funnels) = cli.funnels {
        config.sources.funnels = funnels;
    }
    if let Some(offers) = cli.offers {
        config.sources.offers = offers;
    }
    if !cli.generic_names.is_empty() {
        config.analysis.generic_offer_names = cli.generic_names;
    }
    if let Some(n) = cli.sample_size {
        config.analysis.sample_size = n;
    }

    config
        .validate()
        .map_err(|e| CliError::usage(e.to_string()))?;
    Ok(config)
}

fn write_report(path: &Path, json_str: &str) -> Result<(), CliError> {
    std::fs::write(path, format!("{json_str}\n")).map_err(|e| {
        CliError::new(EXIT_OUTPUT, format!("cannot write {}: {e}", path.display()))
    })
}
