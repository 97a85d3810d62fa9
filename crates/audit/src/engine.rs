use tracing::info;

use crate::analyze::analyze;
use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::loader::{load_funnels, load_offers};
use crate::model::AuditInput;
use crate::report::{build_report, AuditReport};

/// Audit pre-loaded records per config.
pub fn run(config: &AuditConfig, input: &AuditInput) -> AuditReport {
    let analysis = analyze(input, config);
    build_report(&analysis, config.analysis.sample_size)
}

/// Load both sources named in the config, then audit them.
///
/// Any load failure aborts before analysis; there is no partial report.
pub fn run_from_sources(config: &AuditConfig) -> Result<AuditReport, AuditError> {
    let input = load_input(config)?;
    let report = run(config, &input);

    info!(
        funnels = report.totals.funnels,
        offers = report.totals.offers,
        invalid_funnel_ids = report.integrity.offers_with_invalid_funnel_id,
        missing_funnel_ids = report.integrity.offers_missing_funnel_id,
        duplicate_groups = report.duplicates.groups,
        "audit complete"
    );

    Ok(report)
}

pub fn load_input(config: &AuditConfig) -> Result<AuditInput, AuditError> {
    let funnels = load_funnels(&config.sources.funnels)?;
    let offers = load_offers(&config.sources.offers)?;
    Ok(AuditInput { funnels, offers })
}
