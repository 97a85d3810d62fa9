use serde::Serialize;

use crate::analyze::Analysis;
use crate::duplicates::DuplicateGroup;
use crate::model::{CountMap, FunnelRecord};
use crate::remediation::Remediation;

// ---------------------------------------------------------------------------
// Report document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub totals: Totals,
    pub integrity: Integrity,
    pub duplicates: DuplicateSummary,
    pub semantics: Semantics,
    pub samples: Samples,
    pub remediation: Remediation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub funnels: usize,
    pub offers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Integrity {
    pub offers_missing_funnel_id: usize,
    pub offers_with_invalid_funnel_id: usize,
    pub offers_missing_project_id: usize,
    pub offers_missing_nome_produto: usize,
    pub offers_missing_nome_oferta: usize,
    pub funnels_without_offers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateSummary {
    pub groups: usize,
    pub extra_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Semantics {
    pub generic_offer_names: usize,
    pub by_origem: CountMap,
}

#[derive(Debug, Clone, Serialize)]
pub struct Samples {
    pub invalid_funnel_ids: CountMap,
    pub funnels_without_offers: Vec<FunnelSample>,
    pub top_duplicate_groups: Vec<DuplicateGroupSample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunnelSample {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroupSample {
    pub count: usize,
    pub project_id: String,
    pub funnel_id: String,
    pub nome_produto: String,
    pub nome_oferta: String,
}

impl AuditReport {
    /// True when any integrity or duplicate count is non-zero.
    pub fn has_findings(&self) -> bool {
        let i = &self.integrity;
        i.offers_missing_funnel_id > 0
            || i.offers_with_invalid_funnel_id > 0
            || i.offers_missing_project_id > 0
            || i.offers_missing_nome_produto > 0
            || i.offers_missing_nome_oferta > 0
            || i.funnels_without_offers > 0
            || self.duplicates.groups > 0
    }

    /// Pretty JSON: two-space indent, non-ASCII left as-is.
    pub fn to_json_pretty(&self) -> Result<String, crate::AuditError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Shape an [`Analysis`] into the report. Only selects, sorts and truncates;
/// every count comes from the analysis.
pub fn build_report(analysis: &Analysis<'_>, sample_size: usize) -> AuditReport {
    AuditReport {
        totals: Totals {
            funnels: analysis.funnel_count,
            offers: analysis.offer_count,
        },
        integrity: Integrity {
            offers_missing_funnel_id: analysis.missing_funnel_id,
            offers_with_invalid_funnel_id: analysis.invalid_funnel_rows.len(),
            offers_missing_project_id: analysis.missing_project_id,
            offers_missing_nome_produto: analysis.missing_nome_produto,
            offers_missing_nome_oferta: analysis.missing_nome_oferta,
            funnels_without_offers: analysis.funnels_without_offers.len(),
        },
        duplicates: DuplicateSummary {
            groups: analysis.duplicate_groups.len(),
            extra_rows: analysis.duplicate_extra_rows,
        },
        semantics: Semantics {
            generic_offer_names: analysis.generic_offers.len(),
            by_origem: analysis.by_origem.clone(),
        },
        samples: Samples {
            invalid_funnel_ids: analysis.invalid_funnel_ids().most_common(sample_size),
            funnels_without_offers: analysis
                .funnels_without_offers
                .iter()
                .take(sample_size)
                .map(|f| funnel_sample(f))
                .collect(),
            top_duplicate_groups: top_duplicate_groups(&analysis.duplicate_groups, sample_size),
        },
        remediation: Remediation::default(),
    }
}

fn funnel_sample(funnel: &FunnelRecord) -> FunnelSample {
    FunnelSample {
        id: funnel.id.clone().unwrap_or_default(),
        name: funnel.name.clone().unwrap_or_default(),
    }
}

/// Largest groups first; equal sizes keep the order they were first seen.
pub fn top_duplicate_groups(groups: &[DuplicateGroup<'_>], limit: usize) -> Vec<DuplicateGroupSample> {
    let mut ranked: Vec<&DuplicateGroup<'_>> = groups.iter().collect();
    ranked.sort_by(|a, b| b.count().cmp(&a.count()));

    ranked
        .into_iter()
        .take(limit)
        .map(|g| {
            let row = g.representative();
            DuplicateGroupSample {
                count: g.count(),
                project_id: row.project_id.clone().unwrap_or_default(),
                funnel_id: row.funnel_id.clone().unwrap_or_default(),
                nome_produto: row.nome_produto.clone().unwrap_or_default(),
                nome_oferta: row.nome_oferta.clone().unwrap_or_default(),
            }
        })
        .collect()
}
