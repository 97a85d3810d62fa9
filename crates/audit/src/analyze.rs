//! Integrity and semantic checks over loaded funnels and offer mappings.
//!
//! Every check is read-only and independent of the others. Results borrow
//! from the [`AuditInput`] they were computed from.

use std::collections::HashSet;

use tracing::debug;

use crate::config::AuditConfig;
use crate::duplicates::{extra_rows, find_duplicates, DuplicateGroup};
use crate::model::{AuditInput, CountMap, FunnelRecord, OfferMapping};
use crate::normalize::normalize;

/// Label used in the origin distribution for rows without `origem`.
pub const EMPTY_ORIGIN_LABEL: &str = "(vazio)";

/// Everything the report is built from.
#[derive(Debug)]
pub struct Analysis<'a> {
    pub funnel_count: usize,
    pub offer_count: usize,
    pub invalid_funnel_rows: Vec<&'a OfferMapping>,
    pub missing_funnel_id: usize,
    pub missing_project_id: usize,
    pub missing_nome_produto: usize,
    pub missing_nome_oferta: usize,
    pub offers_by_funnel: CountMap,
    pub funnels_without_offers: Vec<&'a FunnelRecord>,
    pub duplicate_groups: Vec<DuplicateGroup<'a>>,
    pub duplicate_extra_rows: usize,
    pub generic_offers: Vec<&'a OfferMapping>,
    pub by_origem: CountMap,
}

impl<'a> Analysis<'a> {
    /// Occurrences of each unknown `funnel_id`, in first-encounter order.
    pub fn invalid_funnel_ids(&self) -> CountMap {
        let mut counts = CountMap::new();
        for row in &self.invalid_funnel_rows {
            if let Some(id) = row.funnel_id.as_deref() {
                counts.add(id);
            }
        }
        counts
    }
}

pub fn analyze<'a>(input: &'a AuditInput, config: &AuditConfig) -> Analysis<'a> {
    let offers = &input.offers;
    let funnel_ids = funnel_id_universe(&input.funnels);

    let offers_by_funnel = offers_by_funnel(offers);
    let duplicate_groups = find_duplicates(offers);
    let duplicate_extra_rows = extra_rows(&duplicate_groups);
    let generic_names: HashSet<String> = config.normalized_generic_names().into_iter().collect();

    let analysis = Analysis {
        funnel_count: input.funnels.len(),
        offer_count: offers.len(),
        invalid_funnel_rows: invalid_funnel_references(offers, &funnel_ids),
        missing_funnel_id: count_missing(offers, |o| &o.funnel_id),
        missing_project_id: count_missing(offers, |o| &o.project_id),
        missing_nome_produto: count_missing(offers, |o| &o.nome_produto),
        missing_nome_oferta: count_missing(offers, |o| &o.nome_oferta),
        funnels_without_offers: funnels_without_offers(&input.funnels, &offers_by_funnel),
        offers_by_funnel,
        duplicate_groups,
        duplicate_extra_rows,
        generic_offers: generic_offers(offers, &generic_names),
        by_origem: origin_distribution(offers),
    };

    debug!(
        funnels = analysis.funnel_count,
        offers = analysis.offer_count,
        invalid = analysis.invalid_funnel_rows.len(),
        duplicate_groups = analysis.duplicate_groups.len(),
        "analysis complete"
    );

    analysis
}

/// Funnel ids compared exactly; ids are case-sensitive.
pub fn funnel_id_universe(funnels: &[FunnelRecord]) -> HashSet<&str> {
    funnels.iter().filter_map(|f| f.id.as_deref()).collect()
}

/// Offers whose `funnel_id` is set but names no known funnel.
pub fn invalid_funnel_references<'a>(
    offers: &'a [OfferMapping],
    funnel_ids: &HashSet<&str>,
) -> Vec<&'a OfferMapping> {
    offers
        .iter()
        .filter(|o| matches!(o.funnel_id.as_deref(), Some(id) if !funnel_ids.contains(id)))
        .collect()
}

pub fn count_missing<F>(offers: &[OfferMapping], field: F) -> usize
where
    F: Fn(&OfferMapping) -> &Option<String>,
{
    offers.iter().filter(|o| field(o).is_none()).count()
}

/// Offer rows per `funnel_id`. Rows without a funnel are not counted.
pub fn offers_by_funnel(offers: &[OfferMapping]) -> CountMap {
    let mut counts = CountMap::new();
    for id in offers.iter().filter_map(|o| o.funnel_id.as_deref()) {
        counts.add(id);
    }
    counts
}

/// Funnels no offer row points at, in load order.
pub fn funnels_without_offers<'a>(
    funnels: &'a [FunnelRecord],
    offers_by_funnel: &CountMap,
) -> Vec<&'a FunnelRecord> {
    funnels
        .iter()
        .filter(|f| match f.id.as_deref() {
            Some(id) => !offers_by_funnel.contains_key(id),
            None => true,
        })
        .collect()
}

/// Offers whose normalized `nome_oferta` is one of `generic_names`
/// (which must already be normalized).
pub fn generic_offers<'a>(
    offers: &'a [OfferMapping],
    generic_names: &HashSet<String>,
) -> Vec<&'a OfferMapping> {
    offers
        .iter()
        .filter(|o| generic_names.contains(&normalize(o.nome_oferta.as_deref())))
        .collect()
}

pub fn origin_distribution(offers: &[OfferMapping]) -> CountMap {
    let mut counts = CountMap::new();
    for offer in offers {
        counts.add(offer.origem.as_deref().unwrap_or(EMPTY_ORIGIN_LABEL));
    }
    counts
}
