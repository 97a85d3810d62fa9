use std::collections::HashMap;

use crate::model::OfferMapping;
use crate::normalize::normalize;

/// Normalized (project_id, funnel_id, nome_produto, nome_oferta).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    pub project_id: String,
    pub funnel_id: String,
    pub nome_produto: String,
    pub nome_oferta: String,
}

impl DuplicateKey {
    pub fn of(offer: &OfferMapping) -> Self {
        Self {
            project_id: normalize(offer.project_id.as_deref()),
            funnel_id: normalize(offer.funnel_id.as_deref()),
            nome_produto: normalize(offer.nome_produto.as_deref()),
            nome_oferta: normalize(offer.nome_oferta.as_deref()),
        }
    }
}

/// Offer rows sharing one [`DuplicateKey`], in file order.
#[derive(Debug, Clone)]
pub struct DuplicateGroup<'a> {
    pub key: DuplicateKey,
    pub rows: Vec<&'a OfferMapping>,
}

impl<'a> DuplicateGroup<'a> {
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// First row of the group in file order.
    pub fn representative(&self) -> &'a OfferMapping {
        self.rows[0]
    }
}

/// Group every offer by its normalized key. Groups come back in the order
/// their first row was seen.
pub fn group_offers(offers: &[OfferMapping]) -> Vec<DuplicateGroup<'_>> {
    let mut index: HashMap<DuplicateKey, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup<'_>> = Vec::new();

    for offer in offers {
        let key = DuplicateKey::of(offer);
        match index.get(&key) {
            Some(&pos) => groups[pos].rows.push(offer),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(DuplicateGroup { key, rows: vec![offer] });
            }
        }
    }

    groups
}

/// Groups with more than one member.
pub fn find_duplicates(offers: &[OfferMapping]) -> Vec<DuplicateGroup<'_>> {
    group_offers(offers)
        .into_iter()
        .filter(|g| g.count() > 1)
        .collect()
}

/// Rows that could be removed while keeping one per group.
pub fn extra_rows(groups: &[DuplicateGroup<'_>]) -> usize {
    groups.iter().map(|g| g.count().saturating_sub(1)).sum()
}
