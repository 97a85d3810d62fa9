use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Column names the loader maps onto [`FunnelRecord`].
pub mod funnel_columns {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
}

/// Column names the loader maps onto [`OfferMapping`].
pub mod offer_columns {
    pub const PROJECT_ID: &str = "project_id";
    pub const FUNNEL_ID: &str = "funnel_id";
    pub const NOME_PRODUTO: &str = "nome_produto";
    pub const NOME_OFERTA: &str = "nome_oferta";
    pub const ORIGEM: &str = "origem";
    pub const ID_FUNIL: &str = "id_funil";
}

/// One row of the funnels source.
///
/// Empty cells and missing columns are both `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunnelRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Columns not examined by the audit.
    pub extra: HashMap<String, String>,
}

impl FunnelRecord {
    /// Build from a header → cell mapping, moving named columns out of it.
    pub fn from_fields(mut fields: HashMap<String, String>) -> Self {
        Self {
            id: take_field(&mut fields, funnel_columns::ID),
            name: take_field(&mut fields, funnel_columns::NAME),
            extra: fields,
        }
    }
}

/// One row of the offer-mappings source.
///
/// `funnel_id` is a logical reference into the funnels source and may be
/// absent or point at a funnel that does not exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferMapping {
    pub project_id: Option<String>,
    pub funnel_id: Option<String>,
    pub nome_produto: Option<String>,
    pub nome_oferta: Option<String>,
    pub origem: Option<String>,
    /// Legacy funnel reference by name.
    pub id_funil: Option<String>,
    pub extra: HashMap<String, String>,
}

impl OfferMapping {
    pub fn from_fields(mut fields: HashMap<String, String>) -> Self {
        Self {
            project_id: take_field(&mut fields, offer_columns::PROJECT_ID),
            funnel_id: take_field(&mut fields, offer_columns::FUNNEL_ID),
            nome_produto: take_field(&mut fields, offer_columns::NOME_PRODUTO),
            nome_oferta: take_field(&mut fields, offer_columns::NOME_OFERTA),
            origem: take_field(&mut fields, offer_columns::ORIGEM),
            id_funil: take_field(&mut fields, offer_columns::ID_FUNIL),
            extra: fields,
        }
    }
}

fn take_field(fields: &mut HashMap<String, String>, column: &str) -> Option<String> {
    fields.remove(column).filter(|v| !v.is_empty())
}

/// Both sources, loaded in file order.
#[derive(Debug, Clone, Default)]
pub struct AuditInput {
    pub funnels: Vec<FunnelRecord>,
    pub offers: Vec<OfferMapping>,
}

// ---------------------------------------------------------------------------
// Ordered counts
// ---------------------------------------------------------------------------

/// Occurrence counts keyed by string, kept in first-encounter order.
///
/// Serializes as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountMap {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl CountMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.index.get(key).map(|&pos| self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), *n))
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// Keep the `limit` most frequent keys (ties go to the earlier key),
    /// emitted in first-encounter order.
    pub fn most_common(&self, limit: usize) -> CountMap {
        let mut ranked: Vec<usize> = (0..self.entries.len()).collect();
        ranked.sort_by(|&a, &b| self.entries[b].1.cmp(&self.entries[a].1));
        ranked.truncate(limit);
        ranked.sort_unstable();
        ranked.into_iter().map(|pos| self.entries[pos].clone()).collect()
    }
}

impl FromIterator<(String, usize)> for CountMap {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        let mut map = CountMap::new();
        for (key, count) in iter {
            match map.index.get(&key) {
                Some(&pos) => map.entries[pos].1 += count,
                None => {
                    map.index.insert(key.clone(), map.entries.len());
                    map.entries.push((key, count));
                }
            }
        }
        map
    }
}

impl Serialize for CountMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}
