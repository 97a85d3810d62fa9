//! Repair statements shipped with every report.
//!
//! These are static text for an operator to review and run by hand; nothing
//! in this crate executes them. `:name` marks a value the operator fills in.

use serde::Serialize;

pub const CHECK_INVALID_FUNNEL_SQL: &str = concat!(
    "SELECT om.project_id, om.funnel_id, COUNT(*) ",
    "FROM public.offer_mappings om ",
    "LEFT JOIN public.funnels f ON f.id = om.funnel_id ",
    "WHERE om.funnel_id IS NOT NULL AND f.id IS NULL ",
    "GROUP BY om.project_id, om.funnel_id ORDER BY COUNT(*) DESC;",
);

pub const BACKFILL_BY_LEGACY_NAME_SQL: &str = concat!(
    "UPDATE public.offer_mappings om ",
    "SET funnel_id = f.id, updated_at = now() ",
    "FROM public.funnels f ",
    "WHERE om.project_id = f.project_id ",
    "AND om.funnel_id IS NULL ",
    "AND om.id_funil IS NOT NULL ",
    "AND btrim(lower(om.id_funil)) = btrim(lower(f.name));",
);

pub const REASSIGN_INVALID_FUNNEL_SQL_TEMPLATE: &str = concat!(
    "UPDATE public.offer_mappings om ",
    "SET funnel_id = :target_funnel_id::uuid, updated_at = now() ",
    "WHERE om.project_id = :project_id::uuid ",
    "AND (om.funnel_id IS NULL OR NOT EXISTS (",
    "SELECT 1 FROM public.funnels f WHERE f.id = om.funnel_id));",
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remediation {
    pub check_invalid_funnel_sql: &'static str,
    pub backfill_by_legacy_name_sql: &'static str,
    pub reassign_invalid_funnel_sql_template: &'static str,
}

impl Default for Remediation {
    fn default() -> Self {
        Self {
            check_invalid_funnel_sql: CHECK_INVALID_FUNNEL_SQL,
            backfill_by_legacy_name_sql: BACKFILL_BY_LEGACY_NAME_SQL,
            reassign_invalid_funnel_sql_template: REASSIGN_INVALID_FUNNEL_SQL_TEMPLATE,
        }
    }
}
