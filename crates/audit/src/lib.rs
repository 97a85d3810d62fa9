//! `funnelaudit-engine` — integrity audit between funnels and offer mappings.
//!
//! Pure engine crate: loads two CSV sources, cross-references them and
//! returns a serializable report. No CLI dependencies.

pub mod analyze;
pub mod config;
pub mod duplicates;
pub mod engine;
pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod remediation;
pub mod report;

pub use config::AuditConfig;
pub use engine::{run, run_from_sources};
pub use error::AuditError;
pub use model::{AuditInput, FunnelRecord, OfferMapping};
pub use normalize::normalize;
pub use report::AuditReport;
