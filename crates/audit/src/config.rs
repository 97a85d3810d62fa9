use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AuditError;
use crate::normalize::normalize;

/// Offer names written by import jobs rather than by a person.
pub const DEFAULT_GENERIC_OFFER_NAMES: [&str; 3] = [
    "auto-importado",
    "auto-importado de vendas existentes",
    "importado das vendas",
];

pub const DEFAULT_FUNNELS_PATH: &str = "supabase/funnels_utf8.csv";
pub const DEFAULT_OFFERS_PATH: &str = "supabase/offer_mappings_full_fixed.csv";
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    #[serde(default = "default_funnels_path")]
    pub funnels: PathBuf,
    #[serde(default = "default_offers_path")]
    pub offers: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            funnels: default_funnels_path(),
            offers: default_offers_path(),
        }
    }
}

fn default_funnels_path() -> PathBuf {
    PathBuf::from(DEFAULT_FUNNELS_PATH)
}

fn default_offers_path() -> PathBuf {
    PathBuf::from(DEFAULT_OFFERS_PATH)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    #[serde(default = "default_generic_offer_names")]
    pub generic_offer_names: Vec<String>,
    /// Upper bound on each list in the report's `samples` section.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            generic_offer_names: default_generic_offer_names(),
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

fn default_generic_offer_names() -> Vec<String> {
    DEFAULT_GENERIC_OFFER_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl AuditConfig {
    pub fn from_toml(input: &str) -> Result<Self, AuditError> {
        let config: AuditConfig =
            toml::from_str(input).map_err(|e| AuditError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML config file. Relative source paths are resolved against
    /// the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, AuditError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| AuditError::ConfigParse(format!("cannot read {}: {e}", path.display())))?;
        let mut config = Self::from_toml(&input)?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.sources.funnels = resolve(base_dir, &config.sources.funnels);
        config.sources.offers = resolve(base_dir, &config.sources.offers);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AuditError> {
        if self.analysis.sample_size == 0 {
            return Err(AuditError::ConfigValidation(
                "sample_size must be at least 1".into(),
            ));
        }

        if let Some(bad) = self
            .analysis
            .generic_offer_names
            .iter()
            .find(|name| normalize(Some(name.as_str())).is_empty())
        {
            return Err(AuditError::ConfigValidation(format!(
                "generic_offer_names: blank entry {bad:?}"
            )));
        }

        Ok(())
    }

    /// Generic names in normalized form, ready for membership checks.
    pub fn normalized_generic_names(&self) -> Vec<String> {
        self.analysis
            .generic_offer_names
            .iter()
            .map(|name| normalize(Some(name.as_str())))
            .collect()
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AuditConfig::from_toml("").unwrap();
        assert_eq!(config.sources.funnels, PathBuf::from(DEFAULT_FUNNELS_PATH));
        assert_eq!(config.sources.offers, PathBuf::from(DEFAULT_OFFERS_PATH));
        assert_eq!(config.analysis.sample_size, 10);
        assert_eq!(
            config.analysis.generic_offer_names,
            vec![
                "auto-importado",
                "auto-importado de vendas existentes",
                "importado das vendas",
            ]
        );
    }

    #[test]
    fn parse_overrides() {
        let input = r#"
[sources]
funnels = "data/f.csv"

[analysis]
generic_offer_names = ["  Oferta  Padrão "]
sample_size = 3
"#;
        let config = AuditConfig::from_toml(input).unwrap();
        assert_eq!(config.sources.funnels, PathBuf::from("data/f.csv"));
        assert_eq!(config.sources.offers, PathBuf::from(DEFAULT_OFFERS_PATH));
        assert_eq!(config.analysis.sample_size, 3);
        assert_eq!(config.normalized_generic_names(), vec!["oferta padrão"]);
    }

    #[test]
    fn reject_zero_sample_size() {
        let err = AuditConfig::from_toml("[analysis]\nsample_size = 0\n").unwrap_err();
        assert!(err.to_string().contains("sample_size"));
    }

    #[test]
    fn reject_blank_generic_name() {
        let err = AuditConfig::from_toml("[analysis]\ngeneric_offer_names = [\"ok\", \"   \"]\n").unwrap_err();
        assert!(matches!(err, AuditError::ConfigValidation(_)));
    }

    #[test]
    fn reject_unknown_key() {
        let err = AuditConfig::from_toml("[analysis]\nsample = 3\n").unwrap_err();
        assert!(matches!(err, AuditError::ConfigParse(_)));
    }

    #[test]
    fn from_file_resolves_relative_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.toml");
        std::fs::write(&path, "[sources]\nfunnels = \"f.csv\"\noffers = \"/abs/o.csv\"\n").unwrap();

        let config = AuditConfig::from_file(&path).unwrap();
        assert_eq!(config.sources.funnels, dir.path().join("f.csv"));
        assert_eq!(config.sources.offers, PathBuf::from("/abs/o.csv"));
    }
}
