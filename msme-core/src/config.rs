//! Analyzer configuration, loadable from TOML.
//!
//! Every key is optional; omitted keys take their defaults.
//!
//! ```toml
//! regular_dpd_threshold = 0
//!
//! [dpd_binning]
//! type = "adaptive"
//! bins = 30
//!
//! [risk_policy]
//! current_npa = 40.0
//! upcoming_npa = 60.0
//! visit_gap = 30.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analyzer::histogram::MAX_ADAPTIVE_BINS;
use crate::analyzer::{DpdBinning, RiskPolicy};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Records with DPD at or below this are regular payers.
    pub regular_dpd_threshold: u32,
    pub dpd_binning: DpdBinning,
    pub risk_policy: RiskPolicy,
}

impl AnalyzerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AnalyzerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from `path` when given, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let DpdBinning::Adaptive { bins } = self.dpd_binning {
            if bins == 0 || bins > MAX_ADAPTIVE_BINS {
                return Err(ConfigError::Invalid(format!(
                    "adaptive DPD binning needs 1 to {MAX_ADAPTIVE_BINS} bins, got {bins}"
                )));
            }
        }
        self.risk_policy.validate()
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(AnalyzerConfig::from_toml_str("").unwrap(), AnalyzerConfig::default());
    }

    #[test]
    fn partial_policy_keeps_other_defaults() {
        let cfg = AnalyzerConfig::from_toml_str(
            r#"
            regular_dpd_threshold = 7

            [dpd_binning]
            type = "adaptive"
            bins = 30

            [risk_policy]
            current_npa = 40.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.regular_dpd_threshold, 7);
        assert_eq!(cfg.dpd_binning, DpdBinning::Adaptive { bins: 30 });
        assert_eq!(cfg.risk_policy.current_npa, 40.0);
        assert_eq!(cfg.risk_policy.upcoming_npa, RiskPolicy::default().upcoming_npa);
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            AnalyzerConfig::from_toml_str("[dpd_binning]\ntype = \"adaptive\"\nbins = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AnalyzerConfig::from_toml_str("[dpd_binning]\ntype = \"adaptive\"\nbins = 2000000\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(AnalyzerConfig::from_toml_str("[dpd_binning]\ntype = \"adaptive\"\nbins = 200\n").is_ok());
        assert!(matches!(
            AnalyzerConfig::from_toml_str("[risk_policy]\nvisit_gap = -2.0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AnalyzerConfig::from_toml_str("regular_dpd_threshold = \"zero\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = AnalyzerConfig {
            regular_dpd_threshold: 3,
            dpd_binning: DpdBinning::Adaptive { bins: 12 },
            ..AnalyzerConfig::default()
        };
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(AnalyzerConfig::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyzer.toml");
        std::fs::write(&path, "regular_dpd_threshold = 15\n").unwrap();
        let cfg = AnalyzerConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(cfg.regular_dpd_threshold, 15);
        assert!(matches!(
            AnalyzerConfig::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
