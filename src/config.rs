use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::units::SizeUnit;
use crate::render::PlotKind;

/// Defaults for the `plot` command, read from a TOML file.
///
/// ```toml
/// kind = "line"
/// inunits = "B"
/// yunits = "MiB"
/// drop_zero_values = false
/// regression = true
/// output_dir = "figures"
/// ```
///
/// Every field is optional; command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotConfig {
    pub kind: Option<PlotKind>,
    pub inunits: Option<SizeUnit>,
    pub yunits: Option<SizeUnit>,
    /// Treat the values as microsecond latencies.
    #[serde(default)]
    pub latency: bool,
    pub drop_zero_values: Option<bool>,
    #[serde(default)]
    pub regression: bool,
    pub title: Option<String>,
    pub yaxis: Option<String>,
    pub output_dir: Option<String>,
}

impl PlotConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_fields() {
        let cfg = PlotConfig::parse(
            r#"
            kind = "line"
            inunits = "B"
            yunits = "MiB"
            latency = true
            drop_zero_values = false
            regression = true
            title = "Throughput"
            output_dir = "figures"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.kind, Some(PlotKind::Line));
        assert_eq!(cfg.inunits, Some(SizeUnit::Bytes));
        assert_eq!(cfg.yunits, Some(SizeUnit::MiB));
        assert!(cfg.latency);
        assert_eq!(cfg.drop_zero_values, Some(false));
        assert!(cfg.regression);
        assert_eq!(cfg.output_dir.as_deref(), Some("figures"));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(PlotConfig::parse("").unwrap(), PlotConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(PlotConfig::parse("colour = \"red\"").is_err());
    }
}
