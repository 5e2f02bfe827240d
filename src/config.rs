use serde::Deserialize;
use std::path::Path;

use crate::error::{CcvError, Result};
use crate::input::complexity::ComplexityFormat;
use crate::risk::RiskThresholds;
use crate::types::PlotMode;

pub const OUTPUT_FORMATS: [&str; 3] = ["terminal", "json", "html"];

/// All settings that can be placed in a .ccv.yml config file.
/// Every field is optional; omitted fields fall back to CLI defaults.
/// CLI flags always take precedence over values set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CcvConfig {
    pub output: Option<String>,
    pub format: Option<String>,
    pub plot_type: Option<String>,
    pub min_complexity: Option<u32>,
    pub complexity_format: Option<String>,
    pub top: Option<usize>,

    pub risk: Option<ConfigRisk>,
}

/// Optional per-band lower bounds. Ordering is checked after merging with CLI values.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigRisk {
    pub very_low: Option<u32>,
    pub low: Option<u32>,
    pub medium: Option<u32>,
    pub high: Option<u32>,
    pub very_high: Option<u32>,
    pub critical: Option<u32>,
}

impl ConfigRisk {
    /// Fills in every threshold the file leaves unset from `base`.
    pub fn resolve(&self, base: RiskThresholds) -> RiskThresholds {
        RiskThresholds {
            very_low:  self.very_low.unwrap_or(base.very_low),
            low:       self.low.unwrap_or(base.low),
            medium:    self.medium.unwrap_or(base.medium),
            high:      self.high.unwrap_or(base.high),
            very_high: self.very_high.unwrap_or(base.very_high),
            critical:  self.critical.unwrap_or(base.critical),
        }
    }
}

impl CcvConfig {
    /// Validates semantic constraints that serde cannot enforce.
    pub fn validate(&self) -> Result<()> {
        if let Some(fmt) = &self.format {
            if !OUTPUT_FORMATS.contains(&fmt.as_str()) {
                return Err(CcvError::config(format!(
                    "Invalid 'format' value: \"{fmt}\". \
                     Expected one of: \"terminal\", \"json\", \"html\""
                )));
            }
        }

        if let Some(plot) = &self.plot_type {
            plot.parse::<PlotMode>()?;
        }

        if let Some(cf) = &self.complexity_format {
            cf.parse::<ComplexityFormat>()?;
        }

        if let Some(0) = self.top {
            return Err(CcvError::config("Invalid 'top' value: 0. Must be 1 or greater"));
        }

        Ok(())
    }
}

/// Reads, parses, and validates a YAML config file from `path`.
pub fn load_config(path: &Path) -> Result<CcvConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CcvError::io(path, e))?;
    let cfg: CcvConfig = serde_yaml::from_str(&content)
        .map_err(|e| CcvError::config(format!("Invalid config file '{}': {e}", path.display())))?;
    cfg.validate().map_err(|e| match e {
        CcvError::Configuration { message } => {
            CcvError::config(format!("Config file '{}': {message}", path.display()))
        }
        other => other,
    })?;
    log::debug!("Loaded config from {}", path.display());
    Ok(cfg)
}

/// Annotated YAML template printed by `--generate-config`.
pub static TEMPLATE: &str = r#"# ccv configuration file
# Generated by: ccv --generate-config
#
# All settings are optional. Omit any field to use the built-in default.
# CLI flags always take precedence over values in this file.
#
#   ccv --config .ccv.yml churn.log lizard.csv

# ── Output ─────────────────────────────────────────────────────────────────────

# Output format: terminal, json, html
# format: "html"

# Output file path. HTML defaults to complexity_churn.html; JSON prints to stdout.
# output: "complexity_churn.html"

# Rows shown by the terminal report. All files are always classified.
# top: 20

# ── Metrics ────────────────────────────────────────────────────────────────────

# Y axis: "changes" (lines added + removed) or "commits" (commits touching the file)
# plot_type: "changes"

# Functions below this cyclomatic complexity are ignored before averaging.
# min_complexity: 5

# Complexity report format: csv (lizard --csv), xml (lizard --xml) or json.
# Guessed from the file extension when omitted.
# complexity_format: "csv"

# ── Risk bands ─────────────────────────────────────────────────────────────────
# Lower bound of each band for complexity + churn. Must be strictly increasing.

# risk:
#   very_low:  10
#   low:       15
#   medium:    20
#   high:      25
#   very_high: 30
#   critical:  35
"#;

/// Prints the config template to stdout, or writes it to `output_path` if given.
pub fn print_template(output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => std::fs::write(path, TEMPLATE).map_err(|e| CcvError::io(path, e)),
        None => {
            print!("{TEMPLATE}");
            Ok(())
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_template_is_valid_yaml() {
        let result: std::result::Result<CcvConfig, _> = serde_yaml::from_str(TEMPLATE);
        assert!(result.is_ok(), "TEMPLATE must parse as valid CcvConfig: {:?}", result.err());
        let cfg = result.unwrap();
        // Everything is commented out in the template
        assert!(cfg.format.is_none());
        assert!(cfg.risk.is_none());
    }

    #[test]
    fn test_full_config_parses_and_validates() {
        let yaml = "format: html\noutput: out.html\nplot_type: changes\nmin_complexity: 5\n\
                    complexity_format: csv\ntop: 20\nrisk:\n  very_low: 10\n  low: 15\n  \
                    medium: 20\n  high: 25\n  very_high: 30\n  critical: 35\n";
        let cfg: CcvConfig = serde_yaml::from_str(yaml).expect("full config should parse");
        assert_eq!(cfg.plot_type.as_deref(), Some("changes"));
        assert_eq!(cfg.min_complexity, Some(5));
        let risk = cfg.risk.expect("risk table should be present");
        assert_eq!(risk.resolve(RiskThresholds::default()), RiskThresholds::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_risk_table_parsed() {
        let yaml = "risk:\n  very_low: 0\n  critical: 100\n";
        let cfg: CcvConfig = serde_yaml::from_str(yaml).expect("should parse");
        let t = cfg.risk.unwrap().resolve(RiskThresholds::default());
        assert_eq!(t.very_low, 0);
        assert_eq!(t.low, 15);
        assert_eq!(t.critical, 100);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<CcvConfig, _> = serde_yaml::from_str("since: \"1 year ago\"\n");
        assert!(result.is_err(), "Unknown fields should be rejected by deny_unknown_fields");
    }

    #[test]
    fn test_unknown_risk_field_rejected() {
        let result: std::result::Result<CcvConfig, _> = serde_yaml::from_str("risk:\n  extreme: 50\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_invalid_format_rejected() {
        let cfg: CcvConfig = serde_yaml::from_str("format: \"csv\"\n").unwrap();
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("format"), "Error should mention 'format': {msg}");
        assert!(msg.contains("terminal") && msg.contains("json") && msg.contains("html"));
    }

    #[test]
    fn test_validate_invalid_plot_type_rejected() {
        let cfg: CcvConfig = serde_yaml::from_str("plot_type: \"lines\"\n").unwrap();
        assert!(matches!(cfg.validate(), Err(CcvError::UnrecognizedPlotMode { .. })));
    }

    #[test]
    fn test_validate_invalid_complexity_format_rejected() {
        let cfg: CcvConfig = serde_yaml::from_str("complexity_format: \"yaml\"\n").unwrap();
        assert!(cfg.validate().is_err());
        let cfg: CcvConfig = serde_yaml::from_str("complexity_format: \"xml\"\n").unwrap();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_top_rejected() {
        let cfg: CcvConfig = serde_yaml::from_str("top: 0\n").unwrap();
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("top"), "Error should mention 'top': {msg}");
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "format: json\nplot_type: commits\nrisk:\n  very_low: 5").unwrap();
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.format.as_deref(), Some("json"));
        assert_eq!(cfg.risk.and_then(|r| r.very_low), Some(5));
    }

    #[test]
    fn test_load_config_names_file_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "top: 0").unwrap();
        let msg = load_config(file.path()).unwrap_err().to_string();
        assert!(msg.contains(&file.path().display().to_string()), "{msg}");
    }

    #[test]
    fn test_print_template_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".ccv.yml");
        print_template(Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), TEMPLATE);
    }
}
