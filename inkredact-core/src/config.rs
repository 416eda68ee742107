//! Configuration management for `inkredact-core`.
//!
//! This module defines the PII pattern rules used by the extractor and the
//! pipeline-level settings (redaction threshold, directories). It handles
//! YAML (de)serialisation and provides utilities for loading, merging, and
//! validating these configs.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::engine::DEFAULT_CONF_THRESHOLD;
use crate::findings::PiiCategory;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// One PII pattern rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PiiRule {
    /// Unique identifier for the rule (e.g., "email").
    pub name: String,
    /// The category matches are reported under.
    pub category: PiiCategory,
    /// The regex pattern string.
    pub pattern: String,
    /// Which capture group holds the value; 0 is the whole match.
    #[serde(default)]
    pub capture_group: usize,
    #[serde(default)]
    pub case_insensitive: bool,
    /// Explicit override for enabling/disabling the rule.
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PiiRule {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// A set of PII rules.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct PiiRuleConfig {
    pub rules: Vec<PiiRule>,
}

impl PiiRuleConfig {
    /// Loads PII rules from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom PII rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file {}", path.display()))?;
        let config: PiiRuleConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse rules file {}", path.display()))?;

        validate_rules(&config.rules)?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());
        Ok(config)
    }

    /// Loads the built-in rules embedded in the library.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default PII rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: PiiRuleConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default rules")?;

        debug!("Loaded {} default rules.", config.rules.len());
        Ok(config)
    }

    /// Rules that are not explicitly disabled.
    pub fn active_rules(&self) -> impl Iterator<Item = &PiiRule> {
        self.rules.iter().filter(|r| r.is_enabled())
    }
}

/// Merges user-defined rules over the defaults. A user rule replaces the
/// default rule with the same name; new names are appended. Order is by name
/// so the merged set is deterministic.
pub fn merge_rules(default_config: PiiRuleConfig, user_config: Option<PiiRuleConfig>) -> PiiRuleConfig {
    debug!("merge_rules called. Default rules count: {}", default_config.rules.len());

    let mut merged: BTreeMap<String, PiiRule> = default_config
        .rules
        .into_iter()
        .map(|rule| (rule.name.clone(), rule))
        .collect();

    if let Some(user_cfg) = user_config {
        debug!("Merging {} user rules.", user_cfg.rules.len());
        for rule in user_cfg.rules {
            merged.insert(rule.name.clone(), rule);
        }
    }

    let rules: Vec<PiiRule> = merged.into_values().collect();
    debug!("Final total rules after merge: {}", rules.len());
    PiiRuleConfig { rules }
}

/// Validates rule integrity (names, regex compilation, capture groups).
pub fn validate_rules(rules: &[PiiRule]) -> Result<()> {
    let mut rule_names = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if rule.name.is_empty() {
            errors.push("A rule has an empty `name` field.".to_string());
        } else if !rule_names.insert(rule.name.as_str()) {
            errors.push(format!("Duplicate rule name found: '{}'.", rule.name));
        }

        if rule.pattern.is_empty() {
            errors.push(format!("Rule '{}' has an empty `pattern` field.", rule.name));
            continue;
        }
        if rule.pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(format!(
                "Rule '{}': pattern length ({}) exceeds maximum allowed ({}).",
                rule.name,
                rule.pattern.len(),
                MAX_PATTERN_LENGTH
            ));
            continue;
        }

        match Regex::new(&rule.pattern) {
            Ok(re) => {
                // captures_len counts the implicit whole-match group.
                if rule.capture_group >= re.captures_len() {
                    errors.push(format!(
                        "Rule '{}': capture_group {} does not exist in pattern.",
                        rule.name, rule.capture_group
                    ));
                }
            }
            Err(e) => {
                errors.push(format!("Rule '{}' has an invalid regex pattern: {}", rule.name, e));
            }
        }
    }

    if !errors.is_empty() {
        Err(anyhow!("Rule validation failed:\n{}", errors.join("\n")))
    } else {
        Ok(())
    }
}

fn default_threshold() -> f64 {
    DEFAULT_CONF_THRESHOLD
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_samples_dir() -> PathBuf {
    PathBuf::from("samples")
}

/// Pipeline-level settings, loadable from YAML.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Confidence at or above which PII fragments are blacked out.
    #[serde(default = "default_threshold")]
    pub redaction_threshold: f64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Where images are picked up when no explicit input is given.
    #[serde(default = "default_samples_dir")]
    pub samples_dir: PathBuf,
    /// Rule overrides merged over the built-in rules.
    #[serde(default)]
    pub rules: Option<PiiRuleConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            redaction_threshold: default_threshold(),
            output_dir: default_output_dir(),
            samples_dir: default_samples_dir(),
            rules: None,
        }
    }
}

impl PipelineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading pipeline configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: PipelineConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if !(0.0..=1.0).contains(&config.redaction_threshold) {
            return Err(anyhow!(
                "redaction_threshold in {} must be within [0, 1], got {}",
                path.display(),
                config.redaction_threshold
            ));
        }
        if let Some(rules) = &config.rules {
            validate_rules(&rules.rules)
                .with_context(|| format!("Invalid rules in config file {}", path.display()))?;
        }
        Ok(config)
    }

    /// Default location: `<config dir>/inkredact/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("inkredact").join("config.yaml"))
    }

    /// Loads `explicit` if given, else the default location when it exists,
    /// else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from_file(path),
            _ => {
                debug!("No configuration file found; using defaults.");
                Ok(Self::default())
            }
        }
    }

    /// Built-in rules with this config's overrides applied.
    pub fn effective_rules(&self) -> Result<PiiRuleConfig> {
        let defaults = PiiRuleConfig::load_default_rules()?;
        Ok(merge_rules(defaults, self.rules.clone()))
    }
}
