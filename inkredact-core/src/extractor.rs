//! extractor.rs - Compiles PII rules and extracts the PII Finding Set from text.
//!
//! Rules are compiled once into a [`PiiExtractor`], which is immutable and can
//! be shared across threads (for example one `Arc<PiiExtractor>` for a batch).
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use regex::{Regex, RegexBuilder};

use crate::config::{PiiRule, PiiRuleConfig, MAX_PATTERN_LENGTH};
use crate::errors::InkRedactError;
use crate::findings::{PiiCategory, PiiFindingSet};
use crate::sensitive_log::loggable;

/// A single compiled PII rule.
#[derive(Debug)]
pub struct CompiledRule {
    pub name: String,
    pub category: PiiCategory,
    pub regex: Regex,
    pub capture_group: usize,
}

/// All compiled rules, applied in configuration order.
#[derive(Debug)]
pub struct PiiExtractor {
    rules: Vec<CompiledRule>,
}

/// Compiles every enabled rule. All failures are collected into one error.
pub fn compile_rules(rules: &[PiiRule]) -> Result<Vec<CompiledRule>, InkRedactError> {
    debug!("Starting compilation of {} rules.", rules.len());

    let mut compiled = Vec::new();
    let mut errors = Vec::new();

    for rule in rules.iter().filter(|r| r.is_enabled()) {
        if rule.pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(InkRedactError::PatternLengthExceeded(
                rule.name.clone(),
                rule.pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
            continue;
        }

        let regex_result = RegexBuilder::new(&rule.pattern)
            .case_insensitive(rule.case_insensitive)
            .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
            .build();

        match regex_result {
            Ok(regex) => {
                if rule.capture_group >= regex.captures_len() {
                    warn!(
                        "Rule '{}' references capture group {} but the pattern has {}; using the whole match.",
                        rule.name,
                        rule.capture_group,
                        regex.captures_len() - 1
                    );
                }
                log::debug!(
                    target: "inkredact_core::extractor",
                    "Rule '{}' compiled successfully.",
                    &rule.name
                );
                compiled.push(CompiledRule {
                    name: rule.name.clone(),
                    category: rule.category,
                    regex,
                    capture_group: rule.capture_group,
                });
            }
            Err(e) => errors.push(InkRedactError::RuleCompilationError(rule.name.clone(), e)),
        }
    }

    if !errors.is_empty() {
        let error_message = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        return Err(InkRedactError::Fatal(format!(
            "Failed to compile {} rule(s):\n{}",
            errors.len(),
            error_message
        )));
    }

    debug!("Finished compiling rules. Total compiled: {}.", compiled.len());
    Ok(compiled)
}

impl PiiExtractor {
    pub fn new(config: &PiiRuleConfig) -> Result<Self, InkRedactError> {
        Ok(Self {
            rules: compile_rules(&config.rules)?,
        })
    }

    /// Extractor over the built-in rules.
    pub fn with_default_rules() -> Result<Self, InkRedactError> {
        let config = PiiRuleConfig::load_default_rules()?;
        Self::new(&config)
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Finds every match of every rule in `text`.
    ///
    /// Values are the rule's capture group (whole match when that group did
    /// not participate), de-duplicated per category and ordered by where they
    /// first occur in `text`, regardless of which rule found them. Ties on
    /// position keep rule order.
    pub fn extract(&self, text: &str) -> PiiFindingSet {
        let mut hits: Vec<(usize, usize, &CompiledRule, &str)> = Vec::new();
        for (rule_index, rule) in self.rules.iter().enumerate() {
            for caps in rule.regex.captures_iter(text) {
                if let Some(m) = caps.get(rule.capture_group).or_else(|| caps.get(0)) {
                    hits.push((m.start(), rule_index, rule, m.as_str()));
                }
            }
        }
        hits.sort_by_key(|&(start, rule_index, _, _)| (start, rule_index));

        let mut findings = PiiFindingSet::new();
        for (_, _, rule, value) in hits {
            if findings.insert(rule.category, value) {
                debug!(
                    "Rule '{}' captured {} value: {}",
                    rule.name,
                    rule.category,
                    loggable(value)
                );
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> PiiExtractor {
        PiiExtractor::with_default_rules().unwrap()
    }

    #[test]
    fn test_extract_email() {
        let found = extractor().extract("Jane Doe, jane@x.com");
        assert_eq!(found.get(PiiCategory::Email), ["jane@x.com"]);
    }

    #[test]
    fn test_extract_dates_and_phone() {
        let found = extractor().extract("Seen 12/04/2021, call +1 555 123 4567 tomorrow");
        assert_eq!(found.get(PiiCategory::Date), ["12/04/2021"]);
        assert_eq!(found.get(PiiCategory::Phone), ["+1 555 123 4567"]);
    }

    #[test]
    fn test_extract_id_uses_capture_group_case_insensitively() {
        let found = extractor().extract("patient id: AB-1234\nMRN 99812");
        assert_eq!(found.get(PiiCategory::Id), ["AB-1234", "99812"]);
    }

    #[test]
    fn test_extract_dedupes_within_category() {
        let found = extractor().extract("a@b.io wrote to a@b.io");
        assert_eq!(found.get(PiiCategory::Email), ["a@b.io"]);
    }

    #[test]
    fn test_extract_nothing() {
        assert!(extractor().extract("just a grocery list").is_empty());
    }

    #[test]
    fn test_disabled_rule_is_skipped() {
        let mut config = PiiRuleConfig::load_default_rules().unwrap();
        for rule in config.rules.iter_mut() {
            if rule.category == PiiCategory::Email {
                rule.enabled = Some(false);
            }
        }
        let found = PiiExtractor::new(&config).unwrap().extract("a@b.io");
        assert!(found.get(PiiCategory::Email).is_empty());
    }

    #[test]
    fn test_invalid_rule_fails_compilation() {
        let config = PiiRuleConfig {
            rules: vec![PiiRule {
                name: "broken".into(),
                category: PiiCategory::Id,
                pattern: "(".into(),
                capture_group: 0,
                case_insensitive: false,
                enabled: None,
                description: None,
            }],
        };
        assert!(matches!(PiiExtractor::new(&config), Err(InkRedactError::Fatal(_))));
    }

    #[test]
    fn test_values_follow_text_order_across_rules() {
        let rule = |name: &str, pattern: &str| PiiRule {
            name: name.to_string(),
            category: PiiCategory::Id,
            pattern: pattern.to_string(),
            capture_group: 0,
            case_insensitive: false,
            enabled: None,
            description: None,
        };
        let config = PiiRuleConfig {
            rules: vec![rule("a_badge", r"BADGE-\d+"), rule("b_mrn", r"MRN\d+")],
        };
        let found = PiiExtractor::new(&config).unwrap().extract("MRN77 then BADGE-12, again MRN77");
        assert_eq!(found.get(PiiCategory::Id), ["MRN77", "BADGE-12"]);
    }
}
