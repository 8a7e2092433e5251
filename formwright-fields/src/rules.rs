//! Threshold validation rules derived from a field's limit configuration.
//!
//! Rules are stateless and recomputed from configuration at validation
//! time, never persisted. Character counts run on the serialized
//! entity-encoded form (after whitespace-run collapsing) so server counts
//! match what is persisted and what the client counter sees; word counts
//! split the raw value on single spaces so they reflect natural-language
//! tokens instead of encoded length.

use formwright_common::strings::encoded_char_count;
use serde::{Deserialize, Serialize};

/// Unit a threshold applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum LimitType {
    #[default]
    Characters,
    Words,
}

/// Limit configuration shared by text-like field types. The `limit` flag
/// gates whether any threshold check runs at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LimitSettings {
    pub limit: bool,
    pub min: Option<u32>,
    pub min_type: LimitType,
    pub max: Option<u32>,
    pub max_type: LimitType,
}

impl LimitSettings {
    /// Select the applicable rules for this configuration.
    ///
    /// Zero/unset thresholds produce no rule. A min greater than max in
    /// the same unit can never pass, so both bounds are neutralized to
    /// "no constraint" rather than failing schema evaluation.
    pub fn rules(&self) -> Vec<ValidationRule> {
        if !self.limit {
            return Vec::new();
        }

        let mut min = self.min.filter(|m| *m > 0);
        let mut max = self.max.filter(|m| *m > 0);

        if self.min_type == self.max_type {
            if let (Some(lo), Some(hi)) = (min, max) {
                if lo > hi {
                    min = None;
                    max = None;
                }
            }
        }

        let mut rules = Vec::new();
        if let Some(threshold) = min {
            rules.push(ValidationRule {
                kind: match self.min_type {
                    LimitType::Characters => RuleKind::MinChars,
                    LimitType::Words => RuleKind::MinWords,
                },
                threshold,
            });
        }
        if let Some(threshold) = max {
            rules.push(ValidationRule {
                kind: match self.max_type {
                    LimitType::Characters => RuleKind::MaxChars,
                    LimitType::Words => RuleKind::MaxWords,
                },
                threshold,
            });
        }
        rules
    }

    /// Effective character minimum, for client-side data attributes.
    pub fn min_chars(&self) -> Option<u32> {
        (self.limit && self.min_type == LimitType::Characters)
            .then_some(self.min)
            .flatten()
            .filter(|m| *m > 0)
    }

    /// Effective character maximum.
    pub fn max_chars(&self) -> Option<u32> {
        (self.limit && self.max_type == LimitType::Characters)
            .then_some(self.max)
            .flatten()
            .filter(|m| *m > 0)
    }

    /// Effective word minimum.
    pub fn min_words(&self) -> Option<u32> {
        (self.limit && self.min_type == LimitType::Words)
            .then_some(self.min)
            .flatten()
            .filter(|m| *m > 0)
    }

    /// Effective word maximum.
    pub fn max_words(&self) -> Option<u32> {
        (self.limit && self.max_type == LimitType::Words)
            .then_some(self.max)
            .flatten()
            .filter(|m| *m > 0)
    }
}

/// The kind of threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    MinChars,
    MaxChars,
    MinWords,
    MaxWords,
}

/// A single named check bound to a threshold. Pure function of
/// (value, threshold); returns the failure message, or None on pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRule {
    pub kind: RuleKind,
    pub threshold: u32,
}

/// Words are split on single spaces only. Tabs and newlines are not word
/// separators; the client counter splits the same way.
fn word_count(raw: &str) -> usize {
    raw.split(' ').count()
}

impl ValidationRule {
    /// Check a normalized text value. Runs on empty values too; a
    /// minimum bound fails on an empty submission.
    pub fn check(&self, raw: &str) -> Option<String> {
        let t = self.threshold;
        match self.kind {
            RuleKind::MinChars => {
                let count = encoded_char_count(raw);
                (count < t as usize)
                    .then(|| format!("You must enter at least {t} characters."))
            }
            RuleKind::MaxChars => {
                let count = encoded_char_count(raw);
                (count > t as usize).then(|| format!("Limited to {t} characters."))
            }
            RuleKind::MinWords => {
                // The comparison direction is `count > threshold`, not
                // `count < threshold`. The shipped client counter does the
                // same; changing one side alone breaks parity.
                let count = word_count(raw);
                (count > t as usize)
                    .then(|| format!("You must enter at least {t} words."))
            }
            RuleKind::MaxWords => {
                let count = word_count(raw);
                (count > t as usize).then(|| format!("Limited to {t} words."))
            }
        }
    }
}
