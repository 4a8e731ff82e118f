//! Co-occurrence rules
//!
//! Some fields only identify a person in combination: an address on its own
//! is often shared or generic, but next to a name or an email it is not. The
//! rules here look at which field names carry a real value in the record.
//! Companions for a rule's `min_supporting` also include any field a
//! standalone recognizer already matched.

use std::collections::BTreeMap;

use pii_config::{ComboRule, Config};
use pii_core::{FieldDetection, FieldText};
use tracing::debug;

/// Evaluates every configured [`ComboRule`] against one record
pub struct CombinatorialClassifier {
    rules: Vec<ComboRule>,
    placeholders: Vec<String>,
    /// Names only a recognizer hit may vouch for
    recognizer_fields: Vec<String>,
}

/// A field with a usable value, as seen by one record's rule evaluation
struct Present<'a> {
    name: &'a str,
    identified: bool,
}

impl CombinatorialClassifier {
    /// Built-in and configured rules, placeholders and recognizer field names
    /// taken from `config`
    pub fn new(config: &Config) -> Self {
        Self::with_rules(config.effective_rules(), config)
    }

    pub fn with_rules(rules: Vec<ComboRule>, config: &Config) -> Self {
        Self {
            rules,
            placeholders: config.placeholders.iter().map(|p| p.to_lowercase()).collect(),
            recognizer_fields: config
                .standalone
                .recognizer_fields()
                .map(str::to_lowercase)
                .collect(),
        }
    }

    pub fn rules(&self) -> &[ComboRule] {
        &self.rules
    }

    /// Fields flagged by any rule, one detection per field.
    ///
    /// `identified` names the fields a standalone recognizer matched. When
    /// rules overlap on a field, the more specific type wins; on a tie the
    /// earlier rule keeps it.
    pub fn classify(
        &self,
        fields: &[(&str, FieldText)],
        identified: &[&str],
    ) -> Vec<FieldDetection> {
        let present: Vec<Present> = fields
            .iter()
            .filter_map(|(name, text)| {
                let value = text.as_text()?;
                (!self.is_placeholder(value)).then_some(Present {
                    name: *name,
                    identified: identified.contains(name),
                })
            })
            .collect();

        let mut flagged: BTreeMap<String, FieldDetection> = BTreeMap::new();

        for rule in &self.rules {
            let Some(hits) = self.evaluate(rule, &present) else {
                continue;
            };

            debug!(
                rule = %rule.name,
                fields = ?hits.iter().map(|d| d.field_name.as_str()).collect::<Vec<_>>(),
                "combination rule fired"
            );

            for detection in hits {
                let keep_existing = flagged.get(&detection.field_name).is_some_and(|existing| {
                    existing.pii_type.specificity() >= detection.pii_type.specificity()
                });

                if !keep_existing {
                    flagged.insert(detection.field_name.clone(), detection);
                }
            }
        }

        flagged.into_values().collect()
    }

    fn is_placeholder(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        self.placeholders.iter().any(|p| *p == value)
    }

    fn is_recognizer_field(&self, name: &str) -> bool {
        self.recognizer_fields.iter().any(|f| matches_name(f, name))
    }

    /// A field backs a rule if a recognizer matched it, or if it is named in
    /// `supporting` and no recognizer is keyed on that name
    fn supports(&self, rule: &ComboRule, field: &Present) -> bool {
        if rule.flagged.iter().any(|f| matches_name(&f.field, field.name)) {
            return false;
        }
        if field.identified {
            return true;
        }
        rule.supporting.iter().any(|s| matches_name(s, field.name))
            && !self.is_recognizer_field(field.name)
    }

    /// Detections for `rule` if its trigger is satisfied by the `present` fields
    fn evaluate(&self, rule: &ComboRule, present: &[Present]) -> Option<Vec<FieldDetection>> {
        let mut detections = Vec::new();
        let mut flagged_count = 0;

        for combo_field in &rule.flagged {
            let matched: Vec<&str> = present
                .iter()
                .map(|p| p.name)
                .filter(|name| matches_name(&combo_field.field, name))
                .collect();

            if !matched.is_empty() {
                flagged_count += 1;
            }
            detections.extend(
                matched
                    .into_iter()
                    .map(|name| FieldDetection::combinatorial(name, combo_field.pii_type)),
            );
        }

        let supporting_count = present.iter().filter(|p| self.supports(rule, p)).count();

        (flagged_count >= rule.min_flagged && supporting_count >= rule.min_supporting)
            .then_some(detections)
    }
}

fn matches_name(field: &str, candidate: &str) -> bool {
    field.eq_ignore_ascii_case(candidate)
}
