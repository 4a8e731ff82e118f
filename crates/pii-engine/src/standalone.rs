use pii_config::StandaloneConfig;
use pii_core::{FieldDetection, FieldText};
use pii_security::{PatternLibrary, PatternMatch};

/// A field that matched a standalone recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandaloneHit {
    pub field_name: String,
    pub matched: PatternMatch,
}

impl StandaloneHit {
    pub fn detection(&self) -> FieldDetection {
        FieldDetection::standalone(&self.field_name, self.matched.pii_type)
    }
}

/// Checks each field on its own against the pattern library
pub struct StandaloneClassifier {
    library: PatternLibrary,
    config: StandaloneConfig,
}

impl StandaloneClassifier {
    pub fn new(library: PatternLibrary, config: StandaloneConfig) -> Self {
        Self { library, config }
    }

    pub fn classify(&self, fields: &[(&str, FieldText)]) -> Vec<StandaloneHit> {
        fields
            .iter()
            .filter_map(|(name, text)| {
                let value = text.as_text()?;
                let matched = self
                    .library
                    .recognize_where(value, |pii_type| self.config.in_scope(pii_type, name))?;

                Some(StandaloneHit {
                    field_name: name.to_string(),
                    matched,
                })
            })
            .collect()
    }
}
