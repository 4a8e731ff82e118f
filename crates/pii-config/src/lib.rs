//! Engine configuration
//!
//! Everything the classifiers and redactors consult lives in one immutable
//! [`Config`] value that is passed in explicitly. Nothing here is global.

use pii_core::PiiType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid combination rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration for pii-redact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Values treated as absent by the combination rules
    #[serde(default = "default_placeholders")]
    pub placeholders: Vec<String>,

    /// Drop the built-in identity and device rules
    #[serde(default)]
    pub disable_builtin_rules: bool,

    #[serde(default)]
    pub standalone: StandaloneConfig,

    #[serde(default)]
    pub payment: PaymentConfig,

    #[serde(default)]
    pub sentinels: SentinelConfig,

    /// Rules evaluated in addition to the built-in ones. A rule named like a
    /// built-in replaces it.
    #[serde(default)]
    pub rules: Vec<ComboRule>,
}

/// Which fields a standalone recognizer may fire on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandaloneScope {
    /// Every field, regardless of its name
    #[default]
    AnyField,
    /// Only fields whose name is listed for the recognizer
    Keyed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandaloneConfig {
    #[serde(default)]
    pub scope: StandaloneScope,

    #[serde(default = "default_phone_fields")]
    pub phone_fields: Vec<String>,

    #[serde(default = "default_national_id_fields")]
    pub national_id_fields: Vec<String>,

    #[serde(default = "default_passport_fields")]
    pub passport_fields: Vec<String>,

    #[serde(default = "default_payment_handle_fields")]
    pub payment_handle_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Provider tokens accepted after the `@`
    #[serde(default = "default_providers")]
    pub providers: Vec<String>,

    /// Any value ending in one of these is a payment handle
    #[serde(default = "default_suffixes")]
    pub suffixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentinelConfig {
    #[serde(default = "default_payment_sentinel")]
    pub payment_handle: String,

    #[serde(default = "default_address_sentinel")]
    pub address: String,

    #[serde(default = "default_device_sentinel")]
    pub device_context: String,

    #[serde(default = "default_other_sentinel")]
    pub other: String,

    /// Used when an email value has no `@`
    #[serde(default = "default_email_sentinel")]
    pub email: String,

    /// Used when name masking would reproduce the original
    #[serde(default = "default_name_sentinel")]
    pub name: String,
}

/// Declarative co-occurrence rule.
///
/// Fires when at least `min_flagged` of `flagged` are present and at least
/// `min_supporting` identifying companions are present. A companion is a
/// field named in `supporting`, or any field a standalone recognizer matched.
/// Empty values and placeholders never count. Only the `flagged` fields are
/// masked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboRule {
    pub name: String,

    pub flagged: Vec<ComboField>,

    #[serde(default)]
    pub supporting: Vec<String>,

    #[serde(default = "default_min_flagged")]
    pub min_flagged: usize,

    #[serde(default)]
    pub min_supporting: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboField {
    pub field: String,

    #[serde(default = "default_combo_type")]
    pub pii_type: PiiType,
}

impl ComboField {
    pub fn new(field: impl Into<String>, pii_type: PiiType) -> Self {
        Self {
            field: field.into(),
            pii_type,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            standalone: StandaloneConfig::default(),
            payment: PaymentConfig::default(),
            sentinels: SentinelConfig::default(),
            placeholders: default_placeholders(),
            disable_builtin_rules: false,
            rules: Vec::new(),
        }
    }
}

impl Default for StandaloneConfig {
    fn default() -> Self {
        Self {
            scope: StandaloneScope::default(),
            phone_fields: default_phone_fields(),
            national_id_fields: default_national_id_fields(),
            passport_fields: default_passport_fields(),
            payment_handle_fields: default_payment_handle_fields(),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            suffixes: default_suffixes(),
        }
    }
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            payment_handle: default_payment_sentinel(),
            address: default_address_sentinel(),
            device_context: default_device_sentinel(),
            other: default_other_sentinel(),
            email: default_email_sentinel(),
            name: default_name_sentinel(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_phone_fields() -> Vec<String> {
    strings(&["phone", "contact", "mobile"])
}

fn default_national_id_fields() -> Vec<String> {
    strings(&["aadhar", "aadhaar", "address_proof", "national_id"])
}

fn default_passport_fields() -> Vec<String> {
    strings(&["passport"])
}

fn default_payment_handle_fields() -> Vec<String> {
    strings(&["upi_id", "upi", "vpa"])
}

fn default_providers() -> Vec<String> {
    strings(&[
        "upi", "ybl", "ibl", "axl", "paytm", "apl", "okaxis", "okhdfcbank", "okicici", "oksbi",
    ])
}

fn default_suffixes() -> Vec<String> {
    strings(&["@upi", "@ybl", "@paytm"])
}

fn default_payment_sentinel() -> String {
    "[REDACTED_UPI]".to_string()
}

fn default_address_sentinel() -> String {
    "[REDACTED_ADDRESS]".to_string()
}

fn default_device_sentinel() -> String {
    "[REDACTED_DEVICE]".to_string()
}

fn default_other_sentinel() -> String {
    "[REDACTED]".to_string()
}

fn default_email_sentinel() -> String {
    "[REDACTED_EMAIL]".to_string()
}

fn default_name_sentinel() -> String {
    "[REDACTED_NAME]".to_string()
}

fn default_placeholders() -> Vec<String> {
    strings(&["n/a", "na", "none", "null", "nil", "unknown", "-"])
}

fn default_min_flagged() -> usize {
    1
}

fn default_combo_type() -> PiiType {
    PiiType::OtherCombinatorial
}

/// Identity (2 of name/email/address) and device context rules
pub fn builtin_rules() -> Vec<ComboRule> {
    vec![
        ComboRule {
            name: "identity".to_string(),
            flagged: vec![
                ComboField::new("name", PiiType::Name),
                ComboField::new("email", PiiType::Email),
                ComboField::new("address", PiiType::Address),
            ],
            supporting: Vec::new(),
            min_flagged: 2,
            min_supporting: 0,
        },
        ComboRule {
            name: "device_context".to_string(),
            flagged: vec![
                ComboField::new("ip_address", PiiType::DeviceContext),
                ComboField::new("device_id", PiiType::DeviceContext),
                ComboField::new("mac_address", PiiType::DeviceContext),
            ],
            supporting: strings(&["name", "email", "phone", "contact", "address"]),
            min_flagged: 1,
            min_supporting: 1,
        },
    ]
}

impl StandaloneConfig {
    /// Field names a standalone recognizer is scoped to
    pub fn fields_for(&self, pii_type: PiiType) -> &[String] {
        match pii_type {
            PiiType::Phone => &self.phone_fields,
            PiiType::NationalId => &self.national_id_fields,
            PiiType::Passport => &self.passport_fields,
            PiiType::PaymentHandle => &self.payment_handle_fields,
            _ => &[],
        }
    }

    /// Every field name some recognizer is keyed on
    pub fn recognizer_fields(&self) -> impl Iterator<Item = &str> {
        PiiType::standalone()
            .iter()
            .flat_map(|t| self.fields_for(*t))
            .map(String::as_str)
    }

    /// Whether a recognizer for `pii_type` may look at `field_name`
    pub fn in_scope(&self, pii_type: PiiType, field_name: &str) -> bool {
        match self.scope {
            StandaloneScope::AnyField => true,
            StandaloneScope::Keyed => self
                .fields_for(pii_type)
                .iter()
                .any(|f| f.eq_ignore_ascii_case(field_name)),
        }
    }
}

impl SentinelConfig {
    /// Whole-value replacement for types that are not format-preserved
    pub fn for_type(&self, pii_type: PiiType) -> Option<&str> {
        match pii_type {
            PiiType::PaymentHandle => Some(&self.payment_handle),
            PiiType::Address => Some(&self.address),
            PiiType::DeviceContext => Some(&self.device_context),
            PiiType::OtherCombinatorial => Some(&self.other),
            _ => None,
        }
    }
}

impl ComboRule {
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| -> Result<()> {
            Err(ConfigError::InvalidRule {
                rule: self.name.clone(),
                reason: reason.to_string(),
            })
        };

        if self.flagged.is_empty() {
            return invalid("no flagged fields");
        }
        if self.min_flagged == 0 {
            return invalid("min_flagged must be at least 1");
        }
        if self.min_flagged > self.flagged.len() {
            return invalid("min_flagged exceeds the number of flagged fields");
        }
        if self.min_supporting > self.supporting.len() {
            return invalid("min_supporting exceeds the number of supporting fields");
        }
        if let Some(field) = self.flagged.iter().find(|f| f.pii_type.is_standalone()) {
            return Err(ConfigError::InvalidRule {
                rule: self.name.clone(),
                reason: format!(
                    "field '{}' uses standalone type '{}'",
                    field.field, field.pii_type
                ),
            });
        }

        Ok(())
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load and validate a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write this config to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.rules.iter().try_for_each(ComboRule::validate)
    }

    /// Built-in rules (unless disabled) followed by configured ones
    pub fn effective_rules(&self) -> Vec<ComboRule> {
        let mut rules = if self.disable_builtin_rules {
            Vec::new()
        } else {
            builtin_rules()
        };

        for rule in &self.rules {
            match rules.iter_mut().find(|r| r.name == rule.name) {
                Some(existing) => *existing = rule.clone(),
                None => rules.push(rule.clone()),
            }
        }

        rules
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "pii-redact", "pii-redact") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.pii-redact/config.toml")
        }
    }
}
