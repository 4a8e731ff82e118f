//! Standalone PII recognizers
//!
//! Each recognizer takes one normalized field value and either rejects it or
//! returns the canonical form that the redactor masks. Recognizers run in
//! priority order and the first hit wins.

use lazy_static::lazy_static;
use pii_config::PaymentConfig;
use pii_core::PiiType;
use regex::Regex;

lazy_static! {
    static ref PHONE_SEPARATORS: Regex = Regex::new(r"[\s\-()]").unwrap();
    static ref ID_SEPARATORS: Regex = Regex::new(r"[\s\-]").unwrap();
    static ref PHONE: Regex = Regex::new(r"^[1-9][0-9]{9}$").unwrap();
    static ref NATIONAL_ID: Regex = Regex::new(r"^[0-9]{12}$").unwrap();
    static ref PASSPORT: Regex = Regex::new(r"^[A-Z][0-9]{7}$").unwrap();
    static ref HANDLE: Regex = Regex::new(r"^([^@\s]+)@([^@\s]+)$").unwrap();
}

type Recognizer = fn(&PatternLibrary, &str) -> Option<String>;

/// Recognizers in match priority order
const RECOGNIZERS: [(PiiType, Recognizer); 4] = [
    (PiiType::Phone, PatternLibrary::match_phone),
    (PiiType::NationalId, PatternLibrary::match_national_id),
    (PiiType::Passport, PatternLibrary::match_passport),
    (PiiType::PaymentHandle, PatternLibrary::match_payment_handle),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub pii_type: PiiType,
    /// Separator-free form for numeric identifiers, the value itself otherwise
    pub canonical: String,
}

pub struct PatternLibrary {
    providers: Vec<String>,
    suffixes: Vec<String>,
}

impl PatternLibrary {
    pub fn new(payment: &PaymentConfig) -> Self {
        Self {
            providers: payment.providers.iter().map(|p| p.to_lowercase()).collect(),
            suffixes: payment.suffixes.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// First recognizer (by priority) that accepts `value`
    pub fn recognize(&self, value: &str) -> Option<PatternMatch> {
        self.recognize_where(value, |_| true)
    }

    /// Like [`recognize`](Self::recognize), restricted to the types `allowed` accepts
    pub fn recognize_where(
        &self,
        value: &str,
        allowed: impl Fn(PiiType) -> bool,
    ) -> Option<PatternMatch> {
        RECOGNIZERS
            .iter()
            .filter(|(pii_type, _)| allowed(*pii_type))
            .find_map(|(pii_type, recognizer)| {
                recognizer(self, value).map(|canonical| PatternMatch {
                    pii_type: *pii_type,
                    canonical,
                })
            })
    }

    fn match_phone(&self, value: &str) -> Option<String> {
        let digits = PHONE_SEPARATORS.replace_all(value, "");
        PHONE.is_match(&digits).then(|| digits.into_owned())
    }

    fn match_national_id(&self, value: &str) -> Option<String> {
        let digits = ID_SEPARATORS.replace_all(value, "");
        NATIONAL_ID.is_match(&digits).then(|| digits.into_owned())
    }

    fn match_passport(&self, value: &str) -> Option<String> {
        PASSPORT.is_match(value).then(|| value.to_string())
    }

    fn match_payment_handle(&self, value: &str) -> Option<String> {
        let lower = value.to_lowercase();

        let known_provider = HANDLE
            .captures(&lower)
            .and_then(|caps| caps.get(2))
            .is_some_and(|provider| self.providers.iter().any(|p| p == provider.as_str()));

        let known_suffix = self
            .suffixes
            .iter()
            .any(|suffix| lower.len() > suffix.len() && lower.ends_with(suffix.as_str()));

        (known_provider || known_suffix).then(|| value.to_string())
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new(&PaymentConfig::default())
    }
}
