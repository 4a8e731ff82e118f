//! Type-aware masking
//!
//! One transform per [`PiiType`]. Numeric identifiers and passports keep their
//! length, names keep their token shape, emails keep their domain, and the
//! rest is replaced wholesale by a configured sentinel.

use pii_config::SentinelConfig;
use pii_core::PiiType;

const MASK: char = 'X';

enum MaskRule<'a> {
    Format(fn(&str) -> Option<String>),
    Sentinel(&'a str),
}

/// Applies the masking rule for a detected type
pub struct Redactor {
    sentinels: SentinelConfig,
}

impl Redactor {
    pub fn new(sentinels: SentinelConfig) -> Self {
        Self { sentinels }
    }

    fn rule_for(&self, pii_type: PiiType) -> MaskRule<'_> {
        match pii_type {
            PiiType::Phone => MaskRule::Format(|v| Some(mask_phone(v))),
            PiiType::NationalId => MaskRule::Format(|v| Some(mask_national_id(v))),
            PiiType::Passport => MaskRule::Format(|v| Some(mask_passport(v))),
            PiiType::Name => MaskRule::Format(|v| Some(mask_name(v))),
            PiiType::Email => MaskRule::Format(mask_email),
            PiiType::PaymentHandle
            | PiiType::Address
            | PiiType::DeviceContext
            | PiiType::OtherCombinatorial => MaskRule::Sentinel(
                self.sentinels
                    .for_type(pii_type)
                    .unwrap_or(self.sentinels.other.as_str()),
            ),
        }
    }

    /// Mask `value` as `pii_type`.
    ///
    /// The result never equals a non-empty `value`.
    pub fn redact(&self, pii_type: PiiType, value: &str) -> String {
        let masked = match self.rule_for(pii_type) {
            MaskRule::Format(mask) => {
                mask(value).unwrap_or_else(|| self.fallback(pii_type).to_string())
            }
            MaskRule::Sentinel(sentinel) => sentinel.to_string(),
        };

        if !value.is_empty() && masked == value {
            return self.fallback(pii_type).to_string();
        }

        masked
    }

    fn fallback(&self, pii_type: PiiType) -> &str {
        match pii_type {
            PiiType::Name => &self.sentinels.name,
            PiiType::Email => &self.sentinels.email,
            _ => &self.sentinels.other,
        }
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(SentinelConfig::default())
    }
}

fn masked(count: usize) -> String {
    std::iter::repeat_n(MASK, count).collect()
}

/// Keep `head` leading and `tail` trailing chars, mask the rest.
/// Values too short to keep anything are masked entirely.
fn keep_ends(value: &str, head: usize, tail: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= head + tail {
        return masked(chars.len());
    }

    let mut out: String = chars[..head].iter().collect();
    out.push_str(&masked(chars.len() - head - tail));
    out.extend(&chars[chars.len() - tail..]);
    out
}

/// `9876543210` → `98XXXXXX10`
pub fn mask_phone(digits: &str) -> String {
    keep_ends(digits, 2, 2)
}

/// `123456789012` → `XXXXXXXX9012`
pub fn mask_national_id(digits: &str) -> String {
    keep_ends(digits, 0, 4)
}

/// `A1234567` → `AXXXXXX7`
pub fn mask_passport(value: &str) -> String {
    keep_ends(value, 1, 1)
}

/// `John Doe` → `JXXX DXX`
pub fn mask_name(value: &str) -> String {
    value
        .split_whitespace()
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => {
                    let mut out: String = first.to_uppercase().collect();
                    out.push_str(&masked(chars.count()));
                    out
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `john.doe@example.com` → `jXXXe@example.com`, `ab@c.com` → `XX@c.com`.
/// `None` when there is no `@`.
pub fn mask_email(value: &str) -> Option<String> {
    let (local, domain) = value.split_once('@')?;
    let chars: Vec<char> = local.chars().collect();

    let local = match chars.as_slice() {
        [first, .., last] if chars.len() > 2 => format!("{first}XXX{last}"),
        _ => masked(chars.len()),
    };

    Some(format!("{local}@{domain}"))
}
