//! Field pattern library and redaction functions

pub mod patterns;
pub mod redactor;

pub use patterns::{PatternLibrary, PatternMatch};
pub use redactor::Redactor;
