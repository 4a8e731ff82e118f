//! Classification and redaction engine
//!
//! A [`RecordProcessor`] turns one record into one redacted record. It holds
//! nothing but immutable configuration, so a single instance can be shared
//! across threads; [`batch`] does exactly that with rayon.

pub mod batch;
pub mod combinatorial;
pub mod processor;
pub mod standalone;

pub use batch::{BatchSummary, RecordOutcome, process_batch};
pub use combinatorial::CombinatorialClassifier;
pub use processor::RecordProcessor;
pub use standalone::{StandaloneClassifier, StandaloneHit};
