//! Experiment harness for LLM annotation of financial argument quality.
//!
//! The annotation side builds rubric prompts (optionally with an injected
//! demographic framing), samples a chat endpoint several times per argument
//! and reduces the runs to consensus scores. The metrics side compares the
//! resulting tables against human labels and against each other.

pub mod aggregate;
pub mod cleaning;
pub mod client;
pub mod dimension;
pub mod driver;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod prompt;
pub mod report;
pub mod table;

pub use dimension::Dimension;
pub use error::{Error, Result};
