//! Severity Module
//!
//! Gộp findings của các analyzer thành một Verdict duy nhất cho mỗi location.
//!
//! ## Structure
//! - `types`: Severity, Verdict
//! - `rules`: count thresholds and recommendation text
//! - `aggregator`: aggregation logic

pub mod types;
pub mod rules;
pub mod aggregator;

pub use types::{Severity, Verdict};
pub use rules::recommendation;
pub use aggregator::{aggregate, classify_severity};
