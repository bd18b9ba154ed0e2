//! Alerts Module
//!
//! HIGH/CRITICAL verdicts → Alert records với create / list / read / acknowledge.

pub mod types;
pub mod manager;

pub use types::{Alert, AlertDraft, AlertSource};
pub use manager::{AlertManager, DEFAULT_RECENT_LIMIT};
