//! Output module for harvest results
//!
//! This module handles:
//! - The result types returned by a run (`ExtractedTitle`, `HarvestReport`)
//! - Rendering a report as a plain-text listing or as JSON

mod summary;
mod types;

pub use summary::{format_report, print_report, to_json};
pub use types::{ExtractedTitle, HarvestReport};
