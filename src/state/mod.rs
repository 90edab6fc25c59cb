//! State module for tracking a discovery run
//!
//! # Components
//!
//! - `DiscoveryState`: the orchestrator's lifecycle (idle, discovering,
//!   extracting, done, failed) with its legal transitions

mod discovery_state;

pub use discovery_state::DiscoveryState;
