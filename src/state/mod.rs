//! State module for tracking mirror progress
//!
//! This module provides the lifecycle of a single URL during a mirror run.
//!
//! # Components
//!
//! - `TargetState`: Tracks a URL from discovery through claiming, fetching, rewriting and saving

mod target_state;

// Re-export main types
pub use target_state::TargetState;
