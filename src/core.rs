//! Table and row level planning module.
//!
//! This module provides schema descriptors, entity providers, row matching
//! and the [`ReseedPlanner`](reinhardt_reseed_core::ReseedPlanner).
//!
//! # Examples
//!
//! ```rust,no_run
//! use reinhardt_reseed::core::planner::{ReseedPlan, ReseedPlanner};
//! use reinhardt_reseed::core::provider::FileEntityProvider;
//! ```

pub use reinhardt_reseed_core::*;
