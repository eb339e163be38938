//! Dependency ordering module.
//!
//! This module provides the generic node builder, orderer and cycle
//! resolver the planner is built on. They work on any item type that is
//! `Clone + Eq + Hash + Debug`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use reinhardt_reseed::graph::{MutualGroupOrderMode, NodeOrderer, OrderedGraph};
//! ```

pub use reinhardt_reseed_graph::*;
