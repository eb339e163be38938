//! # Reinhardt Reseed
//!
//! Dependency-ordered reseeding of test databases.
//!
//! Before each test run, a reseed deletes the rows a previous run left
//! behind and inserts a known set of rows again. Foreign keys decide the
//! order both steps must follow; cycles between tables decide where
//! constraints have to be disabled. This crate computes both sequences from
//! a schema description and the rows to seed.
//!
//! ## Crates
//!
//! - [`graph`] - generic dependency ordering with cycle detection
//! - [`core`] - schema, entities, row matching and planning
//!
//! ## Feature Flags
//!
//! - `json` (default) - JSON entity files
//! - `yaml` - YAML entity files
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```rust
//! use reinhardt_reseed::prelude::*;
//!
//! let schema = DatabaseSchema::new(vec![
//! 	TableSchema::new(TableId::new("dbo", "Order"))
//! 		.with_columns(["Id", "CustomerId"])
//! 		.with_primary_key(Key::new(["Id"]))
//! 		.with_foreign_key(ForeignKey::new(
//! 			"FK_Order_Customer",
//! 			["CustomerId"],
//! 			TableId::new("dbo", "Customer"),
//! 			["Id"],
//! 		)),
//! 	TableSchema::new(TableId::new("dbo", "Customer"))
//! 		.with_columns(["Id"])
//! 		.with_primary_key(Key::new(["Id"])),
//! ])
//! .unwrap();
//!
//! let provider = InlineProvider::new()
//! 	.with_entity(Entity::new("Order").with_property("Id", 10).with_property("CustomerId", 1))
//! 	.with_entity(Entity::new("Customer").with_property("Id", 1));
//!
//! let plan = ReseedPlanner::default().plan_provider(&schema, &provider).unwrap();
//!
//! let insert: Vec<String> = plan
//! 	.insert()
//! 	.iter()
//! 	.flat_map(|container| container.rows())
//! 	.map(|row| row.to_string())
//! 	.collect();
//! assert_eq!(insert, ["dbo.Customer(1)", "dbo.Order(10)"]);
//! ```

#![warn(missing_docs)]

pub mod core;
pub mod graph;

// Re-export the planning entry points
pub use reinhardt_reseed_core::{
	DatabaseSchema, Entity, EntityProvider, FileEntityProvider, InlineProvider, PlanSummary,
	ReseedError, ReseedOptions, ReseedPlan, ReseedPlanner, ReseedResult, TableContainer,
};

/// Convenience re-exports.
pub mod prelude {
	// Planning types
	pub use reinhardt_reseed_core::prelude::*;

	// Ordering engine
	pub use reinhardt_reseed_graph::prelude::*;
}
