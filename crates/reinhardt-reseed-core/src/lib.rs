//! Table and row level reseed planning for Reinhardt test databases.
//!
//! Reseeding a test database means deleting what the previous run left
//! behind and inserting a known set of rows again, both in an order the
//! foreign keys accept. This crate computes that order:
//!
//! - **Schema**: tables, keys and foreign keys described in code
//!   ([`DatabaseSchema`])
//! - **Entities**: the rows to seed, defined in code or read from JSON/YAML
//!   entity files ([`EntityProvider`])
//! - **Planning**: insertion and cleanup sequences of [`TableContainer`]s
//!   ([`ReseedPlanner`])
//!
//! Tables are ordered with `reinhardt-reseed-graph`. A cycle between tables
//! is refined on the actual rows: only rows whose key values close a cycle
//! end up in a [`MutualRowGroup`](container::MutualRowGroup), the one
//! container that needs constraints disabled.
//!
//! # Features
//!
//! - `json` - JSON entity files (enabled by default)
//! - `yaml` - YAML entity files
//! - `full` - All features enabled
//!
//! # Quick Start
//!
//! ```
//! use reinhardt_reseed_core::prelude::*;
//!
//! let schema = DatabaseSchema::new(vec![
//! 	TableSchema::new(TableId::new("dbo", "Post"))
//! 		.with_columns(["Id", "AuthorId"])
//! 		.with_primary_key(Key::new(["Id"]))
//! 		.with_foreign_key(ForeignKey::new(
//! 			"FK_Post_Author",
//! 			["AuthorId"],
//! 			TableId::new("dbo", "User"),
//! 			["Id"],
//! 		)),
//! 	TableSchema::new(TableId::new("dbo", "User"))
//! 		.with_columns(["Id"])
//! 		.with_primary_key(Key::new(["Id"])),
//! ])
//! .unwrap();
//!
//! let provider = InlineProvider::new()
//! 	.with_entity(Entity::new("Post").with_property("Id", 1).with_property("AuthorId", 7))
//! 	.with_entity(Entity::new("User").with_property("Id", 7));
//!
//! let plan = ReseedPlanner::new(ReseedOptions::default())
//! 	.plan_provider(&schema, &provider)
//! 	.unwrap();
//!
//! let tables: Vec<String> = plan
//! 	.insert()
//! 	.iter()
//! 	.flat_map(|container| container.tables())
//! 	.map(|table| table.id().to_string())
//! 	.collect();
//! assert_eq!(tables, ["dbo.User", "dbo.Post"]);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod container;
pub mod error;
pub mod matcher;
pub mod options;
pub mod planner;
pub mod prelude;
pub mod provider;
pub mod refine;
pub mod row;
pub mod schema;
pub mod value;

// Re-export commonly used types at crate root
pub use container::TableContainer;
pub use error::{ReseedError, ReseedResult};
pub use options::{CleanupScope, NameMatching, ReseedOptions};
pub use planner::{PlanSummary, ReseedPlan, ReseedPlanner};
pub use provider::{Entity, EntityProvider, FileEntityProvider, InlineProvider};
pub use schema::DatabaseSchema;
