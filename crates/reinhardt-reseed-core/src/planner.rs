//! Insertion and cleanup planning.
//!
//! The planner orders the schema's tables by their foreign keys, then turns
//! every table and every table cycle into [`TableContainer`]s: plain tables
//! carry their rows as they are, table cycles are refined row by row.
//!
//! # Example
//!
//! ```
//! use reinhardt_reseed_core::prelude::*;
//!
//! let schema = DatabaseSchema::new(vec![
//! 	TableSchema::new(TableId::new("dbo", "User"))
//! 		.with_columns(["Id", "ManagerId"])
//! 		.with_primary_key(Key::new(["Id"]))
//! 		.with_foreign_key(ForeignKey::new(
//! 			"FK_User_Manager",
//! 			["ManagerId"],
//! 			TableId::new("dbo", "User"),
//! 			["Id"],
//! 		)),
//! ])
//! .unwrap();
//! let entities = InlineProvider::new()
//! 	.with_entity(Entity::new("User").with_property("Id", 2).with_property("ManagerId", 1))
//! 	.with_entity(Entity::new("User").with_property("Id", 1).with_property("ManagerId", None::<i64>))
//! 	.entities()
//! 	.unwrap();
//!
//! let plan = ReseedPlanner::new(ReseedOptions::default())
//! 	.plan_entities(&schema, &entities)
//! 	.unwrap();
//!
//! let rows: Vec<String> = plan.insert()[0].rows().iter().map(|row| row.to_string()).collect();
//! assert_eq!(rows, ["dbo.User(1)", "dbo.User(2)"]);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use reinhardt_reseed_graph::{
	GraphNode, MutualReferenceResolver, Node, NodeBuilder, NodeOrderer, OrderedGraph, OrderedItem,
	Reference,
};
use tracing::{debug, info};

use crate::container::{TableContainer, TableData};
use crate::error::{ReseedError, ReseedResult};
use crate::matcher::RowMatcher;
use crate::options::{CleanupScope, ReseedOptions};
use crate::provider::{Entity, EntityProvider};
use crate::refine::{Direction, TableMutualReferenceResolver};
use crate::row::RowSet;
use crate::schema::{DatabaseSchema, TableNode};

/// Plans insertion and cleanup sequences for a schema.
#[derive(Debug, Clone, Default)]
pub struct ReseedPlanner {
	options: ReseedOptions,
}

impl ReseedPlanner {
	/// Creates a planner with the given options.
	pub fn new(options: ReseedOptions) -> Self {
		Self { options }
	}

	/// Returns the planner options.
	pub fn options(&self) -> &ReseedOptions {
		&self.options
	}

	/// Orders every table of `schema` by its foreign keys.
	pub fn order_tables(&self, schema: &DatabaseSchema) -> ReseedResult<OrderedGraph<TableNode>> {
		let nodes: Vec<TableNode> = NodeBuilder::new().collect_nodes(
			schema.tables(),
			&schema.table_relations(),
			|relation, target: &TableNode| {
				Reference::new(Arc::clone(&relation.association), Arc::clone(target.item()))
			},
			|table, references| GraphNode::new(Arc::clone(table), references),
		)?;
		let graph = NodeOrderer::new().order(nodes)?;
		for group in graph.mutual_groups() {
			debug!(
				tables = ?group.items().iter().map(|table| table.id().to_string()).collect::<Vec<_>>(),
				foreign_keys = group.relations().len(),
				"found table cycle"
			);
		}
		Ok(graph)
	}

	/// Plans the insertion and cleanup of `rows`.
	///
	/// # Errors
	///
	/// Returns [`ReseedError::RowCycleNotAllowed`] if rows reference each
	/// other in a cycle while
	/// [`allow_row_cycles`](ReseedOptions::allow_row_cycles) is off.
	pub fn plan(&self, schema: &DatabaseSchema, rows: &RowSet) -> ReseedResult<ReseedPlan> {
		let table_graph = self.order_tables(schema)?;
		let seeded = || -> ReseedResult<OrderedGraph<TableNode>> {
			let kept = table_graph
				.clone()
				.filter_deep(|node| rows.has_rows(node.item().id()));
			Ok(NodeOrderer::new().order(kept.into_nodes())?)
		};

		let insert_graph = if self.options.skip_empty_tables {
			seeded()?
		} else {
			table_graph.clone()
		};
		let cleanup_graph = match self.options.cleanup_scope {
			CleanupScope::AllTables => table_graph.clone(),
			CleanupScope::SeededTables if self.options.skip_empty_tables => insert_graph.clone(),
			CleanupScope::SeededTables => seeded()?,
		};

		let insert = self.sequence(&insert_graph, rows, Direction::Insert)?;
		if !self.options.allow_row_cycles {
			check_row_cycles(&insert)?;
		}
		let cleanup = self.sequence(&cleanup_graph.reverse(), rows, Direction::Cleanup)?;

		let plan = ReseedPlan {
			table_graph,
			insert,
			cleanup,
		};
		let summary = plan.summary();
		info!(
			tables = summary.tables,
			rows = summary.rows,
			table_groups = summary.table_groups,
			row_groups = summary.row_groups,
			disabled_foreign_keys = summary.disabled_foreign_keys,
			cleanup_steps = plan.cleanup.len(),
			"planned reseed"
		);
		Ok(plan)
	}

	/// Matches `entities` against `schema`, then plans them.
	pub fn plan_entities(
		&self,
		schema: &DatabaseSchema,
		entities: &[Entity],
	) -> ReseedResult<ReseedPlan> {
		let rows = RowMatcher::new(schema, self.options.entity_name_matching)
			.match_entities(entities)?;
		self.plan(schema, &rows)
	}

	/// Plans every entity supplied by `provider`.
	pub fn plan_provider(
		&self,
		schema: &DatabaseSchema,
		provider: &dyn EntityProvider,
	) -> ReseedResult<ReseedPlan> {
		self.plan_entities(schema, &provider.entities()?)
	}

	fn sequence(
		&self,
		graph: &OrderedGraph<TableNode>,
		rows: &RowSet,
		direction: Direction,
	) -> ReseedResult<Vec<TableContainer>> {
		let refiner = TableMutualReferenceResolver::new(rows);
		let mut failure = None;
		let merged = MutualReferenceResolver::new().merge_chunks(
			graph,
			|run| {
				run.into_iter()
					.map(|ordered| {
						let table = ordered.value.item();
						let mut table_rows = rows.rows_of(table.id()).to_vec();
						if direction == Direction::Cleanup {
							table_rows.reverse();
						}
						let data = TableData {
							table: Arc::clone(table),
							rows: table_rows,
						};
						OrderedItem::new(vec![TableContainer::Table(data)], ordered.order)
					})
					.collect()
			},
			|group, _| {
				let containers = refiner.resolve(group, direction).unwrap_or_else(|error| {
					failure.get_or_insert(error);
					Vec::new()
				});
				OrderedItem::new(containers, group.order(direction.order_mode()))
			},
			direction.order_mode(),
		);
		if let Some(error) = failure {
			return Err(error);
		}
		Ok(merged
			.into_iter()
			.flat_map(|ordered| ordered.value)
			.collect())
	}
}

fn check_row_cycles(containers: &[TableContainer]) -> ReseedResult<()> {
	match containers.iter().find(|container| container.requires_disabled_constraints()) {
		Some(container) => Err(ReseedError::RowCycleNotAllowed {
			rows: container.rows().iter().map(|row| row.to_string()).collect(),
		}),
		None => Ok(()),
	}
}

/// The outcome of planning: table order plus both container sequences.
#[derive(Debug, Clone)]
pub struct ReseedPlan {
	table_graph: OrderedGraph<TableNode>,
	insert: Vec<TableContainer>,
	cleanup: Vec<TableContainer>,
}

impl ReseedPlan {
	/// Returns every table of the schema in dependency order.
	pub fn table_graph(&self) -> &OrderedGraph<TableNode> {
		&self.table_graph
	}

	/// Returns the insertion sequence, dependencies first.
	pub fn insert(&self) -> &[TableContainer] {
		&self.insert
	}

	/// Returns the cleanup sequence, dependents first.
	pub fn cleanup(&self) -> &[TableContainer] {
		&self.cleanup
	}

	/// Counts what the insertion sequence holds.
	pub fn summary(&self) -> PlanSummary {
		let mut summary = PlanSummary::default();
		let mut tables = HashSet::new();
		let mut foreign_keys = HashSet::new();
		for container in &self.insert {
			tables.extend(container.tables().into_iter().map(|table| table.id()));
			summary.rows += container.row_count();
			match container {
				TableContainer::Table(_) => {}
				TableContainer::MutualTableGroup(_) => summary.table_groups += 1,
				TableContainer::MutualRowGroup(group) => {
					summary.row_groups += 1;
					foreign_keys.extend(group.foreign_keys.iter());
				}
			}
		}
		summary.tables = tables.len();
		summary.disabled_foreign_keys = foreign_keys.len();
		summary
	}
}

/// Counts over an insertion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanSummary {
	/// Distinct tables.
	pub tables: usize,
	/// Rows.
	pub rows: usize,
	/// Table groups.
	///
	/// A table cycle refined around row cycles yields several.
	pub table_groups: usize,
	/// Row cycles.
	pub row_groups: usize,
	/// Distinct foreign keys disabled around row cycles.
	pub disabled_foreign_keys: usize,
}

impl fmt::Display for PlanSummary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} table(s), {} row(s), {} table group(s), {} row cycle(s), {} foreign key(s) to disable",
			self.tables, self.rows, self.table_groups, self.row_groups, self.disabled_foreign_keys
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::provider::InlineProvider;
	use crate::schema::{ForeignKey, Key, TableId, TableSchema};
	use rstest::{fixture, rstest};

	/// Blog: Post -> User, Comment -> Post, Comment -> User; Tag is standalone.
	#[fixture]
	fn schema() -> DatabaseSchema {
		DatabaseSchema::new(vec![
			TableSchema::new(TableId::new("dbo", "Comment"))
				.with_columns(["Id", "PostId", "AuthorId"])
				.with_primary_key(Key::new(["Id"]))
				.with_foreign_key(ForeignKey::new(
					"FK_Comment_Post",
					["PostId"],
					TableId::new("dbo", "Post"),
					["Id"],
				))
				.with_foreign_key(ForeignKey::new(
					"FK_Comment_Author",
					["AuthorId"],
					TableId::new("dbo", "User"),
					["Id"],
				)),
			TableSchema::new(TableId::new("dbo", "Post"))
				.with_columns(["Id", "AuthorId"])
				.with_primary_key(Key::new(["Id"]))
				.with_foreign_key(ForeignKey::new(
					"FK_Post_Author",
					["AuthorId"],
					TableId::new("dbo", "User"),
					["Id"],
				)),
			TableSchema::new(TableId::new("dbo", "Tag"))
				.with_columns(["Id"])
				.with_primary_key(Key::new(["Id"])),
			TableSchema::new(TableId::new("dbo", "User"))
				.with_columns(["Id"])
				.with_primary_key(Key::new(["Id"])),
		])
		.unwrap()
	}

	fn entities() -> Vec<Entity> {
		InlineProvider::new()
			.with_entities([
				Entity::new("Comment")
					.with_property("Id", 1)
					.with_property("PostId", 1)
					.with_property("AuthorId", 1),
				Entity::new("Post").with_property("Id", 1).with_property("AuthorId", 1),
				Entity::new("User").with_property("Id", 1),
			])
			.entities()
			.unwrap()
	}

	fn table_names(containers: &[TableContainer]) -> Vec<String> {
		containers
			.iter()
			.flat_map(|container| container.tables())
			.map(|table| table.id().name().to_string())
			.collect()
	}

	#[rstest]
	fn test_order_tables(schema: DatabaseSchema) {
		// Act
		let graph = ReseedPlanner::default().order_tables(&schema).unwrap();

		// Assert
		let names: Vec<&str> = graph.nodes().map(|node| node.item().id().name()).collect();
		assert_eq!(names, ["User", "Post", "Comment", "Tag"]);
		assert!(!graph.has_cycles());
	}

	#[rstest]
	fn test_plan_skips_empty_tables(schema: DatabaseSchema) {
		// Arrange
		let planner = ReseedPlanner::new(ReseedOptions::default());

		// Act
		let plan = planner.plan_entities(&schema, &entities()).unwrap();

		// Assert
		assert_eq!(table_names(plan.insert()), ["User", "Post", "Comment"]);
		assert_eq!(table_names(plan.cleanup()), ["Tag", "Comment", "Post", "User"]);
		assert_eq!(plan.table_graph().len(), 4);
	}

	#[rstest]
	fn test_plan_keeps_empty_tables(schema: DatabaseSchema) {
		let planner = ReseedPlanner::new(
			ReseedOptions::new()
				.with_skip_empty_tables(false)
				.with_cleanup_scope(CleanupScope::SeededTables),
		);

		let plan = planner.plan_entities(&schema, &entities()).unwrap();

		assert_eq!(table_names(plan.insert()), ["User", "Post", "Comment", "Tag"]);
		assert_eq!(table_names(plan.cleanup()), ["Comment", "Post", "User"]);
	}

	#[rstest]
	fn test_summary(schema: DatabaseSchema) {
		let plan = ReseedPlanner::default()
			.plan_entities(&schema, &entities())
			.unwrap();

		let summary = plan.summary();

		assert_eq!(
			summary,
			PlanSummary {
				tables: 3,
				rows: 3,
				table_groups: 0,
				row_groups: 0,
				disabled_foreign_keys: 0,
			}
		);
		assert_eq!(
			summary.to_string(),
			"3 table(s), 3 row(s), 0 table group(s), 0 row cycle(s), 0 foreign key(s) to disable"
		);
	}

	#[rstest]
	fn test_plan_provider_reports_matching_errors(schema: DatabaseSchema) {
		let provider = InlineProvider::new().with_entity(Entity::new("Missing"));

		let result = ReseedPlanner::default().plan_provider(&schema, &provider);

		assert!(matches!(result, Err(ReseedError::UnknownTable { .. })));
	}
}
