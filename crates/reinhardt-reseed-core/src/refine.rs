//! Row-level refinement of table cycles.
//!
//! A foreign-key cycle between tables only matters for the rows whose key
//! values actually close it. [`TableMutualReferenceResolver`] joins the rows
//! of a table group on every foreign key between member tables and orders
//! the resulting row graph with the same engine used for tables. Rows that
//! still form cycles become [`MutualRowGroup`]s; everything else is emitted
//! in dependency order without disabling constraints.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use reinhardt_reseed_graph::{
	GraphNode, MutualGroup, MutualGroupOrderMode, MutualReferenceResolver, Node, NodeBuilder,
	NodeOrderer, OrderedItem, Reference, Relation,
};
use tracing::debug;

use crate::container::{MutualRowGroup, MutualTableGroup, TableContainer};
use crate::error::ReseedResult;
use crate::row::{RowNode, RowRef, RowSet};
use crate::schema::{ForeignKeyRef, TableId, TableRef};
use crate::value::KeyValue;

/// Which sequence a group is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
	/// Dependencies first.
	Insert,
	/// Dependents first.
	Cleanup,
}

impl Direction {
	/// Returns the slot a group takes in a sequence of this direction.
	pub fn order_mode(self) -> MutualGroupOrderMode {
		match self {
			Self::Insert => MutualGroupOrderMode::Max,
			Self::Cleanup => MutualGroupOrderMode::Min,
		}
	}
}

/// Resolves table groups into row-level containers.
#[derive(Debug, Clone, Copy)]
pub struct TableMutualReferenceResolver<'a> {
	rows: &'a RowSet,
}

impl<'a> TableMutualReferenceResolver<'a> {
	/// Creates a resolver over the rows to seed.
	pub fn new(rows: &'a RowSet) -> Self {
		Self { rows }
	}

	/// Returns the row-to-row edges between the member tables.
	///
	/// An edge exists when the source row's foreign key value is free of
	/// NULLs and equals, component by component, the referenced columns of
	/// the target row.
	pub fn row_relations(&self, tables: &[TableRef]) -> Vec<Relation<RowRef, ForeignKeyRef>> {
		let members: HashSet<&TableId> = tables.iter().map(|table| table.id()).collect();
		let mut indexes: HashMap<(&TableId, &[String]), HashMap<KeyValue, Vec<&RowRef>>> =
			HashMap::new();
		let mut relations = Vec::new();

		for table in tables {
			for foreign_key in table.foreign_keys() {
				let target = &foreign_key.referenced_table;
				if !members.contains(target) {
					continue;
				}
				let index = indexes
					.entry((target, foreign_key.referenced_columns.as_slice()))
					.or_insert_with(|| {
						self.index_rows(target, &foreign_key.referenced_columns)
					});
				for row in self.rows.rows_of(table.id()) {
					let value = row.key_value(&foreign_key.columns);
					if value.has_null() {
						continue;
					}
					for referenced in index.get(&value).into_iter().flatten() {
						relations.push(Relation::new(
							Arc::clone(row),
							Arc::clone(referenced),
							Arc::clone(foreign_key),
						));
					}
				}
			}
		}
		relations
	}

	fn index_rows(&self, table: &TableId, columns: &[String]) -> HashMap<KeyValue, Vec<&'a RowRef>> {
		let mut index: HashMap<KeyValue, Vec<&'a RowRef>> = HashMap::new();
		for row in self.rows.rows_of(table) {
			let value = row.key_value(columns);
			if !value.has_null() {
				index.entry(value).or_default().push(row);
			}
		}
		index
	}

	/// Resolves a table group into containers for `direction`.
	///
	/// A group without rows yields a single [`MutualTableGroup`] without
	/// batches.
	pub fn resolve(
		&self,
		group: &MutualGroup<TableRef, ForeignKeyRef>,
		direction: Direction,
	) -> ReseedResult<Vec<TableContainer>> {
		let tables = group.items();
		let items: Vec<RowRef> = tables
			.iter()
			.flat_map(|table| self.rows.rows_of(table.id()))
			.cloned()
			.collect();
		if items.is_empty() {
			return Ok(vec![TableContainer::MutualTableGroup(MutualTableGroup::new(
				tables.to_vec(),
			))]);
		}

		let relations = self.row_relations(tables);
		let nodes: Vec<RowNode> = NodeBuilder::new().collect_nodes(
			&items,
			&relations,
			|relation, target: &RowNode| {
				Reference::new(Arc::clone(&relation.association), Arc::clone(target.item()))
			},
			|row, references| GraphNode::new(Arc::clone(row), references),
		)?;
		let mut graph = NodeOrderer::new().order(nodes)?;
		if direction == Direction::Cleanup {
			graph = graph.reverse();
		}

		let merged = MutualReferenceResolver::new().merge_chunks(
			&graph,
			|run| {
				let order = run.last().map_or(0, |ordered| ordered.order);
				let mut container = MutualTableGroup::new(tables.to_vec());
				for ordered in run {
					container.push_row(Arc::clone(ordered.value.item()));
				}
				vec![OrderedItem::new(
					TableContainer::MutualTableGroup(container),
					order,
				)]
			},
			|row_group, members| {
				OrderedItem::new(
					TableContainer::MutualRowGroup(row_group_container(row_group, &members)),
					row_group.order(direction.order_mode()),
				)
			},
			direction.order_mode(),
		);

		let containers: Vec<TableContainer> =
			merged.into_iter().map(|ordered| ordered.value).collect();
		debug!(
			tables = ?tables.iter().map(|table| table.id().to_string()).collect::<Vec<_>>(),
			rows = items.len(),
			row_edges = relations.len(),
			row_groups = containers
				.iter()
				.filter(|container| container.requires_disabled_constraints())
				.count(),
			?direction,
			"refined table cycle"
		);
		Ok(containers)
	}
}

/// Collects a row cycle and every foreign key used between its members.
fn row_group_container(
	group: &MutualGroup<RowRef, ForeignKeyRef>,
	members: &[&OrderedItem<RowNode>],
) -> MutualRowGroup {
	let mut seen = HashSet::new();
	let mut foreign_keys = Vec::new();
	for ordered in members {
		for reference in ordered.value.references() {
			if group.contains(&reference.target) && seen.insert(Arc::clone(&reference.association))
			{
				foreign_keys.push(Arc::clone(&reference.association));
			}
		}
	}
	MutualRowGroup {
		rows: members
			.iter()
			.map(|ordered| Arc::clone(ordered.value.item()))
			.collect(),
		foreign_keys,
	}
}
