//! Units of a reseed sequence.
//!
//! A sequence is a list of [`TableContainer`]s. Renderers match on the
//! variant to decide whether constraints must be disabled around it.

use std::collections::HashSet;
use std::sync::Arc;

use crate::row::RowRef;
use crate::schema::{ForeignKeyRef, TableRef};

/// A table with its rows, outside any cycle.
#[derive(Debug, Clone)]
pub struct TableData {
	/// The table.
	pub table: TableRef,
	/// Rows in entity order.
	pub rows: Vec<RowRef>,
}

/// Consecutive rows of one table inside a [`MutualTableGroup`].
#[derive(Debug, Clone)]
pub struct TableBatch {
	/// The table.
	pub table: TableRef,
	/// Rows in dependency order.
	pub rows: Vec<RowRef>,
}

/// Tables whose foreign keys form a cycle that no row closes.
///
/// Rows are listed in dependency order as batches of one table each, so
/// they can be handled without disabling constraints.
#[derive(Debug, Clone)]
pub struct MutualTableGroup {
	/// Member tables in table order.
	pub tables: Vec<TableRef>,
	/// Row batches in dependency order.
	pub batches: Vec<TableBatch>,
}

impl MutualTableGroup {
	/// Creates a group without rows.
	pub fn new(tables: Vec<TableRef>) -> Self {
		Self {
			tables,
			batches: Vec::new(),
		}
	}

	/// Appends a row, extending the last batch when it has the same table.
	pub fn push_row(&mut self, row: RowRef) {
		match self.batches.last_mut() {
			Some(batch) if batch.table == *row.table() => batch.rows.push(row),
			_ => self.batches.push(TableBatch {
				table: Arc::clone(row.table()),
				rows: vec![row],
			}),
		}
	}

	/// Returns the foreign keys between member tables.
	pub fn foreign_keys(&self) -> Vec<ForeignKeyRef> {
		let members: HashSet<_> = self.tables.iter().map(|table| table.id()).collect();
		self.tables
			.iter()
			.flat_map(|table| table.foreign_keys())
			.filter(|foreign_key| members.contains(&foreign_key.referenced_table))
			.cloned()
			.collect()
	}
}

/// Rows that reference each other in a cycle.
///
/// The listed foreign keys must be disabled while these rows are handled.
#[derive(Debug, Clone)]
pub struct MutualRowGroup {
	/// Rows in traversal order.
	pub rows: Vec<RowRef>,
	/// Foreign keys the cycle runs through, each once.
	pub foreign_keys: Vec<ForeignKeyRef>,
}

/// One step of a reseed sequence.
#[derive(Debug, Clone)]
pub enum TableContainer {
	/// A single table.
	Table(TableData),
	/// Cyclic tables whose rows can be ordered.
	MutualTableGroup(MutualTableGroup),
	/// Rows that must be handled with constraints disabled.
	MutualRowGroup(MutualRowGroup),
}

impl TableContainer {
	/// Returns the tables involved, each once, in first appearance order.
	pub fn tables(&self) -> Vec<&TableRef> {
		let mut seen = HashSet::new();
		let tables: Vec<&TableRef> = match self {
			Self::Table(data) => vec![&data.table],
			Self::MutualTableGroup(group) => group.tables.iter().collect(),
			Self::MutualRowGroup(group) => group.rows.iter().map(|row| row.table()).collect(),
		};
		tables
			.into_iter()
			.filter(|table| seen.insert(table.id()))
			.collect()
	}

	/// Returns the rows, in sequence order.
	pub fn rows(&self) -> Vec<&RowRef> {
		match self {
			Self::Table(data) => data.rows.iter().collect(),
			Self::MutualTableGroup(group) => group
				.batches
				.iter()
				.flat_map(|batch| batch.rows.iter())
				.collect(),
			Self::MutualRowGroup(group) => group.rows.iter().collect(),
		}
	}

	/// Returns the number of rows.
	pub fn row_count(&self) -> usize {
		match self {
			Self::Table(data) => data.rows.len(),
			Self::MutualTableGroup(group) => group.batches.iter().map(|b| b.rows.len()).sum(),
			Self::MutualRowGroup(group) => group.rows.len(),
		}
	}

	/// Returns true if constraints must be disabled around this container.
	pub fn requires_disabled_constraints(&self) -> bool {
		matches!(self, Self::MutualRowGroup(_))
	}
}
