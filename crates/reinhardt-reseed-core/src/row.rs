//! Rows matched against their tables.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use reinhardt_reseed_graph::GraphNode;

use crate::error::{ReseedError, ReseedResult};
use crate::provider::Origin;
use crate::schema::{ForeignKeyRef, TableId, TableRef};
use crate::value::{CellValue, KeyValue};

static NULL: CellValue = CellValue::Null;

/// Shared handle to a row, used as the row graph item.
pub type RowRef = Arc<Row>;

/// Node of the row graph.
pub type RowNode = GraphNode<RowRef, ForeignKeyRef>;

/// What tells a row apart from the other rows of its table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowIdent {
	/// The row's primary key value.
	PrimaryKey(KeyValue),
	/// Position among the table's rows, for tables without a usable key.
	Ordinal(usize),
}

/// Identity of a row: its table plus its primary key or ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
	/// Owning table.
	pub table: TableId,
	/// Identity within the table.
	pub ident: RowIdent,
}

impl fmt::Display for RowKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.ident {
			RowIdent::PrimaryKey(value) => write!(f, "{}{}", self.table, value),
			RowIdent::Ordinal(index) => write!(f, "{}#{}", self.table, index),
		}
	}
}

/// A row of a table.
///
/// Values are aligned with the table's columns; `None` marks a column the
/// entity did not set. Identity is the [`RowKey`] alone.
#[derive(Clone)]
pub struct Row {
	key: RowKey,
	table: TableRef,
	values: Vec<Option<CellValue>>,
	origin: Origin,
}

impl Row {
	/// Creates a row, deriving its key from the table's primary key.
	///
	/// Rows of tables without a primary key, or whose key value contains a
	/// NULL, are identified by `ordinal`.
	pub fn new(
		table: TableRef,
		values: Vec<Option<CellValue>>,
		ordinal: usize,
		origin: Origin,
	) -> Self {
		let mut row = Self {
			key: RowKey {
				table: table.id().clone(),
				ident: RowIdent::Ordinal(ordinal),
			},
			table,
			values,
			origin,
		};
		if let Some(primary_key) = row.table.primary_key() {
			let value = row.key_value(&primary_key.columns);
			if !value.has_null() {
				row.key.ident = RowIdent::PrimaryKey(value);
			}
		}
		row
	}

	/// Returns the row identity.
	pub fn key(&self) -> &RowKey {
		&self.key
	}

	/// Returns the owning table.
	pub fn table(&self) -> &TableRef {
		&self.table
	}

	/// Returns the values aligned with the table's columns.
	pub fn values(&self) -> &[Option<CellValue>] {
		&self.values
	}

	/// Returns where the row was defined.
	pub fn origin(&self) -> &Origin {
		&self.origin
	}

	/// Returns true if the entity set `column`.
	pub fn is_set(&self, column: &str) -> bool {
		self.table
			.column_index(column)
			.and_then(|index| self.values.get(index))
			.is_some_and(Option::is_some)
	}

	/// Returns the value of `column`; unset and unknown columns read as NULL.
	pub fn value(&self, column: &str) -> &CellValue {
		self.table
			.column_index(column)
			.and_then(|index| self.values.get(index))
			.and_then(Option::as_ref)
			.unwrap_or(&NULL)
	}

	/// Returns the values of `columns`, in the given order.
	pub fn key_value(&self, columns: &[String]) -> KeyValue {
		columns
			.iter()
			.map(|column| self.value(column).clone())
			.collect()
	}
}

impl PartialEq for Row {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl Eq for Row {}

impl Hash for Row {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.key.hash(state);
	}
}

impl fmt::Debug for Row {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Row")
			.field("key", &self.key.to_string())
			.field("values", &self.values)
			.field("origin", &self.origin.to_string())
			.finish()
	}
}

impl fmt::Display for Row {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.key.fmt(f)
	}
}

/// Rows grouped per table, each table's rows in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
	tables: Vec<TableId>,
	rows: HashMap<TableId, Vec<RowRef>>,
	keys: HashSet<RowKey>,
}

impl RowSet {
	/// Creates an empty row set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a row.
	///
	/// # Errors
	///
	/// Returns [`ReseedError::DuplicateRow`] if a row with the same key was
	/// already added.
	pub fn insert(&mut self, row: Row) -> ReseedResult<RowRef> {
		if !self.keys.insert(row.key.clone()) {
			let key = match &row.key.ident {
				RowIdent::PrimaryKey(value) => value.to_string(),
				RowIdent::Ordinal(index) => format!("#{}", index),
			};
			return Err(ReseedError::DuplicateRow {
				table: row.key.table.to_string(),
				key,
				origin: row.origin.to_string(),
			});
		}
		let table = row.key.table.clone();
		let row = Arc::new(row);
		let rows = self.rows.entry(table.clone()).or_insert_with(|| {
			self.tables.push(table);
			Vec::new()
		});
		rows.push(Arc::clone(&row));
		Ok(row)
	}

	/// Returns the rows of `table`, in insertion order.
	pub fn rows_of(&self, table: &TableId) -> &[RowRef] {
		self.rows.get(table).map(Vec::as_slice).unwrap_or_default()
	}

	/// Returns true if `table` has at least one row.
	pub fn has_rows(&self, table: &TableId) -> bool {
		!self.rows_of(table).is_empty()
	}

	/// Returns the tables that have rows, in order of their first row.
	pub fn tables(&self) -> &[TableId] {
		&self.tables
	}

	/// Returns every row, table by table.
	pub fn iter(&self) -> impl Iterator<Item = &RowRef> {
		self.tables.iter().flat_map(|table| self.rows_of(table))
	}

	/// Returns the number of rows.
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	/// Returns true if there are no rows.
	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}
}
