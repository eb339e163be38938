//! Table descriptors handed over by schema introspection.
//!
//! The shapes follow what `information_schema` exposes: a table has an
//! ordered column list, an optional primary key and outgoing foreign keys.
//! Descriptors are assembled in code and validated once by
//! [`DatabaseSchema::new`].

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use reinhardt_reseed_graph::{GraphNode, Relation};

use crate::error::{ReseedError, ReseedResult};
use crate::options::NameMatching;

/// Shared handle to a table descriptor, used as the table graph item.
pub type TableRef = Arc<TableSchema>;

/// Shared handle to a foreign key, used as the table graph association.
pub type ForeignKeyRef = Arc<ForeignKey>;

/// Node of the table graph.
pub type TableNode = GraphNode<TableRef, ForeignKeyRef>;

/// Schema qualified table identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId {
	schema: String,
	name: String,
}

impl TableId {
	/// Creates a table id from a schema and a table name.
	pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			schema: schema.into(),
			name: name.into(),
		}
	}

	/// Returns the schema name.
	pub fn schema(&self) -> &str {
		&self.schema
	}

	/// Returns the table name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns true if `name` designates this table.
	///
	/// A qualified name (`schema.table`) must match both parts, a bare name
	/// only the table name.
	pub fn matches(&self, name: &str, matching: NameMatching) -> bool {
		match name.split_once('.') {
			Some((schema, table)) => {
				matching.matches(&self.schema, schema) && matching.matches(&self.name, table)
			}
			None => matching.matches(&self.name, name),
		}
	}
}

impl fmt::Display for TableId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.schema, self.name)
	}
}

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
	/// Column name.
	pub name: String,
	/// Whether the column accepts NULL.
	pub nullable: bool,
}

impl Column {
	/// Creates a nullable column.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			nullable: true,
		}
	}

	/// Marks the column as NOT NULL.
	pub fn not_null(mut self) -> Self {
		self.nullable = false;
		self
	}
}

/// An ordered list of columns, optionally named.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
	/// Constraint name, if any.
	pub name: Option<String>,
	/// Key columns in key order.
	pub columns: Vec<String>,
}

impl Key {
	/// Creates an unnamed key over `columns`.
	pub fn new<I, S>(columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			name: None,
			columns: columns.into_iter().map(Into::into).collect(),
		}
	}

	/// Sets the constraint name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({})", self.columns.join(", "))
	}
}

/// A foreign key from one table's columns to another table's columns.
///
/// Two foreign keys are the same constraint when they share the owning
/// table and the name.
#[derive(Debug, Clone)]
pub struct ForeignKey {
	/// Constraint name.
	pub name: String,
	/// Owning table, filled in by [`TableSchema::with_foreign_key`].
	pub table: TableId,
	/// Referencing columns.
	pub columns: Vec<String>,
	/// Referenced table.
	pub referenced_table: TableId,
	/// Referenced columns, aligned with `columns`.
	pub referenced_columns: Vec<String>,
}

impl ForeignKey {
	/// Creates a foreign key; the owning table is set when it is attached.
	pub fn new<I, S, J, R>(
		name: impl Into<String>,
		columns: I,
		referenced_table: TableId,
		referenced_columns: J,
	) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
		J: IntoIterator<Item = R>,
		R: Into<String>,
	{
		Self {
			name: name.into(),
			table: TableId::new("", ""),
			columns: columns.into_iter().map(Into::into).collect(),
			referenced_table,
			referenced_columns: referenced_columns.into_iter().map(Into::into).collect(),
		}
	}

	/// Returns the referencing side as a key.
	pub fn key(&self) -> Key {
		Key::new(self.columns.iter().cloned()).with_name(self.name.clone())
	}

	/// Returns the referenced side as a key.
	pub fn referenced_key(&self) -> Key {
		Key::new(self.referenced_columns.iter().cloned())
	}

	/// Returns true if the foreign key points back at its own table.
	pub fn is_self_reference(&self) -> bool {
		self.table == self.referenced_table
	}
}

impl PartialEq for ForeignKey {
	fn eq(&self, other: &Self) -> bool {
		self.table == other.table && self.name == other.name
	}
}

impl Eq for ForeignKey {}

impl Hash for ForeignKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.table.hash(state);
		self.name.hash(state);
	}
}

impl fmt::Display for ForeignKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} {}({}) -> {}({})",
			self.name,
			self.table,
			self.columns.join(", "),
			self.referenced_table,
			self.referenced_columns.join(", ")
		)
	}
}

/// A table: columns, primary key and outgoing foreign keys.
///
/// Identity is the [`TableId`] alone.
#[derive(Debug, Clone)]
pub struct TableSchema {
	id: TableId,
	columns: Vec<Column>,
	primary_key: Option<Key>,
	foreign_keys: Vec<ForeignKeyRef>,
}

impl TableSchema {
	/// Creates a table without columns.
	pub fn new(id: TableId) -> Self {
		Self {
			id,
			columns: Vec::new(),
			primary_key: None,
			foreign_keys: Vec::new(),
		}
	}

	/// Appends a column.
	pub fn with_column(mut self, column: Column) -> Self {
		self.columns.push(column);
		self
	}

	/// Appends nullable columns by name.
	pub fn with_columns<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.columns.extend(names.into_iter().map(Column::new));
		self
	}

	/// Sets the primary key.
	pub fn with_primary_key(mut self, key: Key) -> Self {
		self.primary_key = Some(key);
		self
	}

	/// Attaches a foreign key owned by this table.
	pub fn with_foreign_key(mut self, mut foreign_key: ForeignKey) -> Self {
		foreign_key.table = self.id.clone();
		self.foreign_keys.push(Arc::new(foreign_key));
		self
	}

	/// Returns the table id.
	pub fn id(&self) -> &TableId {
		&self.id
	}

	/// Returns the columns in table order.
	pub fn columns(&self) -> &[Column] {
		&self.columns
	}

	/// Returns the position of the column called `name`.
	pub fn column_index(&self, name: &str) -> Option<usize> {
		self.columns.iter().position(|column| column.name == name)
	}

	/// Returns the position of the column designated by `name`.
	pub fn find_column(&self, name: &str, matching: NameMatching) -> Option<usize> {
		self.column_index(name).or_else(|| {
			self.columns
				.iter()
				.position(|column| matching.matches(&column.name, name))
		})
	}

	/// Returns the primary key, if the table has one.
	pub fn primary_key(&self) -> Option<&Key> {
		self.primary_key.as_ref()
	}

	/// Returns the outgoing foreign keys.
	pub fn foreign_keys(&self) -> &[ForeignKeyRef] {
		&self.foreign_keys
	}

	fn check_columns<'a>(&self, columns: impl IntoIterator<Item = &'a String>) -> ReseedResult<()> {
		for column in columns {
			if self.column_index(column).is_none() {
				return Err(ReseedError::UnknownKeyColumn {
					table: self.id.to_string(),
					column: column.clone(),
				});
			}
		}
		Ok(())
	}
}

impl PartialEq for TableSchema {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TableSchema {}

impl Hash for TableSchema {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Display for TableSchema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.id.fmt(f)
	}
}

/// A validated set of tables.
#[derive(Debug, Clone, Default)]
pub struct DatabaseSchema {
	tables: Vec<TableRef>,
	positions: HashMap<TableId, usize>,
}

impl DatabaseSchema {
	/// Validates `tables` and collects them in the given order.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - Two tables share an id
	/// - A primary key or foreign key names a missing column
	/// - A foreign key references a missing table
	/// - A foreign key's column lists differ in length
	pub fn new(tables: Vec<TableSchema>) -> ReseedResult<Self> {
		let mut positions = HashMap::with_capacity(tables.len());
		for (index, table) in tables.iter().enumerate() {
			if positions.insert(table.id.clone(), index).is_some() {
				return Err(ReseedError::DuplicateTable(table.id.to_string()));
			}
		}

		for table in &tables {
			if let Some(key) = &table.primary_key {
				table.check_columns(&key.columns)?;
			}
			for foreign_key in &table.foreign_keys {
				let referenced = positions
					.get(&foreign_key.referenced_table)
					.map(|&index| &tables[index])
					.ok_or_else(|| ReseedError::UnknownReferencedTable {
						table: table.id.to_string(),
						foreign_key: foreign_key.name.clone(),
						referenced: foreign_key.referenced_table.to_string(),
					})?;
				if foreign_key.columns.len() != foreign_key.referenced_columns.len() {
					return Err(ReseedError::ForeignKeyArity {
						table: table.id.to_string(),
						foreign_key: foreign_key.name.clone(),
						columns: foreign_key.columns.len(),
						referenced_columns: foreign_key.referenced_columns.len(),
					});
				}
				table.check_columns(&foreign_key.columns)?;
				referenced.check_columns(&foreign_key.referenced_columns)?;
			}
		}

		Ok(Self {
			tables: tables.into_iter().map(Arc::new).collect(),
			positions,
		})
	}

	/// Returns the tables in declaration order.
	pub fn tables(&self) -> &[TableRef] {
		&self.tables
	}

	/// Returns the table with the given id.
	pub fn table(&self, id: &TableId) -> Option<&TableRef> {
		self.positions.get(id).map(|&index| &self.tables[index])
	}

	/// Returns every table `name` designates under `matching`.
	///
	/// An exact match on the qualified or bare name wins over other
	/// candidates, so `User` and `user` can coexist under exact matching.
	pub fn find_tables(&self, name: &str, matching: NameMatching) -> Vec<&TableRef> {
		let exact: Vec<&TableRef> = self
			.tables
			.iter()
			.filter(|table| table.id.matches(name, NameMatching::Exact))
			.collect();
		if !exact.is_empty() || matching == NameMatching::Exact {
			return exact;
		}
		self.tables
			.iter()
			.filter(|table| table.id.matches(name, matching))
			.collect()
	}

	/// Returns one relation per foreign key, from the owning table to the
	/// referenced one.
	pub fn table_relations(&self) -> Vec<Relation<TableRef, ForeignKeyRef>> {
		self.tables
			.iter()
			.flat_map(|table| {
				table.foreign_keys.iter().filter_map(move |foreign_key| {
					let referenced = self.table(&foreign_key.referenced_table)?;
					Some(Relation::new(
						Arc::clone(table),
						Arc::clone(referenced),
						Arc::clone(foreign_key),
					))
				})
			})
			.collect()
	}
}
