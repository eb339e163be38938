//! Error types for reseed planning.
//!
//! Every variant names the table, row or entity it is about so that a
//! malformed schema or entity file can be traced back to its source.

use reinhardt_reseed_graph::GraphError;
use thiserror::Error;

/// Errors that can occur while matching entities and planning a reseed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReseedError {
	/// An entity names a table that is not in the schema.
	#[error("Unknown table '{name}' (entity at {origin})")]
	UnknownTable {
		/// Name given by the entity.
		name: String,
		/// Where the entity came from.
		origin: String,
	},

	/// A bare entity name matches tables in several schemas.
	#[error("Ambiguous table '{name}' matches {candidates:?} (entity at {origin})")]
	AmbiguousTable {
		/// Name given by the entity.
		name: String,
		/// Qualified names of every matching table.
		candidates: Vec<String>,
		/// Where the entity came from.
		origin: String,
	},

	/// An entity sets a column the table does not have.
	#[error("Unknown column '{column}' in table {table} (entity at {origin})")]
	UnknownColumn {
		/// Qualified table name.
		table: String,
		/// Column given by the entity.
		column: String,
		/// Where the entity came from.
		origin: String,
	},

	/// A foreign key points at a table missing from the schema.
	#[error("Foreign key {foreign_key} on {table} references unknown table {referenced}")]
	UnknownReferencedTable {
		/// Qualified name of the owning table.
		table: String,
		/// Foreign key name.
		foreign_key: String,
		/// Referenced table as declared.
		referenced: String,
	},

	/// A foreign key has differing source and target column counts.
	#[error(
		"Foreign key {foreign_key} on {table} maps {columns} column(s) to {referenced_columns}"
	)]
	ForeignKeyArity {
		/// Qualified name of the owning table.
		table: String,
		/// Foreign key name.
		foreign_key: String,
		/// Number of source columns.
		columns: usize,
		/// Number of referenced columns.
		referenced_columns: usize,
	},

	/// A key or foreign key names a column its table does not have.
	#[error("Key column '{column}' is not a column of {table}")]
	UnknownKeyColumn {
		/// Qualified table name.
		table: String,
		/// Missing column.
		column: String,
	},

	/// Two tables share the same qualified name.
	#[error("Duplicate table: {0}")]
	DuplicateTable(String),

	/// Two entities carry the same primary key value for one table.
	#[error("Duplicate row {key} in table {table} (entity at {origin})")]
	DuplicateRow {
		/// Qualified table name.
		table: String,
		/// Rendered primary key value.
		key: String,
		/// Where the second entity came from.
		origin: String,
	},

	/// A property value cannot be stored in a table cell.
	#[error("Invalid value for {entity}.{property}: {message} (entity at {origin})")]
	InvalidValue {
		/// Entity name.
		entity: String,
		/// Property being set.
		property: String,
		/// Reason the value was rejected.
		message: String,
		/// Where the entity came from.
		origin: String,
	},

	/// Rows reference each other although row cycles are disabled.
	#[error("Rows reference each other in a cycle: {}", rows.join(", "))]
	RowCycleNotAllowed {
		/// Rendered keys of the rows in the cycle.
		rows: Vec<String>,
	},

	/// Error parsing entity data.
	#[error("Parse error: {0}")]
	ParseError(String),

	/// Entity file not found.
	#[error("Entity file not found: {0}")]
	FileNotFound(String),

	/// Unsupported file extension.
	#[error("Unsupported file extension: {0}")]
	UnsupportedExtension(String),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),

	/// JSON deserialization error.
	#[error("JSON error: {0}")]
	JsonError(#[from] serde_json::Error),

	/// YAML deserialization error (when yaml feature is enabled).
	#[cfg(feature = "yaml")]
	#[error("YAML error: {0}")]
	YamlError(#[from] serde_yaml::Error),

	/// Options file could not be parsed.
	#[error("Configuration error: {0}")]
	ConfigError(#[from] toml::de::Error),

	/// The table or row graph could not be built.
	#[error("Graph error: {0}")]
	GraphError(#[from] GraphError),
}

/// Result type alias for reseed operations.
pub type ReseedResult<T> = Result<T, ReseedError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_unknown_table_error() {
		let error = ReseedError::UnknownTable {
			name: "dbo.Usr".to_string(),
			origin: "users.json#2".to_string(),
		};
		assert_eq!(
			error.to_string(),
			"Unknown table 'dbo.Usr' (entity at users.json#2)"
		);
	}

	#[rstest]
	fn test_row_cycle_error_lists_rows() {
		let error = ReseedError::RowCycleNotAllowed {
			rows: vec!["dbo.User(4)".to_string(), "dbo.Team(1)".to_string()],
		};
		assert_eq!(
			error.to_string(),
			"Rows reference each other in a cycle: dbo.User(4), dbo.Team(1)"
		);
	}

	#[rstest]
	fn test_io_error_from() {
		let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
		let reseed_error: ReseedError = io_error.into();
		assert!(matches!(reseed_error, ReseedError::IoError(_)));
	}

	#[rstest]
	fn test_json_error_from() {
		let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
		let reseed_error: ReseedError = json_error.into();
		assert!(matches!(reseed_error, ReseedError::JsonError(_)));
	}

	#[rstest]
	fn test_graph_error_from() {
		let graph_error = GraphError::duplicate_item(&"dbo.User");
		let reseed_error: ReseedError = graph_error.into();
		assert!(matches!(reseed_error, ReseedError::GraphError(_)));
	}
}
