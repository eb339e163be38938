//! Planner options.
//!
//! Options are usually built in code with the `with_*` setters, or read
//! from a TOML document:
//!
//! ```toml
//! skip_empty_tables = true
//! cleanup_scope = "seeded_tables"
//! allow_row_cycles = false
//! entity_name_matching = "exact"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReseedError, ReseedResult};

/// Which tables the cleanup sequence covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupScope {
	/// Every table of the schema is cleaned.
	#[default]
	AllTables,
	/// Only tables that receive rows are cleaned.
	SeededTables,
}

/// How entity, table and column names are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatching {
	/// Names must be identical.
	Exact,
	/// Names are compared ignoring ASCII case, as SQL Server does by default.
	#[default]
	CaseInsensitive,
}

impl NameMatching {
	/// Returns true if `left` and `right` name the same object.
	pub fn matches(self, left: &str, right: &str) -> bool {
		match self {
			Self::Exact => left == right,
			Self::CaseInsensitive => left.eq_ignore_ascii_case(right),
		}
	}
}

/// Options for [`ReseedPlanner`](crate::planner::ReseedPlanner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReseedOptions {
	/// Leave tables without rows out of the insertion sequence.
	pub skip_empty_tables: bool,

	/// Tables covered by the cleanup sequence.
	pub cleanup_scope: CleanupScope,

	/// Accept rows that reference each other in a cycle.
	pub allow_row_cycles: bool,

	/// How entity names are matched against tables and columns.
	pub entity_name_matching: NameMatching,
}

impl Default for ReseedOptions {
	fn default() -> Self {
		Self {
			skip_empty_tables: true,
			cleanup_scope: CleanupScope::default(),
			allow_row_cycles: true,
			entity_name_matching: NameMatching::default(),
		}
	}
}

impl ReseedOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets whether tables without rows are skipped on insertion.
	pub fn with_skip_empty_tables(mut self, skip: bool) -> Self {
		self.skip_empty_tables = skip;
		self
	}

	/// Sets the cleanup scope.
	pub fn with_cleanup_scope(mut self, scope: CleanupScope) -> Self {
		self.cleanup_scope = scope;
		self
	}

	/// Sets whether row cycles are accepted.
	pub fn with_allow_row_cycles(mut self, allow: bool) -> Self {
		self.allow_row_cycles = allow;
		self
	}

	/// Sets how entity names are matched.
	pub fn with_entity_name_matching(mut self, matching: NameMatching) -> Self {
		self.entity_name_matching = matching;
		self
	}

	/// Parses options from TOML text. Missing settings keep their defaults.
	pub fn from_toml_str(content: &str) -> ReseedResult<Self> {
		Ok(toml::from_str(content)?)
	}

	/// Reads options from a TOML file.
	pub fn from_path(path: &Path) -> ReseedResult<Self> {
		let content = std::fs::read_to_string(path).map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				ReseedError::FileNotFound(path.display().to_string())
			} else {
				ReseedError::IoError(e)
			}
		})?;
		Self::from_toml_str(&content)
	}
}
