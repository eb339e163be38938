//! Entity file formats and records.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record of an entity file.
///
/// # Example
///
/// ```json
/// {
///   "entity": "dbo.User",
///   "values": {
///     "Id": 2,
///     "ManagerId": 1
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EntityRecord {
	/// Table name, qualified or bare.
	pub entity: String,

	/// Column values, in file order.
	#[serde(default)]
	pub values: Map<String, Value>,
}

/// Supported entity file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum EntityFormat {
	/// JSON format (default).
	#[default]
	Json,

	/// YAML format (requires `yaml` feature).
	Yaml,
}

impl EntityFormat {
	/// Determines the format from a file extension.
	///
	/// # Example
	///
	/// ```
	/// # use reinhardt_reseed_core::provider::EntityFormat;
	/// assert_eq!(EntityFormat::from_extension("json"), Some(EntityFormat::Json));
	/// assert_eq!(EntityFormat::from_extension("YML"), Some(EntityFormat::Yaml));
	/// assert_eq!(EntityFormat::from_extension("csv"), None);
	/// ```
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"json" => Some(Self::Json),
			"yaml" | "yml" => Some(Self::Yaml),
			_ => None,
		}
	}

	/// Determines the format from a file path.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}

	/// Returns the default file extension for this format.
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Json => "json",
			Self::Yaml => "yaml",
		}
	}
}

impl std::fmt::Display for EntityFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Json => write!(f, "JSON"),
			Self::Yaml => write!(f, "YAML"),
		}
	}
}
