//! Entity file parsing.
//!
//! This module handles parsing of entity files in JSON and YAML formats.

use std::path::Path;

use tracing::debug;

use super::{Entity, EntityFormat, EntityRecord, Origin, Property};
use crate::error::{ReseedError, ReseedResult};
use crate::value::CellValue;

/// Parser for entity files.
///
/// Supports both JSON and YAML formats (YAML requires the `yaml` feature).
#[derive(Debug, Default, Clone, Copy)]
pub struct EntityParser;

impl EntityParser {
	/// Creates a new entity parser.
	pub fn new() -> Self {
		Self
	}

	/// Parses an entity file, detecting the format from its extension.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The file extension is not recognized
	/// - The file cannot be read
	/// - The content is not a record or a list of records
	/// - A value cannot be stored in a table cell
	pub fn parse_file(&self, path: &Path) -> ReseedResult<Vec<Entity>> {
		let format = EntityFormat::from_path(path).ok_or_else(|| {
			ReseedError::UnsupportedExtension(
				path.extension()
					.and_then(|e| e.to_str())
					.unwrap_or("(none)")
					.to_string(),
			)
		})?;

		let content = std::fs::read_to_string(path).map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				ReseedError::FileNotFound(path.display().to_string())
			} else {
				ReseedError::IoError(e)
			}
		})?;

		let entities = self.parse_string(&content, format, &path.display().to_string())?;
		debug!(path = %path.display(), %format, entities = entities.len(), "parsed entity file");
		Ok(entities)
	}

	/// Parses entity records from a string; `source` names the origin of
	/// every entity.
	pub fn parse_string(
		&self,
		content: &str,
		format: EntityFormat,
		source: &str,
	) -> ReseedResult<Vec<Entity>> {
		let records = match format {
			EntityFormat::Json => self.parse_json(content)?,
			EntityFormat::Yaml => self.parse_yaml(content)?,
		};

		records
			.into_iter()
			.enumerate()
			.map(|(index, record)| {
				let origin = Origin::File {
					path: source.to_string(),
					index,
				};
				self.to_entity(record, origin)
			})
			.collect()
	}

	fn parse_json(&self, content: &str) -> ReseedResult<Vec<EntityRecord>> {
		let value: serde_json::Value = serde_json::from_str(content)?;

		match value {
			serde_json::Value::Array(arr) => {
				let mut records = Vec::with_capacity(arr.len());
				for (idx, item) in arr.into_iter().enumerate() {
					let record: EntityRecord = serde_json::from_value(item).map_err(|e| {
						ReseedError::ParseError(format!("Invalid record at index {}: {}", idx, e))
					})?;
					self.validate_record(&record, idx)?;
					records.push(record);
				}
				Ok(records)
			}
			serde_json::Value::Object(_) => {
				let record: EntityRecord = serde_json::from_value(value)?;
				self.validate_record(&record, 0)?;
				Ok(vec![record])
			}
			_ => Err(ReseedError::ParseError(
				"Expected array or object".to_string(),
			)),
		}
	}

	#[cfg(feature = "yaml")]
	fn parse_yaml(&self, content: &str) -> ReseedResult<Vec<EntityRecord>> {
		let value: serde_yaml::Value = serde_yaml::from_str(content)?;

		match value {
			serde_yaml::Value::Sequence(seq) => {
				let mut records = Vec::with_capacity(seq.len());
				for (idx, item) in seq.into_iter().enumerate() {
					let record: EntityRecord = serde_yaml::from_value(item).map_err(|e| {
						ReseedError::ParseError(format!("Invalid record at index {}: {}", idx, e))
					})?;
					self.validate_record(&record, idx)?;
					records.push(record);
				}
				Ok(records)
			}
			serde_yaml::Value::Mapping(_) => {
				let record: EntityRecord = serde_yaml::from_value(value)?;
				self.validate_record(&record, 0)?;
				Ok(vec![record])
			}
			_ => Err(ReseedError::ParseError(
				"Expected sequence or mapping".to_string(),
			)),
		}
	}

	#[cfg(not(feature = "yaml"))]
	fn parse_yaml(&self, _content: &str) -> ReseedResult<Vec<EntityRecord>> {
		Err(ReseedError::UnsupportedExtension(
			"YAML support requires the 'yaml' feature".to_string(),
		))
	}

	fn validate_record(&self, record: &EntityRecord, index: usize) -> ReseedResult<()> {
		let name = record.entity.trim();
		if name.is_empty() || name.starts_with('.') || name.ends_with('.') {
			return Err(ReseedError::ParseError(format!(
				"Invalid entity name '{}' at index {}",
				record.entity, index
			)));
		}
		Ok(())
	}

	fn to_entity(&self, record: EntityRecord, origin: Origin) -> ReseedResult<Entity> {
		let mut properties = Vec::with_capacity(record.values.len());
		for (name, value) in &record.values {
			let value = CellValue::try_from(value).map_err(|message| ReseedError::InvalidValue {
				entity: record.entity.clone(),
				property: name.clone(),
				message,
				origin: origin.to_string(),
			})?;
			properties.push(Property {
				name: name.clone(),
				value,
			});
		}
		Ok(Entity {
			name: record.entity.trim().to_string(),
			properties,
			origin,
		})
	}
}
