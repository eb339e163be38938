//! Matching entities onto table rows.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ReseedError, ReseedResult};
use crate::options::NameMatching;
use crate::provider::Entity;
use crate::row::{Row, RowSet};
use crate::schema::{DatabaseSchema, TableId, TableRef};

/// Turns entities into rows of the schema's tables.
#[derive(Debug, Clone, Copy)]
pub struct RowMatcher<'a> {
	schema: &'a DatabaseSchema,
	matching: NameMatching,
}

impl<'a> RowMatcher<'a> {
	/// Creates a matcher over `schema`.
	pub fn new(schema: &'a DatabaseSchema, matching: NameMatching) -> Self {
		Self { schema, matching }
	}

	/// Matches every entity, keeping entity order within each table.
	///
	/// # Errors
	///
	/// Returns an error if an entity names an unknown or ambiguous table,
	/// sets an unknown column or repeats a primary key value.
	pub fn match_entities(&self, entities: &[Entity]) -> ReseedResult<RowSet> {
		let mut rows = RowSet::new();
		let mut ordinals: HashMap<TableId, usize> = HashMap::new();
		for entity in entities {
			let table = self.resolve_table(entity)?;
			let ordinal = ordinals.entry(table.id().clone()).or_default();
			let row = self.build_row(table, entity, *ordinal)?;
			*ordinal += 1;
			rows.insert(row)?;
		}
		debug!(
			entities = entities.len(),
			tables = rows.tables().len(),
			"matched entities to rows"
		);
		Ok(rows)
	}

	/// Finds the single table `entity` designates.
	pub fn resolve_table(&self, entity: &Entity) -> ReseedResult<&'a TableRef> {
		let candidates = self.schema.find_tables(&entity.name, self.matching);
		match candidates.as_slice() {
			[table] => Ok(*table),
			[] => Err(ReseedError::UnknownTable {
				name: entity.name.clone(),
				origin: entity.origin.to_string(),
			}),
			_ => Err(ReseedError::AmbiguousTable {
				name: entity.name.clone(),
				candidates: candidates.iter().map(|table| table.id().to_string()).collect(),
				origin: entity.origin.to_string(),
			}),
		}
	}

	fn build_row(&self, table: &TableRef, entity: &Entity, ordinal: usize) -> ReseedResult<Row> {
		let mut values = vec![None; table.columns().len()];
		for property in &entity.properties {
			let index = table
				.find_column(&property.name, self.matching)
				.ok_or_else(|| ReseedError::UnknownColumn {
					table: table.id().to_string(),
					column: property.name.clone(),
					origin: entity.origin.to_string(),
				})?;
			if values[index].is_some() {
				return Err(ReseedError::InvalidValue {
					entity: entity.name.clone(),
					property: property.name.clone(),
					message: "column is set more than once".to_string(),
					origin: entity.origin.to_string(),
				});
			}
			values[index] = Some(property.value.clone());
		}
		Ok(Row::new(
			Arc::clone(table),
			values,
			ordinal,
			entity.origin.clone(),
		))
	}
}
