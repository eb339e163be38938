//! Entities and the providers that supply them.
//!
//! An entity is one row to seed, named after its table and carrying its
//! column values in declaration order. Entity files hold records of the form:
//!
//! ```json
//! [
//!   {
//!     "entity": "dbo.User",
//!     "values": {
//!       "Id": 1,
//!       "Name": "admin",
//!       "ManagerId": null
//!     }
//!   }
//! ]
//! ```
//!
//! A file may also hold a single record object instead of an array.

pub mod file;
pub mod format;
pub mod parser;

use std::fmt;

pub use file::FileEntityProvider;
pub use format::{EntityFormat, EntityRecord};
pub use parser::EntityParser;

use crate::error::ReseedResult;
use crate::value::CellValue;

/// Where an entity was defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
	/// Defined in code, at the given position of its provider.
	Inline {
		/// Position within the provider.
		index: usize,
	},
	/// Read from a file, at the given record position.
	File {
		/// File path as given to the provider.
		path: String,
		/// Record position within the file.
		index: usize,
	},
}

impl fmt::Display for Origin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Inline { index } => write!(f, "inline#{}", index),
			Self::File { path, index } => write!(f, "{}#{}", path, index),
		}
	}
}

/// A named column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
	/// Column name as written by the author.
	pub name: String,
	/// Value to store.
	pub value: CellValue,
}

/// One row to seed, before it is matched against a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
	/// Table name, qualified (`dbo.User`) or bare (`User`).
	pub name: String,
	/// Column values in declaration order.
	pub properties: Vec<Property>,
	/// Where the entity was defined.
	pub origin: Origin,
}

impl Entity {
	/// Creates an inline entity without properties.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			properties: Vec::new(),
			origin: Origin::Inline { index: 0 },
		}
	}

	/// Appends a property.
	pub fn with_property(mut self, name: impl Into<String>, value: impl Into<CellValue>) -> Self {
		self.properties.push(Property {
			name: name.into(),
			value: value.into(),
		});
		self
	}

	/// Sets the origin.
	pub fn with_origin(mut self, origin: Origin) -> Self {
		self.origin = origin;
		self
	}

	/// Returns the value of the property called `name`.
	pub fn property(&self, name: &str) -> Option<&CellValue> {
		self.properties
			.iter()
			.find(|property| property.name == name)
			.map(|property| &property.value)
	}
}

/// A source of entities.
pub trait EntityProvider {
	/// Returns every entity, in source order.
	fn entities(&self) -> ReseedResult<Vec<Entity>>;
}

/// Provides entities defined in code.
#[derive(Debug, Clone, Default)]
pub struct InlineProvider {
	entities: Vec<Entity>,
}

impl InlineProvider {
	/// Creates an empty provider.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an entity, recording its position as origin.
	pub fn with_entity(mut self, entity: Entity) -> Self {
		let index = self.entities.len();
		self.entities
			.push(entity.with_origin(Origin::Inline { index }));
		self
	}

	/// Adds several entities.
	pub fn with_entities(self, entities: impl IntoIterator<Item = Entity>) -> Self {
		entities.into_iter().fold(self, Self::with_entity)
	}
}

impl EntityProvider for InlineProvider {
	fn entities(&self) -> ReseedResult<Vec<Entity>> {
		Ok(self.entities.clone())
	}
}
