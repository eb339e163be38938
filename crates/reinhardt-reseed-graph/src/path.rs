//! Reference chains recorded while traversing a graph.

use std::fmt;

use crate::relation::{GraphItem, Reference, Relation};

/// An immutable chain starting at `source` and following `references`.
///
/// Paths are only built while a cycle is being recorded: one path for the
/// closing back-edge and one for the part of the traversal it closes over.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferencePath<T, A> {
	source: T,
	references: Vec<Reference<T, A>>,
}

impl<T: GraphItem, A: GraphItem> ReferencePath<T, A> {
	/// Creates an empty path positioned at `source`.
	pub fn new(source: T) -> Self {
		Self {
			source,
			references: Vec::new(),
		}
	}

	/// Creates a path consisting of a single edge.
	pub fn single(source: T, reference: Reference<T, A>) -> Self {
		Self {
			source,
			references: vec![reference],
		}
	}

	/// Creates a path from `source` following `references` in order.
	pub fn from_parts(source: T, references: Vec<Reference<T, A>>) -> Self {
		Self { source, references }
	}

	/// Returns the first item of the path.
	pub fn source(&self) -> &T {
		&self.source
	}

	/// Returns the last item of the path (the source for an empty path).
	pub fn target(&self) -> &T {
		self.references
			.last()
			.map_or(&self.source, |reference| &reference.target)
	}

	/// Returns the followed references in order.
	pub fn references(&self) -> &[Reference<T, A>] {
		&self.references
	}

	/// Returns the number of edges in the path.
	pub fn len(&self) -> usize {
		self.references.len()
	}

	/// Returns true if the path has no edges.
	pub fn is_empty(&self) -> bool {
		self.references.is_empty()
	}

	/// Returns a new path extended by `reference`.
	pub fn append(&self, reference: Reference<T, A>) -> Self {
		let mut references = self.references.clone();
		references.push(reference);
		Self {
			source: self.source.clone(),
			references,
		}
	}

	/// Returns this path followed by `other`.
	///
	/// # Panics
	///
	/// Panics if `other` does not start where this path ends.
	pub fn concat(&self, other: &Self) -> Self {
		assert!(
			self.target() == other.source(),
			"cannot join path {} with path {}: {:?} != {:?}",
			self,
			other,
			self.target(),
			other.source()
		);
		let mut references = self.references.clone();
		references.extend(other.references.iter().cloned());
		Self {
			source: self.source.clone(),
			references,
		}
	}

	/// Iterates over every item visited by the path, source first.
	pub fn items(&self) -> impl Iterator<Item = &T> {
		std::iter::once(&self.source).chain(self.references.iter().map(|r| &r.target))
	}

	/// Returns true if the path visits `item`.
	pub fn contains(&self, item: &T) -> bool {
		self.items().any(|visited| visited == item)
	}

	/// Returns the tail of the path beginning at the first visit of `item`.
	///
	/// Returns `None` if the path does not visit `item`.
	pub fn start_from(&self, item: &T) -> Option<Self> {
		let position = self.items().position(|visited| visited == item)?;
		let source = if position == 0 {
			self.source.clone()
		} else {
			self.references[position - 1].target.clone()
		};
		Some(Self {
			source,
			references: self.references[position..].to_vec(),
		})
	}

	/// Materializes every edge of the path into a relation.
	pub fn relations(&self) -> impl Iterator<Item = Relation<T, A>> + '_ {
		let sources = self.items();
		sources
			.zip(self.references.iter())
			.map(|(source, reference)| reference.to_relation(source.clone()))
	}
}

impl<T: fmt::Debug, A> fmt::Display for ReferencePath<T, A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}", self.source)?;
		for reference in &self.references {
			write!(f, " -> {:?}", reference.target)?;
		}
		Ok(())
	}
}
