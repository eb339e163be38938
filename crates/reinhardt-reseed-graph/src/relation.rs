//! Directed edges between graph items.
//!
//! A [`Relation`] is a materialized edge with an explicit source, used as
//! input to [`NodeBuilder`](crate::NodeBuilder). A [`Reference`] is the same
//! edge seen from the owning node: association plus target only.

use std::fmt;
use std::hash::Hash;

/// Bounds every graph item and association must satisfy.
///
/// Identity is by value: two items are the same vertex when they compare
/// equal, so `Eq` and `Hash` must agree with the business identity of the
/// value (a table's qualified name, a row's primary key).
pub trait GraphItem: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> GraphItem for T {}

/// A directed edge from `source` to `target` through `association`.
///
/// For the table graph the association is a foreign key; `source` is the
/// referencing table and `target` the referenced one, so the target has to be
/// inserted first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation<T, A> {
	/// The referencing item.
	pub source: T,
	/// The referenced item.
	pub target: T,
	/// What links the two (e.g. a foreign key).
	pub association: A,
}

impl<T, A> Relation<T, A> {
	/// Creates a new relation.
	pub fn new(source: T, target: T, association: A) -> Self {
		Self {
			source,
			target,
			association,
		}
	}
}

impl<T: Clone, A: Clone> Relation<T, A> {
	/// Returns the relation as seen from its source node.
	pub fn reference(&self) -> Reference<T, A> {
		Reference::new(self.association.clone(), self.target.clone())
	}
}

impl<T: fmt::Debug, A: fmt::Debug> fmt::Display for Relation<T, A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{:?} -[{:?}]-> {:?}",
			self.source, self.association, self.target
		)
	}
}

/// An outgoing edge owned by a node: association and target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference<T, A> {
	/// What links the owning node to the target.
	pub association: A,
	/// The referenced item.
	pub target: T,
}

impl<T, A> Reference<T, A> {
	/// Creates a new reference.
	pub fn new(association: A, target: T) -> Self {
		Self {
			association,
			target,
		}
	}
}

impl<T: Clone, A: Clone> Reference<T, A> {
	/// Materializes the reference into a relation starting at `source`.
	pub fn to_relation(&self, source: T) -> Relation<T, A> {
		Relation::new(source, self.target.clone(), self.association.clone())
	}
}
