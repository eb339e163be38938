//! The node contract shared by the builder, the orderer and the resolver.

use crate::relation::{GraphItem, Reference};

/// A vertex of a dependency graph: an item plus its outgoing references.
pub trait Node {
	/// The value identifying this node.
	type Item: GraphItem;
	/// The descriptor carried by every outgoing edge.
	type Association: GraphItem;

	/// Returns the identifying item.
	fn item(&self) -> &Self::Item;

	/// Returns the outgoing references of this node.
	fn references(&self) -> &[Reference<Self::Item, Self::Association>];

	/// Returns a copy of this node carrying `references` instead of its own.
	fn with_references(&self, references: Vec<Reference<Self::Item, Self::Association>>) -> Self
	where
		Self: Sized;
}

/// A node that accepts references after construction.
///
/// [`NodeBuilder`](crate::NodeBuilder) is the only caller: it appends
/// cyclic back-references once every node of the graph exists.
pub trait MutableNode: Node {
	/// Appends references to this node.
	fn add_references<I>(&mut self, references: I)
	where
		I: IntoIterator<Item = Reference<Self::Item, Self::Association>>;
}

/// The default node implementation: an item and a list of references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode<T, A> {
	item: T,
	references: Vec<Reference<T, A>>,
}

impl<T, A> GraphNode<T, A> {
	/// Creates a node with the given outgoing references.
	pub fn new(item: T, references: Vec<Reference<T, A>>) -> Self {
		Self { item, references }
	}

	/// Creates a node without outgoing references.
	pub fn leaf(item: T) -> Self {
		Self::new(item, Vec::new())
	}

	/// Consumes the node, returning its item.
	pub fn into_item(self) -> T {
		self.item
	}
}

impl<T: GraphItem, A: GraphItem> Node for GraphNode<T, A> {
	type Item = T;
	type Association = A;

	fn item(&self) -> &T {
		&self.item
	}

	fn references(&self) -> &[Reference<T, A>] {
		&self.references
	}

	fn with_references(&self, references: Vec<Reference<T, A>>) -> Self {
		Self::new(self.item.clone(), references)
	}
}

impl<T: GraphItem, A: GraphItem> MutableNode for GraphNode<T, A> {
	fn add_references<I>(&mut self, references: I)
	where
		I: IntoIterator<Item = Reference<T, A>>,
	{
		self.references.extend(references);
	}
}
