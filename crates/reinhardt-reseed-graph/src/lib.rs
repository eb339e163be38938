//! Dependency ordering with cycle detection for the Reinhardt reseeding tools.
//!
//! This crate orders the vertices of a dependency graph so that every vertex
//! comes after everything it depends on, and finds the places where that is
//! impossible because dependencies form a cycle.
//!
//! # Pipeline
//!
//! 1. [`NodeBuilder`] turns flat items and [`Relation`]s into [`Node`]s,
//!    attaching cyclic back-references only after every node exists.
//! 2. [`NodeOrderer`] assigns each node an order depth first and records each
//!    cycle it closes as a [`MutualReference`], producing an [`OrderedGraph`].
//! 3. [`MutualReferenceResolver`] unions the cycles into [`MutualGroup`]s and
//!    merges groups and ungrouped nodes into one ordered sequence, placing each
//!    group at its earliest or latest member per [`MutualGroupOrderMode`].
//!
//! Identity is by value: items are compared and hashed, never addressed by
//! pointer. Nothing is shared between calls; every run is a pure function
//! of its input.
//!
//! # Example
//!
//! ```
//! use reinhardt_reseed_graph::prelude::*;
//!
//! let items = ["Comment", "Post", "User"];
//! let relations = [
//! 	Relation::new("Comment", "Post", "FK_Comment_Post"),
//! 	Relation::new("Post", "User", "FK_Post_Author"),
//! ];
//!
//! let nodes: Vec<GraphNode<&str, &str>> = NodeBuilder::new()
//! 	.collect_nodes(
//! 		&items,
//! 		&relations,
//! 		|relation, target: &GraphNode<&str, &str>| {
//! 			Reference::new(relation.association, *target.item())
//! 		},
//! 		|item, references| GraphNode::new(*item, references),
//! 	)
//! 	.unwrap();
//! let graph = NodeOrderer::new().order(nodes).unwrap();
//!
//! let order: Vec<_> = graph.nodes().map(|node| *node.item()).collect();
//! assert_eq!(order, ["User", "Post", "Comment"]);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod builder;
pub mod error;
pub mod mutual;
pub mod node;
pub mod ordered;
pub mod orderer;
pub mod path;
pub mod relation;
pub mod resolver;

pub use builder::NodeBuilder;
pub use error::{GraphError, GraphResult};
pub use mutual::{MutualGroup, MutualGroupOrderMode, MutualReference};
pub use node::{GraphNode, MutableNode, Node};
pub use ordered::{OrderedGraph, OrderedItem};
pub use orderer::NodeOrderer;
pub use path::ReferencePath;
pub use relation::{GraphItem, Reference, Relation};
pub use resolver::MutualReferenceResolver;

/// Convenience re-exports.
pub mod prelude {
	pub use crate::{
		GraphError, GraphItem, GraphNode, GraphResult, MutableNode, MutualGroup,
		MutualGroupOrderMode, MutualReference, MutualReferenceResolver, Node, NodeBuilder,
		NodeOrderer, OrderedGraph, OrderedItem, Reference, ReferencePath, Relation,
	};
}
