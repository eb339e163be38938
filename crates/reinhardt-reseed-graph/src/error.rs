//! Error types for graph construction and ordering.

use thiserror::Error;

/// Errors raised when the input handed to the graph engine is malformed.
///
/// These are caller bugs (or bugs in an earlier pipeline stage). They are
/// reported, never recovered from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError {
	/// The same item was supplied twice.
	#[error("Duplicate graph item: {item}")]
	DuplicateItem {
		/// Debug rendering of the duplicated item.
		item: String,
	},

	/// A relation names a source item that is not part of the item set.
	#[error("Relation source {source_item} is not a known item (relation {relation})")]
	UnknownRelationSource {
		/// Debug rendering of the missing source.
		source_item: String,
		/// Debug rendering of the offending relation.
		relation: String,
	},

	/// A relation names a target item that is not part of the item set.
	#[error("Relation target {target} is not a known item (relation {relation})")]
	UnknownRelationTarget {
		/// Debug rendering of the missing target.
		target: String,
		/// Debug rendering of the offending relation.
		relation: String,
	},

	/// A node references a target that is not part of the ordered node set.
	#[error("Node {node} references {target}, which is not part of the graph")]
	UnknownReferenceTarget {
		/// Debug rendering of the referencing node's item.
		node: String,
		/// Debug rendering of the missing target.
		target: String,
	},
}

impl GraphError {
	/// Creates a duplicate item error.
	pub fn duplicate_item(item: &impl std::fmt::Debug) -> Self {
		Self::DuplicateItem {
			item: format!("{:?}", item),
		}
	}

	/// Creates an unknown reference target error.
	pub fn unknown_reference_target(
		node: &impl std::fmt::Debug,
		target: &impl std::fmt::Debug,
	) -> Self {
		Self::UnknownReferenceTarget {
			node: format!("{:?}", node),
			target: format!("{:?}", target),
		}
	}
}

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
