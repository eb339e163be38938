//! Merging an ordered graph and its cycles into a single sequence.

use std::collections::HashMap;

use tracing::debug;

use crate::mutual::{MutualGroup, MutualGroupOrderMode};
use crate::node::Node;
use crate::ordered::{OrderedGraph, OrderedItem};

/// Turns an [`OrderedGraph`] into a sequence where every [`MutualGroup`]
/// occupies exactly one slot.
#[derive(Debug, Default, Clone, Copy)]
pub struct MutualReferenceResolver;

impl MutualReferenceResolver {
	/// Creates a new resolver.
	pub fn new() -> Self {
		Self
	}

	/// Walks the graph in order, handing runs of ungrouped nodes to
	/// `merge_usual` and every group, once, to `merge_mutual`.
	///
	/// A group is emitted at the position of its earliest member for
	/// [`MutualGroupOrderMode::Min`] and of its latest member for
	/// [`MutualGroupOrderMode::Max`]; pending ungrouped nodes are flushed
	/// right before it. Ungrouped nodes keep their relative order.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_reseed_graph::{
	/// 	GraphNode, MutualGroupOrderMode, MutualReferenceResolver, Node, NodeOrderer,
	/// 	OrderedItem, Reference,
	/// };
	///
	/// let nodes = vec![
	/// 	GraphNode::new("a", vec![Reference::new(1, "b")]),
	/// 	GraphNode::new("b", vec![Reference::new(2, "a")]),
	/// 	GraphNode::leaf("c"),
	/// ];
	/// let graph = NodeOrderer::new().order(nodes).unwrap();
	///
	/// let merged = MutualReferenceResolver::new().merge_chunks(
	/// 	&graph,
	/// 	|run| {
	/// 		run.into_iter()
	/// 			.map(|item| OrderedItem::new(vec![*item.value.item()], item.order))
	/// 			.collect()
	/// 	},
	/// 	|group, _| OrderedItem::new(group.items().to_vec(), group.max_order()),
	/// 	MutualGroupOrderMode::Max,
	/// );
	///
	/// assert_eq!(merged.len(), 2);
	/// assert_eq!(merged[0].value, vec!["b", "a"]);
	/// assert_eq!(merged[1].value, vec!["c"]);
	/// ```
	pub fn merge_chunks<N, O, FU, FM>(
		&self,
		graph: &OrderedGraph<N>,
		mut merge_usual: FU,
		mut merge_mutual: FM,
		order_mode: MutualGroupOrderMode,
	) -> Vec<OrderedItem<O>>
	where
		N: Node,
		FU: FnMut(Vec<&OrderedItem<N>>) -> Vec<OrderedItem<O>>,
		FM: FnMut(&MutualGroup<N::Item, N::Association>, Vec<&OrderedItem<N>>) -> OrderedItem<O>,
	{
		let groups = graph.mutual_groups();
		let mut membership: HashMap<&N::Item, usize> = HashMap::new();
		for (index, group) in groups.iter().enumerate() {
			for item in group.items() {
				membership.insert(item, index);
			}
		}

		let mut members: Vec<Vec<&OrderedItem<N>>> = vec![Vec::new(); groups.len()];
		for ordered in graph.items() {
			if let Some(&group) = membership.get(ordered.value.item()) {
				members[group].push(ordered);
			}
		}

		let mut emitted = vec![false; groups.len()];
		let mut pending: Vec<&OrderedItem<N>> = Vec::new();
		let mut merged = Vec::with_capacity(graph.len());

		for ordered in graph.items() {
			let Some(&group) = membership.get(ordered.value.item()) else {
				pending.push(ordered);
				continue;
			};
			if emitted[group] || ordered.order != groups[group].order(order_mode) {
				continue;
			}
			if !pending.is_empty() {
				merged.extend(merge_usual(std::mem::take(&mut pending)));
			}
			merged.push(merge_mutual(&groups[group], std::mem::take(&mut members[group])));
			emitted[group] = true;
		}
		if !pending.is_empty() {
			merged.extend(merge_usual(pending));
		}

		debug!(
			nodes = graph.len(),
			groups = groups.len(),
			chunks = merged.len(),
			mode = ?order_mode,
			"merged ordered chunks"
		);
		merged
	}
}
