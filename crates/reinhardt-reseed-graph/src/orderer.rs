//! Depth-first ordering with cycle detection.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, trace};

use crate::error::{GraphError, GraphResult};
use crate::mutual::MutualReference;
use crate::node::Node;
use crate::ordered::{OrderedGraph, OrderedItem};
use crate::path::ReferencePath;
use crate::relation::Reference;

/// Assigns every node an order such that its dependencies come first.
///
/// Nodes are visited depth first in input order. A node is finalized once
/// all of its non-cyclic dependencies are, receiving the next order value,
/// so its order is strictly greater than theirs. A reference to a node that
/// is still on the traversal path closes a cycle, which is recorded as a
/// [`MutualReference`] instead of being followed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeOrderer;

struct Frame {
	index: usize,
	cursor: usize,
	// Index of the reference of the parent frame that led here.
	via: Option<usize>,
}

struct Traversal<'a, N: Node> {
	nodes: &'a [N],
	positions: HashMap<&'a N::Item, usize>,
	orders: Vec<Option<usize>>,
	path_depth: Vec<Option<usize>>,
	stack: Vec<Frame>,
	next_order: usize,
	mutual_references: Vec<MutualReference<N::Item, N::Association>>,
	// Edges of every recorded cycle, by source index.
	mutual_edges: HashMap<usize, Vec<(usize, Reference<N::Item, N::Association>)>>,
}

impl NodeOrderer {
	/// Creates a new node orderer.
	pub fn new() -> Self {
		Self
	}

	/// Orders `nodes`, collecting every cycle found on the way.
	///
	/// # Errors
	///
	/// Returns an error if a node is supplied twice or references an item
	/// that is not one of `nodes`.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_reseed_graph::{GraphNode, NodeOrderer, Reference};
	///
	/// let nodes = vec![
	/// 	GraphNode::new("Post", vec![Reference::new("FK_Post_Author", "User")]),
	/// 	GraphNode::leaf("User"),
	/// ];
	///
	/// let graph = NodeOrderer::new().order(nodes).unwrap();
	///
	/// assert_eq!(graph.order_of(&"User"), Some(0));
	/// assert_eq!(graph.order_of(&"Post"), Some(1));
	/// assert!(!graph.has_cycles());
	/// ```
	pub fn order<N, I>(&self, nodes: I) -> GraphResult<OrderedGraph<N>>
	where
		N: Node,
		I: IntoIterator<Item = N>,
	{
		let nodes: Vec<N> = nodes.into_iter().collect();
		let (orders, mutual_references) = {
			let mut traversal = Traversal::new(&nodes)?;
			for root in 0..nodes.len() {
				traversal.visit(root)?;
			}
			(traversal.orders, traversal.mutual_references)
		};

		debug!(
			nodes = nodes.len(),
			cycles = mutual_references.len(),
			"ordered graph nodes"
		);

		let items = nodes
			.into_iter()
			.zip(orders)
			.map(|(node, order)| OrderedItem::new(node, order.unwrap_or_default()))
			.collect();
		Ok(OrderedGraph::new(items, mutual_references))
	}
}

impl<'a, N: Node> Traversal<'a, N> {
	fn new(nodes: &'a [N]) -> GraphResult<Self> {
		let mut positions = HashMap::with_capacity(nodes.len());
		for (index, node) in nodes.iter().enumerate() {
			if positions.insert(node.item(), index).is_some() {
				return Err(GraphError::duplicate_item(node.item()));
			}
		}
		Ok(Self {
			nodes,
			positions,
			orders: vec![None; nodes.len()],
			path_depth: vec![None; nodes.len()],
			stack: Vec::new(),
			next_order: 0,
			mutual_references: Vec::new(),
			mutual_edges: HashMap::new(),
		})
	}

	fn visit(&mut self, root: usize) -> GraphResult<()> {
		if self.orders[root].is_some() {
			return Ok(());
		}
		self.enter(root, None);
		let nodes = self.nodes;

		while let Some(top) = self.stack.len().checked_sub(1) {
			let current = self.stack[top].index;
			let cursor = self.stack[top].cursor;
			let node = &nodes[current];

			let Some(reference) = node.references().get(cursor) else {
				self.finalize(current);
				continue;
			};
			self.stack[top].cursor += 1;

			let target = *self.positions.get(&reference.target).ok_or_else(|| {
				GraphError::unknown_reference_target(node.item(), &reference.target)
			})?;

			if let Some(depth) = self.path_depth[target] {
				self.record_back_edge(current, reference, depth);
			} else if self.orders[target].is_none() {
				self.enter(target, Some(cursor));
			} else if self.mutual_edges.contains_key(&target) {
				self.close_cross_edge(current, reference, target);
			}
		}
		Ok(())
	}

	fn enter(&mut self, index: usize, via: Option<usize>) {
		self.path_depth[index] = Some(self.stack.len());
		self.stack.push(Frame {
			index,
			cursor: 0,
			via,
		});
	}

	fn finalize(&mut self, index: usize) {
		self.stack.pop();
		self.path_depth[index] = None;
		self.orders[index] = Some(self.next_order);
		self.next_order += 1;
	}

	/// Returns the current traversal path from the frame at `depth` on.
	fn path_from(&self, depth: usize) -> ReferencePath<N::Item, N::Association> {
		let start = self.nodes[self.stack[depth].index].item().clone();
		let references = self.stack[depth..]
			.windows(2)
			.filter_map(|window| {
				let parent = &self.nodes[window[0].index];
				window[1].via.map(|via| parent.references()[via].clone())
			})
			.collect();
		ReferencePath::from_parts(start, references)
	}

	fn record_back_edge(
		&mut self,
		current: usize,
		reference: &Reference<N::Item, N::Association>,
		depth: usize,
	) {
		let edge = ReferencePath::single(self.nodes[current].item().clone(), reference.clone());
		let closing = self.path_from(depth);
		self.record(MutualReference::new(edge, closing));
	}

	/// Records the cycle closed by a reference into an already ordered node
	/// whose cycle edges lead back onto the current path.
	fn close_cross_edge(
		&mut self,
		current: usize,
		reference: &Reference<N::Item, N::Association>,
		target: usize,
	) {
		let Some((depth, route)) = self.route_to_path(target) else {
			return;
		};
		let edge = ReferencePath::single(self.nodes[current].item().clone(), reference.clone());
		let closing = route.concat(&self.path_from(depth));
		self.record(MutualReference::new(edge, closing));
	}

	/// Searches the recorded cycle edges reachable from `start` for the
	/// shallowest node on the current path.
	///
	/// Taking the shallowest node makes the closing path cover every path
	/// node below it, so all of them join the same group.
	fn route_to_path(
		&self,
		start: usize,
	) -> Option<(usize, ReferencePath<N::Item, N::Association>)> {
		let mut parents: HashMap<usize, (usize, &Reference<N::Item, N::Association>)> =
			HashMap::new();
		let mut seen = HashSet::from([start]);
		let mut queue = VecDeque::from([start]);
		let mut best: Option<(usize, usize)> = None;

		while let Some(index) = queue.pop_front() {
			if let Some(depth) = self.path_depth[index]
				&& best.is_none_or(|(shallowest, _)| depth < shallowest)
			{
				best = Some((depth, index));
			}
			for (next, reference) in self.mutual_edges.get(&index).into_iter().flatten() {
				if seen.insert(*next) {
					parents.insert(*next, (index, reference));
					queue.push_back(*next);
				}
			}
		}

		let (depth, end) = best?;
		let mut references = Vec::new();
		let mut cursor = end;
		while let Some(&(parent, reference)) = parents.get(&cursor) {
			references.push(reference.clone());
			cursor = parent;
		}
		references.reverse();
		let route = ReferencePath::from_parts(self.nodes[start].item().clone(), references);
		Some((depth, route))
	}

	fn record(&mut self, mutual: MutualReference<N::Item, N::Association>) {
		trace!(cycle = %mutual, "recorded mutual reference");
		for relation in mutual.relations() {
			let source = self.positions[&relation.source];
			let target = self.positions[&relation.target];
			let edges = self.mutual_edges.entry(source).or_default();
			let reference = Reference::new(relation.association, relation.target);
			if !edges.iter().any(|(index, known)| *index == target && *known == reference) {
				edges.push((target, reference));
			}
		}
		self.mutual_references.push(mutual);
	}
}
