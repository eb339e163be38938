//! Ordering results.

use std::collections::{HashMap, HashSet};

use crate::mutual::{MutualGroup, MutualReference};
use crate::node::Node;

/// A value tagged with its position in an ordering.
///
/// Orders start at 0 and are assigned by [`NodeOrderer`](crate::NodeOrderer).
/// They are not guaranteed contiguous after merging; only relative order
/// matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderedItem<T> {
	/// The ordered value.
	pub value: T,
	/// Position of the value; dependencies come first.
	pub order: usize,
}

impl<T> OrderedItem<T> {
	/// Creates a new ordered item.
	pub fn new(value: T, order: usize) -> Self {
		Self { value, order }
	}

	/// Maps the value, keeping the order.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OrderedItem<U> {
		OrderedItem::new(f(self.value), self.order)
	}
}

/// Every node of a graph with its order, plus the cycles found on the way.
#[derive(Debug, Clone)]
pub struct OrderedGraph<N: Node> {
	items: Vec<OrderedItem<N>>,
	// Item -> index into `items`.
	positions: HashMap<N::Item, usize>,
	mutual_references: Vec<MutualReference<N::Item, N::Association>>,
}

impl<N: Node> OrderedGraph<N> {
	/// Creates a graph from ordered nodes and the mutual references among them.
	pub fn new(
		mut items: Vec<OrderedItem<N>>,
		mutual_references: Vec<MutualReference<N::Item, N::Association>>,
	) -> Self {
		items.sort_by_key(|item| item.order);
		Self::from_sorted(items, mutual_references)
	}

	fn from_sorted(
		items: Vec<OrderedItem<N>>,
		mutual_references: Vec<MutualReference<N::Item, N::Association>>,
	) -> Self {
		let positions = items
			.iter()
			.enumerate()
			.map(|(index, ordered)| (ordered.value.item().clone(), index))
			.collect();
		Self {
			items,
			positions,
			mutual_references,
		}
	}

	/// Returns the ordered nodes, ascending.
	pub fn items(&self) -> &[OrderedItem<N>] {
		&self.items
	}

	/// Iterates over the nodes in order.
	pub fn nodes(&self) -> impl Iterator<Item = &N> {
		self.items.iter().map(|item| &item.value)
	}

	/// Consumes the graph, returning the nodes in order.
	pub fn into_nodes(self) -> Vec<N> {
		self.items.into_iter().map(|item| item.value).collect()
	}

	/// Returns every recorded cycle.
	pub fn mutual_references(&self) -> &[MutualReference<N::Item, N::Association>] {
		&self.mutual_references
	}

	/// Returns true if at least one cycle was recorded.
	pub fn has_cycles(&self) -> bool {
		!self.mutual_references.is_empty()
	}

	/// Returns the number of nodes.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Returns true if the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Returns the ordered node identified by `item`.
	pub fn get(&self, item: &N::Item) -> Option<&OrderedItem<N>> {
		self.positions.get(item).map(|&index| &self.items[index])
	}

	/// Returns the order of the node identified by `item`.
	pub fn order_of(&self, item: &N::Item) -> Option<usize> {
		self.get(item).map(|ordered| ordered.order)
	}

	/// Unions the recorded cycles into maximal groups.
	pub fn mutual_groups(&self) -> Vec<MutualGroup<N::Item, N::Association>> {
		MutualGroup::build(&self.mutual_references, |item| self.order_of(item))
	}

	/// Keeps the nodes matching `predicate`, leaving their references as is.
	///
	/// Cycles touching a dropped node are dropped with it.
	pub fn filter<P>(self, mut predicate: P) -> Self
	where
		P: FnMut(&N) -> bool,
	{
		let items: Vec<_> = self
			.items
			.into_iter()
			.filter(|ordered| predicate(&ordered.value))
			.collect();
		let mutual_references = retain_mutual(self.mutual_references, &items);
		Self::from_sorted(items, mutual_references)
	}

	/// Keeps the nodes matching `predicate` and strips every reference that
	/// pointed at a dropped node.
	pub fn filter_deep<P>(self, predicate: P) -> Self
	where
		P: FnMut(&N) -> bool,
	{
		let Self {
			items,
			positions: kept,
			mutual_references,
		} = self.filter(predicate);
		let items = items
			.into_iter()
			.map(|ordered| {
				ordered.map(|node| {
					if node.references().iter().all(|r| kept.contains_key(&r.target)) {
						return node;
					}
					let references = node
						.references()
						.iter()
						.filter(|reference| kept.contains_key(&reference.target))
						.cloned()
						.collect();
					node.with_references(references)
				})
			})
			.collect();
		Self {
			items,
			positions: kept,
			mutual_references,
		}
	}

	/// Maps every node into another node type over the same items.
	pub fn map<M, F>(self, mut f: F) -> OrderedGraph<M>
	where
		M: Node<Item = N::Item, Association = N::Association>,
		F: FnMut(N) -> M,
	{
		let items = self
			.items
			.into_iter()
			.map(|ordered| ordered.map(&mut f))
			.collect();
		OrderedGraph::from_sorted(items, self.mutual_references)
	}

	/// Mirrors the order so that dependents come first.
	///
	/// The highest order becomes 0; cycles are kept as they are.
	pub fn reverse(self) -> Self {
		let max = self.items.last().map_or(0, |ordered| ordered.order);
		let items = self
			.items
			.into_iter()
			.rev()
			.map(|ordered| OrderedItem::new(ordered.value, max - ordered.order))
			.collect();
		Self::from_sorted(items, self.mutual_references)
	}
}

fn retain_mutual<N: Node>(
	mutual_references: Vec<MutualReference<N::Item, N::Association>>,
	items: &[OrderedItem<N>],
) -> Vec<MutualReference<N::Item, N::Association>> {
	let kept: HashSet<&N::Item> = items.iter().map(|ordered| ordered.value.item()).collect();
	mutual_references
		.into_iter()
		.filter(|mutual| mutual.items().iter().all(|item| kept.contains(item)))
		.collect()
}
