//! Cycles discovered during ordering and their maximal groups.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::path::ReferencePath;
use crate::relation::{GraphItem, Relation};

/// A cycle closed by two reference paths.
///
/// `left` runs from one participant to another and `right` runs back, so
/// `left.target() == right.source()` and `right.target() == left.source()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutualReference<T, A> {
	left: ReferencePath<T, A>,
	right: ReferencePath<T, A>,
}

impl<T: GraphItem, A: GraphItem> MutualReference<T, A> {
	/// Creates a mutual reference from two paths closing a cycle.
	///
	/// # Panics
	///
	/// Panics if the paths do not close a cycle. Only the orderer builds
	/// these, so a mismatch is a bug in the traversal.
	pub fn new(left: ReferencePath<T, A>, right: ReferencePath<T, A>) -> Self {
		assert!(
			left.target() == right.source() && right.target() == left.source(),
			"paths {} and {} do not close a cycle",
			left,
			right
		);
		Self { left, right }
	}

	/// Returns the path from the first participant to the second.
	pub fn left(&self) -> &ReferencePath<T, A> {
		&self.left
	}

	/// Returns the path leading back to the first participant.
	pub fn right(&self) -> &ReferencePath<T, A> {
		&self.right
	}

	/// Returns every participant of the cycle, each once, in path order.
	pub fn items(&self) -> Vec<&T> {
		let mut seen = HashSet::new();
		self.left
			.items()
			.chain(self.right.items())
			.filter(|item| seen.insert(*item))
			.collect()
	}

	/// Returns true if `item` takes part in the cycle.
	pub fn contains(&self, item: &T) -> bool {
		self.left.contains(item) || self.right.contains(item)
	}

	/// Returns every edge of the cycle, each once.
	pub fn relations(&self) -> Vec<Relation<T, A>> {
		let mut seen = HashSet::new();
		self.left
			.relations()
			.chain(self.right.relations())
			.filter(|relation| seen.insert(relation.clone()))
			.collect()
	}
}

impl<T: fmt::Debug, A> fmt::Display for MutualReference<T, A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}] <-> [{}]", self.left, self.right)
	}
}

/// Selects which member position a [`MutualGroup`] takes in a merged order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutualGroupOrderMode {
	/// The group takes the position of its earliest member.
	///
	/// Used for cleanup: everything ordered before the group is cleaned
	/// first, everything else after it.
	Min,
	/// The group takes the position of its latest member.
	///
	/// Used for insertion: the group is emitted only once everything any of
	/// its members depends on already exists.
	Max,
}

/// A maximal set of items connected by mutual references.
#[derive(Debug, Clone)]
pub struct MutualGroup<T, A> {
	items: Vec<T>,
	members: HashSet<T>,
	relations: Vec<Relation<T, A>>,
	min_order: usize,
	max_order: usize,
}

impl<T: GraphItem, A: GraphItem> PartialEq for MutualGroup<T, A> {
	fn eq(&self, other: &Self) -> bool {
		// `members` mirrors `items`.
		self.items == other.items
			&& self.relations == other.relations
			&& self.min_order == other.min_order
			&& self.max_order == other.max_order
	}
}

impl<T: GraphItem, A: GraphItem> Eq for MutualGroup<T, A> {}

/// Union-find over item indices, with path halving and union by size.
struct DisjointSets {
	parents: Vec<usize>,
	sizes: Vec<usize>,
}

impl DisjointSets {
	fn new() -> Self {
		Self {
			parents: Vec::new(),
			sizes: Vec::new(),
		}
	}

	fn push(&mut self) -> usize {
		let index = self.parents.len();
		self.parents.push(index);
		self.sizes.push(1);
		index
	}

	fn find(&mut self, mut index: usize) -> usize {
		while self.parents[index] != index {
			self.parents[index] = self.parents[self.parents[index]];
			index = self.parents[index];
		}
		index
	}

	fn union(&mut self, left: usize, right: usize) {
		let (mut left, mut right) = (self.find(left), self.find(right));
		if left == right {
			return;
		}
		if self.sizes[left] < self.sizes[right] {
			std::mem::swap(&mut left, &mut right);
		}
		self.parents[right] = left;
		self.sizes[left] += self.sizes[right];
	}
}

impl<T: GraphItem, A: GraphItem> MutualGroup<T, A> {
	/// Unions mutual references sharing at least one item into groups.
	///
	/// `order_of` supplies each item's order; items are listed in ascending
	/// order and groups are returned sorted by their earliest member. The
	/// result does not depend on the order of `mutual_references`.
	///
	/// Runs in time linear in the total length of the recorded paths.
	pub fn build<F>(mutual_references: &[MutualReference<T, A>], order_of: F) -> Vec<Self>
	where
		F: Fn(&T) -> Option<usize>,
	{
		let mut positions: HashMap<&T, usize> = HashMap::new();
		let mut items: Vec<&T> = Vec::new();
		let mut sets = DisjointSets::new();

		for mutual in mutual_references {
			let mut first = None;
			for item in mutual.left.items().chain(mutual.right.items()) {
				let index = *positions.entry(item).or_insert_with(|| {
					items.push(item);
					sets.push()
				});
				match first {
					Some(first) => sets.union(first, index),
					None => first = Some(index),
				}
			}
		}

		// Root index -> (members, relations, seen relations).
		let mut parts: HashMap<usize, (Vec<T>, Vec<Relation<T, A>>, HashSet<Relation<T, A>>)> =
			HashMap::new();
		for (index, item) in items.iter().enumerate() {
			let root = sets.find(index);
			parts.entry(root).or_default().0.push((*item).clone());
		}
		for mutual in mutual_references {
			for relation in mutual.left.relations().chain(mutual.right.relations()) {
				let root = sets.find(positions[&relation.source]);
				let (_, relations, seen) = parts.entry(root).or_default();
				if seen.insert(relation.clone()) {
					relations.push(relation);
				}
			}
		}

		let mut groups: Vec<Self> = parts
			.into_values()
			.map(|(items, relations, _)| Self::from_parts(items, relations, &order_of))
			.collect();
		groups.sort_by_key(|group| (group.min_order, group.max_order));
		groups
	}

	fn from_parts<F>(items: Vec<T>, mut relations: Vec<Relation<T, A>>, order_of: &F) -> Self
	where
		F: Fn(&T) -> Option<usize>,
	{
		let mut items: Vec<(Option<usize>, T)> = items
			.into_iter()
			.map(|item| (order_of(&item), item))
			.collect();
		items.sort_by_key(|(order, _)| *order);

		let orders = items.iter().filter_map(|(order, _)| *order);
		let min_order = orders.clone().min().unwrap_or(0);
		let max_order = orders.max().unwrap_or(0);

		relations.sort_by_key(|relation| (order_of(&relation.source), order_of(&relation.target)));

		let items: Vec<T> = items.into_iter().map(|(_, item)| item).collect();
		Self {
			members: items.iter().cloned().collect(),
			items,
			relations,
			min_order,
			max_order,
		}
	}

	/// Returns the members in ascending order.
	pub fn items(&self) -> &[T] {
		&self.items
	}

	/// Returns the edges along the recorded cycles.
	pub fn relations(&self) -> &[Relation<T, A>] {
		&self.relations
	}

	/// Returns true if `item` is a member.
	pub fn contains(&self, item: &T) -> bool {
		self.members.contains(item)
	}

	/// Returns the number of members.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Returns true if the group has no members.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Returns the order of the earliest member.
	pub fn min_order(&self) -> usize {
		self.min_order
	}

	/// Returns the order of the latest member.
	pub fn max_order(&self) -> usize {
		self.max_order
	}

	/// Returns the position the group takes under `mode`.
	pub fn order(&self, mode: MutualGroupOrderMode) -> usize {
		match mode {
			MutualGroupOrderMode::Min => self.min_order,
			MutualGroupOrderMode::Max => self.max_order,
		}
	}
}
