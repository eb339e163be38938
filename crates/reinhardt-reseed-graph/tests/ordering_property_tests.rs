//! Ordering property tests
//!
//! Property-based tests for node ordering, cycle grouping and chunk merging
//! over randomly generated graphs.

use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;
use reinhardt_reseed_graph::prelude::*;
use rstest::*;

type TestNode = GraphNode<usize, u8>;

/// A generated graph: node count, adjacency matrix and node input order.
#[derive(Debug, Clone)]
struct Generated {
	size: usize,
	edges: Vec<Vec<bool>>,
	input: Vec<usize>,
}

impl Generated {
	fn nodes(&self) -> Vec<TestNode> {
		self.input
			.iter()
			.map(|&source| {
				let references = (0..self.size)
					.filter(|&target| self.edges[source][target])
					.map(|target| Reference::new(0, target))
					.collect();
				GraphNode::new(source, references)
			})
			.collect()
	}

	fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		(0..self.size).flat_map(move |source| {
			(0..self.size)
				.filter(move |&target| self.edges[source][target])
				.map(move |target| (source, target))
		})
	}

	/// Strongly connected components containing at least one edge.
	fn cyclic_components(&self) -> BTreeSet<BTreeSet<usize>> {
		let n = self.size;
		let mut reach = self.edges.clone();
		for via in 0..n {
			for from in 0..n {
				for to in 0..n {
					if reach[from][via] && reach[via][to] {
						reach[from][to] = true;
					}
				}
			}
		}
		(0..n)
			.filter(|&item| reach[item][item])
			.map(|item| {
				(0..n)
					.filter(|&other| reach[item][other] && reach[other][item])
					.collect()
			})
			.collect()
	}
}

fn graph_strategy(max_size: usize, density: f64) -> impl Strategy<Value = Generated> {
	(1..=max_size).prop_flat_map(move |size| {
		(
			prop::collection::vec(prop::collection::vec(prop::bool::weighted(density), size), size),
			Just((0..size).collect::<Vec<_>>()).prop_shuffle(),
		)
			.prop_map(move |(edges, input)| Generated { size, edges, input })
	})
}

fn acyclic_strategy(max_size: usize) -> impl Strategy<Value = Generated> {
	graph_strategy(max_size, 0.4).prop_map(|mut generated| {
		for (source, row) in generated.edges.iter_mut().enumerate() {
			row.iter_mut().skip(source).for_each(|edge| *edge = false);
		}
		generated
	})
}

fn group_sets(graph: &OrderedGraph<TestNode>) -> BTreeSet<BTreeSet<usize>> {
	graph
		.mutual_groups()
		.iter()
		.map(|group| group.items().iter().copied().collect())
		.collect()
}

/// Merges `graph` into chunks of items and returns each item's chunk index.
fn chunk_positions(
	graph: &OrderedGraph<TestNode>,
	mode: MutualGroupOrderMode,
) -> (Vec<Vec<usize>>, HashMap<usize, usize>) {
	let chunks: Vec<Vec<usize>> = MutualReferenceResolver::new()
		.merge_chunks(
			graph,
			|run| {
				run.into_iter()
					.map(|ordered| OrderedItem::new(vec![*ordered.value.item()], ordered.order))
					.collect()
			},
			|group, _| OrderedItem::new(group.items().to_vec(), group.order(mode)),
			mode,
		)
		.into_iter()
		.map(|chunk| chunk.value)
		.collect();
	let positions = chunks
		.iter()
		.enumerate()
		.flat_map(|(index, chunk)| chunk.iter().map(move |item| (*item, index)))
		.collect();
	(chunks, positions)
}

// ============================================================================
// Property-Based Tests: NodeOrderer
// ============================================================================

proptest! {
	/// Test: acyclic graphs are topologically ordered
	///
	/// Category: Property
	/// Verifies every node is ordered exactly once, after all of its
	/// dependencies, and that no cycle is reported.
	#[rstest]
	fn prop_acyclic_graph_is_topologically_ordered(generated in acyclic_strategy(10)) {
		let graph = NodeOrderer::new().order(generated.nodes()).unwrap();

		let orders: BTreeSet<usize> = graph.items().iter().map(|item| item.order).collect();
		prop_assert_eq!(orders, (0..generated.size).collect::<BTreeSet<_>>());
		prop_assert!(!graph.has_cycles());
		for (source, target) in generated.edges() {
			prop_assert!(graph.order_of(&source) > graph.order_of(&target));
		}
	}

	/// Test: groups are the cyclic components
	///
	/// Category: Property
	/// Verifies that the mutual groups of any graph are exactly its strongly
	/// connected components that contain a cycle.
	#[rstest]
	fn prop_groups_match_cyclic_components(generated in graph_strategy(8, 0.25)) {
		let graph = NodeOrderer::new().order(generated.nodes()).unwrap();

		prop_assert_eq!(group_sets(&graph), generated.cyclic_components());
	}

	/// Test: edges between groups follow the order
	///
	/// Category: Property
	/// Verifies that every edge not inside a group points to a node with a
	/// lower order.
	#[rstest]
	fn prop_edges_outside_groups_point_backwards(generated in graph_strategy(8, 0.25)) {
		let graph = NodeOrderer::new().order(generated.nodes()).unwrap();
		let groups = graph.mutual_groups();

		for (source, target) in generated.edges() {
			let shared = groups
				.iter()
				.any(|group| group.contains(&source) && group.contains(&target));
			if !shared {
				prop_assert!(graph.order_of(&source) > graph.order_of(&target));
			}
		}
	}

	/// Test: a single cycle forms one group
	///
	/// Category: Property
	/// Verifies that a cycle of k nodes with acyclic dependencies and
	/// dependents around it yields one group of exactly k members.
	#[rstest]
	fn prop_single_cycle_forms_one_group(
		cycle_length in 1usize..6,
		upstream in 0usize..4,
		downstream in 0usize..4,
		input_seed in any::<u64>(),
	) {
		// Cycle members are 0..k, upstream leaves follow, then dependents.
		let first_upstream = cycle_length;
		let first_downstream = cycle_length + upstream;
		let mut nodes = Vec::new();
		for member in 0..cycle_length {
			let mut references = vec![Reference::new(0u8, (member + 1) % cycle_length)];
			references.extend((first_upstream..first_downstream).map(|leaf| Reference::new(1, leaf)));
			nodes.push(GraphNode::new(member, references));
		}
		for leaf in first_upstream..first_downstream {
			nodes.push(GraphNode::leaf(leaf));
		}
		for (offset, dependent) in (first_downstream..first_downstream + downstream).enumerate() {
			nodes.push(GraphNode::new(dependent, vec![Reference::new(2, offset % cycle_length)]));
		}
		let rotation = (input_seed % nodes.len() as u64) as usize;
		nodes.rotate_left(rotation);

		let graph = NodeOrderer::new().order(nodes).unwrap();

		let groups = graph.mutual_groups();
		prop_assert_eq!(groups.len(), 1);
		prop_assert_eq!(groups[0].len(), cycle_length);
		prop_assert!((0..cycle_length).all(|member| groups[0].contains(&member)));
	}
}

// ============================================================================
// Property-Based Tests: MutualGroup
// ============================================================================

proptest! {
	/// Test: group construction ignores cycle order
	///
	/// Category: Property
	/// Verifies that building groups from any permutation of the recorded
	/// mutual references gives the same groups.
	#[rstest]
	fn prop_group_build_is_permutation_independent(
		(generated, permutation) in graph_strategy(8, 0.3).prop_flat_map(|generated| {
			let count = NodeOrderer::new()
				.order(generated.nodes())
				.map_or(0, |graph| graph.mutual_references().len());
			(Just(generated), Just((0..count).collect::<Vec<_>>()).prop_shuffle())
		})
	) {
		let graph = NodeOrderer::new().order(generated.nodes()).unwrap();
		let shuffled: Vec<_> = permutation
			.iter()
			.map(|&index| graph.mutual_references()[index].clone())
			.collect();

		let rebuilt = MutualGroup::build(&shuffled, |item| graph.order_of(item));

		prop_assert_eq!(rebuilt, graph.mutual_groups());
	}
}

// ============================================================================
// Property-Based Tests: MutualReferenceResolver
// ============================================================================

proptest! {
	/// Test: insertion chunks respect every dependency
	///
	/// Category: Property
	/// Verifies that with the latest-member placement every edge between two
	/// chunks points to an earlier chunk.
	#[rstest]
	fn prop_max_mode_chunks_follow_dependencies(generated in graph_strategy(8, 0.25)) {
		let graph = NodeOrderer::new().order(generated.nodes()).unwrap();

		let (chunks, positions) = chunk_positions(&graph, MutualGroupOrderMode::Max);

		prop_assert_eq!(chunks.iter().map(Vec::len).sum::<usize>(), generated.size);
		for (source, target) in generated.edges() {
			prop_assert!(positions[&source] >= positions[&target]);
		}
	}

	/// Test: cleanup chunks mirror insertion chunks
	///
	/// Category: Property
	/// Verifies that merging the reversed graph with the earliest-member
	/// placement yields the insertion chunks in reverse.
	#[rstest]
	fn prop_reversed_min_mode_mirrors_max_mode(generated in graph_strategy(8, 0.25)) {
		let graph = NodeOrderer::new().order(generated.nodes()).unwrap();

		let (insert, _) = chunk_positions(&graph, MutualGroupOrderMode::Max);
		let (cleanup, _) = chunk_positions(&graph.clone().reverse(), MutualGroupOrderMode::Min);

		let mut expected: Vec<BTreeSet<usize>> =
			insert.into_iter().map(|chunk| chunk.into_iter().collect()).collect();
		expected.reverse();
		let actual: Vec<BTreeSet<usize>> =
			cleanup.into_iter().map(|chunk| chunk.into_iter().collect()).collect();
		prop_assert_eq!(actual, expected);
	}
}
