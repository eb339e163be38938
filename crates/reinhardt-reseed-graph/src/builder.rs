//! Node construction from flat relation lists.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::node::MutableNode;
use crate::relation::{GraphItem, Reference, Relation};

/// Builds graph nodes out of items and the relations between them.
///
/// Nodes are built depth first so that every non-cyclic reference can be
/// created from an already built target node. References that close a cycle
/// (their target is still being built) are deferred and appended through
/// [`MutableNode::add_references`] once every node exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeBuilder;

struct Frame<'a, T, A> {
	index: usize,
	cursor: usize,
	resolved: Vec<&'a Relation<T, A>>,
}

impl NodeBuilder {
	/// Creates a new node builder.
	pub fn new() -> Self {
		Self
	}

	/// Builds exactly one node per item, in item order.
	///
	/// `create_reference` turns a relation into a reference given the built
	/// target node; `create_node` builds a node from an item and its resolved
	/// non-cyclic references.
	///
	/// # Errors
	///
	/// Returns an error if an item is supplied twice or a relation names an
	/// item that is not in `items`.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_reseed_graph::{GraphNode, Node, NodeBuilder, Reference, Relation};
	///
	/// let items = ["Post", "User"];
	/// let relations = [Relation::new("Post", "User", "FK_Post_Author")];
	///
	/// let nodes: Vec<GraphNode<&str, &str>> = NodeBuilder::new()
	/// 	.collect_nodes(
	/// 		&items,
	/// 		&relations,
	/// 		|relation, target: &GraphNode<&str, &str>| {
	/// 			Reference::new(relation.association, *target.item())
	/// 		},
	/// 		|item, references| GraphNode::new(*item, references),
	/// 	)
	/// 	.unwrap();
	///
	/// assert_eq!(nodes[0].references()[0].target, "User");
	/// assert!(nodes[1].references().is_empty());
	/// ```
	pub fn collect_nodes<T, A, N, FR, FN>(
		&self,
		items: &[T],
		relations: &[Relation<T, A>],
		mut create_reference: FR,
		mut create_node: FN,
	) -> GraphResult<Vec<N>>
	where
		T: GraphItem,
		A: GraphItem,
		N: MutableNode,
		FR: FnMut(&Relation<T, A>, &N) -> Reference<N::Item, N::Association>,
		FN: FnMut(&T, Vec<Reference<N::Item, N::Association>>) -> N,
	{
		let mut positions: HashMap<&T, usize> = HashMap::with_capacity(items.len());
		for (index, item) in items.iter().enumerate() {
			if positions.insert(item, index).is_some() {
				return Err(GraphError::duplicate_item(item));
			}
		}

		let mut outgoing: Vec<Vec<(&Relation<T, A>, usize)>> = vec![Vec::new(); items.len()];
		for relation in relations {
			let source = *positions.get(&relation.source).ok_or_else(|| {
				GraphError::UnknownRelationSource {
					source_item: format!("{:?}", relation.source),
					relation: relation.to_string(),
				}
			})?;
			let target = *positions.get(&relation.target).ok_or_else(|| {
				GraphError::UnknownRelationTarget {
					target: format!("{:?}", relation.target),
					relation: relation.to_string(),
				}
			})?;
			outgoing[source].push((relation, target));
		}

		let mut built: Vec<Option<N>> = items.iter().map(|_| None).collect();
		let mut on_path = vec![false; items.len()];
		let mut deferred: Vec<Vec<(&Relation<T, A>, usize)>> = vec![Vec::new(); items.len()];

		for root in 0..items.len() {
			if built[root].is_some() {
				continue;
			}
			on_path[root] = true;
			let mut stack = vec![Frame {
				index: root,
				cursor: 0,
				resolved: Vec::new(),
			}];

			while let Some(frame) = stack.last_mut() {
				let current = frame.index;
				if let Some(&(relation, target)) = outgoing[current].get(frame.cursor) {
					frame.cursor += 1;
					if on_path[target] {
						deferred[current].push((relation, target));
						continue;
					}
					frame.resolved.push(relation);
					if built[target].is_none() {
						on_path[target] = true;
						stack.push(Frame {
							index: target,
							cursor: 0,
							resolved: Vec::new(),
						});
					}
					continue;
				}

				let Some(frame) = stack.pop() else {
					break;
				};
				let references = frame
					.resolved
					.into_iter()
					.map(|relation| {
						let target = positions[&relation.target];
						let Some(target_node) = built[target].as_ref() else {
							unreachable!("dependency {:?} is built before its dependents", relation.target);
						};
						create_reference(relation, target_node)
					})
					.collect();
				built[current] = Some(create_node(&items[current], references));
				on_path[current] = false;
			}
		}

		let mut deferred_count = 0;
		for (source, cyclic) in deferred.into_iter().enumerate() {
			if cyclic.is_empty() {
				continue;
			}
			deferred_count += cyclic.len();
			let references: Vec<_> = cyclic
				.into_iter()
				.filter_map(|(relation, target)| {
					built[target]
						.as_ref()
						.map(|target_node| create_reference(relation, target_node))
				})
				.collect();
			if let Some(node) = built[source].as_mut() {
				node.add_references(references);
			}
		}

		debug!(
			nodes = items.len(),
			relations = relations.len(),
			cyclic_references = deferred_count,
			"collected graph nodes"
		);

		Ok(built.into_iter().flatten().collect())
	}
}
