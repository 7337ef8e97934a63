use std::collections::HashMap;

use log::debug;

use super::simulation::SimNode;
use super::types::{GraphLink, NodeId};

/// A link whose endpoints were found, as positions in the node array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexLink {
	pub source: usize,
	pub target: usize,
}

/// A link paired with the live nodes it connects.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedLink<'a> {
	/// Position of the link in the payload.
	pub index: usize,
	pub pair: IndexLink,
	pub link: &'a GraphLink,
	pub source: &'a SimNode,
	pub target: &'a SimNode,
}

pub fn node_index(nodes: &[SimNode]) -> HashMap<&NodeId, usize> {
	nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (&n.node.id, i))
		.collect()
}

fn resolved<'m, 'l>(
	index: &'m HashMap<&'m NodeId, usize>,
	links: &'l [GraphLink],
) -> impl Iterator<Item = (usize, &'l GraphLink, IndexLink)> {
	links.iter().enumerate().filter_map(move |(i, link)| {
		let source = *index.get(&link.source)?;
		let target = *index.get(&link.target)?;
		Some((i, link, IndexLink { source, target }))
	})
}

/// Links with both endpoints present in `nodes`; dangling links are dropped.
///
/// Cheap enough to run on every render pass.
pub fn resolve_links<'a>(nodes: &'a [SimNode], links: &'a [GraphLink]) -> Vec<ResolvedLink<'a>> {
	let index = node_index(nodes);
	resolved(&index, links)
		.map(|(i, link, pair)| ResolvedLink {
			index: i,
			pair,
			link,
			source: &nodes[pair.source],
			target: &nodes[pair.target],
		})
		.collect()
}

/// Index pairs for the simulation, computed once per payload.
pub fn resolve_link_indices(nodes: &[SimNode], links: &[GraphLink]) -> Vec<IndexLink> {
	let index = node_index(nodes);
	let pairs: Vec<IndexLink> = resolved(&index, links).map(|(_, _, pair)| pair).collect();

	if pairs.len() < links.len() {
		for link in links
			.iter()
			.filter(|l| !index.contains_key(&l.source) || !index.contains_key(&l.target))
		{
			debug!(
				"dropping link {} ({} -> {}): endpoint not in node set",
				link.id, link.source, link.target
			);
		}
		debug!("resolved {} of {} links", pairs.len(), links.len());
	}
	pairs
}
