use super::types::{GraphLink, GraphNode, GraphPayload, LinkId, NodeId};

/// What the user has picked: nothing, one node, or one link.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	#[default]
	None,
	Node(NodeId),
	Link {
		id: LinkId,
		source: NodeId,
		target: NodeId,
	},
}

/// A selection looked up in a payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectionView<'a> {
	None,
	Node(&'a GraphNode),
	Link {
		link: &'a GraphLink,
		source: &'a GraphNode,
		target: &'a GraphNode,
	},
}

impl Selection {
	pub fn link(link: &GraphLink) -> Self {
		Self::Link {
			id: link.id.clone(),
			source: link.source.clone(),
			target: link.target.clone(),
		}
	}

	pub fn is_node(&self, id: &NodeId) -> bool {
		matches!(self, Self::Node(selected) if selected == id)
	}

	pub fn is_link(&self, id: &LinkId) -> bool {
		matches!(self, Self::Link { id: selected, .. } if selected == id)
	}

	/// Resolve against `payload`. A selection whose node, link or link
	/// endpoints are not in the payload views as `None`.
	pub fn view<'a>(&self, payload: &'a GraphPayload) -> SelectionView<'a> {
		let find_node = |id: &NodeId| payload.nodes.iter().find(|n| &n.id == id);
		match self {
			Self::None => SelectionView::None,
			Self::Node(id) => find_node(id).map_or(SelectionView::None, SelectionView::Node),
			Self::Link { id, source, target } => payload
				.links
				.iter()
				.find(|l| &l.id == id && &l.source == source && &l.target == target)
				.and_then(|link| {
					Some(SelectionView::Link {
						link,
						source: find_node(source)?,
						target: find_node(target)?,
					})
				})
				.unwrap_or(SelectionView::None),
		}
	}

	/// Keep the selection only if it still refers to data in `payload`.
	pub fn reconcile(self, payload: &GraphPayload) -> Self {
		match self.view(payload) {
			SelectionView::None => Self::None,
			_ => self,
		}
	}
}
