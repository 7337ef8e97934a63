use super::types::{GraphNode, stringify_value};

/// A normalized search term. An empty term is "no search", not "match all".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
	pub fn new(raw: &str) -> Self {
		Self(raw.trim().to_lowercase())
	}

	pub fn is_active(&self) -> bool {
		!self.0.is_empty()
	}

	/// Case-insensitive substring match on the id, the label, or any
	/// `"key value"` property pair.
	pub fn matches(&self, node: &GraphNode) -> bool {
		if !self.is_active() {
			return false;
		}
		let term = self.0.as_str();

		node.id.as_str().to_lowercase().contains(term)
			|| node
				.label
				.as_deref()
				.is_some_and(|label| label.to_lowercase().contains(term))
			|| node.properties.iter().any(|(key, value)| {
				format!("{key} {}", stringify_value(value))
					.to_lowercase()
					.contains(term)
			})
	}
}

pub fn matches_search(term: &str, node: &GraphNode) -> bool {
	SearchTerm::new(term).matches(node)
}
