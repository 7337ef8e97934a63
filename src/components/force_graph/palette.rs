use std::collections::{BTreeMap, BTreeSet};

use super::types::GraphNode;

pub const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Color for nodes that carry no label.
pub const UNLABELED_COLOR: &str = "#9aa5b1";

/// Label to color assignment for one payload.
///
/// Labels are sorted so the same set of labels always gets the same colors,
/// whatever order the nodes arrive in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelPalette {
	colors: BTreeMap<String, &'static str>,
}

impl LabelPalette {
	pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a GraphNode>) -> Self {
		let labels: BTreeSet<&str> = nodes
			.into_iter()
			.filter_map(|n| n.label.as_deref())
			.collect();
		let colors = labels
			.into_iter()
			.enumerate()
			.map(|(i, label)| (label.to_owned(), COLORS[i % COLORS.len()]))
			.collect();
		Self { colors }
	}

	pub fn color_for(&self, label: Option<&str>) -> &'static str {
		label
			.and_then(|l| self.colors.get(l).copied())
			.unwrap_or(UNLABELED_COLOR)
	}

	/// Legend entries in label order.
	pub fn entries(&self) -> impl Iterator<Item = (&str, &'static str)> {
		self.colors.iter().map(|(label, color)| (label.as_str(), *color))
	}

	pub fn len(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}
}
