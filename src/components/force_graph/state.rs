use std::collections::HashSet;

use log::info;
use rand::Rng;

use super::config::SimulationConfig;
use super::layout::initial_layout;
use super::links::{IndexLink, resolve_link_indices, resolve_links};
use super::palette::LabelPalette;
use super::schedule::TickSchedule;
use super::simulation::{self, SimulationState};
use super::types::GraphPayload;

pub const NODE_RADIUS: f64 = 6.0;
pub const HIT_RADIUS: f64 = 12.0;
pub const LINK_HIT_DISTANCE: f64 = 5.0;

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
	delay_t: f64,
}

/// Simulation and view state for one loaded payload.
///
/// A new payload gets a new `ForceGraphState`; nothing carries over.
pub struct ForceGraphState {
	pub payload: GraphPayload,
	pub sim: SimulationState,
	pub edges: Vec<IndexLink>,
	pub palette: LabelPalette,
	pub config: SimulationConfig,
	pub schedule: TickSchedule,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: HoverState,
	/// Viewport size in CSS pixels.
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
}

impl ForceGraphState {
	pub fn new<R: Rng + ?Sized>(
		payload: GraphPayload,
		config: SimulationConfig,
		width: f64,
		height: f64,
		rng: &mut R,
	) -> Self {
		let sim = SimulationState::new(initial_layout(&payload.nodes, &config, rng));
		let edges = resolve_link_indices(&sim.nodes, &payload.links);
		let palette = LabelPalette::from_nodes(&payload.nodes);
		info!(
			"seeded simulation with {} nodes, {} of {} links, {} labels",
			sim.nodes.len(),
			edges.len(),
			payload.links.len(),
			palette.len()
		);

		let mut state = Self {
			schedule: TickSchedule::new(config.publish_every),
			payload,
			sim,
			edges,
			palette,
			config,
			transform: ViewTransform::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
		};
		state.fit_to_viewport();
		state
	}

	/// Scale the logical canvas to fill the viewport, centered.
	pub fn fit_to_viewport(&mut self) {
		let k = (self.width / self.config.width)
			.min(self.height / self.config.height)
			.max(0.1);
		self.transform = ViewTransform {
			x: (self.width - self.config.width * k) / 2.0,
			y: (self.height - self.config.height * k) / 2.0,
			k,
		};
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// Last drawn wins, matching what is on top.
		self.sim
			.nodes
			.iter()
			.rposition(|n| (n.x - gx).hypot(n.y - gy) < HIT_RADIUS)
	}

	/// Index into `payload.links` of the link under the pointer.
	pub fn link_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let reach = LINK_HIT_DISTANCE / self.transform.k.max(0.1);
		resolve_links(&self.sim.nodes, &self.payload.links)
			.into_iter()
			.map(|r| {
				let d = segment_distance((gx, gy), (r.source.x, r.source.y), (r.target.x, r.target.y));
				(r.index, d)
			})
			.filter(|&(_, d)| d <= reach)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| i)
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Keep the previous highlight around for the fade-out.
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &IndexLink { source, target } in &self.edges {
				if source == idx {
					self.hover.neighbors.insert(target);
				} else if target == idx {
					self.hover.neighbors.insert(source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Start dragging the node under the pointer.
	pub fn begin_drag(&mut self, idx: usize) {
		self.sim.pin(idx);
	}

	pub fn drag_pointer(&mut self, sx: f64, sy: f64) {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.sim.drag_to(gx, gy, &self.config);
	}

	pub fn end_drag(&mut self) {
		self.sim.release();
	}

	pub fn is_dragging(&self) -> bool {
		self.sim.pinned().is_some()
	}

	/// Run one physics step. Returns true when the frame should be drawn.
	pub fn tick(&mut self) -> bool {
		let sim = std::mem::take(&mut self.sim);
		self.sim = simulation::tick(sim, &self.edges, &self.config);

		let dt = self.config.time_step;
		self.flow_time += dt;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}

		self.schedule.advance()
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.fit_to_viewport();
	}
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (abx, aby) = (b.0 - a.0, b.1 - a.1);
	let len_sq = abx * abx + aby * aby;
	if len_sq == 0.0 {
		return (p.0 - a.0).hypot(p.1 - a.1);
	}
	let t = (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len_sq).clamp(0.0, 1.0);
	(p.0 - (a.0 + t * abx)).hypot(p.1 - (a.1 + t * aby))
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn state() -> ForceGraphState {
		let payload = GraphPayload {
			nodes: vec![
				GraphNode::new("a").with_label("Person"),
				GraphNode::new("b").with_label("Company"),
				GraphNode::new("c"),
			],
			links: vec![
				GraphLink::new("ab", "a", "b"),
				GraphLink::new("bx", "b", "gone"),
			],
		};
		let mut rng = SmallRng::seed_from_u64(42);
		ForceGraphState::new(payload, SimulationConfig::default(), 960.0, 540.0, &mut rng)
	}

	#[test]
	fn seeding_resolves_links_and_palette() {
		let s = state();
		assert_eq!(s.sim.nodes.len(), 3);
		assert_eq!(s.edges, vec![IndexLink { source: 0, target: 1 }]);
		assert_eq!(s.palette.len(), 2);
		assert_eq!((s.transform.x, s.transform.y, s.transform.k), (0.0, 0.0, 1.0));
	}

	#[test]
	fn fit_keeps_aspect_and_centers() {
		let mut s = state();
		s.resize(480.0, 540.0);
		assert_eq!(s.transform.k, 0.5);
		assert_eq!(s.transform.x, 0.0);
		assert_eq!(s.transform.y, 135.0);
		let (gx, gy) = s.screen_to_graph(240.0, 270.0);
		assert_eq!((gx, gy), (480.0, 270.0));
	}

	#[test]
	fn hit_tests_find_nodes_and_links() {
		let mut s = state();
		s.sim.nodes[0].x = 100.0;
		s.sim.nodes[0].y = 100.0;
		s.sim.nodes[1].x = 300.0;
		s.sim.nodes[1].y = 100.0;
		s.sim.nodes[2].x = 800.0;
		s.sim.nodes[2].y = 400.0;

		assert_eq!(s.node_at_position(104.0, 98.0), Some(0));
		assert_eq!(s.node_at_position(500.0, 500.0), None);
		assert_eq!(s.link_at_position(200.0, 103.0), Some(0));
		assert_eq!(s.link_at_position(200.0, 130.0), None);
	}

	#[test]
	fn hover_collects_neighbors() {
		let mut s = state();
		s.set_hover(Some(1));
		assert!(s.is_highlighted(0));
		assert!(s.is_hovered(1));
		assert!(!s.is_highlighted(2));
		s.set_hover(None);
		assert!(s.has_active_highlight());
		assert_eq!(s.hover.prev_node, Some(1));
	}

	#[test]
	fn dragging_pins_through_the_view_transform() {
		let mut s = state();
		s.resize(480.0, 270.0);
		s.begin_drag(2);
		s.drag_pointer(100.0, 50.0);
		s.tick();
		assert!(s.is_dragging());
		assert_eq!((s.sim.nodes[2].x, s.sim.nodes[2].y), (200.0, 100.0));
		s.end_drag();
		assert!(!s.is_dragging());
	}

	#[test]
	fn tick_publishes_on_schedule() {
		let mut s = state();
		assert!(!s.tick());
		assert!(s.tick());
		assert_eq!(s.sim.ticks(), 2);
	}

	#[test]
	fn segment_distance_handles_degenerate_segments() {
		assert_eq!(segment_distance((3.0, 4.0), (0.0, 0.0), (0.0, 0.0)), 5.0);
		assert_eq!(segment_distance((5.0, 2.0), (0.0, 0.0), (10.0, 0.0)), 2.0);
		assert_eq!(segment_distance((-3.0, 4.0), (0.0, 0.0), (10.0, 0.0)), 5.0);
	}
}
