//! Fixed-step force simulation.
//!
//! [`tick`] is a pure step function: it takes the owned [`SimulationState`],
//! advances it by one `time_step` and hands it back. Each tick applies, in
//! order, pairwise repulsion, link springs, then per node centering, damping,
//! velocity clamping, integration and bounds clamping. Repulsion is O(N²),
//! which is fine for the tens to low hundreds of nodes a query returns.

use super::config::SimulationConfig;
use super::links::IndexLink;
use super::types::GraphNode;

/// A payload node with a position and velocity.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	pub node: GraphNode,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
}

impl SimNode {
	/// A node at rest at `(x, y)`.
	pub fn at(node: GraphNode, x: f64, y: f64) -> Self {
		Self {
			node,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
		}
	}

	pub fn speed(&self) -> f64 {
		self.vx.hypot(self.vy)
	}
}

/// Everything that changes from one tick to the next.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationState {
	pub nodes: Vec<SimNode>,
	pinned: Option<usize>,
	ticks: u64,
}

impl SimulationState {
	pub fn new(nodes: Vec<SimNode>) -> Self {
		Self {
			nodes,
			pinned: None,
			ticks: 0,
		}
	}

	pub fn pinned(&self) -> Option<usize> {
		self.pinned
	}

	/// Number of ticks this state has been advanced.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Pin a node to the pointer, replacing any previous pin.
	pub fn pin(&mut self, index: usize) {
		let Some(node) = self.nodes.get_mut(index) else {
			return;
		};
		node.vx = 0.0;
		node.vy = 0.0;
		self.pinned = Some(index);
	}

	/// Move the pinned node to the pointer. The position is clamped into the
	/// canvas and the velocity zeroed so the node stays where it is put.
	pub fn drag_to(&mut self, x: f64, y: f64, config: &SimulationConfig) {
		let Some(node) = self.pinned.and_then(|i| self.nodes.get_mut(i)) else {
			return;
		};
		node.x = config.clamp_x(x);
		node.y = config.clamp_y(y);
		node.vx = 0.0;
		node.vy = 0.0;
	}

	pub fn release(&mut self) {
		self.pinned = None;
	}
}

/// Advance `state` by one `config.time_step`.
pub fn tick(mut state: SimulationState, links: &[IndexLink], config: &SimulationConfig) -> SimulationState {
	if state.nodes.is_empty() {
		return state;
	}
	let dt = config.time_step;
	let pinned = state.pinned;
	let free = |i: usize| pinned != Some(i);
	let nodes = &mut state.nodes;
	let n = nodes.len();

	for i in 0..n {
		for j in (i + 1)..n {
			let dx = nodes[j].x - nodes[i].x;
			let dy = nodes[j].y - nodes[i].y;
			let dist_sq = dx * dx + dy * dy + config.epsilon;
			let dist = dist_sq.sqrt();
			let force = config.repulsion / dist_sq;
			let (ix, iy) = (force * dx / dist * dt, force * dy / dist * dt);
			if free(i) {
				nodes[i].vx -= ix;
				nodes[i].vy -= iy;
			}
			if free(j) {
				nodes[j].vx += ix;
				nodes[j].vy += iy;
			}
		}
	}

	for &IndexLink { source, target } in links {
		let dx = nodes[target].x - nodes[source].x;
		let dy = nodes[target].y - nodes[source].y;
		let mut dist = (dx * dx + dy * dy).sqrt();
		if dist == 0.0 {
			dist = 1.0;
		}
		let force = config.spring_strength * (dist - config.link_distance);
		let (fx, fy) = (force * dx / dist, force * dy / dist);
		if free(source) {
			nodes[source].vx += fx;
			nodes[source].vy += fy;
		}
		if free(target) {
			nodes[target].vx -= fx;
			nodes[target].vy -= fy;
		}
	}

	let (cx, cy) = config.center();
	for (i, node) in nodes.iter_mut().enumerate() {
		if free(i) {
			node.vx += config.center_strength * dt * (cx - node.x);
			node.vy += config.center_strength * dt * (cy - node.y);
		}

		node.vx *= config.damping;
		node.vy *= config.damping;

		let speed = node.speed();
		if speed > config.max_velocity {
			let scale = config.max_velocity / speed;
			node.vx *= scale;
			node.vy *= scale;
		}

		if free(i) {
			node.x = config.clamp_x(node.x + node.vx);
			node.y = config.clamp_y(node.y + node.vy);
		}
	}

	state.ticks += 1;
	state
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, x: f64, y: f64) -> SimNode {
		SimNode::at(GraphNode::new(id), x, y)
	}

	fn in_bounds(state: &SimulationState, config: &SimulationConfig) -> bool {
		state.nodes.iter().all(|n| {
			n.x >= config.margin
				&& n.x <= config.width - config.margin
				&& n.y >= config.margin
				&& n.y <= config.height - config.margin
		})
	}

	#[test]
	fn empty_state_ticks_without_change() {
		let config = SimulationConfig::default();
		let state = tick(SimulationState::default(), &[], &config);
		assert!(state.nodes.is_empty());
		assert_eq!(state.ticks(), 0);
	}

	#[test]
	fn repulsion_pushes_nearby_nodes_apart() {
		let config = SimulationConfig::default();
		let state = SimulationState::new(vec![node("a", 470.0, 270.0), node("b", 490.0, 270.0)]);
		let state = tick(state, &[], &config);
		assert!(state.nodes[0].vx < 0.0);
		assert!(state.nodes[1].vx > 0.0);
		assert!(state.nodes[1].x - state.nodes[0].x > 20.0);
	}

	#[test]
	fn coincident_nodes_stay_finite() {
		let config = SimulationConfig::default();
		let mut state = SimulationState::new(vec![node("a", 100.0, 100.0), node("b", 100.0, 100.0)]);
		for _ in 0..10 {
			state = tick(state, &[IndexLink { source: 0, target: 1 }], &config);
		}
		assert!(state.nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite()));
	}

	#[test]
	fn crowded_graph_respects_bounds_and_speed_limit() {
		let config = SimulationConfig::default();
		let nodes = (0..40)
			.map(|i| node(&i.to_string(), 5.0 + (i % 3) as f64, 5.0 + (i % 2) as f64))
			.collect();
		let links: Vec<IndexLink> = (1..40)
			.map(|i| IndexLink { source: i, target: i / 2 })
			.collect();
		let mut state = SimulationState::new(nodes);
		for _ in 0..300 {
			state = tick(state, &links, &config);
			assert!(in_bounds(&state, &config));
			assert!(state.nodes.iter().all(|n| n.speed() <= config.max_velocity + 1e-9));
		}
		assert_eq!(state.ticks(), 300);
	}

	#[test]
	fn pinned_node_holds_pointer_position() {
		let config = SimulationConfig::default();
		let links = [IndexLink { source: 0, target: 1 }, IndexLink { source: 1, target: 2 }];
		let mut state = SimulationState::new(vec![
			node("a", 100.0, 100.0),
			node("b", 110.0, 100.0),
			node("c", 800.0, 400.0),
		]);
		state.pin(1);
		state.drag_to(300.0, 200.0, &config);
		let state = tick(state, &links, &config);

		assert_eq!(state.pinned(), Some(1));
		assert_eq!((state.nodes[1].x, state.nodes[1].y), (300.0, 200.0));
		assert_eq!((state.nodes[1].vx, state.nodes[1].vy), (0.0, 0.0));
	}

	#[test]
	fn drag_is_clamped_into_canvas() {
		let config = SimulationConfig::default();
		let mut state = SimulationState::new(vec![node("a", 100.0, 100.0)]);
		state.pin(0);
		state.drag_to(-50.0, 9000.0, &config);
		assert_eq!((state.nodes[0].x, state.nodes[0].y), (4.0, 536.0));
	}

	#[test]
	fn drag_without_pin_is_ignored() {
		let config = SimulationConfig::default();
		let mut state = SimulationState::new(vec![node("a", 100.0, 100.0)]);
		state.drag_to(300.0, 300.0, &config);
		assert_eq!(state.nodes[0].x, 100.0);
		state.pin(5);
		assert_eq!(state.pinned(), None);
	}

	#[test]
	fn pinning_another_node_moves_the_pin() {
		let mut state = SimulationState::new(vec![node("a", 1.0, 1.0), node("b", 2.0, 2.0)]);
		state.pin(0);
		state.pin(1);
		assert_eq!(state.pinned(), Some(1));
		state.release();
		assert_eq!(state.pinned(), None);
	}

	#[test]
	fn released_node_velocity_decays_monotonically() {
		let config = SimulationConfig {
			center_strength: 0.0,
			..SimulationConfig::default()
		};
		let mut state = SimulationState::new(vec![node("a", 480.0, 270.0)]);
		state.pin(0);
		state.drag_to(480.0, 270.0, &config);
		state.release();
		state.nodes[0].vx = 20.0;
		state.nodes[0].vy = -5.0;

		let mut previous = state.nodes[0].speed();
		for _ in 0..80 {
			state = tick(state, &[], &config);
			let speed = state.nodes[0].speed();
			assert!(speed < previous);
			previous = speed;
		}
		assert!(previous < 0.1);
	}

	#[test]
	fn release_after_drag_does_not_fling() {
		let config = SimulationConfig::default();
		let mut state = SimulationState::new(vec![node("a", 480.0, 270.0)]);
		state.pin(0);
		state.drag_to(200.0, 100.0, &config);
		state.drag_to(600.0, 400.0, &config);
		state.release();
		let state = tick(state, &[], &config);
		assert!(state.nodes[0].speed() < 1.0);
	}
}
