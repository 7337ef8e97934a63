use graph_explorer::components::force_graph::config::SimulationConfig;
use graph_explorer::components::force_graph::layout::initial_layout;
use graph_explorer::components::force_graph::links::{IndexLink, resolve_link_indices, resolve_links};
use graph_explorer::components::force_graph::simulation::{SimNode, SimulationState, tick};
use graph_explorer::components::force_graph::state::ForceGraphState;
use graph_explorer::components::force_graph::{GraphNode, GraphPayload};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn distance(a: &SimNode, b: &SimNode) -> f64 {
	(a.x - b.x).hypot(a.y - b.y)
}

fn sample_payload() -> GraphPayload {
	serde_json::from_str(
		r#"{
			"nodes": [
				{"id": 1, "label": "Person", "properties": {"name": "Alice Smith"}},
				{"id": 2, "label": "Person", "properties": {"name": "Bob"}},
				{"id": "3", "label": "Company", "properties": {"name": "Acme"}},
				{"id": 4, "label": "City"},
				{"id": 5}
			],
			"links": [
				{"id": 10, "source": 1, "target": 2, "type": "KNOWS"},
				{"id": 11, "source": 1, "target": 3, "type": "WORKS_AT"},
				{"id": 12, "source": "2", "target": 3, "type": "WORKS_AT"},
				{"id": 13, "source": 3, "target": 4, "type": "LOCATED_IN"},
				{"id": 14, "source": 4, "target": 99, "type": "NEAR"}
			]
		}"#,
	)
	.unwrap()
}

#[test]
fn linked_pair_settles_at_rest_length() {
	let config = SimulationConfig::default();
	let mut state = SimulationState::new(vec![
		SimNode::at(GraphNode::new("a"), 200.0, 300.0),
		SimNode::at(GraphNode::new("b"), 760.0, 240.0),
	]);
	let links = [IndexLink { source: 0, target: 1 }];

	for _ in 0..2500 {
		state = tick(state, &links, &config);
	}
	for _ in 0..500 {
		state = tick(state, &links, &config);
		let d = distance(&state.nodes[0], &state.nodes[1]);
		assert!(
			(d - config.link_distance).abs() < 10.0,
			"distance {d} drifted from rest length"
		);
	}
	assert!(state.nodes.iter().all(|n| n.speed() < 0.01));
}

#[test]
fn payload_pipeline_keeps_invariants_through_a_drag() {
	let config = SimulationConfig::default();
	let payload = sample_payload();
	let mut rng = SmallRng::seed_from_u64(2024);

	let mut state = SimulationState::new(initial_layout(&payload.nodes, &config, &mut rng));
	let links = resolve_link_indices(&state.nodes, &payload.links);
	assert_eq!(links.len(), 4);

	for step in 0..600 {
		if step == 100 {
			state.pin(2);
		}
		if (100..200).contains(&step) {
			state.drag_to(100.0 + step as f64, 120.0, &config);
		}
		if step == 200 {
			state.release();
		}
		state = tick(state, &links, &config);

		if (100..200).contains(&step) {
			assert_eq!(state.nodes[2].x, 100.0 + step as f64);
			assert_eq!(state.nodes[2].y, 120.0);
		}
		for node in &state.nodes {
			assert!(node.x >= config.margin && node.x <= config.width - config.margin);
			assert!(node.y >= config.margin && node.y <= config.height - config.margin);
			assert!(node.speed() <= config.max_velocity + 1e-9);
		}
	}

	let rendered = resolve_links(&state.nodes, &payload.links);
	assert_eq!(rendered.len(), 4);
	assert!(rendered.iter().all(|r| r.link.id.as_str() != "14"));
}

#[test]
fn replacing_the_payload_reseeds_from_scratch() {
	let mut rng = SmallRng::seed_from_u64(9);
	let mut first = ForceGraphState::new(
		sample_payload(),
		SimulationConfig::default(),
		960.0,
		540.0,
		&mut rng,
	);
	first.begin_drag(0);
	for _ in 0..50 {
		first.tick();
	}
	assert_eq!(first.sim.ticks(), 50);

	let next = GraphPayload {
		nodes: vec![GraphNode::new("only")],
		links: Vec::new(),
	};
	let second = ForceGraphState::new(next, SimulationConfig::default(), 960.0, 540.0, &mut rng);
	assert_eq!(second.sim.ticks(), 0);
	assert_eq!(second.sim.pinned(), None);
	assert_eq!(second.sim.nodes.len(), 1);
	assert!(second.edges.is_empty());
}

#[test]
fn empty_payload_is_a_valid_idle_state() {
	let mut rng = SmallRng::seed_from_u64(1);
	let mut state = ForceGraphState::new(
		GraphPayload::default(),
		SimulationConfig::default(),
		960.0,
		540.0,
		&mut rng,
	);
	for _ in 0..10 {
		state.tick();
	}
	assert!(state.sim.nodes.is_empty());
	assert!(state.palette.is_empty());
}
