use rand::Rng;

use super::config::SimulationConfig;
use super::simulation::SimNode;
use super::types::GraphNode;

/// Cold-start positions: a near-square grid over the padded canvas with a
/// little jitter so the springs do not settle into a lattice.
///
/// Every node starts at rest and inside the clamped bounds. No nodes in,
/// no nodes out.
pub fn initial_layout<R: Rng + ?Sized>(
	nodes: &[GraphNode],
	config: &SimulationConfig,
	rng: &mut R,
) -> Vec<SimNode> {
	let count = nodes.len();
	if count == 0 {
		return Vec::new();
	}

	let usable_w = (config.width - 2.0 * config.layout_padding).max(0.0);
	let usable_h = (config.height - 2.0 * config.layout_padding).max(0.0);
	let aspect = if usable_h > 0.0 { usable_w / usable_h } else { 1.0 };

	let cols = ((count as f64 * aspect).sqrt().ceil() as usize).clamp(1, count);
	let rows = count.div_ceil(cols);

	let cell_w = if cols > 1 { usable_w / (cols - 1) as f64 } else { usable_w };
	let cell_h = if rows > 1 { usable_h / (rows - 1) as f64 } else { usable_h };
	let (cx, cy) = config.center();

	nodes
		.iter()
		.enumerate()
		.map(|(i, node)| {
			let (col, row) = (i % cols, i / cols);
			let x = if cols > 1 {
				config.layout_padding + col as f64 * cell_w
			} else {
				cx
			};
			let y = if rows > 1 {
				config.layout_padding + row as f64 * cell_h
			} else {
				cy
			};
			let jx = jitter(rng, cell_w * config.jitter_ratio);
			let jy = jitter(rng, cell_h * config.jitter_ratio);
			SimNode::at(node.clone(), config.clamp_x(x + jx), config.clamp_y(y + jy))
		})
		.collect()
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, amplitude: f64) -> f64 {
	if amplitude > 0.0 {
		rng.gen_range(-amplitude..=amplitude)
	} else {
		0.0
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	fn nodes(n: usize) -> Vec<GraphNode> {
		(0..n).map(|i| GraphNode::new(i as i64)).collect()
	}

	#[test]
	fn empty_input_yields_empty_layout() {
		let mut rng = SmallRng::seed_from_u64(1);
		assert!(initial_layout(&[], &SimulationConfig::default(), &mut rng).is_empty());
	}

	#[test]
	fn every_node_lands_inside_the_margin_at_rest() {
		let config = SimulationConfig::default();
		let mut rng = SmallRng::seed_from_u64(7);
		for n in [1, 2, 3, 10, 57, 200] {
			let laid_out = initial_layout(&nodes(n), &config, &mut rng);
			assert_eq!(laid_out.len(), n);
			for sim in &laid_out {
				assert!(sim.x >= config.margin && sim.x <= config.width - config.margin);
				assert!(sim.y >= config.margin && sim.y <= config.height - config.margin);
				assert_eq!((sim.vx, sim.vy), (0.0, 0.0));
			}
		}
	}

	#[test]
	fn single_node_starts_near_center() {
		let config = SimulationConfig::default();
		let mut rng = SmallRng::seed_from_u64(3);
		let laid_out = initial_layout(&nodes(1), &config, &mut rng);
		let (cx, cy) = config.center();
		assert!((laid_out[0].x - cx).abs() <= 0.1 * 880.0 + 1e-9);
		assert!((laid_out[0].y - cy).abs() <= 0.1 * 460.0 + 1e-9);
	}

	#[test]
	fn grid_without_jitter_is_evenly_spaced() {
		let config = SimulationConfig {
			jitter_ratio: 0.0,
			..SimulationConfig::default()
		};
		let mut rng = SmallRng::seed_from_u64(0);
		// 10 nodes on an 880x460 area: 5 columns, 2 rows.
		let laid_out = initial_layout(&nodes(10), &config, &mut rng);
		assert_eq!((laid_out[0].x, laid_out[0].y), (40.0, 40.0));
		assert_eq!((laid_out[4].x, laid_out[4].y), (920.0, 40.0));
		assert_eq!((laid_out[5].x, laid_out[5].y), (40.0, 500.0));
		assert_eq!(laid_out[1].x, 260.0);
	}

	#[test]
	fn positions_keep_payload_order_and_identity() {
		let mut rng = SmallRng::seed_from_u64(11);
		let input = nodes(4);
		let laid_out = initial_layout(&input, &SimulationConfig::default(), &mut rng);
		let ids: Vec<_> = laid_out.iter().map(|s| s.node.id.clone()).collect();
		let expected: Vec<_> = input.iter().map(|n| n.id.clone()).collect();
		assert_eq!(ids, expected);
	}

	#[test]
	fn jitter_breaks_the_lattice() {
		let mut rng = SmallRng::seed_from_u64(5);
		let laid_out = initial_layout(&nodes(10), &SimulationConfig::default(), &mut rng);
		assert!(laid_out.iter().take(5).any(|s| s.y != 40.0));
	}
}
