use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::links::resolve_links;
use super::search::SearchTerm;
use super::selection::Selection;
use super::state::{ForceGraphState, NODE_RADIUS};

const SELECTED_STROKE: &str = "#ffd166";
const MATCH_STROKE: &str = "#06d6a0";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// What the current frame should emphasise besides hover.
pub struct Overlay<'a> {
	pub search: &'a SearchTerm,
	pub selection: &'a Selection,
}

pub fn render(state: &ForceGraphState, overlay: &Overlay<'_>, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.06)");
	ctx.set_line_width(1.0 / state.transform.k);
	ctx.stroke_rect(0.0, 0.0, state.config.width, state.config.height);
	draw_edges(state, overlay, ctx);
	draw_nodes(state, overlay, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, overlay: &Overlay<'_>, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, dash, gap, arrow_size) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	for resolved in resolve_links(&state.sim.nodes, &state.payload.links) {
		let (n1, n2) = (resolved.source, resolved.target);
		let (x1, y1, x2, y2) = (n1.x, n1.y, n2.x, n2.y);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let is_highlighted =
			state.is_highlighted(resolved.pair.source) && state.is_highlighted(resolved.pair.target);
		let is_selected = overlay.selection.is_link(&resolved.link.id);

		// t=0: all edges at base (0.6), t=1: highlighted at 0.9, others at 0.15
		let (edge_alpha, arrow_alpha, width) = if is_highlighted || is_selected {
			(0.6 + 0.3 * t, 0.8 + 0.1 * t, line_width * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, 0.8 - 0.45 * t, line_width * (1.0 - 0.3 * t))
		};

		let stroke = if is_selected {
			SELECTED_STROKE.to_owned()
		} else {
			format!("rgba(100, 180, 255, {})", edge_alpha)
		};
		ctx.set_stroke_style_str(&stroke);
		ctx.set_line_width(if is_selected { width * 2.0 } else { width });
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(
			x2 - ux * (NODE_RADIUS + arrow_size),
			y2 - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&format!("rgba(100, 180, 255, {})", arrow_alpha));
		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if let Some(kind) = resolved.link.kind.as_deref().filter(|_| is_selected || is_highlighted) {
			ctx.set_fill_style_str("rgba(255, 255, 255, 0.7)");
			ctx.set_font(&format!("{}px sans-serif", 9.0 / k.max(0.5)));
			let _ = ctx.fill_text(kind, (x1 + x2) / 2.0 + 4.0, (y1 + y2) / 2.0 - 4.0);
		}
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &ForceGraphState, overlay: &Overlay<'_>, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);
	let searching = overlay.search.is_active();

	for (idx, sim) in state.sim.nodes.iter().enumerate() {
		if has_highlight && state.is_highlighted(idx) {
			continue;
		}
		let matched = overlay.search.matches(&sim.node);
		let dimmed = searching && !matched;
		let (alpha, radius) = (
			(1.0 - 0.7 * t) * if dimmed { 0.35 } else { 1.0 },
			NODE_RADIUS * (1.0 - 0.15 * t),
		);

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(sim.x, sim.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(state.palette.color_for(sim.node.label.as_deref()));
		ctx.fill();
		ctx.set_global_alpha(1.0);

		outline(ctx, sim.x, sim.y, radius, k, matched, overlay.selection.is_node(&sim.node.id));

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.8));
		ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
		let _ = ctx.fill_text(&sim.node.caption(), sim.x + radius + 3.0, sim.y + 3.0);
	}

	if !has_highlight {
		return;
	}

	for (idx, sim) in state.sim.nodes.iter().enumerate() {
		if !state.is_highlighted(idx) {
			continue;
		}
		let (x, y) = (sim.x, sim.y);
		let is_hovered = state.is_hovered(idx);
		let is_neighbor =
			state.hover.neighbors.contains(&idx) || state.hover.prev_neighbors.contains(&idx);

		let (radius, glow_radius) = if is_hovered {
			(
				NODE_RADIUS * (1.0 + 0.35 * t),
				NODE_RADIUS * (1.8 + 1.2 * t),
			)
		} else if is_neighbor {
			(NODE_RADIUS * (1.0 + 0.2 * t), NODE_RADIUS * (1.4 + 0.6 * t))
		} else {
			(NODE_RADIUS, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
				let _ = gradient
					.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(state.palette.color_for(sim.node.label.as_deref()));
		ctx.fill();

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		outline(
			ctx,
			x,
			y,
			radius,
			k,
			overlay.search.matches(&sim.node),
			overlay.selection.is_node(&sim.node.id),
		);

		ctx.set_fill_style_str("white");
		ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
		let _ = ctx.fill_text(&sim.node.caption(), x + radius + 3.0, y + 3.0);
	}
}

/// Rings for search matches and the selected node.
fn outline(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	radius: f64,
	k: f64,
	matched: bool,
	selected: bool,
) {
	for (on, color, gap) in [(matched, MATCH_STROKE, 2.5), (selected, SELECTED_STROKE, 5.0)] {
		if !on {
			continue;
		}
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + gap / k, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(2.0 / k);
		ctx.stroke();
	}
}
