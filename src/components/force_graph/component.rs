use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::SimulationConfig;
use super::render::{self, Overlay};
use super::search::SearchTerm;
use super::selection::Selection;
use super::state::ForceGraphState;
use super::types::GraphPayload;

/// A repeating animation-frame task that can be stopped from outside.
///
/// Once cancelled the callback neither steps nor schedules another frame,
/// so a loop for a replaced payload can never touch the new state.
struct FrameLoop {
	cancelled: Rc<Cell<bool>>,
	frame: Rc<Cell<Option<i32>>>,
	callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl FrameLoop {
	fn start(mut step: impl FnMut() + 'static) -> Option<Self> {
		let window = web_sys::window()?;
		let cancelled = Rc::new(Cell::new(false));
		let frame = Rc::new(Cell::new(None));
		let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

		let (cancelled_cb, frame_cb, callback_cb) =
			(cancelled.clone(), frame.clone(), callback.clone());
		*callback.borrow_mut() = Some(Closure::new(move || {
			if cancelled_cb.get() {
				return;
			}
			step();
			if cancelled_cb.get() {
				return;
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), callback_cb.borrow().as_ref()) {
				frame_cb.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));

		let first = {
			let cb = callback.borrow();
			window
				.request_animation_frame(cb.as_ref()?.as_ref().unchecked_ref())
				.ok()
		};
		frame.set(first);

		Some(Self {
			cancelled,
			frame,
			callback,
		})
	}

	fn cancel(&self) {
		self.cancelled.set(true);
		if let (Some(id), Some(window)) = (self.frame.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		// Breaks the closure's reference to itself.
		self.callback.borrow_mut().take();
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.cancel();
	}
}

fn viewport_size(
	window: &Window,
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		return (
			window
				.inner_width()
				.ok()
				.and_then(|v| v.as_f64())
				.unwrap_or(960.0),
			window
				.inner_height()
				.ok()
				.and_then(|v| v.as_f64())
				.unwrap_or(540.0),
		);
	}
	(
		width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(960.0)
		}),
		height.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(540.0)
		}),
	)
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<Option<GraphPayload>>,
	#[prop(into)] search: Signal<String>,
	selection: RwSignal<Selection>,
	#[prop(optional)] config: SimulationConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let frame_loop = StoredValue::new_local(None::<FrameLoop>);
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let rng = Rc::new(RefCell::new(SmallRng::seed_from_u64(js_sys::Date::now() as u64)));
	let (state_init, resize_cb_init) = (state.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let payload = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		// The old payload's loop must stop before its state is replaced.
		frame_loop.update_value(|running| {
			if let Some(running) = running.take() {
				running.cancel();
			}
		});

		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = viewport_size(&window, &canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		let Some(ctx) = context_2d(&canvas) else {
			return;
		};

		let Some(payload) = payload else {
			*state_init.borrow_mut() = None;
			ctx.clear_rect(0.0, 0.0, w, h);
			return;
		};
		*state_init.borrow_mut() = Some(ForceGraphState::new(
			payload,
			config.clone(),
			w,
			h,
			&mut *rng.borrow_mut(),
		));

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = viewport_size(&win, &canvas_resize, true, None, None);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let state_anim = state_init.clone();
		let running = FrameLoop::start(move || {
			let mut guard = state_anim.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			if s.tick() {
				let search = SearchTerm::new(&search.get_untracked());
				let selection = selection.get_untracked();
				render::render(
					s,
					&Overlay {
						search: &search,
						selection: &selection,
					},
					&ctx,
				);
			}
		});
		frame_loop.set_value(running);
	});

	on_cleanup(move || {
		frame_loop.update_value(|running| {
			if let Some(running) = running.take() {
				running.cancel();
			}
		});
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let picked = {
			let mut guard = state_md.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			if let Some(idx) = s.node_at_position(x, y) {
				s.begin_drag(idx);
				s.drag_pointer(x, y);
				Selection::Node(s.sim.nodes[idx].node.id.clone())
			} else if let Some(link) = s.link_at_position(x, y) {
				Selection::link(&s.payload.links[link])
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
				Selection::None
			}
		};
		selection.set(picked);
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.is_dragging() {
				s.drag_pointer(x, y);
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
				if s.pan.active {
					s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
					s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
				}
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.end_drag();
			s.pan.active = false;
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_drag();
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
