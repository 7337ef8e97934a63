use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info, warn};

use crate::api::{PayloadStatus, fetch_graph};
use crate::components::force_graph::palette::LabelPalette;
use crate::components::force_graph::schedule::RequestTracker;
use crate::components::force_graph::search::SearchTerm;
use crate::components::force_graph::types::{Properties, stringify_value};
use crate::components::force_graph::{
	ApiConfig, ForceGraphCanvas, GraphPayload, Selection, SelectionView,
};

fn status_text(status: &PayloadStatus) -> String {
	match status {
		PayloadStatus::Idle => String::new(),
		PayloadStatus::Loading => "Loading graph...".into(),
		PayloadStatus::Ready { nodes: 0, .. } => "No data".into(),
		PayloadStatus::Ready { nodes, links } => format!("{nodes} nodes, {links} links"),
		PayloadStatus::Failed(message) => format!("Error: {message}"),
	}
}

fn properties_list(properties: &Properties) -> impl IntoView {
	let rows: Vec<(String, String)> = properties
		.iter()
		.map(|(key, value)| (key.clone(), stringify_value(value)))
		.collect();
	view! {
		<dl class="properties">
			{rows
				.into_iter()
				.map(|(key, value)| view! { <dt>{key}</dt><dd>{value}</dd> })
				.collect_view()}
		</dl>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let api = StoredValue::new(ApiConfig::default());
	let tracker = StoredValue::new(RequestTracker::default());
	let last_query = StoredValue::new(None::<String>);
	let payload = RwSignal::new(None::<GraphPayload>);
	let status = RwSignal::new(PayloadStatus::Idle);
	let query = RwSignal::new(String::new());
	let search = RwSignal::new(String::new());
	let selection = RwSignal::new(Selection::None);

	// The graph on screen keeps simulating while a request is in flight.
	let load = move |q: Option<String>| {
		let mut ticket = None;
		tracker.update_value(|t| ticket = Some(t.begin()));
		let Some(ticket) = ticket else {
			return;
		};
		last_query.set_value(q.clone());
		status.set(PayloadStatus::Loading);

		spawn_local(async move {
			let config = api.get_value();
			let result = fetch_graph(&config, q.as_deref()).await;
			if !tracker.with_value(|t| t.is_current(ticket)) {
				debug!("discarding response for a superseded request");
				return;
			}
			match result {
				Ok(graph) => {
					info!(
						"loaded graph: {} nodes, {} links",
						graph.nodes.len(),
						graph.links.len()
					);
					selection.update(|s| *s = std::mem::take(s).reconcile(&graph));
					status.set(PayloadStatus::ready(&graph));
					payload.set(Some(graph));
				}
				Err(e) => {
					warn!("graph fetch failed: {e}");
					selection.set(Selection::None);
					status.set(PayloadStatus::Failed(e.to_string()));
					payload.set(None);
				}
			}
		});
	};

	load(None);

	let match_count = move || {
		let term = SearchTerm::new(&search.get());
		if !term.is_active() {
			return String::new();
		}
		payload.with(|p| {
			let count = p
				.as_ref()
				.map_or(0, |p| p.nodes.iter().filter(|n| term.matches(n)).count());
			format!("{count} matching nodes")
		})
	};

	let legend = move || {
		payload.with(|p| {
			let palette = p
				.as_ref()
				.map(|p| LabelPalette::from_nodes(&p.nodes))
				.unwrap_or_default();
			palette
				.entries()
				.map(|(label, color)| {
					let swatch = format!("background: {color}");
					view! {
						<li>
							<span class="swatch" style=swatch></span>
							{label.to_owned()}
						</li>
					}
				})
				.collect_view()
		})
	};

	let selection_panel = move || {
		let selected = selection.get();
		payload.with(|p| {
			let Some(p) = p.as_ref() else {
				return view! { <p class="hint">"No graph loaded."</p> }.into_any();
			};
			match selected.view(p) {
				SelectionView::None => {
					view! { <p class="hint">"Click a node or link to inspect it."</p> }.into_any()
				}
				SelectionView::Node(node) => view! {
					<div class="selection">
						<h2>{node.caption()}</h2>
						<p>"id: " {node.id.to_string()}</p>
						<p>"label: " {node.label.clone().unwrap_or_else(|| "none".into())}</p>
						{properties_list(&node.properties)}
					</div>
				}
				.into_any(),
				SelectionView::Link { link, source, target } => view! {
					<div class="selection">
						<h2>{link.kind.clone().unwrap_or_else(|| "link".into())}</h2>
						<p>"id: " {link.id.to_string()}</p>
						<p>{format!("{} -> {}", source.caption(), target.caption())}</p>
						{properties_list(&link.properties)}
					</div>
				}
				.into_any(),
			}
		})
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<ForceGraphCanvas data=payload search=search selection=selection fullscreen=true />
				<div class="graph-overlay">
					<h1>"Knowledge Graph"</h1>
					<form on:submit=move |ev: leptos::ev::SubmitEvent| {
						ev.prevent_default();
						load(Some(query.get_untracked()));
					}>
						<input
							type="text"
							placeholder="Query, or leave empty for the default graph"
							prop:value=move || query.get()
							on:input=move |ev| query.set(event_target_value(&ev))
						/>
						<button type="submit">"Run"</button>
						<button
							type="button"
							on:click=move |_| {
								query.set(String::new());
								load(None);
							}
						>
							"Reset"
						</button>
					</form>
					<p class="status">
						{move || status_text(&status.get())}
						{move || {
							matches!(status.get(), PayloadStatus::Failed(_))
								.then(|| {
									view! {
										<button on:click=move |_| load(last_query.get_value())>
											"Retry"
										</button>
									}
								})
						}}
					</p>
					<input
						type="search"
						placeholder="Search nodes"
						prop:value=move || search.get()
						on:input=move |ev| search.set(event_target_value(&ev))
					/>
					<p class="match-count">{match_count}</p>
					<ul class="legend">{legend}</ul>
					{selection_panel}
					<p class="subtitle">"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_line_reads_naturally() {
		assert_eq!(status_text(&PayloadStatus::Idle), "");
		assert_eq!(status_text(&PayloadStatus::Ready { nodes: 0, links: 0 }), "No data");
		assert_eq!(
			status_text(&PayloadStatus::Ready { nodes: 3, links: 2 }),
			"3 nodes, 2 links"
		);
		assert_eq!(
			status_text(&PayloadStatus::Failed("timeout".into())),
			"Error: timeout"
		);
	}
}
