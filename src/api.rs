//! Fetching graph payloads from the query executor.

use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::components::force_graph::{ApiConfig, GraphPayload};

#[derive(Debug, Error)]
pub enum FetchError {
	#[error("no browser window available")]
	NoWindow,
	#[error("network error: {0}")]
	Network(String),
	#[error("{message}")]
	Status { status: u16, message: String },
	#[error("query failed: {0}")]
	Query(String),
	#[error("invalid graph payload: {0}")]
	Decode(#[from] serde_json::Error),
}

/// Where a fetch is in its lifecycle, for the status line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PayloadStatus {
	#[default]
	Idle,
	Loading,
	Ready {
		nodes: usize,
		links: usize,
	},
	Failed(String),
}

impl PayloadStatus {
	pub fn ready(payload: &GraphPayload) -> Self {
		Self::Ready {
			nodes: payload.nodes.len(),
			links: payload.links.len(),
		}
	}
}

#[derive(Deserialize)]
struct ErrorBody {
	error: Option<String>,
}

/// The default fetch for `None` or a blank query, otherwise the query as a
/// URL parameter.
pub fn request_url(config: &ApiConfig, query: Option<&str>) -> String {
	let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
		return config.endpoint.clone();
	};
	let params = url::form_urlencoded::Serializer::new(String::new())
		.append_pair(&config.query_param, query)
		.finish();
	let sep = if config.endpoint.contains('?') { '&' } else { '?' };
	format!("{}{sep}{params}", config.endpoint)
}

/// Turn a response status and body into a payload or a readable error.
pub fn parse_graph_response(status: u16, body: &str) -> Result<GraphPayload, FetchError> {
	let reported = serde_json::from_str::<ErrorBody>(body)
		.ok()
		.and_then(|b| b.error)
		.filter(|e| !e.trim().is_empty());

	if !(200..300).contains(&status) {
		return Err(FetchError::Status {
			status,
			message: reported.unwrap_or_else(|| format!("request failed with status {status}")),
		});
	}
	if let Some(message) = reported {
		return Err(FetchError::Query(message));
	}
	Ok(serde_json::from_str(body)?)
}

fn js_message(value: &wasm_bindgen::JsValue) -> String {
	value
		.dyn_ref::<js_sys::Error>()
		.map(|e| String::from(e.message()))
		.or_else(|| value.as_string())
		.unwrap_or_else(|| "request could not be sent".into())
}

/// Fetch a payload: the default graph, or the result of `query`.
pub async fn fetch_graph(config: &ApiConfig, query: Option<&str>) -> Result<GraphPayload, FetchError> {
	let window = web_sys::window().ok_or(FetchError::NoWindow)?;
	let url = request_url(config, query);

	let response: Response = JsFuture::from(window.fetch_with_str(&url))
		.await
		.map_err(|e| FetchError::Network(js_message(&e)))?
		.dyn_into()
		.map_err(|e| FetchError::Network(js_message(&e)))?;

	let text = response
		.text()
		.map_err(|e| FetchError::Network(js_message(&e)))?;
	let body = JsFuture::from(text)
		.await
		.map_err(|e| FetchError::Network(js_message(&e)))?
		.as_string()
		.unwrap_or_default();

	parse_graph_response(response.status(), &body)
}
