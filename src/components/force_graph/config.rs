use serde::Deserialize;

/// Tunables for the layout initializer and the force simulation.
///
/// Every field has a default; a JSON override only needs to name the fields
/// it changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Logical canvas width in layout units.
	pub width: f64,
	/// Logical canvas height in layout units.
	pub height: f64,
	/// Numerator of the inverse-square pairwise repulsion.
	pub repulsion: f64,
	/// Spring rest length.
	pub link_distance: f64,
	pub spring_strength: f64,
	/// Pull toward the canvas center, scaled by the time step.
	pub center_strength: f64,
	/// Per-tick velocity multiplier, must be below 1.
	pub damping: f64,
	/// Fixed simulation step in seconds.
	pub time_step: f64,
	pub max_velocity: f64,
	/// Positions are clamped to `[margin, size - margin]`.
	pub margin: f64,
	/// Added to squared distances so coincident nodes do not blow up.
	pub epsilon: f64,
	/// Inset of the initial grid from the canvas edges.
	pub layout_padding: f64,
	/// Jitter as a fraction of the grid cell size.
	pub jitter_ratio: f64,
	/// Publish a frame every this many ticks.
	pub publish_every: u32,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			width: 960.0,
			height: 540.0,
			repulsion: 1500.0,
			link_distance: 220.0,
			spring_strength: 0.02,
			center_strength: 0.005,
			damping: 0.92,
			time_step: 0.016,
			max_velocity: 35.0,
			margin: 4.0,
			epsilon: 0.01,
			layout_padding: 40.0,
			jitter_ratio: 0.1,
			publish_every: 2,
		}
	}
}

impl SimulationConfig {
	/// Parse a partial override, e.g. `{"repulsion": 900}`.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	pub fn clamp_x(&self, x: f64) -> f64 {
		x.clamp(self.margin, (self.width - self.margin).max(self.margin))
	}

	pub fn clamp_y(&self, y: f64) -> f64 {
		y.clamp(self.margin, (self.height - self.margin).max(self.margin))
	}
}

/// Where graph payloads are fetched from.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
	pub endpoint: String,
	/// Query-string parameter carrying a user query.
	pub query_param: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			endpoint: "/api/graph".into(),
			query_param: "query".into(),
		}
	}
}
