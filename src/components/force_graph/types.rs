use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Number, Value};

/// Identity of a node within one payload.
///
/// Ids arrive as JSON strings or numbers and are always compared by their
/// string form, so `7` and `"7"` name the same node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

/// Identity of a link within one payload. Same coercion rules as [`NodeId`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(String);

macro_rules! string_id {
	($ty:ident) => {
		impl $ty {
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl fmt::Display for $ty {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<&str> for $ty {
			fn from(s: &str) -> Self {
				Self(s.to_owned())
			}
		}

		impl From<String> for $ty {
			fn from(s: String) -> Self {
				Self(s)
			}
		}

		impl From<i64> for $ty {
			fn from(n: i64) -> Self {
				Self(n.to_string())
			}
		}

		impl<'de> Deserialize<'de> for $ty {
			fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
				match Value::deserialize(deserializer)? {
					Value::String(s) => Ok(Self(s)),
					Value::Number(n) => Ok(Self(stringify_number(&n))),
					other => Err(de::Error::custom(format!(
						"id must be a string or a number, got {other}"
					))),
				}
			}
		}
	};
}

string_id!(NodeId);
string_id!(LinkId);

/// Integral floats print without a fractional part (`3.0` -> `"3"`).
pub fn stringify_number(n: &Number) -> String {
	match n.as_f64() {
		Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
		_ => n.to_string(),
	}
}

/// Display form of a property value: strings unquoted, everything else as JSON.
pub fn stringify_value(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Number(n) => stringify_number(n),
		other => other.to_string(),
	}
}

pub type Properties = BTreeMap<String, Value>;

fn nullable_properties<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Properties, D::Error> {
	Ok(Option::<Properties>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	pub id: NodeId,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default, deserialize_with = "nullable_properties")]
	pub properties: Properties,
}

impl GraphNode {
	pub fn new(id: impl Into<NodeId>) -> Self {
		Self {
			id: id.into(),
			label: None,
			properties: Properties::new(),
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.properties.insert(key.into(), value.into());
		self
	}

	/// Text drawn next to the node: a `name` property if present, else the id.
	pub fn caption(&self) -> String {
		self.properties
			.get("name")
			.map(stringify_value)
			.unwrap_or_else(|| self.id.to_string())
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphLink {
	pub id: LinkId,
	pub source: NodeId,
	pub target: NodeId,
	#[serde(rename = "type", default)]
	pub kind: Option<String>,
	#[serde(default, deserialize_with = "nullable_properties")]
	pub properties: Properties,
}

impl GraphLink {
	pub fn new(id: impl Into<LinkId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			kind: None,
			properties: Properties::new(),
		}
	}

	pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
		self.kind = Some(kind.into());
		self
	}
}

/// One complete node and link dataset from the query executor.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphPayload {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<GraphLink>,
}
