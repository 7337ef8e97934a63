//! Force-directed layout for query results, and the canvas that shows it.

mod component;
pub mod config;
pub mod layout;
pub mod links;
pub mod palette;
mod render;
pub mod schedule;
pub mod search;
pub mod selection;
pub mod simulation;
pub mod state;
pub mod types;

pub use component::ForceGraphCanvas;
pub use config::{ApiConfig, SimulationConfig};
pub use selection::{Selection, SelectionView};
pub use types::{GraphLink, GraphNode, GraphPayload, LinkId, NodeId};
