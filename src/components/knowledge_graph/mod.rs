mod component;
mod render;
mod scene;
mod sim;
mod state;
mod types;

pub use component::KnowledgeGraphCanvas;
pub use types::{GraphError, GraphLink, GraphNode, GraphPayload};
