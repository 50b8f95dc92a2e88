use serde::Deserialize;

/// A labeled entity in the knowledge graph, rendered as a circle.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
}

/// An undirected relation between two nodes, rendered as a line.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
}

/// One query's worth of graph data, exactly as the API returns it.
///
/// A payload fully replaces its predecessor; simulation state (positions,
/// velocities, pins) lives in the view, keyed by node id, never here.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphPayload {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GraphError {
	EmptyNodes,
}

impl std::fmt::Display for GraphError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			GraphError::EmptyNodes => write!(f, "invalid data: payload contains no nodes"),
		}
	}
}

impl std::error::Error for GraphError {}

impl GraphPayload {
	/// A renderable payload has at least one node. The first node is the
	/// query origin and gets the distinguishing styling.
	pub fn validate(&self) -> Result<(), GraphError> {
		if self.nodes.is_empty() {
			return Err(GraphError::EmptyNodes);
		}
		Ok(())
	}

	pub fn origin(&self) -> Option<&GraphNode> {
		self.nodes.first()
	}
}
