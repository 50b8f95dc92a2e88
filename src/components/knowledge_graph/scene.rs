//! Projection of a payload plus simulated positions into drawable elements.
//!
//! The element set is recomputed from scratch every frame; nothing here
//! retains state between frames, so a replaced payload can never leak stale
//! elements into a newer render.

use super::sim::Simulation;
use super::types::GraphPayload;

pub const NODE_RADIUS: f64 = 10.0;
pub const ORIGIN_RADIUS: f64 = 15.0;
pub const NODE_FILL: &str = "#69b3a2";
pub const ORIGIN_FILL: &str = "#ff0000";

const LABEL_GAP: f64 = 4.0;

/// Which side of its node a label sits on. Labels flip sides past the
/// horizontal midpoint of the canvas so they stay inside the visible area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelSide {
	Right,
	Left,
}

#[derive(Clone, Debug)]
pub struct Marker<'a> {
	pub id: &'a str,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub fill: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct Wire {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

#[derive(Clone, Debug)]
pub struct Label<'a> {
	pub node_id: &'a str,
	pub text: &'a str,
	/// Horizontal anchor at the node's edge; text extends away from the node.
	pub anchor_x: f64,
	pub anchor_y: f64,
	pub side: LabelSide,
}

#[derive(Clone, Debug, Default)]
pub struct Scene<'a> {
	pub markers: Vec<Marker<'a>>,
	pub wires: Vec<Wire>,
	pub labels: Vec<Label<'a>>,
}

/// Radius and fill for the node at `index`. The first payload node is the
/// query origin and renders larger, in red.
pub fn node_style(index: usize) -> (f64, &'static str) {
	if index == 0 {
		(ORIGIN_RADIUS, ORIGIN_FILL)
	} else {
		(NODE_RADIUS, NODE_FILL)
	}
}

/// Compute the full drawable set for the current simulation positions.
pub fn project<'a>(payload: &'a GraphPayload, sim: &Simulation, width: f64) -> Scene<'a> {
	let mut scene = Scene {
		markers: Vec::with_capacity(payload.nodes.len()),
		wires: Vec::with_capacity(sim.link_count()),
		labels: Vec::with_capacity(payload.nodes.len()),
	};

	for ((x1, y1), (x2, y2)) in sim.link_endpoints() {
		scene.wires.push(Wire { x1, y1, x2, y2 });
	}

	for (i, node) in payload.nodes.iter().enumerate() {
		let Some((x, y)) = sim.position(&node.id) else {
			continue;
		};
		let (radius, fill) = node_style(i);
		scene.markers.push(Marker {
			id: &node.id,
			x,
			y,
			radius,
			fill,
		});

		let side = if x <= width / 2.0 {
			LabelSide::Right
		} else {
			LabelSide::Left
		};
		let anchor_x = match side {
			LabelSide::Right => x + radius + LABEL_GAP,
			LabelSide::Left => x - radius - LABEL_GAP,
		};
		scene.labels.push(Label {
			node_id: &node.id,
			text: &node.label,
			anchor_x,
			anchor_y: y,
			side,
		});
	}

	scene
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::sim::SimulationConfig;
	use crate::components::knowledge_graph::types::{GraphLink, GraphNode};

	const WIDTH: f64 = 800.0;
	const CENTER: (f64, f64) = (400.0, 300.0);

	fn two_node_payload() -> GraphPayload {
		GraphPayload {
			nodes: vec![
				GraphNode {
					id: "a".into(),
					label: "Apple".into(),
				},
				GraphNode {
					id: "b".into(),
					label: "Banana".into(),
				},
			],
			links: vec![GraphLink {
				source: "a".into(),
				target: "b".into(),
			}],
		}
	}

	#[test]
	fn test_example_payload_projects_expected_elements() {
		let payload = two_node_payload();
		let sim = Simulation::new(&payload, CENTER, SimulationConfig::default());
		let scene = project(&payload, &sim, WIDTH);

		assert_eq!(scene.markers.len(), 2);
		assert_eq!(scene.wires.len(), 1);
		assert_eq!(scene.labels.len(), 2);
		assert_eq!(scene.labels[0].text, "Apple");
		assert_eq!(scene.labels[1].text, "Banana");
	}

	#[test]
	fn test_origin_node_is_larger_and_red() {
		let payload = two_node_payload();
		let sim = Simulation::new(&payload, CENTER, SimulationConfig::default());
		let scene = project(&payload, &sim, WIDTH);

		assert_eq!(scene.markers[0].radius, ORIGIN_RADIUS);
		assert_eq!(scene.markers[0].fill, ORIGIN_FILL);
		assert_eq!(scene.markers[1].radius, NODE_RADIUS);
		assert_eq!(scene.markers[1].fill, NODE_FILL);
	}

	#[test]
	fn test_one_marker_and_label_per_node() {
		let payload = GraphPayload {
			nodes: (0..7)
				.map(|i| GraphNode {
					id: format!("n{i}"),
					label: format!("Node {i}"),
				})
				.collect(),
			links: (1..7)
				.map(|i| GraphLink {
					source: "n0".into(),
					target: format!("n{i}"),
				})
				.collect(),
		};
		let mut sim = Simulation::new(&payload, CENTER, SimulationConfig::default());
		for _ in 0..30 {
			sim.step();
		}
		let scene = project(&payload, &sim, WIDTH);

		assert_eq!(scene.markers.len(), payload.nodes.len());
		assert_eq!(scene.labels.len(), payload.nodes.len());
		for node in &payload.nodes {
			assert_eq!(
				scene.markers.iter().filter(|m| m.id == node.id).count(),
				1
			);
			assert_eq!(
				scene
					.labels
					.iter()
					.filter(|l| l.node_id == node.id)
					.count(),
				1
			);
		}
	}

	#[test]
	fn test_label_flips_past_horizontal_midpoint() {
		let payload = two_node_payload();
		let mut sim = Simulation::new(&payload, CENTER, SimulationConfig::default());

		sim.pin("a", 100.0, 300.0);
		sim.pin("b", 700.0, 300.0);
		sim.step();
		let scene = project(&payload, &sim, WIDTH);

		let a = scene.labels.iter().find(|l| l.node_id == "a").unwrap();
		let b = scene.labels.iter().find(|l| l.node_id == "b").unwrap();
		assert_eq!(a.side, LabelSide::Right);
		assert!(a.anchor_x > 100.0);
		assert_eq!(b.side, LabelSide::Left);
		assert!(b.anchor_x < 700.0);
	}
}
