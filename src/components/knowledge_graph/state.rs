use std::collections::HashMap;

use super::scene::{self, Scene};
use super::sim::{REHEAT_TARGET, Simulation, SimulationConfig};
use super::types::{GraphError, GraphPayload};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;
pub const HIT_RADIUS: f64 = 15.0;

/// Pan/zoom transform applied to the whole rendered group, independent of
/// the physics.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
struct DragState {
	node_id: Option<String>,
}

#[derive(Clone, Debug, Default)]
struct PanState {
	active: bool,
	start_x: f64,
	start_y: f64,
	transform_start_x: f64,
	transform_start_y: f64,
}

/// Lifecycle of a mounted view holding a valid payload. The empty state
/// (no payload yet, or an invalid one) is the absence of a `GraphViewState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewPhase {
	/// The simulation is stepping; elements re-project every frame.
	Rendering,
	/// The simulation has settled. Drag-start on a node reheats it.
	Idle,
}

/// All state behind one rendered payload: the simulation, the viewport
/// transform, and the in-flight pointer gesture. A new payload replaces the
/// whole value, so nothing here can outlive the data it was built from.
#[derive(Debug)]
pub struct GraphViewState {
	payload: GraphPayload,
	sim: Simulation,
	pub transform: ViewTransform,
	drag: DragState,
	pan: PanState,
	pub width: f64,
	pub height: f64,
	phase: ViewPhase,
	label_boxes: HashMap<String, (f64, f64)>,
}

impl GraphViewState {
	pub fn new(payload: GraphPayload, width: f64, height: f64) -> Result<Self, GraphError> {
		payload.validate()?;
		let config = SimulationConfig {
			collide_radius: Some(scene::NODE_RADIUS),
			..SimulationConfig::default()
		};
		let sim = Simulation::new(&payload, (width / 2.0, height / 2.0), config);
		Ok(Self {
			payload,
			sim,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			phase: ViewPhase::Rendering,
			label_boxes: HashMap::new(),
		})
	}

	pub fn phase(&self) -> ViewPhase {
		self.phase
	}

	/// Advance the simulation one step while rendering; park once settled.
	pub fn tick(&mut self) {
		if self.phase == ViewPhase::Rendering {
			self.sim.step();
			if self.sim.settled() {
				self.phase = ViewPhase::Idle;
			}
		}
	}

	/// The current drawable element set.
	pub fn scene(&self) -> Scene<'_> {
		scene::project(&self.payload, &self.sim, self.width)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_position(&self, id: &str) -> Option<(f64, f64)> {
		self.sim.position(id)
	}

	pub fn node_screen_position(&self, id: &str) -> Option<(f64, f64)> {
		let (x, y) = self.sim.position(id)?;
		Some((
			x * self.transform.k + self.transform.x,
			y * self.transform.k + self.transform.y,
		))
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		for (id, (x, y)) in self.sim.nodes() {
			let (dx, dy) = (x - gx, y - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(id.to_string());
			}
		}
		found
	}

	/// Pointer-down. On a node: reheat if idle, then pin the node to the
	/// pointer. On the background: start panning.
	pub fn begin_drag(&mut self, sx: f64, sy: f64) {
		if let Some(id) = self.node_at_position(sx, sy) {
			if self.phase == ViewPhase::Idle {
				self.sim.reheat(REHEAT_TARGET);
				self.phase = ViewPhase::Rendering;
			}
			let (gx, gy) = self.screen_to_graph(sx, sy);
			self.sim.pin(&id, gx, gy);
			self.drag.node_id = Some(id);
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	/// Pointer-move: re-pin the dragged node to follow the pointer, or pan.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		if let Some(id) = self.drag.node_id.clone() {
			let (gx, gy) = self.screen_to_graph(sx, sy);
			self.sim.pin(&id, gx, gy);
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	/// Pointer-up or leave: return the node to the physics and let the
	/// simulation cool back toward idle.
	pub fn end_drag(&mut self) {
		if let Some(id) = self.drag.node_id.take() {
			self.sim.unpin(&id);
			self.sim.cool();
		}
		self.pan.active = false;
	}

	/// Wheel zoom about the cursor, clamped to the configured scale range.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.sim.set_center((width / 2.0, height / 2.0));
	}

	pub fn label_box(&self, id: &str) -> Option<(f64, f64)> {
		self.label_boxes.get(id).copied()
	}

	pub fn set_label_box(&mut self, id: &str, width: f64, height: f64) {
		self.label_boxes.insert(id.to_string(), (width, height));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::types::{GraphLink, GraphNode};

	fn linked_payload(ids: &[&str]) -> GraphPayload {
		GraphPayload {
			nodes: ids
				.iter()
				.map(|id| GraphNode {
					id: (*id).into(),
					label: (*id).to_uppercase(),
				})
				.collect(),
			links: ids
				.windows(2)
				.map(|pair| GraphLink {
					source: pair[0].into(),
					target: pair[1].into(),
				})
				.collect(),
		}
	}

	fn state() -> GraphViewState {
		GraphViewState::new(linked_payload(&["a", "b", "c"]), 800.0, 600.0).unwrap()
	}

	#[test]
	fn test_invalid_payload_is_rejected() {
		let err = GraphViewState::new(GraphPayload::default(), 800.0, 600.0).unwrap_err();
		assert_eq!(err, GraphError::EmptyNodes);
	}

	#[test]
	fn test_zoom_is_clamped_regardless_of_gesture_magnitude() {
		let mut state = state();
		for _ in 0..200 {
			state.zoom_at(400.0, 300.0, -1.0);
		}
		assert_eq!(state.transform.k, MAX_ZOOM);

		for _ in 0..400 {
			state.zoom_at(400.0, 300.0, 1.0);
		}
		assert_eq!(state.transform.k, MIN_ZOOM);
	}

	#[test]
	fn test_zoom_keeps_cursor_point_fixed() {
		let mut state = state();
		let (gx, gy) = state.screen_to_graph(200.0, 150.0);
		state.zoom_at(200.0, 150.0, -1.0);
		let (gx2, gy2) = state.screen_to_graph(200.0, 150.0);
		assert!((gx - gx2).abs() < 1e-9);
		assert!((gy - gy2).abs() < 1e-9);
	}

	#[test]
	fn test_screen_graph_roundtrip() {
		let mut state = state();
		state.zoom_at(100.0, 100.0, -1.0);
		state.begin_drag(10.0, 10.0);
		state.drag_to(35.0, 22.0);
		state.end_drag();

		let (x, y) = state.node_position("b").unwrap();
		let (sx, sy) = state.node_screen_position("b").unwrap();
		let (gx, gy) = state.screen_to_graph(sx, sy);
		assert!((gx - x).abs() < 1e-9);
		assert!((gy - y).abs() < 1e-9);
	}

	#[test]
	fn test_drag_pins_node_until_release() {
		let mut state = state();
		for _ in 0..5 {
			state.tick();
		}

		let (sx, sy) = state.node_screen_position("a").unwrap();
		state.begin_drag(sx, sy);
		state.drag_to(sx + 30.0, sy + 10.0);
		let pinned = state.node_position("a").unwrap();

		for _ in 0..20 {
			state.tick();
		}
		assert_eq!(state.node_position("a"), Some(pinned));

		state.end_drag();
		for _ in 0..20 {
			state.tick();
		}
		assert_ne!(state.node_position("a"), Some(pinned));
	}

	#[test]
	fn test_background_drag_pans_viewport() {
		let mut state = state();
		// Far corner, no node within hit range there.
		state.begin_drag(5.0, 5.0);
		state.drag_to(45.0, 25.0);
		assert_eq!(state.transform.x, 40.0);
		assert_eq!(state.transform.y, 20.0);
		let pos_before = state.node_position("a");
		state.end_drag();
		assert_eq!(state.node_position("a"), pos_before);
	}

	#[test]
	fn test_phase_rendering_to_idle_and_back_on_drag() {
		let mut state = state();
		assert_eq!(state.phase(), ViewPhase::Rendering);

		let mut steps = 0;
		while state.phase() != ViewPhase::Idle {
			state.tick();
			steps += 1;
			assert!(steps <= 400, "never went idle");
		}

		// Background drag while idle does not wake the simulation.
		state.begin_drag(5.0, 5.0);
		state.end_drag();
		assert_eq!(state.phase(), ViewPhase::Idle);

		let (sx, sy) = state.node_screen_position("a").unwrap();
		state.begin_drag(sx, sy);
		assert_eq!(state.phase(), ViewPhase::Rendering);
		state.end_drag();
	}

	#[test]
	fn test_resize_recenters_simulation() {
		let mut state = state();
		state.resize(1000.0, 500.0);
		assert_eq!(state.width, 1000.0);
		assert_eq!(state.height, 500.0);
		for _ in 0..50 {
			state.tick();
		}
		let n = 3.0;
		let (mx, my) = ["a", "b", "c"]
			.iter()
			.filter_map(|id| state.node_position(id))
			.fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
		assert!((mx / n - 500.0).abs() < 1.0);
		assert!((my / n - 250.0).abs() < 1.0);
	}
}
