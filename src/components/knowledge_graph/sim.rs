//! Force-directed layout simulation.
//!
//! Forces:
//! - Pairwise charge repulsion (`strength * alpha / d^2`)
//! - Hooke springs along links toward a rest length
//! - Centroid recentering on the canvas center
//! - Optional minimum-separation constraint
//!
//! The integrator is a discrete stepper with a decaying energy budget
//! (`alpha`). Node positions are owned here in a body table keyed by node id;
//! the payload types never carry simulation state. Seeding is a fixed ring, so
//! a run is reproducible step for step.

use std::collections::HashMap;
use std::f64::consts::PI;

use super::types::GraphPayload;

/// Energy target applied while a node is being dragged.
pub const REHEAT_TARGET: f64 = 0.3;

const SEED_RING_RADIUS: f64 = 100.0;

#[derive(Clone, Debug)]
pub struct SimulationConfig {
	/// Charge strength, negative for repulsion.
	pub charge_strength: f64,
	/// Spring rest length for links.
	pub link_distance: f64,
	/// Spring stiffness for links.
	pub link_strength: f64,
	/// Minimum-separation radius. `None` disables the constraint.
	pub collide_radius: Option<f64>,
	/// Energy floor below which the simulation counts as settled.
	pub alpha_min: f64,
	/// Per-step interpolation factor of alpha toward its target.
	pub alpha_decay: f64,
	/// Per-step velocity loss, in (0, 1).
	pub velocity_decay: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			charge_strength: -300.0,
			link_distance: 100.0,
			link_strength: 0.1,
			collide_radius: None,
			alpha_min: 0.001,
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			velocity_decay: 0.4,
		}
	}
}

#[derive(Clone, Debug)]
struct Body {
	x: f64,
	y: f64,
	vx: f64,
	vy: f64,
	fx: Option<f64>,
	fy: Option<f64>,
}

#[derive(Debug)]
pub struct Simulation {
	config: SimulationConfig,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	ids: Vec<String>,
	bodies: Vec<Body>,
	index: HashMap<String, usize>,
	links: Vec<(usize, usize)>,
}

impl Simulation {
	/// Build a simulation for one payload, seeding nodes on a ring around
	/// `center`. Links naming unknown node ids are skipped.
	pub fn new(payload: &GraphPayload, center: (f64, f64), config: SimulationConfig) -> Self {
		let count = payload.nodes.len().max(1);
		let mut ids = Vec::with_capacity(payload.nodes.len());
		let mut bodies = Vec::with_capacity(payload.nodes.len());
		let mut index = HashMap::new();

		for (i, node) in payload.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count as f64;
			bodies.push(Body {
				x: center.0 + SEED_RING_RADIUS * angle.cos(),
				y: center.1 + SEED_RING_RADIUS * angle.sin(),
				vx: 0.0,
				vy: 0.0,
				fx: None,
				fy: None,
			});
			index.insert(node.id.clone(), i);
			ids.push(node.id.clone());
		}

		let links = payload
			.links
			.iter()
			.filter_map(|link| {
				let s = *index.get(&link.source)?;
				let t = *index.get(&link.target)?;
				Some((s, t))
			})
			.collect();

		Self {
			config,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			ids,
			bodies,
			index,
			links,
		}
	}

	/// One integration step: decay alpha, accumulate forces into velocities,
	/// recenter, then move bodies. Pinned bodies snap to their pin and carry
	/// no velocity.
	pub fn step(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		self.apply_charge();
		self.apply_springs();
		self.apply_centering();
		if let Some(radius) = self.config.collide_radius {
			self.apply_collide(radius);
		}
		self.integrate();
	}

	/// True once the energy budget has decayed below the floor. Reheating
	/// makes this false again until the next cool-down.
	pub fn settled(&self) -> bool {
		self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
	}

	/// Raise the energy target, waking a settled simulation.
	pub fn reheat(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Let the energy budget decay back toward zero.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	/// Fix a node at a position, overriding the physics until `unpin`. The
	/// position snaps immediately so a pinned node tracks the pointer even
	/// between steps.
	pub fn pin(&mut self, id: &str, x: f64, y: f64) {
		if let Some(&i) = self.index.get(id) {
			let b = &mut self.bodies[i];
			b.fx = Some(x);
			b.fy = Some(y);
			b.x = x;
			b.y = y;
			b.vx = 0.0;
			b.vy = 0.0;
		}
	}

	/// Return a node to simulation control.
	pub fn unpin(&mut self, id: &str) {
		if let Some(&i) = self.index.get(id) {
			self.bodies[i].fx = None;
			self.bodies[i].fy = None;
		}
	}

	pub fn position(&self, id: &str) -> Option<(f64, f64)> {
		let &i = self.index.get(id)?;
		Some((self.bodies[i].x, self.bodies[i].y))
	}

	/// Node ids with their current positions, in payload order.
	pub fn nodes(&self) -> impl Iterator<Item = (&str, (f64, f64))> {
		self.ids
			.iter()
			.zip(self.bodies.iter())
			.map(|(id, b)| (id.as_str(), (b.x, b.y)))
	}

	/// Resolved link endpoints as position pairs.
	pub fn link_endpoints(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
		self.links.iter().map(|&(s, t)| {
			let a = &self.bodies[s];
			let b = &self.bodies[t];
			((a.x, a.y), (b.x, b.y))
		})
	}

	pub fn node_count(&self) -> usize {
		self.bodies.len()
	}

	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	pub fn set_center(&mut self, center: (f64, f64)) {
		self.center = center;
	}

	fn apply_charge(&mut self) {
		let n = self.bodies.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let dx = self.bodies[j].x - self.bodies[i].x;
				let dy = self.bodies[j].y - self.bodies[i].y;
				let d2 = (dx * dx + dy * dy).max(1.0);
				let d = d2.sqrt();
				let push = -self.config.charge_strength * self.alpha / d2;
				let (ux, uy) = (dx / d, dy / d);
				self.bodies[i].vx -= ux * push;
				self.bodies[i].vy -= uy * push;
				self.bodies[j].vx += ux * push;
				self.bodies[j].vy += uy * push;
			}
		}
	}

	fn apply_springs(&mut self) {
		for k in 0..self.links.len() {
			let (s, t) = self.links[k];
			if s == t {
				continue;
			}
			let dx = self.bodies[t].x - self.bodies[s].x;
			let dy = self.bodies[t].y - self.bodies[s].y;
			let d = (dx * dx + dy * dy).sqrt().max(1.0);
			let displacement = d - self.config.link_distance;
			let f = displacement * self.config.link_strength * self.alpha;
			let (ux, uy) = (dx / d, dy / d);
			self.bodies[s].vx += ux * f * 0.5;
			self.bodies[s].vy += uy * f * 0.5;
			self.bodies[t].vx -= ux * f * 0.5;
			self.bodies[t].vy -= uy * f * 0.5;
		}
	}

	fn apply_centering(&mut self) {
		let n = self.bodies.len();
		if n == 0 {
			return;
		}
		let mx = self.bodies.iter().map(|b| b.x).sum::<f64>() / n as f64;
		let my = self.bodies.iter().map(|b| b.y).sum::<f64>() / n as f64;
		let (sx, sy) = (self.center.0 - mx, self.center.1 - my);
		for b in &mut self.bodies {
			b.x += sx;
			b.y += sy;
		}
	}

	fn apply_collide(&mut self, radius: f64) {
		let min_d = radius * 2.0;
		let n = self.bodies.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let dx = self.bodies[j].x - self.bodies[i].x;
				let dy = self.bodies[j].y - self.bodies[i].y;
				let d = (dx * dx + dy * dy).max(1e-6).sqrt();
				if d >= min_d {
					continue;
				}
				let half = (min_d - d) * 0.5;
				let (ux, uy) = (dx / d, dy / d);
				self.bodies[i].x -= ux * half;
				self.bodies[i].y -= uy * half;
				self.bodies[j].x += ux * half;
				self.bodies[j].y += uy * half;
			}
		}
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.config.velocity_decay;
		for b in &mut self.bodies {
			if let (Some(fx), Some(fy)) = (b.fx, b.fy) {
				b.x = fx;
				b.y = fy;
				b.vx = 0.0;
				b.vy = 0.0;
			} else {
				b.vx *= keep;
				b.vy *= keep;
				b.x += b.vx;
				b.y += b.vy;
			}
		}
	}
}
