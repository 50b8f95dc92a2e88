use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scene::LabelSide;
use super::state::GraphViewState;

const BACKGROUND_FILL: &str = "#fafafa";
const WIRE_STROKE: &str = "#999";
const WIRE_ALPHA: f64 = 0.6;
const MARKER_STROKE: &str = "#fff";
const LABEL_FONT: &str = "10px sans-serif";
const LABEL_FILL: &str = "#333";
const LABEL_PLATE_FILL: &str = "rgba(255, 255, 255, 0.85)";
const LABEL_HEIGHT: f64 = 10.0;
const PLATE_PADDING: f64 = 2.0;

/// Reset the surface to the empty background. Used on its own when a payload
/// fails validation, so no partial scene survives.
pub fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_fill_style_str(BACKGROUND_FILL);
	ctx.fill_rect(0.0, 0.0, width, height);
}

fn estimate_width(text: &str) -> f64 {
	6.0 * text.len() as f64
}

/// Paint one frame: wires, markers, then label plates and text, all under
/// the current pan/zoom transform.
pub fn render(state: &mut GraphViewState, ctx: &CanvasRenderingContext2d) {
	// Measure labels the first time they appear; the boxes are owned by the
	// rendering step and die with the payload's view state.
	ctx.set_font(LABEL_FONT);
	let missing: Vec<(String, String)> = state
		.scene()
		.labels
		.iter()
		.filter(|label| state.label_box(label.node_id).is_none())
		.map(|label| (label.node_id.to_string(), label.text.to_string()))
		.collect();
	for (id, text) in missing {
		let width = ctx
			.measure_text(&text)
			.map(|m| m.width())
			.unwrap_or_else(|_| estimate_width(&text));
		state.set_label_box(&id, width, LABEL_HEIGHT);
	}

	clear(ctx, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let scene = state.scene();

	ctx.set_global_alpha(WIRE_ALPHA);
	ctx.set_stroke_style_str(WIRE_STROKE);
	ctx.set_line_width(1.0);
	for wire in &scene.wires {
		ctx.begin_path();
		ctx.move_to(wire.x1, wire.y1);
		ctx.line_to(wire.x2, wire.y2);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);

	for marker in &scene.markers {
		ctx.begin_path();
		let _ = ctx.arc(marker.x, marker.y, marker.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(marker.fill);
		ctx.fill();
		ctx.set_stroke_style_str(MARKER_STROKE);
		ctx.set_line_width(1.5);
		ctx.stroke();
	}

	ctx.set_font(LABEL_FONT);
	ctx.set_text_baseline("middle");
	for label in &scene.labels {
		let (width, height) = state
			.label_box(label.node_id)
			.unwrap_or_else(|| (estimate_width(label.text), LABEL_HEIGHT));
		let text_x = match label.side {
			LabelSide::Right => label.anchor_x,
			LabelSide::Left => label.anchor_x - width,
		};
		ctx.set_fill_style_str(LABEL_PLATE_FILL);
		ctx.fill_rect(
			text_x - PLATE_PADDING,
			label.anchor_y - height / 2.0 - PLATE_PADDING,
			width + 2.0 * PLATE_PADDING,
			height + 2.0 * PLATE_PADDING,
		);
		ctx.set_fill_style_str(LABEL_FILL);
		let _ = ctx.fill_text(label.text, text_x, label.anchor_y);
	}

	ctx.restore();
}
