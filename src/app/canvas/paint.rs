use std::f32::consts::TAU;

use eframe::egui::{Align2, Color32, FontId, Mesh, Painter, Pos2, Shape, Stroke, vec2};

use crate::util::truncate_label;

use super::super::LayoutNode;
use super::super::render_utils::{brighter, darker, kind_color, lerp_color};
use super::interaction::RenderedCircle;

const INSPECT_ALPHA: f32 = 0.9;
const AMBIENT_ALPHA: f32 = 0.7;
const LABEL_MIN_RADIUS: f32 = 5.0;
const LABEL_MAX_CHARS: usize = 25;
const LABEL_OFFSET: f32 = 15.0;
const LABEL_COLOR: Color32 = Color32::from_rgb(0x0f, 0x17, 0x2a);
const SHADING_RINGS: u32 = 4;

fn rim_segments(radius: f32) -> u32 {
    ((radius * 1.5).ceil() as u32).clamp(12, 72)
}

// One mesh so the node alpha is applied once.
fn shaded_disc(center: Pos2, radius: f32, base: Color32, alpha: f32) -> Mesh {
    let focal = center + vec2(-0.3, -0.3) * radius;
    let highlight = brighter(base, 0.5);
    let segments = rim_segments(radius);

    let mut mesh = Mesh::default();
    mesh.colored_vertex(focal, highlight.gamma_multiply(alpha));
    for ring in 1..=SHADING_RINGS {
        let t = ring as f32 / SHADING_RINGS as f32;
        let color = lerp_color(highlight, base, t).gamma_multiply(alpha);
        for segment in 0..segments {
            let angle = segment as f32 / segments as f32 * TAU;
            let rim = center + vec2(angle.cos(), angle.sin()) * radius;
            mesh.colored_vertex(focal + (rim - focal) * t, color);
        }
    }

    let vertex = |ring: u32, segment: u32| 1 + (ring - 1) * segments + segment % segments;
    for segment in 0..segments {
        mesh.add_triangle(0, vertex(1, segment), vertex(1, segment + 1));
        for ring in 2..=SHADING_RINGS {
            let (inner_a, inner_b) = (vertex(ring - 1, segment), vertex(ring - 1, segment + 1));
            let (outer_a, outer_b) = (vertex(ring, segment), vertex(ring, segment + 1));
            mesh.add_triangle(inner_a, outer_a, outer_b);
            mesh.add_triangle(inner_a, outer_b, inner_b);
        }
    }
    mesh
}

pub(super) fn paint_node(
    painter: &Painter,
    origin: Pos2,
    node: &LayoutNode,
    inspecting: bool,
) -> RenderedCircle {
    let center = origin + node.pos;
    let radius = node.radius;
    let mode_alpha = if inspecting { INSPECT_ALPHA } else { AMBIENT_ALPHA };
    let alpha = (node.opacity * mode_alpha).clamp(0.0, 1.0);
    let base = kind_color(node.kind);

    painter.add(Shape::mesh(shaded_disc(center, radius, base, alpha)));
    painter.circle_stroke(
        center,
        radius,
        Stroke::new(1.0, darker(base, 0.3).gamma_multiply(alpha)),
    );

    if inspecting && radius > LABEL_MIN_RADIUS {
        painter.text(
            center + vec2(0.0, radius + LABEL_OFFSET),
            Align2::CENTER_BOTTOM,
            truncate_label(&node.name, LABEL_MAX_CHARS),
            FontId::proportional((radius * 0.4).max(10.0)),
            LABEL_COLOR.gamma_multiply(INSPECT_ALPHA),
        );
    }

    RenderedCircle {
        id: node.id.clone(),
        center: node.pos.to_pos2(),
        radius,
    }
}
