use eframe::egui::{Pos2, Vec2};

#[derive(Clone, Debug, PartialEq)]
pub(super) struct RenderedCircle {
    pub(super) id: String,
    pub(super) center: Pos2,
    pub(super) radius: f32,
}

/// Finds the circle under `pointer`, which is already relative to the surface
/// origin. Both sides are scaled by `density` so the comparison happens in
/// backing pixels, the same space the circles were rasterised in. The last
/// painted circle wins when several contain the point.
pub(super) fn hit_test<'a>(
    rendered: &'a [RenderedCircle],
    pointer: Vec2,
    density: f32,
    interactive: bool,
) -> Option<&'a RenderedCircle> {
    if !interactive || rendered.is_empty() {
        return None;
    }
    let point = pointer * density;
    rendered.iter().rev().find(|circle| {
        let center = circle.center.to_vec2() * density;
        let radius = circle.radius * density;
        (point - center).length_sq() <= radius * radius
    })
}
