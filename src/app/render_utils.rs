use eframe::egui::{Color32, Context, Painter, Pos2, Rect, Stroke};

use crate::ledger::EntityKind;

const MAX_SURFACE_DENSITY: f32 = 2.0;
const PLACEHOLDER_GRID_STEP: f32 = 50.0;

pub(super) fn surface_density(native: f32) -> f32 {
    if native.is_finite() && native > 0.0 {
        native.min(MAX_SURFACE_DENSITY)
    } else {
        1.0
    }
}

pub(super) fn apply_surface_density(ctx: &Context) {
    let native = ctx.native_pixels_per_point().unwrap_or(1.0);
    let density = surface_density(native);
    if (ctx.pixels_per_point() - density).abs() > 0.001 {
        ctx.set_pixels_per_point(density);
    }
}

pub(super) fn kind_color(kind: EntityKind) -> Color32 {
    match kind {
        EntityKind::Public => Color32::from_rgb(0x3b, 0x82, 0xf6),
        EntityKind::NonProfit => Color32::from_rgb(0x10, 0xb9, 0x81),
        EntityKind::ForProfit => Color32::from_rgb(0xef, 0x44, 0x44),
        EntityKind::Unknown => Color32::from_rgb(0x94, 0xa3, 0xb8),
    }
}

fn scale_rgb(color: Color32, factor: f32) -> Color32 {
    let channel = |value: u8| (value as f32 * factor).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(channel(color.r()), channel(color.g()), channel(color.b()))
}

pub(super) fn brighter(color: Color32, amount: f32) -> Color32 {
    scale_rgb(color, (1.0 / 0.7_f32).powf(amount))
}

pub(super) fn darker(color: Color32, amount: f32) -> Color32 {
    scale_rgb(color, 0.7_f32.powf(amount))
}

pub(super) fn lerp_color(from: Color32, to: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color32::from_rgba_unmultiplied(
        mix(from.r(), to.r()),
        mix(from.g(), to.g()),
        mix(from.b(), to.b()),
        mix(from.a(), to.a()),
    )
}

pub(super) fn draw_surface(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(0xf8, 0xfa, 0xfc));
}

pub(super) fn draw_placeholder(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(0xf1, 0xf5, 0xf9));
    let stroke = Stroke::new(1.0, Color32::from_rgb(0xe2, 0xe8, 0xf0));

    let mut x = rect.left();
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += PLACEHOLDER_GRID_STEP;
    }

    let mut y = rect.top();
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += PLACEHOLDER_GRID_STEP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_is_capped_at_two() {
        assert_eq!(surface_density(1.0), 1.0);
        assert_eq!(surface_density(1.5), 1.5);
        assert_eq!(surface_density(3.0), 2.0);
        assert_eq!(surface_density(0.0), 1.0);
        assert_eq!(surface_density(f32::NAN), 1.0);
    }

    #[test]
    fn shades_move_in_the_right_direction() {
        let base = kind_color(EntityKind::Public);
        let light = brighter(base, 0.5);
        let dark = darker(base, 0.3);
        assert!(light.r() > base.r() && light.g() > base.g());
        assert!(dark.b() < base.b());
        assert_eq!(brighter(Color32::WHITE, 1.0), Color32::WHITE);
    }

    #[test]
    fn lerp_hits_both_ends() {
        let from = Color32::from_rgb(0, 100, 200);
        let to = Color32::from_rgb(100, 0, 250);
        assert_eq!(lerp_color(from, to, 0.0), from);
        assert_eq!(lerp_color(from, to, 1.0), to);
        assert_eq!(lerp_color(from, to, 0.5), Color32::from_rgb(50, 50, 225));
    }
}
