//! Flat presentation: a perspective-simulated tank drawn with 2D fills.
//!
//! The whole frame is redrawn from the store snapshot and the current
//! [`FlatLayout`] on every call. Objects are positioned inside the tank
//! outline, which is the interaction container.

#[cfg(test)]
#[path = "flat_test.rs"]
mod flat_test;

use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{ObjectKind, SceneObject};
use crate::geom::Point;
use crate::hit::ObjectFrame;
use crate::render::background;
use crate::render::layout::FlatLayout;
use crate::render::style::{self, CARD_BORDER, CARD_FILL, HANDLE_FILL, LABEL_COLOR, SELECTION_COLOR};
use crate::render::texture::GrainTexture;
use crate::render::{Color, Paint, Stroke, Surface, stop, water_span};
use crate::store::SceneStore;
use crate::tank::TankConfig;

const RIM_COLOR: Color = Color::rgba(127, 219, 202, 0.9);
const EDGE_LINE_COLOR: Color = Color::rgba(180, 210, 220, 0.6);
const OUTLINE_COLOR: Color = Color::rgba(150, 180, 200, 0.3);
const WATER_TOP: Color = Color::rgba(135, 206, 235, 0.08);
const WATER_BOTTOM: Color = Color::rgba(70, 130, 180, 0.15);
const WATER_SURFACE: Color = Color::rgba(135, 206, 235, 0.5);
const INFO_COLOR: Color = Color::rgb(71, 85, 105);

/// Opacity of the grain over the substrate's top and front faces.
const GRAIN_TOP_ALPHA: f64 = 0.6;
const GRAIN_FRONT_ALPHA: f64 = 0.5;

const LABEL_SIZE_PX: f64 = 11.0;
const INFO_SIZE_PX: f64 = 12.0;

/// Draw the full flat scene.
///
/// `grain` must be the tile for the store's current substrate; callers get
/// it from a [`GrainCache`](crate::render::texture::GrainCache).
///
/// # Errors
///
/// Returns the surface's error if any drawing call fails.
pub fn draw<S: Surface>(
    surface: &mut S,
    store: &SceneStore,
    tank: &TankConfig,
    layout: &FlatLayout,
    grain: &GrainTexture,
) -> Result<(), S::Error> {
    surface.clear(layout.width, layout.height)?;

    // Layer 1: back wall and receding panels.
    let dark = store.background().preset.is_dark();
    background::paint(surface, layout.back_rect(), store.background().preset)?;
    draw_panels(surface, layout, dark)?;

    // Layer 2: substrate bed and water.
    draw_substrate(surface, store, layout, grain)?;
    draw_water(surface, store, layout)?;

    // Layer 3: glass.
    draw_glass(surface, layout)?;

    // Layer 4: objects in z-order (bottom first), then selection UI.
    for obj in store.sorted_objects() {
        draw_object(surface, obj, layout)?;
    }
    if let Some(selected) = store.selected_object() {
        draw_selection(surface, selected, layout)?;
    }

    draw_info(surface, tank, layout)
}

// =============================================================
// Tank body
// =============================================================

fn draw_panels<S: Surface>(surface: &mut S, layout: &FlatLayout, dark: bool) -> Result<(), S::Error> {
    let t = layout.tank;
    let d = layout.depth;
    let (edge, inner) = if dark {
        (Color::rgba(40, 45, 50, 0.8), Color::rgba(20, 22, 25, 0.5))
    } else {
        (Color::rgba(220, 235, 240, 0.7), Color::rgba(245, 250, 252, 0.3))
    };

    let left = Paint::Linear {
        from: Point::new(t.x, t.y),
        to: Point::new(t.x + d, t.y),
        stops: vec![stop(0.0, edge), stop(1.0, inner)],
    };
    surface.fill_polygon(&layout.left_panel(), &left)?;

    let right_x = t.right();
    let right = Paint::Linear {
        from: Point::new(right_x - d, t.y),
        to: Point::new(right_x, t.y),
        stops: vec![stop(0.0, inner), stop(1.0, edge)],
    };
    surface.fill_polygon(&layout.right_panel(), &right)?;

    let (far, near) = if dark {
        (Color::rgba(30, 30, 30, 0.6), Color::rgba(15, 15, 15, 0.8))
    } else {
        (Color::rgba(240, 245, 248, 0.4), Color::rgba(200, 215, 225, 0.6))
    };
    let bottom = Paint::Linear {
        from: Point::new(t.x, t.bottom() - d),
        to: Point::new(t.x, t.bottom()),
        stops: vec![stop(0.0, far), stop(1.0, near)],
    };
    surface.fill_polygon(&layout.bottom_panel(), &bottom)
}

fn draw_substrate<S: Surface>(
    surface: &mut S,
    store: &SceneStore,
    layout: &FlatLayout,
    grain: &GrainTexture,
) -> Result<(), S::Error> {
    let substrate = store.substrate();
    let base = Color::from_hex_or(&substrate.color, Color::from_hex_or(substrate.kind.swatch(), Color::BLACK));

    let top = layout.substrate_top(substrate.height);
    surface.fill_polygon(&top, &Paint::Solid(base.mix(Color::BLACK, 0.35)))?;
    surface.fill_grain(&top, grain, GRAIN_TOP_ALPHA)?;

    let front = layout.substrate_front(substrate.height);
    let face = Paint::Linear {
        from: front[0],
        to: front[3],
        stops: vec![stop(0.0, base.mix(Color::BLACK, 0.45)), stop(1.0, base.mix(Color::BLACK, 0.6))],
    };
    surface.fill_polygon(&front, &face)?;
    surface.fill_grain(&front, grain, GRAIN_FRONT_ALPHA)
}

fn draw_water<S: Surface>(surface: &mut S, store: &SceneStore, layout: &FlatLayout) -> Result<(), S::Error> {
    let water = store.water();
    let span = water_span(water.level, store.substrate().height);
    if !span.is_visible() {
        return Ok(());
    }
    let band = layout.water_band(span);
    let tint = Color::from_hex_or(&water.tint, WATER_TOP);
    let density = 0.5 + 0.5 * water.clarity.clamp(0.0, 1.0);
    let shade = |c: Color| c.mix(tint.with_alpha(c.a), 0.3).with_alpha(c.a * density);
    let stops = vec![stop(0.0, shade(WATER_TOP)), stop(1.0, shade(WATER_BOTTOM))];
    let paint = Paint::Linear { from: Point::new(band.x, band.y), to: Point::new(band.x, band.bottom()), stops };
    surface.fill_rect(band, &paint)?;

    let surface_line = [Point::new(band.x, band.y), Point::new(band.right(), band.y)];
    surface.stroke_polyline(&surface_line, false, &Stroke::new(WATER_SURFACE, 2.0))
}

fn draw_glass<S: Surface>(surface: &mut S, layout: &FlatLayout) -> Result<(), S::Error> {
    for rim in layout.rims() {
        surface.fill_rect(rim, &Paint::Solid(RIM_COLOR))?;
    }
    let edge = Stroke::new(EDGE_LINE_COLOR, 1.0);
    for line in layout.edge_lines() {
        surface.stroke_polyline(&line, false, &edge)?;
    }
    surface.stroke_polyline(&layout.tank.corners(), true, &Stroke::new(OUTLINE_COLOR, 2.0))
}

// =============================================================
// Objects
// =============================================================

/// An object's footprint moved from container space to canvas space.
fn canvas_frame(obj: &SceneObject, layout: &FlatLayout) -> ObjectFrame {
    let t = layout.tank;
    let mut frame = ObjectFrame::of(obj, t.width, t.height);
    frame.center = frame.center.offset(t.x, t.y);
    frame
}

fn draw_object<S: Surface>(surface: &mut S, obj: &SceneObject, layout: &FlatLayout) -> Result<(), S::Error> {
    let frame = canvas_frame(obj, layout);

    if obj.kind == ObjectKind::Custom {
        if let Some(asset) = obj.custom_asset_id() {
            if surface.draw_asset(asset, frame.center, frame.half * 2.0, frame.rotation)? {
                return Ok(());
            }
        }
    }

    let corners = frame.corners();
    surface.fill_polygon(&corners, &Paint::Solid(CARD_FILL))?;
    surface.stroke_polyline(&corners, true, &Stroke::new(CARD_BORDER, 1.0))?;

    let look = style::style_for(obj.kind);
    let glyph_center = frame.center.offset(0.0, -frame.half * 0.15).rotate_around(frame.center, frame.rotation);
    let glyph = look.glyph.placed(glyph_center, frame.half * 0.45, frame.rotation);
    surface.fill_polygon(&glyph, &Paint::Solid(look.icon))?;

    let label_at = frame.center.offset(0.0, frame.half * 0.65).rotate_around(frame.center, frame.rotation);
    surface.fill_text(&obj.name, label_at, LABEL_SIZE_PX * frame.half / 32.0, frame.rotation, LABEL_COLOR)
}

fn draw_selection<S: Surface>(surface: &mut S, obj: &SceneObject, layout: &FlatLayout) -> Result<(), S::Error> {
    let frame = canvas_frame(obj, layout);
    let outline = Stroke::new(SELECTION_COLOR, 2.0);
    surface.stroke_polyline(&frame.corners(), true, &outline)?;

    let handle = frame.rotate_handle();
    surface.stroke_polyline(&[frame.top_mid(), handle], false, &outline)?;
    draw_handle(surface, handle)?;
    for corner in frame.corners() {
        draw_handle(surface, corner)?;
    }
    Ok(())
}

fn draw_handle<S: Surface>(surface: &mut S, at: Point) -> Result<(), S::Error> {
    let r = HANDLE_RADIUS_PX * 0.75;
    surface.fill_ellipse(at, r, r, &Paint::Solid(SELECTION_COLOR))?;
    surface.fill_ellipse(at, r - 2.0, r - 2.0, &Paint::Solid(HANDLE_FILL))
}

// =============================================================
// Overlay
// =============================================================

fn draw_info<S: Surface>(surface: &mut S, tank: &TankConfig, layout: &FlatLayout) -> Result<(), S::Error> {
    let (dims, volume) = tank.summary();
    let x = layout.width * 0.5;
    let y = layout.tank.y * 0.5;
    surface.fill_text(&dims, Point::new(x, y - INFO_SIZE_PX * 0.6), INFO_SIZE_PX, 0.0, INFO_COLOR)?;
    surface.fill_text(&volume, Point::new(x, y + INFO_SIZE_PX * 0.6), INFO_SIZE_PX, 0.0, INFO_COLOR)
}
