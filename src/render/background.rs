//! Background presets painted onto the back wall.
//!
//! Each preset is a pure function of the back-wall rectangle: `none` is a pale
//! panel, `black` a solid fill, and `stone-3d` a dark wall with a fixed set
//! of shaded stones at normalized positions.

use crate::doc::BackgroundPreset;
use crate::geom::{Point, Rect};
use crate::render::{Color, Paint, Stroke, Surface, stop};

const PANEL_LIGHT: Color = Color::rgba(245, 248, 250, 0.95);
const PANEL_BORDER: Color = Color::rgba(180, 200, 210, 0.5);
const PANEL_BLACK: Color = Color::rgb(10, 10, 10);
const WALL_TOP: Color = Color::rgb(55, 65, 81);
const WALL_BOTTOM: Color = Color::rgb(17, 24, 39);

/// A stone in the `stone-3d` wall, normalized to the back rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoneSpec {
    /// Centre as a fraction of width/height.
    pub cx: f64,
    pub cy: f64,
    /// Radii as fractions of width/height.
    pub rx: f64,
    pub ry: f64,
    /// Grey level of the stone body.
    pub shade: u8,
}

pub const STONES: [StoneSpec; 9] = [
    StoneSpec { cx: 0.12, cy: 0.18, rx: 0.09, ry: 0.11, shade: 107 },
    StoneSpec { cx: 0.34, cy: 0.12, rx: 0.07, ry: 0.08, shade: 75 },
    StoneSpec { cx: 0.58, cy: 0.2, rx: 0.1, ry: 0.12, shade: 99 },
    StoneSpec { cx: 0.84, cy: 0.15, rx: 0.08, ry: 0.1, shade: 75 },
    StoneSpec { cx: 0.22, cy: 0.5, rx: 0.11, ry: 0.13, shade: 91 },
    StoneSpec { cx: 0.5, cy: 0.47, rx: 0.08, ry: 0.07, shade: 107 },
    StoneSpec { cx: 0.76, cy: 0.52, rx: 0.12, ry: 0.14, shade: 83 },
    StoneSpec { cx: 0.16, cy: 0.82, rx: 0.1, ry: 0.09, shade: 75 },
    StoneSpec { cx: 0.66, cy: 0.84, rx: 0.13, ry: 0.1, shade: 99 },
];

/// A stone resolved to pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stone {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    pub base: Color,
}

/// The stones of the `stone-3d` wall laid out in `rect`.
#[must_use]
pub fn stones(rect: Rect) -> Vec<Stone> {
    STONES
        .iter()
        .map(|s| Stone {
            center: Point::new(rect.x + s.cx * rect.width, rect.y + s.cy * rect.height),
            rx: s.rx * rect.width,
            ry: s.ry * rect.height,
            base: Color::rgb(s.shade, s.shade, s.shade.saturating_add(8)),
        })
        .collect()
}

/// Paint `preset` into the back-wall rectangle.
///
/// # Errors
///
/// Returns the surface's error if a drawing call fails.
pub fn paint<S: Surface>(surface: &mut S, rect: Rect, preset: BackgroundPreset) -> Result<(), S::Error> {
    match preset {
        BackgroundPreset::None => {
            surface.fill_rect(rect, &Paint::Solid(PANEL_LIGHT))?;
            surface.stroke_polyline(&rect.corners(), true, &Stroke::new(PANEL_BORDER, 1.0))
        }
        BackgroundPreset::Black => surface.fill_rect(rect, &Paint::Solid(PANEL_BLACK)),
        BackgroundPreset::Stone3d => {
            let wall = Paint::Linear {
                from: Point::new(rect.x, rect.y),
                to: Point::new(rect.x, rect.bottom()),
                stops: vec![stop(0.0, WALL_TOP), stop(1.0, WALL_BOTTOM)],
            };
            surface.fill_rect(rect, &wall)?;
            for stone in stones(rect) {
                paint_stone(surface, &stone)?;
            }
            Ok(())
        }
    }
}

fn paint_stone<S: Surface>(surface: &mut S, stone: &Stone) -> Result<(), S::Error> {
    // Drop shadow, offset down-right.
    let shadow = stone.center.offset(stone.rx * 0.08, stone.ry * 0.12);
    surface.fill_ellipse(shadow, stone.rx, stone.ry, &Paint::Solid(Color::rgba(0, 0, 0, 0.45)))?;

    // Body lit from the upper left.
    let focus = stone.center.offset(-stone.rx * 0.35, -stone.ry * 0.35);
    let body = Paint::Radial {
        center: stone.center,
        radius: stone.rx.max(stone.ry),
        focus,
        stops: vec![
            stop(0.0, stone.base.mix(Color::WHITE, 0.25)),
            stop(0.7, stone.base),
            stop(1.0, stone.base.mix(Color::BLACK, 0.45)),
        ],
    };
    surface.fill_ellipse(stone.center, stone.rx, stone.ry, &body)?;

    let highlight = stone.center.offset(-stone.rx * 0.3, -stone.ry * 0.4);
    surface.fill_ellipse(highlight, stone.rx * 0.3, stone.ry * 0.18, &Paint::Solid(Color::rgba(255, 255, 255, 0.15)))
}
