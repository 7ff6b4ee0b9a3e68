//! Per-category appearance shared by both presentations.

use crate::doc::ObjectKind;
use crate::geom::Point;
use crate::render::Color;

/// Card behind each object in the flat view.
pub const CARD_FILL: Color = Color::rgba(255, 255, 255, 0.9);
pub const CARD_BORDER: Color = Color::rgb(203, 213, 225);
pub const LABEL_COLOR: Color = Color::rgb(51, 65, 85);

/// Selection outline and handles in the flat view.
pub const SELECTION_COLOR: Color = Color::rgb(74, 222, 128);
pub const HANDLE_FILL: Color = Color::WHITE;

/// Body colour of a selected object in the 3D view.
pub const SELECTED_COLOR: &str = "#4ade80";

/// Icon drawn on an object's card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Mountain,
    Box,
    Trees,
}

impl Glyph {
    /// Outline in unit space, `[-1, 1]` on both axes, y pointing down.
    #[must_use]
    pub fn outline(self) -> &'static [(f64, f64)] {
        match self {
            Self::Mountain => &[(-1.0, 0.8), (-0.35, -0.4), (-0.05, 0.1), (0.35, -0.8), (1.0, 0.8)],
            Self::Box => &[(-0.8, -0.8), (0.8, -0.8), (0.8, 0.8), (-0.8, 0.8)],
            Self::Trees => &[
                (0.0, -1.0),
                (0.6, -0.1),
                (0.25, -0.1),
                (0.75, 0.6),
                (0.12, 0.6),
                (0.12, 1.0),
                (-0.12, 1.0),
                (-0.12, 0.6),
                (-0.75, 0.6),
                (-0.25, -0.1),
                (-0.6, -0.1),
            ],
        }
    }

    /// Outline placed at `center`, `radius` pixels across the half-extent,
    /// turned clockwise by `rotation` degrees.
    #[must_use]
    pub fn placed(self, center: Point, radius: f64, rotation: f64) -> Vec<Point> {
        self.outline()
            .iter()
            .map(|&(x, y)| center.offset(x * radius, y * radius).rotate_around(center, rotation))
            .collect()
    }
}

/// Primitive standing in for an object in the 3D view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Dodecahedron { radius: f32 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32, segments: u32 },
    Cone { radius: f32, height: f32, segments: u32 },
    Box { size: f32 },
}

/// Everything that varies by object category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindStyle {
    pub glyph: Glyph,
    pub icon: Color,
    pub primitive: Primitive,
    /// Hex body colour in the 3D view.
    pub body: &'static str,
    pub roughness: f32,
    pub metalness: f32,
}

#[must_use]
pub fn style_for(kind: ObjectKind) -> KindStyle {
    match kind {
        ObjectKind::Rock => KindStyle {
            glyph: Glyph::Mountain,
            icon: Color::rgb(71, 85, 105),
            primitive: Primitive::Dodecahedron { radius: 1.0 },
            body: "#64748b",
            roughness: 0.8,
            metalness: 0.2,
        },
        ObjectKind::Driftwood => KindStyle {
            glyph: Glyph::Box,
            icon: Color::rgb(180, 83, 9),
            primitive: Primitive::Cylinder { radius_top: 0.3, radius_bottom: 0.4, height: 2.0, segments: 8 },
            body: "#6f4e37",
            roughness: 0.9,
            metalness: 0.1,
        },
        ObjectKind::Plant => KindStyle {
            glyph: Glyph::Trees,
            icon: Color::rgb(22, 163, 74),
            primitive: Primitive::Cone { radius: 0.5, height: 1.5, segments: 8 },
            body: "#22c55e",
            roughness: 0.7,
            metalness: 0.1,
        },
        ObjectKind::Custom | ObjectKind::Decoration | ObjectKind::Equipment => KindStyle {
            glyph: Glyph::Box,
            icon: Color::rgb(51, 65, 85),
            primitive: Primitive::Box { size: 1.0 },
            body: "#888888",
            roughness: 0.5,
            metalness: 0.0,
        },
    }
}
