//! Pixel geometry of the flat presentation.
//!
//! Everything is derived from the canvas size on every call; nothing is
//! patched incrementally across resizes. The tank outline is the canvas inset
//! by `TANK_PADDING_PX`; the back wall is the outline inset by the
//! perspective depth, and the side/bottom panels are the trapezoids between
//! the two.

use crate::consts::{GLASS_RIM_PX, PERSPECTIVE_HEIGHT_RATIO, PERSPECTIVE_WIDTH_RATIO, TANK_PADDING_PX};
use crate::geom::{Point, Rect};
use crate::render::WaterSpan;

/// The substrate's back edge rises this fraction of its front height.
const BACK_EDGE_FORESHORTEN: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatLayout {
    pub width: f64,
    pub height: f64,
    /// Tank outline; also the interaction container, in canvas pixels.
    pub tank: Rect,
    /// Inset of the back wall from the outline.
    pub depth: f64,
    /// Rim thickness.
    pub glass: f64,
}

impl FlatLayout {
    /// Layout for a canvas of `width × height` CSS pixels, or `None` if the
    /// canvas is too small to hold a tank.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Option<Self> {
        let tank = Rect::new(0.0, 0.0, width, height).inset(TANK_PADDING_PX, TANK_PADDING_PX);
        if !tank.is_measured() {
            return None;
        }
        let depth = (tank.width * PERSPECTIVE_WIDTH_RATIO).min(tank.height * PERSPECTIVE_HEIGHT_RATIO);
        Some(Self { width, height, tank, depth, glass: GLASS_RIM_PX })
    }

    /// The receding back wall.
    #[must_use]
    pub fn back_rect(&self) -> Rect {
        self.tank.inset(self.depth, self.depth)
    }

    #[must_use]
    pub fn left_panel(&self) -> [Point; 4] {
        let t = self.tank;
        let d = self.depth;
        [
            Point::new(t.x, t.y),
            Point::new(t.x + d, t.y + d),
            Point::new(t.x + d, t.bottom() - d),
            Point::new(t.x, t.bottom()),
        ]
    }

    #[must_use]
    pub fn right_panel(&self) -> [Point; 4] {
        let t = self.tank;
        let d = self.depth;
        [
            Point::new(t.right(), t.y),
            Point::new(t.right() - d, t.y + d),
            Point::new(t.right() - d, t.bottom() - d),
            Point::new(t.right(), t.bottom()),
        ]
    }

    #[must_use]
    pub fn bottom_panel(&self) -> [Point; 4] {
        let t = self.tank;
        let d = self.depth;
        [
            Point::new(t.x, t.bottom()),
            Point::new(t.x + d, t.bottom() - d),
            Point::new(t.right() - d, t.bottom() - d),
            Point::new(t.right(), t.bottom()),
        ]
    }

    /// Y of a level given as percent of interior height from the top.
    #[must_use]
    pub fn y_at_percent(&self, percent_from_top: f64) -> f64 {
        self.tank.y + self.tank.height * percent_from_top / 100.0
    }

    /// Front height of a substrate bed of `height_percent`.
    #[must_use]
    pub fn substrate_px(&self, height_percent: f64) -> f64 {
        self.tank.height * height_percent / 100.0
    }

    /// Visible top surface of the bed, receding towards the back wall.
    #[must_use]
    pub fn substrate_top(&self, height_percent: f64) -> [Point; 4] {
        let t = self.tank;
        let front_y = t.bottom() - self.substrate_px(height_percent);
        let back_y = t.bottom() - self.depth - self.substrate_px(height_percent) * BACK_EDGE_FORESHORTEN;
        [
            Point::new(t.x + self.glass, front_y),
            Point::new(t.x + self.depth, back_y),
            Point::new(t.right() - self.depth, back_y),
            Point::new(t.right() - self.glass, front_y),
        ]
    }

    /// Vertical front face of the bed, inside the rims.
    #[must_use]
    pub fn substrate_front(&self, height_percent: f64) -> [Point; 4] {
        let t = self.tank;
        let top = t.bottom() - self.substrate_px(height_percent);
        let bottom = t.bottom() - self.glass;
        [
            Point::new(t.x + self.glass, top),
            Point::new(t.right() - self.glass, top),
            Point::new(t.right() - self.glass, bottom),
            Point::new(t.x + self.glass, bottom),
        ]
    }

    /// The water layer's pixel band.
    #[must_use]
    pub fn water_band(&self, span: WaterSpan) -> Rect {
        let top = self.y_at_percent(span.top);
        let bottom = self.y_at_percent(span.bottom).max(top);
        Rect::new(self.tank.x + self.glass, top, self.tank.width - 2.0 * self.glass, bottom - top)
    }

    /// The four rim strips: top, bottom, left, right.
    #[must_use]
    pub fn rims(&self) -> [Rect; 4] {
        let t = self.tank;
        let g = self.glass;
        [
            Rect::new(t.x, t.y, t.width, g),
            Rect::new(t.x, t.bottom() - g, t.width, g),
            Rect::new(t.x, t.y, g, t.height),
            Rect::new(t.right() - g, t.y, g, t.height),
        ]
    }

    /// Perspective edge lines from the front top corners to the back wall.
    #[must_use]
    pub fn edge_lines(&self) -> [[Point; 2]; 2] {
        let t = self.tank;
        let (g, d) = (self.glass, self.depth);
        [
            [Point::new(t.x + g, t.y + g), Point::new(t.x + d, t.y + d)],
            [Point::new(t.right() - g, t.y + g), Point::new(t.right() - d, t.y + d)],
        ]
    }
}
