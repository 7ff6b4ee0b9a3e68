//! Procedural scene rendering.
//!
//! Two presentations read the same store snapshot. [`flat`] draws a
//! perspective-simulated tank onto any [`Surface`]; [`scene3d`] builds a
//! renderer-agnostic 3D description for a GPU host. Both derive substrate
//! height, water span and colours through the helpers in this module so they
//! agree numerically.
//!
//! Drawing never mutates application state. Surfaces propagate backend
//! errors through their associated `Error` type.


pub mod background;
pub mod canvas2d;
pub mod display_list;
pub mod flat;
pub mod layout;
pub mod scene3d;
pub mod style;
pub mod texture;

use serde::Serialize;

use crate::doc::AssetId;
use crate::geom::{Point, Rect};
use texture::GrainTexture;

/// An sRGB colour with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// `[0, 1]`.
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb` or `#rrggbb`. Returns `None` for anything else.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| match u8::from_str_radix(s, 16) {
            Ok(v) => Some(v),
            Err(_) => None,
        };
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..=i]).map(|v| v * 17);
                Some(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Some(Self::rgb(channel(&digits[0..2])?, channel(&digits[2..4])?, channel(&digits[4..6])?)),
            _ => None,
        }
    }

    /// Parse a hex colour, falling back to `fallback` when malformed.
    #[must_use]
    pub fn from_hex_or(hex: &str, fallback: Color) -> Self {
        Self::from_hex(hex).unwrap_or(fallback)
    }

    #[must_use]
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// Linear blend towards `other` by `t` in `[0, 1]`.
    #[must_use]
    pub fn mix(self, other: Color, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| lerp_channel(f64::from(a), f64::from(b), t);
        Self {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// CSS `rgba(...)` string.
    #[must_use]
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    /// Relative luminance in `[0, 1]` (Rec. 709 weights on sRGB values).
    #[must_use]
    pub fn luminance(&self) -> f64 {
        (0.2126 * f64::from(self.r) + 0.7152 * f64::from(self.g) + 0.0722 * f64::from(self.b)) / 255.0
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_channel(a: f64, b: f64, t: f64) -> u8 {
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

/// A gradient colour stop at `offset` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stop {
    pub offset: f64,
    pub color: Color,
}

#[must_use]
pub fn stop(offset: f64, color: Color) -> Stop {
    Stop { offset, color }
}

/// Fill style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Paint {
    Solid(Color),
    Linear { from: Point, to: Point, stops: Vec<Stop> },
    Radial { center: Point, radius: f64, focus: Point, stops: Vec<Stop> },
}

/// Line style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    #[must_use]
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// Drawing backend for the flat presentation.
///
/// Coordinates are CSS pixels; the backend applies any device-pixel scaling.
pub trait Surface {
    type Error;

    /// Clear the whole surface.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the call fails.
    fn clear(&mut self, width: f64, height: f64) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Returns the backend's error if the call fails.
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> Result<(), Self::Error>;

    /// Fill a closed polygon.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the call fails.
    fn fill_polygon(&mut self, points: &[Point], paint: &Paint) -> Result<(), Self::Error>;

    /// Fill an axis-aligned ellipse.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the call fails.
    fn fill_ellipse(&mut self, center: Point, rx: f64, ry: f64, paint: &Paint) -> Result<(), Self::Error>;

    /// Stroke a polyline, optionally closing it.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the call fails.
    fn stroke_polyline(&mut self, points: &[Point], closed: bool, stroke: &Stroke) -> Result<(), Self::Error>;

    /// Fill a closed polygon with a repeating grain tile at `alpha` opacity.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the call fails.
    fn fill_grain(&mut self, points: &[Point], grain: &GrainTexture, alpha: f64) -> Result<(), Self::Error>;

    /// Draw centred text turned by `rotation` degrees about `at`.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the call fails.
    fn fill_text(&mut self, text: &str, at: Point, size_px: f64, rotation: f64, color: Color)
    -> Result<(), Self::Error>;

    /// Draw a custom asset's processed image into a square of side `size`
    /// centred at `center`, turned by `rotation` degrees. Backends without the
    /// image loaded draw nothing and report `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the call fails.
    fn draw_asset(&mut self, asset: AssetId, center: Point, size: f64, rotation: f64) -> Result<bool, Self::Error>;
}

/// Vertical extent of the water layer, in percent of interior height from the top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaterSpan {
    /// Water surface.
    pub top: f64,
    /// Substrate surface.
    pub bottom: f64,
}

impl WaterSpan {
    /// Percentage points of water above the substrate. Zero when the water
    /// does not reach the substrate top.
    #[must_use]
    pub fn extent(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.extent() > 0.0
    }
}

/// Water runs from `100 - level` down to `100 - substrate_height`.
#[must_use]
pub fn water_span(water_level: f64, substrate_height: f64) -> WaterSpan {
    WaterSpan { top: 100.0 - water_level.clamp(0.0, 100.0), bottom: 100.0 - substrate_height.clamp(0.0, 100.0) }
}
