//! A [`Surface`] that records drawing commands instead of painting.
//!
//! Used by tests to assert on what the flat renderer draws, and by hosts
//! that want to serialize a frame and replay it elsewhere.

use std::collections::HashSet;
use std::convert::Infallible;

use serde::Serialize;

use crate::doc::AssetId;
use crate::geom::{Point, Rect};
use crate::render::texture::{GrainKey, GrainTexture};
use crate::render::{Color, Paint, Stroke, Surface};

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Command {
    Clear { width: f64, height: f64 },
    FillRect { rect: Rect, paint: Paint },
    FillPolygon { points: Vec<Point>, paint: Paint },
    FillEllipse { center: Point, rx: f64, ry: f64, paint: Paint },
    StrokePolyline { points: Vec<Point>, closed: bool, stroke: Stroke },
    FillGrain { points: Vec<Point>, grain: GrainKey, generation: u64, alpha: f64 },
    FillText { text: String, at: Point, size_px: f64, rotation: f64, color: Color },
    DrawAsset { asset: AssetId, center: Point, size: f64, rotation: f64 },
}

#[derive(Debug, Default)]
pub struct DisplayList {
    commands: Vec<Command>,
    loaded_assets: HashSet<AssetId>,
}

impl DisplayList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an asset's image as available so `draw_asset` records it.
    pub fn mark_loaded(&mut self, asset: AssetId) {
        self.loaded_assets.insert(asset);
    }

    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[must_use]
    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every text string drawn, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for DisplayList {
    type Error = Infallible;

    fn clear(&mut self, width: f64, height: f64) -> Result<(), Infallible> {
        self.commands.clear();
        self.commands.push(Command::Clear { width, height });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> Result<(), Infallible> {
        self.commands.push(Command::FillRect { rect, paint: paint.clone() });
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], paint: &Paint) -> Result<(), Infallible> {
        self.commands.push(Command::FillPolygon { points: points.to_vec(), paint: paint.clone() });
        Ok(())
    }

    fn fill_ellipse(&mut self, center: Point, rx: f64, ry: f64, paint: &Paint) -> Result<(), Infallible> {
        self.commands.push(Command::FillEllipse { center, rx, ry, paint: paint.clone() });
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[Point], closed: bool, stroke: &Stroke) -> Result<(), Infallible> {
        self.commands.push(Command::StrokePolyline { points: points.to_vec(), closed, stroke: *stroke });
        Ok(())
    }

    fn fill_grain(&mut self, points: &[Point], grain: &GrainTexture, alpha: f64) -> Result<(), Infallible> {
        self.commands.push(Command::FillGrain {
            points: points.to_vec(),
            grain: grain.key().clone(),
            generation: grain.generation(),
            alpha,
        });
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        at: Point,
        size_px: f64,
        rotation: f64,
        color: Color,
    ) -> Result<(), Infallible> {
        self.commands.push(Command::FillText { text: text.to_owned(), at, size_px, rotation, color });
        Ok(())
    }

    fn draw_asset(&mut self, asset: AssetId, center: Point, size: f64, rotation: f64) -> Result<bool, Infallible> {
        if !self.loaded_assets.contains(&asset) {
            return Ok(false);
        }
        self.commands.push(Command::DrawAsset { asset, center, size, rotation });
        Ok(true)
    }
}
