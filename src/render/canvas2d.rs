//! [`Surface`] backed by a browser `CanvasRenderingContext2d`.
//!
//! This is the only module that touches the Canvas2D API. Every fallible
//! call propagates its `JsValue` error to [`crate::engine::Engine::render`].

use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasPattern, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, ImageData};

use crate::doc::AssetId;
use crate::geom::{Point, Rect};
use crate::render::texture::{GrainKey, GrainTexture};
use crate::render::{Color, Paint, Stroke, Surface};

/// Repeating patterns built from grain tiles, keyed by tile generation.
#[derive(Default)]
pub struct PatternCache {
    patterns: HashMap<(GrainKey, u64), CanvasPattern>,
}

impl PatternCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_create(
        &mut self,
        ctx: &CanvasRenderingContext2d,
        grain: &GrainTexture,
    ) -> Result<Option<CanvasPattern>, JsValue> {
        let key = (grain.key().clone(), grain.generation());
        if let Some(pattern) = self.patterns.get(&key) {
            return Ok(Some(pattern.clone()));
        }

        let Some(tile) = tile_canvas(grain)? else {
            return Ok(None);
        };
        let Some(pattern) = ctx.create_pattern_with_html_canvas_element(&tile, "repeat")? else {
            return Ok(None);
        };
        // Older generations are never drawn again.
        self.patterns.clear();
        self.patterns.insert(key, pattern.clone());
        Ok(Some(pattern))
    }
}

/// Paint a grain tile into a detached canvas the size of the tile.
fn tile_canvas(grain: &GrainTexture) -> Result<Option<HtmlCanvasElement>, JsValue> {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Ok(None);
    };
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(grain.size());
    canvas.set_height(grain.size());
    let Some(ctx) = canvas.get_context("2d")? else {
        return Ok(None);
    };
    let ctx: CanvasRenderingContext2d = ctx.dyn_into()?;
    let data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(grain.pixels()), grain.size(), grain.size())?;
    ctx.put_image_data(&data, 0.0, 0.0)?;
    Ok(Some(canvas))
}

pub struct Canvas2dSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    dpr: f64,
    patterns: &'a mut PatternCache,
    images: &'a HashMap<AssetId, HtmlImageElement>,
}

impl<'a> Canvas2dSurface<'a> {
    pub fn new(
        ctx: &'a CanvasRenderingContext2d,
        dpr: f64,
        patterns: &'a mut PatternCache,
        images: &'a HashMap<AssetId, HtmlImageElement>,
    ) -> Self {
        Self { ctx, dpr, patterns, images }
    }

    fn apply_fill(&self, paint: &Paint) -> Result<(), JsValue> {
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&color.css()),
            Paint::Linear { from, to, stops } => {
                let gradient = self.ctx.create_linear_gradient(from.x, from.y, to.x, to.y);
                for s in stops {
                    gradient.add_color_stop(stop_offset(s.offset), &s.color.css())?;
                }
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
            Paint::Radial { center, radius, focus, stops } => {
                let gradient = self.ctx.create_radial_gradient(focus.x, focus.y, 0.0, center.x, center.y, *radius)?;
                for s in stops {
                    gradient.add_color_stop(stop_offset(s.offset), &s.color.css())?;
                }
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
        }
        Ok(())
    }

    fn trace(&self, points: &[Point], closed: bool) {
        self.ctx.begin_path();
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            self.ctx.move_to(first.x, first.y);
        }
        for p in iter {
            self.ctx.line_to(p.x, p.y);
        }
        if closed {
            self.ctx.close_path();
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn stop_offset(offset: f64) -> f32 {
    offset.clamp(0.0, 1.0) as f32
}

impl Surface for Canvas2dSurface<'_> {
    type Error = JsValue;

    fn clear(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)?;
        self.ctx.clear_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> Result<(), JsValue> {
        self.apply_fill(paint)?;
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], paint: &Paint) -> Result<(), JsValue> {
        self.apply_fill(paint)?;
        self.trace(points, true);
        self.ctx.fill();
        Ok(())
    }

    fn fill_ellipse(&mut self, center: Point, rx: f64, ry: f64, paint: &Paint) -> Result<(), JsValue> {
        if rx <= 0.0 || ry <= 0.0 {
            return Ok(());
        }
        self.apply_fill(paint)?;
        self.ctx.begin_path();
        self.ctx.ellipse(center.x, center.y, rx, ry, 0.0, 0.0, 2.0 * PI)?;
        self.ctx.fill();
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[Point], closed: bool, stroke: &Stroke) -> Result<(), JsValue> {
        self.ctx.set_stroke_style_str(&stroke.color.css());
        self.ctx.set_line_width(stroke.width);
        self.trace(points, closed);
        self.ctx.stroke();
        Ok(())
    }

    fn fill_grain(&mut self, points: &[Point], grain: &GrainTexture, alpha: f64) -> Result<(), JsValue> {
        let Some(pattern) = self.patterns.get_or_create(self.ctx, grain)? else {
            return Ok(());
        };
        self.ctx.save();
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
        self.ctx.set_fill_style_canvas_pattern(&pattern);
        self.trace(points, true);
        self.ctx.fill();
        self.ctx.restore();
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point, size_px: f64, rotation: f64, color: Color) -> Result<(), JsValue> {
        self.ctx.save();
        self.ctx.translate(at.x, at.y)?;
        self.ctx.rotate(rotation.to_radians())?;
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_font(&format!("{size_px:.0}px sans-serif"));
        self.ctx.fill_text(text, 0.0, 0.0)?;
        self.ctx.restore();
        Ok(())
    }

    fn draw_asset(&mut self, asset: AssetId, center: Point, size: f64, rotation: f64) -> Result<bool, JsValue> {
        let Some(image) = self.images.get(&asset) else {
            return Ok(false);
        };
        if !image.complete() {
            return Ok(false);
        }
        self.ctx.save();
        self.ctx.translate(center.x, center.y)?;
        self.ctx.rotate(rotation.to_radians())?;
        self.ctx.draw_image_with_html_image_element_and_dw_and_dh(image, -size / 2.0, -size / 2.0, size, size)?;
        self.ctx.restore();
        Ok(true)
    }
}
