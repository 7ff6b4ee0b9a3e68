use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::config::StudioConfig;
use crate::doc::{AssetId, NewObject, ObjectId, ObjectKind, ObjectPatch, WaterPatch};
use crate::geom::{Point, Rect, angle_deg, distance, normalize_degrees, screen_to_percent};
use crate::hit::{self, DEFAULT_CURSOR, HitPart, ObjectFrame};
use crate::input::{Button, Interaction, PointerId};
use crate::render::canvas2d::{Canvas2dSurface, PatternCache};
use crate::render::flat;
use crate::render::layout::FlatLayout;
use crate::render::scene3d::{self, Scene3d};
use crate::render::texture::GrainCache;
use crate::store::SceneStore;
use crate::upload::{UploadError, UploadSession};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A transform was written to the store.
    ObjectUpdated { id: ObjectId, patch: ObjectPatch },
    SelectionChanged(Option<ObjectId>),
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
/// Pointer coordinates are CSS pixels relative to the canvas.
pub struct EngineCore {
    pub store: SceneStore,
    pub input: Interaction,
    /// Tank outline in canvas pixels; the interaction container.
    pub container: Rect,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    cursor: String,
    rng: StdRng,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(StudioConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: StudioConfig) -> Self {
        let (seed, _) = Uuid::new_v4().as_u64_pair();
        Self {
            store: SceneStore::new(config),
            input: Interaction::Idle,
            container: Rect::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            cursor: DEFAULT_CURSOR.to_owned(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replace the placement RNG, for reproducible layouts.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio, re-deriving the container.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self.container = self.layout().map_or_else(Rect::default, |l| l.tank);
    }

    /// Flat layout for the current viewport, or `None` before it is measured.
    #[must_use]
    pub fn layout(&self) -> Option<FlatLayout> {
        FlatLayout::new(self.viewport_width, self.viewport_height)
    }

    // --- Scene helpers ---

    /// Set the fill level. The store keeps the tank's copy in step.
    pub fn set_water_level(&mut self, level: f64) -> Vec<Action> {
        if !level.is_finite() {
            return Vec::new();
        }
        self.store.set_water(&WaterPatch { level: Some(level), ..WaterPatch::default() });
        vec![Action::RenderNeeded]
    }

    /// Place a library item at a random spot and rotation.
    pub fn add_library_object(&mut self, kind: ObjectKind, name: &str) -> ObjectId {
        self.store.add_object(NewObject::library(kind, name, &mut self.rng))
    }

    /// Place a custom cutout. Returns `None` if the asset doesn't exist.
    pub fn add_custom_object(&mut self, asset: &AssetId) -> Option<ObjectId> {
        let new = NewObject::custom(self.store.custom_asset(asset)?, &mut self.rng);
        Some(self.store.add_object(new))
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pointer: PointerId, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || !self.input.is_idle() || !self.container.is_measured() {
            return Vec::new();
        }
        let local = screen_pt.sub(self.container.origin());
        let (w, h) = (self.container.width, self.container.height);

        let Some(hit) = hit::hit_test(local, &self.store, w, h) else {
            return self.click_empty(local);
        };
        let Some(obj) = self.store.object(&hit.object_id) else {
            return Vec::new();
        };
        let frame = ObjectFrame::of(obj, w, h);
        let center = frame.center.offset(self.container.x, self.container.y);

        let next = match hit.part {
            HitPart::Body => Interaction::Dragging { id: obj.id, pointer, grab: local.sub(frame.anchor()) },
            HitPart::RotateHandle => Interaction::Rotating {
                id: obj.id,
                pointer,
                center,
                initial_rotation: obj.rotation,
                initial_angle: angle_deg(center, screen_pt),
            },
            HitPart::ScaleHandle(_) => {
                let initial_distance = distance(center, screen_pt);
                if initial_distance > 0.0 {
                    Interaction::Scaling { id: obj.id, pointer, center, initial_scale: obj.scale, initial_distance }
                } else {
                    Interaction::Idle
                }
            }
        };

        let mut actions = Vec::new();
        if self.store.selected_id() != Some(hit.object_id) {
            self.store.select_object(Some(hit.object_id));
            actions.push(Action::SelectionChanged(Some(hit.object_id)));
        }
        self.input = next;
        if !next.is_idle() {
            tracing::debug!(id = %hit.object_id, mode = next.mode(), "interaction started");
        }
        actions.push(self.cursor_action(hit.part.cursor()));
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_pointer_move(&mut self, pointer: PointerId, screen_pt: Point) -> Vec<Action> {
        if self.input.pointer().is_some_and(|active| active != pointer) {
            return Vec::new();
        }
        let patch = match self.input {
            Interaction::Idle => return self.hover(screen_pt),
            Interaction::Dragging { grab, .. } => {
                let Some(pct) = screen_to_percent(screen_pt, &self.container, grab) else {
                    return Vec::new();
                };
                let bounds = self.store.bounds();
                ObjectPatch::position(Point::new(bounds.clamp_percent(pct.x), bounds.clamp_percent(pct.y)))
            }
            Interaction::Rotating { center, initial_rotation, initial_angle, .. } => {
                let angle = angle_deg(center, screen_pt);
                ObjectPatch::rotation(normalize_degrees(initial_rotation + angle - initial_angle))
            }
            Interaction::Scaling { center, initial_scale, initial_distance, .. } => {
                let factor = distance(center, screen_pt) / initial_distance;
                ObjectPatch::scale(self.store.bounds().clamp_scale(initial_scale * factor))
            }
        };
        let Some(id) = self.input.object_id() else {
            return Vec::new();
        };
        if !self.store.update_object(&id, &patch) {
            // Removed mid-gesture.
            tracing::debug!(%id, "interaction target vanished");
            self.input = Interaction::Idle;
            return vec![Action::RenderNeeded];
        }
        vec![Action::ObjectUpdated { id, patch }, Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, pointer: PointerId, screen_pt: Point, _button: Button) -> Vec<Action> {
        if self.input.pointer() != Some(pointer) {
            return Vec::new();
        }
        tracing::debug!(id = ?self.input.object_id(), mode = self.input.mode(), "interaction ended");
        self.input = Interaction::Idle;
        let mut actions = self.hover(screen_pt);
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.store.selected_id()
    }

    /// The cursor last reported to the host.
    #[must_use]
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    // --- Internal helpers ---

    /// Press on empty space: inside the tank clears the selection.
    fn click_empty(&mut self, local: Point) -> Vec<Action> {
        let inside = local.x >= 0.0 && local.y >= 0.0 && local.x <= self.container.width && local.y <= self.container.height;
        if !inside || self.store.selected_id().is_none() {
            return Vec::new();
        }
        self.store.select_object(None);
        vec![Action::SelectionChanged(None), Action::RenderNeeded]
    }

    fn hover(&mut self, screen_pt: Point) -> Vec<Action> {
        let cursor = if self.container.is_measured() {
            let local = screen_pt.sub(self.container.origin());
            hit::hit_test(local, &self.store, self.container.width, self.container.height)
                .map_or(DEFAULT_CURSOR, |hit| hit.part.cursor())
        } else {
            DEFAULT_CURSOR
        };
        if cursor == self.cursor {
            return Vec::new();
        }
        vec![self.cursor_action(cursor)]
    }

    fn cursor_action(&mut self, cursor: &str) -> Action {
        cursor.clone_into(&mut self.cursor);
        Action::SetCursor(cursor.to_owned())
    }
}

/// The full engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
    grain: GrainCache,
    patterns: PatternCache,
    images: HashMap<AssetId, HtmlImageElement>,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, config: StudioConfig) -> Self {
        Self {
            canvas,
            core: EngineCore::new(config),
            grain: GrainCache::new(),
            patterns: PatternCache::new(),
            images: HashMap::new(),
        }
    }

    // --- Viewport ---

    /// Update viewport dimensions and resize the backing store to match.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        let dpr = self.core.dpr;
        self.canvas.set_width((width_css.max(0.0) * dpr).round() as u32);
        self.canvas.set_height((height_css.max(0.0) * dpr).round() as u32);
    }

    // --- Assets ---

    /// Make a loaded image available for drawing a custom asset.
    pub fn register_asset_image(&mut self, id: AssetId, image: HtmlImageElement) {
        self.images.insert(id, image);
    }

    pub fn forget_asset_image(&mut self, id: &AssetId) -> bool {
        self.images.remove(id).is_some()
    }

    /// Save a finished upload into the store, stamped with the browser clock.
    ///
    /// # Errors
    ///
    /// See [`UploadSession::commit`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn commit_upload(&mut self, session: &mut UploadSession) -> Result<AssetId, UploadError> {
        let now_ms = js_sys::Date::now() as i64;
        session.commit(&mut self.core.store, now_ms)
    }

    /// Drop an asset, the objects using it, and its cached image.
    pub fn remove_asset(&mut self, id: &AssetId) -> Option<Vec<ObjectId>> {
        self.images.remove(id);
        self.core.store.remove_custom_asset(id)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pointer: PointerId, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(pointer, screen_pt, button)
    }

    pub fn on_pointer_move(&mut self, pointer: PointerId, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(pointer, screen_pt)
    }

    pub fn on_pointer_up(&mut self, pointer: PointerId, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_up(pointer, screen_pt, button)
    }

    // --- Render ---

    /// Draw the flat presentation to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or any `Canvas2D` call fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let Some(layout) = self.core.layout() else {
            return Ok(());
        };
        let Some(ctx) = self.canvas.get_context("2d")? else {
            return Ok(());
        };
        let ctx: CanvasRenderingContext2d = ctx.dyn_into()?;
        let grain = self.grain.get(self.core.store.substrate(), self.core.store.bounds().grain_size);
        let mut surface = Canvas2dSurface::new(&ctx, self.core.dpr, &mut self.patterns, &self.images);
        flat::draw(&mut surface, &self.core.store, self.core.store.tank(), &layout, grain)
    }

    /// Describe the 3D presentation at `elapsed_secs` since the view opened.
    #[must_use]
    pub fn scene_3d(&self, elapsed_secs: f64) -> Scene3d {
        scene3d::build(&self.core.store, self.core.store.tank(), elapsed_secs)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.core.selection()
    }
}
