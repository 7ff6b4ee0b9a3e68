//! Scene store: the single source of truth for tank contents.
//!
//! All mutation goes through named methods that restore every invariant
//! before returning: positions inside the drag rectangle, rotation in
//! `[0, 360)`, scale inside the configured range, selection pointing at a live
//! object, no object referencing a missing custom asset, and the tank's water
//! level matching the water config. Listeners run synchronously after each
//! committed mutation and see the new state.
//!
//! Missing ids are benign races between UI and store, so lookups report
//! `false`/`None` instead of failing.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use uuid::Uuid;

use crate::config::StudioConfig;
use crate::consts::{COLOR_TEMP_MAX_K, COLOR_TEMP_MIN_K, SUBSTRATE_HEIGHT_MAX, SUBSTRATE_HEIGHT_MIN};
use crate::doc::{
    AssetId, BackgroundConfig, BackgroundPatch, CUSTOM_ASSET_KEY, CustomAsset, LightingConfig, LightingPatch,
    Metadata, NewCustomAsset, NewObject, ObjectId, ObjectPatch, SceneObject, SubstrateConfig, SubstratePatch,
    WaterConfig, WaterPatch,
};
use crate::geom::{Point, clamp_finite, normalize_degrees};
use crate::layer::{self, ZEntry};
use crate::tank::{TankConfig, TankDimensions, TankError, TankPreset, TankStyle};

/// What changed in a committed mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    ObjectAdded(ObjectId),
    ObjectUpdated(ObjectId),
    ObjectRemoved(ObjectId),
    /// One or more z-indices changed.
    Restacked(Vec<ObjectId>),
    SelectionChanged(Option<ObjectId>),
    AssetAdded(AssetId),
    /// An asset was removed along with every object that displayed it.
    AssetRemoved { id: AssetId, objects: Vec<ObjectId> },
    SubstrateChanged,
    WaterChanged,
    BackgroundChanged,
    LightingChanged,
    TankChanged,
    Cleared,
}

/// Handle returned by [`SceneStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&SceneStore, &StoreEvent)>;

struct Entry {
    seq: u64,
    object: SceneObject,
}

/// In-memory scene state. One per session, passed by reference to the
/// controller and the renderer.
pub struct SceneStore {
    objects: HashMap<ObjectId, Entry>,
    next_seq: u64,
    selected: Option<ObjectId>,
    assets: HashMap<AssetId, CustomAsset>,
    substrate: SubstrateConfig,
    water: WaterConfig,
    background: BackgroundConfig,
    lighting: LightingConfig,
    tank: TankConfig,
    bounds: StudioConfig,
    revision: u64,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new(StudioConfig::default())
    }
}

impl SceneStore {
    /// Create an empty scene with default configs.
    #[must_use]
    pub fn new(bounds: StudioConfig) -> Self {
        let water = WaterConfig::default();
        let mut tank = TankConfig::default();
        tank.set_water_level(water.level);
        Self {
            objects: HashMap::new(),
            next_seq: 0,
            selected: None,
            assets: HashMap::new(),
            substrate: SubstrateConfig::default(),
            water,
            background: BackgroundConfig::default(),
            lighting: LightingConfig::default(),
            tank,
            bounds,
            revision: 0,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> &StudioConfig {
        &self.bounds
    }

    /// Incremented once per committed mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // --- Listeners ---

    /// Register a callback run after every committed mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&SceneStore, &StoreEvent) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, event: StoreEvent) {
        self.revision += 1;
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in &mut listeners {
            listener(self, &event);
        }
        self.listeners = listeners;
    }

    // --- Objects ---

    /// Insert a new object on top of the stack. Always succeeds.
    pub fn add_object(&mut self, new: NewObject) -> ObjectId {
        let id = Uuid::new_v4();
        let z_index = layer::next_z(&self.z_entries());
        let mut metadata = new.metadata;
        self.drop_dangling_asset(&mut metadata);
        let object = SceneObject {
            id,
            kind: new.kind,
            name: new.name,
            position: self.clamp_position(new.position, Point::default()),
            rotation: if new.rotation.is_finite() { normalize_degrees(new.rotation) } else { 0.0 },
            scale: self.bounds.clamp_scale(new.scale),
            z_index,
            metadata,
        };
        tracing::debug!(%id, kind = object.kind.as_str(), z_index, "object added");
        let seq = self.next_seq;
        self.next_seq += 1;
        self.objects.insert(id, Entry { seq, object });
        self.commit(StoreEvent::ObjectAdded(id));
        id
    }

    /// Remove an object, clearing the selection if it pointed at it.
    pub fn remove_object(&mut self, id: &ObjectId) -> Option<SceneObject> {
        let entry = self.objects.remove(id)?;
        let was_selected = self.selected == Some(*id);
        if was_selected {
            self.selected = None;
        }
        tracing::debug!(%id, was_selected, "object removed");
        self.commit(StoreEvent::ObjectRemoved(*id));
        if was_selected {
            self.commit(StoreEvent::SelectionChanged(None));
        }
        Some(entry.object)
    }

    /// Merge `patch` into an object. Returns false if the object doesn't exist.
    ///
    /// Range-bound fields are clamped; non-finite numbers are ignored.
    pub fn update_object(&mut self, id: &ObjectId, patch: &ObjectPatch) -> bool {
        let Some(current) = self.objects.get(id).map(|e| e.object.position) else {
            return false;
        };
        let position = patch.position.map(|p| self.clamp_position(p, current));
        let scale = patch.scale.filter(|s| s.is_finite()).map(|s| self.bounds.clamp_scale(s));
        let metadata = patch.metadata.as_ref().map(|incoming| {
            let mut merged = self.objects.get(id).map(|e| e.object.metadata.clone()).unwrap_or_default();
            merged.merge(incoming);
            self.drop_dangling_asset(&mut merged);
            merged
        });

        let Some(entry) = self.objects.get_mut(id) else {
            return false;
        };
        let obj = &mut entry.object;
        if let Some(name) = &patch.name {
            obj.name.clone_from(name);
        }
        if let Some(p) = position {
            obj.position = p;
        }
        if let Some(r) = patch.rotation.filter(|r| r.is_finite()) {
            obj.rotation = normalize_degrees(r);
        }
        if let Some(s) = scale {
            obj.scale = s;
        }
        if let Some(z) = patch.z_index {
            obj.z_index = z;
        }
        if let Some(m) = metadata {
            obj.metadata = m;
        }
        self.commit(StoreEvent::ObjectUpdated(*id));
        true
    }

    /// Set the selection. Unknown ids select nothing. Returns the effective selection.
    pub fn select_object(&mut self, id: Option<ObjectId>) -> Option<ObjectId> {
        let next = id.filter(|id| self.objects.contains_key(id));
        if next != self.selected {
            self.selected = next;
            self.commit(StoreEvent::SelectionChanged(next));
        }
        next
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<ObjectId> {
        self.selected
    }

    #[must_use]
    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selected.and_then(|id| self.object(&id))
    }

    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.get(id).map(|e| &e.object)
    }

    /// All objects in draw order (bottom first). Ties draw in insertion order.
    #[must_use]
    pub fn sorted_objects(&self) -> Vec<&SceneObject> {
        let mut entries: Vec<&Entry> = self.objects.values().collect();
        entries.sort_by_key(|e| (e.object.z_index, e.seq));
        entries.into_iter().map(|e| &e.object).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // --- Layering ---

    pub fn bring_to_front(&mut self, id: &ObjectId) -> bool {
        let changes = layer::bring_to_front(&self.z_entries(), *id);
        self.apply_z(changes)
    }

    pub fn send_to_back(&mut self, id: &ObjectId) -> bool {
        let changes = layer::send_to_back(&self.z_entries(), *id);
        self.apply_z(changes)
    }

    pub fn bring_forward(&mut self, id: &ObjectId) -> bool {
        let changes = layer::bring_forward(&self.z_entries(), *id);
        self.apply_z(changes)
    }

    pub fn send_backward(&mut self, id: &ObjectId) -> bool {
        let changes = layer::send_backward(&self.z_entries(), *id);
        self.apply_z(changes)
    }

    fn z_entries(&self) -> Vec<ZEntry> {
        self.objects
            .values()
            .map(|e| ZEntry { id: e.object.id, z_index: e.object.z_index, seq: e.seq })
            .collect()
    }

    fn apply_z(&mut self, changes: Vec<(ObjectId, i64)>) -> bool {
        if changes.is_empty() {
            return false;
        }
        let mut touched = Vec::with_capacity(changes.len());
        for (id, z) in changes {
            if let Some(entry) = self.objects.get_mut(&id) {
                entry.object.z_index = z;
                touched.push(id);
            }
        }
        tracing::debug!(count = touched.len(), "objects restacked");
        self.commit(StoreEvent::Restacked(touched));
        true
    }

    // --- Custom assets ---

    pub fn add_custom_asset(&mut self, new: NewCustomAsset) -> AssetId {
        let id = Uuid::new_v4();
        tracing::debug!(%id, name = %new.name, "custom asset added");
        self.assets.insert(
            id,
            CustomAsset {
                id,
                name: new.name,
                original_image: new.original_image,
                processed_image: new.processed_image,
                thumbnail: new.thumbnail,
                created_at: new.created_at,
            },
        );
        self.commit(StoreEvent::AssetAdded(id));
        id
    }

    /// Remove an asset and every object displaying it. Returns the removed
    /// object ids, or `None` if the asset did not exist.
    pub fn remove_custom_asset(&mut self, id: &AssetId) -> Option<Vec<ObjectId>> {
        self.assets.remove(id)?;
        let doomed: Vec<ObjectId> = self
            .objects
            .values()
            .filter(|e| e.object.custom_asset_id() == Some(*id))
            .map(|e| e.object.id)
            .collect();
        for oid in &doomed {
            self.objects.remove(oid);
        }
        let selection_lost = self.selected.is_some_and(|sel| doomed.contains(&sel));
        if selection_lost {
            self.selected = None;
        }
        tracing::debug!(%id, cascaded = doomed.len(), "custom asset removed");
        self.commit(StoreEvent::AssetRemoved { id: *id, objects: doomed.clone() });
        if selection_lost {
            self.commit(StoreEvent::SelectionChanged(None));
        }
        Some(doomed)
    }

    #[must_use]
    pub fn custom_asset(&self, id: &AssetId) -> Option<&CustomAsset> {
        self.assets.get(id)
    }

    /// All assets, oldest first.
    #[must_use]
    pub fn custom_assets(&self) -> Vec<&CustomAsset> {
        let mut assets: Vec<&CustomAsset> = self.assets.values().collect();
        assets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        assets
    }

    fn drop_dangling_asset(&self, metadata: &mut Metadata) {
        let Some(raw) = metadata.0.get(CUSTOM_ASSET_KEY) else {
            return;
        };
        let live = metadata.custom_asset_id().is_some_and(|aid| self.assets.contains_key(&aid));
        if !live {
            tracing::warn!(reference = %raw, "dropping reference to unknown custom asset");
            metadata.0.remove(CUSTOM_ASSET_KEY);
        }
    }

    // --- Appearance configs ---

    #[must_use]
    pub fn substrate(&self) -> &SubstrateConfig {
        &self.substrate
    }

    #[must_use]
    pub fn water(&self) -> &WaterConfig {
        &self.water
    }

    #[must_use]
    pub fn background(&self) -> &BackgroundConfig {
        &self.background
    }

    #[must_use]
    pub fn lighting(&self) -> &LightingConfig {
        &self.lighting
    }

    /// Height is clamped into the allowed bed range; slope depths must be non-negative.
    pub fn set_substrate(&mut self, patch: &SubstratePatch) {
        let s = &mut self.substrate;
        if let Some(kind) = patch.kind {
            s.kind = kind;
        }
        if let Some(color) = &patch.color {
            s.color.clone_from(color);
        }
        if let Some(h) = patch.height.and_then(|h| clamp_finite(h, SUBSTRATE_HEIGHT_MIN, SUBSTRATE_HEIGHT_MAX)) {
            s.height = h;
        }
        if let Some(slope) = patch.slope {
            s.slope = slope.filter(|sl| {
                sl.front.is_finite() && sl.back.is_finite() && sl.front >= 0.0 && sl.back >= 0.0
            });
        }
        tracing::debug!(kind = ?s.kind, height = s.height, "substrate changed");
        self.commit(StoreEvent::SubstrateChanged);
    }

    pub fn set_water(&mut self, patch: &WaterPatch) {
        let w = &mut self.water;
        if let Some(c) = patch.clarity.and_then(|c| clamp_finite(c, 0.0, 1.0)) {
            w.clarity = c;
        }
        if let Some(tint) = &patch.tint {
            w.tint.clone_from(tint);
        }
        if let Some(level) = patch.level.and_then(|l| clamp_finite(l, 0.0, 100.0)) {
            w.level = level;
        }
        tracing::debug!(level = w.level, clarity = w.clarity, "water changed");
        self.tank.set_water_level(self.water.level);
        self.commit(StoreEvent::WaterChanged);
    }

    pub fn set_background(&mut self, patch: &BackgroundPatch) {
        if let Some(preset) = patch.preset {
            self.background.preset = preset;
        }
        tracing::debug!(preset = ?self.background.preset, "background changed");
        self.commit(StoreEvent::BackgroundChanged);
    }

    pub fn set_lighting(&mut self, patch: &LightingPatch) {
        let l = &mut self.lighting;
        if let Some(i) = patch.intensity.and_then(|i| clamp_finite(i, 0.0, 1.0)) {
            l.intensity = i;
        }
        if let Some(k) = patch.color_temperature.and_then(|k| clamp_finite(k, COLOR_TEMP_MIN_K, COLOR_TEMP_MAX_K)) {
            l.color_temperature = k;
        }
        if let Some(color) = &patch.color {
            l.color.clone_from(color);
        }
        if let Some(t) = patch.time_of_day.filter(|t| t.is_finite()) {
            l.time_of_day = t.rem_euclid(24.0);
        }
        self.commit(StoreEvent::LightingChanged);
    }

    // --- Tank ---

    /// The tank's size and style. Its water level always equals [`Self::water`]'s.
    #[must_use]
    pub fn tank(&self) -> &TankConfig {
        &self.tank
    }

    /// # Errors
    ///
    /// Returns `InvalidDimension` and leaves the tank untouched if any side is
    /// non-positive or non-finite.
    pub fn set_tank_dimensions(&mut self, dimensions: TankDimensions) -> Result<(), TankError> {
        self.tank.set_dimensions(dimensions)?;
        self.commit(StoreEvent::TankChanged);
        Ok(())
    }

    pub fn apply_tank_preset(&mut self, preset: &TankPreset) {
        self.tank.apply_preset(preset);
        tracing::debug!(preset = preset.name, "tank preset applied");
        self.commit(StoreEvent::TankChanged);
    }

    /// # Errors
    ///
    /// Returns `InvalidThickness` for a negative or non-finite wall thickness.
    pub fn set_tank_style(&mut self, style: TankStyle) -> Result<(), TankError> {
        self.tank.set_style(style)?;
        self.commit(StoreEvent::TankChanged);
        Ok(())
    }

    /// Reset to an empty scene with default configs. The tank keeps its size
    /// and style. Listeners stay registered.
    pub fn clear_scene(&mut self) {
        self.objects.clear();
        self.assets.clear();
        self.selected = None;
        self.substrate = SubstrateConfig::default();
        self.water = WaterConfig::default();
        self.background = BackgroundConfig::default();
        self.lighting = LightingConfig::default();
        self.tank.set_water_level(self.water.level);
        tracing::info!("scene cleared");
        self.commit(StoreEvent::Cleared);
    }

    // --- Helpers ---

    /// Clamp each axis into the drag rectangle, keeping `fallback`'s axis if non-finite.
    fn clamp_position(&self, p: Point, fallback: Point) -> Point {
        let axis = |v: f64, old: f64| if v.is_finite() { self.bounds.clamp_percent(v) } else { old };
        Point::new(axis(p.x, fallback.x), axis(p.y, fallback.y))
    }
}
