//! Scene model: placed objects, custom assets, and the appearance configs.
//!
//! This module defines the data types describing what is in the tank
//! (`SceneObject`, `ObjectKind`), the creation and sparse-update types used by
//! the store (`NewObject`, `ObjectPatch`), a typed accessor for the open-ended
//! metadata bag (`Metadata`), uploaded cutouts (`CustomAsset`), and the
//! substrate, water, background and lighting configs with their patches.
//!
//! Objects are positioned in percent space (see [`crate::geom`]), so a stored
//! scene survives container resizes unchanged.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::Point;

/// Unique identifier for a placed object.
pub type ObjectId = Uuid;

/// Unique identifier for an uploaded custom asset.
pub type AssetId = Uuid;

/// Category of a placed object. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Rock,
    Driftwood,
    Plant,
    /// A user-uploaded cutout; metadata carries the asset id.
    Custom,
    Decoration,
    Equipment,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 6] =
        [Self::Rock, Self::Driftwood, Self::Plant, Self::Custom, Self::Decoration, Self::Equipment];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Driftwood => "driftwood",
            Self::Plant => "plant",
            Self::Custom => "custom",
            Self::Decoration => "decoration",
            Self::Equipment => "equipment",
        }
    }
}

/// Metadata key linking a custom object to its asset.
pub const CUSTOM_ASSET_KEY: &str = "customAssetId";

/// Open-ended per-object metadata with typed accessors for known keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(pub serde_json::Map<String, serde_json::Value>);

impl Metadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata that references a custom asset.
    #[must_use]
    pub fn for_asset(asset: AssetId) -> Self {
        let mut map = serde_json::Map::new();
        map.insert(CUSTOM_ASSET_KEY.to_owned(), serde_json::Value::String(asset.to_string()));
        Self(map)
    }

    /// The referenced custom asset id, if present and well-formed.
    #[must_use]
    pub fn custom_asset_id(&self) -> Option<AssetId> {
        let raw = self.0.get(CUSTOM_ASSET_KEY).and_then(serde_json::Value::as_str)?;
        let Ok(id) = Uuid::parse_str(raw) else {
            return None;
        };
        Some(id)
    }

    /// Merge `incoming` keys into this map. Null values delete keys.
    pub fn merge(&mut self, incoming: &Metadata) {
        for (k, v) in &incoming.0 {
            if v.is_null() {
                self.0.remove(k);
            } else {
                self.0.insert(k.clone(), v.clone());
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A placed object as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneObject {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub name: String,
    /// Top-left anchor in percent of the tank interior.
    pub position: Point,
    /// Clockwise degrees in `[0, 360)`.
    pub rotation: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Stacking order; higher draws on top.
    pub z_index: i64,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl SceneObject {
    /// The custom asset this object displays, if any.
    #[must_use]
    pub fn custom_asset_id(&self) -> Option<AssetId> {
        self.metadata.custom_asset_id()
    }
}

/// Creation request. The store assigns id and z-index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewObject {
    pub kind: ObjectKind,
    pub name: String,
    pub position: Point,
    pub rotation: f64,
    pub scale: f64,
    #[serde(default)]
    pub metadata: Metadata,
}

impl NewObject {
    #[must_use]
    pub fn new(kind: ObjectKind, name: impl Into<String>, position: Point) -> Self {
        Self { kind, name: name.into(), position, rotation: 0.0, scale: 1.0, metadata: Metadata::new() }
    }

    /// A library item dropped at a random spot with a random heading.
    pub fn library<R: Rng + ?Sized>(kind: ObjectKind, name: impl Into<String>, rng: &mut R) -> Self {
        let position = Point::new(rng.random::<f64>() * 80.0 + 10.0, rng.random::<f64>() * 60.0 + 20.0);
        Self { rotation: rng.random::<f64>() * 360.0, ..Self::new(kind, name, position) }
    }

    /// A custom cutout placed near the middle of the tank, unrotated.
    pub fn custom<R: Rng + ?Sized>(asset: &CustomAsset, rng: &mut R) -> Self {
        let position = Point::new(rng.random::<f64>() * 60.0 + 20.0, rng.random::<f64>() * 40.0 + 30.0);
        Self { metadata: Metadata::for_asset(asset.id), ..Self::new(ObjectKind::Custom, asset.name.clone(), position) }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Sparse update for a placed object. Only present fields are applied.
///
/// There is no `kind` field: an object's category never changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    /// Keys to merge; null values delete keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ObjectPatch {
    #[must_use]
    pub fn position(position: Point) -> Self {
        Self { position: Some(position), ..Default::default() }
    }

    #[must_use]
    pub fn rotation(rotation: f64) -> Self {
        Self { rotation: Some(rotation), ..Default::default() }
    }

    #[must_use]
    pub fn scale(scale: f64) -> Self {
        Self { scale: Some(scale), ..Default::default() }
    }

    #[must_use]
    pub fn z_index(z_index: i64) -> Self {
        Self { z_index: Some(z_index), ..Default::default() }
    }
}

// =============================================================
// Custom assets
// =============================================================

/// A processed upload, reusable as an object skin. Images are data URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomAsset {
    pub id: AssetId,
    pub name: String,
    pub original_image: String,
    pub processed_image: String,
    pub thumbnail: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

/// Asset creation request. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomAsset {
    pub name: String,
    pub original_image: String,
    pub processed_image: String,
    pub thumbnail: String,
    pub created_at: i64,
}

// =============================================================
// Substrate
// =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubstrateKind {
    Sand,
    Gravel,
    #[default]
    Soil,
}

impl SubstrateKind {
    /// Palette colour offered for this material.
    #[must_use]
    pub fn swatch(self) -> &'static str {
        match self {
            Self::Sand => "#f5f5dc",
            Self::Gravel => "#6b7280",
            Self::Soil => "#5c4033",
        }
    }
}

/// Bed depth at the front and back glass, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubstrateSlope {
    pub front: f64,
    pub back: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstrateConfig {
    #[serde(rename = "type")]
    pub kind: SubstrateKind,
    pub color: String,
    /// Percent of interior height.
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope: Option<SubstrateSlope>,
}

impl Default for SubstrateConfig {
    fn default() -> Self {
        Self {
            kind: SubstrateKind::Soil,
            color: "#3d2817".to_owned(),
            height: 5.0,
            slope: Some(SubstrateSlope { front: 3.0, back: 8.0 }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubstratePatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SubstrateKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// `Some(None)` removes the slope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope: Option<Option<SubstrateSlope>>,
}

// =============================================================
// Water
// =============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterConfig {
    /// 0 = clear, 1 = murky.
    pub clarity: f64,
    pub tint: String,
    /// Fill level in percent of interior height.
    pub level: f64,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self { clarity: 0.95, tint: "#e8f4f8".to_owned(), level: 95.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<f64>,
}

// =============================================================
// Background
// =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundPreset {
    #[default]
    None,
    Black,
    #[serde(rename = "stone-3d")]
    Stone3d,
}

impl BackgroundPreset {
    /// Dark presets get darker side-panel shading.
    #[must_use]
    pub fn is_dark(self) -> bool {
        matches!(self, Self::Black | Self::Stone3d)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundConfig {
    pub preset: BackgroundPreset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<BackgroundPreset>,
}

// =============================================================
// Lighting
// =============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightingConfig {
    /// `[0, 1]`.
    pub intensity: f64,
    /// Kelvin.
    pub color_temperature: f64,
    pub color: String,
    /// Hours, `[0, 24)`.
    pub time_of_day: f64,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self { intensity: 0.8, color_temperature: 6500.0, color: "#ffffff".to_owned(), time_of_day: 12.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<f64>,
}
