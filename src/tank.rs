//! Tank dimension model: physical size, enclosure style, water level, volume.
//!
//! `TankConfig` keeps its derived volume private and recomputes it inside
//! every dimension setter, so a reader can never observe dimensions and
//! volume that disagree.

#[cfg(test)]
#[path = "tank_test.rs"]
mod tank_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CM3_PER_LITER, CM_PER_INCH, GALLONS_PER_LITER};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TankError {
    #[error("tank {axis} must be positive and finite, got {value}")]
    InvalidDimension { axis: &'static str, value: f64 },
    #[error("wall thickness must be non-negative and finite, got {0}")]
    InvalidThickness(f64),
    #[error("water level must be finite, got {0}")]
    InvalidWaterLevel(f64),
}

/// Length unit the dimensions were entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Cm,
    Inches,
}

impl LengthUnit {
    /// Centimetres per one of this unit.
    #[must_use]
    pub fn to_cm(self) -> f64 {
        match self {
            Self::Cm => 1.0,
            Self::Inches => CM_PER_INCH,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Cm => "cm",
            Self::Inches => "in",
        }
    }
}

/// Outer width × height × depth of the tank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankDimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub unit: LengthUnit,
}

impl Default for TankDimensions {
    fn default() -> Self {
        Self { width: 60.0, height: 40.0, depth: 30.0, unit: LengthUnit::Cm }
    }
}

impl TankDimensions {
    #[must_use]
    pub fn cm(width: f64, height: f64, depth: f64) -> Self {
        Self { width, height, depth, unit: LengthUnit::Cm }
    }

    /// Reject non-positive or non-finite sides.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` naming the first offending axis.
    pub fn validate(&self) -> Result<(), TankError> {
        for (axis, value) in [("width", self.width), ("height", self.height), ("depth", self.depth)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TankError::InvalidDimension { axis, value });
            }
        }
        Ok(())
    }

    /// The same box expressed in centimetres.
    #[must_use]
    pub fn in_cm(&self) -> Self {
        let k = self.unit.to_cm();
        Self::cm(self.width * k, self.height * k, self.depth * k)
    }
}

/// Enclosure construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnclosureType {
    #[default]
    Rimless,
    Framed,
    Curved,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankStyle {
    pub enclosure: EnclosureType,
    /// Glass/acrylic wall thickness in millimetres.
    pub wall_thickness_mm: f64,
}

impl Default for TankStyle {
    fn default() -> Self {
        Self { enclosure: EnclosureType::Rimless, wall_thickness_mm: 6.0 }
    }
}

/// Tank volume in both units the UI shows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Volume {
    pub liters: f64,
    pub gallons: f64,
}

impl Volume {
    /// `liters = w·h·d (cm³) / 1000`, `gallons = liters · 0.264172`.
    #[must_use]
    pub fn of(dimensions: &TankDimensions) -> Self {
        let cm = dimensions.in_cm();
        let liters = cm.width * cm.height * cm.depth / CM3_PER_LITER;
        Self { liters, gallons: liters * GALLONS_PER_LITER }
    }
}

/// A named off-the-shelf tank size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankPreset {
    pub name: &'static str,
    pub gallons: u32,
    pub dimensions: TankDimensions,
    pub common: bool,
}

pub const TANK_PRESETS: [TankPreset; 5] = [
    TankPreset {
        name: "10 Gallon",
        gallons: 10,
        dimensions: TankDimensions { width: 50.8, height: 30.5, depth: 25.4, unit: LengthUnit::Cm },
        common: true,
    },
    TankPreset {
        name: "20 Gallon Long",
        gallons: 20,
        dimensions: TankDimensions { width: 76.2, height: 30.5, depth: 30.5, unit: LengthUnit::Cm },
        common: true,
    },
    TankPreset {
        name: "40 Gallon Breeder",
        gallons: 40,
        dimensions: TankDimensions { width: 91.4, height: 40.6, depth: 45.7, unit: LengthUnit::Cm },
        common: true,
    },
    TankPreset {
        name: "75 Gallon",
        gallons: 75,
        dimensions: TankDimensions { width: 121.9, height: 53.3, depth: 45.7, unit: LengthUnit::Cm },
        common: true,
    },
    TankPreset {
        name: "120 Gallon",
        gallons: 120,
        dimensions: TankDimensions { width: 152.4, height: 61.0, depth: 61.0, unit: LengthUnit::Cm },
        common: true,
    },
];

/// Look up a preset by case-insensitive name.
#[must_use]
pub fn find_preset(name: &str) -> Option<&'static TankPreset> {
    TANK_PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}

/// The tank being designed. One instance lives for the whole session.
///
/// Deserializing goes through the same checks as the setters: dimensions and
/// style are validated, the level is clamped, and any stored volume is
/// ignored in favour of a fresh recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTankConfig")]
pub struct TankConfig {
    dimensions: TankDimensions,
    style: TankStyle,
    water_level: f64,
    volume: Volume,
}

#[derive(Deserialize)]
struct RawTankConfig {
    dimensions: TankDimensions,
    #[serde(default)]
    style: TankStyle,
    #[serde(default = "default_water_level")]
    water_level: f64,
}

fn default_water_level() -> f64 {
    95.0
}

impl TryFrom<RawTankConfig> for TankConfig {
    type Error = TankError;

    fn try_from(raw: RawTankConfig) -> Result<Self, Self::Error> {
        if !raw.water_level.is_finite() {
            return Err(TankError::InvalidWaterLevel(raw.water_level));
        }
        let mut tank = Self::default();
        tank.set_dimensions(raw.dimensions)?;
        tank.set_style(raw.style)?;
        tank.set_water_level(raw.water_level);
        Ok(tank)
    }
}

impl Default for TankConfig {
    fn default() -> Self {
        let dimensions = TankDimensions::default();
        Self {
            dimensions,
            style: TankStyle::default(),
            water_level: default_water_level(),
            volume: Volume::of(&dimensions),
        }
    }
}

impl TankConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn dimensions(&self) -> TankDimensions {
        self.dimensions
    }

    #[must_use]
    pub fn style(&self) -> TankStyle {
        self.style
    }

    /// Water fill as percent of tank height, `[0, 100]`.
    #[must_use]
    pub fn water_level(&self) -> f64 {
        self.water_level
    }

    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Replace the dimensions and recompute volume in the same step.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` and leaves the config untouched if any side
    /// is non-positive or non-finite.
    pub fn set_dimensions(&mut self, dimensions: TankDimensions) -> Result<(), TankError> {
        dimensions.validate()?;
        self.dimensions = dimensions;
        self.volume = Volume::of(&dimensions);
        tracing::debug!(
            width = dimensions.width,
            height = dimensions.height,
            depth = dimensions.depth,
            liters = self.volume.liters,
            "tank dimensions set"
        );
        Ok(())
    }

    /// Apply a preset's dimensions.
    pub fn apply_preset(&mut self, preset: &TankPreset) {
        // Presets are compile-time constants that always validate.
        self.dimensions = preset.dimensions;
        self.volume = Volume::of(&preset.dimensions);
    }

    /// # Errors
    ///
    /// Returns `InvalidThickness` for a negative or non-finite wall thickness.
    pub fn set_style(&mut self, style: TankStyle) -> Result<(), TankError> {
        if !(style.wall_thickness_mm.is_finite() && style.wall_thickness_mm >= 0.0) {
            return Err(TankError::InvalidThickness(style.wall_thickness_mm));
        }
        self.style = style;
        Ok(())
    }

    /// Set the fill level, clamped into `[0, 100]`. Non-finite input is ignored.
    ///
    /// Inside a session the level is owned by the scene's water config;
    /// [`crate::store::SceneStore::set_water`] keeps this copy in step.
    pub(crate) fn set_water_level(&mut self, level: f64) {
        if level.is_finite() {
            self.water_level = level.clamp(0.0, 100.0);
        }
    }

    /// Info-overlay lines: `"60 × 40 × 30 cm"` and `"72.0L (19.0 gal)"`.
    #[must_use]
    pub fn summary(&self) -> (String, String) {
        let d = self.dimensions;
        (
            format!("{} × {} × {} {}", d.width, d.height, d.depth, d.unit.label()),
            format!("{:.1}L ({:.1} gal)", self.volume.liters, self.volume.gallons),
        )
    }
}
