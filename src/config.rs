//! Studio configuration: transform bounds, upload limits, texture sizes.
//!
//! Defaults match the shipped product. `from_env` lets a host or the CLI
//! override individual values without recompiling.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{
    DRAG_MAX_PERCENT, GRAIN_SIZE_PX, SCALE_MAX, SCALE_MIN, TEXTURE_EDGE_MAX_PX, THUMBNAIL_MAX_PX, UPLOAD_MAX_BYTES,
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Parse { key: &'static str, value: String },
    #[error("scale range is empty: min {min} >= max {max}")]
    EmptyScaleRange { min: f64, max: f64 },
    #[error("drag limit {0} is outside (0, 100]")]
    DragLimit(f64),
    #[error("{field} of {value}px is outside [1, {max}]")]
    EdgeOutOfRange { field: &'static str, value: u32, max: u32 },
}

/// Tunable bounds shared by the store, the interaction controller, and the
/// upload collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudioConfig {
    /// Smallest allowed uniform scale.
    pub scale_min: f64,
    /// Largest allowed uniform scale.
    pub scale_max: f64,
    /// Largest normalized coordinate an object anchor may take.
    pub drag_max_percent: f64,
    /// Largest accepted upload size in bytes.
    pub upload_max_bytes: u64,
    /// Edge length of the generated grain tile.
    pub grain_size: u32,
    /// Longest thumbnail edge.
    pub thumbnail_max: u32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            scale_min: SCALE_MIN,
            scale_max: SCALE_MAX,
            drag_max_percent: DRAG_MAX_PERCENT,
            upload_max_bytes: UPLOAD_MAX_BYTES,
            grain_size: GRAIN_SIZE_PX,
            thumbnail_max: THUMBNAIL_MAX_PX,
        }
    }
}

impl StudioConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `AQUASCAPE_SCALE_MIN`, `AQUASCAPE_SCALE_MAX`
    /// - `AQUASCAPE_DRAG_MAX_PERCENT`
    /// - `AQUASCAPE_UPLOAD_MAX_BYTES`
    /// - `AQUASCAPE_GRAIN_SIZE`
    /// - `AQUASCAPE_THUMBNAIL_MAX`
    ///
    /// # Errors
    ///
    /// Returns `Parse` for unparsable values, `EmptyScaleRange` when min is not
    /// below max, `DragLimit` for a limit outside `(0, 100]`, and
    /// `EdgeOutOfRange` for a grain or thumbnail edge outside `[1, 1024]`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup (env, query string, test map).
    ///
    /// # Errors
    ///
    /// Same as [`StudioConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            scale_min: parse_or(&lookup, "AQUASCAPE_SCALE_MIN", defaults.scale_min)?,
            scale_max: parse_or(&lookup, "AQUASCAPE_SCALE_MAX", defaults.scale_max)?,
            drag_max_percent: parse_or(&lookup, "AQUASCAPE_DRAG_MAX_PERCENT", defaults.drag_max_percent)?,
            upload_max_bytes: parse_or(&lookup, "AQUASCAPE_UPLOAD_MAX_BYTES", defaults.upload_max_bytes)?,
            grain_size: parse_or(&lookup, "AQUASCAPE_GRAIN_SIZE", defaults.grain_size)?,
            thumbnail_max: parse_or(&lookup, "AQUASCAPE_THUMBNAIL_MAX", defaults.thumbnail_max)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the cross-field invariants.
    ///
    /// # Errors
    ///
    /// See [`StudioConfig::from_env`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scale_min > 0.0 && self.scale_min < self.scale_max && self.scale_max.is_finite()) {
            return Err(ConfigError::EmptyScaleRange { min: self.scale_min, max: self.scale_max });
        }
        if !(self.drag_max_percent > 0.0 && self.drag_max_percent <= 100.0) {
            return Err(ConfigError::DragLimit(self.drag_max_percent));
        }
        for (field, value) in [("grain_size", self.grain_size), ("thumbnail_max", self.thumbnail_max)] {
            if !(1..=TEXTURE_EDGE_MAX_PX).contains(&value) {
                return Err(ConfigError::EdgeOutOfRange { field, value, max: TEXTURE_EDGE_MAX_PX });
            }
        }
        Ok(())
    }

    /// Clamp a scale factor into the configured range. Non-finite input maps to 1.0.
    #[must_use]
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        if scale.is_finite() {
            scale.clamp(self.scale_min, self.scale_max)
        } else {
            1.0_f64.clamp(self.scale_min, self.scale_max)
        }
    }

    /// Clamp one axis of a normalized position into `[0, drag_max_percent]`.
    #[must_use]
    pub fn clamp_percent(&self, value: f64) -> f64 {
        if value.is_finite() { value.clamp(0.0, self.drag_max_percent) } else { 0.0 }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Parse { key, value: raw }),
        None => Ok(default),
    }
}
