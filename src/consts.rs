//! Shared numeric constants for the aquascape crate.

// ── Object transforms ───────────────────────────────────────────

/// Lower bound for an object's uniform scale factor.
pub const SCALE_MIN: f64 = 0.1;

/// Upper bound for an object's uniform scale factor.
pub const SCALE_MAX: f64 = 5.0;

/// Largest normalized coordinate (percent) an object's anchor may take on either axis.
pub const DRAG_MAX_PERCENT: f64 = 95.0;

/// Side length of an unscaled object footprint, in container pixels.
pub const ITEM_BASE_SIZE_PX: f64 = 64.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the footprint's top edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

// ── Scene config ranges ─────────────────────────────────────────

/// Substrate bed height bounds, as percent of interior height.
pub const SUBSTRATE_HEIGHT_MIN: f64 = 5.0;
pub const SUBSTRATE_HEIGHT_MAX: f64 = 40.0;

/// Lighting colour-temperature bounds in kelvin.
pub const COLOR_TEMP_MIN_K: f64 = 2700.0;
pub const COLOR_TEMP_MAX_K: f64 = 10_000.0;

// ── Tank ────────────────────────────────────────────────────────

/// Cubic centimetres per litre.
pub const CM3_PER_LITER: f64 = 1000.0;

/// US gallons per litre.
pub const GALLONS_PER_LITER: f64 = 0.264_172;

/// Centimetres per inch.
pub const CM_PER_INCH: f64 = 2.54;

// ── Flat view ───────────────────────────────────────────────────

/// Gap between the container edge and the tank outline, in pixels.
pub const TANK_PADDING_PX: f64 = 40.0;

/// Rim thickness drawn around the tank outline, in pixels.
pub const GLASS_RIM_PX: f64 = 3.0;

/// Perspective inset as a fraction of the tank's on-screen width.
pub const PERSPECTIVE_WIDTH_RATIO: f64 = 0.06;

/// Perspective inset as a fraction of the tank's on-screen height.
pub const PERSPECTIVE_HEIGHT_RATIO: f64 = 0.08;

// ── 3D view ─────────────────────────────────────────────────────

/// Centimetres per 3D scene unit.
pub const CM_PER_SCENE_UNIT: f64 = 10.0;

/// Wall-thickness millimetres per 3D scene unit.
pub const MM_PER_SCENE_UNIT: f64 = 100.0;

/// Angular speed of the water surface bob, radians per second.
pub const WATER_BOB_SPEED: f64 = 0.5;

/// Amplitude of the water surface bob, in scene units.
pub const WATER_BOB_AMPLITUDE: f64 = 0.01;

// ── Uploads / cutouts ───────────────────────────────────────────

/// Largest accepted upload, in bytes.
pub const UPLOAD_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Longest thumbnail edge, in pixels.
pub const THUMBNAIL_MAX_PX: u32 = 128;

/// Side of the square block sampled from each corner in auto removal mode.
pub const CORNER_SAMPLE_PX: u32 = 10;

/// Edge of the square grain texture tile, in pixels.
pub const GRAIN_SIZE_PX: u32 = 128;

/// Largest edge accepted for generated grain tiles and thumbnails.
pub const TEXTURE_EDGE_MAX_PX: u32 = 1024;
