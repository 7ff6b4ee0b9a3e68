//! Procedural grain tiles for the substrate bed.
//!
//! A tile is a square RGBA buffer whose noise character depends on the
//! material: fine per-pixel noise for sand, medium clumped noise for soil, and
//! coarse noise plus scattered pebbles for gravel. Tiles wrap at the edges so
//! they repeat without seams. Exact pixel values are not meaningful; only the
//! distribution is.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::consts::TEXTURE_EDGE_MAX_PX;
use crate::doc::{SubstrateConfig, SubstrateKind};
use crate::render::Color;

/// Dark base the grain is pulled towards, so texture reads as shading.
const GRAIN_SHADOW: Color = Color::rgb(26, 26, 26);

/// Noise shape for one material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrainParams {
    /// Peak-to-peak noise amplitude in channel units.
    pub amplitude: f64,
    /// Side of the square cell sharing one noise sample.
    pub cell: u32,
    /// Pebbles scattered per 128×128 area.
    pub pebbles: u32,
    /// Pebble radius range in pixels.
    pub pebble_radius: (f64, f64),
}

impl GrainParams {
    #[must_use]
    pub fn for_kind(kind: SubstrateKind) -> Self {
        match kind {
            SubstrateKind::Sand => Self { amplitude: 24.0, cell: 1, pebbles: 0, pebble_radius: (0.0, 0.0) },
            SubstrateKind::Soil => Self { amplitude: 35.0, cell: 2, pebbles: 0, pebble_radius: (0.0, 0.0) },
            SubstrateKind::Gravel => Self { amplitude: 45.0, cell: 3, pebbles: 48, pebble_radius: (2.0, 6.0) },
        }
    }
}

/// What a tile is generated from. Tiles are regenerated only when this changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GrainKey {
    pub kind: SubstrateKind,
    pub color: String,
    pub size: u32,
}

impl GrainKey {
    /// `size` is clamped into `[1, TEXTURE_EDGE_MAX_PX]`.
    #[must_use]
    pub fn of(substrate: &SubstrateConfig, size: u32) -> Self {
        Self { kind: substrate.kind, color: substrate.color.clone(), size: size.clamp(1, TEXTURE_EDGE_MAX_PX) }
    }

    fn kind_swatch(&self) -> Color {
        Color::from_hex_or(self.kind.swatch(), GRAIN_SHADOW)
    }
}

/// A generated RGBA tile.
#[derive(Debug, Clone, PartialEq)]
pub struct GrainTexture {
    key: GrainKey,
    /// Bumped on every regeneration so backends can drop stale patterns.
    generation: u64,
    pixels: Vec<u8>,
}

impl GrainTexture {
    /// Generate a tile for `key` from `rng`. Oversized keys are clamped to
    /// `TEXTURE_EDGE_MAX_PX`.
    pub fn generate<R: Rng + ?Sized>(key: GrainKey, generation: u64, rng: &mut R) -> Self {
        let size = key.size.clamp(1, TEXTURE_EDGE_MAX_PX);
        let key = GrainKey { size, ..key };
        let params = GrainParams::for_kind(key.kind);
        let base = Color::from_hex_or(&key.color, key.kind_swatch()).mix(GRAIN_SHADOW, 0.5);
        let side = size as usize;
        let mut offsets = vec![0.0_f64; side * side];

        let cell = params.cell.max(1);
        for cy in (0..size).step_by(cell as usize) {
            for cx in (0..size).step_by(cell as usize) {
                let noise = (rng.random::<f64>() - 0.5) * params.amplitude;
                for y in cy..(cy + cell).min(size) {
                    for x in cx..(cx + cell).min(size) {
                        offsets[y as usize * side + x as usize] = noise;
                    }
                }
            }
        }

        let area_scale = f64::from(size) * f64::from(size) / (128.0 * 128.0);
        let pebble_count = (f64::from(params.pebbles) * area_scale).round();
        let (r_min, r_max) = params.pebble_radius;
        let mut placed = 0.0;
        while placed < pebble_count {
            placed += 1.0;
            let px = rng.random::<f64>() * f64::from(size);
            let py = rng.random::<f64>() * f64::from(size);
            let radius = r_min + rng.random::<f64>() * (r_max - r_min);
            let shade = (rng.random::<f64>() - 0.3) * params.amplitude * 1.5;
            stamp_disc(&mut offsets, size, px, py, radius, shade);
        }

        let mut pixels = Vec::with_capacity(offsets.len() * 4);
        for offset in offsets {
            pixels.push(shift(base.r, offset));
            pixels.push(shift(base.g, offset));
            pixels.push(shift(base.b, offset));
            pixels.push(255);
        }
        Self { key, generation, pixels }
    }

    #[must_use]
    pub fn key(&self) -> &GrainKey {
        &self.key
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.key.size
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Row-major RGBA bytes, `size × size × 4` long.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mean of the red channel; a cheap brightness probe.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_red(&self) -> f64 {
        let count = self.pixels.len() / 4;
        if count == 0 {
            return 0.0;
        }
        let sum: u64 = self.pixels.chunks_exact(4).map(|p| u64::from(p[0])).sum();
        sum as f64 / count as f64
    }
}

/// Add `shade` to every offset inside a disc, wrapping across tile edges.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn stamp_disc(offsets: &mut [f64], size: u32, cx: f64, cy: f64, radius: f64, shade: f64) {
    let size_i = i64::from(size);
    let r = radius.ceil() as i64;
    let (cxi, cyi) = (cx.floor() as i64, cy.floor() as i64);
    for dy in -r..=r {
        for dx in -r..=r {
            let (fx, fy) = (dx as f64, dy as f64);
            if fx.hypot(fy) > radius {
                continue;
            }
            let x = (cxi + dx).rem_euclid(size_i);
            let y = (cyi + dy).rem_euclid(size_i);
            offsets[(y * size_i + x) as usize] += shade;
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn shift(channel: u8, offset: f64) -> u8 {
    (f64::from(channel) + offset).round().clamp(0.0, 255.0) as u8
}

/// Holds the current tile and regenerates it only when the substrate's
/// material, colour or the tile size changes.
#[derive(Debug, Default)]
pub struct GrainCache {
    current: Option<GrainTexture>,
    generations: u64,
}

impl GrainCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The tile for `substrate`, generating it if the cached one is stale.
    pub fn get(&mut self, substrate: &SubstrateConfig, size: u32) -> &GrainTexture {
        let key = GrainKey::of(substrate, size);
        let texture = match self.current.take() {
            Some(cached) if cached.key == key => cached,
            _ => {
                self.generations += 1;
                let mut hasher = DefaultHasher::new();
                key.hash(&mut hasher);
                self.generations.hash(&mut hasher);
                let mut rng = StdRng::seed_from_u64(hasher.finish());
                tracing::debug!(kind = ?key.kind, color = %key.color, size, "grain texture regenerated");
                GrainTexture::generate(key, self.generations, &mut rng)
            }
        };
        self.current.insert(texture)
    }

    /// Number of tiles generated so far.
    #[must_use]
    pub fn generations(&self) -> u64 {
        self.generations
    }
}
