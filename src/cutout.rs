//! Background removal for uploaded decor photos.
//!
//! A pixel is keyed out by one of three rules: near-white (`White`), a
//! green-screen dominance test (`Green`), or closeness to the colour averaged
//! from the four corner blocks with a looser near-white fallback (`Auto`).
//! Keyed pixels get zero alpha; afterwards the alpha channel is box-blurred
//! within `feather` pixels, but only where a pixel is already partially
//! transparent.

#[cfg(test)]
#[path = "cutout_test.rs"]
mod cutout_test;

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageEncoder, Rgb, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::consts::CORNER_SAMPLE_PX;

/// Red wash marking pixels a removal would clear.
pub const PREVIEW_MARK: Rgba<u8> = Rgba([255, 0, 0, 128]);

/// Share of the tolerance used by the near-white fallback in auto mode.
const AUTO_WHITE_FACTOR: f64 = 0.8;

#[derive(Debug, thiserror::Error)]
pub enum CutoutError {
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("image encode failed: {0}")]
    Encode(String),
    #[error("image has no pixels")]
    Empty,
    #[error("unknown removal mode: {0}")]
    UnknownMode(String),
}

/// What kind of background to key out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalMode {
    White,
    Green,
    #[default]
    Auto,
}

impl RemovalMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Green => "green",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for RemovalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemovalMode {
    type Err = CutoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(Self::White),
            "green" => Ok(Self::Green),
            "auto" => Ok(Self::Auto),
            other => Err(CutoutError::UnknownMode(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalOptions {
    /// Allowed per-channel deviation from the target colour.
    pub tolerance: u8,
    pub mode: RemovalMode,
    /// Feather radius in pixels; 0 disables feathering.
    #[serde(rename = "featherEdge")]
    pub feather: u32,
}

impl Default for RemovalOptions {
    fn default() -> Self {
        Self { tolerance: 30, mode: RemovalMode::Auto, feather: 1 }
    }
}

// =============================================================
// Keying
// =============================================================

/// Average colour of the four corner blocks, rounded per channel.
///
/// Blocks shrink to fit images smaller than the sample size. An empty image
/// reports white.
#[must_use]
pub fn detect_background_color(img: &RgbaImage) -> Rgb<u8> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Rgb([255, 255, 255]);
    }
    let block = CORNER_SAMPLE_PX.min(w).min(h);
    let origins = [(0, 0), (w - block, 0), (0, h - block), (w - block, h - block)];

    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for (ox, oy) in origins {
        for y in oy..oy + block {
            for x in ox..ox + block {
                let p = img.get_pixel(x, y);
                for (acc, channel) in sum.iter_mut().zip(p.0) {
                    *acc += u64::from(channel);
                }
                count += 1;
            }
        }
    }
    Rgb(sum.map(|s| channel_from((s + count / 2) / count)))
}

fn channel_from(v: u64) -> u8 {
    u8::try_from(v).unwrap_or(u8::MAX)
}

/// High brightness with low saturation.
fn is_whitish(p: Rgba<u8>, tolerance: f64) -> bool {
    let [r, g, b, _] = p.0;
    let min = r.min(g).min(b);
    let max = r.max(g).max(b);
    let saturation = if max > 0 { f64::from(max - min) / f64::from(max) } else { 0.0 };
    f64::from(min) > 255.0 - tolerance || (r > 200 && g > 200 && b > 200 && saturation < 0.15)
}

/// Strong green with red and blue both trailing by more than the tolerance.
fn is_green_screen(p: Rgba<u8>, tolerance: f64) -> bool {
    let [r, g, b, _] = p.0.map(f64::from);
    g > 100.0 && g > r + tolerance && g > b + tolerance
}

fn is_similar(p: Rgba<u8>, target: Rgb<u8>, tolerance: u8) -> bool {
    p.0.iter().zip(target.0).all(|(&c, t)| c.abs_diff(t) <= tolerance)
}

/// Per-image background predicate.
#[derive(Debug, Clone, Copy)]
struct Keyer {
    mode: RemovalMode,
    tolerance: u8,
    target: Rgb<u8>,
}

impl Keyer {
    fn new(img: &RgbaImage, opts: &RemovalOptions) -> Self {
        let target = match opts.mode {
            RemovalMode::Auto => detect_background_color(img),
            RemovalMode::White | RemovalMode::Green => Rgb([255, 255, 255]),
        };
        Self { mode: opts.mode, tolerance: opts.tolerance, target }
    }

    fn is_background(&self, p: Rgba<u8>) -> bool {
        let tolerance = f64::from(self.tolerance);
        match self.mode {
            RemovalMode::White => is_whitish(p, tolerance),
            RemovalMode::Green => is_green_screen(p, tolerance),
            RemovalMode::Auto => {
                is_similar(p, self.target, self.tolerance) || is_whitish(p, tolerance * AUTO_WHITE_FACTOR)
            }
        }
    }
}

/// Clear the background of `img`, then feather partially transparent edges.
#[must_use]
pub fn remove_background(img: &RgbaImage, opts: &RemovalOptions) -> RgbaImage {
    let keyer = Keyer::new(img, opts);
    let mut out = img.clone();
    let mut removed = 0usize;
    for p in out.pixels_mut() {
        if keyer.is_background(*p) {
            p.0[3] = 0;
            removed += 1;
        }
    }
    if opts.feather > 0 {
        feather_alpha(&mut out, opts.feather);
    }
    tracing::debug!(width = out.width(), height = out.height(), removed, mode = %opts.mode, "background removed");
    out
}

/// Same keying as [`remove_background`], but marks keyed pixels with
/// [`PREVIEW_MARK`] instead of clearing them. No feathering.
#[must_use]
pub fn preview_removal(img: &RgbaImage, opts: &RemovalOptions) -> RgbaImage {
    let keyer = Keyer::new(img, opts);
    let mut out = img.clone();
    for p in out.pixels_mut() {
        if keyer.is_background(*p) {
            *p = PREVIEW_MARK;
        }
    }
    out
}

/// Box-blur alpha at pixels with `0 < alpha < 255`, reading from a snapshot
/// so earlier writes don't bleed into later averages.
fn feather_alpha(img: &mut RgbaImage, radius: u32) {
    let (w, h) = img.dimensions();
    let alpha: Vec<u8> = img.pixels().map(|p| p.0[3]).collect();
    let at = |x: u32, y: u32| alpha[y as usize * w as usize + x as usize];

    for y in 0..h {
        for x in 0..w {
            let a = at(x, y);
            if a == 0 || a == u8::MAX {
                continue;
            }
            let (x0, x1) = (x.saturating_sub(radius), x.saturating_add(radius).min(w - 1));
            let (y0, y1) = (y.saturating_sub(radius), y.saturating_add(radius).min(h - 1));
            let mut sum = 0u64;
            let mut count = 0u64;
            for ny in y0..=y1 {
                for nx in x0..=x1 {
                    sum += u64::from(at(nx, ny));
                    count += 1;
                }
            }
            img.get_pixel_mut(x, y).0[3] = channel_from((sum + count / 2) / count);
        }
    }
}

// =============================================================
// Thumbnails and codecs
// =============================================================

/// Resize so the longer side equals `max_side`, keeping aspect ratio.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn thumbnail(img: &RgbaImage, max_side: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || max_side == 0 {
        return img.clone();
    }
    let scale = (f64::from(max_side) / f64::from(w)).min(f64::from(max_side) / f64::from(h));
    let tw = (f64::from(w) * scale).round().max(1.0) as u32;
    let th = (f64::from(h) * scale).round().max(1.0) as u32;
    image::imageops::resize(img, tw, th, FilterType::Triangle)
}

/// Decode any supported format into 8-bit RGBA.
///
/// # Errors
///
/// `Decode` for unreadable bytes, `Empty` for a zero-sized image.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, CutoutError> {
    let img = image::load_from_memory(bytes).map_err(|err| CutoutError::Decode(err.to_string()))?.to_rgba8();
    if img.width() == 0 || img.height() == 0 {
        return Err(CutoutError::Empty);
    }
    Ok(img)
}

/// # Errors
///
/// `Encode` if the PNG writer fails.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, CutoutError> {
    let mut out = Cursor::new(Vec::new());
    PngEncoder::new(&mut out)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
        .map_err(|err| CutoutError::Encode(err.to_string()))?;
    Ok(out.into_inner())
}

/// A processed upload: the keyed image and its thumbnail.
#[derive(Debug, Clone)]
pub struct Cutout {
    pub processed: RgbaImage,
    pub thumbnail: RgbaImage,
}

impl Cutout {
    /// Decode `bytes`, remove the background and build a thumbnail.
    ///
    /// # Errors
    ///
    /// Propagates [`decode`] failures.
    pub fn from_bytes(bytes: &[u8], opts: &RemovalOptions, thumbnail_max: u32) -> Result<Self, CutoutError> {
        let source = decode(bytes)?;
        let processed = remove_background(&source, opts);
        let thumbnail = thumbnail(&processed, thumbnail_max);
        Ok(Self { processed, thumbnail })
    }

    /// Both images as PNG bytes: `(processed, thumbnail)`.
    ///
    /// # Errors
    ///
    /// Propagates [`encode_png`] failures.
    pub fn to_png(&self) -> Result<(Vec<u8>, Vec<u8>), CutoutError> {
        Ok((encode_png(&self.processed)?, encode_png(&self.thumbnail)?))
    }
}
