//! 3D presentation: a renderer-agnostic scene description.
//!
//! [`build`] turns the store snapshot and tank config into glass panels, a
//! sloped substrate mesh, a water volume with its surface, object nodes and
//! lights. The water volume spans the same band as the flat view, from the
//! bed's mean height up to the fill level. A GPU host maps each [`Node`] onto a mesh and material. The tank
//! is centred on the origin with +Y up; one scene unit is 10 cm.
//!
//! The only time-dependent value is the water bob, driven by the caller's
//! elapsed time. Nothing here is stored between frames.

#[cfg(test)]
#[path = "scene3d_test.rs"]
mod scene3d_test;

use glam::Vec3;
use serde::Serialize;

use crate::consts::{CM_PER_SCENE_UNIT, MM_PER_SCENE_UNIT, WATER_BOB_AMPLITUDE, WATER_BOB_SPEED};
use crate::doc::{ObjectId, SceneObject, SubstrateConfig};
use crate::render::{Color, WaterSpan, water_span};
use crate::render::style::{self, Primitive, SELECTED_COLOR};
use crate::store::SceneStore;
use crate::tank::{EnclosureType, TankConfig};

const GLASS_TINT: Color = Color::rgb(255, 255, 255);
const FRAME_COLOR: Color = Color::rgb(204, 204, 204);

/// Inset of the water surface from the glass on each axis.
const WATER_INSET: f32 = 0.1;

/// Vertical offset of the selection ring below an object.
const RING_OFFSET: f32 = 1.2;

/// Triangles of the sloped substrate block: top, bottom, front, back, left, right.
pub const SUBSTRATE_INDICES: [u32; 36] = [
    3, 2, 6, 3, 6, 7, //
    0, 5, 1, 0, 4, 5, //
    0, 1, 2, 0, 2, 3, //
    5, 4, 7, 5, 7, 6, //
    4, 0, 3, 4, 3, 7, //
    1, 5, 6, 1, 6, 2,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub transmission: f32,
}

impl Material {
    fn solid(color: Color, roughness: f32, metalness: f32) -> Self {
        Self { color, roughness, metalness, opacity: 1.0, transmission: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Geometry {
    Box { size: Vec3 },
    /// Horizontal plane, `width` along X and `depth` along Z.
    Plane { width: f32, depth: f32 },
    Mesh { vertices: Vec<Vec3>, indices: Vec<u32> },
    Dodecahedron { radius: f32 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32, segments: u32 },
    Cone { radius: f32, height: f32, segments: u32 },
    /// Flat ring lying in the XZ plane.
    Ring { inner: f32, outer: f32 },
}

impl From<Primitive> for Geometry {
    fn from(p: Primitive) -> Self {
        match p {
            Primitive::Dodecahedron { radius } => Self::Dodecahedron { radius },
            Primitive::Cylinder { radius_top, radius_bottom, height, segments } => {
                Self::Cylinder { radius_top, radius_bottom, height, segments }
            }
            Primitive::Cone { radius, height, segments } => Self::Cone { radius, height, segments },
            Primitive::Box { size } => Self::Box { size: Vec3::splat(size) },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub label: &'static str,
    pub geometry: Geometry,
    pub material: Material,
    pub position: Vec3,
    /// Euler angles in radians, XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
}

impl Node {
    fn new(label: &'static str, geometry: Geometry, material: Material, position: Vec3) -> Self {
        Self { label, geometry, material, position, rotation: Vec3::ZERO, scale: Vec3::ONE, object_id: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    Ambient,
    Directional,
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Light {
    pub kind: LightKind,
    pub position: Vec3,
    pub intensity: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene3d {
    pub nodes: Vec<Node>,
    pub lights: Vec<Light>,
}

impl Scene3d {
    /// First node with `label`.
    #[must_use]
    pub fn node(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label == label)
    }

    /// Node standing in for a scene object.
    #[must_use]
    pub fn object_node(&self, id: &ObjectId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label == "object" && n.object_id.as_ref() == Some(id))
    }
}

/// Interior size in scene units: width, height, depth.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn tank_extent(tank: &TankConfig) -> Vec3 {
    let d = tank.dimensions().in_cm();
    Vec3::new(d.width as f32, d.height as f32, d.depth as f32) / CM_PER_SCENE_UNIT as f32
}

/// Bottom and top of the water volume at rest, in scene units.
///
/// The volume sits on the bed's mean height and fills `span`, the same
/// band the flat view paints.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn water_bounds(tank_height: f32, span: WaterSpan) -> (f32, f32) {
    let y = |percent_from_top: f64| tank_height * (1.0 - percent_from_top as f32 / 100.0) - tank_height / 2.0;
    let bottom = y(span.bottom);
    (bottom, y(span.top).max(bottom))
}

/// Centre height of the water volume at `elapsed_secs`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn water_y(tank_height: f32, span: WaterSpan, elapsed_secs: f64) -> f32 {
    let (bottom, top) = water_bounds(tank_height, span);
    let bob = (elapsed_secs * WATER_BOB_SPEED).sin() * WATER_BOB_AMPLITUDE;
    (bottom + top) / 2.0 + bob as f32
}

/// Front and back bed heights in scene units.
///
/// The mean matches the flat view's height percentage; the slope only
/// redistributes it between the front and back glass.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn substrate_heights(substrate: &SubstrateConfig, tank_height: f32) -> (f32, f32) {
    let mean = tank_height * substrate.height as f32 / 100.0;
    match substrate.slope {
        Some(slope) if slope.front >= 0.0 && slope.back >= 0.0 && slope.front + slope.back > 0.0 => {
            let total = (slope.front + slope.back) as f32;
            (mean * 2.0 * slope.front as f32 / total, mean * 2.0 * slope.back as f32 / total)
        }
        _ => (mean, mean),
    }
}

/// Eight corners of the sloped substrate block, front face first.
#[must_use]
pub fn substrate_vertices(width: f32, depth: f32, front: f32, back: f32) -> Vec<Vec3> {
    let (hw, hd) = (width / 2.0, depth / 2.0);
    vec![
        Vec3::new(-hw, 0.0, hd),
        Vec3::new(hw, 0.0, hd),
        Vec3::new(hw, front, hd),
        Vec3::new(-hw, front, hd),
        Vec3::new(-hw, 0.0, -hd),
        Vec3::new(hw, 0.0, -hd),
        Vec3::new(hw, back, -hd),
        Vec3::new(-hw, back, -hd),
    ]
}

/// Approximate RGB of a black body at `kelvin`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn kelvin_to_color(kelvin: f64) -> Color {
    let t = kelvin.clamp(1000.0, 40_000.0) / 100.0;
    let red = if t <= 66.0 { 255.0 } else { 329.698_727_446 * (t - 60.0).powf(-0.133_204_759_2) };
    let green = if t <= 66.0 {
        99.470_802_586_1 * t.ln() - 161.119_568_166_1
    } else {
        288.122_169_528_3 * (t - 60.0).powf(-0.075_514_849_2)
    };
    let blue = if t >= 66.0 {
        255.0
    } else if t <= 19.0 {
        0.0
    } else {
        138.517_731_223_1 * (t - 10.0).ln() - 305.044_792_730_7
    };
    let ch = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    Color::rgb(ch(red), ch(green), ch(blue))
}

/// Describe the whole 3D scene.
#[must_use]
pub fn build(store: &SceneStore, tank: &TankConfig, elapsed_secs: f64) -> Scene3d {
    let extent = tank_extent(tank);
    let mut nodes = Vec::new();

    push_glass(&mut nodes, tank, extent);
    push_substrate(&mut nodes, store.substrate(), extent);
    push_water(&mut nodes, store, extent, elapsed_secs);

    let selected = store.selected_id();
    for obj in store.sorted_objects() {
        push_object(&mut nodes, obj, extent, selected == Some(obj.id));
    }

    Scene3d { nodes, lights: lights(store) }
}

// =============================================================
// Parts
// =============================================================

#[allow(clippy::cast_possible_truncation)]
fn push_glass(nodes: &mut Vec<Node>, tank: &TankConfig, e: Vec3) {
    let style = tank.style();
    let g = (style.wall_thickness_mm / MM_PER_SCENE_UNIT) as f32;
    let glass = Material { color: GLASS_TINT, roughness: 0.0, metalness: 0.0, opacity: 0.4, transmission: 0.95 };

    let panel = |label, size: Vec3, position: Vec3| Node::new(label, Geometry::Box { size }, glass, position);
    nodes.push(panel("glass-front", Vec3::new(e.x, e.y, g), Vec3::new(0.0, 0.0, e.z / 2.0)));
    nodes.push(panel("glass-back", Vec3::new(e.x, e.y, g), Vec3::new(0.0, 0.0, -e.z / 2.0)));
    nodes.push(panel("glass-left", Vec3::new(g, e.y, e.z), Vec3::new(-e.x / 2.0, 0.0, 0.0)));
    nodes.push(panel("glass-right", Vec3::new(g, e.y, e.z), Vec3::new(e.x / 2.0, 0.0, 0.0)));
    nodes.push(panel("glass-bottom", Vec3::new(e.x, g, e.z), Vec3::new(0.0, -e.y / 2.0, 0.0)));

    if style.enclosure == EnclosureType::Framed {
        let frame = Material { opacity: 0.8, ..Material::solid(FRAME_COLOR, 0.5, 0.3) };
        let size = Vec3::new(e.x + 2.0 * g, 2.0 * g, e.z + 2.0 * g);
        let y = e.y / 2.0 + g / 2.0;
        nodes.push(Node::new("frame-top", Geometry::Box { size }, frame, Vec3::new(0.0, y, 0.0)));
        nodes.push(Node::new("frame-bottom", Geometry::Box { size }, frame, Vec3::new(0.0, -y, 0.0)));
    }
}

fn push_substrate(nodes: &mut Vec<Node>, substrate: &SubstrateConfig, e: Vec3) {
    let (front, back) = substrate_heights(substrate, e.y);
    let color = Color::from_hex_or(&substrate.color, Color::from_hex_or(substrate.kind.swatch(), Color::BLACK));
    let geometry = Geometry::Mesh {
        vertices: substrate_vertices(e.x, e.z, front, back),
        indices: SUBSTRATE_INDICES.to_vec(),
    };
    nodes.push(Node::new("substrate", geometry, Material::solid(color, 0.9, 0.0), Vec3::new(0.0, -e.y / 2.0, 0.0)));
}

#[allow(clippy::cast_possible_truncation)]
fn push_water(nodes: &mut Vec<Node>, store: &SceneStore, e: Vec3, elapsed_secs: f64) {
    let water = store.water();
    let span = water_span(water.level, store.substrate().height);
    if !span.is_visible() {
        return;
    }
    let tint = Color::from_hex_or(&water.tint, Color::WHITE);
    let material = Material {
        color: tint,
        roughness: 0.05,
        metalness: 0.0,
        opacity: water.clarity.clamp(0.0, 1.0) as f32,
        transmission: 0.9,
    };
    let (bottom, top) = water_bounds(e.y, span);
    let height = top - bottom;
    let center_y = water_y(e.y, span, elapsed_secs);
    let (w, d) = ((e.x - WATER_INSET).max(0.0), (e.z - WATER_INSET).max(0.0));

    let volume = Geometry::Box { size: Vec3::new(w, height, d) };
    nodes.push(Node::new("water", volume, material, Vec3::new(0.0, center_y, 0.0)));
    nodes.push(Node::new(
        "water-surface",
        Geometry::Plane { width: w, depth: d },
        material,
        Vec3::new(0.0, center_y + height / 2.0, 0.0),
    ));
}

#[allow(clippy::cast_possible_truncation)]
fn push_object(nodes: &mut Vec<Node>, obj: &SceneObject, e: Vec3, selected: bool) {
    let look = style::style_for(obj.kind);
    let hex = if selected { SELECTED_COLOR } else { look.body };
    let color = Color::from_hex_or(hex, Color::WHITE);
    let position = Vec3::new(
        (obj.position.x as f32 / 100.0 - 0.5) * e.x,
        (1.0 - obj.position.y as f32 / 100.0) * e.y - e.y / 2.0,
        0.0,
    );

    // Screen rotation is clockwise with y down; around +Z that is negative.
    let material = Material::solid(color, look.roughness, look.metalness);
    let mut node = Node::new("object", look.primitive.into(), material, position);
    node.rotation = Vec3::new(0.0, 0.0, -(obj.rotation as f32).to_radians());
    node.scale = Vec3::splat(obj.scale as f32);
    node.object_id = Some(obj.id);
    nodes.push(node);

    if selected {
        let ring = Material::solid(Color::from_hex_or(SELECTED_COLOR, Color::WHITE), 0.5, 0.0);
        let geometry = Geometry::Ring { inner: 1.5, outer: 1.7 };
        let mut marker = Node::new("selection-ring", geometry, ring, position - Vec3::Y * RING_OFFSET);
        marker.object_id = Some(obj.id);
        nodes.push(marker);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn lights(store: &SceneStore) -> Vec<Light> {
    let lighting = store.lighting();
    let intensity = lighting.intensity.clamp(0.0, 1.0) as f32;
    let ambient_color = Color::from_hex_or(&lighting.color, Color::WHITE);
    let sun_color = kelvin_to_color(lighting.color_temperature);
    // Full sun at noon, a dim floor at night.
    let daylight = (std::f64::consts::PI * lighting.time_of_day / 24.0).sin().max(0.2) as f32;

    vec![
        Light { kind: LightKind::Ambient, position: Vec3::ZERO, intensity: 0.5 * intensity, color: ambient_color },
        Light {
            kind: LightKind::Directional,
            position: Vec3::new(10.0, 20.0, 10.0),
            intensity: 1.25 * intensity * daylight,
            color: sun_color,
        },
        Light {
            kind: LightKind::Point,
            position: Vec3::new(-10.0, 10.0, -10.0),
            intensity: 0.375 * intensity,
            color: sun_color,
        },
    ]
}
