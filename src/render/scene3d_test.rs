#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{LightingPatch, NewObject, ObjectKind, ObjectPatch, SubstratePatch, SubstrateSlope, WaterPatch};
use crate::geom::Point;
use crate::tank::{LengthUnit, TankDimensions, TankStyle};

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

fn make_store() -> SceneStore {
    SceneStore::default()
}

fn labels(scene: &Scene3d) -> Vec<&'static str> {
    scene.nodes.iter().map(|n| n.label).collect()
}

// =============================================================
// Tank
// =============================================================

#[test]
fn extent_in_scene_units() {
    let extent = tank_extent(&TankConfig::default());
    assert_eq!(extent, Vec3::new(6.0, 4.0, 3.0));
}

#[test]
fn extent_converts_inches() {
    let mut tank = TankConfig::default();
    tank.set_dimensions(TankDimensions { width: 10.0, height: 10.0, depth: 10.0, unit: LengthUnit::Inches }).unwrap();
    assert!(approx_eq(tank_extent(&tank).x, 2.54));
}

#[test]
fn rimless_has_five_glass_panels() {
    let scene = build(&make_store(), &TankConfig::default(), 0.0);
    let glass = labels(&scene).into_iter().filter(|l| l.starts_with("glass-")).count();
    assert_eq!(glass, 5);
    assert!(scene.node("frame-top").is_none());
}

#[test]
fn glass_thickness_from_millimetres() {
    let scene = build(&make_store(), &TankConfig::default(), 0.0);
    let Geometry::Box { size } = scene.node("glass-front").unwrap().geometry else {
        panic!("front glass is a box");
    };
    assert!(approx_eq(size.z, 0.06));
}

#[test]
fn framed_adds_top_and_bottom_frames() {
    let mut tank = TankConfig::default();
    tank.set_style(TankStyle { enclosure: EnclosureType::Framed, wall_thickness_mm: 6.0 }).unwrap();
    let scene = build(&make_store(), &tank, 0.0);
    let top = scene.node("frame-top").unwrap();
    let bottom = scene.node("frame-bottom").unwrap();
    assert!(approx_eq(top.position.y, 2.03));
    assert!(approx_eq(bottom.position.y, -2.03));
    assert!(approx_eq(top.material.opacity, 0.8));
}

// =============================================================
// Substrate
// =============================================================

#[test]
fn slope_preserves_mean_height() {
    let substrate = SubstrateConfig::default();
    let (front, back) = substrate_heights(&substrate, 4.0);
    // 5% of 4 units.
    assert!(approx_eq((front + back) / 2.0, 0.2));
    assert!(back > front);
}

#[test]
fn flat_bed_without_slope() {
    let substrate = SubstrateConfig { slope: None, height: 20.0, ..SubstrateConfig::default() };
    assert_eq!(substrate_heights(&substrate, 4.0), (0.8, 0.8));
}

#[test]
fn degenerate_slope_is_flat() {
    let slope = Some(SubstrateSlope { front: 0.0, back: 0.0 });
    let substrate = SubstrateConfig { slope, ..SubstrateConfig::default() };
    let (front, back) = substrate_heights(&substrate, 4.0);
    assert_eq!(front, back);
}

#[test]
fn substrate_mesh_shape() {
    let vertices = substrate_vertices(6.0, 3.0, 0.1, 0.3);
    assert_eq!(vertices.len(), 8);
    assert_eq!(vertices[2], Vec3::new(3.0, 0.1, 1.5));
    assert_eq!(vertices[6], Vec3::new(3.0, 0.3, -1.5));
    assert!(SUBSTRATE_INDICES.iter().all(|&i| (i as usize) < vertices.len()));
}

#[test]
fn substrate_node_sits_on_tank_floor() {
    let scene = build(&make_store(), &TankConfig::default(), 0.0);
    let node = scene.node("substrate").unwrap();
    assert_eq!(node.position.y, -2.0);
    assert!(approx_eq(node.material.roughness, 0.9));
}

// =============================================================
// Water
// =============================================================

#[test]
fn water_bounds_follow_span() {
    // Bed at 20%, fill at 95% of 4 units.
    let (bottom, top) = water_bounds(4.0, water_span(95.0, 20.0));
    assert!(approx_eq(bottom, -1.2));
    assert!(approx_eq(top, 1.8));
}

#[test]
fn water_below_bed_collapses() {
    let (bottom, top) = water_bounds(4.0, water_span(10.0, 20.0));
    assert_eq!(bottom, top);
}

#[test]
fn water_y_at_rest() {
    // Bed at 5%, fill at 95%: centred on the origin.
    assert!(approx_eq(water_y(4.0, water_span(95.0, 5.0), 0.0), 0.0));
}

#[test]
fn water_bobs_with_time() {
    let span = water_span(95.0, 5.0);
    assert!(approx_eq(water_y(4.0, span, std::f64::consts::PI), 0.01));
    assert!(approx_eq(water_y(4.0, span, 3.0 * std::f64::consts::PI), -0.01));
}

#[test]
fn water_sits_on_substrate() {
    let mut store = make_store();
    store.set_substrate(&SubstratePatch { height: Some(20.0), ..Default::default() });
    let scene = build(&store, &TankConfig::default(), 0.0);

    let water = scene.node("water").unwrap();
    let Geometry::Box { size } = water.geometry else {
        panic!("water is a box");
    };
    let (front, back) = substrate_heights(store.substrate(), 4.0);
    let bed_top = scene.node("substrate").unwrap().position.y + (front + back) / 2.0;
    assert!(approx_eq(water.position.y - size.y / 2.0, bed_top));
    // 95 - 20 = 75 points of 4 units.
    assert!(approx_eq(size.y, 3.0));
}

#[test]
fn water_hidden_when_bed_covers_it() {
    let mut store = make_store();
    store.set_substrate(&SubstratePatch { height: Some(60.0), ..Default::default() });
    store.set_water(&WaterPatch { level: Some(50.0), ..Default::default() });
    let scene = build(&store, &TankConfig::default(), 0.0);
    assert!(scene.node("water").is_none());
}

#[test]
fn water_material_follows_config() {
    let mut store = make_store();
    store.set_water(&WaterPatch { clarity: Some(0.5), tint: Some("#ff0000".to_owned()), ..Default::default() });
    let scene = build(&store, &TankConfig::default(), 0.0);
    let water = scene.node("water").unwrap();
    assert_eq!(water.material.opacity, 0.5);
    assert_eq!(water.material.color, Color::rgb(255, 0, 0));
    let surface = scene.node("water-surface").unwrap();
    assert!(approx_eq(surface.position.y, water.position.y + 1.8));
}

#[test]
fn empty_tank_has_no_water() {
    let mut store = make_store();
    store.set_water(&WaterPatch { level: Some(0.0), ..Default::default() });
    let scene = build(&store, &TankConfig::default(), 0.0);
    assert!(scene.node("water").is_none());
    assert!(scene.node("water-surface").is_none());
}

// =============================================================
// Objects
// =============================================================

#[test]
fn object_position_maps_percent_to_scene() {
    let mut store = make_store();
    let centre = store.add_object(NewObject::new(ObjectKind::Rock, "rock", Point::new(50.0, 50.0)));
    let corner = store.add_object(NewObject::new(ObjectKind::Plant, "plant", Point::new(0.0, 0.0)));
    let scene = build(&store, &TankConfig::default(), 0.0);
    assert_eq!(scene.object_node(&centre).unwrap().position, Vec3::ZERO);
    assert_eq!(scene.object_node(&corner).unwrap().position, Vec3::new(-3.0, 2.0, 0.0));
}

#[test]
fn object_primitive_per_kind() {
    let mut store = make_store();
    let rock = store.add_object(NewObject::new(ObjectKind::Rock, "rock", Point::new(10.0, 10.0)));
    let wood = store.add_object(NewObject::new(ObjectKind::Driftwood, "wood", Point::new(10.0, 10.0)));
    let plant = store.add_object(NewObject::new(ObjectKind::Plant, "plant", Point::new(10.0, 10.0)));
    let gear = store.add_object(NewObject::new(ObjectKind::Equipment, "heater", Point::new(10.0, 10.0)));
    let scene = build(&store, &TankConfig::default(), 0.0);

    assert!(matches!(scene.object_node(&rock).unwrap().geometry, Geometry::Dodecahedron { .. }));
    assert!(matches!(scene.object_node(&wood).unwrap().geometry, Geometry::Cylinder { segments: 8, .. }));
    assert!(matches!(scene.object_node(&plant).unwrap().geometry, Geometry::Cone { .. }));
    assert!(matches!(scene.object_node(&gear).unwrap().geometry, Geometry::Box { .. }));
    assert_eq!(scene.object_node(&rock).unwrap().material.color, Color::rgb(0x64, 0x74, 0x8b));
}

#[test]
fn object_rotation_and_scale() {
    let mut store = make_store();
    let id = store.add_object(NewObject::new(ObjectKind::Rock, "rock", Point::new(10.0, 10.0)));
    store.update_object(&id, &ObjectPatch { rotation: Some(90.0), scale: Some(2.0), ..Default::default() });
    let scene = build(&store, &TankConfig::default(), 0.0);
    let node = scene.object_node(&id).unwrap();
    assert!(approx_eq(node.rotation.z, -std::f32::consts::FRAC_PI_2));
    assert_eq!(node.scale, Vec3::splat(2.0));
}

#[test]
fn selected_object_highlighted_with_ring() {
    let mut store = make_store();
    let id = store.add_object(NewObject::new(ObjectKind::Rock, "rock", Point::new(10.0, 10.0)));
    assert!(build(&store, &TankConfig::default(), 0.0).node("selection-ring").is_none());

    store.select_object(Some(id));
    let scene = build(&store, &TankConfig::default(), 0.0);
    assert_eq!(scene.object_node(&id).unwrap().material.color, Color::rgb(0x4a, 0xde, 0x80));
    let ring = scene.node("selection-ring").unwrap();
    assert_eq!(ring.object_id, Some(id));
}

// =============================================================
// Lights
// =============================================================

#[test]
fn default_light_rig() {
    let scene = build(&make_store(), &TankConfig::default(), 0.0);
    let intensities: Vec<f32> = scene.lights.iter().map(|l| l.intensity).collect();
    assert!(approx_eq(intensities[0], 0.4));
    assert!(approx_eq(intensities[1], 1.0));
    assert!(approx_eq(intensities[2], 0.3));
}

#[test]
fn night_dims_the_sun() {
    let mut store = make_store();
    store.set_lighting(&LightingPatch { time_of_day: Some(0.0), ..Default::default() });
    let scene = build(&store, &TankConfig::default(), 0.0);
    assert!(approx_eq(scene.lights[1].intensity, 0.2));
    assert!(approx_eq(scene.lights[0].intensity, 0.4));
}

#[test]
fn warm_light_is_red_shifted() {
    let warm = kelvin_to_color(2700.0);
    let cool = kelvin_to_color(10_000.0);
    assert_eq!(warm.r, 255);
    assert!(warm.b < warm.g);
    assert!(cool.b > warm.b);
}

#[test]
fn daylight_is_near_white() {
    let c = kelvin_to_color(6500.0);
    assert_eq!(c.r, 255);
    assert!(c.g > 240 && c.b > 240);
}

#[test]
fn scene_serializes() {
    let scene = build(&make_store(), &TankConfig::default(), 0.0);
    let json = serde_json::to_value(&scene).unwrap();
    assert_eq!(json["nodes"][0]["label"], "glass-front");
    assert_eq!(json["lights"][0]["kind"], "ambient");
}
