#![allow(clippy::float_cmp)]

use super::*;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// =============================================================
// Volume
// =============================================================

#[test]
fn default_tank_volume_is_computed_at_startup() {
    let tank = TankConfig::new();
    assert!(approx_eq(tank.volume().liters, 72.0));
    assert!(approx_eq(tank.volume().gallons, 72.0 * 0.264_172));
}

#[test]
fn volume_formula_in_cm() {
    let v = Volume::of(&TankDimensions::cm(100.0, 50.0, 40.0));
    assert!(approx_eq(v.liters, 200.0));
    assert!(approx_eq(v.gallons, 200.0 * 0.264_172));
}

#[test]
fn volume_converts_inches_before_formula() {
    let dims = TankDimensions { width: 10.0, height: 10.0, depth: 10.0, unit: LengthUnit::Inches };
    let v = Volume::of(&dims);
    let side = 25.4;
    assert!(approx_eq(v.liters, side * side * side / 1000.0));
}

#[test]
fn set_dimensions_recomputes_both_units_together() {
    let mut tank = TankConfig::new();
    tank.set_dimensions(TankDimensions::cm(10.0, 10.0, 10.0)).unwrap();
    assert!(approx_eq(tank.volume().liters, 1.0));
    assert!(approx_eq(tank.volume().gallons, 0.264_172));
    assert_eq!(tank.dimensions(), TankDimensions::cm(10.0, 10.0, 10.0));
}

#[test]
fn set_dimensions_rejects_invalid_and_keeps_previous() {
    let mut tank = TankConfig::new();
    let before = tank.clone();
    let err = tank.set_dimensions(TankDimensions::cm(10.0, 0.0, 10.0)).unwrap_err();
    assert_eq!(err, TankError::InvalidDimension { axis: "height", value: 0.0 });
    assert!(tank.set_dimensions(TankDimensions::cm(f64::NAN, 1.0, 1.0)).is_err());
    assert!(tank.set_dimensions(TankDimensions::cm(1.0, 1.0, -3.0)).is_err());
    assert_eq!(tank, before);
}

// =============================================================
// Style and water level
// =============================================================

#[test]
fn default_style_is_rimless_six_mm() {
    let style = TankConfig::new().style();
    assert_eq!(style.enclosure, EnclosureType::Rimless);
    assert_eq!(style.wall_thickness_mm, 6.0);
}

#[test]
fn set_style_accepts_zero_thickness() {
    let mut tank = TankConfig::new();
    tank.set_style(TankStyle { enclosure: EnclosureType::Framed, wall_thickness_mm: 0.0 }).unwrap();
    assert_eq!(tank.style().enclosure, EnclosureType::Framed);
}

#[test]
fn set_style_rejects_negative_thickness() {
    let mut tank = TankConfig::new();
    let err = tank.set_style(TankStyle { enclosure: EnclosureType::Curved, wall_thickness_mm: -1.0 }).unwrap_err();
    assert_eq!(err, TankError::InvalidThickness(-1.0));
    assert_eq!(tank.style().enclosure, EnclosureType::Rimless);
}

#[test]
fn water_level_is_clamped() {
    let mut tank = TankConfig::new();
    tank.set_water_level(140.0);
    assert_eq!(tank.water_level(), 100.0);
    tank.set_water_level(-5.0);
    assert_eq!(tank.water_level(), 0.0);
    tank.set_water_level(f64::NAN);
    assert_eq!(tank.water_level(), 0.0);
}

// =============================================================
// Presets
// =============================================================

#[test]
fn presets_are_valid() {
    for preset in &TANK_PRESETS {
        preset.dimensions.validate().unwrap();
    }
}

#[test]
fn apply_preset_updates_volume() {
    let mut tank = TankConfig::new();
    let preset = find_preset("20 gallon long").unwrap();
    tank.apply_preset(preset);
    assert_eq!(tank.dimensions(), preset.dimensions);
    assert!(approx_eq(tank.volume().liters, 76.2 * 30.5 * 30.5 / 1000.0));
}

#[test]
fn find_preset_unknown_is_none() {
    assert!(find_preset("aquarium of atlantis").is_none());
}

// =============================================================
// Summary / serde
// =============================================================

#[test]
fn summary_formats_overlay_lines() {
    let (dims, volume) = TankConfig::new().summary();
    assert_eq!(dims, "60 × 40 × 30 cm");
    assert_eq!(volume, "72.0L (19.0 gal)");
}

#[test]
fn enclosure_serde_lowercase() {
    assert_eq!(serde_json::to_string(&EnclosureType::Framed).unwrap(), "\"framed\"");
    assert_eq!(serde_json::to_string(&LengthUnit::Inches).unwrap(), "\"inches\"");
}

#[test]
fn deserialize_recomputes_volume() {
    let mut value = serde_json::to_value(TankConfig::new()).unwrap();
    value["dimensions"]["width"] = serde_json::json!(10.0);
    let tank: TankConfig = serde_json::from_value(value).unwrap();
    assert!(approx_eq(tank.volume().liters, 10.0 * 40.0 * 30.0 / 1000.0));
    assert_eq!(tank.volume(), Volume::of(&tank.dimensions()));
}

#[test]
fn deserialize_round_trips() {
    let mut tank = TankConfig::new();
    tank.set_dimensions(TankDimensions { width: 24.0, height: 16.0, depth: 12.0, unit: LengthUnit::Inches }).unwrap();
    tank.set_water_level(80.0);
    let back: TankConfig = serde_json::from_str(&serde_json::to_string(&tank).unwrap()).unwrap();
    assert_eq!(back, tank);
}

#[test]
fn deserialize_rejects_invalid_dimensions() {
    let json = r#"{"dimensions":{"width":-5.0,"height":0.0,"depth":30.0,"unit":"cm"},"water_level":50.0}"#;
    let err = serde_json::from_str::<TankConfig>(json).unwrap_err();
    assert!(err.to_string().contains("width"), "{err}");
}

#[test]
fn deserialize_rejects_negative_thickness() {
    let json = r#"{"dimensions":{"width":60.0,"height":40.0,"depth":30.0,"unit":"cm"},
        "style":{"enclosure":"framed","wall_thickness_mm":-1.0}}"#;
    assert!(serde_json::from_str::<TankConfig>(json).is_err());
}

#[test]
fn deserialize_clamps_water_level() {
    let json = r#"{"dimensions":{"width":60.0,"height":40.0,"depth":30.0,"unit":"cm"},"water_level":500.0}"#;
    let tank: TankConfig = serde_json::from_str(json).unwrap();
    assert_eq!(tank.water_level(), 100.0);
    assert_eq!(tank.style(), TankStyle::default());
}
