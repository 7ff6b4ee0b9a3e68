#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::NewCustomAsset;

const P1: PointerId = PointerId(1);
const P2: PointerId = PointerId(2);

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// 1000x500 viewport: container at (40, 40), 920x420.
/// Rock at (10%, 10%): anchor (132, 82), centre (164, 114), half 32 in canvas pixels.
fn make_core() -> (EngineCore, ObjectId) {
    let mut core = EngineCore::default();
    core.reseed(7);
    core.set_viewport(1000.0, 500.0, 1.0);
    let id = core.store.add_object(NewObject::new(ObjectKind::Rock, "rock", pt(10.0, 10.0)));
    (core, id)
}

fn position(core: &EngineCore, id: &ObjectId) -> Point {
    core.store.object(id).unwrap().position
}

// =============================================================
// Viewport
// =============================================================

#[test]
fn viewport_sets_container_to_tank_outline() {
    let (core, _) = make_core();
    assert_eq!(core.container, Rect::new(40.0, 40.0, 920.0, 420.0));
}

#[test]
fn invalid_dpr_falls_back_to_one() {
    let mut core = EngineCore::default();
    core.set_viewport(800.0, 600.0, f64::NAN);
    assert_eq!(core.dpr, 1.0);
    core.set_viewport(800.0, 600.0, 2.0);
    assert_eq!(core.dpr, 2.0);
}

#[test]
fn unmeasured_container_ignores_input() {
    let mut core = EngineCore::default();
    core.store.add_object(NewObject::new(ObjectKind::Rock, "rock", pt(10.0, 10.0)));
    assert!(core.on_pointer_down(P1, pt(0.0, 0.0), Button::Primary).is_empty());
    assert!(core.input.is_idle());
    assert!(core.selection().is_none());
}

// =============================================================
// Dragging
// =============================================================

#[test]
fn press_on_body_selects_and_starts_drag() {
    let (mut core, id) = make_core();
    let actions = core.on_pointer_down(P1, pt(164.0, 114.0), Button::Primary);
    assert_eq!(
        actions,
        vec![Action::SelectionChanged(Some(id)), Action::SetCursor("move".to_owned()), Action::RenderNeeded]
    );
    assert_eq!(core.input, Interaction::Dragging { id, pointer: P1, grab: pt(32.0, 32.0) });
    assert_eq!(core.selection(), Some(id));
}

#[test]
fn press_on_selected_object_keeps_selection_quiet() {
    let (mut core, id) = make_core();
    core.store.select_object(Some(id));
    let actions = core.on_pointer_down(P1, pt(164.0, 114.0), Button::Primary);
    assert!(!actions.iter().any(|a| matches!(a, Action::SelectionChanged(_))));
}

#[test]
fn drag_preserves_grab_offset() {
    let (mut core, id) = make_core();
    core.on_pointer_down(P1, pt(164.0, 114.0), Button::Primary);
    let actions = core.on_pointer_move(P1, pt(256.0, 156.0));
    let p = position(&core, &id);
    assert!(approx_eq(p.x, 20.0));
    assert!(approx_eq(p.y, 20.0));
    assert!(matches!(&actions[0], Action::ObjectUpdated { id: updated, patch } if *updated == id && patch.position.is_some()));
    assert_eq!(actions[1], Action::RenderNeeded);
}

#[test]
fn drag_clamps_to_bounds() {
    let (mut core, id) = make_core();
    core.on_pointer_down(P1, pt(164.0, 114.0), Button::Primary);

    core.on_pointer_move(P1, pt(5000.0, 5000.0));
    assert_eq!(position(&core, &id), pt(95.0, 95.0));

    core.on_pointer_move(P1, pt(-500.0, -500.0));
    assert_eq!(position(&core, &id), pt(0.0, 0.0));
}

#[test]
fn release_ends_gesture() {
    let (mut core, id) = make_core();
    core.on_pointer_down(P1, pt(164.0, 114.0), Button::Primary);
    core.on_pointer_move(P1, pt(256.0, 156.0));
    let actions = core.on_pointer_up(P1, pt(256.0, 156.0), Button::Primary);
    assert!(core.input.is_idle());
    // Still over the body, so the cursor is unchanged.
    assert_eq!(actions, vec![Action::RenderNeeded]);

    // Further moves no longer drag.
    core.on_pointer_move(P1, pt(600.0, 300.0));
    assert!(approx_eq(position(&core, &id).x, 20.0));
}

#[test]
fn object_removed_mid_drag_resets_gesture() {
    let (mut core, id) = make_core();
    core.on_pointer_down(P1, pt(164.0, 114.0), Button::Primary);
    core.store.remove_object(&id);
    assert_eq!(core.on_pointer_move(P1, pt(200.0, 200.0)), vec![Action::RenderNeeded]);
    assert!(core.input.is_idle());
}

// =============================================================
// Rotating
// =============================================================

#[test]
fn rotate_handle_turns_object() {
    let (mut core, id) = make_core();
    core.store.select_object(Some(id));
    // Handle sits 24 px above the top edge: (164, 58).
    core.on_pointer_down(P1, pt(164.0, 58.0), Button::Primary);
    assert_eq!(core.input.mode(), "rotate");
    assert_eq!(core.cursor(), "grab");

    // Quarter turn clockwise around the centre.
    core.on_pointer_move(P1, pt(220.0, 114.0));
    assert!(approx_eq(core.store.object(&id).unwrap().rotation, 90.0));
}

#[test]
fn rotation_normalizes_into_range() {
    let (mut core, id) = make_core();
    core.store.select_object(Some(id));
    core.on_pointer_down(P1, pt(164.0, 58.0), Button::Primary);
    // Pointing left: 180 - (-90) = 270, never negative.
    core.on_pointer_move(P1, pt(100.0, 114.0));
    assert!(approx_eq(core.store.object(&id).unwrap().rotation, 270.0));
    // Back past the start: -90 - (-90) - small = just under 360.
    core.on_pointer_move(P1, pt(163.0, 20.0));
    let rotation = core.store.object(&id).unwrap().rotation;
    assert!((0.0..360.0).contains(&rotation));
    assert!(rotation > 350.0);
}

// =============================================================
// Scaling
// =============================================================

#[test]
fn corner_handle_scales_by_distance_ratio() {
    let (mut core, id) = make_core();
    core.store.select_object(Some(id));
    // South-east corner.
    core.on_pointer_down(P1, pt(196.0, 146.0), Button::Primary);
    assert_eq!(core.input.mode(), "scale");
    assert_eq!(core.cursor(), "nwse-resize");

    core.on_pointer_move(P1, pt(228.0, 178.0));
    assert!(approx_eq(core.store.object(&id).unwrap().scale, 2.0));
}

#[test]
fn scale_clamps_to_config_range() {
    let (mut core, id) = make_core();
    core.store.select_object(Some(id));
    core.on_pointer_down(P1, pt(196.0, 146.0), Button::Primary);

    core.on_pointer_move(P1, pt(2000.0, 2000.0));
    assert_eq!(core.store.object(&id).unwrap().scale, 5.0);

    core.on_pointer_move(P1, pt(164.5, 114.5));
    assert_eq!(core.store.object(&id).unwrap().scale, 0.1);
}

// =============================================================
// Selection and guards
// =============================================================

#[test]
fn press_on_empty_tank_deselects() {
    let (mut core, id) = make_core();
    core.store.select_object(Some(id));
    let actions = core.on_pointer_down(P1, pt(800.0, 400.0), Button::Primary);
    assert_eq!(actions, vec![Action::SelectionChanged(None), Action::RenderNeeded]);
    assert!(core.selection().is_none());
    assert!(core.input.is_idle());
}

#[test]
fn press_outside_tank_keeps_selection() {
    let (mut core, id) = make_core();
    core.store.select_object(Some(id));
    assert!(core.on_pointer_down(P1, pt(10.0, 10.0), Button::Primary).is_empty());
    assert_eq!(core.selection(), Some(id));
}

#[test]
fn secondary_button_ignored() {
    let (mut core, _) = make_core();
    assert!(core.on_pointer_down(P1, pt(164.0, 114.0), Button::Secondary).is_empty());
    assert!(core.input.is_idle());
}

#[test]
fn second_pointer_cannot_hijack_gesture() {
    let (mut core, id) = make_core();
    core.on_pointer_down(P1, pt(164.0, 114.0), Button::Primary);
    assert!(core.on_pointer_down(P2, pt(600.0, 300.0), Button::Primary).is_empty());
    assert!(core.on_pointer_move(P2, pt(600.0, 300.0)).is_empty());
    assert!(core.on_pointer_up(P2, pt(600.0, 300.0), Button::Primary).is_empty());
    assert_eq!(position(&core, &id), pt(10.0, 10.0));
    assert_eq!(core.input.pointer(), Some(P1));
}

#[test]
fn hover_reports_cursor_changes_only() {
    let (mut core, _) = make_core();
    assert_eq!(core.on_pointer_move(P1, pt(164.0, 114.0)), vec![Action::SetCursor("move".to_owned())]);
    assert!(core.on_pointer_move(P1, pt(165.0, 115.0)).is_empty());
    assert_eq!(core.on_pointer_move(P1, pt(800.0, 400.0)), vec![Action::SetCursor("default".to_owned())]);
}

// =============================================================
// Scene helpers
// =============================================================

#[test]
fn water_level_synced_to_tank_and_store() {
    let (mut core, _) = make_core();
    assert_eq!(core.set_water_level(50.0), vec![Action::RenderNeeded]);
    assert_eq!(core.store.tank().water_level(), 50.0);
    assert_eq!(core.store.water().level, 50.0);

    core.set_water_level(140.0);
    assert_eq!(core.store.water().level, 100.0);
    assert!(core.set_water_level(f64::NAN).is_empty());
}

#[test]
fn direct_water_patch_keeps_tank_in_step() {
    let (mut core, _) = make_core();
    core.store.set_water(&WaterPatch { level: Some(30.0), ..WaterPatch::default() });
    assert_eq!(core.store.tank().water_level(), 30.0);
}

#[test]
fn library_objects_land_inside_placement_area() {
    let (mut core, _) = make_core();
    for _ in 0..20 {
        let id = core.add_library_object(ObjectKind::Plant, "fern");
        let obj = core.store.object(&id).unwrap();
        assert!((10.0..=90.0).contains(&obj.position.x));
        assert!((20.0..=80.0).contains(&obj.position.y));
        assert!((0.0..360.0).contains(&obj.rotation));
    }
}

#[test]
fn custom_object_needs_existing_asset() {
    let (mut core, _) = make_core();
    assert!(core.add_custom_object(&Uuid::new_v4()).is_none());

    let asset = core.store.add_custom_asset(NewCustomAsset {
        name: "lava rock".to_owned(),
        original_image: String::new(),
        processed_image: String::new(),
        thumbnail: String::new(),
        created_at: 0,
    });
    let id = core.add_custom_object(&asset).unwrap();
    let obj = core.store.object(&id).unwrap();
    assert_eq!(obj.kind, ObjectKind::Custom);
    assert_eq!(obj.name, "lava rock");
    assert_eq!(obj.custom_asset_id(), Some(asset));
    assert_eq!(obj.rotation, 0.0);
}
