#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{NewObject, ObjectKind, ObjectPatch};

const W: f64 = 1000.0;
const H: f64 = 500.0;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Object anchored at container pixel (100, 50): center (132, 82), half 32.
fn make_store_with_object() -> (SceneStore, ObjectId) {
    let mut store = SceneStore::default();
    let id = store.add_object(NewObject::new(ObjectKind::Rock, "rock", pt(10.0, 10.0)));
    (store, id)
}

// =============================================================
// ObjectFrame
// =============================================================

#[test]
fn frame_center_and_anchor() {
    let (store, id) = make_store_with_object();
    let frame = ObjectFrame::of(store.object(&id).unwrap(), W, H);
    assert_eq!(frame.center, pt(132.0, 82.0));
    assert_eq!(frame.half, 32.0);
    assert_eq!(frame.anchor(), pt(100.0, 50.0));
}

#[test]
fn frame_scales_about_center() {
    let (mut store, id) = make_store_with_object();
    store.update_object(&id, &ObjectPatch::scale(2.0));
    let frame = ObjectFrame::of(store.object(&id).unwrap(), W, H);
    assert_eq!(frame.center, pt(132.0, 82.0));
    assert_eq!(frame.corner(Corner::Nw), pt(68.0, 18.0));
    assert_eq!(frame.anchor(), pt(100.0, 50.0));
}

#[test]
fn frame_contains_respects_rotation() {
    let frame = ObjectFrame { center: pt(0.0, 0.0), half: 10.0, rotation: 45.0 };
    // Axis-aligned corner region is outside once rotated by 45 degrees.
    assert!(!frame.contains(pt(9.5, 9.5)));
    assert!(frame.contains(pt(13.0, 0.0)));
    assert!(frame.contains(pt(0.0, 0.0)));
}

#[test]
fn rotate_handle_follows_rotation() {
    let frame = ObjectFrame { center: pt(0.0, 0.0), half: 10.0, rotation: 90.0 };
    let handle = frame.rotate_handle();
    // Unrotated handle is straight up; a 90 degree clockwise turn points it right.
    assert!(approx_eq(handle.x, 10.0 + ROTATE_HANDLE_OFFSET_PX));
    assert!(approx_eq(handle.y, 0.0));
}

#[test]
fn corners_clockwise_from_top_left() {
    let frame = ObjectFrame { center: pt(0.0, 0.0), half: 1.0, rotation: 0.0 };
    assert_eq!(frame.corners(), [pt(-1.0, -1.0), pt(1.0, -1.0), pt(1.0, 1.0), pt(-1.0, 1.0)]);
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn hit_body() {
    let (store, id) = make_store_with_object();
    let hit = hit_test(pt(132.0, 82.0), &store, W, H).unwrap();
    assert_eq!(hit, Hit { object_id: id, part: HitPart::Body });
}

#[test]
fn miss_returns_none() {
    let (store, _) = make_store_with_object();
    assert!(hit_test(pt(600.0, 400.0), &store, W, H).is_none());
}

#[test]
fn handles_only_on_selected() {
    let (mut store, id) = make_store_with_object();
    let nw = pt(100.0, 50.0);
    assert_eq!(hit_test(nw, &store, W, H).map(|h| h.part), Some(HitPart::Body));
    store.select_object(Some(id));
    assert_eq!(hit_test(nw, &store, W, H).map(|h| h.part), Some(HitPart::ScaleHandle(Corner::Nw)));
}

#[test]
fn rotate_handle_hit_outside_body() {
    let (mut store, id) = make_store_with_object();
    store.select_object(Some(id));
    let handle = pt(132.0, 50.0 - ROTATE_HANDLE_OFFSET_PX);
    let hit = hit_test(handle, &store, W, H).unwrap();
    assert_eq!(hit.part, HitPart::RotateHandle);
    store.select_object(None);
    assert!(hit_test(handle, &store, W, H).is_none());
}

#[test]
fn topmost_body_wins() {
    let (mut store, bottom) = make_store_with_object();
    let top = store.add_object(NewObject::new(ObjectKind::Plant, "plant", pt(10.0, 10.0)));
    assert_eq!(hit_test(pt(132.0, 82.0), &store, W, H).unwrap().object_id, top);
    store.bring_to_front(&bottom);
    assert_eq!(hit_test(pt(132.0, 82.0), &store, W, H).unwrap().object_id, bottom);
}

// =============================================================
// Cursors
// =============================================================

#[test]
fn cursor_hints() {
    assert_eq!(HitPart::Body.cursor(), "move");
    assert_eq!(HitPart::RotateHandle.cursor(), "grab");
    assert_eq!(HitPart::ScaleHandle(Corner::Se).cursor(), "nwse-resize");
    assert_eq!(HitPart::ScaleHandle(Corner::Ne).cursor(), "nesw-resize");
}
