use uuid::Uuid;

use super::*;

#[test]
fn default_is_idle() {
    let state = Interaction::default();
    assert!(state.is_idle());
    assert_eq!(state.pointer(), None);
    assert_eq!(state.object_id(), None);
    assert_eq!(state.mode(), "idle");
}

#[test]
fn dragging_reports_pointer_and_object() {
    let id = Uuid::new_v4();
    let state = Interaction::Dragging { id, pointer: PointerId(3), grab: Point::new(4.0, 5.0) };
    assert!(!state.is_idle());
    assert_eq!(state.pointer(), Some(PointerId(3)));
    assert_eq!(state.object_id(), Some(id));
    assert_eq!(state.mode(), "drag");
}

#[test]
fn rotating_and_scaling_modes() {
    let id = Uuid::new_v4();
    let rotating = Interaction::Rotating {
        id,
        pointer: PointerId(1),
        center: Point::default(),
        initial_rotation: 10.0,
        initial_angle: -90.0,
    };
    let scaling = Interaction::Scaling {
        id,
        pointer: PointerId(2),
        center: Point::default(),
        initial_scale: 1.0,
        initial_distance: 40.0,
    };
    assert_eq!(rotating.mode(), "rotate");
    assert_eq!(scaling.mode(), "scale");
    assert_eq!(scaling.pointer(), Some(PointerId(2)));
}

#[test]
fn button_equality() {
    assert_eq!(Button::Primary, Button::Primary);
    assert_ne!(Button::Primary, Button::Secondary);
    assert_ne!(Button::Middle, Button::Secondary);
}
