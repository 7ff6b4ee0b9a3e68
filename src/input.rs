//! Input model: pointer identity, buttons, and the transform state machine.
//!
//! `Interaction` is the gesture in progress between pointer-down and
//! pointer-up. Each active variant carries the snapshot captured at press
//! time, so every pointer-move computes the new transform from that snapshot
//! and the current pointer alone.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ObjectId;
use crate::geom::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Browser pointer id. Only the pointer that started a gesture may drive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub i32);

/// The active transform gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Moving an object's anchor.
    Dragging {
        id: ObjectId,
        pointer: PointerId,
        /// Pointer offset from the object's anchor, in container pixels.
        grab: Point,
    },
    /// Turning an object about its centre.
    Rotating {
        id: ObjectId,
        pointer: PointerId,
        /// Object centre in screen space; the rotation pivot.
        center: Point,
        /// Object rotation at press time, degrees.
        initial_rotation: f64,
        /// Pointer angle around `center` at press time, degrees.
        initial_angle: f64,
    },
    /// Resizing an object uniformly about its centre.
    Scaling {
        id: ObjectId,
        pointer: PointerId,
        /// Object centre in screen space.
        center: Point,
        /// Object scale at press time.
        initial_scale: f64,
        /// Pointer distance from `center` at press time. Always positive.
        initial_distance: f64,
    },
}

impl Interaction {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The pointer driving the gesture, if any.
    #[must_use]
    pub fn pointer(&self) -> Option<PointerId> {
        match self {
            Self::Idle => None,
            Self::Dragging { pointer, .. } | Self::Rotating { pointer, .. } | Self::Scaling { pointer, .. } => {
                Some(*pointer)
            }
        }
    }

    /// The object being transformed, if any.
    #[must_use]
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Rotating { id, .. } | Self::Scaling { id, .. } => Some(*id),
        }
    }

    /// Short label for logs.
    #[must_use]
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging { .. } => "drag",
            Self::Rotating { .. } => "rotate",
            Self::Scaling { .. } => "scale",
        }
    }
}
