//! Object footprints and hit-testing.
//!
//! Every object occupies a square footprint of `ITEM_BASE_SIZE_PX` whose
//! top-left corner sits at the object's percent position. The footprint is
//! scaled and rotated about its centre. All coordinates here are container
//! pixels (relative to the tank container's top-left corner).

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{HANDLE_RADIUS_PX, ITEM_BASE_SIZE_PX, ROTATE_HANDLE_OFFSET_PX};
use crate::doc::{ObjectId, SceneObject};
use crate::geom::{Point, distance, percent_to_local};
use crate::store::SceneStore;

/// Which part of an object was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    RotateHandle,
    ScaleHandle(Corner),
}

impl HitPart {
    /// CSS cursor shown while hovering this part.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Body => "move",
            Self::RotateHandle => "grab",
            Self::ScaleHandle(Corner::Nw | Corner::Se) => "nwse-resize",
            Self::ScaleHandle(Corner::Ne | Corner::Sw) => "nesw-resize",
        }
    }
}

/// Footprint corner carrying a scale handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Nw,
    Ne,
    Se,
    Sw,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Self::Nw, Self::Ne, Self::Se, Self::Sw];
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub object_id: ObjectId,
    pub part: HitPart,
}

/// Cursor for the empty tank area.
pub const DEFAULT_CURSOR: &str = "default";

/// An object's on-screen footprint in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectFrame {
    pub center: Point,
    /// Half the scaled side length.
    pub half: f64,
    /// Clockwise degrees.
    pub rotation: f64,
}

impl ObjectFrame {
    /// Footprint of `obj` inside a container of the given pixel size.
    #[must_use]
    pub fn of(obj: &SceneObject, width: f64, height: f64) -> Self {
        let base_half = ITEM_BASE_SIZE_PX * 0.5;
        let anchor = percent_to_local(obj.position, width, height);
        Self { center: anchor.offset(base_half, base_half), half: base_half * obj.scale, rotation: obj.rotation }
    }

    /// Top-left of the unscaled footprint, the point the percent position names.
    #[must_use]
    pub fn anchor(&self) -> Point {
        let base_half = ITEM_BASE_SIZE_PX * 0.5;
        self.center.offset(-base_half, -base_half)
    }

    /// Whether `p` lies inside the rotated footprint.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let local = p.rotate_around(self.center, -self.rotation).sub(self.center);
        local.x.abs() <= self.half && local.y.abs() <= self.half
    }

    /// Rotated corner position.
    #[must_use]
    pub fn corner(&self, corner: Corner) -> Point {
        let (sx, sy) = match corner {
            Corner::Nw => (-1.0, -1.0),
            Corner::Ne => (1.0, -1.0),
            Corner::Se => (1.0, 1.0),
            Corner::Sw => (-1.0, 1.0),
        };
        self.center.offset(sx * self.half, sy * self.half).rotate_around(self.center, self.rotation)
    }

    /// Rotated corners, clockwise from the top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        Corner::ALL.map(|c| self.corner(c))
    }

    /// Rotate handle: above the top edge's midpoint, following the rotation.
    #[must_use]
    pub fn rotate_handle(&self) -> Point {
        self.center
            .offset(0.0, -(self.half + ROTATE_HANDLE_OFFSET_PX))
            .rotate_around(self.center, self.rotation)
    }

    /// Top edge midpoint, where the rotate handle's stem starts.
    #[must_use]
    pub fn top_mid(&self) -> Point {
        self.center.offset(0.0, -self.half).rotate_around(self.center, self.rotation)
    }
}

/// Which object (if any) is under `p`, checking the selected object's handles first,
/// then bodies from the top of the stack down.
#[must_use]
pub fn hit_test(p: Point, store: &SceneStore, width: f64, height: f64) -> Option<Hit> {
    if let Some(selected) = store.selected_object() {
        let frame = ObjectFrame::of(selected, width, height);
        if distance(p, frame.rotate_handle()) <= HANDLE_RADIUS_PX {
            return Some(Hit { object_id: selected.id, part: HitPart::RotateHandle });
        }
        for corner in Corner::ALL {
            if distance(p, frame.corner(corner)) <= HANDLE_RADIUS_PX {
                return Some(Hit { object_id: selected.id, part: HitPart::ScaleHandle(corner) });
            }
        }
    }

    store
        .sorted_objects()
        .into_iter()
        .rev()
        .find(|obj| ObjectFrame::of(obj, width, height).contains(p))
        .map(|obj| Hit { object_id: obj.id, part: HitPart::Body })
}
