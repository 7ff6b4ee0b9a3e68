//! Z-order resolution.
//!
//! Pure functions over a snapshot of `(id, z_index, seq)` entries. Each returns
//! the z-index assignments to apply; the store applies them atomically. Only
//! relative order matters, so values may go negative or leave gaps. When an
//! extreme would overflow `i64`, the whole stack is renumbered from 1. Objects
//! with equal z-index draw in insertion order (`seq`).

#[cfg(test)]
#[path = "layer_test.rs"]
mod layer_test;

use crate::doc::ObjectId;

/// One object's stacking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZEntry {
    pub id: ObjectId,
    pub z_index: i64,
    /// Insertion sequence, used to break ties.
    pub seq: u64,
}

/// Z-index for a newly added object: one above the current top, or 1 when empty.
#[must_use]
pub fn next_z(entries: &[ZEntry]) -> i64 {
    entries.iter().map(|e| e.z_index).max().map_or(1, |z| z.saturating_add(1))
}

/// Draw-order comparison key.
#[must_use]
pub fn draw_key(entry: &ZEntry) -> (i64, u64) {
    (entry.z_index, entry.seq)
}

/// Move `id` above every object.
#[must_use]
pub fn bring_to_front(entries: &[ZEntry], id: ObjectId) -> Vec<(ObjectId, i64)> {
    if !entries.iter().any(|e| e.id == id) {
        return Vec::new();
    }
    let max = entries.iter().map(|e| e.z_index).max().unwrap_or_default();
    match max.checked_add(1) {
        Some(z) => vec![(id, z)],
        None => compact(entries, id, true),
    }
}

/// Move `id` below every object.
#[must_use]
pub fn send_to_back(entries: &[ZEntry], id: ObjectId) -> Vec<(ObjectId, i64)> {
    if !entries.iter().any(|e| e.id == id) {
        return Vec::new();
    }
    let min = entries.iter().map(|e| e.z_index).min().unwrap_or_default();
    match min.checked_sub(1) {
        Some(z) => vec![(id, z)],
        None => compact(entries, id, false),
    }
}

/// Swap `id` with the nearest object strictly above it. Empty if already frontmost.
#[must_use]
pub fn bring_forward(entries: &[ZEntry], id: ObjectId) -> Vec<(ObjectId, i64)> {
    let Some(target) = entries.iter().find(|e| e.id == id) else {
        return Vec::new();
    };
    let above = entries
        .iter()
        .filter(|e| e.z_index > target.z_index)
        .min_by_key(|e| draw_key(e));
    match above {
        Some(next) => vec![(target.id, next.z_index), (next.id, target.z_index)],
        None => Vec::new(),
    }
}

/// Swap `id` with the nearest object strictly below it. Empty if already backmost.
#[must_use]
pub fn send_backward(entries: &[ZEntry], id: ObjectId) -> Vec<(ObjectId, i64)> {
    let Some(target) = entries.iter().find(|e| e.id == id) else {
        return Vec::new();
    };
    let below = entries
        .iter()
        .filter(|e| e.z_index < target.z_index)
        .max_by_key(|e| draw_key(e));
    match below {
        Some(prev) => vec![(target.id, prev.z_index), (prev.id, target.z_index)],
        None => Vec::new(),
    }
}

/// Renumber every entry to `1..=n` in draw order, with `id` moved to the
/// front or back. Used when the next extreme would overflow.
fn compact(entries: &[ZEntry], id: ObjectId, front: bool) -> Vec<(ObjectId, i64)> {
    let mut rest: Vec<&ZEntry> = entries.iter().filter(|e| e.id != id).collect();
    rest.sort_by_key(|e| draw_key(e));
    let rest = rest.into_iter().map(|e| e.id);
    let order: Vec<ObjectId> = if front {
        rest.chain(std::iter::once(id)).collect()
    } else {
        std::iter::once(id).chain(rest).collect()
    };
    order.into_iter().zip(1_i64..).collect()
}
