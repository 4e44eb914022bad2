//! Per-table column widths and the drag gesture that resizes them.
//!
//! Widths live only in memory: a page starts from its defaults every time it
//! is constructed.

use std::collections::HashMap;

/// Width state of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnWidths {
    /// Column keys in display order with their default widths
    defaults: Vec<(&'static str, u16)>,
    /// Widths set by the operator
    overrides: HashMap<&'static str, u16>,
    /// Lower bound for any resized column
    min_width: u16,
}

impl ColumnWidths {
    pub fn new(defaults: &[(&'static str, u16)], min_width: u16) -> Self {
        Self { defaults: defaults.to_vec(), overrides: HashMap::new(), min_width: min_width.max(1) }
    }

    pub fn min_width(&self) -> u16 {
        self.min_width
    }

    /// Column keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.defaults.iter().map(|(key, _)| *key)
    }

    pub fn len(&self) -> usize {
        self.defaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty()
    }

    /// Current width of a column; unknown keys report the minimum.
    pub fn width(&self, key: &str) -> u16 {
        if let Some(width) = self.overrides.get(key) {
            return *width;
        }
        self.defaults.iter().find(|(k, _)| *k == key).map_or(self.min_width, |(_, w)| *w)
    }

    /// Widths in display order.
    pub fn widths(&self) -> Vec<u16> {
        self.keys().map(|key| self.width(key)).collect()
    }

    /// Sets a column width, clamped to the minimum. Unknown keys are ignored.
    pub fn set(&mut self, key: &str, width: u16) {
        if let Some((known, _)) = self.defaults.iter().find(|(k, _)| *k == key) {
            self.overrides.insert(known, width.max(self.min_width));
        }
    }

    /// Grows or shrinks a column by `delta` cells.
    pub fn adjust(&mut self, key: &str, delta: i32) {
        let next = (i32::from(self.width(key)) + delta).clamp(0, i32::from(u16::MAX));
        self.set(key, next as u16);
    }

    /// Index of the column whose right edge is at `x` (within `slop` cells).
    ///
    /// `origin` is the x coordinate of the first column and `spacing` the gap
    /// rendered between columns.
    pub fn boundary_at(&self, origin: u16, spacing: u16, x: u16, slop: u16) -> Option<&'static str> {
        let mut edge = origin;
        for (index, key) in self.keys().enumerate() {
            if index > 0 {
                edge = edge.saturating_add(spacing);
            }
            edge = edge.saturating_add(self.width(key));
            if x.abs_diff(edge) <= slop {
                return Some(key);
            }
        }
        None
    }
}

/// Captured origin of an in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragOrigin {
    key: &'static str,
    start_x: u16,
    start_width: u16,
}

/// Pointer-drag gesture over a column boundary.
///
/// `press` captures the origin, `drag` emits the new width, `release` ends the
/// gesture. Moves outside a gesture are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragHandle {
    origin: Option<DragOrigin>,
}

impl DragHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: &'static str, pointer_x: u16, current_width: u16) {
        self.origin = Some(DragOrigin { key, start_x: pointer_x, start_width: current_width });
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    /// Key of the column being resized.
    pub fn active_key(&self) -> Option<&'static str> {
        self.origin.map(|o| o.key)
    }

    /// Computes `max(min_width, start_width + dx)` and applies it to the dragged column.
    pub fn drag(&self, pointer_x: u16, widths: &mut ColumnWidths) -> Option<(&'static str, u16)> {
        let origin = self.origin?;
        let delta = i32::from(pointer_x) - i32::from(origin.start_x);
        let width = (i32::from(origin.start_width) + delta).clamp(0, i32::from(u16::MAX)) as u16;
        let width = width.max(widths.min_width());
        widths.set(origin.key, width);
        Some((origin.key, width))
    }

    /// Ends the gesture.
    pub fn release(&mut self) {
        self.origin = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths() -> ColumnWidths {
        ColumnWidths::new(&[("id", 8), ("title", 30), ("status", 12)], 6)
    }

    #[test]
    fn test_defaults_and_overrides() {
        let mut w = widths();
        assert_eq!(w.widths(), vec![8, 30, 12]);
        w.set("title", 40);
        assert_eq!(w.width("title"), 40);
        w.set("status", 2);
        assert_eq!(w.width("status"), 6);
        w.set("unknown", 50);
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn test_drag_applies_delta_to_one_column() {
        let mut w = widths();
        let mut handle = DragHandle::new();
        handle.press("title", 40, w.width("title"));

        assert_eq!(handle.drag(45, &mut w), Some(("title", 35)));
        assert_eq!(handle.drag(20, &mut w), Some(("title", 10)));
        assert_eq!(w.width("id"), 8);
        assert_eq!(w.width("status"), 12);
    }

    #[test]
    fn test_drag_clamps_to_minimum() {
        let mut w = widths();
        let mut handle = DragHandle::new();
        handle.press("id", 10, w.width("id"));
        assert_eq!(handle.drag(0, &mut w), Some(("id", 6)));
    }

    #[test]
    fn test_release_detaches() {
        let mut w = widths();
        let mut handle = DragHandle::new();
        handle.press("id", 10, 8);
        handle.release();
        assert!(!handle.is_active());
        assert_eq!(handle.drag(30, &mut w), None);
        assert_eq!(w.width("id"), 8);
    }

    #[test]
    fn test_boundary_hit_testing() {
        let w = widths();
        // id ends at 8, title at 8 + 1 + 30 = 39, status at 39 + 1 + 12 = 52
        assert_eq!(w.boundary_at(0, 1, 8, 0), Some("id"));
        assert_eq!(w.boundary_at(0, 1, 40, 1), Some("title"));
        assert_eq!(w.boundary_at(0, 1, 52, 0), Some("status"));
        assert_eq!(w.boundary_at(0, 1, 20, 1), None);
    }

    #[test]
    fn test_adjust() {
        let mut w = widths();
        w.adjust("title", -5);
        assert_eq!(w.width("title"), 25);
        w.adjust("title", -100);
        assert_eq!(w.width("title"), 6);
    }
}
