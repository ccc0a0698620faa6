//! Layout Engine
//!
//! Validates a proposed move, attempts direct placement, and falls back to
//! single-level cascading displacement of blocking widgets. A move either
//! resolves fully or not at all; the caller keeps its layout on failure.

use crate::grid::{find_overlapping, GridPosition, GridRect, GridSpec};
use crate::layout::Widget;

#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine {
    pub spec: GridSpec,
}

impl LayoutEngine {
    pub fn new(spec: GridSpec) -> Self {
        Self { spec }
    }

    /// Move `active_id` to `new_pos`, relocating any blocking widgets to
    /// their first free row-major slot.
    ///
    /// Displaced widgets are resolved in the order they were found, each
    /// against the already-updated set, so cascading relocations cannot
    /// collide with each other. Returns `None` when the target is out of
    /// bounds, the widget is unknown or hidden, or any displaced widget has
    /// no free slot left; the input slice is never mutated.
    pub fn relocate_widgets(
        &self,
        widgets: &[Widget],
        active_id: &str,
        new_pos: GridPosition,
    ) -> Option<Vec<Widget>> {
        let active = widgets.iter().find(|w| w.id == active_id && w.visible)?;
        let target = GridRect::new(new_pos, active.size);
        if !self.spec.contains(&target) {
            return None;
        }

        let displaced_ids: Vec<String> = find_overlapping(widgets, &target, Some(active_id))
            .into_iter()
            .map(|w| w.id.clone())
            .collect();

        let mut updated = widgets.to_vec();
        set_position(&mut updated, active_id, new_pos);

        if displaced_ids.is_empty() {
            return Some(updated);
        }

        for id in &displaced_ids {
            let size = updated.iter().find(|w| &w.id == id)?.size;
            let slot = self
                .spec
                .first_available_position(&updated, size, &[id.as_str()])?;
            set_position(&mut updated, id, slot);
        }

        Some(updated)
    }
}

fn set_position(widgets: &mut [Widget], id: &str, position: GridPosition) {
    if let Some(w) = widgets.iter_mut().find(|w| w.id == id) {
        w.position = position;
    }
}
