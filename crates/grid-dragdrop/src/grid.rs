//! Grid Geometry
//!
//! Pure rectangle predicates over a snapshot of widgets.
//! Placement decisions use the rect predicates directly (O(widgets));
//! the occupation map exists only for visual feedback.

use serde::{Deserialize, Serialize};

use crate::layout::Widget;

/// Grid dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub cols: i32,
    pub rows: i32,
}

/// Widget footprint in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSize {
    pub width: i32,
    pub height: i32,
}

/// Top-left cell of a placed widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

/// Axis-aligned cell rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl GridRect {
    pub fn new(position: GridPosition, size: WidgetSize) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }

    /// Open-interval overlap: rectangles that only touch edges do not collide
    pub fn overlaps(&self, other: &GridRect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

impl GridSpec {
    /// Standard dashboard grid
    pub const DASHBOARD: GridSpec = GridSpec { cols: 10, rows: 8 };

    pub fn new(cols: i32, rows: i32) -> Self {
        Self { cols, rows }
    }

    /// Whether a rect lies fully inside `[0, cols) x [0, rows)`.
    /// Degenerate sizes never fit.
    pub fn contains(&self, rect: &GridRect) -> bool {
        rect.width >= 1
            && rect.height >= 1
            && rect.x >= 0
            && rect.y >= 0
            && rect.x + rect.width <= self.cols
            && rect.y + rect.height <= self.rows
    }

    /// A rect is valid when it is in bounds and overlaps no visible widget
    /// other than `exclude_id`
    pub fn is_valid_position(
        &self,
        widgets: &[Widget],
        rect: &GridRect,
        exclude_id: Option<&str>,
    ) -> bool {
        self.contains(rect) && find_overlapping(widgets, rect, exclude_id).is_empty()
    }

    /// Row-major scan (y outer, x inner, both from 0) for the first cell
    /// where `size` fits without overlapping any widget outside
    /// `exclude_ids`. The scan order is a deterministic tie-break.
    pub fn first_available_position(
        &self,
        widgets: &[Widget],
        size: WidgetSize,
        exclude_ids: &[&str],
    ) -> Option<GridPosition> {
        if size.width < 1 || size.height < 1 || size.width > self.cols || size.height > self.rows {
            return None;
        }
        for y in 0..=(self.rows - size.height) {
            for x in 0..=(self.cols - size.width) {
                let rect = GridRect { x, y, width: size.width, height: size.height };
                let blocked = widgets.iter().any(|w| {
                    w.visible
                        && !exclude_ids.contains(&w.id.as_str())
                        && w.rect().overlaps(&rect)
                });
                if !blocked {
                    return Some(GridPosition { x, y });
                }
            }
        }
        None
    }

    /// `rows x cols` boolean map of cells covered by visible widgets other
    /// than `exclude_id`. Visual feedback only.
    pub fn occupation_map(&self, widgets: &[Widget], exclude_id: Option<&str>) -> Vec<Vec<bool>> {
        let mut map = vec![vec![false; self.cols as usize]; self.rows as usize];
        for w in widgets {
            if !w.visible || Some(w.id.as_str()) == exclude_id {
                continue;
            }
            for y in w.position.y..w.position.y + w.size.height {
                for x in w.position.x..w.position.x + w.size.width {
                    if y >= 0 && y < self.rows && x >= 0 && x < self.cols {
                        map[y as usize][x as usize] = true;
                    }
                }
            }
        }
        map
    }
}

/// All visible widgets (other than `exclude_id`) whose rect overlaps `rect`,
/// in snapshot order. Shares the overlap predicate with `is_valid_position`.
pub fn find_overlapping<'a>(
    widgets: &'a [Widget],
    rect: &GridRect,
    exclude_id: Option<&str>,
) -> Vec<&'a Widget> {
    widgets
        .iter()
        .filter(|w| w.visible && Some(w.id.as_str()) != exclude_id && w.rect().overlaps(rect))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(id: &str, x: i32, y: i32, w: i32, h: i32) -> Widget {
        Widget::new(id, WidgetSize { width: w, height: h }, GridPosition { x, y })
    }

    #[test]
    fn test_overlap_and_edge_touch() {
        let a = GridRect { x: 0, y: 0, width: 2, height: 2 };
        let b = GridRect { x: 1, y: 1, width: 2, height: 2 };
        let c = GridRect { x: 2, y: 0, width: 2, height: 2 };
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // touching edges is not overlap
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_valid_position_bounds() {
        let spec = GridSpec::DASHBOARD;
        let widgets = vec![];
        assert!(spec.is_valid_position(
            &widgets,
            &GridRect { x: 8, y: 6, width: 2, height: 2 },
            None
        ));
        assert!(!spec.is_valid_position(
            &widgets,
            &GridRect { x: 9, y: 0, width: 2, height: 1 },
            None
        ));
        assert!(!spec.is_valid_position(
            &widgets,
            &GridRect { x: -1, y: 0, width: 1, height: 1 },
            None
        ));
        assert!(!spec.is_valid_position(
            &widgets,
            &GridRect { x: 0, y: 0, width: 0, height: 1 },
            None
        ));
    }

    #[test]
    fn test_valid_position_excludes_self() {
        let spec = GridSpec::DASHBOARD;
        let widgets = vec![widget("a", 0, 0, 2, 2)];
        let rect = GridRect { x: 1, y: 1, width: 2, height: 2 };
        assert!(!spec.is_valid_position(&widgets, &rect, None));
        assert!(spec.is_valid_position(&widgets, &rect, Some("a")));
    }

    #[test]
    fn test_hidden_widgets_ignored() {
        let spec = GridSpec::DASHBOARD;
        let mut hidden = widget("a", 0, 0, 2, 2);
        hidden.visible = false;
        let widgets = vec![hidden];
        let rect = GridRect { x: 0, y: 0, width: 2, height: 2 };
        assert!(spec.is_valid_position(&widgets, &rect, None));
        assert!(find_overlapping(&widgets, &rect, None).is_empty());
    }

    #[test]
    fn test_first_available_after_corner_widget() {
        // widget at (0,0) 2x2 -> first free 2x2 slot scanning row-major is (2,0)
        let spec = GridSpec::DASHBOARD;
        let widgets = vec![widget("a", 0, 0, 2, 2)];
        let pos = spec.first_available_position(
            &widgets,
            WidgetSize { width: 2, height: 2 },
            &[],
        );
        assert_eq!(pos, Some(GridPosition { x: 2, y: 0 }));
    }

    #[test]
    fn test_first_available_is_deterministic() {
        let spec = GridSpec::new(4, 3);
        let widgets = vec![widget("a", 0, 0, 2, 1), widget("b", 2, 0, 2, 1)];
        let size = WidgetSize { width: 3, height: 1 };
        let first = spec.first_available_position(&widgets, size, &[]);
        let second = spec.first_available_position(&widgets, size, &[]);
        assert_eq!(first, Some(GridPosition { x: 0, y: 1 }));
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_available_none_when_full() {
        let spec = GridSpec::new(2, 2);
        let widgets = vec![widget("a", 0, 0, 2, 2)];
        let pos = spec.first_available_position(&widgets, WidgetSize { width: 1, height: 1 }, &[]);
        assert_eq!(pos, None);
    }

    #[test]
    fn test_occupation_map_marks_covered_cells() {
        let spec = GridSpec::new(3, 2);
        let widgets = vec![widget("a", 1, 0, 2, 1)];
        let map = spec.occupation_map(&widgets, None);
        assert_eq!(map[0], vec![false, true, true]);
        assert_eq!(map[1], vec![false, false, false]);
        let cleared = spec.occupation_map(&widgets, Some("a"));
        assert_eq!(cleared[0], vec![false, false, false]);
    }
}
