//! Drag-mode classification at drag start.

use std::collections::BTreeSet;

use tracing::debug;

use super::cursor::CursorPosition;

/// File-tree item identifier.
pub type ItemId = String;

/// What a drag manipulates. Fixed for the whole drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragMode {
    /// Marquee selection in empty space.
    AreaSelection,
    /// Moving file or folder items from the views.
    ItemMove,
    /// Moving one entry out of the clipboard.
    ClipboardItemMove,
}

impl DragMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AreaSelection => "area-selection",
            Self::ItemMove => "item-move",
            Self::ClipboardItemMove => "clipboard-item-move",
        }
    }
}

/// A drag in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct DragContext {
    pub start_position: CursorPosition,
    pub mode: DragMode,
    /// Items carried by the drag; empty for area selection.
    pub moved_items: BTreeSet<ItemId>,
}

/// Positional queries answered by the host UI. Pure, no side effects.
pub trait HitTest {
    /// File or folder item (file view or folder tree) at a screen point.
    fn item_at(&self, x: f32, y: f32) -> Option<ItemId>;
    /// Clipboard entry at a screen point.
    fn clipboard_item_at(&self, x: f32, y: f32) -> Option<ItemId>;
}

/// Decide the drag mode and carried items for a drag starting at `start`.
///
/// An item under the cursor wins, carrying the whole selection when it is
/// part of it. A clipboard entry comes next and carries only itself.
/// Otherwise the drag is an area selection.
pub fn classify_drag(
    start: CursorPosition,
    hit: &dyn HitTest,
    selection: &BTreeSet<ItemId>,
) -> DragContext {
    let (mode, moved_items) = if let Some(item) = hit.item_at(start.x, start.y) {
        let items = if selection.contains(&item) {
            selection.clone()
        } else {
            BTreeSet::from([item])
        };
        (DragMode::ItemMove, items)
    } else if let Some(entry) = hit.clipboard_item_at(start.x, start.y) {
        (DragMode::ClipboardItemMove, BTreeSet::from([entry]))
    } else {
        (DragMode::AreaSelection, BTreeSet::new())
    };
    debug!(
        "drag classified as {} at ({:.0}, {:.0}) carrying {} item(s)",
        mode.as_str(),
        start.x,
        start.y,
        moved_items.len()
    );
    DragContext {
        start_position: start,
        mode,
        moved_items,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Hit test over fixed rectangles `(x0, y0, x1, y1, id)`.
    #[derive(Default)]
    pub struct FixedHits {
        pub items: Vec<(f32, f32, f32, f32, &'static str)>,
        pub clipboard: Vec<(f32, f32, f32, f32, &'static str)>,
    }

    fn find(rects: &[(f32, f32, f32, f32, &'static str)], x: f32, y: f32) -> Option<ItemId> {
        rects
            .iter()
            .find(|(x0, y0, x1, y1, _)| x >= *x0 && x <= *x1 && y >= *y0 && y <= *y1)
            .map(|r| r.4.to_string())
    }

    impl HitTest for FixedHits {
        fn item_at(&self, x: f32, y: f32) -> Option<ItemId> {
            find(&self.items, x, y)
        }
        fn clipboard_item_at(&self, x: f32, y: f32) -> Option<ItemId> {
            find(&self.clipboard, x, y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::FixedHits;
    use super::*;

    fn hits() -> FixedHits {
        FixedHits {
            items: vec![
                (0.0, 0.0, 100.0, 100.0, "a.txt"),
                (200.0, 0.0, 300.0, 100.0, "b.txt"),
            ],
            clipboard: vec![(500.0, 0.0, 600.0, 40.0, "c.txt")],
        }
    }

    #[test]
    fn test_item_not_selected_moves_alone() {
        let selection = BTreeSet::from(["b.txt".to_string()]);
        let ctx = classify_drag(CursorPosition::new(50.0, 50.0), &hits(), &selection);
        assert_eq!(ctx.mode, DragMode::ItemMove);
        assert_eq!(ctx.moved_items, BTreeSet::from(["a.txt".to_string()]));
    }

    #[test]
    fn test_selected_item_carries_selection() {
        let selection = BTreeSet::from(["a.txt".to_string(), "b.txt".to_string()]);
        let ctx = classify_drag(CursorPosition::new(250.0, 50.0), &hits(), &selection);
        assert_eq!(ctx.mode, DragMode::ItemMove);
        assert_eq!(ctx.moved_items, selection);
    }

    #[test]
    fn test_clipboard_entry() {
        let ctx = classify_drag(CursorPosition::new(550.0, 20.0), &hits(), &BTreeSet::new());
        assert_eq!(ctx.mode, DragMode::ClipboardItemMove);
        assert_eq!(ctx.moved_items, BTreeSet::from(["c.txt".to_string()]));
    }

    #[test]
    fn test_item_beats_clipboard() {
        let mut h = hits();
        h.clipboard.push((0.0, 0.0, 100.0, 100.0, "c.txt"));
        let ctx = classify_drag(CursorPosition::new(10.0, 10.0), &h, &BTreeSet::new());
        assert_eq!(ctx.mode, DragMode::ItemMove);
    }

    #[test]
    fn test_empty_space_is_area_selection() {
        let ctx = classify_drag(CursorPosition::new(150.0, 300.0), &hits(), &BTreeSet::new());
        assert_eq!(ctx.mode, DragMode::AreaSelection);
        assert!(ctx.moved_items.is_empty());
    }

    #[test]
    fn test_drag_mode_as_str() {
        assert_eq!(DragMode::AreaSelection.as_str(), "area-selection");
        assert_eq!(DragMode::ItemMove.as_str(), "item-move");
        assert_eq!(DragMode::ClipboardItemMove.as_str(), "clipboard-item-move");
    }
}
