//! Screen geometry of the three panels and their elements.
//!
//! Folder tree on the left, file grid in the middle, clipboard on the
//! right. Rebuilt from explorer state whenever that state changes, and
//! used to answer hit tests.

use std::collections::BTreeSet;

use tracing::trace;

use super::fs::{FileTree, ItemKind};
use crate::gesture::{CursorPosition, HitTest, ItemId};

// ── Geometry ───────────────────────────────────────────────

/// Axis-aligned rectangle in screen pixels. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle spanned by two corners in any order.
    pub fn from_corners(a: &CursorPosition, b: &CursorPosition) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        Self::new(min_x, min_y, a.x.max(b.x) - min_x, a.y.max(b.y) - min_y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    fn sexp(&self) -> String {
        format!(
            "(:x {:.0} :y {:.0} :width {:.0} :height {:.0})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Which panel an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    FolderTree,
    FileView,
    Clipboard,
}

impl Surface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FolderTree => "folder-tree",
            Self::FileView => "file-view",
            Self::Clipboard => "clipboard",
        }
    }
}

/// One hit-testable element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ItemId,
    pub surface: Surface,
    pub rect: Rect,
    /// Nesting depth (folder tree only).
    pub depth: usize,
}

// ── Config ─────────────────────────────────────────────────

/// Panel and element dimensions in pixels.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Width of the folder tree panel.
    pub tree_width: f32,
    /// Width of the clipboard panel.
    pub clipboard_width: f32,
    /// Inner padding of every panel.
    pub padding: f32,
    /// Space reserved for a panel title.
    pub header_height: f32,
    pub tree_row_height: f32,
    /// Horizontal offset per tree level.
    pub tree_indent: f32,
    pub cell_width: f32,
    pub cell_height: f32,
    pub cell_gap: f32,
    pub clipboard_row_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            screen_width: 1920.0,
            screen_height: 1080.0,
            tree_width: 300.0,
            clipboard_width: 300.0,
            padding: 16.0,
            header_height: 40.0,
            tree_row_height: 36.0,
            tree_indent: 20.0,
            cell_width: 200.0,
            cell_height: 120.0,
            cell_gap: 16.0,
            clipboard_row_height: 48.0,
        }
    }
}

// ── Layout ─────────────────────────────────────────────────

pub struct UiLayout {
    pub config: LayoutConfig,
    panels: Vec<(Surface, Rect)>,
    elements: Vec<Element>,
}

impl UiLayout {
    /// Panels sized from `config`, no elements yet.
    pub fn new(config: LayoutConfig) -> Self {
        let h = config.screen_height;
        let view_width = (config.screen_width - config.tree_width - config.clipboard_width).max(0.0);
        let panels = vec![
            (Surface::FolderTree, Rect::new(0.0, 0.0, config.tree_width, h)),
            (
                Surface::FileView,
                Rect::new(config.tree_width, 0.0, view_width, h),
            ),
            (
                Surface::Clipboard,
                Rect::new(config.tree_width + view_width, 0.0, config.clipboard_width, h),
            ),
        ];
        Self {
            config,
            panels,
            elements: Vec::new(),
        }
    }

    /// Hand-placed layout for hosts that position elements themselves.
    pub fn with_elements(config: LayoutConfig, elements: Vec<Element>) -> Self {
        let mut layout = Self::new(config);
        layout.elements = elements;
        layout
    }

    pub fn panel(&self, surface: Surface) -> Option<Rect> {
        self.panels
            .iter()
            .find(|(s, _)| *s == surface)
            .map(|(_, r)| *r)
    }

    /// Re-place every element for the given view state.
    pub fn rebuild(
        &mut self,
        tree: &FileTree,
        active_folder: &str,
        expanded: &BTreeSet<ItemId>,
        clipboard: &BTreeSet<ItemId>,
    ) {
        self.elements.clear();
        self.layout_tree(tree, expanded);
        self.layout_grid(tree, active_folder);
        self.layout_clipboard(clipboard);
        trace!("layout rebuilt: {} element(s)", self.elements.len());
    }

    /// Folders only, depth-first, children shown when expanded.
    fn layout_tree(&mut self, tree: &FileTree, expanded: &BTreeSet<ItemId>) {
        let Some(panel) = self.panel(Surface::FolderTree) else {
            return;
        };
        let c = &self.config;
        let mut stack = vec![(tree.root_id().to_string(), 0usize)];
        let mut row = 0usize;
        let mut placed = Vec::new();
        while let Some((id, depth)) = stack.pop() {
            let y = panel.y + c.padding + c.header_height + row as f32 * c.tree_row_height;
            if y + c.tree_row_height > panel.bottom() {
                break;
            }
            let x = panel.x + c.padding + depth as f32 * c.tree_indent;
            placed.push(Element {
                id: id.clone(),
                surface: Surface::FolderTree,
                rect: Rect::new(x, y, (panel.right() - c.padding - x).max(0.0), c.tree_row_height),
                depth,
            });
            row += 1;
            if expanded.contains(&id) {
                let folders: Vec<_> = tree
                    .children(&id)
                    .into_iter()
                    .filter(|child| child.kind == ItemKind::Folder)
                    .map(|child| child.id.clone())
                    .collect();
                for child in folders.into_iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }
        self.elements.extend(placed);
    }

    /// Children of the active folder in a fixed-size cell grid.
    fn layout_grid(&mut self, tree: &FileTree, active_folder: &str) {
        let Some(panel) = self.panel(Surface::FileView) else {
            return;
        };
        let c = &self.config;
        let inner = panel.width - 2.0 * c.padding;
        let columns = (((inner + c.cell_gap) / (c.cell_width + c.cell_gap)).floor() as usize).max(1);
        let origin_x = panel.x + c.padding;
        let origin_y = panel.y + c.padding + c.header_height;
        let mut placed = Vec::new();
        for (i, child) in tree.children(active_folder).into_iter().enumerate() {
            let col = i % columns;
            let row = i / columns;
            let rect = Rect::new(
                origin_x + col as f32 * (c.cell_width + c.cell_gap),
                origin_y + row as f32 * (c.cell_height + c.cell_gap),
                c.cell_width,
                c.cell_height,
            );
            if rect.bottom() > panel.bottom() {
                break;
            }
            placed.push(Element {
                id: child.id.clone(),
                surface: Surface::FileView,
                rect,
                depth: 0,
            });
        }
        self.elements.extend(placed);
    }

    /// One row per clipboard entry.
    fn layout_clipboard(&mut self, clipboard: &BTreeSet<ItemId>) {
        let Some(panel) = self.panel(Surface::Clipboard) else {
            return;
        };
        let c = &self.config;
        let mut placed = Vec::new();
        for (i, id) in clipboard.iter().enumerate() {
            let y = panel.y + c.padding + c.header_height + i as f32 * c.clipboard_row_height;
            if y + c.clipboard_row_height > panel.bottom() {
                break;
            }
            placed.push(Element {
                id: id.clone(),
                surface: Surface::Clipboard,
                rect: Rect::new(
                    panel.x + c.padding,
                    y,
                    panel.width - 2.0 * c.padding,
                    c.clipboard_row_height,
                ),
                depth: 0,
            });
        }
        self.elements.extend(placed);
    }

    /// The element under a point, if any.
    pub fn element_at(&self, x: f32, y: f32) -> Option<&Element> {
        self.elements.iter().find(|e| e.rect.contains(x, y))
    }

    /// The panel under a point, if any.
    pub fn region_at(&self, x: f32, y: f32) -> Option<Surface> {
        self.panels
            .iter()
            .find(|(_, r)| r.contains(x, y))
            .map(|(s, _)| *s)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Rectangle of `id` on `surface`.
    pub fn rect_of(&self, id: &str, surface: Surface) -> Option<Rect> {
        self.elements
            .iter()
            .find(|e| e.surface == surface && e.id == id)
            .map(|e| e.rect)
    }

    /// File-view items whose center lies inside `area`, bounds inclusive.
    pub fn file_items_centered_in(&self, area: &Rect) -> BTreeSet<ItemId> {
        self.elements
            .iter()
            .filter(|e| e.surface == Surface::FileView)
            .filter(|e| {
                let (cx, cy) = e.rect.center();
                area.contains(cx, cy)
            })
            .map(|e| e.id.clone())
            .collect()
    }

    /// Generate s-expression describing panels and element counts.
    pub fn status_sexp(&self) -> String {
        let panels: Vec<String> = self
            .panels
            .iter()
            .map(|(s, r)| {
                let count = self.elements.iter().filter(|e| e.surface == *s).count();
                format!("(:surface :{} :rect {} :elements {})", s.as_str(), r.sexp(), count)
            })
            .collect();
        format!("({})", panels.join(" "))
    }
}

impl HitTest for UiLayout {
    fn item_at(&self, x: f32, y: f32) -> Option<ItemId> {
        self.elements
            .iter()
            .find(|e| e.surface != Surface::Clipboard && e.rect.contains(x, y))
            .map(|e| e.id.clone())
    }

    fn clipboard_item_at(&self, x: f32, y: f32) -> Option<ItemId> {
        self.elements
            .iter()
            .find(|e| e.surface == Surface::Clipboard && e.rect.contains(x, y))
            .map(|e| e.id.clone())
    }
}
