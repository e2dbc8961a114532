//! Applies gesture results to file-browser state.
//!
//! Owns the selection, clipboard, active folder and drag feedback sets.
//! Each `GestureResult` is applied at most once, keyed by frame number.

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, info};

use super::fs::{FileTree, ItemKind};
use super::layout::{LayoutConfig, Rect, Surface, UiLayout};
use crate::gesture::{
    CursorPosition, DragContext, DragMode, GestureResult, GestureState, ItemId,
};
use crate::sexp::{bool_sexp, quote, string_list};

/// Number of recent gesture results kept for display.
pub const GESTURE_LOG_LEN: usize = 5;

/// What a finished drag did.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Area selection replaced the selection.
    Selected(usize),
    /// Items copied into the clipboard.
    AddedToClipboard(usize),
    /// Items dropped on a folder; recorded, not materialized.
    SimulatedMove { folder: ItemId, count: usize },
    /// Clipboard entries moved back into the file view.
    RestoredToView(usize),
    /// Drag ended without crossing the movement threshold.
    NoMovement,
    /// Released over nothing that accepts the drag.
    NoTarget,
}

pub struct ExplorerState {
    pub tree: FileTree,
    pub layout: UiLayout,
    selected_items: BTreeSet<ItemId>,
    clipboard_items: BTreeSet<ItemId>,
    active_folder: ItemId,
    expanded_folders: BTreeSet<ItemId>,
    dragged_items: BTreeSet<ItemId>,
    area_drag_selection: BTreeSet<ItemId>,
    drag_mode: Option<DragMode>,
    drag_start: Option<CursorPosition>,
    drag_rect: Option<Rect>,
    drag_moved: bool,
    hovered: Option<(ItemId, Surface)>,
    gesture_log: VecDeque<GestureResult>,
    last_outcome: Option<DropOutcome>,
    last_frame: Option<u64>,
    simulated_moves: u64,
}

impl ExplorerState {
    /// Explorer over `tree` with the root expanded and active.
    pub fn new(tree: FileTree, layout: LayoutConfig) -> Self {
        let mut state = Self::with_layout(tree, UiLayout::new(layout));
        state.relayout();
        state
    }

    /// Explorer and layout over an externally placed element set.
    pub fn with_layout(tree: FileTree, layout: UiLayout) -> Self {
        let root = tree.root_id().to_string();
        Self {
            tree,
            layout,
            selected_items: BTreeSet::new(),
            clipboard_items: BTreeSet::new(),
            active_folder: root.clone(),
            expanded_folders: BTreeSet::from([root]),
            dragged_items: BTreeSet::new(),
            area_drag_selection: BTreeSet::new(),
            drag_mode: None,
            drag_start: None,
            drag_rect: None,
            drag_moved: false,
            hovered: None,
            gesture_log: VecDeque::with_capacity(GESTURE_LOG_LEN),
            last_outcome: None,
            last_frame: None,
            simulated_moves: 0,
        }
    }

    // ── Accessors ──────────────────────────────────────────

    pub fn selected_items(&self) -> &BTreeSet<ItemId> {
        &self.selected_items
    }

    pub fn clipboard_items(&self) -> &BTreeSet<ItemId> {
        &self.clipboard_items
    }

    pub fn active_folder(&self) -> &str {
        &self.active_folder
    }

    pub fn expanded_folders(&self) -> &BTreeSet<ItemId> {
        &self.expanded_folders
    }

    pub fn dragged_items(&self) -> &BTreeSet<ItemId> {
        &self.dragged_items
    }

    pub fn area_drag_selection(&self) -> &BTreeSet<ItemId> {
        &self.area_drag_selection
    }

    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag_mode
    }

    /// Live marquee rectangle during an area selection.
    pub fn drag_rect(&self) -> Option<Rect> {
        self.drag_rect
    }

    pub fn hovered_item(&self) -> Option<&str> {
        self.hovered.as_ref().map(|(id, _)| id.as_str())
    }

    /// Most recent first.
    pub fn recent_gestures(&self) -> impl Iterator<Item = &GestureResult> {
        self.gesture_log.iter()
    }

    pub fn last_outcome(&self) -> Option<&DropOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn simulated_moves(&self) -> u64 {
        self.simulated_moves
    }

    // ── Applying gestures ──────────────────────────────────

    /// Apply one frame's result. Returns false if this frame (or a later
    /// one) was already applied.
    pub fn apply(&mut self, result: &GestureResult) -> bool {
        if self.last_frame.map_or(false, |last| result.frame <= last) {
            debug!("frame {} already applied, ignoring", result.frame);
            return false;
        }
        self.last_frame = Some(result.frame);

        let cursor = result.cursor;
        if cursor.is_visible {
            self.update_hover(cursor.x, cursor.y);
        }

        if result.changed && result.click_state != GestureState::Idle {
            if self.gesture_log.len() == GESTURE_LOG_LEN {
                self.gesture_log.pop_back();
            }
            self.gesture_log.push_front(result.clone());
        }

        match result.click_state {
            GestureState::Idle => {}
            GestureState::Click => self.handle_click(cursor.x, cursor.y),
            GestureState::DoubleClick => self.handle_double_click(cursor.x, cursor.y),
            GestureState::DragStart => {
                if result.changed {
                    self.begin_drag(result);
                }
            }
            GestureState::Dragging => self.continue_drag(result),
            GestureState::DragEnd => self.finish_drag(result),
        }
        true
    }

    fn update_hover(&mut self, x: f32, y: f32) {
        let now = self
            .layout
            .element_at(x, y)
            .map(|e| (e.id.clone(), e.surface));
        if now != self.hovered {
            if let Some((id, surface)) = &now {
                debug!("hover {} ({})", self.tree.name(id), surface.as_str());
            }
            self.hovered = now;
        }
    }

    fn handle_click(&mut self, x: f32, y: f32) {
        let Some((id, surface)) = self.layout.element_at(x, y).map(|e| (e.id.clone(), e.surface))
        else {
            debug!("click on empty space at ({:.0}, {:.0})", x, y);
            return;
        };
        match surface {
            Surface::FolderTree => self.toggle_folder(&id),
            Surface::Clipboard => {
                self.remove_from_clipboard(&id);
            }
            Surface::FileView => match self.tree.get(&id).map(|i| i.kind) {
                Some(ItemKind::File) => self.select_item(&id, true),
                Some(ItemKind::Folder) => self.open_folder(&id),
                None => debug!("click on unknown item {}", id),
            },
        }
    }

    fn handle_double_click(&mut self, x: f32, y: f32) {
        let Some((id, surface)) = self.layout.element_at(x, y).map(|e| (e.id.clone(), e.surface))
        else {
            return;
        };
        if surface != Surface::Clipboard && self.tree.is_folder(&id) {
            self.open_folder(&id);
        }
    }

    fn begin_drag(&mut self, result: &GestureResult) {
        self.drag_mode = result.drag_mode;
        self.drag_start = result.drag_start;
        self.drag_moved = false;
        self.drag_rect = None;
        self.area_drag_selection.clear();
        match (result.drag_mode, result.drag.as_ref()) {
            (Some(DragMode::ItemMove | DragMode::ClipboardItemMove), Some(ctx)) => {
                self.dragged_items = ctx.moved_items.clone();
                info!(
                    "drag start: {} item(s) [{}]",
                    self.dragged_items.len(),
                    self.names(&self.dragged_items)
                );
            }
            _ => {
                self.dragged_items.clear();
                debug!("drag start: area selection");
            }
        }
    }

    fn continue_drag(&mut self, result: &GestureResult) {
        self.drag_moved = true;
        if !result.cursor.is_visible || self.drag_mode != Some(DragMode::AreaSelection) {
            return;
        }
        let Some(start) = result.drag_start.or(self.drag_start) else {
            return;
        };
        let rect = Rect::from_corners(&start, &result.cursor);
        self.area_drag_selection = self.layout.file_items_centered_in(&rect);
        self.drag_rect = Some(rect);
    }

    fn finish_drag(&mut self, result: &GestureResult) {
        let mode = result.drag_mode.or(self.drag_mode);
        let carried = result
            .drag
            .as_ref()
            .map(|ctx: &DragContext| ctx.moved_items.clone())
            .unwrap_or_else(|| std::mem::take(&mut self.dragged_items));
        let cursor = result.cursor;

        let outcome = if !self.drag_moved {
            debug!("drag ended without movement");
            DropOutcome::NoMovement
        } else {
            match mode {
                Some(DragMode::AreaSelection) | None => {
                    self.selected_items = std::mem::take(&mut self.area_drag_selection);
                    info!("area selection: {} item(s)", self.selected_items.len());
                    DropOutcome::Selected(self.selected_items.len())
                }
                Some(DragMode::ItemMove) => self.drop_items(&carried, cursor.x, cursor.y),
                Some(DragMode::ClipboardItemMove) => {
                    self.drop_clipboard_items(&carried, cursor.x, cursor.y)
                }
            }
        };

        self.cancel_drag();
        self.last_outcome = Some(outcome);
    }

    /// Drop any drag feedback without applying it.
    pub fn cancel_drag(&mut self) {
        self.dragged_items.clear();
        self.area_drag_selection.clear();
        self.drag_mode = None;
        self.drag_start = None;
        self.drag_rect = None;
        self.drag_moved = false;
    }

    fn drop_items(&mut self, items: &BTreeSet<ItemId>, x: f32, y: f32) -> DropOutcome {
        if self.layout.region_at(x, y) == Some(Surface::Clipboard) {
            self.clipboard_items.extend(items.iter().cloned());
            info!(
                "copied {} item(s) to clipboard [{}]",
                items.len(),
                self.names(items)
            );
            self.relayout();
            return DropOutcome::AddedToClipboard(items.len());
        }
        let target = self
            .layout
            .element_at(x, y)
            .filter(|e| e.surface != Surface::Clipboard)
            .map(|e| e.id.clone());
        match target {
            Some(folder) if self.tree.is_folder(&folder) => {
                self.simulated_moves += 1;
                info!(
                    "moved {} item(s) to folder {} (simulated)",
                    items.len(),
                    self.tree.name(&folder)
                );
                DropOutcome::SimulatedMove {
                    folder,
                    count: items.len(),
                }
            }
            _ => {
                info!("no valid drop target at ({:.0}, {:.0})", x, y);
                DropOutcome::NoTarget
            }
        }
    }

    fn drop_clipboard_items(&mut self, items: &BTreeSet<ItemId>, x: f32, y: f32) -> DropOutcome {
        if self.layout.region_at(x, y) != Some(Surface::FileView) {
            debug!("clipboard drag released outside file view");
            return DropOutcome::NoTarget;
        }
        for id in items {
            self.clipboard_items.remove(id);
            self.selected_items.insert(id.clone());
        }
        info!(
            "moved {} item(s) from clipboard to file view [{}]",
            items.len(),
            self.names(items)
        );
        self.relayout();
        DropOutcome::RestoredToView(items.len())
    }

    // ── Direct operations ──────────────────────────────────

    /// Select `id`. With `multiple`, toggle it within the selection;
    /// otherwise make it the only selected item.
    pub fn select_item(&mut self, id: &str, multiple: bool) {
        if multiple {
            if !self.selected_items.remove(id) {
                self.selected_items.insert(id.to_string());
            }
        } else {
            self.selected_items = BTreeSet::from([id.to_string()]);
        }
        debug!("selection: {} item(s)", self.selected_items.len());
    }

    /// Show `id`'s contents in the file view.
    pub fn open_folder(&mut self, id: &str) {
        if !self.tree.is_folder(id) {
            return;
        }
        self.active_folder = id.to_string();
        info!("opened folder {}", self.tree.name(id));
        self.relayout();
    }

    /// Expand or collapse `id` in the folder tree.
    pub fn toggle_folder(&mut self, id: &str) {
        if !self.expanded_folders.remove(id) {
            self.expanded_folders.insert(id.to_string());
        }
        debug!(
            "folder {} {}",
            self.tree.name(id),
            if self.expanded_folders.contains(id) {
                "expanded"
            } else {
                "collapsed"
            }
        );
        self.relayout();
    }

    /// Remove one clipboard entry. Returns true if it was present.
    pub fn remove_from_clipboard(&mut self, id: &str) -> bool {
        let removed = self.clipboard_items.remove(id);
        if removed {
            info!("removed {} from clipboard", self.tree.name(id));
            self.relayout();
        }
        removed
    }

    pub fn clear_clipboard(&mut self) {
        self.clipboard_items.clear();
        self.relayout();
    }

    fn relayout(&mut self) {
        self.layout.rebuild(
            &self.tree,
            &self.active_folder,
            &self.expanded_folders,
            &self.clipboard_items,
        );
    }

    fn names(&self, ids: &BTreeSet<ItemId>) -> String {
        ids.iter()
            .map(|id| self.tree.name(id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    // ── Status ─────────────────────────────────────────────

    /// One-line summary for the status bar.
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "Selected: {} | Clipboard: {}",
            self.selected_items.len(),
            self.clipboard_items.len()
        );
        if let Some(id) = self.hovered_item() {
            line.push_str(&format!(" | Hover: {}", self.tree.name(id)));
        }
        line
    }

    /// Generate s-expression for status output.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:active-folder {} :selected {} :clipboard {} :expanded {} :hover {} :drag-mode {} :dragging {} :simulated-moves {})",
            quote(&self.active_folder),
            string_list(self.selected_items.iter().map(String::as_str)),
            string_list(self.clipboard_items.iter().map(String::as_str)),
            string_list(self.expanded_folders.iter().map(String::as_str)),
            self.hovered_item().map(quote).unwrap_or_else(|| "nil".to_string()),
            self.drag_mode
                .map(|m| format!(":{}", m.as_str()))
                .unwrap_or_else(|| "nil".to_string()),
            bool_sexp(self.drag_moved),
            self.simulated_moves,
        )
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
struct ResultScript {
    frame: u64,
    t: u64,
    drag: Option<DragContext>,
}

#[cfg(test)]
impl ResultScript {
    fn new() -> Self {
        Self {
            frame: 0,
            t: 0,
            drag: None,
        }
    }

    fn next(&mut self, state: GestureState, changed: bool, at: (f32, f32)) -> GestureResult {
        self.frame += 1;
        self.t += 33;
        let drag = match state {
            GestureState::DragEnd => self.drag.take(),
            GestureState::DragStart if changed => self.drag.clone(),
            _ => None,
        };
        let context = drag.as_ref().or(self.drag.as_ref());
        GestureResult {
            frame: self.frame,
            cursor: CursorPosition::new(at.0, at.1),
            click_state: state,
            changed,
            drag_start: context.map(|d| d.start_position),
            drag_mode: context.map(|d| d.mode),
            drag,
            timestamp_ms: self.t,
        }
    }

    fn start(&mut self, mode: DragMode, items: &[&str], at: (f32, f32)) -> GestureResult {
        self.drag = Some(DragContext {
            start_position: CursorPosition::new(at.0, at.1),
            mode,
            moved_items: items.iter().map(|s| s.to_string()).collect(),
        });
        self.next(GestureState::DragStart, true, at)
    }
}
