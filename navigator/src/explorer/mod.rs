//! File browser driven by gesture results: mock file tree, panel layout
//! and the coordinator that applies clicks and drags.

pub mod coordinator;
pub mod fs;
pub mod layout;

pub use coordinator::{DropOutcome, ExplorerState, GESTURE_LOG_LEN};
pub use fs::{FileItem, FileTree, ItemKind};
pub use layout::{Element, LayoutConfig, Rect, Surface, UiLayout};
