//! In-memory mock file tree.

use std::collections::BTreeMap;

use crate::gesture::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    File,
    Folder,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

/// One file or folder.
#[derive(Debug, Clone, PartialEq)]
pub struct FileItem {
    pub id: ItemId,
    /// Display name.
    pub name: String,
    pub kind: ItemKind,
    pub parent: Option<ItemId>,
    /// Child ids in display order (folders only).
    pub children: Vec<ItemId>,
    pub path: String,
    /// Size in bytes (files only).
    pub size: Option<u64>,
    /// Last-modified date, `YYYY-MM-DD`.
    pub modified: String,
}

/// A rooted tree of items keyed by id.
#[derive(Debug, Clone)]
pub struct FileTree {
    root: ItemId,
    items: BTreeMap<ItemId, FileItem>,
}

impl FileTree {
    /// A tree holding only an empty root folder.
    pub fn new(root_id: &str, root_name: &str) -> Self {
        let mut items = BTreeMap::new();
        items.insert(
            root_id.to_string(),
            FileItem {
                id: root_id.to_string(),
                name: root_name.to_string(),
                kind: ItemKind::Folder,
                parent: None,
                children: Vec::new(),
                path: "/".to_string(),
                size: None,
                modified: String::new(),
            },
        );
        Self {
            root: root_id.to_string(),
            items,
        }
    }

    /// Add an item under `parent`. Returns false when the parent is not
    /// a folder or the id is taken.
    pub fn insert(
        &mut self,
        parent: &str,
        id: &str,
        name: &str,
        kind: ItemKind,
        size: Option<u64>,
        modified: &str,
    ) -> bool {
        if self.items.contains_key(id) {
            return false;
        }
        let path = match self.items.get_mut(parent) {
            Some(p) if p.kind == ItemKind::Folder => {
                p.children.push(id.to_string());
                if p.path == "/" {
                    format!("/{}", id)
                } else {
                    format!("{}/{}", p.path, id)
                }
            }
            _ => return false,
        };
        self.items.insert(
            id.to_string(),
            FileItem {
                id: id.to_string(),
                name: name.to_string(),
                kind,
                parent: Some(parent.to_string()),
                children: Vec::new(),
                path,
                size,
                modified: modified.to_string(),
            },
        );
        true
    }

    pub fn root_id(&self) -> &str {
        &self.root
    }

    pub fn get(&self, id: &str) -> Option<&FileItem> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn is_folder(&self, id: &str) -> bool {
        self.get(id).map_or(false, |i| i.kind == ItemKind::Folder)
    }

    /// Display name, falling back to the id.
    pub fn name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |i| i.name.as_str())
    }

    /// Children of a folder in display order.
    pub fn children(&self, id: &str) -> Vec<&FileItem> {
        self.get(id)
            .map(|item| item.children.iter().filter_map(|c| self.get(c)).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The demo data set: medical, semiconductor and shared resources.
    pub fn mock() -> Self {
        use ItemKind::{File, Folder};

        let mut tree = Self::new("root", "EFS Root");
        let entries: &[(&str, &str, &str, ItemKind, Option<u64>, &str)] = &[
            ("root", "medical", "Medical Records", Folder, None, "2024-01-20"),
            ("medical", "patient-data", "Patient Data", Folder, None, "2024-01-22"),
            ("patient-data", "patient-001.json", "Patient 001 Record", File, Some(2048), "2024-01-22"),
            ("patient-data", "patient-002.json", "Patient 002 Record", File, Some(1854), "2024-01-21"),
            ("patient-data", "patient-003.json", "Patient 003 Record", File, Some(2156), "2024-01-23"),
            ("medical", "xrays", "X-Ray Images", Folder, None, "2024-01-19"),
            ("xrays", "chest-001.dcm", "Chest X-Ray 001", File, Some(524_288), "2024-01-19"),
            ("xrays", "leg-002.dcm", "Leg X-Ray 002", File, Some(612_352), "2024-01-18"),
            ("xrays", "skull-003.dcm", "Skull X-Ray 003", File, Some(498_176), "2024-01-20"),
            ("medical", "procedures", "Procedure Documents", Folder, None, "2024-01-21"),
            ("procedures", "surgery-protocol.pdf", "Surgery Protocol", File, Some(1_048_576), "2024-01-21"),
            ("procedures", "lab-results.pdf", "Lab Results", File, Some(786_432), "2024-01-20"),
            ("root", "semiconductor", "Semiconductor Designs", Folder, None, "2024-01-18"),
            ("semiconductor", "chip-designs", "Chip Designs", Folder, None, "2024-01-17"),
            ("chip-designs", "cpu-v2.cad", "CPU Design v2", File, Some(5_242_880), "2024-01-17"),
            ("chip-designs", "gpu-prototype.cad", "GPU Prototype", File, Some(8_388_608), "2024-01-16"),
            ("chip-designs", "memory-controller.cad", "Memory Controller", File, Some(3_145_728), "2024-01-18"),
            ("semiconductor", "test-results", "Test Results", Folder, None, "2024-01-19"),
            ("test-results", "performance-test.csv", "Performance Test Data", File, Some(204_800), "2024-01-19"),
            ("test-results", "thermal-analysis.xlsx", "Thermal Analysis", File, Some(1_572_864), "2024-01-18"),
            ("semiconductor", "specifications", "Specifications", Folder, None, "2024-01-17"),
            ("specifications", "chip-spec-v3.pdf", "Chip Specification v3", File, Some(2_097_152), "2024-01-17"),
            ("specifications", "manufacturing-requirements.docx", "Manufacturing Requirements", File, Some(1_048_576), "2024-01-16"),
            ("root", "shared", "Shared Resources", Folder, None, "2024-01-15"),
            ("shared", "documentation", "Documentation", Folder, None, "2024-01-14"),
            ("documentation", "user-manual.pdf", "User Manual", File, Some(3_145_728), "2024-01-14"),
            ("documentation", "api-reference.pdf", "API Reference", File, Some(1_572_864), "2024-01-13"),
            ("shared", "tools", "Development Tools", Folder, None, "2024-01-12"),
            ("tools", "analyzer.exe", "Data Analyzer", File, Some(10_485_760), "2024-01-12"),
            ("tools", "converter.jar", "Format Converter", File, Some(5_242_880), "2024-01-11"),
        ];
        for (parent, id, name, kind, size, modified) in entries {
            tree.insert(parent, id, name, *kind, *size, modified);
        }
        if let Some(root) = tree.items.get_mut("root") {
            root.modified = "2024-01-15".to_string();
        }
        tree
    }
}
