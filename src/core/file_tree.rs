//! File tree: the folder/file index of available documents

use serde::{Deserialize, Serialize};

/// Stable identity of a node inside one [`FileTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

/// Serializable tree layout, as stored in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeEntry {
    Folder {
        label: String,
        #[serde(default)]
        expanded: bool,
        #[serde(default)]
        children: Vec<TreeEntry>,
    },
    File {
        label: String,
        #[serde(default)]
        active: bool,
    },
}

impl TreeEntry {
    pub fn folder(label: &str, expanded: bool, children: Vec<TreeEntry>) -> Self {
        Self::Folder {
            label: label.to_string(),
            expanded,
            children,
        }
    }

    pub fn file(label: &str) -> Self {
        Self::File {
            label: label.to_string(),
            active: false,
        }
    }

    pub fn active_file(label: &str) -> Self {
        Self::File {
            label: label.to_string(),
            active: true,
        }
    }
}

/// Folder or file payload of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Folder { expanded: bool, children: Vec<TreeNode> },
    File { active: bool },
}

/// A node in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: NodeId,
    /// Folder name, or the document name for files
    pub label: String,
    pub kind: NodeKind,
}

impl TreeNode {
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    /// Child nodes; files have none
    pub fn children(&self) -> &[TreeNode] {
        match self.kind {
            NodeKind::Folder { ref children, .. } => children,
            NodeKind::File { .. } => &[],
        }
    }
}

/// What a click on a node resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeClick {
    /// A folder flipped to the given expansion state
    Toggled(bool),
    /// A file was selected; the session should open this document
    Open(String),
}

/// Case-insensitive label prefix match, used to pick the folder new documents are filed under
pub fn label_starts_with(prefix: &str) -> impl Fn(&str) -> bool + '_ {
    move |label: &str| {
        label
            .trim()
            .to_lowercase()
            .starts_with(&prefix.to_lowercase())
    }
}

/// Hierarchy of folders and files
#[derive(Debug, Clone, Default)]
pub struct FileTree {
    roots: Vec<TreeNode>,
    next_id: u64,
}

impl FileTree {
    /// Build a tree from its configured layout; only the first active file stays active
    pub fn from_entries(entries: &[TreeEntry]) -> Self {
        let mut tree = Self::default();
        let mut seen_active = false;
        let roots: Vec<TreeNode> = entries
            .iter()
            .map(|entry| tree.build_node(entry, &mut seen_active))
            .collect();
        tree.roots = roots;
        tree
    }

    fn allocate_id(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    fn build_node(&mut self, entry: &TreeEntry, seen_active: &mut bool) -> TreeNode {
        let id = self.allocate_id();
        match entry {
            TreeEntry::Folder {
                label,
                expanded,
                children,
            } => TreeNode {
                id,
                label: label.clone(),
                kind: NodeKind::Folder {
                    expanded: *expanded,
                    children: children
                        .iter()
                        .map(|child| self.build_node(child, seen_active))
                        .collect(),
                },
            },
            TreeEntry::File { label, active } => {
                let active = *active && !*seen_active;
                *seen_active |= active;
                TreeNode {
                    id,
                    label: label.clone(),
                    kind: NodeKind::File { active },
                }
            }
        }
    }

    /// Current layout, for writing back to the configuration
    pub fn to_entries(&self) -> Vec<TreeEntry> {
        fn entry(node: &TreeNode) -> TreeEntry {
            match node.kind {
                NodeKind::Folder {
                    expanded,
                    ref children,
                } => TreeEntry::Folder {
                    label: node.label.clone(),
                    expanded,
                    children: children.iter().map(entry).collect(),
                },
                NodeKind::File { active } => TreeEntry::File {
                    label: node.label.clone(),
                    active,
                },
            }
        }
        self.roots.iter().map(entry).collect()
    }

    /// Top-level nodes
    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    /// Find a node by id
    pub fn find(&self, id: NodeId) -> Option<&TreeNode> {
        self.roots.iter().find_map(|root| Self::find_in_node(root, id))
    }

    fn find_in_node(node: &TreeNode, id: NodeId) -> Option<&TreeNode> {
        if node.id == id {
            return Some(node);
        }
        node.children()
            .iter()
            .find_map(|child| Self::find_in_node(child, id))
    }

    fn find_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.roots
            .iter_mut()
            .find_map(|root| Self::find_in_node_mut(root, id))
    }

    fn find_in_node_mut(node: &mut TreeNode, id: NodeId) -> Option<&mut TreeNode> {
        if node.id == id {
            return Some(node);
        }
        match node.kind {
            NodeKind::Folder {
                ref mut children, ..
            } => children
                .iter_mut()
                .find_map(|child| Self::find_in_node_mut(child, id)),
            NodeKind::File { .. } => None,
        }
    }

    /// Label of the active file, if any
    pub fn active_file(&self) -> Option<&str> {
        fn walk(nodes: &[TreeNode]) -> Option<&str> {
            nodes.iter().find_map(|node| match node.kind {
                NodeKind::File { active: true } => Some(node.label.as_str()),
                NodeKind::File { active: false } => None,
                NodeKind::Folder { ref children, .. } => walk(children),
            })
        }
        walk(&self.roots)
    }

    /// Whether any file node carries `label`
    pub fn contains_file(&self, label: &str) -> bool {
        fn walk(nodes: &[TreeNode], label: &str) -> bool {
            nodes.iter().any(|node| match node.kind {
                NodeKind::File { .. } => node.label == label,
                NodeKind::Folder { ref children, .. } => walk(children, label),
            })
        }
        walk(&self.roots, label)
    }

    /// Flip a folder open or closed; returns the new state, `None` for files
    pub fn toggle_folder(&mut self, id: NodeId) -> Option<bool> {
        match self.find_mut(id)?.kind {
            NodeKind::Folder {
                ref mut expanded, ..
            } => {
                *expanded = !*expanded;
                Some(*expanded)
            }
            NodeKind::File { .. } => None,
        }
    }

    /// Make this file the only active one; returns its label, `None` for folders
    pub fn select_file(&mut self, id: NodeId) -> Option<String> {
        let label = match self.find(id) {
            Some(node) if !node.is_folder() => node.label.clone(),
            _ => return None,
        };
        Self::set_active_in(&mut self.roots, &mut |node_id, _| node_id == id);
        Some(label)
    }

    /// Resolve a click: folders toggle, files are selected.
    ///
    /// The click targets exactly one node, so ancestors of a file never toggle.
    pub fn click(&mut self, id: NodeId) -> Option<TreeClick> {
        if self.find(id)?.is_folder() {
            self.toggle_folder(id).map(TreeClick::Toggled)
        } else {
            self.select_file(id).map(TreeClick::Open)
        }
    }

    /// Mark the first file labelled `name` active and every other file inactive
    pub fn mark_active(&mut self, name: &str) {
        let mut found = false;
        Self::set_active_in(&mut self.roots, &mut |_, label| {
            let hit = !found && label == name;
            found |= hit;
            hit
        });
    }

    /// Point the marker at `name`, leaving it alone when the active file already carries that label
    pub fn sync_active(&mut self, name: &str) {
        if self.active_file() != Some(name) {
            self.mark_active(name);
        }
    }

    /// Clear the active marker everywhere
    pub fn clear_active(&mut self) {
        Self::set_active_in(&mut self.roots, &mut |_, _| false);
    }

    fn set_active_in(nodes: &mut [TreeNode], is_target: &mut dyn FnMut(NodeId, &str) -> bool) {
        for node in nodes {
            match node.kind {
                NodeKind::File { ref mut active } => *active = is_target(node.id, &node.label),
                NodeKind::Folder {
                    ref mut children, ..
                } => Self::set_active_in(children, is_target),
            }
        }
    }

    /// Append a file under the first folder (depth-first) whose label matches.
    ///
    /// Returns `None` and inserts nothing when no folder matches.
    pub fn insert_file(&mut self, label: &str, folder_matches: impl Fn(&str) -> bool) -> Option<NodeId> {
        let id = self.allocate_id();
        let folder = Self::find_folder_mut(&mut self.roots, &folder_matches)?;
        if let NodeKind::Folder {
            ref mut children, ..
        } = folder.kind
        {
            children.push(TreeNode {
                id,
                label: label.to_string(),
                kind: NodeKind::File { active: false },
            });
        }
        tracing::debug!("Filed {} under folder {}", label, folder.label);
        Some(id)
    }

    fn find_folder_mut<'a>(
        nodes: &'a mut [TreeNode],
        folder_matches: &dyn Fn(&str) -> bool,
    ) -> Option<&'a mut TreeNode> {
        for node in nodes {
            if !node.is_folder() {
                continue;
            }
            if folder_matches(&node.label) {
                return Some(node);
            }
            if let NodeKind::Folder {
                ref mut children, ..
            } = node.kind
            {
                if let Some(found) = Self::find_folder_mut(children, folder_matches) {
                    return Some(found);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileTree {
        FileTree::from_entries(&[
            TreeEntry::folder(
                "Manuscript",
                true,
                vec![TreeEntry::folder(
                    "Part One",
                    false,
                    vec![TreeEntry::file("Chapter 1"), TreeEntry::active_file("Chapter 2")],
                )],
            ),
            TreeEntry::folder("Writing", false, vec![]),
            TreeEntry::file("Ideas"),
        ])
    }

    fn id_of(tree: &FileTree, label: &str) -> NodeId {
        fn walk(nodes: &[TreeNode], label: &str) -> Option<NodeId> {
            nodes.iter().find_map(|node| {
                if node.label == label {
                    Some(node.id)
                } else {
                    walk(node.children(), label)
                }
            })
        }
        walk(tree.roots(), label).unwrap()
    }

    fn expanded(tree: &FileTree, label: &str) -> bool {
        match tree.find(id_of(tree, label)).unwrap().kind {
            NodeKind::Folder { expanded, .. } => expanded,
            NodeKind::File { .. } => panic!("{label} is not a folder"),
        }
    }

    #[test]
    fn test_active_marker_loaded_from_layout() {
        assert_eq!(sample().active_file(), Some("Chapter 2"));
    }

    #[test]
    fn test_only_first_active_entry_survives() {
        let tree = FileTree::from_entries(&[TreeEntry::active_file("A"), TreeEntry::active_file("B")]);
        assert_eq!(tree.active_file(), Some("A"));
    }

    #[test]
    fn test_toggle_folder() {
        let mut tree = sample();
        let writing = id_of(&tree, "Writing");
        assert_eq!(tree.toggle_folder(writing), Some(true));
        assert_eq!(tree.click(writing), Some(TreeClick::Toggled(false)));
        assert_eq!(tree.active_file(), Some("Chapter 2"));
    }

    #[test]
    fn test_toggle_file_is_noop() {
        let mut tree = sample();
        let ideas = id_of(&tree, "Ideas");
        assert_eq!(tree.toggle_folder(ideas), None);
    }

    #[test]
    fn test_nested_file_click_leaves_ancestors_alone() {
        let mut tree = sample();
        let chapter = id_of(&tree, "Chapter 1");
        assert_eq!(tree.click(chapter), Some(TreeClick::Open("Chapter 1".to_string())));
        assert!(expanded(&tree, "Manuscript"));
        assert!(!expanded(&tree, "Part One"));
        assert_eq!(tree.active_file(), Some("Chapter 1"));
    }

    #[test]
    fn test_select_file_is_exclusive() {
        let mut tree = sample();
        tree.select_file(id_of(&tree, "Ideas"));
        assert_eq!(tree.active_file(), Some("Ideas"));
        let chapter_two = tree.find(id_of(&tree, "Chapter 2")).unwrap();
        assert_eq!(chapter_two.kind, NodeKind::File { active: false });
    }

    #[test]
    fn test_insert_into_empty_folder() {
        let mut tree = sample();
        let id = tree.insert_file("Draft", label_starts_with("Writing")).unwrap();
        let writing = tree.find(id_of(&tree, "Writing")).unwrap();
        assert_eq!(writing.children().len(), 1);
        assert_eq!(writing.children()[0].id, id);
        assert_eq!(writing.children()[0].label, "Draft");
        assert!(tree.contains_file("Draft"));
    }

    #[test]
    fn test_insert_without_matching_folder() {
        let mut tree = sample();
        assert_eq!(tree.insert_file("Draft", label_starts_with("Archive")), None);
        assert!(!tree.contains_file("Draft"));
    }

    #[test]
    fn test_folder_prefix_match_is_case_insensitive() {
        let matches = label_starts_with("writing");
        assert!(matches("Writing Projects"));
        assert!(!matches("Rewriting"));
    }

    #[test]
    fn test_layout_round_trips_through_entries() {
        let mut tree = sample();
        tree.toggle_folder(id_of(&tree, "Writing"));
        tree.insert_file("Draft", label_starts_with("writing"));
        let rebuilt = FileTree::from_entries(&tree.to_entries());
        assert!(expanded(&rebuilt, "Writing"));
        assert!(rebuilt.contains_file("Draft"));
        assert_eq!(rebuilt.active_file(), Some("Chapter 2"));
    }

    #[test]
    fn test_mark_active_tracks_session() {
        let mut tree = sample();
        tree.mark_active("Ideas");
        assert_eq!(tree.active_file(), Some("Ideas"));
        tree.mark_active("Not in tree");
        assert_eq!(tree.active_file(), None);
    }

    #[test]
    fn test_sync_active_keeps_selected_duplicate() {
        let mut tree = FileTree::from_entries(&[
            TreeEntry::folder("Writing", true, vec![TreeEntry::file("Notes")]),
            TreeEntry::folder("Research", true, vec![TreeEntry::file("Notes")]),
        ]);
        let research = tree.find(id_of(&tree, "Research")).unwrap();
        let second = research.children()[0].id;

        tree.select_file(second);
        tree.sync_active("Notes");
        assert_eq!(tree.find(second).unwrap().kind, NodeKind::File { active: true });

        let writing = tree.find(id_of(&tree, "Writing")).unwrap();
        assert_eq!(writing.children()[0].kind, NodeKind::File { active: false });
    }
}
