//! Expand/collapse state for the tree view
//!
//! The caller owns an ExpansionState and passes it into tree operations;
//! `toggle` returns a new value instead of mutating, so the view layer never
//! shares aliased state with the core.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::node::Node;

/// Set of folder paths whose children are currently shown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionState {
    expanded: BTreeSet<String>,
}

impl ExpansionState {
    /// Create a state with every folder collapsed
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a folder is currently expanded
    pub fn is_expanded(&self, folder_path: &str) -> bool {
        self.expanded.contains(folder_path)
    }

    /// Number of expanded folders
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    /// Whether every folder is collapsed
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Toggle a folder open or closed.
    ///
    /// Collapsing also retracts every strict descendant, so re-expanding a
    /// parent never silently reveals previously-expanded grandchildren.
    pub fn toggle(&self, folder_path: &str) -> ExpansionState {
        let mut expanded = self.expanded.clone();
        if expanded.contains(folder_path) {
            let descendant_prefix = format!("{}/", folder_path);
            expanded.retain(|p| p != folder_path && !p.starts_with(&descendant_prefix));
        } else {
            expanded.insert(folder_path.to_string());
        }
        ExpansionState { expanded }
    }
}

/// Filter nodes down to the visible subset, preserving order.
///
/// A node is visible iff every ancestor folder on its path is expanded;
/// root-level nodes are always visible. Single pass over the pre-ordered
/// sequence, carrying an "ancestors expanded" flag per depth level.
pub fn visible_subset<'a>(nodes: &'a [Node], expansion: &ExpansionState) -> Vec<&'a Node> {
    let mut visible = Vec::new();
    // open[d] holds whether every ancestor of a depth-d node is expanded
    let mut open = vec![true];

    for node in nodes {
        open.truncate(node.depth + 1);
        let shown = open.get(node.depth).copied().unwrap_or(false);
        if shown {
            visible.push(node);
        }
        if node.is_folder() {
            open.push(shown && expansion.is_expanded(&node.path));
        }
    }

    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::node::NodeKind;

    fn folder(path: &str) -> Node {
        let (parent, name) = match path.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", path),
        };
        Node {
            name: name.to_string(),
            path: path.to_string(),
            kind: NodeKind::Folder,
            depth: path.matches('/').count(),
            parent_path: parent.to_string(),
        }
    }

    fn file(path: &str) -> Node {
        Node {
            kind: NodeKind::File,
            ..folder(path)
        }
    }

    fn paths<'a>(nodes: &[&'a Node]) -> Vec<&'a str> {
        nodes.iter().map(|n| n.path.as_str()).collect()
    }

    #[test]
    fn test_toggle_round_trip() {
        let state = ExpansionState::new().toggle("sub");
        assert!(state.is_expanded("sub"));

        let state = state.toggle("sub");
        assert!(!state.is_expanded("sub"));
        assert!(state.is_empty());
    }

    #[test]
    fn test_collapse_retracts_descendants() {
        let state = ExpansionState::new().toggle("a").toggle("a/b");
        assert!(state.is_expanded("a"));
        assert!(state.is_expanded("a/b"));

        // Collapse "a": "a/b" must be forgotten, not restored on re-expand
        let state = state.toggle("a");
        assert!(state.is_empty());

        let state = state.toggle("a");
        assert!(state.is_expanded("a"));
        assert!(!state.is_expanded("a/b"));
    }

    #[test]
    fn test_collapse_keeps_sibling_prefixes() {
        // "ab" shares a string prefix with "a" but is not a descendant
        let state = ExpansionState::new().toggle("a").toggle("ab").toggle("a");
        assert!(state.is_expanded("ab"));
        assert!(!state.is_expanded("a"));
    }

    #[test]
    fn test_visibility_end_to_end() {
        let nodes = vec![
            file("a.png"),
            folder("sub"),
            file("sub/b.jpg"),
        ];

        let collapsed = ExpansionState::new();
        assert_eq!(paths(&visible_subset(&nodes, &collapsed)), vec!["a.png", "sub"]);

        let opened = collapsed.toggle("sub");
        assert_eq!(
            paths(&visible_subset(&nodes, &opened)),
            vec!["a.png", "sub", "sub/b.jpg"]
        );
    }

    #[test]
    fn test_visibility_requires_all_ancestors() {
        let nodes = vec![
            folder("a"),
            folder("a/b"),
            file("a/b/deep.png"),
        ];

        // Only the inner folder expanded: its children stay hidden because
        // the outer folder is closed
        let inner_only = ExpansionState::new().toggle("a/b");
        assert_eq!(paths(&visible_subset(&nodes, &inner_only)), vec!["a"]);

        let both = inner_only.toggle("a");
        assert_eq!(
            paths(&visible_subset(&nodes, &both)),
            vec!["a", "a/b", "a/b/deep.png"]
        );
    }

    #[test]
    fn test_visibility_resets_between_branches() {
        let nodes = vec![
            folder("open"),
            file("open/x.png"),
            folder("closed"),
            file("closed/y.png"),
            file("z.png"),
        ];

        let state = ExpansionState::new().toggle("open");
        assert_eq!(
            paths(&visible_subset(&nodes, &state)),
            vec!["open", "open/x.png", "closed", "z.png"]
        );
    }
}
