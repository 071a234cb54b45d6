//! Node store: the flat, ordered node collection and its tree operations.
//!
//! Nodes form a forest through `parent_id`. The store never holds cycles
//! because children are only ever derived from an existing node, and it is
//! never left empty by [`NodeStore::remove_subtree`]: removing the last nodes
//! synthesizes a fresh root.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Opaque, globally unique node identifier (UUID v4 text for new nodes).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Allocate a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One labeled box in the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub column: usize,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
}

impl Node {
    fn blank(column: usize, parent_id: Option<NodeId>) -> Self {
        Self {
            id: NodeId::generate(),
            title: String::new(),
            column,
            parent_id,
        }
    }
}

/// Outcome of [`NodeStore::remove_subtree`].
#[derive(Clone, Debug, PartialEq)]
pub struct Removal {
    /// Every removed id, in former collection order.
    pub removed: Vec<NodeId>,
    /// The node that should become active.
    pub next_active: NodeId,
    /// Whether the store emptied and `next_active` is a freshly made root.
    pub synthesized_root: bool,
}

/// Ordered node collection with a fixed number of columns.
#[derive(Clone, Debug)]
pub struct NodeStore {
    nodes: Vec<Node>,
    column_count: usize,
}

impl NodeStore {
    /// Create an empty store. Callers normally follow with
    /// [`add_root`](Self::add_root) or use [`from_nodes`](Self::from_nodes).
    pub fn new(column_count: usize) -> Self {
        Self {
            nodes: Vec::new(),
            column_count: column_count.max(1),
        }
    }

    /// Build a store from previously persisted nodes.
    ///
    /// Duplicate ids keep their first occurrence and out-of-range columns are
    /// clamped to the last column. Both corrections are logged.
    pub fn from_nodes(nodes: Vec<Node>, column_count: usize) -> Self {
        let mut store = Self::new(column_count);
        let last = store.last_column();
        let mut seen = HashSet::new();
        for mut node in nodes {
            if !seen.insert(node.id.clone()) {
                tracing::warn!(id = %node.id, "dropping node with duplicate id");
                continue;
            }
            if node.column > last {
                tracing::warn!(id = %node.id, column = node.column, last, "clamping out-of-range column");
                node.column = last;
            }
            store.nodes.push(node);
        }
        store
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn last_column(&self) -> usize {
        self.column_count - 1
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn first_id(&self) -> Option<&NodeId> {
        self.nodes.first().map(|n| &n.id)
    }

    pub fn find_by_id(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Append a parentless node in the first column.
    pub fn add_root(&mut self) -> NodeId {
        self.push(Node::blank(0, None))
    }

    /// Append a node sharing `id`'s column and parent.
    pub fn add_sibling(&mut self, id: &NodeId) -> Option<NodeId> {
        let node = self.find_by_id(id)?;
        let sibling = Node::blank(node.column, node.parent_id.clone());
        Some(self.push(sibling))
    }

    /// Append a child of `id` one column to the right, clamped to the last column.
    pub fn add_child(&mut self, id: &NodeId) -> Option<NodeId> {
        let node = self.find_by_id(id)?;
        let column = (node.column + 1).min(self.last_column());
        let child = Node::blank(column, Some(node.id.clone()));
        Some(self.push(child))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        tracing::debug!(id = %id, column = node.column, parent = ?node.parent_id, "node added");
        self.nodes.push(node);
        id
    }

    /// Replace a node's title. Returns `false` if the id is unknown.
    pub fn update_title(&mut self, id: &NodeId, text: impl Into<String>) -> bool {
        match self.nodes.iter_mut().find(|n| &n.id == id) {
            Some(node) => {
                node.title = text.into();
                true
            }
            None => false,
        }
    }

    /// `id` plus every node reachable from it through parent→child links.
    ///
    /// Walks an explicit worklist over a parent→children index, so depth is
    /// bounded by heap, not stack.
    pub fn descendant_closure(&self, id: &NodeId) -> HashSet<NodeId> {
        let mut children: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
        for node in &self.nodes {
            if let Some(parent) = &node.parent_id {
                children.entry(parent).or_default().push(&node.id);
            }
        }

        let mut closure = HashSet::new();
        let mut worklist = vec![id];
        while let Some(current) = worklist.pop() {
            if !closure.insert(current.clone()) {
                continue;
            }
            if let Some(kids) = children.get(current) {
                worklist.extend(kids.iter().copied());
            }
        }
        closure
    }

    /// Remove `id` and all of its descendants.
    ///
    /// The next active node is the first remaining node in collection order;
    /// if nothing remains a new root is created. Returns `None` (and changes
    /// nothing) when `id` is not in the store.
    pub fn remove_subtree(&mut self, id: &NodeId) -> Option<Removal> {
        if !self.contains(id) {
            return None;
        }
        let closure = self.descendant_closure(id);
        let mut removed = Vec::with_capacity(closure.len());
        self.nodes.retain(|n| {
            if closure.contains(&n.id) {
                removed.push(n.id.clone());
                false
            } else {
                true
            }
        });
        tracing::debug!(root = %id, count = removed.len(), "subtree removed");

        let (next_active, synthesized_root) = match self.first_id().cloned() {
            Some(first) => (first, false),
            None => (self.add_root(), true),
        };
        Some(Removal {
            removed,
            next_active,
            synthesized_root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_root() -> (NodeStore, NodeId) {
        let mut store = NodeStore::new(6);
        let root = store.add_root();
        (store, root)
    }

    // ========================================================================
    // add_root / add_sibling / add_child
    // ========================================================================

    #[test]
    fn test_add_root_is_blank_first_column() {
        let (store, root) = store_with_root();
        let node = store.find_by_id(&root).unwrap();
        assert_eq!(node.title, "");
        assert_eq!(node.column, 0);
        assert!(node.parent_id.is_none());
    }

    #[test]
    fn test_add_child_moves_one_column_right() {
        let (mut store, root) = store_with_root();
        let child = store.add_child(&root).unwrap();
        let node = store.find_by_id(&child).unwrap();
        assert_eq!(node.column, 1);
        assert_eq!(node.parent_id.as_ref(), Some(&root));
    }

    #[test]
    fn test_add_child_clamps_to_last_column() {
        let mut store = NodeStore::new(2);
        let root = store.add_root();
        let a = store.add_child(&root).unwrap();
        let b = store.add_child(&a).unwrap();
        assert_eq!(store.find_by_id(&a).unwrap().column, 1);
        assert_eq!(store.find_by_id(&b).unwrap().column, 1);
    }

    #[test]
    fn test_add_sibling_shares_column_and_parent() {
        let (mut store, root) = store_with_root();
        let child = store.add_child(&root).unwrap();
        let sibling = store.add_sibling(&child).unwrap();
        let node = store.find_by_id(&sibling).unwrap();
        assert_eq!(node.column, 1);
        assert_eq!(node.parent_id.as_ref(), Some(&root));
    }

    #[test]
    fn test_add_sibling_of_root_is_root() {
        let (mut store, root) = store_with_root();
        let sibling = store.add_sibling(&root).unwrap();
        assert!(store.find_by_id(&sibling).unwrap().parent_id.is_none());
    }

    #[test]
    fn test_add_on_unknown_id_is_none() {
        let (mut store, _) = store_with_root();
        let ghost = NodeId::from("ghost");
        assert!(store.add_child(&ghost).is_none());
        assert!(store.add_sibling(&ghost).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let (mut store, root) = store_with_root();
        for _ in 0..50 {
            store.add_child(&root);
        }
        let ids: HashSet<_> = store.iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids.len(), store.len());
    }

    // ========================================================================
    // update_title
    // ========================================================================

    #[test]
    fn test_update_title_allows_empty() {
        let (mut store, root) = store_with_root();
        assert!(store.update_title(&root, "Ship v2"));
        assert_eq!(store.find_by_id(&root).unwrap().title, "Ship v2");
        assert!(store.update_title(&root, ""));
        assert_eq!(store.find_by_id(&root).unwrap().title, "");
    }

    #[test]
    fn test_update_title_unknown_id() {
        let (mut store, _) = store_with_root();
        assert!(!store.update_title(&NodeId::from("nope"), "x"));
    }

    // ========================================================================
    // descendant_closure / remove_subtree
    // ========================================================================

    #[test]
    fn test_closure_of_leaf_is_itself() {
        let (mut store, root) = store_with_root();
        let child = store.add_child(&root).unwrap();
        let closure = store.descendant_closure(&child);
        assert_eq!(closure.len(), 1);
        assert!(closure.contains(&child));
    }

    #[test]
    fn test_closure_is_transitive() {
        let (mut store, root) = store_with_root();
        let a = store.add_child(&root).unwrap();
        let b = store.add_child(&a).unwrap();
        let c = store.add_sibling(&b).unwrap();
        let other = store.add_root();
        let closure = store.descendant_closure(&a);
        assert_eq!(closure, HashSet::from([a, b, c]));
        assert!(!closure.contains(&other));
        assert!(!closure.contains(&root));
    }

    #[test]
    fn test_remove_leaf_keeps_rest_and_selects_first() {
        let (mut store, root) = store_with_root();
        let child = store.add_child(&root).unwrap();
        let removal = store.remove_subtree(&child).unwrap();
        assert_eq!(removal.removed, vec![child]);
        assert_eq!(removal.next_active, root);
        assert!(!removal.synthesized_root);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_everything_synthesizes_root() {
        let (mut store, root) = store_with_root();
        store.add_child(&root).unwrap();
        let removal = store.remove_subtree(&root).unwrap();
        assert_eq!(removal.removed.len(), 2);
        assert!(removal.synthesized_root);
        assert_eq!(store.len(), 1);
        let fresh = store.find_by_id(&removal.next_active).unwrap();
        assert_ne!(fresh.id, root);
        assert_eq!(fresh.column, 0);
        assert!(fresh.parent_id.is_none());
    }

    #[test]
    fn test_remove_selects_first_remaining_not_parent() {
        let (mut store, root) = store_with_root();
        let a = store.add_child(&root).unwrap();
        let b = store.add_child(&a).unwrap();
        let removal = store.remove_subtree(&b).unwrap();
        assert_eq!(removal.next_active, root);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let (mut store, _) = store_with_root();
        assert!(store.remove_subtree(&NodeId::from("ghost")).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_deep_chain_without_recursion() {
        let (mut store, root) = store_with_root();
        let mut tip = root.clone();
        for _ in 0..2_000 {
            tip = store.add_child(&tip).unwrap();
        }
        let removal = store.remove_subtree(&root).unwrap();
        assert_eq!(removal.removed.len(), 2_001);
        assert_eq!(store.len(), 1);
    }

    // ========================================================================
    // from_nodes / serde
    // ========================================================================

    #[test]
    fn test_from_nodes_clamps_and_dedupes() {
        let nodes = vec![
            Node { id: "a".into(), title: "A".into(), column: 9, parent_id: None },
            Node { id: "a".into(), title: "dup".into(), column: 0, parent_id: None },
            Node { id: "b".into(), title: "B".into(), column: 1, parent_id: Some("a".into()) },
        ];
        let store = NodeStore::from_nodes(nodes, 6);
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_id(&"a".into()).unwrap().column, 5);
        assert_eq!(store.find_by_id(&"a".into()).unwrap().title, "A");
    }

    #[test]
    fn test_node_json_uses_camel_case() {
        let node = Node { id: "x".into(), title: "T".into(), column: 2, parent_id: Some("p".into()) };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "x", "title": "T", "column": 2, "parentId": "p"})
        );
    }

    #[test]
    fn test_node_json_null_parent_and_missing_fields() {
        let node: Node = serde_json::from_str(r#"{"id": "r", "parentId": null}"#).unwrap();
        assert_eq!(node.title, "");
        assert_eq!(node.column, 0);
        assert!(node.parent_id.is_none());
    }
}
