//! Column placement of nodes for the renderer.
//!
//! The canvas is a fixed row of labeled columns; a node sits in the column
//! its `column` index names, below the nodes that precede it in collection
//! order. Vertical spacing and measurement are left to the renderer.

use crate::graph::{NodeId, NodeStore};

/// One rendered column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    pub index: usize,
    /// Display title, numbered from 1: `"2. Tier"`.
    pub title: String,
    /// Nodes in this column, top to bottom.
    pub node_ids: Vec<NodeId>,
}

/// Bucket nodes into columns, in collection order.
///
/// Nodes whose column has no label are not placed.
pub fn arrange_columns<S: AsRef<str>>(store: &NodeStore, labels: &[S]) -> Vec<ColumnView> {
    let mut columns: Vec<ColumnView> = labels
        .iter()
        .enumerate()
        .map(|(index, label)| ColumnView {
            index,
            title: format!("{}. {}", index + 1, label.as_ref()),
            node_ids: Vec::new(),
        })
        .collect();

    for node in store.iter() {
        if let Some(column) = columns.get_mut(node.column) {
            column.node_ids.push(node.id.clone());
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_COLUMN_LABELS;
    use crate::graph::Node;

    fn node(id: &str, column: usize) -> Node {
        Node { id: id.into(), title: String::new(), column, parent_id: None }
    }

    #[test]
    fn test_titles_are_numbered() {
        let store = NodeStore::new(6);
        let columns = arrange_columns(&store, &DEFAULT_COLUMN_LABELS);
        assert_eq!(columns.len(), 6);
        assert_eq!(columns[0].title, "1. Objective");
        assert_eq!(columns[5].title, "6. Probability");
        assert!(columns.iter().all(|c| c.node_ids.is_empty()));
    }

    #[test]
    fn test_nodes_keep_collection_order() {
        let store = NodeStore::from_nodes(vec![node("a", 1), node("b", 0), node("c", 1)], 6);
        let columns = arrange_columns(&store, &DEFAULT_COLUMN_LABELS);
        assert_eq!(columns[0].node_ids, vec![NodeId::from("b")]);
        assert_eq!(columns[1].node_ids, vec![NodeId::from("a"), NodeId::from("c")]);
    }

    #[test]
    fn test_unlabeled_column_is_not_placed() {
        let store = NodeStore::from_nodes(vec![node("a", 0), node("b", 2)], 3);
        let columns = arrange_columns(&store, &["Only", "Two"]);
        let placed: usize = columns.iter().map(|c| c.node_ids.len()).sum();
        assert_eq!(placed, 1);
    }
}
