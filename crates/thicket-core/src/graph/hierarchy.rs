//! Hierarchy depth and forest assembly.
//!
//! Assembly attaches each node under *every* parent, so a node with k
//! parents is listed in k `children` lists while remaining a single arena
//! entry. Roots are the nodes without parents.

use super::node::{Node, NodeId};
use crate::model::DISTANT_FUTURE;

/// Fill `tree_depth` for every node: 0 for roots, otherwise one more than
/// the deepest parent.
///
/// A parent that is already on the current walk contributes nothing, which
/// keeps the function total even on unvalidated input.
pub(crate) fn compute_tree_depths(nodes: &mut [Node]) {
    let mut memo: Vec<Option<usize>> = vec![None; nodes.len()];
    let mut on_path = vec![false; nodes.len()];
    let mut stack: Vec<(NodeId, usize)> = Vec::new();

    for start in 0..nodes.len() {
        if memo[start].is_some() {
            continue;
        }
        on_path[start] = true;
        stack.push((NodeId(start), 0));

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            if let Some(&parent) = nodes[node.0].parents.get(cursor) {
                frame.1 += 1;
                if memo[parent.0].is_none() && !on_path[parent.0] {
                    on_path[parent.0] = true;
                    stack.push((parent, 0));
                }
                continue;
            }

            let depth = nodes[node.0]
                .parents
                .iter()
                .filter_map(|p| memo[p.0])
                .max()
                .map_or(0, |deepest| deepest + 1);
            memo[node.0] = Some(depth);
            on_path[node.0] = false;
            stack.pop();
        }
    }

    for (node, depth) in nodes.iter_mut().zip(memo) {
        node.tree_depth = depth.unwrap_or(0);
    }
}

/// Attach every node to each of its parents and collect the roots in
/// arena order.
pub(crate) fn assemble(nodes: &mut [Node]) -> Vec<NodeId> {
    let mut roots = Vec::new();

    for id in (0..nodes.len()).map(NodeId) {
        let parents = nodes[id.0].parents.clone();
        nodes[id.0].parent = parents.first().copied();

        if parents.is_empty() {
            roots.push(id);
            continue;
        }
        for parent in parents {
            let children = &mut nodes[parent.0].children;
            if !children.contains(&id) {
                children.push(id);
            }
        }
    }

    roots
}

/// Order each node's `blocks` list by the blocked issue's creation time.
///
/// Stable, so issues with equal or unparseable timestamps keep link order.
pub(crate) fn sort_blocks(nodes: &mut [Node]) {
    let created: Vec<_> = nodes
        .iter()
        .map(|n| n.issue.created_time().unwrap_or(DISTANT_FUTURE))
        .collect();
    for node in nodes.iter_mut() {
        node.blocks.sort_by_key(|b| created[b.0]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::link;
    use crate::model::{Issue, Status};

    fn prepared(issues: &[Issue]) -> link::Index {
        let mut index = link::index(issues);
        link::link(&mut index);
        link::dedup_parents(&mut index.nodes);
        index
    }

    fn depth_of(index: &link::Index, id: &str) -> usize {
        index.nodes[index.by_id[id].0].tree_depth
    }

    #[test]
    fn tree_depth_uses_longest_ancestor_chain() {
        // r -> a -> b -> leaf, and leaf also directly under r.
        let mut index = prepared(&[
            Issue::new("leaf", "Leaf", Status::Open)
                .depends_on("r", "parent-child")
                .depends_on("b", "parent-child"),
            Issue::new("b", "B", Status::Open).depends_on("a", "parent-child"),
            Issue::new("a", "A", Status::Open).depends_on("r", "parent-child"),
            Issue::new("r", "R", Status::Open),
        ]);
        compute_tree_depths(&mut index.nodes);
        assert_eq!(depth_of(&index, "r"), 0);
        assert_eq!(depth_of(&index, "a"), 1);
        assert_eq!(depth_of(&index, "b"), 2);
        assert_eq!(depth_of(&index, "leaf"), 3);
    }

    #[test]
    fn tree_depth_terminates_on_cycles() {
        let mut index = prepared(&[
            Issue::new("x", "X", Status::Open).depends_on("y", "parent-child"),
            Issue::new("y", "Y", Status::Open).depends_on("x", "parent-child"),
        ]);
        compute_tree_depths(&mut index.nodes);
        assert!(depth_of(&index, "x") <= 2);
        assert!(depth_of(&index, "y") <= 2);
    }

    #[test]
    fn multi_parent_child_is_attached_to_each_parent_once() {
        let mut index = prepared(&[
            Issue::new("p1", "P1", Status::Open).dependent("c", "parent-child"),
            Issue::new("p2", "P2", Status::Open),
            Issue::new("c", "C", Status::Open)
                .depends_on("p1", "parent-child")
                .depends_on("p2", "parent-child"),
        ]);
        let roots = assemble(&mut index.nodes);
        let c = index.by_id["c"];
        let p1 = index.by_id["p1"];
        let p2 = index.by_id["p2"];

        assert_eq!(roots, vec![p1, p2]);
        assert_eq!(index.nodes[p1.0].children, vec![c]);
        assert_eq!(index.nodes[p2.0].children, vec![c]);
        assert_eq!(index.nodes[c.0].parent, Some(p1));
    }

    #[test]
    fn blocks_are_sorted_oldest_first_with_missing_last() {
        let mut index = prepared(&[
            Issue::new("blocker", "Blocker", Status::Open),
            Issue::new("late", "Late", Status::Open)
                .created("2024-05-01T00:00:00Z")
                .depends_on("blocker", "blocks"),
            Issue::new("undated", "Undated", Status::Open).depends_on("blocker", "blocks"),
            Issue::new("early", "Early", Status::Open)
                .created("2024-01-01T00:00:00Z")
                .depends_on("blocker", "blocks"),
        ]);
        sort_blocks(&mut index.nodes);
        let blocker = &index.nodes[index.by_id["blocker"].0];
        let order: Vec<&str> = blocker
            .blocks
            .iter()
            .map(|b| index.nodes[b.0].issue.id.as_str())
            .collect();
        assert_eq!(order, vec!["early", "late", "undated"]);
    }
}
