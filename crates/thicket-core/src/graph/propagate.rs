//! Bottom-up propagation of cascading state and sort keys.
//!
//! Both passes are post-order: a node's values depend only on its own issue
//! and its children's final values. They share one walk per root. A node
//! reachable from several parents is finished the first time it is reached;
//! later visits reuse its results, since they cannot differ.
//!
//! Children are sorted as soon as their parent's key is final, so after the
//! walk every `children` list is in display order.

use super::node::{Node, NodeId, SortKey, display_order};

/// Per-build knobs for the propagation walk.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Propagation {
    /// Force `expanded` on ancestors of in-progress work.
    pub(crate) auto_expand: bool,
}

/// Propagate state and sort keys below every root, then sort the roots.
pub(crate) fn propagate(nodes: &mut [Node], roots: &mut [NodeId], opts: Propagation) {
    let mut done = vec![false; nodes.len()];
    let mut stack: Vec<(NodeId, usize)> = Vec::new();

    for &root in roots.iter() {
        if done[root.0] {
            continue;
        }
        nodes[root.0].depth = 0;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            if let Some(&child) = nodes[node.0].children.get(cursor) {
                frame.1 += 1;
                if !done[child.0] {
                    nodes[child.0].depth = nodes[node.0].depth + 1;
                    stack.push((child, 0));
                }
                continue;
            }

            finish_node(nodes, node, opts);
            done[node.0] = true;
            stack.pop();
        }
    }

    roots.sort_by(|a, b| display_order(&nodes[a.0], &nodes[b.0]));
}

/// Aggregate state and sort key from finished children, then order them.
fn finish_node(nodes: &mut [Node], id: NodeId, opts: Propagation) {
    let mut children = std::mem::take(&mut nodes[id.0].children);

    let child_in_progress = children.iter().any(|c| nodes[c.0].has_in_progress);
    let child_ready = children.iter().any(|c| nodes[c.0].has_ready);
    let child_open = children.iter().any(|c| nodes[c.0].has_open);
    let best_child = children.iter().map(|c| nodes[c.0].sort_key()).min();

    let node = &nodes[id.0];
    let own_key = SortKey::own(&node.issue, node.is_blocked);
    let own_ready = node.issue.status.is_open() && !node.is_blocked;
    let own_in_progress = node.issue.status.is_in_progress();
    let key = best_child.map_or(own_key, |child| own_key.min(child));

    children.sort_by(|a, b| display_order(&nodes[a.0], &nodes[b.0]));

    let node = &mut nodes[id.0];
    node.has_in_progress = own_in_progress || child_in_progress;
    node.has_ready = own_ready || child_ready;
    node.has_open = !node.issue.status.is_closed() || child_open;
    if child_in_progress && opts.auto_expand {
        node.expanded = true;
    }
    node.sort_priority = key.priority;
    node.sort_timestamp = key.timestamp;
    node.children = children;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::PriorityClass;
    use crate::graph::{hierarchy, link};
    use crate::model::{Issue, Status};

    const AUTO: Propagation = Propagation { auto_expand: true };

    fn run(issues: &[Issue], opts: Propagation) -> (link::Index, Vec<NodeId>) {
        let mut index = link::index(issues);
        link::link(&mut index);
        link::dedup_parents(&mut index.nodes);
        let mut roots = hierarchy::assemble(&mut index.nodes);
        propagate(&mut index.nodes, &mut roots, opts);
        (index, roots)
    }

    fn get<'a>(index: &'a link::Index, id: &str) -> &'a Node {
        &index.nodes[index.by_id[id].0]
    }

    fn names(index: &link::Index, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|i| index.nodes[i.0].issue.id.clone())
            .collect()
    }

    #[test]
    fn in_progress_child_marks_and_expands_ancestors() {
        let (index, _) = run(
            &[
                Issue::new("r", "Root", Status::Open),
                Issue::new("m", "Mid", Status::Open).depends_on("r", "parent-child"),
                Issue::new("a", "Active", Status::InProgress).depends_on("m", "parent-child"),
            ],
            AUTO,
        );
        for id in ["r", "m", "a"] {
            assert!(get(&index, id).has_in_progress, "{id} should carry in-progress");
        }
        assert!(get(&index, "r").expanded);
        assert!(get(&index, "m").expanded);
        // Own status alone does not expand.
        assert!(!get(&index, "a").expanded);
    }

    #[test]
    fn auto_expand_can_be_disabled() {
        let (index, _) = run(
            &[
                Issue::new("r", "Root", Status::Open),
                Issue::new("a", "Active", Status::InProgress).depends_on("r", "parent-child"),
            ],
            Propagation { auto_expand: false },
        );
        assert!(get(&index, "r").has_in_progress);
        assert!(!get(&index, "r").expanded);
    }

    #[test]
    fn ready_requires_open_and_unblocked() {
        let (index, _) = run(
            &[
                Issue::new("blocked", "Blocked", Status::Open).depends_on("gate", "blocks"),
                Issue::new("gate", "Gate", Status::InProgress),
                Issue::new("deferred", "Deferred", Status::Deferred),
                Issue::new("closed", "Closed", Status::Closed),
            ],
            AUTO,
        );
        assert!(!get(&index, "blocked").has_ready);
        assert!(!get(&index, "gate").has_ready);
        assert!(!get(&index, "deferred").has_ready);
        assert!(!get(&index, "closed").has_ready);
    }

    #[test]
    fn ready_descendant_bubbles_up_through_closed_parent() {
        let (index, _) = run(
            &[
                Issue::new("epic", "Epic", Status::Closed),
                Issue::new("task", "Task", Status::Open).depends_on("epic", "parent-child"),
            ],
            AUTO,
        );
        let epic = get(&index, "epic");
        assert!(epic.has_ready);
        assert!(!epic.has_in_progress);
        assert_eq!(epic.sort_priority, PriorityClass::Ready);
    }

    #[test]
    fn open_work_bubbles_up_even_when_not_ready() {
        let (index, _) = run(
            &[
                Issue::new("epic", "Epic", Status::Closed),
                Issue::new("later", "Later", Status::Deferred).depends_on("epic", "parent-child"),
                Issue::new("done", "Done", Status::Closed),
                Issue::new("done-sub", "Done sub", Status::Closed).depends_on("done", "parent-child"),
            ],
            AUTO,
        );
        assert!(get(&index, "epic").has_open);
        assert!(!get(&index, "epic").has_ready);
        assert!(!get(&index, "done").has_open);
    }

    #[test]
    fn depth_counts_from_the_walk_root() {
        let (index, _) = run(
            &[
                Issue::new("r", "R", Status::Open),
                Issue::new("c", "C", Status::Open).depends_on("r", "parent-child"),
                Issue::new("g", "G", Status::Open).depends_on("c", "parent-child"),
            ],
            AUTO,
        );
        assert_eq!(get(&index, "r").depth, 0);
        assert_eq!(get(&index, "c").depth, 1);
        assert_eq!(get(&index, "g").depth, 2);
    }

    #[test]
    fn parent_inherits_most_urgent_descendant_key() {
        let (index, _) = run(
            &[
                Issue::new("p", "Parent", Status::Open).created("2023-01-01T00:00:00Z"),
                Issue::new("c", "Child", Status::InProgress)
                    .created("2023-06-01T00:00:00Z")
                    .updated("2024-01-03T00:00:00Z")
                    .depends_on("p", "parent-child"),
            ],
            AUTO,
        );
        let parent = get(&index, "p");
        assert_eq!(parent.sort_priority, PriorityClass::InProgress);
        assert_eq!(parent.sort_timestamp, get(&index, "c").sort_timestamp);
    }

    #[test]
    fn siblings_sort_by_class_then_time_then_id() {
        let (index, _) = run(
            &[
                Issue::new("root", "Root", Status::Open),
                Issue::new("z-closed", "Z", Status::Closed)
                    .closed("2020-01-01T00:00:00Z")
                    .depends_on("root", "parent-child"),
                Issue::new("b-ready", "B", Status::Open)
                    .created("2024-01-01T00:00:00Z")
                    .depends_on("root", "parent-child"),
                Issue::new("a-ready", "A", Status::Open)
                    .created("2024-01-01T00:00:00Z")
                    .depends_on("root", "parent-child"),
                Issue::new("c-early", "C", Status::Open)
                    .created("2023-01-01T00:00:00Z")
                    .depends_on("root", "parent-child"),
                Issue::new("d-active", "D", Status::InProgress).depends_on("root", "parent-child"),
            ],
            AUTO,
        );
        let root = get(&index, "root");
        assert_eq!(
            names(&index, &root.children),
            vec!["d-active", "c-early", "a-ready", "b-ready", "z-closed"]
        );
    }

    #[test]
    fn shared_child_is_finished_once_and_sorted_under_both_parents() {
        let (index, roots) = run(
            &[
                Issue::new("p1", "P1", Status::Open).created("2024-01-01T00:00:00Z"),
                Issue::new("p2", "P2", Status::Open).created("2024-01-02T00:00:00Z"),
                Issue::new("shared", "Shared", Status::InProgress)
                    .depends_on("p1", "parent-child")
                    .depends_on("p2", "parent-child"),
            ],
            AUTO,
        );
        assert_eq!(names(&index, &roots), vec!["p1", "p2"]);
        for parent in ["p1", "p2"] {
            let node = get(&index, parent);
            assert!(node.has_in_progress);
            assert!(node.expanded);
            assert_eq!(node.sort_priority, PriorityClass::InProgress);
        }
    }
}
