//! The built forest: an arena of nodes plus the ordered root list.

#![allow(clippy::must_use_candidate, clippy::missing_const_for_fn)]

use std::collections::HashMap;

use serde::Serialize;

use super::node::{Node, NodeId};

/// Result of a successful build.
///
/// Nodes live in one arena and reference each other by [`NodeId`]. A node
/// with several parents is stored once and listed in each parent's
/// `children`. Only the `expanded` flag can change after the build.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    pub(crate) nodes: Vec<Node>,
    pub(crate) by_id: HashMap<String, NodeId>,
    pub(crate) roots: Vec<NodeId>,
}

/// Options for [`Forest::rows`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RowOptions {
    /// Descend into every node regardless of its `expanded` flag.
    pub expand_all: bool,
    /// Skip closed nodes whose subtree holds no open issue.
    pub hide_closed: bool,
}

/// One display row of the flattened forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Row {
    pub node: NodeId,
    /// The parent this row is listed under; `None` for roots.
    pub parent: Option<NodeId>,
    /// Nesting level along this particular path.
    pub level: usize,
    /// Last visible sibling under `parent`.
    pub is_last: bool,
    /// Children that pass the row filter, listed or not.
    pub child_count: usize,
    pub has_children: bool,
}

/// Counts over the whole forest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ForestStats {
    pub total: usize,
    pub roots: usize,
    pub in_progress: usize,
    pub ready: usize,
    pub blocked: usize,
    pub closed: usize,
    /// Nodes listed under more than one parent.
    pub multi_parent: usize,
    /// Longest ancestor chain in the forest.
    pub max_depth: usize,
}

impl Forest {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Roots in display order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// # Panics
    ///
    /// Panics if `id` did not come from this forest.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn id_of(&self, issue_id: &str) -> Option<NodeId> {
        self.by_id.get(issue_id).copied()
    }

    pub fn get(&self, issue_id: &str) -> Option<&Node> {
        self.id_of(issue_id).map(|id| &self.nodes[id.0])
    }

    /// All nodes in input order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Root nodes in display order.
    pub fn root_nodes(&self) -> impl Iterator<Item = &Node> {
        self.roots.iter().map(|id| &self.nodes[id.0])
    }

    /// Children of `id` in display order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        self.nodes[id.0].children.iter().map(|c| &self.nodes[c.0])
    }

    /// Resolve a list of handles (e.g. `node.blocks()`) to issue IDs.
    pub fn issue_ids(&self, ids: &[NodeId]) -> Vec<&str> {
        ids.iter().map(|id| self.nodes[id.0].id()).collect()
    }

    /// Set a node's `expanded` flag. Returns `false` for a foreign handle.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) => {
                node.expanded = expanded;
                true
            }
            None => false,
        }
    }

    /// Flip a node's `expanded` flag and return the new value.
    pub fn toggle_expanded(&mut self, id: NodeId) -> Option<bool> {
        let node = self.nodes.get_mut(id.0)?;
        node.expanded = !node.expanded;
        Some(node.expanded)
    }

    /// Expand every node that has children.
    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = node.has_children();
        }
    }

    pub fn collapse_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = false;
        }
    }

    /// Flatten the forest into display rows, pre-order.
    ///
    /// A node listed under k visible, expanded parents yields k rows.
    pub fn rows(&self, opts: RowOptions) -> Vec<Row> {
        let mut rows = Vec::new();
        // Pushed in reverse so siblings pop in display order.
        let mut stack: Vec<Row> = Vec::new();
        push_level(self, &mut stack, &self.roots, None, 0, opts);

        while let Some(row) = stack.pop() {
            rows.push(row);
            let node = &self.nodes[row.node.0];
            if row.has_children && (opts.expand_all || node.expanded) {
                push_level(self, &mut stack, &node.children, Some(row.node), row.level + 1, opts);
            }
        }

        rows
    }

    pub fn stats(&self) -> ForestStats {
        let mut stats = ForestStats {
            total: self.nodes.len(),
            roots: self.roots.len(),
            ..ForestStats::default()
        };
        for node in &self.nodes {
            let status = &node.issue.status;
            if status.is_in_progress() {
                stats.in_progress += 1;
            } else if status.is_closed() {
                stats.closed += 1;
            } else if status.is_open() && !node.is_blocked {
                stats.ready += 1;
            }
            if node.is_blocked && !status.is_closed() {
                stats.blocked += 1;
            }
            if node.parents.len() > 1 {
                stats.multi_parent += 1;
            }
            stats.max_depth = stats.max_depth.max(node.tree_depth);
        }
        stats
    }

    /// Whether `id` passes the row filter in `opts`.
    pub fn is_visible(&self, id: NodeId, opts: RowOptions) -> bool {
        !opts.hide_closed || self.nodes[id.0].has_open
    }

    /// Number of children of `id` that pass the row filter.
    pub fn visible_child_count(&self, id: NodeId, opts: RowOptions) -> usize {
        self.nodes[id.0]
            .children
            .iter()
            .filter(|c| self.is_visible(**c, opts))
            .count()
    }
}

fn push_level(
    forest: &Forest,
    stack: &mut Vec<Row>,
    ids: &[NodeId],
    parent: Option<NodeId>,
    level: usize,
    opts: RowOptions,
) {
    let visible: Vec<NodeId> = ids
        .iter()
        .copied()
        .filter(|id| forest.is_visible(*id, opts))
        .collect();
    let last = visible.len().saturating_sub(1);
    for (i, &id) in visible.iter().enumerate().rev() {
        let child_count = forest.visible_child_count(id, opts);
        stack.push(Row {
            node: id,
            parent,
            level,
            is_last: i == last,
            child_count,
            has_children: child_count > 0,
        });
    }
}
