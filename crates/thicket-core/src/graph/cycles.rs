//! Cycle detection for the parent-child hierarchy.
//!
//! # Overview
//!
//! The hierarchy is a DAG: a node may have several parents, but following
//! parent links must never lead back to the starting node. A loop makes
//! "root" undefined for every member, so a single cycle fails the whole
//! build and no partial forest is returned.
//!
//! # Design
//!
//! - **Parents only**: blocking, related, and provenance edges are not
//!   hierarchy and are never followed here.
//! - **Three-color DFS**: a node on the active stack is gray; reaching a gray
//!   node again is a back edge and closes a cycle.
//! - **Explicit stack**: the walk keeps its own frame stack so very deep
//!   chains cannot exhaust the thread stack.
//! - **O(V+E)**: each node and parent edge is visited at most once.

#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::missing_const_for_fn
)]

use std::fmt;

use super::node::{Node, NodeId};

// ---------------------------------------------------------------------------
// CycleError
// ---------------------------------------------------------------------------

/// A parent-child loop found while validating the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct CycleError {
    /// Issue IDs from the re-entry point to the node that detected the
    /// loop, closed by repeating the re-entry ID.
    ///
    /// If `A` has parent `B`, `B` has parent `C`, and `C` has parent `A`,
    /// a walk starting at `A` reports `["A", "B", "C", "A"]`.
    pub path: Vec<String>,
}

impl CycleError {
    /// Number of distinct issues in the loop.
    pub fn cycle_len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// `true` if an issue is its own parent.
    pub fn is_self_loop(&self) -> bool {
        self.cycle_len() == 1
    }

    /// `true` if two issues are each other's parent.
    pub fn is_mutual(&self) -> bool {
        self.cycle_len() == 2
    }

    /// Whether `id` is a member of the loop.
    pub fn contains(&self, id: &str) -> bool {
        self.path.iter().any(|p| p == id)
    }
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.path.first().map_or("?", String::as_str);
        if self.is_self_loop() {
            write!(f, "cycle detected: '{first}' is its own parent")
        } else if self.is_mutual() {
            let second = self.path.get(1).map_or("?", String::as_str);
            write!(
                f,
                "cycle detected: '{first}' and '{second}' are each other's parent"
            )
        } else {
            write!(
                f,
                "cycle detected ({} issues): {}",
                self.cycle_len(),
                self.path.join(" → ")
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// DFS colors for cycle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not yet visited.
    White,
    /// Currently on the DFS stack.
    Gray,
    /// Fully processed.
    Black,
}

/// Walk every node's parent chain and fail on the first loop.
///
/// Start nodes are tried in arena order, so the reported path is stable
/// for a given input.
///
/// # Errors
///
/// Returns [`CycleError`] carrying the loop's ID path.
pub(crate) fn check_parent_cycles(nodes: &[Node]) -> Result<(), CycleError> {
    let mut color = vec![Color::White; nodes.len()];
    // (node, index of the next parent to explore)
    let mut stack: Vec<(NodeId, usize)> = Vec::new();

    for start in (0..nodes.len()).map(NodeId) {
        if color[start.0] != Color::White {
            continue;
        }
        color[start.0] = Color::Gray;
        stack.push((start, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let Some(&parent) = nodes[node.0].parents.get(cursor) else {
                color[node.0] = Color::Black;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match color[parent.0] {
                Color::White => {
                    color[parent.0] = Color::Gray;
                    stack.push((parent, 0));
                }
                Color::Gray => return Err(cycle_path(nodes, &stack, parent)),
                Color::Black => {}
            }
        }
    }

    Ok(())
}

/// Slice the active stack from the re-entered node and close the loop.
fn cycle_path(nodes: &[Node], stack: &[(NodeId, usize)], reentry: NodeId) -> CycleError {
    let from = stack
        .iter()
        .position(|(id, _)| *id == reentry)
        .unwrap_or(0);
    let mut path: Vec<String> = stack[from..]
        .iter()
        .map(|(id, _)| nodes[id.0].issue.id.clone())
        .collect();
    path.push(nodes[reentry.0].issue.id.clone());
    CycleError { path }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
