//! Node arena entries and the ordering key they carry.

#![allow(clippy::must_use_candidate, clippy::missing_const_for_fn)]

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use crate::model::{DISTANT_FUTURE, Issue, first_parseable};

/// Stable handle into a [`Forest`](super::Forest) arena.
///
/// Handles are only meaningful for the forest that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Urgency bucket used as the primary sort key, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityClass {
    InProgress = 1,
    Ready = 2,
    OpenOther = 3,
    Closed = 4,
}

impl PriorityClass {
    pub const fn rank(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Ready => "ready",
            Self::OpenOther => "open",
            Self::Closed => "closed",
        }
    }
}

/// `(priority class, timestamp)`; the derived ordering is lexicographic,
/// so `min` picks the most urgent, then the oldest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SortKey {
    pub priority: PriorityClass,
    pub timestamp: DateTime<Utc>,
}

impl SortKey {
    /// Key derived from the node's own status, ignoring descendants.
    pub fn own(issue: &Issue, is_blocked: bool) -> Self {
        let status = &issue.status;
        if status.is_in_progress() {
            Self {
                priority: PriorityClass::InProgress,
                timestamp: first_parseable(&[issue.updated_time(), issue.created_time()]),
            }
        } else if status.is_closed() {
            Self {
                priority: PriorityClass::Closed,
                timestamp: first_parseable(&[
                    issue.closed_time(),
                    issue.updated_time(),
                    issue.created_time(),
                ]),
            }
        } else if status.is_open() && !is_blocked {
            Self {
                priority: PriorityClass::Ready,
                timestamp: first_parseable(&[issue.created_time()]),
            }
        } else {
            Self {
                priority: PriorityClass::OpenOther,
                timestamp: first_parseable(&[issue.created_time()]),
            }
        }
    }
}

/// One issue plus its resolved edges and computed annotations.
///
/// Everything except `expanded` is fixed once the forest is built; the
/// forest exposes mutation for that flag only.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) issue: Issue,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parents: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) blocked_by: Vec<NodeId>,
    pub(crate) blocks: Vec<NodeId>,
    pub(crate) related: Vec<NodeId>,
    pub(crate) discovered_from: Vec<NodeId>,
    pub(crate) is_blocked: bool,
    pub(crate) expanded: bool,
    pub(crate) depth: usize,
    pub(crate) tree_depth: usize,
    pub(crate) has_in_progress: bool,
    pub(crate) has_ready: bool,
    /// This node or a descendant is not closed.
    pub(crate) has_open: bool,
    pub(crate) sort_priority: PriorityClass,
    pub(crate) sort_timestamp: DateTime<Utc>,
}

impl Node {
    pub(crate) fn new(issue: Issue) -> Self {
        Self {
            issue,
            children: Vec::new(),
            parents: Vec::new(),
            parent: None,
            blocked_by: Vec::new(),
            blocks: Vec::new(),
            related: Vec::new(),
            discovered_from: Vec::new(),
            is_blocked: false,
            expanded: false,
            depth: 0,
            tree_depth: 0,
            has_in_progress: false,
            has_ready: false,
            has_open: false,
            sort_priority: PriorityClass::Closed,
            sort_timestamp: DISTANT_FUTURE,
        }
    }

    pub fn id(&self) -> &str {
        &self.issue.id
    }

    pub fn issue(&self) -> &Issue {
        &self.issue
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    /// First parent, for consumers that only understand single-parent trees.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn blocked_by(&self) -> &[NodeId] {
        &self.blocked_by
    }

    /// Issues this one blocks, oldest first.
    pub fn blocks(&self) -> &[NodeId] {
        &self.blocks
    }

    pub fn related(&self) -> &[NodeId] {
        &self.related
    }

    pub fn discovered_from(&self) -> &[NodeId] {
        &self.discovered_from
    }

    /// `true` if at least one blocker is not closed.
    pub fn is_blocked(&self) -> bool {
        self.is_blocked
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Depth along the propagation walk that first reached this node.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Longest ancestor chain above this node.
    pub fn tree_depth(&self) -> usize {
        self.tree_depth
    }

    pub fn has_in_progress(&self) -> bool {
        self.has_in_progress
    }

    pub fn has_ready(&self) -> bool {
        self.has_ready
    }

    /// Any issue in this subtree, this one included, is not closed.
    pub fn has_open(&self) -> bool {
        self.has_open
    }

    pub fn sort_priority(&self) -> PriorityClass {
        self.sort_priority
    }

    pub fn sort_timestamp(&self) -> DateTime<Utc> {
        self.sort_timestamp
    }

    pub fn sort_key(&self) -> SortKey {
        SortKey {
            priority: self.sort_priority,
            timestamp: self.sort_timestamp,
        }
    }
}

/// Sibling/root comparator: sort key, then issue ID for a total order.
pub(crate) fn display_order(a: &Node, b: &Node) -> Ordering {
    a.sort_key()
        .cmp(&b.sort_key())
        .then_with(|| a.issue.id.cmp(&b.issue.id))
}
