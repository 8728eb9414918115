//! Indexing issues into the arena and resolving their typed references.
//!
//! Every reference is resolved against the ID index built from the same
//! snapshot. References to IDs outside the snapshot are dropped, since an
//! export routinely omits archived or filtered issues.
//!
//! Parent-child links may be declared twice: once on the child
//! (`dependencies`) and once on the parent (`dependents`). Both paths land
//! in the same `parents` list, which is deduplicated afterwards.

use std::collections::HashMap;

use tracing::{trace, warn};

use super::node::{Node, NodeId};
use crate::model::{DependencyType, Issue};

/// Arena plus its ID lookup, before any edges are resolved.
pub(crate) struct Index {
    pub(crate) nodes: Vec<Node>,
    pub(crate) by_id: HashMap<String, NodeId>,
}

/// Wrap each issue in a node. The first record wins on duplicate IDs.
pub(crate) fn index(issues: &[Issue]) -> Index {
    let mut nodes = Vec::with_capacity(issues.len());
    let mut by_id = HashMap::with_capacity(issues.len());

    for issue in issues {
        if by_id.contains_key(&issue.id) {
            warn!(id = %issue.id, "duplicate issue id in export, keeping first record");
            continue;
        }
        let id = NodeId(nodes.len());
        by_id.insert(issue.id.clone(), id);
        nodes.push(Node::new(issue.clone()));
    }

    Index { nodes, by_id }
}

/// Resolve every dependency and parent-child dependent into node edges.
pub(crate) fn link(index: &mut Index) {
    let Index { nodes, by_id } = index;

    for current in (0..nodes.len()).map(NodeId) {
        // Clone the declarations out so the arena can be mutated freely.
        let dependencies = nodes[current.0].issue.dependencies.clone();
        for dep in &dependencies {
            let Some(&target) = by_id.get(&dep.target_id) else {
                trace!(
                    from = %nodes[current.0].issue.id,
                    to = %dep.target_id,
                    kind = %dep.kind,
                    "dropping reference to unknown issue"
                );
                continue;
            };

            match dep.kind {
                DependencyType::ParentChild => {
                    nodes[current.0].parents.push(target);
                }
                DependencyType::Blocks => {
                    let blocker_open = !nodes[target.0].issue.status.is_closed();
                    let blocked = &mut nodes[current.0];
                    push_unique(&mut blocked.blocked_by, target);
                    if blocker_open {
                        blocked.is_blocked = true;
                    }
                    push_unique(&mut nodes[target.0].blocks, current);
                }
                DependencyType::Related => {
                    push_unique(&mut nodes[current.0].related, target);
                    push_unique(&mut nodes[target.0].related, current);
                }
                DependencyType::DiscoveredFrom => {
                    push_unique(&mut nodes[current.0].discovered_from, target);
                }
                DependencyType::Other(ref kind) => {
                    trace!(from = %nodes[current.0].issue.id, kind = %kind, "ignoring dependency type");
                }
            }
        }

        let dependents = nodes[current.0].issue.dependents.clone();
        for dependent in dependents
            .iter()
            .filter(|d| d.kind == DependencyType::ParentChild)
        {
            match by_id.get(&dependent.id) {
                Some(&child) => nodes[child.0].parents.push(current),
                None => trace!(
                    parent = %nodes[current.0].issue.id,
                    child = %dependent.id,
                    "dropping dependent reference to unknown issue"
                ),
            }
        }
    }
}

/// Remove repeated parents, keeping first-seen order.
pub(crate) fn dedup_parents(nodes: &mut [Node]) {
    for node in nodes {
        let mut seen = Vec::with_capacity(node.parents.len());
        node.parents.retain(|p| {
            if seen.contains(p) {
                false
            } else {
                seen.push(*p);
                true
            }
        });
    }
}

fn push_unique(list: &mut Vec<NodeId>, id: NodeId) {
    if !list.contains(&id) {
        list.push(id);
    }
}
