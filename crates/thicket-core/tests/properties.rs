//! Property tests for forest construction.
//!
//! Random issue sets are generated with parent links, blocking links,
//! statuses, and a mix of valid, missing, and malformed timestamps.

use std::collections::{HashMap, HashSet};

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use proptest::prelude::*;
use thicket_core::graph::{Forest, build_forest};
use thicket_core::model::{Issue, Status};

// ===========================================================================
// Strategies
// ===========================================================================

fn status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Open),
        Just(Status::InProgress),
        Just(Status::Closed),
        Just(Status::Blocked),
        Just(Status::Deferred),
    ]
}

fn timestamp() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("garbage".to_string())),
        (2020u32..2026, 1u32..13, 1u32..29)
            .prop_map(|(y, m, d)| Some(format!("{y:04}-{m:02}-{d:02}T12:00:00Z"))),
    ]
}

#[derive(Debug, Clone)]
struct Shape {
    status: Status,
    created: Option<String>,
    updated: Option<String>,
    closed: Option<String>,
    /// Raw parent picks; interpretation depends on the generator.
    parents: Vec<usize>,
    blockers: Vec<usize>,
    /// Declare the first parent link from the parent's side too.
    mirror: bool,
}

fn shape() -> impl Strategy<Value = Shape> {
    (
        status(),
        timestamp(),
        timestamp(),
        timestamp(),
        prop::collection::vec(0usize..64, 0..4),
        prop::collection::vec(0usize..64, 0..3),
        any::<bool>(),
    )
        .prop_map(|(status, created, updated, closed, parents, blockers, mirror)| Shape {
            status,
            created,
            updated,
            closed,
            parents,
            blockers,
            mirror,
        })
}

fn name(i: usize) -> String {
    format!("tk-{i:03}")
}

/// Turn shapes into issues. With `acyclic`, parent picks are folded into
/// lower indices so the hierarchy cannot loop.
fn issues_from(shapes: &[Shape], acyclic: bool) -> Vec<Issue> {
    let n = shapes.len();
    let mut issues: Vec<Issue> = shapes
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let mut issue = Issue::new(name(i), format!("Issue {i}"), s.status.clone());
            issue.created_at.clone_from(&s.created);
            issue.updated_at.clone_from(&s.updated);
            issue.closed_at.clone_from(&s.closed);
            issue
        })
        .collect();

    for (i, s) in shapes.iter().enumerate() {
        for (k, &pick) in s.parents.iter().enumerate() {
            let parent = if acyclic {
                if i == 0 {
                    continue;
                }
                pick % i
            } else {
                pick % n
            };
            if k == 0 && s.mirror {
                issues[parent] = issues[parent].clone().dependent(name(i), "parent-child");
            }
            issues[i] = issues[i].clone().depends_on(name(parent), "parent-child");
        }
        for &pick in &s.blockers {
            issues[i] = issues[i].clone().depends_on(name(pick % n), "blocks");
        }
    }
    issues
}

/// Everything that must be identical between equivalent builds.
fn signature(forest: &Forest) -> Vec<(String, Vec<String>, String)> {
    let mut sig: Vec<(String, Vec<String>, String)> = forest
        .nodes()
        .map(|(id, node)| {
            let children = forest.children(id).map(|c| c.id().to_string()).collect();
            let key = format!("{:?}", node.sort_key());
            (node.id().to_string(), children, key)
        })
        .collect();
    sig.sort();
    sig
}

fn root_order(forest: &Forest) -> Vec<String> {
    forest.root_nodes().map(|n| n.id().to_string()).collect()
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn acyclic_input_builds_consistent_forest(shapes in prop::collection::vec(shape(), 1..40)) {
        let issues = issues_from(&shapes, true);
        let forest = build_forest(&issues).expect("acyclic input must build");

        prop_assert_eq!(forest.len(), issues.len());

        let mut appearances: HashMap<String, usize> = HashMap::new();
        for (id, node) in forest.nodes() {
            let parent_ids: HashSet<&str> = forest.issue_ids(node.parents()).into_iter().collect();
            prop_assert_eq!(parent_ids.len(), node.parents().len(), "duplicate parent on {}", node.id());

            let children = forest.issue_ids(node.children());
            let unique: HashSet<&&str> = children.iter().collect();
            prop_assert_eq!(unique.len(), children.len(), "duplicate child under {}", node.id());
            for child in children {
                *appearances.entry(child.to_string()).or_default() += 1;
            }

            prop_assert_eq!(node.is_root(), forest.roots().contains(&id));
            prop_assert_eq!(node.parent(), node.parents().first().copied());
        }
        for (_, node) in forest.nodes() {
            let seen = appearances.get(node.id()).copied().unwrap_or(0);
            prop_assert_eq!(seen, node.parents().len(), "{} listed wrong number of times", node.id());
        }
    }

    #[test]
    fn child_keys_never_beat_their_parent(shapes in prop::collection::vec(shape(), 1..40)) {
        let forest = build_forest(&issues_from(&shapes, true)).expect("build");
        for (id, node) in forest.nodes() {
            for child in forest.children(id) {
                prop_assert!(node.sort_key() <= child.sort_key());
                if child.has_in_progress() {
                    prop_assert!(node.has_in_progress() && node.is_expanded());
                }
                if child.has_ready() {
                    prop_assert!(node.has_ready());
                }
            }
        }
    }

    #[test]
    fn builds_are_idempotent_and_order_independent(
        shapes in prop::collection::vec(shape(), 1..30),
        seed in any::<u64>(),
    ) {
        let issues = issues_from(&shapes, true);
        let first = build_forest(&issues).expect("build");
        let second = build_forest(&issues).expect("build");
        prop_assert_eq!(signature(&first), signature(&second));
        prop_assert_eq!(root_order(&first), root_order(&second));

        // Rotate by a seed-derived amount; display order must not change.
        let mut rotated = issues.clone();
        let shift = usize::try_from(seed % rotated.len() as u64).unwrap_or(0);
        rotated.rotate_left(shift);
        let third = build_forest(&rotated).expect("build");
        prop_assert_eq!(signature(&first), signature(&third));
        prop_assert_eq!(root_order(&first), root_order(&third));
    }

    #[test]
    fn open_blockers_always_block(shapes in prop::collection::vec(shape(), 1..30)) {
        let forest = build_forest(&issues_from(&shapes, true)).expect("build");
        for (id, node) in forest.nodes() {
            let any_open = node
                .blocked_by()
                .iter()
                .any(|b| !forest.node(*b).issue().status.is_closed());
            prop_assert_eq!(node.is_blocked(), any_open);
            for blocker in node.blocked_by() {
                prop_assert!(forest.node(*blocker).blocks().contains(&id));
            }
        }
    }

    #[test]
    fn build_fails_exactly_when_hierarchy_loops(shapes in prop::collection::vec(shape(), 1..25)) {
        let issues = issues_from(&shapes, false);

        let mut graph = DiGraph::<&str, ()>::new();
        let idx: HashMap<&str, _> = issues
            .iter()
            .map(|i| (i.id.as_str(), graph.add_node(i.id.as_str())))
            .collect();
        for issue in &issues {
            for dep in issue.dependencies.iter().filter(|d| d.kind.as_str() == "parent-child") {
                graph.update_edge(idx[issue.id.as_str()], idx[dep.target_id.as_str()], ());
            }
            for dependent in &issue.dependents {
                graph.update_edge(idx[dependent.id.as_str()], idx[issue.id.as_str()], ());
            }
        }

        match build_forest(&issues) {
            Ok(_) => prop_assert!(!is_cyclic_directed(&graph)),
            Err(thicket_core::BuildError::Cycle(cycle)) => {
                prop_assert!(is_cyclic_directed(&graph));
                prop_assert!(cycle.path.len() >= 2);
                prop_assert_eq!(cycle.path.first(), cycle.path.last());
                // Every step of the reported path follows a real parent edge.
                for pair in cycle.path.windows(2) {
                    prop_assert!(graph.contains_edge(idx[pair[0].as_str()], idx[pair[1].as_str()]));
                }
            }
        }
    }
}
