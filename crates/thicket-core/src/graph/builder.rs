//! Build orchestration: issue snapshot in, sorted forest out.

use tracing::{debug, instrument};

use super::cycles::{self, CycleError};
use super::forest::Forest;
use super::propagate::{self, Propagation};
use super::{hierarchy, link};
use crate::error::ErrorCode;
use crate::model::Issue;

/// Reasons a build can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The parent-child hierarchy contains a loop; no forest exists.
    #[error(transparent)]
    Cycle(#[from] CycleError),
}

impl BuildError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Cycle(_) => ErrorCode::CycleDetected,
        }
    }
}

/// Builds a [`Forest`] from a flat issue snapshot.
///
/// Every call starts from scratch; nothing is carried over between builds.
///
/// ```rust,ignore
/// use thicket_core::graph::GraphBuilder;
///
/// let forest = GraphBuilder::new().build(&issues)?;
/// for root in forest.root_nodes() {
///     println!("{} {}", root.id(), root.issue().title);
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    auto_expand: bool,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self { auto_expand: true }
    }
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether ancestors of in-progress work start expanded (default on).
    #[must_use]
    pub const fn auto_expand(mut self, enabled: bool) -> Self {
        self.auto_expand = enabled;
        self
    }

    /// Index, link, validate, assemble, and propagate.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Cycle`] if following parent links from any
    /// issue leads back to it.
    #[instrument(skip_all, fields(issues = issues.len()))]
    pub fn build(&self, issues: &[Issue]) -> Result<Forest, BuildError> {
        if issues.is_empty() {
            return Ok(Forest::default());
        }

        let mut index = link::index(issues);
        link::link(&mut index);
        link::dedup_parents(&mut index.nodes);

        cycles::check_parent_cycles(&index.nodes)?;

        let link::Index { mut nodes, by_id } = index;
        hierarchy::compute_tree_depths(&mut nodes);
        let mut roots = hierarchy::assemble(&mut nodes);
        hierarchy::sort_blocks(&mut nodes);
        propagate::propagate(
            &mut nodes,
            &mut roots,
            Propagation {
                auto_expand: self.auto_expand,
            },
        );

        debug!(nodes = nodes.len(), roots = roots.len(), "forest built");
        Ok(Forest {
            nodes,
            by_id,
            roots,
        })
    }
}

/// Build with default options.
///
/// # Errors
///
/// See [`GraphBuilder::build`].
pub fn build_forest(issues: &[Issue]) -> Result<Forest, BuildError> {
    GraphBuilder::new().build(issues)
}
