//! Issue forest construction.
//!
//! A build runs a fixed pipeline over one issue snapshot:
//!
//! 1. `link`: index issues into a node arena and resolve typed references
//!    (parent-child, blocks, related, discovered-from).
//! 2. [`cycles`]: reject loops in the parent-child hierarchy.
//! 3. `hierarchy`: compute hierarchy depth, attach children to every parent,
//!    collect roots.
//! 4. `propagate`: roll up in-progress/ready state and sort keys from the
//!    leaves, ordering siblings and roots on the way.
//!
//! The entry point is [`GraphBuilder::build`], producing a [`Forest`].

pub mod builder;
pub mod cycles;
pub mod forest;
mod hierarchy;
mod link;
pub mod node;
mod propagate;

pub use builder::{BuildError, GraphBuilder, build_forest};
pub use cycles::CycleError;
pub use forest::{Forest, ForestStats, Row, RowOptions};
pub use node::{Node, NodeId, PriorityClass, SortKey};
