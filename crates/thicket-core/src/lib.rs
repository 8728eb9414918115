//! thicket-core library.
//!
//! Turns a flat issue export into a multi-rooted forest: parent-child links
//! become a DAG of shared nodes, blocking links mark issues as blocked, and
//! every node carries rolled-up in-progress/ready flags plus a sort key that
//! puts the most urgent work first.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` types in the library, `anyhow::Result` at I/O
//!   boundaries.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod model;

pub use graph::{BuildError, Forest, GraphBuilder, build_forest};
pub use model::Issue;
