//! Issue records as they arrive from a tracker export.

pub mod issue;

pub use issue::{
    Comment, DISTANT_FUTURE, Dependency, DependencyType, Dependent, Issue, Status,
    first_parseable, parse_timestamp,
};
