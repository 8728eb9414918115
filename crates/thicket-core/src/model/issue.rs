use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an issue.
///
/// Known values map to dedicated variants; anything else is preserved
/// verbatim in [`Status::Other`] so exports from newer trackers still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Blocked,
    Deferred,
    Closed,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Deferred => "deferred",
            Self::Closed => "closed",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "open" => Self::Open,
            "in_progress" => Self::InProgress,
            "blocked" => Self::Blocked,
            "deferred" => Self::Deferred,
            "closed" => Self::Closed,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for Status {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed relationship between two issues.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DependencyType {
    /// Hierarchy: the target is a parent of the declaring issue.
    ParentChild,
    /// Ordering: the target blocks the declaring issue.
    Blocks,
    /// Symmetric association.
    Related,
    /// Provenance: the declaring issue was discovered while working the target.
    DiscoveredFrom,
    Other(String),
}

impl DependencyType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ParentChild => "parent-child",
            Self::Blocks => "blocks",
            Self::Related => "related",
            Self::DiscoveredFrom => "discovered-from",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for DependencyType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "parent-child" => Self::ParentChild,
            "blocks" => Self::Blocks,
            "related" => Self::Related,
            "discovered-from" => Self::DiscoveredFrom,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for DependencyType {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<DependencyType> for String {
    fn from(kind: DependencyType) -> Self {
        match kind {
            DependencyType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing typed reference declared by an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(rename = "depends_on_id", alias = "target_id")]
    pub target_id: String,
    #[serde(rename = "type", alias = "dependency_type")]
    pub kind: DependencyType,
}

impl Dependency {
    pub fn new(target_id: impl Into<String>, kind: impl Into<DependencyType>) -> Self {
        Self {
            target_id: target_id.into(),
            kind: kind.into(),
        }
    }
}

/// Incoming typed reference: another issue that depends on this one.
///
/// Only `parent-child` dependents are consulted when building the forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    pub id: String,
    #[serde(rename = "dependency_type", alias = "type")]
    pub kind: DependencyType,
}

impl Dependent {
    pub fn new(id: impl Into<String>, kind: impl Into<DependencyType>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub id: i64,
    pub author: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// One issue record as produced by a tracker export.
///
/// Timestamps stay as raw strings: the export is not trusted to carry valid
/// RFC 3339, and ordering code falls back per field when parsing fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub design: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub acceptance_criteria: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    pub status: Status,
    pub priority: i32,
    pub issue_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub labels: Vec<String>,
    pub comments: Vec<Comment>,
    pub dependencies: Vec<Dependency>,
    pub dependents: Vec<Dependent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
}

impl Issue {
    /// Minimal issue with the given ID, title, and status.
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: impl Into<Status>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: status.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn created(mut self, ts: impl Into<String>) -> Self {
        self.created_at = Some(ts.into());
        self
    }

    #[must_use]
    pub fn updated(mut self, ts: impl Into<String>) -> Self {
        self.updated_at = Some(ts.into());
        self
    }

    #[must_use]
    pub fn closed(mut self, ts: impl Into<String>) -> Self {
        self.closed_at = Some(ts.into());
        self
    }

    #[must_use]
    pub fn depends_on(mut self, target_id: impl Into<String>, kind: impl Into<DependencyType>) -> Self {
        self.dependencies.push(Dependency::new(target_id, kind));
        self
    }

    #[must_use]
    pub fn dependent(mut self, id: impl Into<String>, kind: impl Into<DependencyType>) -> Self {
        self.dependents.push(Dependent::new(id, kind));
        self
    }

    pub fn created_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created_at.as_deref())
    }

    pub fn updated_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.updated_at.as_deref())
    }

    pub fn closed_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.closed_at.as_deref())
    }
}

/// Sentinel for missing or malformed timestamps; sorts after every real one.
pub const DISTANT_FUTURE: DateTime<Utc> = DateTime::<Utc>::MAX_UTC;

/// Parse an RFC 3339 timestamp, normalizing to UTC.
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// First candidate that parses, or [`DISTANT_FUTURE`].
pub fn first_parseable(candidates: &[Option<DateTime<Utc>>]) -> DateTime<Utc> {
    candidates
        .iter()
        .find_map(|ts| *ts)
        .unwrap_or(DISTANT_FUTURE)
}
