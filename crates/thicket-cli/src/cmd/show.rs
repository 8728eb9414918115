//! `thicket show` — one issue with its links and computed state.

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::SecondsFormat;
use clap::Args;
use serde::Serialize;
use thicket_core::error::ErrorCode;
use thicket_core::graph::{Forest, Node, NodeId};
use thicket_core::model::DISTANT_FUTURE;

use super::Context;
use crate::output::{CliError, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `thicket show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Issue ID to show.
    pub id: String,

    /// Issue export to read (JSON array or JSON Lines).
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

/// Report payload for `thicket show`.
#[derive(Debug, Serialize)]
pub struct ShowPayload {
    pub id: String,
    pub title: String,
    pub status: String,
    pub issue_type: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub priority: i32,
    pub assignee: Option<String>,
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    pub children: Vec<String>,
    pub blocked_by: Vec<String>,
    pub blocks: Vec<String>,
    pub related: Vec<String>,
    pub discovered_from: Vec<String>,
    pub is_blocked: bool,
    pub expanded: bool,
    pub depth: usize,
    pub tree_depth: usize,
    pub has_in_progress: bool,
    pub has_ready: bool,
    pub sort_priority: &'static str,
    pub sort_timestamp: Option<String>,
}

impl ShowPayload {
    fn new(forest: &Forest, node: &Node) -> Self {
        let issue = node.issue();
        let ids = |handles: &[NodeId]| -> Vec<String> {
            forest
                .issue_ids(handles)
                .into_iter()
                .map(str::to_string)
                .collect()
        };
        let timestamp = node.sort_timestamp();
        Self {
            id: issue.id.clone(),
            title: issue.title.clone(),
            status: issue.status.to_string(),
            issue_type: (!issue.issue_type.is_empty()).then(|| issue.issue_type.clone()),
            description: issue.description.clone(),
            priority: issue.priority,
            assignee: issue.assignee.clone(),
            labels: issue.labels.clone(),
            parents: ids(node.parents()),
            children: ids(node.children()),
            blocked_by: ids(node.blocked_by()),
            blocks: ids(node.blocks()),
            related: ids(node.related()),
            discovered_from: ids(node.discovered_from()),
            is_blocked: node.is_blocked(),
            expanded: node.is_expanded(),
            depth: node.depth(),
            tree_depth: node.tree_depth(),
            has_in_progress: node.has_in_progress(),
            has_ready: node.has_ready(),
            sort_priority: node.sort_priority().as_str(),
            sort_timestamp: (timestamp != DISTANT_FUTURE)
                .then(|| timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }

    /// Link lists with their labels, in display order.
    fn links(&self) -> [(&'static str, &[String]); 6] {
        [
            ("Parents", self.parents.as_slice()),
            ("Children", self.children.as_slice()),
            ("Blocked by", self.blocked_by.as_slice()),
            ("Blocks", self.blocks.as_slice()),
            ("Related", self.related.as_slice()),
            ("Found in", self.discovered_from.as_slice()),
        ]
    }
}

/// Execute `thicket show`.
pub fn run_show(args: &ShowArgs, ctx: &Context<'_>) -> anyhow::Result<()> {
    let forest = ctx.load_forest(args.file.as_deref())?;
    let Some(node) = forest.get(&args.id) else {
        render_error(
            ctx.output,
            &CliError::with_details(
                format!("issue '{}' not found", args.id),
                "run `thicket tree --all` to list known issues",
                ErrorCode::ItemNotFound,
            ),
        )?;
        anyhow::bail!("issue '{}' not found", args.id);
    };

    let payload = ShowPayload::new(&forest, node);
    render_mode(ctx.output, &payload, write_text, write_pretty)
}

fn write_pretty(p: &ShowPayload, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("{}  {}", p.id, p.title))?;
    pretty_kv(w, "Status", &p.status)?;
    if let Some(ref kind) = p.issue_type {
        pretty_kv(w, "Type", kind)?;
    }
    pretty_kv(w, "Priority", format!("P{}", p.priority))?;
    if let Some(ref assignee) = p.assignee {
        pretty_kv(w, "Assignee", assignee)?;
    }
    if !p.labels.is_empty() {
        pretty_kv(w, "Labels", p.labels.join(", "))?;
    }
    if p.is_blocked {
        pretty_kv(w, "Blocked", "yes")?;
    }
    if !p.description.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}", p.description.trim_end())?;
    }

    writeln!(w)?;
    pretty_section(w, "Links")?;
    let mut any = false;
    for (label, ids) in p.links() {
        if !ids.is_empty() {
            pretty_kv(w, label, ids.join(", "))?;
            any = true;
        }
    }
    if !any {
        writeln!(w, "(none)")?;
    }

    writeln!(w)?;
    pretty_section(w, "Ranking")?;
    pretty_kv(w, "Class", p.sort_priority)?;
    pretty_kv(w, "Since", p.sort_timestamp.as_deref().unwrap_or("-"))?;
    pretty_kv(w, "Depth", p.tree_depth.to_string())?;
    let mut flags = Vec::new();
    if p.has_in_progress {
        flags.push("in progress below");
    }
    if p.has_ready {
        flags.push("ready below");
    }
    if !flags.is_empty() {
        pretty_kv(w, "Subtree", flags.join(", "))?;
    }
    Ok(())
}

fn write_text(p: &ShowPayload, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}  {}  {}", p.id, p.status, p.title)?;
    for (label, ids) in p.links() {
        if !ids.is_empty() {
            writeln!(w, "{}: {}", label.to_ascii_lowercase(), ids.join(" "))?;
        }
    }
    writeln!(
        w,
        "rank: {} {}",
        p.sort_priority,
        p.sort_timestamp.as_deref().unwrap_or("-")
    )
}
