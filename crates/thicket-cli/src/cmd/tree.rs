//! `thicket tree` — print the issue forest, most urgent work first.
//!
//! Rows follow the forest's expansion state: ancestors of in-progress work
//! start expanded, everything else is collapsed unless `--all` is given.
//! An issue with several parents is printed under each of them.

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::SecondsFormat;
use clap::Args;
use serde::Serialize;
use thicket_core::graph::{Forest, Row, RowOptions};
use thicket_core::model::DISTANT_FUTURE;

use super::Context;
use crate::output::render_mode;

/// Arguments for `thicket tree`.
#[derive(Args, Debug, Default)]
pub struct TreeArgs {
    /// Issue export to read (JSON array or JSON Lines).
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Expand every node, ignoring the computed expansion state.
    #[arg(long)]
    pub all: bool,

    /// Hide closed issues with no open work underneath.
    #[arg(long)]
    pub hide_closed: bool,
}

/// One printed row.
#[derive(Debug, Serialize)]
pub struct TreeRow {
    pub id: String,
    pub title: String,
    pub status: String,
    /// Parent this row is listed under; `None` for roots.
    pub parent: Option<String>,
    pub level: usize,
    pub is_last: bool,
    pub has_children: bool,
    pub expanded: bool,
    pub blocked: bool,
    pub priority: &'static str,
    /// Earliest relevant timestamp in the subtree; `None` when no issue had one.
    pub sort_timestamp: Option<String>,
    /// Children not printed because this row is collapsed. Children hidden
    /// by `--hide-closed` are not counted.
    pub hidden_children: usize,
}

impl TreeRow {
    fn new(forest: &Forest, row: Row, descended: bool) -> Self {
        let node = forest.node(row.node);
        let issue = node.issue();
        let timestamp = node.sort_timestamp();
        Self {
            id: issue.id.clone(),
            title: issue.title.clone(),
            status: issue.status.to_string(),
            parent: row.parent.map(|p| forest.node(p).id().to_string()),
            level: row.level,
            is_last: row.is_last,
            has_children: row.has_children,
            expanded: node.is_expanded(),
            blocked: node.is_blocked(),
            priority: node.sort_priority().as_str(),
            sort_timestamp: (timestamp != DISTANT_FUTURE)
                .then(|| timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)),
            hidden_children: if descended { 0 } else { row.child_count },
        }
    }
}

/// Execute `thicket tree`.
pub fn run_tree(args: &TreeArgs, ctx: &Context<'_>) -> anyhow::Result<()> {
    let forest = ctx.load_forest(args.file.as_deref())?;
    let opts = RowOptions {
        expand_all: args.all,
        hide_closed: args.hide_closed || ctx.config.project.tree.hide_closed,
    };
    let rows = tree_rows(&forest, opts);

    render_mode(
        ctx.output,
        &rows,
        |rows, w| write_text(rows, w),
        |rows, w| write_pretty(rows, w),
    )
}

pub fn tree_rows(forest: &Forest, opts: RowOptions) -> Vec<TreeRow> {
    forest
        .rows(opts)
        .into_iter()
        .map(|row| {
            let descended = opts.expand_all || forest.node(row.node).is_expanded();
            TreeRow::new(forest, row, descended)
        })
        .collect()
}

fn status_marker(row: &TreeRow) -> &'static str {
    match row.status.as_str() {
        "closed" => "✓",
        "in_progress" => "→",
        _ if row.blocked => "⊘",
        _ => "·",
    }
}

fn write_pretty(rows: &[TreeRow], w: &mut dyn Write) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(w, "(no issues)");
    }

    // `last[i]` records whether the ancestor at level i was its parent's
    // last visible child, which decides between "│   " and "    ".
    let mut last: Vec<bool> = Vec::new();
    for row in rows {
        last.truncate(row.level);
        let mut prefix = String::new();
        if row.level > 0 {
            for &ancestor_last in &last[1..] {
                prefix.push_str(if ancestor_last { "    " } else { "│   " });
            }
            prefix.push_str(if row.is_last { "└── " } else { "├── " });
        }
        last.push(row.is_last);

        let more = if row.hidden_children > 0 {
            format!("  [+{}]", row.hidden_children)
        } else {
            String::new()
        };
        writeln!(
            w,
            "{prefix}{} {}  {}{more}",
            status_marker(row),
            row.id,
            row.title
        )?;
    }
    Ok(())
}

fn write_text(rows: &[TreeRow], w: &mut dyn Write) -> io::Result<()> {
    for row in rows {
        writeln!(
            w,
            "{}{}  {}  {}",
            "  ".repeat(row.level),
            row.id,
            row.status,
            row.title
        )?;
    }
    Ok(())
}
