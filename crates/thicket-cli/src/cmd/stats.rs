//! `thicket stats` — counts over the built forest.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use thicket_core::graph::ForestStats;

use super::Context;
use crate::output::{pretty_kv, pretty_section, render_mode};

/// Arguments for `thicket stats`.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// Issue export to read (JSON array or JSON Lines).
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

/// Execute `thicket stats`.
pub fn run_stats(args: &StatsArgs, ctx: &Context<'_>) -> anyhow::Result<()> {
    let forest = ctx.load_forest(args.file.as_deref())?;
    let stats = forest.stats();
    render_mode(ctx.output, &stats, write_text, write_pretty)
}

fn rows(s: &ForestStats) -> [(&'static str, usize); 8] {
    [
        ("total", s.total),
        ("roots", s.roots),
        ("in_progress", s.in_progress),
        ("ready", s.ready),
        ("blocked", s.blocked),
        ("closed", s.closed),
        ("multi_parent", s.multi_parent),
        ("max_depth", s.max_depth),
    ]
}

fn write_pretty(s: &ForestStats, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Forest")?;
    for (key, value) in rows(s) {
        pretty_kv(w, &key.replace('_', " "), value.to_string())?;
    }
    Ok(())
}

fn write_text(s: &ForestStats, w: &mut dyn Write) -> io::Result<()> {
    for (key, value) in rows(s) {
        writeln!(w, "{key}  {value}")?;
    }
    Ok(())
}
