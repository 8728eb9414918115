//! `thicket completions` — shell completion scripts.

use std::io::Write;

use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `thicket completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) {
    generate(shell, command, "thicket", out);
}

/// Execute `thicket completions`.
///
/// # Errors
///
/// Returns an error if flushing stdout fails.
pub fn run_completions(args: &CompletionsArgs, command: &mut clap::Command) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    write_completions(args.shell, command, &mut out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_names_binary_and_subcommands() {
        let mut command = clap::Command::new("thicket")
            .subcommand(clap::Command::new("tree"))
            .subcommand(clap::Command::new("stats"));
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut command, &mut buf);
        let script = String::from_utf8(buf).expect("utf8");
        assert!(script.contains("thicket"));
        assert!(script.contains("tree"));
        assert!(script.contains("stats"));
    }
}
