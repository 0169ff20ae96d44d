use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::aot::Generator;
use clap_complete::{generate, generate_to, Shell};

use crate::cli::Cli;
use crate::error::CliError;

const BIN_NAME: &str = "quotes";

/// Where a completion script goes.
#[derive(Debug, Clone, Copy)]
pub enum CompletionTarget<'a> {
    Stdout,
    File(&'a Path),
    /// Directory the shell loads completions from; the file gets the
    /// shell's conventional name (`quotes.bash`, `_quotes`, `quotes.fish`).
    Directory(&'a Path),
}

pub fn run_completions(shell: Shell, target: CompletionTarget<'_>) -> Result<(), CliError> {
    match target {
        CompletionTarget::Stdout => io::stdout().write_all(&render_completions(shell))?,
        CompletionTarget::File(path) => {
            std::fs::write(path, render_completions(shell))?;
            println!("{}", path.display());
        }
        CompletionTarget::Directory(dir) => {
            let path = install_completions(shell, dir)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

pub fn render_completions(shell: Shell) -> Vec<u8> {
    let mut buffer = Vec::new();
    generate(shell, &mut Cli::command(), BIN_NAME, &mut buffer);
    buffer
}

/// Write the script into `dir`, creating it if needed. Returns the file path.
pub fn install_completions(shell: Shell, dir: &Path) -> Result<PathBuf, CliError> {
    std::fs::create_dir_all(dir)?;
    let path = generate_to(shell, &mut Cli::command(), BIN_NAME, dir)?;
    tracing::debug!(
        "Installed {} completions as {}",
        shell,
        shell.file_name(BIN_NAME)
    );
    Ok(path)
}
