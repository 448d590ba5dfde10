//! Runner command files.
//!
//! The hosted runner communicates through append-only files named in
//! `GITHUB_PATH` and `GITHUB_OUTPUT`. Outside a runner (local runs, tests)
//! the values are logged instead.

use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::Result;

/// Prepend a directory to the runner's `PATH` for subsequent steps.
///
/// # Errors
///
/// Returns an error if the command file cannot be written.
pub fn add_path(dir: &Path) -> Result<()> {
    match command_file("GITHUB_PATH") {
        Some(file) => append_line(&file, &dir.display().to_string()),
        None => {
            info!(?dir, "GITHUB_PATH not set; directory not added to PATH");
            Ok(())
        }
    }
}

/// Surface a named output value for subsequent steps.
///
/// # Errors
///
/// Returns an error if the command file cannot be written.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    match command_file("GITHUB_OUTPUT") {
        Some(file) => append_line(&file, &format!("{name}={value}")),
        None => {
            info!(name, value, "GITHUB_OUTPUT not set; output logged only");
            Ok(())
        }
    }
}

fn command_file(var: &str) -> Option<std::path::PathBuf> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(std::path::PathBuf::from)
}

fn append_line(file: &Path, line: &str) -> Result<()> {
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)?;
    writeln!(f, "{line}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_append_line_accumulates() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("output");

        append_line(&file, "gif-url=https://vhs.charm.sh/abc.gif").unwrap();
        append_line(&file, "second=value").unwrap();

        let content = std::fs::read_to_string(&file).unwrap();
        assert_eq!(
            content,
            "gif-url=https://vhs.charm.sh/abc.gif\nsecond=value\n"
        );
    }
}
