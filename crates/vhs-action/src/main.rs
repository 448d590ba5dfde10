//! Entry point and orchestration.
//!
//! The sequence mirrors what a workflow step needs: validate inputs, put
//! the fonts and tools in place, add the managed binaries to the runner's
//! `PATH`, then run the tape and surface its outputs.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use vhs_action_core::{Config, Error, Platform, Result, ToolCache, runner};
use vhs_action_fonts::{FontInstaller, catalog};
use vhs_action_github::{ReleaseClient, VersionSelector};

mod cli;
mod install;
mod logging;

use crate::cli::Cli;
use crate::install::{FfmpegInstaller, InstallContext, TtydInstaller, VhsInstaller};
use crate::install::{InstalledTool, ToolInstaller};

#[tokio::main]
async fn main() -> ExitCode {
    miette::set_panic_hook();
    logging::init();
    let config = Cli::parse().into_config();

    match run(&config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> Result<ExitCode> {
    let platform = Platform::detect()?;
    info!(%platform, version = %config.version, "Setting up vhs");

    // Fail on a bad script path before any installation work.
    if let Some(path) = &config.path
        && !path.is_file()
    {
        return Err(Error::config(format!(
            "tape script not found: {}",
            path.display()
        )));
    }

    let ctx = InstallContext {
        platform,
        cache: ToolCache::default(),
        client: ReleaseClient::new(config.token().map(str::to_owned)),
    };

    if config.install_fonts {
        let report = FontInstaller::new(&ctx.cache, &ctx.client, platform)
            .install_all(&catalog())
            .await?;
        info!(
            installed = report.installed.len(),
            failed = report.failed.len(),
            "Font installation finished"
        );
    }

    let vhs_binary = install_tools(config, &ctx).await?;

    let Some(path) = config.path.as_ref().filter(|_| config.should_run_script()) else {
        info!("Installation complete");
        return Ok(ExitCode::SUCCESS);
    };

    let status = run_tape(&vhs_binary, path).await?;
    if !status.success() {
        let code = status.code().unwrap_or(1);
        error!(code, "vhs exited unsuccessfully");
        return Ok(ExitCode::from(exit_code(code)));
    }

    if config.publish {
        let url = publish_tape(&vhs_binary, path).await?;
        info!(%url, "Published recording");
        runner::set_output("gif-url", &url)?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Install ttyd, ffmpeg, and vhs in order, registering every managed binary
/// on the runner's `PATH`. Returns the vhs binary for the tape run.
async fn install_tools(config: &Config, ctx: &InstallContext) -> Result<PathBuf> {
    let selector = VersionSelector::parse(&config.version);
    let installers: Vec<Box<dyn ToolInstaller>> = vec![
        Box::new(TtydInstaller::new(selector.clone())),
        Box::new(FfmpegInstaller),
        Box::new(VhsInstaller::new(selector)),
    ];

    let mut vhs_binary = None;
    for installer in &installers {
        let tool = installer.install(ctx).await?;
        register(&tool)?;
        if let InstalledTool {
            name: "vhs",
            binary: Some(binary),
        } = tool
        {
            vhs_binary = Some(binary);
        }
    }

    // vhs always installs from its release archive, so its path is known.
    vhs_binary.ok_or_else(|| Error::config("vhs installation produced no binary path"))
}

fn register(tool: &InstalledTool) -> Result<()> {
    match &tool.binary {
        Some(binary) => {
            if let Some(dir) = binary.parent() {
                runner::add_path(dir)?;
            }
            info!(tool = tool.name, binary = %binary.display(), "Installed");
        }
        None => info!(tool = tool.name, "Installed on PATH by the system package manager"),
    }
    Ok(())
}

/// Run the tape script, inheriting stdio so recording output lands in the
/// step log.
async fn run_tape(vhs: &Path, tape: &Path) -> Result<std::process::ExitStatus> {
    info!(tape = %tape.display(), "Running tape");
    let status = tokio::process::Command::new(vhs).arg(tape).status().await?;
    Ok(status)
}

/// Publish the recording and return its URL, which vhs prints as the last
/// line of stdout.
async fn publish_tape(vhs: &Path, tape: &Path) -> Result<String> {
    let output = tokio::process::Command::new(vhs)
        .arg("publish")
        .arg(tape)
        .output()
        .await?;
    if !output.status.success() {
        return Err(Error::CommandFailed {
            program: "vhs publish".to_string(),
            status: output.status.code().unwrap_or(-1),
        });
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    last_line(&stdout).ok_or_else(|| Error::config("vhs publish produced no URL"))
}

fn last_line(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .next_back()
        .map(str::to_string)
}

/// Map a child exit status to our own; anything outside the portable `u8`
/// range (including signal termination) becomes a generic failure.
fn exit_code(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_line_takes_the_url() {
        let stdout = "Host your GIF on vhs.charm.sh\n\nhttps://vhs.charm.sh/vhs-abc123.gif\n";
        assert_eq!(
            last_line(stdout).unwrap(),
            "https://vhs.charm.sh/vhs-abc123.gif"
        );
        assert!(last_line("").is_none());
        assert!(last_line("\n  \n").is_none());
    }

    #[test]
    fn test_exit_code_propagates_in_u8_range() {
        assert_eq!(exit_code(0), 0);
        assert_eq!(exit_code(42), 42);
        // Out-of-range and signal-terminated statuses fail generically.
        assert_eq!(exit_code(-1), 1);
        assert_eq!(exit_code(300), 1);
    }
}
