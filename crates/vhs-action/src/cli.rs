//! Command line interface.
//!
//! Flags map one-to-one onto the action's inputs. On a hosted runner they
//! arrive through the `INPUT_*` environment variables the runner sets for
//! each declared input; locally the flags work directly.

use std::path::PathBuf;

use clap::Parser;
use vhs_action_core::Config;

#[derive(Debug, Parser)]
#[command(name = "vhs-action", about = "Record terminal GIFs with vhs in CI")]
pub struct Cli {
    /// Version of vhs to install ("latest" or an explicit tag).
    #[arg(long, env = "INPUT_VERSION", default_value = "latest")]
    pub version: String,

    /// Tape script to run. Omit to install without recording.
    #[arg(long, env = "INPUT_PATH")]
    pub path: Option<PathBuf>,

    /// Install the monospaced font set the recorder's themes reference.
    #[arg(
        long,
        env = "INPUT_INSTALL-FONTS",
        default_value_t = true,
        action = clap::ArgAction::Set,
        value_name = "BOOL"
    )]
    pub install_fonts: bool,

    /// Install everything but skip running the script.
    #[arg(
        long,
        env = "INPUT_INSTALL-ONLY",
        default_value_t = false,
        action = clap::ArgAction::Set,
        value_name = "BOOL"
    )]
    pub install_only: bool,

    /// Token for release API calls and asset downloads.
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Publish the recording to vhs.charm.sh and surface its URL.
    #[arg(
        long,
        env = "INPUT_PUBLISH",
        default_value_t = false,
        action = clap::ArgAction::Set,
        value_name = "BOOL"
    )]
    pub publish: bool,
}

impl Cli {
    /// Build the action configuration; this is the single place ambient
    /// state is read.
    #[must_use]
    pub fn into_config(self) -> Config {
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok());
        Config {
            version: self.version,
            path: self.path,
            install_fonts: self.install_fonts,
            install_only: self.install_only,
            token,
            publish: self.publish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_definition_is_consistent() {
        use clap::CommandFactory;
        // `version` is an input, not clap's version flag; this asserts the
        // argument ids stay unique.
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["vhs-action"]).unwrap();
        assert_eq!(cli.version, "latest");
        assert!(cli.path.is_none());
        assert!(cli.install_fonts);
        assert!(!cli.install_only);
        assert!(!cli.publish);
    }

    #[test]
    fn test_boolean_inputs_take_explicit_values() {
        let cli = Cli::try_parse_from([
            "vhs-action",
            "--install-fonts",
            "false",
            "--install-only",
            "true",
            "--publish",
            "true",
        ])
        .unwrap();
        assert!(!cli.install_fonts);
        assert!(cli.install_only);
        assert!(cli.publish);
    }

    #[test]
    fn test_script_path_and_version() {
        let cli = Cli::try_parse_from([
            "vhs-action",
            "--path",
            "demo.tape",
            "--version",
            "v0.7.1",
        ])
        .unwrap();
        assert_eq!(cli.path, Some(PathBuf::from("demo.tape")));
        assert_eq!(cli.version, "v0.7.1");

        let config = cli.into_config();
        assert!(config.should_run_script());
    }
}
