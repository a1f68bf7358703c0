//! Command-line interface of the native host.

use std::path::PathBuf;

use clap::Parser;

use crate::native::RunOptions;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "planview-native")]
#[command(version, about = "Upload a floor plan and open it in the visualizer", long_about = None)]
pub struct Cli {
    /// Floor plan image to upload; a file dialog opens when omitted
    pub file: Option<PathBuf>,

    /// Run as a signed-out user, so uploads are ignored
    #[arg(long)]
    pub signed_out: bool,

    /// Reload the visualizer once it is shown
    #[arg(long)]
    pub reload: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the active config to the default location and exit
    #[arg(long)]
    pub init_config: bool,
}

impl Cli {
    /// Parse `std::env::args`, exiting with usage on error.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            file: self.file.clone(),
            signed_in: !self.signed_out,
            reload: self.reload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_sign_in() {
        let cli = Cli::try_parse_from(["planview-native"]).unwrap();
        let options = cli.run_options();
        assert!(options.signed_in);
        assert!(!options.reload);
        assert!(options.file.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "planview-native",
            "--signed-out",
            "--reload",
            "--config",
            "conf.json",
            "plan.png",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("conf.json")));

        let options = cli.run_options();
        assert!(!options.signed_in);
        assert!(options.reload);
        assert_eq!(options.file, Some(PathBuf::from("plan.png")));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let result = Cli::try_parse_from(["planview-native", "--verbose", "plan.png"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_needs_a_value() {
        assert!(Cli::try_parse_from(["planview-native", "--config"]).is_err());
    }
}
