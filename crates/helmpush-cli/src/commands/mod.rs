//! CLI commands

pub mod download;
pub mod push;

use crate::error::{CliError, Result};
use helmpush_repo::DownloadTarget;

/// What an invocation asks for, judged from its positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// `helm push <chart> <repository>`
    Push { chart: String, repo: String },
    /// Helm downloader call: `<certFile> <keyFile> <caFile> <cm://...>`
    Download { uri: String },
}

impl Mode {
    pub fn select(args: &[String]) -> Result<Self> {
        if args.len() == 4 && DownloadTarget::handles(&args[3]) {
            return Ok(Mode::Download {
                uri: args[3].clone(),
            });
        }

        match args {
            [chart, repo] => Ok(Mode::Push {
                chart: chart.clone(),
                repo: repo.clone(),
            }),
            _ => Err(CliError::input(
                "This command needs 2 arguments: name of chart, name of chart repository",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_push_mode() {
        assert_eq!(
            Mode::select(&args(&["./mychart", "chartmuseum"])).unwrap(),
            Mode::Push {
                chart: "./mychart".to_string(),
                repo: "chartmuseum".to_string()
            }
        );
    }

    #[test]
    fn test_download_mode() {
        let mode = Mode::select(&args(&["", "", "", "cm://host/a/foo-1.0.0.tgz"])).unwrap();
        assert_eq!(
            mode,
            Mode::Download {
                uri: "cm://host/a/foo-1.0.0.tgz".to_string()
            }
        );
    }

    #[test]
    fn test_four_args_without_scheme() {
        let err = Mode::select(&args(&["a", "b", "c", "https://host/foo.tgz"])).unwrap_err();
        assert!(matches!(err, CliError::InvalidArguments { .. }));
    }

    #[test]
    fn test_wrong_arg_count() {
        assert!(Mode::select(&args(&[])).is_err());
        assert!(Mode::select(&args(&["only-chart"])).is_err());
        assert!(Mode::select(&args(&["a", "b", "c"])).is_err());
    }
}
