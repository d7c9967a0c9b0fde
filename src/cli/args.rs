//! Command line argument parsing using clap.

use std::path::PathBuf;

use clap::Parser;

/// Javelin - interactive full-text search over a product catalog
#[derive(Parser, Debug, Clone)]
#[command(name = "javelin")]
#[command(about = "Interactive full-text search over a product catalog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct JavelinArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Product collection file, overrides the config value
    #[arg(long, value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    /// Index directory, overrides the config value
    #[arg(long, value_name = "DIR")]
    pub index_dir: Option<PathBuf>,

    /// Default result limit, overrides the config value
    #[arg(long, value_name = "N")]
    pub default_limit: Option<usize>,
}

impl JavelinArgs {
    /// Get the effective verbosity level.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = JavelinArgs::parse_from(["javelin"]);

        assert_eq!(args.verbosity(), 1);
        assert!(args.config.is_none());
        assert!(args.default_limit.is_none());
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        let args = JavelinArgs::parse_from(["javelin", "-q", "-vvv"]);
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_counted_verbosity() {
        let args = JavelinArgs::parse_from(["javelin", "-vv"]);
        assert_eq!(args.verbosity(), 2);
    }

    #[test]
    fn test_overrides() {
        let args = JavelinArgs::parse_from([
            "javelin",
            "--data-file",
            "catalog.json",
            "--index-dir",
            "/tmp/ix",
            "--default-limit",
            "5",
        ]);

        assert_eq!(args.data_file, Some(PathBuf::from("catalog.json")));
        assert_eq!(args.index_dir, Some(PathBuf::from("/tmp/ix")));
        assert_eq!(args.default_limit, Some(5));
    }
}
