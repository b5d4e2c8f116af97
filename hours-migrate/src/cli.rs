//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

use crate::config::ConfigOverrides;

#[derive(Debug, Parser)]
#[command(name = "hours-migrate")]
#[command(
    version,
    about = "Copy monthly hour allocations from a source sheet into flat rows on a destination sheet",
    long_about = None
)]
pub struct Cli {
    /// Env file with ACCESS_TOKEN, SOURCE_SHEET and DESTINATION_SHEET (defaults to ./env.txt)
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Source sheet ID (overrides SOURCE_SHEET)
    #[arg(long, value_name = "ID")]
    pub source: Option<String>,

    /// Destination sheet ID (overrides DESTINATION_SHEET)
    #[arg(long, value_name = "ID")]
    pub destination: Option<String>,

    /// API base URL (overrides API_BASE_URL)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Attempts per API call, 1 disables retrying (overrides API_MAX_ATTEMPTS)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Map destination columns by position (first four columns) instead of by title
    #[arg(long)]
    pub positional_columns: bool,

    /// Fetch and transform, print the rows that would be added, but do not write
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source_sheet: self.source.clone(),
            destination_sheet: self.destination.clone(),
            base_url: self.base_url.clone(),
            max_attempts: self.max_attempts,
            positional_columns: self.positional_columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_is_plain_run() {
        let cli = Cli::try_parse_from(["hours-migrate"]).unwrap();
        assert!(!cli.dry_run);
        assert!(!cli.positional_columns);
        assert!(cli.env_file.is_none());

        let overrides = cli.overrides();
        assert!(overrides.source_sheet.is_none());
        assert!(overrides.max_attempts.is_none());
    }

    #[test]
    fn test_flags_map_to_overrides() {
        let cli = Cli::try_parse_from([
            "hours-migrate",
            "--env-file",
            "prod.env",
            "--source",
            "1",
            "--destination",
            "2",
            "--max-attempts",
            "4",
            "--positional-columns",
            "--dry-run",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.env_file, Some(PathBuf::from("prod.env")));
        assert!(cli.dry_run);
        assert!(cli.verbose);

        let overrides = cli.overrides();
        assert_eq!(overrides.source_sheet.as_deref(), Some("1"));
        assert_eq!(overrides.destination_sheet.as_deref(), Some("2"));
        assert_eq!(overrides.max_attempts, Some(4));
        assert!(overrides.positional_columns);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        assert!(Cli::try_parse_from(["hours-migrate", "--max-attempts", "0"]).is_err());
    }
}
