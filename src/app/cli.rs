use crate::app::config::ConfigFormat;
use crate::app::models::ThemeSection;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Inspect, validate and query utility-class generator configuration"
)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the configuration record comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Path to a configuration file (.toml or .json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use a named record from variants.toml or a built-in snapshot
    #[arg(long, global = true, conflicts_with = "config")]
    pub variant: Option<String>,

    /// Extra content pattern appended to the record (repeatable)
    #[arg(long = "content", value_name = "GLOB", global = true)]
    pub content: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the effective configuration record
    Show {
        #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
    /// Validate the record; exits non-zero on errors
    Check,
    /// Report which content patterns match the given paths
    Match {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// List the files the generator would scan
    Scan {
        /// Show the result as a directory tree
        #[arg(long)]
        tree: bool,
    },
    /// Look up a theme token (e.g. `lookup min-width 53`)
    Lookup { section: ThemeSection, key: String },
    /// List effective theme tokens and their utility classes
    Tokens,
    /// Count utility-class references to theme tokens in scanned files
    Usage,
    /// Compare against another config file or snapshot name
    Diff { other: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_source_options_after_subcommand() {
        let cli = Cli::parse_from([
            "utility_config",
            "lookup",
            "min-width",
            "53",
            "--variant",
            "alternate",
            "--content",
            "templates/**/*.html",
        ]);

        assert_eq!(cli.source.variant.as_deref(), Some("alternate"));
        assert_eq!(cli.source.content, vec!["templates/**/*.html".to_string()]);
        match cli.command {
            Command::Lookup { section, key } => {
                assert_eq!(section, ThemeSection::MinWidth);
                assert_eq!(key, "53");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn config_and_variant_conflict() {
        let res = Cli::try_parse_from([
            "utility_config",
            "--config",
            "a.toml",
            "--variant",
            "primary",
            "check",
        ]);
        assert!(res.is_err());
    }
}
