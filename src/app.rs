// Declare modules
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod formatter;
pub mod matcher;
pub mod models;
pub mod scanner;
pub mod snapshots;
pub mod usage;
pub mod validate;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::env;

use self::cli::{Cli, Command};
use self::config::{resolve_config, ResolvedConfig};
use self::formatter::OutputGenerator;
use self::matcher::ContentMatcher;
use self::scanner::Scanner;

/// Resolves the record, then dispatches the requested command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let cwd = env::current_dir().context("Failed to get current directory")?;
    let resolved = resolve_config(&cli.source, &cwd)?;

    let output = execute(&cli.command, &resolved, &cwd)?;
    println!("{}", output);
    Ok(())
}

fn execute(command: &Command, resolved: &ResolvedConfig, cwd: &std::path::Path) -> Result<String> {
    let record = &resolved.record;

    match command {
        Command::Show { format } => Ok(config::to_string(record, *format)?),
        Command::Check => {
            let issues = validate::validate(record);
            for issue in &issues {
                match issue.severity {
                    validate::Severity::Warning => log::warn!("{}", issue),
                    validate::Severity::Error => log::error!("{}", issue),
                }
            }
            let errors = issues
                .iter()
                .filter(|i| i.severity == validate::Severity::Error)
                .count();
            if validate::has_errors(&issues) {
                bail!(
                    "Configuration from {} is invalid ({} errors)",
                    resolved.source,
                    errors
                );
            }
            Ok(format!("ok ({} warnings)", issues.len()))
        }
        Command::Match { paths } => {
            let matcher = ContentMatcher::new(&record.content)?;
            Ok(paths
                .iter()
                .map(|p| OutputGenerator::format_matches(&matcher, p))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Command::Scan { tree } => {
            let matcher = ContentMatcher::new(&record.content)?;
            let files = Scanner::new(&resolved.base_dir, &matcher).scan();
            if files.is_empty() {
                log::warn!("No files match the content patterns.");
            }
            Ok(if *tree {
                OutputGenerator::generate_tree(&files)
            } else {
                OutputGenerator::generate_list(&files)
            })
        }
        Command::Lookup { section, key } => match record.theme.lookup(*section, key) {
            Some(value) => Ok(value.to_string()),
            None => bail!("{} token `{}` not found", section, key),
        },
        Command::Tokens => Ok(OutputGenerator::format_tokens(&record.theme)),
        Command::Usage => {
            let matcher = ContentMatcher::new(&record.content)?;
            let files = Scanner::new(&resolved.base_dir, &matcher).scan();
            let refs = usage::collect_references(&files);
            let report = usage::usage_report(&record.theme, &refs);
            Ok(OutputGenerator::format_usage(&report))
        }
        Command::Diff { other } => {
            let other = config::load_other(other, cwd)?;
            Ok(OutputGenerator::format_diff(&diff::diff(record, &other)))
        }
    }
}
