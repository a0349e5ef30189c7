use crate::app::diff::{RecordDiff, TokenChange};
use crate::app::matcher::ContentMatcher;
use crate::app::models::{Theme, ThemeSection};
use crate::app::scanner::ScannedFile;
use crate::app::usage::SectionUsage;
use std::collections::BTreeSet;

pub struct OutputGenerator;

impl OutputGenerator {
    /// Indented tree of scanned files, directories suffixed with `/`.
    pub fn generate_tree(files: &[ScannedFile]) -> String {
        let mut output = String::new();
        let mut printed_dirs = BTreeSet::new();

        for file in files {
            let parts: Vec<&str> = file.display_path.split('/').collect();
            let (name, dirs) = match parts.split_last() {
                Some(split) => split,
                None => continue,
            };

            for depth in 0..dirs.len() {
                let prefix = dirs[..=depth].join("/");
                if printed_dirs.insert(prefix) {
                    let indent = "    ".repeat(depth);
                    output.push_str(&format!("{}{}/\n", indent, dirs[depth]));
                }
            }
            let indent = "    ".repeat(dirs.len());
            output.push_str(&format!("{}{}\n", indent, name));
        }

        output.trim_end().to_string()
    }

    pub fn generate_list(files: &[ScannedFile]) -> String {
        files
            .iter()
            .map(|f| f.display_path.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_matches(matcher: &ContentMatcher, path: &str) -> String {
        if !matcher.is_match(path) {
            return format!("{}: no match", path);
        }
        let hits = matcher.matching_patterns(path);
        let patterns: Vec<&str> = hits
            .iter()
            .map(|&i| matcher.patterns()[i].raw.as_str())
            .collect();
        format!("{}: {}", path, patterns.join(", "))
    }

    /// One line per effective token: class name, CSS declaration.
    pub fn format_tokens(theme: &Theme) -> String {
        let sections: Vec<_> = ThemeSection::ALL
            .iter()
            .map(|&section| (section, theme.tokens(section)))
            .collect();
        let mut lines = Vec::with_capacity(sections.iter().map(|(_, t)| t.len().max(1)).sum());
        for (section, tokens) in sections {
            if tokens.is_empty() {
                lines.push(format!("/* no {} tokens */", section));
                continue;
            }
            for (key, value) in tokens.iter() {
                lines.push(format!(
                    ".{}-{} {{ {}: {}; }}",
                    section.class_prefix(),
                    key,
                    section.css_property(),
                    value
                ));
            }
        }
        lines.join("\n")
    }

    pub fn format_usage(report: &[SectionUsage]) -> String {
        let mut out = String::new();
        for section in report {
            out.push_str(&format!("{}:\n", section.section));
            if section.defined.is_empty() {
                out.push_str("    (no tokens)\n");
            }
            for token in &section.defined {
                let marker = if token.count == 0 { "  unused" } else { "" };
                out.push_str(&format!(
                    "    {}-{} = {} ({} refs){}\n",
                    section.section.class_prefix(),
                    token.key,
                    token.value,
                    token.count,
                    marker
                ));
            }
            for (key, count) in &section.undefined {
                out.push_str(&format!(
                    "    {}-{} undefined ({} refs)\n",
                    section.section.class_prefix(),
                    key,
                    count
                ));
            }
        }
        out.trim_end().to_string()
    }

    pub fn format_diff(diff: &RecordDiff) -> String {
        if diff.is_empty() {
            return "records are identical".to_string();
        }

        let mut lines = Vec::new();
        if let Some((from, to)) = diff.mode {
            lines.push(format!("~ mode: {} -> {}", from, to));
        }
        lines.extend(diff.content_only_left.iter().map(|c| format!("- content: {}", c)));
        lines.extend(diff.content_only_right.iter().map(|c| format!("+ content: {}", c)));
        for (section, change) in &diff.tokens {
            let key = section.config_key();
            lines.push(match change {
                TokenChange::Removed { key: k, value } => format!("- theme.{}.{}: {}", key, k, value),
                TokenChange::Added { key: k, value } => format!("+ theme.{}.{}: {}", key, k, value),
                TokenChange::Changed { key: k, from, to } => {
                    format!("~ theme.{}.{}: {} -> {}", key, k, from, to)
                }
            });
        }
        lines.extend(diff.plugins_only_left.iter().map(|p| format!("- plugin: {}", p)));
        lines.extend(diff.plugins_only_right.iter().map(|p| format!("+ plugin: {}", p)));
        lines.join("\n")
    }
}
