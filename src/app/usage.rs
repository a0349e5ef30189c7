use crate::app::models::{Theme, ThemeSection};
use crate::app::scanner::ScannedFile;
use std::collections::BTreeMap;
use std::fs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenUsage {
    pub key: String,
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionUsage {
    pub section: ThemeSection,
    pub defined: Vec<TokenUsage>,
    /// Referenced keys with no matching token, with their counts.
    pub undefined: BTreeMap<String, usize>,
}

pub type References = BTreeMap<(ThemeSection, String), usize>;

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '"' | '\'' | '`' | ',' | '(' | ')' | '{' | '}' | ';' | '<' | '>' | '=')
}

/// Counts `min-w-<key>` / `min-h-<key>` class references in `text`.
/// Variant prefixes (`md:`) and `!` are stripped; arbitrary values (`[..]`) are skipped.
pub fn count_references(text: &str, refs: &mut References) {
    for word in text.split(is_separator).filter(|w| !w.is_empty()) {
        let class = word.rsplit(':').next().unwrap_or(word);
        let class = class.trim_start_matches('!');

        for section in ThemeSection::ALL {
            let prefix = format!("{}-", section.class_prefix());
            if let Some(key) = class.strip_prefix(&prefix) {
                if key.is_empty() || key.starts_with('[') {
                    continue;
                }
                *refs.entry((section, key.to_string())).or_insert(0) += 1;
            }
        }
    }
}

pub fn collect_references(files: &[ScannedFile]) -> References {
    let mut refs = References::new();
    for file in files {
        match fs::read_to_string(&file.path) {
            Ok(text) => count_references(&text, &mut refs),
            Err(e) => log::warn!("Skipping {}: {}", file.display_path, e),
        }
    }
    refs
}

pub fn usage_report(theme: &Theme, refs: &References) -> Vec<SectionUsage> {
    ThemeSection::ALL
        .iter()
        .map(|&section| {
            let tokens = theme.tokens(section);
            let defined = tokens
                .iter()
                .map(|(key, value)| TokenUsage {
                    key: key.to_string(),
                    value: value.to_string(),
                    count: refs.get(&(section, key.to_string())).copied().unwrap_or(0),
                })
                .collect();
            let undefined = refs
                .iter()
                .filter(|((s, key), _)| *s == section && tokens.get(key).is_none())
                .map(|((_, key), count)| (key.clone(), *count))
                .collect();
            SectionUsage {
                section,
                defined,
                undefined,
            }
        })
        .collect()
}
