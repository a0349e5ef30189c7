use crate::app::matcher::{normalize, ContentMatcher};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A file the generator would read for class-name usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Path relative to the config directory, `/`-separated.
    pub display_path: String,
    pub patterns: Vec<usize>,
}

pub struct Scanner<'a> {
    base_dir: PathBuf,
    matcher: &'a ContentMatcher,
}

impl<'a> Scanner<'a> {
    pub fn new(base_dir: &Path, matcher: &'a ContentMatcher) -> Self {
        Self {
            base_dir: normalize(base_dir),
            matcher,
        }
    }

    pub fn scan(&self) -> Vec<ScannedFile> {
        // Keyed by path so overlapping walk roots don't produce duplicates
        let mut found: BTreeMap<PathBuf, ScannedFile> = BTreeMap::new();

        for root in self.walk_roots() {
            if !root.is_dir() {
                log::warn!("Scan root {:?} does not exist, skipping", root);
                continue;
            }

            let walker = WalkBuilder::new(&root)
                .hidden(false)
                .git_ignore(true)
                .require_git(false)
                .build();

            for result in walker {
                match result {
                    Ok(entry) => {
                        if found.contains_key(entry.path()) {
                            continue;
                        }
                        if let Some(file) = self.process_entry(entry.path()) {
                            found.insert(file.path.clone(), file);
                        }
                    }
                    Err(err) => log::warn!("Error walking entry: {}", err),
                }
            }
        }

        found.into_values().collect()
    }

    /// Distinct walk roots, dropping any root nested inside another.
    fn walk_roots(&self) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = self
            .matcher
            .patterns()
            .iter()
            .map(|p| p.walk_dir(&self.base_dir))
            .collect();
        roots.sort();
        roots.dedup();

        let mut kept: Vec<PathBuf> = Vec::new();
        for root in roots {
            if !kept.iter().any(|k| root.starts_with(k)) {
                kept.push(root);
            }
        }
        kept
    }

    fn process_entry(&self, path: &Path) -> Option<ScannedFile> {
        if path.components().any(|c| c.as_os_str() == ".git") {
            return None;
        }
        if path.is_dir() {
            return None;
        }

        let path = normalize(path);
        let patterns = self.matcher.matches_at(&self.base_dir, &path);
        if patterns.is_empty() {
            return None;
        }

        let relative = diff_paths(&path, &self.base_dir)?;
        let display_path = relative.to_string_lossy().replace('\\', "/");
        log::debug!("{} matched patterns {:?}", display_path, patterns);

        Some(ScannedFile {
            path,
            display_path,
            patterns,
        })
    }
}
