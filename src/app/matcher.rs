use crate::app::error::ConfigError;
use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use std::path::{Component, Path, PathBuf};

const GLOB_META: [char; 5] = ['*', '?', '[', '{', '\\'];

/// Leading `./` and `../` segments of a pattern, or an absolute root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    Relative { up: usize },
    Absolute,
}

#[derive(Debug, Clone)]
pub struct ContentPattern {
    pub index: usize,
    pub raw: String,
    pub anchor: Anchor,
    /// Pattern with the anchor stripped; matched against anchor-relative paths.
    pub body: String,
    matcher: GlobMatcher,
}

impl ContentPattern {
    /// Directory the body is relative to.
    pub fn anchor_dir(&self, base_dir: &Path) -> PathBuf {
        match self.anchor {
            Anchor::Relative { up } => {
                let mut dir = base_dir.to_path_buf();
                for _ in 0..up {
                    dir.push("..");
                }
                normalize(&dir)
            }
            Anchor::Absolute => PathBuf::from("/"),
        }
    }

    /// Deepest directory that can contain matches; walking starts here.
    pub fn walk_dir(&self, base_dir: &Path) -> PathBuf {
        let mut dir = self.anchor_dir(base_dir);
        let parts: Vec<&str> = self.body.split('/').collect();
        for part in &parts[..parts.len().saturating_sub(1)] {
            if part.contains(GLOB_META) {
                break;
            }
            dir.push(part);
        }
        dir
    }

    pub fn is_match(&self, relative: &Path) -> bool {
        self.matcher.is_match(relative)
    }
}

/// Union of the record's content globs.
#[derive(Debug, Clone)]
pub struct ContentMatcher {
    patterns: Vec<ContentPattern>,
    set: GlobSet,
}

impl ContentMatcher {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let mut compiled = Vec::with_capacity(patterns.len());
        let mut builder = GlobSetBuilder::new();

        for (index, raw) in patterns.iter().enumerate() {
            let (anchor, body) = split_anchor(raw);
            let glob = compile_body(index, raw)?;
            builder.add(glob.clone());
            compiled.push(ContentPattern {
                index,
                raw: raw.clone(),
                anchor,
                body: body.to_string(),
                matcher: glob.compile_matcher(),
            });
        }

        let set = builder.build().map_err(|source| ConfigError::InvalidGlob {
            pattern: patterns.join(", "),
            source,
        })?;

        Ok(Self {
            patterns: compiled,
            set,
        })
    }

    pub fn patterns(&self) -> &[ContentPattern] {
        &self.patterns
    }

    /// Anchor-insensitive on both sides: `dist/index.html` and
    /// `../dist/index.html` both match `../dist/**/*.html`.
    pub fn is_match(&self, path: impl AsRef<Path>) -> bool {
        self.set.is_match(strip_anchor(path.as_ref()))
    }

    /// Indices of the patterns matching `path`, ascending.
    pub fn matching_patterns(&self, path: impl AsRef<Path>) -> Vec<usize> {
        self.set.matches(strip_anchor(path.as_ref()))
    }

    /// Anchor-exact match of an absolute path for a record living in `base_dir`.
    pub fn matches_at(&self, base_dir: &Path, abs_path: &Path) -> Vec<usize> {
        let abs_path = normalize(abs_path);
        self.patterns
            .iter()
            .filter(|p| {
                abs_path
                    .strip_prefix(p.anchor_dir(base_dir))
                    .map(|rel| p.is_match(rel))
                    .unwrap_or(false)
            })
            .map(|p| p.index)
            .collect()
    }
}

/// Compiles the anchor-stripped body of a content pattern.
pub fn compile_body(index: usize, raw: &str) -> Result<Glob, ConfigError> {
    if raw.trim().is_empty() {
        return Err(ConfigError::EmptyPattern(index));
    }
    let (_, body) = split_anchor(raw);
    GlobBuilder::new(body)
        .literal_separator(true)
        .build()
        .map_err(|source| ConfigError::InvalidGlob {
            pattern: raw.to_string(),
            source,
        })
}

fn split_anchor(raw: &str) -> (Anchor, &str) {
    if let Some(rest) = raw.strip_prefix('/') {
        return (Anchor::Absolute, rest.trim_start_matches('/'));
    }

    let mut up = 0;
    let mut rest = raw;
    loop {
        if let Some(r) = rest.strip_prefix("./") {
            rest = r;
        } else if let Some(r) = rest.strip_prefix("../") {
            up += 1;
            rest = r;
        } else {
            break;
        }
    }
    (Anchor::Relative { up }, rest)
}

/// Drops leading `.`, `..` and root components, mirroring `split_anchor`.
fn strip_anchor(path: &Path) -> PathBuf {
    path.components()
        .skip_while(|c| {
            matches!(
                c,
                Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        })
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Lexically resolves `.` and `..` without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
