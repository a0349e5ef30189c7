use crate::app::cli::SourceArgs;
use crate::app::error::ConfigError;
use crate::app::models::ConfigRecord;
use crate::app::snapshots;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// File names probed in the working directory when no source is given.
const DETECT_NAMES: [&str; 2] = ["tailwind.config.toml", "tailwind.config.json"];

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

pub fn from_str(text: &str, format: ConfigFormat) -> Result<ConfigRecord, ConfigError> {
    Ok(match format {
        ConfigFormat::Toml => toml::from_str(text)?,
        ConfigFormat::Json => serde_json::from_str(text)?,
    })
}

pub fn to_string(record: &ConfigRecord, format: ConfigFormat) -> Result<String, ConfigError> {
    Ok(match format {
        ConfigFormat::Toml => toml::to_string_pretty(record)?,
        ConfigFormat::Json => serde_json::to_string_pretty(record)?,
    })
}

pub fn load_record(path: &Path) -> Result<ConfigRecord> {
    let format = ConfigFormat::from_path(path)?;
    let text = fs::read_to_string(path)
        .context(format!("Failed to read config at {:?}", path))?;
    let record =
        from_str(&text, format).context(format!("Failed to parse config at {:?}", path))?;
    Ok(record)
}

#[derive(Deserialize, Debug)]
struct VariantsFile {
    #[serde(flatten)]
    variants: BTreeMap<String, ConfigRecord>,
}

fn variants_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join(".config")
        .join("utility_config")
        .join("variants.toml"))
}

fn load_variants_from(path: &Path) -> Result<BTreeMap<String, ConfigRecord>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = fs::read_to_string(path)
        .context(format!("Failed to read variants at {:?}", path))?;
    let parsed: VariantsFile =
        toml::from_str(&content).context("Failed to parse variants.toml")?;

    Ok(parsed.variants)
}

/// Appends extra patterns, dropping repeats while keeping first occurrence order.
fn merge_patterns(mut base: Vec<String>, extra: &[String]) -> Vec<String> {
    base.extend(extra.iter().cloned());
    let mut seen = HashSet::new();
    base.retain(|item| seen.insert(item.clone()));
    base
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    File(PathBuf),
    Variant { name: String, file: PathBuf },
    Detected(PathBuf),
    Snapshot(String),
}

impl std::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordSource::File(p) => write!(f, "file {}", p.display()),
            RecordSource::Variant { name, file } => {
                write!(f, "variant `{}` from {}", name, file.display())
            }
            RecordSource::Detected(p) => write!(f, "detected {}", p.display()),
            RecordSource::Snapshot(name) => write!(f, "built-in snapshot `{}`", name),
        }
    }
}

/// Record after source resolution, plus the directory its globs are relative to.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub record: ConfigRecord,
    pub source: RecordSource,
    pub base_dir: PathBuf,
}

pub fn resolve_config(args: &SourceArgs, cwd: &Path) -> Result<ResolvedConfig> {
    resolve_with_variants(args, cwd, &variants_path()?)
}

fn resolve_with_variants(
    args: &SourceArgs,
    cwd: &Path,
    variants_file: &Path,
) -> Result<ResolvedConfig> {
    // Priority: --config > --variant > detected file > default snapshot
    let (record, source, base_dir) = if let Some(path) = &args.config {
        let path = cwd.join(path);
        let record = load_record(&path)?;
        let base = parent_dir(&path, cwd);
        (record, RecordSource::File(path), base)
    } else if let Some(name) = &args.variant {
        let mut variants = load_variants_from(variants_file)?;
        if let Some(record) = variants.remove(name) {
            let source = RecordSource::Variant {
                name: name.clone(),
                file: variants_file.to_path_buf(),
            };
            (record, source, cwd.to_path_buf())
        } else {
            let record =
                snapshots::snapshot(name).ok_or_else(|| unknown_variant(name))?;
            (record, RecordSource::Snapshot(name.clone()), cwd.to_path_buf())
        }
    } else if let Some(path) = detect_config(cwd) {
        let record = load_record(&path)?;
        (record, RecordSource::Detected(path), cwd.to_path_buf())
    } else {
        let name = snapshots::DEFAULT_SNAPSHOT;
        let record = snapshots::snapshot(name)
            .ok_or_else(|| unknown_variant(name))?;
        (record, RecordSource::Snapshot(name.to_string()), cwd.to_path_buf())
    };

    log::info!("Using configuration from {}", source);

    let record = ConfigRecord {
        content: merge_patterns(record.content, &args.content),
        ..record
    };

    Ok(ResolvedConfig {
        record,
        source,
        base_dir,
    })
}

fn unknown_variant(name: &str) -> ConfigError {
    ConfigError::UnknownVariant {
        name: name.to_string(),
        known: snapshots::names().join(", "),
    }
}

fn detect_config(cwd: &Path) -> Option<PathBuf> {
    DETECT_NAMES
        .iter()
        .map(|name| cwd.join(name))
        .find(|p| p.is_file())
}

fn parent_dir(path: &Path, fallback: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => fallback.to_path_buf(),
    }
}

/// Loads a record for comparison: a config path if one exists, otherwise a snapshot name.
pub fn load_other(target: &str, cwd: &Path) -> Result<ConfigRecord> {
    let path = cwd.join(target);
    if path.is_file() {
        return load_record(&path);
    }
    let record =
        snapshots::snapshot(target).ok_or_else(|| unknown_variant(target))?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::ThemeSection;
    use tempfile::tempdir;

    #[test]
    fn toml_round_trip_is_identity() {
        let record = snapshots::snapshot("primary").unwrap();
        let text = to_string(&record, ConfigFormat::Toml).unwrap();
        assert_eq!(from_str(&text, ConfigFormat::Toml).unwrap(), record);
    }

    #[test]
    fn json_round_trip_is_identity() {
        let mut record = snapshots::snapshot("alternate").unwrap();
        record
            .theme
            .extend
            .insert("minHeight".into(), [("24", "6rem")].into_iter().collect());
        let text = to_string(&record, ConfigFormat::Json).unwrap();
        assert!(text.contains("\"minWidth\""));
        assert_eq!(from_str(&text, ConfigFormat::Json).unwrap(), record);
    }

    #[test]
    fn toml_numeric_keys_load() {
        let text = r#"
mode = "all"
content = ["./src/**/*.{rs,html,css}"]

[theme.minWidth]
53 = "13.25rem"
"#;
        let record = from_str(text, ConfigFormat::Toml).unwrap();
        assert_eq!(record.theme.lookup(ThemeSection::MinWidth, "53"), Some("13.25rem"));
    }

    #[test]
    fn toml_duplicate_token_keys_are_rejected() {
        let text = r#"
content = ["./src/**/*.rs"]

[theme.minWidth]
53 = "13.25rem"
53 = "22rem"
"#;
        let err = from_str(text, ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().to_lowercase().contains("duplicate"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = ConfigFormat::from_path(Path::new("tailwind.config.js")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn merge_patterns_dedupes_in_order() {
        let merged = merge_patterns(
            vec!["a".into(), "b".into()],
            &["b".to_string(), "c".to_string(), "a".to_string()],
        );
        assert_eq!(merged, vec!["a", "b", "c"]);
    }

    #[test]
    fn explicit_config_wins_and_sets_base_dir() {
        let dir = tempdir().unwrap();
        let client = dir.path().join("client");
        fs::create_dir_all(&client).unwrap();
        let record = snapshots::snapshot("alternate").unwrap();
        fs::write(
            client.join("cfg.json"),
            to_string(&record, ConfigFormat::Json).unwrap(),
        )
        .unwrap();

        let args = SourceArgs {
            config: Some(PathBuf::from("client/cfg.json")),
            content: vec!["extra/**/*.rs".into()],
            ..SourceArgs::default()
        };
        let resolved =
            resolve_with_variants(&args, dir.path(), &dir.path().join("none.toml")).unwrap();

        assert_eq!(resolved.base_dir, client);
        assert!(matches!(resolved.source, RecordSource::File(_)));
        assert_eq!(resolved.record.content.len(), 3);
        assert_eq!(resolved.record.theme, record.theme);
    }

    #[test]
    fn variant_file_before_snapshot() {
        let dir = tempdir().unwrap();
        let variants = dir.path().join("variants.toml");
        fs::write(
            &variants,
            r#"
[primary]
content = ["web/**/*.html"]

[primary.theme.minWidth]
10 = "2.5rem"
"#,
        )
        .unwrap();

        let args = SourceArgs {
            variant: Some("primary".into()),
            ..SourceArgs::default()
        };
        let resolved = resolve_with_variants(&args, dir.path(), &variants).unwrap();
        assert!(matches!(resolved.source, RecordSource::Variant { .. }));
        assert_eq!(resolved.record.content, vec!["web/**/*.html"]);

        let args = SourceArgs {
            variant: Some("alternate".into()),
            ..SourceArgs::default()
        };
        let resolved = resolve_with_variants(&args, dir.path(), &variants).unwrap();
        assert_eq!(resolved.source, RecordSource::Snapshot("alternate".into()));

        let args = SourceArgs {
            variant: Some("missing".into()),
            ..SourceArgs::default()
        };
        assert!(resolve_with_variants(&args, dir.path(), &variants).is_err());
    }

    #[test]
    fn detects_config_in_cwd_then_falls_back_to_snapshot() {
        let dir = tempdir().unwrap();
        let none = dir.path().join("none.toml");

        let resolved = resolve_with_variants(&SourceArgs::default(), dir.path(), &none).unwrap();
        assert_eq!(resolved.source, RecordSource::Snapshot("primary".into()));

        fs::write(
            dir.path().join("tailwind.config.toml"),
            "mode = \"jit\"\ncontent = [\"src/**/*.rs\"]\n",
        )
        .unwrap();
        let resolved = resolve_with_variants(&SourceArgs::default(), dir.path(), &none).unwrap();
        assert!(matches!(resolved.source, RecordSource::Detected(_)));
        assert_eq!(resolved.record.content, vec!["src/**/*.rs"]);
    }

    #[test]
    fn load_other_accepts_path_or_snapshot() {
        let dir = tempdir().unwrap();
        assert!(load_other("alternate", dir.path()).is_ok());
        assert!(load_other("unknown", dir.path()).is_err());
    }
}
