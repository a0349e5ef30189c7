//! Built-in configuration records.
//!
//! Two divergent snapshots of the same client configuration exist. They are
//! kept side by side under their own names; `diff` shows where they disagree.

use crate::app::models::{ConfigRecord, ScanMode, Theme, TokenMap};

pub const DEFAULT_SNAPSHOT: &str = "primary";

const NAMES: [&str; 2] = ["primary", "alternate"];

pub fn names() -> &'static [&'static str] {
    &NAMES
}

pub fn snapshot(name: &str) -> Option<ConfigRecord> {
    let min_width: TokenMap = match name {
        "primary" => [("53", "13.25rem")].into_iter().collect(),
        "alternate" => [("88", "22rem")].into_iter().collect(),
        _ => return None,
    };

    Some(ConfigRecord {
        mode: ScanMode::All,
        content: vec![
            "./src/**/*.{rs,html,css}".to_string(),
            "../dist/**/*.html".to_string(),
        ],
        plugins: Vec::new(),
        theme: Theme {
            min_width,
            min_height: [("16", "4rem")].into_iter().collect(),
            ..Theme::default()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::ThemeSection;

    #[test]
    fn every_name_resolves() {
        for name in names() {
            assert!(snapshot(name).is_some(), "missing snapshot {}", name);
        }
        assert!(snapshot("nope").is_none());
    }

    #[test]
    fn snapshots_disagree_on_min_width() {
        let primary = snapshot("primary").unwrap();
        let alternate = snapshot("alternate").unwrap();

        assert_eq!(primary.theme.lookup(ThemeSection::MinWidth, "53"), Some("13.25rem"));
        assert_eq!(primary.theme.lookup(ThemeSection::MinWidth, "88"), None);
        assert_eq!(alternate.theme.lookup(ThemeSection::MinWidth, "88"), Some("22rem"));
        assert_eq!(alternate.theme.lookup(ThemeSection::MinWidth, "53"), None);
    }
}
