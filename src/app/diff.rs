use crate::app::models::{ConfigRecord, ScanMode, ThemeSection};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenChange {
    Added { key: String, value: String },
    Removed { key: String, value: String },
    Changed { key: String, from: String, to: String },
}

/// Differences between two records. Content and plugins compare as sets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordDiff {
    pub mode: Option<(ScanMode, ScanMode)>,
    pub content_only_left: Vec<String>,
    pub content_only_right: Vec<String>,
    pub tokens: Vec<(ThemeSection, TokenChange)>,
    pub plugins_only_left: Vec<String>,
    pub plugins_only_right: Vec<String>,
}

impl RecordDiff {
    pub fn is_empty(&self) -> bool {
        *self == RecordDiff::default()
    }
}

fn set_difference(left: &[String], right: &[String]) -> (Vec<String>, Vec<String>) {
    let l: BTreeSet<&String> = left.iter().collect();
    let r: BTreeSet<&String> = right.iter().collect();
    (
        l.difference(&r).map(|s| s.to_string()).collect(),
        r.difference(&l).map(|s| s.to_string()).collect(),
    )
}

/// Compares effective theme tokens (base merged with `extend`).
pub fn diff(left: &ConfigRecord, right: &ConfigRecord) -> RecordDiff {
    let mode = (left.mode != right.mode).then_some((left.mode, right.mode));
    let (content_only_left, content_only_right) = set_difference(&left.content, &right.content);
    let (plugins_only_left, plugins_only_right) = set_difference(&left.plugins, &right.plugins);

    let mut tokens = Vec::new();
    for section in ThemeSection::ALL {
        let l = left.theme.tokens(section);
        let r = right.theme.tokens(section);

        for (key, value) in l.iter() {
            match r.get(key) {
                None => tokens.push((
                    section,
                    TokenChange::Removed {
                        key: key.to_string(),
                        value: value.to_string(),
                    },
                )),
                Some(other) if other != value => tokens.push((
                    section,
                    TokenChange::Changed {
                        key: key.to_string(),
                        from: value.to_string(),
                        to: other.to_string(),
                    },
                )),
                Some(_) => {}
            }
        }
        for key in r.keys().filter(|k| l.get(k).is_none()) {
            let value = r.get(key).unwrap_or_default();
            tokens.push((
                section,
                TokenChange::Added {
                    key: key.to_string(),
                    value: value.to_string(),
                },
            ));
        }
    }

    RecordDiff {
        mode,
        content_only_left,
        content_only_right,
        tokens,
        plugins_only_left,
        plugins_only_right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::snapshots::snapshot;

    #[test]
    fn identical_records_have_empty_diff() {
        let a = snapshot("primary").unwrap();
        assert!(diff(&a, &a.clone()).is_empty());
    }

    #[test]
    fn content_order_is_irrelevant() {
        let a = snapshot("primary").unwrap();
        let mut b = a.clone();
        b.content.reverse();
        assert!(diff(&a, &b).is_empty());
    }

    #[test]
    fn snapshots_diverge_only_on_min_width() {
        let d = diff(&snapshot("primary").unwrap(), &snapshot("alternate").unwrap());

        assert!(d.mode.is_none());
        assert!(d.content_only_left.is_empty() && d.content_only_right.is_empty());
        assert_eq!(
            d.tokens,
            vec![
                (
                    ThemeSection::MinWidth,
                    TokenChange::Removed {
                        key: "53".into(),
                        value: "13.25rem".into()
                    }
                ),
                (
                    ThemeSection::MinWidth,
                    TokenChange::Added {
                        key: "88".into(),
                        value: "22rem".into()
                    }
                ),
            ]
        );
    }

    #[test]
    fn reports_changed_values_mode_and_plugins() {
        let a = snapshot("primary").unwrap();
        let mut b = a.clone();
        b.mode = ScanMode::Jit;
        b.plugins.push("forms".into());
        b.theme
            .extend
            .insert("minHeight".into(), [("16", "5rem")].into_iter().collect());

        let d = diff(&a, &b);
        assert_eq!(d.mode, Some((ScanMode::All, ScanMode::Jit)));
        assert_eq!(d.plugins_only_right, vec!["forms"]);
        assert_eq!(
            d.tokens,
            vec![(
                ThemeSection::MinHeight,
                TokenChange::Changed {
                    key: "16".into(),
                    from: "4rem".into(),
                    to: "5rem".into()
                }
            )]
        );
    }
}
