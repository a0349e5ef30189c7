use crate::app::matcher::compile_body;
use crate::app::models::{ConfigRecord, ThemeSection, TokenMap};
use std::fmt;

const UNITS: [&str; 22] = [
    "px", "rem", "em", "%", "vh", "vw", "vmin", "vmax", "svh", "lvh", "dvh", "svw", "lvw", "dvw",
    "ch", "ex", "pt", "pc", "cm", "mm", "in", "fr",
];

const KEYWORDS: [&str; 6] = [
    "auto",
    "none",
    "full",
    "min-content",
    "max-content",
    "fit-content",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    pub location: String,
    pub message: String,
}

impl Issue {
    fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            location: location.into(),
            message: message.into(),
        }
    }

    fn warning(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {}: {}", tag, self.location, self.message)
    }
}

pub fn has_errors(issues: &[Issue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

/// Checks a record and returns every problem found, errors and warnings mixed.
pub fn validate(record: &ConfigRecord) -> Vec<Issue> {
    let mut issues = Vec::new();

    if record.content.is_empty() {
        issues.push(Issue::warning("content", "no content patterns; nothing will be scanned"));
    }

    for (idx, pattern) in record.content.iter().enumerate() {
        let location = format!("content[{}]", idx);
        if pattern.trim().is_empty() {
            issues.push(Issue::error(location, "pattern is empty"));
            continue;
        }
        if let Err(err) = compile_body(idx, pattern) {
            issues.push(Issue::error(location, err.to_string()));
        }
    }

    for section in ThemeSection::ALL {
        check_tokens(
            &format!("theme.{}", section.config_key()),
            record.theme.section(section),
            &mut issues,
        );
    }

    for (name, tokens) in &record.theme.extend {
        let location = format!("theme.extend.{}", name);
        let known = ThemeSection::ALL.iter().any(|s| s.config_key() == name);
        if !known {
            issues.push(Issue::warning(
                location.clone(),
                "unknown theme section; the generator may ignore it",
            ));
        }
        check_tokens(&location, tokens, &mut issues);
    }

    issues
}

fn check_tokens(location: &str, tokens: &TokenMap, issues: &mut Vec<Issue>) {
    for (key, value) in tokens.iter() {
        if key.trim().is_empty() {
            issues.push(Issue::error(location, "token key is empty"));
            continue;
        }
        let at = format!("{}.{}", location, key);
        if value.trim().is_empty() {
            issues.push(Issue::error(at, "token value is empty"));
        } else if !is_css_length(value) {
            issues.push(Issue::warning(
                at,
                format!("`{}` does not look like a CSS length", value),
            ));
        }
    }
}

/// Accepts `0`, a number with a known unit, a sizing keyword, or a
/// `calc()`/`var()`/`min()`/`max()`/`clamp()` expression.
pub fn is_css_length(value: &str) -> bool {
    let value = value.trim();
    if value == "0" || KEYWORDS.contains(&value) {
        return true;
    }
    if ["calc(", "var(", "min(", "max(", "clamp("]
        .iter()
        .any(|f| value.starts_with(f))
        && value.ends_with(')')
    {
        return true;
    }

    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    number.parse::<f64>().is_ok() && UNITS.contains(&unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::snapshots::snapshot;

    #[test]
    fn snapshots_are_clean() {
        for name in ["primary", "alternate"] {
            let issues = validate(&snapshot(name).unwrap());
            assert!(issues.is_empty(), "{}: {:?}", name, issues);
        }
    }

    #[test]
    fn empty_and_invalid_patterns_are_errors() {
        let record = ConfigRecord {
            content: vec!["".into(), "src/**/*.{rs".into(), "ok/*.rs".into()],
            ..ConfigRecord::default()
        };
        let issues = validate(&record);
        assert!(has_errors(&issues));
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].location, "content[0]");
        assert_eq!(issues[1].location, "content[1]");
    }

    #[test]
    fn empty_content_is_a_warning() {
        let issues = validate(&ConfigRecord::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(!has_errors(&issues));
    }

    #[test]
    fn token_values_are_checked() {
        let mut record = snapshot("primary").unwrap();
        record.theme.min_height = [("16", "4rem"), ("20", ""), ("24", "tall")]
            .into_iter()
            .collect();
        record
            .theme
            .extend
            .insert("colors".into(), [("brand", "1px")].into_iter().collect());

        let issues = validate(&record);
        let errors: Vec<_> = issues.iter().filter(|i| i.severity == Severity::Error).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location, "theme.minHeight.20");
        assert!(issues
            .iter()
            .any(|i| i.location == "theme.minHeight.24" && i.severity == Severity::Warning));
        assert!(issues.iter().any(|i| i.location == "theme.extend.colors"));
    }

    #[test]
    fn recognizes_css_lengths() {
        for ok in ["13.25rem", "4rem", "0", "100%", "22rem", "-1px", "min-content", "calc(100% - 1rem)"] {
            assert!(is_css_length(ok), "{}", ok);
        }
        for bad in ["rem", "12", "abc", "1.2.3px", "12furlongs"] {
            assert!(!is_css_length(bad), "{}", bad);
        }
    }
}
