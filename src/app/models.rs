use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Scan strategy token handed to the generator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    #[default]
    All,
    Jit,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::All => f.write_str("all"),
            ScanMode::Jit => f.write_str("jit"),
        }
    }
}

/// Token key -> length string. Keys are unique; a duplicate key in the
/// source document is a deserialization error rather than last-one-wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenMap(BTreeMap<String, String>);

impl TokenMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlays `other` on top of `self`, returning the combined map.
    pub fn merged(&self, other: &TokenMap) -> TokenMap {
        let mut combined = self.0.clone();
        for (k, v) in &other.0 {
            combined.insert(k.clone(), v.clone());
        }
        TokenMap(combined)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TokenMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        TokenMap(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Serialize for TokenMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct TokenMapVisitor;

impl<'de> Visitor<'de> for TokenMapVisitor {
    type Value = TokenMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of token keys to length strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TokenMap, A::Error> {
        let mut tokens = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            if tokens.contains_key(&key) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate token key `{}`",
                    key
                )));
            }
            tokens.insert(key, value);
        }
        Ok(TokenMap(tokens))
    }
}

impl<'de> Deserialize<'de> for TokenMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TokenMapVisitor)
    }
}

/// Theme sections that carry dimensional tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ThemeSection {
    MinWidth,
    MinHeight,
}

impl ThemeSection {
    pub const ALL: [ThemeSection; 2] = [ThemeSection::MinWidth, ThemeSection::MinHeight];

    /// Key used in the configuration document.
    pub fn config_key(self) -> &'static str {
        match self {
            ThemeSection::MinWidth => "minWidth",
            ThemeSection::MinHeight => "minHeight",
        }
    }

    /// Utility-class prefix the generator derives from this section.
    pub fn class_prefix(self) -> &'static str {
        match self {
            ThemeSection::MinWidth => "min-w",
            ThemeSection::MinHeight => "min-h",
        }
    }

    pub fn css_property(self) -> &'static str {
        match self {
            ThemeSection::MinWidth => "min-width",
            ThemeSection::MinHeight => "min-height",
        }
    }
}

impl fmt::Display for ThemeSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_property())
    }
}

impl FromStr for ThemeSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min-width" | "minWidth" | "min-w" => Ok(ThemeSection::MinWidth),
            "min-height" | "minHeight" | "min-h" => Ok(ThemeSection::MinHeight),
            other => Err(format!(
                "unknown theme section `{}` (expected min-width or min-height)",
                other
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Theme {
    #[serde(default)]
    pub min_width: TokenMap,
    #[serde(default)]
    pub min_height: TokenMap,
    /// Additive overrides keyed by section name (e.g. `minWidth`).
    #[serde(default)]
    pub extend: BTreeMap<String, TokenMap>,
}

impl Theme {
    /// Base tokens of a section, without `extend`.
    pub fn section(&self, section: ThemeSection) -> &TokenMap {
        match section {
            ThemeSection::MinWidth => &self.min_width,
            ThemeSection::MinHeight => &self.min_height,
        }
    }

    pub fn extension(&self, section: ThemeSection) -> Option<&TokenMap> {
        self.extend.get(section.config_key())
    }

    /// Effective value of a token; `extend` wins over the base section.
    pub fn lookup(&self, section: ThemeSection, key: &str) -> Option<&str> {
        self.extension(section)
            .and_then(|ext| ext.get(key))
            .or_else(|| self.section(section).get(key))
    }

    /// Effective token map of a section.
    pub fn tokens(&self, section: ThemeSection) -> TokenMap {
        match self.extension(section) {
            Some(ext) => self.section(section).merged(ext),
            None => self.section(section).clone(),
        }
    }
}

/// The declarative record consumed by the utility-class generator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigRecord {
    #[serde(default)]
    pub mode: ScanMode,
    #[serde(default)]
    pub content: Vec<String>,
    #[serde(default)]
    pub plugins: Vec<String>,
    #[serde(default)]
    pub theme: Theme,
}
