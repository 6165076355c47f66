//! Typed schema of the scan/deletion JSON the report is built from.
//!
//! Every field is optional on the wire and `null` reads as absent. Numbers
//! are accepted as integers, floats or numeric strings, text fields take
//! numbers and booleans spelled out, and a value of the wrong shape falls
//! back to its default. A sloppy producer degrades single values instead of
//! voiding the whole document.

use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

use crate::error::Error;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportInput {
    #[serde(deserialize_with = "lenient_default")]
    pub system_info: SystemInfo,
    #[serde(deserialize_with = "lenient_vec")]
    pub drives: Vec<Drive>,
    #[serde(deserialize_with = "lenient_default")]
    pub deletion_report: DeletionReport,
    #[serde(deserialize_with = "lenient_string")]
    pub scanner_version: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub serial_number: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub total_drives: u64,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SystemInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub platform: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub release: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub version: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub hostname: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub ip: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Drive {
    #[serde(deserialize_with = "lenient_string")]
    pub drive: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub filesystem: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub total_space_bytes: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub used_space_bytes: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub free_space_bytes: u64,
    #[serde(deserialize_with = "lenient_string")]
    pub total_space_human: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub used_space_human: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub free_space_human: Option<String>,
    #[serde(deserialize_with = "lenient_default")]
    pub file_analysis: FileAnalysis,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileAnalysis {
    pub categories: Categories,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoryStats {
    #[serde(deserialize_with = "lenient_u64")]
    pub count: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub size: u64,
}

/// File categories in the order the producer listed them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Categories(pub Vec<(String, CategoryStats)>);

impl Categories {
    pub fn iter(&self) -> impl Iterator<Item = &(String, CategoryStats)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Categories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CategoriesVisitor;

        impl<'de> Visitor<'de> for CategoriesVisitor {
            type Value = Categories;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category name to {count, size}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Categories, A::Error> {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(name) = map.next_key::<String>()? {
                    let stats = map.next_value::<Lenient<CategoryStats>>()?;
                    out.push((name, stats.ok().unwrap_or_default()));
                }
                Ok(Categories(out))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Categories, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(Categories::default())
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Categories, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(self)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Categories, E> {
                Ok(Categories::default())
            }

            fn visit_none<E: de::Error>(self) -> Result<Categories, E> {
                Ok(Categories::default())
            }

            fn visit_bool<E: de::Error>(self, _: bool) -> Result<Categories, E> {
                Ok(Categories::default())
            }

            fn visit_i64<E: de::Error>(self, _: i64) -> Result<Categories, E> {
                Ok(Categories::default())
            }

            fn visit_u64<E: de::Error>(self, _: u64) -> Result<Categories, E> {
                Ok(Categories::default())
            }

            fn visit_f64<E: de::Error>(self, _: f64) -> Result<Categories, E> {
                Ok(Categories::default())
            }

            fn visit_str<E: de::Error>(self, _: &str) -> Result<Categories, E> {
                Ok(Categories::default())
            }
        }

        deserializer.deserialize_any(CategoriesVisitor)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeletionReport {
    #[serde(deserialize_with = "lenient_vec")]
    pub items: Vec<DeletionItem>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeletionItem {
    #[serde(deserialize_with = "lenient_string")]
    pub path: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub size: u64,
    #[serde(deserialize_with = "lenient_bool")]
    pub success: Option<bool>,
    #[serde(deserialize_with = "lenient_string")]
    pub error: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub category: Option<String>,
}

impl DeletionItem {
    /// Items without an explicit flag count as deleted.
    pub fn succeeded(&self) -> bool {
        self.success.unwrap_or(true)
    }

    pub fn display_path(&self) -> &str {
        self.path
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("")
    }
}

/// A value that parsed, or whatever stood in its place.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(IgnoredAny),
}

impl<T> Lenient<T> {
    fn ok(self) -> Option<T> {
        match self {
            Lenient::Value(value) => Some(value),
            Lenient::Other(_) => None,
        }
    }
}

fn lenient_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Lenient::<T>::deserialize(deserializer)?.ok().unwrap_or_default())
}

/// A list whose unreadable elements are skipped; anything but a list is empty.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Lenient::<Vec<Lenient<T>>>::deserialize(deserializer)?
        .ok()
        .unwrap_or_default();
    Ok(items.into_iter().filter_map(Lenient::ok).collect())
}

/// Strings as given, numbers and booleans spelled out, anything else absent.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Flag(bool),
        Other(IgnoredAny),
    }

    Ok(match Text::deserialize(deserializer)? {
        Text::Str(s) => Some(s),
        Text::Unsigned(n) => Some(n.to_string()),
        Text::Signed(n) => Some(n.to_string()),
        Text::Float(f) => Some(f.to_string()),
        Text::Flag(b) => Some(b.to_string()),
        Text::Other(_) => None,
    })
}

/// Booleans, or the strings `true`/`false` in any case; anything else absent.
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Some(b),
        Flag::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Flag::Other(_) => None,
    })
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let value = match Option::<Number>::deserialize(deserializer)? {
        None => 0,
        Some(Number::Unsigned(n)) => n,
        Some(Number::Signed(n)) => n.max(0) as u64,
        Some(Number::Float(f)) if f.is_finite() && f > 0.0 => f as u64,
        Some(Number::Float(_)) => 0,
        Some(Number::Text(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite() && *f > 0.0)
                        .map(|f| f as u64)
                })
                .unwrap_or(0)
        }
        Some(Number::Other(_)) => 0,
    };
    Ok(value)
}

impl ReportInput {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Input(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        let input = Self::from_json(&json)?;
        log::debug!(
            "input {}: {} drives, {} deletion items",
            path.display(),
            input.drives.len(),
            input.deletion_report.items.len()
        );
        Ok(input)
    }

    pub fn total_capacity(&self) -> u64 {
        self.drives
            .iter()
            .map(|d| d.total_space_bytes)
            .fold(0, u64::saturating_add)
    }

    pub fn total_used(&self) -> u64 {
        self.drives
            .iter()
            .map(|d| d.used_space_bytes)
            .fold(0, u64::saturating_add)
    }

    /// Share of total capacity in use, 0 when nothing was reported.
    pub fn used_percent(&self) -> f64 {
        let total = self.total_capacity();
        if total == 0 {
            0.0
        } else {
            self.total_used() as f64 / total as f64 * 100.0
        }
    }

    pub fn drive_count(&self) -> u64 {
        if self.total_drives > 0 {
            self.total_drives
        } else {
            self.drives.len() as u64
        }
    }

    /// Platform, release and version joined; "Windows" when none is known.
    pub fn os_description(&self) -> String {
        let info = &self.system_info;
        let parts: Vec<&str> = [&info.platform, &info.release, &info.version]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            "Windows".to_string()
        } else {
            parts.join(" ")
        }
    }
}
