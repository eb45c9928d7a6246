//! Configuration identity of Green's functions
//!
//! Every Green's function describes its configuration as a list of [Setting]s. The list is put in
//! a canonical order (sorted by key) before hashing, so the hash does not depend on the order in
//! which an implementation lists its fields and is stable across runs and platforms.
use std::fmt;

/// Value of a configuration field.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// A name or an enum value
    Text(String),
    /// An integer
    Integer(i64),
    /// A floating point number
    Float(f64),
    /// A flag
    Boolean(bool),
    /// An optional field that is not set
    Absent,
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Text(s) => write!(f, "{s}"),
            SettingValue::Integer(n) => write!(f, "{n}"),
            SettingValue::Float(x) => write!(f, "{x:?}"),
            SettingValue::Boolean(b) => write!(f, "{b}"),
            SettingValue::Absent => write!(f, "None"),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Text(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Text(s)
    }
}

impl From<usize> for SettingValue {
    fn from(n: usize) -> Self {
        SettingValue::Integer(n as i64)
    }
}

impl From<f64> for SettingValue {
    fn from(x: f64) -> Self {
        SettingValue::Float(x)
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Boolean(b)
    }
}

impl<T: Into<SettingValue>> From<Option<T>> for SettingValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SettingValue::Absent, Into::into)
    }
}

/// A named configuration field.
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    /// Name of the field
    pub key: String,
    /// Value of the field
    pub value: SettingValue,
}

impl Setting {
    /// Create a setting.
    pub fn new(key: &str, value: impl Into<SettingValue>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Sort settings by key.
pub fn canonical_settings(settings: &[Setting]) -> Vec<Setting> {
    let mut sorted = settings.to_vec();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));
    sorted
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a hash of the canonical `key=value` list.
pub fn settings_hash(settings: &[Setting]) -> u64 {
    canonical_settings(settings)
        .iter()
        .flat_map(|s| s.to_string().into_bytes())
        .fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
        })
}

/// `name(key=value, ...)` listing only the settings that differ from `defaults`.
///
/// Settings keep the order in which they are given.
pub fn non_default_summary(name: &str, settings: &[Setting], defaults: &[Setting]) -> String {
    let changed = settings
        .iter()
        .filter(|s| !defaults.iter().any(|d| d == *s))
        .map(|s| s.to_string())
        .collect::<Vec<_>>();
    format!("{name}({})", changed.join(", "))
}
