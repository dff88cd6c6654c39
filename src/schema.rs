//! Closed, default-filling configuration schemas.
//!
//! Every config struct in the crate derives `Deserialize` with
//! `#[serde(deny_unknown_fields, default)]` and implements [`Validate`] for its
//! numeric bounds. Authored documents are read into a `serde_json::Value`
//! first so that a failing key can be located and reported with its full path.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Dotted location of a node in a configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPath(Vec<String>);

impl ConfigPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0.join("."))
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("failed to parse {format} document: {message}")]
    Parse { format: &'static str, message: String },
    #[error("{path}: unknown key ({message})")]
    UnknownKey { path: ConfigPath, message: String },
    #[error("{path}: {message}")]
    Invalid { path: ConfigPath, message: String },
    #[error("{path}: value {value} is outside [{min}, {max}]")]
    OutOfRange {
        path: ConfigPath,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(String),
    #[error("{}", join_issues(.0))]
    Many(Vec<ConfigError>),
}

fn join_issues(issues: &[ConfigError]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConfigError {
    /// Path of the offending node, if the error has one.
    pub fn path(&self) -> Option<&ConfigPath> {
        match self {
            ConfigError::UnknownKey { path, .. }
            | ConfigError::Invalid { path, .. }
            | ConfigError::OutOfRange { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Payload of strategies that take no options.
///
/// Serializes to the bare `strategy` tag and rejects any other key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoOptions {}

/// Accumulated validation failures.
pub type Issues = Vec<ConfigError>;

/// Range checks for a config node.
pub trait Validate {
    /// Pushes one issue per violated bound; `path` is this node's location.
    fn validate(&self, path: &ConfigPath, issues: &mut Issues);

    /// Validates from the document root and folds the issues into one error.
    fn validate_at_root(&self) -> Result<(), ConfigError> {
        let mut issues = Issues::new();
        self.validate(&ConfigPath::root(), &mut issues);
        into_result(issues)
    }
}

/// `Ok(())` for no issues, the single issue, or [`ConfigError::Many`].
pub fn into_result(mut issues: Issues) -> Result<(), ConfigError> {
    match issues.len() {
        0 => Ok(()),
        1 => Err(issues.remove(0)),
        _ => Err(ConfigError::Many(issues)),
    }
}

/// Records an [`ConfigError::OutOfRange`] for `path.field` unless `min <= value <= max`.
pub fn check_range(issues: &mut Issues, path: &ConfigPath, field: &str, value: f64, min: f64, max: f64) {
    if value.is_nan() || value < min || value > max {
        issues.push(ConfigError::OutOfRange {
            path: path.child(field),
            value,
            min,
            max,
        });
    }
}

/// Parses a TOML document into a generic value tree.
pub fn parse_toml(text: &str) -> Result<Value, ConfigError> {
    toml::from_str::<Value>(text).map_err(|e| ConfigError::Parse {
        format: "TOML",
        message: e.to_string(),
    })
}

/// Parses a JSON document into a generic value tree.
pub fn parse_json(text: &str) -> Result<Value, ConfigError> {
    serde_json::from_str::<Value>(text).map_err(|e| ConfigError::Parse {
        format: "JSON",
        message: e.to_string(),
    })
}

/// Serializes a config node into a value tree.
pub fn to_value<T: Serialize>(node: &T) -> Result<Value, ConfigError> {
    serde_json::to_value(node).map_err(|e| ConfigError::Serialize(e.to_string()))
}

/// Deserializes `value` as `T`, reporting failures at the deepest offending key.
///
/// All schema structs fill missing fields from their defaults, so a document
/// reduced to a single key is still decodable. Failing documents are narrowed
/// key by key until the smallest failing subtree is found. A `strategy` tag is
/// kept on every reduced node so tagged strategy configs still resolve.
pub fn decode<T: DeserializeOwned>(value: &Value, path: &ConfigPath) -> Result<T, ConfigError> {
    match T::deserialize(value) {
        Ok(node) => Ok(node),
        Err(err) => {
            let (focus, message) = match narrow::<T>(value, &[]) {
                Some(found) => found,
                None => (Vec::new(), err.to_string()),
            };
            let mut at = path.clone();
            for key in focus {
                at = at.child(key);
            }
            if message.starts_with("unknown field") || message.starts_with("unknown variant") {
                Err(ConfigError::UnknownKey { path: at, message })
            } else {
                Err(ConfigError::Invalid { path: at, message })
            }
        }
    }
}

fn narrow<T: DeserializeOwned>(root: &Value, focus: &[String]) -> Option<(Vec<String>, String)> {
    let node = node_at(root, focus)?.as_object()?;
    for (key, child) in node {
        if key == "strategy" {
            continue;
        }
        let mut reduced = Map::new();
        if let Some(tag) = node.get("strategy") {
            reduced.insert("strategy".to_string(), tag.clone());
        }
        reduced.insert(key.clone(), child.clone());

        let mut candidate = root.clone();
        if let Some(slot) = node_at_mut(&mut candidate, focus) {
            *slot = Value::Object(reduced);
        }

        if let Err(err) = T::deserialize(&candidate) {
            let mut deeper = focus.to_vec();
            deeper.push(key.clone());
            return narrow::<T>(&candidate, &deeper).or(Some((deeper, err.to_string())));
        }
    }

    // Only the tag itself can be at fault now.
    if let Some(tag) = node.get("strategy") {
        let mut reduced = Map::new();
        reduced.insert("strategy".to_string(), tag.clone());
        let mut candidate = root.clone();
        if let Some(slot) = node_at_mut(&mut candidate, focus) {
            *slot = Value::Object(reduced);
        }
        if let Err(err) = T::deserialize(&candidate) {
            let mut deeper = focus.to_vec();
            deeper.push("strategy".to_string());
            return Some((deeper, err.to_string()));
        }
    }
    None
}

fn node_at<'a>(root: &'a Value, focus: &[String]) -> Option<&'a Value> {
    focus.iter().try_fold(root, |v, key| v.get(key))
}

fn node_at_mut<'a>(root: &'a mut Value, focus: &[String]) -> Option<&'a mut Value> {
    focus.iter().try_fold(root, |v, key| v.get_mut(key))
}
