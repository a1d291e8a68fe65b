#![deny(missing_docs)]

//! # Document Handling
//!
//! Loads, serializes and saves the API definition document.
//!
//! The document is held as a raw `serde_yaml::Value` tree: mappings preserve
//! insertion order, so round-tripping is stable and content this tool does
//! not understand survives untouched. Typed models are deliberately avoided
//! here; they would re-shape foreign parts of the document on write.

use crate::error::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Serialization family of the document file, detected from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML markup (the default).
    Yaml,
    /// JSON markup (`.json` extension).
    Json,
}

impl DocumentFormat {
    /// Detects the format from a file path; anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// An API definition document held as an ordered key-value tree.
///
/// The document remembers the format it was parsed from and is written back
/// in the same format.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDocument {
    root: Value,
    format: DocumentFormat,
}

impl ApiDocument {
    /// Parses a YAML document.
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let root: Value = serde_yaml::from_str(content)?;
        Ok(Self {
            root,
            format: DocumentFormat::Yaml,
        })
    }

    /// Parses a JSON document.
    ///
    /// The content goes through `serde_json` first (`preserve_order` keeps
    /// the key order) and is then transcoded into the YAML value tree.
    pub fn from_json_str(content: &str) -> AppResult<Self> {
        let raw: serde_json::Value = serde_json::from_str(content)?;
        let root = serde_yaml::to_value(raw)?;
        Ok(Self {
            root,
            format: DocumentFormat::Json,
        })
    }

    /// Reads and parses the document file, picking the format by extension.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::General(format!("Failed to read {:?}: {}", path, e)))?;

        match DocumentFormat::from_path(path) {
            DocumentFormat::Yaml => Self::from_yaml_str(&content),
            DocumentFormat::Json => Self::from_json_str(&content),
        }
    }

    /// The format the document was parsed from.
    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Root value of the document tree.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Serializes the document as YAML.
    pub fn to_yaml_string(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    /// Serializes the document as pretty-printed JSON.
    pub fn to_json_string(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Writes the document to `path` in its own format.
    ///
    /// The serialized text is first written to a temporary file in the
    /// destination directory and then persisted over the target, so a failed
    /// write cannot leave a truncated document behind.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        let serialized = match self.format {
            DocumentFormat::Yaml => self.to_yaml_string()?,
            DocumentFormat::Json => self.to_json_string()?,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)
            .map_err(|e| AppError::General(format!("Failed to create temp file in {:?}: {}", dir, e)))?;
        temp.write_all(serialized.as_bytes())?;
        temp.persist(path)
            .map_err(|e| AppError::General(format!("Failed to replace {:?}: {}", path, e)))?;

        Ok(())
    }

    /// The `paths` mapping. Absent (or non-mapping) `paths` reads as empty.
    pub fn paths(&self) -> Option<&Mapping> {
        self.root.get("paths").and_then(Value::as_mapping)
    }

    /// Whether `paths` contains the given key.
    pub fn has_path(&self, key: &str) -> bool {
        self.paths()
            .is_some_and(|paths| paths.contains_key(&Value::String(key.to_string())))
    }

    /// The path item stored under `key`, if any.
    pub fn path_item(&self, key: &str) -> Option<&Value> {
        self.paths()?.get(&Value::String(key.to_string()))
    }

    /// Path keys in document order (string keys only).
    pub fn path_keys(&self) -> Vec<String> {
        self.paths()
            .map(|paths| {
                paths
                    .iter()
                    .filter_map(|(k, _)| k.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Inserts `key: item` into `paths`, placed immediately before `anchor`
    /// when the anchor key is present, otherwise at the end of the mapping.
    ///
    /// Creates the `paths` mapping when the document has none; a `paths` key
    /// holding a non-mapping value is left alone and nothing is inserted.
    pub fn insert_path_before(&mut self, anchor: &str, key: &str, item: Value) {
        let Some(paths) = entry_mapping(self.root_mapping_mut(), "paths") else {
            return;
        };

        let anchor_key = Value::String(anchor.to_string());
        let new_key = Value::String(key.to_string());

        if !paths.contains_key(&anchor_key) {
            paths.insert(new_key, item);
            return;
        }

        let mut pending = Some((new_key, item));
        let existing = std::mem::take(paths);
        for (k, v) in existing {
            if k == anchor_key {
                if let Some((nk, nv)) = pending.take() {
                    paths.insert(nk, nv);
                }
            }
            paths.insert(k, v);
        }
    }

    /// Mutable access to the operation mapping at `paths.<path_key>.<method>`.
    pub fn path_operation_mut(&mut self, path_key: &str, method: &str) -> Option<&mut Mapping> {
        self.root
            .get_mut("paths")?
            .as_mapping_mut()?
            .get_mut(&Value::String(path_key.to_string()))?
            .as_mapping_mut()?
            .get_mut(&Value::String(method.to_string()))?
            .as_mapping_mut()
    }

    /// Inserts `components.<section>.<name> = value` when the name is absent.
    ///
    /// Existing definitions are never overwritten, and a pre-existing
    /// non-mapping `components`/section value is left alone. Returns true
    /// when the value was inserted.
    pub fn ensure_component(&mut self, section: &str, name: &str, value: Value) -> bool {
        let root = self.root_mapping_mut();
        let Some(components) = entry_mapping(root, "components") else {
            return false;
        };
        let Some(section_map) = entry_mapping(components, section) else {
            return false;
        };

        let key = Value::String(name.to_string());
        if section_map.contains_key(&key) {
            return false;
        }
        section_map.insert(key, value);
        true
    }

    fn root_mapping_mut(&mut self) -> &mut Mapping {
        if !self.root.is_mapping() {
            self.root = Value::Mapping(Mapping::new());
        }
        self.root.as_mapping_mut().expect("root coerced to mapping")
    }
}

/// Returns the mapping stored under `key`, creating an empty one when the key
/// is absent. Returns `None` when the key holds a non-mapping value.
fn entry_mapping<'a>(parent: &'a mut Mapping, key: &str) -> Option<&'a mut Mapping> {
    let key = Value::String(key.to_string());
    if !parent.contains_key(&key) {
        parent.insert(key.clone(), Value::Mapping(Mapping::new()));
    }
    parent.get_mut(&key)?.as_mapping_mut()
}
