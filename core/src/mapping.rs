//! # Resource Mappings
//!
//! The table of review endpoints to standardize. Each entry pairs a legacy
//! `add-review` path with its standardized `/{id}/reviews` replacement plus
//! the resource names used when generating the new operation.
//!
//! The builtin table covers the resources shipped with the tool; a custom
//! table can be loaded from a YAML file and is validated before use.

use crate::error::{AppError, AppResult};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// URL path characters plus `{param}` placeholders. The leading slash is
/// added by the patcher, so templates must not carry one.
const PATH_TEMPLATE_PATTERN: &str = r"^[A-Za-z0-9._~\-/{}]+$";

/// One review endpoint migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewMapping {
    /// Legacy path template without the leading slash (e.g. `doctors/add-review/{id}`).
    pub legacy_path: String,
    /// Standardized path template without the leading slash (e.g. `doctors/{id}/reviews`).
    pub new_path: String,
    /// Tag name for the generated operation (e.g. `Doctors`).
    pub resource_plural: String,
    /// Singular resource name used in the operation summary (e.g. `Doctor`).
    pub resource_singular: String,
}

impl ReviewMapping {
    /// Builds an entry from string slices (used by the builtin table and tests).
    pub fn new(legacy_path: &str, new_path: &str, plural: &str, singular: &str) -> Self {
        Self {
            legacy_path: legacy_path.to_string(),
            new_path: new_path.to_string(),
            resource_plural: plural.to_string(),
            resource_singular: singular.to_string(),
        }
    }

    /// The legacy path key as it appears in the document's `paths` mapping.
    pub fn legacy_key(&self) -> String {
        format!("/{}", self.legacy_path)
    }

    /// The standardized path key as it appears in the document's `paths` mapping.
    pub fn new_key(&self) -> String {
        format!("/{}", self.new_path)
    }
}

/// The fixed table of resources shipped with the tool, in processing order.
pub fn builtin_mappings() -> Vec<ReviewMapping> {
    vec![
        ReviewMapping::new(
            "businesses/add-review/{id}",
            "businesses/{id}/reviews",
            "Businesses",
            "Business",
        ),
        ReviewMapping::new(
            "restaurants/add-review/{id}",
            "restaurants/{id}/reviews",
            "Restaurants",
            "Restaurant",
        ),
        ReviewMapping::new(
            "doctors/add-review/{id}",
            "doctors/{id}/reviews",
            "Doctors",
            "Doctor",
        ),
        ReviewMapping::new(
            "markets/add-review/{id}",
            "markets/{id}/reviews",
            "Markets",
            "Market",
        ),
        ReviewMapping::new(
            "recipes/add-review/{id}",
            "recipes/{id}/reviews",
            "Recipes",
            "Recipe",
        ),
        ReviewMapping::new(
            "sanctuaries/add-review/{id}",
            "sanctuaries/{id}/reviews",
            "Sanctuaries",
            "Sanctuary",
        ),
        ReviewMapping::new(
            "professions/add-review/{id}",
            "professions/{id}/reviews",
            "Professions",
            "Profession",
        ),
    ]
}

/// Loads a mapping table from a YAML sequence file and validates it.
///
/// Expected file shape:
///
/// ```yaml
/// - legacy_path: widgets/add-review/{id}
///   new_path: widgets/{id}/reviews
///   resource_plural: Widgets
///   resource_singular: Widget
/// ```
pub fn load_mappings(path: &Path) -> AppResult<Vec<ReviewMapping>> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::General(format!("Failed to read mappings file {:?}: {}", path, e)))?;

    let mappings: Vec<ReviewMapping> = serde_yaml::from_str(&content).map_err(|e| {
        AppError::General(format!("Failed to parse mappings file {:?}: {}", path, e))
    })?;

    validate_mappings(&mappings)?;
    Ok(mappings)
}

/// Validates a mapping table before patching.
///
/// Rules:
/// - The table must not be empty.
/// - Path templates must be slash-free at the front, use URL path characters,
///   and contain the `{id}` placeholder.
/// - Resource names must be non-empty.
/// - `new_path` entries must be unique (duplicates would make the per-entry
///   report ambiguous).
pub fn validate_mappings(mappings: &[ReviewMapping]) -> AppResult<()> {
    if mappings.is_empty() {
        return Err(AppError::General(
            "Mapping table must contain at least one entry".into(),
        ));
    }

    let mut seen_new = HashSet::new();
    for mapping in mappings {
        validate_template(&mapping.legacy_path, "legacy_path")?;
        validate_template(&mapping.new_path, "new_path")?;

        if mapping.resource_plural.is_empty() || mapping.resource_singular.is_empty() {
            return Err(AppError::General(format!(
                "Mapping for '{}' must define non-empty resource names",
                mapping.new_path
            )));
        }

        if !seen_new.insert(mapping.new_path.as_str()) {
            return Err(AppError::General(format!(
                "Duplicate new_path '{}' in mapping table",
                mapping.new_path
            )));
        }
    }

    Ok(())
}

fn validate_template(template: &str, field: &str) -> AppResult<()> {
    static TEMPLATE_RE: OnceLock<Regex> = OnceLock::new();
    let template_re = TEMPLATE_RE
        .get_or_init(|| Regex::new(PATH_TEMPLATE_PATTERN).expect("Invalid regex constant"));

    if template.is_empty() {
        return Err(AppError::General(format!("{} must not be empty", field)));
    }

    if template.starts_with('/') {
        return Err(AppError::General(format!(
            "{} '{}' must not start with '/' (the patcher adds it)",
            field, template
        )));
    }

    if !template_re.is_match(template) {
        return Err(AppError::General(format!(
            "{} '{}' contains characters outside the allowed path set",
            field, template
        )));
    }

    if !template.contains("{id}") {
        return Err(AppError::General(format!(
            "{} '{}' must contain the '{{id}}' placeholder",
            field, template
        )));
    }

    Ok(())
}
