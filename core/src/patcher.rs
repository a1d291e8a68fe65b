#![deny(missing_docs)]

//! # Review Endpoint Patcher
//!
//! The single-pass transform at the heart of this tool. Walks the resource
//! mapping table in order and, for each entry, inserts the standardized
//! review `post` operation next to its legacy sibling, marking the legacy
//! operation deprecated. Entries whose standardized path already exists are
//! skipped untouched, and entries whose legacy path is absent degrade to a
//! warning, so re-running the patch over an already-patched document is a
//! no-op.

use crate::document::ApiDocument;
use crate::error::AppResult;
use crate::mapping::ReviewMapping;
use crate::operation_generator::{
    bearer_security_scheme, build_path_item, error_response_schema, BEARER_SCHEME_NAME,
    ERROR_SCHEMA_NAME,
};
use serde_yaml::Value;
use std::fmt;

/// Substring marking a summary as already carrying the legacy notice.
const LEGACY_MARKER: &str = "Legacy";

/// The result of processing one mapping table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The standardized operation was inserted next to its legacy sibling.
    Added {
        /// Path key of the inserted standardized operation.
        new_path: String,
    },
    /// The standardized path already exists; the entry was skipped untouched.
    AlreadyPresent {
        /// Path key that was already present.
        new_path: String,
    },
    /// Neither the standardized nor the legacy path exists in the document.
    LegacyMissing {
        /// Path key that could not be found.
        legacy_path: String,
    },
}

impl fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOutcome::Added { new_path } => {
                write!(f, "✅ Added {new_path} POST operation")
            }
            PatchOutcome::AlreadyPresent { new_path } => {
                write!(f, "ℹ️  {new_path} already exists, skipping")
            }
            PatchOutcome::LegacyMissing { legacy_path } => {
                write!(f, "⚠️  Could not find {legacy_path}")
            }
        }
    }
}

/// Everything a run changed, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatchReport {
    outcomes: Vec<PatchOutcome>,
    added_components: Vec<String>,
}

impl PatchReport {
    /// Per-entry outcomes, one per mapping table entry, in table order.
    pub fn outcomes(&self) -> &[PatchOutcome] {
        &self.outcomes
    }

    /// Dotted names of shared components this run inserted.
    pub fn added_components(&self) -> &[String] {
        &self.added_components
    }

    /// Number of standardized operations this run inserted.
    pub fn added(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PatchOutcome::Added { .. }))
            .count()
    }

    /// Number of entries whose legacy path could not be found.
    pub fn warnings(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PatchOutcome::LegacyMissing { .. }))
            .count()
    }

    /// Whether the document was mutated and needs to be written back.
    pub fn changed(&self) -> bool {
        self.added() > 0 || !self.added_components.is_empty()
    }
}

/// Applies the review mapping table to a loaded document.
///
/// Structural absences (missing legacy path, missing `post` operation) are
/// recorded in the report rather than raised; the only errors are internal
/// serialization failures while building operation templates.
pub fn apply_review_mappings(
    document: &mut ApiDocument,
    mappings: &[ReviewMapping],
) -> AppResult<PatchReport> {
    let mut outcomes = Vec::with_capacity(mappings.len());

    // 1. Walk the table in order; entries are independent of each other.
    for mapping in mappings {
        let legacy_key = mapping.legacy_key();
        let new_key = mapping.new_key();

        if document.has_path(&new_key) {
            outcomes.push(PatchOutcome::AlreadyPresent { new_path: new_key });
            continue;
        }
        if !document.has_path(&legacy_key) {
            outcomes.push(PatchOutcome::LegacyMissing {
                legacy_path: legacy_key,
            });
            continue;
        }

        // 2. Insert the standardized operation right before its legacy
        //    sibling, then mark the legacy operation deprecated.
        let item = build_path_item(mapping)?;
        document.insert_path_before(&legacy_key, &new_key, item);
        deprecate_legacy_post(document, &legacy_key, &mapping.new_path);

        outcomes.push(PatchOutcome::Added { new_path: new_key });
    }

    // 3. The inserted operations reference shared components; make sure those
    //    exist, without ever overwriting definitions already in the document.
    let mut added_components = Vec::new();
    if outcomes
        .iter()
        .any(|o| matches!(o, PatchOutcome::Added { .. }))
    {
        if document.ensure_component("schemas", ERROR_SCHEMA_NAME, error_response_schema()?) {
            added_components.push(format!("components.schemas.{ERROR_SCHEMA_NAME}"));
        }
        if document.ensure_component(
            "securitySchemes",
            BEARER_SCHEME_NAME,
            bearer_security_scheme()?,
        ) {
            added_components.push(format!("components.securitySchemes.{BEARER_SCHEME_NAME}"));
        }
    }

    Ok(PatchReport {
        outcomes,
        added_components,
    })
}

/// Marks the legacy `post` operation deprecated and suffixes its summary with
/// a pointer at the standardized path. Summaries already mentioning "Legacy"
/// are left alone so repeated runs do not accumulate suffixes. Legacy path
/// items without a `post` operation are left untouched.
fn deprecate_legacy_post(document: &mut ApiDocument, legacy_key: &str, new_path: &str) {
    let Some(operation) = document.path_operation_mut(legacy_key, "post") else {
        return;
    };

    operation.insert(Value::String("deprecated".to_string()), Value::Bool(true));

    let summary_key = Value::String("summary".to_string());
    let suffix = format!("(Legacy - Use /{new_path})");
    let summary = match operation.get(&summary_key).and_then(Value::as_str) {
        Some(current) if current.contains(LEGACY_MARKER) => return,
        Some(current) => format!("{current} {suffix}"),
        None => suffix,
    };
    operation.insert(summary_key, Value::String(summary));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widgets() -> Vec<ReviewMapping> {
        vec![ReviewMapping::new(
            "widgets/add-review/{id}",
            "widgets/{id}/reviews",
            "Widgets",
            "Widget",
        )]
    }

    fn document(yaml: &str) -> ApiDocument {
        ApiDocument::from_yaml_str(yaml).unwrap()
    }

    #[test]
    fn test_inserts_operation_before_legacy_sibling() {
        let mut doc = document(
            r#"
paths:
  /health:
    get:
      summary: Health check
  /widgets/add-review/{id}:
    post:
      summary: Add Review
"#,
        );

        let report = apply_review_mappings(&mut doc, &widgets()).unwrap();

        assert_eq!(report.added(), 1);
        assert_eq!(
            report.outcomes()[0].to_string(),
            "✅ Added /widgets/{id}/reviews POST operation"
        );
        assert_eq!(
            doc.path_keys(),
            vec![
                "/health",
                "/widgets/{id}/reviews",
                "/widgets/add-review/{id}",
            ]
        );

        let post = doc
            .path_item("/widgets/{id}/reviews")
            .and_then(|item| item.get("post"))
            .unwrap();
        let tags: Vec<_> = post
            .get("tags")
            .and_then(Value::as_sequence)
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(tags, vec!["Widgets"]);

        let required: Vec<_> = post
            .get("requestBody")
            .and_then(|b| b.get("content"))
            .and_then(|c| c.get("application/json"))
            .and_then(|m| m.get("schema"))
            .and_then(|s| s.get("required"))
            .and_then(Value::as_sequence)
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(required, vec!["rating", "comment"]);
    }

    #[test]
    fn test_skips_when_standardized_path_exists() {
        let mut doc = document(
            r#"
paths:
  /widgets/{id}/reviews:
    get:
      summary: Custom listing kept as-is
"#,
        );
        let before = doc.to_yaml_string().unwrap();

        let report = apply_review_mappings(&mut doc, &widgets()).unwrap();

        assert_eq!(
            report.outcomes(),
            &[PatchOutcome::AlreadyPresent {
                new_path: "/widgets/{id}/reviews".to_string(),
            }]
        );
        assert!(!report.changed());
        assert!(report.added_components().is_empty());
        assert_eq!(doc.to_yaml_string().unwrap(), before);
    }

    #[test]
    fn test_marks_legacy_operation_deprecated() {
        let mut doc = document(
            r#"
paths:
  /widgets/add-review/{id}:
    post:
      summary: Add Review
"#,
        );

        apply_review_mappings(&mut doc, &widgets()).unwrap();

        let legacy_post = doc
            .path_item("/widgets/add-review/{id}")
            .and_then(|item| item.get("post"))
            .unwrap();
        assert_eq!(
            legacy_post.get("deprecated").and_then(Value::as_bool),
            Some(true)
        );
        assert_eq!(
            legacy_post.get("summary").and_then(Value::as_str),
            Some("Add Review (Legacy - Use /widgets/{id}/reviews)")
        );
    }

    #[test]
    fn test_legacy_summary_already_marked_is_left_alone() {
        let mut doc = document(
            r#"
paths:
  /widgets/add-review/{id}:
    post:
      summary: Add Review (Legacy - Use /widgets/{id}/reviews)
      deprecated: true
"#,
        );

        apply_review_mappings(&mut doc, &widgets()).unwrap();

        let legacy_post = doc
            .path_item("/widgets/add-review/{id}")
            .and_then(|item| item.get("post"))
            .unwrap();
        assert_eq!(
            legacy_post.get("summary").and_then(Value::as_str),
            Some("Add Review (Legacy - Use /widgets/{id}/reviews)")
        );
    }

    #[test]
    fn test_legacy_without_summary_gets_marker() {
        let mut doc = document(
            r#"
paths:
  /widgets/add-review/{id}:
    post:
      tags:
      - Widgets
"#,
        );

        apply_review_mappings(&mut doc, &widgets()).unwrap();

        let legacy_post = doc
            .path_item("/widgets/add-review/{id}")
            .and_then(|item| item.get("post"))
            .unwrap();
        assert_eq!(
            legacy_post.get("summary").and_then(Value::as_str),
            Some("(Legacy - Use /widgets/{id}/reviews)")
        );
    }

    #[test]
    fn test_legacy_without_post_is_left_untouched() {
        let mut doc = document(
            r#"
paths:
  /widgets/add-review/{id}:
    get:
      summary: Oddly shaped legacy entry
"#,
        );

        let report = apply_review_mappings(&mut doc, &widgets()).unwrap();

        assert_eq!(report.added(), 1);
        let legacy_item = doc.path_item("/widgets/add-review/{id}").unwrap();
        assert!(legacy_item.get("post").is_none());
        assert!(doc.has_path("/widgets/{id}/reviews"));
    }

    #[test]
    fn test_warns_when_legacy_path_is_absent() {
        let mut doc = document("paths: {}\n");

        let report = apply_review_mappings(&mut doc, &widgets()).unwrap();

        assert_eq!(
            report.outcomes(),
            &[PatchOutcome::LegacyMissing {
                legacy_path: "/widgets/add-review/{id}".to_string(),
            }]
        );
        assert_eq!(
            report.outcomes()[0].to_string(),
            "⚠️  Could not find /widgets/add-review/{id}"
        );
        assert_eq!(report.warnings(), 1);
        assert!(!report.changed());
        assert!(doc.path_keys().is_empty());
    }

    #[test]
    fn test_patch_is_idempotent() {
        let source = r#"
paths:
  /widgets/add-review/{id}:
    post:
      summary: Add Review
"#;
        let mut once = document(source);
        apply_review_mappings(&mut once, &widgets()).unwrap();

        let mut twice = document(source);
        apply_review_mappings(&mut twice, &widgets()).unwrap();
        let second = apply_review_mappings(&mut twice, &widgets()).unwrap();

        assert_eq!(second.added(), 0);
        assert!(!second.changed());
        assert_eq!(
            twice.to_yaml_string().unwrap(),
            once.to_yaml_string().unwrap()
        );
    }

    #[test]
    fn test_shared_components_are_added_once() {
        let mut doc = document(
            r#"
paths:
  /widgets/add-review/{id}:
    post:
      summary: Add Review
"#,
        );

        let report = apply_review_mappings(&mut doc, &widgets()).unwrap();

        assert_eq!(
            report.added_components(),
            &[
                "components.schemas.ErrorResponse".to_string(),
                "components.securitySchemes.bearerAuth".to_string(),
            ]
        );
        assert!(doc
            .root()
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(|s| s.get("ErrorResponse"))
            .is_some());
        assert!(doc
            .root()
            .get("components")
            .and_then(|c| c.get("securitySchemes"))
            .and_then(|s| s.get("bearerAuth"))
            .is_some());
    }

    #[test]
    fn test_existing_components_are_not_overwritten() {
        let mut doc = document(
            r#"
paths:
  /widgets/add-review/{id}:
    post:
      summary: Add Review
components:
  schemas:
    ErrorResponse:
      type: object
      description: Site-specific error shape
"#,
        );

        let report = apply_review_mappings(&mut doc, &widgets()).unwrap();

        assert_eq!(
            report.added_components(),
            &["components.securitySchemes.bearerAuth".to_string()]
        );
        assert_eq!(
            doc.root()
                .get("components")
                .and_then(|c| c.get("schemas"))
                .and_then(|s| s.get("ErrorResponse"))
                .and_then(|e| e.get("description"))
                .and_then(Value::as_str),
            Some("Site-specific error shape")
        );
    }

    #[test]
    fn test_outcomes_follow_table_order() {
        let mappings = vec![
            ReviewMapping::new(
                "widgets/add-review/{id}",
                "widgets/{id}/reviews",
                "Widgets",
                "Widget",
            ),
            ReviewMapping::new(
                "gadgets/add-review/{id}",
                "gadgets/{id}/reviews",
                "Gadgets",
                "Gadget",
            ),
        ];
        let mut doc = document(
            r#"
paths:
  /widgets/add-review/{id}:
    post:
      summary: Add Review
"#,
        );

        let report = apply_review_mappings(&mut doc, &mappings).unwrap();

        assert_eq!(report.outcomes().len(), 2);
        assert!(matches!(
            report.outcomes()[0],
            PatchOutcome::Added { .. }
        ));
        assert!(matches!(
            report.outcomes()[1],
            PatchOutcome::LegacyMissing { .. }
        ));
    }
}
