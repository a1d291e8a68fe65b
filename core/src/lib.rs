#![deny(missing_docs)]

//! # Review Patch Core
//!
//! Core library for the swagger review-endpoint patcher.

/// Shared error types.
pub mod error;

/// The resource mapping table.
pub mod mapping;

/// API document load, access and persistence.
pub mod document;

/// Templates for the inserted OpenAPI fragments.
pub mod operation_generator;

/// The idempotent patch transform.
pub mod patcher;

pub use document::{ApiDocument, DocumentFormat};
pub use error::{AppError, AppResult};
pub use mapping::{builtin_mappings, load_mappings, validate_mappings, ReviewMapping};
pub use operation_generator::{
    bearer_security_scheme, build_path_item, build_review_operation, error_response_schema,
};
pub use patcher::{apply_review_mappings, PatchOutcome, PatchReport};
