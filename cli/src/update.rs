#![deny(missing_docs)]

//! # Update Command
//!
//! Implements the patch pipeline: load -> patch -> report -> save.
//!
//! 1. **Resolve table**: built-in resource mappings, or a YAML file given
//!    with `--mappings`.
//! 2. **Load**: the document is parsed into an order-preserving value tree.
//! 3. **Patch**: standardized review endpoints are inserted next to their
//!    legacy siblings, which are marked deprecated.
//! 4. **Save**: the document is written back atomically, and only when the
//!    run changed it.

use review_patch_core::document::ApiDocument;
use review_patch_core::mapping::{builtin_mappings, load_mappings, ReviewMapping};
use review_patch_core::patcher::apply_review_mappings;
use review_patch_core::AppResult;
use std::path::PathBuf;

/// Arguments for the update command.
#[derive(clap::Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Path to the swagger document to patch.
    #[clap(long, default_value = "swagger.yaml")]
    pub swagger_path: PathBuf,

    /// Optional YAML file overriding the built-in resource mapping table.
    #[clap(long)]
    pub mappings: Option<PathBuf>,

    /// Report what would change without writing the document back.
    #[clap(long)]
    pub dry_run: bool,
}

/// Executes the update pipeline.
pub fn execute(args: &UpdateArgs) -> AppResult<()> {
    // 1. Resolve the mapping table.
    let mappings = resolve_mappings(args)?;

    // 2. Load the document into an order-preserving value tree.
    let mut document = ApiDocument::load(&args.swagger_path)?;

    // 3. Apply the table and report every entry.
    let report = apply_review_mappings(&mut document, &mappings)?;
    for outcome in report.outcomes() {
        println!("{outcome}");
    }
    for component in report.added_components() {
        println!("✅ Added {component}");
    }

    // 4. Persist only when the run changed something.
    if !report.changed() {
        println!(
            "\nℹ️  No changes needed, {} is already up to date",
            args.swagger_path.display()
        );
        return Ok(());
    }
    if args.dry_run {
        println!(
            "\nℹ️  Dry run, not writing {}",
            args.swagger_path.display()
        );
        return Ok(());
    }
    document.save(&args.swagger_path)?;
    println!("\n✅ {} updated successfully!", args.swagger_path.display());

    Ok(())
}

fn resolve_mappings(args: &UpdateArgs) -> AppResult<Vec<ReviewMapping>> {
    match &args.mappings {
        Some(path) => load_mappings(path),
        None => Ok(builtin_mappings()),
    }
}
