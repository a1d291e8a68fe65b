#![deny(missing_docs)]

//! # Review Patch CLI
//!
//! Command line tool that inserts standardized review-submission endpoints
//! into a swagger document, next to the legacy endpoints they supersede.
//!
//! Running it with no arguments patches `swagger.yaml` in the working
//! directory and prints one status line per resource mapping.

use clap::Parser;
use review_patch_core::AppResult;

mod update;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Swagger review-endpoint patcher")]
struct Cli {
    #[clap(flatten)]
    update: update::UpdateArgs,
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    update::execute(&cli.update)?;

    Ok(())
}
