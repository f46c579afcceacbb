//! # CLI Module
//!
//! Command-line surface of the `crudforge` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! ```bash
//! crudforge generate Post --schema schema.yaml --kind api
//! crudforge generate Post -s schema.yaml --kind hybrid --middleware auth,verified --dry-run
//! crudforge generate -s schema.yaml --yes      # every entity in the schema
//! ```
//!
//! Without an entity, the entities in the schema are listed and each one is
//! confirmed interactively (`--yes` accepts all). Confirmed entities run as
//! one batch.
//!
//! ### `inspect`
//!
//! ```bash
//! crudforge inspect Post --schema schema.yaml
//! ```
//!
//! ### `publish-templates`
//!
//! ```bash
//! crudforge publish-templates --dir stubs/crudforge
//! ```
//!
//! ## Exit status
//!
//! `0` when every run reached the reported state with no failed artifact
//! (skipped files count as success), `1` otherwise.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{
    confirm_entities, inspect_entity, publish_templates, run_cli, Cli, Commands, InspectOutput,
    OnlyPart, DEFAULT_PUBLISH_DIR,
};
