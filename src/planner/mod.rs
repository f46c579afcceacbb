//! # Artifact Planning
//!
//! Decides which documents to emit for an entity and assembles the variable
//! set each template is rendered with.
//!
//! | document | template | class | emitted when |
//! |---|---|---|---|
//! | controller | `controller.<kind>` | `PostController` | always |
//! | create-validator | `request.create` | `StorePostRequest` | `use_validators` |
//! | update-validator | `request.update` | `UpdatePostRequest` | `use_validators` |
//! | transformer | `transformer` | `PostTransformer` | `use_transformers` and the kind has machine output |
//!
//! `only` narrows the set further. Kind-specific behaviour lives in
//! [`KindStrategy`] records rather than per-kind code paths.
//!
//! Target paths are `<base_path>/<namespace dir>/<Class>.php`, where the root
//! namespace (`App`) maps to the root directory (`app`).

mod fragments;
mod kind;
pub mod negotiation;
mod paths;
mod plan;
mod variables;

pub use kind::{ArtifactKind, DocumentKind, KindStrategy, OverwritePolicy};
pub use negotiation::is_machine_facing;
pub use paths::{class_path, join_namespace, namespace_dir, normalize_namespace, qualify};
pub use plan::{check_path_conflicts, plan_artifacts, ArtifactPlan, ClassNames};
