//! # crudforge
//!
//! **crudforge** scaffolds controllers, request validators and response
//! transformers from the structure of a data model: its persisted fields,
//! relationships and naming conventions.
//!
//! ## Architecture
//!
//! The pipeline is split into small, leaf-first modules:
//!
//! - **[`introspect`]** - Structural metadata → [`EntityDescriptor`]
//! - **[`rules`]** - Deterministic validation rules and field classifications
//! - **[`render`]** - `{{ name }}` substitution and template resolution
//! - **[`planner`]** - Which documents to emit and the variables for each
//! - **[`writer`]** - Atomic, overwrite-guarded file persistence
//! - **[`orchestrator`]** - The stage machine driving one entity or a batch
//! - **[`config`]** - `crudforge.toml` + environment + flag merging
//! - **[`cli`]** - The `crudforge` command surface
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(crudforge)
//!     participant Orch as orchestrator
//!     participant Intro as introspect
//!     participant Rules as rules
//!     participant Plan as planner
//!     participant Render as render
//!     participant FS as writer
//!
//!     CLI->>Orch: GenerationRequest(identifier, config)
//!     Orch->>Orch: validate identifier + kind
//!     Orch->>Intro: describe_or_degraded(identifier)
//!     Intro-->>Orch: EntityDescriptor
//!     Orch->>Rules: infer_rules(&entity)
//!     Rules-->>Orch: RuleTable
//!     Orch->>Plan: plan_artifacts(&entity, &rules, &config)
//!     Plan-->>Orch: Vec<ArtifactPlan>
//!     loop each plan
//!         Orch->>Render: render(template, variables)
//!         Orch->>FS: write(path, text, policy)
//!     end
//!     Orch-->>CLI: GenerationReport
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use crudforge::{GenerationConfiguration, GenerationOrchestrator, GenerationRequest, ManifestSource};
//!
//! let orchestrator = GenerationOrchestrator::new(Arc::new(ManifestSource::new("schema.yaml")));
//! let report = orchestrator.run(&GenerationRequest::new("Post", GenerationConfiguration::default()));
//! println!("{report}");
//! std::process::exit(report.exit_code());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod introspect;
pub mod logging;
pub mod naming;
pub mod orchestrator;
pub mod planner;
pub mod render;
pub mod rules;
pub mod writer;

pub use config::{load_config, ConfigOverrides, GenerationConfiguration};
pub use error::GenerationError;
pub use introspect::{
    EntityDescriptor, InMemorySource, ManifestSource, SchemaIntrospector, StructuralMetadataSource,
};
pub use orchestrator::{
    BatchReport, CancellationFlag, GenerationOrchestrator, GenerationReport, GenerationRequest,
};
pub use planner::{plan_artifacts, ArtifactKind, ArtifactPlan, DocumentKind, OverwritePolicy};
pub use render::{render, TemplateSource};
pub use rules::{infer_rules, RuleSet};
pub use writer::{FileWriter, WriteOutcome};
