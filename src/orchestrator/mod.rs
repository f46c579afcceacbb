//! # Generation Orchestrator
//!
//! Drives an entity through the pipeline:
//!
//! ```text
//! Validating → Introspecting → Inferring → Planning → Rendering → Writing → Reported
//!      └──────────────┴────────────┴───────────┴───────────┴──────────┴──→ Failed { stage, error }
//! ```
//!
//! - Nothing is retried. Every failure is terminal for the run.
//! - Missing or unreadable metadata degrades the descriptor and adds a
//!   warning instead of failing.
//! - Validation, configuration and path-conflict errors stop the run before
//!   any file is written.
//! - Template and write errors fail only their own artifact.
//! - Cancellation is checked before each stage.
//!
//! [`GenerationOrchestrator::run_batch`] runs several entities concurrently
//! and checks target paths across all of them before writing.

mod batch;
mod report;
mod run;
mod stage;

pub use report::{ArtifactReport, ArtifactStatus, BatchReport, GenerationReport, Outcome};
pub use run::{is_valid_identifier, GenerationOrchestrator, GenerationRequest};
pub use stage::{CancellationFlag, Stage};
