use std::fmt;
use std::path::PathBuf;

use super::stage::Stage;
use crate::error::GenerationError;
use crate::planner::DocumentKind;

/// What happened to one planned artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    Written,
    /// Target already existed under `skip-if-exists`; a dry run reports the
    /// same for targets present at planning time
    Skipped,
    /// Dry run: rendered but not written
    Planned { content: String },
    Failed { error: GenerationError },
}

impl ArtifactStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactStatus::Written => "written",
            ArtifactStatus::Skipped => "skipped-exists",
            ArtifactStatus::Planned { .. } => "planned",
            ArtifactStatus::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReport {
    pub document: DocumentKind,
    pub template_id: String,
    pub path: PathBuf,
    pub status: ArtifactStatus,
}

/// Terminal state of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reported,
    Failed { stage: Stage, error: GenerationError },
}

/// Structured result of generating one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Identifier as requested
    pub identifier: String,
    /// Canonical entity name, once introspection has run
    pub entity: Option<String>,
    /// Descriptor was degraded
    pub degraded: bool,
    pub outcome: Outcome,
    pub artifacts: Vec<ArtifactReport>,
    pub warnings: Vec<String>,
}

impl GenerationReport {
    pub(crate) fn new(identifier: &str) -> Self {
        GenerationReport {
            identifier: identifier.to_string(),
            entity: None,
            degraded: false,
            outcome: Outcome::Reported,
            artifacts: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn fail(mut self, stage: Stage, error: GenerationError) -> Self {
        self.outcome = Outcome::Failed { stage, error };
        self
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }

    /// Stage and error of a failed run.
    pub fn failure(&self) -> Option<(Stage, &GenerationError)> {
        match &self.outcome {
            Outcome::Failed { stage, error } => Some((*stage, error)),
            Outcome::Reported => None,
        }
    }

    pub fn count(&self, label: &str) -> usize {
        self.artifacts
            .iter()
            .filter(|a| a.status.label() == label)
            .count()
    }

    /// Run failed, or any artifact failed
    pub fn has_failures(&self) -> bool {
        self.is_failed()
            || self
                .artifacts
                .iter()
                .any(|a| matches!(a.status, ArtifactStatus::Failed { .. }))
    }

    /// 0 on success, including all-skipped runs; 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_failures())
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.entity.as_deref().unwrap_or(&self.identifier);
        match &self.outcome {
            Outcome::Failed { stage, error } => {
                write!(f, "{name}: failed while {stage}: {error}")
            }
            Outcome::Reported => write!(
                f,
                "{name}: {} written, {} skipped, {} planned, {} failed",
                self.count("written"),
                self.count("skipped-exists"),
                self.count("planned"),
                self.count("failed")
            ),
        }
    }
}

/// Results of a batch run, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub reports: Vec<GenerationReport>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        self.reports.iter().any(GenerationReport::has_failures)
    }

    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_failures())
    }
}
