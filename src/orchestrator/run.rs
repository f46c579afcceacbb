use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use tracing::{info, info_span, warn};

use super::report::{ArtifactReport, ArtifactStatus, GenerationReport};
use super::stage::{CancellationFlag, Stage};
use crate::config::GenerationConfiguration;
use crate::error::GenerationError;
use crate::introspect::{SchemaIntrospector, StructuralMetadataSource};
use crate::planner::{plan_artifacts, ArtifactPlan};
use crate::render::{render, residual_placeholders, TemplateSource};
use crate::rules::infer_rules;
use crate::writer::{FileWriter, WriteOutcome};

/// Letters, digits, underscores and path separators, not starting with a digit.
#[allow(clippy::expect_used)]
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_/\\]*$").expect("identifier regex should be valid")
});

/// Whether `identifier` is acceptable as an entity identifier.
pub fn is_valid_identifier(identifier: &str) -> bool {
    IDENTIFIER.is_match(identifier) && !identifier.ends_with(['/', '\\'])
}

/// One entity to generate.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub identifier: String,
    pub config: GenerationConfiguration,
    /// Render everything, write nothing
    pub dry_run: bool,
}

impl GenerationRequest {
    pub fn new(identifier: impl Into<String>, config: GenerationConfiguration) -> Self {
        GenerationRequest {
            identifier: identifier.into(),
            config,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// A plan with its rendered text, ready for the writing stage.
#[derive(Debug, Clone)]
pub(crate) struct RenderedArtifact {
    pub plan: ArtifactPlan,
    pub content: Result<String, GenerationError>,
}

/// Output of the stages up to and including rendering.
#[derive(Debug)]
pub(crate) enum Preparation {
    Ready {
        report: GenerationReport,
        artifacts: Vec<RenderedArtifact>,
        dry_run: bool,
    },
    Failed(GenerationReport),
}

/// Drives one entity through every stage and reports the result.
///
/// Each run re-reads structural metadata; nothing is cached between runs.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    source: Arc<dyn StructuralMetadataSource>,
    writer: FileWriter,
    cancellation: CancellationFlag,
}

impl GenerationOrchestrator {
    pub fn new(source: Arc<dyn StructuralMetadataSource>) -> Self {
        GenerationOrchestrator {
            source,
            writer: FileWriter::new(),
            cancellation: CancellationFlag::new(),
        }
    }

    /// Share a cancellation flag with the caller.
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = flag;
        self
    }

    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancellation
    }

    /// Entity names exposed by the metadata source.
    pub fn discover(&self) -> Result<Vec<String>, GenerationError> {
        SchemaIntrospector::new(Arc::clone(&self.source)).discover()
    }

    /// Run the full pipeline for one entity.
    pub fn run(&self, request: &GenerationRequest) -> GenerationReport {
        match self.prepare(request) {
            Preparation::Ready {
                report,
                artifacts,
                dry_run,
            } => self.write(report, artifacts, dry_run),
            Preparation::Failed(report) => {
                log_failure(&report);
                report
            }
        }
    }

    fn checkpoint(&self, stage: Stage) -> Result<(), GenerationError> {
        if self.cancellation.is_cancelled() {
            warn!(stage = %stage, "cancellation requested");
            return Err(GenerationError::Cancelled);
        }
        Ok(())
    }

    /// Validating through Rendering. Touches no files.
    pub(crate) fn prepare(&self, request: &GenerationRequest) -> Preparation {
        let identifier = request.identifier.as_str();
        let config = &request.config;
        let mut report = GenerationReport::new(identifier);

        let stage = Stage::Validating;
        let validated = {
            let _span = info_span!("stage", %stage, entity = identifier).entered();
            self.checkpoint(stage).and_then(|()| {
                if !is_valid_identifier(identifier) {
                    return Err(GenerationError::validation(format!(
                        "'{identifier}' is not a valid entity identifier"
                    )));
                }
                config.artifact_kind()
            })
        };
        if let Err(err) = validated {
            return Preparation::Failed(report.fail(stage, err));
        }

        let stage = Stage::Introspecting;
        let described = {
            let _span = info_span!("stage", %stage, entity = identifier).entered();
            self.checkpoint(stage).and_then(|()| {
                SchemaIntrospector::new(Arc::clone(&self.source))
                    .with_timeout(config.introspection_timeout())
                    .describe_or_degraded(identifier)
            })
        };
        let entity = match described {
            Ok((entity, recovered)) => {
                if let Some(err) = recovered {
                    report.degraded = true;
                    report
                        .warnings
                        .push(format!("{err}; generating from a degraded descriptor"));
                }
                entity
            }
            Err(err) => return Preparation::Failed(report.fail(stage, err)),
        };
        report.entity = Some(entity.name.clone());

        let stage = Stage::Inferring;
        let rules = {
            let _span = info_span!("stage", %stage, entity = %entity.name).entered();
            match self.checkpoint(stage) {
                Ok(()) => infer_rules(&entity),
                Err(err) => return Preparation::Failed(report.fail(stage, err)),
            }
        };

        let stage = Stage::Planning;
        let planned = {
            let _span = info_span!("stage", %stage, entity = %entity.name).entered();
            self.checkpoint(stage)
                .and_then(|()| plan_artifacts(&entity, &rules, config))
        };
        let plans = match planned {
            Ok(plans) => plans,
            Err(err) => return Preparation::Failed(report.fail(stage, err)),
        };
        if plans.is_empty() {
            report
                .warnings
                .push("no documents selected for this entity".to_string());
        }

        let stage = Stage::Rendering;
        let _span = info_span!("stage", %stage, entity = %entity.name).entered();
        if let Err(err) = self.checkpoint(stage) {
            return Preparation::Failed(report.fail(stage, err));
        }
        let templates = TemplateSource::new(config.templates.override_dir.clone())
            .with_bundled(config.templates.use_bundled);
        let artifacts = plans
            .into_iter()
            .map(|plan| {
                let content = templates.resolve(&plan.template_id).map(|template| {
                    let text = render(&template.text, &plan.variables);
                    let residual = residual_placeholders(&text);
                    if !residual.is_empty() {
                        report.warnings.push(format!(
                            "template '{}' left unresolved placeholders: {}",
                            plan.template_id,
                            residual.join(", ")
                        ));
                    }
                    text
                });
                RenderedArtifact { plan, content }
            })
            .collect();

        Preparation::Ready {
            report,
            artifacts,
            dry_run: request.dry_run,
        }
    }

    /// Writing and Reported. Per-artifact errors do not stop siblings.
    pub(crate) fn write(
        &self,
        mut report: GenerationReport,
        artifacts: Vec<RenderedArtifact>,
        dry_run: bool,
    ) -> GenerationReport {
        let stage = Stage::Writing;
        let name = report.entity.clone().unwrap_or_else(|| report.identifier.clone());
        {
            let _span = info_span!("stage", %stage, entity = %name).entered();
            if let Err(err) = self.checkpoint(stage) {
                let report = report.fail(stage, err);
                log_failure(&report);
                return report;
            }
            for RenderedArtifact { plan, content } in artifacts {
                let status = match content {
                    Err(error) => ArtifactStatus::Failed { error },
                    Ok(_) if dry_run && plan.would_skip() => ArtifactStatus::Skipped,
                    Ok(content) if dry_run => ArtifactStatus::Planned { content },
                    Ok(content) => {
                        match self
                            .writer
                            .write(&plan.target_path, &content, plan.overwrite_policy)
                        {
                            Ok(WriteOutcome::Written) => ArtifactStatus::Written,
                            Ok(WriteOutcome::Skipped) => ArtifactStatus::Skipped,
                            Err(error) => ArtifactStatus::Failed { error },
                        }
                    }
                };
                if let ArtifactStatus::Failed { error } = &status {
                    warn!(
                        entity = %name,
                        path = %plan.target_path.display(),
                        error = %error,
                        "artifact failed"
                    );
                }
                report.artifacts.push(ArtifactReport {
                    document: plan.document,
                    template_id: plan.template_id,
                    path: plan.target_path,
                    status,
                });
            }
        }

        let _span = info_span!("stage", stage = %Stage::Reported, entity = %name).entered();
        info!(
            entity = %name,
            written = report.count("written"),
            skipped = report.count("skipped-exists"),
            planned = report.count("planned"),
            failed = report.count("failed"),
            "generation finished"
        );
        report
    }
}

fn log_failure(report: &GenerationReport) {
    if let Some((stage, error)) = report.failure() {
        warn!(
            entity = %report.identifier,
            stage = %stage,
            kind = error.kind(),
            error = %error,
            "generation failed"
        );
    }
}
