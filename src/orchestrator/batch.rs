use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::report::{BatchReport, GenerationReport};
use super::run::{GenerationOrchestrator, GenerationRequest, Preparation};
use super::stage::Stage;
use crate::error::GenerationError;
use crate::planner::{check_path_conflicts, ArtifactPlan};

impl GenerationOrchestrator {
    /// Generate several entities.
    ///
    /// Every entity is prepared (validated, introspected, planned and rendered)
    /// in parallel on the blocking pool. Plans of all prepared entities are
    /// then checked for shared target paths; a conflict fails every prepared
    /// entity before anything is written. Otherwise each entity's artifacts are
    /// written in parallel, each target by exactly one task.
    pub async fn run_batch(&self, requests: Vec<GenerationRequest>) -> BatchReport {
        info!(entities = requests.len(), "starting batch");

        let handles: Vec<(String, JoinHandle<Preparation>)> = requests
            .into_iter()
            .map(|request| {
                let orchestrator = self.clone();
                let identifier = request.identifier.clone();
                let handle = tokio::task::spawn_blocking(move || orchestrator.prepare(&request));
                (identifier, handle)
            })
            .collect();

        let mut prepared = Vec::with_capacity(handles.len());
        for (identifier, handle) in handles {
            prepared.push(join_or_fail(&identifier, Stage::Validating, handle).await);
        }

        let all_plans: Vec<ArtifactPlan> = prepared
            .iter()
            .filter_map(|p| match p {
                Preparation::Ready { artifacts, .. } => Some(artifacts),
                Preparation::Failed(_) => None,
            })
            .flatten()
            .map(|a| a.plan.clone())
            .collect();

        if let Err(conflict) = check_path_conflicts(&all_plans) {
            warn!(error = %conflict, "batch aborted before writing");
            let reports = prepared
                .into_iter()
                .map(|p| match p {
                    Preparation::Ready { report, .. } => report.fail(Stage::Planning, conflict.clone()),
                    Preparation::Failed(report) => report,
                })
                .collect();
            return BatchReport { reports };
        }

        let handles: Vec<(String, JoinHandle<GenerationReport>)> = prepared
            .into_iter()
            .map(|p| match p {
                Preparation::Ready {
                    report,
                    artifacts,
                    dry_run,
                } => {
                    let orchestrator = self.clone();
                    let identifier = report.identifier.clone();
                    let handle = tokio::task::spawn_blocking(move || {
                        orchestrator.write(report, artifacts, dry_run)
                    });
                    (identifier, handle)
                }
                Preparation::Failed(report) => {
                    let identifier = report.identifier.clone();
                    (identifier, tokio::spawn(async move { report }))
                }
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for (identifier, handle) in handles {
            let report = match handle.await {
                Ok(report) => report,
                Err(err) => {
                    error!(entity = %identifier, error = %err, "writer task did not complete");
                    GenerationReport::new(&identifier).fail(Stage::Writing, GenerationError::Cancelled)
                }
            };
            reports.push(report);
        }

        let batch = BatchReport { reports };
        info!(failed = batch.has_failures(), "batch finished");
        batch
    }
}

async fn join_or_fail(identifier: &str, stage: Stage, handle: JoinHandle<Preparation>) -> Preparation {
    match handle.await {
        Ok(preparation) => preparation,
        Err(err) => {
            error!(entity = %identifier, error = %err, "preparation task did not complete");
            Preparation::Failed(GenerationReport::new(identifier).fail(stage, GenerationError::Cancelled))
        }
    }
}
