use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::kind::{ArtifactKind, DocumentKind, OverwritePolicy};
use super::paths::{class_path, join_namespace, qualify};
use super::variables;
use crate::config::GenerationConfiguration;
use crate::error::GenerationError;
use crate::introspect::EntityDescriptor;
use crate::naming::NameSet;
use crate::render::Variables;
use crate::rules::{classify_fields, FieldClassification, RuleTable};

/// One planned output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPlan {
    pub entity: String,
    pub document: DocumentKind,
    pub template_id: String,
    pub target_path: PathBuf,
    pub variables: Variables,
    pub overwrite_policy: OverwritePolicy,
    /// Target existed when the plan was made
    pub preexisting: bool,
}

impl ArtifactPlan {
    /// Short label used in conflict messages and reports.
    pub fn describe(&self) -> String {
        format!("{} for {}", self.document, self.entity)
    }

    /// A write of this plan would leave the existing target alone.
    pub fn would_skip(&self) -> bool {
        self.preexisting && self.overwrite_policy == OverwritePolicy::SkipIfExists
    }
}

/// Class names for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    pub controller: String,
    pub create_request: String,
    pub update_request: String,
    pub transformer: String,
    /// Fully qualified
    pub model: String,
}

impl ClassNames {
    pub fn new(studly: &str, model_namespace: &str) -> Self {
        ClassNames {
            controller: format!("{studly}Controller"),
            create_request: format!("Store{studly}Request"),
            update_request: format!("Update{studly}Request"),
            transformer: transformer_class(studly),
            model: qualify(model_namespace, studly),
        }
    }
}

pub(crate) fn transformer_class(studly: &str) -> String {
    format!("{studly}Transformer")
}

/// Everything variable assembly needs for one entity.
pub(crate) struct PlanContext<'a> {
    pub entity: &'a EntityDescriptor,
    pub rules: &'a RuleTable,
    pub config: &'a GenerationConfiguration,
    pub kind: ArtifactKind,
    pub names: NameSet,
    pub classification: FieldClassification,
    pub classes: ClassNames,
    pub controller_namespace: String,
    pub request_namespace: String,
    pub transformer_namespace: String,
    /// Validator classes exist; controllers defer to them
    pub uses_validators: bool,
    /// Machine responses go through the transformer
    pub uses_transformer: bool,
}

impl<'a> PlanContext<'a> {
    fn new(
        entity: &'a EntityDescriptor,
        rules: &'a RuleTable,
        config: &'a GenerationConfiguration,
        kind: ArtifactKind,
    ) -> Self {
        let names = NameSet::from_entity(&entity.name);
        let sub = config.effective_namespace(kind);
        let paths = &config.paths;
        PlanContext {
            classes: ClassNames::new(&names.studly, &paths.model_namespace),
            controller_namespace: join_namespace(&paths.controller_namespace, sub.as_deref()),
            request_namespace: join_namespace(&paths.request_namespace, sub.as_deref()),
            transformer_namespace: join_namespace(&paths.transformer_namespace, None),
            uses_validators: config.generation.use_validators,
            uses_transformer: config.generation.use_transformers && kind.strategy().machine_output,
            classification: classify_fields(entity),
            names,
            entity,
            rules,
            config,
            kind,
        }
    }

    fn namespace_and_class(&self, document: DocumentKind) -> (&str, &str) {
        match document {
            DocumentKind::Controller => (&self.controller_namespace, &self.classes.controller),
            DocumentKind::CreateValidator => (&self.request_namespace, &self.classes.create_request),
            DocumentKind::UpdateValidator => (&self.request_namespace, &self.classes.update_request),
            DocumentKind::Transformer => (&self.transformer_namespace, &self.classes.transformer),
        }
    }

    fn template_id(&self, document: DocumentKind) -> &'static str {
        match document {
            DocumentKind::Controller => self.kind.strategy().controller_template,
            DocumentKind::CreateValidator => "request.create",
            DocumentKind::UpdateValidator => "request.update",
            DocumentKind::Transformer => "transformer",
        }
    }

    fn applies(&self, document: DocumentKind) -> bool {
        match document {
            DocumentKind::Controller => true,
            DocumentKind::CreateValidator | DocumentKind::UpdateValidator => self.uses_validators,
            DocumentKind::Transformer => self.uses_transformer,
        }
    }

    fn target_path(&self, document: DocumentKind) -> PathBuf {
        let (namespace, class) = self.namespace_and_class(document);
        class_path(
            &self.config.paths.base_path,
            namespace,
            class,
            &self.config.paths,
        )
    }
}

/// Plan the documents to emit for one entity.
///
/// Configuration is validated first, so a contradictory request fails here
/// before anything is rendered or written. Plans come back in
/// [`DocumentKind::ALL`] order.
pub fn plan_artifacts(
    entity: &EntityDescriptor,
    rules: &RuleTable,
    config: &GenerationConfiguration,
) -> Result<Vec<ArtifactPlan>, GenerationError> {
    config.validate()?;
    let kind = config.artifact_kind()?;
    let ctx = PlanContext::new(entity, rules, config, kind);
    let policy = config.overwrite_policy();

    let plans: Vec<ArtifactPlan> = DocumentKind::ALL
        .into_iter()
        .filter(|d| ctx.applies(*d) && config.selects(*d))
        .map(|document| {
            let target_path = ctx.target_path(document);
            let (namespace, class) = ctx.namespace_and_class(document);
            let variables = variables::for_document(&ctx, document, namespace, class);
            debug!(
                entity = %entity.name,
                document = %document,
                path = %target_path.display(),
                "planned artifact"
            );
            ArtifactPlan {
                entity: entity.name.clone(),
                document,
                template_id: ctx.template_id(document).to_string(),
                preexisting: target_path.exists(),
                target_path,
                variables,
                overwrite_policy: policy,
            }
        })
        .collect();

    check_path_conflicts(&plans)?;
    Ok(plans)
}

/// Fail when two plans resolve to the same target path.
pub fn check_path_conflicts(plans: &[ArtifactPlan]) -> Result<(), GenerationError> {
    let mut seen: HashMap<&Path, &ArtifactPlan> = HashMap::new();
    for plan in plans {
        if let Some(first) = seen.insert(plan.target_path.as_path(), plan) {
            return Err(GenerationError::PathConflict {
                path: plan.target_path.clone(),
                first: first.describe(),
                second: plan.describe(),
            });
        }
    }
    Ok(())
}
