use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::config::{build_config, ConfigOverrides, GenerationConfiguration};
use crate::introspect::{EntityDescriptor, ManifestSource, SchemaIntrospector};
use crate::orchestrator::{
    ArtifactStatus, BatchReport, GenerationOrchestrator, GenerationReport, GenerationRequest,
};
use crate::planner::{DocumentKind, OverwritePolicy};
use crate::render::{BUNDLED_TEMPLATES, TEMPLATE_EXTENSION};
use crate::rules::{classify_fields, infer_rules, FieldClassification, RuleTable};
use crate::writer::{FileWriter, WriteOutcome};

/// Directory `publish-templates` writes to when no override directory is configured.
pub const DEFAULT_PUBLISH_DIR: &str = "stubs/crudforge";

/// Command-line interface for crudforge
///
/// Scaffolds controllers, request validators and response transformers
/// from the structure of a data model.
#[derive(Parser)]
#[command(name = "crudforge")]
#[command(about = "Scaffold CRUD artifacts from entity metadata", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate artifacts for an entity, or for entities picked from the schema
    Generate {
        /// Entity identifier (`Post`, `App/Models/Post`). Omit to choose from the schema.
        entity: Option<String>,

        /// Schema manifest describing the entities (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Artifact kind: api, web or hybrid
        #[arg(short, long)]
        kind: Option<String>,

        /// Sub-namespace for controllers and requests (e.g. `Admin`)
        #[arg(long)]
        namespace: Option<String>,

        /// Middleware registered in the controller (comma-separated or repeated)
        #[arg(long, num_args = 1.., value_delimiter = ',')]
        middleware: Option<Vec<String>>,

        /// Validate inline instead of generating request classes
        #[arg(long, default_value_t = false)]
        no_validators: bool,

        /// Serialise models directly instead of generating a transformer
        #[arg(long, default_value_t = false)]
        no_transformers: bool,

        /// Overwrite existing files
        #[arg(short, long, default_value_t = false)]
        force: bool,

        /// Render everything and print it without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Limit generation to specific documents (comma-separated or repeated)
        #[arg(long, value_enum, num_args = 1.., value_delimiter = ',')]
        only: Option<Vec<OnlyPart>>,

        /// Template override directory
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Output root
        #[arg(long)]
        base_path: Option<PathBuf>,

        /// Path to crudforge.toml. If not provided, auto-detected in the working directory
        #[arg(long)]
        config: Option<PathBuf>,

        /// Generate every discovered entity without asking
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },
    /// Print the descriptor, rules and field classifications of an entity as JSON
    Inspect {
        /// Entity identifier
        entity: String,

        /// Schema manifest describing the entities (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,
    },
    /// Copy the bundled templates into the override directory for customisation
    PublishTemplates {
        /// Target directory (default: the configured override directory, else stubs/crudforge)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Overwrite templates that were already published
        #[arg(short, long, default_value_t = false)]
        force: bool,

        /// Path to crudforge.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Documents that can be generated selectively with `--only`
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnlyPart {
    /// The primary controller
    Controller,
    /// Form request used by `store`
    CreateValidator,
    /// Form request used by `update`
    UpdateValidator,
    /// Response transformer
    Transformer,
}

impl From<OnlyPart> for DocumentKind {
    fn from(part: OnlyPart) -> Self {
        match part {
            OnlyPart::Controller => DocumentKind::Controller,
            OnlyPart::CreateValidator => DocumentKind::CreateValidator,
            OnlyPart::UpdateValidator => DocumentKind::UpdateValidator,
            OnlyPart::Transformer => DocumentKind::Transformer,
        }
    }
}

/// Execute a parsed command and return the process exit code.
///
/// # Errors
///
/// Returns an error when the configuration cannot be loaded, the working
/// directory is unavailable, or the terminal cannot be read or written.
/// Generation failures are reported, not returned, and give exit code 1.
pub async fn run_cli(cli: Cli) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    match cli.command {
        Commands::Generate {
            entity,
            schema,
            kind,
            namespace,
            middleware,
            no_validators,
            no_transformers,
            force,
            dry_run,
            only,
            templates,
            base_path,
            config,
            yes,
        } => {
            let overrides = ConfigOverrides {
                kind,
                namespace,
                middleware,
                no_validators,
                no_transformers,
                force,
                only: only.map(|parts| parts.into_iter().map(DocumentKind::from).collect()),
                templates,
                base_path,
            };
            let config = build_config(config.as_deref(), &cwd, &overrides)?;
            let orchestrator = GenerationOrchestrator::new(Arc::new(ManifestSource::new(schema)));

            let identifiers = match entity {
                Some(entity) => vec![entity],
                None => {
                    let discovered = orchestrator
                        .discover()
                        .context("Failed to list entities from the schema")?;
                    let stdin = std::io::stdin();
                    let mut stdout = std::io::stdout();
                    confirm_entities(&discovered, yes, &mut stdin.lock(), &mut stdout)
                        .context("Failed to read confirmation")?
                }
            };
            if identifiers.is_empty() {
                println!("⚠️  Nothing to generate");
                return Ok(0);
            }

            let requests = identifiers
                .into_iter()
                .map(|id| GenerationRequest::new(id, config.clone()).dry_run(dry_run))
                .collect();
            let batch = orchestrator.run_batch(requests).await;
            print_batch(&batch);
            Ok(batch.exit_code())
        }
        Commands::Inspect { entity, schema } => {
            let output = inspect_entity(&entity, &schema)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(0)
        }
        Commands::PublishTemplates { dir, force, config } => {
            let config = build_config(config.as_deref(), &cwd, &ConfigOverrides::default())?;
            let dir = publish_dir(dir, &config);
            let policy = if force {
                OverwritePolicy::Overwrite
            } else {
                OverwritePolicy::SkipIfExists
            };
            let failures = publish_templates(&dir, policy);
            Ok(i32::from(failures > 0))
        }
    }
}

/// Ask for each discovered entity whether to generate it.
///
/// With `yes` every entity is accepted without prompting. Anything other
/// than `y`/`yes` declines; end of input declines the rest.
pub fn confirm_entities<R: BufRead, W: Write>(
    entities: &[String],
    yes: bool,
    input: &mut R,
    output: &mut W,
) -> std::io::Result<Vec<String>> {
    if yes {
        return Ok(entities.to_vec());
    }
    writeln!(output, "Found {} entities in the schema.", entities.len())?;
    let mut accepted = Vec::new();
    for entity in entities {
        write!(output, "Generate {entity}? [y/N] ")?;
        output.flush()?;
        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            break;
        }
        if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            accepted.push(entity.clone());
        }
    }
    Ok(accepted)
}

/// JSON document printed by `inspect`.
#[derive(Debug, Serialize)]
pub struct InspectOutput {
    pub entity: EntityDescriptor,
    pub rules: RuleTable,
    pub classification: FieldClassification,
    pub warnings: Vec<String>,
}

pub fn inspect_entity(identifier: &str, schema: &Path) -> anyhow::Result<InspectOutput> {
    let introspector = SchemaIntrospector::new(Arc::new(ManifestSource::new(schema)));
    let (entity, recovered) = introspector
        .describe_or_degraded(identifier)
        .with_context(|| format!("Failed to describe '{identifier}'"))?;
    Ok(InspectOutput {
        rules: infer_rules(&entity),
        classification: classify_fields(&entity),
        warnings: recovered.iter().map(ToString::to_string).collect(),
        entity,
    })
}

fn publish_dir(explicit: Option<PathBuf>, config: &GenerationConfiguration) -> PathBuf {
    explicit
        .or_else(|| config.templates.override_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLISH_DIR))
}

/// Write every bundled template into `dir`. Returns the number of failures.
pub fn publish_templates(dir: &Path, policy: OverwritePolicy) -> usize {
    let writer = FileWriter::new();
    let mut failures = 0;
    for (id, text) in BUNDLED_TEMPLATES {
        let path = dir.join(format!("{id}.{TEMPLATE_EXTENSION}"));
        match writer.write(&path, text, policy) {
            Ok(WriteOutcome::Written) => println!("✅ Published {}", path.display()),
            Ok(WriteOutcome::Skipped) => {
                println!("⚠️  Skipping existing template: {}", path.display())
            }
            Err(err) => {
                failures += 1;
                println!("❌ {err}");
            }
        }
    }
    info!(dir = %dir.display(), failures, "templates published");
    failures
}

fn print_report(report: &GenerationReport) {
    for warning in &report.warnings {
        println!("⚠️  {warning}");
    }
    for artifact in &report.artifacts {
        let path = artifact.path.display();
        match &artifact.status {
            ArtifactStatus::Written => println!("✅ Generated {}: {path}", artifact.document),
            ArtifactStatus::Skipped => {
                println!("⚠️  Skipping existing {} file: {path}", artifact.document)
            }
            ArtifactStatus::Planned { content } => {
                println!("📄 {path}");
                println!("{content}");
            }
            ArtifactStatus::Failed { error } => println!("❌ {}: {error}", artifact.document),
        }
    }
    if report.is_failed() {
        println!("❌ {report}");
    } else {
        println!("{report}");
    }
}

fn print_batch(batch: &BatchReport) {
    for report in &batch.reports {
        print_report(report);
    }
}
