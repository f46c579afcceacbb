//! Generation configuration
//!
//! One explicit [`GenerationConfiguration`] value is built per invocation and
//! passed into the orchestrator. Sources are merged in this order, later wins:
//!
//! 1. built-in defaults
//! 2. `crudforge.toml` (explicit `--config` path, else the working directory)
//! 3. `CRUDFORGE_*` environment variables
//! 4. command-line flags ([`ConfigOverrides`])
//!
//! ```toml
//! [generation]
//! kind = "hybrid"
//! middleware = ["auth:sanctum"]
//! per_page = 25
//!
//! [paths]
//! base_path = "../blog"
//! namespace = "Admin"
//!
//! [templates]
//! override_dir = "stubs"
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::error::GenerationError;
use crate::planner::{ArtifactKind, DocumentKind, OverwritePolicy};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "crudforge.toml";

/// Sub-namespace used for API controllers when none is configured.
pub const DEFAULT_API_NAMESPACE: &str = "Api";

/// Complete configuration for one generation invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct GenerationConfiguration {
    pub generation: GenerationSettings,
    pub paths: PathSettings,
    pub templates: TemplateSettings,
    pub introspection: IntrospectionSettings,
}

/// What to generate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GenerationSettings {
    /// Artifact kind selector, validated when a run starts
    pub kind: String,
    pub use_validators: bool,
    pub use_transformers: bool,
    pub include_authorization: bool,
    pub include_format_negotiation: bool,
    /// Hybrid controllers may serialise models directly when transformers are off
    pub raw_output_fallback: bool,
    pub eager_load_to_many: bool,
    pub api_prefix: String,
    pub middleware: Vec<String>,
    pub per_page: u32,
    /// Subset of documents to emit; empty means all that apply
    pub only: Vec<DocumentKind>,
    pub force: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            kind: ArtifactKind::Api.as_str().to_string(),
            use_validators: true,
            use_transformers: true,
            include_authorization: true,
            include_format_negotiation: true,
            raw_output_fallback: false,
            eager_load_to_many: false,
            api_prefix: "api".to_string(),
            middleware: Vec::new(),
            per_page: 15,
            only: Vec::new(),
            force: false,
        }
    }
}

/// Where generated files go
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathSettings {
    pub base_path: PathBuf,
    pub root_namespace: String,
    pub root_directory: String,
    pub controller_namespace: String,
    pub request_namespace: String,
    pub transformer_namespace: String,
    pub model_namespace: String,
    /// Appended to the controller and request namespaces. An empty string
    /// disables the API default.
    pub namespace: Option<String>,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            root_namespace: "App".to_string(),
            root_directory: "app".to_string(),
            controller_namespace: "App\\Http\\Controllers".to_string(),
            request_namespace: "App\\Http\\Requests".to_string(),
            transformer_namespace: "App\\Transformers".to_string(),
            model_namespace: "App\\Models".to_string(),
            namespace: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateSettings {
    pub override_dir: Option<PathBuf>,
    /// Fall back to the templates compiled into the binary
    pub use_bundled: bool,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            override_dir: None,
            use_bundled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct IntrospectionSettings {
    /// Applied to remote metadata sources only
    pub timeout_ms: Option<u64>,
}

/// Values taken from command-line flags. `None`/`false` leaves the merged
/// value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub kind: Option<String>,
    pub namespace: Option<String>,
    pub middleware: Option<Vec<String>>,
    pub no_validators: bool,
    pub no_transformers: bool,
    pub force: bool,
    pub only: Option<Vec<DocumentKind>>,
    pub templates: Option<PathBuf>,
    pub base_path: Option<PathBuf>,
}

impl GenerationConfiguration {
    /// Parsed artifact kind. Unknown kinds are a validation error.
    pub fn artifact_kind(&self) -> Result<ArtifactKind, GenerationError> {
        ArtifactKind::from_str(&self.generation.kind)
    }

    pub fn overwrite_policy(&self) -> OverwritePolicy {
        if self.generation.force {
            OverwritePolicy::Overwrite
        } else {
            OverwritePolicy::SkipIfExists
        }
    }

    /// Sub-namespace for controllers and requests, after applying the API default.
    pub fn effective_namespace(&self, kind: ArtifactKind) -> Option<String> {
        match self.paths.namespace.as_deref() {
            Some(ns) if ns.trim().is_empty() => None,
            Some(ns) => Some(ns.trim().to_string()),
            None => kind
                .strategy()
                .default_namespace
                .map(ToString::to_string),
        }
    }

    pub fn introspection_timeout(&self) -> Option<Duration> {
        self.introspection.timeout_ms.map(Duration::from_millis)
    }

    /// Whether `document` is selected by `only`.
    pub fn selects(&self, document: DocumentKind) -> bool {
        self.generation.only.is_empty() || self.generation.only.contains(&document)
    }

    /// Reject contradictory toggles. Runs before any file is touched.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let kind = self.artifact_kind()?;
        let g = &self.generation;
        if kind == ArtifactKind::Hybrid && !g.use_transformers && !g.raw_output_fallback {
            return Err(GenerationError::configuration(
                "hybrid controllers need transformers or raw_output_fallback = true",
            ));
        }
        if !g.use_validators
            && g.only
                .iter()
                .any(|d| matches!(d, DocumentKind::CreateValidator | DocumentKind::UpdateValidator))
        {
            return Err(GenerationError::configuration(
                "validator documents requested while use_validators = false",
            ));
        }
        if g.only.contains(&DocumentKind::Transformer) {
            if !g.use_transformers {
                return Err(GenerationError::configuration(
                    "transformer requested while use_transformers = false",
                ));
            }
            if !kind.strategy().machine_output {
                return Err(GenerationError::configuration(format!(
                    "{} controllers produce no machine output, a transformer cannot be requested",
                    kind.as_str()
                )));
            }
        }
        if g.per_page == 0 {
            return Err(GenerationError::configuration("per_page must be at least 1"));
        }
        if g.api_prefix.trim_matches('/').is_empty() {
            return Err(GenerationError::configuration("api_prefix must not be empty"));
        }
        Ok(())
    }

    /// Apply `CRUDFORGE_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(kind) = lookup("CRUDFORGE_KIND") {
            self.generation.kind = kind.trim().to_lowercase();
        }
        if let Some(force) = lookup("CRUDFORGE_FORCE") {
            match force.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.generation.force = true,
                "" | "0" | "false" | "no" | "off" => self.generation.force = false,
                _ => warn!(value = %force, "ignoring unrecognised CRUDFORGE_FORCE value"),
            }
        }
        if let Some(dir) = lookup("CRUDFORGE_TEMPLATES").filter(|v| !v.is_empty()) {
            self.templates.override_dir = Some(PathBuf::from(dir));
        }
        if let Some(base) = lookup("CRUDFORGE_BASE_PATH").filter(|v| !v.is_empty()) {
            self.paths.base_path = PathBuf::from(base);
        }
    }

    /// Apply command-line flags.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(kind) = &overrides.kind {
            self.generation.kind = kind.clone();
        }
        if let Some(ns) = &overrides.namespace {
            self.paths.namespace = Some(ns.clone());
        }
        if let Some(middleware) = &overrides.middleware {
            self.generation.middleware = middleware.clone();
        }
        if overrides.no_validators {
            self.generation.use_validators = false;
        }
        if overrides.no_transformers {
            self.generation.use_transformers = false;
        }
        if overrides.force {
            self.generation.force = true;
        }
        if let Some(only) = &overrides.only {
            self.generation.only = only.clone();
        }
        if let Some(dir) = &overrides.templates {
            self.templates.override_dir = Some(dir.clone());
        }
        if let Some(base) = &overrides.base_path {
            self.paths.base_path = base.clone();
        }
    }
}

/// Load configuration from a TOML file.
///
/// Returns `Ok(None)` when the file does not exist and an error when it
/// exists but cannot be read or parsed.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<GenerationConfiguration>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

    let config: GenerationConfiguration = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

    Ok(Some(config))
}

/// Resolve the config file path.
///
/// Priority:
/// 1. Explicitly provided path (via CLI)
/// 2. `crudforge.toml` in `working_dir`
/// 3. None
pub fn resolve_config_path(explicit_path: Option<&Path>, working_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }
    let detected = working_dir.join(CONFIG_FILE_NAME);
    detected.exists().then_some(detected)
}

/// Build the merged configuration: defaults, file, environment, flags.
pub fn build_config(
    explicit_path: Option<&Path>,
    working_dir: &Path,
    overrides: &ConfigOverrides,
) -> anyhow::Result<GenerationConfiguration> {
    let mut config = match resolve_config_path(explicit_path, working_dir) {
        Some(path) => match load_config(&path)? {
            Some(config) => config,
            None if explicit_path.is_some() => {
                anyhow::bail!("Config file not found: {}", path.display())
            }
            None => GenerationConfiguration::default(),
        },
        None => GenerationConfiguration::default(),
    };
    config.apply_env();
    config.apply_overrides(overrides);
    Ok(config)
}
