use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::GenerationError;

/// File extension of template files in an override directory.
pub const TEMPLATE_EXTENSION: &str = "stub";

/// Templates compiled into the binary, keyed by template id.
pub const BUNDLED_TEMPLATES: &[(&str, &str)] = &[
    (
        "controller.api",
        include_str!("../../templates/controller.api.stub"),
    ),
    (
        "controller.web",
        include_str!("../../templates/controller.web.stub"),
    ),
    (
        "controller.hybrid",
        include_str!("../../templates/controller.hybrid.stub"),
    ),
    (
        "request.create",
        include_str!("../../templates/request.create.stub"),
    ),
    (
        "request.update",
        include_str!("../../templates/request.update.stub"),
    ),
    ("transformer", include_str!("../../templates/transformer.stub")),
];

/// Where a resolved template came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    Override(PathBuf),
    Bundled,
}

/// Template text plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub id: String,
    pub text: String,
    pub origin: TemplateOrigin,
}

/// Resolves template ids, override directory first, bundled defaults second.
///
/// Override files are read on every call so edits are picked up without a
/// restart.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    override_dir: Option<PathBuf>,
    use_bundled: bool,
}

impl Default for TemplateSource {
    fn default() -> Self {
        Self {
            override_dir: None,
            use_bundled: true,
        }
    }
}

impl TemplateSource {
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        Self {
            override_dir,
            use_bundled: true,
        }
    }

    /// Bundled templates only.
    pub fn bundled() -> Self {
        Self::default()
    }

    /// Disable the bundled fallback, so every id must exist as an override.
    pub fn with_bundled(mut self, use_bundled: bool) -> Self {
        self.use_bundled = use_bundled;
        self
    }

    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    /// Path an override for `id` would live at.
    pub fn override_path(&self, id: &str) -> Option<PathBuf> {
        self.override_dir
            .as_ref()
            .map(|dir| dir.join(format!("{id}.{TEMPLATE_EXTENSION}")))
    }

    pub fn resolve(&self, id: &str) -> Result<ResolvedTemplate, GenerationError> {
        if let Some(path) = self.override_path(id) {
            match fs::read_to_string(&path) {
                Ok(text) => {
                    debug!(template = id, path = %path.display(), "using override template");
                    return Ok(ResolvedTemplate {
                        id: id.to_string(),
                        text,
                        origin: TemplateOrigin::Override(path),
                    });
                }
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(GenerationError::TemplateUnreadable {
                        template: id.to_string(),
                        path,
                        message: err.to_string(),
                    });
                }
            }
        }
        self.use_bundled
            .then(|| bundled_template(id))
            .flatten()
            .map(|text| ResolvedTemplate {
                id: id.to_string(),
                text: text.to_string(),
                origin: TemplateOrigin::Bundled,
            })
            .ok_or_else(|| GenerationError::TemplateNotFound {
                template: id.to_string(),
            })
    }
}

/// Text of a bundled template.
pub fn bundled_template(id: &str) -> Option<&'static str> {
    BUNDLED_TEMPLATES
        .iter()
        .find(|(name, _)| *name == id)
        .map(|(_, text)| *text)
}
