use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GenerationError;

/// Controller flavour to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Machine-facing JSON controller
    Api,
    /// Human-facing controller returning views and redirects
    Web,
    /// Serves both, chosen per request by the negotiation helper
    Hybrid,
}

/// Kind-specific behaviour, expressed as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindStrategy {
    pub controller_template: &'static str,
    /// Responses may be serialised for machines (transformer or raw JSON)
    pub machine_output: bool,
    /// Responses may be views and redirects
    pub human_output: bool,
    /// Needs the request-negotiation helper
    pub negotiates: bool,
    /// Sub-namespace used when none is configured
    pub default_namespace: Option<&'static str>,
}

const API: KindStrategy = KindStrategy {
    controller_template: "controller.api",
    machine_output: true,
    human_output: false,
    negotiates: false,
    default_namespace: Some(crate::config::DEFAULT_API_NAMESPACE),
};

const WEB: KindStrategy = KindStrategy {
    controller_template: "controller.web",
    machine_output: false,
    human_output: true,
    negotiates: false,
    default_namespace: None,
};

const HYBRID: KindStrategy = KindStrategy {
    controller_template: "controller.hybrid",
    machine_output: true,
    human_output: true,
    negotiates: true,
    default_namespace: None,
};

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [ArtifactKind::Api, ArtifactKind::Web, ArtifactKind::Hybrid];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Api => "api",
            ArtifactKind::Web => "web",
            ArtifactKind::Hybrid => "hybrid",
        }
    }

    pub fn strategy(&self) -> &'static KindStrategy {
        match self {
            ArtifactKind::Api => &API,
            ArtifactKind::Web => &WEB,
            ArtifactKind::Hybrid => &HYBRID,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(ArtifactKind::Api),
            "web" => Ok(ArtifactKind::Web),
            "hybrid" => Ok(ArtifactKind::Hybrid),
            other => Err(GenerationError::validation(format!(
                "unsupported artifact kind '{other}' (expected api, web or hybrid)"
            ))),
        }
    }
}

/// One output document of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Controller,
    CreateValidator,
    UpdateValidator,
    Transformer,
}

impl DocumentKind {
    /// Plan order
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::Controller,
        DocumentKind::CreateValidator,
        DocumentKind::UpdateValidator,
        DocumentKind::Transformer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Controller => "controller",
            DocumentKind::CreateValidator => "create-validator",
            DocumentKind::UpdateValidator => "update-validator",
            DocumentKind::Transformer => "transformer",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        DocumentKind::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| {
                GenerationError::validation(format!(
                    "unknown document '{s}' (expected controller, create-validator, update-validator or transformer)"
                ))
            })
    }
}

/// Rule for targets that already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverwritePolicy {
    SkipIfExists,
    Overwrite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("HYBRID".parse::<ArtifactKind>().unwrap(), ArtifactKind::Hybrid);
        assert_eq!(
            "graphql".parse::<ArtifactKind>().unwrap_err().kind(),
            "ValidationError"
        );
    }

    #[test]
    fn test_strategies() {
        assert!(ArtifactKind::Hybrid.strategy().negotiates);
        assert!(!ArtifactKind::Web.strategy().machine_output);
        assert_eq!(ArtifactKind::Api.strategy().default_namespace, Some("Api"));
        for kind in ArtifactKind::ALL {
            assert!(kind.strategy().controller_template.starts_with("controller."));
        }
    }

    #[test]
    fn test_document_parsing() {
        assert_eq!(
            "create_validator".parse::<DocumentKind>().unwrap(),
            DocumentKind::CreateValidator
        );
        assert!("policy".parse::<DocumentKind>().is_err());
    }
}
