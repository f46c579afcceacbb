//! Request negotiation rule injected into hybrid controllers.
//!
//! A request is machine-facing when the client states an explicit preference
//! for a machine format, or when its path sits under the API prefix.
//! Everything else is human-facing. The generated helper and
//! [`is_machine_facing`] implement the same rule.

use crate::render::{render, Variables};

const MACHINE_MEDIA_MARKERS: [&str; 2] = ["application/json", "+json"];

/// Whether `accept` explicitly asks for a machine format.
pub fn prefers_machine_format(accept: Option<&str>) -> bool {
    accept.is_some_and(|value| {
        value.split(',').any(|range| {
            let media = range.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
            MACHINE_MEDIA_MARKERS.iter().any(|m| media.ends_with(m))
        })
    })
}

/// Whether `path` equals the prefix or starts with `prefix/`, ignoring
/// leading and trailing slashes.
pub fn under_prefix(path: &str, prefix: &str) -> bool {
    let path = path.trim_start_matches('/');
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        return false;
    }
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// The negotiation decision.
///
/// With `honor_accept` off only the path prefix counts.
pub fn is_machine_facing(accept: Option<&str>, path: &str, api_prefix: &str, honor_accept: bool) -> bool {
    (honor_accept && prefers_machine_format(accept)) || under_prefix(path, api_prefix)
}

const HELPER_WITH_ACCEPT: &str = r#"
    /**
     * Machine-facing when the client asks for JSON or the path is under /{{ api_prefix }}.
     */
    protected function wantsMachineOutput(Request $request): bool
    {
        return $request->expectsJson()
            || $request->is('{{ api_prefix }}', '{{ api_prefix }}/*');
    }
"#;

const HELPER_PREFIX_ONLY: &str = r#"
    /**
     * Machine-facing when the path is under /{{ api_prefix }}.
     */
    protected function wantsMachineOutput(Request $request): bool
    {
        return $request->is('{{ api_prefix }}', '{{ api_prefix }}/*');
    }
"#;

/// Source of the helper method for a generated controller.
pub fn negotiation_helper(api_prefix: &str, honor_accept: bool) -> String {
    let mut vars = Variables::new();
    vars.insert("api_prefix".into(), api_prefix.trim_matches('/').into());
    let template = if honor_accept {
        HELPER_WITH_ACCEPT
    } else {
        HELPER_PREFIX_ONLY
    };
    render(template, &vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_preference() {
        assert!(prefers_machine_format(Some("application/json")));
        assert!(prefers_machine_format(Some("text/html;q=0.9, application/vnd.api+json")));
        assert!(!prefers_machine_format(Some("text/html,application/xhtml+xml")));
        assert!(!prefers_machine_format(None));
    }

    #[test]
    fn test_prefix_matching() {
        assert!(under_prefix("/api/posts", "api"));
        assert!(under_prefix("api", "/api/"));
        assert!(!under_prefix("/apiary/posts", "api"));
        assert!(!under_prefix("/posts", "api"));
    }

    #[test]
    fn test_decision_rule() {
        assert!(is_machine_facing(Some("application/json"), "/posts", "api", true));
        assert!(is_machine_facing(None, "/api/posts/1", "api", true));
        assert!(!is_machine_facing(Some("text/html"), "/posts", "api", true));
        assert!(!is_machine_facing(Some("application/json"), "/posts", "api", false));
    }

    #[test]
    fn test_helper_source() {
        let helper = negotiation_helper("/v1/", true);
        assert!(helper.contains("$request->is('v1', 'v1/*')"));
        assert!(helper.contains("expectsJson"));
        assert!(!negotiation_helper("api", false).contains("expectsJson"));
    }
}
