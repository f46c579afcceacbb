use std::path::{Path, PathBuf};

use crate::config::PathSettings;

/// Separator between namespace segments.
pub const NAMESPACE_SEPARATOR: char = '\\';

fn segments(namespace: &str) -> impl Iterator<Item = &str> {
    namespace
        .split(['\\', '/'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Normalise separators and trim stray ones.
pub fn normalize_namespace(namespace: &str) -> String {
    segments(namespace).collect::<Vec<_>>().join("\\")
}

/// Append an optional sub-namespace.
pub fn join_namespace(base: &str, sub: Option<&str>) -> String {
    match sub.map(normalize_namespace).filter(|s| !s.is_empty()) {
        Some(sub) => format!("{}\\{sub}", normalize_namespace(base)),
        None => normalize_namespace(base),
    }
}

/// Fully qualified class name.
pub fn qualify(namespace: &str, class: &str) -> String {
    let ns = normalize_namespace(namespace);
    if ns.is_empty() {
        class.to_string()
    } else {
        format!("{ns}\\{class}")
    }
}

/// Directory for a namespace, relative to the base path.
///
/// The root namespace maps to the root directory; the remaining segments map
/// one-to-one onto directories.
pub fn namespace_dir(namespace: &str, paths: &PathSettings) -> PathBuf {
    let mut parts = segments(namespace).peekable();
    let mut dir = PathBuf::new();
    if parts.peek() == Some(&paths.root_namespace.as_str()) {
        parts.next();
        dir.push(&paths.root_directory);
    }
    for part in parts {
        dir.push(part);
    }
    dir
}

/// Target file for a class: `<base>/<namespace dir>/<Class>.php`.
pub fn class_path(base_path: &Path, namespace: &str, class: &str, paths: &PathSettings) -> PathBuf {
    base_path
        .join(namespace_dir(namespace, paths))
        .join(format!("{class}.php"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_helpers() {
        assert_eq!(normalize_namespace("\\App\\\\Http/Controllers\\"), "App\\Http\\Controllers");
        assert_eq!(
            join_namespace("App\\Http\\Controllers", Some("Admin/V2")),
            "App\\Http\\Controllers\\Admin\\V2"
        );
        assert_eq!(join_namespace("App\\Models", Some("  ")), "App\\Models");
        assert_eq!(qualify("App\\Models", "Post"), "App\\Models\\Post");
        assert_eq!(qualify("", "Post"), "Post");
    }

    #[test]
    fn test_class_path() {
        let paths = PathSettings::default();
        assert_eq!(
            class_path(
                Path::new("/srv/blog"),
                "App\\Http\\Controllers\\Api",
                "PostController",
                &paths
            ),
            PathBuf::from("/srv/blog/app/Http/Controllers/Api/PostController.php")
        );
        // namespaces outside the root map segment by segment
        assert_eq!(
            namespace_dir("Modules\\Blog\\Http", &paths),
            PathBuf::from("Modules/Blog/Http")
        );
    }
}
