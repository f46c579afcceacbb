//! Naming derivatives of entity names.
//!
//! All transforms are pure and deterministic. Word boundaries are separators
//! (`_`, `-`, whitespace, `/`, `\`) and case changes (`blogPost`, `HTTPServer`).
//!
//! Pluralisation follows the regular English rule only: append `s` to the last
//! word. Irregular nouns (`person` → `people`), `-y` → `-ies` and sibilant
//! endings (`box` → `boxes`) are **not** handled; entities with such names get
//! `persons`, `categorys`, `boxs`. Override the generated names in templates
//! when that matters.

use serde::Serialize;

/// Split an identifier into lowercase words.
pub fn words(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            // `blogPost` splits before P; `HTTPServer` splits before the S of Server
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// `blog_post` / `BlogPost` → `blog_post`
pub fn to_snake_case(s: &str) -> String {
    words(s).join("_")
}

/// `BlogPost` → `blog-post`
pub fn to_kebab_case(s: &str) -> String {
    words(s).join("-")
}

/// `blog_post` → `BlogPost`
pub fn to_studly_case(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

/// `blog_post` → `blogPost`
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::new();
    for (i, w) in words(s).iter().enumerate() {
        if i == 0 {
            out.push_str(w);
        } else {
            out.push_str(&capitalize(w));
        }
    }
    out
}

/// `blog_post` → `Blog Post`
pub fn to_title_case(s: &str) -> String {
    words(s)
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Regular plural: append `s`. See the module docs for the known limitation.
pub fn pluralize(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    format!("{s}s")
}

/// Inverse of [`pluralize`]: strip one trailing `s` unless the word ends in `ss`.
pub fn singularize(s: &str) -> String {
    if s.len() > 1 && s.ends_with('s') && !s.ends_with("ss") {
        s[..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

/// Every naming derivative the planner exposes to templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameSet {
    /// `BlogPost`
    pub studly: String,
    /// `BlogPosts`
    pub studly_plural: String,
    /// `blogPost`
    pub camel: String,
    /// `blogPosts`
    pub camel_plural: String,
    /// `blog_post`
    pub snake: String,
    /// `blog_posts`
    pub snake_plural: String,
    /// `blog-post`
    pub kebab: String,
    /// `blog-posts`
    pub kebab_plural: String,
    /// `Blog Post`
    pub title: String,
    /// `Blog Posts`
    pub title_plural: String,
}

impl NameSet {
    /// Derive all forms from an entity name in any casing.
    pub fn from_entity(name: &str) -> Self {
        let studly = to_studly_case(name);
        let studly_plural = pluralize(&studly);
        NameSet {
            camel: to_camel_case(&studly),
            camel_plural: to_camel_case(&studly_plural),
            snake: to_snake_case(&studly),
            snake_plural: to_snake_case(&studly_plural),
            kebab: to_kebab_case(&studly),
            kebab_plural: to_kebab_case(&studly_plural),
            title: to_title_case(&studly),
            title_plural: to_title_case(&studly_plural),
            studly,
            studly_plural,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_split_on_case_and_separators() {
        assert_eq!(words("BlogPost"), vec!["blog", "post"]);
        assert_eq!(words("blog_post"), vec!["blog", "post"]);
        assert_eq!(words("blog-post title"), vec!["blog", "post", "title"]);
        assert_eq!(words("HTTPServer"), vec!["http", "server"]);
        assert_eq!(words("user2Fa"), vec!["user2", "fa"]);
    }

    #[test]
    fn test_case_transforms() {
        assert_eq!(to_snake_case("BlogPost"), "blog_post");
        assert_eq!(to_kebab_case("BlogPost"), "blog-post");
        assert_eq!(to_studly_case("blog_post"), "BlogPost");
        assert_eq!(to_camel_case("blog_post"), "blogPost");
        assert_eq!(to_title_case("blog_post"), "Blog Post");
    }

    #[test]
    fn test_regular_plural_only() {
        assert_eq!(pluralize("post"), "posts");
        assert_eq!(pluralize("Person"), "Persons");
        assert_eq!(singularize("posts"), "post");
        assert_eq!(singularize("address"), "address");
        assert_eq!(singularize("s"), "s");
    }

    #[test]
    fn test_name_set() {
        let names = NameSet::from_entity("blog_post");
        assert_eq!(names.studly, "BlogPost");
        assert_eq!(names.studly_plural, "BlogPosts");
        assert_eq!(names.camel_plural, "blogPosts");
        assert_eq!(names.snake_plural, "blog_posts");
        assert_eq!(names.kebab_plural, "blog-posts");
        assert_eq!(names.title_plural, "Blog Posts");
    }
}
