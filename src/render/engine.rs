use super::value::Variables;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Walk `template`, calling `on_token` for every `{{ name }}` with a
/// well-formed name. The callback returns the replacement, or `None` to keep
/// the token verbatim.
fn scan<F>(template: &str, mut on_token: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };
        // a stray `{{` before the close belongs to literal text
        if let Some(inner) = after_open[..end].find(OPEN) {
            out.push_str(&rest[start..start + OPEN.len() + inner]);
            rest = &after_open[inner..];
            continue;
        }
        let token = &rest[start..start + OPEN.len() + end + CLOSE.len()];
        let name = after_open[..end].trim();
        match is_placeholder_name(name).then(|| on_token(name)).flatten() {
            Some(replacement) => out.push_str(&replacement),
            None => out.push_str(token),
        }
        rest = &after_open[end + CLOSE.len()..];
    }
    out.push_str(rest);
    out
}

/// Substitute `{{ name }}` placeholders with formatted variable values.
///
/// Names match exactly, so `{{ model }}` never consumes part of
/// `{{ modelVariable }}`. Substituted text is not rescanned. Placeholders
/// without a variable are left in place; use [`residual_placeholders`] to
/// detect them.
pub fn render(template: &str, variables: &Variables) -> String {
    scan(template, |name| variables.get(name).map(|v| v.format()))
}

/// Names of placeholders still present in `text`, in order of appearance.
pub fn residual_placeholders(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    scan(text, |name| {
        names.push(name.to_string());
        None
    });
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::value::{Scalar, TemplateValue};

    fn vars(pairs: &[(&str, TemplateValue)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_exact_name_substitution() {
        let v = vars(&[
            ("model", "Post".into()),
            ("modelVariable", "post".into()),
        ]);
        let out = render("{{ model }}/{{modelVariable}}/{{ model}}", &v);
        assert_eq!(out, "Post/post/Post");
    }

    #[test]
    fn test_value_formatting() {
        let v = vars(&[
            ("flag", true.into()),
            ("none", TemplateValue::Null),
            (
                "list",
                TemplateValue::List(vec![
                    Scalar::Text("user".into()),
                    Scalar::Integer(3),
                    Scalar::Bool(false),
                ]),
            ),
            (
                "rules",
                TemplateValue::Map(vec![
                    ("title".into(), "required|string".into()),
                    ("body".into(), "nullable".into()),
                ]),
            ),
        ]);
        assert_eq!(render("{{ flag }}", &v), "true");
        assert_eq!(render("[{{ none }}]", &v), "[]");
        assert_eq!(render("[{{ list }}]", &v), "['user', 3, false]");
        assert_eq!(
            render("{{ rules }}", &v),
            "'title' => 'required|string', 'body' => 'nullable'"
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        let v = vars(&[("l", TemplateValue::text_list(["it's"]))]);
        assert_eq!(render("{{ l }}", &v), "'it\\'s'");
    }

    #[test]
    fn test_no_recursive_expansion() {
        let v = vars(&[("a", "{{ b }}".into()), ("b", "x".into())]);
        assert_eq!(render("{{ a }}", &v), "{{ b }}");
    }

    #[test]
    fn test_unmatched_placeholders_are_kept_and_detectable() {
        let v = vars(&[("known", "k".into())]);
        let out = render("{{ known }} {{ unknown }} {{ $notAName }} {{ open", &v);
        assert_eq!(out, "k {{ unknown }} {{ $notAName }} {{ open");
        assert_eq!(residual_placeholders(&out), vec!["unknown".to_string()]);
    }

    #[test]
    fn test_literal_open_delimiter_does_not_swallow_placeholder() {
        let v = vars(&[("class", "PostController".into())]);
        let template = "$open = '{{';\nclass {{ class }}\n";
        assert_eq!(render(template, &v), "$open = '{{';\nclass PostController\n");
        assert_eq!(residual_placeholders(template), vec!["class".to_string()]);
        assert_eq!(
            residual_placeholders("{{ {{ {{ a }} {{ b }}"),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
