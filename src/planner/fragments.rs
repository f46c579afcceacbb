//! PHP snippets spliced into templates.
//!
//! Templates have no conditionals, so anything optional is produced here as
//! finished text (or an empty string) and handed over as a variable. Snippets
//! are rendered with the same engine as the templates. Each one carries its
//! own indentation and trailing newlines.

use crate::introspect::{FieldDescriptor, FieldType};
use crate::render::{quote, render, TemplateValue, Variables};

const AUTHORIZE: &str = "        $this->authorize('{{ ability }}', {{ subject }});\n\n";

const CONSTRUCTOR: &str = r#"
    public function __construct()
    {
        $this->middleware([{{ middleware }}]);
    }
"#;

const RESTORE_ACTION: &str = r#"
    /**
     * Restore a soft-deleted {{ entity_title }}.
     */
    public function restore(Request $request, $id)
    {
        ${{ entity_camel }} = {{ entity }}::withTrashed()->findOrFail($id);
{{ authorize_restore }}        ${{ entity_camel }}->restore();

        {{ restore_response }}
    }
"#;

const REDIRECT_TO_SHOW: &str = "return redirect()->route('{{ route_name }}.show', ${{ entity_camel }});";

const NEGOTIATED_RESPONSE: &str = r#"if ($this->wantsMachineOutput($request)) {
            return {{ machine_response }};
        }

        {{ human_response }}"#;

const INCLUDE_ITEM: &str = r#"
    public function include{{ method }}({{ entity }} ${{ entity_camel }})
    {
        return ${{ entity_camel }}->{{ relation }}
            ? $this->item(${{ entity_camel }}->{{ relation }}, new {{ related_transformer }}())
            : $this->null();
    }
"#;

const INCLUDE_COLLECTION: &str = r#"
    public function include{{ method }}({{ entity }} ${{ entity_camel }})
    {
        return $this->collection(${{ entity_camel }}->{{ relation }}, new {{ related_transformer }}());
    }
"#;

/// Field names never exposed by a transformer.
pub const HIDDEN_FIELD_MARKERS: [&str; 3] = ["password", "token", "secret"];

fn vars<const N: usize>(pairs: [(&str, TemplateValue); N]) -> Variables {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// `$this->authorize(...)` line, or nothing when authorisation is off.
pub fn authorize(enabled: bool, ability: &str, subject: &str) -> String {
    if !enabled {
        return String::new();
    }
    render(
        AUTHORIZE,
        &vars([("ability", ability.into()), ("subject", subject.into())]),
    )
}

/// Constructor registering middleware, or nothing when there is none.
pub fn constructor(middleware: &[String]) -> String {
    if middleware.is_empty() {
        return String::new();
    }
    render(
        CONSTRUCTOR,
        &vars([("middleware", TemplateValue::text_list(middleware.iter().cloned()))]),
    )
}

/// Validation statement leaving input in `$data`.
pub fn validation(via_request_class: bool, rules: &[(String, String)]) -> String {
    if via_request_class {
        return "$data = $request->validated();".to_string();
    }
    if rules.is_empty() {
        return "$data = $request->validate([]);".to_string();
    }
    let lines: String = rules
        .iter()
        .map(|(field, rule)| format!("            {} => {},\n", quote(field), quote(rule)))
        .collect();
    format!("$data = $request->validate([\n{lines}        ]);")
}

pub fn redirect_to_show(route_name: &str, entity_camel: &str) -> String {
    render(
        REDIRECT_TO_SHOW,
        &vars([
            ("route_name", route_name.into()),
            ("entity_camel", entity_camel.into()),
        ]),
    )
}

/// Branch on the negotiation helper.
pub fn negotiated(machine_response: &str, human_response: &str) -> String {
    render(
        NEGOTIATED_RESPONSE,
        &vars([
            ("machine_response", machine_response.into()),
            ("human_response", human_response.into()),
        ]),
    )
}

/// Restore action for soft-deletable entities.
pub fn restore_action(
    entity: &str,
    entity_camel: &str,
    entity_title: &str,
    authorize_restore: String,
    restore_response: String,
) -> String {
    render(
        RESTORE_ACTION,
        &vars([
            ("entity", entity.into()),
            ("entity_camel", entity_camel.into()),
            ("entity_title", entity_title.into()),
            ("authorize_restore", authorize_restore.into()),
            ("restore_response", restore_response.into()),
        ]),
    )
}

/// Include method for one relationship.
pub fn include_method(
    to_many: bool,
    method: &str,
    relation: &str,
    entity: &str,
    entity_camel: &str,
    related_transformer: &str,
) -> String {
    let template = if to_many { INCLUDE_COLLECTION } else { INCLUDE_ITEM };
    render(
        template,
        &vars([
            ("method", method.into()),
            ("relation", relation.into()),
            ("entity", entity.into()),
            ("entity_camel", entity_camel.into()),
            ("related_transformer", related_transformer.into()),
        ]),
    )
}

pub fn is_hidden(field: &str) -> bool {
    let lower = field.to_ascii_lowercase();
    HIDDEN_FIELD_MARKERS.iter().any(|m| lower.contains(m))
}

/// Expression reading `field` off the model variable, cast by type.
pub fn field_expression(model_var: &str, field: &FieldDescriptor) -> String {
    let access = format!("${model_var}->{}", field.name);
    match field.field_type {
        FieldType::Boolean => format!("(bool) {access}"),
        FieldType::Integer => format!("(int) {access}"),
        FieldType::Decimal => format!("(float) {access}"),
        FieldType::Date => format!("{access}?->toDateString()"),
        FieldType::Datetime => format!("{access}?->toIso8601String()"),
        _ => access,
    }
}

/// One `'key' => expr,` line of a transform body.
pub fn transform_line(key: &str, expression: &str) -> String {
    format!("            {} => {expression},\n", quote(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_snippets_collapse() {
        assert_eq!(authorize(false, "view", "$post"), "");
        assert_eq!(constructor(&[]), "");
        assert_eq!(
            authorize(true, "viewAny", "Post::class"),
            "        $this->authorize('viewAny', Post::class);\n\n"
        );
        assert!(constructor(&["auth".into(), "verified".into()])
            .contains("$this->middleware(['auth', 'verified']);"));
    }

    #[test]
    fn test_inline_validation() {
        let rules = vec![("title".to_string(), "required|string|max:255".to_string())];
        assert_eq!(
            validation(false, &rules),
            "$data = $request->validate([\n            'title' => 'required|string|max:255',\n        ]);"
        );
        assert_eq!(validation(true, &rules), "$data = $request->validated();");
        assert_eq!(validation(false, &[]), "$data = $request->validate([]);");
    }

    #[test]
    fn test_field_expressions() {
        let active = FieldDescriptor::new("active", FieldType::Boolean);
        let seen = FieldDescriptor::new("seen_at", FieldType::Datetime);
        assert_eq!(field_expression("user", &active), "(bool) $user->active");
        assert_eq!(field_expression("user", &seen), "$user->seen_at?->toIso8601String()");
        assert!(is_hidden("remember_token"));
        assert!(!is_hidden("title"));
    }

    #[test]
    fn test_include_methods() {
        let one = include_method(false, "Author", "author", "Post", "post", "UserTransformer");
        assert!(one.contains("public function includeAuthor(Post $post)"));
        assert!(one.contains("$this->item($post->author, new UserTransformer())"));
        let many = include_method(true, "Comments", "comments", "Post", "post", "CommentTransformer");
        assert!(many.contains("$this->collection($post->comments, new CommentTransformer())"));
    }
}
