//! Variable assembly, one function per document kind.

use super::fragments;
use super::kind::{ArtifactKind, DocumentKind};
use super::negotiation::negotiation_helper;
use super::paths::{normalize_namespace, qualify};
use super::plan::{transformer_class, PlanContext};
use crate::introspect::{Cardinality, FieldDescriptor, FieldType, PrimaryKeyType};
use crate::naming::{to_studly_case, words};
use crate::render::{TemplateValue, Variables};

pub(crate) fn for_document(
    ctx: &PlanContext<'_>,
    document: DocumentKind,
    namespace: &str,
    class: &str,
) -> Variables {
    let mut vars = naming_variables(ctx);
    vars.insert("namespace".into(), namespace.into());
    vars.insert("class".into(), class.into());
    vars.insert("model_class".into(), ctx.classes.model.as_str().into());
    match document {
        DocumentKind::Controller => controller_variables(ctx, &mut vars),
        DocumentKind::CreateValidator => request_variables(ctx, false, &mut vars),
        DocumentKind::UpdateValidator => request_variables(ctx, true, &mut vars),
        DocumentKind::Transformer => transformer_variables(ctx, &mut vars),
    }
    vars
}

fn naming_variables(ctx: &PlanContext<'_>) -> Variables {
    let n = &ctx.names;
    [
        ("entity", &n.studly),
        ("entity_plural", &n.studly_plural),
        ("entity_camel", &n.camel),
        ("entity_camel_plural", &n.camel_plural),
        ("entity_snake", &n.snake),
        ("entity_snake_plural", &n.snake_plural),
        ("entity_kebab", &n.kebab),
        ("entity_kebab_plural", &n.kebab_plural),
        ("entity_title", &n.title),
        ("entity_title_plural", &n.title_plural),
        ("table", &ctx.entity.storage_key),
        ("primary_key", &ctx.entity.primary_key_field),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), TemplateValue::from(v.as_str())))
    .collect()
}

fn controller_imports(ctx: &PlanContext<'_>) -> String {
    let base = &ctx.config.paths.controller_namespace;
    let mut imports = vec![
        "Illuminate\\Http\\Request".to_string(),
        ctx.classes.model.clone(),
    ];
    if normalize_namespace(base) != ctx.controller_namespace {
        imports.push(qualify(base, "Controller"));
    }
    if ctx.uses_validators {
        imports.push(qualify(&ctx.request_namespace, &ctx.classes.create_request));
        imports.push(qualify(&ctx.request_namespace, &ctx.classes.update_request));
    }
    if ctx.uses_transformer {
        imports.push(qualify(&ctx.transformer_namespace, &ctx.classes.transformer));
    }
    imports.sort();
    imports.dedup();
    imports
        .iter()
        .map(|i| format!("use {i};"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `(collection, item, created)` response expressions for machine output.
fn machine_responses(ctx: &PlanContext<'_>) -> (String, String, String) {
    let one = format!("${}", ctx.names.camel);
    let many = format!("${}", ctx.names.camel_plural);
    if ctx.uses_transformer {
        let t = &ctx.classes.transformer;
        (
            format!("fractal({many}, new {t}())->respond()"),
            format!("fractal({one}, new {t}())->respond()"),
            format!("fractal({one}, new {t}())->respond(201)"),
        )
    } else {
        (
            format!("response()->json({many})"),
            format!("response()->json({one})"),
            format!("response()->json({one}, 201)"),
        )
    }
}

fn controller_variables(ctx: &PlanContext<'_>, vars: &mut Variables) {
    let g = &ctx.config.generation;
    let entity = ctx.entity;
    let names = &ctx.names;
    let model_var = format!("${}", names.camel);
    let class_ref = format!("{}::class", names.studly);
    let route_name = names.kebab_plural.clone();
    let auth = g.include_authorization;

    vars.insert("imports".into(), controller_imports(ctx).into());
    vars.insert("constructor".into(), fragments::constructor(&g.middleware).into());

    let eager: Vec<&str> = entity
        .relationships
        .iter()
        .filter(|r| g.eager_load_to_many || r.cardinality == Cardinality::One)
        .map(|r| r.name.as_str())
        .collect();
    vars.insert("eager_loads".into(), TemplateValue::text_list(eager));

    let c = &ctx.classification;
    vars.insert("searchable".into(), TemplateValue::text_list(c.searchable.iter().cloned()));
    vars.insert("filterable".into(), TemplateValue::text_list(c.filterable.iter().cloned()));
    vars.insert("sortable".into(), TemplateValue::text_list(c.sortable.iter().cloned()));

    let (default_sort, direction) = if entity.is_timestamped() {
        ("created_at".to_string(), "desc")
    } else {
        (entity.primary_key_field.clone(), "asc")
    };
    vars.insert("default_sort".into(), default_sort.into());
    vars.insert("sort_direction".into(), direction.into());
    vars.insert("per_page".into(), g.per_page.into());

    let (collection, item, created) = machine_responses(ctx);
    vars.insert("respond_collection".into(), collection.into());
    vars.insert("respond_item".into(), item.clone().into());
    vars.insert("respond_created".into(), created.into());

    let (store_signature, update_signature) = if ctx.uses_validators {
        (
            format!("{} $request", ctx.classes.create_request),
            format!("{} $request", ctx.classes.update_request),
        )
    } else {
        ("Request $request".to_string(), "Request $request".to_string())
    };
    vars.insert("store_signature".into(), store_signature.into());
    vars.insert("update_signature".into(), update_signature.into());
    vars.insert(
        "store_validation".into(),
        fragments::validation(ctx.uses_validators, &ctx.rules.creation_pairs()).into(),
    );
    vars.insert(
        "update_validation".into(),
        fragments::validation(ctx.uses_validators, &ctx.rules.mutation_pairs()).into(),
    );

    for (action, ability, subject) in [
        ("index", "viewAny", &class_ref),
        ("store", "create", &class_ref),
        ("show", "view", &model_var),
        ("update", "update", &model_var),
        ("destroy", "delete", &model_var),
    ] {
        vars.insert(
            format!("authorize_{action}"),
            fragments::authorize(auth, ability, subject).into(),
        );
    }

    let redirect = fragments::redirect_to_show(&route_name, &names.camel);
    let restore = if entity.is_soft_deletable() {
        let response = match ctx.kind {
            ArtifactKind::Api => format!("return {item};"),
            ArtifactKind::Web => redirect,
            ArtifactKind::Hybrid => fragments::negotiated(&item, &redirect),
        };
        fragments::restore_action(
            &names.studly,
            &names.camel,
            &names.title,
            fragments::authorize(auth, "restore", &model_var),
            response,
        )
    } else {
        String::new()
    };
    vars.insert("restore_action".into(), restore.into());

    vars.insert("view_prefix".into(), names.kebab_plural.as_str().into());
    vars.insert("route_name".into(), route_name.into());
    let helper = if ctx.kind.strategy().negotiates {
        negotiation_helper(&g.api_prefix, g.include_format_negotiation)
    } else {
        String::new()
    };
    vars.insert("negotiation_helper".into(), helper.into());
}

fn attribute_label(field: &str) -> String {
    let name = field.strip_suffix("_id").unwrap_or(field);
    words(name).join(" ")
}

fn request_variables(ctx: &PlanContext<'_>, update: bool, vars: &mut Variables) {
    let rules = if update {
        ctx.rules.mutation_pairs()
    } else {
        ctx.rules.creation_pairs()
    };
    let attributes: Vec<(String, String)> = rules
        .iter()
        .map(|(field, _)| (field.clone(), attribute_label(field)))
        .collect();
    vars.insert("rules".into(), rules.into());
    vars.insert("attributes".into(), attributes.into());

    let authorize_body = match (ctx.config.generation.include_authorization, update) {
        (false, _) => "return true;".to_string(),
        (true, false) => format!(
            "return $this->user()?->can('create', {}::class) ?? false;",
            ctx.names.studly
        ),
        (true, true) => format!(
            "return $this->user()?->can('update', $this->route('{}')) ?? false;",
            ctx.names.snake
        ),
    };
    vars.insert("authorize_body".into(), authorize_body.into());
}

fn primary_key_descriptor(ctx: &PlanContext<'_>) -> FieldDescriptor {
    let entity = ctx.entity;
    entity
        .field(&entity.primary_key_field)
        .cloned()
        .unwrap_or_else(|| {
            let field_type = match entity.primary_key_type {
                PrimaryKeyType::Integer => FieldType::Integer,
                PrimaryKeyType::Uuid => FieldType::Uuid,
                PrimaryKeyType::String => FieldType::String,
            };
            FieldDescriptor::new(entity.primary_key_field.clone(), field_type)
        })
}

fn transformer_variables(ctx: &PlanContext<'_>, vars: &mut Variables) {
    let entity = ctx.entity;
    let model_var = &ctx.names.camel;
    let pk = primary_key_descriptor(ctx);

    let mut body = fragments::transform_line(&pk.name, &fragments::field_expression(model_var, &pk));
    for field in entity
        .fields
        .iter()
        .filter(|f| f.name != pk.name && !fragments::is_hidden(&f.name))
    {
        body.push_str(&fragments::transform_line(
            &field.name,
            &fragments::field_expression(model_var, field),
        ));
    }
    vars.insert("transform_body".into(), body.into());

    let includes: Vec<&str> = entity.relationships.iter().map(|r| r.name.as_str()).collect();
    vars.insert("available_includes".into(), TemplateValue::text_list(includes));
    vars.insert("default_includes".into(), TemplateValue::List(Vec::new()));

    let methods: String = entity
        .relationships
        .iter()
        .map(|r| {
            fragments::include_method(
                r.cardinality == Cardinality::Many,
                &to_studly_case(&r.name),
                &r.name,
                &ctx.names.studly,
                model_var,
                &transformer_class(&to_studly_case(&r.related_entity)),
            )
        })
        .collect();
    vars.insert("include_methods".into(), methods.into());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_labels() {
        assert_eq!(attribute_label("user_id"), "user");
        assert_eq!(attribute_label("contact_email"), "contact email");
        assert_eq!(attribute_label("title"), "title");
    }
}
