//! # Rule Inference
//!
//! Maps an [`EntityDescriptor`](crate::introspect::EntityDescriptor) to
//! validation rules and field classifications. Everything here is a pure
//! function of the descriptor.
//!
//! ## Algorithm
//!
//! 1. Skip reserved fields (primary key, `created_at`, `updated_at`, `deleted_at`)
//! 2. Skip fields not open to mass input
//! 3. `nullable` or `required`, then exactly one type token:
//!
//! | type | tokens |
//! |---|---|
//! | string | `string`, `max:<max_length or 255>` |
//! | text | `string` (+ `max:<n>` when declared) |
//! | integer | `integer` |
//! | decimal | `numeric` |
//! | boolean | `boolean` |
//! | date | `date` |
//! | datetime | `date_format:Y-m-d H:i:s` |
//! | json | `json` |
//! | uuid | `uuid` |
//!
//! 4. Name overlays, duplicates dropped: `*email*` → `email`, `*password*` →
//!    `min:8`, `*url*`/`*website*`/`*link*` → `url`, `<prefix>_id` →
//!    `exists:<plural prefix>,id`
//! 5. The mutation variant replaces `required` with `sometimes, required`
//!
//! ## Example
//!
//! ```rust
//! use crudforge::introspect::{EntityDescriptor, FieldDescriptor, FieldType};
//! use crudforge::rules::infer_rules;
//!
//! let mut post = EntityDescriptor::degraded("Post");
//! post.fields.push(FieldDescriptor::new("title", FieldType::String));
//! let rules = infer_rules(&post);
//! assert_eq!(rules.creation("title").unwrap().to_pipe_string(), "required|string|max:255");
//! assert_eq!(rules.mutation("title").unwrap().to_pipe_string(), "sometimes|required|string|max:255");
//! ```

mod classify;
mod infer;
mod ruleset;

pub use classify::{classify_fields, FieldClassification, PREFERRED_SEARCH_FIELDS};
pub use infer::{
    existence_token, field_rules, infer_rules, DATETIME_FORMAT_TOKEN, DEFAULT_STRING_MAX,
    PASSWORD_MIN,
};
pub use ruleset::{FieldRules, RuleSet, RuleTable, NULLABLE, REQUIRED, SOMETIMES};
