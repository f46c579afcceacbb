//! # Template Rendering
//!
//! Single-pass `{{ name }}` substitution over plain-text templates.
//!
//! There is no control flow in templates. Anything conditional is decided by
//! the planner and handed over as a finished variable, which keeps one
//! renderer serving every artifact kind.
//!
//! | value | rendered as |
//! |---|---|
//! | `Null` | empty string |
//! | `Bool` | `true` / `false` |
//! | `List` | comma-joined, text items single-quoted |
//! | `Map` | comma-joined `'key' => 'value'` |
//!
//! Placeholders with no variable are left untouched and can be found with
//! [`residual_placeholders`].

mod engine;
mod templates;
mod value;

pub use engine::{render, residual_placeholders};
pub use templates::{
    bundled_template, ResolvedTemplate, TemplateOrigin, TemplateSource, BUNDLED_TEMPLATES,
    TEMPLATE_EXTENSION,
};
pub use value::{quote, Scalar, TemplateValue, Variables};
