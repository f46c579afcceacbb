use serde::Serialize;
use std::collections::BTreeMap;

/// Variables supplied to one template, keyed by placeholder name.
pub type Variables = BTreeMap<String, TemplateValue>;

/// A list element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Bool(bool),
    Integer(i64),
}

/// A value substituted into a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TemplateValue {
    Null,
    Text(String),
    Bool(bool),
    Integer(i64),
    /// Rendered comma-joined, text elements quoted
    List(Vec<Scalar>),
    /// Ordered pairs, rendered as `'key' => 'value'`, comma-joined
    Map(Vec<(String, String)>),
}

/// Quote a string as a single-quoted literal, escaping `\` and `'`.
pub fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

impl Scalar {
    fn format(&self) -> String {
        match self {
            Scalar::Text(s) => quote(s),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Integer(i) => i.to_string(),
        }
    }
}

impl TemplateValue {
    /// Text substituted for a placeholder bound to this value.
    pub fn format(&self) -> String {
        match self {
            TemplateValue::Null => String::new(),
            TemplateValue::Text(s) => s.clone(),
            TemplateValue::Bool(b) => b.to_string(),
            TemplateValue::Integer(i) => i.to_string(),
            TemplateValue::List(items) => items
                .iter()
                .map(Scalar::format)
                .collect::<Vec<_>>()
                .join(", "),
            TemplateValue::Map(pairs) => pairs
                .iter()
                .map(|(k, v)| format!("{} => {}", quote(k), quote(v)))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// List of text scalars
    pub fn text_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TemplateValue::List(items.into_iter().map(|s| Scalar::Text(s.into())).collect())
    }
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        TemplateValue::Text(s)
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        TemplateValue::Text(s.to_string())
    }
}

impl From<bool> for TemplateValue {
    fn from(b: bool) -> Self {
        TemplateValue::Bool(b)
    }
}

impl From<i64> for TemplateValue {
    fn from(i: i64) -> Self {
        TemplateValue::Integer(i)
    }
}

impl From<u32> for TemplateValue {
    fn from(i: u32) -> Self {
        TemplateValue::Integer(i64::from(i))
    }
}

impl<T: Into<TemplateValue>> From<Option<T>> for TemplateValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(TemplateValue::Null)
    }
}

impl From<Vec<(String, String)>> for TemplateValue {
    fn from(pairs: Vec<(String, String)>) -> Self {
        TemplateValue::Map(pairs)
    }
}
