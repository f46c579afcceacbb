use serde::Serialize;
use std::fmt;

/// Marks a mandatory field.
pub const REQUIRED: &str = "required";
/// Prefix inserted before `required` in mutation rule sets.
pub const SOMETIMES: &str = "sometimes";
pub const NULLABLE: &str = "nullable";

/// Ordered validation tokens for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RuleSet(Vec<String>);

impl RuleSet {
    pub fn new() -> Self {
        RuleSet(Vec::new())
    }

    /// Append a token unless it is already present.
    pub fn push(&mut self, token: impl Into<String>) {
        let token = token.into();
        if !self.0.contains(&token) {
            self.0.push(token);
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Partial-update variant: every `required` becomes `sometimes, required`.
    pub fn to_mutation(&self) -> RuleSet {
        let mut out = Vec::with_capacity(self.0.len() + 1);
        for token in &self.0 {
            if token == REQUIRED {
                out.push(SOMETIMES.to_string());
            }
            out.push(token.clone());
        }
        RuleSet(out)
    }

    /// Pipe-joined form used in generated validator classes: `required|string|max:255`
    pub fn to_pipe_string(&self) -> String {
        self.0.join("|")
    }
}

impl<S: Into<String>> FromIterator<S> for RuleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = RuleSet::new();
        for token in iter {
            set.push(token);
        }
        set
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Creation and mutation rules for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRules {
    pub field: String,
    pub creation: RuleSet,
    pub mutation: RuleSet,
}

/// Rules for every input field of an entity, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleTable {
    entries: Vec<FieldRules>,
}

impl RuleTable {
    pub(crate) fn push(&mut self, field: impl Into<String>, creation: RuleSet) {
        let mutation = creation.to_mutation();
        self.entries.push(FieldRules {
            field: field.into(),
            creation,
            mutation,
        });
    }

    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.entries.iter().find(|e| e.field == field)
    }

    pub fn creation(&self, field: &str) -> Option<&RuleSet> {
        self.get(field).map(|e| &e.creation)
    }

    pub fn mutation(&self, field: &str) -> Option<&RuleSet> {
        self.get(field).map(|e| &e.mutation)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRules> {
        self.entries.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.field.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(field, "required|string")` pairs for the creation variant
    pub fn creation_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|e| (e.field.clone(), e.creation.to_pipe_string()))
            .collect()
    }

    /// `(field, "sometimes|required|string")` pairs for the mutation variant
    pub fn mutation_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|e| (e.field.clone(), e.mutation.to_pipe_string()))
            .collect()
    }
}
