//! Conservative relationship discovery over declared entity members.
//!
//! A member is a relationship only when it takes no parameters, is not an
//! accessor/mutator/scope by naming convention, declares a return capability
//! from [`RELATIONSHIP_CAPABILITIES`], and names its related entity. Anything
//! else is skipped.

use tracing::debug;

use super::source::MemberDecl;
use super::types::{Cardinality, Direction, RelationshipDescriptor};

/// Known relationship capabilities with their cardinality and direction.
pub const RELATIONSHIP_CAPABILITIES: &[(&str, Cardinality, Direction)] = &[
    ("HasOne", Cardinality::One, Direction::Owning),
    ("MorphOne", Cardinality::One, Direction::Owning),
    ("HasOneThrough", Cardinality::One, Direction::Owning),
    ("BelongsTo", Cardinality::One, Direction::Owned),
    ("MorphTo", Cardinality::One, Direction::Owned),
    ("HasMany", Cardinality::Many, Direction::Owning),
    ("MorphMany", Cardinality::Many, Direction::Owning),
    ("HasManyThrough", Cardinality::Many, Direction::Owning),
    ("MorphToMany", Cardinality::Many, Direction::Owning),
    ("BelongsToMany", Cardinality::Many, Direction::Owned),
];

/// Why a member was not classified as a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    TakesParameters,
    NamingConvention,
    UnknownCapability,
    MissingTarget,
}

/// `getTitleAttribute`, `setTitleAttribute`, `scopePublished`
fn is_convention_member(name: &str) -> bool {
    let accessor = |prefix: &str| {
        name.strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix("Attribute"))
            .is_some_and(|middle| middle.starts_with(|c: char| c.is_ascii_uppercase()))
    };
    let scope = name
        .strip_prefix("scope")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()));
    accessor("get") || accessor("set") || scope
}

fn capability(returns: &str) -> Option<(Cardinality, Direction)> {
    // Accept fully qualified names: Illuminate\...\BelongsTo
    let short = returns.rsplit(['\\', ':']).next().unwrap_or(returns);
    RELATIONSHIP_CAPABILITIES
        .iter()
        .find(|(name, _, _)| *name == short)
        .map(|(_, c, d)| (*c, *d))
}

/// Classify one member.
pub fn classify_member(member: &MemberDecl) -> Result<RelationshipDescriptor, SkipReason> {
    if member.parameters > 0 {
        return Err(SkipReason::TakesParameters);
    }
    if is_convention_member(&member.name) {
        return Err(SkipReason::NamingConvention);
    }
    let (cardinality, direction) = member
        .returns
        .as_deref()
        .and_then(capability)
        .ok_or(SkipReason::UnknownCapability)?;
    let related = member
        .related
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or(SkipReason::MissingTarget)?;
    Ok(RelationshipDescriptor {
        name: member.name.clone(),
        cardinality,
        direction,
        related_entity: super::types::entity_name_from_identifier(related),
    })
}

/// Relationships among `members`, in declaration order, first declaration winning on name clashes.
pub fn discover_relationships(entity: &str, members: &[MemberDecl]) -> Vec<RelationshipDescriptor> {
    let mut out: Vec<RelationshipDescriptor> = Vec::new();
    for member in members {
        match classify_member(member) {
            Ok(rel) => {
                if out.iter().any(|r| r.name == rel.name) {
                    debug!(entity, member = %member.name, "duplicate relationship member skipped");
                    continue;
                }
                out.push(rel);
            }
            Err(reason) => {
                debug!(entity, member = %member.name, ?reason, "member is not a relationship");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, params: usize, returns: Option<&str>, related: Option<&str>) -> MemberDecl {
        MemberDecl {
            name: name.to_string(),
            parameters: params,
            returns: returns.map(String::from),
            related: related.map(String::from),
        }
    }

    #[test]
    fn test_relationship_members_are_classified() {
        let rel = classify_member(&member("user", 0, Some("BelongsTo"), Some("User"))).unwrap();
        assert_eq!(rel.cardinality, Cardinality::One);
        assert_eq!(rel.direction, Direction::Owned);
        assert_eq!(rel.related_entity, "User");

        let rel = classify_member(&member(
            "comments",
            0,
            Some("Illuminate\\Database\\Eloquent\\Relations\\HasMany"),
            Some("App\\Models\\Comment"),
        ))
        .unwrap();
        assert_eq!(rel.cardinality, Cardinality::Many);
        assert_eq!(rel.related_entity, "Comment");
    }

    #[test]
    fn test_ambiguous_members_are_skipped() {
        assert_eq!(
            classify_member(&member("forUser", 1, Some("HasMany"), Some("Post"))),
            Err(SkipReason::TakesParameters)
        );
        assert_eq!(
            classify_member(&member("getTitleAttribute", 0, Some("HasOne"), Some("X"))),
            Err(SkipReason::NamingConvention)
        );
        assert_eq!(
            classify_member(&member("scopePublished", 0, Some("HasMany"), Some("X"))),
            Err(SkipReason::NamingConvention)
        );
        assert_eq!(
            classify_member(&member("summary", 0, Some("string"), None)),
            Err(SkipReason::UnknownCapability)
        );
        assert_eq!(
            classify_member(&member("owner", 0, None, Some("User"))),
            Err(SkipReason::UnknownCapability)
        );
        assert_eq!(
            classify_member(&member("owner", 0, Some("BelongsTo"), None)),
            Err(SkipReason::MissingTarget)
        );
    }

    #[test]
    fn test_scope_prefix_needs_uppercase() {
        // `scoreboard` is not a scope
        let rel = classify_member(&member("scoreboard", 0, Some("HasOne"), Some("Board")));
        assert!(rel.is_ok());
    }

    #[test]
    fn test_discover_keeps_order_and_dedupes() {
        let members = vec![
            member("user", 0, Some("BelongsTo"), Some("User")),
            member("title", 0, Some("string"), None),
            member("comments", 0, Some("HasMany"), Some("Comment")),
            member("user", 0, Some("HasOne"), Some("Profile")),
        ];
        let rels = discover_relationships("Post", &members);
        let names: Vec<_> = rels.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["user", "comments"]);
    }
}
