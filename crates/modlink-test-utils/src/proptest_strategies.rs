//! Proptest strategies for the configurator's identity and modifier types.

use modlink_core::{ModuleId, ModuleIdQuery, VersionConstraint};
use modlink_model::{Modifier, Modifiers};
use proptest::prelude::*;
use semver::Version;

/// Strategy for generating valid module names (the identity grammar
/// forbids only the empty string and `@`).
pub fn module_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{2,20}".prop_map(|s| s.to_lowercase())
}

/// Strategy for generating semantic versions.
pub fn version_strategy() -> impl Strategy<Value = Version> {
    (0u64..20, 0u64..50, 0u64..100).prop_map(|(major, minor, patch)| Version::new(major, minor, patch))
}

/// Strategy for generating an unversioned or versioned [`ModuleId`].
pub fn module_id_strategy() -> impl Strategy<Value = ModuleId> {
    (module_name_strategy(), proptest::option::of(version_strategy()))
        .prop_map(|(name, version)| match version {
            Some(v) => ModuleId::versioned(name, v),
            None => ModuleId::new(name),
        })
}

/// Strategy for generating caret constraints.
pub fn caret_constraint_strategy() -> impl Strategy<Value = VersionConstraint> {
    version_strategy().prop_map(|v| VersionConstraint::new(format!("^{v}")))
}

/// Strategy for generating a comparison (`>=`) constraint.
pub fn comparison_constraint_strategy() -> impl Strategy<Value = VersionConstraint> {
    version_strategy().prop_map(|v| VersionConstraint::new(format!(">={v}")))
}

/// Strategy for generating any recognized constraint shape.
pub fn version_constraint_strategy() -> impl Strategy<Value = VersionConstraint> {
    prop_oneof![
        Just(VersionConstraint::any()),
        caret_constraint_strategy(),
        comparison_constraint_strategy(),
    ]
}

/// Strategy for generating a query, optionally constrained.
pub fn module_id_query_strategy() -> impl Strategy<Value = ModuleIdQuery> {
    (module_name_strategy(), proptest::option::of(version_constraint_strategy())).prop_map(
        |(name, constraint)| match constraint {
            Some(c) => ModuleIdQuery::constrained(name, c),
            None => ModuleIdQuery::unconstrained(name),
        },
    )
}

/// Strategy for a single dependence modifier flag. `Synthesized` is
/// excluded: it is set by service discovery, never by a declared
/// dependence, so generating it here would misrepresent the source of a
/// dependence under test.
pub fn declarable_modifier_strategy() -> impl Strategy<Value = Modifier> {
    prop_oneof![
        Just(Modifier::Local),
        Just(Modifier::Optional),
        Just(Modifier::Public),
    ]
}

/// Strategy for a set of 0-3 declarable modifiers combined.
pub fn modifiers_strategy() -> impl Strategy<Value = Modifiers> {
    proptest::collection::vec(declarable_modifier_strategy(), 0..3)
        .prop_map(|flags| flags.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn module_ids_parse_back_through_display(id in module_id_strategy()) {
            let round_tripped: ModuleId = id.to_string().parse().unwrap();
            prop_assert_eq!(id, round_tripped);
        }

        #[test]
        fn generated_modifiers_never_set_synthesized(m in modifiers_strategy()) {
            prop_assert!(!m.is_synthesized());
        }
    }
}
