//! Random data generators for fuzzing the identity grammar and catalog
//! construction outside of `proptest`'s own strategy machinery.

use ahash::AHashMap;
use modlink_core::{ModuleId, VersionConstraint};
use rand::prelude::*;
use semver::Version;

/// Generate a random module name from a small fixed vocabulary, so
/// generated catalogs have a realistic chance of colliding and exercising
/// name-based lookups.
#[must_use]
pub fn random_module_name() -> String {
    let mut rng = rand::thread_rng();
    let stems = [
        "core", "base", "util", "net", "io", "gfx", "audio", "math", "text", "crypto", "store",
        "log", "cache", "proto",
    ];
    let stem = stems.choose(&mut rng).unwrap();
    format!("{stem}{}", rng.gen_range(1..1000))
}

/// Generate a random semantic version.
#[must_use]
pub fn random_version() -> Version {
    let mut rng = rand::thread_rng();
    Version::new(
        rng.gen_range(0..10),
        rng.gen_range(0..20),
        rng.gen_range(0..50),
    )
}

/// Generate a random unversioned or versioned [`ModuleId`].
#[must_use]
pub fn random_module_id() -> ModuleId {
    let mut rng = rand::thread_rng();
    let name = random_module_name();
    if rng.gen_bool(0.8) {
        ModuleId::versioned(name, random_version())
    } else {
        ModuleId::new(name)
    }
}

/// Generate a random version constraint string in one of the grammar's
/// supported shapes (caret, tilde, comparison, wildcard, exact).
#[must_use]
pub fn random_version_constraint() -> VersionConstraint {
    let mut rng = rand::thread_rng();
    let v = random_version();
    let shape = rng.gen_range(0..5);
    let raw = match shape {
        0 => format!("^{v}"),
        1 => format!("~{v}"),
        2 => format!(">={v}"),
        3 => format!("{}.*", v.major),
        _ => format!("={v}"),
    };
    VersionConstraint::new(raw)
}

/// Generate `count` distinct versions of one module name, ascending by
/// major version, for exercising version-choice backtracking.
#[must_use]
pub fn version_ladder(name: &str, count: u64) -> Vec<ModuleId> {
    (1..=count)
        .map(|major| ModuleId::versioned(name, Version::new(major, 0, 0)))
        .collect()
}

/// Generate a random `library_for_module` map covering `ids`, assigning
/// each id to one of a handful of fake library directory names.
#[must_use]
pub fn random_library_assignment(ids: &[ModuleId]) -> AHashMap<ModuleId, String> {
    let mut rng = rand::thread_rng();
    let libraries = ["libs/a", "libs/b", "libs/c"];
    ids.iter()
        .map(|id| (id.clone(), (*libraries.choose(&mut rng).unwrap()).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ladder_is_ascending_and_distinct() {
        let ladder = version_ladder("lib", 4);
        assert_eq!(ladder.len(), 4);
        for pair in ladder.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn random_module_id_parses_back_through_display() {
        for _ in 0..20 {
            let id = random_module_id();
            let round_tripped: ModuleId = id.to_string().parse().unwrap();
            assert_eq!(id, round_tripped);
        }
    }

    #[test]
    fn random_version_constraint_matches_its_own_seed_version() {
        // Not every generated shape admits every other version, but an
        // exact constraint must at least be parseable and non-panicking
        // when matched against an arbitrary version.
        for _ in 0..20 {
            let c = random_version_constraint();
            let _ = c.matches(&random_version());
        }
    }
}
