//! Resolver tuning knobs.

/// Behavior knobs for [`crate::Resolver`].
#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    /// Backtracking depth guard against cycles in a malformed catalog
    /// that would otherwise recurse forever (the dependence graph itself
    /// may legitimately contain cycles — `spec.md` §9 "Graphs with
    /// cycles" — but the resolver's choice stack must still terminate).
    pub max_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { max_depth: 4096 }
    }
}
