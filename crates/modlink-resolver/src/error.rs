//! Resolver error kinds (`spec.md` §7).

use modlink_core::ModuleIdQuery;
use thiserror::Error;

/// Failures from [`crate::Resolver::resolve`].
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No assignment satisfies the constraints.
    ///
    /// `cause` carries the most specific failure the search hit before
    /// giving up — e.g. a `PermitsViolation` on the last candidate tried —
    /// rather than discarding it on backtrack (`spec.md` §8 Scenario 4:
    /// "Unresolvable, and the reason cites PermitsViolation on lib@1").
    #[error(
        "unresolvable: no module satisfies {query}{}",
        cause.as_ref().map_or_else(String::new, |c| format!(" (cause: {c})"))
    )]
    Unresolvable {
        query: ModuleIdQuery,
        #[source]
        cause: Option<Box<ResolveError>>,
    },

    /// A bound module's view forbids the requester.
    #[error("'{requester}' is not permitted to depend on view '{view}' of '{module}'")]
    PermitsViolation {
        requester: String,
        module: String,
        view: String,
    },

    /// A non-optional service-dependence has no provider after resolution.
    #[error("no provider resolved for service interface '{0}'")]
    MissingService(String),

    /// Underlying I/O reading module-info from the catalog.
    #[error(transparent)]
    CatalogIo(#[from] modlink_catalog::CatalogError),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
