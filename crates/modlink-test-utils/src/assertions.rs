//! Domain-specific assertion helpers for resolution and linking results.

use modlink_context::Context;
use modlink_core::ModuleId;
use modlink_resolver::Resolution;

/// Assert `resolution` chose exactly `id` for `id.name()`.
///
/// # Panics
/// Panics if no module was chosen for the name, or a different version
/// was chosen.
pub fn assert_resolved(resolution: &Resolution, id: &ModuleId) {
    let chosen = resolution
        .get(id.name())
        .unwrap_or_else(|| panic!("expected {} to resolve, but it did not", id.name()));
    assert_eq!(
        chosen.id(),
        id,
        "expected {} to resolve to {id}, got {}",
        id.name(),
        chosen.id()
    );
}

/// Assert `resolution` has no chosen module for `name`.
///
/// # Panics
/// Panics if a module was chosen for `name`.
pub fn assert_not_resolved(resolution: &Resolution, name: &str) {
    assert!(
        resolution.get(name).is_none(),
        "expected {name} to be unresolved, but {} was chosen",
        resolution.get(name).unwrap().id()
    );
}

/// Assert every id in `ids` landed in the same context within `contexts`.
///
/// # Panics
/// Panics if any id is missing from every context, or if the ids span
/// more than one context.
pub fn assert_same_context<'a>(contexts: &'a [Context], ids: &[ModuleId]) -> &'a Context {
    let owning: Vec<&Context> = ids
        .iter()
        .map(|id| {
            contexts
                .iter()
                .find(|ctx| ctx.module(id).is_some())
                .unwrap_or_else(|| panic!("{id} was not placed in any context"))
        })
        .collect();

    let first = owning[0];
    for (id, ctx) in ids.iter().zip(owning.iter()) {
        assert_eq!(
            ctx.name(),
            first.name(),
            "expected {id} in context {}, but it landed in {}",
            first.name(),
            ctx.name()
        );
    }
    first
}

/// Assert `context` routes `class_name` to `expected`.
///
/// # Panics
/// Panics if the class has no local route, or routes to a different id.
pub fn assert_local_class_routes_to(context: &Context, class_name: &str, expected: &ModuleId) {
    let routed = context
        .module_for_local_class(class_name)
        .unwrap_or_else(|| panic!("{class_name} has no local-class route in {}", context.name()));
    assert_eq!(routed, expected);
}

/// Assert `context` exports at least one implementation of `interface`
/// under `class_name`.
///
/// # Panics
/// Panics if `interface` has no registered implementations, or
/// `class_name` is not among them.
pub fn assert_service_provided(context: &Context, interface: &str, class_name: &str) {
    let impls = context
        .services()
        .get(interface)
        .unwrap_or_else(|| panic!("{interface} has no providers in context {}", context.name()));
    assert!(
        impls.iter().any(|c| c == class_name),
        "expected {class_name} among providers of {interface} in {}, found {impls:?}",
        context.name()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixtures;
    use modlink_catalog::Library;
    use modlink_resolver::Resolver;

    #[test]
    fn assert_resolved_accepts_the_chosen_version() {
        let catalog = Fixtures::version_choice();
        let resolution = Resolver::new(&catalog)
            .resolve(&[modlink_core::ModuleIdQuery::unconstrained("app")])
            .unwrap();
        assert_resolved(
            &resolution,
            &ModuleId::versioned("lib", Fixtures::version(2)),
        );
    }
}
