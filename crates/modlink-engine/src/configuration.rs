//! Converts linked [`Context`]s into a persistable [`Configuration`].

use modlink_config::{Configuration, ContextRecord, ModuleEntry};
use modlink_context::Context;
use modlink_core::{ModuleId, ModuleIdQuery};
use modlink_resolver::Resolution;

/// The root ids a set of root queries resolved to, in query order. A query
/// that went unresolved (shouldn't happen once [`Resolution`] exists, but
/// cheaper to skip than to panic on) is silently dropped.
#[must_use]
pub fn root_ids(roots: &[ModuleIdQuery], resolution: &Resolution) -> Vec<ModuleId> {
    roots
        .iter()
        .filter_map(|q| resolution.get(q.name()).map(|m| m.id().clone()))
        .collect()
}

/// Build the persisted [`Configuration`] from a set of linked contexts.
#[must_use]
pub fn build_configuration(root_ids: Vec<ModuleId>, contexts: &[Context]) -> Configuration {
    let records = contexts
        .iter()
        .map(|ctx| {
            let modules = ctx
                .modules()
                .map(|m| ModuleEntry {
                    id: m.id().clone(),
                    library_path: ctx.library_for_module(m.id()).map(str::to_string),
                })
                .collect();
            let local_classes = ctx
                .local_classes()
                .map(|(class_name, id)| (class_name.to_string(), id.clone()))
                .collect();
            let remote_packages = ctx
                .remote_packages()
                .map(|(package, context_name)| (package.to_string(), context_name.to_string()))
                .collect();
            ContextRecord::new(ctx.name(), modules, local_classes, remote_packages)
        })
        .collect();

    Configuration::new(root_ids, records)
}
