//! Aggregated error type spanning the whole pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Resolve(#[from] modlink_resolver::ResolveError),

    #[error(transparent)]
    Context(#[from] modlink_context::ContextError),

    #[error(transparent)]
    Config(#[from] modlink_config::ConfigError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
