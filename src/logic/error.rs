use thiserror::Error;

use crate::model::schema::Violation;

/// Typed failure produced at the entity-manager boundary. The pipeline stops
/// at the first failing stage; nothing is written before a failing check.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{entity} validation failed")]
    Validation {
        entity: &'static str,
        violations: Vec<Violation>,
    },

    #[error("{entity} named {name:?} already exists")]
    AlreadyExists {
        entity: &'static str,
        name: String,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Underlying store operation failed (connectivity, pool exhaustion,
    /// constraint violation). May be transient; never retried here.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl PipelineError {
    pub fn validation(entity: &'static str, violations: Vec<Violation>) -> Self {
        Self::Validation { entity, violations }
    }
}
