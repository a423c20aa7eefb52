//! The shared validate → rule-check → derive → persist sequence.
//!
//! All three entity managers run the same pipeline; they differ only in the
//! configuration this trait captures: operation schemas, the deriver hook,
//! whether updates pre-check row existence, and the persistence calls.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::logic::error::PipelineError;
use crate::model::schema::{FieldMap, ObjectSchema, Violation};
use crate::model::Filter;

#[async_trait]
pub trait EntityPipeline: Send + Sync {
    type Entity: Serialize + Send;
    type Draft: DeserializeOwned + Send;
    type Patch: DeserializeOwned + Send;

    fn entity(&self) -> &'static str;
    fn create_schema(&self) -> &'static ObjectSchema;
    fn update_schema(&self) -> &'static ObjectSchema;

    fn derive_draft(&self, _draft: &mut Self::Draft) {}
    fn derive_patch(&self, _patch: &mut Self::Patch) {}

    /// Whether updates query the row first and fail with `NotFound` before
    /// writing anything.
    fn checks_existence_on_update(&self) -> bool {
        false
    }

    async fn name_taken(&self, name: &str) -> Result<bool, PipelineError>;
    async fn exists(&self, id: i64) -> Result<bool, PipelineError>;
    async fn persist_insert(&self, draft: Self::Draft) -> Result<Self::Entity, PipelineError>;
    /// Returns `Ok(None)` when no row matched `id`.
    async fn persist_update(
        &self,
        id: i64,
        patch: Self::Patch,
    ) -> Result<Option<Self::Entity>, PipelineError>;
}

/// Create pipeline: validate, inject route-derived foreign keys, derive,
/// reject duplicate names, insert, and return the canonical row.
pub async fn create<P: EntityPipeline>(
    pipeline: &P,
    body: &Value,
    inject: &[(&'static str, i64)],
) -> Result<P::Entity, PipelineError> {
    let mut fields = validate(pipeline.entity(), pipeline.create_schema(), body)?;
    // Path-derived foreign keys win over anything the body supplied.
    for (column, id) in inject {
        fields.insert((*column).to_owned(), Value::from(*id));
    }

    let name = fields.get("name").and_then(Value::as_str).map(str::to_owned);
    let mut draft = decode::<P::Draft>(pipeline.entity(), fields)?;
    pipeline.derive_draft(&mut draft);

    if let Some(name) = name {
        if pipeline.name_taken(&name).await? {
            return Err(PipelineError::AlreadyExists {
                entity: pipeline.entity(),
                name,
            });
        }
    }

    pipeline.persist_insert(draft).await
}

/// Update pipeline: validate against the looser schema, derive, optionally
/// pre-check existence, persist, and return the fresh row. The path id
/// identifies the row; update schemas never admit a body `id`.
pub async fn update<P: EntityPipeline>(
    pipeline: &P,
    id: i64,
    body: &Value,
) -> Result<P::Entity, PipelineError> {
    let mut patch = {
        let fields = validate(pipeline.entity(), pipeline.update_schema(), body)?;
        decode::<P::Patch>(pipeline.entity(), fields)?
    };
    pipeline.derive_patch(&mut patch);

    if pipeline.checks_existence_on_update() && !pipeline.exists(id).await? {
        return Err(PipelineError::NotFound {
            entity: pipeline.entity(),
            id,
        });
    }

    pipeline
        .persist_update(id, patch)
        .await?
        .ok_or(PipelineError::NotFound {
            entity: pipeline.entity(),
            id,
        })
}

/// Validate a read filter against the entity's GET schema: only known columns
/// with matching primitive types are filterable.
pub fn check_filter(
    entity: &'static str,
    schema: &ObjectSchema,
    filter: &Filter,
) -> Result<(), PipelineError> {
    let violations: Vec<Violation> = filter
        .iter()
        .filter_map(|(column, value)| match schema.field(column) {
            None => Some(Violation::new(column.clone(), "not a filterable column")),
            Some(def) if !def.ty.matches(value) => {
                Some(Violation::new(column.clone(), "filter value has the wrong type"))
            }
            Some(_) => None,
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::validation(entity, violations))
    }
}

fn validate(
    entity: &'static str,
    schema: &ObjectSchema,
    body: &Value,
) -> Result<FieldMap, PipelineError> {
    schema
        .validate(body)
        .map_err(|violations| PipelineError::validation(entity, violations))
}

fn decode<T: DeserializeOwned>(entity: &'static str, fields: FieldMap) -> Result<T, PipelineError> {
    serde_json::from_value(Value::Object(fields)).map_err(|err| {
        PipelineError::Store(anyhow::anyhow!(
            "decoding validated {entity} fields: {err}"
        ))
    })
}
