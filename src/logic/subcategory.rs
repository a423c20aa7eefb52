use async_trait::async_trait;
use serde_json::Value;

use crate::logic::error::PipelineError;
use crate::logic::pipeline::{self, EntityPipeline};
use crate::model::schema::ObjectSchema;
use crate::model::subcategory::{
    Subcategory, SubcategoryDraft, SubcategoryPatch, SUBCATEGORY_CREATE, SUBCATEGORY_GET,
    SUBCATEGORY_UPDATE,
};
use crate::model::{Filter, Page};
use crate::store::traits::SubcategoryStore;

/// Entity manager for subcategories. Creation is always category-scoped: the
/// parent id comes from the route and is injected into the draft.
pub struct SubcategoryManager<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: SubcategoryStore + ?Sized> SubcategoryManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn list(
        &self,
        filter: &Filter,
        page: Page,
    ) -> Result<Vec<Subcategory>, PipelineError> {
        pipeline::check_filter("subcategory", &SUBCATEGORY_GET, filter)?;
        Ok(self.store.list_subcategories(filter, page).await?)
    }

    pub async fn get_by(&self, filter: &Filter) -> Result<Option<Subcategory>, PipelineError> {
        pipeline::check_filter("subcategory", &SUBCATEGORY_GET, filter)?;
        Ok(self.store.get_subcategory(filter).await?)
    }

    pub async fn create(
        &self,
        body: &Value,
        category_id: i64,
    ) -> Result<Subcategory, PipelineError> {
        pipeline::create(self, body, &[("category_id", category_id)]).await
    }

    pub async fn update(&self, id: i64, body: &Value) -> Result<Subcategory, PipelineError> {
        pipeline::update(self, id, body).await
    }
}

#[async_trait]
impl<'a, S: SubcategoryStore + ?Sized> EntityPipeline for SubcategoryManager<'a, S> {
    type Entity = Subcategory;
    type Draft = SubcategoryDraft;
    type Patch = SubcategoryPatch;

    fn entity(&self) -> &'static str {
        "subcategory"
    }

    fn create_schema(&self) -> &'static ObjectSchema {
        &SUBCATEGORY_CREATE
    }

    fn update_schema(&self) -> &'static ObjectSchema {
        &SUBCATEGORY_UPDATE
    }

    async fn name_taken(&self, name: &str) -> Result<bool, PipelineError> {
        Ok(self
            .store
            .get_subcategory(&Filter::by_name(name))
            .await?
            .is_some())
    }

    async fn exists(&self, id: i64) -> Result<bool, PipelineError> {
        Ok(self
            .store
            .get_subcategory(&Filter::by_id(id))
            .await?
            .is_some())
    }

    async fn persist_insert(&self, draft: SubcategoryDraft) -> Result<Subcategory, PipelineError> {
        Ok(self.store.insert_subcategory(&draft).await?)
    }

    async fn persist_update(
        &self,
        id: i64,
        patch: SubcategoryPatch,
    ) -> Result<Option<Subcategory>, PipelineError> {
        Ok(self.store.update_subcategory(id, &patch).await?)
    }
}
