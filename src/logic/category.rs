use async_trait::async_trait;
use serde_json::Value;

use crate::logic::error::PipelineError;
use crate::logic::pipeline::{self, EntityPipeline};
use crate::model::category::{
    Category, CategoryDraft, CategoryPatch, CATEGORY_CREATE, CATEGORY_GET, CATEGORY_UPDATE,
};
use crate::model::schema::ObjectSchema;
use crate::model::{Filter, Page};
use crate::store::traits::CategoryStore;

/// Entity manager for categories: validation, duplicate-name rejection, and
/// persistence over a [`CategoryStore`].
pub struct CategoryManager<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: CategoryStore + ?Sized> CategoryManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &Filter, page: Page) -> Result<Vec<Category>, PipelineError> {
        pipeline::check_filter("category", &CATEGORY_GET, filter)?;
        Ok(self.store.list_categories(filter, page).await?)
    }

    pub async fn get_by(&self, filter: &Filter) -> Result<Option<Category>, PipelineError> {
        pipeline::check_filter("category", &CATEGORY_GET, filter)?;
        Ok(self.store.get_category(filter).await?)
    }

    pub async fn create(&self, body: &Value) -> Result<Category, PipelineError> {
        pipeline::create(self, body, &[]).await
    }

    pub async fn update(&self, id: i64, body: &Value) -> Result<Category, PipelineError> {
        pipeline::update(self, id, body).await
    }
}

#[async_trait]
impl<'a, S: CategoryStore + ?Sized> EntityPipeline for CategoryManager<'a, S> {
    type Entity = Category;
    type Draft = CategoryDraft;
    type Patch = CategoryPatch;

    fn entity(&self) -> &'static str {
        "category"
    }

    fn create_schema(&self) -> &'static ObjectSchema {
        &CATEGORY_CREATE
    }

    fn update_schema(&self) -> &'static ObjectSchema {
        &CATEGORY_UPDATE
    }

    async fn name_taken(&self, name: &str) -> Result<bool, PipelineError> {
        Ok(self
            .store
            .get_category(&Filter::by_name(name))
            .await?
            .is_some())
    }

    async fn exists(&self, id: i64) -> Result<bool, PipelineError> {
        Ok(self.store.get_category(&Filter::by_id(id)).await?.is_some())
    }

    async fn persist_insert(&self, draft: CategoryDraft) -> Result<Category, PipelineError> {
        Ok(self.store.insert_category(&draft).await?)
    }

    async fn persist_update(
        &self,
        id: i64,
        patch: CategoryPatch,
    ) -> Result<Option<Category>, PipelineError> {
        Ok(self.store.update_category(id, &patch).await?)
    }
}
