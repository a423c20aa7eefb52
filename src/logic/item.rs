use async_trait::async_trait;
use serde_json::Value;

use crate::logic::error::PipelineError;
use crate::logic::pipeline::{self, EntityPipeline};
use crate::model::item::{Item, ItemDraft, ItemPatch, ITEM_CREATE, ITEM_GET, ITEM_UPDATE};
use crate::model::schema::ObjectSchema;
use crate::model::{Filter, Page};
use crate::store::traits::ItemStore;

/// Entity manager for items: the richest pipeline of the three, with a
/// derived pricing field, substring search, and an existence pre-check on
/// update.
pub struct ItemManager<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: ItemStore + ?Sized> ItemManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// List items. A non-empty `q` switches to substring matching on `name`
    /// and replaces exact-match filtering; an empty `q` behaves as absent.
    pub async fn list(
        &self,
        filter: &Filter,
        page: Page,
        q: Option<&str>,
    ) -> Result<Vec<Item>, PipelineError> {
        pipeline::check_filter("item", &ITEM_GET, filter)?;
        let q = q.filter(|q| !q.is_empty());
        Ok(self.store.list_items(filter, page, q).await?)
    }

    pub async fn get_by(&self, filter: &Filter) -> Result<Option<Item>, PipelineError> {
        pipeline::check_filter("item", &ITEM_GET, filter)?;
        Ok(self.store.get_item(filter).await?)
    }

    /// Exactly one foreign key is populated, per the matched route; the
    /// opposite one is dropped even if the body supplied it.
    pub async fn create_under_category(
        &self,
        body: &Value,
        category_id: i64,
    ) -> Result<Item, PipelineError> {
        let body = without_field(body, "subcategory_id");
        pipeline::create(self, &body, &[("category_id", category_id)]).await
    }

    pub async fn create_under_subcategory(
        &self,
        body: &Value,
        subcategory_id: i64,
    ) -> Result<Item, PipelineError> {
        let body = without_field(body, "category_id");
        pipeline::create(self, &body, &[("subcategory_id", subcategory_id)]).await
    }

    pub async fn update(&self, id: i64, body: &Value) -> Result<Item, PipelineError> {
        pipeline::update(self, id, body).await
    }
}

fn without_field(body: &Value, field: &str) -> Value {
    let mut body = body.clone();
    if let Some(object) = body.as_object_mut() {
        object.remove(field);
    }
    body
}

#[async_trait]
impl<'a, S: ItemStore + ?Sized> EntityPipeline for ItemManager<'a, S> {
    type Entity = Item;
    type Draft = ItemDraft;
    type Patch = ItemPatch;

    fn entity(&self) -> &'static str {
        "item"
    }

    fn create_schema(&self) -> &'static ObjectSchema {
        &ITEM_CREATE
    }

    fn update_schema(&self) -> &'static ObjectSchema {
        &ITEM_UPDATE
    }

    // An explicitly supplied total is never overwritten.
    fn derive_draft(&self, draft: &mut ItemDraft) {
        if draft.total_amount.is_none() {
            draft.total_amount = Some(draft.base_amount - draft.discount);
        }
    }

    fn derive_patch(&self, patch: &mut ItemPatch) {
        if patch.total_amount.is_none() {
            patch.total_amount = Some(patch.base_amount - patch.discount);
        }
    }

    fn checks_existence_on_update(&self) -> bool {
        true
    }

    async fn name_taken(&self, name: &str) -> Result<bool, PipelineError> {
        Ok(self.store.get_item(&Filter::by_name(name)).await?.is_some())
    }

    async fn exists(&self, id: i64) -> Result<bool, PipelineError> {
        Ok(self.store.get_item(&Filter::by_id(id)).await?.is_some())
    }

    async fn persist_insert(&self, draft: ItemDraft) -> Result<Item, PipelineError> {
        Ok(self.store.insert_item(&draft).await?)
    }

    async fn persist_update(
        &self,
        id: i64,
        patch: ItemPatch,
    ) -> Result<Option<Item>, PipelineError> {
        Ok(self.store.update_item(id, &patch).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use rust_decimal::Decimal;

    fn manager(store: &MemoryStore) -> ItemManager<'_, MemoryStore> {
        ItemManager::new(store)
    }

    #[test]
    fn derives_total_when_absent() {
        let store = MemoryStore::new();
        let mut draft = ItemDraft {
            name: "Pasta".into(),
            image: "http://img/pasta.png".into(),
            description: "Fresh pasta".into(),
            taxable: true,
            tax: Decimal::new(250, 2),
            base_amount: Decimal::new(10000, 2),
            discount: Decimal::new(1000, 2),
            total_amount: None,
            subcategory_id: None,
            category_id: None,
        };
        manager(&store).derive_draft(&mut draft);
        assert_eq!(draft.total_amount, Some(Decimal::new(9000, 2)));
    }

    #[test]
    fn explicit_total_is_preserved() {
        let store = MemoryStore::new();
        let mut draft = ItemDraft {
            name: "Pasta".into(),
            image: "http://img/pasta.png".into(),
            description: "Fresh pasta".into(),
            taxable: true,
            tax: Decimal::ZERO,
            base_amount: Decimal::new(10000, 2),
            discount: Decimal::new(1000, 2),
            total_amount: Some(Decimal::new(5000, 2)),
            subcategory_id: None,
            category_id: None,
        };
        manager(&store).derive_draft(&mut draft);
        assert_eq!(draft.total_amount, Some(Decimal::new(5000, 2)));
    }
}
