use anyhow::Result;

use crate::model::category::{Category, CategoryDraft, CategoryPatch};
use crate::model::item::{Item, ItemDraft, ItemPatch};
use crate::model::subcategory::{Subcategory, SubcategoryDraft, SubcategoryPatch};
use crate::model::{Filter, Page};

#[async_trait::async_trait]
pub trait CategoryStore: Send + Sync {
    /// At most one row matching the filter; absence is `Ok(None)`, not an error.
    async fn get_category(&self, filter: &Filter) -> Result<Option<Category>>;
    async fn list_categories(&self, filter: &Filter, page: Page) -> Result<Vec<Category>>;
    /// Insert and return the full persisted row, store defaults applied.
    async fn insert_category(&self, draft: &CategoryDraft) -> Result<Category>;
    /// Write only the supplied fields; `None` when no row matched `id`.
    async fn update_category(&self, id: i64, patch: &CategoryPatch) -> Result<Option<Category>>;
}

#[async_trait::async_trait]
pub trait SubcategoryStore: Send + Sync {
    async fn get_subcategory(&self, filter: &Filter) -> Result<Option<Subcategory>>;
    async fn list_subcategories(&self, filter: &Filter, page: Page) -> Result<Vec<Subcategory>>;
    async fn insert_subcategory(&self, draft: &SubcategoryDraft) -> Result<Subcategory>;
    /// Always bumps `updated_at`, even for an otherwise empty patch.
    async fn update_subcategory(
        &self,
        id: i64,
        patch: &SubcategoryPatch,
    ) -> Result<Option<Subcategory>>;
}

#[async_trait::async_trait]
pub trait ItemStore: Send + Sync {
    async fn get_item(&self, filter: &Filter) -> Result<Option<Item>>;
    /// `name_contains` replaces exact-match filtering when present
    /// (`%q%` semantics).
    async fn list_items(
        &self,
        filter: &Filter,
        page: Page,
        name_contains: Option<&str>,
    ) -> Result<Vec<Item>>;
    async fn insert_item(&self, draft: &ItemDraft) -> Result<Item>;
    async fn update_item(&self, id: i64, patch: &ItemPatch) -> Result<Option<Item>>;
}

pub trait Store: CategoryStore + SubcategoryStore + ItemStore + Send + Sync {}

impl<T: CategoryStore + SubcategoryStore + ItemStore + Send + Sync> Store for T {}
