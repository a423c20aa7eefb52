//! In-memory store used by the test suite and demos. Implements the same
//! traits as [`PostgresStore`](super::postgres::PostgresStore) with the same
//! defaulting, ordering, and windowing semantics.

use anyhow::Result;
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::category::{Category, CategoryDraft, CategoryPatch};
use crate::model::item::{Item, ItemDraft, ItemPatch};
use crate::model::subcategory::{Subcategory, SubcategoryDraft, SubcategoryPatch};
use crate::model::{Filter, Page};
use crate::store::traits::{CategoryStore, ItemStore, SubcategoryStore};

#[derive(Debug, Default)]
struct Inner {
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
    items: Vec<Item>,
    next_category_id: i64,
    next_subcategory_id: i64,
    next_item_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page_window<T: Clone>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    rows.skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

// NUMERIC(8,2) columns round half away from zero on write; mirror that here.
fn money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn category_matches(category: &Category, filter: &Filter) -> bool {
    filter.iter().all(|(column, value)| match column.as_str() {
        "id" => value.as_i64() == Some(category.id),
        "name" => value.as_str() == Some(category.name.as_str()),
        "image" => value.as_str() == Some(category.image.as_str()),
        "description" => value.as_str() == Some(category.description.as_str()),
        "taxable" => value.as_bool() == Some(category.taxable),
        _ => false,
    })
}

fn subcategory_matches(subcategory: &Subcategory, filter: &Filter) -> bool {
    filter.iter().all(|(column, value)| match column.as_str() {
        "id" => value.as_i64() == Some(subcategory.id),
        "category_id" => value.as_i64() == subcategory.category_id,
        "name" => value.as_str() == Some(subcategory.name.as_str()),
        "image" => value.as_str() == Some(subcategory.image.as_str()),
        "description" => value.as_str() == Some(subcategory.description.as_str()),
        "taxable" => value.as_bool() == Some(subcategory.taxable),
        _ => false,
    })
}

fn item_matches(item: &Item, filter: &Filter) -> bool {
    filter.iter().all(|(column, value)| match column.as_str() {
        "id" => value.as_i64() == Some(item.id),
        "subcategory_id" => value.as_i64() == item.subcategory_id,
        "category_id" => value.as_i64() == item.category_id,
        "name" => value.as_str() == Some(item.name.as_str()),
        "image" => value.as_str() == Some(item.image.as_str()),
        "description" => value.as_str() == Some(item.description.as_str()),
        "taxable" => value.as_bool() == Some(item.taxable),
        _ => false,
    })
}

#[async_trait::async_trait]
impl CategoryStore for MemoryStore {
    async fn get_category(&self, filter: &Filter) -> Result<Option<Category>> {
        let inner = self.inner.read();
        Ok(inner
            .categories
            .iter()
            .find(|category| category_matches(category, filter))
            .cloned())
    }

    async fn list_categories(&self, filter: &Filter, page: Page) -> Result<Vec<Category>> {
        let inner = self.inner.read();
        Ok(page_window(
            inner
                .categories
                .iter()
                .filter(|category| category_matches(category, filter))
                .cloned(),
            page,
        ))
    }

    async fn insert_category(&self, draft: &CategoryDraft) -> Result<Category> {
        let mut inner = self.inner.write();
        inner.next_category_id += 1;
        let now = Utc::now();
        let category = Category {
            id: inner.next_category_id,
            name: draft.name.clone(),
            image: draft.image.clone(),
            description: draft.description.clone(),
            taxable: draft.taxable.unwrap_or(true),
            tax: money(draft.tax.unwrap_or_default()),
            created_at: now,
            updated_at: now,
        };
        inner.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: i64, patch: &CategoryPatch) -> Result<Option<Category>> {
        let mut inner = self.inner.write();
        let Some(category) = inner.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            category.name = name.clone();
        }
        if let Some(image) = &patch.image {
            category.image = image.clone();
        }
        if let Some(description) = &patch.description {
            category.description = description.clone();
        }
        if let Some(taxable) = patch.taxable {
            category.taxable = taxable;
        }
        if let Some(tax) = patch.tax {
            category.tax = money(tax);
        }
        Ok(Some(category.clone()))
    }
}

#[async_trait::async_trait]
impl SubcategoryStore for MemoryStore {
    async fn get_subcategory(&self, filter: &Filter) -> Result<Option<Subcategory>> {
        let inner = self.inner.read();
        Ok(inner
            .subcategories
            .iter()
            .find(|subcategory| subcategory_matches(subcategory, filter))
            .cloned())
    }

    async fn list_subcategories(&self, filter: &Filter, page: Page) -> Result<Vec<Subcategory>> {
        let inner = self.inner.read();
        Ok(page_window(
            inner
                .subcategories
                .iter()
                .filter(|subcategory| subcategory_matches(subcategory, filter))
                .cloned(),
            page,
        ))
    }

    async fn insert_subcategory(&self, draft: &SubcategoryDraft) -> Result<Subcategory> {
        let mut inner = self.inner.write();
        inner.next_subcategory_id += 1;
        let now = Utc::now();
        let subcategory = Subcategory {
            id: inner.next_subcategory_id,
            category_id: draft.category_id,
            name: draft.name.clone(),
            image: draft.image.clone(),
            description: draft.description.clone(),
            taxable: draft.taxable.unwrap_or(true),
            tax: money(draft.tax.unwrap_or_default()),
            created_at: now,
            updated_at: now,
        };
        inner.subcategories.push(subcategory.clone());
        Ok(subcategory)
    }

    async fn update_subcategory(
        &self,
        id: i64,
        patch: &SubcategoryPatch,
    ) -> Result<Option<Subcategory>> {
        let mut inner = self.inner.write();
        let Some(subcategory) = inner.subcategories.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            subcategory.name = name.clone();
        }
        if let Some(image) = &patch.image {
            subcategory.image = image.clone();
        }
        if let Some(description) = &patch.description {
            subcategory.description = description.clone();
        }
        if let Some(taxable) = patch.taxable {
            subcategory.taxable = taxable;
        }
        if let Some(tax) = patch.tax {
            subcategory.tax = money(tax);
        }
        if let Some(category_id) = patch.category_id {
            subcategory.category_id = Some(category_id);
        }
        subcategory.updated_at = Utc::now();
        Ok(Some(subcategory.clone()))
    }
}

#[async_trait::async_trait]
impl ItemStore for MemoryStore {
    async fn get_item(&self, filter: &Filter) -> Result<Option<Item>> {
        let inner = self.inner.read();
        Ok(inner
            .items
            .iter()
            .find(|item| item_matches(item, filter))
            .cloned())
    }

    async fn list_items(
        &self,
        filter: &Filter,
        page: Page,
        name_contains: Option<&str>,
    ) -> Result<Vec<Item>> {
        let inner = self.inner.read();
        let rows: Vec<Item> = match name_contains {
            Some(needle) => inner
                .items
                .iter()
                .filter(|item| item.name.contains(needle))
                .cloned()
                .collect(),
            None => inner
                .items
                .iter()
                .filter(|item| item_matches(item, filter))
                .cloned()
                .collect(),
        };
        Ok(page_window(rows.into_iter(), page))
    }

    async fn insert_item(&self, draft: &ItemDraft) -> Result<Item> {
        let mut inner = self.inner.write();
        inner.next_item_id += 1;
        let now = Utc::now();
        let item = Item {
            id: inner.next_item_id,
            subcategory_id: draft.subcategory_id,
            category_id: draft.category_id,
            name: draft.name.clone(),
            image: draft.image.clone(),
            description: draft.description.clone(),
            taxable: draft.taxable,
            tax: money(draft.tax),
            base_amount: money(draft.base_amount),
            discount: money(draft.discount),
            total_amount: draft.total_amount.map(money),
            created_at: now,
            updated_at: now,
        };
        inner.items.push(item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: i64, patch: &ItemPatch) -> Result<Option<Item>> {
        let mut inner = self.inner.write();
        let Some(item) = inner.items.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        item.base_amount = money(patch.base_amount);
        item.discount = money(patch.discount);
        if let Some(total_amount) = patch.total_amount {
            item.total_amount = Some(money(total_amount));
        }
        if let Some(name) = &patch.name {
            item.name = name.clone();
        }
        if let Some(image) = &patch.image {
            item.image = image.clone();
        }
        if let Some(description) = &patch.description {
            item.description = description.clone();
        }
        if let Some(taxable) = patch.taxable {
            item.taxable = taxable;
        }
        if let Some(tax) = patch.tax {
            item.tax = money(tax);
        }
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::money;
    use rust_decimal::Decimal;

    #[test]
    fn money_rounds_midpoints_away_from_zero() {
        // Matches NUMERIC(8,2) write behavior, not nearest-even.
        assert_eq!(money(Decimal::new(2125, 3)), Decimal::new(213, 2));
        assert_eq!(money(Decimal::new(-2125, 3)), Decimal::new(-213, 2));
        assert_eq!(money(Decimal::new(2135, 3)), Decimal::new(214, 2));
    }
}
