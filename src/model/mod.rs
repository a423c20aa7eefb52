pub mod category;
pub mod item;
pub mod schema;
pub mod subcategory;

pub use category::{Category, CategoryDraft, CategoryPatch};
pub use item::{Item, ItemDraft, ItemPatch};
pub use subcategory::{Subcategory, SubcategoryDraft, SubcategoryPatch};

use serde_json::Value;

use schema::FieldMap;

/// Limit/offset window over a listing. The defaults mirror the API contract:
/// ten rows from the start, with non-positive limits falling back to the
/// default window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

impl Page {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = match limit {
            Some(limit) if limit > 0 => limit,
            _ => 10,
        };
        let offset = offset.filter(|offset| *offset >= 0).unwrap_or(0);
        Self { limit, offset }
    }
}

/// Exact-match filter map over entity columns. An empty filter matches all
/// rows. Columns are validated against the entity's GET schema before the
/// store ever sees them.
#[derive(Debug, Clone, Default)]
pub struct Filter(FieldMap);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: i64) -> Self {
        Self::new().with("id", Value::from(id))
    }

    pub fn by_name(name: &str) -> Self {
        Self::new().with("name", Value::from(name))
    }

    pub fn with(mut self, column: &str, value: Value) -> Self {
        self.0.insert(column.to_owned(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_apply_to_missing_and_invalid_values() {
        assert_eq!(Page::new(None, None), Page::default());
        assert_eq!(Page::new(Some(0), Some(-3)), Page::default());
        assert_eq!(
            Page::new(Some(25), Some(5)),
            Page {
                limit: 25,
                offset: 5
            }
        );
    }

    #[test]
    fn filter_builders_populate_columns() {
        let filter = Filter::by_id(7);
        assert!(!filter.is_empty());
        let (column, value) = filter.iter().next().unwrap();
        assert_eq!(column, "id");
        assert_eq!(value.as_i64(), Some(7));
    }
}
