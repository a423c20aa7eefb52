use anyhow::{bail, Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::model::category::{Category, CategoryDraft, CategoryPatch};
use crate::model::item::{Item, ItemDraft, ItemPatch};
use crate::model::subcategory::{Subcategory, SubcategoryDraft, SubcategoryPatch};
use crate::model::{Filter, Page};
use crate::store::traits::{CategoryStore, ItemStore, SubcategoryStore};

const CATEGORY_COLUMNS: &[&str] = &[
    "id",
    "name",
    "image",
    "description",
    "taxable",
    "tax",
    "created_at",
    "updated_at",
];

const SUBCATEGORY_COLUMNS: &[&str] = &[
    "id",
    "category_id",
    "name",
    "image",
    "description",
    "taxable",
    "tax",
    "created_at",
    "updated_at",
];

const ITEM_COLUMNS: &[&str] = &[
    "id",
    "subcategory_id",
    "category_id",
    "name",
    "image",
    "description",
    "taxable",
    "tax",
    "base_amount",
    "discount",
    "total_amount",
    "created_at",
    "updated_at",
];

/// sqlx-backed adapter over a bounded connection pool. Pool exhaustion and
/// connectivity faults surface as errors, never as empty results.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run the embedded database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Append `WHERE column = $n AND ...` for an exact-match filter. Column names
/// are checked against the table's column list; values are always bound.
fn push_filter(
    builder: &mut QueryBuilder<'_, Postgres>,
    columns: &[&str],
    filter: &Filter,
) -> Result<()> {
    if filter.is_empty() {
        return Ok(());
    }

    builder.push(" WHERE ");
    let mut clause = builder.separated(" AND ");
    for (column, value) in filter.iter() {
        if !columns.contains(&column.as_str()) {
            bail!("unknown filter column {column:?}");
        }
        clause.push(format!("{column} = "));
        match value {
            serde_json::Value::Bool(flag) => {
                clause.push_bind_unseparated(*flag);
            }
            serde_json::Value::String(text) => {
                clause.push_bind_unseparated(text.clone());
            }
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(int) => {
                    clause.push_bind_unseparated(int);
                }
                None => bail!("non-integer numeric filter on {column:?}"),
            },
            other => bail!("unsupported filter value for {column:?}: {other}"),
        }
    }
    Ok(())
}

/// Build a `%needle%` containment pattern with `\`, `%`, and `_` escaped so
/// the needle matches literally. Pair with `ESCAPE '\'`.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn push_page(builder: &mut QueryBuilder<'_, Postgres>, page: Page) {
    builder.push(" ORDER BY id LIMIT ");
    builder.push_bind(page.limit);
    builder.push(" OFFSET ");
    builder.push_bind(page.offset);
}

#[async_trait::async_trait]
impl CategoryStore for PostgresStore {
    async fn get_category(&self, filter: &Filter) -> Result<Option<Category>> {
        let mut builder = QueryBuilder::new("SELECT * FROM category");
        push_filter(&mut builder, CATEGORY_COLUMNS, filter)?;
        builder
            .build_query_as::<Category>()
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch category")
    }

    async fn list_categories(&self, filter: &Filter, page: Page) -> Result<Vec<Category>> {
        let mut builder = QueryBuilder::new("SELECT * FROM category");
        push_filter(&mut builder, CATEGORY_COLUMNS, filter)?;
        push_page(&mut builder, page);
        builder
            .build_query_as::<Category>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to list categories")
    }

    async fn insert_category(&self, draft: &CategoryDraft) -> Result<Category> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO category (name, image, description, taxable, tax) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&draft.name)
        .bind(&draft.image)
        .bind(&draft.description)
        .bind(draft.taxable.unwrap_or(true))
        .bind(draft.tax.unwrap_or_default())
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert category")
    }

    async fn update_category(&self, id: i64, patch: &CategoryPatch) -> Result<Option<Category>> {
        if patch.is_empty() {
            return self.get_category(&Filter::by_id(id)).await;
        }

        let mut builder = QueryBuilder::new("UPDATE category SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(name) = &patch.name {
                set.push("name = ");
                set.push_bind_unseparated(name.clone());
            }
            if let Some(image) = &patch.image {
                set.push("image = ");
                set.push_bind_unseparated(image.clone());
            }
            if let Some(description) = &patch.description {
                set.push("description = ");
                set.push_bind_unseparated(description.clone());
            }
            if let Some(taxable) = patch.taxable {
                set.push("taxable = ");
                set.push_bind_unseparated(taxable);
            }
            if let Some(tax) = patch.tax {
                set.push("tax = ");
                set.push_bind_unseparated(tax);
            }
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING *");

        builder
            .build_query_as::<Category>()
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update category")
    }
}

#[async_trait::async_trait]
impl SubcategoryStore for PostgresStore {
    async fn get_subcategory(&self, filter: &Filter) -> Result<Option<Subcategory>> {
        let mut builder = QueryBuilder::new("SELECT * FROM subcategory");
        push_filter(&mut builder, SUBCATEGORY_COLUMNS, filter)?;
        builder
            .build_query_as::<Subcategory>()
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch subcategory")
    }

    async fn list_subcategories(&self, filter: &Filter, page: Page) -> Result<Vec<Subcategory>> {
        let mut builder = QueryBuilder::new("SELECT * FROM subcategory");
        push_filter(&mut builder, SUBCATEGORY_COLUMNS, filter)?;
        push_page(&mut builder, page);
        builder
            .build_query_as::<Subcategory>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to list subcategories")
    }

    async fn insert_subcategory(&self, draft: &SubcategoryDraft) -> Result<Subcategory> {
        sqlx::query_as::<_, Subcategory>(
            "INSERT INTO subcategory (category_id, name, image, description, taxable, tax) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(draft.category_id)
        .bind(&draft.name)
        .bind(&draft.image)
        .bind(&draft.description)
        .bind(draft.taxable.unwrap_or(true))
        .bind(draft.tax.unwrap_or_default())
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert subcategory")
    }

    async fn update_subcategory(
        &self,
        id: i64,
        patch: &SubcategoryPatch,
    ) -> Result<Option<Subcategory>> {
        // Subcategory patches always touch updated_at, even when empty.
        let mut builder = QueryBuilder::new("UPDATE subcategory SET updated_at = NOW()");
        if let Some(name) = &patch.name {
            builder.push(", name = ");
            builder.push_bind(name.clone());
        }
        if let Some(image) = &patch.image {
            builder.push(", image = ");
            builder.push_bind(image.clone());
        }
        if let Some(description) = &patch.description {
            builder.push(", description = ");
            builder.push_bind(description.clone());
        }
        if let Some(taxable) = patch.taxable {
            builder.push(", taxable = ");
            builder.push_bind(taxable);
        }
        if let Some(tax) = patch.tax {
            builder.push(", tax = ");
            builder.push_bind(tax);
        }
        if let Some(category_id) = patch.category_id {
            builder.push(", category_id = ");
            builder.push_bind(category_id);
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING *");

        builder
            .build_query_as::<Subcategory>()
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update subcategory")
    }
}

#[async_trait::async_trait]
impl ItemStore for PostgresStore {
    async fn get_item(&self, filter: &Filter) -> Result<Option<Item>> {
        let mut builder = QueryBuilder::new("SELECT * FROM items");
        push_filter(&mut builder, ITEM_COLUMNS, filter)?;
        builder
            .build_query_as::<Item>()
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch item")
    }

    async fn list_items(
        &self,
        filter: &Filter,
        page: Page,
        name_contains: Option<&str>,
    ) -> Result<Vec<Item>> {
        let mut builder = QueryBuilder::new("SELECT * FROM items");
        match name_contains {
            Some(needle) => {
                builder.push(" WHERE name LIKE ");
                builder.push_bind(like_pattern(needle));
                builder.push(" ESCAPE '\\'");
            }
            None => push_filter(&mut builder, ITEM_COLUMNS, filter)?,
        }
        push_page(&mut builder, page);
        builder
            .build_query_as::<Item>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to list items")
    }

    async fn insert_item(&self, draft: &ItemDraft) -> Result<Item> {
        sqlx::query_as::<_, Item>(
            "INSERT INTO items (subcategory_id, category_id, name, image, description, \
             taxable, tax, base_amount, discount, total_amount) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(draft.subcategory_id)
        .bind(draft.category_id)
        .bind(&draft.name)
        .bind(&draft.image)
        .bind(&draft.description)
        .bind(draft.taxable)
        .bind(draft.tax)
        .bind(draft.base_amount)
        .bind(draft.discount)
        .bind(draft.total_amount)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert item")
    }

    async fn update_item(&self, id: i64, patch: &ItemPatch) -> Result<Option<Item>> {
        let mut builder = QueryBuilder::new("UPDATE items SET ");
        {
            let mut set = builder.separated(", ");
            set.push("base_amount = ");
            set.push_bind_unseparated(patch.base_amount);
            set.push("discount = ");
            set.push_bind_unseparated(patch.discount);
            if let Some(total_amount) = patch.total_amount {
                set.push("total_amount = ");
                set.push_bind_unseparated(total_amount);
            }
            if let Some(name) = &patch.name {
                set.push("name = ");
                set.push_bind_unseparated(name.clone());
            }
            if let Some(image) = &patch.image {
                set.push("image = ");
                set.push_bind_unseparated(image.clone());
            }
            if let Some(description) = &patch.description {
                set.push("description = ");
                set.push_bind_unseparated(description.clone());
            }
            if let Some(taxable) = patch.taxable {
                set.push("taxable = ");
                set.push_bind_unseparated(taxable);
            }
            if let Some(tax) = patch.tax {
                set.push("tax = ");
                set.push_bind_unseparated(tax);
            }
        }
        builder.push(", updated_at = NOW() WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING *");

        builder
            .build_query_as::<Item>()
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update item")
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards_in_the_needle() {
        assert_eq!(like_pattern("Mar"), "%Mar%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }
}
