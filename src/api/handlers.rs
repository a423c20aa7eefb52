use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::logic::category::CategoryManager;
use crate::logic::error::PipelineError;
use crate::logic::item::ItemManager;
use crate::logic::subcategory::SubcategoryManager;
use crate::model::schema::Violation;
use crate::model::{Category, Filter, Item, Page, Subcategory};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ItemListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Violation>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            PipelineError::Validation { violations, .. } => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: message,
                    details: violations,
                }),
            )
                .into_response(),
            PipelineError::AlreadyExists { .. } => {
                (StatusCode::CONFLICT, Json(ErrorResponse::new(message))).into_response()
            }
            PipelineError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse::new(message))).into_response()
            }
            PipelineError::Store(err) => {
                log::error!("store failure: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("internal error")),
                )
                    .into_response()
            }
        }
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}

// --- categories ---

pub async fn list_categories<S: Store>(
    State(store): State<AppState<S>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Category>>, PipelineError> {
    let page = Page::new(query.limit, query.offset);
    let categories = CategoryManager::new(store.as_ref())
        .list(&Filter::default(), page)
        .await?;
    Ok(Json(categories))
}

pub async fn get_category<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<Category>, PipelineError> {
    let category = CategoryManager::new(store.as_ref())
        .get_by(&Filter::by_id(id))
        .await?
        .ok_or(PipelineError::NotFound {
            entity: "category",
            id,
        })?;
    Ok(Json(category))
}

pub async fn create_category<S: Store>(
    State(store): State<AppState<S>>,
    Json(body): Json<Value>,
) -> Result<Json<Category>, PipelineError> {
    let category = CategoryManager::new(store.as_ref()).create(&body).await?;
    Ok(Json(category))
}

pub async fn update_category<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Category>, PipelineError> {
    let category = CategoryManager::new(store.as_ref())
        .update(id, &body)
        .await?;
    Ok(Json(category))
}

// --- subcategories ---

pub async fn list_subcategories<S: Store>(
    State(store): State<AppState<S>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Subcategory>>, PipelineError> {
    let page = Page::new(query.limit, query.offset);
    let subcategories = SubcategoryManager::new(store.as_ref())
        .list(&Filter::default(), page)
        .await?;
    Ok(Json(subcategories))
}

pub async fn get_subcategory<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<Subcategory>, PipelineError> {
    let subcategory = SubcategoryManager::new(store.as_ref())
        .get_by(&Filter::by_id(id))
        .await?
        .ok_or(PipelineError::NotFound {
            entity: "subcategory",
            id,
        })?;
    Ok(Json(subcategory))
}

pub async fn create_subcategory<S: Store>(
    State(store): State<AppState<S>>,
    Path(category_id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Subcategory>, PipelineError> {
    let subcategory = SubcategoryManager::new(store.as_ref())
        .create(&body, category_id)
        .await?;
    Ok(Json(subcategory))
}

pub async fn update_subcategory<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Subcategory>, PipelineError> {
    let subcategory = SubcategoryManager::new(store.as_ref())
        .update(id, &body)
        .await?;
    Ok(Json(subcategory))
}

// --- items ---

pub async fn list_items<S: Store>(
    State(store): State<AppState<S>>,
    Query(query): Query<ItemListQuery>,
) -> Result<Json<Vec<Item>>, PipelineError> {
    let page = Page::new(query.limit, query.offset);
    let items = ItemManager::new(store.as_ref())
        .list(&Filter::default(), page, query.q.as_deref())
        .await?;
    Ok(Json(items))
}

pub async fn get_item<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<Item>, PipelineError> {
    let item = ItemManager::new(store.as_ref())
        .get_by(&Filter::by_id(id))
        .await?
        .ok_or(PipelineError::NotFound { entity: "item", id })?;
    Ok(Json(item))
}

pub async fn create_item_in_category<S: Store>(
    State(store): State<AppState<S>>,
    Path(category_id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Item>, PipelineError> {
    let item = ItemManager::new(store.as_ref())
        .create_under_category(&body, category_id)
        .await?;
    Ok(Json(item))
}

pub async fn create_item_in_subcategory<S: Store>(
    State(store): State<AppState<S>>,
    Path(subcategory_id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Item>, PipelineError> {
    let item = ItemManager::new(store.as_ref())
        .create_under_subcategory(&body, subcategory_id)
        .await?;
    Ok(Json(item))
}

pub async fn update_item<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Item>, PipelineError> {
    let item = ItemManager::new(store.as_ref()).update(id, &body).await?;
    Ok(Json(item))
}
