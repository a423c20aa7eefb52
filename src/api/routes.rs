use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Categories
        .route(
            "/categories",
            get(handlers::list_categories::<S>).post(handlers::create_category::<S>),
        )
        .route(
            "/categories/:id",
            get(handlers::get_category::<S>).put(handlers::update_category::<S>),
        )
        // Nested creation routes; the path id becomes the foreign key
        .route(
            "/categories/:id/subcategories",
            post(handlers::create_subcategory::<S>),
        )
        .route(
            "/categories/:id/items",
            post(handlers::create_item_in_category::<S>),
        )
        // Subcategories
        .route("/subcategories", get(handlers::list_subcategories::<S>))
        .route(
            "/subcategories/:id",
            get(handlers::get_subcategory::<S>).put(handlers::update_subcategory::<S>),
        )
        .route(
            "/subcategories/:id/items",
            post(handlers::create_item_in_subcategory::<S>),
        )
        // Items
        .route("/items", get(handlers::list_items::<S>))
        .route(
            "/items/:id",
            get(handlers::get_item::<S>).put(handlers::update_item::<S>),
        )
        .layer(CorsLayer::permissive())
}
