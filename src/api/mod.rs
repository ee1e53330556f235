pub mod auth;
mod coupons;
pub mod error;
mod forms;
mod products;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/check", get(auth::check));

    let public_routes = Router::new()
        .route("/products", get(products::list_products))
        .route("/products/:id", get(products::get_product))
        .route("/validate-coupon", post(coupons::validate_coupon));

    // Every handler here takes the AdminUser extractor, which rejects
    // missing, unknown, and expired sessions before the store is touched.
    let admin_routes = Router::new()
        .route("/products", post(products::create_product))
        .route("/products/:id", put(products::update_product))
        .route("/products/:id", delete(products::delete_product))
        .route("/coupons", get(coupons::list_coupons))
        .route("/coupons", post(coupons::create_coupon))
        .route("/coupons/:id", put(coupons::update_coupon))
        .route("/coupons/:id", delete(coupons::delete_coupon))
        // multipart bodies carry up to a 5 MiB image plus text fields;
        // the per-file cap is enforced in the upload path itself
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api", public_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
