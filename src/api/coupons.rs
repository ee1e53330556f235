// Coupon CRUD API plus the public validation lookup.
//
// The admin UI posts coupon fields as strings, so discount and active go
// through the liberal coercions in `forms`. Codes are normalized to
// uppercase at write time; code uniqueness is deliberately not enforced
// and the validation lookup returns the first active match.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::auth::AdminUser;
use super::error::ApiError;
use super::forms;
use super::products::DeleteResponse;
use crate::store::{Collection, Coupon};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub code: String,
}

/// Only what the pricing computation needs; the coupon's internal id is
/// not exposed on the public endpoint.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub discount: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct CouponForm {
    pub code: String,
    #[serde(default)]
    pub discount: Value,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub active: Value,
}

/// Validate a coupon code
///
/// POST /api/validate-coupon
pub async fn validate_coupon(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let coupons: Vec<Coupon> = state.store.load(Collection::Coupons).await;
    let coupon = coupons
        .into_iter()
        .find(|c| c.code.eq_ignore_ascii_case(&request.code) && c.active)
        .ok_or_else(|| ApiError::not_found("Invalid coupon"))?;

    Ok(Json(ValidateResponse {
        valid: true,
        discount: coupon.discount,
        kind: coupon.kind,
    }))
}

/// List all coupons
///
/// GET /api/admin/coupons
pub async fn list_coupons(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Json<Vec<Coupon>> {
    let coupons: Vec<Coupon> = state.store.load(Collection::Coupons).await;
    Json(coupons)
}

/// Create a coupon
///
/// POST /api/admin/coupons
pub async fn create_coupon(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Json(form): Json<CouponForm>,
) -> Result<Json<Coupon>, ApiError> {
    let _guard = state.store.lock(Collection::Coupons).await;
    let mut coupons: Vec<Coupon> = state.store.load(Collection::Coupons).await;

    let coupon = Coupon {
        id: format!("coupon-{}", Utc::now().timestamp_millis()),
        code: form.code.to_uppercase(),
        discount: forms::coupon_discount(&form.discount),
        kind: form.kind,
        active: forms::coupon_active(&form.active),
    };

    coupons.push(coupon.clone());
    state.store.save(Collection::Coupons, &coupons).await?;

    info!(id = %coupon.id, code = %coupon.code, by = %admin.username, "Coupon created");
    Ok(Json(coupon))
}

/// Update a coupon
///
/// PUT /api/admin/coupons/:id
///
/// Keyed by the system-generated id, never by code.
pub async fn update_coupon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    admin: AdminUser,
    Json(form): Json<CouponForm>,
) -> Result<Json<Coupon>, ApiError> {
    let _guard = state.store.lock(Collection::Coupons).await;
    let mut coupons: Vec<Coupon> = state.store.load(Collection::Coupons).await;

    let index = coupons
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| ApiError::not_found("Coupon not found"))?;

    coupons[index].code = form.code.to_uppercase();
    coupons[index].discount = forms::coupon_discount(&form.discount);
    coupons[index].kind = form.kind;
    coupons[index].active = forms::coupon_active(&form.active);

    let coupon = coupons[index].clone();
    state.store.save(Collection::Coupons, &coupons).await?;

    info!(id = %coupon.id, by = %admin.username, "Coupon updated");
    Ok(Json(coupon))
}

/// Delete a coupon
///
/// DELETE /api/admin/coupons/:id
pub async fn delete_coupon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    admin: AdminUser,
) -> Result<Json<DeleteResponse>, ApiError> {
    let _guard = state.store.lock(Collection::Coupons).await;
    let coupons: Vec<Coupon> = state.store.load(Collection::Coupons).await;

    let before = coupons.len();
    let remaining: Vec<Coupon> = coupons.into_iter().filter(|c| c.id != id).collect();
    if remaining.len() == before {
        return Err(ApiError::not_found("Coupon not found"));
    }

    state.store.save(Collection::Coupons, &remaining).await?;

    info!(id = %id, by = %admin.username, "Coupon deleted");
    Ok(Json(DeleteResponse { success: true }))
}
