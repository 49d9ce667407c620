use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::{CreateProduct, Product, UpdateProduct},
    AppState,
};

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = state.store.list().await;
    info!(count = products.len(), "Listed products");
    Ok(Json(products))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let name = payload.name.unwrap_or_default();
    let price = payload.price.unwrap_or(0.0);

    // Empty name and zero price count as missing, matching the falsy
    // presence check the API has always had.
    if name.trim().is_empty() || price == 0.0 {
        return Err(AppError::BadRequest(
            "name and price are required".to_string(),
        ));
    }
    // NaN and infinity survive the comparisons above but serialize as JSON
    // null, which would make the persisted catalog unreadable.
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::BadRequest(
            "price must be a finite, non-negative number".to_string(),
        ));
    }

    // An empty image string on create means "no image".
    let image = payload.image_base64.filter(|s| !s.is_empty());

    let product = state.store.create(name, price, image).await?;
    info!(id = product.id, name = %product.name, "Created product");

    Ok((StatusCode::CREATED, Json(product)))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateProduct>,
) -> AppResult<Json<Product>> {
    if payload.price.is_some_and(|p| !p.is_finite() || p < 0.0) {
        return Err(AppError::BadRequest(
            "price must be a finite, non-negative number".to_string(),
        ));
    }

    let product = state.store.update(id, &payload).await?;
    info!(id, "Updated product");

    Ok(Json(product))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<StatusCode> {
    state.store.delete(id).await?;
    info!(id, "Deleted product");

    Ok(StatusCode::NO_CONTENT)
}
