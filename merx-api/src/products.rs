use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use merx_catalog::NewProduct;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price_cents: i64,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub quantity: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let input = NewProduct {
        name: req.name,
        price_cents: req.price_cents,
        quantity: req.quantity,
    };
    input
        .validate()
        .map_err(|err| AppError::ValidationError(err.to_string()))?;

    if state.product_repo.find_by_name(&input.name).await?.is_some() {
        return Err(AppError::ConflictError(
            "There is already a product with this name".to_string(),
        ));
    }

    let product = state.product_repo.create_product(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            id: product.id,
            name: product.name,
            price_cents: product.price_cents,
            quantity: product.quantity,
            created_at: product.created_at,
        }),
    ))
}
