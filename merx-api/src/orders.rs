use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use merx_order::{Order, OrderLineRequest};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub products: Vec<OrderLineBody>,
}

#[derive(Debug, Deserialize)]
pub struct OrderLineBody {
    pub id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub items: Vec<OrderItemResponse>,
    pub total_cents: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price_cents: i64,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let total_cents = order.total_cents();
        Self {
            id: order.id,
            customer_id: order.customer.id,
            customer_name: order.customer.name,
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price_cents: item.price_cents,
                })
                .collect(),
            total_cents,
            created_at: order.created_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /orders
/// Place an order for a customer
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    if req.products.iter().any(|line| line.quantity <= 0) {
        return Err(AppError::ValidationError(
            "quantity must be positive".to_string(),
        ));
    }

    let lines: Vec<OrderLineRequest> = req
        .products
        .iter()
        .map(|line| OrderLineRequest {
            product_id: line.id,
            quantity: line.quantity,
        })
        .collect();

    let order = state.order_service.execute(req.customer_id, &lines).await?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders/{id}
/// Retrieve order details
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .order_repo
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Order not found".to_string()))?;

    Ok(Json(order.into()))
}
