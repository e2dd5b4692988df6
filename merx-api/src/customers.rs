use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use merx_customer::NewCustomer;

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// POST /customers
pub async fn create_customer(
    State(state): State<AppState>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(AppError::ValidationError(
            "name and email are required".to_string(),
        ));
    }

    if state.customer_repo.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::ConflictError(
            "This email is already in use".to_string(),
        ));
    }

    let customer = state
        .customer_repo
        .create_customer(&NewCustomer {
            name: req.name,
            email: req.email,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CustomerResponse {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            created_at: customer.created_at,
        }),
    ))
}
