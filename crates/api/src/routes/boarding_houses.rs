//! Boarding house provisioning routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use lodgera_db::repositories::{BoardingHouseRepository, CreateBoardingHouseInput};
use lodgera_shared::types::BoardingHouseId;

use crate::AppState;
use crate::error::{boarding_house_error, error_response};

/// Creates the boarding house routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/boarding-houses", post(create_boarding_house).get(list_boarding_houses))
        .route("/boarding-houses/{bh_id}", get(get_boarding_house))
}

/// Request body for creating a boarding house.
#[derive(Debug, Deserialize)]
pub struct CreateBoardingHouseRequest {
    /// Display name.
    pub name: String,
    /// Postal address.
    pub address: Option<String>,
}

/// POST `/boarding-houses` - Provision a boarding house.
async fn create_boarding_house(
    State(state): State<AppState>,
    Json(payload): Json<CreateBoardingHouseRequest>,
) -> impl IntoResponse {
    let repo = BoardingHouseRepository::new((*state.db).clone());

    let input = CreateBoardingHouseInput {
        name: payload.name,
        address: payload.address,
    };

    match repo.create(input).await {
        Ok(model) => {
            info!(boarding_house_id = %model.id, "Boarding house created");
            (StatusCode::CREATED, Json(json!({ "data": model }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create boarding house");
            error_response(&boarding_house_error(e))
        }
    }
}

/// GET `/boarding-houses` - List boarding houses.
async fn list_boarding_houses(State(state): State<AppState>) -> impl IntoResponse {
    let repo = BoardingHouseRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(models) => (StatusCode::OK, Json(json!({ "data": models }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list boarding houses");
            error_response(&boarding_house_error(e))
        }
    }
}

/// GET `/boarding-houses/{bh_id}` - Fetch one boarding house.
async fn get_boarding_house(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = BoardingHouseRepository::new((*state.db).clone());

    match repo.find(BoardingHouseId::from_uuid(bh_id)).await {
        Ok(model) => (StatusCode::OK, Json(json!({ "data": model }))).into_response(),
        Err(e) => {
            error!(error = %e, boarding_house_id = %bh_id, "Failed to load boarding house");
            error_response(&boarding_house_error(e))
        }
    }
}
