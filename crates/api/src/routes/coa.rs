//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use lodgera_core::coa::AccountType;
use lodgera_db::repositories::{
    AccountRepository, CreateAccountInput, UpdateAccountInput,
};
use lodgera_shared::types::{AccountId, BoardingHouseId};

use crate::AppState;
use crate::error::{coa_error, error_response};

/// Creates the chart of accounts routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/boarding-houses/{bh_id}/coa", get(get_accounts))
        .route("/boarding-houses/{bh_id}/coa", post(create_account))
        .route("/boarding-houses/{bh_id}/coa/{account_id}", get(get_account))
        .route("/boarding-houses/{bh_id}/coa/{account_id}", put(update_account))
        .route(
            "/boarding-houses/{bh_id}/coa/{account_id}",
            delete(delete_account),
        )
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account code (unique within the boarding house).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type: asset, liability, equity, revenue, expense.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Whether this is a non-postable organizational node.
    #[serde(default)]
    pub is_category: bool,
    /// Whether this is a designated cash/bank account.
    #[serde(default)]
    pub is_cash_account: bool,
    /// Parent account ID for hierarchical structure.
    pub parent_id: Option<Uuid>,
}

/// Request body for updating an account.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// Account code.
    pub code: Option<String>,
    /// Account name.
    pub name: Option<String>,
    /// Cash/bank designation.
    pub is_cash_account: Option<bool>,
    /// Parent account ID (`null` detaches, absent leaves unchanged).
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<Uuid>>,
}

/// Distinguishes an absent field (unchanged) from an explicit `null` (detach).
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Uuid>::deserialize(deserializer).map(Some)
}

/// Query parameters for the account listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Return a flat, code-ordered list instead of the nested tree.
    #[serde(default)]
    pub flat: bool,
}

/// GET `/boarding-houses/{bh_id}/coa` - Nested account tree ordered by code,
/// or a flat list with `?flat=true`.
async fn get_accounts(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());
    let boarding_house_id = BoardingHouseId::from_uuid(bh_id);

    if query.flat {
        return match repo.list_accounts(boarding_house_id).await {
            Ok(accounts) => {
                (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response()
            }
            Err(e) => {
                error!(error = %e, "Failed to list accounts");
                error_response(&coa_error(e))
            }
        };
    }

    match repo.get_tree(boarding_house_id).await {
        Ok(tree) => (StatusCode::OK, Json(json!({ "accounts": tree }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load account tree");
            error_response(&coa_error(e))
        }
    }
}

/// GET `/boarding-houses/{bh_id}/coa/{account_id}` - Fetch a single account.
async fn get_account(
    State(state): State<AppState>,
    Path((bh_id, account_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo
        .find_account(
            BoardingHouseId::from_uuid(bh_id),
            AccountId::from_uuid(account_id),
        )
        .await
    {
        Ok(account) => (StatusCode::OK, Json(account.to_domain())).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to fetch account");
            error_response(&coa_error(e))
        }
    }
}

/// POST `/boarding-houses/{bh_id}/coa` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    let input = CreateAccountInput {
        boarding_house_id: BoardingHouseId::from_uuid(bh_id),
        code: payload.code,
        name: payload.name,
        account_type: payload.account_type,
        is_category: payload.is_category,
        is_cash_account: payload.is_cash_account,
        parent_id: payload.parent_id.map(AccountId::from_uuid),
    };

    match repo.create_account(input).await {
        Ok(account) => {
            info!(
                boarding_house_id = %bh_id,
                account_id = %account.id,
                code = %account.code,
                "Account created"
            );
            (StatusCode::CREATED, Json(account.to_domain())).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create account");
            error_response(&coa_error(e))
        }
    }
}

/// PUT `/boarding-houses/{bh_id}/coa/{account_id}` - Update an account.
async fn update_account(
    State(state): State<AppState>,
    Path((bh_id, account_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    let input = UpdateAccountInput {
        code: payload.code,
        name: payload.name,
        is_cash_account: payload.is_cash_account,
        parent_id: payload
            .parent_id
            .map(|inner| inner.map(AccountId::from_uuid)),
    };

    match repo
        .update_account(
            BoardingHouseId::from_uuid(bh_id),
            AccountId::from_uuid(account_id),
            input,
        )
        .await
    {
        Ok(account) => (StatusCode::OK, Json(account.to_domain())).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to update account");
            error_response(&coa_error(e))
        }
    }
}

/// DELETE `/boarding-houses/{bh_id}/coa/{account_id}` - Soft-delete an
/// account.
async fn delete_account(
    State(state): State<AppState>,
    Path((bh_id, account_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo
        .delete_account(
            BoardingHouseId::from_uuid(bh_id),
            AccountId::from_uuid(account_id),
        )
        .await
    {
        Ok(()) => {
            info!(account_id = %account_id, "Account soft-deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete account");
            error_response(&coa_error(e))
        }
    }
}
