//! Bank reconciliation routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use lodgera_core::ledger::EntryType;
use lodgera_core::reconcile::ReconciliationSession;
use lodgera_db::repositories::{
    BankItemInput, CreateSessionInput, ReconciliationRepository,
};
use lodgera_shared::types::{
    AccountId, BoardingHouseId, ReconciliationId, ReconciliationItemId,
};

use crate::AppState;
use crate::error::{error_response, reconciliation_error};

/// Creates the reconciliation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/boarding-houses/{bh_id}/reconciliations",
            post(create_session).get(list_sessions),
        )
        .route(
            "/boarding-houses/{bh_id}/reconciliations/{session_id}",
            get(get_session),
        )
        .route(
            "/boarding-houses/{bh_id}/reconciliations/{session_id}/auto-match",
            post(run_auto_match),
        )
        .route(
            "/boarding-houses/{bh_id}/reconciliations/{session_id}/items",
            put(apply_manual_match),
        )
        .route(
            "/boarding-houses/{bh_id}/reconciliations/{session_id}/close",
            post(close_session),
        )
}

/// One imported bank statement line.
#[derive(Debug, Deserialize)]
pub struct BankItemRequest {
    /// Statement line date.
    pub date: NaiveDate,
    /// Positive amount.
    pub amount: Decimal,
    /// Debit or credit from the cash account's perspective.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Statement line reference.
    pub reference: Option<String>,
}

/// Request body for creating a reconciliation session.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// The cash/bank account being reconciled.
    pub account_id: Uuid,
    /// Statement date.
    pub reconciliation_date: NaiveDate,
    /// Statement-side closing balance.
    pub bank_balance: Decimal,
    /// Imported statement lines.
    #[serde(default)]
    pub bank_items: Vec<BankItemRequest>,
}

/// Request body for a manual match.
#[derive(Debug, Deserialize)]
pub struct ManualMatchRequest {
    /// Book-side item ids.
    pub book_item_ids: Vec<Uuid>,
    /// Bank-side item ids.
    pub bank_item_ids: Vec<Uuid>,
}

/// Request body for closing a session.
#[derive(Debug, Default, Deserialize)]
pub struct CloseSessionRequest {
    /// Operator notes recorded with the outcome.
    pub notes: Option<String>,
}

/// The session with its recomputed difference, never a cached one.
fn session_response(status: StatusCode, session: &ReconciliationSession) -> Response {
    (
        status,
        Json(json!({
            "data": session,
            "difference": session.difference(),
        })),
    )
        .into_response()
}

/// POST `/boarding-houses/{bh_id}/reconciliations` - Open a session against a
/// cash/bank account.
async fn create_session(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
    Json(payload): Json<CreateSessionRequest>,
) -> impl IntoResponse {
    let repo = ReconciliationRepository::new((*state.db).clone());

    let input = CreateSessionInput {
        boarding_house_id: BoardingHouseId::from_uuid(bh_id),
        account_id: AccountId::from_uuid(payload.account_id),
        reconciliation_date: payload.reconciliation_date,
        bank_balance: payload.bank_balance,
        bank_items: payload
            .bank_items
            .into_iter()
            .map(|item| BankItemInput {
                date: item.date,
                amount: item.amount,
                entry_type: item.entry_type,
                reference: item.reference,
            })
            .collect(),
    };

    match repo.create_session(input).await {
        Ok(session) => {
            info!(session_id = %session.id, "Reconciliation session created");
            session_response(StatusCode::CREATED, &session)
        }
        Err(e) => {
            error!(error = %e, "Failed to create reconciliation session");
            error_response(&reconciliation_error(e))
        }
    }
}

/// GET `/boarding-houses/{bh_id}/reconciliations` - List sessions, newest
/// first.
async fn list_sessions(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ReconciliationRepository::new((*state.db).clone());

    match repo.list_sessions(BoardingHouseId::from_uuid(bh_id)).await {
        Ok(sessions) => (StatusCode::OK, Json(json!({ "data": sessions }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list reconciliation sessions");
            error_response(&reconciliation_error(e))
        }
    }
}

/// GET `/boarding-houses/{bh_id}/reconciliations/{session_id}`
async fn get_session(
    State(state): State<AppState>,
    Path((bh_id, session_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = ReconciliationRepository::new((*state.db).clone());

    match repo
        .get_session(
            BoardingHouseId::from_uuid(bh_id),
            ReconciliationId::from_uuid(session_id),
        )
        .await
    {
        Ok(session) => session_response(StatusCode::OK, &session),
        Err(e) => {
            error!(error = %e, session_id = %session_id, "Failed to load session");
            error_response(&reconciliation_error(e))
        }
    }
}

/// POST `/boarding-houses/{bh_id}/reconciliations/{session_id}/auto-match` -
/// Match book and bank items by amount and date proximity.
async fn run_auto_match(
    State(state): State<AppState>,
    Path((bh_id, session_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = ReconciliationRepository::new((*state.db).clone());

    match repo
        .auto_match(
            BoardingHouseId::from_uuid(bh_id),
            ReconciliationId::from_uuid(session_id),
            state.match_tolerance_days,
        )
        .await
    {
        Ok((session, matches_made)) => (
            StatusCode::OK,
            Json(json!({
                "data": session,
                "difference": session.difference(),
                "matches_made": matches_made,
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, session_id = %session_id, "Auto-match failed");
            error_response(&reconciliation_error(e))
        }
    }
}

/// PUT `/boarding-houses/{bh_id}/reconciliations/{session_id}/items` - Apply
/// a manual match across the named items.
async fn apply_manual_match(
    State(state): State<AppState>,
    Path((bh_id, session_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ManualMatchRequest>,
) -> impl IntoResponse {
    let repo = ReconciliationRepository::new((*state.db).clone());

    let book_ids: Vec<ReconciliationItemId> = payload
        .book_item_ids
        .into_iter()
        .map(ReconciliationItemId::from_uuid)
        .collect();
    let bank_ids: Vec<ReconciliationItemId> = payload
        .bank_item_ids
        .into_iter()
        .map(ReconciliationItemId::from_uuid)
        .collect();

    match repo
        .manual_match(
            BoardingHouseId::from_uuid(bh_id),
            ReconciliationId::from_uuid(session_id),
            &book_ids,
            &bank_ids,
        )
        .await
    {
        Ok(session) => session_response(StatusCode::OK, &session),
        Err(e) => {
            error!(error = %e, session_id = %session_id, "Manual match failed");
            error_response(&reconciliation_error(e))
        }
    }
}

/// POST `/boarding-houses/{bh_id}/reconciliations/{session_id}/close` -
/// Close the session, recording whether it reconciled.
async fn close_session(
    State(state): State<AppState>,
    Path((bh_id, session_id)): Path<(Uuid, Uuid)>,
    payload: Option<Json<CloseSessionRequest>>,
) -> impl IntoResponse {
    let repo = ReconciliationRepository::new((*state.db).clone());
    let notes = payload.and_then(|Json(body)| body.notes);

    match repo
        .close_session(
            BoardingHouseId::from_uuid(bh_id),
            ReconciliationId::from_uuid(session_id),
            notes,
        )
        .await
    {
        Ok(session) => {
            info!(session_id = %session_id, status = ?session.status, "Session closed");
            session_response(StatusCode::OK, &session)
        }
        Err(e) => {
            error!(error = %e, session_id = %session_id, "Failed to close session");
            error_response(&reconciliation_error(e))
        }
    }
}
