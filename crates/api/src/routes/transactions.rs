//! Transaction and account ledger routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use lodgera_core::ledger::{EntryInput, EntryType, TransactionCategory, TransactionStatus};
use lodgera_db::repositories::{
    BalanceRepository, PeriodRepository, PostTransactionInput, PostingRepository,
    ReportRepository, ReviseTransactionInput,
};
use lodgera_shared::types::{AccountId, BoardingHouseId, PageRequest, TransactionId};

use crate::AppState;
use crate::error::{balance_error, error_response, period_error, posting_error, report_query_error};

const MAX_PAGE_LIMIT: u64 = 200;

/// Creates the transaction and ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/boarding-houses/{bh_id}/transactions",
            post(create_transaction),
        )
        .route(
            "/boarding-houses/{bh_id}/transactions/{txn_id}/post",
            post(post_draft),
        )
        .route(
            "/boarding-houses/{bh_id}/transactions/{txn_id}",
            get(get_transaction).put(revise_transaction),
        )
        .route(
            "/boarding-houses/{bh_id}/accounts/{account_id}/transactions",
            get(account_transactions),
        )
        .route(
            "/boarding-houses/{bh_id}/accounts/{account_id}/ledger",
            get(account_period_ledger),
        )
        .route(
            "/boarding-houses/{bh_id}/accounts/{account_id}/balance",
            get(account_balance),
        )
}

/// One entry line in a transaction request.
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    /// Account to post to.
    pub account_id: Uuid,
    /// Debit or credit.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Positive amount.
    pub amount: Decimal,
    /// Optional line description.
    pub description: Option<String>,
}

impl EntryRequest {
    fn into_input(self) -> EntryInput {
        EntryInput {
            account_id: AccountId::from_uuid(self.account_id),
            entry_type: self.entry_type,
            amount: self.amount,
            description: self.description,
        }
    }
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Business date.
    pub date: NaiveDate,
    /// Reference number.
    pub reference: Option<String>,
    /// Description.
    pub description: String,
    /// Category.
    pub category: TransactionCategory,
    /// Status; defaults to posted.
    #[serde(default = "default_status")]
    pub status: TransactionStatus,
    /// The entry set.
    pub entries: Vec<EntryRequest>,
}

const fn default_status() -> TransactionStatus {
    TransactionStatus::Posted
}

/// Request body for revising a posted transaction.
#[derive(Debug, Deserialize)]
pub struct ReviseTransactionRequest {
    /// New business date.
    pub date: NaiveDate,
    /// New reference number.
    pub reference: Option<String>,
    /// New description.
    pub description: String,
    /// New category.
    pub category: TransactionCategory,
    /// Replacement entry set.
    pub entries: Vec<EntryRequest>,
}

/// Query window plus pagination for the account transaction listing.
///
/// Pagination fields are spelled out here because query-string
/// deserialization cannot flatten typed sub-structs.
#[derive(Debug, Deserialize)]
pub struct LedgerListQuery {
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: Option<NaiveDate>,
    /// Rows to skip.
    pub offset: Option<u64>,
    /// Maximum rows to return.
    pub limit: Option<u64>,
}

impl LedgerListQuery {
    fn page(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            offset: self.offset.unwrap_or(defaults.offset),
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }
}

/// Query parameters for the period ledger.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// Inclusive period start.
    pub period_start: NaiveDate,
    /// Inclusive period end.
    pub period_end: NaiveDate,
}

/// Query parameters for the balance endpoint.
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// Historical cut-off date; omitted means the cached current balance.
    pub as_of: Option<NaiveDate>,
}

/// POST `/boarding-houses/{bh_id}/transactions` - Create (and usually post) a
/// transaction.
async fn create_transaction(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    let repo = PostingRepository::new((*state.db).clone());

    let input = PostTransactionInput {
        boarding_house_id: BoardingHouseId::from_uuid(bh_id),
        date: payload.date,
        reference: payload.reference,
        description: payload.description,
        category: payload.category,
        status: payload.status,
        entries: payload
            .entries
            .into_iter()
            .map(EntryRequest::into_input)
            .collect(),
    };

    match repo.post_transaction(input).await {
        Ok(model) => {
            info!(transaction_id = %model.id, "Transaction created");
            (StatusCode::CREATED, Json(model.to_domain())).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create transaction");
            error_response(&posting_error(e))
        }
    }
}

/// GET `/boarding-houses/{bh_id}/transactions/{txn_id}` - Transaction header
/// with its journal entries.
async fn get_transaction(
    State(state): State<AppState>,
    Path((bh_id, txn_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = PostingRepository::new((*state.db).clone());

    match repo
        .get_with_entries(
            BoardingHouseId::from_uuid(bh_id),
            TransactionId::from_uuid(txn_id),
        )
        .await
    {
        Ok((model, entries)) => {
            let entries: Vec<_> = entries.iter().map(|e| e.to_domain()).collect();
            (
                StatusCode::OK,
                Json(json!({
                    "data": model.to_domain(),
                    "entries": entries,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, transaction_id = %txn_id, "Failed to load transaction");
            error_response(&posting_error(e))
        }
    }
}

/// POST `/boarding-houses/{bh_id}/transactions/{txn_id}/post` - Post a draft.
async fn post_draft(
    State(state): State<AppState>,
    Path((bh_id, txn_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = PostingRepository::new((*state.db).clone());

    match repo
        .post_draft(
            BoardingHouseId::from_uuid(bh_id),
            TransactionId::from_uuid(txn_id),
        )
        .await
    {
        Ok(model) => (StatusCode::OK, Json(model.to_domain())).into_response(),
        Err(e) => {
            error!(error = %e, transaction_id = %txn_id, "Failed to post draft");
            error_response(&posting_error(e))
        }
    }
}

/// PUT `/boarding-houses/{bh_id}/transactions/{txn_id}` - Revise a posted
/// transaction via reversal and replacement.
async fn revise_transaction(
    State(state): State<AppState>,
    Path((bh_id, txn_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ReviseTransactionRequest>,
) -> impl IntoResponse {
    let repo = PostingRepository::new((*state.db).clone());

    let input = ReviseTransactionInput {
        date: payload.date,
        reference: payload.reference,
        description: payload.description,
        category: payload.category,
        entries: payload
            .entries
            .into_iter()
            .map(EntryRequest::into_input)
            .collect(),
    };

    match repo
        .revise_transaction(
            BoardingHouseId::from_uuid(bh_id),
            TransactionId::from_uuid(txn_id),
            input,
        )
        .await
    {
        Ok(replacement) => {
            info!(
                original = %txn_id,
                replacement = %replacement.id,
                "Transaction revised"
            );
            (StatusCode::OK, Json(replacement.to_domain())).into_response()
        }
        Err(e) => {
            error!(error = %e, transaction_id = %txn_id, "Failed to revise transaction");
            error_response(&posting_error(e))
        }
    }
}

/// GET `/boarding-houses/{bh_id}/accounts/{account_id}/transactions` -
/// Paginated entry listing for one account, newest first.
async fn account_transactions(
    State(state): State<AppState>,
    Path((bh_id, account_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<LedgerListQuery>,
) -> impl IntoResponse {
    let repo = ReportRepository::new((*state.db).clone());

    match repo
        .account_ledger(
            BoardingHouseId::from_uuid(bh_id),
            AccountId::from_uuid(account_id),
            query.from,
            query.to,
            query.page().clamped(MAX_PAGE_LIMIT),
        )
        .await
    {
        Ok((rows, meta)) => (
            StatusCode::OK,
            Json(json!({ "data": rows, "pagination": meta })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, account_id = %account_id, "Failed to list account transactions");
            error_response(&report_query_error(e))
        }
    }
}

/// GET `/boarding-houses/{bh_id}/accounts/{account_id}/ledger` - Period
/// ledger with brought-down and carried-down lines.
async fn account_period_ledger(
    State(state): State<AppState>,
    Path((bh_id, account_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    if query.period_end < query.period_start {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "VALIDATION_ERROR",
                "message": "period_end must not precede period_start"
            })),
        )
            .into_response();
    }

    let repo = PeriodRepository::new((*state.db).clone());

    match repo
        .get_period(
            BoardingHouseId::from_uuid(bh_id),
            AccountId::from_uuid(account_id),
            query.period_start,
            query.period_end,
        )
        .await
    {
        Ok(ledger) => (StatusCode::OK, Json(ledger)).into_response(),
        Err(e) => {
            error!(error = %e, account_id = %account_id, "Failed to build period ledger");
            error_response(&period_error(e))
        }
    }
}

/// GET `/boarding-houses/{bh_id}/accounts/{account_id}/balance` - Cached
/// current balance, or the recomputed balance as of a historical date.
async fn account_balance(
    State(state): State<AppState>,
    Path((bh_id, account_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<BalanceQuery>,
) -> impl IntoResponse {
    let repo = BalanceRepository::new((*state.db).clone());
    let account_id = AccountId::from_uuid(account_id);

    let result = match query.as_of {
        Some(as_of) => {
            repo.get_balance_as_of(BoardingHouseId::from_uuid(bh_id), account_id, as_of)
                .await
        }
        None => repo.get_current_balance(account_id).await,
    };

    match result {
        Ok(balance) => (
            StatusCode::OK,
            Json(json!({
                "account_id": account_id,
                "as_of": query.as_of,
                "balance": balance
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, account_id = %account_id, "Failed to read balance");
            error_response(&balance_error(e))
        }
    }
}
