//! Mapping repository and core errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use lodgera_core::reports::ReportError;
use lodgera_db::repositories::{
    BalanceError, BoardingHouseError, CoaError, PeriodError, PostingError, ReconciliationError,
    ReportQueryError,
};
use lodgera_shared::error::AppError;

/// Builds the uniform error response body for an [`AppError`].
pub fn error_response(error: &AppError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": error.error_code(),
            "message": error.to_string(),
        })),
    )
        .into_response()
}

/// Restates a chart of accounts error into the application taxonomy.
pub fn coa_error(error: CoaError) -> AppError {
    match error {
        CoaError::DuplicateCode(_) => AppError::Conflict(error.to_string()),
        CoaError::ParentNotFound(_) | CoaError::NotFound(_) => {
            AppError::NotFound(error.to_string())
        }
        CoaError::HasChildren(_) | CoaError::HasPostedEntries(_) => {
            AppError::Validation(error.to_string())
        }
        CoaError::Database(e) => AppError::Database(e.to_string()),
    }
}

/// Restates a boarding house error into the application taxonomy.
pub fn boarding_house_error(error: BoardingHouseError) -> AppError {
    match error {
        BoardingHouseError::NotFound(_) => AppError::NotFound(error.to_string()),
        BoardingHouseError::Database(e) => AppError::Database(e.to_string()),
    }
}

/// Restates a posting error into the application taxonomy.
pub fn posting_error(error: PostingError) -> AppError {
    match error {
        PostingError::Validation(_) | PostingError::NotPosted(_) | PostingError::AlreadyPosted(_) => {
            AppError::Validation(error.to_string())
        }
        PostingError::TransactionNotFound(_) => AppError::NotFound(error.to_string()),
        PostingError::ConcurrencyConflict(_) => AppError::Conflict(error.to_string()),
        PostingError::Database(e) => AppError::Database(e.to_string()),
    }
}

/// Restates a balance read error into the application taxonomy.
pub fn balance_error(error: BalanceError) -> AppError {
    match error {
        BalanceError::AccountNotFound(_) => AppError::NotFound(error.to_string()),
        BalanceError::Database(e) => AppError::Database(e.to_string()),
    }
}

/// Restates a period ledger error into the application taxonomy.
pub fn period_error(error: PeriodError) -> AppError {
    match error {
        PeriodError::AccountNotFound(_) => AppError::NotFound(error.to_string()),
        PeriodError::Database(e) => AppError::Database(e.to_string()),
    }
}

/// Restates a report query error into the application taxonomy.
pub fn report_query_error(error: ReportQueryError) -> AppError {
    match error {
        ReportQueryError::AccountNotFound(_) => AppError::NotFound(error.to_string()),
        ReportQueryError::Database(e) => AppError::Database(e.to_string()),
    }
}

/// Restates a report derivation failure. These indicate ledger corruption
/// and surface as integrity errors, distinct from caller mistakes.
pub fn report_error(error: &ReportError) -> AppError {
    AppError::Integrity(error.to_string())
}

/// Restates a reconciliation error into the application taxonomy.
pub fn reconciliation_error(error: ReconciliationError) -> AppError {
    use lodgera_core::reconcile::ReconcileError;

    match error {
        ReconciliationError::SessionNotFound(_) | ReconciliationError::AccountNotFound(_) => {
            AppError::NotFound(error.to_string())
        }
        ReconciliationError::NotCashAccount(_) => AppError::Validation(error.to_string()),
        ReconciliationError::Matching(ref inner) => match inner {
            ReconcileError::UnknownItem(_) => AppError::NotFound(error.to_string()),
            ReconcileError::AlreadyReconciled(_) | ReconcileError::SessionClosed => {
                AppError::Conflict(error.to_string())
            }
            ReconcileError::EmptyMatch => AppError::Validation(error.to_string()),
        },
        ReconciliationError::Database(e) => AppError::Database(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodgera_shared::types::{AccountId, TransactionId};

    #[test]
    fn test_duplicate_code_is_conflict() {
        let app = coa_error(CoaError::DuplicateCode("1000".into()));
        assert_eq!(app.status_code(), 409);
    }

    #[test]
    fn test_unbalanced_is_validation() {
        use rust_decimal::Decimal;
        let app = posting_error(PostingError::Validation(
            lodgera_core::ledger::LedgerValidationError::Unbalanced {
                debits: Decimal::ONE,
                credits: Decimal::ZERO,
            },
        ));
        assert_eq!(app.status_code(), 422);
        assert_eq!(app.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_concurrency_conflict_is_retryable_409() {
        let app = posting_error(PostingError::ConcurrencyConflict(AccountId::new()));
        assert_eq!(app.status_code(), 409);
    }

    #[test]
    fn test_missing_transaction_is_404() {
        let app = posting_error(PostingError::TransactionNotFound(TransactionId::new()));
        assert_eq!(app.status_code(), 404);
    }

    #[test]
    fn test_trial_balance_mismatch_is_integrity() {
        use rust_decimal::Decimal;
        let app = report_error(&ReportError::TrialBalanceMismatch {
            debits: Decimal::ONE,
            credits: Decimal::ZERO,
        });
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.error_code(), "INTEGRITY_ERROR");
    }
}
