//! Financial report routes: trial balance, balance sheet, income statement,
//! cashflow, and their CSV exports.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use lodgera_core::reports::{
    BalanceSheet, CashflowStatement, IncomeStatement, MonthlyCashflow, ReportSection,
    TrialBalance, build_balance_sheet, build_cashflow, build_income_statement,
    build_monthly_cashflow, build_trial_balance,
};
use lodgera_db::repositories::ReportRepository;
use lodgera_shared::error::AppError;
use lodgera_shared::types::BoardingHouseId;

use crate::AppState;
use crate::error::{error_response, report_error, report_query_error};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/boarding-houses/{bh_id}/trial-balance",
            get(trial_balance),
        )
        .route(
            "/boarding-houses/{bh_id}/trial-balance/export",
            get(trial_balance_csv),
        )
        .route(
            "/boarding-houses/{bh_id}/reports/balance-sheet",
            get(balance_sheet),
        )
        .route(
            "/boarding-houses/{bh_id}/reports/balance-sheet/export",
            get(balance_sheet_csv),
        )
        .route(
            "/boarding-houses/{bh_id}/reports/income-statement",
            get(income_statement),
        )
        .route(
            "/boarding-houses/{bh_id}/reports/income-statement/export",
            get(income_statement_csv),
        )
        .route("/boarding-houses/{bh_id}/reports/cashflow", get(cashflow))
        .route(
            "/boarding-houses/{bh_id}/reports/cashflow/monthly",
            get(cashflow_monthly),
        )
        .route(
            "/boarding-houses/{bh_id}/reports/cashflow/monthly/export",
            get(cashflow_monthly_csv),
        )
}

/// Query parameters for snapshot reports.
#[derive(Debug, Deserialize)]
pub struct SnapshotQuery {
    /// Snapshot date.
    pub as_of_date: NaiveDate,
}

/// Query parameters for windowed reports.
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    /// Window start (inclusive).
    pub start_date: NaiveDate,
    /// Window end (inclusive).
    pub end_date: NaiveDate,
}

fn invalid_window() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "error": "VALIDATION_ERROR",
            "message": "end_date must not precede start_date"
        })),
    )
        .into_response()
}

async fn load_trial_balance(
    state: &AppState,
    bh_id: Uuid,
    as_of_date: NaiveDate,
) -> Result<TrialBalance, AppError> {
    let repo = ReportRepository::new((*state.db).clone());
    let activities = repo
        .account_activity(BoardingHouseId::from_uuid(bh_id), None, Some(as_of_date))
        .await
        .map_err(report_query_error)?;
    build_trial_balance(as_of_date, &activities).map_err(|e| report_error(&e))
}

async fn load_balance_sheet(
    state: &AppState,
    bh_id: Uuid,
    as_of_date: NaiveDate,
) -> Result<BalanceSheet, AppError> {
    let repo = ReportRepository::new((*state.db).clone());
    let activities = repo
        .account_activity(BoardingHouseId::from_uuid(bh_id), None, Some(as_of_date))
        .await
        .map_err(report_query_error)?;
    build_balance_sheet(as_of_date, &activities).map_err(|e| report_error(&e))
}

async fn load_income_statement(
    state: &AppState,
    bh_id: Uuid,
    window: &WindowQuery,
) -> Result<IncomeStatement, AppError> {
    let repo = ReportRepository::new((*state.db).clone());
    let activities = repo
        .account_activity(
            BoardingHouseId::from_uuid(bh_id),
            Some(window.start_date),
            Some(window.end_date),
        )
        .await
        .map_err(report_query_error)?;
    Ok(build_income_statement(
        window.start_date,
        window.end_date,
        &activities,
    ))
}

async fn load_cashflow(
    state: &AppState,
    bh_id: Uuid,
    window: &WindowQuery,
) -> Result<CashflowStatement, AppError> {
    let repo = ReportRepository::new((*state.db).clone());
    let transactions = repo
        .cashflow_transactions(
            BoardingHouseId::from_uuid(bh_id),
            window.start_date,
            window.end_date,
        )
        .await
        .map_err(report_query_error)?;
    Ok(build_cashflow(
        window.start_date,
        window.end_date,
        &transactions,
    ))
}

async fn load_monthly_cashflow(
    state: &AppState,
    bh_id: Uuid,
    window: &WindowQuery,
) -> Result<Vec<MonthlyCashflow>, AppError> {
    let repo = ReportRepository::new((*state.db).clone());
    let transactions = repo
        .cashflow_transactions(
            BoardingHouseId::from_uuid(bh_id),
            window.start_date,
            window.end_date,
        )
        .await
        .map_err(report_query_error)?;
    Ok(build_monthly_cashflow(
        window.start_date,
        window.end_date,
        &transactions,
    ))
}

/// GET `/boarding-houses/{bh_id}/trial-balance`
async fn trial_balance(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
    Query(query): Query<SnapshotQuery>,
) -> impl IntoResponse {
    match load_trial_balance(&state, bh_id, query.as_of_date).await {
        Ok(report) => (StatusCode::OK, Json(json!({ "data": report }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to build trial balance");
            error_response(&e)
        }
    }
}

/// GET `/boarding-houses/{bh_id}/reports/balance-sheet`
async fn balance_sheet(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
    Query(query): Query<SnapshotQuery>,
) -> impl IntoResponse {
    match load_balance_sheet(&state, bh_id, query.as_of_date).await {
        Ok(report) => (StatusCode::OK, Json(json!({ "data": report }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to build balance sheet");
            error_response(&e)
        }
    }
}

/// GET `/boarding-houses/{bh_id}/reports/income-statement`
async fn income_statement(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
    Query(query): Query<WindowQuery>,
) -> impl IntoResponse {
    if query.end_date < query.start_date {
        return invalid_window();
    }
    match load_income_statement(&state, bh_id, &query).await {
        Ok(report) => (StatusCode::OK, Json(json!({ "data": report }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to build income statement");
            error_response(&e)
        }
    }
}

/// GET `/boarding-houses/{bh_id}/reports/cashflow`
async fn cashflow(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
    Query(query): Query<WindowQuery>,
) -> impl IntoResponse {
    if query.end_date < query.start_date {
        return invalid_window();
    }
    match load_cashflow(&state, bh_id, &query).await {
        Ok(report) => (StatusCode::OK, Json(json!({ "data": report }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to build cashflow statement");
            error_response(&e)
        }
    }
}

/// GET `/boarding-houses/{bh_id}/reports/cashflow/monthly`
async fn cashflow_monthly(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
    Query(query): Query<WindowQuery>,
) -> impl IntoResponse {
    if query.end_date < query.start_date {
        return invalid_window();
    }
    match load_monthly_cashflow(&state, bh_id, &query).await {
        Ok(months) => (StatusCode::OK, Json(json!({ "data": months }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to build monthly cashflow");
            error_response(&e)
        }
    }
}

// CSV export. Amounts are written as plain decimal strings so spreadsheets
// parse them as numbers, and each file closes with a summary block.

fn csv_response(filename: &str, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn csv_failure(e: &csv::Error) -> Response {
    error!(error = %e, "CSV serialization failed");
    error_response(&AppError::Internal("CSV export failed".to_string()))
}

const fn account_type_label(account_type: lodgera_core::coa::AccountType) -> &'static str {
    use lodgera_core::coa::AccountType;
    match account_type {
        AccountType::Asset => "asset",
        AccountType::Liability => "liability",
        AccountType::Equity => "equity",
        AccountType::Revenue => "revenue",
        AccountType::Expense => "expense",
    }
}

fn trial_balance_to_csv(report: &TrialBalance) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["code", "name", "type", "debit", "credit"])?;
    for row in &report.accounts {
        writer.write_record([
            row.code.as_str(),
            row.name.as_str(),
            account_type_label(row.account_type),
            &row.debit_balance.to_string(),
            &row.credit_balance.to_string(),
        ])?;
    }
    writer.write_record([
        "",
        "TOTAL",
        "",
        &report.summary.total_debits.to_string(),
        &report.summary.total_credits.to_string(),
    ])?;
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

fn write_section(
    writer: &mut csv::Writer<Vec<u8>>,
    title: &str,
    section: &ReportSection,
) -> Result<(), csv::Error> {
    for line in &section.lines {
        writer.write_record([
            title,
            line.code.as_str(),
            line.name.as_str(),
            &line.amount.to_string(),
        ])?;
    }
    writer.write_record([title, "", "TOTAL", &section.total.to_string()])?;
    Ok(())
}

fn balance_sheet_to_csv(report: &BalanceSheet) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["section", "code", "name", "amount"])?;
    write_section(&mut writer, "assets", &report.assets)?;
    write_section(&mut writer, "liabilities", &report.liabilities)?;
    write_section(&mut writer, "equity", &report.equity)?;
    writer.write_record(["equity", "", "NET INCOME", &report.net_income.to_string()])?;
    writer.write_record([
        "equity",
        "",
        "TOTAL EQUITY",
        &report.total_equity_with_income.to_string(),
    ])?;
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

fn income_statement_to_csv(report: &IncomeStatement) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["section", "code", "name", "amount"])?;
    write_section(&mut writer, "revenue", &report.revenue)?;
    write_section(&mut writer, "expenses", &report.expenses)?;
    writer.write_record(["", "", "NET INCOME", &report.net_income.to_string()])?;
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

fn monthly_cashflow_to_csv(months: &[MonthlyCashflow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "month",
        "operating_inflows",
        "operating_outflows",
        "operating_net",
        "investing_net",
        "financing_net",
        "cumulative",
    ])?;
    for month in months {
        writer.write_record([
            month.month.as_str(),
            &month.operating_inflows.to_string(),
            &month.operating_outflows.to_string(),
            &month.operating_net.to_string(),
            &month.investing_net.to_string(),
            &month.financing_net.to_string(),
            &month.cumulative.to_string(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// GET `/boarding-houses/{bh_id}/trial-balance/export`
async fn trial_balance_csv(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
    Query(query): Query<SnapshotQuery>,
) -> impl IntoResponse {
    match load_trial_balance(&state, bh_id, query.as_of_date).await {
        Ok(report) => match trial_balance_to_csv(&report) {
            Ok(bytes) => csv_response(
                &format!("trial-balance-{}.csv", report.as_of_date),
                bytes,
            ),
            Err(e) => csv_failure(&e),
        },
        Err(e) => error_response(&e),
    }
}

/// GET `/boarding-houses/{bh_id}/reports/balance-sheet/export`
async fn balance_sheet_csv(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
    Query(query): Query<SnapshotQuery>,
) -> impl IntoResponse {
    match load_balance_sheet(&state, bh_id, query.as_of_date).await {
        Ok(report) => match balance_sheet_to_csv(&report) {
            Ok(bytes) => csv_response(
                &format!("balance-sheet-{}.csv", report.as_of_date),
                bytes,
            ),
            Err(e) => csv_failure(&e),
        },
        Err(e) => error_response(&e),
    }
}

/// GET `/boarding-houses/{bh_id}/reports/income-statement/export`
async fn income_statement_csv(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
    Query(query): Query<WindowQuery>,
) -> impl IntoResponse {
    if query.end_date < query.start_date {
        return invalid_window();
    }
    match load_income_statement(&state, bh_id, &query).await {
        Ok(report) => match income_statement_to_csv(&report) {
            Ok(bytes) => csv_response(
                &format!("income-statement-{}-{}.csv", report.start_date, report.end_date),
                bytes,
            ),
            Err(e) => csv_failure(&e),
        },
        Err(e) => error_response(&e),
    }
}

/// GET `/boarding-houses/{bh_id}/reports/cashflow/monthly/export`
async fn cashflow_monthly_csv(
    State(state): State<AppState>,
    Path(bh_id): Path<Uuid>,
    Query(query): Query<WindowQuery>,
) -> impl IntoResponse {
    if query.end_date < query.start_date {
        return invalid_window();
    }
    match load_monthly_cashflow(&state, bh_id, &query).await {
        Ok(months) => match monthly_cashflow_to_csv(&months) {
            Ok(bytes) => csv_response(
                &format!("cashflow-{}-{}.csv", query.start_date, query.end_date),
                bytes,
            ),
            Err(e) => csv_failure(&e),
        },
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use lodgera_core::reports::{TrialBalanceRow, TrialBalanceSummary};
    use lodgera_shared::types::AccountId;

    #[test]
    fn test_trial_balance_csv_has_summary_row() {
        let report = TrialBalance {
            as_of_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            accounts: vec![TrialBalanceRow {
                account_id: AccountId::new(),
                code: "1000".into(),
                name: "Cash".into(),
                account_type: lodgera_core::coa::AccountType::Asset,
                debit_balance: dec!(100.00),
                credit_balance: dec!(0),
            }],
            summary: TrialBalanceSummary {
                total_debits: dec!(100.00),
                total_credits: dec!(100.00),
                difference: dec!(0),
                is_balanced: true,
            },
        };

        let bytes = trial_balance_to_csv(&report).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "code,name,type,debit,credit");
        assert_eq!(lines[1], "1000,Cash,asset,100.00,0");
        assert_eq!(lines[2], ",TOTAL,,100.00,100.00");
    }

    #[test]
    fn test_monthly_cashflow_csv_column_order() {
        let months = vec![MonthlyCashflow {
            month: "2026-01".into(),
            operating_inflows: dec!(800.00),
            operating_outflows: dec!(120.00),
            operating_net: dec!(680.00),
            investing_net: dec!(0),
            financing_net: dec!(0),
            cumulative: dec!(680.00),
        }];

        let bytes = monthly_cashflow_to_csv(&months).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "month,operating_inflows,operating_outflows,operating_net,investing_net,financing_net,cumulative"
        );
        assert_eq!(lines[1], "2026-01,800.00,120.00,680.00,0,0,680.00");
    }
}
