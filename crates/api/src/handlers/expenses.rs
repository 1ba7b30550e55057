use crate::error::{service_error, ApiError};
use crate::handlers::customers::ListQuery;
use crate::middleware::TenantDb;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use hms_models::{CreateExpense, Expense, UpdateExpense};
use hms_services::ExpenseService;

pub async fn list_expenses(
    TenantDb(db): TenantDb,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let expenses = ExpenseService::new(db)
        .list(query.page, query.page_size)
        .await
        .map_err(service_error)?;

    Ok(Json(expenses))
}

pub async fn get_expense(
    TenantDb(db): TenantDb,
    Path(expense_id): Path<i32>,
) -> Result<Json<Expense>, ApiError> {
    let expense = ExpenseService::new(db)
        .get(expense_id)
        .await
        .map_err(service_error)?;

    Ok(Json(expense))
}

pub async fn create_expense(
    TenantDb(db): TenantDb,
    Json(request): Json<CreateExpense>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let expense = ExpenseService::new(db)
        .create(request)
        .await
        .map_err(service_error)?;

    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn update_expense(
    TenantDb(db): TenantDb,
    Path(expense_id): Path<i32>,
    Json(request): Json<UpdateExpense>,
) -> Result<Json<Expense>, ApiError> {
    let expense = ExpenseService::new(db)
        .update(expense_id, request)
        .await
        .map_err(service_error)?;

    Ok(Json(expense))
}

pub async fn delete_expense(
    TenantDb(db): TenantDb,
    Path(expense_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    ExpenseService::new(db)
        .delete(expense_id)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}
