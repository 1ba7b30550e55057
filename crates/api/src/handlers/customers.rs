use crate::error::{service_error, ApiError};
use crate::middleware::TenantDb;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use hms_models::{CreateCustomer, Customer, CustomerPage, UpdateCustomer};
use hms_services::{CustomerDetails, CustomerService};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

pub async fn list_customers(
    TenantDb(db): TenantDb,
    Query(query): Query<ListQuery>,
) -> Result<Json<CustomerPage>, ApiError> {
    let page = CustomerService::new(db)
        .list(query.page, query.page_size)
        .await
        .map_err(service_error)?;

    Ok(Json(page))
}

pub async fn get_customer(
    TenantDb(db): TenantDb,
    Path(customer_id): Path<i32>,
) -> Result<Json<CustomerDetails>, ApiError> {
    let customer = CustomerService::new(db)
        .get(customer_id)
        .await
        .map_err(service_error)?;

    Ok(Json(customer))
}

pub async fn get_customer_by_number(
    TenantDb(db): TenantDb,
    Path(customer_no): Path<String>,
) -> Result<Json<CustomerDetails>, ApiError> {
    let customer = CustomerService::new(db)
        .get_by_number(&customer_no)
        .await
        .map_err(service_error)?;

    Ok(Json(customer))
}

pub async fn search_customers(
    TenantDb(db): TenantDb,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = CustomerService::new(db)
        .search(&query.q)
        .await
        .map_err(service_error)?;

    Ok(Json(customers))
}

pub async fn create_customer(
    TenantDb(db): TenantDb,
    Json(request): Json<CreateCustomer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let customer = CustomerService::new(db)
        .create(request)
        .await
        .map_err(service_error)?;

    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn update_customer(
    TenantDb(db): TenantDb,
    Path(customer_id): Path<i32>,
    Json(request): Json<UpdateCustomer>,
) -> Result<Json<Customer>, ApiError> {
    let customer = CustomerService::new(db)
        .update(customer_id, request)
        .await
        .map_err(service_error)?;

    Ok(Json(customer))
}

pub async fn delete_customer(
    TenantDb(db): TenantDb,
    Path(customer_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    CustomerService::new(db)
        .delete(customer_id)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}
