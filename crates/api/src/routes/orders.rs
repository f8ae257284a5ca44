//! Order route handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use stockroom_core::OrderId;

use crate::db::{OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::models::Page;
use crate::models::order::{CreateOrderInput, Order, OrderDetail, OrderLine, UpdateOrderInput};
use crate::state::AppState;

use super::products::{JsonBody, PaginationQuery};

/// Create an order.
///
/// Orders only record what was requested. Stock movement happens through
/// the batch endpoints, not here.
///
/// # Errors
///
/// Returns 400 if the body is malformed, the record is empty, an amount is
/// not positive, or a line references an unknown product.
pub async fn create(
    State(state): State<AppState>,
    payload: JsonBody<CreateOrderInput>,
) -> Result<impl IntoResponse> {
    let Json(input) = payload.map_err(invalid_order_payload)?;
    validate_record(&input.record)?;

    let order = OrderRepository::new(state.pool())
        .create(&input)
        .await
        .map_err(map_order_write_error)?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// List orders with pagination, each line joined to its product.
///
/// # Errors
///
/// Returns 400 if `page` or `limit` is zero.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Page<OrderDetail>>> {
    let (page, limit) = query.resolve()?;

    let (data, total) = OrderRepository::new(state.pool()).list(page, limit).await?;

    Ok(Json(Page {
        data,
        total,
        page,
        limit,
    }))
}

/// Get an order by ID, each line joined to its product.
///
/// # Errors
///
/// Returns 404 if the order does not exist.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDetail>> {
    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| order_not_found(id))?;

    Ok(Json(order))
}

/// Replace an order's lines.
///
/// # Errors
///
/// Returns 404 if the order does not exist, 400 for a malformed body or an
/// invalid record.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    payload: JsonBody<UpdateOrderInput>,
) -> Result<Json<Order>> {
    let Json(input) = payload.map_err(invalid_order_payload)?;
    validate_record(&input.record)?;

    let order = OrderRepository::new(state.pool())
        .update(id, &input)
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => order_not_found(id),
            other => map_order_write_error(other),
        })?;

    Ok(Json(order))
}

/// Delete an order.
///
/// # Errors
///
/// Returns 404 if the order does not exist.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<serde_json::Value>> {
    OrderRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => order_not_found(id),
            other => AppError::Database(other),
        })?;

    Ok(Json(
        json!({ "message": format!("Order with ID {id} deleted successfully") }),
    ))
}

fn invalid_order_payload(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(format!("invalid order payload: {rejection}"))
}

fn validate_record(record: &[OrderLine]) -> Result<()> {
    if record.is_empty() {
        return Err(AppError::BadRequest(
            "order must contain at least one product".to_string(),
        ));
    }
    if record.iter().any(|line| line.amount <= 0) {
        return Err(AppError::BadRequest(
            "order amounts must be positive".to_string(),
        ));
    }
    Ok(())
}

fn order_not_found(id: OrderId) -> AppError {
    AppError::NotFound(format!("Order with ID {id} not found"))
}

/// An order write that hits a foreign key problem is the client's fault.
fn map_order_write_error(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::Conflict(_) => AppError::BadRequest(
            "Invalid order data. Please check the product IDs and amounts.".to_string(),
        ),
        other => AppError::Database(other),
    }
}
