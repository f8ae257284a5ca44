//! Product route handlers.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State, multipart::Field, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use stockroom_core::{AdjustmentKind, ProductId};

use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::models::Page;
use crate::models::product::{CreateProductInput, Product, StockAdjustment, UpdateProductInput};
use crate::services::profit;
use crate::services::stock::StockService;
use crate::services::uploads::{self, UploadError};
use crate::state::AppState;

/// JSON body extraction outcome. Handlers map rejections into the error
/// envelope instead of axum's plain-text default.
pub(super) type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PaginationQuery {
    /// Apply defaults and reject zero values.
    pub(super) fn resolve(&self) -> Result<(u32, u32)> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(10);
        if page == 0 || limit == 0 {
            return Err(AppError::BadRequest(
                "page and limit must be positive".to_string(),
            ));
        }
        Ok((page, limit))
    }
}

/// Request for profit calculation.
#[derive(Debug, Deserialize)]
pub struct ProfitRequest {
    pub salaries: Vec<SalaryEntry>,
    pub profit: Decimal,
}

/// A single salary entry.
#[derive(Debug, Deserialize)]
pub struct SalaryEntry {
    pub salary: Decimal,
}

// =============================================================================
// Multipart form handling
// =============================================================================

/// An uploaded file part, held in memory until validation passes.
struct ImagePart {
    filename: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl ImagePart {
    /// Store the image and return its public URL.
    async fn store(self, state: &AppState) -> Result<String> {
        let filename = uploads::store_image(
            &state.config().upload_dir,
            self.filename.as_deref(),
            self.content_type.as_deref(),
            &self.bytes,
        )
        .await?;

        Ok(uploads::image_url(&state.config().base_url, &filename))
    }
}

/// Collected multipart form fields, shared by create and update.
///
/// The whole stream is drained before anything is validated or written, so
/// a bad field later in the form never leaves an orphaned image file.
#[derive(Default)]
struct ProductForm {
    category: Option<String>,
    name: Option<String>,
    price: Option<Decimal>,
    description: Option<String>,
    quantity: Option<i32>,
    image: Option<ImagePart>,
}

impl ProductForm {
    async fn read(multipart: &mut Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("invalid multipart request: {e}")))?
        {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };
            match name.as_str() {
                "image" => {
                    let filename = field.file_name().map(ToString::to_string);
                    let content_type = field.content_type().map(ToString::to_string);
                    let bytes = field.bytes().await.map_err(|e| {
                        AppError::BadRequest(format!("failed to read image: {e}"))
                    })?;
                    form.image = Some(ImagePart {
                        filename,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                "category" => form.category = Some(text(field, "category").await?),
                "name" => form.name = Some(text(field, "name").await?),
                "description" => form.description = Some(text(field, "description").await?),
                "price" => {
                    let raw = text(field, "price").await?;
                    form.price = Some(parse_price(&raw)?);
                }
                "quantity" => {
                    let raw = text(field, "quantity").await?;
                    form.quantity = Some(parse_quantity(&raw)?);
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

async fn text(field: Field<'_>, name: &str) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("failed to read field {name}: {e}")))
}

fn parse_price(raw: &str) -> Result<Decimal> {
    let price: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("price must be a number, got {raw:?}")))?;
    if price < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "price must not be negative".to_string(),
        ));
    }
    Ok(price)
}

fn parse_quantity(raw: &str) -> Result<i32> {
    let quantity: i32 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("quantity must be an integer, got {raw:?}")))?;
    if quantity < 0 {
        return Err(AppError::BadRequest(
            "quantity must not be negative".to_string(),
        ));
    }
    Ok(quantity)
}

fn require<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
}

fn product_not_found(id: ProductId) -> AppError {
    AppError::NotFound(format!("Product with ID {id} not found"))
}

// =============================================================================
// Catalog handlers
// =============================================================================

/// Create a product from a multipart form.
///
/// # Errors
///
/// Returns 400 if a field is missing or malformed, or if the image part is
/// absent or not an image.
pub async fn create(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut form = ProductForm::read(&mut multipart).await?;

    let image_part = form.image.take().ok_or(UploadError::MissingImage)?;
    let category = require(form.category.take(), "category")?;
    let name = require(form.name.take(), "name")?;
    let price = require(form.price.take(), "price")?;
    let description = require(form.description.take(), "description")?;
    let quantity = require(form.quantity.take(), "quantity")?;

    let image = image_part.store(&state).await?;

    let input = CreateProductInput {
        category,
        name,
        price,
        description,
        image,
        quantity,
    };

    let product = ProductRepository::new(state.pool()).create(&input).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// List active products with pagination.
///
/// # Errors
///
/// Returns 400 if `page` or `limit` is zero.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Page<Product>>> {
    let (page, limit) = query.resolve()?;

    let (data, total) = ProductRepository::new(state.pool())
        .list(page, limit)
        .await?;

    Ok(Json(Page {
        data,
        total,
        page,
        limit,
    }))
}

/// Get a product by ID.
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| product_not_found(id))?;

    Ok(Json(product))
}

/// Update a product from a multipart form. Absent fields keep their values.
///
/// # Errors
///
/// Returns 404 if the product does not exist, 400 for malformed fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    mut multipart: Multipart,
) -> Result<Json<Product>> {
    let mut form = ProductForm::read(&mut multipart).await?;

    let image = match form.image.take() {
        Some(part) => Some(part.store(&state).await?),
        None => None,
    };

    let input = UpdateProductInput {
        category: form.category,
        name: form.name,
        price: form.price,
        description: form.description,
        image,
        quantity: form.quantity,
    };

    let product = ProductRepository::new(state.pool())
        .update(id, &input)
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => product_not_found(id),
            other => AppError::Database(other),
        })?;

    Ok(Json(product))
}

/// Soft-delete a product.
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .soft_delete(id)
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => product_not_found(id),
            other => AppError::Database(other),
        })?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Stock batch handlers
// =============================================================================

/// Apply a sales batch.
///
/// # Errors
///
/// Returns 404 for an unknown product, 400 for insufficient stock or a
/// malformed batch, 409 when a concurrent batch won. Nothing is persisted
/// on failure.
pub async fn sales(
    State(state): State<AppState>,
    payload: JsonBody<Vec<StockAdjustment>>,
) -> Result<Json<serde_json::Value>> {
    let items = batch_items(payload)?;

    StockService::new(state.pool())
        .apply_batch(&items, AdjustmentKind::Sales)
        .await?;

    Ok(Json(json!({ "message": "Sales processed successfully" })))
}

/// Apply a waste batch.
///
/// # Errors
///
/// Same error surface as [`sales`].
pub async fn waste(
    State(state): State<AppState>,
    payload: JsonBody<Vec<StockAdjustment>>,
) -> Result<Json<serde_json::Value>> {
    let items = batch_items(payload)?;

    StockService::new(state.pool())
        .apply_batch(&items, AdjustmentKind::Waste)
        .await?;

    Ok(Json(json!({ "message": "Wastes processed successfully" })))
}

/// Apply a restock batch from incoming supplier orders.
///
/// # Errors
///
/// Returns 404 for an unknown product, 400 when the body is empty or not an
/// array, 409 when a concurrent batch won.
pub async fn add_orders(
    State(state): State<AppState>,
    payload: JsonBody<Vec<StockAdjustment>>,
) -> Result<Json<serde_json::Value>> {
    let Json(items) = payload.map_err(|_| invalid_orders_input())?;
    if items.is_empty() {
        return Err(invalid_orders_input());
    }

    StockService::new(state.pool())
        .apply_batch(&items, AdjustmentKind::Restock)
        .await?;

    Ok(Json(json!({ "message": "Orders processed successfully" })))
}

/// Compute the profit remaining after paying salaries.
///
/// # Errors
///
/// Returns 400 if the body is malformed, the salary list is empty or any
/// value is negative.
pub async fn calculate_profit(
    payload: JsonBody<ProfitRequest>,
) -> Result<Json<serde_json::Value>> {
    let Json(request) = payload.map_err(|_| invalid_profit_input())?;
    let salaries: Vec<Decimal> = request.salaries.iter().map(|entry| entry.salary).collect();
    let remaining = profit::remaining_profit(&salaries, request.profit)?;

    Ok(Json(json!({ "remainingProfit": remaining })))
}

/// Unwrap a batch body, turning a JSON rejection into the error envelope.
fn batch_items(payload: JsonBody<Vec<StockAdjustment>>) -> Result<Vec<StockAdjustment>> {
    let Json(items) =
        payload.map_err(|e| AppError::BadRequest(format!("invalid stock batch: {e}")))?;
    Ok(items)
}

fn invalid_orders_input() -> AppError {
    AppError::BadRequest("Invalid input. Provide an array of orders.".to_string())
}

fn invalid_profit_input() -> AppError {
    AppError::BadRequest(
        "Invalid input. Provide an array of salaries and a profit value.".to_string(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, header};
    use secrecy::SecretString;
    use tower::ServiceExt;

    use crate::config::ApiConfig;
    use crate::routes;

    fn test_state() -> AppState {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3300,
            base_url: "http://localhost:3300".to_string(),
            upload_dir: std::path::PathBuf::from("uploads"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };
        // connect_lazy never opens a connection, so these requests are
        // answered before any query could run.
        let pool = sqlx::PgPool::connect_lazy("postgres://localhost:1/unused").unwrap();
        AppState::new(config, pool)
    }

    async fn post_json(path: &str, body: &'static str) -> (StatusCode, serde_json::Value) {
        let app = routes::routes().with_state(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_add_orders_rejects_non_array_body() {
        let (status, body) = post_json("/products/add-orders", "{}").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid input. Provide an array of orders.");
    }

    #[tokio::test]
    async fn test_add_orders_rejects_empty_array() {
        let (status, body) = post_json("/products/add-orders", "[]").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid input. Provide an array of orders.");
    }

    #[tokio::test]
    async fn test_sales_non_array_body_gets_the_error_envelope() {
        let (status, body) = post_json("/products/sales", "\"not a batch\"").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("invalid stock batch"), "{message}");
    }

    #[tokio::test]
    async fn test_waste_non_array_body_gets_the_error_envelope() {
        let (status, body) = post_json("/products/waste", "{}").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("invalid stock batch"), "{message}");
    }

    #[tokio::test]
    async fn test_calculate_profit_rejects_non_object_body() {
        let (status, body) = post_json("/products/calculate-profit", "[]").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Invalid input. Provide an array of salaries and a profit value."
        );
    }
}
