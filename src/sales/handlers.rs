use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::AppError,
    sales::{
        dto::{CreateOrderRequest, CreateQuotationRequest},
        repo_types::{Order, Quotation},
    },
    state::AppState,
};

pub fn sales_routes() -> Router<AppState> {
    Router::new()
        .route("/quotations", post(create_quotation))
        .route("/quotations/:user_id", get(list_quotations))
        .route("/orders", post(create_order))
        .route("/orders/:user_id", get(list_orders))
}

#[instrument(skip(state, payload))]
pub async fn create_quotation(
    State(state): State<AppState>,
    payload: Result<Json<CreateQuotationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Quotation>), AppError> {
    let Json(payload) = payload?;
    let row = state.sales.create_quotation(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state))]
pub async fn list_quotations(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Quotation>>, AppError> {
    let Path(user_id) = user_id?;
    Ok(Json(state.sales.quotations_for_user(user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let Json(payload) = payload?;
    let row = state.sales.create_order(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Order>>, AppError> {
    let Path(user_id) = user_id?;
    Ok(Json(state.sales.orders_for_user(user_id).await?))
}
