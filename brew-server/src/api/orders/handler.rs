//! Orders API Handlers

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::BusMessage;
use shared::message::OrderEventPayload;
use shared::models::OrderStatus;

use crate::api::convert::OrderView;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    pub client_id: String,
    /// Optional rounded-up amount; values below the cart total are clamped
    pub custom_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order: OrderView,
}

/// POST /orders - convert the client's active holds into an order
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CheckoutPayload>,
) -> AppResult<Json<CheckoutResponse>> {
    if payload.client_id.trim().is_empty() {
        return Err(AppError::validation("clientId is required"));
    }

    let placed = state
        .checkout
        .checkout(&payload.client_id, payload.custom_amount)
        .await?;

    Ok(Json(CheckoutResponse {
        order: OrderView::from_parts(placed.order, placed.lines),
    }))
}

/// GET /orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderView>> {
    let order = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        })?;
    let lines = order::find_lines(&state.pool, id).await?;
    Ok(Json(OrderView::from_parts(order, lines)))
}

/// GET /orders/client/{clientId} - newest first
pub async fn list_by_client(
    State(state): State<ServerState>,
    Path(client_id): Path<String>,
) -> AppResult<Json<Vec<OrderView>>> {
    let orders = order::find_by_client(&state.pool, &client_id).await?;
    let mut views = Vec::with_capacity(orders.len());
    for o in orders {
        let lines = order::find_lines(&state.pool, o.id).await?;
        views.push(OrderView::from_parts(o, lines));
    }
    Ok(Json(views))
}

/// GET /admin/orders - every order, newest first
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderView>>> {
    let orders = order::find_all(&state.pool).await?;
    let mut views = Vec::with_capacity(orders.len());
    for o in orders {
        let lines = order::find_lines(&state.pool, o.id).await?;
        views.push(OrderView::from_parts(o, lines));
    }
    Ok(Json(views))
}

/// PATCH /orders/{id}/status - admin status transition
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusPayload>,
) -> AppResult<Json<OrderView>> {
    let status = OrderStatus::from_str(&payload.status).map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidOrderStatus,
            format!("Invalid order status: {}", payload.status),
        )
    })?;

    order::update_status(&state.pool, id, status).await?;
    let order = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        })?;
    let lines = order::find_lines(&state.pool, id).await?;

    state
        .bus
        .publish(BusMessage::OrderUpdate(OrderEventPayload {
            order_id: order.id,
            client_id: order.client_id.clone(),
            status: order.status,
            amount: order.amount,
        }))
        .await;

    Ok(Json(OrderView::from_parts(order, lines)))
}
