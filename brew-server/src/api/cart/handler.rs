//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::util::now_millis;

use crate::api::convert::CartItemView;
use crate::core::ServerState;
use crate::db::repository::reservation;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservePayload {
    pub client_id: String,
    pub recipe_id: i64,
    #[serde(rename = "conteningId")]
    pub contening_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct ResizePayload {
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveResponse {
    pub reservation: CartItemView,
    pub expires_at: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendResponse {
    pub count: u64,
    pub expires_at: i64,
}

/// GET /cart/{clientId} - the client's unexpired holds
pub async fn list(
    State(state): State<ServerState>,
    Path(client_id): Path<String>,
) -> AppResult<Json<Vec<CartItemView>>> {
    let holds =
        reservation::find_active_details(&state.pool, &client_id, now_millis()).await?;
    Ok(Json(holds.into_iter().map(Into::into).collect()))
}

/// POST /cart/reserve - create a hold or grow an existing one
pub async fn reserve(
    State(state): State<ServerState>,
    Json(payload): Json<ReservePayload>,
) -> AppResult<Json<ReserveResponse>> {
    let hold = state
        .reservations
        .create_or_increase(
            &payload.client_id,
            payload.recipe_id,
            payload.contening_id,
            payload.quantity,
        )
        .await?;

    let detail = reservation::find_detail_by_id(&state.pool, hold.id).await?;
    Ok(Json(ReserveResponse {
        expires_at: hold.expires_at,
        reservation: detail.into(),
    }))
}

/// PATCH /cart/reservation/{id} - set an absolute quantity
pub async fn resize(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ResizePayload>,
) -> AppResult<Json<ReserveResponse>> {
    let hold = state.reservations.set_quantity(id, payload.quantity).await?;
    let detail = reservation::find_detail_by_id(&state.pool, hold.id).await?;
    Ok(Json(ReserveResponse {
        expires_at: hold.expires_at,
        reservation: detail.into(),
    }))
}

/// DELETE /cart/reservation/{id}
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.reservations.remove(id).await?;
    Ok(Json(true))
}

/// DELETE /cart/{clientId} - drop every hold of the client
pub async fn clear(
    State(state): State<ServerState>,
    Path(client_id): Path<String>,
) -> AppResult<Json<u64>> {
    let removed = state.reservations.clear_client(&client_id).await?;
    Ok(Json(removed))
}

/// POST /cart/extend/{clientId} - refresh expiry on unexpired holds
pub async fn extend(
    State(state): State<ServerState>,
    Path(client_id): Path<String>,
) -> AppResult<Json<ExtendResponse>> {
    let extended = state.reservations.extend_client(&client_id).await?;
    Ok(Json(ExtendResponse {
        count: extended.count,
        expires_at: extended.expires_at,
    }))
}
