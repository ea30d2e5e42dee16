//! Catalog API Handlers

use axum::{Json, extract::State};
use shared::util::now_millis;

use crate::api::convert::{BeerView, beer_views};
use crate::core::ServerState;
use crate::db::repository::{package_size, recipe};
use crate::inventory::ledger;
use crate::utils::AppResult;

/// GET /beers - full catalog with live per-package availability
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<BeerView>>> {
    let recipes = recipe::find_all(&state.pool).await?;
    let packages = package_size::find_all(&state.pool).await?;
    let levels = ledger::stock_snapshot(&state.pool, now_millis()).await?;

    Ok(Json(beer_views(
        recipes,
        &packages,
        &levels,
        &state.config.asset_base_url,
    )))
}
