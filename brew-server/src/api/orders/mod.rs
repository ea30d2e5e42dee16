//! Orders API module
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | /orders | POST | checkout the client's cart |
//! | /orders/{id} | GET | one order with items |
//! | /orders/client/{clientId} | GET | a client's orders |
//! | /orders/{id}/status | PATCH | admin status change |
//! | /admin/orders | GET | all orders |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/orders", post(handler::create))
        .route("/orders/client/{client_id}", get(handler::list_by_client))
        .route("/orders/{id}/status", patch(handler::update_status))
        .route("/orders/{id}", get(handler::get_by_id))
        .route("/admin/orders", get(handler::list_all))
}
