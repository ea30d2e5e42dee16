//! Cart API module
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | /cart/{clientId} | GET | active holds |
//! | /cart/{clientId} | DELETE | clear cart |
//! | /cart/reserve | POST | create/increase hold |
//! | /cart/reservation/{id} | PATCH | resize hold |
//! | /cart/reservation/{id} | DELETE | remove hold |
//! | /cart/extend/{clientId} | POST | refresh expiry |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/cart/reserve", post(handler::reserve))
        .route("/cart/extend/{client_id}", post(handler::extend))
        .route(
            "/cart/reservation/{id}",
            patch(handler::resize).delete(handler::remove),
        )
        .route("/cart/{client_id}", get(handler::list).delete(handler::clear))
}
