#![warn(missing_docs)]
//! HTTP surface for the auction-bidding cache.
//!
//! Two independent [`axum::Router`]s are built: [`cache_app`] serves the
//! public `POST /cache` / `GET /cache` endpoints, [`admin_app`] serves
//! `/status`, `/version` and the metrics scrape path on a separate port, so
//! operational traffic never competes with cache traffic for the same
//! listener.

mod deadline;
mod error;
pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;

pub use state::{AdminState, CacheState};

/// Build the public cache API router.
pub fn cache_app(state: CacheState) -> Router {
    Router::new()
        .route("/cache", post(handlers::write::put).get(handlers::read::get))
        .with_state(state)
}

/// Build the admin router. `scrape_path` is read from configuration since
/// it's not known at compile time.
pub fn admin_app(state: AdminState) -> Router {
    let scrape_path = state.scrape_path.clone();
    Router::new()
        .route("/status", get(handlers::status::status))
        .route("/version", get(handlers::status::version))
        .route(&scrape_path, get(handlers::status::metrics))
        .with_state(state)
}
