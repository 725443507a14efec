//! Mock crypto-wallet dashboard: session login in front of a few pages and a
//! JSON API over an in-memory wallet.

use std::sync::Arc;

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod state;
pub mod store;
pub mod utils;

use auth::CurrentUser;
use handlers::{api, pages};
use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let mut protected = Router::new()
        // pages
        .route("/", get(pages::index))
        .route("/logout", get(pages::logout))
        // api
        .route("/api/state", get(api::get_state))
        .route("/api/send", post(api::send))
        .route("/api/add_contract", post(api::add_contract))
        .route("/api/remove_contract/{addr}", post(api::remove_contract))
        .route("/api/add_asset", post(api::add_asset));

    for &page in pages::PAGES {
        protected = protected.route(
            &format!("/{page}"),
            get(move |st: State<Arc<AppState>>, user: Extension<CurrentUser>| {
                pages::app_page(st, user, page)
            }),
        );
    }

    let protected = protected.route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_session,
    ));

    Router::new()
        .route("/login", get(pages::login_form).post(pages::login_submit))
        .route("/health", get(pages::health))
        .merge(protected)
        // static
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(TraceLayer::new_for_http())
        // shared state
        .with_state(state)
}
