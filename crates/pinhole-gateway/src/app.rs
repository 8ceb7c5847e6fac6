use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{expand_handler, shorten_get_handler, shorten_post_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route(
                "/shorten/",
                get(shorten_get_handler).post(shorten_post_handler),
            )
            .route(
                "/shorten",
                get(shorten_get_handler).post(shorten_post_handler),
            )
            .fallback(expand_handler)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
