//! # IdeaHub Web
//!
//! Server-rendered frontend for IdeaHub.
//!
//! Handles:
//! - URL routing and per-route data loading through [`IdeaService`]
//! - HTML rendering with tera
//! - create/edit forms and redirect-after-mutation
//! - the top-level error page
//!
//! Uses `api-shared` for the health check and `ideahub-core` for everything idea-related.

#![warn(rust_2018_idioms)]

use std::sync::Arc;

use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use ideahub_core::{IdeaApi, IdeaService};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod routes;
pub mod views;

pub use error::{WebError, WebResult};
pub use routes::{AppRoute, RouteData};
pub use views::Views;

/// Shared state for all request handlers.
pub struct AppState<A> {
    pub ideas: IdeaService<A>,
    pub views: Arc<Views>,
}

impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            ideas: self.ideas.clone(),
            views: Arc::clone(&self.views),
        }
    }
}

impl<A: IdeaApi> AppState<A> {
    pub fn new(ideas: IdeaService<A>) -> Result<Self, tera::Error> {
        Ok(Self {
            ideas,
            views: Arc::new(Views::new()?),
        })
    }

    /// Runs the route's loader and renders its view.
    pub async fn show(&self, route: AppRoute) -> Response {
        let page = match route.load(&self.ideas).await {
            Ok(data) => self.views.page(&data).map(Html).map_err(WebError::from),
            Err(e) => Err(e.into()),
        };
        self.respond(page)
    }

    /// Error boundary: failures become the HTML error page with the matching status.
    pub fn respond<R: IntoResponse>(&self, result: WebResult<R>) -> Response {
        match result {
            Ok(ok) => ok.into_response(),
            Err(err) => {
                let status = err.status();
                if status.is_server_error() {
                    tracing::error!("request failed: {err}");
                } else {
                    tracing::debug!("request failed: {err}");
                }
                match self.views.error(status.as_u16(), &err.message()) {
                    Ok(html) => (status, Html(html)).into_response(),
                    Err(render) => {
                        tracing::error!("error page rendering failed: {render}");
                        err.into_response()
                    }
                }
            }
        }
    }
}

/// Builds the application router.
pub fn router<A: IdeaApi>(state: AppState<A>) -> Router {
    Router::new()
        .route("/", get(handlers::home::<A>))
        .route("/ideas", get(handlers::ideas::<A>))
        .route(
            "/ideas/new",
            get(handlers::new_idea::<A>).post(handlers::create_idea::<A>),
        )
        .route("/ideas/:id", get(handlers::idea::<A>))
        .route(
            "/ideas/:id/edit",
            get(handlers::edit_idea::<A>).post(handlers::update_idea::<A>),
        )
        .route("/health", get(handlers::health))
        .route("/api-docs/openapi.json", get(handlers::openapi))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
