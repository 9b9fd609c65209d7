//! Request handlers.
//!
//! GET handlers resolve an [`AppRoute`] and render its view. POST handlers run a mutation
//! through the [`IdeaService`](ideahub_core::IdeaService) and either redirect (303) to the
//! next route or re-render the form with an alert.

use api_shared::{HealthRes, HealthService};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use ideahub_core::{IdeaApi, IdeaDraft, IdeaError, IdeaId, MutationKey, SubmissionId};
use serde::Deserialize;
use utoipa::OpenApi;

use crate::routes::AppRoute;
use crate::views::FormView;
use crate::AppState;

const VALIDATION_ALERT: &str = "Please fill in all fields.";
const PENDING_ALERT: &str = "This idea is already being saved.";
const FAILURE_ALERT: &str = "Something went wrong.";

#[derive(OpenApi)]
#[openapi(
    paths(health),
    components(schemas(
        HealthRes,
        ideahub_core::Idea,
        ideahub_core::IdeaId,
        ideahub_core::NewIdea,
        ideahub_core::IdeaPatch,
    ))
)]
pub struct ApiDoc;

/// Fields posted by the create and edit forms.
#[derive(Debug, Default, Deserialize)]
pub struct IdeaForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
    pub submission_id: Option<String>,
}

impl IdeaForm {
    fn draft(&self) -> IdeaDraft {
        IdeaDraft::new(
            self.title.as_str(),
            self.summary.as_str(),
            self.description.as_str(),
            self.tags.as_str(),
        )
    }
}

/// Maps a failed mutation to the form alert and its status code.
fn mutation_alert(err: &IdeaError) -> (StatusCode, &'static str) {
    match err {
        IdeaError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, VALIDATION_ALERT),
        IdeaError::AlreadyPending(_) => (StatusCode::CONFLICT, PENDING_ALERT),
        IdeaError::NotFound { .. } | IdeaError::Transport(_) | IdeaError::InvalidInput(_) => {
            tracing::error!("idea mutation failed: {err}");
            (StatusCode::BAD_GATEWAY, FAILURE_ALERT)
        }
    }
}

fn form_page<A: IdeaApi>(
    state: &AppState<A>,
    status: StatusCode,
    page: tera::Result<String>,
) -> Response {
    match page {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => state.respond::<Html<String>>(Err(e.into())),
    }
}

pub async fn home<A: IdeaApi>(State(state): State<AppState<A>>) -> Response {
    state.show(AppRoute::Home).await
}

pub async fn ideas<A: IdeaApi>(State(state): State<AppState<A>>) -> Response {
    state.show(AppRoute::Ideas).await
}

pub async fn new_idea<A: IdeaApi>(State(state): State<AppState<A>>) -> Response {
    state.show(AppRoute::NewIdea).await
}

pub async fn idea<A: IdeaApi>(
    State(state): State<AppState<A>>,
    Path(id): Path<String>,
) -> Response {
    state.show(AppRoute::IdeaDetail(IdeaId::new(id))).await
}

pub async fn edit_idea<A: IdeaApi>(
    State(state): State<AppState<A>>,
    Path(id): Path<String>,
) -> Response {
    state.show(AppRoute::EditIdea(IdeaId::new(id))).await
}

pub async fn create_idea<A: IdeaApi>(
    State(state): State<AppState<A>>,
    Form(form): Form<IdeaForm>,
) -> Response {
    let submission = match form.submission_id.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => match SubmissionId::parse(raw) {
            Ok(submission) => submission,
            Err(e) => return state.respond::<Html<String>>(Err(e.into())),
        },
        None => SubmissionId::new(),
    };
    let draft = form.draft();

    match state.ideas.create_idea(submission, &draft).await {
        Ok(_) => Redirect::to(&AppRoute::Ideas.path()).into_response(),
        Err(err) => {
            let (status, alert) = mutation_alert(&err);
            let form = FormView::create(draft, submission, Some(alert));
            form_page(&state, status, state.views.new_idea(&form))
        }
    }
}

pub async fn update_idea<A: IdeaApi>(
    State(state): State<AppState<A>>,
    Path(id): Path<String>,
    Form(form): Form<IdeaForm>,
) -> Response {
    let id = IdeaId::new(id);
    let draft = form.draft();

    match state.ideas.update_idea(&id, &draft).await {
        Ok(idea) => Redirect::to(&AppRoute::IdeaDetail(idea.id).path()).into_response(),
        Err(err) => {
            let (status, alert) = mutation_alert(&err);
            let pending = state
                .ideas
                .mutation_status(&MutationKey::Update(id.clone()))
                .is_pending();
            let form = FormView::edit(&id, draft, pending, Some(alert));
            form_page(&state, status, state.views.edit_idea(&id, &form))
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health("IdeaHub web"))
}

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
