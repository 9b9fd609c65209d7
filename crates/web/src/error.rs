use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ideahub_core::IdeaError;

/// Failure of a page request that is not handled by the page itself.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error(transparent)]
    Idea(#[from] IdeaError),
    #[error("template rendering failed: {0}")]
    Render(#[from] tera::Error),
}

pub type WebResult<T> = std::result::Result<T, WebError>;

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Idea(IdeaError::NotFound { .. }) => StatusCode::NOT_FOUND,
            WebError::Idea(IdeaError::Transport(_)) => StatusCode::BAD_GATEWAY,
            WebError::Idea(IdeaError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            WebError::Idea(_) | WebError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown on the error page.
    pub fn message(&self) -> String {
        match self {
            WebError::Idea(IdeaError::NotFound { .. }) => "Idea not found.".into(),
            WebError::Idea(IdeaError::Transport(_)) => {
                "The idea service could not be reached.".into()
            }
            WebError::Idea(IdeaError::InvalidInput(msg)) => msg.clone(),
            WebError::Idea(_) | WebError::Render(_) => "Something went wrong.".into(),
        }
    }
}

/// Plain-text rendering, used when the HTML error page itself cannot be rendered.
impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}
