use crate::model::IdeaId;

/// Required draft fields that can be reported as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Title,
    Summary,
    Description,
    Tags,
}

impl DraftField {
    pub const REQUIRED: [DraftField; 3] =
        [DraftField::Title, DraftField::Summary, DraftField::Description];

    pub fn as_str(self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Summary => "summary",
            DraftField::Description => "description",
            DraftField::Tags => "tags",
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-side rejection of a draft. Raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("required fields are empty: {}", join_fields(.0))]
    EmptyFields(Vec<DraftField>),
}

impl ValidationError {
    pub fn fields(&self) -> &[DraftField] {
        match self {
            ValidationError::EmptyFields(fields) => fields,
        }
    }
}

fn join_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum IdeaError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("idea not found: {id}")]
    NotFound { id: IdeaId },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("{0} is already pending")]
    AlreadyPending(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl IdeaError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, IdeaError::NotFound { .. })
    }
}

impl From<reqwest::Error> for IdeaError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            IdeaError::Transport("request timed out".into())
        } else if e.is_decode() {
            IdeaError::Transport(format!("invalid response body: {e}"))
        } else {
            IdeaError::Transport(e.to_string())
        }
    }
}

pub type IdeaResult<T> = std::result::Result<T, IdeaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_fields_in_order() {
        let err = ValidationError::EmptyFields(vec![DraftField::Title, DraftField::Description]);
        assert_eq!(err.to_string(), "required fields are empty: title, description");
        assert_eq!(err.fields(), &[DraftField::Title, DraftField::Description]);
    }

    #[test]
    fn test_not_found_mentions_id() {
        let err = IdeaError::NotFound {
            id: IdeaId::new("42"),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "idea not found: 42");
    }
}
