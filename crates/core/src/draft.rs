//! Form state for creating and editing ideas.
//!
//! A draft is one immutable value per form. Every edit produces a new draft, so validation
//! and payload building are pure functions of a single value.

use chrono::{DateTime, Utc};
use ideahub_types::{NonEmptyText, TagList};
use serde::{Deserialize, Serialize};

use crate::error::{DraftField, ValidationError};
use crate::model::{Idea, IdeaPatch, NewIdea};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaDraft {
    pub title: String,
    pub summary: String,
    pub description: String,
    /// Raw comma-separated tag text as typed.
    pub tags: String,
}

impl IdeaDraft {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        description: impl Into<String>,
        tags: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            description: description.into(),
            tags: tags.into(),
        }
    }

    /// Seeds an edit form from a stored idea.
    pub fn from_idea(idea: &Idea) -> Self {
        Self {
            title: idea.title.clone(),
            summary: idea.summary.clone(),
            description: idea.description.clone(),
            tags: TagList::join(&idea.tags),
        }
    }

    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Summary => &self.summary,
            DraftField::Description => &self.description,
            DraftField::Tags => &self.tags,
        }
    }

    /// Returns a new draft with `field` replaced.
    pub fn with(self, field: DraftField, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            DraftField::Title => Self { title: value, ..self },
            DraftField::Summary => Self {
                summary: value,
                ..self
            },
            DraftField::Description => Self {
                description: value,
                ..self
            },
            DraftField::Tags => Self { tags: value, ..self },
        }
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with(DraftField::Title, title)
    }

    pub fn with_summary(self, summary: impl Into<String>) -> Self {
        self.with(DraftField::Summary, summary)
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        self.with(DraftField::Description, description)
    }

    pub fn with_tags(self, tags: impl Into<String>) -> Self {
        self.with(DraftField::Tags, tags)
    }

    pub fn tag_list(&self) -> TagList {
        TagList::parse(&self.tags)
    }

    /// Required fields that are empty after trimming, in form order.
    pub fn missing_fields(&self) -> Vec<DraftField> {
        DraftField::REQUIRED
            .into_iter()
            .filter(|field| !NonEmptyText::is_valid(self.field(*field)))
            .collect()
    }

    /// Checks the create preconditions and builds the create payload.
    ///
    /// Text is sent as typed; only the emptiness check trims.
    pub fn validate(&self) -> Result<NewIdea, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::EmptyFields(missing));
        }

        Ok(NewIdea {
            title: self.title.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            tags: self.tag_list(),
        })
    }

    /// Builds the update payload. The edit path does not validate.
    pub fn to_patch(&self, updated_at: DateTime<Utc>) -> IdeaPatch {
        IdeaPatch {
            title: self.title.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            tags: self.tag_list(),
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IdeaId;

    fn kettle() -> IdeaDraft {
        IdeaDraft::new(
            "Solar Kettle",
            "Boils with sunlight",
            "A kettle with a parabolic mirror.",
            "eco, travel",
        )
    }

    #[test]
    fn test_validate_builds_payload_with_parsed_tags() {
        let new_idea = kettle().validate().expect("draft should be valid");
        assert_eq!(new_idea.title, "Solar Kettle");
        assert_eq!(new_idea.summary, "Boils with sunlight");
        assert_eq!(new_idea.tags.to_strings(), vec!["eco", "travel"]);
    }

    #[test]
    fn test_validate_reports_every_blank_required_field() {
        let draft = kettle().with_title("   ").with_description("");
        let err = draft.validate().expect_err("blank fields should be rejected");
        assert_eq!(
            err,
            ValidationError::EmptyFields(vec![DraftField::Title, DraftField::Description])
        );
    }

    #[test]
    fn test_validate_allows_empty_tags() {
        let new_idea = kettle().with_tags(" , ").validate().unwrap();
        assert!(new_idea.tags.is_empty());
    }

    #[test]
    fn test_validate_sends_text_as_typed() {
        let new_idea = kettle().with_title("  Padded  ").validate().unwrap();
        assert_eq!(new_idea.title, "  Padded  ");
    }

    #[test]
    fn test_with_replaces_one_field_only() {
        let original = kettle();
        let edited = original.clone().with(DraftField::Summary, "Boils faster");
        assert_eq!(edited.summary, "Boils faster");
        assert_eq!(edited.title, original.title);
        assert_eq!(edited.tags, original.tags);
        assert_eq!(original.summary, "Boils with sunlight");
    }

    #[test]
    fn test_from_idea_joins_tags() {
        let idea = Idea {
            id: IdeaId::new("1"),
            title: "t".into(),
            summary: "s".into(),
            description: "d".into(),
            tags: vec!["eco".into(), "travel".into()],
            created_at: None,
            updated_at: None,
            user: None,
        };

        let draft = IdeaDraft::from_idea(&idea);
        assert_eq!(draft.tags, "eco, travel");
        assert_eq!(draft.tag_list().to_strings(), idea.tags);
    }

    #[test]
    fn test_to_patch_skips_validation() {
        let now = Utc::now();
        let patch = IdeaDraft::default().with_tags("a,,b").to_patch(now);
        assert_eq!(patch.title, "");
        assert_eq!(patch.tags.to_strings(), vec!["a", "b"]);
        assert_eq!(patch.updated_at, now);
    }
}
