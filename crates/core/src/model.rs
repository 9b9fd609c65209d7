//! Idea records as exchanged with the idea store.
//!
//! Field names on the wire are camelCase. The store may emit ids as JSON strings or
//! integers; both decode to the same opaque [`IdeaId`].

use chrono::{DateTime, Utc};
use ideahub_types::TagList;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Opaque identifier assigned by the idea store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct IdeaId(String);

impl IdeaId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdeaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for IdeaId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for IdeaId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl<'de> Deserialize<'de> for IdeaId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Integer(i64),
        }

        let id = match RawId::deserialize(deserializer)? {
            RawId::Text(s) => s,
            RawId::Integer(n) => n.to_string(),
        };
        if id.is_empty() {
            return Err(serde::de::Error::custom("idea id cannot be empty"));
        }
        Ok(Self(id))
    }
}

/// A persisted idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: IdeaId,
    pub title: String,
    pub summary: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Stamped by the store on create.
    #[serde(default, alias = "createAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Stamped by the client on every update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Create payload. Carries no id and no timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewIdea {
    pub title: String,
    pub summary: String,
    pub description: String,
    #[schema(value_type = Vec<String>)]
    pub tags: TagList,
}

/// Full replacement sent on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdeaPatch {
    pub title: String,
    pub summary: String,
    pub description: String,
    #[schema(value_type = Vec<String>)]
    pub tags: TagList,
    pub updated_at: DateTime<Utc>,
}

impl Idea {
    /// Builds the record a store would hold after accepting `new_idea`.
    pub fn from_new(id: IdeaId, new_idea: NewIdea, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new_idea.title,
            summary: new_idea.summary,
            description: new_idea.description,
            tags: new_idea.tags.to_strings(),
            created_at: Some(created_at),
            updated_at: None,
            user: None,
        }
    }

    /// Replaces every field except `id`, `created_at` and `user`.
    pub fn apply(&mut self, patch: IdeaPatch) {
        self.title = patch.title;
        self.summary = patch.summary;
        self.description = patch.description;
        self.tags = patch.tags.to_strings();
        self.updated_at = Some(patch.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_idea_accepts_integer_id_and_create_at_alias() {
        let json = r#"{
            "id": 7,
            "title": "Solar Kettle",
            "summary": "Boils with sunlight",
            "description": "A kettle with a parabolic mirror.",
            "tags": ["eco", "travel"],
            "createAt": "2024-05-01T10:00:00Z",
            "user": "u-1"
        }"#;

        let idea: Idea = serde_json::from_str(json).unwrap();
        assert_eq!(idea.id.as_str(), "7");
        assert_eq!(idea.tags, vec!["eco", "travel"]);
        assert_eq!(
            idea.created_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(idea.updated_at, None);
        assert_eq!(idea.user.as_deref(), Some("u-1"));
    }

    #[test]
    fn test_idea_tolerates_missing_optional_fields() {
        let json = r#"{"id":"abc","title":"t","summary":"s","description":"d"}"#;
        let idea: Idea = serde_json::from_str(json).unwrap();
        assert!(idea.tags.is_empty());
        assert!(idea.created_at.is_none());
        assert!(idea.user.is_none());
    }

    #[test]
    fn test_idea_rejects_empty_id() {
        let json = r#"{"id":"","title":"t","summary":"s","description":"d"}"#;
        assert!(serde_json::from_str::<Idea>(json).is_err());
    }

    #[test]
    fn test_patch_serializes_camel_case_updated_at() {
        let patch = IdeaPatch {
            title: "t".into(),
            summary: "s".into(),
            description: "d".into(),
            tags: TagList::parse("a, b"),
            updated_at: Utc.with_ymd_and_hms(2024, 6, 2, 8, 30, 0).unwrap(),
        };

        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value["updatedAt"], "2024-06-02T08:30:00Z");
        assert_eq!(value["tags"], serde_json::json!(["a", "b"]));
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_apply_keeps_identity_and_creation_stamp() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut idea = Idea::from_new(
            IdeaId::new("1"),
            NewIdea {
                title: "old".into(),
                summary: "old".into(),
                description: "old".into(),
                tags: TagList::default(),
            },
            created,
        );

        let updated = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        idea.apply(IdeaPatch {
            title: "new".into(),
            summary: "new s".into(),
            description: "new d".into(),
            tags: TagList::parse("x"),
            updated_at: updated,
        });

        assert_eq!(idea.id.as_str(), "1");
        assert_eq!(idea.title, "new");
        assert_eq!(idea.tags, vec!["x"]);
        assert_eq!(idea.created_at, Some(created));
        assert_eq!(idea.updated_at, Some(updated));
    }
}
