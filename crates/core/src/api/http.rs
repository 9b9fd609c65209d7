use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::IdeaApi;
use crate::config::CoreConfig;
use crate::constants::IDEAS_RESOURCE;
use crate::model::{Idea, IdeaId, IdeaPatch, NewIdea};
use crate::{IdeaError, IdeaResult};

/// Client for the remote idea store.
///
/// | Intent | Request |
/// |---|---|
/// | list | `GET {base}/ideas` |
/// | fetch | `GET {base}/ideas/{id}` |
/// | create | `POST {base}/ideas` |
/// | update | `PUT {base}/ideas/{id}` |
///
/// A 404 on an id-addressed request is `NotFound`; every other failure is `Transport`.
/// Requests are never retried.
#[derive(Debug, Clone)]
pub struct HttpIdeaApi {
    http: Client,
    base_url: Url,
}

impl HttpIdeaApi {
    pub fn new(cfg: &CoreConfig) -> IdeaResult<Self> {
        let http = Client::builder()
            .timeout(cfg.request_timeout())
            .user_agent(concat!("ideahub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| IdeaError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.api_base_url().clone(),
        })
    }

    fn ideas_url(&self, id: Option<&IdeaId>) -> IdeaResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                IdeaError::InvalidInput(format!(
                    "api base url cannot be a base: {}",
                    self.base_url
                ))
            })?;
            segments.pop_if_empty().push(IDEAS_RESOURCE);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }
}

async fn decode<T: DeserializeOwned>(res: Response, id: Option<&IdeaId>) -> IdeaResult<T> {
    match (res.status(), id) {
        (s, _) if s.is_success() => Ok(res.json::<T>().await?),
        (StatusCode::NOT_FOUND, Some(id)) => Err(IdeaError::NotFound { id: id.clone() }),
        (s, _) => {
            let body = res.text().await.unwrap_or_default();
            Err(IdeaError::Transport(format!("http {}: {}", s.as_u16(), body)))
        }
    }
}

impl IdeaApi for HttpIdeaApi {
    async fn list_ideas(&self) -> IdeaResult<Vec<Idea>> {
        let url = self.ideas_url(None)?;
        debug!(%url, "listing ideas");
        let res = self.http.get(url).send().await?;
        decode(res, None).await
    }

    async fn fetch_idea(&self, id: &IdeaId) -> IdeaResult<Idea> {
        let url = self.ideas_url(Some(id))?;
        debug!(%url, "fetching idea");
        let res = self.http.get(url).send().await?;
        decode(res, Some(id)).await
    }

    async fn create_idea(&self, new_idea: NewIdea) -> IdeaResult<Idea> {
        let url = self.ideas_url(None)?;
        debug!(%url, title = %new_idea.title, "creating idea");
        let res = self.http.post(url).json(&new_idea).send().await?;
        decode(res, None).await
    }

    async fn update_idea(&self, id: &IdeaId, patch: IdeaPatch) -> IdeaResult<Idea> {
        let url = self.ideas_url(Some(id))?;
        debug!(%url, "updating idea");
        let res = self.http.put(url).json(&patch).send().await?;
        decode(res, Some(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::IdeaDraft;
    use axum::{
        extract::Path,
        http::StatusCode as AxumStatus,
        response::{IntoResponse, Json},
        routing::get,
        Router,
    };
    use chrono::Utc;
    use serde_json::{json, Value};

    async fn spawn_store(app: Router) -> HttpIdeaApi {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let url = Url::parse(&format!("http://{addr}/api/")).unwrap();
        HttpIdeaApi::new(&CoreConfig::for_api(url).unwrap()).unwrap()
    }

    async fn fetch_one(Path(id): Path<String>) -> impl IntoResponse {
        if id != "7" {
            return (AxumStatus::NOT_FOUND, Json(json!({ "error": "missing" })));
        }
        (
            AxumStatus::OK,
            Json(json!({
                "id": 7,
                "title": "Solar Kettle",
                "summary": "Boils with sunlight",
                "description": "...",
                "tags": ["eco", "travel"],
                "createAt": "2024-05-01T10:00:00Z"
            })),
        )
    }

    async fn update_one(Path(id): Path<String>, Json(body): Json<Value>) -> impl IntoResponse {
        if id != "7" {
            return (AxumStatus::NOT_FOUND, Json(json!({})));
        }
        let mut record = body;
        record["id"] = json!(id);
        (AxumStatus::OK, Json(record))
    }

    async fn create(Json(body): Json<Value>) -> impl IntoResponse {
        let mut record = body;
        record["id"] = json!("new-1");
        record["createdAt"] = json!("2024-05-02T09:00:00Z");
        (AxumStatus::CREATED, Json(record))
    }

    async fn broken_list() -> impl IntoResponse {
        (AxumStatus::INTERNAL_SERVER_ERROR, "boom")
    }

    fn store() -> Router {
        Router::new()
            .route("/api/ideas", get(broken_list).post(create))
            .route("/api/ideas/:id", get(fetch_one).put(update_one))
    }

    #[tokio::test]
    async fn test_fetch_idea_decodes_integer_id() {
        let api = spawn_store(store()).await;
        let idea = api.fetch_idea(&IdeaId::new("7")).await.unwrap();
        assert_eq!(idea.id.as_str(), "7");
        assert_eq!(idea.tags, vec!["eco", "travel"]);
        assert!(idea.created_at.is_some());
    }

    #[tokio::test]
    async fn test_fetch_idea_maps_404_to_not_found() {
        let api = spawn_store(store()).await;
        let err = api.fetch_idea(&IdeaId::new("nope")).await.unwrap_err();
        assert!(matches!(err, IdeaError::NotFound { id } if id.as_str() == "nope"));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_transport() {
        let api = spawn_store(store()).await;
        let err = api.list_ideas().await.unwrap_err();
        assert!(matches!(err, IdeaError::Transport(msg) if msg.contains("500") && msg.contains("boom")));
    }

    #[tokio::test]
    async fn test_create_posts_payload_and_returns_assigned_id() {
        let api = spawn_store(store()).await;
        let new_idea = IdeaDraft::new("Solar Kettle", "Boils with sunlight", "...", "eco, travel")
            .validate()
            .unwrap();

        let idea = api.create_idea(new_idea).await.unwrap();
        assert_eq!(idea.id.as_str(), "new-1");
        assert_eq!(idea.title, "Solar Kettle");
        assert_eq!(idea.tags, vec!["eco", "travel"]);
    }

    #[tokio::test]
    async fn test_update_puts_patch() {
        let api = spawn_store(store()).await;
        let now = Utc::now();
        let patch = IdeaDraft::new("t", "s", "d", "x, y").to_patch(now);

        let idea = api.update_idea(&IdeaId::new("7"), patch.clone()).await.unwrap();
        assert_eq!(idea.title, "t");
        assert_eq!(idea.updated_at, Some(now));

        let err = api.update_idea(&IdeaId::new("8"), patch).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unreachable_store_is_transport_error() {
        let url = Url::parse("http://127.0.0.1:9/api").unwrap();
        let api = HttpIdeaApi::new(&CoreConfig::for_api(url).unwrap()).unwrap();
        let err = api.fetch_idea(&IdeaId::new("1")).await.unwrap_err();
        assert!(matches!(err, IdeaError::Transport(_)));
    }

    #[test]
    fn test_ideas_url_escapes_id_segment() {
        let url = Url::parse("http://store.example/api").unwrap();
        let api = HttpIdeaApi::new(&CoreConfig::for_api(url).unwrap()).unwrap();
        assert_eq!(
            api.ideas_url(None).unwrap().as_str(),
            "http://store.example/api/ideas"
        );
        assert_eq!(
            api.ideas_url(Some(&IdeaId::new("a/b"))).unwrap().as_str(),
            "http://store.example/api/ideas/a%2Fb"
        );
    }
}
