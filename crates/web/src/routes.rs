//! Application routes and their loaders.
//!
//! Each [`AppRoute`] knows its path and the data that must be resolved before its view
//! renders. Loaders go through the [`IdeaService`] caches; their errors are not handled here
//! and propagate to the error page.

use ideahub_core::{Idea, IdeaApi, IdeaId, IdeaResult, IdeaService, MutationKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Home,
    Ideas,
    NewIdea,
    IdeaDetail(IdeaId),
    EditIdea(IdeaId),
}

/// Data resolved by a route's loader.
#[derive(Debug, Clone)]
pub enum RouteData {
    Home,
    Ideas(Vec<Idea>),
    Idea(Idea),
    NewIdea,
    EditIdea { idea: Idea, pending: bool },
}

impl AppRoute {
    pub fn path(&self) -> String {
        match self {
            AppRoute::Home => "/".to_string(),
            AppRoute::Ideas => "/ideas".to_string(),
            AppRoute::NewIdea => "/ideas/new".to_string(),
            AppRoute::IdeaDetail(id) => format!("/ideas/{}", urlencoding::encode(id.as_str())),
            AppRoute::EditIdea(id) => {
                format!("/ideas/{}/edit", urlencoding::encode(id.as_str()))
            }
        }
    }

    pub async fn load<A: IdeaApi>(&self, ideas: &IdeaService<A>) -> IdeaResult<RouteData> {
        match self {
            AppRoute::Home => Ok(RouteData::Home),
            AppRoute::Ideas => ideas.ensure_ideas().await.map(RouteData::Ideas),
            AppRoute::NewIdea => Ok(RouteData::NewIdea),
            AppRoute::IdeaDetail(id) => ideas.ensure_idea(id).await.map(RouteData::Idea),
            AppRoute::EditIdea(id) => {
                let idea = ideas.ensure_idea(id).await?;
                let pending = ideas
                    .mutation_status(&MutationKey::Update(id.clone()))
                    .is_pending();
                Ok(RouteData::EditIdea { idea, pending })
            }
        }
    }
}
