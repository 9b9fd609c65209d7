//! HTML views.
//!
//! Templates are embedded at build time and compiled once into a [`Tera`] instance. Every
//! template ends in `.html`, so Tera autoescapes all interpolated values.

use chrono::{DateTime, Utc};
use ideahub_core::{Idea, IdeaDraft, IdeaId, SubmissionId};
use serde::Serialize;
use tera::{Context, Tera};

use crate::routes::{AppRoute, RouteData};

const TEMPLATES: [(&str, &str); 8] = [
    ("base.html", include_str!("../templates/base.html")),
    ("macros.html", include_str!("../templates/macros.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("ideas.html", include_str!("../templates/ideas.html")),
    ("idea.html", include_str!("../templates/idea.html")),
    ("new.html", include_str!("../templates/new.html")),
    ("edit.html", include_str!("../templates/edit.html")),
    ("error.html", include_str!("../templates/error.html")),
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Link-bearing summary shown in the idea list.
#[derive(Debug, Serialize)]
struct IdeaCard<'a> {
    title: &'a str,
    summary: &'a str,
    href: String,
}

#[derive(Debug, Serialize)]
struct IdeaView<'a> {
    title: &'a str,
    summary: &'a str,
    description: &'a str,
    tags: &'a [String],
    created_at: Option<String>,
    updated_at: Option<String>,
    user: Option<&'a str>,
}

impl<'a> IdeaView<'a> {
    fn new(idea: &'a Idea) -> Self {
        let stamp = |t: &Option<DateTime<Utc>>| t.map(|t| t.format(TIMESTAMP_FORMAT).to_string());
        Self {
            title: &idea.title,
            summary: &idea.summary,
            description: &idea.description,
            tags: &idea.tags,
            created_at: stamp(&idea.created_at),
            updated_at: stamp(&idea.updated_at),
            user: idea.user.as_deref(),
        }
    }
}

/// State of a create or edit form as rendered.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    action: String,
    draft: IdeaDraft,
    submission_id: Option<String>,
    alert: Option<String>,
    pending: bool,
    submit_label: &'static str,
    pending_label: &'static str,
}

impl FormView {
    pub fn create(draft: IdeaDraft, submission: SubmissionId, alert: Option<&str>) -> Self {
        Self {
            action: AppRoute::NewIdea.path(),
            draft,
            submission_id: Some(submission.to_string()),
            alert: alert.map(str::to_owned),
            pending: false,
            submit_label: "Create Idea",
            pending_label: "Creating ...",
        }
    }

    pub fn edit(id: &IdeaId, draft: IdeaDraft, pending: bool, alert: Option<&str>) -> Self {
        Self {
            action: AppRoute::EditIdea(id.clone()).path(),
            draft,
            submission_id: None,
            alert: alert.map(str::to_owned),
            pending,
            submit_label: "Update Idea",
            pending_label: "Update pending...",
        }
    }
}

pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())?;
        Ok(Self { tera })
    }

    /// Renders the view bound to a loaded route.
    pub fn page(&self, data: &RouteData) -> tera::Result<String> {
        match data {
            RouteData::Home => self.home(),
            RouteData::Ideas(ideas) => self.ideas(ideas),
            RouteData::Idea(idea) => self.idea(idea),
            RouteData::NewIdea => self.new_idea(&FormView::create(
                IdeaDraft::default(),
                SubmissionId::new(),
                None,
            )),
            RouteData::EditIdea { idea, pending } => self.edit_idea(
                &idea.id,
                &FormView::edit(&idea.id, IdeaDraft::from_idea(idea), *pending, None),
            ),
        }
    }

    pub fn home(&self) -> tera::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("ideas_href", &AppRoute::Ideas.path());
        self.tera.render("home.html", &ctx)
    }

    pub fn ideas(&self, ideas: &[Idea]) -> tera::Result<String> {
        let cards: Vec<IdeaCard<'_>> = ideas
            .iter()
            .map(|idea| IdeaCard {
                title: &idea.title,
                summary: &idea.summary,
                href: AppRoute::IdeaDetail(idea.id.clone()).path(),
            })
            .collect();

        let mut ctx = Context::new();
        ctx.insert("cards", &cards);
        ctx.insert("new_href", &AppRoute::NewIdea.path());
        self.tera.render("ideas.html", &ctx)
    }

    pub fn idea(&self, idea: &Idea) -> tera::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("idea", &IdeaView::new(idea));
        ctx.insert("back_href", &AppRoute::Ideas.path());
        ctx.insert("edit_href", &AppRoute::EditIdea(idea.id.clone()).path());
        self.tera.render("idea.html", &ctx)
    }

    pub fn new_idea(&self, form: &FormView) -> tera::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("form", form);
        self.tera.render("new.html", &ctx)
    }

    pub fn edit_idea(&self, id: &IdeaId, form: &FormView) -> tera::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("form", form);
        ctx.insert("back_href", &AppRoute::IdeaDetail(id.clone()).path());
        self.tera.render("edit.html", &ctx)
    }

    pub fn error(&self, status: u16, message: &str) -> tera::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("status", &status);
        ctx.insert("message", message);
        ctx.insert("back_href", &AppRoute::Ideas.path());
        self.tera.render("error.html", &ctx)
    }
}
