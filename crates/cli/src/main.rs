use clap::{Parser, Subcommand};
use ideahub_core::config::{api_url_from_env_value, secs_from_env_value};
use ideahub_core::constants::DEFAULT_REQUEST_TIMEOUT;
use ideahub_core::{
    CoreConfig, HttpIdeaApi, Idea, IdeaDraft, IdeaId, IdeaService, SubmissionId,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ideahub")]
#[command(about = "Browse, create and edit IdeaHub ideas")]
struct Cli {
    /// Base URL of the idea API
    #[arg(long, global = true, env = "IDEAHUB_API_URL")]
    api_url: Option<String>,
    /// Request timeout in seconds
    #[arg(long, global = true, env = "IDEAHUB_REQUEST_TIMEOUT_SECS")]
    timeout_secs: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all ideas
    List,
    /// Show one idea
    Show {
        /// Idea id
        id: String,
    },
    /// Create an idea
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        summary: String,
        #[arg(long)]
        description: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Edit an idea; fields not given keep their current value
    Edit {
        /// Idea id
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated tags, replacing the current ones
        #[arg(long)]
        tags: Option<String>,
    },
}

fn list_line(idea: &Idea) -> String {
    format!("{}\t{}\t{}", idea.id, idea.title, idea.summary)
}

fn details(idea: &Idea) -> String {
    let mut out = format!(
        "ID: {}\nTitle: {}\nSummary: {}\nDescription: {}\nTags: {}",
        idea.id,
        idea.title,
        idea.summary,
        idea.description,
        idea.tags.join(", ")
    );
    if let Some(user) = &idea.user {
        out.push_str(&format!("\nUser: {user}"));
    }
    if let Some(created_at) = idea.created_at {
        out.push_str(&format!("\nCreated: {}", created_at.to_rfc3339()));
    }
    if let Some(updated_at) = idea.updated_at {
        out.push_str(&format!("\nUpdated: {}", updated_at.to_rfc3339()));
    }
    out
}

/// Applies the fields given on the command line over the current values.
fn edited_draft(
    current: &Idea,
    title: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    tags: Option<String>,
) -> IdeaDraft {
    let mut draft = IdeaDraft::from_idea(current);
    if let Some(title) = title {
        draft = draft.with_title(title);
    }
    if let Some(summary) = summary {
        draft = draft.with_summary(summary);
    }
    if let Some(description) = description {
        draft = draft.with_description(description);
    }
    if let Some(tags) = tags {
        draft = draft.with_tags(tags);
    }
    draft
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ideahub=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let api_url = api_url_from_env_value(cli.api_url)?;
    let timeout = secs_from_env_value("IDEAHUB_REQUEST_TIMEOUT_SECS", cli.timeout_secs)?
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
    let cfg = CoreConfig::new(api_url, timeout, None)?;
    let ideas = IdeaService::new(HttpIdeaApi::new(&cfg)?, &cfg);

    match cli.command {
        Commands::List => {
            let all = ideas.ensure_ideas().await?;
            if all.is_empty() {
                println!("No ideas found.");
            }
            for idea in &all {
                println!("{}", list_line(idea));
            }
        }
        Commands::Show { id } => {
            let idea = ideas.ensure_idea(&IdeaId::new(id)).await?;
            println!("{}", details(&idea));
        }
        Commands::Create {
            title,
            summary,
            description,
            tags,
        } => {
            let draft = IdeaDraft::new(title, summary, description, tags);
            let idea = ideas.create_idea(SubmissionId::new(), &draft).await?;
            println!("Created idea with ID: {}", idea.id);
        }
        Commands::Edit {
            id,
            title,
            summary,
            description,
            tags,
        } => {
            let id = IdeaId::new(id);
            let current = ideas.ensure_idea(&id).await?;
            let draft = edited_draft(&current, title, summary, description, tags);
            let idea = ideas.update_idea(&id, &draft).await?;
            println!("Updated idea with ID: {}", idea.id);
        }
    }

    Ok(())
}
