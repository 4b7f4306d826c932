//! tracereverse paths - Learning paths
//!
//! Paths are curated project sequences. Starting a path records progress for
//! the current `--user`; completing a project on a path advances it.

use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human};
use crate::error::Result;
use crate::paths::{LearningPath, LearningProgress};

#[derive(Args, Debug)]
pub struct PathsArgs {
    #[command(subcommand)]
    pub command: PathsCommand,
}

#[derive(Subcommand, Debug)]
pub enum PathsCommand {
    /// List all learning paths with your completion
    List,

    /// Show a learning path
    Show {
        /// Path id
        id: String,
    },

    /// Start following a learning path
    Start {
        /// Path id
        id: String,
    },

    /// Record a finished project on a path you follow
    Complete {
        /// Path id
        id: String,
        /// Project slug
        slug: String,
    },

    /// Paths you have not started, easiest first. Paths with prerequisites
    /// appear once you have completed a project
    Recommend,
}

#[derive(Serialize)]
struct PathSummary<'a> {
    #[serde(flatten)]
    path: &'a LearningPath,
    completion_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    progress: Option<LearningProgress>,
}

pub fn run(ctx: &AppContext, args: &PathsArgs) -> Result<()> {
    match &args.command {
        PathsCommand::List => list(ctx),
        PathsCommand::Show { id } => show(ctx, id),
        PathsCommand::Start { id } => start(ctx, id),
        PathsCommand::Complete { id, slug } => complete(ctx, id, slug),
        PathsCommand::Recommend => recommend(ctx),
    }
}

fn summary<'a>(ctx: &AppContext, path: &'a LearningPath) -> Result<PathSummary<'a>> {
    let manager = ctx.path_manager();
    let progress = manager
        .path_progress(&ctx.user_id)?
        .into_iter()
        .find(|p| p.path_id == path.id);
    Ok(PathSummary {
        path,
        completion_percent: manager.completion_percent(&ctx.user_id, &path.id)?,
        progress,
    })
}

fn list(ctx: &AppContext) -> Result<()> {
    let summaries = ctx
        .paths
        .paths()
        .iter()
        .map(|path| summary(ctx, path))
        .collect::<Result<Vec<_>>>()?;

    if ctx.robot_mode() {
        return super::emit(ctx, &summaries);
    }

    let mut layout = HumanLayout::new();
    layout.title("Learning paths");
    for s in &summaries {
        let marker = if s.progress.is_some() {
            format!(" {}", style(format!("{:.0}%", s.completion_percent)).green())
        } else {
            String::new()
        };
        layout.push_line(format!(
            "{} {} [{}, {}]{marker}",
            style(&s.path.id).bold(),
            s.path.title,
            s.path.difficulty,
            s.path.estimated_time,
        ));
    }
    emit_human(layout);
    Ok(())
}

fn show(ctx: &AppContext, id: &str) -> Result<()> {
    let path = ctx.paths.require(id)?;
    let summary = summary(ctx, path)?;

    if ctx.robot_mode() {
        return super::emit(ctx, &summary);
    }

    let completed: &[String] = summary
        .progress
        .as_ref()
        .map(|p| p.completed_projects.as_slice())
        .unwrap_or_default();

    let mut layout = HumanLayout::new();
    layout
        .title(&path.title)
        .push_line(path.description.clone())
        .blank()
        .kv("Id", &path.id)
        .kv("Difficulty", path.difficulty.as_str())
        .kv("Estimated time", &path.estimated_time)
        .kv("Skills", &path.skills.join(", "));
    if !path.prerequisites.is_empty() {
        layout.kv("Prerequisites", &path.prerequisites.join(", "));
    }
    if summary.progress.is_some() {
        layout.kv("Completion", &format!("{:.0}%", summary.completion_percent));
    }

    layout.blank().section("Projects");
    for (i, slug) in path.projects.iter().enumerate() {
        let title = ctx.catalog.get(slug).map_or(slug.as_str(), |p| p.title.as_str());
        let check = if completed.contains(slug) { "x" } else { " " };
        layout.push_line(format!("{}. [{check}] {title} ({slug})", i + 1));
    }

    layout.blank().section("Objectives");
    for objective in &path.learning_objectives {
        layout.bullet(objective);
    }
    if let Some(cert) = &path.certification {
        layout.blank().section(&format!("Certification: {}", cert.name));
        for requirement in &cert.requirements {
            layout.bullet(requirement);
        }
    }
    emit_human(layout);
    Ok(())
}

fn start(ctx: &AppContext, id: &str) -> Result<()> {
    let progress = ctx.path_manager().start_path(id, &ctx.user_id)?;

    if ctx.robot_mode() {
        return super::emit(ctx, &progress);
    }
    println!(
        "{} Following '{}' since {}",
        style("✓").green().bold(),
        style(id).cyan(),
        progress.started_at.format("%Y-%m-%d")
    );
    Ok(())
}

fn complete(ctx: &AppContext, id: &str, slug: &str) -> Result<()> {
    ctx.paths.require(id)?;
    let manager = ctx.path_manager();
    let changed = manager.complete_project(&ctx.user_id, id, slug)?;
    let percent = manager.completion_percent(&ctx.user_id, id)?;

    if ctx.robot_mode() {
        return super::emit(
            ctx,
            json!({
                "path_id": id,
                "slug": slug,
                "changed": changed,
                "completion_percent": percent,
            }),
        );
    }
    if changed {
        println!(
            "{} '{}' done on '{}' ({percent:.0}% complete)",
            style("✓").green().bold(),
            style(slug).cyan(),
            id
        );
    } else {
        println!(
            "{} nothing recorded: '{}' is already done or '{}' is not started",
            style("!").yellow(),
            slug,
            id
        );
    }
    Ok(())
}

fn recommend(ctx: &AppContext) -> Result<()> {
    let library = ctx.library().snapshot()?;
    let manager = ctx.path_manager();
    let paths = manager.recommendations(&ctx.user_id, &library)?;

    if ctx.robot_mode() {
        return super::emit(ctx, &paths);
    }
    if paths.is_empty() {
        println!("You have started every learning path.");
        return Ok(());
    }
    let mut layout = HumanLayout::new();
    layout.title("Recommended paths");
    for path in paths {
        layout.bullet(&format!("{} ({}) {}", path.title, path.difficulty, path.id));
    }
    emit_human(layout);
    Ok(())
}
