//! tracereverse library - Completed and bookmarked projects

use clap::{Args, Subcommand};
use console::style;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct LibraryArgs {
    #[command(subcommand)]
    pub command: LibraryCommand,
}

#[derive(Subcommand, Debug)]
pub enum LibraryCommand {
    /// Mark a project completed
    Complete {
        /// Project slug
        slug: String,
    },

    /// Toggle a bookmark
    Bookmark {
        /// Project slug
        slug: String,
    },

    /// Log minutes studied on a project
    Study {
        /// Project slug
        slug: String,
        /// Minutes to add
        minutes: u64,
    },

    /// Show your library
    Show,
}

pub fn run(ctx: &AppContext, args: &LibraryArgs) -> Result<()> {
    match &args.command {
        LibraryCommand::Complete { slug } => complete(ctx, slug),
        LibraryCommand::Bookmark { slug } => bookmark(ctx, slug),
        LibraryCommand::Study { slug, minutes } => study(ctx, slug, *minutes),
        LibraryCommand::Show => show(ctx),
    }
}

fn complete(ctx: &AppContext, slug: &str) -> Result<()> {
    ctx.catalog.require(slug)?;
    let added = ctx.library().mark_completed(slug)?;

    if ctx.robot_mode() {
        return super::emit(ctx, json!({ "slug": slug, "added": added }));
    }
    if added {
        println!("{} Completed '{}'", style("✓").green().bold(), style(slug).cyan());
    } else {
        println!("{} '{}' was already completed", style("!").yellow(), style(slug).cyan());
    }
    Ok(())
}

fn bookmark(ctx: &AppContext, slug: &str) -> Result<()> {
    ctx.catalog.require(slug)?;
    let bookmarked = ctx.library().toggle_bookmark(slug)?;

    if ctx.robot_mode() {
        return super::emit(ctx, json!({ "slug": slug, "bookmarked": bookmarked }));
    }
    let verb = if bookmarked { "Bookmarked" } else { "Removed bookmark for" };
    println!("{} {verb} '{}'", style("✓").green().bold(), style(slug).cyan());
    Ok(())
}

fn study(ctx: &AppContext, slug: &str, minutes: u64) -> Result<()> {
    ctx.catalog.require(slug)?;
    let total = ctx.library().add_study_time(slug, minutes)?;

    if ctx.robot_mode() {
        return super::emit(ctx, json!({ "slug": slug, "total_minutes": total }));
    }
    println!("{} {total} min on '{}'", style("✓").green().bold(), style(slug).cyan());
    Ok(())
}

fn show(ctx: &AppContext) -> Result<()> {
    let state = ctx.library().state()?;

    if ctx.robot_mode() {
        return super::emit(ctx, &state);
    }

    let title_of = |slug: &String| {
        ctx.catalog
            .get(slug)
            .map_or_else(|| slug.clone(), |p| format!("{} ({slug})", p.title))
    };

    let mut layout = HumanLayout::new();
    layout
        .title(&format!("Library for {}", ctx.user_id))
        .kv("Level", &state.level.to_string())
        .kv("XP", &state.xp.to_string())
        .kv("Streak", &format!("{} days", state.streak));
    if let Some(current) = &state.current_project {
        layout.kv("Current", &title_of(current));
    }

    layout.blank().section("Completed");
    for slug in &state.completed_projects {
        layout.bullet(&title_of(slug));
    }
    layout.blank().section("Bookmarked");
    for slug in &state.bookmarked_projects {
        layout.bullet(&title_of(slug));
    }
    layout.blank().section("Achievements");
    for a in &state.achievements {
        let mark = if a.completed { "x" } else { " " };
        layout.push_line(format!(
            "[{mark}] {} {}/{} ({} xp)",
            a.title, a.progress, a.max_progress, a.reward_xp
        ));
    }
    emit_human(layout);
    Ok(())
}
