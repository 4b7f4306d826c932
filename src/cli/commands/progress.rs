//! tracereverse progress - Track work on individual projects

use chrono::Utc;
use clap::{Args, Subcommand};
use console::style;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human};
use crate::error::Result;
use crate::progress::{ProgressEntry, ProgressUpdate};

#[derive(Args, Debug)]
pub struct ProgressArgs {
    #[command(subcommand)]
    pub command: ProgressCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProgressCommand {
    /// Start working on a project
    Start {
        /// Project slug
        slug: String,

        /// Number of steps (defaults to the project's instruction count)
        #[arg(long)]
        steps: Option<u32>,
    },

    /// Record the current step and total minutes spent
    Update {
        /// Progress entry id
        entry: String,

        #[arg(long)]
        step: Option<i32>,

        /// Total minutes spent so far
        #[arg(long)]
        minutes: Option<u64>,
    },

    /// Attach a note to an entry
    Note {
        /// Progress entry id
        entry: String,
        /// Note text
        text: String,
    },

    /// Mark an entry finished
    Complete {
        /// Progress entry id
        entry: String,

        /// Rating from 1 to 5
        #[arg(long, short)]
        rating: u8,
    },

    /// List your progress entries
    List,

    /// Learning statistics
    Stats,
}

pub fn run(ctx: &AppContext, args: &ProgressArgs) -> Result<()> {
    match &args.command {
        ProgressCommand::Start { slug, steps } => start(ctx, slug, *steps),
        ProgressCommand::Update {
            entry,
            step,
            minutes,
        } => update(ctx, entry, *step, *minutes),
        ProgressCommand::Note { entry, text } => note(ctx, entry, text),
        ProgressCommand::Complete { entry, rating } => complete(ctx, entry, *rating),
        ProgressCommand::List => list(ctx),
        ProgressCommand::Stats => stats(ctx),
    }
}

fn start(ctx: &AppContext, slug: &str, steps: Option<u32>) -> Result<()> {
    let project = ctx.catalog.require(slug)?;
    let total_steps = steps
        .unwrap_or_else(|| u32::try_from(project.instructions.len()).unwrap_or(u32::MAX));
    let entry = ctx.progress().start_project(slug, &ctx.user_id, total_steps)?;
    ctx.library().set_current_project(Some(slug))?;

    if ctx.robot_mode() {
        return super::emit(ctx, &entry);
    }
    println!(
        "{} Started '{}' ({} steps)\n  entry: {}",
        style("✓").green().bold(),
        style(&project.title).cyan(),
        total_steps,
        entry.id
    );
    Ok(())
}

fn update(ctx: &AppContext, entry_id: &str, step: Option<i32>, minutes: Option<u64>) -> Result<()> {
    let patch = ProgressUpdate {
        current_step: step,
        time_spent: minutes,
        ..ProgressUpdate::default()
    };
    let updated = ctx.progress().update(entry_id, patch)?;

    if ctx.robot_mode() {
        return super::emit(ctx, json!({ "entry": entry_id, "updated": updated }));
    }
    if updated {
        println!("{} Updated {entry_id}", style("✓").green().bold());
    } else {
        println!("{} No entry {entry_id}", style("!").yellow());
    }
    Ok(())
}

fn note(ctx: &AppContext, entry_id: &str, text: &str) -> Result<()> {
    ctx.progress().add_note(entry_id, text)?;

    if ctx.robot_mode() {
        return super::emit(ctx, json!({ "entry": entry_id, "note": text }));
    }
    println!("{} Note added", style("✓").green().bold());
    Ok(())
}

fn complete(ctx: &AppContext, entry_id: &str, rating: u8) -> Result<()> {
    let entry = ctx.progress().complete_project(entry_id, rating)?;
    ctx.library().mark_completed(&entry.project_slug)?;

    if ctx.robot_mode() {
        return super::emit(ctx, &entry);
    }
    println!(
        "{} Completed '{}' rated {}/5",
        style("✓").green().bold(),
        style(&entry.project_slug).cyan(),
        rating
    );
    Ok(())
}

fn list(ctx: &AppContext) -> Result<()> {
    let entries = ctx.progress().entries_for(&ctx.user_id)?;

    if ctx.robot_mode() {
        return super::emit(ctx, &entries);
    }
    if entries.is_empty() {
        println!("No progress recorded for '{}'", ctx.user_id);
        return Ok(());
    }
    let mut layout = HumanLayout::new();
    layout.title("Progress");
    for entry in &entries {
        layout.push_line(describe(entry));
    }
    emit_human(layout);
    Ok(())
}

fn describe(entry: &ProgressEntry) -> String {
    let state = if entry.is_completed() {
        let rating = entry.rating.map_or_else(String::new, |r| format!(" {r}/5"));
        format!("done{rating}")
    } else {
        format!("step {}/{}", entry.current_step, entry.total_steps)
    };
    format!(
        "{} {} [{state}, {} min]",
        style(&entry.project_slug).bold(),
        style(&entry.id).dim(),
        entry.time_spent
    )
}

fn stats(ctx: &AppContext) -> Result<()> {
    let stats = ctx.progress().user_stats(&ctx.user_id, Utc::now())?;

    if ctx.robot_mode() {
        return super::emit(ctx, &stats);
    }

    let skills = stats.skill_progression;
    let mut layout = HumanLayout::new();
    layout
        .title(&format!("Learning stats for {}", ctx.user_id))
        .kv("Projects", &stats.total_projects.to_string())
        .kv("Completed", &stats.completed_projects.to_string())
        .kv("In progress", &stats.in_progress_projects.to_string())
        .kv("Minutes", &stats.total_time_spent.to_string())
        .kv(
            "Avg per project",
            &format!("{:.1}", stats.average_time_per_project),
        )
        .kv("Favorite stack", &stats.favorite_stack.join(", "))
        .kv(
            "Skills",
            &format!(
                "{} beginner, {} intermediate, {} advanced",
                skills.beginner, skills.intermediate, skills.advanced
            ),
        )
        .blank()
        .section("Weekly");
    for week in &stats.weekly_progress {
        layout.kv(
            &week.week,
            &format!("{} completed, {} min", week.projects_completed, week.time_spent),
        );
    }
    emit_human(layout);
    Ok(())
}
