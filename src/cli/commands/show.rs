//! tracereverse show - Show one project

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::catalog::Project;
use crate::cli::output::{HumanLayout, emit_human};
use crate::error::Result;
use crate::search::{Classification, classify};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Project slug
    pub slug: String,
}

#[derive(Serialize)]
struct ShowPayload<'a> {
    project: &'a Project,
    classification: &'a Classification,
    completed: bool,
    bookmarked: bool,
    progress: Option<u8>,
}

pub fn run(ctx: &AppContext, args: &ShowArgs) -> Result<()> {
    let project = ctx.catalog.require(&args.slug)?;
    let classification = classify(project);
    let state = ctx.library().state()?;

    let payload = ShowPayload {
        project,
        classification: &classification,
        completed: state.completed_projects.contains(&project.slug),
        bookmarked: state.bookmarked_projects.contains(&project.slug),
        progress: state.project_progress.get(&project.slug).copied(),
    };

    if ctx.robot_mode() {
        return super::emit(ctx, &payload);
    }

    let mut layout = HumanLayout::new();
    layout
        .title(&project.title)
        .push_line(project.tagline.clone())
        .blank()
        .kv("Slug", &project.slug)
        .kv("Stack", &project.stack.join(", "))
        .kv("Difficulty", classification.difficulty.as_str())
        .kv("Duration", classification.duration.as_str())
        .kv("Category", classification.category.label())
        .kv("Complexity", &classification.stack_complexity.to_string())
        .kv("Est. hours", &format!("{:.1}", classification.estimated_hours));
    if let Some(time) = &project.estimated_time {
        layout.kv("Authored time", time);
    }
    if !project.github.is_empty() {
        layout.kv("GitHub", &project.github);
    }
    layout
        .kv("Completed", yes_no(payload.completed))
        .kv("Bookmarked", yes_no(payload.bookmarked));
    if let Some(percent) = payload.progress {
        layout.kv("Progress", &format!("{percent}%"));
    }

    if !project.description.is_empty() {
        layout.blank().section("Description").push_line(project.description.clone());
    }
    list_section(&mut layout, "Features", &project.features);
    list_section(&mut layout, "Concepts", &project.concepts);
    list_section(&mut layout, "Challenges", &project.challenges);
    if !project.instructions.is_empty() {
        layout.blank().section("Instructions");
        for (i, step) in project.instructions.iter().enumerate() {
            layout.push_line(format!("{}. {step}", i + 1));
        }
    }

    emit_human(layout);
    Ok(())
}

fn list_section(layout: &mut HumanLayout, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    layout.blank().section(title);
    for item in items {
        layout.bullet(item);
    }
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
