//! tracereverse suggest - Autocomplete titles and technologies

use clap::Args;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Partial query (at least search.suggestion_min_len characters)
    pub query: String,
}

pub fn run(ctx: &AppContext, args: &SuggestArgs) -> Result<()> {
    let suggestions = ctx.engine.suggestions(&args.query);

    if ctx.robot_mode() {
        return super::emit(
            ctx,
            json!({
                "query": args.query,
                "suggestions": suggestions,
            }),
        );
    }

    if suggestions.is_empty() {
        println!("No suggestions for '{}'", args.query);
        return Ok(());
    }
    let mut layout = HumanLayout::new();
    layout.title(&format!("Suggestions for '{}'", args.query));
    for suggestion in &suggestions {
        layout.bullet(suggestion);
    }
    emit_human(layout);
    Ok(())
}
