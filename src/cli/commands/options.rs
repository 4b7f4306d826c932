//! tracereverse options - List filter values

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human};
use crate::error::Result;
use crate::search::SortBy;

#[derive(Args, Debug)]
pub struct OptionsArgs {}

pub fn run(ctx: &AppContext, _args: &OptionsArgs) -> Result<()> {
    let options = ctx.engine.filter_options();

    if ctx.robot_mode() {
        return super::emit(ctx, &options);
    }

    let join = |values: Vec<String>| values.join(", ");
    let mut layout = HumanLayout::new();
    layout
        .title("Filter options")
        .kv(
            "Difficulty",
            &join(options.difficulties.iter().map(ToString::to_string).collect()),
        )
        .kv(
            "Duration",
            &join(options.durations.iter().map(ToString::to_string).collect()),
        )
        .kv(
            "Category",
            &join(options.categories.iter().map(ToString::to_string).collect()),
        )
        .kv(
            "Sort",
            &join(SortBy::ALL.iter().map(ToString::to_string).collect()),
        )
        .blank()
        .section("Stack");
    for tech in &options.all_stacks {
        layout.bullet(tech);
    }
    emit_human(layout);
    Ok(())
}
