use std::sync::Arc;

use anyhow::Result;
use regen::{CommandPipeline, GenerateUseCase};

use crate::cli::{BuildArgs, ColorWhen};
use crate::ui::views::generate::{generate_json, render_generate_success};

pub fn cmd_generate(
    args: &BuildArgs,
    json: bool,
    verbose: u8,
    color: Option<ColorWhen>,
) -> Result<()> {
    let prepared = super::prepare(args, json, verbose, color)?;
    let ui = prepared.ui;

    let use_case = GenerateUseCase::new(prepared.options, Arc::new(CommandPipeline::new()));
    let output_dir = use_case.request()?.output_dir.display().to_string();
    let outcome = use_case.execute()?;

    if json {
        println!("{}", generate_json(&output_dir, &outcome));
    } else {
        println!(
            "{}",
            render_generate_success(&output_dir, &outcome, ui.color, ui.unicode)
        );
    }
    Ok(())
}
