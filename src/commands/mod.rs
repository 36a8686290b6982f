//! Command handlers for the `regen` binary

pub mod generate;
pub mod watch;

use std::time::Duration;

use anyhow::Result;
use regen::config::Config;
use regen::GenerateOptions;

use crate::cli::{BuildArgs, ColorWhen};
use crate::ui::context::UiContext;
use crate::ui::output::print_config_warnings;

/// Everything a build command needs once flags and config are merged
pub struct Prepared {
    pub options: GenerateOptions,
    pub debounce: Duration,
    pub ui: UiContext,
}

/// Merge CLI flags over the discovered config (flags win).
///
/// Relative paths are resolved against the current directory.
pub fn prepare(
    args: &BuildArgs,
    json: bool,
    verbose: u8,
    color: Option<ColorWhen>,
) -> Result<Prepared> {
    let cwd = std::env::current_dir()?;
    let loaded = Config::discover(args.config.as_deref(), &cwd)?;
    if let Some(source) = &loaded.source {
        print_config_warnings(source, &loaded.warnings);
    }
    let config = loaded.config;

    let mut pipeline = config.pipeline_options();
    if !args.command.is_empty() {
        pipeline.command = args.command.clone();
    }
    pipeline.env.extend(args.env.iter().cloned());
    // NDJSON owns stdout
    pipeline.quiet |= args.quiet || json;

    let input = args
        .input
        .clone()
        .unwrap_or_else(|| config.paths.input.clone());
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.paths.output.clone());

    Ok(Prepared {
        options: GenerateOptions::new(input, output).with_pipeline(pipeline),
        debounce: config.debounce(),
        ui: UiContext::new(json, verbose, color, config.output.color),
    })
}
