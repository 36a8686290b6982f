//! CLI Argument Parsing
//!
//! Global flags (--json, --color, --verbose) are inherited by all subcommands.
//! `generate` and `watch` take exactly the same build options.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Regen - run a build command, then rebuild on every change
#[derive(Parser, Debug)]
#[command(name = "regen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output NDJSON events (for CI and editor integrations)
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the build once
    Generate(BuildArgs),

    /// Build, then rebuild whenever the input directory changes
    Watch(BuildArgs),
}

/// Options shared by `generate` and `watch`
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildArgs {
    /// Input directory [config: paths.input, default: .]
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Output directory [config: paths.output, default: dist]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Config file [default: ./regen.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Capture build output instead of printing it
    #[arg(long)]
    pub quiet: bool,

    /// Extra environment for the build command
    #[arg(short = 'e', long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,

    /// Build command; `{input}` and `{output}` are substituted [config: pipeline.command]
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_generate_defaults() {
        let cli = Cli::try_parse_from(["regen", "generate"]).unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("Expected Generate command");
        };
        assert_eq!(args, BuildArgs::default());
    }

    #[test]
    fn test_cli_parse_watch_with_args() {
        let cli = Cli::try_parse_from([
            "regen", "watch", "-i", "content", "--output", "public", "--", "zola", "build",
            "--output-dir", "{output}",
        ])
        .unwrap();

        let Commands::Watch(args) = cli.command else {
            panic!("Expected Watch command");
        };
        assert_eq!(args.input, Some(PathBuf::from("content")));
        assert_eq!(args.output, Some(PathBuf::from("public")));
        assert_eq!(args.command, vec!["zola", "build", "--output-dir", "{output}"]);
    }

    #[test]
    fn test_cli_env_pairs() {
        let cli = Cli::try_parse_from([
            "regen", "generate", "-e", "SITE_ENV=dev", "--env", "EMPTY=",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("Expected Generate command");
        };
        assert_eq!(
            args.env,
            vec![
                ("SITE_ENV".to_string(), "dev".to_string()),
                ("EMPTY".to_string(), String::new())
            ]
        );
    }

    #[test]
    fn test_cli_rejects_malformed_env() {
        assert!(Cli::try_parse_from(["regen", "generate", "-e", "NOEQUALS"]).is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["regen", "watch", "--json", "-vv", "--color", "never"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.color, Some(ColorWhen::Never));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["regen"]).is_err());
    }
}
