//! Command Pipeline
//!
//! Runs an external build command as the full-regeneration routine.
//! `{input}` and `{output}` in the argv are replaced with the request's
//! directories, which are also exported as `REGEN_INPUT_DIR` and
//! `REGEN_OUTPUT_DIR`.
//!
//! In quiet mode only the tail of the build's stderr is kept for the error.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::domain::ports::{GenerationPipeline, PipelineError, PipelineRequest};

pub const INPUT_DIR_ENV: &str = "REGEN_INPUT_DIR";
pub const OUTPUT_DIR_ENV: &str = "REGEN_OUTPUT_DIR";

/// Lines of captured stderr kept for the failure message
const STDERR_TAIL_LINES: usize = 20;
/// Bytes kept of any single stderr line
const STDERR_LINE_MAX: usize = 400;

/// Pipeline backed by an external process
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandPipeline;

impl CommandPipeline {
    pub fn new() -> Self {
        Self
    }

    fn build_command(request: &PipelineRequest) -> Result<Command, PipelineError> {
        let (program, args) = request
            .options
            .command
            .split_first()
            .ok_or(PipelineError::NotConfigured)?;

        let mut cmd = Command::new(substitute(program, request));
        cmd.args(args.iter().map(|arg| substitute(arg, request)))
            .env(INPUT_DIR_ENV, &request.input_dir)
            .env(OUTPUT_DIR_ENV, &request.output_dir)
            .envs(&request.options.env)
            .stdin(Stdio::null());

        if request.options.quiet {
            cmd.stdout(Stdio::null()).stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }
        Ok(cmd)
    }
}

impl GenerationPipeline for CommandPipeline {
    fn run(&self, request: &PipelineRequest) -> Result<(), PipelineError> {
        let mut cmd = Self::build_command(request)?;
        let program = cmd.get_program().to_string_lossy().into_owned();
        let spawn_error = |e: io::Error| PipelineError::Spawn {
            program: program.clone(),
            message: e.to_string(),
        };

        let mut child = cmd.spawn().map_err(spawn_error)?;
        let stderr = child.stderr.take().map(stderr_tail).unwrap_or_default();
        let status = child.wait().map_err(spawn_error)?;

        if !status.success() {
            return Err(PipelineError::Failed {
                code: status.code(),
                stderr,
            });
        }
        Ok(())
    }
}

/// Read `reader` to the end, keeping its last lines, each cut to a bounded length
fn stderr_tail(reader: impl Read) -> String {
    let mut reader = BufReader::new(reader);
    let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES + 1);
    let mut dropped = 0usize;

    loop {
        let mut line = Vec::new();
        match reader
            .by_ref()
            .take(STDERR_LINE_MAX as u64)
            .read_until(b'\n', &mut line)
        {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        if line.len() == STDERR_LINE_MAX && line.last() != Some(&b'\n') {
            if skip_line(&mut reader).is_err() {
                break;
            }
            line.extend_from_slice(b"...");
        }

        tail.push_back(String::from_utf8_lossy(&line).trim_end().to_string());
        if tail.len() > STDERR_TAIL_LINES {
            tail.pop_front();
            dropped += 1;
        }
    }

    let mut lines: Vec<String> = Vec::with_capacity(tail.len() + 1);
    if dropped > 0 {
        lines.push(format!("({dropped} earlier lines omitted)"));
    }
    lines.extend(tail);
    lines.join("\n")
}

fn skip_line(reader: &mut impl BufRead) -> io::Result<()> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(());
        }
        match buf.iter().position(|&b| b == b'\n') {
            Some(i) => {
                reader.consume(i + 1);
                return Ok(());
            }
            None => {
                let n = buf.len();
                reader.consume(n);
            }
        }
    }
}

fn substitute(arg: &str, request: &PipelineRequest) -> String {
    arg.replace("{input}", &display(&request.input_dir))
        .replace("{output}", &display(&request.output_dir))
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
