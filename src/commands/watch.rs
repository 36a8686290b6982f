use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use regen::{
    CommandPipeline, JsonEventSink, RegenError, WatchEvent, WatchEventSink, WatchOptions,
    WatchUseCase,
};

use crate::cli::{BuildArgs, ColorWhen};
use crate::ui::context::UiContext;
use crate::ui::views::watch::{render_watch_event, render_watch_summary, Stream};

pub fn cmd_watch(
    args: &BuildArgs,
    json: bool,
    verbose: u8,
    color: Option<ColorWhen>,
) -> Result<()> {
    let prepared = super::prepare(args, json, verbose, color)?;
    let options = WatchOptions::from(prepared.options).with_debounce(prepared.debounce);

    // Set up Ctrl+C handler
    let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| RegenError::Signal(e.to_string()))?;

    let sink: Arc<dyn WatchEventSink> = if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::new(prepared.ui))
    };

    let use_case = WatchUseCase::new(options, Arc::new(CommandPipeline::new()));
    let summary = use_case.start(shutdown_rx, sink)?;

    if verbose > 0 && !json {
        println!(
            "{}",
            render_watch_summary(&summary, prepared.ui.color, prepared.ui.unicode)
        );
    }
    Ok(())
}

/// Human-readable log lines on stdout, failures on stderr
struct ConsoleEventSink {
    ui: UiContext,
    /// Keeps lines from the worker and the watch loop whole
    write: Mutex<()>,
}

impl ConsoleEventSink {
    fn new(ui: UiContext) -> Self {
        Self {
            ui,
            write: Mutex::new(()),
        }
    }
}

impl WatchEventSink for ConsoleEventSink {
    fn on_event(&self, event: WatchEvent) {
        let Some((stream, line)) =
            render_watch_event(&event, self.ui.verbose, self.ui.color, self.ui.unicode)
        else {
            return;
        };

        let _guard = self.write.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = match stream {
            Stream::Stdout => {
                let mut out = io::stdout().lock();
                writeln!(out, "{line}").and_then(|()| out.flush())
            }
            Stream::Stderr => writeln!(io::stderr().lock(), "{line}"),
        };
    }
}
