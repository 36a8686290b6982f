use regen::{ChangeKind, RebuildTrigger, WatchEvent, WatchSummary};

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Timestamp format for change lines
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Render one watch event as a terminal line, or `None` if it is not shown
/// at this verbosity.
pub fn render_watch_event(
    event: &WatchEvent,
    verbose: u8,
    supports_color: bool,
    supports_unicode: bool,
) -> Option<(Stream, String)> {
    let verbose = verbose > 0;
    match event {
        WatchEvent::WatchStarted { root } if verbose => Some((
            Stream::Stdout,
            format!(
                "{} Watching {} (press Ctrl+C to stop)",
                Icon::Watch.colored(supports_color, supports_unicode),
                root
            ),
        )),
        WatchEvent::FileChanged {
            timestamp,
            kind,
            path,
            previous,
        } => {
            let mut line = format!(
                "{}: {} {}",
                ColoredText::dim(timestamp.format(TIMESTAMP_FORMAT).to_string())
                    .render(supports_color),
                kind_label(*kind).render(supports_color),
                path
            );
            if let (true, Some(previous)) = (verbose, previous) {
                line.push_str(&format!(
                    " {} {}",
                    Icon::Arrow.colored(supports_color, supports_unicode),
                    previous
                ));
            }
            Some((Stream::Stdout, line))
        }
        WatchEvent::RebuildStarted {
            trigger, changes, ..
        } if verbose => {
            let reason = match trigger {
                RebuildTrigger::Initial => "initial build".to_string(),
                RebuildTrigger::Change if *changes == 1 => "1 change".to_string(),
                RebuildTrigger::Change => format!("{changes} changes"),
            };
            Some((
                Stream::Stdout,
                format!(
                    "{} Rebuilding ({reason})",
                    Icon::Progress.colored(supports_color, supports_unicode)
                ),
            ))
        }
        WatchEvent::RebuildComplete {
            success: false,
            error,
            duration_ms,
        } => Some((
            Stream::Stderr,
            format!(
                "{} {}: {} ({duration_ms}ms)",
                Icon::Error.colored(supports_color, supports_unicode),
                ColoredText::error("Rebuild failed").render(supports_color),
                error.as_deref().unwrap_or("unknown error")
            ),
        )),
        WatchEvent::RebuildComplete {
            success: true,
            duration_ms,
            ..
        } if verbose => Some((
            Stream::Stdout,
            format!(
                "{} {}",
                Icon::Success.colored(supports_color, supports_unicode),
                ColoredText::success(format!("Rebuilt in {duration_ms}ms")).render(supports_color)
            ),
        )),
        WatchEvent::Watching => Some((Stream::Stdout, "Watching...".to_string())),
        WatchEvent::Error { message } => Some((
            Stream::Stderr,
            format!(
                "{} {}",
                Icon::Warning.colored(supports_color, supports_unicode),
                ColoredText::warning(message.as_str()).render(supports_color)
            ),
        )),
        WatchEvent::Shutdown if verbose => Some((
            Stream::Stdout,
            format!(
                "{} Watch stopped.",
                Icon::Watch.colored(supports_color, supports_unicode)
            ),
        )),
        _ => None,
    }
}

/// Closing line for `watch -v`
pub fn render_watch_summary(
    summary: &WatchSummary,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let plural = |n: usize| if n == 1 { "" } else { "s" };
    format!(
        "{} {} rebuild{}, {} change{}",
        Icon::Watch.colored(supports_color, supports_unicode),
        summary.rebuilds,
        plural(summary.rebuilds),
        summary.changes,
        plural(summary.changes)
    )
}

fn kind_label(kind: ChangeKind) -> ColoredText {
    match kind {
        ChangeKind::Created => ColoredText::success(kind.label()),
        ChangeKind::Modified => ColoredText::info(kind.label()),
        ChangeKind::Deleted => ColoredText::error(kind.label()),
        ChangeKind::Renamed => ColoredText::warning(kind.label()),
    }
}
