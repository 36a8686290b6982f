use regen::RebuildOutcome;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_generate_success(
    output_dir: &str,
    outcome: &RebuildOutcome,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    format!(
        "{} {} {} ({}ms)",
        Icon::Success.colored(supports_color, supports_unicode),
        ColoredText::success("Generated").render(supports_color),
        output_dir,
        outcome.duration_ms()
    )
}

pub fn generate_json(output_dir: &str, outcome: &RebuildOutcome) -> serde_json::Value {
    serde_json::json!({
        "event": "generate_complete",
        "command": "generate",
        "success": outcome.success,
        "output": output_dir,
        "duration_ms": outcome.duration_ms(),
    })
}
