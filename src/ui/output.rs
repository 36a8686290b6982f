use std::path::Path;

use regen::config::ConfigWarning;

pub fn print_config_warnings(path: &Path, warnings: &[ConfigWarning]) {
    for w in warnings {
        if let Some(line) = w.line {
            eprintln!("⚠ Unknown config key '{}' in {}:{}", w.key, path.display(), line);
        } else {
            eprintln!("⚠ Unknown config key '{}' in {}", w.key, path.display());
        }

        if let Some(suggestion) = &w.suggestion {
            eprintln!("   Did you mean '{}'?\n", suggestion);
        }
    }
}

pub fn format_error(err: &anyhow::Error, supports_color: bool) -> String {
    use crate::ui::primitives::text::ColoredText;

    // Library errors already embed their source in the message
    format!("{} {}", ColoredText::error("Error:").render(supports_color), err)
}
