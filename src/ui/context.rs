use crate::cli::ColorWhen;
use crate::ui::terminal::{detect_capabilities, TerminalCapabilities};
use regen::config::ColorMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiContext {
    pub verbose: u8,
    pub color: bool,
    pub unicode: bool,
}

impl UiContext {
    pub fn new(
        json: bool,
        verbose: u8,
        cli_color: Option<ColorWhen>,
        config_color: ColorMode,
    ) -> Self {
        let caps = detect_capabilities();
        Self::from_caps(json, verbose, cli_color, config_color, caps)
    }

    pub(crate) fn from_caps(
        json: bool,
        verbose: u8,
        cli_color: Option<ColorWhen>,
        config_color: ColorMode,
        caps: TerminalCapabilities,
    ) -> Self {
        let color = match cli_color {
            Some(ColorWhen::Never) => false,
            Some(ColorWhen::Always) => true,
            Some(ColorWhen::Auto) | None => match config_color {
                ColorMode::Never => false,
                ColorMode::Always => true,
                ColorMode::Auto => caps.supports_color && !caps.is_ci,
            },
        };

        Self {
            verbose,
            color: color && !json,
            unicode: caps.supports_unicode,
        }
    }
}
