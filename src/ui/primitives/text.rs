use crossterm::style::Stylize;

use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticColor {
    Success,
    Error,
    Warning,
    Info,
    Dim,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColoredText {
    text: String,
    color: SemanticColor,
}

impl ColoredText {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: SemanticColor::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: SemanticColor::Error,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: SemanticColor::Warning,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: SemanticColor::Info,
        }
    }

    pub fn dim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: SemanticColor::Dim,
        }
    }

    pub fn render(&self, supports_color: bool) -> String {
        if !supports_color {
            return self.text.clone();
        }

        let color = match self.color {
            SemanticColor::Success => theme::colors::SUCCESS,
            SemanticColor::Error => theme::colors::ERROR,
            SemanticColor::Warning => theme::colors::WARNING,
            SemanticColor::Info => theme::colors::INFO,
            SemanticColor::Dim => theme::colors::DIM,
        };
        format!("{}", self.text.as_str().with(color))
    }
}
