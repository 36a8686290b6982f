use crossterm::style::Stylize;

use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Warning,
    Progress,
    Arrow,
    Watch,
}

impl Icon {
    pub fn render(&self, supports_unicode: bool) -> &'static str {
        match (supports_unicode, self) {
            (true, Icon::Success) => theme::icons::SUCCESS,
            (true, Icon::Error) => theme::icons::ERROR,
            (true, Icon::Warning) => theme::icons::WARNING,
            (true, Icon::Progress) => theme::icons::PROGRESS,
            (true, Icon::Arrow) => theme::icons::ARROW,
            (true, Icon::Watch) => theme::icons::WATCH,
            (false, Icon::Success) => theme::icons_ascii::SUCCESS,
            (false, Icon::Error) => theme::icons_ascii::ERROR,
            (false, Icon::Warning) => theme::icons_ascii::WARNING,
            (false, Icon::Progress) => theme::icons_ascii::PROGRESS,
            (false, Icon::Arrow) => theme::icons_ascii::ARROW,
            (false, Icon::Watch) => theme::icons_ascii::WATCH,
        }
    }

    pub fn colored(&self, supports_color: bool, supports_unicode: bool) -> String {
        let s = self.render(supports_unicode);
        if !supports_color {
            return s.to_string();
        }
        let color = match self {
            Icon::Success => theme::colors::SUCCESS,
            Icon::Error => theme::colors::ERROR,
            Icon::Warning | Icon::Progress => theme::colors::WARNING,
            Icon::Arrow => theme::colors::DIM,
            Icon::Watch => theme::colors::INFO,
        };
        format!("{}", s.with(color))
    }
}
