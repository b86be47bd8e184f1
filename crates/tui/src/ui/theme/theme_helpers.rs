use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers.
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Primary button style (filled accent background).
pub fn button_primary_style<T: Theme + ?Sized>(theme: &T, enabled: bool) -> Style {
    let ThemeRoles {
        accent_primary,
        background,
        surface_muted,
        text_muted,
        ..
    } = *theme.roles();
    if enabled {
        Style::default().bg(accent_primary).fg(background).add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(surface_muted).fg(text_muted)
    }
}

/// Secondary button style (outline-like, relies on the border color).
pub fn button_secondary_style<T: Theme + ?Sized>(theme: &T, enabled: bool, selected: bool) -> Style {
    if !enabled {
        return theme.text_muted_style();
    }
    let ThemeRoles {
        accent_secondary,
        selection_bg,
        ..
    } = *theme.roles();
    let style = Style::default().fg(accent_secondary);
    if selected { style.bg(selection_bg) } else { style }
}

/// Visual switches for [`render_button`].
#[derive(Debug, Clone, Copy)]
pub struct ButtonRenderOptions {
    pub enabled: bool,
    pub focused: bool,
    pub selected: bool,
    pub borders: Borders,
    pub primary: bool,
}

impl ButtonRenderOptions {
    pub fn new(enabled: bool, focused: bool, selected: bool, borders: Borders, primary: bool) -> Self {
        Self {
            enabled,
            focused,
            selected,
            borders,
            primary,
        }
    }
}

/// Renders a standard button.
pub fn render_button<T: Theme + ?Sized>(frame: &mut Frame, area: Rect, label: &str, theme: &T, options: ButtonRenderOptions) {
    let ButtonRenderOptions {
        enabled,
        focused,
        selected,
        borders,
        primary,
    } = options;

    let border_style = if enabled {
        theme.border_style(focused)
    } else {
        theme.text_muted_style()
    };

    let mut button_style = if primary {
        button_primary_style(theme, enabled)
    } else {
        button_secondary_style(theme, enabled, selected)
    };
    if focused {
        button_style = button_style.add_modifier(Modifier::BOLD);
    }

    // unbordered buttons keep the same footprint as bordered ones
    let padding = if borders.is_empty() { Padding::uniform(1) } else { Padding::ZERO };

    frame.render_widget(
        Paragraph::new(label)
            .centered()
            .block(Block::bordered().borders(borders).border_style(border_style).padding(padding))
            .style(button_style),
        area,
    );
}

/// Turns `(key, description)` pairs into styled footer spans.
pub fn build_hint_spans<'a, T: Theme + ?Sized>(theme: &T, hints: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    hints
        .iter()
        .flat_map(|(key, description)| {
            [
                Span::styled(*key, theme.accent_emphasis_style()),
                Span::styled(*description, theme.text_muted_style()),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::DraculaTheme;

    #[test]
    fn hint_spans_alternate_key_and_description() {
        let theme = DraculaTheme::new();
        let spans = build_hint_spans(&theme, &[(" Esc", " Cancel"), (" Tab", " Next")]);
        let text: Vec<_> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, vec![" Esc", " Cancel", " Tab", " Next"]);
        assert_eq!(spans[0].style, theme.accent_emphasis_style());
    }

    #[test]
    fn disabled_primary_button_is_muted() {
        let theme = DraculaTheme::new();
        let style = button_primary_style(&theme, false);
        assert_eq!(style.fg, Some(theme.roles().text_muted));
    }
}
