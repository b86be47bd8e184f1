//! Activity panel listing what the host page's callbacks reported.

use asset_uploader_types::Effect;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use super::state::ActivityLevel;
use crate::{
    app::App,
    ui::{
        components::Component,
        theme::theme_helpers::{block, build_hint_spans},
    },
};

#[derive(Debug, Default)]
pub struct ActivityComponent {
    area: Rect,
}

impl Component for ActivityComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Up => app.activity.scroll_up(),
            KeyCode::Down => app.activity.scroll_down(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if !self.area.contains(Position::new(mouse.column, mouse.row)) {
            return Vec::new();
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => app.activity.scroll_up(),
            MouseEventKind::ScrollDown => app.activity.scroll_down(),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        self.area = rect;
        let theme = &*app.ctx.theme;
        let focused = app.activity.focus.get();
        let items: Vec<ListItem> = app
            .activity
            .entries()
            .iter()
            .map(|entry| {
                let level_style = match entry.level {
                    ActivityLevel::Info => theme.status_info(),
                    ActivityLevel::Success => theme.status_success(),
                    ActivityLevel::Error => theme.status_error(),
                };
                let mut spans = vec![Span::styled(entry.at.format("%H:%M:%S ").to_string(), theme.text_muted_style())];
                if let Some(source) = entry.source {
                    spans.push(Span::styled(format!("[{source}] "), theme.text_secondary_style()));
                }
                spans.push(Span::styled(entry.message.clone(), level_style));
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(block(theme, Some("Activity"), focused))
            .highlight_style(if focused { theme.selection_style() } else { theme.text_primary_style() });
        frame.render_stateful_widget(list, rect, app.activity.list_state_mut());
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        build_hint_spans(&*app.ctx.theme, &[(" ↑/↓", " Scroll ")])
    }
}
