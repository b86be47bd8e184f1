//! The host page: uploader sections stacked on the left, activity on the right.

use asset_uploader_types::Effect;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::Span,
};

use crate::{
    app::App,
    ui::{
        components::{Component, activity::ActivityComponent, asset_uploader::AssetUploaderComponent},
        theme::theme_helpers::build_hint_spans,
    },
};

/// Terminals narrower than this stack the activity panel below the uploaders.
const SIDE_BY_SIDE_MIN_WIDTH: u16 = 100;
const STACKED_ACTIVITY_HEIGHT: u16 = 8;

#[derive(Debug, Default)]
pub struct HostPageComponent {
    uploaders: Vec<AssetUploaderComponent>,
    activity: ActivityComponent,
}

impl HostPageComponent {
    pub fn new(uploader_count: usize) -> Self {
        Self {
            uploaders: (0..uploader_count).map(AssetUploaderComponent::new).collect(),
            activity: ActivityComponent::default(),
        }
    }

    fn focused_child(&mut self, app: &App) -> Option<&mut dyn Component> {
        if let Some(index) = app.focused_uploader_index() {
            return self.uploaders.get_mut(index).map(|c| c as &mut dyn Component);
        }
        app.activity.focus.get().then_some(&mut self.activity as &mut dyn Component)
    }
}

impl Component for HostPageComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
                Vec::new()
            }
            KeyCode::BackTab => {
                app.focus.prev();
                Vec::new()
            }
            _ => match self.focused_child(app) {
                Some(child) => child.handle_key_events(app, key),
                None => Vec::new(),
            },
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        for uploader in self.uploaders.iter_mut() {
            effects.extend(uploader.handle_mouse_events(app, mouse));
        }
        effects.extend(self.activity.handle_mouse_events(app, mouse));
        effects
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let areas = self.get_preferred_layout(app, rect);
        let (uploader_areas, activity_area) = areas.split_at(areas.len() - 1);
        for (component, area) in self.uploaders.iter_mut().zip(uploader_areas) {
            if area.height > 0 {
                component.render(frame, *area, app);
            }
        }
        self.activity.render(frame, activity_area[0], app);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut spans = build_hint_spans(&*app.ctx.theme, &[(" Tab", " Next ")]);
        let child_hints = match app.focused_uploader_index() {
            Some(index) => self.uploaders.get(index).map(|c| c.get_hint_spans(app)),
            None if app.activity.focus.get() => Some(self.activity.get_hint_spans(app)),
            None => None,
        };
        spans.extend(child_hints.unwrap_or_default());
        spans
    }

    /// One rect per uploader section followed by the activity panel.
    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        let (column, activity) = if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
            let split = Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).split(area);
            (split[0], split[1])
        } else {
            let split = Layout::vertical([Constraint::Min(0), Constraint::Length(STACKED_ACTIVITY_HEIGHT)]).split(area);
            (split[0], split[1])
        };

        let constraints = self
            .uploaders
            .iter()
            .map(|_| Constraint::Length(AssetUploaderComponent::preferred_height()))
            .chain(std::iter::once(Constraint::Min(0)));
        let rows = Layout::vertical(constraints).split(column);

        let mut rects: Vec<Rect> = rows.iter().take(self.uploaders.len()).copied().collect();
        rects.push(activity);
        rects
    }
}

#[cfg(test)]
mod tests {
    use asset_uploader_types::{Modal, SelectedFile, UploaderId};
    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::SharedCtx;
    use crate::ui::components::asset_uploader::{AssetUploaderConfig, AssetUploaderState, UploadAck};
    use crate::ui::theme::NordTheme;

    fn test_app() -> App {
        let ctx = SharedCtx {
            theme: Box::new(NordTheme::new()),
            theme_id: "nord",
            start_dir: None,
        };
        let uploaders = (0..2)
            .map(|i| {
                let config = AssetUploaderConfig::new(format!("Upload {i}"), |_| Ok(UploadAck::Completed)).accepted_types("image/png");
                AssetUploaderState::new(UploaderId(i), config).with_heading(format!("Section {i}"))
            })
            .collect();
        App::new(ctx, "Page", uploaders)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn tab_moves_between_uploaders_and_activity() {
        let mut app = test_app();
        let mut page = HostPageComponent::new(2);
        assert_eq!(app.focused_uploader_index(), Some(0));

        page.handle_key_events(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focused_uploader_index(), Some(1));

        page.handle_key_events(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focused_uploader_index(), None);
        assert!(app.activity.focus.get());
    }

    #[test]
    fn enter_opens_picker_for_the_focused_uploader() {
        let mut app = test_app();
        let mut page = HostPageComponent::new(2);
        page.handle_key_events(&mut app, key(KeyCode::Tab));

        let effects = page.handle_key_events(&mut app, key(KeyCode::Enter));
        let [Effect::ShowModal(Modal::FilePicker(request))] = effects.as_slice() else {
            panic!("expected picker request, got {effects:?}");
        };
        assert_eq!(request.uploader_id, UploaderId(1));
    }

    #[test]
    fn renders_every_section_and_the_activity_panel() {
        let mut app = test_app();
        app.uploaders[1].handle_selection(vec![SelectedFile::new("shot.png", "image/png", 10, "/shot.png")]);
        let mut page = HostPageComponent::new(2);
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| page.render(frame, frame.area(), &mut app)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("Section 0"));
        assert!(screen.contains("Section 1"));
        assert!(screen.contains("shot.png"));
        assert!(screen.contains("Activity"));
    }
}
