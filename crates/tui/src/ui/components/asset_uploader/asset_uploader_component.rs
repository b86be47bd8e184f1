//! Renders one uploader section: preview tiles, the placeholder, and the trigger button.

use asset_uploader_types::{Effect, Modal, PickerRequest, SelectedFile};
use asset_uploader_util::format_bytes;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::state::AssetUploaderState;
use crate::{
    app::App,
    ui::{
        components::Component,
        theme::{
            Theme,
            theme_helpers::{ButtonRenderOptions, block, build_hint_spans, render_button},
        },
        utils::{find_target_index_by_mouse_position, truncate_to_width},
    },
};

/// Button class that renders the trigger with the primary accent.
pub const PRIMARY_BUTTON_CLASS: &str = "upload-button";

const TILE_WIDTH: u16 = 22;
const TILE_GAP: u16 = 1;
const PLACEHOLDER: &str = "No asset uploaded";

#[derive(Debug, Clone, Default)]
struct UploaderLayout {
    previews_area: Rect,
    button_area: Rect,
    tile_rects: Vec<Rect>,
    remove_rects: Vec<Rect>,
    first_visible: usize,
}

/// Component for the uploader at `index` in `App::uploaders`.
#[derive(Debug, Clone, Default)]
pub struct AssetUploaderComponent {
    index: usize,
    layout: UploaderLayout,
}

impl AssetUploaderComponent {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            layout: UploaderLayout::default(),
        }
    }

    /// Rows this section needs: borders, tile strip and trigger button.
    pub fn preferred_height() -> u16 {
        2 + 6 + 3
    }

    fn open_picker_effect(uploader: &AssetUploaderState) -> Effect {
        let config = uploader.config();
        Effect::ShowModal(Modal::FilePicker(PickerRequest {
            uploader_id: uploader.id(),
            accept: config.accept().clone(),
            multiple: config.allows_multiple(),
        }))
    }

    fn remove_selected(app: &mut App, index: usize) {
        let Some(uploader) = app.uploaders.get_mut(index) else {
            return;
        };
        let Some(selected) = uploader.selected_preview() else {
            return;
        };
        uploader.remove_preview(selected);
        if uploader.previews().is_empty() {
            app.focus.focus(&uploader.f_button);
        }
    }

    fn render_placeholder(frame: &mut Frame, area: Rect, theme: &dyn Theme) {
        let placeholder = Paragraph::new(PLACEHOLDER)
            .alignment(Alignment::Center)
            .style(theme.text_muted_style())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Plain)
                    .border_style(theme.text_muted_style()),
            );
        let height = area.height.min(3);
        let width = (PLACEHOLDER.width() as u16 + 4).min(area.width);
        frame.render_widget(placeholder, Rect { width, height, ..area });
    }

    fn render_tile(frame: &mut Frame, area: Rect, file: &SelectedFile, is_video: bool, selected: bool, theme: &dyn Theme) -> Rect {
        let border_style = if selected { theme.border_style(true) } else { theme.border_style(false) };
        let tile_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);
        let inner = tile_block.inner(area);
        let name_width = inner.width as usize;

        let marker = if is_video { "▶ video" } else { "▣ image" };
        let mime_type = if file.mime_type.is_empty() { "unknown type" } else { file.mime_type.as_str() };
        let name_style = if selected { theme.selection_style() } else { theme.text_primary_style() };
        let lines = vec![
            Line::from(Span::styled(marker, theme.preview_glyph_style(is_video))),
            Line::from(Span::styled(truncate_to_width(&file.name, name_width), name_style)),
            Line::from(Span::styled(format_bytes(file.size), theme.text_secondary_style())),
            Line::from(Span::styled(truncate_to_width(mime_type, name_width), theme.text_muted_style())),
        ];
        frame.render_widget(Paragraph::new(lines).block(tile_block), area);

        let remove_area = Rect {
            x: area.right().saturating_sub(4),
            y: area.y,
            width: 3.min(area.width),
            height: 1,
        };
        frame.render_widget(Paragraph::new(Span::styled(" X ", theme.status_error())), remove_area);
        remove_area
    }

    fn render_previews(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        self.layout.tile_rects.clear();
        self.layout.remove_rects.clear();
        let Some(uploader) = app.uploaders.get(self.index) else {
            return;
        };
        let theme = &*app.ctx.theme;
        if uploader.previews().is_empty() {
            Self::render_placeholder(frame, area, theme);
            return;
        }

        let capacity = (((area.width + TILE_GAP) / (TILE_WIDTH + TILE_GAP)) as usize).max(1);
        let selected = uploader.selected_preview();
        // keep the selected tile in view
        let mut first = self.layout.first_visible.min(uploader.previews().len().saturating_sub(1));
        if let Some(selected) = selected {
            if selected < first {
                first = selected;
            } else if selected >= first + capacity {
                first = selected + 1 - capacity;
            }
        }
        self.layout.first_visible = first;

        let previews_focused = uploader.f_previews.get();
        let is_video = uploader.config().renders_video();
        for (slot, index) in (first..uploader.previews().len()).take(capacity).enumerate() {
            let Some(file) = uploader.preview_file(index) else {
                continue;
            };
            let tile = Rect {
                x: area.x + slot as u16 * (TILE_WIDTH + TILE_GAP),
                y: area.y,
                width: TILE_WIDTH.min(area.width),
                height: area.height.min(6),
            };
            let is_selected = previews_focused && selected == Some(index);
            let remove_area = Self::render_tile(frame, tile, file, is_video, is_selected, theme);
            self.layout.tile_rects.push(tile);
            self.layout.remove_rects.push(remove_area);
        }

        let hidden = uploader.previews().len() - self.layout.tile_rects.len();
        let used = self.layout.tile_rects.len() as u16 * (TILE_WIDTH + TILE_GAP);
        if hidden > 0 && area.width > used {
            let more = Rect {
                x: area.x + used,
                y: area.y + area.height.min(6) / 2,
                width: area.width - used,
                height: 1,
            };
            frame.render_widget(Paragraph::new(format!("+{hidden} more")).style(theme.text_muted_style()), more);
        }
    }

    fn render_trigger(&self, frame: &mut Frame, area: Rect, app: &App) {
        let Some(uploader) = app.uploaders.get(self.index) else {
            return;
        };
        let config = uploader.config();
        let primary = config.button_class_name() == Some(PRIMARY_BUTTON_CLASS);
        let focused = uploader.f_button.get();
        let options = ButtonRenderOptions::new(true, focused, false, Borders::ALL, primary);
        render_button(frame, area, config.button_title(), &*app.ctx.theme, options);
    }
}

impl Component for AssetUploaderComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(uploader) = app.uploaders.get_mut(self.index) else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') if uploader.f_button.get() => {
                return vec![Self::open_picker_effect(uploader)];
            }
            KeyCode::Right if uploader.f_previews.get() => uploader.select_next_preview(),
            KeyCode::Left if uploader.f_previews.get() => uploader.select_previous_preview(),
            KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x') if uploader.f_previews.get() => {
                Self::remove_selected(app, self.index);
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let Some(uploader) = app.uploaders.get_mut(self.index) else {
            return Vec::new();
        };
        let pos = Position::new(mouse.column, mouse.row);

        if self.layout.button_area.contains(pos) {
            app.focus.focus(&uploader.f_button);
            return vec![Self::open_picker_effect(uploader)];
        }

        let area = self.layout.previews_area;
        if let Some(slot) = find_target_index_by_mouse_position(&area, &self.layout.remove_rects, pos.x, pos.y) {
            uploader.remove_preview(self.layout.first_visible + slot);
            if uploader.previews().is_empty() {
                app.focus.focus(&uploader.f_button);
            }
            return Vec::new();
        }
        if let Some(slot) = find_target_index_by_mouse_position(&area, &self.layout.tile_rects, pos.x, pos.y) {
            uploader.select_preview(Some(self.layout.first_visible + slot));
            app.focus.focus(&uploader.f_previews);
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let Some(uploader) = app.uploaders.get(self.index) else {
            return;
        };
        let focused = uploader.f_button.get() || uploader.f_previews.get();
        let outer = block(&*app.ctx.theme, Some(uploader.heading()), focused);
        let areas = self.get_preferred_layout(app, outer.inner(rect));
        frame.render_widget(outer, rect);

        self.layout.previews_area = areas[0];
        self.layout.button_area = areas[1];
        self.render_previews(frame, areas[0], app);
        self.render_trigger(frame, areas[1], app);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let Some(uploader) = app.uploaders.get(self.index) else {
            return Vec::new();
        };
        let theme = &*app.ctx.theme;
        if uploader.f_previews.get() {
            build_hint_spans(theme, &[(" ←/→", " Select "), ("Del", " Remove ")])
        } else {
            build_hint_spans(theme, &[(" Enter", " Choose files ")])
        }
    }

    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let title_width = app
            .uploaders
            .get(self.index)
            .map_or(10, |uploader| uploader.config().button_title().width() as u16);
        let rows = Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).split(area);
        let button = Layout::horizontal([Constraint::Length(title_width + 6), Constraint::Min(0)]).split(rows[1]);
        vec![rows[0], button[0]]
    }
}

#[cfg(test)]
mod tests {
    use asset_uploader_types::UploaderId;
    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::SharedCtx;
    use crate::ui::components::asset_uploader::{AssetUploaderConfig, UploadAck};
    use crate::ui::theme::DraculaTheme;

    fn app_with_uploader(is_video: bool) -> App {
        let config = AssetUploaderConfig::new("Upload Video", |_| Ok(UploadAck::Completed))
            .accepted_types("video/mp4,image/png")
            .button_class(PRIMARY_BUTTON_CLASS)
            .multiple(true)
            .is_video(is_video);
        let ctx = SharedCtx {
            theme: Box::new(DraculaTheme::new()),
            theme_id: "dracula",
            start_dir: None,
        };
        App::new(ctx, "Test", vec![AssetUploaderState::new(UploaderId(0), config).with_heading("Clips")])
    }

    fn render_to_string(component: &mut AssetUploaderComponent, app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|frame| component.render(frame, frame.area(), app))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn empty_uploader_renders_placeholder_and_button() {
        let mut app = app_with_uploader(false);
        let mut component = AssetUploaderComponent::new(0);
        let screen = render_to_string(&mut component, &mut app);
        assert!(screen.contains("Clips"));
        assert!(screen.contains(PLACEHOLDER));
        assert!(screen.contains("Upload Video"));
    }

    #[test]
    fn tiles_show_marker_name_and_size() {
        let mut app = app_with_uploader(true);
        app.uploaders[0].handle_selection(vec![
            SelectedFile::new("intro.mp4", "video/mp4", 2048, "/v/intro.mp4"),
            SelectedFile::new("outro.mp4", "video/mp4", 10, "/v/outro.mp4"),
        ]);
        let mut component = AssetUploaderComponent::new(0);
        let screen = render_to_string(&mut component, &mut app);
        assert!(!screen.contains(PLACEHOLDER));
        assert!(screen.contains("▶ video"));
        assert!(screen.contains("intro.mp4"));
        assert!(screen.contains("2.0 KB"));
        assert!(screen.contains(" X "));
        assert_eq!(component.layout.remove_rects.len(), 2);
    }

    #[test]
    fn enter_on_button_requests_picker_with_uploader_settings() {
        let mut app = app_with_uploader(false);
        let mut component = AssetUploaderComponent::new(0);
        let effects = component.handle_key_events(&mut app, key(KeyCode::Enter));
        let [Effect::ShowModal(Modal::FilePicker(request))] = effects.as_slice() else {
            panic!("expected picker request, got {effects:?}");
        };
        assert_eq!(request.uploader_id, UploaderId(0));
        assert!(request.multiple);
        assert!(request.accept.matches("video/mp4"));
    }

    #[test]
    fn clicking_remove_affordance_drops_that_tile() {
        let mut app = app_with_uploader(false);
        app.uploaders[0].handle_selection(vec![
            SelectedFile::new("a.png", "image/png", 1, "/a.png"),
            SelectedFile::new("b.png", "image/png", 1, "/b.png"),
        ]);
        let mut component = AssetUploaderComponent::new(0);
        render_to_string(&mut component, &mut app);

        let target = component.layout.remove_rects[0];
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: target.x + 1,
            row: target.y,
            modifiers: KeyModifiers::NONE,
        };
        component.handle_mouse_events(&mut app, click);

        let uploader = &app.uploaders[0];
        assert_eq!(uploader.previews().len(), 1);
        assert_eq!(uploader.preview_file(0).map(|f| f.name.as_str()), Some("b.png"));
    }

    #[test]
    fn delete_key_removes_selected_tile_and_refocuses_button() {
        let mut app = app_with_uploader(false);
        app.uploaders[0].handle_selection(vec![SelectedFile::new("a.png", "image/png", 1, "/a.png")]);
        app.focus = rat_focus::FocusBuilder::build_for(&app);
        app.focus.focus(&app.uploaders[0].f_previews);
        let mut component = AssetUploaderComponent::new(0);

        component.handle_key_events(&mut app, key(KeyCode::Right));
        component.handle_key_events(&mut app, key(KeyCode::Delete));

        assert!(app.uploaders[0].previews().is_empty());
        assert!(app.uploaders[0].f_button.get());
    }
}
