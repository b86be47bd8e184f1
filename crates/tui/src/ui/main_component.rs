use asset_uploader_types::{Effect, Modal, Msg};
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::widgets::Clear;
use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Block, Paragraph},
};

use super::components::{Component, FilePickerModal, HostPageComponent};
use super::theme::theme_helpers as th;
use super::utils::centered_min_max;
use crate::app::App;
use crate::ui::components::common::FilePickerState;

pub struct ModalLayout(Box<dyn Fn(Rect) -> Rect>);

impl std::fmt::Debug for ModalLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ModalLayout")
    }
}

type ModalView = (Box<dyn Component>, ModalLayout);

#[derive(Debug)]
pub struct MainView {
    /// The host page with every uploader section
    pub content_view: Box<dyn Component>,
    /// Currently open modal component
    pub modal_view: Option<ModalView>,

    /// the widget_id of the focus just before a modal is opened
    transient_focus_id: Option<usize>,
}

impl MainView {
    pub fn new(content_view: Box<dyn Component>) -> Self {
        Self {
            content_view,
            modal_view: None,
            transient_focus_id: None,
        }
    }

    /// Main view over a host page with one section per uploader in `app`.
    pub fn for_host_page(app: &App) -> Self {
        Self::new(Box::new(HostPageComponent::new(app.uploaders.len())))
    }

    /// Update the open modal kind (use None to clear).
    pub fn set_open_modal_kind(&mut self, app: &mut App, modal: Option<Modal>) {
        if let Some(modal_kind) = modal.as_ref() {
            let modal_view: ModalView = match modal_kind {
                Modal::FilePicker(request) => {
                    let state = FilePickerState::new(request.clone(), app.ctx.start_dir.clone());
                    app.file_picker = Some(state);
                    (
                        Box::new(FilePickerModal::default()),
                        ModalLayout(Box::new(|rect| {
                            centered_min_max(75, 95, Rect::new(0, 0, 80, 15), Rect::new(0, 0, 160, 150), rect)
                        })),
                    )
                }
            };
            self.modal_view = Some(modal_view);
            // save the current focus to restore when the modal is closed
            self.transient_focus_id = app.focus.focused().map(|focus| focus.widget_id());
        } else {
            self.modal_view = None;
            app.file_picker = None;
        }
        app.open_modal = modal;
    }

    pub fn restore_focus(&mut self, app: &mut App) {
        if let Some(id) = self.transient_focus_id
            && app.open_modal.is_none()
        {
            app.focus.by_widget_id(id);
            self.transient_focus_id = None;
        } else {
            app.focus.first();
        }
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let mut effects = app.update(&msg);

        match self.modal_view.as_mut() {
            Some((modal, _)) => effects.extend(modal.handle_message(app, msg)),
            None => effects.extend(self.content_view.handle_message(app, msg)),
        }

        effects
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if let Some(target) = self.modal_view.as_mut() {
            return target.0.handle_key_events(app, key);
        }
        self.content_view.handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if let Some(target) = self.modal_view.as_mut() {
            return target.0.handle_mouse_events(app, mouse);
        }
        self.content_view.handle_mouse_events(app, mouse)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        // Fill the entire background with the theme's background color for consistency
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let layout = self.get_preferred_layout(app, area);
        let title = Paragraph::new(Line::from(Span::styled(app.title.as_str(), app.ctx.theme.accent_emphasis_style())));
        frame.render_widget(title, layout[0]);

        self.content_view.render(frame, layout[1], app);

        let hint_spans: Vec<Span> = self.get_hint_spans(app);
        let hints_widget = Paragraph::new(Line::from(hint_spans)).style(app.ctx.theme.text_muted_style());
        frame.render_widget(hints_widget, layout[2]);

        if let Some((modal, position)) = self.modal_view.as_mut() {
            render_overlay(frame, app);
            let modal_area = position.0(area);
            frame.render_widget(Clear, modal_area);

            let modal_hints = modal.get_hint_spans(app);
            if !modal_hints.is_empty() {
                let splits = Layout::vertical([
                    Constraint::Percentage(100), // Modal body
                    Constraint::Length(1),       // Modal hints bar
                ])
                .split(modal_area);
                let hints_widget = Paragraph::new(Line::from(modal_hints))
                    .style(app.ctx.theme.text_muted_style())
                    .bg(app.ctx.theme.roles().background);
                frame.render_widget(hints_widget, splits[1]);
                modal.render(frame, splits[0], app);
            } else {
                modal.render(frame, modal_area, app);
            }
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];
        hint_spans.extend(self.content_view.get_hint_spans(app));
        hint_spans.extend(th::build_hint_spans(&*app.ctx.theme, &[(" Ctrl+C", " Quit ")]));
        hint_spans
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Length(1), // Page title
            Constraint::Min(1),    // Host page
            Constraint::Length(1), // Hints bar
        ])
        .split(area)
        .to_vec()
    }
}

/// Dims everything behind an open modal.
fn render_overlay(frame: &mut Frame, app: &mut App) {
    frame.render_widget(Block::default().style(app.ctx.theme.modal_background_style()).dim(), frame.area());
}

#[cfg(test)]
mod tests {
    use asset_uploader_types::{AcceptPatterns, PickerRequest, UploaderId};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::SharedCtx;
    use crate::ui::components::asset_uploader::{AssetUploaderConfig, AssetUploaderState, UploadAck};
    use crate::ui::theme::DraculaTheme;

    fn test_app() -> App {
        let ctx = SharedCtx {
            theme: Box::new(DraculaTheme::new()),
            theme_id: "dracula",
            start_dir: Some(std::env::temp_dir()),
        };
        let config = AssetUploaderConfig::new("Upload Image", |_| Ok(UploadAck::Completed));
        App::new(ctx, "Upload Assets", vec![AssetUploaderState::new(UploaderId(0), config)])
    }

    fn picker_request() -> Modal {
        Modal::FilePicker(PickerRequest {
            uploader_id: UploaderId(0),
            accept: AcceptPatterns::parse("image/png"),
            multiple: false,
        })
    }

    #[test]
    fn opening_and_closing_the_picker_tracks_state() {
        let mut app = test_app();
        let mut main_view = MainView::for_host_page(&app);

        main_view.set_open_modal_kind(&mut app, Some(picker_request()));
        assert!(main_view.modal_view.is_some());
        assert!(app.file_picker.as_ref().is_some_and(|picker| picker.cur_dir() == Some(&std::env::temp_dir())));
        assert_eq!(app.open_modal, Some(picker_request()));

        main_view.set_open_modal_kind(&mut app, None);
        assert!(main_view.modal_view.is_none());
        assert!(app.file_picker.is_none());
        assert!(app.open_modal.is_none());
    }

    #[test]
    fn renders_title_and_hints() {
        let mut app = test_app();
        let mut main_view = MainView::for_host_page(&app);
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|frame| main_view.render(frame, frame.area(), &mut app)).unwrap();

        let screen: String = terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("Upload Assets"));
        assert!(screen.contains("Hints:"));
        assert!(screen.contains("No asset uploaded"));
    }
}
