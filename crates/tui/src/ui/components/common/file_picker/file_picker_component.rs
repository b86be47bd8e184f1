//! Modal that lets the user browse the file system and confirm files for an uploader.

use asset_uploader_types::{Effect, ExecOutcome, Msg};
use asset_uploader_util::format_bytes;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, Paragraph, Wrap},
};

use crate::{
    app::App,
    ui::{
        components::Component,
        theme::theme_helpers::{ButtonRenderOptions, block, build_hint_spans, render_button},
        utils::find_target_index_by_mouse_position,
    },
};

/// Resolved rectangles for each render region.
#[derive(Debug, Clone, Default)]
pub struct FilePickerLayout {
    shortcut_bar_area: Rect,
    header_area: Rect,
    file_list_area: Rect,
    details_area: Rect,
    status_area: Rect,
    cancel_button_area: Rect,
    open_button_area: Rect,
}

impl From<&[Rect]> for FilePickerLayout {
    fn from(layout: &[Rect]) -> Self {
        FilePickerLayout {
            shortcut_bar_area: layout[0],
            header_area: layout[1],
            file_list_area: layout[2],
            details_area: layout[3],
            status_area: layout[4],
            cancel_button_area: layout[5],
            open_button_area: layout[6],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilePickerModal {
    layout: FilePickerLayout,
    shortcut_rects: Vec<Rect>,
}

impl FilePickerModal {
    fn render_shortcuts(&mut self, frame: &mut Frame, rect: Rect, app: &App) -> Option<()> {
        let theme = &*app.ctx.theme;
        let block = Block::bordered().border_style(theme.border_style(false));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        self.shortcut_rects.clear();
        let file_picker = app.file_picker.as_ref()?;
        let selected_idx = file_picker.selected_shortcut_idx();
        for (index, shortcut) in file_picker.shortcuts().iter().enumerate() {
            let area = Rect {
                x: inner.x,
                y: inner.y + (3 * index as u16),
                width: inner.width,
                height: 3,
            };
            if area.bottom() > inner.bottom() {
                break;
            }
            let is_focused = file_picker.shortcuts_focus.get(index).is_some_and(|f| f.get());
            let borders = if is_focused { Borders::ALL } else { Borders::NONE };
            let options = ButtonRenderOptions::new(true, is_focused, selected_idx == Some(index), borders, false);
            render_button(frame, area, &shortcut.name, theme, options);
            self.shortcut_rects.push(area);
        }
        Some(())
    }

    fn render_header(&self, frame: &mut Frame, rect: Rect, app: &App) -> Option<()> {
        let file_picker = app.file_picker.as_ref()?;
        let theme = &*app.ctx.theme;
        let cur_dir = file_picker.cur_dir().map(|p| p.display().to_string()).unwrap_or_default();
        let mode = if file_picker.is_multiple() { "multiple" } else { "single" };
        let line = Line::from(vec![
            Span::styled(cur_dir, theme.text_primary_style()),
            Span::styled(format!("  accepts {} ({mode})", file_picker.request().accept.as_str()), theme.text_muted_style()),
        ]);
        let header_block = block(theme, Some("Location"), false);
        frame.render_widget(Paragraph::new(line).block(header_block), rect);
        Some(())
    }

    fn render_list(&self, frame: &mut Frame, rect: Rect, app: &mut App) -> Option<()> {
        let theme = &*app.ctx.theme;
        let file_picker = app.file_picker.as_mut()?;
        let mut list_items = file_picker.list_items().to_vec();
        if let Some(idx) = file_picker.mouse_over_idx()
            && let Some(item) = list_items.get_mut(idx)
        {
            *item = item.clone().style(theme.selection_style().add_modifier(Modifier::BOLD));
        }
        let list = List::new(list_items)
            .block(
                Block::new()
                    .borders(Borders::LEFT)
                    .border_style(theme.border_style(file_picker.f_list.get())),
            )
            .highlight_style(theme.selection_style());
        frame.render_stateful_widget(list, rect, file_picker.list_state_mut());
        Some(())
    }

    fn render_details(&self, frame: &mut Frame, area: Rect, app: &App) -> Option<()> {
        let theme = &*app.ctx.theme;
        let file_picker = app.file_picker.as_ref()?;
        let details_block = Block::new().borders(Borders::LEFT).border_style(theme.border_style(false));
        let Some(file) = file_picker.details() else {
            frame.render_widget(
                Paragraph::new("No file highlighted").style(theme.status_info()).block(details_block),
                area,
            );
            return None;
        };

        let mime_type = if file.mime_type.is_empty() {
            "unknown".to_string()
        } else {
            file.mime_type.clone()
        };
        let (hint, hint_style) = if file_picker.is_suggested(&file.path) {
            ("matches accepted types", theme.status_success())
        } else {
            ("outside accepted types", theme.status_warning())
        };
        let label = theme.text_secondary_style().add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(vec![Span::styled("Name  ", label), Span::raw(file.name.clone())]),
            Line::from(vec![Span::styled("Type  ", label), Span::raw(mime_type)]),
            Line::from(vec![Span::styled("Size  ", label), Span::raw(format_bytes(file.size))]),
            Line::from(Span::styled(hint, hint_style)),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .style(theme.text_primary_style())
                .block(details_block),
            area,
        );
        Some(())
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, app: &App) -> Option<()> {
        let file_picker = app.file_picker.as_ref()?;
        let theme = &*app.ctx.theme;
        let line = match file_picker.status_message() {
            Some(message) => Line::from(Span::styled(message.to_string(), theme.status_error())),
            None if file_picker.is_multiple() => Line::from(Span::styled(
                format!("{} marked", file_picker.marked().len()),
                theme.text_muted_style(),
            )),
            None => Line::default(),
        };
        frame.render_widget(Paragraph::new(line), area);
        Some(())
    }

    fn render_buttons(&self, frame: &mut Frame, layout: &FilePickerLayout, app: &App) -> Option<()> {
        let file_picker = app.file_picker.as_ref()?;
        let theme = &*app.ctx.theme;
        let options = ButtonRenderOptions::new(true, file_picker.f_cancel.get(), false, Borders::ALL, false);
        render_button(frame, layout.cancel_button_area, "Cancel", theme, options);

        let enabled = !file_picker.paths_to_confirm().is_empty();
        let options = ButtonRenderOptions::new(enabled, file_picker.f_confirm.get(), false, Borders::ALL, true);
        render_button(frame, layout.open_button_area, "Open", theme, options);
        Some(())
    }

    /// Opens the highlighted directory, or confirms the files to hand to the uploader.
    fn maybe_commit_selection(&mut self, app: &mut App) -> Option<Vec<Effect>> {
        let file_picker = app.file_picker.as_mut()?;
        if let Some(entry) = file_picker.selected_entry().cloned()
            && entry.is_directory
            && file_picker.f_list.get()
        {
            file_picker.set_cur_dir(entry.path.clone());
            return Some(vec![Effect::ListDirectoryContents(entry.path)]);
        }

        let paths = file_picker.paths_to_confirm();
        if paths.is_empty() {
            file_picker.set_status_message(Some("Select a file first".to_string()));
            return None;
        }
        let uploader_id = file_picker.request().uploader_id;
        Some(vec![Effect::CloseModal, Effect::InspectFiles { uploader_id, paths }])
    }

    fn toggle_mark_under_cursor(app: &mut App) {
        let theme = &*app.ctx.theme;
        let Some(file_picker) = app.file_picker.as_mut() else {
            return;
        };
        let Some(entry) = file_picker.selected_entry().cloned() else {
            return;
        };
        if entry.is_directory {
            return;
        }
        let selected = file_picker.list_state_mut().selected();
        if file_picker.toggle_mark(&entry.path) {
            file_picker.set_status_message(None);
            file_picker.rebuild_list_items(theme);
            file_picker.set_selected_index(selected);
        }
    }

    fn handle_maybe_button_click(&mut self, pos: Position, app: &mut App) -> Option<Vec<Effect>> {
        let file_picker = app.file_picker.as_mut()?;
        if let Some(shortcut_idx) =
            find_target_index_by_mouse_position(&self.layout.shortcut_bar_area, &self.shortcut_rects, pos.x, pos.y)
        {
            let path = file_picker.shortcut_pressed(shortcut_idx)?;
            app.focus.focus(file_picker.shortcuts_focus.get(shortcut_idx)?);
            return Some(vec![Effect::ListDirectoryContents(path)]);
        }
        if self.layout.cancel_button_area.contains(pos) {
            return Some(vec![Effect::CloseModal]);
        }
        if self.layout.open_button_area.contains(pos) {
            return self.maybe_commit_selection(app);
        }
        None
    }
}

impl Component for FilePickerModal {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let (Msg::ExecCompleted(outcome), Some(file_picker)) = (msg, app.file_picker.as_mut()) else {
            return Vec::new();
        };
        if let ExecOutcome::DirectoryContents { entries, root_path } = *outcome
            && file_picker.cur_dir().is_some_and(|dir| *dir == root_path)
        {
            file_picker.set_dir_contents(Some(entries));
            file_picker.rebuild_list_items(&*app.ctx.theme);
        }
        Vec::new()
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(file_picker) = app.file_picker.as_mut() else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Char(' ') if file_picker.f_list.get() && file_picker.is_multiple() => {
                Self::toggle_mark_under_cursor(app);
            }
            KeyCode::Char(' ') | KeyCode::Enter if file_picker.f_cancel.get() => {
                return vec![Effect::CloseModal];
            }
            KeyCode::Char(' ') | KeyCode::Enter if file_picker.f_list.get() || file_picker.f_confirm.get() => {
                return self.maybe_commit_selection(app).unwrap_or_default();
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let focused = file_picker.shortcuts_focus.iter().position(|f| f.get());
                if let Some(path) = focused.and_then(|idx| file_picker.shortcut_pressed(idx)) {
                    return vec![Effect::ListDirectoryContents(path)];
                }
            }
            KeyCode::Backspace if file_picker.f_list.get() => {
                if let Some(parent) = file_picker.parent_dir() {
                    file_picker.set_cur_dir(parent.clone());
                    return vec![Effect::ListDirectoryContents(parent)];
                }
            }
            KeyCode::Down if file_picker.f_list.get() => {
                file_picker.select_next();
            }
            KeyCode::Up if file_picker.f_list.get() => {
                file_picker.select_previous();
            }
            KeyCode::Tab => {
                app.focus.next();
            }
            KeyCode::BackTab => {
                app.focus.prev();
            }
            KeyCode::Esc => {
                return vec![Effect::CloseModal];
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let Some(file_picker) = app.file_picker.as_mut() else {
            return Vec::new();
        };
        let pos = Position::new(mouse.column, mouse.row);
        let list_area = self.layout.file_list_area;
        let idx = list_area
            .contains(pos)
            .then(|| (pos.y - list_area.y) as usize + file_picker.list_state_offset());

        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Up(MouseButton::Left) => {
                file_picker.set_mouse_over_idx(idx);
            }
            MouseEventKind::ScrollDown if idx.is_some() => {
                file_picker.list_state_mut().scroll_down_by(1);
            }
            MouseEventKind::ScrollUp if idx.is_some() => {
                file_picker.list_state_mut().scroll_up_by(1);
            }
            MouseEventKind::Down(MouseButton::Left) if idx.is_some() => {
                if !file_picker.f_list.get() {
                    app.focus.focus(&file_picker.f_list);
                }
                let already_selected = file_picker.list_state_mut().selected() == idx;
                let Some(entry) = file_picker.set_selected_index(idx).cloned() else {
                    return Vec::new();
                };
                if entry.is_directory {
                    file_picker.set_cur_dir(entry.path.clone());
                    return vec![Effect::ListDirectoryContents(entry.path)];
                }
                if already_selected && file_picker.is_multiple() {
                    Self::toggle_mark_under_cursor(app);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                return self.handle_maybe_button_click(pos, app).unwrap_or_default();
            }
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let outer = block(&*app.ctx.theme, Some("Choose files"), true);
        let layout = FilePickerLayout::from(self.get_preferred_layout(app, outer.inner(rect)).as_slice());
        frame.render_widget(outer, rect);

        self.render_shortcuts(frame, layout.shortcut_bar_area, app);
        self.render_header(frame, layout.header_area, app);
        self.render_list(frame, layout.file_list_area, app);
        self.render_details(frame, layout.details_area, app);
        self.render_status(frame, layout.status_area, app);
        self.render_buttons(frame, &layout, app);

        self.layout = layout;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let Some(file_picker) = app.file_picker.as_ref() else {
            return Vec::new();
        };
        let mut hints = vec![(" Esc", " Cancel "), ("Tab", " Next ")];
        if file_picker.f_list.get() {
            hints.push(("↑/↓", " Navigate "));
            hints.push(("Backspace", " Up a level "));
            if file_picker.is_multiple() {
                hints.push(("Space", " Mark "));
            }
            hints.push(("Enter", " Open "));
        }
        build_hint_spans(&*app.ctx.theme, &hints)
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        let outer_areas = Layout::horizontal([
            Constraint::Length(13), // Shortcuts
            Constraint::Length(1),  // Spacer
            Constraint::Min(1),     // Browser
        ])
        .split(area);

        let inner_areas = Layout::vertical([
            Constraint::Length(3), // Location
            Constraint::Min(5),    // Listing + details
            Constraint::Length(3), // Buttons
        ])
        .split(outer_areas[2]);

        let browser_areas = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).split(inner_areas[1]);

        let button_areas = Layout::horizontal([
            Constraint::Min(10),    // Status line
            Constraint::Length(10), // Cancel
            Constraint::Length(1),  // Spacer
            Constraint::Length(10), // Open
        ])
        .split(inner_areas[2]);

        // pin the status line to the button baseline
        let status = Layout::vertical([Constraint::Length(2), Constraint::Length(1)]).split(button_areas[0]);

        vec![
            outer_areas[0],
            inner_areas[0],
            browser_areas[0],
            browser_areas[1],
            status[1],
            button_areas[1],
            button_areas[3],
        ]
    }

    /// Requests the starting directory listing when the modal opens.
    fn on_route_enter(&mut self, app: &mut App) -> Vec<Effect> {
        match app.file_picker.as_ref().and_then(|picker| picker.cur_dir()) {
            Some(dir) => vec![Effect::ListDirectoryContents(dir.clone())],
            None => Vec::new(),
        }
    }
}
