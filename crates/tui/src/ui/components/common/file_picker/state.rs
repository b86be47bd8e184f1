//! State container for the file picker modal.

use std::path::{Path, PathBuf};

use asset_uploader_types::{DirectoryEntry, PickerRequest, SelectedFile};
use asset_uploader_util::{guess_mime_type, inspect_file};
use dirs_next::{desktop_dir, document_dir, download_dir, home_dir, picture_dir, video_dir};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{ListItem, ListState},
};
use tracing::debug;

use crate::ui::theme::Theme;

/// Quick access shortcut displayed in the picker sidebar.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub name: String,
    pub path: PathBuf,
}

/// UI state backing the file picker modal.
///
/// The picker is opened on behalf of one uploader. It browses directories,
/// shows details for the highlighted file, and collects the paths that are
/// confirmed. In multi-select mode files are marked individually and
/// confirmed together.
#[derive(Debug, Clone)]
pub struct FilePickerState {
    request: PickerRequest,
    cur_dir: Option<PathBuf>,
    dir_contents: Option<Vec<DirectoryEntry>>,
    details: Option<SelectedFile>,
    marked: Vec<PathBuf>,

    shortcuts: Vec<Shortcut>,
    list_state: ListState,
    list_items: Vec<ListItem<'static>>,

    mouse_over_idx: Option<usize>,
    selected_shortcut_idx: Option<usize>,
    status_message: Option<String>,

    container_focus: FocusFlag,
    pub f_list: FocusFlag,
    pub f_cancel: FocusFlag,
    pub f_confirm: FocusFlag,
    pub shortcuts_focus: Vec<FocusFlag>,
}

impl FilePickerState {
    /// Builds a picker for `request`, starting in `start_dir` or the home directory.
    pub fn new(request: PickerRequest, start_dir: Option<PathBuf>) -> Self {
        let shortcuts: Vec<Shortcut> = [home_dir(), desktop_dir(), document_dir(), download_dir(), picture_dir(), video_dir()]
            .into_iter()
            .flatten()
            .filter_map(|path| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                Some(Shortcut { name, path })
            })
            .collect();

        let shortcuts_focus = shortcuts
            .iter()
            .map(|s| FocusFlag::new().with_name(&format!("filepicker.shortcut.{}", &s.name)))
            .collect();

        Self {
            request,
            cur_dir: start_dir.or_else(home_dir),
            dir_contents: None,
            details: None,
            marked: Vec::new(),
            shortcuts,
            list_state: ListState::default(),
            list_items: Vec::new(),
            mouse_over_idx: None,
            selected_shortcut_idx: None,
            status_message: None,
            container_focus: FocusFlag::new().with_name("filepicker.container"),
            f_list: FocusFlag::new().with_name("filepicker.list"),
            f_cancel: FocusFlag::new().with_name("filepicker.cancel"),
            f_confirm: FocusFlag::new().with_name("filepicker.confirm"),
            shortcuts_focus,
        }
    }

    pub fn request(&self) -> &PickerRequest {
        &self.request
    }

    pub fn is_multiple(&self) -> bool {
        self.request.multiple
    }

    /// Sets the active directory and clears the listing until it reloads.
    pub fn set_cur_dir(&mut self, dir: PathBuf) {
        self.cur_dir = Some(dir);
        self.set_dir_contents(None);
    }

    pub fn cur_dir(&self) -> Option<&PathBuf> {
        self.cur_dir.as_ref()
    }

    /// Directory one level up from the current one.
    pub fn parent_dir(&self) -> Option<PathBuf> {
        self.cur_dir.as_deref().and_then(Path::parent).map(Path::to_path_buf)
    }

    /// Replaces the displayed entries and clears the highlighted row.
    pub fn set_dir_contents(&mut self, contents: Option<Vec<DirectoryEntry>>) {
        self.dir_contents = contents;
        self.set_selected_index(None);
    }

    pub fn dir_contents(&self) -> Option<&[DirectoryEntry]> {
        self.dir_contents.as_deref()
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    pub fn list_state_mut(&mut self) -> &mut ListState {
        &mut self.list_state
    }

    pub fn list_state_offset(&self) -> usize {
        self.list_state.offset()
    }

    pub fn list_items(&self) -> &[ListItem<'static>] {
        &self.list_items
    }

    /// Entry under the list cursor.
    pub fn selected_entry(&self) -> Option<&DirectoryEntry> {
        let idx = self.list_state.selected()?;
        self.dir_contents.as_ref()?.get(idx)
    }

    /// Details of the highlighted file, read when the cursor lands on it.
    pub fn details(&self) -> Option<&SelectedFile> {
        self.details.as_ref()
    }

    /// Moves the list cursor and refreshes the details pane.
    pub fn set_selected_index(&mut self, idx: Option<usize>) -> Option<&DirectoryEntry> {
        self.details = None;
        let Some(idx) = idx.filter(|i| self.dir_contents.as_ref().is_some_and(|c| *i < c.len())) else {
            self.list_state.select(None);
            return None;
        };
        self.list_state.select(Some(idx));
        let entry = self.dir_contents.as_ref()?.get(idx)?;
        if !entry.is_directory {
            self.details = match inspect_file(&entry.path) {
                Ok(file) => Some(file),
                Err(error) => {
                    debug!(path = %entry.path.display(), %error, "could not inspect highlighted file");
                    None
                }
            };
        }
        Some(entry)
    }

    pub fn select_next(&mut self) -> Option<&DirectoryEntry> {
        let len = self.dir_contents.as_ref().map_or(0, Vec::len);
        if len == 0 {
            return None;
        }
        let next = self.list_state.selected().map_or(0, |i| (i + 1) % len);
        self.set_selected_index(Some(next))
    }

    pub fn select_previous(&mut self) -> Option<&DirectoryEntry> {
        let len = self.dir_contents.as_ref().map_or(0, Vec::len);
        if len == 0 {
            return None;
        }
        let previous = self.list_state.selected().map_or(len - 1, |i| (i + len - 1) % len);
        self.set_selected_index(Some(previous))
    }

    /// `true` when the uploader's accepted types suggest this path.
    pub fn is_suggested(&self, path: &Path) -> bool {
        let extension = path.extension().and_then(|e| e.to_str());
        self.request.accept.suggests(guess_mime_type(path), extension)
    }

    /// Toggles the multi-select mark on a file; ignored for directories and single mode.
    pub fn toggle_mark(&mut self, path: &Path) -> bool {
        let is_directory = self
            .dir_contents
            .iter()
            .flatten()
            .any(|entry| entry.is_directory && entry.path == path);
        if !self.request.multiple || is_directory {
            return false;
        }
        if let Some(pos) = self.marked.iter().position(|p| p == path) {
            self.marked.remove(pos);
        } else {
            self.marked.push(path.to_path_buf());
        }
        true
    }

    pub fn is_marked(&self, path: &Path) -> bool {
        self.marked.iter().any(|p| p == path)
    }

    pub fn marked(&self) -> &[PathBuf] {
        &self.marked
    }

    /// Paths that confirming the picker would hand to the uploader.
    ///
    /// Marked files win in multi-select mode; otherwise the highlighted file
    /// is used. Directories never count.
    pub fn paths_to_confirm(&self) -> Vec<PathBuf> {
        if self.request.multiple && !self.marked.is_empty() {
            return self.marked.clone();
        }
        match self.selected_entry() {
            Some(entry) if !entry.is_directory => vec![entry.path.clone()],
            _ => Vec::new(),
        }
    }

    pub fn set_status_message(&mut self, message: Option<String>) {
        self.status_message = message;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_mouse_over_idx(&mut self, idx: Option<usize>) {
        self.mouse_over_idx = idx;
    }

    pub fn mouse_over_idx(&self) -> Option<usize> {
        self.mouse_over_idx
    }

    /// Activates a shortcut and returns the directory to list.
    pub fn shortcut_pressed(&mut self, idx: usize) -> Option<PathBuf> {
        let path = self.shortcuts.get(idx)?.path.clone();
        self.set_cur_dir(path.clone());
        self.selected_shortcut_idx = Some(idx);
        Some(path)
    }

    pub fn selected_shortcut_idx(&self) -> Option<usize> {
        self.selected_shortcut_idx
    }

    /// Recomputes the rendered rows from the current listing and selects the first row.
    pub fn rebuild_list_items(&mut self, theme: &dyn Theme) {
        self.list_items = match self.dir_contents.as_ref() {
            None => vec![ListItem::new(Line::from(Span::styled(
                "Directory contents unavailable",
                theme.status_error(),
            )))],
            Some(contents) => contents
                .iter()
                .enumerate()
                .map(|(idx, entry)| self.list_item_for(idx, entry, theme))
                .collect(),
        };
        self.list_state.select(None);
        self.select_next();
    }

    fn list_item_for(&self, idx: usize, entry: &DirectoryEntry, theme: &dyn Theme) -> ListItem<'static> {
        let is_parent = idx == 0 && self.parent_dir().is_some_and(|parent| parent == entry.path);
        if is_parent {
            return ListItem::new(Line::from(Span::styled("/..", theme.directory_style())));
        }
        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if entry.is_directory {
            return ListItem::new(Line::from(Span::styled(format!("/{name}"), theme.directory_style())));
        }

        let style = if self.is_suggested(&entry.path) {
            theme.text_primary_style()
        } else {
            theme.text_muted_style().add_modifier(Modifier::DIM)
        };
        let mut spans = Vec::with_capacity(2);
        if self.request.multiple {
            let mark = if self.is_marked(&entry.path) { "[x] " } else { "[ ] " };
            spans.push(Span::styled(mark, theme.accent_emphasis_style()));
        }
        spans.push(Span::styled(name, style));
        ListItem::new(Line::from(spans))
    }
}

impl HasFocus for FilePickerState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_list);
        builder.leaf_widget(&self.f_cancel);
        builder.leaf_widget(&self.f_confirm);
        for shortcut in &self.shortcuts_focus {
            builder.leaf_widget(shortcut);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use asset_uploader_types::{AcceptPatterns, UploaderId};
    use asset_uploader_util::list_directory;
    use tempfile::tempdir;

    use super::*;
    use crate::ui::theme::DraculaTheme;

    fn request(multiple: bool) -> PickerRequest {
        PickerRequest {
            uploader_id: UploaderId(0),
            accept: AcceptPatterns::parse("image/jpeg,image/png"),
            multiple,
        }
    }

    fn loaded_picker(multiple: bool) -> (tempfile::TempDir, FilePickerState) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.png"), [0u8; 4]).unwrap();
        fs::write(dir.path().join("b.txt"), "notes").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let mut picker = FilePickerState::new(request(multiple), Some(dir.path().to_path_buf()));
        picker.set_dir_contents(Some(list_directory(dir.path()).unwrap()));
        picker.rebuild_list_items(&DraculaTheme::new());
        (dir, picker)
    }

    #[test]
    fn listing_starts_on_parent_row() {
        let (_dir, picker) = loaded_picker(false);
        assert_eq!(picker.list_items().len(), 4);
        assert!(picker.selected_entry().is_some_and(|e| e.is_directory));
        assert!(picker.paths_to_confirm().is_empty());
    }

    #[test]
    fn highlighting_a_file_loads_details() {
        let (dir, mut picker) = loaded_picker(false);
        // parent, nested, a.png, b.txt
        let entry = picker.set_selected_index(Some(2)).cloned().unwrap();
        assert_eq!(entry.path, dir.path().join("a.png"));
        let details = picker.details().unwrap();
        assert_eq!(details.mime_type, "image/png");
        assert_eq!(details.size, 4);
        assert_eq!(picker.paths_to_confirm(), vec![dir.path().join("a.png")]);
    }

    #[test]
    fn suggestions_follow_accepted_types() {
        let (dir, picker) = loaded_picker(false);
        assert!(picker.is_suggested(&dir.path().join("a.png")));
        assert!(!picker.is_suggested(&dir.path().join("b.txt")));
    }

    #[test]
    fn marks_are_only_kept_in_multiple_mode() {
        let (dir, mut single) = loaded_picker(false);
        assert!(!single.toggle_mark(&dir.path().join("a.png")));

        let (dir, mut multi) = loaded_picker(true);
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.txt");
        multi.toggle_mark(&b);
        multi.toggle_mark(&a);
        assert_eq!(multi.paths_to_confirm(), vec![b.clone(), a.clone()]);
        multi.toggle_mark(&b);
        assert_eq!(multi.marked(), &[a]);
    }

    #[test]
    fn directories_cannot_be_marked() {
        let (dir, mut picker) = loaded_picker(true);
        assert!(!picker.toggle_mark(&dir.path().join("nested")));
        assert!(!picker.is_marked(&dir.path().join("nested")));
        assert!(picker.marked().is_empty());
    }

    #[test]
    fn cursor_wraps_around_listing() {
        let (_dir, mut picker) = loaded_picker(false);
        picker.select_previous();
        assert_eq!(picker.list_state_mut().selected(), Some(3));
        picker.select_next();
        assert_eq!(picker.list_state_mut().selected(), Some(0));
    }
}
