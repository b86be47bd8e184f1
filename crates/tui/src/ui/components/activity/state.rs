use asset_uploader_types::UploaderId;
use chrono::{DateTime, Local};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::ListState};

/// Oldest entries are dropped past this many.
pub const MAX_ACTIVITY_ENTRIES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Info,
    Success,
    Error,
}

/// One line in the host page's activity panel.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub at: DateTime<Local>,
    pub level: ActivityLevel,
    pub source: Option<UploaderId>,
    pub message: String,
}

/// Rolling record of what the host callbacks reported.
#[derive(Debug)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
    list_state: ListState,
    follow_tail: bool,
    pub focus: FocusFlag,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            list_state: ListState::default(),
            follow_tail: true,
            focus: FocusFlag::new().with_name("activity"),
        }
    }
}

impl ActivityLog {
    pub fn push(&mut self, level: ActivityLevel, source: Option<UploaderId>, message: impl Into<String>) {
        self.entries.push(ActivityEntry {
            at: Local::now(),
            level,
            source,
            message: message.into(),
        });
        if self.entries.len() > MAX_ACTIVITY_ENTRIES {
            let overflow = self.entries.len() - MAX_ACTIVITY_ENTRIES;
            self.entries.drain(..overflow);
        }
        if self.follow_tail {
            self.list_state.select(Some(self.entries.len() - 1));
        }
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    pub fn list_state_mut(&mut self) -> &mut ListState {
        &mut self.list_state
    }

    pub fn scroll_up(&mut self) {
        self.follow_tail = false;
        let current = self.list_state.selected().unwrap_or(self.entries.len());
        self.list_state.select(Some(current.saturating_sub(1)));
    }

    /// Scrolls down; reaching the newest entry resumes following new ones.
    pub fn scroll_down(&mut self) {
        let Some(last) = self.entries.len().checked_sub(1) else {
            return;
        };
        let next = self.list_state.selected().map_or(last, |i| (i + 1).min(last));
        self.list_state.select(Some(next));
        self.follow_tail = next == last;
    }
}

impl HasFocus for ActivityLog {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}
