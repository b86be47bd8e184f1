//! Component system for the uploader UI.
//!
//! Components own local UI behavior and render themselves into a provided
//! `Rect`. Anything that reaches outside the component (opening a modal,
//! touching the file system) is reported back as an [`Effect`].

use asset_uploader_types::{Effect, Msg};
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect, text::Span};

use crate::app::App;

pub(crate) trait Component: std::fmt::Debug {
    /// Handle an application-level message the component cares about.
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events while this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events routed to this component.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should only draw and cache layout rects for hit
    /// testing; state changes belong in the handlers.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Footer hints describing the key bindings active in this component.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }

    /// Splits `area` into the regions this component renders into.
    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        vec![area]
    }

    /// Called when the component becomes visible.
    fn on_route_enter(&mut self, _app: &mut App) -> Vec<Effect> {
        Vec::new()
    }
}
