//! Terminal UI for the host page: components, the main view with its modal
//! slot, the event loop, and theming.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod theme;
pub mod utils;
