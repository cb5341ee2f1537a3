//! Terminal user interface for the planning board
//!
//! Built with ratatui, providing:
//! - Four card columns with cursor and selection highlights
//! - A multi-line editor dialog for adding and editing cards
//! - Status, hotkey and command lines
//! - A help overlay

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;

pub use render::render;
pub use theme::BoardTheme;
