//! TUI widgets for the planning board

pub mod card_column;
pub mod editor;
pub mod input;
pub mod status_bar;

pub use card_column::CardColumnWidget;
pub use editor::EditorWidget;
pub use input::InputWidget;
pub use status_bar::{HotkeyBarWidget, StatusBarWidget};
