//! UI layer for the admin form host: event handling and terminal rendering.

pub mod app;
pub mod terminal;

pub use app::{FormApp, LoopControl};
pub use terminal::{RenderFormat, TerminalSurface};
