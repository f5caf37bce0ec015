//! Bridge between the UI loop and the lookup worker thread.

pub mod commands;
pub mod runtime;
