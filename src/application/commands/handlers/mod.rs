//! Command Handlers 实现

mod narrate_chapter_handler;
mod narrate_series_handler;

pub use narrate_chapter_handler::*;
pub use narrate_series_handler::*;
