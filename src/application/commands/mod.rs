//! 应用层 - 命令
//!
//! 单章朗读与连续章节朗读

mod narrate_commands;
mod series_commands;

pub mod handlers;

pub use narrate_commands::*;
pub use series_commands::*;
