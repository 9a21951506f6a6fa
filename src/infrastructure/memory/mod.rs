//! Memory Layer - In-Memory State Management
//!
//! 音色会话的内存实现与空闲回收

mod sweeper;
mod voice_sessions;

pub use sweeper::SessionSweeper;
pub use voice_sessions::InMemoryVoiceSessions;
