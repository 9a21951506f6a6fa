//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod chapter;
pub mod storage;
pub mod translate;
pub mod tts;

pub use chapter::*;
pub use storage::*;
pub use translate::*;
pub use tts::*;
