//! HTTP Handlers

mod narrate;
mod ping;
mod series;
mod voices;
mod websocket;

pub use narrate::*;
pub use ping::*;
pub use series::*;
pub use voices::*;
pub use websocket::*;
