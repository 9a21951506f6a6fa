//! Chapter Adapter - 章节网页获取

mod http_chapter_source;

pub use http_chapter_source::{extract_chapter, HttpChapterSource, HttpChapterSourceConfig};
