//! Storage Adapter - 章节音频文件存储

mod file_chapter_store;

pub use file_chapter_store::FileChapterStore;
