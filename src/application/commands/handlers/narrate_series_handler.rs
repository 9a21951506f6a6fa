//! NarrateSeries Handler - 连续章节朗读
//!
//! 从起始章节开始逐章获取、朗读并保存，直到章节数上限、标题不再属于同一部小说、
//! URL 无法递增或获取失败。整个系列共用一个 VoiceRegistry。

use regex::Regex;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use uuid::Uuid;

use super::NarrateChapterHandler;
use crate::application::commands::{
    ChapterOutcome, ChapterResult, NarrateChapter, NarrateSeries, SeriesReport, StopReason,
};
use crate::application::ports::{Chapter, ChapterAudioStorePort, ChapterSourcePort};
use crate::domain::voice::VoiceRegistry;

/// 连续朗读配置
#[derive(Debug, Clone)]
pub struct SeriesConfig {
    pub max_chapters: u32,
    /// 两章之间的等待时间
    pub delay: Duration,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            max_chapters: 20,
            delay: Duration::from_millis(2000),
        }
    }
}

/// NarrateSeries Handler
pub struct NarrateSeriesHandler {
    source: Arc<dyn ChapterSourcePort>,
    store: Arc<dyn ChapterAudioStorePort>,
    narrator: Arc<NarrateChapterHandler>,
    config: SeriesConfig,
}

impl NarrateSeriesHandler {
    pub fn new(
        source: Arc<dyn ChapterSourcePort>,
        store: Arc<dyn ChapterAudioStorePort>,
        narrator: Arc<NarrateChapterHandler>,
        config: SeriesConfig,
    ) -> Self {
        Self {
            source,
            store,
            narrator,
            config,
        }
    }

    pub async fn handle(&self, cmd: NarrateSeries) -> SeriesReport {
        let run_id = Uuid::new_v4();
        let max_chapters = cmd.max_chapters.unwrap_or(self.config.max_chapters).max(1);
        let registry = Arc::new(self.narrator.registries().build());

        tracing::info!(
            run_id = %run_id,
            start_url = %cmd.start_url,
            max_chapters = max_chapters,
            "Series narration started"
        );

        let mut chapters = Vec::new();
        let mut reference_title: Option<String> = None;
        let mut url = cmd.start_url;
        let mut ordinal = 1u32;

        let stop_reason = loop {
            let chapter = match self.source.fetch(&url).await {
                Ok(chapter) => chapter,
                Err(e) => {
                    tracing::error!(run_id = %run_id, url = %url, error = %e, "Chapter fetch failed");
                    break StopReason::FetchFailed {
                        url,
                        error: e.to_string(),
                    };
                }
            };

            match &reference_title {
                None => reference_title = Some(chapter.title.clone()),
                Some(reference) if !is_same_novel(reference, &chapter.title) => {
                    tracing::info!(
                        run_id = %run_id,
                        reference = %reference,
                        title = %chapter.title,
                        "Title mismatch, stopping series"
                    );
                    break StopReason::DifferentNovel {
                        title: chapter.title,
                    };
                }
                Some(_) => {}
            }

            let result = self
                .narrate_chapter(run_id, ordinal, &chapter, &registry, cmd.translate.clone())
                .await;
            chapters.push(ChapterOutcome {
                ordinal,
                url: chapter.url,
                title: chapter.title,
                result,
            });

            if ordinal >= max_chapters {
                break StopReason::MaxChapters;
            }

            let Some(next) = next_chapter_url(&url) else {
                break StopReason::NoNextUrl;
            };
            url = next;
            ordinal += 1;

            if !self.config.delay.is_zero() {
                tokio::time::sleep(self.config.delay).await;
            }
        };

        let report = SeriesReport {
            run_id,
            chapters,
            stop_reason,
        };
        tracing::info!(
            run_id = %run_id,
            chapters = report.chapters.len(),
            narrated = report.narrated(),
            stop_reason = ?report.stop_reason,
            "Series narration finished"
        );
        report
    }

    async fn narrate_chapter(
        &self,
        run_id: Uuid,
        ordinal: u32,
        chapter: &Chapter,
        registry: &Arc<VoiceRegistry>,
        translate: Option<String>,
    ) -> ChapterResult {
        let mut cmd = NarrateChapter::new(chapter.body.clone()).with_registry(registry.clone());
        cmd.translate = translate;

        let report = match self.narrator.handle(cmd).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(run_id = %run_id, ordinal = ordinal, error = %e, "Chapter narration failed");
                return ChapterResult::Failed {
                    error: e.to_string(),
                };
            }
        };

        match self.store.save_chapter(run_id, ordinal, &report.audio).await {
            Ok(path) => ChapterResult::Narrated {
                path,
                total_spans: report.total_spans,
                skipped: report.skipped.len(),
            },
            Err(e) => {
                tracing::error!(run_id = %run_id, ordinal = ordinal, error = %e, "Failed to save chapter audio");
                ChapterResult::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}

fn chapter_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(?:chapter|ch\.?)\s*\d+").expect("valid chapter regex"))
}

fn last_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid digits regex"))
}

/// 去掉章节号后的标题主体，用于比较
fn title_key(title: &str) -> String {
    let stripped = chapter_marker().replace_all(title, " ");
    let cleaned: String = stripped
        .chars()
        .map(|c| {
            if c.is_ascii_digit() || matches!(c, '-' | '–' | '—' | '|' | ':') {
                ' '
            } else {
                c
            }
        })
        .collect();
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 两个章节标题是否属于同一部小说
///
/// 只剩章节号的标题（如 "Chapter 3"）主体为空，彼此视为相同
pub fn is_same_novel(reference: &str, title: &str) -> bool {
    title_key(reference) == title_key(title)
}

/// 递增 URL 路径中最后一段数字，找不到时返回 None
pub fn next_chapter_url(url: &str) -> Option<String> {
    // 查询串和锚点不参与
    let path_end = url.find(['?', '#']).unwrap_or(url.len());
    let (path, tail) = url.split_at(path_end);

    let digits = last_digits().find_iter(path).last()?;
    let width = digits.as_str().len();
    let next = digits.as_str().parse::<u64>().ok()?.checked_add(1)?;

    Some(format!(
        "{}{:0width$}{}{}",
        &path[..digits.start()],
        next,
        &path[digits.end()..],
        tail,
        width = width
    ))
}
