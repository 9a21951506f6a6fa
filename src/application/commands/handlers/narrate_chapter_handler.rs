//! NarrateChapter Handler - 单章朗读
//!
//! 翻译（可选）→ 分段 → 归属 → 分配音色 → 并发合成 → 拼接

use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{NarrateChapter, NarrationReport, SkippedSpan};
use crate::application::error::NarrationError;
use crate::application::pipeline::{assemble, build_jobs, SynthesisScheduler};
use crate::application::ports::{NarrationEventSink, TranslatorPort};
use crate::application::voices::RegistryFactory;
use crate::domain::narration::{attribute_spans, segment_text, AttributionConfig, SegmentConfig};

/// NarrateChapter Handler
pub struct NarrateChapterHandler {
    registries: RegistryFactory,
    scheduler: SynthesisScheduler,
    translator: Option<Arc<dyn TranslatorPort>>,
    events: Option<Arc<dyn NarrationEventSink>>,
    segment_config: SegmentConfig,
    attribution: AttributionConfig,
}

impl NarrateChapterHandler {
    pub fn new(registries: RegistryFactory, scheduler: SynthesisScheduler) -> Self {
        Self {
            registries,
            scheduler,
            translator: None,
            events: None,
            segment_config: SegmentConfig::default(),
            attribution: AttributionConfig::default(),
        }
    }

    pub fn with_translator(mut self, translator: Arc<dyn TranslatorPort>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// 章节级和片段级事件都发送到同一个 sink
    pub fn with_events(mut self, events: Arc<dyn NarrationEventSink>) -> Self {
        self.scheduler = self.scheduler.with_events(events.clone());
        self.events = Some(events);
        self
    }

    pub fn with_segment_config(mut self, config: SegmentConfig) -> Self {
        self.segment_config = config;
        self
    }

    pub fn with_attribution(mut self, config: AttributionConfig) -> Self {
        self.attribution = config;
        self
    }

    pub fn registries(&self) -> &RegistryFactory {
        &self.registries
    }

    pub async fn handle(&self, cmd: NarrateChapter) -> Result<NarrationReport, NarrationError> {
        let run_id = Uuid::new_v4();
        tracing::info!(
            run_id = %run_id,
            chars = cmd.text.chars().count(),
            translate = ?cmd.translate,
            "Narration started"
        );

        let result = self.narrate(run_id, cmd).await;

        match &result {
            Ok(report) => {
                tracing::info!(
                    run_id = %run_id,
                    total = report.total_spans,
                    skipped = report.skipped.len(),
                    bytes = report.audio.len(),
                    "Narration finished"
                );
                if let Some(events) = &self.events {
                    events.chapter_finished(run_id, report.total_spans, report.skipped.len());
                }
            }
            Err(e) => {
                tracing::error!(run_id = %run_id, error = %e, "Narration failed");
                if let Some(events) = &self.events {
                    events.chapter_failed(run_id, &e.to_string());
                }
            }
        }

        result
    }

    async fn narrate(
        &self,
        run_id: Uuid,
        cmd: NarrateChapter,
    ) -> Result<NarrationReport, NarrationError> {
        let text = match &cmd.translate {
            None => cmd.text,
            Some(target_lang) => {
                let translator = self
                    .translator
                    .as_ref()
                    .ok_or(NarrationError::TranslationUnavailable)?;
                translator.translate(&cmd.text, target_lang).await?
            }
        };

        let spans = attribute_spans(segment_text(&text, &self.segment_config), &self.attribution);
        let registry = cmd
            .registry
            .unwrap_or_else(|| Arc::new(self.registries.build()));

        let jobs = build_jobs(&spans, &registry);
        if jobs.is_empty() {
            return Err(NarrationError::EmptyChapter);
        }

        tracing::debug!(
            run_id = %run_id,
            spans = spans.len(),
            jobs = jobs.len(),
            speakers = registry.len(),
            "Synthesis jobs built"
        );

        let span_indices: Vec<usize> = jobs.iter().map(|job| job.span_index).collect();
        let results = self
            .scheduler
            .run(run_id, jobs, cmd.cancel.unwrap_or_default())
            .await;

        let assembled = assemble(results)?;
        let synthesized = assembled.synthesized();
        let skipped = assembled
            .skipped
            .into_iter()
            .map(|(slot, reason)| SkippedSpan {
                index: span_indices[slot],
                reason,
            })
            .collect();

        Ok(NarrationReport {
            run_id,
            audio: assembled.audio,
            total_spans: assembled.total,
            synthesized,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::NarrationStatus;
    use crate::application::pipeline::{SchedulerConfig, SkipReason};
    use crate::application::ports::{TranslateError, TtsEnginePort};
    use crate::domain::narration::SpeakerId;
    use crate::domain::voice::{FirstVoicePicker, VoiceCatalog, VoiceId, VoiceProfile};
    use crate::infrastructure::adapters::{FakeTtsClient, FakeTtsClientConfig};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    struct UppercaseTranslator;

    #[async_trait]
    impl TranslatorPort for UppercaseTranslator {
        async fn translate(&self, text: &str, _target_lang: &str) -> Result<String, TranslateError> {
            Ok(text.to_uppercase())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<String>>,
    }

    impl NarrationEventSink for RecordingSink {
        fn segment_ready(&self, _run_id: Uuid, span_index: usize, _audio_bytes: usize) {
            self.events.lock().unwrap().push(format!("ready:{}", span_index));
        }

        fn segment_skipped(&self, _run_id: Uuid, span_index: usize, _reason: &SkipReason) {
            self.events.lock().unwrap().push(format!("skipped:{}", span_index));
        }

        fn chapter_finished(&self, _run_id: Uuid, total: usize, skipped: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("finished:{}/{}", skipped, total));
        }

        fn chapter_failed(&self, _run_id: Uuid, _error: &str) {
            self.events.lock().unwrap().push("failed".to_string());
        }
    }

    fn factory() -> RegistryFactory {
        let catalog = VoiceCatalog::new(
            VoiceId::new("en-US-GuyNeural"),
            vec![
                VoiceProfile::new("en-US-AriaNeural", None),
                VoiceProfile::new("en-GB-RyanNeural", None),
            ],
        )
        .unwrap();
        RegistryFactory::new(catalog).with_picker(Arc::new(FirstVoicePicker))
    }

    fn handler_with(tts: Arc<dyn TtsEnginePort>, max_concurrent: usize) -> NarrateChapterHandler {
        let scheduler = SynthesisScheduler::new(
            SchedulerConfig {
                max_concurrent,
                ..Default::default()
            },
            tts,
        );
        NarrateChapterHandler::new(factory(), scheduler)
    }

    fn handler(fail_on: &[&str]) -> NarrateChapterHandler {
        let tts = FakeTtsClient::new(FakeTtsClientConfig {
            fail_on: fail_on.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        });
        handler_with(Arc::new(tts), 4)
    }

    fn find(haystack: &[u8], needle: &str) -> Option<usize> {
        haystack
            .windows(needle.len())
            .position(|window| window == needle.as_bytes())
    }

    const CHAPTER: &str = r#"He said, "I am fine." She frowned."#;

    #[tokio::test]
    async fn test_narrates_in_document_order() {
        let report = handler(&[]).handle(NarrateChapter::new(CHAPTER)).await.unwrap();

        assert_eq!(report.status(), NarrationStatus::Complete);
        assert_eq!(report.total_spans, 3);
        assert_eq!(report.synthesized, 3);

        let first = find(&report.audio, "He said,").unwrap();
        let second = find(&report.audio, "I am fine.").unwrap();
        let third = find(&report.audio, "She frowned.").unwrap();
        assert!(first < second && second < third);

        // 旁白使用固定音色，对白使用音色池
        assert!(find(&report.audio, "<en-US-GuyNeural|+0%,+0%,+0%|He said,>").is_some());
        assert!(find(&report.audio, "<en-US-AriaNeural|+0%,+0%,+0%|I am fine.>").is_some());
    }

    #[tokio::test]
    async fn test_one_failure_yields_partial_audio() {
        let complete = handler(&[]).handle(NarrateChapter::new(CHAPTER)).await.unwrap();
        let partial = handler(&["fine"]).handle(NarrateChapter::new(CHAPTER)).await.unwrap();

        assert_eq!(
            partial.status(),
            NarrationStatus::Partial {
                skipped: 1,
                total: 3
            }
        );
        assert_eq!(partial.skipped[0].index, 1);
        assert!(matches!(partial.skipped[0].reason, SkipReason::Backend(_)));

        // 其余片段按原顺序拼接，跳过的位置不留任何字节
        let mut expected = complete.audio[..256].to_vec();
        expected.extend_from_slice(&complete.audio[512..]);
        assert_eq!(partial.audio, expected);
    }

    #[tokio::test]
    async fn test_all_failed_is_error() {
        let result = handler(&["said", "fine", "frowned"])
            .handle(NarrateChapter::new(CHAPTER))
            .await;

        assert!(matches!(
            result,
            Err(NarrationError::AllSegmentsFailed {
                total: 3,
                skipped: 3
            })
        ));
    }

    #[tokio::test]
    async fn test_empty_chapter() {
        let handler = handler(&[]);

        assert!(matches!(
            handler.handle(NarrateChapter::new("  \n\n  ")).await,
            Err(NarrationError::EmptyChapter)
        ));
        assert!(matches!(
            handler.handle(NarrateChapter::new(r#""""#)).await,
            Err(NarrationError::EmptyChapter)
        ));
    }

    #[tokio::test]
    async fn test_translation_requires_translator() {
        let cmd = NarrateChapter::new(CHAPTER).with_translation("fr");

        assert!(matches!(
            handler(&[]).handle(cmd.clone()).await,
            Err(NarrationError::TranslationUnavailable)
        ));

        let report = handler(&[])
            .with_translator(Arc::new(UppercaseTranslator))
            .handle(cmd)
            .await
            .unwrap();
        assert!(find(&report.audio, "I AM FINE.").is_some());
    }

    #[tokio::test]
    async fn test_shared_registry_keeps_voices() {
        let handler = handler(&[]);
        let registry = Arc::new(handler.registries().build());

        handler
            .handle(NarrateChapter::new(r#""Run!" shouted Mira."#).with_registry(registry.clone()))
            .await
            .unwrap();
        let first = registry.assigned(&SpeakerId::new("Mira")).unwrap();

        let report = handler
            .handle(NarrateChapter::new(r#""Wait," said Tom. "No," said Mira."#).with_registry(registry.clone()))
            .await
            .unwrap();

        assert_eq!(registry.assigned(&SpeakerId::new("mira")), Some(first.clone()));
        let tom = registry.assigned(&SpeakerId::new("tom")).unwrap();
        assert_ne!(tom, first);
        assert!(find(&report.audio, &format!("<{}|", first)).is_some());
    }

    #[tokio::test]
    async fn test_events_are_published() {
        let sink = Arc::new(RecordingSink::default());
        let handler = handler(&["fine"]).with_events(sink.clone());

        handler.handle(NarrateChapter::new(CHAPTER)).await.unwrap();

        let mut events = sink.events.lock().unwrap().clone();
        let last = events.pop();
        events.sort();
        assert_eq!(events, vec!["ready:0", "ready:2", "skipped:1"]);
        assert_eq!(last.as_deref(), Some("finished:1/3"));
    }

    #[tokio::test]
    async fn test_cancelled_run_fails_cleanly() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = handler(&[])
            .handle(NarrateChapter::new(CHAPTER).with_cancel(cancel))
            .await;

        assert!(matches!(result, Err(NarrationError::AllSegmentsFailed { total: 3, .. })));
    }

    #[tokio::test]
    async fn test_worker_count_does_not_change_audio() {
        let text = r#"The storm broke at night. "Get inside!" shouted Mira. Tom laughed. "It is only rain," said Tom.

"I hate this," whispered the girl. The wind howled over the roofs."#;

        let tts = Arc::new(FakeTtsClient::new(FakeTtsClientConfig {
            latency: std::time::Duration::from_millis(3),
            ..Default::default()
        }));
        let serial = handler_with(tts.clone(), 1)
            .handle(NarrateChapter::new(text))
            .await
            .unwrap();
        let parallel = handler_with(tts, 8)
            .handle(NarrateChapter::new(text))
            .await
            .unwrap();

        assert_eq!(serial.audio, parallel.audio);
        assert_eq!(serial.total_spans, parallel.total_spans);
    }
}
