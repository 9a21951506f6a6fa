//! Synthesis Scheduler - 有界并发合成
//!
//! 每个任务在 JoinSet 中独立运行，通过 semaphore 限制同时在途的后端调用数。
//! 结果按任务的 slot 写入预分配数组，输出顺序只由 slot 决定。
//!
//! 失败策略：后端错误、超时、音频过小都记为 Skipped 并继续处理其余任务，
//! 单个片段失败不会中断整批。取消后未开始和在途的任务记为 Cancelled，
//! 结果数组始终完整，可直接交给 assembler。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{SkipReason, SynthesisJob, SynthesisResult};
use crate::application::ports::{NarrationEventSink, TtsEnginePort, TtsError};

/// 调度器配置
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// 最大并发合成数
    pub max_concurrent: usize,
    /// 单个任务失败后的额外重试次数
    pub max_retries: u32,
    /// 单次后端调用超时
    pub job_timeout: Duration,
    /// 音频最小字节数，低于此值视为失败
    pub min_audio_bytes: usize,
    /// 是否向后端发送 SSML
    pub use_ssml: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            max_retries: 0,
            job_timeout: Duration::from_secs(90),
            min_audio_bytes: 256,
            use_ssml: false,
        }
    }
}

/// 合成调度器
pub struct SynthesisScheduler {
    config: SchedulerConfig,
    tts_engine: Arc<dyn TtsEnginePort>,
    events: Option<Arc<dyn NarrationEventSink>>,
}

impl SynthesisScheduler {
    pub fn new(config: SchedulerConfig, tts_engine: Arc<dyn TtsEnginePort>) -> Self {
        Self {
            config,
            tts_engine,
            events: None,
        }
    }

    /// 挂载事件输出
    pub fn with_events(mut self, events: Arc<dyn NarrationEventSink>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// 执行整批任务，返回与任务 slot 一一对应的结果
    pub async fn run(
        &self,
        run_id: Uuid,
        jobs: Vec<SynthesisJob>,
        cancel: CancellationToken,
    ) -> Vec<SynthesisResult> {
        let total = jobs.len();
        let mut results: Vec<Option<SynthesisResult>> = vec![None; total];
        let mut span_indices = vec![0usize; total];
        for job in &jobs {
            span_indices[job.slot] = job.span_index;
        }

        tracing::info!(
            run_id = %run_id,
            jobs = total,
            max_concurrent = self.config.max_concurrent,
            "Synthesis batch started"
        );

        // 使用 semaphore 控制并发
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));
        let mut workers = JoinSet::new();

        for job in jobs {
            let semaphore = semaphore.clone();
            let tts_engine = self.tts_engine.clone();
            let config = self.config.clone();
            let cancel = cancel.clone();

            workers.spawn(async move {
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => SynthesisResult::skipped(SkipReason::Cancelled),
                    permit = semaphore.acquire_owned() => match permit {
                        // 持有 permit 直到任务完成
                        Ok(_permit) => Self::process_job(&job, tts_engine, &config, &cancel).await,
                        Err(_) => SynthesisResult::skipped(SkipReason::Backend(
                            "worker pool closed".to_string(),
                        )),
                    },
                };
                (job.slot, result)
            });
        }

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((slot, result)) => {
                    self.publish(run_id, span_indices[slot], &result);
                    results[slot] = Some(result);
                }
                Err(e) => {
                    // 无法得知是哪个 slot，收尾时统一补齐
                    tracing::error!(run_id = %run_id, error = %e, "Synthesis worker aborted");
                }
            }
        }

        results
            .into_iter()
            .enumerate()
            .map(|(slot, result)| {
                result.unwrap_or_else(|| {
                    let result = SynthesisResult::skipped(SkipReason::Backend(
                        "worker panicked".to_string(),
                    ));
                    self.publish(run_id, span_indices[slot], &result);
                    result
                })
            })
            .collect()
    }

    /// 处理单个任务（含有限次重试）
    async fn process_job(
        job: &SynthesisJob,
        tts_engine: Arc<dyn TtsEnginePort>,
        config: &SchedulerConfig,
        cancel: &CancellationToken,
    ) -> SynthesisResult {
        let attempts = config.max_retries + 1;
        let min_bytes = config.min_audio_bytes.max(1);
        let mut last_reason = SkipReason::Cancelled;

        for attempt in 1..=attempts {
            tracing::debug!(
                slot = job.slot,
                span_index = job.span_index,
                voice = %job.voice,
                attempt = attempt,
                "Dispatching synthesis job"
            );

            let request = job.to_request(config.use_ssml);
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return SynthesisResult::skipped(SkipReason::Cancelled),
                outcome = tokio::time::timeout(config.job_timeout, tts_engine.infer(request)) => outcome,
            };

            let reason = match outcome {
                Ok(Ok(response)) if response.audio_data.len() >= min_bytes => {
                    return SynthesisResult::Success {
                        audio: response.audio_data,
                    };
                }
                Ok(Ok(response)) => SkipReason::UndersizedPayload {
                    len: response.audio_data.len(),
                    min: min_bytes,
                },
                Ok(Err(TtsError::Timeout)) | Err(_) => SkipReason::Timeout,
                Ok(Err(e)) => SkipReason::Backend(e.to_string()),
            };

            tracing::warn!(
                slot = job.slot,
                span_index = job.span_index,
                attempt = attempt,
                reason = %reason,
                "Synthesis attempt failed"
            );
            last_reason = reason;
        }

        SynthesisResult::skipped(last_reason)
    }

    fn publish(&self, run_id: Uuid, span_index: usize, result: &SynthesisResult) {
        let Some(events) = &self.events else {
            return;
        };
        match result {
            SynthesisResult::Success { audio } => events.segment_ready(run_id, span_index, audio.len()),
            SynthesisResult::Skipped { reason } => events.segment_skipped(run_id, span_index, reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{InferRequest, InferResponse};
    use crate::domain::narration::{EmotionTag, Prosody, SpeakerId};
    use crate::domain::voice::VoiceId;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 按文本脚本化的后端：可设置延迟、失败次数，并统计并发峰值
    #[derive(Default)]
    struct ScriptedEngine {
        delays_ms: HashMap<String, u64>,
        failures: Mutex<HashMap<String, u32>>,
        short: Vec<String>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl ScriptedEngine {
        fn delay(mut self, text: &str, ms: u64) -> Self {
            self.delays_ms.insert(text.to_string(), ms);
            self
        }

        fn fail(self, text: &str, times: u32) -> Self {
            self.failures.lock().unwrap().insert(text.to_string(), times);
            self
        }

        fn short(mut self, text: &str) -> Self {
            self.short.push(text.to_string());
            self
        }
    }

    #[async_trait]
    impl TtsEnginePort for ScriptedEngine {
        async fn infer(&self, request: InferRequest) -> Result<InferResponse, TtsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let delay = self.delays_ms.get(&request.text).copied().unwrap_or(5);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            {
                let mut failures = self.failures.lock().unwrap();
                if let Some(left) = failures.get_mut(&request.text) {
                    if *left > 0 {
                        *left -= 1;
                        return Err(TtsError::ServiceError("HTTP 503".to_string()));
                    }
                }
            }

            if self.short.contains(&request.text) {
                return Ok(InferResponse {
                    audio_data: vec![],
                    content_type: None,
                });
            }

            Ok(InferResponse {
                audio_data: format!("[{}]", request.text).into_bytes(),
                content_type: Some("audio/mpeg".to_string()),
            })
        }
    }

    fn jobs(texts: &[&str]) -> Vec<SynthesisJob> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| SynthesisJob {
                slot: i,
                span_index: i,
                text: text.to_string(),
                speaker: SpeakerId::narrator(),
                voice: VoiceId::new("narrator-voice"),
                emotion: EmotionTag::Neutral,
                prosody: Prosody::NEUTRAL,
            })
            .collect()
    }

    fn config(max_concurrent: usize) -> SchedulerConfig {
        SchedulerConfig {
            max_concurrent,
            min_audio_bytes: 1,
            ..Default::default()
        }
    }

    fn audio(result: &SynthesisResult) -> Option<&[u8]> {
        match result {
            SynthesisResult::Success { audio } => Some(audio),
            SynthesisResult::Skipped { .. } => None,
        }
    }

    #[tokio::test]
    async fn test_output_follows_slots_not_completion() {
        // 越靠前的任务越慢，完成顺序与文档顺序相反
        let engine = ScriptedEngine::default()
            .delay("a", 80)
            .delay("b", 40)
            .delay("c", 1);
        let scheduler = SynthesisScheduler::new(config(3), Arc::new(engine));

        let results = scheduler
            .run(Uuid::new_v4(), jobs(&["a", "b", "c"]), CancellationToken::new())
            .await;

        let audio: Vec<_> = results.iter().map(|r| audio(r).unwrap().to_vec()).collect();
        assert_eq!(audio, vec![b"[a]".to_vec(), b"[b]".to_vec(), b"[c]".to_vec()]);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let engine = Arc::new(
            ["1", "2", "3", "4", "5", "6", "7", "8"]
                .iter()
                .fold(ScriptedEngine::default(), |e, t| e.delay(t, 20)),
        );
        let scheduler = SynthesisScheduler::new(config(2), engine.clone());

        let results = scheduler
            .run(
                Uuid::new_v4(),
                jobs(&["1", "2", "3", "4", "5", "6", "7", "8"]),
                CancellationToken::new(),
            )
            .await;

        assert!(results.iter().all(SynthesisResult::is_success));
        assert!(engine.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_failure_is_skipped_and_batch_continues() {
        let engine = ScriptedEngine::default().fail("b", 1).short("c");
        let scheduler = SynthesisScheduler::new(config(4), Arc::new(engine));

        let results = scheduler
            .run(Uuid::new_v4(), jobs(&["a", "b", "c", "d"]), CancellationToken::new())
            .await;

        assert_eq!(results.len(), 4);
        assert!(results[0].is_success());
        assert!(matches!(
            &results[1],
            SynthesisResult::Skipped { reason: SkipReason::Backend(msg) } if msg.contains("503")
        ));
        assert_eq!(
            results[2],
            SynthesisResult::skipped(SkipReason::UndersizedPayload { len: 0, min: 1 })
        );
        assert!(results[3].is_success());
    }

    #[tokio::test]
    async fn test_retry_recovers_same_slot() {
        let engine = Arc::new(ScriptedEngine::default().fail("b", 1));
        let scheduler = SynthesisScheduler::new(
            SchedulerConfig {
                max_retries: 1,
                ..config(2)
            },
            engine.clone(),
        );

        let results = scheduler
            .run(Uuid::new_v4(), jobs(&["a", "b", "c"]), CancellationToken::new())
            .await;

        assert_eq!(audio(&results[1]), Some(&b"[b]"[..]));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_timeout_is_skipped() {
        let engine = ScriptedEngine::default().delay("slow", 500);
        let scheduler = SynthesisScheduler::new(
            SchedulerConfig {
                job_timeout: Duration::from_millis(30),
                ..config(2)
            },
            Arc::new(engine),
        );

        let results = scheduler
            .run(Uuid::new_v4(), jobs(&["slow", "fast"]), CancellationToken::new())
            .await;

        assert_eq!(results[0], SynthesisResult::skipped(SkipReason::Timeout));
        assert!(results[1].is_success());
    }

    #[tokio::test]
    async fn test_cancelled_run_fills_every_slot() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let scheduler = SynthesisScheduler::new(config(2), Arc::new(ScriptedEngine::default()));

        let results = scheduler
            .run(Uuid::new_v4(), jobs(&["a", "b", "c"]), cancel)
            .await;

        assert_eq!(results.len(), 3);
        assert!(results
            .iter()
            .all(|r| *r == SynthesisResult::skipped(SkipReason::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_mid_run_keeps_finished_results() {
        let engine = ScriptedEngine::default().delay("a", 1).delay("b", 2_000);
        let scheduler = SynthesisScheduler::new(config(2), Arc::new(engine));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let results = scheduler.run(Uuid::new_v4(), jobs(&["a", "b"]), cancel).await;

        assert!(results[0].is_success());
        assert_eq!(results[1], SynthesisResult::skipped(SkipReason::Cancelled));
    }

    #[tokio::test]
    async fn test_worker_count_does_not_change_output() {
        let texts = ["one", "two", "three", "four", "five", "six", "seven", "eight", "nine"];
        let make_engine = || {
            texts
                .iter()
                .enumerate()
                .fold(ScriptedEngine::default(), |e, (i, t)| e.delay(t, ((i * 7) % 5) as u64 * 10))
        };

        let serial = SynthesisScheduler::new(config(1), Arc::new(make_engine()))
            .run(Uuid::new_v4(), jobs(&texts), CancellationToken::new())
            .await;
        let parallel = SynthesisScheduler::new(config(8), Arc::new(make_engine()))
            .run(Uuid::new_v4(), jobs(&texts), CancellationToken::new())
            .await;

        assert_eq!(serial, parallel);
    }
}
