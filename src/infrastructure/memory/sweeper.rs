//! Session Sweeper - 空闲音色会话回收

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::application::ports::VoiceSessionPort;
use crate::infrastructure::events::EventPublisher;

/// 周期性关闭空闲会话，并广播关闭事件
pub struct SessionSweeper {
    sessions: Arc<dyn VoiceSessionPort>,
    events: Arc<EventPublisher>,
    idle_timeout_secs: u64,
    interval: Duration,
}

impl SessionSweeper {
    pub fn new(
        sessions: Arc<dyn VoiceSessionPort>,
        events: Arc<EventPublisher>,
        idle_timeout_secs: u64,
        interval: Duration,
    ) -> Self {
        Self {
            sessions,
            events,
            idle_timeout_secs,
            interval,
        }
    }

    /// 执行一次回收，返回关闭的会话数
    pub fn sweep_once(&self) -> usize {
        let mut closed = 0;
        for id in self.sessions.get_expired_sessions(self.idle_timeout_secs) {
            // 并发的 close 请求可能已经删掉了该会话
            if self.sessions.close(&id).is_ok() {
                self.events.publish_session_closed(&id, "idle");
                closed += 1;
            }
        }
        closed
    }

    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(
            idle_timeout_secs = self.idle_timeout_secs,
            interval_secs = self.interval.as_secs(),
            "SessionSweeper started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        // 第一次 tick 立即返回
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let closed = self.sweep_once();
                    if closed > 0 {
                        tracing::info!(closed, "Idle voice sessions swept");
                    }
                }
            }
        }

        tracing::info!("SessionSweeper stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::SessionError;
    use crate::application::voices::RegistryFactory;
    use crate::domain::voice::{VoiceCatalog, VoiceId, VoiceProfile};
    use crate::infrastructure::events::NarrationEvent;
    use crate::infrastructure::memory::InMemoryVoiceSessions;

    fn sessions() -> Arc<InMemoryVoiceSessions> {
        let catalog = VoiceCatalog::new(
            VoiceId::new("narrator"),
            vec![VoiceProfile::new("a", None)],
        )
        .unwrap();
        InMemoryVoiceSessions::new(RegistryFactory::new(catalog)).arc()
    }

    #[tokio::test]
    async fn test_sweep_closes_idle_sessions() {
        let sessions = sessions();
        let events = EventPublisher::new().arc();
        let mut rx = events.subscribe();

        sessions.get_or_create("idle-reader").unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let sweeper = SessionSweeper::new(sessions.clone(), events, 0, Duration::from_secs(60));
        assert_eq!(sweeper.sweep_once(), 1);
        assert!(matches!(
            sessions.get("idle-reader"),
            Err(SessionError::NotFound(_))
        ));

        match rx.recv().await.unwrap() {
            NarrationEvent::SessionClosed { session_id, reason } => {
                assert_eq!(session_id, "idle-reader");
                assert_eq!(reason, "idle");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sweep_keeps_active_sessions() {
        let sessions = sessions();
        sessions.get_or_create("active").unwrap();

        let sweeper = SessionSweeper::new(
            sessions.clone(),
            EventPublisher::new().arc(),
            3600,
            Duration::from_secs(60),
        );
        assert_eq!(sweeper.sweep_once(), 0);
        assert!(sessions.get("active").is_ok());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let sweeper = SessionSweeper::new(
            sessions(),
            EventPublisher::new().arc(),
            3600,
            Duration::from_millis(10),
        );
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(sweeper.run(shutdown.clone()));

        tokio::time::sleep(Duration::from_millis(30)).await;
        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
