//! In-Memory Voice Sessions Implementation

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{SessionError, VoiceSession, VoiceSessionPort};
use crate::application::voices::RegistryFactory;
use crate::domain::voice::VoiceRegistry;

const MAX_SESSION_ID_LEN: usize = 128;

/// 内存音色会话管理器
pub struct InMemoryVoiceSessions {
    sessions: DashMap<String, VoiceSession>,
    registries: RegistryFactory,
}

impl InMemoryVoiceSessions {
    pub fn new(registries: RegistryFactory) -> Self {
        Self {
            sessions: DashMap::new(),
            registries,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

fn validate_id(id: &str) -> Result<(), SessionError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(SessionError::InvalidId(id.to_string()))
    }
}

impl VoiceSessionPort for InMemoryVoiceSessions {
    fn get_or_create(&self, id: &str) -> Result<Arc<VoiceRegistry>, SessionError> {
        validate_id(id)?;

        let mut entry = self.sessions.entry(id.to_string()).or_insert_with(|| {
            tracing::info!(session_id = %id, "Voice session created");
            VoiceSession::new(id, Arc::new(self.registries.build()))
        });
        entry.last_activity = Utc::now();
        Ok(entry.registry.clone())
    }

    fn get(&self, id: &str) -> Result<VoiceSession, SessionError> {
        self.sessions
            .get(id)
            .map(|s| s.clone())
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn touch(&self, id: &str) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.last_activity = Utc::now();
        }
    }

    fn close(&self, id: &str) -> Result<(), SessionError> {
        self.sessions
            .remove(id)
            .map(|(_, session)| {
                tracing::info!(
                    session_id = %id,
                    speakers = session.registry.len(),
                    "Voice session closed"
                );
            })
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn get_expired_sessions(&self, idle_timeout_secs: u64) -> Vec<String> {
        let now = Utc::now();
        let timeout = chrono::Duration::seconds(idle_timeout_secs as i64);

        self.sessions
            .iter()
            .filter_map(|entry| {
                let elapsed = now - entry.last_activity;
                if elapsed > timeout {
                    Some(entry.key().clone())
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::narration::SpeakerId;
    use crate::domain::voice::{VoiceCatalog, VoiceId, VoiceProfile};

    fn sessions() -> InMemoryVoiceSessions {
        let catalog = VoiceCatalog::new(
            VoiceId::new("narrator"),
            vec![VoiceProfile::new("a", None), VoiceProfile::new("b", None)],
        )
        .unwrap();
        InMemoryVoiceSessions::new(RegistryFactory::new(catalog))
    }

    #[test]
    fn test_session_lifecycle() {
        let sessions = sessions();

        // Create
        let registry = sessions.get_or_create("reader-1").unwrap();
        let voice = registry.assign(&SpeakerId::new("mira"));

        // Reuse
        let again = sessions.get_or_create("reader-1").unwrap();
        assert!(Arc::ptr_eq(&registry, &again));
        assert_eq!(again.assigned(&SpeakerId::new("mira")), Some(voice));
        assert_eq!(sessions.sessions.len(), 1);

        // Close
        assert!(sessions.close("reader-1").is_ok());
        assert!(matches!(sessions.get("reader-1"), Err(SessionError::NotFound(_))));
        assert!(sessions.close("reader-1").is_err());
    }

    #[test]
    fn test_invalid_ids_are_rejected() {
        let sessions = sessions();
        assert!(matches!(sessions.get_or_create(""), Err(SessionError::InvalidId(_))));
        assert!(matches!(
            sessions.get_or_create("../etc"),
            Err(SessionError::InvalidId(_))
        ));
    }

    #[test]
    fn test_expired_sessions() {
        let sessions = sessions();
        sessions.get_or_create("old").unwrap();
        sessions.get_or_create("fresh").unwrap();

        sessions.sessions.get_mut("old").unwrap().last_activity =
            Utc::now() - chrono::Duration::seconds(120);

        assert_eq!(sessions.get_expired_sessions(60), vec!["old".to_string()]);
        assert!(sessions.get_expired_sessions(600).is_empty());
    }
}
