//! Voice Registry Factory
//!
//! 单章朗读、连续章节、音色会话都需要新建 registry，统一从这里构造

use std::sync::Arc;

use crate::domain::voice::{GenderHint, RandomVoicePicker, VoiceCatalog, VoicePicker, VoiceRegistry};

/// 按同一份目录和策略构造 VoiceRegistry
#[derive(Clone)]
pub struct RegistryFactory {
    catalog: VoiceCatalog,
    picker: Arc<dyn VoicePicker>,
    gender_hint: Option<Arc<dyn GenderHint>>,
}

impl RegistryFactory {
    pub fn new(catalog: VoiceCatalog) -> Self {
        Self {
            catalog,
            picker: Arc::new(RandomVoicePicker),
            gender_hint: None,
        }
    }

    pub fn with_picker(mut self, picker: Arc<dyn VoicePicker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn with_gender_hint(mut self, hint: Arc<dyn GenderHint>) -> Self {
        self.gender_hint = Some(hint);
        self
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// 新建一个空的 registry
    pub fn build(&self) -> VoiceRegistry {
        let registry = VoiceRegistry::new(self.catalog.clone()).with_picker(self.picker.clone());
        match &self.gender_hint {
            Some(hint) => registry.with_gender_hint(hint.clone()),
            None => registry,
        }
    }
}

impl std::fmt::Debug for RegistryFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryFactory")
            .field("catalog", &self.catalog)
            .field("gender_aware", &self.gender_hint.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::narration::SpeakerId;
    use crate::domain::voice::{FirstVoicePicker, VoiceId, VoiceProfile};

    #[test]
    fn test_each_build_is_independent() {
        let catalog = VoiceCatalog::new(
            VoiceId::new("narrator"),
            vec![VoiceProfile::new("a", None), VoiceProfile::new("b", None)],
        )
        .unwrap();
        let factory = RegistryFactory::new(catalog).with_picker(Arc::new(FirstVoicePicker));

        let first = factory.build();
        first.assign(&SpeakerId::new("mira"));

        let second = factory.build();
        assert!(second.is_empty());
        assert_eq!(second.catalog().narrator().as_str(), "narrator");
    }
}
