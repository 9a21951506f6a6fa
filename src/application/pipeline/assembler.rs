//! Audio Assembler - 按顺序拼接
//!
//! 成功片段按 slot 顺序直接拼接字节（同一次运行内后端编码一致），
//! 跳过的片段不贡献任何内容，也不补静音。

use thiserror::Error;

use super::{SkipReason, SynthesisResult};

/// 拼接错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("All {total} segments failed ({skipped} skipped)")]
    AllSegmentsFailed { total: usize, skipped: usize },
}

/// 拼接结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledAudio {
    pub audio: Vec<u8>,
    pub total: usize,
    /// 被跳过的 slot 及原因（按 slot 升序）
    pub skipped: Vec<(usize, SkipReason)>,
}

impl AssembledAudio {
    pub fn synthesized(&self) -> usize {
        self.total - self.skipped.len()
    }
}

/// 拼接全部结果
///
/// 结果按值消费，每段字节追加后即释放；没有任何成功片段时返回错误
pub fn assemble(results: Vec<SynthesisResult>) -> Result<AssembledAudio, AssemblyError> {
    let total = results.len();
    let capacity = results
        .iter()
        .map(|r| match r {
            SynthesisResult::Success { audio } => audio.len(),
            SynthesisResult::Skipped { .. } => 0,
        })
        .sum();

    let mut audio = Vec::with_capacity(capacity);
    let mut skipped = Vec::new();

    for (slot, result) in results.into_iter().enumerate() {
        match result {
            SynthesisResult::Success { audio: bytes } => audio.extend_from_slice(&bytes),
            SynthesisResult::Skipped { reason } => skipped.push((slot, reason)),
        }
    }

    if skipped.len() == total {
        return Err(AssemblyError::AllSegmentsFailed {
            total,
            skipped: skipped.len(),
        });
    }

    Ok(AssembledAudio {
        audio,
        total,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(bytes: &[u8]) -> SynthesisResult {
        SynthesisResult::Success {
            audio: bytes.to_vec(),
        }
    }

    #[test]
    fn test_concatenates_in_slot_order() {
        let assembled = assemble(vec![ok(b"AA"), ok(b"BB"), ok(b"CC")]).unwrap();
        assert_eq!(assembled.audio, b"AABBCC");
        assert_eq!(assembled.total, 3);
        assert!(assembled.skipped.is_empty());
    }

    #[test]
    fn test_skipped_slot_contributes_nothing() {
        let assembled = assemble(vec![
            ok(b"AA"),
            SynthesisResult::skipped(SkipReason::Timeout),
            ok(b"CC"),
        ])
        .unwrap();

        assert_eq!(assembled.audio, b"AACC");
        assert_eq!(assembled.skipped, vec![(1, SkipReason::Timeout)]);
        assert_eq!(assembled.synthesized(), 2);
    }

    #[test]
    fn test_all_failed_is_error() {
        let result = assemble(vec![
            SynthesisResult::skipped(SkipReason::Timeout),
            SynthesisResult::skipped(SkipReason::Backend("HTTP 500".to_string())),
        ]);

        assert_eq!(
            result,
            Err(AssemblyError::AllSegmentsFailed {
                total: 2,
                skipped: 2
            })
        );
    }

    #[test]
    fn test_empty_input_is_error() {
        assert_eq!(
            assemble(Vec::new()),
            Err(AssemblyError::AllSegmentsFailed {
                total: 0,
                skipped: 0
            })
        );
    }
}
