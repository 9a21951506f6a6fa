//! Synthesis Pipeline
//!
//! 任务构建 → 有界并发合成 → 按序拼接

mod assembler;
mod job;
mod scheduler;

pub use assembler::{assemble, AssembledAudio, AssemblyError};
pub use job::{build_jobs, SkipReason, SynthesisJob, SynthesisResult};
pub use scheduler::{SchedulerConfig, SynthesisScheduler};
