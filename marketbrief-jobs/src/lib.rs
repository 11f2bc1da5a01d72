//! marketbrief jobs — orchestration for the scheduled snapshot scripts.
//!
//! Each job follows the same shape: fetch every input sequentially,
//! merge/normalize against the previous on-disk document, render, write.
//! The previous documents are the only state shared between runs and are
//! threaded through as explicit inputs so the merge steps stay pure and
//! testable without a network.

pub mod config;
pub mod jobs;
pub mod reporting;

pub use config::{BriefConfig, ConfigError, EtfConfig, JobConfig, NewsConfig, SnapshotConfig};
