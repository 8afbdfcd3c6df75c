//! 下载进度：共享的已传输字节计数，以及接收进度的钩子。
//!
//! 计数本身单调递增；百分比由各任务完成时的瞬时值算出，并发完成时日志里的百分比可能看起来略有回退，只作参考。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

use crate::internal::fetcher::structs::fetch_summary::FetchSummary;

/// 某一时刻的下载进度。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchProgress {
    /// 已传输的字节数
    pub bytes_done: u64,
    /// 对象总字节数
    pub total: u64,
}

impl FetchProgress {
    /// 四舍五入后的完成百分比；总大小为 0 时视为 100。
    pub fn percent(&self) -> u64 {
        if self.total == 0 {
            return 100;
        }
        (self.bytes_done as f64 / self.total as f64 * 100.0).round() as u64
    }
}

/// 共享的已传输字节计数器，clone 后指向同一个计数。
#[derive(Debug, Clone, Default)]
pub struct ProgressCounter {
    bytes_done: Arc<AtomicU64>,
}

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加 `n` 字节，返回累加后的总数。
    pub fn add(&self, n: u64) -> u64 {
        self.bytes_done.fetch_add(n, Ordering::Relaxed) + n
    }

    pub fn get(&self) -> u64 {
        self.bytes_done.load(Ordering::Relaxed)
    }
}

/// 进度钩子：每段完成后、整体完成后调用。
///
/// 会被多个分段任务同时调用，实现需自行处理内部可变状态。
pub trait ProgressSink: Send + Sync {
    /// 每段写入完成后调用。
    fn on_progress(&self, _progress: FetchProgress) {}

    /// 全部分段完成后调用。
    fn on_complete(&self, _summary: &FetchSummary) {}
}

/// 默认钩子：把进度与吞吐写进日志。
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn on_progress(&self, progress: FetchProgress) {
        info!("已完成 {}%...", progress.percent());
    }

    fn on_complete(&self, summary: &FetchSummary) {
        info!("已完成 100%");
        info!(
            "共写入 {} 字节，耗时 {} 秒，{} MB/s",
            summary.total_bytes,
            summary.elapsed.as_secs(),
            summary.megabytes_per_second()
        );
    }
}
