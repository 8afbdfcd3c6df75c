//! 远程 blob 下载器
//!
//! 把一个远程对象按固定块大小切段，用签名的 Range 请求有界并发地拉取，每段直接写到输出文件的对应偏移。
//!
//! ## 流程
//!
//! 1. 一次 HEAD 探测对象大小；失败则直接返回，不发任何 GET，也不创建文件
//! 2. 创建（截断）输出文件
//! 3. 按 `block_size` 切段，最多 `concurrency` 个分段同时请求
//! 4. 每段完成后累加进度并通知 [`ProgressSink`]
//! 5. 等待所有分段结束；任一分段失败则其余分段被放弃，返回该错误
//!
//! 没有重试，也没有断点续传；失败时已写入的数据留在磁盘上，不做清理。
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! # use std::num::NonZeroUsize;
//! # use blob_fetch::auth::SharedKeyAuth;
//! # use blob_fetch::fetcher::BlobFetcher;
//! # async fn example(auth: SharedKeyAuth) -> Result<(), blob_fetch::FetchError> {
//! let summary = BlobFetcher::new(&auth, "/large/file.bin")
//!     .save_to("file.bin")
//!     .concurrency(NonZeroUsize::new(64).unwrap())
//!     .send()
//!     .await?;
//! println!("{} 字节", summary.total_bytes);
//! # Ok(())
//! # }
//! ```

mod run_dispatch;

use std::num::{NonZeroU64, NonZeroUsize};
use std::path::Path;
use std::sync::Arc;

use crate::internal::auth::structs::shared_key_auth::SharedKeyAuth;
use crate::internal::dispatch::progress::{LogProgress, ProgressCounter, ProgressSink};
use crate::internal::fetch_error::FetchError;

use super::fetch_config::FetchConfig;
use super::fetch_summary::FetchSummary;
use run_dispatch::run_dispatch;

/// 远程 blob 下载器，链式配置后调用 [`BlobFetcher::send`] 执行下载。
pub struct BlobFetcher {
    pub(crate) auth: SharedKeyAuth,
    pub(crate) path: String,
    pub(crate) config: FetchConfig,
    pub(crate) sink: Arc<dyn ProgressSink>,
    pub(crate) counter: ProgressCounter,
}

impl BlobFetcher {
    /// `path` 为容器内的对象路径，需以 `/` 开头。
    pub fn new(auth: &SharedKeyAuth, path: impl Into<String>) -> Self {
        Self {
            auth: auth.clone(),
            path: path.into(),
            config: FetchConfig::default(),
            sink: Arc::new(LogProgress),
            counter: ProgressCounter::new(),
        }
    }

    /// 设置保存路径；传空路径等同于未设置。
    pub fn save_to(mut self, path: impl AsRef<Path>) -> Self {
        let p = path.as_ref();
        self.config.save_path = if p.as_os_str().is_empty() {
            None
        } else {
            Some(p.to_path_buf())
        };
        self
    }

    /// 设置每个分段的字节数。
    pub fn block_size(mut self, n: NonZeroU64) -> Self {
        self.config.block_size = n;
        self
    }

    /// 设置最大并发分段数。
    pub fn concurrency(mut self, n: NonZeroUsize) -> Self {
        self.config.concurrency = n;
        self
    }

    /// 整体替换配置
    pub fn with_config(mut self, config: FetchConfig) -> Self {
        self.config = config;
        self
    }

    /// 替换默认的日志进度钩子。
    pub fn with_progress_sink(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// 已传输字节计数的共享句柄，可在下载进行中读取。
    pub fn progress(&self) -> ProgressCounter {
        self.counter.clone()
    }

    /// 执行下载。
    pub async fn send(self) -> Result<FetchSummary, FetchError> {
        run_dispatch(self).await
    }
}
