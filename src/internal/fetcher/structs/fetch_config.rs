use std::num::{NonZeroU64, NonZeroUsize};
use std::path::PathBuf;

/// 默认块大小：12.8MB
pub const DEFAULT_BLOCK_SIZE: NonZeroU64 = NonZeroU64::new(12_800_000).unwrap();

/// 默认最大并发分段数
pub const DEFAULT_CONCURRENCY: NonZeroUsize = NonZeroUsize::new(384).unwrap();

/// 本次下载的配置。
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// 输出文件路径；未设置时 `send` 返回错误
    pub save_path: Option<PathBuf>,
    /// 每个分段的字节数
    pub block_size: NonZeroU64,
    /// 同时进行的分段请求数上限
    pub concurrency: NonZeroUsize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            save_path: None,
            block_size: DEFAULT_BLOCK_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}
