//! 输出文件：所有分段任务共享同一个句柄，只做按绝对偏移的写入，不依赖共享游标。
//!
//! 分段的字节区间互不重叠，所以写入之间不需要加锁。

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;

use crate::internal::fetch_error::FetchError;

/// 可并发定位写的文件句柄，clone 后指向同一个底层文件。
#[derive(Debug, Clone)]
pub struct PositionalFile {
    file: Arc<File>,
    path: Arc<PathBuf>,
}

impl PositionalFile {
    /// 创建（或截断）输出文件。
    pub async fn create(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref().to_path_buf();
        let file = tokio::fs::File::create(&path)
            .await
            .map_err(FetchError::CreateFile)?;
        Ok(Self {
            file: Arc::new(file.into_std().await),
            path: Arc::new(path),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 在 `offset` 处写入全部 `data`，在阻塞线程池上执行。
    pub async fn write_all_at(&self, offset: u64, data: Bytes) -> Result<(), FetchError> {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || write_all_at(&file, &data, offset))
            .await?
            .map_err(FetchError::WriteFile)
    }
}

#[cfg(unix)]
fn write_all_at(file: &File, buf: &[u8], offset: u64) -> std::io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.write_all_at(buf, offset)
}

// seek_write 会移动游标，但本模块从不使用游标，互不影响
#[cfg(windows)]
fn write_all_at(file: &File, mut buf: &[u8], mut offset: u64) -> std::io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        match file.seek_write(buf, offset) {
            Ok(0) => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    "failed to write whole buffer",
                ));
            }
            Ok(n) => {
                buf = &buf[n..];
                offset += n as u64;
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
