use std::path::PathBuf;
use std::time::Duration;

/// 一次成功下载的汇总。
#[derive(Debug, Clone)]
pub struct FetchSummary {
    /// 输出文件路径
    pub path: PathBuf,
    /// 对象总字节数
    pub total_bytes: u64,
    /// 实际写入的字节数
    pub bytes_written: u64,
    /// 从开始分段到全部完成的耗时（不含探测大小）
    pub elapsed: Duration,
}

impl FetchSummary {
    /// 吞吐（十进制 MB/s）；耗时为 0 时返回 0。
    pub fn megabytes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        (self.total_bytes as f64 / 1_000_000.0 / secs * 10.0).round() / 10.0
    }
}
