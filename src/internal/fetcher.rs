//! 下载器领域模块：探测远程 blob 大小，按固定块大小切段，有界并发地拉取并按偏移写入本地文件。
//!
//! 使用方式：`BlobFetcher::new(&auth, "/path").save_to(out).concurrency(n).send().await`
//! 对外导出以 [`crate::fetcher`] 为准。

pub mod structs;
