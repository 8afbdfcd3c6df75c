//! Blob 访问：单次 HEAD 探测大小、单段 Range GET。
//!
//! 两类请求共享同一套基础头（`x-ms-version`、`x-ms-date`），每次请求都重新生成时间戳并重新签名。

pub mod range_fetch;
pub mod request_headers;
pub mod size_probe;
