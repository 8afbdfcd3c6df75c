//! 下载相关错误类型。
//!
//! 所有错误对整个下载都是致命的：不重试，也不降级为部分结果，由调用方决定终止。

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// 密钥不是合法的 base64。
    #[error("密钥 base64 解码失败: {0}")]
    Decoding(#[from] base64::DecodeError),

    /// 传输层失败：DNS、TLS、连接被重置等。
    #[error("HTTP 请求失败: {0}")]
    Request(#[from] reqwest::Error),

    /// 服务器返回了 2xx 以外的状态码。
    #[error("服务器返回错误状态 {status}: {url}")]
    Server { status: StatusCode, url: String },

    /// 期望的头缺失或格式不对。
    #[error("解析失败: {0}")]
    Parse(String),

    #[error("URL 格式错误: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("缺少环境变量 {0}")]
    MissingEnv(&'static str),

    #[error("未设置保存路径")]
    NoDestination,

    #[error("创建文件失败: {0}")]
    CreateFile(std::io::Error),

    #[error("写入文件失败: {0}")]
    WriteFile(std::io::Error),

    #[error("分段任务失败: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("分段下载内部错误: {0}")]
    Internal(String),
}
