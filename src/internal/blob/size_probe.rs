//! 探测远程对象大小：一次签名的 HEAD 请求，以 content-length 为准。

use chrono::{DateTime, Utc};
use reqwest::Method;
use reqwest::header::{CONTENT_LENGTH, HeaderMap};
use tracing::info;

use crate::internal::auth::structs::shared_key_auth::SharedKeyAuth;
use crate::internal::fetch_error::FetchError;

use super::request_headers::{base_headers_at, sign_headers};

/// 发送 HEAD 请求，返回对象总字节数。
///
/// 传输失败为 `Request`，非 2xx 为 `Server`，content-length 缺失或不是数字为 `Parse`。
/// 任一失败都意味着整个下载无法开始。
pub async fn probe_size(auth: &SharedKeyAuth, path: &str) -> Result<u64, FetchError> {
    info!("正在确定文件大小: {path}");

    let url = auth.object_url(path)?;
    let headers = probe_headers(auth, path, Utc::now())?;

    let resp = auth
        .client
        .request(Method::HEAD, url.clone())
        .headers(headers)
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Server {
            status,
            url: url.to_string(),
        });
    }

    let size = parse_content_length(resp.headers())?;

    info!("文件大小为 {size} 字节");
    Ok(size)
}

pub(crate) fn probe_headers(
    auth: &SharedKeyAuth,
    path: &str,
    now: DateTime<Utc>,
) -> Result<HeaderMap, FetchError> {
    sign_headers(auth, &Method::HEAD, path, base_headers_at(now)?)
}

/// 从响应头读取 content-length。
pub(crate) fn parse_content_length(headers: &HeaderMap) -> Result<u64, FetchError> {
    let raw = headers
        .get(CONTENT_LENGTH)
        .ok_or_else(|| FetchError::Parse("响应缺少 content-length".to_string()))?;
    raw.to_str()
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .ok_or_else(|| FetchError::Parse(format!("content-length 不是数字: {raw:?}")))
}
