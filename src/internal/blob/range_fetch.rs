//! 单段拉取：发起签名的 Range GET，整段读入内存后写到输出文件的对应偏移。

use chrono::{DateTime, Utc};
use reqwest::Method;
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::internal::auth::structs::shared_key_auth::SharedKeyAuth;
use crate::internal::dispatch::range_plan::RangeRequest;
use crate::internal::fetch_error::FetchError;
use crate::internal::output::positional_file::PositionalFile;

use super::request_headers::{X_MS_RANGE, base_headers_at, header_value, sign_headers};

/// 拉取 `range` 并写入 `output`，返回写入的字节数（即 `range.length`）。
///
/// 响应体长度必须与请求长度一致，否则视为 `Parse` 错误且不写入任何字节；
/// 服务端忽略 Range 返回整个对象时也由此拦下。失败策略与探测大小一致：不重试。
pub async fn fetch_range(
    auth: &SharedKeyAuth,
    path: &str,
    output: &PositionalFile,
    range: RangeRequest,
) -> Result<u64, FetchError> {
    let last = range.end().saturating_sub(1);
    debug!("读取 {} 到 {}...", range.offset, last);

    let url = auth.object_url(path)?;
    let headers = range_request_headers(auth, path, range, Utc::now())?;

    let resp = auth
        .client
        .request(Method::GET, url.clone())
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

    let body = resp.bytes().await?;
    if body.len() as u64 != range.length {
        return Err(FetchError::Parse(format!(
            "分段 {} 到 {} 应为 {} 字节，实际收到 {} 字节",
            range.offset,
            last,
            range.length,
            body.len()
        )));
    }
    debug!("已读取 {} 到 {}", range.offset, last);

    output.write_all_at(range.offset, body).await?;
    debug!("已写入偏移 {}", range.offset);

    Ok(range.length)
}

/// Range GET 实际发送的完整头：版本、时间、`x-ms-range` 与覆盖它们的签名。
pub(crate) fn range_request_headers(
    auth: &SharedKeyAuth,
    path: &str,
    range: RangeRequest,
    now: DateTime<Utc>,
) -> Result<HeaderMap, FetchError> {
    let mut headers = base_headers_at(now)?;
    headers.insert(X_MS_RANGE, header_value(&range.range_header())?);
    sign_headers(auth, &Method::GET, path, headers)
}
