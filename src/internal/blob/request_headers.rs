//! 请求头：固定 API 版本、当前 GMT 时间、Range 头。

use chrono::{DateTime, Utc};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};

use crate::internal::auth::signature::generate_signature;
use crate::internal::auth::structs::shared_key_auth::SharedKeyAuth;
use crate::internal::fetch_error::FetchError;

/// 本客户端对接的存储 API 版本
pub const API_VERSION: &str = "2019-07-07";

pub const X_MS_VERSION: HeaderName = HeaderName::from_static("x-ms-version");
pub const X_MS_DATE: HeaderName = HeaderName::from_static("x-ms-date");
pub const X_MS_RANGE: HeaderName = HeaderName::from_static("x-ms-range");

/// RFC-1123 格式，时区固定写 `GMT`，如 `Wed, 01 Jan 2020 00:00:00 GMT`
pub fn format_ms_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// 生成 `x-ms-range` 的值：`bytes=start-(end-1)`，end 为不含上界。
pub fn range_header(start: u64, end: u64) -> String {
    let end_inclusive = end.saturating_sub(1);
    format!("bytes={}-{}", start, end_inclusive)
}

/// 每次请求的基础头；时间戳每次重新取，签名也因此不能复用。
pub fn base_headers() -> Result<HeaderMap, FetchError> {
    base_headers_at(Utc::now())
}

pub(crate) fn base_headers_at(now: DateTime<Utc>) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(X_MS_VERSION, HeaderValue::from_static(API_VERSION));
    headers.insert(X_MS_DATE, header_value(&format_ms_date(now))?);
    Ok(headers)
}

/// 对已备好的头签名，并把 `Authorization` 加进去。
pub fn sign_headers(
    auth: &SharedKeyAuth,
    method: &Method,
    path: &str,
    mut headers: HeaderMap,
) -> Result<HeaderMap, FetchError> {
    let authorization = generate_signature(auth, method, path, &headers)?;
    headers.insert(AUTHORIZATION, header_value(&authorization)?);
    Ok(headers)
}

pub(crate) fn header_value(value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value).map_err(|e| FetchError::Parse(e.to_string()))
}
