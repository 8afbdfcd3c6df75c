//! SharedKey 签名：把请求规范化为签名串，用 HMAC-SHA256 计算后生成 `Authorization` 头的值。
//!
//! 签名串的字段顺序与空行位置是服务端约定的，任何偏差都会导致 403。
//! 本客户端只发无请求体的 HEAD / GET，所以大部分标准字段固定为空。

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, IF_NONE_MATCH};
use sha2::Sha256;

use crate::internal::auth::structs::shared_key_auth::SharedKeyAuth;
use crate::internal::fetch_error::FetchError;

type HmacSha256 = Hmac<Sha256>;

/// 参与签名的扩展头前缀
const EXTENDED_HEADER_PREFIX: &str = "x-ms-";

/// 生成 `SharedKey {account}:{signature}`。
///
/// - `path` 需以 `/` 开头，或为空（表示容器本身）
/// - `headers` 为即将随请求发送的头；名称大小写不敏感，值按原始字节参与签名
///
/// 纯函数：相同输入得到相同输出，不做任何 I/O。
pub fn generate_signature(
    auth: &SharedKeyAuth,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
) -> Result<String, FetchError> {
    let string_to_sign = canonical_string(auth, method, path, headers);

    let key = STANDARD.decode(auth.key.as_bytes())?;
    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| FetchError::Parse(e.to_string()))?;
    mac.update(&string_to_sign);
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    Ok(format!("SharedKey {}:{}", auth.account, signature))
}

/// 构造待签名串（原始字节）。
fn canonical_string(
    auth: &SharedKeyAuth,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
) -> Vec<u8> {
    let content_type = header_bytes(headers, CONTENT_TYPE.as_str());
    let if_none_match = header_bytes(headers, IF_NONE_MATCH.as_str());

    // 依次为 VERB, Content-Encoding, Content-Language, Content-Length, Content-MD5,
    // Content-Type, Date, If-Modified-Since, If-Match, If-None-Match,
    // If-Unmodified-Since, Range
    let standard_fields: [&[u8]; 12] = [
        method.as_str().as_bytes(),
        b"",
        b"",
        b"",
        b"",
        content_type,
        b"",
        b"",
        b"",
        if_none_match,
        b"",
        b"",
    ];

    let mut raw = standard_fields.join(&b'\n');
    raw.push(b'\n');

    let extended = canonical_extended_headers(headers);
    if extended.is_empty() {
        raw.push(b'\n');
    } else {
        for header in &extended {
            raw.extend_from_slice(header);
            raw.push(b'\n');
        }
    }

    raw.push(b'/');
    raw.extend_from_slice(auth.account.as_bytes());
    raw.push(b'/');
    raw.extend_from_slice(auth.container.as_bytes());
    raw.extend_from_slice(path.as_bytes());

    raw
}

/// 选出全部 `x-ms-` 头，格式化为 `name:value` 后按字节升序排列。
fn canonical_extended_headers(headers: &HeaderMap) -> Vec<Vec<u8>> {
    let mut extended: Vec<Vec<u8>> = headers
        .iter()
        // HeaderName 已经是小写
        .filter(|(name, _)| name.as_str().starts_with(EXTENDED_HEADER_PREFIX))
        .map(|(name, value)| {
            let mut line = name.as_str().as_bytes().to_vec();
            line.push(b':');
            line.extend_from_slice(value.as_bytes());
            line
        })
        .collect();
    extended.sort();
    extended
}

fn header_bytes<'a>(headers: &'a HeaderMap, name: &str) -> &'a [u8] {
    headers.get(name).map(|v| v.as_bytes()).unwrap_or_default()
}
