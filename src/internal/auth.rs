//! 认证：SharedKey 凭据与请求签名。

pub mod signature;
pub mod structs;
