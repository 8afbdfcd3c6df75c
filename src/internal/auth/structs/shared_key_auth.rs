use core::fmt;
use std::sync::Arc;

use reqwest::Client;
use url::Url;

use crate::internal::fetch_error::FetchError;

/// 默认的 blob 服务域名后缀，完整主机为 `{account}.blob.core.windows.net`
pub const DEFAULT_ENDPOINT_SUFFIX: &str = "blob.core.windows.net";

/// 凭据所需的环境变量名。
pub mod env_var_names {
    /// 存储账号名
    pub const STORAGE_ACCOUNT: &str = "STORAGE_ACCOUNT";
    /// 存储账号密钥（base64）
    pub const STORAGE_KEY: &str = "STORAGE_KEY";
    /// 容器名
    pub const STORAGE_CONTAINER: &str = "STORAGE_CONTAINER";
    /// 可选：覆盖默认服务根 URL（模拟器、私有端点）
    pub const STORAGE_ENDPOINT: &str = "STORAGE_ENDPOINT";
}

/// SharedKey 认证结构体
///
/// 该结构体定位
/// - 存储账号、密钥、容器这组不可变凭据，启动时创建一次
/// - 显式传给签名、探测大小、分段拉取三处，不使用全局变量
/// - 携带共享的 http 客户端与服务根 URL
///
/// 内部均为 Arc，clone 成本很低，可以直接 move 进各个分段任务。
#[derive(Clone)]
pub struct SharedKeyAuth {
    pub client: Client,
    pub base_url: Arc<Url>,
    pub(crate) account: Arc<str>,
    pub(crate) key: Arc<str>, // base64 文本，签名时才解码
    pub(crate) container: Arc<str>,
}

impl SharedKeyAuth {
    /// 创建新的认证结构体，服务根 URL 默认为 `https://{account}.blob.core.windows.net/`
    pub fn new(
        account: &str,
        key: &str,
        container: &str,
    ) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(&format!("https://{account}.{DEFAULT_ENDPOINT_SUFFIX}/"))?;

        let client = Client::builder().http1_only().build()?;

        Ok(Self {
            client,
            base_url: Arc::new(base_url),
            account: Arc::from(account),
            key: Arc::from(key),
            container: Arc::from(container),
        })
    }

    /// 从环境变量读取凭据；`STORAGE_ENDPOINT` 存在时覆盖服务根 URL。
    ///
    /// 不负责加载 `.env` 文件，由调用方在此之前处理。
    pub fn from_env() -> Result<Self, FetchError> {
        let account = require_env(env_var_names::STORAGE_ACCOUNT)?;
        let key = require_env(env_var_names::STORAGE_KEY)?;
        let container = require_env(env_var_names::STORAGE_CONTAINER)?;

        let auth = Self::new(&account, &key, &container)?;
        match std::env::var(env_var_names::STORAGE_ENDPOINT) {
            Ok(endpoint) if !endpoint.is_empty() => auth.with_base_url(&endpoint),
            _ => Ok(auth),
        }
    }

    /// 替换服务根 URL，例如本地模拟器 `http://127.0.0.1:10000/devstoreaccount1`
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, FetchError> {
        self.base_url = Arc::new(_format_base_url(base_url)?);
        Ok(self)
    }

    /// 对象的完整 URL：`{base}/{container}{path}`，path 需以 `/` 开头或为空
    pub fn object_url(&self, path: &str) -> Result<Url, FetchError> {
        let joined = format!("{}{}{}", self.base_url, self.container, path);
        Ok(Url::parse(&joined)?)
    }
}

/// 防止debug泄漏密钥
impl fmt::Debug for SharedKeyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedKeyAuth")
            .field("account", &self.account)
            .field("container", &self.container)
            .field("base_url", &self.base_url.as_str())
            .field("key", &"<hidden>")
            .finish()
    }
}

fn require_env(name: &'static str) -> Result<String, FetchError> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(FetchError::MissingEnv(name)),
    }
}

/// 统一以 `/` 结尾，方便直接拼接容器名
fn _format_base_url(url: &str) -> Result<Url, FetchError> {
    let mut base_url = Url::parse(url)?;

    if !base_url.path().ends_with('/') {
        let new_path = format!("{}/", base_url.path());
        base_url.set_path(&new_path);
    }

    Ok(base_url)
}
