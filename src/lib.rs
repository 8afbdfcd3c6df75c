/// 内部导出的模块
mod internal;


/// 所有操作共用的错误类型
pub use internal::fetch_error::FetchError;

pub mod auth {
    use crate::internal;
    pub use internal::auth::signature::generate_signature;
    pub use internal::auth::structs::shared_key_auth::{
        DEFAULT_ENDPOINT_SUFFIX, SharedKeyAuth, env_var_names,
    };
}

/// 对外提供单次请求能力（探测大小、拉取单段），不必经过下载器，以防有人自己要编排
pub mod blob {
    use crate::internal;
    pub use internal::blob::range_fetch::fetch_range;
    pub use internal::blob::request_headers::{
        API_VERSION, base_headers, format_ms_date, range_header, sign_headers,
    };
    pub use internal::blob::size_probe::probe_size;
}

pub mod dispatch {
    use crate::internal;
    pub use internal::dispatch::progress::*;
    pub use internal::dispatch::range_plan::*;
    pub use internal::dispatch::task_group::*;
}

pub mod output {
    use crate::internal;
    pub use internal::output::positional_file::PositionalFile;
}

pub mod fetcher {
    use crate::internal;
    // 下载器：类型与入口（以 lib 为中心，此处统一导出）
    pub use internal::fetcher::structs::*;
    pub use internal::fetcher::structs::fetch_config::{DEFAULT_BLOCK_SIZE, DEFAULT_CONCURRENCY};
}
