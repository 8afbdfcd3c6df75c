pub mod blob_fetcher;
pub mod fetch_config;
pub mod fetch_summary;

// 重导出公共类型
pub use blob_fetcher::BlobFetcher;
pub use fetch_config::FetchConfig;
pub use fetch_summary::FetchSummary;
