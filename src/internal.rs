pub mod auth;
pub mod blob;
pub mod dispatch;
pub mod fetch_error;
pub mod fetcher;
pub mod output;
