//! 下载器测试：基于 httpmock 模拟存储服务，覆盖分段切分、并发写入、进度钩子与各类失败。

use std::num::{NonZeroU64, NonZeroUsize};
use std::sync::{Arc, Mutex};

use httpmock::Method::HEAD;
use httpmock::prelude::*;
use reqwest::StatusCode;
use tempfile::tempdir;

use crate::FetchError;
use crate::auth::SharedKeyAuth;
use crate::blob::{API_VERSION, fetch_range, probe_size};
use crate::dispatch::{FetchProgress, ProgressSink, RangeRequest};
use crate::fetcher::{BlobFetcher, FetchSummary};
use crate::output::PositionalFile;
use crate::tests::{MOCK_ACCOUNT, MOCK_CONTAINER, mock_auth, mock_object_path, random_bytes};

const OBJECT: &str = "/file.bin";

fn nz64(n: u64) -> NonZeroU64 {
    NonZeroU64::new(n).unwrap()
}

fn nz(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

/// 记录所有进度与完成回调的钩子。
#[derive(Clone, Default)]
struct RecordingSink {
    progress: Arc<Mutex<Vec<FetchProgress>>>,
    completed: Arc<Mutex<Option<FetchSummary>>>,
}

impl ProgressSink for RecordingSink {
    fn on_progress(&self, progress: FetchProgress) {
        self.progress.lock().unwrap().push(progress);
    }

    fn on_complete(&self, summary: &FetchSummary) {
        *self.completed.lock().unwrap() = Some(summary.clone());
    }
}

/// 注册 HEAD 探测的 mock，要求带签名相关的头。
async fn mock_head<'a>(server: &'a MockServer, size: usize) -> httpmock::Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(HEAD)
                .path(mock_object_path(OBJECT))
                .header("x-ms-version", API_VERSION)
                .header_exists("x-ms-date")
                .header_exists("authorization");
            then.status(200).header("content-length", size.to_string());
        })
        .await
}

/// 为每个分段注册一个 Range GET 的 mock。
async fn mock_ranges<'a>(
    server: &'a MockServer,
    data: &[u8],
    block: usize,
) -> Vec<httpmock::Mock<'a>> {
    let mut mocks = Vec::new();
    for (i, chunk) in data.chunks(block).enumerate() {
        let start = i * block;
        let end = start + chunk.len() - 1;
        let body = chunk.to_vec();
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(mock_object_path(OBJECT))
                    .header("x-ms-range", format!("bytes={start}-{end}"))
                    .header("x-ms-version", API_VERSION)
                    .header_exists("authorization");
                then.status(206).body(body);
            })
            .await;
        mocks.push(mock);
    }
    mocks
}

#[tokio::test]
async fn twenty_five_bytes_in_three_ranges_over_two_workers() {
    let server = MockServer::start_async().await;
    let data = b"ABCDEFGHIJKLMNOPQRSTUVWXY";

    let head = mock_head(&server, data.len()).await;
    let ranges = mock_ranges(&server, data, 10).await;
    assert_eq!(ranges.len(), 3);

    let dir = tempdir().unwrap();
    let out = dir.path().join("out.bin");
    let sink = RecordingSink::default();

    let fetcher = BlobFetcher::new(&mock_auth(&server), OBJECT)
        .save_to(&out)
        .block_size(nz64(10))
        .concurrency(nz(2))
        .with_progress_sink(sink.clone());
    let counter = fetcher.progress();

    let summary = fetcher.send().await.unwrap();

    head.assert_hits_async(1).await;
    for mock in &ranges {
        mock.assert_hits_async(1).await;
    }

    assert_eq!(summary.total_bytes, 25);
    assert_eq!(summary.bytes_written, 25);
    assert_eq!(summary.path, out);
    assert_eq!(counter.get(), 25);

    let content = tokio::fs::read(&out).await.unwrap();
    assert_eq!(content, data);

    let progress = sink.progress.lock().unwrap().clone();
    assert_eq!(progress.len(), 3);
    assert!(progress.iter().all(|p| p.total == 25));
    let last = progress.iter().map(|p| p.bytes_done).max().unwrap();
    assert_eq!(last, 25);

    let completed = sink.completed.lock().unwrap().clone().unwrap();
    assert_eq!(completed.total_bytes, 25);
}

#[tokio::test]
async fn random_content_round_trip() {
    let server = MockServer::start_async().await;
    let data = random_bytes(1000);

    let head = mock_head(&server, data.len()).await;
    let ranges = mock_ranges(&server, &data, 64).await;

    let dir = tempdir().unwrap();
    let out = dir.path().join("random.bin");

    let summary = BlobFetcher::new(&mock_auth(&server), OBJECT)
        .save_to(&out)
        .block_size(nz64(64))
        .concurrency(nz(4))
        .send()
        .await
        .unwrap();

    head.assert_hits_async(1).await;
    for mock in &ranges {
        mock.assert_hits_async(1).await;
    }
    assert_eq!(summary.bytes_written, 1000);

    let content = tokio::fs::read(&out).await.unwrap();
    assert_eq!(content.len(), data.len());
    assert_eq!(content, data);
}

#[tokio::test]
async fn head_404_aborts_before_any_get() {
    let server = MockServer::start_async().await;
    let head = server
        .mock_async(|when, then| {
            when.method(HEAD).path(mock_object_path(OBJECT));
            then.status(404);
        })
        .await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(206).body("x");
        })
        .await;

    let dir = tempdir().unwrap();
    let out = dir.path().join("never.bin");

    let result = BlobFetcher::new(&mock_auth(&server), OBJECT)
        .save_to(&out)
        .block_size(nz64(10))
        .send()
        .await;

    match result {
        Err(FetchError::Server { status, .. }) => assert_eq!(status, StatusCode::NOT_FOUND),
        other => panic!("预期 Server 错误，得到 {:?}", other.map(|s| s.total_bytes)),
    }
    head.assert_hits_async(1).await;
    get.assert_hits_async(0).await;
    assert!(!out.exists(), "探测失败时不应创建输出文件");
}

#[tokio::test]
async fn failing_range_aborts_the_download() {
    let server = MockServer::start_async().await;
    let data = b"ABCDEFGHIJKLMNOPQRSTUVWXY";
    mock_head(&server, data.len()).await;

    server
        .mock_async(|when, then| {
            when.method(GET).header("x-ms-range", "bytes=0-9");
            then.status(206).body(&data[0..10]);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).header("x-ms-range", "bytes=10-19");
            then.status(500);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).header("x-ms-range", "bytes=20-24");
            then.status(206).body(&data[20..25]);
        })
        .await;

    let dir = tempdir().unwrap();
    let out = dir.path().join("partial.bin");
    let sink = RecordingSink::default();

    let result = BlobFetcher::new(&mock_auth(&server), OBJECT)
        .save_to(&out)
        .block_size(nz64(10))
        .concurrency(nz(1))
        .with_progress_sink(sink.clone())
        .send()
        .await;

    match result {
        Err(FetchError::Server { status, .. }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR)
        }
        other => panic!("预期 Server 错误，得到 {:?}", other.map(|s| s.total_bytes)),
    }
    assert!(sink.completed.lock().unwrap().is_none());
}

#[tokio::test]
async fn empty_object_issues_no_gets() {
    let server = MockServer::start_async().await;
    let head = mock_head(&server, 0).await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(206);
        })
        .await;

    let dir = tempdir().unwrap();
    let out = dir.path().join("empty.bin");

    let summary = BlobFetcher::new(&mock_auth(&server), OBJECT)
        .save_to(&out)
        .send()
        .await
        .unwrap();

    head.assert_hits_async(1).await;
    get.assert_hits_async(0).await;
    assert_eq!(summary.total_bytes, 0);
    assert_eq!(std::fs::metadata(&out).unwrap().len(), 0);
}

#[tokio::test]
async fn missing_save_path_fails_without_requests() {
    let server = MockServer::start_async().await;
    let head = mock_head(&server, 25).await;

    let result = BlobFetcher::new(&mock_auth(&server), OBJECT).send().await;

    assert!(matches!(result, Err(FetchError::NoDestination)));
    head.assert_hits_async(0).await;
}

#[tokio::test]
async fn invalid_key_fails_before_sending() {
    let server = MockServer::start_async().await;
    let head = mock_head(&server, 25).await;

    let auth = SharedKeyAuth::new(MOCK_ACCOUNT, "%%% not base64 %%%", MOCK_CONTAINER)
        .unwrap()
        .with_base_url(&server.base_url())
        .unwrap();
    let result = probe_size(&auth, OBJECT).await;

    assert!(matches!(result, Err(FetchError::Decoding(_))));
    head.assert_hits_async(0).await;
}

#[tokio::test]
async fn unreachable_endpoint_is_a_request_error() {
    let auth = SharedKeyAuth::new(MOCK_ACCOUNT, crate::tests::MOCK_KEY, MOCK_CONTAINER)
        .unwrap()
        .with_base_url("http://127.0.0.1:1/")
        .unwrap();

    let result = probe_size(&auth, OBJECT).await;
    assert!(matches!(result, Err(FetchError::Request(_))));
}

#[tokio::test]
async fn short_body_is_rejected_before_writing() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).header("x-ms-range", "bytes=20-29");
            then.status(206).body("UVWXY");
        })
        .await;

    let dir = tempdir().unwrap();
    let out = dir.path().join("tail.bin");
    let output = PositionalFile::create(&out).await.unwrap();

    let result = fetch_range(
        &mock_auth(&server),
        OBJECT,
        &output,
        RangeRequest { offset: 20, length: 10 },
    )
    .await;

    assert!(matches!(result, Err(FetchError::Parse(_))));
    assert_eq!(std::fs::metadata(&out).unwrap().len(), 0);
}

#[tokio::test]
async fn server_ignoring_range_fails_the_download() {
    let server = MockServer::start_async().await;
    let data = b"ABCDEFGHIJKLMNOPQRSTUVWXY";
    mock_head(&server, data.len()).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(mock_object_path(OBJECT));
            then.status(200).body(&data[..]);
        })
        .await;

    let dir = tempdir().unwrap();
    let out = dir.path().join("whole.bin");
    let sink = RecordingSink::default();

    let result = BlobFetcher::new(&mock_auth(&server), OBJECT)
        .save_to(&out)
        .block_size(nz64(10))
        .concurrency(nz(1))
        .with_progress_sink(sink.clone())
        .send()
        .await;

    assert!(matches!(result, Err(FetchError::Parse(_))));
    assert!(sink.completed.lock().unwrap().is_none());
    assert_eq!(std::fs::metadata(&out).unwrap().len(), 0);
}
