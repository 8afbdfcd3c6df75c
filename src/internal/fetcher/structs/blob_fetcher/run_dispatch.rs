//! 分段调度：探测大小、切段、有界并发拉取、等待全部完成。

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::internal::blob::range_fetch::fetch_range;
use crate::internal::blob::size_probe::probe_size;
use crate::internal::dispatch::progress::FetchProgress;
use crate::internal::dispatch::range_plan::RangePlan;
use crate::internal::dispatch::task_group::TaskGroup;
use crate::internal::fetch_error::FetchError;
use crate::internal::fetcher::structs::fetch_summary::FetchSummary;
use crate::internal::output::positional_file::PositionalFile;

use super::BlobFetcher;

pub(super) async fn run_dispatch(fetcher: BlobFetcher) -> Result<FetchSummary, FetchError> {
    let BlobFetcher {
        auth,
        path,
        config,
        sink,
        counter,
    } = fetcher;

    let save_path = config.save_path.ok_or(FetchError::NoDestination)?;

    let total = probe_size(&auth, &path).await?;
    let output = PositionalFile::create(&save_path).await?;

    let start = Instant::now();
    let plan = RangePlan::new(total, config.block_size);
    info!(
        "共 {} 个分段，块大小 {} 字节，最多 {} 个并发",
        plan.range_count(),
        config.block_size,
        config.concurrency
    );

    let path: Arc<str> = Arc::from(path);
    let mut group = TaskGroup::new(config.concurrency);

    for range in plan {
        let auth = auth.clone();
        let path = Arc::clone(&path);
        let output = output.clone();
        let counter = counter.clone();
        let sink = Arc::clone(&sink);

        group
            .spawn(async move {
                let written = fetch_range(&auth, &path, &output, range).await?;
                let bytes_done = counter.add(written);
                sink.on_progress(FetchProgress { bytes_done, total });
                Ok(written)
            })
            .await?;
    }

    let bytes_written: u64 = group.join().await?.into_iter().sum();

    let summary = FetchSummary {
        path: output.path().to_path_buf(),
        total_bytes: total,
        bytes_written,
        elapsed: start.elapsed(),
    };
    sink.on_complete(&summary);

    Ok(summary)
}
