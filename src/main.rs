use std::num::{NonZeroU64, NonZeroUsize};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use blob_fetch::FetchError;
use blob_fetch::auth::SharedKeyAuth;
use blob_fetch::fetcher::{BlobFetcher, DEFAULT_BLOCK_SIZE, DEFAULT_CONCURRENCY, FetchConfig};

/// 凭据从环境变量 STORAGE_ACCOUNT / STORAGE_KEY / STORAGE_CONTAINER 读取，支持当前目录下的 .env 文件
#[derive(Parser, Debug)]
#[command(name = "blob-fetch")]
#[command(about = "Download one blob with concurrent signed range requests")]
#[command(version)]
struct Cli {
    #[arg(long = "in", help = "object path inside the container, e.g. /dir/file.bin")]
    input: String,
    #[arg(long = "out", help = "local file to write to")]
    output: PathBuf,
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, help = "how many reads to run at a time")]
    concurrency: NonZeroUsize,
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE, help = "bytes to fetch in each block")]
    block_size: NonZeroU64,
    #[arg(long, help = "override the service base URL (emulators, private endpoints)")]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env 可选
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("下载失败: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), FetchError> {
    let mut auth = SharedKeyAuth::from_env()?;
    if let Some(endpoint) = cli.endpoint.as_deref() {
        auth = auth.with_base_url(endpoint)?;
    }

    let config = FetchConfig {
        save_path: Some(cli.output),
        block_size: cli.block_size,
        concurrency: cli.concurrency,
    };

    BlobFetcher::new(&auth, cli.input)
        .with_config(config)
        .send()
        .await?;

    Ok(())
}
