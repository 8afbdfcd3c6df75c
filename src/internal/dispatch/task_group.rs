//! 有界并发任务组：最多同时运行 n 个任务，提供“等待全部完成”的屏障，并传播第一个失败。

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::internal::fetch_error::FetchError;

/// 任务组。`spawn` 在没有空位时等待；任务结束（成功、失败或 panic）都会归还空位。
///
/// 任一任务失败后，后续 `spawn` / `join` 会返回该错误，任务组被丢弃时其余任务随之中止。
pub struct TaskGroup<T> {
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<Result<T, FetchError>>,
    finished: Vec<T>,
}

impl<T: Send + 'static> TaskGroup<T> {
    pub fn new(max_concurrent: NonZeroUsize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.get())),
            tasks: JoinSet::new(),
            finished: Vec::new(),
        }
    }

    /// 等到有空位后启动任务；已有任务失败时不再启动，直接返回该错误。
    pub async fn spawn<F>(&mut self, f: F) -> Result<(), FetchError>
    where
        F: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        self.reap_finished()?;

        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| FetchError::Internal("semaphore closed".into()))?;

        self.reap_finished()?;

        self.tasks.spawn(async move {
            let _permit = permit;
            f.await
        });
        Ok(())
    }

    /// 等待所有已启动的任务结束，按完成顺序返回结果；遇到第一个失败立即返回。
    pub async fn join(mut self) -> Result<Vec<T>, FetchError> {
        while let Some(res) = self.tasks.join_next().await {
            self.finished.push(res??);
        }
        Ok(self.finished)
    }

    fn reap_finished(&mut self) -> Result<(), FetchError> {
        while let Some(res) = self.tasks.try_join_next() {
            self.finished.push(res??);
        }
        Ok(())
    }
}
