//! 变更执行器
//!
//! 每个表单或确认框会话持有一个执行器实例：
//! - 同一时刻最多一个请求在途，重复提交直接返回 `MutationError::Busy`
//! - 成功后按前缀失效声明的查询键，再把结果交给调用方
//! - 失败时不失效任何查询
//! - 请求在独立任务中运行，调用方放弃等待不影响失效

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::watch;

use crate::data::cache::{QueryCache, QueryKey};
use crate::services::request::RequestError;

type ExecuteFn<I, O> = Arc<dyn Fn(I) -> BoxFuture<'static, Result<O, RequestError>> + Send + Sync>;

/// 变更描述：执行函数 + 成功后需要失效的查询键
pub struct MutationDescriptor<I, O> {
    execute: ExecuteFn<I, O>,
    invalidates: Vec<QueryKey>,
}

impl<I, O> Clone for MutationDescriptor<I, O> {
    fn clone(&self) -> Self {
        Self {
            execute: Arc::clone(&self.execute),
            invalidates: self.invalidates.clone(),
        }
    }
}

impl<I: 'static, O: 'static> MutationDescriptor<I, O> {
    pub fn new<F, Fut>(execute: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, RequestError>> + Send + 'static,
    {
        Self {
            execute: Arc::new(move |input| execute(input).boxed()),
            invalidates: Vec::new(),
        }
    }

    /// 声明成功后失效的查询键（前缀匹配）
    pub fn invalidates(mut self, key: QueryKey) -> Self {
        self.invalidates.push(key);
        self
    }

    pub fn invalidated_keys(&self) -> &[QueryKey] {
        &self.invalidates
    }
}

/// 变更状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Pending,
    Success,
    Error(RequestError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// 已有请求在途，本次提交被忽略
    #[error("已有变更请求在途")]
    Busy,

    #[error(transparent)]
    Request(#[from] RequestError),
}

/// 在途标记，变更任务结束（包括任务异常退出）时复位
struct InFlightGuard {
    flag: Arc<AtomicBool>,
    status: Arc<watch::Sender<MutationStatus>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.status.send_if_modified(|status| {
            if *status == MutationStatus::Pending {
                *status = MutationStatus::Idle;
                true
            } else {
                false
            }
        });
        self.flag.store(false, Ordering::Release);
    }
}

/// 单飞变更执行器
pub struct MutationRunner<I, O> {
    cache: QueryCache,
    descriptor: MutationDescriptor<I, O>,
    in_flight: Arc<AtomicBool>,
    status: Arc<watch::Sender<MutationStatus>>,
}

impl<I, O> MutationRunner<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    pub fn new(cache: QueryCache, descriptor: MutationDescriptor<I, O>) -> Self {
        let (status, _) = watch::channel(MutationStatus::Idle);
        Self {
            cache,
            descriptor,
            in_flight: Arc::new(AtomicBool::new(false)),
            status: Arc::new(status),
        }
    }

    /// 执行一次变更
    ///
    /// 请求和成功后的失效在独立任务中完成。调用方的 future 被丢弃时
    /// （关闭对话框、超时、任务取消）请求照常结束，失效也照常发生。
    pub async fn mutate(&self, input: I) -> Result<O, MutationError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            tracing::debug!("变更请求在途，忽略重复提交");
            return Err(MutationError::Busy);
        }
        let guard = InFlightGuard {
            flag: Arc::clone(&self.in_flight),
            status: Arc::clone(&self.status),
        };
        self.status.send_replace(MutationStatus::Pending);

        let execute = Arc::clone(&self.descriptor.execute);
        let invalidates = self.descriptor.invalidates.clone();
        let cache = self.cache.clone();
        let status = Arc::clone(&self.status);

        let task = tokio::spawn(async move {
            let _guard = guard;
            let started = Instant::now();
            let result = execute(input).await;
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

            match result {
                Ok(output) => {
                    let refetching: usize = invalidates
                        .iter()
                        .map(|key| cache.invalidate_matching(key))
                        .sum();
                    tracing::info!(elapsed_ms, refetching, "变更成功");
                    status.send_replace(MutationStatus::Success);
                    Ok(output)
                }
                Err(error) => {
                    tracing::warn!(elapsed_ms, error = %error, "变更失败");
                    status.send_replace(MutationStatus::Error(error.clone()));
                    Err(error)
                }
            }
        });

        match task.await {
            Ok(result) => result.map_err(MutationError::Request),
            Err(join_error) => {
                tracing::error!(error = %join_error, "变更任务异常结束");
                let error = RequestError::transport(format!("变更任务异常结束: {join_error}"));
                self.status
                    .send_replace(MutationStatus::Error(error.clone()));
                Err(MutationError::Request(error))
            }
        }
    }

    pub fn status(&self) -> MutationStatus {
        self.status.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn subscribe(&self) -> watch::Receiver<MutationStatus> {
        self.status.subscribe()
    }

    /// 回到 `Idle`；请求在途时不做任何事
    pub fn reset(&self) {
        if !self.is_pending() {
            self.status.send_replace(MutationStatus::Idle);
        }
    }
}
