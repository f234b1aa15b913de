//! 可取消的条件等待
//!
//! 自定义下拉菜单在点击后异步渲染。这里不再固定等待一段时间，而是按
//! 间隔轮询条件，直到条件成立、超时或会话被取消。

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::page::Page;

use super::constants::{DEFAULT_OPTION_TIMEOUT, DEFAULT_POLL_INTERVAL};

/// 等待参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_OPTION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// 等待结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    Found(T),
    TimedOut,
    Cancelled,
}

impl<T> WaitOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            WaitOutcome::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// 轮询页面直到 `condition` 返回结果
///
/// 每轮先让页面渲染到期的内容（`Page::tick`），再执行 `condition`。
/// 超时前至少检查一次；休眠期间一旦取消立即返回。
pub async fn wait_for<T, F>(
    page: &mut Page,
    options: &WaitOptions,
    cancel: &CancellationToken,
    mut condition: F,
) -> WaitOutcome<T>
where
    F: FnMut(&Page) -> Option<T>,
{
    let deadline = Instant::now() + options.timeout;

    loop {
        if cancel.is_cancelled() {
            return WaitOutcome::Cancelled;
        }

        if let Err(e) = page.tick() {
            tracing::warn!("渲染延迟内容失败: {}", e);
        }

        if let Some(found) = condition(page) {
            return WaitOutcome::Found(found);
        }

        let now = Instant::now();
        if now >= deadline {
            return WaitOutcome::TimedOut;
        }

        let remaining = deadline - now;
        tokio::select! {
            _ = cancel.cancelled() => return WaitOutcome::Cancelled,
            _ = tokio::time::sleep(options.poll_interval.min(remaining)) => {}
        }
    }
}
