//! 操作结果通知
//!
//! 每次提交（编辑或删除）恰好产生一条通知。

use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NotificationKind::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.kind == NotificationKind::Destructive
    }

    pub fn record_updated() -> Self {
        Self::success("Success!", "Record updated successfully.")
    }

    pub fn update_failed() -> Self {
        Self::destructive("Uh oh! Something went wrong.", "Failed to update record.")
    }

    pub fn row_deleted() -> Self {
        Self::success("Deleted Successfully", "The row has been deleted successfully.")
    }

    /// 删除失败时展示服务端错误信息
    pub fn delete_failed(message: &str) -> Self {
        let description = if message.trim().is_empty() {
            "Failed to delete the item. Please try again."
        } else {
            message
        };
        Self::destructive("Failed to delete row", description)
    }
}

/// 通知出口
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// 写入日志的通知器
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => tracing::info!(
                title = %notification.title,
                description = %notification.description,
                "操作成功"
            ),
            NotificationKind::Destructive => tracing::warn!(
                title = %notification.title,
                description = %notification.description,
                "操作失败"
            ),
        }
    }
}

/// 在内存中收集通知，供终端输出或测试断言
#[derive(Debug, Default, Clone)]
pub struct MemoryNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier_collects_in_order() {
        let notifier = MemoryNotifier::new();
        notifier.notify(Notification::record_updated());
        notifier.notify(Notification::update_failed());

        let received = notifier.take();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].title, "Success!");
        assert!(received[1].is_destructive());
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_delete_failed_uses_server_message() {
        let notification = Notification::delete_failed("Brother not found");
        assert_eq!(notification.title, "Failed to delete row");
        assert_eq!(notification.description, "Brother not found");

        let fallback = Notification::delete_failed("");
        assert_eq!(
            fallback.description,
            "Failed to delete the item. Please try again."
        );
    }
}
