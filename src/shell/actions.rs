//! 行操作：编辑会话与删除确认框
//!
//! 每个会话持有自己的 `MutationRunner`，随会话一起释放；
//! 每次提交恰好产生一条通知（校验失败和重复提交除外）。

use std::sync::Arc;

use super::form::{FieldErrors, Form, FormSchema};
use super::notify::{Notification, Notifier};
use crate::data::cache::QueryCache;
use crate::services::mutation::{MutationError, MutationRunner, MutationStatus};
use crate::services::request::RequestError;

/// 删除确认框标题
pub const DELETE_DIALOG_TITLE: &str = "Are you absolutely sure?";

/// 删除确认框说明
pub const DELETE_DIALOG_DESCRIPTION: &str =
    "This action cannot be undone. This will permanently delete the row from the Database";

/// 提交结果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<O> {
    /// 校验失败，没有发出请求
    Invalid(FieldErrors),
    /// 已有请求在途，本次提交被忽略
    Busy,
    Saved(O),
    Failed(RequestError),
}

impl<O> SubmitOutcome<O> {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }
}

/// 会话成功 / 失败时的通知文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMessages {
    pub success: Notification,
    pub failure: Notification,
}

impl SessionMessages {
    /// 编辑已有记录
    pub fn update() -> Self {
        Self {
            success: Notification::record_updated(),
            failure: Notification::update_failed(),
        }
    }

    /// 新增记录
    pub fn create(description: &str) -> Self {
        Self {
            success: Notification::success("Success!", description),
            failure: Notification::destructive("Uh oh! Something went wrong.", ""),
        }
    }
}

/// 编辑（或新增）会话：表单 + 变更执行器
pub struct EditSession<S: FormSchema, O> {
    form: Form<S>,
    runner: MutationRunner<S::Output, O>,
    notifier: Arc<dyn Notifier>,
    messages: SessionMessages,
}

impl<S, O> EditSession<S, O>
where
    S: FormSchema,
    S::Output: Send + 'static,
    O: Send + 'static,
{
    pub fn new(
        values: S,
        runner: MutationRunner<S::Output, O>,
        notifier: Arc<dyn Notifier>,
        messages: SessionMessages,
    ) -> Self {
        Self {
            form: Form::new(values),
            runner,
            notifier,
            messages,
        }
    }

    pub fn form(&self) -> &Form<S> {
        &self.form
    }

    pub fn values_mut(&mut self) -> &mut S {
        self.form.values_mut()
    }

    pub fn status(&self) -> MutationStatus {
        self.runner.status()
    }

    pub async fn submit(&mut self) -> SubmitOutcome<O> {
        let runner = &self.runner;
        let result = match self.form.submit(|values| runner.mutate(values)).await {
            Ok(result) => result,
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "表单校验未通过");
                return SubmitOutcome::Invalid(errors);
            }
        };

        match result {
            Ok(output) => {
                self.notifier.notify(self.messages.success.clone());
                SubmitOutcome::Saved(output)
            }
            Err(MutationError::Busy) => SubmitOutcome::Busy,
            Err(MutationError::Request(error)) => {
                self.notifier.notify(self.messages.failure.clone());
                SubmitOutcome::Failed(error)
            }
        }
    }
}

/// 删除确认框
pub struct DeleteDialog<O> {
    runner: MutationRunner<(), O>,
    notifier: Arc<dyn Notifier>,
}

impl<O: Send + 'static> DeleteDialog<O> {
    pub fn new(runner: MutationRunner<(), O>, notifier: Arc<dyn Notifier>) -> Self {
        Self { runner, notifier }
    }

    pub fn title(&self) -> &'static str {
        DELETE_DIALOG_TITLE
    }

    pub fn description(&self) -> &'static str {
        DELETE_DIALOG_DESCRIPTION
    }

    /// 确认按钮文本，请求在途时为 "Deleting..."
    pub fn confirm_label(&self) -> &'static str {
        if self.runner.is_pending() {
            "Deleting..."
        } else {
            "Delete"
        }
    }

    pub async fn confirm(&self) -> SubmitOutcome<O> {
        match self.runner.mutate(()).await {
            Ok(output) => {
                self.notifier.notify(Notification::row_deleted());
                SubmitOutcome::Saved(output)
            }
            Err(MutationError::Busy) => SubmitOutcome::Busy,
            Err(MutationError::Request(error)) => {
                self.notifier
                    .notify(Notification::delete_failed(error.message()));
                SubmitOutcome::Failed(error)
            }
        }
    }
}

/// 行编辑操作
pub trait EditAction<R> {
    type Form: FormSchema;
    type Output;

    fn edit(
        &self,
        record: &R,
        cache: &QueryCache,
        notifier: Arc<dyn Notifier>,
    ) -> EditSession<Self::Form, Self::Output>;
}

/// 行删除操作
pub trait DeleteAction<R> {
    type Output;

    fn delete(
        &self,
        record: &R,
        cache: &QueryCache,
        notifier: Arc<dyn Notifier>,
    ) -> DeleteDialog<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cache::{QueryDescriptor, QueryKey};
    use crate::services::mutation::MutationDescriptor;
    use crate::shell::notify::MemoryNotifier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StatusForm {
        status: String,
    }

    impl FormSchema for StatusForm {
        type Output = String;

        fn validate(&self) -> Result<String, FieldErrors> {
            let mut errors = FieldErrors::new();
            let status = errors.require_choice(
                "status",
                &self.status,
                &["Active", "Alumnus"],
                "You need to select status.",
            );
            errors.into_result(status)
        }
    }

    fn session(
        cache: &QueryCache,
        notifier: &MemoryNotifier,
        fail: bool,
    ) -> EditSession<StatusForm, String> {
        let descriptor = MutationDescriptor::new(move |status: String| async move {
            if fail {
                Err(RequestError::from_response(500, br#"{"message":"boom"}"#))
            } else {
                Ok(status)
            }
        })
        .invalidates(QueryKey::new("members"));

        EditSession::new(
            StatusForm {
                status: String::new(),
            },
            MutationRunner::new(cache.clone(), descriptor),
            Arc::new(notifier.clone()),
            SessionMessages::update(),
        )
    }

    #[tokio::test]
    async fn test_invalid_submit_sends_nothing() {
        let cache = QueryCache::default();
        let notifier = MemoryNotifier::new();
        let mut session = session(&cache, &notifier, false);

        let outcome = session.submit().await;
        match outcome {
            SubmitOutcome::Invalid(errors) => {
                assert_eq!(errors.first("status"), Some("You need to select status."))
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(notifier.notifications().is_empty());
        assert_eq!(session.status(), MutationStatus::Idle);
    }

    #[tokio::test]
    async fn test_successful_edit_notifies_once_and_invalidates() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let query = {
            let calls = Arc::clone(&calls);
            QueryDescriptor::new(QueryKey::new("members"), move || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok(n) }
            })
        };
        let mut observer = cache.observe(&query);
        observer.settled().await;

        let notifier = MemoryNotifier::new();
        let mut session = session(&cache, &notifier, false);
        session.values_mut().status = "Alumnus".to_string();

        assert_eq!(session.submit().await, SubmitOutcome::Saved("Alumnus".to_string()));
        assert_eq!(notifier.take(), vec![Notification::record_updated()]);
        observer.settled().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_edit_is_destructive() {
        let cache = QueryCache::default();
        let notifier = MemoryNotifier::new();
        let mut session = session(&cache, &notifier, true);
        session.values_mut().status = "Active".to_string();

        let outcome = session.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Failed(ref e) if e.message() == "boom"));
        assert_eq!(notifier.take(), vec![Notification::update_failed()]);
    }

    #[tokio::test]
    async fn test_delete_dialog_reports_server_message() {
        let notifier = MemoryNotifier::new();
        let runner = MutationRunner::new(
            QueryCache::default(),
            MutationDescriptor::<(), ()>::new(|_| async {
                Err(RequestError::from_response(404, br#"{"message":"Event not found"}"#))
            }),
        );
        let dialog = DeleteDialog::new(runner, Arc::new(notifier.clone()));
        assert_eq!(dialog.confirm_label(), "Delete");
        assert_eq!(dialog.title(), DELETE_DIALOG_TITLE);

        assert!(matches!(dialog.confirm().await, SubmitOutcome::Failed(_)));
        let received = notifier.take();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].title, "Failed to delete row");
        assert_eq!(received[0].description, "Event not found");
    }

    #[tokio::test]
    async fn test_delete_dialog_success() {
        let notifier = MemoryNotifier::new();
        let runner = MutationRunner::new(
            QueryCache::default(),
            MutationDescriptor::new(|_: ()| async { Ok(()) }),
        );
        let dialog = DeleteDialog::new(runner, Arc::new(notifier.clone()));
        assert!(dialog.confirm().await.is_saved());
        assert_eq!(notifier.take(), vec![Notification::row_deleted()]);
    }
}
