//! 表格外壳与行操作
//!
//! - `table_shell`: 查询状态 + 表格计算
//! - `form`: 表单校验
//! - `actions`: 编辑会话与删除确认框
//! - `notify`: 操作结果通知

pub mod actions;
pub mod form;
pub mod notify;
pub mod table_shell;


pub use actions::{
    DeleteAction, DeleteDialog, EditAction, EditSession, SessionMessages, SubmitOutcome,
    DELETE_DIALOG_DESCRIPTION, DELETE_DIALOG_TITLE,
};
pub use form::{FieldErrors, Form, FormSchema};
pub use notify::{LogNotifier, MemoryNotifier, Notification, NotificationKind, Notifier};
pub use table_shell::{ShellContent, ShellFrame, TableShell};
