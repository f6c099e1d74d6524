//! Roster 领域绑定
//!
//! - `api`: 查询 / 变更描述（端点、查询键、失效键）
//! - `columns`: 各表格的列定义
//! - `forms`: 表单与校验规则
//! - `actions`: 行编辑 / 删除与新增会话

pub mod actions;
pub mod api;
pub mod columns;
pub mod forms;

pub use actions::{
    attendance_session, member_status_session, new_event_session, new_member_session,
    EventActions, MemberActions,
};
pub use api::{
    event_attendance_key, events_key, members_key, semester_statuses_key, semesters_key,
    MutationReply, RosterApi,
};
pub use columns::{
    attendance_columns, event_columns, member_columns, member_status_columns, semester_columns,
};
pub use forms::{AttendanceForm, EventForm, MemberForm, MemberStatusForm};
