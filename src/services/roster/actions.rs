//! 行操作绑定：成员 / 活动的编辑与删除，以及新增类会话

use std::sync::Arc;

use super::api::{MutationReply, RosterApi};
use super::forms::{AttendanceForm, EventForm, MemberForm, MemberStatusForm};
use crate::data::cache::QueryCache;
use crate::models::{Event, Member};
use crate::services::mutation::MutationRunner;
use crate::shell::{
    DeleteAction, DeleteDialog, EditAction, EditSession, Notifier, SessionMessages,
};

pub const MEMBER_CREATED: &str = "Added new member record successfully.";
pub const EVENT_CREATED: &str = "Added new event record to the database.";
pub const ATTENDANCE_RECORDED: &str = "Attendance recorded successfully.";
pub const STATUS_ADDED: &str = "Added new semester status successfully.";

/// 成员表的行操作
#[derive(Debug, Clone)]
pub struct MemberActions {
    api: RosterApi,
}

impl MemberActions {
    pub fn new(api: RosterApi) -> Self {
        Self { api }
    }
}

impl EditAction<Member> for MemberActions {
    type Form = MemberForm;
    type Output = MutationReply;

    fn edit(
        &self,
        record: &Member,
        cache: &QueryCache,
        notifier: Arc<dyn Notifier>,
    ) -> EditSession<MemberForm, MutationReply> {
        EditSession::new(
            MemberForm::from_member(record),
            MutationRunner::new(cache.clone(), self.api.update_member(record.member_id)),
            notifier,
            SessionMessages::update(),
        )
    }
}

impl DeleteAction<Member> for MemberActions {
    type Output = MutationReply;

    fn delete(
        &self,
        record: &Member,
        cache: &QueryCache,
        notifier: Arc<dyn Notifier>,
    ) -> DeleteDialog<MutationReply> {
        DeleteDialog::new(
            MutationRunner::new(cache.clone(), self.api.delete_member(record.member_id)),
            notifier,
        )
    }
}

/// 活动表的行操作
#[derive(Debug, Clone)]
pub struct EventActions {
    api: RosterApi,
}

impl EventActions {
    pub fn new(api: RosterApi) -> Self {
        Self { api }
    }
}

impl EditAction<Event> for EventActions {
    type Form = EventForm;
    type Output = MutationReply;

    fn edit(
        &self,
        record: &Event,
        cache: &QueryCache,
        notifier: Arc<dyn Notifier>,
    ) -> EditSession<EventForm, MutationReply> {
        EditSession::new(
            EventForm::from_event(record),
            MutationRunner::new(cache.clone(), self.api.update_event(record.event_id)),
            notifier,
            SessionMessages::update(),
        )
    }
}

impl DeleteAction<Event> for EventActions {
    type Output = MutationReply;

    fn delete(
        &self,
        record: &Event,
        cache: &QueryCache,
        notifier: Arc<dyn Notifier>,
    ) -> DeleteDialog<MutationReply> {
        DeleteDialog::new(
            MutationRunner::new(cache.clone(), self.api.delete_event(record.event_id)),
            notifier,
        )
    }
}

pub fn new_member_session(
    api: &RosterApi,
    cache: &QueryCache,
    notifier: Arc<dyn Notifier>,
) -> EditSession<MemberForm, MutationReply> {
    EditSession::new(
        MemberForm::default(),
        MutationRunner::new(cache.clone(), api.create_member()),
        notifier,
        SessionMessages::create(MEMBER_CREATED),
    )
}

pub fn new_event_session(
    api: &RosterApi,
    cache: &QueryCache,
    notifier: Arc<dyn Notifier>,
) -> EditSession<EventForm, MutationReply> {
    EditSession::new(
        EventForm::default(),
        MutationRunner::new(cache.clone(), api.create_event()),
        notifier,
        SessionMessages::create(EVENT_CREATED),
    )
}

pub fn attendance_session(
    api: &RosterApi,
    event_id: i64,
    cache: &QueryCache,
    notifier: Arc<dyn Notifier>,
) -> EditSession<AttendanceForm, MutationReply> {
    EditSession::new(
        AttendanceForm::new(event_id),
        MutationRunner::new(cache.clone(), api.record_attendance(event_id)),
        notifier,
        SessionMessages::create(ATTENDANCE_RECORDED),
    )
}

pub fn member_status_session(
    api: &RosterApi,
    semester: &str,
    cache: &QueryCache,
    notifier: Arc<dyn Notifier>,
) -> EditSession<MemberStatusForm, MutationReply> {
    EditSession::new(
        MemberStatusForm::default(),
        MutationRunner::new(cache.clone(), api.add_member_status(semester)),
        notifier,
        SessionMessages::create(STATUS_ADDED),
    )
}
