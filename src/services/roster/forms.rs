//! Roster 表单：原始输入与校验规则

use chrono::{DateTime, Utc};

use crate::models::{
    AttendanceInput, Event, EventInput, Member, MemberInput, MemberStatusInput,
    ATTENDANCE_STATUSES, EVENT_CATEGORIES, MEMBER_STATUSES,
};
use crate::shell::{FieldErrors, FormSchema};

const SELECT_STATUS: &str = "You need to select status.";

/// 可选文本：去掉空白后为空视为未填写
fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// 成员表单（新增与编辑共用）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberForm {
    pub first_name: String,
    pub last_name: String,
    pub major: String,
    pub roll_call: Option<i64>,
    pub status: String,
    pub class_name: String,
    pub email: String,
    pub phone_number: String,
}

impl MemberForm {
    /// 用已有记录预填
    pub fn from_member(member: &Member) -> Self {
        Self {
            first_name: member.first_name.clone(),
            last_name: member.last_name.clone(),
            major: member.major.clone(),
            roll_call: Some(member.roll_call),
            status: member.status.clone(),
            class_name: member.class_name.clone(),
            email: member.email.clone(),
            phone_number: member.phone_number.clone(),
        }
    }
}

impl FormSchema for MemberForm {
    type Output = MemberInput;

    fn validate(&self) -> Result<MemberInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let first_name =
            errors.require_text("firstName", &self.first_name, "You must provide a First Name");
        let last_name =
            errors.require_text("lastName", &self.last_name, "You must provide a Last Name");
        let major = errors.require_text("major", &self.major, "You must provide a Major");
        let roll_call =
            errors.require_min("rollCall", self.roll_call, 1, "You must provide a Roll Call");
        let status = errors.require_choice("status", &self.status, &MEMBER_STATUSES, SELECT_STATUS);

        errors.into_result(MemberInput {
            first_name,
            last_name,
            major,
            roll_call,
            status,
            class_name: optional_text(&self.class_name),
            email: optional_text(&self.email),
            phone_number: optional_text(&self.phone_number),
        })
    }
}

/// 活动表单
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventForm {
    pub event_name: String,
    pub category_name: String,
    pub event_date: Option<DateTime<Utc>>,
    pub event_location: String,
}

impl EventForm {
    pub fn from_event(event: &Event) -> Self {
        Self {
            event_name: event.event_name.clone(),
            category_name: event.category_name.clone(),
            event_date: Some(event.event_date),
            event_location: event.event_location.clone(),
        }
    }
}

impl FormSchema for EventForm {
    type Output = EventInput;

    fn validate(&self) -> Result<EventInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let event_name =
            errors.require_text("eventName", &self.event_name, "You must provide an Event Name");
        let category_name = errors.require_choice(
            "categoryName",
            &self.category_name,
            &EVENT_CATEGORIES,
            "You need to select a category.",
        );
        if self.event_date.is_none() {
            errors.add("eventDate", "You must provide a date");
        }

        let event_date = self.event_date.unwrap_or_default();
        errors.into_result(EventInput {
            event_name,
            category_name,
            event_date,
            event_location: optional_text(&self.event_location),
        })
    }
}

/// 出勤登记表单，活动 id 由会话固定
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceForm {
    pub event_id: i64,
    pub roll_call: Option<i64>,
    pub status: String,
}

impl AttendanceForm {
    pub fn new(event_id: i64) -> Self {
        Self {
            event_id,
            roll_call: None,
            status: String::new(),
        }
    }
}

impl FormSchema for AttendanceForm {
    type Output = AttendanceInput;

    fn validate(&self) -> Result<AttendanceInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let roll_call =
            errors.require_min("rollCall", self.roll_call, 1, "You must provide a Roll Call");
        let status =
            errors.require_choice("status", &self.status, &ATTENDANCE_STATUSES, SELECT_STATUS);

        errors.into_result(AttendanceInput {
            event_id: self.event_id,
            roll_call,
            status,
        })
    }
}

/// 学期状态表单
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberStatusForm {
    pub member_id: Option<i64>,
    pub status: String,
}

impl FormSchema for MemberStatusForm {
    type Output = MemberStatusInput;

    fn validate(&self) -> Result<MemberStatusInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let member_id =
            errors.require_min("brotherID", self.member_id, 1, "You must select a member");
        let status = errors.require_choice("status", &self.status, &MEMBER_STATUSES, SELECT_STATUS);

        errors.into_result(MemberStatusInput { member_id, status })
    }
}
