//! Roster 远程接口的查询与变更描述
//!
//! 查询键：
//! - `members`、`events`、`semesters`
//! - `eventAttendance/<eventID>`
//! - `semesterStatuses/<semester>`
//!
//! 变更声明的失效键都按前缀匹配，只写基础名即可覆盖所有参数。

use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};

use crate::data::cache::{QueryDescriptor, QueryKey};
use crate::models::{
    ApiResponse, AttendanceInput, Event, EventAttendance, EventInput, Member, MemberInput,
    MemberStatus, MemberStatusInput, Semester,
};
use crate::services::mutation::MutationDescriptor;
use crate::services::request::{RequestClient, RequestError};

pub const MEMBERS_KEY: &str = "members";
pub const EVENTS_KEY: &str = "events";
pub const EVENT_ATTENDANCE_KEY: &str = "eventAttendance";
pub const SEMESTER_STATUSES_KEY: &str = "semesterStatuses";
pub const SEMESTERS_KEY: &str = "semesters";

/// 变更接口的返回：`data` 形状随接口而定
pub type MutationReply = ApiResponse<Value>;

/// Roster 接口集合
#[derive(Debug, Clone)]
pub struct RosterApi {
    client: RequestClient,
}

impl RosterApi {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    fn list_query<T>(&self, key: QueryKey, endpoint: String) -> QueryDescriptor<Vec<T>>
    where
        T: serde::de::DeserializeOwned + Send + Sync + 'static,
    {
        let client = self.client.clone();
        QueryDescriptor::new(key, move || {
            let client = client.clone();
            let endpoint = endpoint.clone();
            async move { client.fetch_list::<T>(&endpoint).await }
        })
    }

    fn mutation<I>(&self, method: Method, endpoint: String) -> MutationDescriptor<I, MutationReply>
    where
        I: Serialize + Send + 'static,
    {
        let client = self.client.clone();
        MutationDescriptor::new(move |input: I| {
            let client = client.clone();
            let method = method.clone();
            let endpoint = endpoint.clone();
            // 先序列化，请求 future 不再借用输入
            let body = serde_json::to_value(&input)
                .map_err(|e| RequestError::decode(format!("请求体序列化失败: {e}")));
            async move {
                let body = body?;
                client.send_envelope(&endpoint, method, Some(&body)).await
            }
        })
    }

    /// 删除：路径携带 id，请求体携带标识字段
    fn deletion(&self, endpoint: String, body: Value) -> MutationDescriptor<(), MutationReply> {
        let client = self.client.clone();
        MutationDescriptor::new(move |_: ()| {
            let client = client.clone();
            let endpoint = endpoint.clone();
            let body = body.clone();
            async move {
                client
                    .send_envelope(&endpoint, Method::DELETE, Some(&body))
                    .await
            }
        })
    }

    // ---------------------------------------------------------------- 查询

    pub fn members(&self) -> QueryDescriptor<Vec<Member>> {
        self.list_query(members_key(), "/api/brothers".to_string())
    }

    pub fn events(&self) -> QueryDescriptor<Vec<Event>> {
        self.list_query(events_key(), "/api/events".to_string())
    }

    pub fn event_attendance(&self, event_id: i64) -> QueryDescriptor<Vec<EventAttendance>> {
        self.list_query(
            event_attendance_key(event_id),
            format!("/api/events/{event_id}/attendance"),
        )
    }

    pub fn semester_statuses(&self, semester: &str) -> QueryDescriptor<Vec<MemberStatus>> {
        self.list_query(
            semester_statuses_key(semester),
            format!("/api/semesters/{}/statuses", encode_segment(semester)),
        )
    }

    pub fn semesters(&self) -> QueryDescriptor<Vec<Semester>> {
        self.list_query(semesters_key(), "/api/semesters".to_string())
    }

    // ---------------------------------------------------------------- 变更

    pub fn create_member(&self) -> MutationDescriptor<MemberInput, MutationReply> {
        self.mutation(Method::POST, "/api/brothers".to_string())
            .invalidates(members_key())
    }

    pub fn update_member(&self, member_id: i64) -> MutationDescriptor<MemberInput, MutationReply> {
        self.mutation(Method::PATCH, format!("/api/brothers/{member_id}"))
            .invalidates(members_key())
            .invalidates(QueryKey::new(SEMESTER_STATUSES_KEY))
            .invalidates(QueryKey::new(EVENT_ATTENDANCE_KEY))
    }

    pub fn delete_member(&self, member_id: i64) -> MutationDescriptor<(), MutationReply> {
        self.deletion(
            format!("/api/brothers/{member_id}"),
            json!({ "brotherID": member_id }),
        )
        .invalidates(members_key())
        .invalidates(QueryKey::new(SEMESTER_STATUSES_KEY))
        .invalidates(QueryKey::new(EVENT_ATTENDANCE_KEY))
    }

    pub fn create_event(&self) -> MutationDescriptor<EventInput, MutationReply> {
        self.mutation(Method::POST, "/api/events".to_string())
            .invalidates(events_key())
    }

    pub fn update_event(&self, event_id: i64) -> MutationDescriptor<EventInput, MutationReply> {
        self.mutation(Method::PATCH, format!("/api/events/{event_id}"))
            .invalidates(events_key())
    }

    pub fn delete_event(&self, event_id: i64) -> MutationDescriptor<(), MutationReply> {
        self.deletion(
            format!("/api/events/{event_id}"),
            json!({ "eventID": event_id }),
        )
        .invalidates(events_key())
        .invalidates(event_attendance_key(event_id))
    }

    pub fn record_attendance(
        &self,
        event_id: i64,
    ) -> MutationDescriptor<AttendanceInput, MutationReply> {
        self.mutation(Method::POST, format!("/api/events/{event_id}/attendance"))
            .invalidates(event_attendance_key(event_id))
    }

    pub fn add_member_status(
        &self,
        semester: &str,
    ) -> MutationDescriptor<MemberStatusInput, MutationReply> {
        self.mutation(
            Method::POST,
            format!("/api/semesters/{}/statuses", encode_segment(semester)),
        )
        .invalidates(semester_statuses_key(semester))
        .invalidates(members_key())
    }
}

pub fn members_key() -> QueryKey {
    QueryKey::new(MEMBERS_KEY)
}

pub fn events_key() -> QueryKey {
    QueryKey::new(EVENTS_KEY)
}

pub fn semesters_key() -> QueryKey {
    QueryKey::new(SEMESTERS_KEY)
}

pub fn event_attendance_key(event_id: i64) -> QueryKey {
    QueryKey::new(EVENT_ATTENDANCE_KEY).with_param(event_id)
}

pub fn semester_statuses_key(semester: &str) -> QueryKey {
    QueryKey::new(SEMESTER_STATUSES_KEY).with_param(semester)
}

/// 路径段编码（学期名含空格，例如 "Fall 2024"）
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
