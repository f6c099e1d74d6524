// Roster 领域记录与写请求体
//
// 字段名与远程 API 的 JSON 保持一致（`brotherID`、`rollCall`、`semesterLabel` 等）。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 成员状态可选值
pub const MEMBER_STATUSES: [&str; 6] = [
    "Active",
    "Pre-Alumnus",
    "Alumnus",
    "Co-op",
    "Transferred",
    "Expelled",
];

/// 专业可选值
pub const MAJORS: [&str; 7] = [
    "Civil Engineering",
    "Bioengineering",
    "Computer Engineering",
    "Computer Science",
    "Electrical Engineering",
    "Engineering Physics",
    "Mechanical Engineering",
];

/// 活动类别可选值
pub const EVENT_CATEGORIES: [&str; 3] = [
    "Brotherhood",
    "Professional Development",
    "Community Service",
];

/// 出勤状态可选值
pub const ATTENDANCE_STATUSES: [&str; 3] = ["Present", "Absent", "Excused"];

/// 成员
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "brotherID")]
    pub member_id: i64,
    pub roll_call: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub major: String,
    pub status: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// 活动
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "eventID")]
    pub event_id: i64,
    pub event_name: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub event_location: String,
    pub event_date: DateTime<Utc>,
}

/// 某次活动中单个成员的出勤记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendance {
    #[serde(rename = "brotherID")]
    pub member_id: i64,
    #[serde(rename = "eventID")]
    pub event_id: i64,
    pub roll_call: i64,
    pub first_name: String,
    pub last_name: String,
    pub attendance_status: String,
}

/// 成员在某学期的状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStatus {
    #[serde(rename = "brotherID")]
    pub member_id: i64,
    pub roll_call: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub major: String,
    pub status: String,
    #[serde(rename = "semesterLabel")]
    pub semester: String,
}

/// 学期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    #[serde(rename = "semesterID")]
    pub semester_id: String,
    #[serde(rename = "semesterLabel")]
    pub semester_label: String,
}

/// 新增 / 编辑成员的请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInput {
    pub first_name: String,
    pub last_name: String,
    pub major: String,
    pub roll_call: i64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// 新增 / 编辑活动的请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub event_name: String,
    pub category_name: String,
    pub event_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_location: Option<String>,
}

/// 登记出勤的请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceInput {
    #[serde(rename = "eventID")]
    pub event_id: i64,
    pub roll_call: i64,
    pub status: String,
}

/// 为成员添加学期状态的请求体（学期在路径中）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberStatusInput {
    #[serde(rename = "brotherID")]
    pub member_id: i64,
    pub status: String,
}
