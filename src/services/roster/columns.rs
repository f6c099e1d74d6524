//! Roster 表格的列模型

use crate::models::{Event, EventAttendance, Member, MemberStatus, Semester};
use crate::table::{CellValue, ColumnDef};

/// 操作列的文本
pub const ROW_ACTIONS_LABEL: &str = "Edit · Delete";

pub fn member_columns() -> Vec<ColumnDef<Member>> {
    vec![
        ColumnDef::accessor("rollCall", |m: &Member| m.roll_call).header("Roll Call"),
        ColumnDef::accessor("firstName", |m: &Member| m.first_name.clone()).header("First Name"),
        ColumnDef::accessor("lastName", |m: &Member| m.last_name.clone()).header("Last Name"),
        ColumnDef::accessor("major", |m: &Member| m.major.clone()).header("Major"),
        ColumnDef::accessor("status", |m: &Member| m.status.clone()).header("Status"),
        ColumnDef::accessor("className", |m: &Member| m.class_name.clone()).header("Class Name"),
        ColumnDef::accessor("email", |m: &Member| m.email.clone()).header("Email"),
        ColumnDef::accessor("phoneNumber", |m: &Member| m.phone_number.clone())
            .header("Phone Number")
            .sortable(false),
        ColumnDef::display("actions").cell(|_: &Member, _| ROW_ACTIONS_LABEL.to_string()),
    ]
}

pub fn event_columns() -> Vec<ColumnDef<Event>> {
    vec![
        ColumnDef::accessor("eventName", |e: &Event| e.event_name.clone()).header("Event Name"),
        ColumnDef::accessor("categoryName", |e: &Event| e.category_name.clone()).header("Category"),
        ColumnDef::accessor("eventLocation", |e: &Event| e.event_location.clone()).header("Location"),
        ColumnDef::accessor("eventDate", |e: &Event| e.event_date)
            .header("Date")
            .filterable(false)
            .cell(|_, value| match value {
                CellValue::DateTime(at) => at.format("%b %-d, %Y").to_string(),
                other => other.to_display_string(),
            }),
        ColumnDef::display("actions").cell(|_: &Event, _| ROW_ACTIONS_LABEL.to_string()),
    ]
}

pub fn attendance_columns() -> Vec<ColumnDef<EventAttendance>> {
    vec![
        ColumnDef::accessor("rollCall", |a: &EventAttendance| a.roll_call).header("Roll Call"),
        ColumnDef::accessor("firstName", |a: &EventAttendance| a.first_name.clone())
            .header("First Name"),
        ColumnDef::accessor("lastName", |a: &EventAttendance| a.last_name.clone())
            .header("Last Name"),
        ColumnDef::accessor("attendanceStatus", |a: &EventAttendance| {
            a.attendance_status.clone()
        })
        .header("Status"),
    ]
}

pub fn member_status_columns() -> Vec<ColumnDef<MemberStatus>> {
    vec![
        ColumnDef::accessor("rollCall", |s: &MemberStatus| s.roll_call).header("Roll Call"),
        ColumnDef::accessor("firstName", |s: &MemberStatus| s.first_name.clone())
            .header("First Name"),
        ColumnDef::accessor("lastName", |s: &MemberStatus| s.last_name.clone()).header("Last Name"),
        ColumnDef::accessor("major", |s: &MemberStatus| s.major.clone()).header("Major"),
        ColumnDef::accessor("status", |s: &MemberStatus| s.status.clone()).header("Status"),
        ColumnDef::accessor("semesterLabel", |s: &MemberStatus| s.semester.clone())
            .header("Semester")
            .hideable(false),
    ]
}

pub fn semester_columns() -> Vec<ColumnDef<Semester>> {
    vec![
        ColumnDef::accessor("semesterID", |s: &Semester| s.semester_id.clone())
            .header("ID")
            .hideable(false),
        ColumnDef::accessor("semesterLabel", |s: &Semester| s.semester_label.clone())
            .header("Semester"),
    ]
}
