use serde::Serialize;

use crate::{
    models::{
        exams::Exam,
        notifications::Notification,
        schedules::{Schedule, Slot},
    },
    protocol::SlotItem,
    utils::{format_date, format_datetime},
};

#[derive(Default, Serialize)]
pub struct PatientLoginResponse {
    pub success: bool,
    pub access_token: String,
    pub patient_id: i32,
}

#[derive(Default, Serialize)]
pub struct OpenScheduleItem {
    pub schedule_id: i32,
    pub date: String,
    pub professional_id: i32,
    pub slots: Vec<SlotItem>,
}

impl OpenScheduleItem {
    pub fn new(schedule: Schedule, slots: Vec<Slot>) -> Self {
        Self {
            schedule_id: schedule.id,
            date: format_date(&schedule.date),
            professional_id: schedule.professional_id,
            slots: slots.into_iter().map(SlotItem::from).collect(),
        }
    }
}

#[derive(Default, Serialize)]
pub struct OpenSchedulesResponse {
    pub success: bool,
    pub schedules: Vec<OpenScheduleItem>,
}

#[derive(Default, Serialize)]
pub struct ExamItem {
    pub id: i32,
    pub name: String,
    pub scheduled_at: String,
    pub status: String,
}

impl From<Exam> for ExamItem {
    fn from(exam: Exam) -> Self {
        Self {
            id: exam.id,
            name: exam.name,
            scheduled_at: format_datetime(&exam.scheduled_at),
            status: exam.status,
        }
    }
}

#[derive(Default, Serialize)]
pub struct ExamListResponse {
    pub success: bool,
    pub exams: Vec<ExamItem>,
}

#[derive(Default, Serialize)]
pub struct ExamResponse {
    pub success: bool,
    pub msg: String,
    pub exam: ExamItem,
}

#[derive(Default, Serialize)]
pub struct NotificationItem {
    pub id: i32,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationItem {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            read: n.read,
            created_at: format_datetime(&n.created_at),
        }
    }
}

#[derive(Default, Serialize)]
pub struct NotificationListResponse {
    pub success: bool,
    pub notifications: Vec<NotificationItem>,
}
