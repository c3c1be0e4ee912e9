use serde::Serialize;

use crate::{
    booking::registry::ScheduleDetail,
    models::{
        exams::Exam,
        records::{MedicalRecord, Prescription},
        schedules::Schedule,
    },
    protocol::{BookingItem, SlotItem},
    utils::{format_date, format_datetime},
};

#[derive(Default, Serialize)]
pub struct ProfessionalLoginResponse {
    pub success: bool,
    pub access_token: String,
    pub professional_id: i32,
    pub name: String,
    pub kind: String,
    pub license: Option<String>,
}

#[derive(Default, Serialize)]
pub struct ScheduleItem {
    pub id: i32,
    pub professional_id: i32,
    pub date: String,
}

impl From<Schedule> for ScheduleItem {
    fn from(schedule: Schedule) -> Self {
        Self {
            id: schedule.id,
            professional_id: schedule.professional_id,
            date: format_date(&schedule.date),
        }
    }
}

#[derive(Default, Serialize)]
pub struct ScheduleListResponse {
    pub success: bool,
    pub schedules: Vec<ScheduleItem>,
}

#[derive(Default, Serialize)]
pub struct ScheduleDetailResponse {
    pub success: bool,
    pub schedule: ScheduleItem,
    pub slots: Vec<SlotItem>,
    pub bookings: Vec<BookingItem>,
}

impl From<ScheduleDetail> for ScheduleDetailResponse {
    fn from(detail: ScheduleDetail) -> Self {
        Self {
            success: true,
            schedule: detail.schedule.into(),
            slots: detail.slots.into_iter().map(SlotItem::from).collect(),
            bookings: detail.bookings.into_iter().map(BookingItem::from).collect(),
        }
    }
}

#[derive(Default, Serialize)]
pub struct PublishSlotsResponse {
    pub success: bool,
    pub msg: String,
    pub created: Vec<SlotItem>,
    pub ignored: Vec<String>,
}

#[derive(Default, Serialize)]
pub struct PatientSummary {
    pub id: i32,
    pub name: String,
}

#[derive(Default, Serialize)]
pub struct RecordItem {
    pub id: i32,
    pub professional_id: i32,
    pub recorded_at: String,
    pub description: String,
}

impl From<MedicalRecord> for RecordItem {
    fn from(record: MedicalRecord) -> Self {
        Self {
            id: record.id,
            professional_id: record.professional_id,
            recorded_at: format_datetime(&record.recorded_at),
            description: record.description,
        }
    }
}

#[derive(Default, Serialize)]
pub struct PrescriptionItem {
    pub id: i32,
    pub professional_id: i32,
    pub issued_at: String,
    pub content: String,
    pub digital_signature: Option<String>,
}

impl From<Prescription> for PrescriptionItem {
    fn from(p: Prescription) -> Self {
        Self {
            id: p.id,
            professional_id: p.professional_id,
            issued_at: format_datetime(&p.issued_at),
            content: p.content,
            digital_signature: p.digital_signature,
        }
    }
}

#[derive(Default, Serialize)]
pub struct ExamSummary {
    pub id: i32,
    pub name: String,
    pub scheduled_at: String,
    pub status: String,
}

impl From<Exam> for ExamSummary {
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
pub struct PatientHistoryResponse {
    pub success: bool,
    pub patient: PatientSummary,
    pub records: Vec<RecordItem>,
    pub prescriptions: Vec<PrescriptionItem>,
    pub exams: Vec<ExamSummary>,
    pub bookings: Vec<BookingItem>,
}

#[derive(Default, Serialize)]
pub struct TeleconsultResponse {
    pub success: bool,
    pub msg: String,
    pub patient: PatientSummary,
    pub video_link: String,
}
