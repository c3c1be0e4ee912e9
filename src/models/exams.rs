use crate::schema::exams;
use chrono::NaiveDateTime;
use diesel::prelude::*;

pub const EXAM_STATUS_SCHEDULED: &str = "scheduled";

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = exams)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Exam {
    pub id: i32,
    pub patient_id: i32,
    pub name: String,
    pub scheduled_at: NaiveDateTime,
    pub status: String,
}

#[derive(Insertable)]
#[diesel(table_name = exams)]
pub struct NewExam {
    pub patient_id: i32,
    pub name: String,
    pub scheduled_at: NaiveDateTime,
    pub status: String,
}
