use crate::schema::{medical_records, prescriptions};
use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = medical_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MedicalRecord {
    pub id: i32,
    pub patient_id: i32,
    pub professional_id: i32,
    pub recorded_at: NaiveDateTime,
    pub description: String,
}

#[derive(Insertable)]
#[diesel(table_name = medical_records)]
pub struct NewMedicalRecord {
    pub patient_id: i32,
    pub professional_id: i32,
    pub recorded_at: NaiveDateTime,
    pub description: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = prescriptions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Prescription {
    pub id: i32,
    pub patient_id: i32,
    pub professional_id: i32,
    pub issued_at: NaiveDateTime,
    pub content: String,
    pub digital_signature: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = prescriptions)]
pub struct NewPrescription {
    pub patient_id: i32,
    pub professional_id: i32,
    pub issued_at: NaiveDateTime,
    pub content: String,
    pub digital_signature: Option<String>,
}
