use crate::schema::{admissions, beds};
use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = beds)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Bed {
    pub id: i32,
    pub number: String,
    pub kind: Option<String>,
    pub occupied: bool,
}

#[derive(Insertable)]
#[diesel(table_name = beds)]
pub struct NewBed {
    pub number: String,
    pub kind: Option<String>,
    pub occupied: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = admissions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Admission {
    pub id: i32,
    pub patient_id: i32,
    pub bed_id: i32,
    pub admitted_at: NaiveDateTime,
    pub discharged_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = admissions)]
pub struct NewAdmission {
    pub patient_id: i32,
    pub bed_id: i32,
    pub admitted_at: NaiveDateTime,
}
