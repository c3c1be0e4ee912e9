use crate::schema::patients;
use chrono::NaiveDate;
use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PatientData {
    pub id: i32,
    pub user_id: Option<i32>,
    pub name: String,
    pub national_id: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

#[derive(Insertable)]
#[diesel(table_name = patients)]
pub struct NewPatient {
    pub user_id: Option<i32>,
    pub name: String,
    pub national_id: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: String,
}
