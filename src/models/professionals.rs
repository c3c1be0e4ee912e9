use crate::schema::professionals;
use diesel::prelude::*;

/// Only this kind of professional may publish schedules.
pub const KIND_DOCTOR: &str = "doctor";

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = professionals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProfessionalData {
    pub id: i32,
    pub name: String,
    pub license: Option<String>,
    pub specialty: Option<String>,
    pub email: String,
    pub password: String,
    pub kind: String,
}

#[derive(Insertable)]
#[diesel(table_name = professionals)]
pub struct NewProfessional {
    pub name: String,
    pub license: Option<String>,
    pub specialty: Option<String>,
    pub email: String,
    pub password: String,
    pub kind: String,
}
