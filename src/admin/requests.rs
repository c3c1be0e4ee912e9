use serde::Deserialize;

use crate::models::professionals::KIND_DOCTOR;

#[derive(Deserialize)]
pub struct AddPatientRequest {
    pub name: String,
    pub national_id: String,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: String,
    /// Links an existing patient account so it can sign in through `/auth/login`.
    pub user_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct AddProfessionalRequest {
    pub name: String,
    pub license: Option<String>,
    pub specialty: Option<String>,
    pub email: String,
    pub password: String,
    #[serde(default = "add_professional_request_kind_default")]
    pub kind: String,
}

fn add_professional_request_kind_default() -> String {
    KIND_DOCTOR.to_string()
}

#[derive(Deserialize)]
pub struct AddBedRequest {
    pub number: String,
    pub kind: Option<String>,
}

#[derive(Deserialize)]
pub struct AdmitRequest {
    pub patient_id: i32,
    pub bed_id: i32,
}
