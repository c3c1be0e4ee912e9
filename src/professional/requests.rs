use serde::Deserialize;

#[derive(Deserialize)]
pub struct ProfessionalLoginRequest {
    pub license: String,
    pub password: String,
}

/// `professional_id` is only read for admins; doctors always act on themselves.
#[derive(Deserialize)]
pub struct CreateScheduleRequest {
    pub date: String,
    pub professional_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct ListSchedulesQuery {
    pub date: Option<String>,
    pub professional_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct PublishSlotsRequest {
    pub times: Vec<String>,
}

#[derive(Deserialize)]
pub struct MedicalRecordRequest {
    pub patient_id: i32,
    pub description: String,
}

#[derive(Deserialize)]
pub struct PrescriptionRequest {
    pub patient_id: i32,
    pub content: String,
    pub digital_signature: Option<String>,
}

#[derive(Deserialize)]
pub struct ExamRequest {
    pub patient_id: i32,
    pub name: String,
    pub scheduled_at: String,
}

#[derive(Deserialize)]
pub struct PatientHistoryQuery {
    pub id: Option<i32>,
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct TeleconsultRequest {
    pub patient_id: i32,
}
