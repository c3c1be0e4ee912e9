use serde::Deserialize;

#[derive(Deserialize)]
pub struct PatientLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct BookRequest {
    pub schedule_id: i32,
    pub time: String,
    pub patient_id: i32,
    #[serde(default)]
    pub is_remote: bool,
}

#[derive(Deserialize)]
pub struct RescheduleRequest {
    pub new_slot_id: i32,
}

#[derive(Deserialize)]
pub struct RescheduleExamRequest {
    pub scheduled_at: String,
}
