use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "register_request_role_default")]
    pub role: String,
    /// When present, a patient record linked to the new account is created.
    pub national_id: Option<String>,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn register_request_role_default() -> String {
    super::Role::Patient.as_str().to_string()
}
