use serde::Serialize;

#[derive(Serialize)]
pub struct UserItem {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub access_token: String,
    pub user: UserItem,
    pub patient_id: Option<i32>,
}
