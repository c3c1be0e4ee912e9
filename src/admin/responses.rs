use serde::Serialize;

use crate::{
    models::{
        beds::Admission, patients::PatientData, professionals::ProfessionalData, users::UserData,
    },
    utils::{format_date, format_datetime},
};

#[derive(Default, Serialize)]
pub struct AdminItem {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<UserData> for AdminItem {
    fn from(user: UserData) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Default, Serialize)]
pub struct AdminListResponse {
    pub success: bool,
    pub admins: Vec<AdminItem>,
}

#[derive(Default, Serialize)]
pub struct PatientItem {
    pub id: i32,
    pub name: String,
    pub national_id: String,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl From<PatientData> for PatientItem {
    fn from(p: PatientData) -> Self {
        Self {
            id: p.id,
            name: p.name,
            national_id: p.national_id,
            birth_date: p.birth_date.as_ref().map(format_date),
            phone: p.phone,
            email: p.email,
        }
    }
}

#[derive(Default, Serialize)]
pub struct PatientListResponse {
    pub success: bool,
    pub patients: Vec<PatientItem>,
}

#[derive(Default, Serialize)]
pub struct ProfessionalItem {
    pub id: i32,
    pub name: String,
    pub kind: String,
    pub license: Option<String>,
    pub specialty: Option<String>,
    pub email: String,
}

impl From<ProfessionalData> for ProfessionalItem {
    fn from(p: ProfessionalData) -> Self {
        Self {
            id: p.id,
            name: p.name,
            kind: p.kind,
            license: p.license,
            specialty: p.specialty,
            email: p.email,
        }
    }
}

#[derive(Default, Serialize)]
pub struct ProfessionalListResponse {
    pub success: bool,
    pub professionals: Vec<ProfessionalItem>,
}

#[derive(Default, Serialize)]
pub struct BedItem {
    pub id: i32,
    pub number: String,
    pub kind: Option<String>,
    pub occupied: bool,
    pub patient_id: Option<i32>,
}

#[derive(Default, Serialize)]
pub struct BedListResponse {
    pub success: bool,
    pub beds: Vec<BedItem>,
}

#[derive(Default, Serialize)]
pub struct AdmissionItem {
    pub id: i32,
    pub patient_id: i32,
    pub bed_id: i32,
    pub admitted_at: String,
    pub discharged_at: Option<String>,
    pub active: bool,
}

impl From<Admission> for AdmissionItem {
    fn from(a: Admission) -> Self {
        Self {
            id: a.id,
            patient_id: a.patient_id,
            bed_id: a.bed_id,
            admitted_at: format_datetime(&a.admitted_at),
            discharged_at: a.discharged_at.as_ref().map(format_datetime),
            active: a.discharged_at.is_none(),
        }
    }
}

#[derive(Default, Serialize)]
pub struct AdmissionListResponse {
    pub success: bool,
    pub admissions: Vec<AdmissionItem>,
}

#[derive(Default, Serialize)]
pub struct AdmissionResponse {
    pub success: bool,
    pub msg: String,
    pub admission: AdmissionItem,
    pub patient_name: String,
}
