mod requests;
mod responses;

use std::collections::HashMap;

use actix_web::{get, post, put, web, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use tracing::info;

use crate::{
    auth::{Identity, Role},
    database::{assert, with_conn},
    error::ServiceError,
    models::{
        beds::{Admission, Bed, NewAdmission, NewBed},
        patients::{NewPatient, PatientData},
        professionals::{NewProfessional, ProfessionalData},
        users::UserData,
    },
    protocol::CreatedResponse,
    utils::{hash_password, parse_date_str, require_field},
    DbPool,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_admins)
        .service(add_patient)
        .service(list_patients)
        .service(add_professional)
        .service(list_professionals)
        .service(add_bed)
        .service(list_beds)
        .service(admit)
        .service(discharge)
        .service(list_admissions);
}

#[get("/administradores")]
async fn list_admins(
    pool: web::Data<DbPool>,
    who: Identity,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::users;

    who.require(&[Role::Admin])?;
    let admins = with_conn(&pool, |conn| {
        Ok(users::table
            .filter(users::role.eq(Role::Admin.as_str()))
            .order(users::id.asc())
            .load::<UserData>(conn)?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(AdminListResponse {
        success: true,
        admins: admins.into_iter().map(AdminItem::from).collect(),
    }))
}

#[post("/admin/pacientes")]
async fn add_patient(
    pool: web::Data<DbPool>,
    who: Identity,
    info: web::Json<AddPatientRequest>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::{patients, users};

    who.require(&[Role::Admin])?;
    let info = info.into_inner();
    require_field("name", &info.name)?;
    require_field("national_id", &info.national_id)?;
    require_field("password", &info.password)?;
    let birth_date = info.birth_date.as_deref().map(parse_date_str).transpose()?;

    let id = with_conn(&pool, move |conn| {
        conn.immediate_transaction(|conn| {
            let res = patients::table
                .filter(patients::national_id.eq(&info.national_id))
                .count()
                .get_result::<i64>(conn)?;
            if res > 0 {
                return Err(ServiceError::Conflict(
                    "a patient with this national id already exists".to_string(),
                ));
            }
            if let Some(user_id) = info.user_id {
                let user = users::table
                    .find(user_id)
                    .first::<UserData>(conn)
                    .optional()?
                    .ok_or_else(|| ServiceError::not_found(format!("user {}", user_id)))?;
                if user.role != Role::Patient.as_str() {
                    return Err(ServiceError::invalid(format!(
                        "user {} is not a patient account",
                        user_id
                    )));
                }
                let res = patients::table
                    .filter(patients::user_id.eq(user_id))
                    .count()
                    .get_result::<i64>(conn)?;
                if res > 0 {
                    return Err(ServiceError::Conflict(format!(
                        "user {} is already linked to a patient",
                        user_id
                    )));
                }
            }

            let data = NewPatient {
                user_id: info.user_id,
                name: info.name,
                national_id: info.national_id,
                birth_date,
                phone: info.phone,
                email: info.email,
                password: hash_password(&info.password),
            };
            Ok(diesel::insert_into(patients::table)
                .values(&data)
                .returning(patients::id)
                .get_result::<i32>(conn)?)
        })
    })
    .await?;

    info!(patient_id = id, "patient registered");
    Ok(HttpResponse::Created().json(CreatedResponse::new("patient registered", id)))
}

#[get("/pacientes")]
async fn list_patients(
    pool: web::Data<DbPool>,
    who: Identity,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::patients;

    who.require(&[Role::Admin])?;
    let list = with_conn(&pool, |conn| {
        Ok(patients::table
            .order(patients::id.asc())
            .load::<PatientData>(conn)?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(PatientListResponse {
        success: true,
        patients: list.into_iter().map(PatientItem::from).collect(),
    }))
}

#[post("/admin/profissionais")]
async fn add_professional(
    pool: web::Data<DbPool>,
    who: Identity,
    info: web::Json<AddProfessionalRequest>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::professionals;

    who.require(&[Role::Admin])?;
    let info = info.into_inner();
    require_field("name", &info.name)?;
    require_field("email", &info.email)?;
    require_field("password", &info.password)?;
    require_field("kind", &info.kind)?;

    let id = with_conn(&pool, move |conn| {
        conn.immediate_transaction(|conn| {
            if let Some(license) = &info.license {
                let res = professionals::table
                    .filter(professionals::license.eq(license))
                    .count()
                    .get_result::<i64>(conn)?;
                if res > 0 {
                    return Err(ServiceError::Conflict(
                        "a professional with this license already exists".to_string(),
                    ));
                }
            }
            let res = professionals::table
                .filter(professionals::email.eq(&info.email))
                .count()
                .get_result::<i64>(conn)?;
            if res > 0 {
                return Err(ServiceError::Conflict(
                    "a professional with this email already exists".to_string(),
                ));
            }

            let data = NewProfessional {
                name: info.name,
                license: info.license,
                specialty: info.specialty,
                email: info.email,
                password: hash_password(&info.password),
                kind: info.kind,
            };
            Ok(diesel::insert_into(professionals::table)
                .values(&data)
                .returning(professionals::id)
                .get_result::<i32>(conn)?)
        })
    })
    .await?;

    info!(professional_id = id, "professional registered");
    Ok(HttpResponse::Created().json(CreatedResponse::new("professional registered", id)))
}

#[get("/profissionais")]
async fn list_professionals(
    pool: web::Data<DbPool>,
    who: Identity,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::professionals;

    who.require(&[Role::Admin])?;
    let list = with_conn(&pool, |conn| {
        Ok(professionals::table
            .order(professionals::id.asc())
            .load::<ProfessionalData>(conn)?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(ProfessionalListResponse {
        success: true,
        professionals: list.into_iter().map(ProfessionalItem::from).collect(),
    }))
}

#[post("/leitos")]
async fn add_bed(
    pool: web::Data<DbPool>,
    who: Identity,
    info: web::Json<AddBedRequest>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::beds;

    who.require(&[Role::Admin])?;
    let info = info.into_inner();
    require_field("number", &info.number)?;

    // duplicate numbers surface as Conflict through the unique index
    let id = with_conn(&pool, move |conn| {
        Ok(diesel::insert_into(beds::table)
            .values(&NewBed {
                number: info.number,
                kind: info.kind,
                occupied: false,
            })
            .returning(beds::id)
            .get_result::<i32>(conn)?)
    })
    .await?;

    info!(bed_id = id, "bed registered");
    Ok(HttpResponse::Created().json(CreatedResponse::new("bed registered", id)))
}

#[get("/leitos")]
async fn list_beds(pool: web::Data<DbPool>, who: Identity) -> Result<HttpResponse, ServiceError> {
    use crate::schema::{admissions, beds};

    who.require(&[Role::Admin])?;
    let (list, open) = with_conn(&pool, |conn| {
        let list = beds::table.order(beds::id.asc()).load::<Bed>(conn)?;
        let open = admissions::table
            .filter(admissions::discharged_at.is_null())
            .load::<Admission>(conn)?;
        Ok((list, open))
    })
    .await?;

    let occupants = open
        .into_iter()
        .map(|a| (a.bed_id, a.patient_id))
        .collect::<HashMap<_, _>>();
    let beds = list
        .into_iter()
        .map(|bed| {
            let patient_id = occupants.get(&bed.id).copied();
            BedItem {
                id: bed.id,
                number: bed.number,
                kind: bed.kind,
                occupied: patient_id.is_some(),
                patient_id,
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(BedListResponse {
        success: true,
        beds,
    }))
}

#[post("/internacoes")]
async fn admit(
    pool: web::Data<DbPool>,
    who: Identity,
    info: web::Json<AdmitRequest>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::{admissions, beds, patients};

    who.require(&[Role::Admin])?;
    let AdmitRequest { patient_id, bed_id } = info.into_inner();

    let (admission, patient_name) = with_conn(&pool, move |conn| {
        conn.immediate_transaction(|conn| {
            let bed = beds::table
                .find(bed_id)
                .first::<Bed>(conn)
                .optional()?
                .ok_or_else(|| ServiceError::not_found(format!("bed {}", bed_id)))?;
            if bed.occupied {
                return Err(ServiceError::Conflict(format!(
                    "bed {} is occupied",
                    bed.number
                )));
            }
            assert::assert_patient(conn, patient_id)?;
            let patient_name = patients::table
                .find(patient_id)
                .select(patients::name)
                .first::<String>(conn)?;

            diesel::update(beds::table.find(bed_id))
                .set(beds::occupied.eq(true))
                .execute(conn)?;
            let admission = diesel::insert_into(admissions::table)
                .values(&NewAdmission {
                    patient_id,
                    bed_id,
                    admitted_at: Utc::now().naive_utc(),
                })
                .returning(Admission::as_returning())
                .get_result(conn)?;
            Ok((admission, patient_name))
        })
    })
    .await?;

    info!(admission_id = admission.id, bed_id, patient_id, "patient admitted");
    Ok(HttpResponse::Created().json(AdmissionResponse {
        success: true,
        msg: "admission started".to_string(),
        admission: admission.into(),
        patient_name,
    }))
}

#[put("/internacoes/{id}/alta")]
async fn discharge(
    pool: web::Data<DbPool>,
    who: Identity,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::{admissions, beds, patients};

    who.require(&[Role::Admin])?;
    let admission_id = path.into_inner();

    let (admission, patient_name) = with_conn(&pool, move |conn| {
        conn.immediate_transaction(|conn| {
            let admission = admissions::table
                .find(admission_id)
                .first::<Admission>(conn)
                .optional()?
                .ok_or_else(|| ServiceError::not_found(format!("admission {}", admission_id)))?;
            if admission.discharged_at.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "admission {} was already discharged",
                    admission_id
                )));
            }

            let admission = diesel::update(admissions::table.find(admission_id))
                .set(admissions::discharged_at.eq(Some(Utc::now().naive_utc())))
                .returning(Admission::as_returning())
                .get_result(conn)?;
            diesel::update(beds::table.find(admission.bed_id))
                .set(beds::occupied.eq(false))
                .execute(conn)?;
            let patient_name = patients::table
                .find(admission.patient_id)
                .select(patients::name)
                .first::<String>(conn)?;
            Ok((admission, patient_name))
        })
    })
    .await?;

    info!(admission_id, "patient discharged");
    Ok(HttpResponse::Ok().json(AdmissionResponse {
        success: true,
        msg: "patient discharged".to_string(),
        admission: admission.into(),
        patient_name,
    }))
}

#[get("/internacoes")]
async fn list_admissions(
    pool: web::Data<DbPool>,
    who: Identity,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::admissions;

    who.require(&[Role::Admin])?;
    let list = with_conn(&pool, |conn| {
        Ok(admissions::table
            .order(admissions::admitted_at.desc())
            .load::<Admission>(conn)?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(AdmissionListResponse {
        success: true,
        admissions: list.into_iter().map(AdmissionItem::from).collect(),
    }))
}
