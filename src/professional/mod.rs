mod requests;
mod responses;

use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use tracing::info;

use crate::{
    auth::{token, Identity, Role},
    booking::{self, registry},
    config::Config,
    database::{assert, with_conn},
    error::ServiceError,
    models::{
        bookings::Booking,
        exams::{Exam, NewExam, EXAM_STATUS_SCHEDULED},
        patients::PatientData,
        professionals::ProfessionalData,
        records::{MedicalRecord, NewMedicalRecord, NewPrescription, Prescription},
    },
    protocol::{BookingItem, BookingListResponse, BookingResponse, CreatedResponse, SimpleResponse},
    utils::{
        get_str_pattern, parse_date_str, parse_datetime_str, require_field, verify_password,
    },
    DbPool,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(create_schedule)
        .service(list_schedules)
        .service(schedule_detail)
        .service(delete_schedule)
        .service(publish_slots)
        .service(provider_bookings)
        .service(complete)
        .service(add_record)
        .service(add_prescription)
        .service(order_exam)
        .service(patient_history)
        .service(teleconsult);
}

/// Doctors act on their own calendar; admins name the professional.
fn target_professional(who: &Identity, requested: Option<i32>) -> Result<i32, ServiceError> {
    match who.role {
        Role::Admin => requested
            .ok_or_else(|| ServiceError::invalid("'professional_id' is required for admins")),
        _ => Ok(who.id),
    }
}

#[post("/login")]
async fn login(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<ProfessionalLoginRequest>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::professionals;

    let info = info.into_inner();
    require_field("license", &info.license)?;
    require_field("password", &info.password)?;

    let license = info.license.clone();
    let professional = with_conn(&pool, move |conn| {
        Ok(professionals::table
            .filter(professionals::license.eq(&license))
            .first::<ProfessionalData>(conn)
            .optional()?)
    })
    .await?
    .filter(|p| verify_password(&p.password, &info.password))
    .ok_or_else(|| ServiceError::Unauthorized("invalid credentials".to_string()))?;

    let access_token = token::issue(
        &config,
        professional.id,
        Role::Professional,
        Some(professional.kind.clone()),
    )?;

    info!(professional_id = professional.id, kind = %professional.kind, "professional logged in");
    Ok(HttpResponse::Ok().json(ProfessionalLoginResponse {
        success: true,
        access_token,
        professional_id: professional.id,
        name: professional.name,
        kind: professional.kind,
        license: professional.license,
    }))
}

#[post("/agendas")]
async fn create_schedule(
    pool: web::Data<DbPool>,
    who: Identity,
    info: web::Json<CreateScheduleRequest>,
) -> Result<HttpResponse, ServiceError> {
    let info = info.into_inner();
    let professional_id = target_professional(&who, info.professional_id)?;
    let date = parse_date_str(&info.date)?;

    let schedule = with_conn(&pool, move |conn| {
        registry::create_schedule(conn, &who, professional_id, date)
    })
    .await?;

    Ok(HttpResponse::Created().json(CreatedResponse::new("schedule created", schedule.id)))
}

#[get("/agendas")]
async fn list_schedules(
    pool: web::Data<DbPool>,
    who: Identity,
    query: web::Query<ListSchedulesQuery>,
) -> Result<HttpResponse, ServiceError> {
    let query = query.into_inner();
    let professional_id = target_professional(&who, query.professional_id)?;
    let date = query.date.as_deref().map(parse_date_str).transpose()?;

    let schedules = with_conn(&pool, move |conn| {
        registry::list_schedules(conn, &who, professional_id, date)
    })
    .await?;

    Ok(HttpResponse::Ok().json(ScheduleListResponse {
        success: true,
        schedules: schedules.into_iter().map(ScheduleItem::from).collect(),
    }))
}

#[get("/agendas/{id}")]
async fn schedule_detail(
    pool: web::Data<DbPool>,
    who: Identity,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let schedule_id = path.into_inner();
    let detail =
        with_conn(&pool, move |conn| registry::schedule_detail(conn, &who, schedule_id)).await?;

    Ok(HttpResponse::Ok().json(ScheduleDetailResponse::from(detail)))
}

#[delete("/agendas/{id}")]
async fn delete_schedule(
    pool: web::Data<DbPool>,
    who: Identity,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let schedule_id = path.into_inner();
    with_conn(&pool, move |conn| registry::delete_schedule(conn, &who, schedule_id)).await?;

    Ok(HttpResponse::Ok().json(SimpleResponse::ok("schedule deleted")))
}

#[post("/agendas/{id}/horarios")]
async fn publish_slots(
    pool: web::Data<DbPool>,
    who: Identity,
    path: web::Path<i32>,
    info: web::Json<PublishSlotsRequest>,
) -> Result<HttpResponse, ServiceError> {
    let schedule_id = path.into_inner();
    let times = info.into_inner().times;

    let outcome = with_conn(&pool, move |conn| {
        registry::publish_slots(conn, &who, schedule_id, &times)
    })
    .await?;

    let msg = if outcome.ignored.is_empty() {
        "all slots published"
    } else {
        "some times already existed and were ignored"
    };
    Ok(HttpResponse::Created().json(PublishSlotsResponse {
        success: true,
        msg: msg.to_string(),
        created: outcome.created.into_iter().map(Into::into).collect(),
        ignored: outcome.ignored,
    }))
}

#[get("/consultas/profissional/{id}")]
async fn provider_bookings(
    pool: web::Data<DbPool>,
    who: Identity,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let professional_id = path.into_inner();
    let bookings = with_conn(&pool, move |conn| {
        booking::provider_bookings(conn, &who, professional_id)
    })
    .await?;

    Ok(HttpResponse::Ok().json(BookingListResponse::from(bookings)))
}

#[put("/consultas/{id}/concluir")]
async fn complete(
    pool: web::Data<DbPool>,
    who: Identity,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let booking_id = path.into_inner();
    let booking = with_conn(&pool, move |conn| booking::complete(conn, &who, booking_id)).await?;

    Ok(HttpResponse::Ok().json(BookingResponse::new("appointment completed", booking)))
}

#[post("/prontuarios")]
async fn add_record(
    pool: web::Data<DbPool>,
    who: Identity,
    info: web::Json<MedicalRecordRequest>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::medical_records;

    who.require(&[Role::Professional])?;
    let info = info.into_inner();
    require_field("description", &info.description)?;

    let id = with_conn(&pool, move |conn| {
        assert::assert_patient(conn, info.patient_id)?;
        Ok(diesel::insert_into(medical_records::table)
            .values(&NewMedicalRecord {
                patient_id: info.patient_id,
                professional_id: who.id,
                recorded_at: Utc::now().naive_utc(),
                description: info.description,
            })
            .returning(medical_records::id)
            .get_result::<i32>(conn)?)
    })
    .await?;

    info!(record_id = id, "medical record registered");
    Ok(HttpResponse::Created().json(CreatedResponse::new("medical record registered", id)))
}

#[post("/receitas")]
async fn add_prescription(
    pool: web::Data<DbPool>,
    who: Identity,
    info: web::Json<PrescriptionRequest>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::prescriptions;

    who.require(&[Role::Professional])?;
    let info = info.into_inner();
    require_field("content", &info.content)?;

    let id = with_conn(&pool, move |conn| {
        assert::assert_patient(conn, info.patient_id)?;
        Ok(diesel::insert_into(prescriptions::table)
            .values(&NewPrescription {
                patient_id: info.patient_id,
                professional_id: who.id,
                issued_at: Utc::now().naive_utc(),
                content: info.content,
                digital_signature: info.digital_signature,
            })
            .returning(prescriptions::id)
            .get_result::<i32>(conn)?)
    })
    .await?;

    info!(prescription_id = id, "prescription issued");
    Ok(HttpResponse::Created().json(CreatedResponse::new("prescription issued", id)))
}

#[post("/exames")]
async fn order_exam(
    pool: web::Data<DbPool>,
    who: Identity,
    info: web::Json<ExamRequest>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::exams;

    who.require(&[Role::Professional, Role::Admin])?;
    let info = info.into_inner();
    require_field("name", &info.name)?;
    let scheduled_at = parse_datetime_str(&info.scheduled_at)?;

    let id = with_conn(&pool, move |conn| {
        assert::assert_patient(conn, info.patient_id)?;
        Ok(diesel::insert_into(exams::table)
            .values(&NewExam {
                patient_id: info.patient_id,
                name: info.name,
                scheduled_at,
                status: EXAM_STATUS_SCHEDULED.to_string(),
            })
            .returning(exams::id)
            .get_result::<i32>(conn)?)
    })
    .await?;

    info!(exam_id = id, "exam ordered");
    Ok(HttpResponse::Created().json(CreatedResponse::new("exam ordered", id)))
}

#[get("/pacientes/historico")]
async fn patient_history(
    pool: web::Data<DbPool>,
    who: Identity,
    query: web::Query<PatientHistoryQuery>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::{bookings, exams, medical_records, patients, prescriptions};

    who.require(&[Role::Professional, Role::Admin])?;
    let query = query.into_inner();
    if query.id.is_none() && query.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        return Err(ServiceError::invalid("give a patient 'id' or 'name'"));
    }

    let response = with_conn(&pool, move |conn| {
        let patient = match (query.id, query.name) {
            (Some(id), _) => patients::table.find(id).first::<PatientData>(conn),
            (None, name) => patients::table
                .filter(patients::name.like(get_str_pattern(name.unwrap_or_default().trim())))
                .order(patients::id.asc())
                .first::<PatientData>(conn),
        }
        .optional()?
        .ok_or_else(|| ServiceError::not_found("patient"))?;

        let records = medical_records::table
            .filter(medical_records::patient_id.eq(patient.id))
            .order(medical_records::recorded_at.asc())
            .load::<MedicalRecord>(conn)?;
        let prescriptions = prescriptions::table
            .filter(prescriptions::patient_id.eq(patient.id))
            .order(prescriptions::issued_at.asc())
            .load::<Prescription>(conn)?;
        let exams = exams::table
            .filter(exams::patient_id.eq(patient.id))
            .order(exams::scheduled_at.asc())
            .load::<Exam>(conn)?;
        let bookings = bookings::table
            .filter(bookings::patient_id.eq(patient.id))
            .order((bookings::date.asc(), bookings::time.asc()))
            .load::<Booking>(conn)?;

        Ok(PatientHistoryResponse {
            success: true,
            patient: PatientSummary {
                id: patient.id,
                name: patient.name,
            },
            records: records.into_iter().map(RecordItem::from).collect(),
            prescriptions: prescriptions.into_iter().map(PrescriptionItem::from).collect(),
            exams: exams.into_iter().map(ExamSummary::from).collect(),
            bookings: bookings.into_iter().map(BookingItem::from).collect(),
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[post("/teleconsulta")]
async fn teleconsult(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    who: Identity,
    info: web::Json<TeleconsultRequest>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::patients;

    who.require(&[Role::Professional, Role::Admin])?;
    let patient_id = info.patient_id;

    let patient = with_conn(&pool, move |conn| {
        Ok(patients::table
            .find(patient_id)
            .first::<PatientData>(conn)
            .optional()?)
    })
    .await?
    .ok_or_else(|| ServiceError::not_found(format!("patient {}", patient_id)))?;

    let video_link = format!("{}/patients/{}", config.telemedicine_base_url, patient.id);

    info!(patient_id, caller = who.id, "teleconsultation started");
    Ok(HttpResponse::Ok().json(TeleconsultResponse {
        success: true,
        msg: "teleconsultation started".to_string(),
        patient: PatientSummary {
            id: patient.id,
            name: patient.name,
        },
        video_link,
    }))
}
