mod requests;
mod responses;

use actix_web::{get, post, put, web, HttpResponse};
use diesel::prelude::*;
use tracing::info;

use crate::{
    auth::{token, Identity, Role},
    booking::{self, registry, BookingRequest},
    config::Config,
    database::{assert, with_conn},
    error::ServiceError,
    models::{
        exams::{Exam, EXAM_STATUS_SCHEDULED},
        notifications::Notification,
        patients::PatientData,
    },
    protocol::{BookingListResponse, BookingResponse, LinkResponse, SimpleResponse},
    utils::{parse_datetime_str, parse_time_str, require_field, verify_password},
    DbPool,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(open_schedules)
        .service(book)
        .service(cancel)
        .service(reschedule)
        .service(booking_history)
        .service(reschedule_exam)
        .service(exam_history)
        .service(notifications)
        .service(read_notification)
        .service(teleconsult);
}

#[post("/login")]
async fn login(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<PatientLoginRequest>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::patients;

    let info = info.into_inner();
    require_field("email", &info.email)?;
    require_field("password", &info.password)?;

    let email = info.email.clone();
    let patient = with_conn(&pool, move |conn| {
        Ok(patients::table
            .filter(patients::email.eq(&email))
            .first::<PatientData>(conn)
            .optional()?)
    })
    .await?
    .filter(|patient| verify_password(&patient.password, &info.password))
    .ok_or_else(|| ServiceError::Unauthorized("invalid credentials".to_string()))?;

    let access_token = token::issue(&config, patient.id, Role::Patient, None)?;

    info!(patient_id = patient.id, "patient logged in");
    Ok(HttpResponse::Ok().json(PatientLoginResponse {
        success: true,
        access_token,
        patient_id: patient.id,
    }))
}

#[get("/agendas/horarios")]
async fn open_schedules(
    pool: web::Data<DbPool>,
    _who: Identity,
) -> Result<HttpResponse, ServiceError> {
    let open = with_conn(&pool, registry::available_slots).await?;

    Ok(HttpResponse::Ok().json(OpenSchedulesResponse {
        success: true,
        schedules: open
            .into_iter()
            .map(|(schedule, slots)| OpenScheduleItem::new(schedule, slots))
            .collect(),
    }))
}

#[post("/consultas")]
async fn book(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    who: Identity,
    info: web::Json<BookRequest>,
) -> Result<HttpResponse, ServiceError> {
    let info = info.into_inner();
    let req = BookingRequest {
        schedule_id: info.schedule_id,
        time: parse_time_str(&info.time)?,
        patient_id: info.patient_id,
        is_remote: info.is_remote,
    };
    let base_url = config.telemedicine_base_url.clone();

    let booking = with_conn(&pool, move |conn| booking::book(conn, &who, req, &base_url)).await?;

    Ok(HttpResponse::Created().json(BookingResponse::new("appointment booked", booking)))
}

#[put("/consultas/{id}/cancelar")]
async fn cancel(
    pool: web::Data<DbPool>,
    who: Identity,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let booking_id = path.into_inner();
    let booking = with_conn(&pool, move |conn| booking::cancel(conn, &who, booking_id)).await?;

    Ok(HttpResponse::Ok().json(BookingResponse::new("appointment cancelled", booking)))
}

#[put("/consultas/{id}/remarcar")]
async fn reschedule(
    pool: web::Data<DbPool>,
    who: Identity,
    path: web::Path<i32>,
    info: web::Json<RescheduleRequest>,
) -> Result<HttpResponse, ServiceError> {
    let booking_id = path.into_inner();
    let new_slot_id = info.new_slot_id;
    let booking = with_conn(&pool, move |conn| {
        booking::reschedule(conn, &who, booking_id, new_slot_id)
    })
    .await?;

    Ok(HttpResponse::Ok().json(BookingResponse::new("appointment rescheduled", booking)))
}

#[get("/consultas/historico/{patient_id}")]
async fn booking_history(
    pool: web::Data<DbPool>,
    who: Identity,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let patient_id = path.into_inner();
    let bookings =
        with_conn(&pool, move |conn| booking::patient_history(conn, &who, patient_id)).await?;

    Ok(HttpResponse::Ok().json(BookingListResponse::from(bookings)))
}

#[put("/exames/{id}")]
async fn reschedule_exam(
    pool: web::Data<DbPool>,
    who: Identity,
    path: web::Path<i32>,
    info: web::Json<RescheduleExamRequest>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::exams;

    who.require(&[Role::Patient, Role::Admin])?;
    let exam_id = path.into_inner();
    let scheduled_at = parse_datetime_str(&info.scheduled_at)?;

    let exam = with_conn(&pool, move |conn| {
        conn.immediate_transaction(|conn| {
            let exam = exams::table
                .find(exam_id)
                .first::<Exam>(conn)
                .optional()?
                .ok_or_else(|| ServiceError::not_found(format!("exam {}", exam_id)))?;
            who.require_patient_self(exam.patient_id)?;
            if exam.status != EXAM_STATUS_SCHEDULED {
                return Err(ServiceError::invalid(format!(
                    "exam {} is {}, only scheduled exams can be moved",
                    exam_id, exam.status
                )));
            }

            Ok(diesel::update(exams::table.find(exam_id))
                .set(exams::scheduled_at.eq(scheduled_at))
                .returning(Exam::as_returning())
                .get_result(conn)?)
        })
    })
    .await?;

    info!(exam_id, "exam rescheduled");
    Ok(HttpResponse::Ok().json(ExamResponse {
        success: true,
        msg: "exam rescheduled".to_string(),
        exam: exam.into(),
    }))
}

#[get("/exames/historico/{patient_id}")]
async fn exam_history(
    pool: web::Data<DbPool>,
    who: Identity,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::exams;

    who.require(&[Role::Patient, Role::Admin])?;
    let patient_id = path.into_inner();
    who.require_patient_self(patient_id)?;

    let exams = with_conn(&pool, move |conn| {
        assert::assert_patient(conn, patient_id)?;
        Ok(exams::table
            .filter(exams::patient_id.eq(patient_id))
            .order(exams::scheduled_at.desc())
            .load::<Exam>(conn)?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(ExamListResponse {
        success: true,
        exams: exams.into_iter().map(ExamItem::from).collect(),
    }))
}

#[get("/notificacoes/{patient_id}")]
async fn notifications(
    pool: web::Data<DbPool>,
    who: Identity,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::notifications;

    who.require(&[Role::Patient, Role::Admin])?;
    let patient_id = path.into_inner();
    who.require_patient_self(patient_id)?;

    let list = with_conn(&pool, move |conn| {
        Ok(notifications::table
            .filter(notifications::patient_id.eq(patient_id))
            .order(notifications::created_at.desc())
            .load::<Notification>(conn)?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(NotificationListResponse {
        success: true,
        notifications: list.into_iter().map(NotificationItem::from).collect(),
    }))
}

#[put("/notificacoes/{id}/ler")]
async fn read_notification(
    pool: web::Data<DbPool>,
    who: Identity,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::notifications;

    who.require(&[Role::Patient, Role::Admin])?;
    let notification_id = path.into_inner();

    with_conn(&pool, move |conn| {
        let note = notifications::table
            .find(notification_id)
            .first::<Notification>(conn)
            .optional()?
            .ok_or_else(|| ServiceError::not_found(format!("notification {}", notification_id)))?;
        if who.role == Role::Patient && note.patient_id != Some(who.id) {
            return Err(ServiceError::Forbidden(
                "notification belongs to another patient".to_string(),
            ));
        }

        diesel::update(notifications::table.find(notification_id))
            .set(notifications::read.eq(true))
            .execute(conn)?;
        Ok(())
    })
    .await?;

    Ok(HttpResponse::Ok().json(SimpleResponse::ok("notification marked as read")))
}

#[get("/teleconsulta/{booking_id}")]
async fn teleconsult(
    pool: web::Data<DbPool>,
    who: Identity,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let booking_id = path.into_inner();
    let link = with_conn(&pool, move |conn| booking::remote_link(conn, &who, booking_id)).await?;

    Ok(HttpResponse::Ok().json(LinkResponse::new("join your remote appointment", link)))
}
